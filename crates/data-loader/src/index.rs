//! Lookup tables built over the loaded records.
//!
//! - `MovieDatabase`: movies indexed by id, director, actor and genre
//! - `UserDatabase`: users indexed by email
//! - `DataIndex`: both databases, loaded together from a data directory
//!
//! Every index is an [`OrderedMultimap`] from a string key to `RecordId`
//! handles into the owning `RecordStore`. Nothing is mutated after load.
//!
//! Rust concepts you'll see here:
//! - Lookups return borrowed data (`&Movie`, `&[RecordId]`) tied to `&self`,
//!   so callers cannot outlive or modify the database
//! - `rayon::join` runs the two file parsers on separate threads and
//!   returns both results
//! - `impl IntoIterator` parameters accept a `Vec`, an iterator or an array

use crate::error::Result;
use crate::multimap::OrderedMultimap;
use crate::parser;
use crate::types::*;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// File name of the user records inside a data directory
pub const USERS_FILE: &str = "users.txt";

/// File name of the movie records inside a data directory
pub const MOVIES_FILE: &str = "movies.txt";

// =============================================================================
// MovieDatabase
// =============================================================================

/// Movies plus the four lookup tables over them.
///
/// A movie is registered once under its id and once per director, actor
/// and genre it lists, in the order the movies were inserted.
#[derive(Debug, Default)]
pub struct MovieDatabase {
    movies: RecordStore<Movie>,
    by_id: OrderedMultimap<MovieId, RecordId>,
    by_director: OrderedMultimap<String, RecordId>,
    by_actor: OrderedMultimap<String, RecordId>,
    by_genre: OrderedMultimap<String, RecordId>,
}

impl MovieDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database from already parsed movies, indexing in order
    pub fn from_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        let movies = movies.into_iter();
        let mut db = Self {
            movies: RecordStore::with_capacity(movies.size_hint().0),
            ..Self::default()
        };
        for movie in movies {
            db.insert_movie(movie);
        }
        db
    }

    /// Parse and index a movie file. Fails as a whole on malformed input.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let movies = parser::parse_movies(path)?;
        Ok(Self::from_movies(movies))
    }

    /// Take ownership of a movie and register it in every index
    pub fn insert_movie(&mut self, movie: Movie) -> RecordId {
        let handle = self.movies.next_id();

        if self.by_id.contains_key(movie.id.as_str()) {
            warn!("Duplicate movie id {}; lookups by id return the first record", movie.id);
        }
        self.by_id.insert(movie.id.clone(), handle);
        for director in &movie.directors {
            self.by_director.insert(director.clone(), handle);
        }
        for actor in &movie.actors {
            self.by_actor.insert(actor.clone(), handle);
        }
        for genre in &movie.genres {
            self.by_genre.insert(genre.clone(), handle);
        }

        self.movies.push(movie)
    }

    /// Get a movie by id.
    ///
    /// If two movies were loaded under the same id, the first one wins.
    pub fn get_movie_from_id(&self, id: &str) -> Option<&Movie> {
        self.find_id(id).and_then(|handle| self.movies.get(handle))
    }

    /// Handle of the movie with this id
    pub fn find_id(&self, id: &str) -> Option<RecordId> {
        self.by_id.get(id).copied()
    }

    /// Resolve a handle handed out by this database
    pub fn movie(&self, handle: RecordId) -> Option<&Movie> {
        self.movies.get(handle)
    }

    /// All movies listing exactly this director (case-sensitive)
    pub fn get_movies_with_director(&self, director: &str) -> Vec<&Movie> {
        self.resolve(self.ids_with_director(director))
    }

    /// All movies listing exactly this actor (case-sensitive)
    pub fn get_movies_with_actor(&self, actor: &str) -> Vec<&Movie> {
        self.resolve(self.ids_with_actor(actor))
    }

    /// All movies listing exactly this genre (case-sensitive)
    pub fn get_movies_with_genre(&self, genre: &str) -> Vec<&Movie> {
        self.resolve(self.ids_with_genre(genre))
    }

    pub fn ids_with_director(&self, director: &str) -> &[RecordId] {
        self.by_director.find(director)
    }

    pub fn ids_with_actor(&self, actor: &str) -> &[RecordId] {
        self.by_actor.find(actor)
    }

    pub fn ids_with_genre(&self, genre: &str) -> &[RecordId] {
        self.by_genre.find(genre)
    }

    /// Every movie `value` names, checked as id, actor, director and genre
    pub fn lookup_attribute(&self, value: &str) -> Vec<AttributeMatch<'_>> {
        let mut matches = Vec::new();
        if let Some(movie) = self.get_movie_from_id(value) {
            matches.push(AttributeMatch {
                kind: MatchKind::Id,
                movie,
            });
        }

        let by_attribute = [
            (MatchKind::Actor, self.ids_with_actor(value)),
            (MatchKind::Director, self.ids_with_director(value)),
            (MatchKind::Genre, self.ids_with_genre(value)),
        ];
        for (kind, handles) in by_attribute {
            matches.extend(
                self.resolve(handles)
                    .into_iter()
                    .map(|movie| AttributeMatch { kind, movie }),
            );
        }
        matches
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Shape of each lookup table, for load diagnostics
    pub fn index_stats(&self) -> Vec<IndexStats> {
        vec![
            IndexStats::of("id", &self.by_id),
            IndexStats::of("director", &self.by_director),
            IndexStats::of("actor", &self.by_actor),
            IndexStats::of("genre", &self.by_genre),
        ]
    }

    fn resolve(&self, handles: &[RecordId]) -> Vec<&Movie> {
        handles
            .iter()
            .filter_map(|&handle| self.movies.get(handle))
            .collect()
    }
}

/// Which index an attribute lookup hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Id,
    Actor,
    Director,
    Genre,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchKind::Id => "ID",
            MatchKind::Actor => "Actor",
            MatchKind::Director => "Director",
            MatchKind::Genre => "Genre",
        };
        f.write_str(label)
    }
}

/// One hit of [`MovieDatabase::lookup_attribute`]
#[derive(Debug, Clone, Copy)]
pub struct AttributeMatch<'a> {
    pub kind: MatchKind,
    pub movie: &'a Movie,
}

/// Size and depth of one lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub name: &'static str,
    pub keys: usize,
    pub entries: usize,
    pub height: usize,
}

impl IndexStats {
    fn of<K, V>(name: &'static str, map: &OrderedMultimap<K, V>) -> Self {
        Self {
            name,
            keys: map.len(),
            entries: map.value_count(),
            height: map.height(),
        }
    }
}

// =============================================================================
// UserDatabase
// =============================================================================

/// Users indexed by email
#[derive(Debug, Default)]
pub struct UserDatabase {
    users: RecordStore<User>,
    by_email: OrderedMultimap<Email, RecordId>,
}

impl UserDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users.into_iter();
        let mut db = Self {
            users: RecordStore::with_capacity(users.size_hint().0),
            ..Self::default()
        };
        for user in users {
            db.insert_user(user);
        }
        db
    }

    /// Parse and index a user file. Fails as a whole on malformed input.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let users = parser::parse_users(path)?;
        Ok(Self::from_users(users))
    }

    pub fn insert_user(&mut self, user: User) -> RecordId {
        let handle = self.users.next_id();
        if self.by_email.contains_key(user.email.as_str()) {
            warn!("Duplicate user email {}; lookups return the first record", user.email);
        }
        self.by_email.insert(user.email.clone(), handle);
        self.users.push(user)
    }

    /// Get a user by email (exact, case-sensitive match)
    pub fn get_user_from_email(&self, email: &str) -> Option<&User> {
        self.by_email
            .get(email)
            .and_then(|&handle| self.users.get(handle))
    }

    /// Emails of all users, in load order
    pub fn emails(&self) -> impl Iterator<Item = &str> + '_ {
        self.users.iter().map(|(_, user)| user.email.as_str())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

// =============================================================================
// DataIndex
// =============================================================================

/// Both databases, built once at startup and read-only afterwards
#[derive(Debug, Default)]
pub struct DataIndex {
    users: UserDatabase,
    movies: MovieDatabase,
}

impl DataIndex {
    pub fn new(users: UserDatabase, movies: MovieDatabase) -> Self {
        Self { users, movies }
    }

    /// Load `users.txt` and `movies.txt` from a data directory
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        Self::load(&data_dir.join(USERS_FILE), &data_dir.join(MOVIES_FILE))
    }

    /// Load both record files.
    ///
    /// The two files are parsed in parallel; either failing fails the load.
    #[instrument(skip_all)]
    pub fn load(users_path: &Path, movies_path: &Path) -> Result<Self> {
        info!(
            "Loading users from {} and movies from {}",
            users_path.display(),
            movies_path.display()
        );

        let (users, movies) = rayon::join(
            || UserDatabase::load_from_file(users_path),
            || MovieDatabase::load_from_file(movies_path),
        );
        let users = users?;
        let movies = movies?;

        for stats in movies.index_stats() {
            debug!(
                index = stats.name,
                keys = stats.keys,
                entries = stats.entries,
                height = stats.height,
                "movie index built"
            );
        }
        info!("Loaded {} users and {} movies", users.len(), movies.len());

        Ok(Self { users, movies })
    }

    pub fn users(&self) -> &UserDatabase {
        &self.users
    }

    pub fn movies(&self) -> &MovieDatabase {
        &self.movies
    }

    /// Get counts for debugging/validation: (users, movies)
    pub fn counts(&self) -> (usize, usize) {
        (self.users.len(), self.movies.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataLoadError;
    use std::fs;

    fn movie(id: &str, title: &str, directors: &[&str], actors: &[&str], genres: &[&str]) -> Movie {
        Movie {
            id: id.to_string(),
            title: title.to_string(),
            release_year: "2000".to_string(),
            directors: directors.iter().map(|s| s.to_string()).collect(),
            actors: actors.iter().map(|s| s.to_string()).collect(),
            genres: genres.iter().map(|s| s.to_string()).collect(),
            rating: 3.0,
        }
    }

    fn create_test_movies() -> MovieDatabase {
        MovieDatabase::from_movies(vec![
            movie("m1", "First", &["Nolan"], &["Bale", "Caine"], &["Drama", "Action", "Crime"]),
            movie("m2", "Second", &["Nolan"], &["Caine"], &["Drama"]),
            movie("m3", "Third", &[], &["Bale"], &["Comedy"]),
        ])
    }

    fn titles(movies: &[&Movie]) -> Vec<String> {
        movies.iter().map(|m| m.title.clone()).collect()
    }

    #[test]
    fn test_get_movie_from_id() {
        let db = create_test_movies();
        assert_eq!(db.get_movie_from_id("m2").unwrap().title, "Second");
        assert!(db.get_movie_from_id("m4").is_none());
        assert!(db.get_movie_from_id("M2").is_none());
    }

    #[test]
    fn test_attribute_lookups_keep_insertion_order() {
        let db = create_test_movies();
        assert_eq!(titles(&db.get_movies_with_director("Nolan")), vec!["First", "Second"]);
        assert_eq!(titles(&db.get_movies_with_actor("Bale")), vec!["First", "Third"]);
        assert_eq!(titles(&db.get_movies_with_actor("Caine")), vec!["First", "Second"]);
        assert_eq!(titles(&db.get_movies_with_genre("Drama")), vec!["First", "Second"]);
    }

    #[test]
    fn test_attribute_lookups_are_exact() {
        let db = create_test_movies();
        assert!(db.get_movies_with_director("nolan").is_empty());
        assert!(db.get_movies_with_genre("Drama ").is_empty());
        assert!(db.get_movies_with_actor("").is_empty());
    }

    #[test]
    fn test_movie_indexed_once_per_genre() {
        let db = create_test_movies();
        let stats = db.index_stats();
        let genre = stats.iter().find(|s| s.name == "genre").unwrap();

        // m1 carries three genres, m2 one, m3 one
        assert_eq!(genre.entries, 5);
        assert_eq!(genre.keys, 4);
    }

    #[test]
    fn test_duplicate_id_first_wins() {
        let mut db = MovieDatabase::new();
        let first = db.insert_movie(movie("dup", "Original", &["A"], &[], &[]));
        let second = db.insert_movie(movie("dup", "Copy", &["A"], &[], &[]));

        assert_eq!(db.find_id("dup"), Some(first));
        assert_eq!(db.get_movie_from_id("dup").unwrap().title, "Original");

        // Both still register under their attributes
        assert_eq!(db.ids_with_director("A"), &[first, second]);
    }

    #[test]
    fn test_lookup_attribute() {
        let mut db = create_test_movies();
        db.insert_movie(movie("Drama", "Named Like A Genre", &[], &[], &["Drama"]));

        let matches = db.lookup_attribute("Drama");
        let kinds: Vec<MatchKind> = matches.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![MatchKind::Id, MatchKind::Genre, MatchKind::Genre, MatchKind::Genre]
        );
        assert_eq!(matches[0].movie.title, "Named Like A Genre");
        assert!(db.lookup_attribute("Nobody").is_empty());
    }

    #[test]
    fn test_user_database() {
        let db = UserDatabase::from_users(vec![
            User {
                full_name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                watch_history: vec!["m1".to_string()],
            },
            User {
                full_name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
                watch_history: vec![],
            },
        ]);

        assert_eq!(db.get_user_from_email("bob@example.com").unwrap().full_name, "Bob");
        assert!(db.get_user_from_email("BOB@example.com").is_none());
        assert_eq!(
            db.emails().collect::<Vec<_>>(),
            vec!["ada@example.com", "bob@example.com"]
        );
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(MOVIES_FILE),
            "m1\nFirst\n1999\nNolan\nBale\nDrama\n8.0\n\nm2\nSecond\n2001\nNolan\n\nDrama\n7.0\n",
        )
        .unwrap();
        fs::write(dir.path().join(USERS_FILE), "Ada\nada@example.com\n1\nm1\n").unwrap();

        let index = DataIndex::load_from_files(dir.path()).unwrap();
        assert_eq!(index.counts(), (1, 2));
        assert_eq!(index.movies().get_movies_with_director("Nolan").len(), 2);
        assert!(index.users().get_user_from_email("ada@example.com").is_some());
    }

    #[test]
    fn test_load_fails_on_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MOVIES_FILE), "m1\nFirst\n1999\nNolan\nBale\nDrama\nnot-a-number\n").unwrap();
        fs::write(dir.path().join(USERS_FILE), "Ada\nada@example.com\n0\n").unwrap();

        let err = DataIndex::load_from_files(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { .. }));
    }

    #[test]
    fn test_load_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataIndex::load_from_files(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
