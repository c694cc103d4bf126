//! Content-based recommendations from a user's watch history.
//!
//! ## Algorithm
//! 1. Resolve the user by email and each watched id to a movie
//! 2. For every watched movie and every director, actor and genre it lists,
//!    look up all movies sharing that value and add points to each:
//!    - +20 per shared director
//!    - +30 per shared actor
//!    - +1 per shared genre
//! 3. Drop every watched movie from the candidates
//! 4. Rank by score, then rating, then title, and keep the top N
//!
//! Points add up across watched movies and across attributes: a movie
//! sharing a director with two watched movies gets that director's points
//! twice.

use crate::ranking::{self, RankedCandidate};
use crate::types::{ExplainedRecommendation, MovieAndRank, ScoreBreakdown, ScoreWeights};
use data_loader::{DataIndex, RecordId, User};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Scores movies against a user's history using the shared movie index.
///
/// The index is read-only, so one `Recommender` (or clones of it) can serve
/// requests from many threads; each request builds its own score table.
#[derive(Debug, Clone)]
pub struct Recommender {
    /// Shared reference to the loaded databases
    data_index: Arc<DataIndex>,

    /// Points per shared attribute
    weights: ScoreWeights,
}

impl Recommender {
    /// Create a recommender with the default weights (20 / 30 / 1)
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self {
            data_index,
            weights: ScoreWeights::default(),
        }
    }

    /// Replace all score weights at once
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Configure points per shared director (default: 20)
    pub fn with_director_weight(mut self, weight: u32) -> Self {
        self.weights.director = weight;
        self
    }

    /// Configure points per shared actor (default: 30)
    pub fn with_actor_weight(mut self, weight: u32) -> Self {
        self.weights.actor = weight;
        self
    }

    /// Configure points per shared genre (default: 1)
    pub fn with_genre_weight(mut self, weight: u32) -> Self {
        self.weights.genre = weight;
        self
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Recommend up to `movie_count` movies for the user with this email.
    ///
    /// A non-positive count, an unknown email, or a history with nothing
    /// in common with the catalog all yield an empty list.
    #[instrument(skip(self))]
    pub fn recommend_movies(&self, user_email: &str, movie_count: i32) -> Vec<MovieAndRank> {
        self.rank(user_email, movie_count)
            .into_iter()
            .map(|candidate| MovieAndRank::new(candidate.movie.id.clone(), candidate.score))
            .collect()
    }

    /// Same ranking as [`Recommender::recommend_movies`], with per-category
    /// points for each movie.
    #[instrument(skip(self))]
    pub fn explain_recommendations(
        &self,
        user_email: &str,
        movie_count: i32,
    ) -> Vec<ExplainedRecommendation> {
        self.rank(user_email, movie_count)
            .into_iter()
            .map(|candidate| ExplainedRecommendation {
                movie_id: candidate.movie.id.clone(),
                title: candidate.movie.title.clone(),
                rating: candidate.movie.rating,
                compatibility_score: candidate.score,
                breakdown: candidate.breakdown,
            })
            .collect()
    }

    fn rank(&self, user_email: &str, movie_count: i32) -> Vec<RankedCandidate<'_>> {
        let limit = match usize::try_from(movie_count) {
            Ok(limit) if limit > 0 => limit,
            _ => return Vec::new(),
        };

        let Some(user) = self.data_index.users().get_user_from_email(user_email) else {
            warn!("User {} not found", user_email);
            return Vec::new();
        };

        let watched = self.resolve_watch_history(user);
        let mut scores = self.score_candidates(&watched);

        // Never recommend something already watched
        let movies = self.data_index.movies();
        let watched_ids: HashSet<&str> = user.watch_history.iter().map(String::as_str).collect();
        scores.retain(|&handle, _| {
            movies
                .movie(handle)
                .is_some_and(|movie| !watched_ids.contains(movie.id.as_str()))
        });
        debug!("Scored {} candidates for {}", scores.len(), user_email);

        let ranked = ranking::rank_and_select(movies, scores, limit);
        debug!("Selected {} recommendations", ranked.len());
        ranked
    }

    /// Handles of the watched movies, skipping ids missing from the catalog
    fn resolve_watch_history(&self, user: &User) -> Vec<RecordId> {
        let movies = self.data_index.movies();
        user.watch_history
            .iter()
            .filter_map(|movie_id| {
                let handle = movies.find_id(movie_id);
                if handle.is_none() {
                    debug!("Skipping unknown watched movie {} for {}", movie_id, user.email);
                }
                handle
            })
            .collect()
    }

    /// Accumulate points for every movie sharing an attribute with history
    fn score_candidates(&self, watched: &[RecordId]) -> HashMap<RecordId, ScoreBreakdown> {
        let movies = self.data_index.movies();
        let weights = self.weights;
        let mut scores: HashMap<RecordId, ScoreBreakdown> = HashMap::new();

        for movie in watched.iter().filter_map(|&handle| movies.movie(handle)) {
            for director in &movie.directors {
                for &candidate in movies.ids_with_director(director) {
                    let entry = scores.entry(candidate).or_default();
                    entry.director = entry.director.saturating_add(weights.director);
                }
            }

            for actor in &movie.actors {
                for &candidate in movies.ids_with_actor(actor) {
                    let entry = scores.entry(candidate).or_default();
                    entry.actor = entry.actor.saturating_add(weights.actor);
                }
            }

            for genre in &movie.genres {
                for &candidate in movies.ids_with_genre(genre) {
                    let entry = scores.entry(candidate).or_default();
                    entry.genre = entry.genre.saturating_add(weights.genre);
                }
            }
        }

        scores
    }
}
