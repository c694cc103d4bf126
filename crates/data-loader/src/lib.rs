//! # Data Loader Crate
//!
//! This crate loads the movie and user record files and builds the lookup
//! tables every query runs against.
//!
//! ## Main Components
//!
//! - **types**: Records (Movie, User) and the RecordStore that owns them
//! - **multimap**: OrderedMultimap, the key-ordered index structure
//! - **parser**: Parse the block-formatted text files into records
//! - **index**: MovieDatabase, UserDatabase and DataIndex
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! // Load users.txt and movies.txt
//! let index = DataIndex::load_from_files(Path::new("data"))?;
//!
//! // Query data
//! let user = index.users().get_user_from_email("AbFow2483@charter.net").unwrap();
//! let movie = index.movies().get_movie_from_id("ID00001").unwrap();
//! let dramas = index.movies().get_movies_with_genre("Drama");
//!
//! println!("{} has watched {} movies", user.full_name, user.watch_history.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod multimap;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{
    AttributeMatch, DataIndex, IndexStats, MatchKind, MovieDatabase, UserDatabase, MOVIES_FILE,
    USERS_FILE,
};
pub use multimap::OrderedMultimap;
pub use types::{
    // Type aliases
    Email,
    MovieId,
    // Core types
    Movie,
    RecordId,
    RecordStore,
    User,
};
