//! # Recommender Crate
//!
//! Ranks movies for a user by how much they have in common with the
//! user's watch history.
//!
//! ## Components
//!
//! - **engine**: `Recommender`, which scores candidates through the
//!   director, actor and genre indices of the movie database
//! - **ranking**: the total order used to rank scored candidates
//! - **types**: `MovieAndRank`, `ScoreWeights` and explanation types
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use recommender::Recommender;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let data_index = Arc::new(DataIndex::load_from_files(Path::new("data"))?);
//! let recommender = Recommender::new(data_index.clone());
//!
//! for rec in recommender.recommend_movies("AbFow2483@charter.net", 10) {
//!     println!("{} ({})", rec.movie_id, rec.compatibility_score);
//! }
//! ```

// Public modules
pub mod types;
pub mod engine;
mod ranking;

// Re-export commonly used types
pub use engine::Recommender;
pub use types::{ExplainedRecommendation, MovieAndRank, ScoreBreakdown, ScoreWeights};

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::DataIndex;
    use std::sync::Arc;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_recommender_is_shareable() {
        assert_send_sync::<Recommender>();
    }

    #[test]
    fn test_empty_index() {
        let recommender = Recommender::new(Arc::new(DataIndex::default()));
        assert!(recommender.recommend_movies("anyone@example.com", 10).is_empty());
        assert_eq!(recommender.weights(), ScoreWeights::default());
    }

    #[test]
    fn test_with_weights_replaces_all() {
        let weights = ScoreWeights {
            director: 2,
            actor: 3,
            genre: 4,
        };
        let recommender = Recommender::new(Arc::new(DataIndex::default())).with_weights(weights);
        assert_eq!(recommender.weights(), weights);
    }
}
