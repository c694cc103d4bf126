//! Result and configuration types for the recommendation engine.

use data_loader::MovieId;
use serde::{Deserialize, Serialize};

/// One recommended movie and its compatibility score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieAndRank {
    pub movie_id: MovieId,
    pub compatibility_score: u32,
}

impl MovieAndRank {
    pub fn new(movie_id: impl Into<MovieId>, compatibility_score: u32) -> Self {
        Self {
            movie_id: movie_id.into(),
            compatibility_score,
        }
    }
}

/// Points awarded per shared attribute occurrence.
///
/// The defaults weigh a shared actor highest and a shared genre lowest:
/// director 20, actor 30, genre 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub director: u32,
    pub actor: u32,
    pub genre: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            director: 20,
            actor: 30,
            genre: 1,
        }
    }
}

/// Points a candidate collected, split by the kind of attribute shared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub director: u32,
    pub actor: u32,
    pub genre: u32,
}

impl ScoreBreakdown {
    /// Compatibility score: the sum of all categories
    pub fn total(&self) -> u32 {
        self.director
            .saturating_add(self.actor)
            .saturating_add(self.genre)
    }
}

/// A recommendation with the details needed to explain it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainedRecommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub rating: f32,
    pub compatibility_score: u32,
    pub breakdown: ScoreBreakdown,
}
