//! Ordering and truncation of scored candidates.

use crate::types::ScoreBreakdown;
use data_loader::{Movie, MovieDatabase, RecordId};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A scored candidate, borrowed from the movie database
#[derive(Debug, Clone, Copy)]
pub(crate) struct RankedCandidate<'a> {
    pub handle: RecordId,
    pub movie: &'a Movie,
    pub breakdown: ScoreBreakdown,
    pub score: u32,
}

/// Score descending, then rating descending, then title ascending.
///
/// Movie id and load position break any remaining tie, so the order is
/// total even when two movies share score, rating and title.
pub(crate) fn compare_candidates(a: &RankedCandidate<'_>, b: &RankedCandidate<'_>) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.movie.rating.total_cmp(&a.movie.rating))
        .then_with(|| a.movie.title.cmp(&b.movie.title))
        .then_with(|| a.movie.id.cmp(&b.movie.id))
        .then_with(|| a.handle.cmp(&b.handle))
}

/// Sort scored candidates and keep at most `limit` of them.
///
/// Fewer than `limit` candidates is not an error; all of them are returned.
pub(crate) fn rank_and_select(
    movies: &MovieDatabase,
    scores: HashMap<RecordId, ScoreBreakdown>,
    limit: usize,
) -> Vec<RankedCandidate<'_>> {
    let mut ranked: Vec<RankedCandidate<'_>> = scores
        .into_iter()
        .filter_map(|(handle, breakdown)| {
            let movie = movies.movie(handle)?;
            Some(RankedCandidate {
                handle,
                movie,
                breakdown,
                score: breakdown.total(),
            })
        })
        .collect();

    ranked.sort_unstable_by(compare_candidates);
    ranked.truncate(limit);
    ranked
}
