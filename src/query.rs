//! Pure lookup, search, filter, and sort operations over the catalog.
//!
//! Everything here borrows an immutable slice and never mutates the
//! store; update and delete address records through the index returned
//! by [`find_title`].

use crate::fuzzy;
use crate::movie::Movie;

/// Minimum token-set score (exclusive) for a title to be suggested.
pub const SUGGESTION_THRESHOLD: u32 = 50;

/// Case-insensitive exact title match; first matching index.
pub fn find_title(movies: &[Movie], query: &str) -> Option<usize> {
    let needle = query.to_lowercase();
    movies
        .iter()
        .position(|movie| movie.title.to_lowercase() == needle)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The query matched a title exactly (ignoring case).
    Exact { title: String, rating: f64 },
    /// No exact hit; these titles scored above the suggestion threshold,
    /// in collection order.
    Suggestions(Vec<String>),
    /// No exact hit and nothing scored above the threshold.
    NotFound,
}

/// Exact lookup first, then a full token-set scan for suggestions.
pub fn search(movies: &[Movie], query: &str) -> SearchOutcome {
    if let Some(index) = find_title(movies, query) {
        let hit = &movies[index];
        return SearchOutcome::Exact {
            title: hit.title.clone(),
            rating: hit.rating,
        };
    }

    let suggestions: Vec<String> = movies
        .iter()
        .filter(|movie| fuzzy::token_set_ratio(&movie.title, query) > SUGGESTION_THRESHOLD)
        .map(|movie| movie.title.clone())
        .collect();

    if suggestions.is_empty() {
        SearchOutcome::NotFound
    } else {
        SearchOutcome::Suggestions(suggestions)
    }
}

/// Bounds for [`filter_movies`]; `None` disables the bound.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterCriteria {
    pub min_rating: Option<f64>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

/// Lazy, order-preserving view of the records passing `criteria`.
/// Records with a zero year never pass. Each call re-scans the slice;
/// there is no shared cursor state.
pub fn filter_movies(
    movies: &[Movie],
    criteria: FilterCriteria,
) -> impl Iterator<Item = &Movie> + '_ {
    movies.iter().filter(move |movie| {
        criteria
            .min_rating
            .is_none_or(|min_rating| movie.rating >= min_rating)
            && criteria
                .start_year
                .is_none_or(|start_year| movie.year >= start_year)
            && criteria.end_year.is_none_or(|end_year| movie.year <= end_year)
            && movie.year != 0
    })
}

/// Stable sort by rating, highest first.
pub fn sorted_by_rating_desc(movies: &[Movie]) -> Vec<Movie> {
    let mut sorted = movies.to_vec();
    sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    sorted
}

/// Stable sort by release year, direction chosen by the caller.
pub fn sorted_by_year(movies: &[Movie], newest_first: bool) -> Vec<Movie> {
    let mut sorted = movies.to_vec();
    sorted.sort_by(|a, b| {
        if newest_first {
            b.year.cmp(&a.year)
        } else {
            a.year.cmp(&b.year)
        }
    });
    sorted
}
