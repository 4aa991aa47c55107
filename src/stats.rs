//! Rating aggregation: average, median, best and worst movies.

use crate::movie::Movie;

/// Aggregated view over a non-empty catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingStats {
    /// Mean rating, rounded to one decimal.
    pub average: f64,
    /// Middle rating of the sorted ratings (mean of the two middle
    /// elements for an even count), rounded to one decimal.
    pub median: f64,
    /// Records tying the maximum rating, in first-seen order.
    pub best: Vec<Movie>,
    /// Records tying the minimum rating, in first-seen order.
    pub worst: Vec<Movie>,
}

/// Computes the full aggregate; `None` for an empty catalog.
pub fn compute(movies: &[Movie]) -> Option<RatingStats> {
    if movies.is_empty() {
        return None;
    }

    let ratings: Vec<f64> = movies.iter().map(|movie| movie.rating).collect();
    let average = round_one_decimal(ratings.iter().sum::<f64>() / ratings.len() as f64);

    let mut sorted_ratings = ratings.clone();
    sorted_ratings.sort_by(f64::total_cmp);
    let count = sorted_ratings.len();
    let median = if count % 2 != 0 {
        round_one_decimal(sorted_ratings[count / 2])
    } else {
        round_one_decimal((sorted_ratings[count / 2 - 1] + sorted_ratings[count / 2]) / 2.0)
    };

    Some(RatingStats {
        average,
        median,
        best: extremes(movies, |candidate, current| candidate > current),
        worst: extremes(movies, |candidate, current| candidate < current),
    })
}

/// Collects every record tying the running extremum, seeded from the
/// first record so an all-negative catalog still reports a result.
fn extremes(movies: &[Movie], beats: impl Fn(f64, f64) -> bool) -> Vec<Movie> {
    let mut extreme_rating = movies[0].rating;
    let mut tied: Vec<Movie> = Vec::new();
    for movie in movies {
        if beats(movie.rating, extreme_rating) {
            extreme_rating = movie.rating;
            tied.clear();
            tied.push(movie.clone());
        } else if movie.rating == extreme_rating {
            tied.push(movie.clone());
        }
    }
    tied
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
