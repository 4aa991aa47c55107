//! Rating histogram rendered to a PNG image.
//!
//! Ratings are rounded to the nearest whole number and bucketed 0..=10;
//! the buckets become a bar chart drawn into an RGB buffer and saved at
//! the path the user supplies.

use std::path::Path;

use image::{Rgb, RgbImage};
use log::info;

use crate::config::HistogramConfig;
use crate::error::CatalogError;
use crate::movie::Movie;

pub const BUCKET_COUNT: usize = 11;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const BAR_COLOR: Rgb<u8> = Rgb([70, 130, 180]);
const AXIS_COLOR: Rgb<u8> = Rgb([40, 40, 40]);

const MARGIN_LEFT: u32 = 40;
const MARGIN_RIGHT: u32 = 10;
const MARGIN_TOP: u32 = 10;
const MARGIN_BOTTOM: u32 = 30;
const BAR_GAP: u32 = 2;

/// Counts per whole-number rating, index 0 through 10.
pub fn rating_buckets(movies: &[Movie]) -> [u32; BUCKET_COUNT] {
    let mut buckets = [0u32; BUCKET_COUNT];
    for movie in movies {
        let bucket = movie.rating.round().clamp(0.0, 10.0) as usize;
        buckets[bucket] += 1;
    }
    buckets
}

/// Draws the bar chart. Dimensions come pre-clamped from the sanitized
/// configuration.
pub fn render(movies: &[Movie], config: HistogramConfig) -> RgbImage {
    let width = config.width;
    let height = config.height;
    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

    let plot_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = height - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = height - MARGIN_BOTTOM;
    let slot_width = plot_width / BUCKET_COUNT as u32;

    let buckets = rating_buckets(movies);
    let max_count = buckets.iter().copied().max().unwrap_or(0);

    if max_count > 0 {
        for (bucket, &count) in buckets.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let bar_height = plot_height * count / max_count;
            let x_start = MARGIN_LEFT + bucket as u32 * slot_width + BAR_GAP;
            let x_end = MARGIN_LEFT + (bucket as u32 + 1) * slot_width - BAR_GAP;
            for x in x_start..x_end {
                for y in (baseline - bar_height)..baseline {
                    canvas.put_pixel(x, y, BAR_COLOR);
                }
            }
        }
    }

    for x in MARGIN_LEFT..(MARGIN_LEFT + plot_width) {
        canvas.put_pixel(x, baseline, AXIS_COLOR);
    }
    for y in MARGIN_TOP..=baseline {
        canvas.put_pixel(MARGIN_LEFT, y, AXIS_COLOR);
    }

    canvas
}

/// Renders and saves the chart; the format follows the `.png` extension.
pub fn export(
    path: &Path,
    movies: &[Movie],
    config: HistogramConfig,
) -> Result<(), CatalogError> {
    let canvas = render(movies, config);
    canvas.save(path).map_err(|err| {
        CatalogError::Storage(format!(
            "cannot write histogram {}: {}",
            path.display(),
            err
        ))
    })?;
    info!("Histogram written to {}", path.display());
    Ok(())
}
