use crate::error::RemovalError;
use image::RgbaImage;
use serde::Serialize;
use std::collections::VecDeque;

use super::color::Rgb;
use super::visited::VisitedSet;

/// Counters from a single flood fill
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FillStats {
    /// Coordinates dequeued for the first time
    pub visited: usize,
    /// Pixels whose alpha was set to 0
    pub removed: usize,
    /// Largest frontier length reached, duplicates included
    pub peak_frontier: usize,
}

/// Make the border-connected background of `image` transparent.
///
/// The background color is taken from pixel (0,0). Every pixel reachable from
/// the border through 4-connected pixels within `tolerance` of that color (per
/// channel) gets alpha 0; color channels are never touched. If (0,0) is not
/// actually background the result will be wrong, so callers should only feed
/// images that have a background margin.
pub fn remove_background(mut image: RgbaImage, tolerance: u8) -> Result<RgbaImage, RemovalError> {
    remove_background_in_place(&mut image, tolerance)?;
    Ok(image)
}

/// Same as [`remove_background`], mutating the buffer and returning fill counters
pub fn remove_background_in_place(
    image: &mut RgbaImage,
    tolerance: u8,
) -> Result<FillStats, RemovalError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(RemovalError::InvalidInput { width, height });
    }

    let background = Rgb::of(image.get_pixel(0, 0));
    let mut visited = VisitedSet::new(width, height);
    let mut frontier = VecDeque::with_capacity((width as usize + height as usize) * 2);
    let mut stats = FillStats::default();

    // Corners land in the queue twice; the visited check drops the repeat
    for x in 0..width {
        frontier.push_back((x, 0));
        frontier.push_back((x, height - 1));
    }
    for y in 0..height {
        frontier.push_back((0, y));
        frontier.push_back((width - 1, y));
    }
    stats.peak_frontier = frontier.len();

    while let Some((x, y)) = frontier.pop_front() {
        if !visited.insert(x, y) {
            continue;
        }
        stats.visited += 1;

        let pixel = image.get_pixel_mut(x, y);
        if !Rgb::of(pixel).is_similar(&background, tolerance) {
            continue;
        }
        pixel[3] = 0;
        stats.removed += 1;

        if x > 0 {
            frontier.push_back((x - 1, y));
        }
        if x + 1 < width {
            frontier.push_back((x + 1, y));
        }
        if y > 0 {
            frontier.push_back((x, y - 1));
        }
        if y + 1 < height {
            frontier.push_back((x, y + 1));
        }
        stats.peak_frontier = stats.peak_frontier.max(frontier.len());
    }

    tracing::trace!(
        "Flood fill on {}x{}: visited {}, removed {}, peak frontier {}",
        width,
        height,
        stats.visited,
        stats.removed,
        stats.peak_frontier
    );

    Ok(stats)
}
