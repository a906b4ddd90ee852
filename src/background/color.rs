use image::Rgba;

/// RGB reference color, alpha excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Take the color channels of a pixel, ignoring its alpha
    #[inline]
    pub fn of(pixel: &Rgba<u8>) -> Self {
        let [r, g, b, _] = pixel.0;
        Self([r, g, b])
    }

    /// Largest per-channel absolute difference (L∞ distance)
    #[inline]
    pub fn distance(&self, other: &Rgb) -> u8 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.abs_diff(*b))
            .max()
            .unwrap_or(0)
    }

    /// Every channel differs by at most `tolerance`
    #[inline]
    pub fn is_similar(&self, other: &Rgb, tolerance: u8) -> bool {
        self.distance(other) <= tolerance
    }
}
