//! Background removal
//!
//! Makes the uniform background of an image transparent by flood filling
//! from the border with a per-channel color tolerance.

pub mod color;
pub mod remover;
mod visited;

pub use remover::{remove_background, remove_background_in_place, FillStats};
