//! Make the border-connected background of PNG images transparent
//!
//! [`remove_background`] is the core operation; [`batch::run`] drives it over
//! a directory of files.

pub mod background;
pub mod batch;
pub mod config;
pub mod error;
pub mod files;

pub use background::{remove_background, remove_background_in_place, FillStats};
pub use error::RemovalError;
