//! Filesystem collaborators of the batch driver
//!
//! Finding input PNGs, reading and writing pixel buffers, and naming outputs.

pub mod codec;
pub mod discovery;
pub mod naming;
