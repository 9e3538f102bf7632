//! Simulation core for a continuously moving serpent: a chain of fixed-size
//! segments that follows the head through a log of recorded turns, bending
//! around corners instead of snapping to a grid.

#[macro_use] extern crate derive_more;

pub use error::{Error, ErrorConversion, Result};
pub use serpent::{Builder, Serpent};

pub mod app;
pub mod basic;
mod error;
pub mod serpent;
