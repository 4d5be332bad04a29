//! Column width allocation.

mod width;

pub use width::*;
