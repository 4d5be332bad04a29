//! Cell presentation and inline editing.

mod edit;
mod render;

pub use edit::*;
pub use render::*;
