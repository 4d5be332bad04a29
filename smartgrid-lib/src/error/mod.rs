//! Error types

mod column;
mod edit;
mod export;
mod fetch;
mod preferences;

pub use column::*;
pub use edit::*;
pub use export::*;
pub use fetch::*;
pub use preferences::*;
