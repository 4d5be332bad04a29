//! Data model types

mod capability;
mod column;
mod row;
mod value;
mod value_serde;

pub use capability::*;
pub use column::*;
pub use row::*;
pub use value::*;
