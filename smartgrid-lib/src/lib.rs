//! Headless data grid engine
//!
//! Column definitions, a search/filter/sort pipeline, per-grid persisted
//! preferences, width allocation, cell rendering and inline editing, and
//! CSV/XLSX export. Hosts draw the result with whatever toolkit they use.

pub mod cell;
pub mod columns;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod layout;
pub mod model;
pub mod paths;
pub mod pipeline;
pub mod preferences;
pub mod selection;
pub mod source;

pub use config::GridConfig;
pub use grid::SmartGrid;
