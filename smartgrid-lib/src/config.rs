//! Per-grid configuration

use serde::Deserialize;
use serde::Serialize;

use crate::export::DEFAULT_SHEET_NAME;
use crate::layout::WidthConfig;
use crate::selection::SelectionMode;

/// Settings for one [`SmartGrid`](crate::grid::SmartGrid) instance.
///
/// # Example
///
/// ```
/// use smartgrid_lib::config::GridConfig;
/// use smartgrid_lib::selection::SelectionMode;
///
/// let config = GridConfig::new("dispatch.trips")
///     .with_page_size(50)
///     .with_selection_mode(SelectionMode::Multi)
///     .with_server_side_search(true);
/// assert_eq!(config.preferences_key, "dispatch.trips");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Key the grid's preferences are stored under. Must be unique per
    /// grid instance.
    ///
    /// Default: `"default"`
    pub preferences_key: String,

    /// When `true` the global search is not applied to local rows; the host
    /// is expected to search upstream. Remote sources always receive the
    /// search text.
    ///
    /// Default: `false`
    pub server_side_search: bool,

    /// Rows per page unless the user picked another size.
    ///
    /// Default: 25
    pub page_size: usize,

    pub selection_mode: SelectionMode,

    pub widths: WidthConfig,

    /// File name, without extension, for exports.
    ///
    /// Default: `"export"`
    pub export_file_stem: String,

    /// Worksheet name for spreadsheet exports.
    pub sheet_name: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            preferences_key: "default".to_string(),
            server_side_search: false,
            page_size: 25,
            selection_mode: SelectionMode::None,
            widths: WidthConfig::default(),
            export_file_stem: "export".to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

impl GridConfig {
    /// Creates a config with default values and the given preferences key.
    pub fn new(preferences_key: impl Into<String>) -> Self {
        Self {
            preferences_key: preferences_key.into(),
            ..Self::default()
        }
    }

    /// Sets server-side search.
    pub fn with_server_side_search(mut self, enabled: bool) -> Self {
        self.server_side_search = enabled;
        self
    }

    /// Sets the default page size. Zero is ignored.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }

    /// Sets the selection mode.
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Sets the width allocator configuration.
    pub fn with_widths(mut self, widths: WidthConfig) -> Self {
        self.widths = widths;
        self
    }

    /// Sets the export file stem.
    pub fn with_export_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.export_file_stem = stem.into();
        self
    }

    /// Sets the spreadsheet worksheet name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GridConfig =
            serde_json::from_str(r#"{"preferencesKey":"yard","selectionMode":"multi"}"#).unwrap();
        assert_eq!(config.preferences_key, "yard");
        assert_eq!(config.selection_mode, SelectionMode::Multi);
        assert_eq!(config.page_size, 25);
        assert_eq!(config.widths, WidthConfig::default());
    }

    #[test]
    fn test_zero_page_size_ignored() {
        assert_eq!(GridConfig::default().with_page_size(0).page_size, 25);
    }
}
