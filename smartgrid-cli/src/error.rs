use std::path::PathBuf;

use smartgrid_lib::error::ColumnError;
use smartgrid_lib::error::ExportError;
use smartgrid_lib::error::PreferencesError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode preferences: {0}")]
    Encode(serde_json::Error),

    #[error("Invalid filter '{0}', expected column:operator:value")]
    Filter(String),

    #[error(transparent)]
    Column(#[from] ColumnError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Preferences(#[from] PreferencesError),

    #[error("Failed to initialize logger: {0}")]
    Logger(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_error_names_no_input_file() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let message = CliError::Encode(source).to_string();
        assert!(message.starts_with("Failed to encode preferences"));
        assert!(!message.contains(".json"));
    }
}
