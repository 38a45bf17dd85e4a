//! Error types for fuplot operations.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or rendering a plot.
#[derive(Error, Debug)]
pub enum Error {
    /// An aesthetic was mapped to a column that does not exist in the data.
    #[error("tried to map \"{channel}\" aesthetic to inexistent column \"{column}\"")]
    InvalidMapping {
        /// Aesthetic channel name (x, y, size, ...).
        channel: String,
        /// The missing column name.
        column: String,
    },

    /// A geom is missing an aesthetic it cannot render without.
    #[error("{geom} requires the \"{field}\" aesthetic (use aes() or a layer mapping)")]
    RequiredFieldMissing {
        /// Geom name (geom_line, geom_point, geom_col).
        geom: &'static str,
        /// The missing channel.
        field: &'static str,
    },

    /// Two tools in the same composition scope were given the same name.
    #[error("duplicate node name \"{0}\" in composition")]
    DuplicateNode(String),

    /// A mapped column contained a value that does not parse as a number.
    #[error("column \"{column}\" contains non-numeric value \"{value}\"")]
    NonNumeric {
        /// Column name.
        column: String,
        /// Offending cell content.
        value: String,
    },

    /// A data row has a different number of cells than the header.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Cells found in the row.
        found: usize,
        /// Header width.
        expected: usize,
    },

    /// Empty data provided where at least one row is required.
    #[error("data must contain at least one row")]
    EmptyData,

    /// Malformed JSON input for tabular data.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_mapping_display() {
        let err = Error::InvalidMapping {
            channel: "y".to_string(),
            column: "missing".to_string(),
        };
        assert!(err.to_string().contains("\"y\""));
        assert!(err.to_string().contains("\"missing\""));
    }

    #[test]
    fn test_required_field_display() {
        let err = Error::RequiredFieldMissing {
            geom: "geom_line",
            field: "x",
        };
        assert!(err.to_string().contains("geom_line"));
        assert!(err.to_string().contains("\"x\""));
    }
}
