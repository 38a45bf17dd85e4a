use crate::error::{Error, Result};
use serde_json::Value;

/// Tabular plot data: named columns of equal-length cell sequences.
/// Cells are kept as strings; numeric columns parse on demand.
#[derive(Debug, Clone)]
pub struct PlotData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PlotData {
    /// Build from a header row and data rows, validating rectangularity.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::EmptyData);
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(Error::RaggedRow {
                    row: i,
                    found: row.len(),
                    expected: headers.len(),
                });
            }
        }
        Ok(Self { headers, rows })
    }

    /// Create PlotData from an existing CsvData struct (for CLI support).
    pub fn from_csv(csv: crate::csv_reader::CsvData) -> Result<Self> {
        Self::new(csv.headers, csv.rows)
    }

    /// Create PlotData from a JSON array of objects.
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| Error::InvalidData("input must be a JSON array of objects".into()))?;

        if array.is_empty() {
            return Err(Error::EmptyData);
        }

        // Headers come from the first object's keys
        let first_obj = array[0]
            .as_object()
            .ok_or_else(|| Error::InvalidData("items in array must be objects".into()))?;

        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::new();
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| Error::InvalidData("items in array must be objects".into()))?;

            let mut row = Vec::new();
            for header in &headers {
                let cell = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => String::new(),
                    _ => {
                        return Err(Error::InvalidData(format!(
                            "unsupported value type for field '{header}'"
                        )))
                    }
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Self::new(headers, rows)
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Raw cells of a column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.headers.iter().position(|h| h == name)?;
        Some(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// A column parsed as f64 values.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let cells = self
            .column(name)
            .ok_or_else(|| Error::InvalidData(format!("unknown column '{name}'")))?;

        cells
            .into_iter()
            .map(|cell| {
                cell.parse::<f64>().map_err(|_| Error::NonNumeric {
                    column: name.to_string(),
                    value: cell.to_string(),
                })
            })
            .collect()
    }
}
