use anyhow::{Context, Result};
use std::io::{self, Read};

/// Raw CSV contents: header row plus data rows, all cells kept as strings.
#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read CSV data from stdin.
pub fn read_csv_from_stdin() -> Result<CsvData> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    read_csv_from_str(&input)
}

/// Read CSV data from a string.
pub fn read_csv_from_str(input: &str) -> Result<CsvData> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to read CSV record")?;
        rows.push(record.iter().map(String::from).collect());
    }

    if rows.is_empty() {
        anyhow::bail!("CSV must contain at least one data row");
    }

    Ok(CsvData { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_simple_csv() {
        let data = read_csv_from_str("x,y\n1,10\n2,20\n").unwrap();
        assert_eq!(data.headers, vec!["x", "y"]);
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[0], vec!["1", "10"]);
    }

    #[test]
    fn test_read_csv_trims_whitespace() {
        let data = read_csv_from_str("x, y\n 1 , 10\n").unwrap();
        assert_eq!(data.headers, vec!["x", "y"]);
        assert_eq!(data.rows[0], vec!["1", "10"]);
    }

    #[test]
    fn test_read_empty_csv_fails() {
        let result = read_csv_from_str("x,y\n");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least one data row"));
    }
}
