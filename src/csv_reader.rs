use anyhow::{Context, Result};
use std::io::{self, Read};

/// Raw CSV content: header row plus string records.
#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read CSV from any reader. The first record is the header row.
pub fn read_csv<R: Read>(reader: R) -> Result<CsvData> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", idx + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(CsvData { headers, rows })
}

pub fn read_csv_from_stdin() -> Result<CsvData> {
    read_csv(io::stdin().lock())
}

pub fn read_csv_from_str(content: &str) -> Result<CsvData> {
    read_csv(content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_basic() {
        let csv = read_csv_from_str("x,y\n1,10\n2,20\n").unwrap();
        assert_eq!(csv.headers, vec!["x", "y"]);
        assert_eq!(csv.rows, vec![vec!["1", "10"], vec!["2", "20"]]);
    }

    #[test]
    fn test_read_csv_trims_whitespace() {
        let csv = read_csv_from_str("x , y\n 1 , 10\n").unwrap();
        assert_eq!(csv.headers, vec!["x", "y"]);
        assert_eq!(csv.rows[0], vec!["1", "10"]);
    }

    #[test]
    fn test_read_csv_header_only() {
        let csv = read_csv_from_str("x,y\n").unwrap();
        assert!(csv.rows.is_empty());
    }

    #[test]
    fn test_read_csv_ragged_record() {
        let result = read_csv_from_str("x,y\n1,10\n2\n");
        assert!(result.is_err());
    }
}
