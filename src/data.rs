use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::collections::HashSet;

/// In-memory table of string cells, addressed by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, rejecting rows whose width differs from the header row.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                bail!(
                    "Row {} has {} fields but the header has {}",
                    idx + 1,
                    row.len(),
                    headers.len()
                );
            }
        }
        Ok(Self { headers, rows })
    }

    /// Create a Table from parsed CSV data
    pub fn from_csv(csv: crate::csv_reader::CsvData) -> Result<Self> {
        Self::new(csv.headers, csv.rows)
    }

    /// Create a Table from a JSON Array of Objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        let Some(first) = array.first() else {
            return Ok(Self { headers: Vec::new(), rows: Vec::new() });
        };

        let first_obj = first
            .as_object()
            .ok_or_else(|| anyhow!("Items in array must be objects"))?;
        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let cell = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => String::new(),
                    _ => bail!("Unsupported value type for field '{}'", header),
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a column name to its index. Exact matches win over
    /// case-insensitive ones.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .or_else(|| self.headers.iter().position(|h| h.eq_ignore_ascii_case(name)))
            .ok_or_else(|| anyhow!("Column '{}' not found", name))
    }

    /// Cell values of a column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Parse every cell of a column as a number.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| parse_number(&row[idx], name, row_idx))
            .collect()
    }

    /// Distinct values of a column in natural order.
    pub fn distinct_values(&self, name: &str) -> Result<Vec<String>> {
        let values = self.column(name)?;
        Ok(distinct_natural(values))
    }
}

pub(crate) fn parse_number(cell: &str, column: &str, row_idx: usize) -> Result<f64> {
    cell.trim().parse::<f64>().with_context(|| {
        format!(
            "Failed to parse '{}' as number in column '{}' at row {}",
            cell,
            column,
            row_idx + 1
        )
    })
}

/// Deduplicate and sort values: numerically when every value is a number,
/// lexicographically otherwise.
pub fn distinct_natural<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = values
        .into_iter()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect();
    sort_natural(&mut unique);
    unique
}

pub fn sort_natural(values: &mut [String]) {
    let all_numeric = values.iter().all(|s| s.trim().parse::<f64>().is_ok());
    if all_numeric {
        // NaN sorts after every number
        values.sort_by(|a, b| {
            let fa = a.trim().parse::<f64>().unwrap_or(f64::NAN);
            let fb = b.trim().parse::<f64>().unwrap_or(f64::NAN);
            fa.total_cmp(&fb).then_with(|| a.cmp(b))
        });
    } else {
        values.sort();
    }
}
