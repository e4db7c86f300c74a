use anyhow::{anyhow, Result};
use log::{debug, warn};
use plotters::style::RGBColor;
use std::collections::HashMap;

use crate::data::{parse_number, sort_natural, Table};
use crate::palette::CategoryColors;

/// Column names a category plot reads, validated against a table up front.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumns {
    pub x: usize,
    pub y: usize,
    pub category: usize,
    pub group: usize,
    x_name: String,
    y_name: String,
}

impl ResolvedColumns {
    pub fn resolve(table: &Table, x_col: &str, y_col: &str, cat_col: &str, grp_col: &str) -> Result<Self> {
        Ok(Self {
            x: table.column_index(x_col)?,
            y: table.column_index(y_col)?,
            category: table.column_index(cat_col)?,
            group: table.column_index(grp_col)?,
            x_name: x_col.to_string(),
            y_name: y_col.to_string(),
        })
    }
}

/// One rendered line: all rows of a single group.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLine {
    pub group: String,
    pub category: String,
    pub color: RGBColor,
    pub points: Vec<(f64, f64)>,
}

/// Build one line per distinct group value, groups in natural order.
///
/// Points keep the row order of the table. The category is read from the
/// group's first row; groups spanning several categories are logged and
/// otherwise rendered with that first category.
pub fn build_series(table: &Table, columns: &ResolvedColumns, colors: &CategoryColors) -> Result<Vec<SeriesLine>> {
    let mut grouped: HashMap<&str, Vec<usize>> = HashMap::new();
    for (row_idx, row) in table.rows().iter().enumerate() {
        grouped.entry(row[columns.group].as_str()).or_default().push(row_idx);
    }

    let mut keys: Vec<String> = grouped.keys().map(|k| k.to_string()).collect();
    sort_natural(&mut keys);

    let rows = table.rows();
    let mut lines = Vec::with_capacity(keys.len());
    for key in keys {
        let members = &grouped[key.as_str()];
        let category = rows[members[0]][columns.category].clone();

        if members.iter().any(|&i| rows[i][columns.category] != category) {
            warn!(
                "Group '{}' spans more than one category; using '{}' from its first row",
                key, category
            );
        }

        let color = colors.get(&category).ok_or_else(|| {
            anyhow!("No color assigned to category '{}' of group '{}'", category, key)
        })?;

        let points = members
            .iter()
            .map(|&i| -> Result<(f64, f64)> {
                let row = &rows[i];
                Ok((
                    parse_number(&row[columns.x], &columns.x_name, i)?,
                    parse_number(&row[columns.y], &columns.y_name, i)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        lines.push(SeriesLine {
            group: key,
            category,
            color,
            points,
        });
    }

    debug!("Built {} series lines from {} rows", lines.len(), table.len());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::category_colordict;

    fn make_table(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> Table {
        Table::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    fn sample() -> Table {
        make_table(
            vec!["grp", "cat", "x", "y"],
            vec![
                vec!["2", "B", "0", "0.6"],
                vec!["1", "A", "0", "0.2"],
                vec!["2", "B", "1", "0.8"],
                vec!["1", "A", "1", "0.4"],
                vec!["10", "A", "0", "0.5"],
            ],
        )
    }

    fn columns(table: &Table) -> ResolvedColumns {
        ResolvedColumns::resolve(table, "x", "y", "cat", "grp").unwrap()
    }

    #[test]
    fn test_one_line_per_group() {
        let table = sample();
        let colors = category_colordict("Vega10", &["A", "B"]).unwrap();
        let lines = build_series(&table, &columns(&table), &colors).unwrap();

        let groups: Vec<&str> = lines.iter().map(|l| l.group.as_str()).collect();
        assert_eq!(groups, vec!["1", "2", "10"]);
        assert_eq!(lines[0].points, vec![(0.0, 0.2), (1.0, 0.4)]);
        assert_eq!(lines[1].points, vec![(0.0, 0.6), (1.0, 0.8)]);
        assert_eq!(lines[0].color, colors.get("A").unwrap());
        assert_eq!(lines[1].color, colors.get("B").unwrap());
        assert_eq!(lines[2].color, lines[0].color);
    }

    #[test]
    fn test_nan_group_ids() {
        let rows: Vec<Vec<String>> = (0..40)
            .map(|i| {
                let grp = if i % 3 == 0 { "NaN".to_string() } else { (i % 7).to_string() };
                vec![grp, "A".to_string(), i.to_string(), "0.5".to_string()]
            })
            .collect();
        let table = Table::new(
            vec!["grp", "cat", "x", "y"].into_iter().map(String::from).collect(),
            rows,
        )
        .unwrap();
        let colors = category_colordict("Vega10", &["A"]).unwrap();
        let lines = build_series(&table, &columns(&table), &colors).unwrap();

        let groups: Vec<&str> = lines.iter().map(|l| l.group.as_str()).collect();
        assert_eq!(groups, vec!["0", "1", "2", "3", "4", "5", "6", "NaN"]);
        assert_eq!(lines.last().unwrap().points.len(), 14);
    }

    #[test]
    fn test_points_keep_row_order() {
        let table = make_table(
            vec!["grp", "cat", "x", "y"],
            vec![vec!["1", "A", "3", "0.1"], vec!["1", "A", "1", "0.2"]],
        );
        let colors = category_colordict("Vega10", &["A"]).unwrap();
        let lines = build_series(&table, &columns(&table), &colors).unwrap();
        assert_eq!(lines[0].points, vec![(3.0, 0.1), (1.0, 0.2)]);
    }

    #[test]
    fn test_mixed_group_uses_first_category() {
        let table = make_table(
            vec!["grp", "cat", "x", "y"],
            vec![vec!["1", "B", "0", "0.1"], vec!["1", "A", "1", "0.2"]],
        );
        let colors = category_colordict("Vega10", &["A", "B"]).unwrap();
        let lines = build_series(&table, &columns(&table), &colors).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].category, "B");
        assert_eq!(lines[0].color, colors.get("B").unwrap());
    }

    #[test]
    fn test_missing_color_is_error() {
        let table = sample();
        let colors = category_colordict("Vega10", &["A"]).unwrap();
        let err = build_series(&table, &columns(&table), &colors).unwrap_err();
        assert!(err.to_string().contains("No color assigned to category 'B'"));
    }

    #[test]
    fn test_non_numeric_y() {
        let table = make_table(
            vec!["grp", "cat", "x", "y"],
            vec![vec!["1", "A", "0", "high"]],
        );
        let colors = category_colordict("Vega10", &["A"]).unwrap();
        let err = build_series(&table, &columns(&table), &colors).unwrap_err();
        assert!(err.to_string().contains("column 'y'"));
    }

    #[test]
    fn test_zero_rows() {
        let table = make_table(vec!["grp", "cat", "x", "y"], vec![]);
        let colors = CategoryColors::default();
        let lines = build_series(&table, &columns(&table), &colors).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_resolve_missing_column() {
        let table = sample();
        let err = ResolvedColumns::resolve(&table, "x", "y", "cat", "model_group_id").unwrap_err();
        assert!(err.to_string().contains("model_group_id"));
    }
}
