use std::collections::HashSet;

use crate::config::PipelineConfig;
use crate::error::CleanError;
use crate::models::{ColumnKind, ColumnSpec, Table, Value};

/// Ordered category names from one compound value: the text before the first
/// value delimiter of each pair, e.g. `related-1;request-0` -> `[related, request]`.
pub fn category_names(compound: &str, cfg: &PipelineConfig) -> Vec<String> {
    compound
        .split(cfg.pair_delimiter)
        .map(|pair| {
            pair.split(cfg.value_delimiter)
                .next()
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

/// Indicator value of one `name-value` fragment: its final character as a digit.
fn indicator(fragment: &str) -> Option<i64> {
    fragment
        .chars()
        .next_back()
        .and_then(|c| c.to_digit(10))
        .map(i64::from)
}

fn compound_text(value: &Value, row: usize) -> Result<&str, CleanError> {
    match value {
        Value::Text(s) => Ok(s),
        Value::Null => Err(CleanError::NullCategories { row }),
        Value::Integer(_) | Value::Real(_) => Err(CleanError::NotText { row }),
    }
}

/// Replace the compound category column with one integer column per category.
///
/// Names come from the first row and are applied to every row by position;
/// rows listing categories in another order end up mislabeled. Values are the
/// trailing digit of each fragment, kept as-is (not clamped to 0/1).
pub fn split_categories(table: Table, cfg: &PipelineConfig) -> Result<Table, CleanError> {
    let cat_idx = table
        .column_index(&cfg.categories_column)
        .ok_or_else(|| CleanError::MissingColumn(cfg.categories_column.clone()))?;
    let first = table.rows().first().ok_or(CleanError::EmptyTable)?;
    let header = compound_text(&first[cat_idx], 0)?;
    let names = category_names(header, cfg);

    {
        let mut seen: HashSet<&str> = table
            .columns()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != cat_idx)
            .map(|(_, c)| c.name.as_str())
            .collect();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(CleanError::DuplicateColumn(name.clone()));
            }
        }
    }

    let (columns, rows) = table.into_parts();
    let mut out_rows: Vec<Vec<Value>> = Vec::with_capacity(rows.len());
    for (row_idx, mut row) in rows.into_iter().enumerate() {
        let compound = row.remove(cat_idx);
        let fragments: Vec<&str> = compound_text(&compound, row_idx)?
            .split(cfg.pair_delimiter)
            .collect();
        if fragments.len() != names.len() {
            return Err(CleanError::FragmentCount {
                row: row_idx,
                expected: names.len(),
                found: fragments.len(),
            });
        }
        for (fragment, name) in fragments.iter().zip(&names) {
            let v = indicator(fragment).ok_or_else(|| CleanError::InvalidIndicator {
                row: row_idx,
                column: name.clone(),
                fragment: fragment.to_string(),
            })?;
            row.push(Value::Integer(v));
        }
        out_rows.push(row);
    }

    let mut out_columns: Vec<ColumnSpec> = columns
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i != cat_idx)
        .map(|(_, c)| c)
        .collect();
    out_columns.extend(
        names
            .into_iter()
            .map(|n| ColumnSpec::new(n, ColumnKind::Integer)),
    );
    Ok(Table::from_parts(out_columns, out_rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combined(rows: &[(i64, &str, Option<&str>)]) -> Table {
        let cols = vec![
            ColumnSpec::new("id", ColumnKind::Integer),
            ColumnSpec::new("message", ColumnKind::Text),
            ColumnSpec::new("categories", ColumnKind::Text),
        ];
        let rows = rows
            .iter()
            .map(|(id, msg, cats)| {
                vec![
                    Value::Integer(*id),
                    Value::Text(msg.to_string()),
                    cats.map(|c| Value::Text(c.to_string()))
                        .unwrap_or(Value::Null),
                ]
            })
            .collect();
        Table::new(cols, rows).unwrap()
    }

    #[test]
    fn names_are_text_before_first_dash() {
        let cfg = PipelineConfig::default();
        assert_eq!(
            category_names("related-1;request-0;aid_related-0", &cfg),
            vec!["related", "request", "aid_related"]
        );
        assert_eq!(category_names("odd-name-1", &cfg), vec!["odd"]);
    }

    #[test]
    fn splits_into_indicator_columns() {
        let t = combined(&[(1, "help", Some("related-1;request-0"))]);
        let out = split_categories(t, &PipelineConfig::default()).unwrap();
        assert_eq!(out.column_names(), vec!["id", "message", "related", "request"]);
        assert_eq!(
            out.rows()[0],
            vec![
                Value::Integer(1),
                Value::Text("help".into()),
                Value::Integer(1),
                Value::Integer(0)
            ]
        );
        assert!(out.columns()[2..].iter().all(|c| c.kind == ColumnKind::Integer));
    }

    #[test]
    fn non_binary_digits_are_kept() {
        let t = combined(&[(1, "a", Some("related-2;request-0"))]);
        let out = split_categories(t, &PipelineConfig::default()).unwrap();
        assert_eq!(out.rows()[0][2], Value::Integer(2));
    }

    #[test]
    fn non_digit_tail_is_an_error() {
        let t = combined(&[(1, "a", Some("related-1;request-x"))]);
        let err = split_categories(t, &PipelineConfig::default()).unwrap_err();
        match err {
            CleanError::InvalidIndicator {
                row,
                column,
                fragment,
            } => {
                assert_eq!(row, 0);
                assert_eq!(column, "request");
                assert_eq!(fragment, "request-x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_fragment_is_an_error() {
        let t = combined(&[(1, "a", Some("related-1;"))]);
        let err = split_categories(t, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, CleanError::InvalidIndicator { .. }));
    }

    #[test]
    fn out_of_order_rows_are_labeled_by_position() {
        let t = combined(&[
            (1, "a", Some("related-1;request-0")),
            (2, "b", Some("request-1;related-0")),
        ]);
        let out = split_categories(t, &PipelineConfig::default()).unwrap();
        // Row 2 says request=1, related=0, but lands under the first row's labels.
        assert_eq!(out.rows()[1][2], Value::Integer(1)); // "related"
        assert_eq!(out.rows()[1][3], Value::Integer(0)); // "request"
    }

    #[test]
    fn fragment_count_mismatch_is_an_error() {
        let t = combined(&[
            (1, "a", Some("related-1;request-0")),
            (2, "b", Some("related-1")),
        ]);
        let err = split_categories(t, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CleanError::FragmentCount {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn null_categories_are_an_error() {
        let t = combined(&[(1, "a", Some("related-1")), (2, "b", None)]);
        let err = split_categories(t, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, CleanError::NullCategories { row: 1 }));
    }

    #[test]
    fn numeric_categories_are_not_text() {
        let t = crate::load::read_csv_from("c.csv", "id,categories\n1,-1\n".as_bytes()).unwrap();
        assert_eq!(t.columns()[1].kind, ColumnKind::Integer);
        let err = split_categories(t, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, CleanError::NotText { row: 0 }));
        assert_eq!(err.to_string(), "row 0: category value is not text");
    }

    #[test]
    fn second_application_is_a_missing_column_error() {
        let t = combined(&[(1, "help", Some("related-1;request-0"))]);
        let cfg = PipelineConfig::default();
        let once = split_categories(t, &cfg).unwrap();
        let err = split_categories(once, &cfg).unwrap_err();
        assert!(matches!(err, CleanError::MissingColumn(ref c) if c == "categories"));
    }

    #[test]
    fn empty_table_is_an_error() {
        let t = combined(&[]);
        let err = split_categories(t, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, CleanError::EmptyTable));
    }

    #[test]
    fn category_named_like_existing_column_is_rejected() {
        let t = combined(&[(1, "a", Some("message-1"))]);
        let err = split_categories(t, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, CleanError::DuplicateColumn(ref c) if c == "message"));
    }
}
