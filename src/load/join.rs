use std::collections::HashMap;

use crate::error::LoadError;
use crate::models::{ColumnKind, ColumnSpec, Table, Value};

/// Hashable form of a join key. Integral reals match integers of the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum JoinKey {
    Int(i64),
    RealBits(u64),
    Text(String),
}

fn join_key(v: &Value) -> Option<JoinKey> {
    match v {
        Value::Null => None,
        Value::Integer(i) => Some(JoinKey::Int(*i)),
        Value::Real(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Some(JoinKey::Int(*f as i64))
        }
        Value::Real(f) => Some(JoinKey::RealBits(f.to_bits())),
        Value::Text(s) => Some(JoinKey::Text(s.clone())),
    }
}

/// Result of `left_join`, with how many left rows found at least one partner.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub table: Table,
    pub matched_left_rows: usize,
}

/// Left join `right` onto `left` using column `on`, which must exist in both.
///
/// Output columns: every left column, then every right column except `on`.
/// Non-key names present on both sides are suffixed `_x` (left) and `_y` (right).
/// A left row with k matches yields k rows in right order; with none, one row whose
/// right-hand values are null. Right rows without a left partner are dropped.
/// Null keys never match.
pub fn left_join(
    left: &Table,
    left_name: &str,
    right: &Table,
    right_name: &str,
    on: &str,
) -> Result<JoinOutcome, LoadError> {
    let missing = |source_name: &str| LoadError::MissingColumn {
        source_name: source_name.to_string(),
        column: on.to_string(),
    };
    let lk = left.column_index(on).ok_or_else(|| missing(left_name))?;
    let rk = right.column_index(on).ok_or_else(|| missing(right_name))?;

    let right_cols: Vec<usize> = (0..right.columns().len()).filter(|&c| c != rk).collect();

    let mut columns: Vec<ColumnSpec> = Vec::with_capacity(left.columns().len() + right_cols.len());
    for (i, spec) in left.columns().iter().enumerate() {
        let clash = i != lk && right_cols.iter().any(|&c| right.columns()[c].name == spec.name);
        let name = if clash {
            format!("{}_x", spec.name)
        } else {
            spec.name.clone()
        };
        columns.push(ColumnSpec::new(name, spec.kind));
    }
    for &c in &right_cols {
        let spec = &right.columns()[c];
        let clash = left.column_index(&spec.name).is_some_and(|i| i != lk);
        let name = if clash {
            format!("{}_y", spec.name)
        } else {
            spec.name.clone()
        };
        columns.push(ColumnSpec::new(name, spec.kind));
    }

    let mut index: HashMap<JoinKey, Vec<usize>> = HashMap::new();
    for (ri, row) in right.rows().iter().enumerate() {
        if let Some(key) = join_key(&row[rk]) {
            index.entry(key).or_default().push(ri);
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(left.row_count());
    let mut matched_left_rows = 0usize;
    let mut right_saw_null = vec![false; right_cols.len()];
    for lrow in left.rows() {
        let partners = join_key(&lrow[lk]).and_then(|k| index.get(&k));
        match partners {
            Some(ris) => {
                matched_left_rows += 1;
                for &ri in ris {
                    let rrow = &right.rows()[ri];
                    let mut out = lrow.clone();
                    out.extend(right_cols.iter().map(|&c| rrow[c].clone()));
                    rows.push(out);
                }
            }
            None => {
                let mut out = lrow.clone();
                out.extend(std::iter::repeat_n(Value::Null, right_cols.len()));
                right_saw_null.iter_mut().for_each(|s| *s = true);
                rows.push(out);
            }
        }
    }

    // Integer columns that gained nulls from unmatched rows are widened to real.
    let offset = left.columns().len();
    for (j, saw_null) in right_saw_null.into_iter().enumerate() {
        let col = offset + j;
        if saw_null && columns[col].kind == ColumnKind::Integer {
            columns[col].kind = ColumnKind::Real;
            for row in rows.iter_mut() {
                if let Value::Integer(v) = row[col] {
                    row[col] = Value::Real(v as f64);
                }
            }
        }
    }

    Ok(JoinOutcome {
        table: Table::from_parts(columns, rows),
        matched_left_rows,
    })
}
