use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use log::{debug, warn};

use crate::error::LoadError;
use crate::models::{ColumnKind, ColumnSpec, Table, Value};

/// Field contents read as missing, matching the conventions of common dataframe tooling.
const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_null_marker(field: &str) -> bool {
    NULL_MARKERS.contains(&field)
}

/// Read a comma-separated file with a header row into a typed `Table`.
pub fn read_csv(path: &Path) -> Result<Table, LoadError> {
    let name = path.display().to_string();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: name.clone(),
        source,
    })?;
    read_csv_from(&name, BufReader::with_capacity(256 * 1024, file))
}

/// Same as `read_csv`, for any reader; `name` is used in error messages.
pub fn read_csv_from<R: Read>(name: &str, reader: R) -> Result<Table, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: name.to_string(),
        source,
    };
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        return Err(LoadError::EmptyHeader {
            path: name.to_string(),
        });
    }
    let headers = disambiguate_headers(name, headers);

    let mut raw: Vec<Vec<Option<String>>> = Vec::new();
    for rec in rdr.records() {
        let rec = rec.map_err(csv_err)?;
        raw.push(
            rec.iter()
                .map(|f| {
                    if is_null_marker(f) {
                        None
                    } else {
                        Some(f.to_string())
                    }
                })
                .collect(),
        );
    }

    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|c| infer_kind(raw.iter().filter_map(|r| r[c].as_deref())))
        .collect();
    debug!("{}: {} rows, column kinds {:?}", name, raw.len(), kinds);

    let rows = raw
        .into_iter()
        .map(|r| {
            r.into_iter()
                .zip(kinds.iter())
                .map(|(f, kind)| typed_value(f, *kind))
                .collect()
        })
        .collect();
    let columns = headers
        .into_iter()
        .zip(kinds)
        .map(|(name, kind)| ColumnSpec::new(name, kind))
        .collect();
    // The csv reader already rejected records whose width differs from the header.
    Ok(Table::from_parts(columns, rows))
}

/// Repeated header names get a `.N` suffix (`a`, `a.1`, `a.2`) so every column
/// stays addressable by name.
fn disambiguate_headers(name: &str, headers: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = headers.iter().cloned().collect();
    let mut first_seen: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|h| {
            if first_seen.insert(h.clone()) {
                return h;
            }
            let n = suffixes.entry(h.clone()).or_insert(0);
            let renamed = loop {
                *n += 1;
                let candidate = format!("{}.{}", h, n);
                if !taken.contains(&candidate) {
                    break candidate;
                }
            };
            warn!("{}: duplicate column '{}' renamed to '{}'", name, h, renamed);
            taken.insert(renamed.clone());
            renamed
        })
        .collect()
}

/// Narrowest kind every present value parses as. An all-missing column is `Real`.
fn infer_kind<'a>(mut values: impl Iterator<Item = &'a str> + Clone) -> ColumnKind {
    if values.clone().next().is_none() {
        return ColumnKind::Real;
    }
    if values.clone().all(|v| v.parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if values.all(|v| v.parse::<f64>().is_ok()) {
        ColumnKind::Real
    } else {
        ColumnKind::Text
    }
}

fn typed_value(field: Option<String>, kind: ColumnKind) -> Value {
    let Some(s) = field else {
        return Value::Null;
    };
    // Parses cannot fail here: the kind was inferred from these same values.
    match kind {
        ColumnKind::Integer => s.parse().map(Value::Integer).unwrap_or(Value::Text(s)),
        ColumnKind::Real => s.parse().map(Value::Real).unwrap_or(Value::Text(s)),
        ColumnKind::Text => Value::Text(s),
    }
}
