use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::error::DbError;
use crate::models::{ColumnKind, ColumnSpec, Table, Value};

/// Bound-parameter ceiling of older SQLite builds; inserts are chunked under it.
const SQLITE_MAX_VARIABLES: usize = 999;

pub(crate) fn validate_ident(name: &str) -> Result<(), DbError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DbError::InvalidIdent(name.to_string()));
    }
    Ok(())
}

/// Double-quote an identifier, doubling embedded quotes. Column names come
/// straight from CSV headers and may contain anything.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn create_table_sql(quoted_table: &str, columns: &[ColumnSpec]) -> String {
    let defs: Vec<String> = columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), c.kind.sql_type()))
        .collect();
    format!("CREATE TABLE {} ({})", quoted_table, defs.join(", "))
}

/// Replace `table_name` with the contents of `table` in one transaction.
///
/// Any existing table of that name is dropped first. The new table has exactly
/// the columns of `table`, no primary key and no row-index column.
/// Returns the number of rows written.
pub async fn save_table(
    pool: &SqlitePool,
    table_name: &str,
    table: &Table,
) -> Result<u64, DbError> {
    validate_ident(table_name)?;
    if table.columns().is_empty() {
        return Err(DbError::NoColumns(table_name.to_string()));
    }
    let quoted = quote_ident(table_name);
    let column_list = table
        .columns()
        .iter()
        .map(|c| quote_ident(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let rows_per_stmt = (SQLITE_MAX_VARIABLES / table.columns().len()).max(1);

    let mut tx = pool.begin().await?;
    sqlx::query(&format!("DROP TABLE IF EXISTS {}", quoted))
        .execute(&mut *tx)
        .await?;
    sqlx::query(&create_table_sql(&quoted, table.columns()))
        .execute(&mut *tx)
        .await?;

    let mut written = 0u64;
    for chunk in table.rows().chunks(rows_per_stmt) {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("INSERT INTO {} ({}) ", quoted, column_list));
        qb.push_values(chunk, |mut b, row| {
            for v in row {
                match v {
                    Value::Null => {
                        b.push_bind(None::<i64>);
                    }
                    Value::Integer(i) => {
                        b.push_bind(*i);
                    }
                    Value::Real(f) => {
                        b.push_bind(*f);
                    }
                    Value::Text(s) => {
                        b.push_bind(s.clone());
                    }
                }
            }
        });
        written += qb.build().execute(&mut *tx).await?.rows_affected();
    }
    tx.commit().await?;
    log::debug!(
        "Replaced table {} ({} columns, {} rows, {} rows per insert)",
        table_name,
        table.columns().len(),
        written,
        rows_per_stmt
    );
    Ok(written)
}

/// Read a whole table back, typing each column by its declared SQL type.
pub async fn read_table(pool: &SqlitePool, table_name: &str) -> Result<Table, DbError> {
    validate_ident(table_name)?;
    let quoted = quote_ident(table_name);
    let info = sqlx::query(&format!("PRAGMA table_info({})", quoted))
        .fetch_all(pool)
        .await?;
    if info.is_empty() {
        return Err(DbError::MissingTable(table_name.to_string()));
    }
    let mut columns = Vec::with_capacity(info.len());
    for r in &info {
        let name: String = r.try_get("name")?;
        let decl: String = r.try_get("type")?;
        columns.push(ColumnSpec::new(name, ColumnKind::from_sql_type(&decl)));
    }

    let select_list = columns
        .iter()
        .map(|c| quote_ident(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let fetched = sqlx::query(&format!("SELECT {} FROM {}", select_list, quoted))
        .fetch_all(pool)
        .await?;
    let mut rows = Vec::with_capacity(fetched.len());
    for r in &fetched {
        let mut row = Vec::with_capacity(columns.len());
        for (i, spec) in columns.iter().enumerate() {
            let v = match spec.kind {
                ColumnKind::Integer => r.try_get::<Option<i64>, _>(i)?.map(Value::Integer),
                ColumnKind::Real => r.try_get::<Option<f64>, _>(i)?.map(Value::Real),
                ColumnKind::Text => r.try_get::<Option<String>, _>(i)?.map(Value::Text),
            };
            row.push(v.unwrap_or(Value::Null));
        }
        rows.push(row);
    }
    Ok(Table::from_parts(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::make_pool;
    use std::collections::HashMap;

    async fn scratch_pool(dir: &tempfile::TempDir) -> SqlitePool {
        let path = dir.path().join("test.db");
        make_pool(&DatabaseConfig::new(path.to_str().unwrap()))
            .await
            .unwrap()
    }

    fn cleaned() -> Table {
        let cols = vec![
            ColumnSpec::new("id", ColumnKind::Integer),
            ColumnSpec::new("message", ColumnKind::Text),
            ColumnSpec::new("original", ColumnKind::Text),
            ColumnSpec::new("score", ColumnKind::Real),
            ColumnSpec::new("related", ColumnKind::Integer),
            ColumnSpec::new("request", ColumnKind::Integer),
        ];
        let rows = vec![
            vec![
                Value::Integer(1),
                Value::Text("help".into()),
                Value::Null,
                Value::Real(0.25),
                Value::Integer(1),
                Value::Integer(0),
            ],
            vec![
                Value::Integer(2),
                Value::Text("water".into()),
                Value::Text("agua".into()),
                Value::Null,
                Value::Integer(2),
                Value::Integer(1),
            ],
        ];
        Table::new(cols, rows).unwrap()
    }

    fn multiset(t: &Table) -> HashMap<Vec<Value>, usize> {
        let mut m = HashMap::new();
        for r in t.rows() {
            *m.entry(r.clone()).or_insert(0) += 1;
        }
        m
    }

    #[tokio::test]
    async fn save_then_read_back_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let pool = scratch_pool(&dir).await;
        let t = cleaned();
        let n = save_table(&pool, "DisasterResponse", &t).await.unwrap();
        assert_eq!(n, 2);
        let back = read_table(&pool, "DisasterResponse").await.unwrap();
        assert_eq!(back.columns(), t.columns());
        assert_eq!(multiset(&back), multiset(&t));
    }

    #[tokio::test]
    async fn existing_table_is_replaced_not_appended() {
        let dir = tempfile::tempdir().unwrap();
        let pool = scratch_pool(&dir).await;
        save_table(&pool, "DisasterResponse", &cleaned())
            .await
            .unwrap();

        let other = Table::new(
            vec![ColumnSpec::new("id", ColumnKind::Integer)],
            vec![vec![Value::Integer(42)]],
        )
        .unwrap();
        save_table(&pool, "DisasterResponse", &other).await.unwrap();

        let back = read_table(&pool, "DisasterResponse").await.unwrap();
        assert_eq!(back.column_names(), vec!["id"]);
        assert_eq!(back.rows(), &[vec![Value::Integer(42)]]);
    }

    #[tokio::test]
    async fn inserts_span_multiple_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let pool = scratch_pool(&dir).await;
        let cols = vec![
            ColumnSpec::new("id", ColumnKind::Integer),
            ColumnSpec::new("message", ColumnKind::Text),
        ];
        let rows = (0..1_200)
            .map(|i| vec![Value::Integer(i), Value::Text(format!("m{}", i))])
            .collect();
        let t = Table::new(cols, rows).unwrap();
        let n = save_table(&pool, "DisasterResponse", &t).await.unwrap();
        assert_eq!(n, 1_200);
        let back = read_table(&pool, "DisasterResponse").await.unwrap();
        assert_eq!(back.row_count(), 1_200);
    }

    #[tokio::test]
    async fn empty_table_creates_schema_only() {
        let dir = tempfile::tempdir().unwrap();
        let pool = scratch_pool(&dir).await;
        let t = Table::empty(vec![ColumnSpec::new("id", ColumnKind::Integer)]);
        assert_eq!(save_table(&pool, "DisasterResponse", &t).await.unwrap(), 0);
        let back = read_table(&pool, "DisasterResponse").await.unwrap();
        assert_eq!(back.column_names(), vec!["id"]);
        assert!(back.is_empty());
    }

    #[tokio::test]
    async fn awkward_column_names_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let pool = scratch_pool(&dir).await;
        let t = Table::new(
            vec![
                ColumnSpec::new("id", ColumnKind::Integer),
                ColumnSpec::new("say \"hi\"", ColumnKind::Text),
                ColumnSpec::new("order", ColumnKind::Integer),
            ],
            vec![vec![
                Value::Integer(1),
                Value::Text("x".into()),
                Value::Integer(0),
            ]],
        )
        .unwrap();
        save_table(&pool, "DisasterResponse", &t).await.unwrap();
        let back = read_table(&pool, "DisasterResponse").await.unwrap();
        assert_eq!(back.column_names(), vec!["id", "say \"hi\"", "order"]);
    }

    #[tokio::test]
    async fn rejects_bad_table_names() {
        let dir = tempfile::tempdir().unwrap();
        let pool = scratch_pool(&dir).await;
        let err = save_table(&pool, "t; DROP TABLE x", &cleaned())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidIdent(_)));
    }

    #[tokio::test]
    async fn reading_unknown_table_fails() {
        let dir = tempfile::tempdir().unwrap();
        let pool = scratch_pool(&dir).await;
        let err = read_table(&pool, "nope").await.unwrap_err();
        assert!(matches!(err, DbError::MissingTable(_)));
    }

    #[test]
    fn quote_ident_doubles_quotes() {
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(
            create_table_sql("\"T\"", &[ColumnSpec::new("id", ColumnKind::Integer)]),
            "CREATE TABLE \"T\" (\"id\" INTEGER)"
        );
    }
}
