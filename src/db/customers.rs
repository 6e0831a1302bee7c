//! Statements over the `customer` table.
//!
//! Customers are not modelled: rows go back to the client with whatever
//! columns the table has, keyed by column name.

use serde_json::{Map, Number, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, SqliteConnection, TypeInfo, ValueRef};

use super::StorageError;

/// Upper bound on rows returned by [`list`].
pub const LIST_LIMIT: i64 = 10;

const LIST: &str = "SELECT * FROM customer LIMIT ?";

pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Map<String, Value>>, StorageError> {
    let rows = sqlx::query(LIST).bind(LIST_LIMIT).fetch_all(conn).await?;
    rows.iter().map(row_to_json).collect()
}

/// Converts a row into a JSON object using each value's storage class.
pub(crate) fn row_to_json(row: &SqliteRow) -> Result<Map<String, Value>, StorageError> {
    let mut object = Map::with_capacity(row.len());

    for column in row.columns() {
        let i = column.ordinal();
        let raw = row.try_get_raw(i)?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            let storage = raw.type_info().name().to_owned();
            match storage.as_str() {
                "INTEGER" => Value::from(row.try_get::<i64, _>(i)?),
                "REAL" => Number::from_f64(row.try_get::<f64, _>(i)?).map_or(Value::Null, Value::Number),
                "BLOB" => Value::from(row.try_get::<Vec<u8>, _>(i)?),
                _ => Value::from(row.try_get::<String, _>(i)?),
            }
        };
        object.insert(column.name().to_owned(), value);
    }

    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn row_to_json_keeps_column_names_and_types() {
        let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
        let row = sqlx::query("SELECT 'C001' AS customer_id, 3 AS grade, 1.5 AS score, NULL AS city")
            .fetch_one(&pool)
            .await
            .unwrap();

        let object = row_to_json(&row).unwrap();
        assert_eq!(object["customer_id"], "C001");
        assert_eq!(object["grade"], 3);
        assert_eq!(object["score"], 1.5);
        assert_eq!(object["city"], Value::Null);
        assert_eq!(object.len(), 4);
    }
}
