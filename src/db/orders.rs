//! Statements over the `orders` table.
//!
//! Each function runs exactly one parameterized statement on a connection the
//! caller already holds.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};
use tracing::debug;

use super::StorageError;

// DECIMAL and NUMERIC columns keep whole amounts as INTEGER; read them back as REAL.
const LIST: &str =
    "SELECT ord_no, CAST(purch_amt AS REAL) AS purch_amt, ord_date, customer_id FROM orders";
const FIND: &str =
    "SELECT ord_no, CAST(purch_amt AS REAL) AS purch_amt, ord_date, customer_id FROM orders WHERE ord_no = ?";
const INSERT: &str = "INSERT INTO orders (ord_no, purch_amt, ord_date, customer_id) VALUES (?, ?, ?, ?)";
const UPDATE_AMOUNT: &str = "UPDATE orders SET purch_amt = ? WHERE ord_no = ?";
const REPLACE: &str =
    "UPDATE orders SET ord_no = ?, purch_amt = ?, ord_date = ?, customer_id = ? WHERE ord_no = ?";
const DELETE: &str = "DELETE FROM orders WHERE ord_no = ?";

/// One row of the `orders` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub ord_no: i64,
    pub purch_amt: f64,
    pub ord_date: String,
    pub customer_id: String,
}

pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Order>, StorageError> {
    Ok(sqlx::query_as(LIST).fetch_all(conn).await?)
}

/// First row whose `ord_no` matches, if any.
pub async fn find(conn: &mut SqliteConnection, ord_no: i64) -> Result<Option<Order>, StorageError> {
    Ok(sqlx::query_as(FIND).bind(ord_no).fetch_optional(conn).await?)
}

/// Inserts `order` and returns its order number.
pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> Result<i64, StorageError> {
    sqlx::query(INSERT)
        .bind(order.ord_no)
        .bind(order.purch_amt)
        .bind(&order.ord_date)
        .bind(&order.customer_id)
        .execute(conn)
        .await?;
    Ok(order.ord_no)
}

/// Sets the amount of one order. Returns the number of rows touched.
pub async fn update_amount(
    conn: &mut SqliteConnection,
    ord_no: i64,
    purch_amt: f64,
) -> Result<u64, StorageError> {
    let done = sqlx::query(UPDATE_AMOUNT)
        .bind(purch_amt)
        .bind(ord_no)
        .execute(conn)
        .await?;
    debug!(ord_no, rows = done.rows_affected(), "amount updated");
    Ok(done.rows_affected())
}

/// Overwrites every column of the order keyed by `ord_no`, including the
/// order number itself.
pub async fn replace(
    conn: &mut SqliteConnection,
    ord_no: i64,
    order: &Order,
) -> Result<u64, StorageError> {
    let done = sqlx::query(REPLACE)
        .bind(order.ord_no)
        .bind(order.purch_amt)
        .bind(&order.ord_date)
        .bind(&order.customer_id)
        .bind(ord_no)
        .execute(conn)
        .await?;
    debug!(ord_no, new_ord_no = order.ord_no, rows = done.rows_affected(), "order replaced");
    Ok(done.rows_affected())
}

pub async fn delete(conn: &mut SqliteConnection, ord_no: i64) -> Result<u64, StorageError> {
    let done = sqlx::query(DELETE).bind(ord_no).execute(conn).await?;
    debug!(ord_no, rows = done.rows_affected(), "order deleted");
    Ok(done.rows_affected())
}
