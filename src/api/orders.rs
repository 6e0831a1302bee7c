//! Order handlers.
//!
//! Every handler follows the same shape: check the path id and body, and only
//! then take a connection from the pool and run one statement. The connection
//! lives in a local and goes back to the pool when the handler returns, on
//! success and on every error path.
//!
//! Updates and deletes do not check how many rows they touched. Acting on an
//! order number that does not exist still answers 200.

use http::StatusCode;
use serde_json::{Map, Value, json};
use tracing::info;

use crate::api::{ApiError, AppState};
use crate::db::orders::{self, Order};
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::validate::{self, Field, Rule, Validator};

const ORDER_NOT_FOUND: &str = "Order not found";

fn order_rules() -> Validator {
    Validator::new()
        .field(Field::required("ord_no").rule(Rule::Numeric))
        .field(Field::required("purch_amt").rule(Rule::Float))
        .field(Field::required("ord_date").rule(Rule::IsoDate))
        .field(Field::required("customer_id").rule(Rule::NonEmpty))
}

fn amount_rules() -> Validator {
    Validator::new().field(Field::optional("purch_amt").rule(Rule::Float))
}

/// `GET /orders`
pub async fn list(_req: Request, state: AppState) -> Result<Json<Vec<Order>>, ApiError> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(orders::list(&mut conn).await?))
}

/// `GET /orders/{id}`
pub async fn get(req: Request, state: AppState) -> Result<Json<Order>, ApiError> {
    let id = path_id(&req)?;
    let mut conn = state.db.acquire().await?;
    orders::find(&mut conn, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(ORDER_NOT_FOUND))
}

/// `POST /orders`
pub async fn create(req: Request, state: AppState) -> Result<Response, ApiError> {
    let body = req.json_object()?;
    let order = order_from(&body)?;

    let mut conn = state.db.acquire().await?;
    let id = orders::insert(&mut conn, &order).await?;

    info!(ord_no = id, customer_id = %order.customer_id, "order created");
    Ok((StatusCode::CREATED, Json(json!({ "message": "Order created", "orderId": id }))).into_response())
}

/// `PATCH /orders/{id}`: sets `purch_amt` when the body carries one.
pub async fn update_amount(req: Request, state: AppState) -> Result<Json<Value>, ApiError> {
    let id = path_id(&req)?;
    let body = req.json_object()?;
    let valid = amount_rules().validate(&body)?;

    if let Some(purch_amt) = valid.float("purch_amt") {
        let mut conn = state.db.acquire().await?;
        orders::update_amount(&mut conn, id, purch_amt).await?;
    }
    Ok(message("Order updated"))
}

/// `PUT /orders/{id}`: overwrites all four columns.
///
/// With `orders.allow_rekey` set (the default) the body's `ord_no` becomes the
/// order's new number. With it cleared, a body `ord_no` that differs from the
/// path id is rejected.
pub async fn replace(req: Request, state: AppState) -> Result<Json<Value>, ApiError> {
    let id = path_id(&req)?;
    let body = req.json_object()?;
    let order = order_from(&body)?;

    if order.ord_no != id && !state.orders.allow_rekey {
        return Err(ApiError::invalid(
            "ord_no",
            format!("ord_no must match the order number in the path ({id})"),
        ));
    }

    let mut conn = state.db.acquire().await?;
    orders::replace(&mut conn, id, &order).await?;
    Ok(message("Order updated"))
}

/// `DELETE /orders/{id}`
pub async fn delete(req: Request, state: AppState) -> Result<Json<Value>, ApiError> {
    let id = path_id(&req)?;
    let mut conn = state.db.acquire().await?;
    orders::delete(&mut conn, id).await?;
    Ok(message("Order deleted"))
}

fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}

fn path_id(req: &Request) -> Result<i64, ApiError> {
    req.param("id")
        .and_then(validate::parse_integer)
        .ok_or_else(|| ApiError::invalid("id", "id must be numeric"))
}

fn order_from(body: &Map<String, Value>) -> Result<Order, ApiError> {
    let valid = order_rules().validate(body)?;

    let (Some(ord_no), Some(purch_amt), Some(ord_date), Some(customer_id)) = (
        valid.integer("ord_no"),
        valid.float("purch_amt"),
        valid.text("ord_date"),
        valid.text("customer_id"),
    ) else {
        return Err(ApiError::invalid("body", "order fields are incomplete"));
    };

    Ok(Order {
        ord_no,
        purch_amt,
        ord_date: ord_date.to_owned(),
        customer_id: customer_id.to_owned(),
    })
}
