use serde_json::{Map, Value};

use crate::api::{ApiError, AppState};
use crate::db::customers;
use crate::request::Request;
use crate::response::Json;

/// `GET /users`: at most [`customers::LIST_LIMIT`] customer rows, as stored.
pub async fn list(_req: Request, state: AppState) -> Result<Json<Vec<Map<String, Value>>>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let rows = customers::list(&mut conn).await?;
    Ok(Json(rows))
}
