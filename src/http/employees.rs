//! Handlers for the `/api/v1` employee routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::directory::Employee;
use crate::error::DirectoryError;
use crate::http::{ApiFailure, AppState, RequestId};

type HandlerResult<T> = Result<T, ApiFailure>;

pub async fn list_all(
    State(state): State<AppState>,
    request_id: RequestId,
) -> HandlerResult<Json<Vec<Employee>>> {
    state
        .directory
        .list_all()
        .await
        .map(Json)
        .map_err(|e| ApiFailure::new(&request_id, e))
}

pub async fn search_by_name(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(term): Path<String>,
) -> HandlerResult<Json<Vec<Employee>>> {
    state
        .directory
        .search_by_name(&term)
        .await
        .map(Json)
        .map_err(|e| ApiFailure::new(&request_id, e))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> HandlerResult<Json<Employee>> {
    state
        .directory
        .get_by_id(&id)
        .await
        .map(Json)
        .map_err(|e| ApiFailure::new(&request_id, e))
}

pub async fn highest_salary(
    State(state): State<AppState>,
    request_id: RequestId,
) -> HandlerResult<Json<u64>> {
    state
        .directory
        .highest_salary()
        .await
        .map(Json)
        .map_err(|e| ApiFailure::new(&request_id, e))
}

pub async fn top_ten_earners(
    State(state): State<AppState>,
    request_id: RequestId,
) -> HandlerResult<Json<Vec<String>>> {
    state
        .directory
        .top_ten_earners()
        .await
        .map(Json)
        .map_err(|e| ApiFailure::new(&request_id, e))
}

/// Body must be a JSON object; anything else is a bad request rather than
/// axum's default rejection, so the caller still gets an `ApiError`.
pub async fn create(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<Value>, JsonRejection>,
) -> HandlerResult<(StatusCode, Json<Employee>)> {
    let fields = match body {
        Ok(Json(Value::Object(fields))) => fields,
        Ok(_) => {
            return Err(ApiFailure::new(
                &request_id,
                DirectoryError::bad_request("Request body must be a JSON object."),
            ))
        }
        Err(rejection) => {
            return Err(ApiFailure::new(
                &request_id,
                DirectoryError::bad_request(rejection.body_text()),
            ))
        }
    };

    state
        .directory
        .create(&fields)
        .await
        .map(|employee| (StatusCode::CREATED, Json(employee)))
        .map_err(|e| ApiFailure::new(&request_id, e))
}

pub async fn delete_by_id(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> HandlerResult<Json<String>> {
    state
        .directory
        .delete_by_id(&id)
        .await
        .map(Json)
        .map_err(|e| ApiFailure::new(&request_id, e))
}
