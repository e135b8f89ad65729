use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::{json_body, ApiError},
    points::{
        dto::{AddPointRequest, AddPointResponse, PointView},
        repo_types::PointFilter,
        services,
    },
    state::AppState,
};

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/add-point", post(add_point))
}

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/points", get(list_all))
        .route("/recycling-points", get(list_recycling))
        .route("/companies", get(list_companies))
}

#[instrument(skip(state, payload))]
pub async fn add_point(
    State(state): State<AppState>,
    payload: Result<Json<AddPointRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AddPointResponse>), ApiError> {
    let payload = json_body(payload, services::ADD_FAILED)?;
    let point = services::add_point(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(AddPointResponse {
            message: "Point added successfully!",
            point: point.into(),
        }),
    ))
}

async fn list(state: &AppState, filter: PointFilter) -> Result<Json<Vec<PointView>>, ApiError> {
    let points = services::list_points(state, filter).await?;
    Ok(Json(points.into_iter().map(PointView::from).collect()))
}

#[instrument(skip(state))]
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<PointView>>, ApiError> {
    list(&state, PointFilter::All).await
}

#[instrument(skip(state))]
pub async fn list_recycling(
    State(state): State<AppState>,
) -> Result<Json<Vec<PointView>>, ApiError> {
    list(&state, PointFilter::RecyclingOnly).await
}

#[instrument(skip(state))]
pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<PointView>>, ApiError> {
    list(&state, PointFilter::CompanyOnly).await
}
