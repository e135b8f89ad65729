use tracing::{info, warn};

use crate::{
    error::ApiError,
    geocoder::address_query,
    points::{
        dto::AddPointRequest,
        repo_types::{NewPoint, Point, PointFilter, PointKind, PointWithOwner},
    },
    state::AppState,
    validation::{normalize_email, present},
};

pub const ADD_FAILED: &str = "Failed to add point";

/// Resolve the address and store the point under the acting account.
///
/// Steps run in order and stop at the first failure: account lookup, address
/// presence, geocoding, insert. Nothing is written unless the geocoder
/// returned a match.
pub async fn add_point(state: &AppState, req: AddPointRequest) -> Result<Point, ApiError> {
    let email =
        normalize_email(req.email).ok_or_else(|| ApiError::missing_field(ADD_FAILED, "email"))?;

    let owner = match state.accounts.find_by_email(&email).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            warn!(%email, "add point for unknown account");
            return Err(ApiError::NotFound("User not found".into()));
        }
        Err(e) => return Err(ApiError::internal(ADD_FAILED, &e)),
    };

    let (Some(street), Some(neighborhood), Some(city)) =
        (present(req.street), present(req.neighborhood), present(req.city))
    else {
        return Err(ApiError::validation("Street, neighborhood and city are required"));
    };
    let name = present(req.name).ok_or_else(|| ApiError::missing_field(ADD_FAILED, "name"))?;

    let query = address_query(&street, &neighborhood, &city);
    let coords = match state.geocoder.locate(&query).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            warn!(%query, "address not found");
            return Err(ApiError::NotFound("Address not found".into()));
        }
        Err(e) => return Err(ApiError::internal(ADD_FAILED, &e)),
    };

    let point = state
        .points
        .create(NewPoint {
            name,
            street,
            neighborhood,
            city,
            latitude: coords.lat,
            longitude: coords.lng,
            kind: PointKind::from_cnpj(present(req.cnpj)),
            owner_id: owner.id,
        })
        .await
        .map_err(|e| ApiError::internal(ADD_FAILED, &e))?;

    info!(point_id = %point.id, owner_id = %owner.id, "point added");
    Ok(point)
}

pub async fn list_points(
    state: &AppState,
    filter: PointFilter,
) -> Result<Vec<PointWithOwner>, ApiError> {
    let failure = match filter {
        PointFilter::All => "Failed to fetch points",
        PointFilter::RecyclingOnly => "Failed to fetch recycling points",
        PointFilter::CompanyOnly => "Failed to fetch companies",
    };
    state
        .points
        .list(filter)
        .await
        .map_err(|e| ApiError::internal(failure, &e))
}
