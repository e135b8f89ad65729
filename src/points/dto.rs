use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::points::repo_types::{Point, PointOwner, PointWithOwner};

#[derive(Debug, Default, Deserialize)]
pub struct AddPointRequest {
    pub name: Option<String>,
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    /// Email of the account creating the point.
    pub email: Option<String>,
    pub cnpj: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OwnerView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cnpj: Option<String>,
}

impl From<PointOwner> for OwnerView {
    fn from(o: PointOwner) -> Self {
        Self {
            id: o.id,
            name: o.name,
            email: o.email,
            cnpj: o.cnpj,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointView {
    pub id: Uuid,
    pub name: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub cnpj: Option<String>,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<OwnerView>,
}

impl From<Point> for PointView {
    fn from(p: Point) -> Self {
        Self {
            id: p.id,
            name: p.name,
            street: p.street,
            neighborhood: p.neighborhood,
            city: p.city,
            latitude: p.latitude,
            longitude: p.longitude,
            cnpj: p.kind.cnpj().map(str::to_owned),
            user_id: p.owner_id,
            created_at: p.created_at,
            user: None,
        }
    }
}

impl From<PointWithOwner> for PointView {
    fn from(pw: PointWithOwner) -> Self {
        let mut view = PointView::from(pw.point);
        view.user = Some(pw.owner.into());
        view
    }
}

#[derive(Debug, Serialize)]
pub struct AddPointResponse {
    pub message: &'static str,
    pub point: PointView,
}
