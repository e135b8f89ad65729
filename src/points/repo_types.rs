use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Plain recycling point or a point registered under a company's CNPJ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointKind {
    Recycling,
    Company { cnpj: String },
}

impl PointKind {
    pub fn from_cnpj(cnpj: Option<String>) -> Self {
        match cnpj {
            Some(cnpj) => PointKind::Company { cnpj },
            None => PointKind::Recycling,
        }
    }

    pub fn cnpj(&self) -> Option<&str> {
        match self {
            PointKind::Recycling => None,
            PointKind::Company { cnpj } => Some(cnpj),
        }
    }
}

/// Which points a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointFilter {
    All,
    /// `cnpj IS NULL`
    RecyclingOnly,
    /// `cnpj IS NOT NULL`
    CompanyOnly,
}

#[cfg(test)]
impl PointFilter {
    pub fn matches(self, kind: &PointKind) -> bool {
        match self {
            PointFilter::All => true,
            PointFilter::RecyclingOnly => matches!(kind, PointKind::Recycling),
            PointFilter::CompanyOnly => matches!(kind, PointKind::Company { .. }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Point {
    pub id: Uuid,
    pub name: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub kind: PointKind,
    pub owner_id: Uuid,
    pub created_at: OffsetDateTime,
}

/// Owner fields joined into listings. Never includes the password hash.
#[derive(Debug, Clone)]
pub struct PointOwner {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cnpj: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PointWithOwner {
    pub point: Point,
    pub owner: PointOwner,
}

/// Row in the `points` table.
#[derive(Debug, Clone, FromRow)]
pub struct PointRow {
    pub id: Uuid,
    pub name: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub cnpj: Option<String>,
    pub owner_id: Uuid,
    pub created_at: OffsetDateTime,
}

impl From<PointRow> for Point {
    fn from(r: PointRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            street: r.street,
            neighborhood: r.neighborhood,
            city: r.city,
            latitude: r.latitude,
            longitude: r.longitude,
            kind: PointKind::from_cnpj(r.cnpj),
            owner_id: r.owner_id,
            created_at: r.created_at,
        }
    }
}

/// `points` joined with `accounts` on `owner_id`.
#[derive(Debug, Clone, FromRow)]
pub struct PointOwnerRow {
    #[sqlx(flatten)]
    pub point: PointRow,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_cnpj: Option<String>,
}

impl From<PointOwnerRow> for PointWithOwner {
    fn from(r: PointOwnerRow) -> Self {
        let owner = PointOwner {
            id: r.point.owner_id,
            name: r.owner_name,
            email: r.owner_email,
            cnpj: r.owner_cnpj,
        };
        Self {
            point: r.point.into(),
            owner,
        }
    }
}

/// Insert payload; coordinates come from the geocoder.
#[derive(Debug, Clone)]
pub struct NewPoint {
    pub name: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub kind: PointKind,
    pub owner_id: Uuid,
}
