use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::points::repo_types::{
    NewPoint, Point, PointFilter, PointOwnerRow, PointRow, PointWithOwner,
};

#[async_trait]
pub trait PointRepo: Send + Sync {
    async fn create(&self, new: NewPoint) -> anyhow::Result<Point>;
    /// Every matching point with its owner, oldest first. Not paginated.
    async fn list(&self, filter: PointFilter) -> anyhow::Result<Vec<PointWithOwner>>;
}

#[derive(Clone)]
pub struct PgPointRepo {
    db: PgPool,
}

impl PgPointRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PointRepo for PgPointRepo {
    async fn create(&self, new: NewPoint) -> anyhow::Result<Point> {
        let row = sqlx::query_as::<_, PointRow>(
            r#"
            INSERT INTO points
                (name, street, neighborhood, city, latitude, longitude, cnpj, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, street, neighborhood, city, latitude, longitude, cnpj,
                owner_id, created_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.street)
        .bind(&new.neighborhood)
        .bind(&new.city)
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(new.kind.cnpj())
        .bind(new.owner_id)
        .fetch_one(&self.db)
        .await
        .context("insert point")?;
        Ok(row.into())
    }

    async fn list(&self, filter: PointFilter) -> anyhow::Result<Vec<PointWithOwner>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"
            SELECT p.id, p.name, p.street, p.neighborhood, p.city, p.latitude, p.longitude,
                   p.cnpj, p.owner_id, p.created_at,
                   a.name AS owner_name, a.email AS owner_email, a.cnpj AS owner_cnpj
            FROM points p
            JOIN accounts a ON a.id = p.owner_id
            "#,
        );
        match filter {
            PointFilter::All => {}
            PointFilter::RecyclingOnly => {
                qb.push(" WHERE p.cnpj IS NULL");
            }
            PointFilter::CompanyOnly => {
                qb.push(" WHERE p.cnpj IS NOT NULL");
            }
        }
        qb.push(" ORDER BY p.created_at ASC, p.id ASC");

        let rows = qb
            .build_query_as::<PointOwnerRow>()
            .fetch_all(&self.db)
            .await
            .with_context(|| format!("list points ({filter:?})"))?;
        Ok(rows.into_iter().map(PointWithOwner::from).collect())
    }
}
