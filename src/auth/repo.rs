use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::{Account, AccountRow, NewAccount};

#[async_trait]
pub trait AccountRepo: Send + Sync {
    /// Insert an account. Fails when the email is already taken.
    async fn create(&self, new: NewAccount) -> anyhow::Result<Account>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Account>>;
}

#[derive(Clone)]
pub struct PgAccountRepo {
    db: PgPool,
}

impl PgAccountRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepo for PgAccountRepo {
    async fn create(&self, new: NewAccount) -> anyhow::Result<Account> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (name, email, password_hash, cnpj)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, cnpj
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.kind.cnpj())
        .fetch_one(&self.db)
        .await
        .context("insert account")?;
        Ok(row.into())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, name, email, password_hash, cnpj
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find account by email")?;
        Ok(row.map(Account::from))
    }
}
