use sqlx::FromRow;
use uuid::Uuid;

/// Whether an account is a person or an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountKind {
    Individual,
    Organization { cnpj: String },
}

impl AccountKind {
    pub fn from_cnpj(cnpj: Option<String>) -> Self {
        match cnpj {
            Some(cnpj) => AccountKind::Organization { cnpj },
            None => AccountKind::Individual,
        }
    }

    pub fn cnpj(&self) -> Option<&str> {
        match self {
            AccountKind::Individual => None,
            AccountKind::Organization { cnpj } => Some(cnpj),
        }
    }

    pub fn is_organization(&self) -> bool {
        matches!(self, AccountKind::Organization { .. })
    }
}

/// Account as the services see it.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String, // Argon2 PHC string
    pub kind: AccountKind,
}

/// Row in the `accounts` table.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub cnpj: Option<String>,
}

impl From<AccountRow> for Account {
    fn from(r: AccountRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            password_hash: r.password_hash,
            kind: AccountKind::from_cnpj(r.cnpj),
        }
    }
}

/// Insert payload; `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub kind: AccountKind,
}
