use anyhow::Context;
use axum::extract::FromRef;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::{Account, AccountKind, NewAccount},
    },
    error::ApiError,
    state::AppState,
    validation::{normalize_email, present},
};

/// Which registration endpoint is being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registrant {
    Individual,
    Organization,
}

impl Registrant {
    pub fn failure(self) -> &'static str {
        match self {
            Registrant::Individual => "User registration failed",
            Registrant::Organization => "Company registration failed",
        }
    }
}

pub const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub is_organization: bool,
}

async fn hash_blocking(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("password hashing task")?
}

async fn verify_blocking(plain: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .context("password verification task")?
}

/// Hash the password and store a new account. The organization identifier is
/// checked before anything else for companies.
pub async fn register(
    state: &AppState,
    registrant: Registrant,
    req: RegisterRequest,
) -> Result<Account, ApiError> {
    let failure = registrant.failure();

    let kind = match registrant {
        Registrant::Individual => AccountKind::Individual,
        Registrant::Organization => match present(req.cnpj) {
            Some(cnpj) => AccountKind::Organization { cnpj },
            None => {
                warn!("company registration without cnpj");
                return Err(ApiError::validation("CNPJ is required for companies"));
            }
        },
    };

    let name = present(req.name).ok_or_else(|| ApiError::missing_field(failure, "name"))?;
    let email =
        normalize_email(req.email).ok_or_else(|| ApiError::missing_field(failure, "email"))?;
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::missing_field(failure, "password"))?;

    let password_hash = hash_blocking(password)
        .await
        .map_err(|e| ApiError::rejected(failure, &e))?;

    let account = state
        .accounts
        .create(NewAccount {
            name,
            email,
            password_hash,
            kind,
        })
        .await
        .map_err(|e| {
            warn!(error = %e, "create account failed");
            ApiError::rejected(failure, &e)
        })?;

    info!(
        account_id = %account.id,
        name = %account.name,
        email = %account.email,
        organization = account.kind.is_organization(),
        "account registered"
    );
    Ok(account)
}

/// Check credentials and issue a token. Unknown emails and wrong passwords
/// fail with different errors.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<LoginOutcome, ApiError> {
    let (Some(email), Some(password)) = (
        normalize_email(req.email),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::validation("Email and password are required"));
    };

    let account = match state.accounts.find_by_email(&email).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            warn!(%email, "login unknown email");
            return Err(ApiError::NotFound("User not found".into()));
        }
        Err(e) => return Err(ApiError::internal(LOGIN_FAILED, &e)),
    };

    let ok = verify_blocking(password, account.password_hash.clone())
        .await
        .map_err(|e| ApiError::internal(LOGIN_FAILED, &e))?;
    if !ok {
        warn!(%email, account_id = %account.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let token = JwtKeys::from_ref(state)
        .sign(&account)
        .map_err(|e| ApiError::internal(LOGIN_FAILED, &e))?;

    info!(account_id = %account.id, "account logged in");
    Ok(LoginOutcome {
        token,
        is_organization: account.kind.is_organization(),
    })
}
