use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for both registration endpoints. Fields are optional so that
/// presence checks answer with the API's own error bodies.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub cnpj: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public part of an account returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicAccount {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterUserResponse {
    pub message: &'static str,
    pub user: PublicAccount,
}

#[derive(Debug, Serialize)]
pub struct RegisterCompanyResponse {
    pub message: &'static str,
    pub company: PublicAccount,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub is_company: bool,
}
