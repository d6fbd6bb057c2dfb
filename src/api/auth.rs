//! Auth endpoints (login, register)

use serde::{Deserialize, Serialize};

use crate::error::{Operation, Result};
use crate::models::User;

use super::{Client, decode};

/// Successful login payload: the user plus the session bearer token
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    /// The authenticated user
    pub user: User,
    /// Bearer token for subsequent requests
    pub token: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl Client {
    /// Log in with email and password.
    ///
    /// Returns the user and token; installing the token on the client is the
    /// caller's decision ([`Client::set_token`]).
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let response = self
            .http
            .post(self.api_url("/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        decode::<AuthSession>(Operation::Login, response)
            .await?
            .data()
    }

    /// Register a new account; returns the server's confirmation message
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<String> {
        let response = self
            .http
            .post(self.api_url("/auth/register"))
            .json(&RegisterRequest {
                name,
                email,
                password,
            })
            .send()
            .await?;

        let envelope = decode::<serde_json::Value>(Operation::Register, response).await?;
        Ok(envelope.message)
    }
}
