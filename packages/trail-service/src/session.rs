//! Cookie session tokens.
//!
//! Access and refresh tokens are HS256 JWTs signed with separate secrets. Both carry the account
//! id and username so a refresh can mint a new access token without consulting the account list.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, Result, TrailService};

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
	pub id: u64,
	pub username: String,
	pub iat: i64,
	pub exp: i64,
}

#[derive(Clone, Debug)]
pub struct SessionTokens {
	pub access_token: String,
	pub refresh_token: String,
}

impl TrailService {
	pub fn login(&self, username: &str, password: &str) -> Result<SessionTokens> {
		let Some(account) = self
			.cfg
			.auth
			.accounts
			.iter()
			.find(|account| account.username == username && account.password == password)
		else {
			tracing::info!(%username, "Rejected login.");

			return Err(Error::Unauthorized { message: "Invalid credentials.".to_string() });
		};
		let auth = &self.cfg.auth;

		Ok(SessionTokens {
			access_token: sign(
				account.id,
				&account.username,
				auth.access_ttl_seconds,
				&auth.access_token_secret,
			)?,
			refresh_token: sign(
				account.id,
				&account.username,
				auth.refresh_ttl_seconds,
				&auth.refresh_token_secret,
			)?,
		})
	}

	/// Exchanges a refresh token for a new access token.
	pub fn refresh(&self, refresh_token: Option<&str>) -> Result<String> {
		let Some(token) = refresh_token.filter(|token| !token.is_empty()) else {
			return Err(Error::AccessDenied { message: "No refresh token.".to_string() });
		};
		let auth = &self.cfg.auth;
		let claims = verify(token, &auth.refresh_token_secret)
			.map_err(|_| Error::AccessDenied { message: "Invalid refresh token.".to_string() })?;

		sign(claims.id, &claims.username, auth.access_ttl_seconds, &auth.access_token_secret)
	}

	pub fn verify_access(&self, access_token: Option<&str>) -> Result<SessionClaims> {
		let Some(token) = access_token.filter(|token| !token.is_empty()) else {
			return Err(Error::AccessDenied {
				message: "Access denied. No token provided.".to_string(),
			});
		};

		verify(token, &self.cfg.auth.access_token_secret)
			.map_err(|_| Error::AccessDenied { message: "Invalid token.".to_string() })
	}
}

fn sign(id: u64, username: &str, ttl_seconds: i64, secret: &str) -> Result<String> {
	let iat = OffsetDateTime::now_utc().unix_timestamp();
	let claims = SessionClaims { id, username: username.to_string(), iat, exp: iat + ttl_seconds };

	encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
		.map_err(|err| Error::Session { message: err.to_string() })
}

fn verify(token: &str, secret: &str) -> jsonwebtoken::errors::Result<SessionClaims> {
	let mut validation = Validation::new(Algorithm::HS256);

	validation.leeway = 0;

	Ok(decode::<SessionClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)?
		.claims)
}
