use axum::{
	body::Body,
	extract::State,
	http::{HeaderMap, Request, header::COOKIE},
	middleware::Next,
	response::{IntoResponse, Response},
};

use trail_service::session::ACCESS_COOKIE;

use crate::{routes::ApiError, state::AppState};

/// Rejects requests without a valid access cookie before they reach a handler. Verified claims
/// are stored as a request extension.
pub async fn require_session(
	State(state): State<AppState>,
	mut req: Request<Body>,
	next: Next,
) -> Response {
	let claims = state.service.verify_access(read_cookie(req.headers(), ACCESS_COOKIE));

	match claims {
		Ok(claims) => {
			req.extensions_mut().insert(claims);

			next.run(req).await
		},
		Err(err) => ApiError::from(err).into_response(),
	}
}

pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
	headers
		.get_all(COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|raw| raw.split(';'))
		.filter_map(|pair| pair.trim().split_once('='))
		.find(|(key, _)| *key == name)
		.map(|(_, value)| value.trim())
		.filter(|value| !value.is_empty())
}

pub fn session_cookie(name: &str, value: &str, max_age_seconds: i64, secure: bool) -> String {
	let mut cookie =
		format!("{name}={value}; Max-Age={max_age_seconds}; Path=/; HttpOnly; SameSite=Lax");

	if secure {
		cookie.push_str("; Secure");
	}

	cookie
}

pub fn cleared_cookie(name: &str, secure: bool) -> String {
	session_cookie(name, "", 0, secure)
}
