use axum::{
	Json, Router,
	extract::{Extension, Path, Query, State},
	http::{HeaderMap, StatusCode, header::SET_COOKIE},
	middleware,
	response::{AppendHeaders, IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use trail_domain::{Item, filter::ActivityFilter};
use trail_service::{
	BulkInsertRequest, BulkInsertResponse, CreateUserRequest, Error, FilterResponse,
	PagedListRequest, PagedListResponse, PatchedUser, ReplacedUser, SearchRecordsRequest,
	SearchRecordsResponse, SessionClaims, SyncReport, TimeListRequest, TimeListResponse,
	UpdateUserRequest,
	session::{ACCESS_COOKIE, REFRESH_COOKIE},
};

use crate::{
	auth::{self, cleared_cookie, read_cookie, session_cookie},
	state::AppState,
};

pub fn router(state: AppState) -> Router {
	let api = Router::new()
		.route("/dynamo", get(list_by_time))
		.route("/dynamo/filter", get(filter_records))
		.route("/dynamo/records", get(list_paged))
		.route("/dynamo/bulk", post(bulk_insert))
		.route("/typesense/typesense-index", post(sync_index))
		.route("/typesense/typesense-records", get(latest_records))
		.route("/typesense/records", get(search_records))
		.route("/users", get(list_users).post(create_user))
		.route("/users/{id}", get(get_user).put(replace_user).patch(patch_user))
		.route_layer(middleware::from_fn_with_state(state.clone(), auth::require_session));

	Router::new()
		.route("/health", get(health))
		.route("/test", get(deployment_probe))
		.route("/login", post(login))
		.route("/logout", post(logout))
		.route("/refresh", post(refresh))
		.nest("/api", api)
		.with_state(state)
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
	username: String,
	password: String,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
	message: String,
}
impl MessageResponse {
	fn new(message: impl Into<String>) -> Json<Self> {
		Json(Self { message: message.into() })
	}
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn deployment_probe() -> Json<serde_json::Value> {
	Json(serde_json::json!({ "number": "001" }))
}

async fn login(
	State(state): State<AppState>,
	Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
	let tokens = state.service.login(&payload.username, &payload.password)?;
	let auth = &state.service.cfg.auth;
	let cookies = AppendHeaders([
		(
			SET_COOKIE,
			session_cookie(
				ACCESS_COOKIE,
				&tokens.access_token,
				auth.access_ttl_seconds,
				auth.secure_cookies,
			),
		),
		(
			SET_COOKIE,
			session_cookie(
				REFRESH_COOKIE,
				&tokens.refresh_token,
				auth.refresh_ttl_seconds,
				auth.secure_cookies,
			),
		),
	]);

	tracing::info!(username = %payload.username, "Logged in.");

	Ok((cookies, MessageResponse::new("Logged in successfully.")).into_response())
}

async fn logout(State(state): State<AppState>) -> Response {
	let cookie = cleared_cookie(ACCESS_COOKIE, state.service.cfg.auth.secure_cookies);

	(AppendHeaders([(SET_COOKIE, cookie)]), MessageResponse::new("Logged out successfully."))
		.into_response()
}

async fn refresh(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Response, ApiError> {
	let access_token = state.service.refresh(read_cookie(&headers, REFRESH_COOKIE))?;
	let auth = &state.service.cfg.auth;
	let cookie =
		session_cookie(ACCESS_COOKIE, &access_token, auth.access_ttl_seconds, auth.secure_cookies);

	Ok((AppendHeaders([(SET_COOKIE, cookie)]), MessageResponse::new("Token refreshed."))
		.into_response())
}

async fn list_by_time(
	State(state): State<AppState>,
	Query(query): Query<TimeListRequest>,
) -> Result<Json<TimeListResponse>, ApiError> {
	let response = state.service.list_by_time(query).await?;

	Ok(Json(response))
}

async fn filter_records(
	State(state): State<AppState>,
	Query(query): Query<ActivityFilter>,
) -> Result<Json<FilterResponse>, ApiError> {
	let response = state.service.filter_records(query).await?;

	Ok(Json(response))
}

async fn list_paged(
	State(state): State<AppState>,
	Query(query): Query<PagedListRequest>,
) -> Result<Json<PagedListResponse>, ApiError> {
	let response = state.service.list_paged(query).await?;

	Ok(Json(response))
}

async fn bulk_insert(
	State(state): State<AppState>,
	Extension(claims): Extension<SessionClaims>,
	Query(query): Query<BulkInsertRequest>,
) -> Result<(StatusCode, Json<BulkInsertResponse>), ApiError> {
	tracing::info!(username = %claims.username, count = ?query.count, "Bulk insert requested.");

	let response = state.service.bulk_insert(query).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn sync_index(
	State(state): State<AppState>,
	Extension(claims): Extension<SessionClaims>,
) -> Result<Json<SyncReport>, ApiError> {
	tracing::info!(username = %claims.username, "Index sync requested.");

	let response = state.service.sync_index().await?;

	Ok(Json(response))
}

async fn latest_records(
	State(state): State<AppState>,
) -> Result<Json<trail_search::SearchResponse>, ApiError> {
	let response = state.service.latest_records().await?;

	Ok(Json(response))
}

async fn search_records(
	State(state): State<AppState>,
	Query(query): Query<SearchRecordsRequest>,
) -> Result<Json<SearchRecordsResponse>, ApiError> {
	let response = state.service.search_records(query).await?;

	Ok(Json(response))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
	let response = state.service.list_users().await?;

	Ok(Json(response))
}

async fn get_user(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
	let response = state.service.get_user(&id).await?;

	Ok(Json(response))
}

async fn create_user(
	State(state): State<AppState>,
	Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
	state.service.create_user(payload).await?;

	Ok((StatusCode::CREATED, MessageResponse::new("User created successfully.")))
}

async fn replace_user(
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ReplacedUser>, ApiError> {
	let response = state.service.replace_user(&id, payload).await?;

	Ok(Json(response))
}

async fn patch_user(
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<PatchedUser>, ApiError> {
	let response = state.service.patch_user(&id, payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None),
			Error::Unauthorized { message } =>
				ApiError::new(StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", message, None),
			Error::AccessDenied { message } =>
				ApiError::new(StatusCode::FORBIDDEN, "ACCESS_DENIED", message, None),
			Error::NotFound { message } =>
				ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Activity store request failed.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"STORAGE_ERROR",
					"Failed to reach the record store.",
					None,
				)
			},
			Error::Search { message } => {
				tracing::error!(error = %message, "Search index request failed.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"SEARCH_ERROR",
					"Failed to reach the search index.",
					None,
				)
			},
			err @ Error::SyncFailed { .. } =>
				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "SYNC_FAILED", err.to_string(), None),
			err @ Error::Manifest { .. } => {
				tracing::error!(error = %err, "Failure manifest was not written.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"MANIFEST_ERROR",
					err.to_string(),
					None,
				)
			},
			Error::Session { message } => {
				tracing::error!(error = %message, "Session token signing failed.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"SESSION_ERROR",
					"Failed to issue session.",
					None,
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
