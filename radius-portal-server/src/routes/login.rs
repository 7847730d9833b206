//! The login endpoint: RADIUS authentication, then `Filter-Id` authorization.

use std::fmt;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use radius_portal::{AuthStatus, ClientError};

use super::AppState;

const MISSING_CREDENTIALS_MESSAGE: &str = "Username and password are required.";
const REJECTED_MESSAGE: &str = "Invalid username or password.";
const TIMED_OUT_MESSAGE: &str = "Authentication server timed out. Please try again.";
const FAILED_MESSAGE: &str = "Authentication failed. Please try again.";
const UNENCODABLE_MESSAGE: &str = "Credentials could not be sent to the authentication server.";

/// Credentials & splash page parameters posted by the portal's login form.
///
/// Missing and `null` fields are both treated as absent.
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    /// The user's name.
    pub username: Option<String>,

    /// The user's password.
    pub password: Option<String>,

    /// URL the access point expects users to be sent to once authorized.
    pub grant_url: Option<String>,

    /// URL the user was originally trying to reach.
    pub continue_url: Option<String>,

    /// MAC address of the user's device.
    pub client_mac: Option<String>,

    /// IP address of the user's device.
    pub client_ip: Option<String>,

    /// MAC address of the access point.
    pub node_mac: Option<String>,
}

// manual impl so passwords don't end up in logs
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("grant_url", &self.grant_url)
            .field("continue_url", &self.continue_url)
            .field("client_mac", &self.client_mac)
            .field("client_ip", &self.client_ip)
            .field("node_mac", &self.node_mac)
            .finish()
    }
}

/// Whether an authenticated user passed the authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// The user's `Filter-Id` matched.
    Authorized,

    /// The user's `Filter-Id` was missing or didn't match.
    Unauthorized,
}

/// The authorization outcome, as reported to the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    /// Whether the user was authorized.
    pub status: ValidationStatus,

    /// The grant or deny message.
    pub message: String,
}

/// Body of every login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Whether the user may access the network.
    pub success: bool,

    /// Message to show the user.
    pub message: String,

    /// The `Filter-Id` the RADIUS server assigned, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_id: Option<String>,

    /// Where to send an authorized user's browser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    /// Outcome of the authorization check, present once the user authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,
}

impl LoginResponse {
    fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_owned(),
            filter_id: None,
            redirect_url: None,
            validation: None,
        }
    }
}

/// Handles `POST /api/login`.
///
/// Responds with 400 for missing credentials or an unreadable body, 401 when RADIUS authentication fails for any
/// reason, 403 when the user authenticated but isn't authorized, 500 when the credentials
/// can't be encoded into a request, and 200 otherwise.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> (StatusCode, Json<LoginResponse>) {
    // an unreadable body carries no usable credentials either
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(%rejection, "unreadable login body");
            return (
                StatusCode::BAD_REQUEST,
                Json(LoginResponse::failure(MISSING_CREDENTIALS_MESSAGE)),
            );
        }
    };

    let username = request.username.as_deref().filter(|username| !username.is_empty());
    let password = request.password.as_deref().filter(|password| !password.is_empty());
    let (Some(username), Some(password)) = (username, password) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(LoginResponse::failure(MISSING_CREDENTIALS_MESSAGE)),
        );
    };

    info!(
        user = %username,
        client_mac = request.client_mac.as_deref(),
        client_ip = request.client_ip.as_deref(),
        node_mac = request.node_mac.as_deref(),
        "login attempt"
    );

    let response = match state.client.authenticate(username, password).await {
        Ok(response) => response,

        Err(ClientError::TimedOut(timeout)) => {
            warn!(user = %username, ?timeout, "RADIUS server timed out");
            return (
                StatusCode::UNAUTHORIZED,
                Json(LoginResponse::failure(TIMED_OUT_MESSAGE)),
            );
        }

        Err(ClientError::SerializeError(error)) => {
            warn!(user = %username, %error, "credentials could not be encoded");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LoginResponse::failure(UNENCODABLE_MESSAGE)),
            );
        }

        Err(error) => {
            warn!(user = %username, %error, "RADIUS exchange failed");
            return (
                StatusCode::UNAUTHORIZED,
                Json(LoginResponse::failure(FAILED_MESSAGE)),
            );
        }
    };

    if response.status == AuthStatus::Reject {
        info!(user = %username, server_message = response.server_message.as_deref(), "rejected");
        let message = response.server_message.as_deref().unwrap_or(REJECTED_MESSAGE);
        return (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse::failure(message)),
        );
    }

    let decision = state.policy.authorize(&response.attributes);

    if decision.allowed {
        let redirect_url = redirect_url(
            request.grant_url.as_deref(),
            request.continue_url.as_deref(),
        );
        info!(user = %username, filter_id = decision.matched_value.as_deref(), "authorized");

        (
            StatusCode::OK,
            Json(LoginResponse {
                success: true,
                message: decision.message.clone(),
                filter_id: decision.matched_value,
                redirect_url,
                validation: Some(Validation {
                    status: ValidationStatus::Authorized,
                    message: decision.message,
                }),
            }),
        )
    } else {
        info!(user = %username, filter_id = decision.matched_value.as_deref(), "not authorized");

        (
            StatusCode::FORBIDDEN,
            Json(LoginResponse {
                success: false,
                message: decision.message.clone(),
                filter_id: decision.matched_value,
                redirect_url: None,
                validation: Some(Validation {
                    status: ValidationStatus::Unauthorized,
                    message: decision.message,
                }),
            }),
        )
    }
}

/// Appends the continue URL to the grant URL as its `continue_url` query parameter.
///
/// Returns `None` if either is missing or empty, or if the grant URL doesn't parse.
pub fn redirect_url(grant_url: Option<&str>, continue_url: Option<&str>) -> Option<String> {
    let grant_url = grant_url.filter(|url| !url.is_empty())?;
    let continue_url = continue_url.filter(|url| !url.is_empty())?;

    let mut url = match Url::parse(grant_url) {
        Ok(url) => url,
        Err(error) => {
            warn!(grant_url, %error, "ignoring invalid grant URL");
            return None;
        }
    };
    url.query_pairs_mut().append_pair("continue_url", continue_url);

    Some(url.into())
}
