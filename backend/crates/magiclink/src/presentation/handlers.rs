//! HTTP Handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use std::sync::Arc;

use crate::application::config::MagicLinkConfig;
use crate::application::{
    CheckSessionUseCase, IssueTokenInput, IssueTokenUseCase, ProvisionUseCase, RedeemTokenUseCase,
    WebhookEvent, clear_session, issue_session, verify_signature,
};
use crate::domain::repository::IdentityStore;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    IdentityWebhookRequest, IdentityWebhookResponse, LoginQuery, RequestLinkRequest,
    RequestLinkResponse, SessionStatusResponse,
};

/// Header carrying the webhook body signature (hex HMAC-SHA256)
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Where a redeemed login link lands
const DASHBOARD_PATH: &str = "/dashboard";
/// Where a failed redemption lands, with an `error` query parameter
const LOGIN_PATH: &str = "/auth/login";

/// Shared state for magic-link handlers
#[derive(Clone)]
pub struct MagicLinkState<S>
where
    S: IdentityStore + Clone + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<MagicLinkConfig>,
}

impl<S> MagicLinkState<S>
where
    S: IdentityStore + Clone + Send + Sync + 'static,
{
    pub fn new(store: S, config: MagicLinkConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Login (magic-link landing)
// ============================================================================

/// GET /login
///
/// Redeems the token from the link and answers with a redirect either way:
/// to the dashboard with the session cookie pair on success, back to the
/// login page with an error indicator on failure. No problem JSON here,
/// because the caller is a browser following an email link.
pub async fn login<S>(
    State(state): State<MagicLinkState<S>>,
    Query(query): Query<LoginQuery>,
) -> Response
where
    S: IdentityStore + Clone + Send + Sync + 'static,
{
    let use_case = RedeemTokenUseCase::new(state.store.clone());
    let presented = query.token.as_deref().unwrap_or_default();

    match use_case.execute(presented).await {
        Ok(identity) => {
            let cookies = issue_session(&state.config, &identity.email);

            tracing::info!(email = %identity.email, "Login link redeemed, session established");

            // AppendHeaders, not a plain header array: both Set-Cookie
            // values must survive, and insert-semantics would keep only
            // the last one.
            (
                AppendHeaders([
                    (header::SET_COOKIE, cookies.server),
                    (header::SET_COOKIE, cookies.client),
                ]),
                Redirect::to(DASHBOARD_PATH),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                email = query.email.as_deref().unwrap_or("-"),
                "Login link rejected"
            );
            Redirect::to(&format!("{}?error={}", LOGIN_PATH, e.redirect_indicator()))
                .into_response()
        }
    }
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /session
///
/// Re-validates the cookie against the live identity record; a revoked
/// account gets 401 here even while its cookie is unexpired.
pub async fn session_status<S>(
    State(state): State<MagicLinkState<S>>,
    headers: HeaderMap,
) -> AuthResult<Json<SessionStatusResponse>>
where
    S: IdentityStore + Clone + Send + Sync + 'static,
{
    let use_case = CheckSessionUseCase::new(state.store.clone(), state.config.clone());
    let identity = use_case.execute(&headers).await?;

    let account_status = identity.account_status().to_string();

    Ok(Json(SessionStatusResponse {
        authenticated: true,
        email: identity.email.as_str().to_string(),
        first_name: identity.first_name,
        last_name: identity.last_name,
        tier: identity.tier,
        account_status,
    }))
}

// ============================================================================
// Request Link
// ============================================================================

/// POST /auth/request-link
pub async fn request_link<S>(
    State(state): State<MagicLinkState<S>>,
    Json(req): Json<RequestLinkRequest>,
) -> AuthResult<Json<RequestLinkResponse>>
where
    S: IdentityStore + Clone + Send + Sync + 'static,
{
    let use_case = IssueTokenUseCase::new(state.store.clone(), state.config.clone());

    let output = use_case
        .execute(IssueTokenInput { email: req.email })
        .await?;

    // Delivery is the mailer collaborator's job; the link is only logged
    // at debug for local development.
    tracing::debug!(login_url = %output.login_url, "Handing login link to mailer");

    Ok(Json(RequestLinkResponse {
        success: true,
        message: format!("Login link sent to {}", output.email.as_str()),
    }))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /auth/logout
pub async fn logout<S>(State(state): State<MagicLinkState<S>>) -> impl IntoResponse
where
    S: IdentityStore + Clone + Send + Sync + 'static,
{
    let cookies = clear_session(&state.config);

    (
        StatusCode::NO_CONTENT,
        AppendHeaders([
            (header::SET_COOKIE, cookies.server),
            (header::SET_COOKIE, cookies.client),
        ]),
    )
}

// ============================================================================
// Identity Webhook
// ============================================================================

/// POST /webhooks/identity
///
/// Takes the raw body because the signature covers the exact bytes on the
/// wire; JSON parsing happens only after verification.
pub async fn identity_webhook<S>(
    State(state): State<MagicLinkState<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> AuthResult<Json<IdentityWebhookResponse>>
where
    S: IdentityStore + Clone + Send + Sync + 'static,
{
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::SignatureInvalid)?;

    verify_signature(&state.config.webhook_secret, &body, signature)?;

    let payload: IdentityWebhookRequest = serde_json::from_slice(&body)
        .map_err(|e| AuthError::MalformedPayload(e.to_string()))?;

    let email = payload.email.ok_or(AuthError::MissingField("email"))?;

    let use_case = ProvisionUseCase::new(state.store.clone(), state.config.clone());

    let output = use_case
        .execute(WebhookEvent {
            email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            tags: payload.tags,
            reissue_token: payload.reissue_token,
        })
        .await?;

    if let Some(issued) = &output.issued {
        tracing::debug!(login_url = %issued.login_url, "Handing provisioned login link to mailer");
    }

    Ok(Json(IdentityWebhookResponse {
        success: true,
        created: output.created,
        email: output.identity.email.as_str().to_string(),
        tier: output.identity.tier,
    }))
}
