//! Authentication extractors and session cookies.
//!
//! Sessions live in two HTTP-only cookies holding the access and refresh
//! JWTs. Protected handlers take `RequireAuth`; guests have no valid
//! access cookie and are rejected with a 401.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::error::AppError;
use crate::models::User;
use crate::services::auth::{AuthError, AuthService, SessionTokens};
use crate::state::AppState;

/// Cookie holding the access token.
pub const ACCESS_COOKIE: &str = "accessToken";

/// Cookie holding the refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Extractor that requires a logged-in account.
///
/// Rejects with a 401 JSON error if the access cookie is missing or does
/// not verify.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub User);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Auth(AuthError::MissingToken))?;

        let token = jar
            .get(ACCESS_COOKIE)
            .map(Cookie::value)
            .ok_or(AppError::Auth(AuthError::MissingToken))?;

        let auth = AuthService::new(state.pool(), state.tokens());
        let user = auth.authenticate(token).await?;

        Ok(Self(user))
    }
}

/// Add both session cookies to the jar.
#[must_use]
pub fn with_session_cookies(jar: CookieJar, state: &AppState, tokens: &SessionTokens) -> CookieJar {
    let access_max_age = time::Duration::seconds(state.tokens().access_ttl().num_seconds());
    let refresh_max_age = time::Duration::seconds(state.tokens().refresh_ttl().num_seconds());

    jar.add(session_cookie(
        state,
        ACCESS_COOKIE,
        tokens.access.clone(),
        access_max_age,
    ))
    .add(session_cookie(
        state,
        REFRESH_COOKIE,
        tokens.refresh.clone(),
        refresh_max_age,
    ))
}

/// Expire both session cookies (logout).
#[must_use]
pub fn without_session_cookies(jar: CookieJar, state: &AppState) -> CookieJar {
    let expired = time::Duration::ZERO;
    jar.add(session_cookie(state, ACCESS_COOKIE, String::new(), expired))
        .add(session_cookie(state, REFRESH_COOKIE, String::new(), expired))
}

fn session_cookie(
    state: &AppState,
    name: &'static str,
    value: String,
    max_age: time::Duration,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config().is_secure())
        .path("/")
        .max_age(max_age)
        .build()
}
