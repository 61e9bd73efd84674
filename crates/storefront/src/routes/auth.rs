//! Auth route handlers.
//!
//! Sessions are delivered as HTTP-only cookies; the response bodies carry
//! the public user view only. Login additionally resolves the one-shot
//! guest cart merge and returns the resulting cart.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;

use volt_core::LineItem;
use volt_core::api::{Ack, LoginRequest, LoginResponse, RegisterRequest, UserResponse};

use crate::db::carts::CartRepository;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{REFRESH_COOKIE, with_session_cookies, without_session_cookies};
use crate::middleware::RequireAuth;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<UserResponse>)> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, tokens) = auth.register(&req.name, &req.email, &req.password).await?;

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "account registered");

    let jar = with_session_cookies(jar, &state, &tokens);
    Ok((
        jar,
        Json(UserResponse {
            success: true,
            user: (&user).into(),
        }),
    ))
}

/// `POST /auth/login`
///
/// The guest cart in the request body is merged into the server cart only
/// when the server cart is empty and the guest cart is not; otherwise the
/// server cart stands. Either way the response carries the cart the
/// client should adopt.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, tokens) = auth.login(&req.email, &req.password).await?;

    let carts = CartRepository::new(state.pool());
    let server_cart = carts.get_or_create(user.id).await?;

    // Guest items are subject to the same validation as /cart/add: lines
    // with a negative captured price or no quantity never get persisted.
    let valid_items: Vec<LineItem> = req
        .local_cart
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter(|i| i.quantity > 0 && !i.price_at_time.is_sign_negative())
        .cloned()
        .collect();

    let cart = if server_cart.items.is_empty() && !valid_items.is_empty() {
        tracing::info!(user_id = %user.id, items = valid_items.len(), "merging guest cart");
        carts.replace_items(user.id, &valid_items).await?
    } else {
        server_cart
    };

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "login");

    let jar = with_session_cookies(jar, &state, &tokens);
    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            user: (&user).into(),
            cart: cart.into(),
        }),
    ))
}

/// `POST /auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Ack>)> {
    let auth = AuthService::new(state.pool(), state.tokens());
    auth.logout(user.id).await?;

    clear_sentry_user();
    tracing::info!(user_id = %user.id, "logout");

    let jar = without_session_cookies(jar, &state);
    Ok((jar, Json(Ack::ok())))
}

/// `POST /auth/refresh`
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<UserResponse>)> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(Cookie::value)
        .ok_or(AppError::Auth(AuthError::MissingToken))?
        .to_owned();

    let auth = AuthService::new(state.pool(), state.tokens());
    let (user, tokens) = auth.refresh(&token).await?;

    let jar = with_session_cookies(jar, &state, &tokens);
    Ok((
        jar,
        Json(UserResponse {
            success: true,
            user: (&user).into(),
        }),
    ))
}

/// `GET /auth/me`
pub async fn me(RequireAuth(user): RequireAuth) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        user: (&user).into(),
    })
}
