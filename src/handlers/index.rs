use crate::error::VerseError;
use crate::middleware::PageContext;
use crate::router::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;

/// GET / -> home page context; 503 for non-admins while in maintenance mode.
pub async fn home(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<Response, VerseError> {
    let (ctx, jar) = PageContext::load(state.store.as_ref(), jar)?;
    let status = if ctx.blocked_by_maintenance() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    Ok((status, jar, Json(ctx)).into_response())
}
