use crate::db::{SeedDocument, User, read_list};
use crate::error::VerseError;
use crate::middleware::session::{self, FlashKind, SessionUser};
use crate::middleware::PageContext;
use crate::router::AppState;
use crate::service::password::verify_password_blocking;
use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /auth/login
pub async fn login_page(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<Response, VerseError> {
    let (ctx, jar) = PageContext::load(state.store.as_ref(), jar)?;
    Ok((jar, Json(ctx)).into_response())
}

/// POST /auth/login -> starts a session and redirects by role.
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, VerseError> {
    match authenticate(&state, &form).await {
        Ok(user) => {
            let target = if user.is_admin() { "/admin" } else { "/" };
            let session_user = SessionUser::from(&user);
            let jar = session::start_session(jar, &session_user)?;
            let jar = session::push_flash(jar, FlashKind::Success, "You are now logged in");
            info!(username = %user.username, "user logged in");
            Ok((jar, Redirect::to(target)).into_response())
        }
        Err(VerseError::InvalidCredentials) => {
            warn!(username = %form.username, "rejected login");
            let jar =
                session::push_flash(jar, FlashKind::ErrorMsg, "Invalid username or password");
            Ok((jar, Redirect::to("/auth/login")).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /auth/logout
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    let jar = session::end_session(jar);
    let jar = session::push_flash(jar, FlashKind::Success, "You are logged out");
    (jar, Redirect::to("/"))
}

async fn authenticate(state: &AppState, form: &LoginForm) -> Result<User, VerseError> {
    let name = SeedDocument::Users.file_name();
    let records = read_list(state.store.as_ref(), name)?;
    let users: Vec<User> =
        serde_json::from_value(Value::Array(records)).map_err(|e| VerseError::parse(name, e))?;

    let Some(user) = users.into_iter().find(|u| u.username == form.username) else {
        return Err(VerseError::InvalidCredentials);
    };

    match verify_password_blocking(&form.password, &user.password_hash).await {
        Ok(true) => Ok(user),
        Ok(false) => Err(VerseError::InvalidCredentials),
        Err(VerseError::PasswordHash(reason)) => {
            warn!(username = %user.username, %reason, "stored password hash is unusable");
            Err(VerseError::InvalidCredentials)
        }
        Err(e) => Err(e),
    }
}
