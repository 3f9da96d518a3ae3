use crate::db::{Role, User};
use crate::error::VerseError;
use crate::router::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

pub const SESSION_COOKIE: &str = "animeverse_session";
pub const FLASH_COOKIE: &str = "animeverse_flash";

/// Sessions last 24 hours from login.
const SESSION_MAX_AGE: Duration = Duration::hours(24);

/// Identity carried in the encrypted session cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: u64,
    pub username: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

pub fn current_user(jar: &PrivateCookieJar) -> Option<SessionUser> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok())
}

pub fn start_session(
    jar: PrivateCookieJar,
    user: &SessionUser,
) -> Result<PrivateCookieJar, VerseError> {
    let value = serde_json::to_string(user)?;
    Ok(jar.add(build_cookie(SESSION_COOKIE, value, Some(SESSION_MAX_AGE))))
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie(SESSION_COOKIE))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    ErrorMsg,
    Error,
}

/// One-shot messages shown on the next rendered page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Flash {
    pub success_msg: Vec<String>,
    pub error_msg: Vec<String>,
    pub error: Vec<String>,
}

impl Flash {
    pub fn push(&mut self, kind: FlashKind, message: impl Into<String>) {
        let bucket = match kind {
            FlashKind::Success => &mut self.success_msg,
            FlashKind::ErrorMsg => &mut self.error_msg,
            FlashKind::Error => &mut self.error,
        };
        bucket.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.success_msg.is_empty() && self.error_msg.is_empty() && self.error.is_empty()
    }
}

fn peek_flash(jar: &PrivateCookieJar) -> Flash {
    jar.get(FLASH_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok())
        .unwrap_or_default()
}

pub fn push_flash(
    jar: PrivateCookieJar,
    kind: FlashKind,
    message: impl Into<String>,
) -> PrivateCookieJar {
    let mut flash = peek_flash(&jar);
    flash.push(kind, message);
    match serde_json::to_string(&flash) {
        Ok(value) => jar.add(build_cookie(FLASH_COOKIE, value, None)),
        Err(_) => jar,
    }
}

/// Read and clear pending flash messages.
pub fn take_flash(jar: PrivateCookieJar) -> (Flash, PrivateCookieJar) {
    let flash = peek_flash(&jar);
    if jar.get(FLASH_COOKIE).is_none() {
        return (flash, jar);
    }
    (flash, jar.remove(clear_cookie(FLASH_COOKIE)))
}

/// Logged-in administrator. Anyone else is sent to the login page.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub SessionUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };
        match current_user(&jar) {
            Some(user) if user.is_admin() => Ok(Self(user)),
            _ => {
                let jar =
                    push_flash(jar, FlashKind::ErrorMsg, "Please log in as an administrator");
                Err((jar, Redirect::to("/auth/login")).into_response())
            }
        }
    }
}

fn build_cookie(name: &str, value: String, max_age: Option<Duration>) -> Cookie<'static> {
    let builder = Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    match max_age {
        Some(age) => builder.max_age(age).build(),
        None => builder.build(),
    }
}

fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_buckets_follow_kind() {
        let mut flash = Flash::default();
        assert!(flash.is_empty());

        flash.push(FlashKind::Success, "saved");
        flash.push(FlashKind::ErrorMsg, "bad input");
        assert_eq!(flash.success_msg, vec!["saved"]);
        assert_eq!(flash.error_msg, vec!["bad input"]);
        assert!(flash.error.is_empty());
    }

    #[test]
    fn session_user_from_record() {
        let user = User::admin(1, "root_admin", "hash".to_string());
        let session = SessionUser::from(&user);
        assert!(session.is_admin());
        assert_eq!(session.username, "root_admin");
    }
}
