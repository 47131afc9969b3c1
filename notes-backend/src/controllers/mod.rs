//! HTTP handlers. Each submodule exposes a `config` function registering its routes.

pub mod auth;
pub mod health;
pub mod notes;
pub mod pages;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder, web};

use crate::AppState;
use crate::models::Session;
use crate::sessions::SESSION_COOKIE;

pub const HX_REQUEST: &str = "HX-Request";
pub const HX_REDIRECT: &str = "HX-Redirect";
pub const HX_TRIGGER: &str = "HX-Trigger";

fn is_htmx(req: &HttpRequest) -> bool {
    req.headers()
        .get(HX_REQUEST)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Send the browser to `location`. htmx requests get `200` + `HX-Redirect`,
/// plain navigation gets `303 See Other`.
pub(crate) fn redirect(req: &HttpRequest, location: &str) -> HttpResponseBuilder {
    if is_htmx(req) {
        let mut builder = HttpResponse::Ok();
        builder.insert_header((HX_REDIRECT, location));
        builder
    } else {
        let mut builder = HttpResponse::SeeOther();
        builder.insert_header((header::LOCATION, location));
        builder
    }
}

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// HTML response that also renews the session cookie
pub(crate) fn html_with_cookie(body: String, cookie: Cookie<'static>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cookie)
        .content_type(ContentType::html())
        .body(body)
}

pub(crate) fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type(ContentType::plaintext())
        .body("Internal Server Error")
}

pub(crate) fn session_cookie(token: &str, ttl: chrono::Duration) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(actix_web::cookie::time::Duration::seconds(ttl.num_seconds()))
        .finish()
}

pub(crate) fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}

/// A resolved session and the cookie carrying its renewed lifetime back to the browser
pub(crate) struct ActiveSession {
    pub session: Session,
    pub cookie: Cookie<'static>,
}

/// Resolve the session cookie, or produce the response that sends the visitor to `/`.
pub(crate) fn session_from_request(
    state: &web::Data<AppState>,
    req: &HttpRequest,
) -> Result<ActiveSession, HttpResponse> {
    let Some(cookie) = req.cookie(SESSION_COOKIE) else {
        return Err(redirect(req, "/").finish());
    };

    match state.sessions.resolve(cookie.value()) {
        Ok(Some(session)) => {
            let cookie = session_cookie(&session.token, state.sessions.ttl());
            Ok(ActiveSession { session, cookie })
        }
        Ok(None) => Err(redirect(req, "/").cookie(removal_cookie()).finish()),
        Err(e) => {
            log::error!("Session validation error: {}", e);
            Err(internal_error())
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::web;
    use std::sync::Arc;

    use crate::AppState;
    use crate::config::Config;
    use crate::db::sqlite::test_database;

    /// Application state over a throwaway database holding only the default account.
    /// Returns the default account's id.
    pub fn test_state() -> (tempfile::TempDir, web::Data<AppState>, i64) {
        let (dir, db) = test_database();
        let user_id = db.seed_defaults(false).unwrap();
        let state = AppState::new(Arc::new(db), &Config::default());
        (dir, web::Data::new(state), user_id)
    }
}
