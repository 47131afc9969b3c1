//! Login, signup and logout. Failures answer with the login form fragment and
//! an `HX-Trigger: login-error` event, never with an error status.

use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;

use super::{HX_REDIRECT, HX_TRIGGER, redirect, removal_cookie, session_cookie};
use crate::AppState;
use crate::error::DbError;
use crate::sessions::SESSION_COOKIE;
use crate::views::{self, messages};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/signup").route(web::post().to(signup)))
        .service(web::resource("/logout").route(web::post().to(logout)));
}

#[derive(Debug, Deserialize)]
struct CredentialsForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

fn login_error(message: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .insert_header((HX_TRIGGER, "login-error"))
        .body(views::login_form(Some(message)))
}

/// Open a session for `user_id` and point the client at the notes page
fn start_session(data: &web::Data<AppState>, user_id: i64) -> HttpResponse {
    match data.sessions.start(user_id) {
        Ok(session) => HttpResponse::Ok()
            .cookie(session_cookie(&session.token, data.sessions.ttl()))
            .insert_header((HX_REDIRECT, "/notes"))
            .finish(),
        Err(e) => {
            log::error!("Failed to start session: {}", e);
            login_error(messages::SERVER_ERROR)
        }
    }
}

async fn login(data: web::Data<AppState>, form: web::Form<CredentialsForm>) -> impl Responder {
    match data
        .db
        .find_user_by_credentials(&form.username, &form.password)
    {
        Ok(Some(user)) => {
            log::info!("[AUTH] User {} logged in", user.id);
            start_session(&data, user.id)
        }
        Ok(None) => {
            log::info!("[AUTH] Rejected login for {:?}", form.username);
            login_error(messages::INVALID_CREDENTIALS)
        }
        Err(e) => {
            log::error!("Failed to check credentials: {}", e);
            login_error(messages::SERVER_ERROR)
        }
    }
}

async fn signup(data: web::Data<AppState>, form: web::Form<CredentialsForm>) -> impl Responder {
    let CredentialsForm { username, password } = form.into_inner();

    if username.trim().is_empty() || password.is_empty() {
        return login_error(messages::EMPTY_CREDENTIALS);
    }

    match data.db.username_exists(&username) {
        Ok(true) => return login_error(messages::USERNAME_TAKEN),
        Ok(false) => {}
        Err(e) => {
            log::error!("Failed to check username: {}", e);
            return login_error(messages::SERVER_ERROR);
        }
    }

    // A concurrent signup can still win the race; the UNIQUE constraint catches it
    match data.db.create_user(&username, &password) {
        Ok(user) => {
            log::info!("[AUTH] Created account {} ({:?})", user.id, user.username);
            start_session(&data, user.id)
        }
        Err(DbError::UsernameTaken(_)) => login_error(messages::USERNAME_TAKEN),
        Err(e) => {
            log::error!("Failed to create user: {}", e);
            login_error(messages::SERVER_ERROR)
        }
    }
}

async fn logout(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        match data.sessions.end(cookie.value()) {
            Ok(true) => log::info!("[AUTH] Session closed"),
            Ok(false) => {}
            Err(e) => log::error!("Failed to delete session: {}", e),
        }
    }

    redirect(&req, "/").cookie(removal_cookie()).finish()
}
