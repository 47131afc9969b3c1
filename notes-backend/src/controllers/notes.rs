//! Notes page, filter fragment and add-note endpoint. Every route needs a session.

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;

use super::{ActiveSession, html_with_cookie, internal_error, session_from_request};
use crate::AppState;
use crate::error::ValidationError;
use crate::models::{LEGACY_NOTE_TITLE, NewNote};
use crate::views;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/notes").route(web::get().to(notes_page)))
        .service(web::resource("/add-note").route(web::post().to(add_note)))
        .service(
            web::resource("/filter-notes")
                .route(web::get().to(filter_notes_query))
                .route(web::post().to(filter_notes_form)),
        );
}

async fn notes_page(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let ActiveSession { session, cookie } = match session_from_request(&data, &req) {
        Ok(active) => active,
        Err(resp) => return resp,
    };

    match data.db.list_notes(session.user_id) {
        Ok(notes) => html_with_cookie(views::notes_page(&notes), cookie),
        Err(e) => {
            log::error!("Failed to list notes: {}", e);
            internal_error()
        }
    }
}

// --- Filter ---

#[derive(Debug, Deserialize)]
struct FilterParams {
    #[serde(rename = "filter-text", default)]
    filter_text: String,
}

async fn filter_notes_query(
    data: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<FilterParams>,
) -> impl Responder {
    filter_notes(&data, &req, &query.filter_text)
}

async fn filter_notes_form(
    data: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<FilterParams>,
) -> impl Responder {
    filter_notes(&data, &req, &form.filter_text)
}

fn filter_notes(data: &web::Data<AppState>, req: &HttpRequest, text: &str) -> HttpResponse {
    let ActiveSession { session, cookie } = match session_from_request(data, req) {
        Ok(active) => active,
        Err(resp) => return resp,
    };

    match data.db.filter_notes(session.user_id, text) {
        Ok(notes) => html_with_cookie(views::notes_column(&notes), cookie),
        Err(e) => {
            log::error!("Failed to filter notes: {}", e);
            internal_error()
        }
    }
}

// --- Add ---

/// Either `title` + `content`, or the single `noteContent` field older pages send
#[derive(Debug, Deserialize)]
struct AddNoteForm {
    title: Option<String>,
    content: Option<String>,
    #[serde(rename = "noteContent")]
    note_content: Option<String>,
}

impl AddNoteForm {
    fn into_new_note(self) -> Result<NewNote, ValidationError> {
        match (self.title, self.content, self.note_content) {
            (None, None, Some(legacy)) => NewNote::new(LEGACY_NOTE_TITLE, &legacy),
            (title, content, _) => NewNote::new(
                title.as_deref().unwrap_or_default(),
                content.as_deref().unwrap_or_default(),
            ),
        }
    }
}

async fn add_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<AddNoteForm>,
) -> impl Responder {
    let ActiveSession { session, cookie } = match session_from_request(&data, &req) {
        Ok(active) => active,
        Err(resp) => return resp,
    };

    let new_note = match form.into_inner().into_new_note() {
        Ok(note) => note,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };

    match data.db.add_note(session.user_id, &new_note) {
        Ok(note) => {
            log::debug!("[NOTES] User {} added note {}", session.user_id, note.id);
            html_with_cookie(views::note_article(&note), cookie)
        }
        Err(e) => {
            log::error!("Failed to add note: {}", e);
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support::test_state;
    use crate::controllers::{HX_REDIRECT, HX_REQUEST};
    use crate::sessions::SESSION_COOKIE;
    use actix_web::cookie::Cookie;
    use actix_web::http::header;
    use actix_web::{App, test};

    fn login(data: &web::Data<AppState>, user_id: i64) -> Cookie<'static> {
        let session = data.sessions.start(user_id).unwrap();
        Cookie::new(SESSION_COOKIE, session.token)
    }

    fn response_cookie(resp: &actix_web::dev::ServiceResponse) -> Option<Cookie<'static>> {
        resp.response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.into_owned())
    }

    async fn body_text(resp: actix_web::dev::ServiceResponse) -> String {
        let body = test::read_body(resp).await;
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[actix_web::test]
    async fn test_routes_redirect_without_session() {
        let (_dir, state, user_id) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::get().uri("/notes").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 303);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");

        let req = test::TestRequest::post()
            .uri("/filter-notes")
            .insert_header((HX_REQUEST, "true"))
            .set_form([("filter-text", "")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get(HX_REDIRECT).unwrap(), "/");

        let req = test::TestRequest::post()
            .uri("/add-note")
            .cookie(Cookie::new(SESSION_COOKIE, "stale-token"))
            .set_form([("title", "t"), ("content", "c")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 303);
        let cleared = response_cookie(&resp).expect("stale cookie is cleared");
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
        assert!(state.db.list_notes(user_id).unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_expired_session_is_sent_back_to_login() {
        let (_dir, state, user_id) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;
        let expired = state
            .db
            .create_session(user_id, chrono::Duration::hours(-1))
            .unwrap();

        let req = test::TestRequest::get()
            .uri("/notes")
            .cookie(Cookie::new(SESSION_COOKIE, expired.token))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 303);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
        assert_eq!(response_cookie(&resp).unwrap().value(), "");
    }

    #[actix_web::test]
    async fn test_active_session_renews_cookie() {
        let (_dir, state, user_id) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;
        let cookie = login(&state, user_id);
        let ttl_seconds = state.sessions.ttl().num_seconds();

        let req = test::TestRequest::get()
            .uri("/notes")
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let renewed = response_cookie(&resp).expect("session cookie renewed");
        assert_eq!(renewed.value(), cookie.value());
        assert_eq!(
            renewed.max_age(),
            Some(actix_web::cookie::time::Duration::seconds(ttl_seconds))
        );
        assert_eq!(renewed.http_only(), Some(true));

        let req = test::TestRequest::get()
            .uri("/filter-notes?filter-text=")
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(response_cookie(&resp).unwrap().value(), cookie.value());

        let req = test::TestRequest::post()
            .uri("/add-note")
            .cookie(cookie.clone())
            .set_form([("title", "t"), ("content", "c")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(response_cookie(&resp).unwrap().value(), cookie.value());
    }

    #[actix_web::test]
    async fn test_notes_page_lists_only_own_notes() {
        let (_dir, state, user_id) = test_state();
        let other = state.db.create_user("bob", "b").unwrap();
        state
            .db
            .add_note(user_id, &NewNote::new("Mine", "visible").unwrap())
            .unwrap();
        state
            .db
            .add_note(other.id, &NewNote::new("Theirs", "hidden").unwrap())
            .unwrap();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/notes")
            .cookie(login(&state, user_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body = body_text(resp).await;
        assert!(body.contains("visible"));
        assert!(!body.contains("hidden"));
    }

    #[actix_web::test]
    async fn test_add_note_returns_fragment() {
        let (_dir, state, user_id) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/add-note")
            .cookie(login(&state, user_id))
            .set_form([("title", "Welcome!"), ("content", "<b>Hi</b>")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body = body_text(resp).await;
        assert!(body.starts_with("<article"));
        assert!(body.contains("&lt;b&gt;Hi&lt;/b&gt;"));

        let notes = state.db.list_notes(user_id).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Welcome!");
        assert_eq!(notes[0].content, "<b>Hi</b>");
    }

    #[actix_web::test]
    async fn test_add_note_accepts_legacy_field() {
        let (_dir, state, user_id) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/add-note")
            .cookie(login(&state, user_id))
            .set_form([("noteContent", "buy milk")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let notes = state.db.list_notes(user_id).unwrap();
        assert_eq!(notes[0].title, LEGACY_NOTE_TITLE);
        assert_eq!(notes[0].content, "buy milk");
    }

    #[actix_web::test]
    async fn test_add_note_rejects_empty_fields() {
        let (_dir, state, user_id) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;
        let cookie = login(&state, user_id);

        for form in [
            vec![("title", ""), ("content", "body")],
            vec![("title", "title"), ("content", "   ")],
            vec![("noteContent", "")],
            vec![],
        ] {
            let req = test::TestRequest::post()
                .uri("/add-note")
                .cookie(cookie.clone())
                .set_form(form)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 400);
        }

        assert!(state.db.list_notes(user_id).unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_filter_notes_get_and_post() {
        let (_dir, state, user_id) = test_state();
        state
            .db
            .add_note(user_id, &NewNote::new("Groceries", "milk and eggs").unwrap())
            .unwrap();
        state
            .db
            .add_note(user_id, &NewNote::new("Chores", "laundry").unwrap())
            .unwrap();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;
        let cookie = login(&state, user_id);

        let req = test::TestRequest::post()
            .uri("/filter-notes")
            .cookie(cookie.clone())
            .set_form([("filter-text", "MILK")])
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains("Groceries"));
        assert!(!body.contains("Chores"));
        assert!(body.contains(r#"id="add-note""#));

        let req = test::TestRequest::get()
            .uri("/filter-notes?filter-text=")
            .cookie(cookie.clone())
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains("Groceries"));
        assert!(body.contains("Chores"));

        let req = test::TestRequest::get()
            .uri("/filter-notes?filter-text=absent")
            .cookie(cookie)
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(!body.contains("<article"));
        assert!(body.contains(r#"id="add-note""#));
    }
}
