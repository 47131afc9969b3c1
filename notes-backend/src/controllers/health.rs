use actix_web::{HttpResponse, Responder, web};

use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
}

/// Reports `ok` while the notes database answers, `unavailable` (503) otherwise
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    match data.db.ping() {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "version": VERSION
        })),
        Err(e) => {
            log::error!("[DB] Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unavailable",
                "version": VERSION
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support::test_state;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn test_health_reports_version() {
        let (_dir, state, _) = test_state();
        let app =
            test::init_service(App::new().app_data(state).configure(config_routes)).await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], VERSION);
    }

    #[actix_web::test]
    async fn test_health_fails_when_database_is_broken() {
        let (_dir, state, _) = test_state();
        state
            .db
            .conn()
            .unwrap()
            .execute_batch("PRAGMA foreign_keys = OFF; DROP TABLE users;")
            .unwrap();
        let app =
            test::init_service(App::new().app_data(state).configure(config_routes)).await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 503);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "unavailable");
    }
}
