//! HTTP adapter: routing, authentication, and the error envelope.

use actix_web::{get, web, HttpResponse};
use serde_json::json;

pub mod auth;
pub mod error;
pub mod projects;
pub mod schemas;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub mod test_utils;

pub use error::{ApiResult, ErrorSchema};
pub use state::HttpState;

/// Liveness probe; no authentication required.
#[get("/healthz")]
pub async fn healthz() -> HttpResponse {
    HttpResponse::Ok().json(json!({"status": "ok"}))
}

/// Mount every route on the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz).service(
        web::scope("/api/v1")
            .service(projects::list_projects)
            .service(projects::create_project)
            .service(projects::get_project)
            .service(projects::update_project)
            .service(projects::delete_project)
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    use super::*;

    #[actix_web::test]
    async fn healthz_answers_without_credentials() {
        let app = test::init_service(App::new().service(healthz)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/healthz").to_request())
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "ok");
    }
}
