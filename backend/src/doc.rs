//! OpenAPI document assembly.

use actix_web::HttpResponse;
use utoipa::OpenApi;

use crate::inbound::http::error::{ErrorSchema, FieldViolationSchema};
use crate::inbound::http::projects::{ProjectBody, ProjectPage, ProjectResponse};
use crate::inbound::http::tasks::{TaskBody, TaskPage, TaskResponse};

/// Aggregated OpenAPI description of the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Project and task management API",
        description = "Multi-tenant project and task management with \
                       owner-or-admin authorization."
    ),
    paths(
        crate::inbound::http::projects::list_projects,
        crate::inbound::http::projects::create_project,
        crate::inbound::http::projects::get_project,
        crate::inbound::http::projects::update_project,
        crate::inbound::http::projects::delete_project,
        crate::inbound::http::tasks::list_tasks,
        crate::inbound::http::tasks::create_task,
        crate::inbound::http::tasks::get_task,
        crate::inbound::http::tasks::update_task,
        crate::inbound::http::tasks::delete_task,
    ),
    components(schemas(
        ProjectBody,
        ProjectResponse,
        ProjectPage,
        TaskBody,
        TaskResponse,
        TaskPage,
        ErrorSchema,
        FieldViolationSchema,
    )),
    tags(
        (name = "projects", description = "Project management"),
        (name = "tasks", description = "Task management")
    )
)]
pub struct ApiDoc;

/// Serve the generated document as JSON.
pub async fn serve_openapi() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
