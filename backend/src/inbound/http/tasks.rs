//! Task HTTP handlers.
//!
//! ```text
//! GET    /api/v1/projects/{projectId}/tasks
//! POST   /api/v1/projects/{projectId}/tasks
//! GET    /api/v1/tasks/{id}
//! PUT    /api/v1/tasks/{id}
//! DELETE /api/v1/tasks/{id}
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use pagination::PagedResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::tasks::{CreateTask, DeleteTask, GetTaskById, ListTasks, UpdateTask};
use crate::domain::{ProjectId, TaskId, TaskStatus, TaskView};
use crate::inbound::http::auth::AuthenticatedActor;
use crate::inbound::http::error::{ApiResult, ErrorSchema};
use crate::inbound::http::schemas::ListQuery;
use crate::inbound::http::state::HttpState;

/// Request payload for creating or replacing a task.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskBody {
    /// Short title.
    pub title: String,
    /// Optional description; omitting it on update clears the field.
    pub description: Option<String>,
    /// Workflow status: `todo`, `inProgress`, or `done`.
    pub status: String,
}

/// Response payload for a single task.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    /// Task identifier.
    pub id: Uuid,
    /// Short title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Parent project identifier.
    pub project_id: Uuid,
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "todo",
        TaskStatus::InProgress => "inProgress",
        TaskStatus::Done => "done",
    }
}

impl From<TaskView> for TaskResponse {
    fn from(view: TaskView) -> Self {
        Self {
            id: *view.id.as_uuid(),
            title: view.title,
            description: view.description,
            status: status_label(view.status).to_owned(),
            project_id: *view.project_id.as_uuid(),
        }
    }
}

/// One page of tasks.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskPage {
    /// Tasks on this page.
    pub items: Vec<TaskResponse>,
    /// Total matching tasks across all pages.
    pub total_count: u64,
    /// 1-based page number.
    pub page_number: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Derived page count.
    pub total_pages: u64,
}

impl From<PagedResult<TaskView>> for TaskPage {
    fn from(page: PagedResult<TaskView>) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(TaskResponse::from);
        Self {
            items: page.items,
            total_count: page.total_count,
            page_number: page.page_number,
            page_size: page.page_size,
            total_pages,
        }
    }
}

/// List a project's tasks.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{projectId}/tasks",
    params(
        ("projectId" = Uuid, Path, description = "Parent project identifier"),
        ListQuery
    ),
    responses(
        (status = 200, description = "One page of tasks", body = TaskPage),
        (status = 400, description = "Invalid paging parameters", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "No such project", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "listTasks"
)]
#[get("/projects/{project_id}/tasks")]
pub async fn list_tasks(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    project_id: web::Path<Uuid>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let page = state
        .task_queries
        .list_tasks(ListTasks {
            actor: actor.into_actor(),
            project_id: ProjectId::from_uuid(project_id.into_inner()),
            params: query.into_inner().into(),
        })
        .await?;
    Ok(HttpResponse::Ok().json(TaskPage::from(page)))
}

/// Create a task under a project.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{projectId}/tasks",
    params(("projectId" = Uuid, Path, description = "Parent project identifier")),
    request_body = TaskBody,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "No such project", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "createTask"
)]
#[post("/projects/{project_id}/tasks")]
pub async fn create_task(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    project_id: web::Path<Uuid>,
    body: web::Json<TaskBody>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let view = state
        .task_commands
        .create_task(CreateTask {
            actor: actor.into_actor(),
            project_id: ProjectId::from_uuid(project_id.into_inner()),
            title: body.title,
            description: body.description,
            status: body.status,
        })
        .await?;
    Ok(HttpResponse::Created().json(TaskResponse::from(view)))
}

/// Fetch one task.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "The task", body = TaskResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "No such task", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "getTask"
)]
#[get("/tasks/{id}")]
pub async fn get_task(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let view = state
        .task_queries
        .get_task(GetTaskById {
            actor: actor.into_actor(),
            id: TaskId::from_uuid(id.into_inner()),
        })
        .await?;
    Ok(HttpResponse::Ok().json(TaskResponse::from(view)))
}

/// Replace a task's title, description, and status.
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task identifier")),
    request_body = TaskBody,
    responses(
        (status = 200, description = "Updated task", body = TaskResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "No such task", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "updateTask"
)]
#[put("/tasks/{id}")]
pub async fn update_task(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    id: web::Path<Uuid>,
    body: web::Json<TaskBody>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let view = state
        .task_commands
        .update_task(UpdateTask {
            actor: actor.into_actor(),
            id: TaskId::from_uuid(id.into_inner()),
            title: body.title,
            description: body.description,
            status: body.status,
        })
        .await?;
    Ok(HttpResponse::Ok().json(TaskResponse::from(view)))
}

/// Delete a task.
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task identifier")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "No such task", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask"
)]
#[delete("/tasks/{id}")]
pub async fn delete_task(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .task_commands
        .delete_task(DeleteTask {
            actor: actor.into_actor(),
            id: TaskId::from_uuid(id.into_inner()),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};

    use super::*;
    use crate::inbound::http::error::ErrorSchema;
    use crate::inbound::http::projects::ProjectPage;
    use crate::inbound::http::test_utils::seeded_state;
    use crate::inbound::http::{configure, state::HttpState};

    async fn request(
        state: HttpState,
        req: test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;
        test::call_service(&app, req.to_request()).await
    }

    fn as_user(req: test::TestRequest, user: &str) -> test::TestRequest {
        req.insert_header(("Authorization", format!("Bearer {user}")))
    }

    async fn project_id_of(state: &HttpState, user: &str, name: &str) -> Uuid {
        let res = request(
            state.clone(),
            as_user(test::TestRequest::get().uri("/api/v1/projects"), user),
        )
        .await;
        let page: ProjectPage = test::read_body_json(res).await;
        page.items
            .iter()
            .find(|p| p.name == name)
            .unwrap_or_else(|| panic!("seeded project {name}"))
            .id
    }

    #[actix_web::test]
    async fn owners_list_their_project_tasks() {
        let state = seeded_state().await;
        let alpha = project_id_of(&state, "user1", "Alpha").await;
        let res = request(
            state,
            as_user(
                test::TestRequest::get().uri(&format!("/api/v1/projects/{alpha}/tasks")),
                "user1",
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let page: TaskPage = test::read_body_json(res).await;
        assert_eq!(page.total_count, 2);
        assert_eq!(page.items[0].title, "Set up repo");
        assert_eq!(page.items[1].status, "inProgress");
    }

    #[actix_web::test]
    async fn foreign_task_listings_are_forbidden() {
        let state = seeded_state().await;
        let gamma = project_id_of(&state, "user2", "Gamma").await;
        let res = request(
            state,
            as_user(
                test::TestRequest::get().uri(&format!("/api/v1/projects/{gamma}/tasks")),
                "user1",
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: ErrorSchema = test::read_body_json(res).await;
        assert_eq!(body.message, "You do not have access to this project.");
    }

    #[actix_web::test]
    async fn an_unknown_status_fails_validation() {
        let state = seeded_state().await;
        let alpha = project_id_of(&state, "user1", "Alpha").await;
        let res = request(
            state,
            as_user(
                test::TestRequest::post().uri(&format!("/api/v1/projects/{alpha}/tasks")),
                "user1",
            )
            .set_json(TaskBody {
                title: "Deploy".to_owned(),
                description: None,
                status: "blocked".to_owned(),
            }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: ErrorSchema = test::read_body_json(res).await;
        assert_eq!(body.errors[0].field, "status");
    }

    #[actix_web::test]
    async fn task_lifecycle_round_trips() {
        let state = seeded_state().await;
        let alpha = project_id_of(&state, "user1", "Alpha").await;

        let res = request(
            state.clone(),
            as_user(
                test::TestRequest::post().uri(&format!("/api/v1/projects/{alpha}/tasks")),
                "user1",
            )
            .set_json(TaskBody {
                title: "Ship it".to_owned(),
                description: None,
                status: "todo".to_owned(),
            }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: TaskResponse = test::read_body_json(res).await;
        assert_eq!(created.project_id, alpha);
        let uri = format!("/api/v1/tasks/{}", created.id);

        let res = request(
            state.clone(),
            as_user(test::TestRequest::put().uri(&uri), "user1").set_json(TaskBody {
                title: "Ship it".to_owned(),
                description: Some("released".to_owned()),
                status: "inProgress".to_owned(),
            }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let updated: TaskResponse = test::read_body_json(res).await;
        assert_eq!(updated.status, "inProgress");

        let res = request(
            state.clone(),
            as_user(test::TestRequest::delete().uri(&uri), "user1"),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = request(state, as_user(test::TestRequest::get().uri(&uri), "user1")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: ErrorSchema = test::read_body_json(res).await;
        assert_eq!(body.message, "Task not found.");
    }

    #[actix_web::test]
    async fn admins_may_manage_any_task() {
        let state = seeded_state().await;
        let gamma = project_id_of(&state, "user2", "Gamma").await;
        let res = request(
            state,
            as_user(
                test::TestRequest::get().uri(&format!("/api/v1/projects/{gamma}/tasks")),
                "admin",
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let page: TaskPage = test::read_body_json(res).await;
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].title, "Literature review");
    }
}
