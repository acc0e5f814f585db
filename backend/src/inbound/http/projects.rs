//! Project HTTP handlers.
//!
//! ```text
//! GET    /api/v1/projects
//! POST   /api/v1/projects
//! GET    /api/v1/projects/{id}
//! PUT    /api/v1/projects/{id}
//! DELETE /api/v1/projects/{id}
//! ```

use actix_web::{delete, get, post, put, web, HttpResponse};
use pagination::PagedResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::projects::{
    CreateProject, DeleteProject, GetProjectById, ListProjects, UpdateProject,
};
use crate::domain::{ProjectId, ProjectView};
use crate::inbound::http::auth::AuthenticatedActor;
use crate::inbound::http::error::{ApiResult, ErrorSchema};
use crate::inbound::http::schemas::ListQuery;
use crate::inbound::http::state::HttpState;

/// Request payload for creating or replacing a project.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBody {
    /// Display name, unique per owner.
    pub name: String,
    /// Optional description; omitting it on update clears the field.
    pub description: Option<String>,
}

/// Response payload for a single project.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    /// Project identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Owner's subject identifier.
    pub owner_id: String,
}

impl From<ProjectView> for ProjectResponse {
    fn from(view: ProjectView) -> Self {
        Self {
            id: *view.id.as_uuid(),
            name: view.name,
            description: view.description,
            owner_id: view.owner_id.as_str().to_owned(),
        }
    }
}

/// One page of projects.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPage {
    /// Projects on this page.
    pub items: Vec<ProjectResponse>,
    /// Total matching projects across all pages.
    pub total_count: u64,
    /// 1-based page number.
    pub page_number: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Derived page count.
    pub total_pages: u64,
}

impl From<PagedResult<ProjectView>> for ProjectPage {
    fn from(page: PagedResult<ProjectView>) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(ProjectResponse::from);
        Self {
            items: page.items,
            total_count: page.total_count,
            page_number: page.page_number,
            page_size: page.page_size,
            total_pages,
        }
    }
}

/// List projects visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of projects", body = ProjectPage),
        (status = 400, description = "Invalid paging parameters", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "listProjects"
)]
#[get("/projects")]
pub async fn list_projects(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let page = state
        .project_queries
        .list_projects(ListProjects {
            actor: actor.into_actor(),
            params: query.into_inner().into(),
        })
        .await?;
    Ok(HttpResponse::Ok().json(ProjectPage::from(page)))
}

/// Create a project owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    request_body = ProjectBody,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Name already in use", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "createProject"
)]
#[post("/projects")]
pub async fn create_project(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    body: web::Json<ProjectBody>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let view = state
        .project_commands
        .create_project(CreateProject {
            actor: actor.into_actor(),
            name: body.name,
            description: body.description,
        })
        .await?;
    Ok(HttpResponse::Created().json(ProjectResponse::from(view)))
}

/// Fetch one project.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    params(("id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "The project", body = ProjectResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "No such project", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "getProject"
)]
#[get("/projects/{id}")]
pub async fn get_project(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let view = state
        .project_queries
        .get_project(GetProjectById {
            actor: actor.into_actor(),
            id: ProjectId::from_uuid(id.into_inner()),
        })
        .await?;
    Ok(HttpResponse::Ok().json(ProjectResponse::from(view)))
}

/// Replace a project's name and description.
#[utoipa::path(
    put,
    path = "/api/v1/projects/{id}",
    params(("id" = Uuid, Path, description = "Project identifier")),
    request_body = ProjectBody,
    responses(
        (status = 200, description = "Updated project", body = ProjectResponse),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "No such project", body = ErrorSchema),
        (status = 409, description = "Name already in use", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "updateProject"
)]
#[put("/projects/{id}")]
pub async fn update_project(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    id: web::Path<Uuid>,
    body: web::Json<ProjectBody>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let view = state
        .project_commands
        .update_project(UpdateProject {
            actor: actor.into_actor(),
            id: ProjectId::from_uuid(id.into_inner()),
            name: body.name,
            description: body.description,
        })
        .await?;
    Ok(HttpResponse::Ok().json(ProjectResponse::from(view)))
}

/// Delete a project and all of its tasks.
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{id}",
    params(("id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "No such project", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "deleteProject"
)]
#[delete("/projects/{id}")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .project_commands
        .delete_project(DeleteProject {
            actor: actor.into_actor(),
            id: ProjectId::from_uuid(id.into_inner()),
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
    use crate::inbound::http::test_utils::{empty_state, seeded_state};
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

    #[actix_web::test]
    async fn listing_without_a_token_is_unauthorised() {
        let res = request(
            seeded_state().await,
            test::TestRequest::get().uri("/api/v1/projects"),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn members_only_see_their_own_projects() {
        let res = request(
            seeded_state().await,
            as_user(test::TestRequest::get().uri("/api/v1/projects"), "user1"),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let page: ProjectPage = test::read_body_json(res).await;
        let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[actix_web::test]
    async fn admins_see_every_project() {
        let res = request(
            seeded_state().await,
            as_user(test::TestRequest::get().uri("/api/v1/projects"), "admin"),
        )
        .await;
        let page: ProjectPage = test::read_body_json(res).await;
        assert_eq!(page.total_count, 3);
    }

    #[actix_web::test]
    async fn paging_and_sorting_flow_through_the_query_string() {
        let res = request(
            seeded_state().await,
            as_user(
                test::TestRequest::get()
                    .uri("/api/v1/projects?page=1&pageSize=1&sortBy=name&sortOrder=desc"),
                "user1",
            ),
        )
        .await;
        let page: ProjectPage = test::read_body_json(res).await;
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Beta");
        assert_eq!(page.total_count, 2);
        assert_eq!(page.total_pages, 2);
    }

    #[actix_web::test]
    async fn an_invalid_page_window_is_a_bad_request() {
        let res = request(
            seeded_state().await,
            as_user(
                test::TestRequest::get().uri("/api/v1/projects?page=0&pageSize=500"),
                "user1",
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: ErrorSchema = test::read_body_json(res).await;
        assert_eq!(body.errors.len(), 2);
    }

    #[actix_web::test]
    async fn creating_a_project_returns_201_with_the_view() {
        let res = request(
            empty_state(),
            as_user(test::TestRequest::post().uri("/api/v1/projects"), "user1").set_json(
                ProjectBody {
                    name: "Delta".to_owned(),
                    description: Some("fourth".to_owned()),
                },
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: ProjectResponse = test::read_body_json(res).await;
        assert_eq!(body.name, "Delta");
        assert_eq!(body.owner_id, "user1");
    }

    #[actix_web::test]
    async fn a_duplicate_name_is_a_conflict() {
        let res = request(
            seeded_state().await,
            as_user(test::TestRequest::post().uri("/api/v1/projects"), "user1").set_json(
                ProjectBody {
                    name: "Alpha".to_owned(),
                    description: None,
                },
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body: ErrorSchema = test::read_body_json(res).await;
        assert_eq!(body.message, "A project named 'Alpha' already exists.");
    }

    #[actix_web::test]
    async fn a_blank_name_fails_validation() {
        let res = request(
            empty_state(),
            as_user(test::TestRequest::post().uri("/api/v1/projects"), "user1").set_json(
                ProjectBody {
                    name: "   ".to_owned(),
                    description: None,
                },
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: ErrorSchema = test::read_body_json(res).await;
        assert_eq!(body.errors[0].field, "name");
    }

    #[actix_web::test]
    async fn foreign_projects_are_forbidden_and_missing_ones_not_found() {
        let state = seeded_state().await;
        let created = request(
            state.clone(),
            as_user(test::TestRequest::post().uri("/api/v1/projects"), "user2").set_json(
                ProjectBody {
                    name: "Private".to_owned(),
                    description: None,
                },
            ),
        )
        .await;
        let body: ProjectResponse = test::read_body_json(created).await;

        let res = request(
            state.clone(),
            as_user(
                test::TestRequest::get().uri(&format!("/api/v1/projects/{}", body.id)),
                "user1",
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = request(
            state,
            as_user(
                test::TestRequest::get().uri(&format!("/api/v1/projects/{}", Uuid::new_v4())),
                "user1",
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn update_and_delete_round_trip() {
        let state = empty_state();
        let created = request(
            state.clone(),
            as_user(test::TestRequest::post().uri("/api/v1/projects"), "user1").set_json(
                ProjectBody {
                    name: "Draft".to_owned(),
                    description: None,
                },
            ),
        )
        .await;
        let body: ProjectResponse = test::read_body_json(created).await;
        let uri = format!("/api/v1/projects/{}", body.id);

        let res = request(
            state.clone(),
            as_user(test::TestRequest::put().uri(&uri), "user1").set_json(ProjectBody {
                name: "Final".to_owned(),
                description: Some("ready".to_owned()),
            }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let updated: ProjectResponse = test::read_body_json(res).await;
        assert_eq!(updated.name, "Final");

        let res = request(
            state.clone(),
            as_user(test::TestRequest::delete().uri(&uri), "user1"),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = request(state, as_user(test::TestRequest::get().uri(&uri), "user1")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
