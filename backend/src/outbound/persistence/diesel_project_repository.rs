//! PostgreSQL-backed `ProjectRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{PagedResult, SortOrder};

use super::helpers::{like_pattern, map_diesel_error, to_i64};
use super::models::{ProjectChangeset, ProjectRow};
use super::retry::with_retries;
use super::schema::projects;
use super::session::DbSession;
use crate::domain::listing::{ProjectQuery, ProjectSortField, Scope};
use crate::domain::ports::{ProjectRepository, StoreError};
use crate::domain::project::{Project, ProjectId, UserId};

/// Diesel adapter for project persistence, bound to a request session.
#[derive(Clone)]
pub struct DieselProjectRepository {
    session: DbSession,
}

impl DieselProjectRepository {
    /// Build the adapter over a shared session.
    pub fn new(session: DbSession) -> Self {
        Self { session }
    }
}

fn filtered(spec: &ProjectQuery) -> projects::BoxedQuery<'_, diesel::pg::Pg> {
    let mut query = projects::table.into_boxed();
    if let Scope::Owner(owner) = &spec.scope {
        query = query.filter(projects::owner_id.eq(owner.as_str()));
    }
    if let Some(search) = spec.search.as_deref() {
        let pattern = like_pattern(search);
        query = query.filter(
            projects::name
                .ilike(pattern.clone())
                .or(projects::description.ilike(pattern)),
        );
    }
    query
}

fn ordered(spec: &ProjectQuery) -> projects::BoxedQuery<'_, diesel::pg::Pg> {
    let query = filtered(spec);
    match (spec.sort_by, spec.sort_order) {
        (Some(ProjectSortField::Name), SortOrder::Asc) => query.order(projects::name.asc()),
        (Some(ProjectSortField::Name), SortOrder::Desc) => query.order(projects::name.desc()),
        (Some(ProjectSortField::Description), SortOrder::Asc) => {
            query.order(projects::description.asc())
        }
        (Some(ProjectSortField::Description), SortOrder::Desc) => {
            query.order(projects::description.desc())
        }
        (None, _) => query.order(projects::id.asc()),
    }
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        let session = self.session.clone();
        with_retries("projects.find_by_id", || {
            let session = session.clone();
            async move {
                let mut conn = session.conn().await?;
                let row: Option<ProjectRow> = projects::table
                    .find(*id.as_uuid())
                    .select(ProjectRow::as_select())
                    .first(&mut *conn)
                    .await
                    .optional()
                    .map_err(map_diesel_error)?;
                Ok(row.map(Project::from))
            }
        })
        .await
    }

    async fn name_taken(
        &self,
        owner: &UserId,
        name: &str,
        exclude: Option<ProjectId>,
    ) -> Result<bool, StoreError> {
        let session = self.session.clone();
        with_retries("projects.name_taken", || {
            let session = session.clone();
            async move {
                let mut conn = session.conn().await?;
                let mut query = projects::table
                    .filter(projects::owner_id.eq(owner.as_str()))
                    .filter(projects::name.eq(name))
                    .into_boxed();
                if let Some(excluded) = exclude {
                    query = query.filter(projects::id.ne(*excluded.as_uuid()));
                }
                diesel::select(diesel::dsl::exists(query))
                    .get_result(&mut *conn)
                    .await
                    .map_err(map_diesel_error)
            }
        })
        .await
    }

    async fn insert(&self, project: &Project) -> Result<(), StoreError> {
        let session = self.session.clone();
        with_retries("projects.insert", || {
            let session = session.clone();
            async move {
                let mut conn = session.conn().await?;
                diesel::insert_into(projects::table)
                    .values(ProjectChangeset::from_project(project))
                    .execute(&mut *conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            }
        })
        .await
    }

    async fn update(&self, project: &Project) -> Result<(), StoreError> {
        let session = self.session.clone();
        with_retries("projects.update", || {
            let session = session.clone();
            async move {
                let mut conn = session.conn().await?;
                diesel::update(projects::table.find(*project.id.as_uuid()))
                    .set(ProjectChangeset::from_project(project))
                    .execute(&mut *conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            }
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> Result<(), StoreError> {
        let session = self.session.clone();
        with_retries("projects.delete", || {
            let session = session.clone();
            async move {
                let mut conn = session.conn().await?;
                // The FK also cascades; deleting explicitly keeps the
                // behavior visible and migration-independent.
                diesel::delete(
                    super::schema::tasks::table
                        .filter(super::schema::tasks::project_id.eq(*id.as_uuid())),
                )
                .execute(&mut *conn)
                .await
                .map_err(map_diesel_error)?;
                diesel::delete(projects::table.find(*id.as_uuid()))
                    .execute(&mut *conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            }
        })
        .await
    }

    async fn list(&self, query: &ProjectQuery) -> Result<PagedResult<Project>, StoreError> {
        let session = self.session.clone();
        with_retries("projects.list", || {
            let session = session.clone();
            async move {
                let mut conn = session.conn().await?;
                let total: i64 = filtered(query)
                    .count()
                    .get_result(&mut *conn)
                    .await
                    .map_err(map_diesel_error)?;

                let rows: Vec<ProjectRow> = ordered(query)
                    .select(ProjectRow::as_select())
                    .offset(to_i64(query.page.offset(), "page offset")?)
                    .limit(to_i64(query.page.limit(), "page limit")?)
                    .load(&mut *conn)
                    .await
                    .map_err(map_diesel_error)?;

                Ok(PagedResult::new(
                    rows.into_iter().map(Project::from).collect(),
                    u64::try_from(total).unwrap_or_default(),
                    query.page,
                ))
            }
        })
        .await
    }
}
