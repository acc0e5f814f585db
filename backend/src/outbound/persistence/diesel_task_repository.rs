//! PostgreSQL-backed `TaskRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{PagedResult, SortOrder};

use super::helpers::{like_pattern, map_diesel_error, to_i64};
use super::models::{TaskChangeset, TaskRow};
use super::retry::with_retries;
use super::schema::tasks;
use super::session::DbSession;
use crate::domain::listing::{TaskQuery, TaskSortField};
use crate::domain::ports::{StoreError, TaskRepository};
use crate::domain::task::{Task, TaskId};

/// Diesel adapter for task persistence, bound to a request session.
#[derive(Clone)]
pub struct DieselTaskRepository {
    session: DbSession,
}

impl DieselTaskRepository {
    /// Build the adapter over a shared session.
    pub fn new(session: DbSession) -> Self {
        Self { session }
    }
}

fn filtered(spec: &TaskQuery) -> tasks::BoxedQuery<'_, diesel::pg::Pg> {
    let mut query = tasks::table
        .filter(tasks::project_id.eq(*spec.project_id.as_uuid()))
        .into_boxed();
    if let Some(search) = spec.search.as_deref() {
        let pattern = like_pattern(search);
        query = query.filter(
            tasks::title
                .ilike(pattern.clone())
                .or(tasks::description.ilike(pattern)),
        );
    }
    query
}

fn ordered(spec: &TaskQuery) -> tasks::BoxedQuery<'_, diesel::pg::Pg> {
    let query = filtered(spec);
    match (spec.sort_by, spec.sort_order) {
        (Some(TaskSortField::Title), SortOrder::Asc) => query.order(tasks::title.asc()),
        (Some(TaskSortField::Title), SortOrder::Desc) => query.order(tasks::title.desc()),
        (Some(TaskSortField::Status), SortOrder::Asc) => query.order(tasks::status.asc()),
        (Some(TaskSortField::Status), SortOrder::Desc) => query.order(tasks::status.desc()),
        (None, _) => query.order(tasks::id.asc()),
    }
}

#[async_trait]
impl TaskRepository for DieselTaskRepository {
    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let session = self.session.clone();
        with_retries("tasks.find_by_id", || {
            let session = session.clone();
            async move {
                let mut conn = session.conn().await?;
                let row: Option<TaskRow> = tasks::table
                    .find(*id.as_uuid())
                    .select(TaskRow::as_select())
                    .first(&mut *conn)
                    .await
                    .optional()
                    .map_err(map_diesel_error)?;
                Ok(row.map(Task::from))
            }
        })
        .await
    }

    async fn insert(&self, task: &Task) -> Result<(), StoreError> {
        let session = self.session.clone();
        with_retries("tasks.insert", || {
            let session = session.clone();
            async move {
                let mut conn = session.conn().await?;
                diesel::insert_into(tasks::table)
                    .values(TaskChangeset::from_task(task))
                    .execute(&mut *conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            }
        })
        .await
    }

    async fn update(&self, task: &Task) -> Result<(), StoreError> {
        let session = self.session.clone();
        with_retries("tasks.update", || {
            let session = session.clone();
            async move {
                let mut conn = session.conn().await?;
                diesel::update(tasks::table.find(*task.id.as_uuid()))
                    .set(TaskChangeset::from_task(task))
                    .execute(&mut *conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            }
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        let session = self.session.clone();
        with_retries("tasks.delete", || {
            let session = session.clone();
            async move {
                let mut conn = session.conn().await?;
                diesel::delete(tasks::table.find(*id.as_uuid()))
                    .execute(&mut *conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            }
        })
        .await
    }

    async fn list(&self, query: &TaskQuery) -> Result<PagedResult<Task>, StoreError> {
        let session = self.session.clone();
        with_retries("tasks.list", || {
            let session = session.clone();
            async move {
                let mut conn = session.conn().await?;
                let total: i64 = filtered(query)
                    .count()
                    .get_result(&mut *conn)
                    .await
                    .map_err(map_diesel_error)?;

                let rows: Vec<TaskRow> = ordered(query)
                    .select(TaskRow::as_select())
                    .offset(to_i64(query.page.offset(), "page offset")?)
                    .limit(to_i64(query.page.limit(), "page limit")?)
                    .load(&mut *conn)
                    .await
                    .map_err(map_diesel_error)?;

                Ok(PagedResult::new(
                    rows.into_iter().map(Task::from).collect(),
                    u64::try_from(total).unwrap_or_default(),
                    query.page,
                ))
            }
        })
        .await
    }
}
