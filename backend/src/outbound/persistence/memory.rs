//! In-memory persistence adapters.
//!
//! Implements every persistence port over a mutex-guarded state so the
//! service runs without PostgreSQL: unit and scenario tests use it, and
//! the server falls back to it when no database is configured.
//!
//! Transactions serialise through a store-wide async lock: `begin` takes
//! the lock and snapshots the state, `rollback` restores the snapshot,
//! `commit` discards it, and either end releases the lock. No other
//! session can commit between a `begin` and its `rollback`, so restoring
//! the snapshot only ever discards the transaction's own writes and the
//! both-or-nothing contract of the diesel adapters holds here too.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use async_trait::async_trait;
use pagination::{PagedResult, SortOrder};

use crate::domain::events::DomainEvent;
use crate::domain::listing::{ProjectQuery, ProjectSortField, Scope, TaskQuery, TaskSortField};
use crate::domain::ports::{
    EventOutbox, OutboxRecord, OutboxStore, ProjectRepository, StoreError, StoreFactory,
    StoreSession, TaskRepository, UnitOfWork,
};
use crate::domain::project::{Project, ProjectId, UserId};
use crate::domain::task::{Task, TaskId, TaskStatus};

#[derive(Clone)]
struct OutboxEntry {
    record: OutboxRecord,
    delivered: bool,
}

#[derive(Clone)]
struct MemoryState {
    projects: Vec<Project>,
    tasks: Vec<Task>,
    outbox: Vec<OutboxEntry>,
    next_outbox_id: i64,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            tasks: Vec::new(),
            outbox: Vec::new(),
            next_outbox_id: 1,
        }
    }
}

/// Shared in-memory store; sessions opened from it see the same state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
    tx_lock: Arc<AsyncMutex<()>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::query("in-memory state poisoned"))
    }
}

#[async_trait]
impl StoreFactory for InMemoryStore {
    async fn open(&self) -> Result<StoreSession, StoreError> {
        let session = Arc::new(MemorySession {
            state: Arc::clone(&self.state),
            tx_lock: Arc::clone(&self.tx_lock),
            active: Mutex::new(None),
        });
        Ok(StoreSession {
            projects: Arc::clone(&session) as Arc<dyn ProjectRepository>,
            tasks: Arc::clone(&session) as Arc<dyn TaskRepository>,
            outbox: Arc::clone(&session) as Arc<dyn EventOutbox>,
            unit_of_work: session,
        })
    }
}

#[async_trait]
impl OutboxStore for InMemoryStore {
    async fn fetch_undelivered(&self, limit: u32) -> Result<Vec<OutboxRecord>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .outbox
            .iter()
            .filter(|entry| !entry.delivered)
            .take(limit as usize)
            .map(|entry| entry.record.clone())
            .collect())
    }

    async fn mark_delivered(&self, id: i64) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        for entry in &mut state.outbox {
            if entry.record.id == id {
                entry.delivered = true;
            }
        }
        Ok(())
    }
}

/// Holds the store-wide transaction lock together with the state to
/// restore on rollback; dropping it releases the lock.
struct ActiveTransaction {
    snapshot: MemoryState,
    _guard: OwnedMutexGuard<()>,
}

/// One session over the shared state, with its own open transaction.
struct MemorySession {
    state: Arc<Mutex<MemoryState>>,
    tx_lock: Arc<AsyncMutex<()>>,
    active: Mutex<Option<ActiveTransaction>>,
}

impl MemorySession {
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::query("in-memory state poisoned"))
    }
}

fn matches_search(needle: &str, name: &str, description: Option<&str>) -> bool {
    let needle = needle.to_lowercase();
    name.to_lowercase().contains(&needle)
        || description.is_some_and(|text| text.to_lowercase().contains(&needle))
}

fn page_slice<T>(mut items: Vec<T>, query_page: pagination::PageRequest) -> PagedResult<T> {
    let total = items.len() as u64;
    let offset = usize::try_from(query_page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(query_page.limit()).unwrap_or(usize::MAX);
    let items = if offset >= items.len() {
        Vec::new()
    } else {
        items.drain(offset..).take(limit).collect()
    };
    PagedResult::new(items, total, query_page)
}

#[async_trait]
impl ProjectRepository for MemorySession {
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        let state = self.lock()?;
        Ok(state.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn name_taken(
        &self,
        owner: &UserId,
        name: &str,
        exclude: Option<ProjectId>,
    ) -> Result<bool, StoreError> {
        let state = self.lock()?;
        Ok(state.projects.iter().any(|p| {
            p.owner_id == *owner && p.name == name && Some(p.id) != exclude
        }))
    }

    async fn insert(&self, project: &Project) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        // Mirrors the database's unique index on (owner_id, name).
        if state
            .projects
            .iter()
            .any(|p| p.owner_id == project.owner_id && p.name == project.name)
        {
            return Err(StoreError::unique_violation(format!(
                "project name '{}' already used by owner",
                project.name
            )));
        }
        state.projects.push(project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if state.projects.iter().any(|p| {
            p.id != project.id && p.owner_id == project.owner_id && p.name == project.name
        }) {
            return Err(StoreError::unique_violation(format!(
                "project name '{}' already used by owner",
                project.name
            )));
        }
        match state.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => {
                *existing = project.clone();
                Ok(())
            }
            None => Err(StoreError::query("project does not exist")),
        }
    }

    async fn delete(&self, id: ProjectId) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.projects.retain(|p| p.id != id);
        state.tasks.retain(|t| t.project_id != id);
        Ok(())
    }

    async fn list(&self, query: &ProjectQuery) -> Result<PagedResult<Project>, StoreError> {
        let state = self.lock()?;
        let mut items: Vec<Project> = state
            .projects
            .iter()
            .filter(|p| match &query.scope {
                Scope::Owner(owner) => p.owner_id == *owner,
                Scope::All => true,
            })
            .filter(|p| {
                query
                    .search
                    .as_deref()
                    .is_none_or(|needle| matches_search(needle, &p.name, p.description.as_deref()))
            })
            .cloned()
            .collect();

        match query.sort_by {
            Some(ProjectSortField::Name) => items.sort_by(|a, b| a.name.cmp(&b.name)),
            Some(ProjectSortField::Description) => {
                items.sort_by(|a, b| a.description.cmp(&b.description));
            }
            None => {}
        }
        if query.sort_by.is_some() && query.sort_order == SortOrder::Desc {
            items.reverse();
        }

        Ok(page_slice(items, query.page))
    }
}

#[async_trait]
impl TaskRepository for MemorySession {
    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let state = self.lock()?;
        Ok(state.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn insert(&self, task: &Task) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.tasks.push(task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        match state.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => {
                *existing = task.clone();
                Ok(())
            }
            None => Err(StoreError::query("task does not exist")),
        }
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.tasks.retain(|t| t.id != id);
        Ok(())
    }

    async fn list(&self, query: &TaskQuery) -> Result<PagedResult<Task>, StoreError> {
        let state = self.lock()?;
        let mut items: Vec<Task> = state
            .tasks
            .iter()
            .filter(|t| t.project_id == query.project_id)
            .filter(|t| {
                query
                    .search
                    .as_deref()
                    .is_none_or(|needle| matches_search(needle, &t.title, t.description.as_deref()))
            })
            .cloned()
            .collect();

        match query.sort_by {
            Some(TaskSortField::Title) => items.sort_by(|a, b| a.title.cmp(&b.title)),
            Some(TaskSortField::Status) => {
                items.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str()));
            }
            None => {}
        }
        if query.sort_by.is_some() && query.sort_order == SortOrder::Desc {
            items.reverse();
        }

        Ok(page_slice(items, query.page))
    }
}

#[async_trait]
impl EventOutbox for MemorySession {
    async fn publish(&self, event: &DomainEvent) -> Result<(), StoreError> {
        let payload = serde_json::to_string(event)
            .map_err(|err| StoreError::query(format!("event not serializable: {err}")))?;
        let mut state = self.lock()?;
        let id = state.next_outbox_id;
        state.next_outbox_id += 1;
        state.outbox.push(OutboxEntry {
            record: OutboxRecord {
                id,
                topic: event.topic().to_owned(),
                payload,
            },
            delivered: false,
        });
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemorySession {
    async fn begin(&self) -> Result<(), StoreError> {
        // Lock first, snapshot second: the snapshot must not predate
        // another transaction's commit.
        let guard = Arc::clone(&self.tx_lock).lock_owned().await;
        let snapshot = self.lock()?.clone();
        let mut active = self
            .active
            .lock()
            .map_err(|_| StoreError::query("in-memory transaction poisoned"))?;
        *active = Some(ActiveTransaction {
            snapshot,
            _guard: guard,
        });
        Ok(())
    }

    async fn commit(&self) -> Result<(), StoreError> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| StoreError::query("in-memory transaction poisoned"))?;
        *active = None;
        Ok(())
    }

    async fn rollback(&self) -> Result<(), StoreError> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| StoreError::query("in-memory transaction poisoned"))?;
        if let Some(transaction) = active.take() {
            let mut state = self.lock()?;
            *state = transaction.snapshot;
        }
        Ok(())
    }
}

/// Populate the store with the example data set used by tests and
/// database-less development: user1 owns `Alpha` (two tasks) and `Beta`,
/// user2 owns `Gamma` (one task).
pub async fn seed_example_data(store: &InMemoryStore) -> Result<(), StoreError> {
    let session = store.open().await?;

    let alpha = Project::create(
        UserId::new("user1"),
        "Alpha".to_owned(),
        Some("First project".to_owned()),
    );
    let beta = Project::create(UserId::new("user1"), "Beta".to_owned(), None);
    let gamma = Project::create(
        UserId::new("user2"),
        "Gamma".to_owned(),
        Some("Research".to_owned()),
    );
    session.projects.insert(&alpha).await?;
    session.projects.insert(&beta).await?;
    session.projects.insert(&gamma).await?;

    let setup = Task::create(alpha.id, "Set up repo".to_owned(), None, TaskStatus::Todo);
    let docs = Task::create(
        alpha.id,
        "Write docs".to_owned(),
        Some("user guide".to_owned()),
        TaskStatus::InProgress,
    );
    let review = Task::create(
        gamma.id,
        "Literature review".to_owned(),
        None,
        TaskStatus::Done,
    );
    session.tasks.insert(&setup).await?;
    session.tasks.insert(&docs).await?;
    session.tasks.insert(&review).await?;

    Ok(())
}
