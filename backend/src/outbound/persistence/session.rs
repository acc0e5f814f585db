//! Per-request database session.
//!
//! All diesel adapters built from one [`DbSession`] share a single pooled
//! connection, checked out lazily on first use and held until the session
//! is dropped. That is what lets the unit of work's `BEGIN`/`COMMIT`/
//! `ROLLBACK` cover every repository and outbox write a handler issues.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::bb8::PooledConnection;
use tokio::sync::{Mutex, MutexGuard};

use super::pool::DbPool;
use crate::domain::ports::StoreError;

struct SessionInner {
    pool: DbPool,
    conn: Option<PooledConnection<'static, AsyncPgConnection>>,
}

/// Handle to the session's shared connection. Cheap to clone.
#[derive(Clone)]
pub struct DbSession {
    inner: Arc<Mutex<SessionInner>>,
}

impl DbSession {
    /// Create a session over the pool; no connection is taken yet.
    pub fn new(pool: DbPool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner { pool, conn: None })),
        }
    }

    /// Lock the session and get its connection, checking one out on first
    /// use. The guard serialises access: one statement at a time, as a
    /// single backend connection requires.
    pub(super) async fn conn(&self) -> Result<SessionConn<'_>, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.conn.is_none() {
            let conn = inner
                .pool
                .get_owned()
                .await
                .map_err(|err| StoreError::connection(err.to_string()))?;
            inner.conn = Some(conn);
        }
        Ok(SessionConn { inner })
    }
}

/// Exclusive access to the session's connection for one statement.
pub(super) struct SessionConn<'a> {
    inner: MutexGuard<'a, SessionInner>,
}

impl Deref for SessionConn<'_> {
    type Target = AsyncPgConnection;

    fn deref(&self) -> &Self::Target {
        // Guard is only constructed after the connection is populated.
        self.inner
            .conn
            .as_ref()
            .expect("session connection present while guard is held")
    }
}

impl DerefMut for SessionConn<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.inner
            .conn
            .as_mut()
            .expect("session connection present while guard is held")
    }
}
