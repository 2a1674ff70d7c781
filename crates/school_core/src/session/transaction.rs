//! Transaction coordinator over one SQLite connection.

use super::{ErrorKind, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use log::{debug, error, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::cell::Cell;
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

/// One logical session: a connection plus its transaction state.
///
/// # Invariants
/// - `depth > 0` exactly while a unit of work started by
///   [`SessionService::run_in_transaction`] is executing.
/// - `rollback_only` is only meaningful while `depth > 0` and is reset
///   whenever an outermost unit of work starts.
///
/// The type is `Send` but not `Sync`: a session belongs to one thread.
pub struct SessionService {
    conn: Connection,
    depth: Cell<u32>,
    rollback_only: Cell<Option<ErrorKind>>,
}

impl SessionService {
    /// Wraps a connection that already carries the school schema.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            depth: Cell::new(0),
            rollback_only: Cell::new(None),
        }
    }

    /// Opens a session on a database file, creating the schema if needed.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        open_db(path).map(Self::new)
    }

    /// Opens a session on a fresh private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        open_db_in_memory().map(Self::new)
    }

    /// Raw connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn is_transaction_active(&self) -> bool {
        self.depth.get() > 0
    }

    /// Closes the underlying connection, reporting close failures.
    pub fn close(self) -> DbResult<()> {
        self.conn.close().map_err(|(_, err)| DbError::Sqlite(err))
    }

    /// Runs `work` atomically and returns its value once committed.
    ///
    /// # Contract
    /// - No active transaction: begin, run, commit on `Ok`, roll back on
    ///   `Err` (or on panic) and return the error.
    /// - Active transaction: run `work` inline with no begin/commit. An `Err`
    ///   from nested work marks the outer transaction rollback-only, so the
    ///   outermost call rolls back and returns [`StoreError::RolledBack`]
    ///   even if its own work recovered from the nested error.
    pub fn run_in_transaction<T, F>(&self, work: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        if self.is_transaction_active() {
            return self.run_nested(work);
        }

        let tx_id = Uuid::new_v4();
        let started_at = Instant::now();
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(|err| {
                error!("event=tx_begin module=session status=error tx_id={tx_id} error={err}");
                StoreError::from(err)
            })?;
        debug!("event=tx_begin module=session status=ok tx_id={tx_id}");

        let outcome = {
            let _scope = OutermostScope::enter(self);
            work(&self.conn).and_then(|value| match self.rollback_only.get() {
                None => Ok(value),
                Some(kind) => Err(StoreError::RolledBack(kind)),
            })
        };

        match outcome {
            Ok(value) => match tx.commit() {
                Ok(()) => {
                    debug!(
                        "event=tx_commit module=session status=ok tx_id={tx_id} duration_ms={}",
                        started_at.elapsed().as_millis()
                    );
                    Ok(value)
                }
                Err(err) => {
                    error!(
                        "event=tx_commit module=session status=error tx_id={tx_id} error={err}"
                    );
                    Err(err.into())
                }
            },
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    error!(
                        "event=tx_rollback module=session status=error tx_id={tx_id} error={rollback_err}"
                    );
                }
                warn!(
                    "event=tx_rollback module=session status=ok tx_id={tx_id} error_kind={} error={err} duration_ms={}",
                    err.kind(),
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    fn run_nested<T, F>(&self, work: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        self.depth.set(self.depth.get() + 1);
        let result = work(&self.conn);
        self.depth.set(self.depth.get() - 1);

        if let Err(err) = &result {
            debug!(
                "event=tx_nested_failure module=session status=rollback_only error_kind={} error={err}",
                err.kind()
            );
            if self.rollback_only.get().is_none() {
                self.rollback_only.set(Some(err.kind()));
            }
        }
        result
    }
}

/// Marks the session as inside an outermost unit of work until dropped.
///
/// Dropping during a panic resets the depth, while the still-open
/// `Transaction` rolls back on its own drop.
struct OutermostScope<'s> {
    session: &'s SessionService,
}

impl<'s> OutermostScope<'s> {
    fn enter(session: &'s SessionService) -> Self {
        session.rollback_only.set(None);
        session.depth.set(1);
        Self { session }
    }
}

impl Drop for OutermostScope<'_> {
    fn drop(&mut self) {
        self.session.depth.set(0);
    }
}

#[cfg(test)]
mod tests {
    use super::SessionService;
    use crate::session::{ErrorKind, StoreError};

    #[test]
    fn depth_tracks_outer_and_nested_work() {
        let session = SessionService::open_in_memory().unwrap();
        assert!(!session.is_transaction_active());

        let observed = session
            .run_in_transaction(|_| {
                let outer = session.is_transaction_active();
                let inner = session.run_in_transaction(|_| Ok(session.depth.get()))?;
                Ok((outer, inner, session.depth.get()))
            })
            .unwrap();

        assert_eq!(observed, (true, 2, 1));
        assert!(!session.is_transaction_active());
    }

    #[test]
    fn rollback_only_flag_does_not_leak_into_next_transaction() {
        let session = SessionService::open_in_memory().unwrap();

        let first = session.run_in_transaction(|_| {
            let _ = session.run_in_transaction(|_| {
                Err::<(), _>(StoreError::Unpersisted { table: "grade" })
            });
            Ok(())
        });
        assert!(matches!(
            first,
            Err(StoreError::RolledBack(ErrorKind::ConstraintViolation))
        ));

        assert_eq!(session.run_in_transaction(|_| Ok(7)).unwrap(), 7);
    }
}
