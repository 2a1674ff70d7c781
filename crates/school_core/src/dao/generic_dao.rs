//! Entity-agnostic record store primitives.
//!
//! # Responsibility
//! - Map each entity type onto its table (`Entity`).
//! - Provide find-by-id / save / remove on top of the session (`GenericDao`).
//!
//! # Invariants
//! - Every primitive runs inside a unit of work, joining the active one when
//!   called from another unit of work.
//! - Write paths validate the entity before any SQL runs.
//! - Reads never fail: store errors are logged and reported as absent.

use crate::model::RecordId;
use crate::session::{SessionService, StoreError, StoreResult};
use log::warn;
use rusqlite::Connection;

/// Table mapping for one entity type.
pub trait Entity: Sized {
    /// Table name, also used as the entity label in errors and logs.
    const TABLE: &'static str;

    fn id(&self) -> Option<RecordId>;

    /// Records the identity assigned by the store on insert.
    fn assign_id(&mut self, id: RecordId);

    /// Rejects values the store columns would not accept.
    fn validate_for_write(&self) -> StoreResult<()>;

    /// Loads one row plus its relationship sets.
    fn load(conn: &Connection, id: RecordId) -> rusqlite::Result<Option<Self>>;

    /// Inserts scalar columns and returns the new identity.
    fn insert(&self, conn: &Connection) -> rusqlite::Result<RecordId>;

    /// Rewrites scalar columns of an existing row; returns changed rows.
    fn update(&self, conn: &Connection, id: RecordId) -> rusqlite::Result<usize>;

    /// Deletes one row; returns changed rows.
    fn delete(conn: &Connection, id: RecordId) -> rusqlite::Result<usize>;

    /// Identity, or [`StoreError::Unpersisted`] for a value never saved.
    fn persisted_id(&self) -> StoreResult<RecordId> {
        self.id()
            .ok_or(StoreError::Unpersisted { table: Self::TABLE })
    }
}

/// Uniform find/save/remove over one entity type.
///
/// Implementors only say which session they use; the primitives come from
/// the default methods.
pub trait GenericDao {
    type Entity: Entity;

    fn session(&self) -> &SessionService;

    /// Loads an entity by identity; `None` when missing or on store failure.
    fn find_by_id(&self, id: RecordId) -> Option<Self::Entity> {
        self.session()
            .run_in_transaction(|conn| Ok(Self::Entity::load(conn, id)?))
            .unwrap_or_else(|err| {
                warn!(
                    "event=dao_find module=dao status=error table={} id={id} error_kind={} error={err}",
                    Self::Entity::TABLE,
                    err.kind()
                );
                None
            })
    }

    /// Inserts an unsaved entity or rewrites a saved one.
    ///
    /// On success the returned entity carries a positive identity: the new
    /// one for inserts, the unchanged one for updates. On failure nothing is
    /// written and the error carries its [`crate::ErrorKind`].
    fn save(&self, mut entity: Self::Entity) -> StoreResult<Self::Entity> {
        let table = Self::Entity::TABLE;
        let result = self.session().run_in_transaction(|conn| {
            entity.validate_for_write()?;
            match entity.id() {
                None => {
                    let id = entity.insert(conn)?;
                    entity.assign_id(id);
                }
                Some(id) => {
                    if entity.update(conn, id)? == 0 {
                        return Err(StoreError::MissingRecord { table, id });
                    }
                }
            }
            Ok(())
        });

        match result {
            Ok(()) => Ok(entity),
            Err(err) => {
                warn!(
                    "event=dao_save module=dao status=error table={table} error_kind={} error={err}",
                    err.kind()
                );
                Err(err)
            }
        }
    }

    /// Deletes the entity's row. Relationship rows are not touched.
    fn remove(&self, entity: &Self::Entity) -> StoreResult<()> {
        let table = Self::Entity::TABLE;
        let id = entity.persisted_id()?;
        self.session()
            .run_in_transaction(|conn| match Self::Entity::delete(conn, id)? {
                0 => Err(StoreError::MissingRecord { table, id }),
                _ => Ok(()),
            })
            .inspect_err(|err| {
                warn!(
                    "event=dao_remove module=dao status=error table={table} id={id} error_kind={} error={err}",
                    err.kind()
                );
            })
    }
}
