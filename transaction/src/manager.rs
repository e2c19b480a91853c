//! Transaction manager and the read-write / read-only transactions it hands out.

use crate::buffer::{TransactionBuffer, UndoEntry};
use crate::{Deadline, TransactionError, TransactionResult};
use inv_core::{now, Attributes, ChangeEvent, EdgeMap, GraphError, ResourceId, RowId, TenantId, Timestamp, Value};
use inv_graph::{Graph, Row};
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::sync::Arc;
use tracing::debug;

/// Owns the arena, serializes writers and hands readers snapshots.
///
/// Writers change a private staging copy in place and keep an undo log for
/// rollback. A commit publishes a fresh snapshot of the staging copy, so
/// readers never wait on a writer and never see uncommitted changes.
#[derive(Debug, Default)]
pub struct TransactionManager {
    /// Equal to `published` whenever no writer holds it.
    staging: Mutex<Graph>,
    published: RwLock<Arc<Graph>>,
}

impl TransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_graph(graph: Graph) -> Self {
        Self {
            staging: Mutex::new(graph.clone()),
            published: RwLock::new(Arc::new(graph)),
        }
    }

    /// Run `f` in a read-write transaction.
    ///
    /// On `Ok` the transaction commits and its events are returned for
    /// delivery; on `Err` every change is undone.
    pub fn write<T, E, F>(&self, deadline: Deadline, f: F) -> Result<(T, Vec<ChangeEvent>), E>
    where
        E: From<TransactionError>,
        F: FnOnce(&mut WriteTxn<'_>) -> Result<T, E>,
    {
        self.write_then(deadline, f, |events| events)
    }

    /// Like [`TransactionManager::write`], handing the committed events to
    /// `deliver` before the next writer may start. Deliveries therefore run
    /// in commit order.
    pub fn write_then<T, E, F, D, R>(&self, deadline: Deadline, f: F, deliver: D) -> Result<(T, R), E>
    where
        E: From<TransactionError>,
        F: FnOnce(&mut WriteTxn<'_>) -> Result<T, E>,
        D: FnOnce(Vec<ChangeEvent>) -> R,
    {
        let mut staging = self.lock_staging(&deadline)?;
        let mut txn = WriteTxn::new(&mut staging, deadline);
        txn.check_deadline()?;
        let value = f(&mut txn)?;
        let events = txn.commit()?;
        *self.published.write() = Arc::new(Graph::clone(&staging));
        Ok((value, deliver(events)))
    }

    /// Run `f` in a read-only transaction over the latest commit.
    pub fn read<T, E, F>(&self, deadline: Deadline, f: F) -> Result<T, E>
    where
        E: From<TransactionError>,
        F: FnOnce(&ReadTxn<'_>) -> Result<T, E>,
    {
        let snapshot = Arc::clone(&self.published.read());
        let txn = ReadTxn::new(&snapshot, deadline);
        txn.check_deadline()?;
        f(&txn)
    }

    /// Wait for the staging copy no longer than the deadline allows.
    fn lock_staging(&self, deadline: &Deadline) -> TransactionResult<MutexGuard<'_, Graph>> {
        match deadline.remaining() {
            None => Ok(self.staging.lock()),
            Some(left) => self.staging.try_lock_for(left).ok_or_else(|| {
                debug!("gave up waiting for the writer lock");
                deadline.exceeded()
            }),
        }
    }
}

// ==================== Read-Write ====================

/// An open read-write transaction.
///
/// Dropping it without [`WriteTxn::commit`] rolls every change back.
pub struct WriteTxn<'g> {
    graph: &'g mut Graph,
    buffer: TransactionBuffer,
    deadline: Deadline,
    now: Timestamp,
    committed: bool,
}

impl<'g> WriteTxn<'g> {
    pub fn new(graph: &'g mut Graph, deadline: Deadline) -> Self {
        Self {
            graph,
            buffer: TransactionBuffer::new(),
            deadline,
            now: now(),
            committed: false,
        }
    }

    /// Read access, including this transaction's own writes.
    pub fn graph(&self) -> &Graph {
        self.graph
    }

    /// Timestamp stamped on every row this transaction writes.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn check_deadline(&self) -> TransactionResult<()> {
        self.deadline.check()
    }

    pub fn is_created(&self, id: RowId) -> bool {
        self.buffer.is_created(id)
    }

    // ========== Operations ==========

    pub fn create_row(
        &mut self,
        resource_id: ResourceId,
        tenant_id: TenantId,
        fields: Attributes,
        links: EdgeMap,
    ) -> TransactionResult<RowId> {
        self.check_deadline()?;
        let id = self
            .graph
            .create_row(resource_id, tenant_id, fields, links, self.now)?;
        self.buffer.track_created(id);
        Ok(id)
    }

    pub fn set_field(&mut self, id: RowId, name: &str, value: Value) -> TransactionResult<()> {
        self.check_deadline()?;
        self.snapshot(id)?;
        self.graph.set_field(id, name, value)?;
        Ok(())
    }

    pub fn set_links(
        &mut self,
        id: RowId,
        edge: &str,
        targets: Vec<ResourceId>,
    ) -> TransactionResult<()> {
        self.check_deadline()?;
        self.snapshot(id)?;
        self.graph.set_links(id, edge, targets)?;
        Ok(())
    }

    /// Stamp `updated_at`.
    pub fn touch(&mut self, id: RowId) -> TransactionResult<()> {
        self.snapshot(id)?;
        self.graph.touch(id, self.now)?;
        Ok(())
    }

    /// Remove a row that nothing links to.
    pub fn remove(&mut self, id: RowId) -> TransactionResult<Row> {
        self.check_deadline()?;
        let row = self.graph.remove(id)?;
        self.buffer.track_removed(row.clone());
        Ok(row)
    }

    /// Queue an event for delivery on commit.
    pub fn emit(&mut self, event: ChangeEvent) {
        self.buffer.push_event(event);
    }

    pub fn events(&self) -> &[ChangeEvent] {
        self.buffer.events()
    }

    fn snapshot(&mut self, id: RowId) -> TransactionResult<()> {
        let prior = self.graph.get_row(id).ok_or(GraphError::RowNotFound(id))?;
        self.buffer.track_changed(prior);
        Ok(())
    }

    // ========== Lifecycle ==========

    /// Commit, returning the buffered events.
    ///
    /// A deadline that expired during the transaction rolls it back instead.
    pub fn commit(mut self) -> TransactionResult<Vec<ChangeEvent>> {
        self.check_deadline()?;
        self.committed = true;
        debug!(
            changes = self.buffer.change_count(),
            events = self.buffer.events().len(),
            "transaction committed"
        );
        Ok(self.buffer.take_events())
    }

    /// Undo every change made so far.
    pub fn rollback(mut self) {
        self.undo_all();
        self.committed = true;
    }

    fn undo_all(&mut self) {
        let changes = self.buffer.change_count();
        for entry in self.buffer.drain_undo() {
            match entry {
                UndoEntry::Created(id) => {
                    self.graph.take(id);
                }
                UndoEntry::Changed(row) | UndoEntry::Removed(row) => self.graph.put(row),
            }
        }
        self.buffer.clear();
        debug!(changes, "transaction rolled back");
    }
}

impl Drop for WriteTxn<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.undo_all();
        }
    }
}

// ==================== Read-Only ====================

/// An open read-only transaction.
pub struct ReadTxn<'g> {
    graph: &'g Graph,
    deadline: Deadline,
}

impl<'g> ReadTxn<'g> {
    pub fn new(graph: &'g Graph, deadline: Deadline) -> Self {
        Self { graph, deadline }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn check_deadline(&self) -> TransactionResult<()> {
        self.deadline.check()
    }
}
