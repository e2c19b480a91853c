//! Inventory Transaction
//!
//! Atomic read-write and read-only access to the resource arena.
//!
//! Responsibilities:
//! - Apply changes directly and keep an undo log for rollback
//! - Roll back on error, on deadline expiry, or when dropped uncommitted
//! - Buffer change events until commit
//! - One writer at a time, waiting no longer than its deadline
//! - Readers work on the latest committed snapshot and never wait on writers

mod buffer;
mod deadline;
mod error;
mod manager;

pub use buffer::{TransactionBuffer, UndoEntry};
pub use deadline::Deadline;
pub use error::{TransactionError, TransactionResult};
pub use manager::{ReadTxn, TransactionManager, WriteTxn};
