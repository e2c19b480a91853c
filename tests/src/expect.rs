//! Expectations over results and published events.

use inv_core::{ChangeEvent, Code, EventKind};
use inv_store::{StoreError, StoreResult};
use std::fmt::Debug;

/// Unwrap the error of `result`, checking its code.
#[track_caller]
pub fn expect_err<T: Debug>(result: StoreResult<T>, code: Code) -> StoreError {
    match result {
        Ok(value) => panic!("expected {code:?}, got Ok({value:?})"),
        Err(err) => {
            assert_eq!(err.code(), code, "unexpected error: {err}");
            err
        }
    }
}

/// Expected event counts per kind. Unset counts are not checked.
#[derive(Debug, Default, Clone)]
pub struct ExpectEvents {
    created: Option<usize>,
    updated: Option<usize>,
    deleted: Option<usize>,
    sequence: Option<Vec<EventKind>>,
}

impl ExpectEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// No events at all.
    pub fn none() -> Self {
        Self::new().created(0).updated(0).deleted(0)
    }

    pub fn created(mut self, n: usize) -> Self {
        self.created = Some(n);
        self
    }

    pub fn updated(mut self, n: usize) -> Self {
        self.updated = Some(n);
        self
    }

    pub fn deleted(mut self, n: usize) -> Self {
        self.deleted = Some(n);
        self
    }

    /// The exact kinds, in delivery order.
    pub fn sequence(mut self, kinds: &[EventKind]) -> Self {
        self.sequence = Some(kinds.to_vec());
        self
    }

    #[track_caller]
    pub fn verify(&self, events: &[ChangeEvent]) {
        let count = |kind| events.iter().filter(|e| e.kind == kind).count();
        let checks = [
            (EventKind::Created, self.created),
            (EventKind::Updated, self.updated),
            (EventKind::Deleted, self.deleted),
        ];
        for (kind, expected) in checks {
            if let Some(expected) = expected {
                assert_eq!(count(kind), expected, "{kind} events in {events:#?}");
            }
        }
        if let Some(sequence) = &self.sequence {
            let actual: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
            assert_eq!(&actual, sequence, "event sequence");
        }
    }
}
