//! Snapshot history and the comparison rows derived from it.
//!
//! The tracker keeps three snapshots: the first one of the session
//! (`initial`), the most recent one (`current`) and the one `current`
//! replaced the last time the numbers actually moved (`previous`).  An
//! optional record from an earlier session is kept alongside for the
//! "last visit" row.

use chrono::{DateTime, Utc};

use crate::source::Snapshot;
use crate::storage::LastVisit;

#[derive(Debug, Clone, Default)]
pub struct History {
    initial: Option<Snapshot>,
    previous: Option<Snapshot>,
    current: Option<Snapshot>,
    last_visit: Option<(Snapshot, DateTime<Utc>)>,
}

/// Which rows to show for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison<'a> {
    pub current: &'a Snapshot,
    pub before: Option<&'a Snapshot>,
    pub initial: Option<&'a Snapshot>,
    pub last_visit: Option<(&'a Snapshot, DateTime<Utc>)>,
}

impl History {
    /// Seed the tracker with the record persisted by an earlier session.
    pub fn with_last_visit(last_visit: Option<&LastVisit>) -> Self {
        let last_visit = last_visit.and_then(|visit| Some((visit.snapshot()?, visit.taken_at()?)));
        Self {
            last_visit,
            ..Self::default()
        }
    }

    /// Take in a freshly fetched snapshot.
    ///
    /// `previous` only moves when the new snapshot differs from `current`;
    /// `initial` is fixed by the first call.
    pub fn record(&mut self, snapshot: Snapshot) {
        match self.current.take() {
            None => {
                self.initial = Some(snapshot.clone());
                self.previous = Some(snapshot.clone());
            }
            Some(current) if current != snapshot => self.previous = Some(current),
            Some(_) => {}
        }
        self.current = Some(snapshot);
    }

    /// Project the tracker onto the rows to display, or `None` before the
    /// first successful lookup.
    pub fn comparison(&self) -> Option<Comparison<'_>> {
        let current = self.current.as_ref()?;
        let previous = self.previous.as_ref()?;
        let initial = self.initial.as_ref()?;

        let before = (current != previous).then_some(previous);
        // Hidden when it would just repeat the "before" row.
        let initial_row = before.and((previous != initial).then_some(initial));

        let last_visit = self
            .last_visit
            .as_ref()
            .filter(|(last, _)| last != current && last != previous && last != initial)
            .map(|(last, at)| (last, *at));

        Some(Comparison {
            current,
            before,
            initial: initial_row,
            last_visit,
        })
    }
}
