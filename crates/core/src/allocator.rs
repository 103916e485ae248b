// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record id allocation.
//!
//! Ids come from a cyclic counter over `[1, 65534]`. Ids released by a
//! delete are handed out again, oldest release first, before the counter
//! advances.

use crate::record::RecordId;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RecordIdAllocator {
    last: RecordId,
    free: VecDeque<RecordId>,
}

impl Default for RecordIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordIdAllocator {
    /// A fresh allocator whose first id is 1
    pub fn new() -> Self {
        Self {
            last: RecordId::INVALID,
            free: VecDeque::new(),
        }
    }

    /// Seed the counter from ids already present in persisted storage.
    ///
    /// The counter resumes after the largest valid id; with no ids it
    /// starts from 1 again. The free list is cleared.
    pub fn initialize(&mut self, existing: impl IntoIterator<Item = RecordId>) {
        self.free.clear();
        self.last = existing
            .into_iter()
            .filter(|id| id.is_valid())
            .max()
            .unwrap_or(RecordId::INVALID);
    }

    pub fn allocate(&mut self) -> RecordId {
        if let Some(id) = self.free.pop_front() {
            return id;
        }
        self.last = if self.last >= RecordId::LAST {
            RecordId::FIRST
        } else {
            RecordId(self.last.0 + 1)
        };
        self.last
    }

    /// Return an id for reuse. Invalid or already-free ids are ignored.
    pub fn release(&mut self, id: RecordId) -> bool {
        if !id.is_valid() || self.free.contains(&id) {
            return false;
        }
        self.free.push_back(id);
        true
    }

    /// Forget every allocation; the next id is 1
    pub fn reset_all(&mut self) {
        self.last = RecordId::INVALID;
        self.free.clear();
    }

    /// Most recently issued counter value, if any
    pub fn last_issued(&self) -> Option<RecordId> {
        self.last.is_valid().then_some(self.last)
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
#[path = "allocator_tests.rs"]
mod tests;
