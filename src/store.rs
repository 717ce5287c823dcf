// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Authoritative record lookup.
//!
//! The system-of-record is an external collaborator; the engine only needs
//! a read interface. [`InMemoryStore`] is the reference implementation used
//! by the CLI and the test suites.

use crate::error::StoreError;
use crate::record::DisputeRecord;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// Read interface over the authoritative dispute store.
///
/// # Access contract
///
/// Within one reconciliation run the engine calls these methods strictly
/// sequentially; implementations are never asked to serve concurrent
/// lookups for the same run. Implementations that are shared across
/// concurrent runs must be internally synchronized or externally locked.
///
/// Lookups are exact-match on the stored identifier. `Ok(None)` means
/// "no such record" and is not a failure; `Err` aborts the run.
pub trait RecordStore {
    fn find_by_dispute_id(&self, id: &str) -> Result<Option<DisputeRecord>, StoreError>;

    fn find_by_transaction_id(&self, id: &str) -> Result<Option<DisputeRecord>, StoreError>;
}

/// In-memory system-of-record.
///
/// Keeps two indexes over shared records so both lookup paths are O(1).
/// The indexes are concurrent maps, which makes a single store safe to
/// share across concurrent reconciliation runs (stricter than the
/// [`RecordStore`] contract requires).
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// Records indexed by dispute id.
    by_dispute_id: DashMap<String, Arc<DisputeRecord>>,

    /// The same records indexed by transaction id for fallback lookup.
    by_transaction_id: DashMap<String, Arc<DisputeRecord>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an authoritative record.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if a record with the same dispute id is
    /// already present. The check-and-insert is atomic.
    pub fn insert(&self, record: DisputeRecord) -> Result<(), StoreError> {
        let record = Arc::new(record);

        match self.by_dispute_id.entry(record.dispute_id.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StoreError(format!(
                "duplicate dispute id {}",
                record.dispute_id
            ))),
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&record));
                self.by_transaction_id
                    .insert(record.transaction_id.as_str().to_owned(), record);
                Ok(())
            }
        }
    }

    /// Seeds the store from an iterator of records, stopping at the first
    /// duplicate.
    pub fn seed<I>(&self, records: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = DisputeRecord>,
    {
        for record in records {
            self.insert(record)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.by_dispute_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_dispute_id.is_empty()
    }
}

impl RecordStore for InMemoryStore {
    fn find_by_dispute_id(&self, id: &str) -> Result<Option<DisputeRecord>, StoreError> {
        Ok(self.by_dispute_id.get(id).map(|r| (**r).clone()))
    }

    fn find_by_transaction_id(&self, id: &str) -> Result<Option<DisputeRecord>, StoreError> {
        Ok(self.by_transaction_id.get(id).map(|r| (**r).clone()))
    }
}
