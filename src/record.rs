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

//! The canonical dispute record.
//!
//! Every parser normalizes its source format into [`DisputeRecord`]; the
//! reconciliation engine consumes nothing else. Records are built by value
//! in a single pass and never mutated afterwards.

use crate::base::{DisputeId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A dispute record, independent of its original serialization.
///
/// Amounts are exact base-10 decimals; monetary values are never carried
/// through binary floating point. Text fields default to the empty string
/// when the source field is absent, the amount defaults to zero.
///
/// The serde aliases accept the PascalCase field names used by upstream
/// export files, so an already-structured JSON list deserializes directly
/// into a `Vec<DisputeRecord>` without going through format detection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisputeRecord {
    #[serde(alias = "DisputeId")]
    pub dispute_id: DisputeId,
    #[serde(alias = "TransactionId")]
    pub transaction_id: TransactionId,
    #[serde(alias = "Amount")]
    pub amount: Decimal,
    #[serde(alias = "Currency")]
    pub currency: String,
    #[serde(alias = "Status")]
    pub status: String,
    #[serde(alias = "Reason")]
    pub reason: String,
}

impl DisputeRecord {
    /// Lifecycle check used by the engine's "already resolved" rule.
    /// Status text is free-form and compared case-insensitively.
    pub fn is_open(&self) -> bool {
        self.status.eq_ignore_ascii_case("Open")
    }

    /// Status equality as used by the matcher: case-insensitive.
    pub fn status_matches(&self, other: &DisputeRecord) -> bool {
        self.status.eq_ignore_ascii_case(&other.status)
    }
}
