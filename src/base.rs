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

//! Core identifier types for dispute records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary external identifier of a dispute case.
///
/// Wraps the raw identifier string as supplied by the source system.
/// Well-formed input carries a non-empty value, but the identifier may be
/// the empty string when the source field was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct DisputeId(pub String);

impl DisputeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier equality as used by the matcher: case-insensitive.
    pub fn matches(&self, other: &DisputeId) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for DisputeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DisputeId {
    fn from(value: &str) -> Self {
        DisputeId(value.to_owned())
    }
}

/// Secondary identifier linking a dispute to the underlying transaction.
///
/// Used as the fallback lookup key when the dispute id yields no match.
/// Same emptiness rule as [`DisputeId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl TransactionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier equality as used by the matcher: case-insensitive.
    pub fn matches(&self, other: &TransactionId) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        TransactionId(value.to_owned())
    }
}
