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

//! Error types for ingestion and reconciliation.
//!
//! Failure classes stay distinguishable to the caller:
//! - a [`ParseError`] is fatal for that parse invocation and must never be
//!   conflated with "zero records";
//! - an unsupported file format is *not* an error (the dispatcher yields an
//!   empty sequence and logs a warning);
//! - collaborator failures ([`StoreError`], [`RateError`]) abort the whole
//!   reconciliation run rather than producing a truncated report.

use thiserror::Error;

/// Fatal parse failure: the input could not be interpreted as the declared
/// format at all. Missing fields are not parse errors; they are defaulted.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Amount field present but not a valid decimal literal.
    #[error("cannot parse amount {value:?}")]
    Amount { value: String },

    /// Invalid markup syntax.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid structured encoding.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The CSV reader itself failed (bad quoting, I/O mid-stream).
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The document or a record object did not have the expected shape.
    #[error("malformed structure: {0}")]
    Structure(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure raised by the authoritative record store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("record store failure: {0}")]
pub struct StoreError(pub String);

/// Failure raised by the currency normalizer.
///
/// Note that an *unknown* currency code is not a failure; the normalizer
/// contract returns the amount unchanged in that case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("rate lookup failure: {0}")]
pub struct RateError(pub String);

/// Run-level reconciliation failure.
///
/// Any of these aborts the run; the engine never returns a partial report.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Rates(#[from] RateError),
}
