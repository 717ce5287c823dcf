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

//! # Dispute Reconciliation
//!
//! This library reconciles externally supplied dispute records (CSV, XML
//! or JSON files, or already-structured batches) against an authoritative
//! system-of-record, producing an audit trail and a severity-graded list
//! of discrepancies.
//!
//! ## Core Components
//!
//! - [`Reconciler`]: matching/diff engine producing the final [`Report`]
//! - [`DisputeRecord`]: canonical record every parser normalizes into
//! - [`parser`]: format dispatcher and the three file parsers
//! - [`RecordStore`] / [`CurrencyNormalizer`]: collaborator seams for the
//!   authoritative store and rate lookup
//!
//! ## Example
//!
//! ```
//! use dispute_recon_rs::{DisputeRecord, InMemoryStore, Reconciler, StaticRates};
//! use rust_decimal_macros::dec;
//!
//! let store = InMemoryStore::new();
//! store
//!     .insert(DisputeRecord {
//!         dispute_id: "case_001".into(),
//!         transaction_id: "txn_001".into(),
//!         amount: dec!(100.00),
//!         currency: "USD".into(),
//!         status: "Open".into(),
//!         reason: "Fraud".into(),
//!     })
//!     .unwrap();
//!
//! let engine = Reconciler::new(store, StaticRates::usd_base());
//! let incoming = DisputeRecord {
//!     dispute_id: "case_001".into(),
//!     transaction_id: "txn_001".into(),
//!     amount: dec!(100.00),
//!     currency: "USD".into(),
//!     status: "Open".into(),
//!     reason: "Fraud".into(),
//! };
//! let report = engine.reconcile_records([incoming]).unwrap();
//!
//! assert_eq!(report.audit().len(), 1);
//! assert!(report.alerts().is_empty());
//! ```
//!
//! ## Concurrency
//!
//! A run is a single sequential pass: collaborator lookups for one run
//! never overlap, and audit/alert lines always come out in input order.
//! Separate runs may share one [`InMemoryStore`] concurrently.

pub mod base;
mod engine;
pub mod error;
pub mod parser;
mod rates;
mod record;
mod report;
mod store;

pub use base::{DisputeId, TransactionId};
pub use engine::Reconciler;
pub use error::{ParseError, RateError, ReconcileError, StoreError};
pub use parser::FileFormat;
pub use rates::{CurrencyNormalizer, StaticRates};
pub use record::DisputeRecord;
pub use report::{AMOUNT_HIGH_THRESHOLD, Discrepancy, DiscrepancyKind, Report, Severity};
pub use store::{InMemoryStore, RecordStore};
