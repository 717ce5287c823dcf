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

//! Reconciliation engine.
//!
//! The [`Reconciler`] turns a sequence of incoming dispute records into a
//! [`Report`], consulting the record store and the currency normalizer per
//! record.
//!
//! # Per-record algorithm
//!
//! 1. Emit one audit line, regardless of match outcome.
//! 2. Resolve a match: by dispute id, then by transaction id. No match
//!    produces a HIGH not-found alert and ends processing of that record.
//! 3. Run the four discrepancy checks (id, transaction id, normalized
//!    amount, status) in fixed order without short-circuiting.
//! 4. If nothing fired but the matched case is not open, emit the
//!    synthetic "already resolved" discrepancy.
//! 5. Join any discrepancy messages into one alert line.

use crate::error::{ParseError, RateError, ReconcileError, StoreError};
use crate::parser;
use crate::rates::CurrencyNormalizer;
use crate::record::DisputeRecord;
use crate::report::{Discrepancy, DiscrepancyKind, Report, Severity};
use crate::store::RecordStore;
use std::io::{Read, Seek};
use tracing::debug;

/// One lookup strategy; strategies are tried in order until one matches.
type LookupFn<S> = fn(&S, &DisputeRecord) -> Result<Option<DisputeRecord>, StoreError>;

/// Matches incoming dispute records against the system-of-record.
///
/// # Invariants
///
/// - Records are processed independently, in input order; audit line *i*
///   always corresponds to incoming record *i*.
/// - Store lookups happen strictly sequentially within one run, per the
///   [`RecordStore`] contract.
/// - A run either completes with a full report or fails with an error;
///   there is no partial output, and an abandoned run leaves no trace.
pub struct Reconciler<S, N> {
    store: S,
    rates: N,
}

impl<S: RecordStore, N: CurrencyNormalizer> Reconciler<S, N> {
    pub fn new(store: S, rates: N) -> Self {
        Self { store, rates }
    }

    /// Reconciles a dispute file, picking the parser from the file name.
    ///
    /// An unsupported suffix contributes zero records (and a report with
    /// empty sections), not an error.
    pub fn reconcile_file<R: Read + Seek>(
        &self,
        reader: R,
        file_name: &str,
    ) -> Result<Report, ReconcileError> {
        let records = parser::parse_with_hint(reader, file_name)?;
        self.reconcile(records)
    }

    /// Reconciles an already-structured batch, bypassing format detection.
    pub fn reconcile_records<I>(&self, records: I) -> Result<Report, ReconcileError>
    where
        I: IntoIterator<Item = DisputeRecord>,
    {
        self.reconcile(records.into_iter().map(Ok))
    }

    /// Reconciles a parsed record sequence into a report.
    ///
    /// # Errors
    ///
    /// A [`ParseError`] surfaced by the sequence or any collaborator
    /// failure aborts the whole run.
    pub fn reconcile<I>(&self, incoming: I) -> Result<Report, ReconcileError>
    where
        I: IntoIterator<Item = Result<DisputeRecord, ParseError>>,
    {
        let mut audit = Vec::new();
        let mut alerts = Vec::new();

        for item in incoming {
            let incoming = item?;

            // The audit trail covers every incoming record, matched or not.
            audit.push(audit_line(&incoming));

            let Some(matched) = self.resolve(&incoming)? else {
                alerts.push(format!(
                    "{}: {}/{} not found",
                    Severity::High,
                    incoming.dispute_id,
                    incoming.transaction_id
                ));
                continue;
            };

            let discrepancies = self.diff(&incoming, &matched)?;
            if !discrepancies.is_empty() {
                let joined = discrepancies
                    .iter()
                    .map(|d| d.message.as_str())
                    .collect::<Vec<_>>()
                    .join(" | ");
                alerts.push(joined);
            }
        }

        debug!(records = audit.len(), alerts = alerts.len(), "reconciliation run complete");
        Ok(Report::new(audit, alerts))
    }

    /// Resolves the authoritative counterpart of an incoming record.
    ///
    /// First hit wins; later strategies are never attempted after a match.
    fn resolve(&self, incoming: &DisputeRecord) -> Result<Option<DisputeRecord>, StoreError> {
        let strategies: [LookupFn<S>; 2] = [
            |store, record| store.find_by_dispute_id(record.dispute_id.as_str()),
            |store, record| store.find_by_transaction_id(record.transaction_id.as_str()),
        ];

        for lookup in strategies {
            if let Some(found) = lookup(&self.store, incoming)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Computes the discrepancies between an incoming record and its match.
    ///
    /// All four checks always run; a fallback match that trips the id check
    /// can still carry genuine amount or status issues.
    pub fn diff(
        &self,
        incoming: &DisputeRecord,
        matched: &DisputeRecord,
    ) -> Result<Vec<Discrepancy>, RateError> {
        let mut found = Vec::new();
        let tag = format!("[{}/{}]", incoming.dispute_id, incoming.transaction_id);

        if !incoming.dispute_id.matches(&matched.dispute_id) {
            found.push(Discrepancy::new(
                DiscrepancyKind::IdMismatch,
                format!(
                    "{tag} id mismatch: {} vs {}",
                    incoming.dispute_id, matched.dispute_id
                ),
            ));
        }

        if !incoming.transaction_id.matches(&matched.transaction_id) {
            found.push(Discrepancy::new(
                DiscrepancyKind::TransactionMismatch,
                format!(
                    "{tag} transaction mismatch: {} vs {}",
                    incoming.transaction_id, matched.transaction_id
                ),
            ));
        }

        let incoming_normalized = self.rates.normalize(incoming.amount, &incoming.currency)?;
        let matched_normalized = self.rates.normalize(matched.amount, &matched.currency)?;
        if incoming_normalized != matched_normalized {
            let severity =
                Severity::for_amount_difference(matched_normalized - incoming_normalized);
            found.push(Discrepancy::graded(
                DiscrepancyKind::AmountMismatch,
                severity,
                format!(
                    "{tag} amount mismatch: {matched_normalized:.2} vs {incoming_normalized:.2} [{severity}]"
                ),
            ));
        }

        if !incoming.status_matches(matched) {
            found.push(Discrepancy::new(
                DiscrepancyKind::StatusMismatch,
                format!(
                    "{tag} status mismatch: {} vs {}",
                    matched.status, incoming.status
                ),
            ));
        }

        // A clean match against a case that is no longer open still needs
        // surfacing, so the operator knows no further action is pending.
        if found.is_empty() && !matched.is_open() {
            found.push(Discrepancy::new(
                DiscrepancyKind::AlreadyResolved,
                format!("{tag} already resolved"),
            ));
        }

        Ok(found)
    }
}

fn audit_line(record: &DisputeRecord) -> String {
    format!(
        "AUDIT: {} | {} | {:.2} {} | {}",
        record.dispute_id, record.transaction_id, record.amount, record.currency, record.status
    )
}
