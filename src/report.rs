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

//! Discrepancies and the reconciliation report.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

/// Absolute normalized difference above which an amount mismatch is graded
/// [`Severity::High`]. A difference of exactly this value stays `Medium`.
pub const AMOUNT_HIGH_THRESHOLD: Decimal = dec!(100);

/// Materiality grade of a discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Medium,
    High,
}

impl Severity {
    /// Grades an amount mismatch by its absolute normalized difference.
    pub fn for_amount_difference(difference: Decimal) -> Self {
        if difference.abs() > AMOUNT_HIGH_THRESHOLD {
            Severity::High
        } else {
            Severity::Medium
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
        }
    }
}

/// What kind of mismatch a [`Discrepancy`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiscrepancyKind {
    IdMismatch,
    TransactionMismatch,
    AmountMismatch,
    StatusMismatch,
    /// Synthetic: the incoming record matched cleanly but the authoritative
    /// case is no longer open.
    AlreadyResolved,
}

/// One detected difference between an incoming record and its match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discrepancy {
    pub kind: DiscrepancyKind,
    /// Set for amount mismatches; the other kinds carry no grade.
    pub severity: Option<Severity>,
    pub message: String,
}

impl Discrepancy {
    pub(crate) fn new(kind: DiscrepancyKind, message: String) -> Self {
        Self { kind, severity: None, message }
    }

    pub(crate) fn graded(kind: DiscrepancyKind, severity: Severity, message: String) -> Self {
        Self { kind, severity: Some(severity), message }
    }
}

/// The outcome of one reconciliation run.
///
/// Two ordered sections: one audit line per incoming record, then one alert
/// line per record that produced at least one discrepancy or was not found.
/// A report is generated fresh per run and never mutated afterwards; the
/// caller owns persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    audit: Vec<String>,
    alerts: Vec<String>,
}

impl Report {
    pub(crate) fn new(audit: Vec<String>, alerts: Vec<String>) -> Self {
        Self { audit, alerts }
    }

    /// Audit lines, one per incoming record, in input order.
    pub fn audit(&self) -> &[String] {
        &self.audit
    }

    /// Alert lines, one per flagged record, in input order.
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Renders the report body handed to the caller's sink.
    pub fn render(&self) -> String {
        let mut out = String::from("===== AUDIT =====\n");
        for line in &self.audit {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out.push_str("===== ALERTS =====\n");
        for line in &self.alerts {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_grading_boundary() {
        assert_eq!(Severity::for_amount_difference(dec!(100.01)), Severity::High);
        assert_eq!(Severity::for_amount_difference(dec!(100)), Severity::Medium);
        assert_eq!(Severity::for_amount_difference(dec!(-150)), Severity::High);
        assert_eq!(Severity::for_amount_difference(dec!(0.01)), Severity::Medium);
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::High.to_string(), "HIGH");
        assert_eq!(Severity::Medium.to_string(), "MEDIUM");
    }

    #[test]
    fn render_layout() {
        let report = Report::new(
            vec!["AUDIT: a".into(), "AUDIT: b".into()],
            vec!["HIGH: b not found".into()],
        );
        assert_eq!(
            report.render(),
            "===== AUDIT =====\nAUDIT: a\nAUDIT: b\n\n===== ALERTS =====\nHIGH: b not found\n"
        );
    }

    #[test]
    fn empty_report_keeps_both_headers() {
        let report = Report::new(Vec::new(), Vec::new());
        assert_eq!(report.render(), "===== AUDIT =====\n\n===== ALERTS =====\n");
    }
}
