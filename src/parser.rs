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

//! Dispute file parsing.
//!
//! Three source formats are normalized into [`DisputeRecord`]s: delimited
//! text (CSV), hierarchical markup (XML) and structured object lists
//! (JSON). [`parse_with_hint`] picks the parser from the file-name suffix.
//!
//! All parsers share one edge-case policy: a *parse error* (unparseable
//! amount, invalid document syntax) is fatal for the invocation, while a
//! *missing field* is silently defaulted and never an error.

use crate::base::{DisputeId, TransactionId};
use crate::error::ParseError;
use crate::record::DisputeRecord;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::{Read, Seek};
use std::str::FromStr;
use tracing::warn;

/// Element name that delimits one record in markup input.
const RECORD_ELEMENT: &str = "Dispute";

/// The closed set of supported dispute file formats.
///
/// Selected once per file from the name suffix, then dispatched with a
/// plain `match`; the format set is fixed, so there is no dynamic parser
/// registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xml,
    Json,
    Unsupported,
}

impl FileFormat {
    /// Detects the format from a file-name hint, case-insensitively.
    pub fn from_hint(file_name: &str) -> Self {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            FileFormat::Csv
        } else if lower.ends_with(".xml") {
            FileFormat::Xml
        } else if lower.ends_with(".json") {
            FileFormat::Json
        } else {
            FileFormat::Unsupported
        }
    }
}

/// A finite, single-pass sequence of parsed records.
///
/// CSV rows decode lazily as the sequence is consumed; XML and JSON read
/// the whole document up front (their syntax cannot be validated
/// incrementally), so their errors surface at construction. The sequence
/// is single-consumer and cannot be restarted.
pub struct Records<R: Read> {
    inner: Inner<R>,
}

enum Inner<R: Read> {
    Csv(csv::StringRecordsIntoIter<R>),
    Buffered(std::vec::IntoIter<DisputeRecord>),
}

impl<R: Read> Records<R> {
    fn buffered(records: Vec<DisputeRecord>) -> Self {
        Self { inner: Inner::Buffered(records.into_iter()) }
    }

    fn empty() -> Self {
        Self::buffered(Vec::new())
    }
}

impl<R: Read> Iterator for Records<R> {
    type Item = Result<DisputeRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Csv(rows) => loop {
                match rows.next()? {
                    Err(e) => return Some(Err(e.into())),
                    // Rows with fewer than six fields are silently skipped.
                    Ok(row) if row.len() < 6 => continue,
                    Ok(row) => return Some(csv_record(&row)),
                }
            },
            Inner::Buffered(records) => records.next().map(Ok),
        }
    }
}

/// Rewinds the stream and delegates to the parser matching the file-name
/// suffix. An unrecognized suffix is not an error: it logs a warning and
/// contributes zero records to the batch.
pub fn parse_with_hint<R: Read + Seek>(
    mut reader: R,
    file_name: &str,
) -> Result<Records<R>, ParseError> {
    reader.rewind()?;
    match FileFormat::from_hint(file_name) {
        FileFormat::Csv => Ok(parse_csv(reader)),
        FileFormat::Xml => Ok(Records::buffered(parse_xml(reader)?)),
        FileFormat::Json => Ok(Records::buffered(parse_json(reader)?)),
        FileFormat::Unsupported => {
            warn!(file = %file_name, "unsupported dispute file format, contributing zero records");
            Ok(Records::empty())
        }
    }
}

/// Parses delimited text.
///
/// The first line is a header and is discarded without validation. Each
/// subsequent non-blank row maps positionally to (dispute id, transaction
/// id, amount, currency, status, reason); extra fields are ignored. A
/// malformed amount surfaces as a fatal error when that row is reached.
pub fn parse_csv<R: Read>(reader: R) -> Records<R> {
    let rows = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
        .into_records();
    Records { inner: Inner::Csv(rows) }
}

fn csv_record(row: &csv::StringRecord) -> Result<DisputeRecord, ParseError> {
    Ok(DisputeRecord {
        dispute_id: row[0].into(),
        transaction_id: row[1].into(),
        amount: parse_amount(&row[2])?,
        currency: row[3].to_owned(),
        status: row[4].to_owned(),
        reason: row[5].to_owned(),
    })
}

/// Parses hierarchical markup.
///
/// The entire stream is one document; every `<Dispute>` element at any
/// depth yields one record, with each field read from the same-named child
/// element. A missing child defaults (empty string, zero amount).
pub fn parse_xml<R: Read>(mut reader: R) -> Result<Vec<DisputeRecord>, ParseError> {
    let mut xml = String::new();
    reader.read_to_string(&mut xml)?;
    parse_xml_str(&xml)
}

fn parse_xml_str(xml: &str) -> Result<Vec<DisputeRecord>, ParseError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut rd = Reader::from_str(xml);
    rd.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut in_record = false;
    let mut field: Option<String> = None;
    let mut saw_element = false;

    loop {
        match rd.read_event()? {
            Event::Start(e) => {
                saw_element = true;
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == RECORD_ELEMENT {
                    in_record = true;
                    field = None;
                    fields.clear();
                } else if in_record {
                    field = Some(name);
                }
            }
            Event::Text(e) => {
                if let Some(name) = &field {
                    fields
                        .entry(name.clone())
                        .or_default()
                        .push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == RECORD_ELEMENT.as_bytes() {
                    in_record = false;
                    records.push(xml_record(&fields)?);
                    fields.clear();
                } else {
                    field = None;
                }
            }
            Event::Empty(e) => {
                saw_element = true;
                // A self-closing record has every field absent; a
                // self-closing child is treated the same as a missing one.
                if e.name().as_ref() == RECORD_ELEMENT.as_bytes() && !in_record {
                    records.push(xml_record(&HashMap::new())?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_element {
        return Err(ParseError::Structure("missing XML root element".into()));
    }
    Ok(records)
}

fn xml_record(fields: &HashMap<String, String>) -> Result<DisputeRecord, ParseError> {
    let text = |name: &str| fields.get(name).cloned().unwrap_or_default();
    let amount = match fields.get("Amount") {
        Some(raw) => parse_amount(raw)?,
        None => Decimal::ZERO,
    };
    Ok(DisputeRecord {
        dispute_id: DisputeId(text("DisputeId")),
        transaction_id: TransactionId(text("TransactionId")),
        amount,
        currency: text("Currency"),
        status: text("Status"),
        reason: text("Reason"),
    })
}

/// Parses a structured object list.
///
/// The stream is one JSON array of record objects; field names are matched
/// case-insensitively. A `null` document yields an empty sequence. Amounts
/// are accepted as JSON numbers or strings.
pub fn parse_json<R: Read>(reader: R) -> Result<Vec<DisputeRecord>, ParseError> {
    let objects: Option<Vec<Map<String, Value>>> = serde_json::from_reader(reader)?;
    let Some(objects) = objects else {
        return Ok(Vec::new());
    };
    objects.iter().map(json_record).collect()
}

fn json_record(object: &Map<String, Value>) -> Result<DisputeRecord, ParseError> {
    Ok(DisputeRecord {
        dispute_id: DisputeId(json_text(object, "disputeId")?),
        transaction_id: TransactionId(json_text(object, "transactionId")?),
        amount: json_amount(object)?,
        currency: json_text(object, "currency")?,
        status: json_text(object, "status")?,
        reason: json_text(object, "reason")?,
    })
}

fn json_field<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object
        .iter()
        .find_map(|(key, value)| key.eq_ignore_ascii_case(name).then_some(value))
}

fn json_text(object: &Map<String, Value>, name: &str) -> Result<String, ParseError> {
    match json_field(object, name) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ParseError::Structure(format!(
            "expected string for {name}, got {other}"
        ))),
    }
}

fn json_amount(object: &Map<String, Value>) -> Result<Decimal, ParseError> {
    match json_field(object, "amount") {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(Value::Number(n)) => parse_amount(&n.to_string()),
        Some(Value::String(s)) => parse_amount(s),
        Some(other) => Err(ParseError::Structure(format!(
            "expected number for amount, got {other}"
        ))),
    }
}

fn parse_amount(raw: &str) -> Result<Decimal, ParseError> {
    Decimal::from_str(raw).map_err(|_| ParseError::Amount { value: raw.to_owned() })
}
