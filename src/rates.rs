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

//! Currency normalization.
//!
//! Amount comparison only makes sense in a common unit, so both sides of a
//! match are pushed through a [`CurrencyNormalizer`] before diffing. The
//! crate ships a fixed-table implementation; production deployments are
//! expected to plug in their own rate source behind the same trait.

use crate::error::RateError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Converts an (amount, currency) pair into the common reporting unit.
pub trait CurrencyNormalizer {
    /// Normalizes `amount` denominated in `currency`.
    ///
    /// Currency codes are matched case-insensitively. An unknown code must
    /// return the amount unchanged; it is never a failure. `Err` is
    /// reserved for the rate source itself breaking (and aborts the run).
    fn normalize(&self, amount: Decimal, currency: &str) -> Result<Decimal, RateError>;
}

/// Fixed-table normalizer converting into USD.
#[derive(Debug, Clone)]
pub struct StaticRates {
    rates: HashMap<String, Decimal>,
}

impl StaticRates {
    /// The built-in table: USD 1.0, EUR 1.1, JPY 0.009.
    pub fn usd_base() -> Self {
        let mut rates = HashMap::new();
        rates.insert("USD".to_owned(), dec!(1.0));
        rates.insert("EUR".to_owned(), dec!(1.1));
        rates.insert("JPY".to_owned(), dec!(0.009));
        Self { rates }
    }

    /// Adds or overrides a single rate. Codes are stored upper-cased.
    pub fn with_rate(mut self, code: &str, rate: Decimal) -> Self {
        self.rates.insert(code.to_ascii_uppercase(), rate);
        self
    }
}

impl Default for StaticRates {
    fn default() -> Self {
        Self::usd_base()
    }
}

impl CurrencyNormalizer for StaticRates {
    fn normalize(&self, amount: Decimal, currency: &str) -> Result<Decimal, RateError> {
        match self.rates.get(&currency.to_ascii_uppercase()) {
            Some(rate) => Ok(amount * rate),
            None => Ok(amount),
        }
    }
}
