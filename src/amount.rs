// src/amount.rs
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::OrdError;

/// Largest sum we accept, in kopecks. Leaves headroom so the VAT
/// multiply below cannot overflow an i64.
const MAX_SUM_KOPECKS: i64 = i64::MAX / 100;

/// VAT rates the registry accepts, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VatRate {
    Zero,
    Five,
    Seven,
    Ten,
    Twenty,
}

impl VatRate {
    pub fn from_percent(percent: u8) -> Result<Self, OrdError> {
        match percent {
            0 => Ok(VatRate::Zero),
            5 => Ok(VatRate::Five),
            7 => Ok(VatRate::Seven),
            10 => Ok(VatRate::Ten),
            20 => Ok(VatRate::Twenty),
            other => Err(OrdError::Validation(format!(
                "unsupported VAT rate: {other}, allowed values are 0, 5, 7, 10 and 20"
            ))),
        }
    }

    pub fn percent(self) -> u8 {
        match self {
            VatRate::Zero => 0,
            VatRate::Five => 5,
            VatRate::Seven => 7,
            VatRate::Ten => 10,
            VatRate::Twenty => 20,
        }
    }
}

/// Money block of an act, all sums as fixed two-decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountServices {
    pub excluding_vat: String,
    pub vat_rate: String,
    pub vat: String,
    pub including_vat: String,
}

/// Amount structure the registry expects on act creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub services: AmountServices,
}

impl Amount {
    /// Build the amount block from a ruble sum excluding VAT.
    ///
    /// Sums are carried in integer kopecks so the derived VAT and total
    /// come out exact to two decimals.
    pub fn from_rubles(excluding_vat: f64, vat_rate: VatRate) -> Result<Self, OrdError> {
        if !excluding_vat.is_finite() || excluding_vat < 0.0 {
            return Err(OrdError::Validation(format!(
                "amount excluding VAT must be a non-negative number, got {excluding_vat}"
            )));
        }

        let rounded = (excluding_vat * 100.0).round();
        if rounded > MAX_SUM_KOPECKS as f64 {
            return Err(OrdError::Validation(format!(
                "amount excluding VAT is too large: {excluding_vat}"
            )));
        }
        let excluding_kopecks = rounded as i64;
        let percent = i64::from(vat_rate.percent());
        let vat_kopecks = excluding_kopecks
            .checked_mul(percent)
            .map(|product| div_round_half_even(product, 100))
            .ok_or_else(|| {
                OrdError::Validation(format!(
                    "amount excluding VAT is too large: {excluding_vat}"
                ))
            })?;
        let including_kopecks = excluding_kopecks.checked_add(vat_kopecks).ok_or_else(|| {
            OrdError::Validation(format!(
                "amount excluding VAT is too large: {excluding_vat}"
            ))
        })?;

        Ok(Self {
            services: AmountServices {
                excluding_vat: format_kopecks(excluding_kopecks),
                vat_rate: vat_rate.percent().to_string(),
                vat: format_kopecks(vat_kopecks),
                including_vat: format_kopecks(including_kopecks),
            },
        })
    }
}

fn format_kopecks(kopecks: i64) -> String {
    format!("{}.{:02}", kopecks / 100, kopecks % 100)
}

/// Integer division with ties rounded to the even quotient, the same
/// tie-break registry bookkeeping uses for sums quantized to a kopeck.
fn div_round_half_even(value: i64, divisor: i64) -> i64 {
    let quotient = value / divisor;
    let remainder = value % divisor;
    match (remainder * 2).cmp(&divisor) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal => {
            if quotient % 2 == 0 {
                quotient
            } else {
                quotient + 1
            }
        }
    }
}
