// src/validators.rs
//! Caller input checks. Every check runs before the outbound call, so a
//! malformed request never reaches the registry.

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::OrdError;
use crate::ord::CounterpartyRole;

/// Earliest year the registry accepts in act dates.
const MIN_ACT_YEAR: i32 = 1991;

/// Total creative text budget imposed by the registry.
pub const MAX_CREATIVE_TEXT_LEN: usize = 65_000;

static INN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10,12}$").expect("valid regex"));
static KKTU_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid regex"));
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Parse a `YYYY-MM-DD` date, rejecting anything else.
///
/// Chrono accepts unpadded month and day, the registry does not, so the
/// shape is checked first.
pub fn parse_date(value: &str) -> Result<NaiveDate, OrdError> {
    if !DATE_RE.is_match(value) {
        return Err(OrdError::Validation(format!(
            "date must be in YYYY-MM-DD format, got: {value}"
        )));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        OrdError::Validation(format!("date must be in YYYY-MM-DD format, got: {value}"))
    })
}

pub fn check_counterparty_name(name: &str, max_len: usize) -> Result<(), OrdError> {
    if name.chars().count() > max_len {
        return Err(OrdError::Validation(format!(
            "counterparty name is too long, at most {max_len} characters allowed"
        )));
    }
    Ok(())
}

pub fn check_inn(inn: &str) -> Result<(), OrdError> {
    if !INN_RE.is_match(inn) {
        return Err(OrdError::Validation(format!(
            "INN must be 10 to 12 digits, got: {inn}"
        )));
    }
    Ok(())
}

pub fn check_kktu_codes(kktus: &[String]) -> Result<(), OrdError> {
    if kktus.is_empty() || kktus.len() > 16 {
        return Err(OrdError::Validation(format!(
            "between 1 and 16 KKTU codes are required, got {}",
            kktus.len()
        )));
    }
    for code in kktus {
        if !KKTU_RE.is_match(code) {
            return Err(OrdError::Validation(format!(
                "KKTU code must look like X.X.X, got: {code}"
            )));
        }
    }
    Ok(())
}

pub fn check_contract_date(date: &str) -> Result<(), OrdError> {
    parse_date(date).map(|_| ())
}

pub fn check_client_and_contractor_differ(
    client_external_id: &str,
    contractor_external_id: &str,
) -> Result<(), OrdError> {
    if client_external_id == contractor_external_id {
        return Err(OrdError::Validation(
            "client_external_id and contractor_external_id must differ".into(),
        ));
    }
    Ok(())
}

pub fn check_creative_texts(texts: &[String]) -> Result<(), OrdError> {
    if texts.is_empty() {
        return Err(OrdError::Validation(
            "at least one creative text is required".into(),
        ));
    }
    let total: usize = texts.iter().map(|text| text.chars().count()).sum();
    if total > MAX_CREATIVE_TEXT_LEN {
        return Err(OrdError::Validation(format!(
            "total creative text length ({total}) exceeds {MAX_CREATIVE_TEXT_LEN} characters"
        )));
    }
    Ok(())
}

/// Act date rules: all dates valid and not before 1991-01-01, the period
/// must be ordered, and the act date must not be in the future (UTC).
pub fn check_act_dates(date_act: &str, date_start: &str, date_end: &str) -> Result<(), OrdError> {
    let act = parse_date(date_act)?;
    let start = parse_date(date_start)?;
    let end = parse_date(date_end)?;

    let min_date = NaiveDate::from_ymd_opt(MIN_ACT_YEAR, 1, 1).expect("valid constant date");
    if act < min_date || start < min_date || end < min_date {
        return Err(OrdError::Validation(format!(
            "dates before {MIN_ACT_YEAR}-01-01 are not accepted"
        )));
    }

    if start > end {
        return Err(OrdError::Validation(
            "date_start must not be after date_end".into(),
        ));
    }

    let today = Utc::now().date_naive();
    if act > today {
        return Err(OrdError::Validation(
            "the act date must not be in the future".into(),
        ));
    }

    Ok(())
}

/// The registry does not accept acts where the client side is the advertiser.
pub fn check_act_roles(
    client_role: CounterpartyRole,
    _contractor_role: CounterpartyRole,
) -> Result<(), OrdError> {
    if client_role == CounterpartyRole::Advertiser {
        return Err(OrdError::Validation(
            "acts with the advertiser as the client are not supported yet".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn accepts_iso_dates_only() {
        assert!(parse_date("2024-02-29").is_ok());
        assert!(parse_date("2024-2-29").is_err());
        assert!(parse_date("29.02.2024").is_err());
        assert!(parse_date("2023-02-29").is_err());
    }

    #[test]
    fn name_length_limit() {
        assert!(check_counterparty_name("ООО «Север»", 255).is_ok());
        let long = "x".repeat(256);
        assert!(check_counterparty_name(&long, 255).is_err());
    }

    #[test]
    fn inn_must_be_ten_to_twelve_digits() {
        assert!(check_inn("7707083893").is_ok());
        assert!(check_inn("770708389377").is_ok());
        assert!(check_inn("770708389").is_err());
        assert!(check_inn("77070838930000").is_err());
        assert!(check_inn("77070a3893").is_err());
    }

    #[test]
    fn kktu_code_shape() {
        assert!(check_kktu_codes(&["1.1.1".into()]).is_ok());
        assert!(check_kktu_codes(&["10.2.33".into(), "1.1.2".into()]).is_ok());
        assert!(check_kktu_codes(&[]).is_err());
        assert!(check_kktu_codes(&["1.1".into()]).is_err());
        assert!(check_kktu_codes(&["a.b.c".into()]).is_err());
        let too_many: Vec<String> = (0..17).map(|i| format!("1.1.{i}")).collect();
        assert!(check_kktu_codes(&too_many).is_err());
    }

    #[test]
    fn client_and_contractor_must_differ() {
        assert!(check_client_and_contractor_differ("a", "b").is_ok());
        assert!(check_client_and_contractor_differ("same", "same").is_err());
    }

    #[test]
    fn creative_text_budget() {
        assert!(check_creative_texts(&["hello".into()]).is_ok());
        assert!(check_creative_texts(&[]).is_err());
        let big = "x".repeat(MAX_CREATIVE_TEXT_LEN);
        assert!(check_creative_texts(&[big.clone()]).is_ok());
        assert!(check_creative_texts(&[big, "x".into()]).is_err());
    }

    #[test]
    fn act_dates_must_be_ordered() {
        assert!(check_act_dates("2024-03-31", "2024-03-01", "2024-03-31").is_ok());
        assert!(check_act_dates("2024-03-31", "2024-03-31", "2024-03-01").is_err());
    }

    #[test]
    fn act_dates_reject_the_distant_past() {
        assert!(check_act_dates("1990-12-31", "1990-01-01", "1990-12-31").is_err());
    }

    #[test]
    fn act_date_must_not_be_in_the_future() {
        let tomorrow = (Utc::now().date_naive() + Duration::days(1)).to_string();
        assert!(check_act_dates(&tomorrow, "2024-01-01", "2024-01-31").is_err());
    }

    #[test]
    fn advertiser_client_role_is_unsupported() {
        assert!(
            check_act_roles(CounterpartyRole::Advertiser, CounterpartyRole::Publisher).is_err()
        );
        assert!(check_act_roles(CounterpartyRole::Agency, CounterpartyRole::Publisher).is_ok());
    }
}
