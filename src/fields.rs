//! # Field Resolver
//!
//! Merges caller-supplied client attributes into the fixed merge-field set
//! used by the document templates. Absent or empty fields resolve to
//! placeholder blanks; derived fields (formatted birth date, loan due date,
//! interest and total) are computed from the inputs plus the supplied date.
//!
//! Everything here is a pure function of `(ClientData, today)` — nothing is
//! cached between invocations.

use chrono::{Duration, NaiveDate};
use serde::Deserialize;

/// Flat interest rate per day of the loan term. A hardcoded business
/// parameter carried over from the template content, not a financial model.
pub const DAILY_RATE: f64 = 0.01;

/// Upper bounds on the derivable inputs. Anything outside resolves to the
/// blank placeholders, the same as a non-numeric value.
const MAX_TERM_DAYS: i64 = 36_500;
const MAX_AMOUNT: f64 = 1e12;

const BLANK_NAME: &str = "________________________________";
const BLANK_BIRTH_DATE: &str = "«__» __________ ____ г.р.";
const BLANK_DUE_DATE: &str = "«__» __________ 20__ г.";
const BLANK_AMOUNT: &str = "_____________";
const BLANK_PASSPORT_SERIES: &str = "____";
const BLANK_PASSPORT_NUMBER: &str = "______";
const BLANK_CONTACT: &str = "__________________";

/// Client attributes as received from the caller. Any field may be absent;
/// empty strings are treated the same as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientData {
    pub full_name: Option<String>,
    pub birth_date: Option<String>,
    pub passport_series: Option<String>,
    pub passport_number: Option<String>,
    pub amount: Option<String>,
    pub term: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Display strings for every merge field of the templates.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFields {
    pub full_name: String,
    pub birth_date: String,
    pub passport_series: String,
    pub passport_number: String,
    pub amount: String,
    pub due_date: String,
    /// Interest over the whole term; `None` when amount or term is not numeric.
    pub interest: Option<String>,
    /// Amount plus interest; `None` when amount or term is not numeric.
    pub total: Option<String>,
    pub phone: String,
    pub email: String,
    /// Document date (today), `dd.mm.yyyy`.
    pub document_date: String,
}

/// Resolve the merge fields for one document.
///
/// `today` is passed in rather than read from the clock so resolution stays
/// a pure function (and tests can freeze the date).
pub fn resolve(client: &ClientData, today: NaiveDate) -> ResolvedFields {
    // The term is a whole day count; fractional, negative, non-finite or
    // absurdly large values all take the non-numeric fallback so the due
    // date and the interest never disagree about the term.
    let term_days = given(&client.term)
        .and_then(|t| t.parse::<i64>().ok())
        .filter(|days| (1..=MAX_TERM_DAYS).contains(days));
    let amount_value = given(&client.amount)
        .and_then(|a| a.parse::<f64>().ok())
        .filter(|amount| amount.is_finite() && (0.0..=MAX_AMOUNT).contains(amount));

    let due_date = term_days
        .and_then(Duration::try_days)
        .and_then(|term| today.checked_add_signed(term))
        .map(|date| date.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| BLANK_DUE_DATE.to_string());

    // Both must parse, otherwise the derived money lines are omitted entirely.
    let (interest, total) = match (amount_value, term_days) {
        (Some(amount), Some(days)) => {
            let interest = amount * days as f64 * DAILY_RATE;
            (
                Some(format_amount(interest)),
                Some(format_amount(amount + interest)),
            )
        }
        _ => (None, None),
    };

    ResolvedFields {
        full_name: given(&client.full_name)
            .unwrap_or(BLANK_NAME)
            .to_string(),
        birth_date: resolve_birth_date(&client.birth_date),
        passport_series: given(&client.passport_series)
            .unwrap_or(BLANK_PASSPORT_SERIES)
            .to_string(),
        passport_number: given(&client.passport_number)
            .unwrap_or(BLANK_PASSPORT_NUMBER)
            .to_string(),
        amount: given(&client.amount).unwrap_or(BLANK_AMOUNT).to_string(),
        due_date,
        interest,
        total,
        phone: given(&client.phone).unwrap_or(BLANK_CONTACT).to_string(),
        email: given(&client.email).unwrap_or(BLANK_CONTACT).to_string(),
        document_date: today.format("%d.%m.%Y").to_string(),
    }
}

/// A birth date in `yyyy-mm-dd` is reformatted to `dd.mm.yyyy г.р.`.
/// A malformed non-empty value is displayed verbatim, unflagged.
fn resolve_birth_date(raw: &Option<String>) -> String {
    match given(raw) {
        None => BLANK_BIRTH_DATE.to_string(),
        Some(value) => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => format!("{} г.р.", date.format("%d.%m.%Y")),
            Err(_) => value.to_string(),
        },
    }
}

/// A field counts as supplied only when non-empty after trimming.
fn given(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Format a monetary value with space-grouped thousands and two decimals,
/// e.g. `1234567.8` → `"1 234 567.80"`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    format!("{}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frozen_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn client(fields: &[(&str, &str)]) -> ClientData {
        let mut c = ClientData::default();
        for (k, v) in fields {
            let v = Some(v.to_string());
            match *k {
                "fullName" => c.full_name = v,
                "birthDate" => c.birth_date = v,
                "passportSeries" => c.passport_series = v,
                "passportNumber" => c.passport_number = v,
                "amount" => c.amount = v,
                "term" => c.term = v,
                "phone" => c.phone = v,
                "email" => c.email = v,
                other => panic!("unknown field {}", other),
            }
        }
        c
    }

    #[test]
    fn empty_client_resolves_to_placeholders() {
        let resolved = resolve(&ClientData::default(), frozen_today());
        assert_eq!(resolved.full_name, BLANK_NAME);
        assert_eq!(resolved.birth_date, BLANK_BIRTH_DATE);
        assert_eq!(resolved.passport_series, BLANK_PASSPORT_SERIES);
        assert_eq!(resolved.passport_number, BLANK_PASSPORT_NUMBER);
        assert_eq!(resolved.amount, BLANK_AMOUNT);
        assert_eq!(resolved.due_date, BLANK_DUE_DATE);
        assert_eq!(resolved.interest, None);
        assert_eq!(resolved.total, None);
        assert_eq!(resolved.phone, BLANK_CONTACT);
        assert_eq!(resolved.email, BLANK_CONTACT);
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let c = client(&[("fullName", ""), ("amount", "  ")]);
        let resolved = resolve(&c, frozen_today());
        assert_eq!(resolved.full_name, BLANK_NAME);
        assert_eq!(resolved.amount, BLANK_AMOUNT);
    }

    #[test]
    fn birth_date_is_reformatted() {
        let c = client(&[("birthDate", "1990-12-05")]);
        let resolved = resolve(&c, frozen_today());
        assert_eq!(resolved.birth_date, "05.12.1990 г.р.");
    }

    #[test]
    fn malformed_birth_date_passes_through_verbatim() {
        let c = client(&[("birthDate", "not-a-date")]);
        let resolved = resolve(&c, frozen_today());
        assert_eq!(resolved.birth_date, "not-a-date");
    }

    #[test]
    fn due_date_is_today_plus_term() {
        let c = client(&[("term", "30")]);
        let resolved = resolve(&c, frozen_today());
        assert_eq!(resolved.due_date, "31.03.2026");
    }

    #[test]
    fn non_numeric_term_falls_back_to_blank_due_date() {
        let c = client(&[("term", "thirty")]);
        let resolved = resolve(&c, frozen_today());
        assert_eq!(resolved.due_date, BLANK_DUE_DATE);
    }

    #[test]
    fn monetary_derivation() {
        let c = client(&[("amount", "1000"), ("term", "10")]);
        let resolved = resolve(&c, frozen_today());
        assert_eq!(resolved.interest.as_deref(), Some("100.00"));
        assert_eq!(resolved.total.as_deref(), Some("1 100.00"));
    }

    #[test]
    fn derived_lines_omitted_when_amount_unparsable() {
        let c = client(&[("amount", "a lot"), ("term", "10")]);
        let resolved = resolve(&c, frozen_today());
        assert_eq!(resolved.interest, None);
        assert_eq!(resolved.total, None);
    }

    #[test]
    fn huge_term_degrades_to_blank_due_date() {
        let c = client(&[("amount", "1000"), ("term", "100000000")]);
        let resolved = resolve(&c, frozen_today());
        assert_eq!(resolved.due_date, BLANK_DUE_DATE);
        assert_eq!(resolved.interest, None);
        assert_eq!(resolved.total, None);
    }

    #[test]
    fn non_finite_inputs_take_the_non_numeric_fallback() {
        for term in ["NaN", "inf", "-inf", "1e308"] {
            let c = client(&[("amount", "1000"), ("term", term)]);
            let resolved = resolve(&c, frozen_today());
            assert_eq!(resolved.due_date, BLANK_DUE_DATE, "term={}", term);
            assert_eq!(resolved.interest, None, "term={}", term);
        }
        for amount in ["NaN", "inf", "-1", "1e300"] {
            let c = client(&[("amount", amount), ("term", "10")]);
            let resolved = resolve(&c, frozen_today());
            assert_eq!(resolved.interest, None, "amount={}", amount);
            assert_eq!(resolved.total, None, "amount={}", amount);
        }
    }

    #[test]
    fn fractional_term_is_not_a_valid_day_count() {
        let c = client(&[("amount", "1000"), ("term", "1.5")]);
        let resolved = resolve(&c, frozen_today());
        assert_eq!(resolved.due_date, BLANK_DUE_DATE);
        assert_eq!(resolved.interest, None);
        assert_eq!(resolved.total, None);
    }

    #[test]
    fn negative_or_zero_term_is_rejected() {
        for term in ["-5", "0"] {
            let c = client(&[("term", term)]);
            let resolved = resolve(&c, frozen_today());
            assert_eq!(resolved.due_date, BLANK_DUE_DATE, "term={}", term);
        }
    }

    #[test]
    fn resolution_is_pure_given_a_frozen_date() {
        let c = client(&[("amount", "50000"), ("term", "30"), ("fullName", "Иванов Иван")]);
        let a = resolve(&c, frozen_today());
        let b = resolve(&c, frozen_today());
        assert_eq!(a, b);
    }

    #[test]
    fn format_amount_groups_thousands_with_spaces() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.5), "999.50");
        assert_eq!(format_amount(1100.0), "1 100.00");
        assert_eq!(format_amount(1234567.8), "1 234 567.80");
        assert_eq!(format_amount(-1100.0), "-1 100.00");
    }

    #[test]
    fn document_date_uses_supplied_today() {
        let resolved = resolve(&ClientData::default(), frozen_today());
        assert_eq!(resolved.document_date, "01.03.2026");
    }
}
