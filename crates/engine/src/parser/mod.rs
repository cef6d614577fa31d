//! Natural-language transaction parser.
//!
//! Turns a free-form utterance ("spent 50 rupees on groceries
//! yesterday with cash") into a best-effort partial transaction. The
//! parser never fails: fields it cannot recognize are simply left
//! empty and the confidence score tells the caller how much of the
//! text was understood.
//!
//! Matching is purely lexical. The caller supplies the category and
//! payment mode registries; the parser never touches storage.

mod dates;
mod matcher;

use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::categories::Category;
use crate::payment_modes::PaymentMode;

// Confidence contribution of each recognized field.
const WEIGHT_AMOUNT: f64 = 0.4;
const WEIGHT_CURRENCY: f64 = 0.1;
const WEIGHT_DATE: f64 = 0.2;
const WEIGHT_CATEGORY: f64 = 0.2;
const WEIGHT_PAYMENT_MODE: f64 = 0.1;

/// Currency inferred from keywords in the utterance, independent of
/// the amount itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "INR")]
    Inr,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
        }
    }
}

/// Best-effort reconstruction of a transaction from raw text. Never
/// authoritative until the user confirms it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    pub amount: Option<f64>,
    pub currency: Option<Currency>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub payment_mode: Option<String>,
    pub note: Option<String>,
    pub original_text: String,
    /// Heuristic sum of the per-field weights, at most 1.0. A display
    /// hint, not a threshold.
    pub confidence: f64,
}

impl ParsedTransaction {
    fn empty(text: &str) -> Self {
        Self {
            amount: None,
            currency: None,
            category: None,
            date: None,
            payment_mode: None,
            note: None,
            original_text: text.to_string(),
            confidence: 0.0,
        }
    }
}

// Fallback keyword table consulted when no configured payment mode
// matches the text directly. A hit is accepted only if the user
// actually has a mode with the resolved name.
const FALLBACK_MODES: &[(&[&str], &str)] = &[
    (&["cash"], "Cash"),
    (&["credit card", "credit"], "Credit Card"),
    (&["debit card", "debit"], "Debit Card"),
    (&["upi", "gpay", "paytm", "phonepe"], "UPI"),
];

// Patterns are compile-time constants (or escaped text), a failure
// here is a programming error caught by the test suite.
pub(crate) fn re(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(error) => panic!("invalid built-in pattern {pattern:?}: {error}"),
    }
}

static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)(\d+(?:\.\d{2})?)\s*(?:rupees?|dollars?|\$|₹|rs\.?)?"));
static INR_RE: LazyLock<Regex> = LazyLock::new(|| re(r"rupees|₹|\brs\b"));
static CATEGORY_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)\b(category|cat)\s+(is|was|are|were)?\s*"));
static MODE_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)\b(mode of payment|payment mode|paid via|paid using|using|via)\s+(is|was|are|were)?\s*")
});
static DATE_LITERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)\b(today|yesterday|\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})\b"));
static DATE_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)\b(on|from|date|dated|day|days?\s+ago|weeks?\s+ago|last\s+\w+|this\s+\w+)\b")
});
static FILLER_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)\b(spent|paid|bought|for|on|via|using|with|the|a|an)\b"));
static FIELD_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)\b(mode of payment|payment mode|category|amount|rupees?|dollars?|rs\.?|\$|₹)\b")
});
static LINKING_VERB_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\b(is|was|were|are)\b"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| re(r"\s+"));

/// Parse an utterance against the local calendar date.
pub fn parse_transaction_text(
    text: &str,
    categories: &[Category],
    payment_modes: &[PaymentMode],
) -> ParsedTransaction {
    parse_with_reference(text, categories, payment_modes, Local::now().date_naive())
}

/// Parse an utterance with an explicit "today", so relative phrases
/// like "yesterday" and "last monday" are deterministic.
pub fn parse_with_reference(
    text: &str,
    categories: &[Category],
    payment_modes: &[PaymentMode],
    reference: NaiveDate,
) -> ParsedTransaction {
    let mut parsed = ParsedTransaction::empty(text);
    let lower = text.to_lowercase();
    let mut note_text = text.to_string();

    if let Some(captures) = AMOUNT_RE.captures(&lower)
        && let Ok(amount) = captures[1].parse::<f64>()
    {
        parsed.amount = Some(amount);
        parsed.confidence += WEIGHT_AMOUNT;
    }

    if INR_RE.is_match(&lower) {
        parsed.currency = Some(Currency::Inr);
        parsed.confidence += WEIGHT_CURRENCY;
    } else if lower.contains("dollars") || lower.contains('$') {
        parsed.currency = Some(Currency::Usd);
        parsed.confidence += WEIGHT_CURRENCY;
    }

    if let Some(date) = dates::first_match(&lower, reference) {
        parsed.date = Some(date);
        parsed.confidence += WEIGHT_DATE;
    }

    let mut category_text = String::new();
    if let Some(category) = matcher::best_category(&lower, categories) {
        parsed.category = Some(category.name.clone());
        parsed.confidence += WEIGHT_CATEGORY;
        category_text = category.name.to_lowercase();
        note_text = CATEGORY_LABEL_RE.replace_all(&note_text, "").into_owned();
    }

    let mut payment_mode_text = String::new();
    if let Some(mode) = matcher::best_payment_mode(&lower, payment_modes) {
        parsed.payment_mode = Some(mode.name.clone());
        parsed.confidence += WEIGHT_PAYMENT_MODE;
        payment_mode_text = mode.name.to_lowercase();
        note_text = MODE_LABEL_RE.replace_all(&note_text, "").into_owned();
    } else {
        for (keywords, mode_name) in FALLBACK_MODES {
            let Some(keyword) = keywords.iter().find(|keyword| lower.contains(**keyword)) else {
                continue;
            };
            let configured = payment_modes
                .iter()
                .find(|mode| mode.name.eq_ignore_ascii_case(mode_name));
            if let Some(mode) = configured {
                parsed.payment_mode = Some(mode.name.clone());
                parsed.confidence += WEIGHT_PAYMENT_MODE;
                payment_mode_text = (*keyword).to_string();
            }
            // First keyword family hit ends the search either way.
            break;
        }
    }

    if parsed.amount.is_some() {
        note_text = AMOUNT_RE.replacen(&note_text, 1, "").into_owned();
    }
    if parsed.category.is_some() && !category_text.is_empty() {
        let name_re = re(&format!("(?i){}", regex::escape(&category_text)));
        note_text = name_re.replacen(&note_text, 1, "").into_owned();
    }
    if parsed.payment_mode.is_some() && !payment_mode_text.is_empty() {
        let mode_re = re(&format!("(?i){}", regex::escape(&payment_mode_text)));
        note_text = mode_re.replacen(&note_text, 1, "").into_owned();
    }
    if parsed.date.is_some() {
        note_text = DATE_LITERAL_RE.replace_all(&note_text, "").into_owned();
        note_text = DATE_PHRASE_RE.replace_all(&note_text, "").into_owned();
    }

    note_text = FILLER_RE.replace_all(&note_text, "").into_owned();
    note_text = FIELD_LABEL_RE.replace_all(&note_text, "").into_owned();
    note_text = LINKING_VERB_RE.replace_all(&note_text, "").into_owned();
    let note_text = WHITESPACE_RE
        .replace_all(&note_text, " ")
        .trim()
        .to_string();

    if note_text.len() > 2 {
        parsed.note = Some(note_text);
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::CategoryKind;
    use chrono::Datelike;
    use uuid::Uuid;

    fn category(name: &str, kind: CategoryKind) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            icon: None,
            user_id: None,
        }
    }

    fn mode(name: &str, mode_type: i32) -> PaymentMode {
        PaymentMode {
            id: Uuid::new_v4(),
            name: name.to_string(),
            mode_type,
            icon: None,
            user_id: None,
        }
    }

    fn default_categories() -> Vec<Category> {
        vec![
            category("Food", CategoryKind::Expense),
            category("Grocery", CategoryKind::Expense),
            category("Salary", CategoryKind::Income),
        ]
    }

    fn default_modes() -> Vec<PaymentMode> {
        vec![
            mode("Cash", 1),
            mode("Credit Card", 3),
            mode("Debit Card", 4),
        ]
    }

    fn reference() -> NaiveDate {
        // A Wednesday.
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    fn parse(text: &str) -> ParsedTransaction {
        parse_with_reference(text, &default_categories(), &default_modes(), reference())
    }

    #[test]
    fn full_utterance_parses_every_field() {
        let parsed = parse("spent 50 rupees on groceries yesterday with cash");
        assert_eq!(parsed.amount, Some(50.0));
        assert_eq!(parsed.currency, Some(Currency::Inr));
        assert_eq!(parsed.category.as_deref(), Some("Grocery"));
        assert_eq!(parsed.date, Some(NaiveDate::from_ymd_opt(2024, 6, 11).unwrap()));
        assert_eq!(parsed.payment_mode.as_deref(), Some("Cash"));
        assert!((parsed.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn dollars_amount_yields_usd() {
        let parsed = parse("paid 12.50 dollars for lunch");
        assert_eq!(parsed.amount, Some(12.5));
        assert_eq!(parsed.currency, Some(Currency::Usd));
    }

    #[test]
    fn rs_inside_dollars_does_not_mean_inr() {
        let parsed = parse("paid 20 dollars");
        assert_eq!(parsed.currency, Some(Currency::Usd));
    }

    #[test]
    fn only_first_number_is_the_amount() {
        let parsed = parse("spent 15 on 3 coffees");
        assert_eq!(parsed.amount, Some(15.0));
    }

    #[test]
    fn today_resolves_to_reference_date() {
        let parsed = parse("40 for fuel today");
        assert_eq!(parsed.date, Some(reference()));
    }

    #[test]
    fn last_monday_is_a_past_monday() {
        let parsed = parse("spent 10 last monday");
        let date = parsed.date.unwrap();
        assert!(date < reference());
        assert_eq!(date.weekday(), chrono::Weekday::Mon);
    }

    #[test]
    fn unknown_text_yields_zero_confidence() {
        let parsed = parse_with_reference("xyzzy", &[], &[], reference());
        assert_eq!(parsed.confidence, 0.0);
        assert!(parsed.amount.is_none());
        assert!(parsed.date.is_none());
        assert!(parsed.note.is_some());
    }

    #[test]
    fn fallback_keyword_requires_configured_mode() {
        let modes = vec![mode("Cash", 1)];
        let parsed =
            parse_with_reference("paid via upi", &default_categories(), &modes, reference());
        assert!(parsed.payment_mode.is_none());

        let modes = vec![mode("UPI", 2)];
        let parsed =
            parse_with_reference("paid via gpay", &default_categories(), &modes, reference());
        assert_eq!(parsed.payment_mode.as_deref(), Some("UPI"));
    }

    #[test]
    fn note_keeps_leftover_words() {
        let parsed = parse("spent 200 on birthday gift yesterday with cash");
        assert_eq!(parsed.note.as_deref(), Some("birthday gift"));
    }

    #[test]
    fn short_leftover_is_dropped() {
        let parsed = parse("paid 50 for it with cash");
        assert!(parsed.note.is_none());
    }

    #[test]
    fn parser_never_fails_on_empty_input() {
        let parsed = parse("");
        assert_eq!(parsed.confidence, 0.0);
        assert_eq!(parsed.original_text, "");
    }

    #[test]
    fn currency_detection_is_independent_of_amount() {
        let parsed = parse("rupees owed to ramesh");
        assert!(parsed.amount.is_none());
        assert_eq!(parsed.currency, Some(Currency::Inr));
    }
}
