//! Regex recognizers for the built-in entity types

use lazy_static::lazy_static;
use regex::Regex;
use scrub_core::{Error, Result};

/// Post-match check for patterns that over-match (e.g. card numbers)
pub type Validator = fn(&str) -> bool;

/// One pattern for one entity type.
///
/// When the pattern has a capture group, group 1 is the entity span and the
/// rest of the match is only anchoring text (e.g. an honorific).
#[derive(Debug, Clone)]
pub struct Recognizer {
    pub entity_type: String,
    pub regex: Regex,
    pub score: f64,
    /// Lower-case words that boost the score when they precede a match
    pub context: Vec<String>,
    pub validator: Option<Validator>,
}

impl Recognizer {
    pub fn new(
        entity_type: impl Into<String>,
        pattern: &str,
        score: f64,
        context: &[&str],
    ) -> Result<Self> {
        let entity_type = entity_type.into();
        let regex = Regex::new(pattern).map_err(|e| {
            Error::Redactor(format!("Invalid pattern for {}: {}", entity_type, e))
        })?;

        Ok(Self::from_regex(entity_type, regex, score, context))
    }

    fn from_regex(entity_type: impl Into<String>, regex: Regex, score: f64, context: &[&str]) -> Self {
        Self {
            entity_type: entity_type.into(),
            regex,
            score,
            context: context.iter().map(|w| w.to_lowercase()).collect(),
            validator: None,
        }
    }

    fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }
}

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}\b").unwrap();
    static ref US_SSN: Regex = Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap();
    static ref CREDIT_CARD: Regex = Regex::new(
        r"\b(?:4\d{3}|5[1-5]\d{2}|3[47]\d{2}|6(?:011|5\d{2}))[- ]?\d{4}[- ]?\d{4}[- ]?\d{3,4}\b"
    )
    .unwrap();
    static ref PHONE: Regex =
        Regex::new(r"(?:\+?1[-. ]?)?(?:\(\d{3}\)|\b\d{3})[-. ]?\d{3}[-. ]\d{4}\b").unwrap();
    static ref IPV4: Regex = Regex::new(
        r"\b(?:(?:25[0-5]|2[0-4]\d|[01]?\d\d?)\.){3}(?:25[0-5]|2[0-4]\d|[01]?\d\d?)\b"
    )
    .unwrap();
    static ref URL: Regex = Regex::new(r#"\bhttps?://[^\s<>"']+[^\s<>"'.,;:!?)]"#).unwrap();
    static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b(?:(?:0?[1-9]|1[0-2])[/\-](?:0?[1-9]|[12]\d|3[01])[/\-](?:19|20)\d{2}|(?:19|20)\d{2}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01]))\b"
    )
    .unwrap();
    static ref DATE_WRITTEN: Regex = Regex::new(
        r"\b(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.? \d{1,2}(?:st|nd|rd|th)?,? (?:19|20)\d{2}\b"
    )
    .unwrap();
    static ref MRN: Regex =
        Regex::new(r"\b(?:MRN|Medical[ \t]+Record)[:#\- \t]*\d{6,10}\b").unwrap();
    static ref PRESCRIPTION: Regex =
        Regex::new(r"\b(?:RX|Rx|Prescription)[:#\- \t]*\d{6,10}\b").unwrap();
    static ref INSURANCE_ID: Regex = Regex::new(
        r"\b(?:(?:Insurance|Member)[ \t]+ID|Policy[ \t]+(?:Number|#))[:#\- \t]*[A-Z0-9]{9,15}\b"
    )
    .unwrap();
    static ref PERSON_HONORIFIC: Regex = Regex::new(
        r"\b(?:Mr|Mrs|Ms|Miss|Dr|Prof)\.?[ \t]+([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+){0,2})\b"
    )
    .unwrap();
    static ref PERSON_LABELED: Regex = Regex::new(
        r"\b(?:[Pp]atient|[Nn]ame|[Cc]ontact)[ \t]*:?[ \t]+([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+){1,2})\b"
    )
    .unwrap();
    static ref IBAN: Regex =
        Regex::new(r"\b[A-Z]{2}\d{2}(?: ?[A-Z0-9]{4}){2,7}(?: ?[A-Z0-9]{1,3})?\b").unwrap();
    static ref BITCOIN: Regex =
        Regex::new(r"\b(?:bc1[a-z0-9]{25,39}|[13][a-km-zA-HJ-NP-Z1-9]{25,34})\b").unwrap();
}

/// Every recognizer shipped with the analyzer, most specific first
pub fn builtin() -> Vec<Recognizer> {
    vec![
        Recognizer::from_regex("EMAIL_ADDRESS", EMAIL.clone(), 1.0, &["email", "e-mail", "mail"]),
        Recognizer::from_regex("US_SSN", US_SSN.clone(), 0.85, &["ssn", "social", "security"]),
        Recognizer::from_regex("CREDIT_CARD", CREDIT_CARD.clone(), 0.9, &["card", "credit", "visa"])
            .with_validator(luhn_valid),
        Recognizer::from_regex(
            "MEDICAL_RECORD_NUMBER",
            MRN.clone(),
            0.85,
            &["patient", "medical", "record", "chart"],
        ),
        Recognizer::from_regex(
            "PRESCRIPTION_NUMBER",
            PRESCRIPTION.clone(),
            0.8,
            &["prescription", "medication", "pharmacy", "drug"],
        ),
        Recognizer::from_regex(
            "INSURANCE_ID",
            INSURANCE_ID.clone(),
            0.75,
            &["insurance", "policy", "coverage", "member"],
        ),
        Recognizer::from_regex("IBAN_CODE", IBAN.clone(), 0.5, &["iban", "bank", "account"])
            .with_validator(iban_valid),
        Recognizer::from_regex("CRYPTO", BITCOIN.clone(), 0.5, &["wallet", "btc", "bitcoin"]),
        Recognizer::from_regex("IP_ADDRESS", IPV4.clone(), 0.6, &["ip", "address", "host"]),
        Recognizer::from_regex("PHONE_NUMBER", PHONE.clone(), 0.6, &["phone", "call", "tel", "mobile", "fax"]),
        Recognizer::from_regex("URL", URL.clone(), 0.6, &["url", "website", "link"]),
        Recognizer::from_regex("DATE_TIME", DATE_NUMERIC.clone(), 0.6, &["date", "born", "dob", "birth"]),
        Recognizer::from_regex("DATE_TIME", DATE_WRITTEN.clone(), 0.6, &["date", "born", "dob", "birth"]),
        Recognizer::from_regex("PERSON", PERSON_HONORIFIC.clone(), 0.85, &[]),
        Recognizer::from_regex("PERSON", PERSON_LABELED.clone(), 0.6, &["name", "patient"]),
    ]
}

/// Luhn checksum over the digits of `candidate`
pub fn luhn_valid(candidate: &str) -> bool {
    let digits: Vec<u32> = candidate.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 12 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

/// ISO 13616 mod-97 check
pub fn iban_valid(candidate: &str) -> bool {
    let compact: String = candidate.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() < 15 || compact.len() > 34 {
        return false;
    }

    let (head, tail) = compact.split_at(4);
    let mut remainder: u32 = 0;
    for c in tail.chars().chain(head.chars()) {
        let value = match c.to_digit(36) {
            Some(v) => v,
            None => return false,
        };
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }

    remainder == 1
}
