//! Entity type specificity ranking used to break overlaps

/// Priority for entity types missing from the table
pub const DEFAULT_PRIORITY: u8 = 10;

// Exact identifiers first, broad categories last.
const PRIORITIES: &[(&str, u8)] = &[
    ("US_SSN", 100),
    ("CREDIT_CARD", 95),
    ("EMAIL_ADDRESS", 95),
    ("MEDICAL_RECORD_NUMBER", 90),
    ("HEALTH_PLAN_ID", 90),
    ("INSURANCE_ID", 90),
    ("US_PASSPORT", 85),
    ("PRESCRIPTION_NUMBER", 85),
    ("IBAN_CODE", 85),
    ("US_DRIVER_LICENSE", 80),
    ("PHONE_NUMBER", 80),
    ("ACCOUNT_NUMBER", 75),
    ("LICENSE_NUMBER", 75),
    ("VIN", 75),
    ("US_BANK_NUMBER", 75),
    ("DEVICE_ID", 70),
    ("IP_ADDRESS", 70),
    ("CRYPTO", 70),
    ("URL", 60),
    ("PERSON", 50),
    ("DATE_TIME", 40),
    ("LOCATION", 30),
    ("NRP", 25),
    ("ORGANIZATION", 20),
];

pub fn entity_priority(entity_type: &str) -> u8 {
    PRIORITIES
        .iter()
        .find(|(name, _)| *name == entity_type)
        .map(|(_, priority)| *priority)
        .unwrap_or(DEFAULT_PRIORITY)
}
