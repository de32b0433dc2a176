use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ContactDetails, Field, FieldErrors};

pub const NAME_REQUIRED: &str = "name required";
pub const PHONE_INVALID: &str = "valid phone required";
pub const EMAIL_INVALID: &str = "valid email required";

/// Optional leading `+`, then 9 to 15 digits or spaces.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s]{9,15}$").expect("phone pattern is valid"));

/// `local@domain.tld`, none of the parts containing whitespace or `@`.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

const STRIPPED: [char; 6] = ['<', '>', '{', '}', '(', ')'];

/// Strips `< > { } ( )` and surrounding whitespace. This is not HTML
/// escaping: quotes and semicolons pass through untouched.
pub fn sanitize(input: &str) -> String {
    input.replace(STRIPPED, "").trim().to_string()
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn sanitize_contact(contact: &ContactDetails) -> ContactDetails {
    ContactDetails {
        name: sanitize(&contact.name),
        phone: sanitize(&contact.phone),
        email: sanitize(&contact.email),
        message: sanitize(&contact.message),
    }
}

/// Sanitizes every field and checks the required ones. All failures are
/// reported together.
pub fn validate_contact(contact: &ContactDetails) -> Result<ContactDetails, FieldErrors> {
    let clean = sanitize_contact(contact);
    let mut errors = FieldErrors::new();

    if clean.name.is_empty() {
        errors.insert(Field::Name, NAME_REQUIRED.to_string());
    }
    if !is_valid_phone(&clean.phone) {
        errors.insert(Field::Phone, PHONE_INVALID.to_string());
    }
    if !is_valid_email(&clean.email) {
        errors.insert(Field::Email, EMAIL_INVALID.to_string());
    }

    if errors.is_empty() {
        Ok(clean)
    } else {
        Err(errors)
    }
}
