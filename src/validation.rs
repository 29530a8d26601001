//! Field rules for contact input, shared by the client form and the
//! strict mode of the API.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Phone,
    Email,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Phone, Field::Email];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Phone => "Phone",
            Field::Email => "Email",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-field error messages. Only failing fields carry a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.email.is_none()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Phone => self.phone.as_deref(),
            Field::Email => self.email.as_deref(),
        }
    }

    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Name => self.name = None,
            Field::Phone => self.phone = None,
            Field::Email => self.email = None,
        }
    }

    /// Messages of failing fields in form order, joined for a single response.
    pub fn summary(&self) -> String {
        Field::ALL
            .iter()
            .filter_map(|f| self.get(*f))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub fn is_valid_phone(phone: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
    }
    PHONE_RE.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^\S+@\S+\.\S+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Checks all three fields the way the contact form does.
pub fn validate_contact(name: &str, phone: &str, email: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if name.trim().is_empty() {
        errors.name = Some("Name is required".into());
    }
    if !is_valid_phone(phone) {
        errors.phone = Some("Phone must be 10 digits".into());
    }
    if !is_valid_email(email) {
        errors.email = Some("Invalid email format".into());
    }
    errors
}
