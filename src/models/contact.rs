// src/models/contact.rs
// DOCUMENTATION: Contact form DTO
// PURPOSE: Validate storefront contact submissions before they are forwarded

use crate::errors::StoreError;
use crate::models::input::{non_empty, sanitize_text};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_SUBJECT_LENGTH: usize = 200;
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Request DTO for POST /api/contact
#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub phone: Option<String>,
}

/// Validated, sanitized contact message
#[derive(Debug, Clone, PartialEq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: Option<String>,
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9\-\s+()]+$").expect("valid phone regex"))
}

impl ContactRequest {
    pub fn into_message(self) -> Result<ContactMessage, StoreError> {
        let (name, email, subject, message) = match (
            non_empty(&self.name),
            non_empty(&self.email),
            non_empty(&self.subject),
            non_empty(&self.message),
        ) {
            (Some(n), Some(e), Some(s), Some(m)) => (n, e, s, m),
            _ => {
                return Err(StoreError::InvalidInput(
                    "Please fill in all required fields.".to_string(),
                ))
            }
        };

        if !validator::validate_email(email) {
            return Err(StoreError::ValidationError("Invalid email format.".to_string()));
        }

        // Limits apply to what the visitor typed, before escaping
        check_length(name, MAX_NAME_LENGTH, "Name")?;
        check_length(subject, MAX_SUBJECT_LENGTH, "Subject")?;
        check_length(message, MAX_MESSAGE_LENGTH, "Message")?;

        let phone = match non_empty(&self.phone) {
            Some(p) if phone_regex().is_match(p) => Some(p.to_string()),
            Some(_) => {
                return Err(StoreError::ValidationError(
                    "Invalid phone number format.".to_string(),
                ))
            }
            None => None,
        };

        Ok(ContactMessage {
            name: sanitize_text(name),
            email: email.to_string(),
            subject: sanitize_text(subject),
            message: sanitize_text(message),
            phone,
        })
    }
}

fn check_length(value: &str, max: usize, field: &str) -> Result<(), StoreError> {
    if value.chars().count() > max {
        return Err(StoreError::ValidationError(format!(
            "{} must be at most {} characters.",
            field, max
        )));
    }
    Ok(())
}
