//! Submission-time validators for credentials and CSV inputs.
//!
//! The store enforces no schema, so these checks are the only guard on what
//! gets persisted.

use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Number of leading lines compared by [`validate_csv`].
pub const CSV_SAMPLE_LINES: usize = 3;

pub const CSV_DELIMITER: u8 = b';';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid email.")]
    InvalidEmail,

    #[error("Password must be at least 8 characters")]
    PasswordTooShort,

    #[error("Password must contain at least one uppercase letter")]
    PasswordMissingUppercase,

    #[error("Password must contain at least one digit")]
    PasswordMissingDigit,

    #[error("Passwords don't match.")]
    PasswordMismatch,

    #[error("File does not exist")]
    FileMissing,

    #[error("File is empty")]
    FileEmpty,

    #[error("Inconsistent number of delimiters")]
    InconsistentDelimiters,

    #[error("Validation error: {0}")]
    Unreadable(String),
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$")
            .expect("Invalid regex pattern defined in code")
    })
}

/// Syntactic email check: local part, `@`, domain, `.`, suffix.
#[must_use]
pub fn validate_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Returns the first failing strength rule, in order: length, uppercase, digit.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(ValidationError::PasswordMissingUppercase);
    }
    if !password.chars().any(char::is_numeric) {
        return Err(ValidationError::PasswordMissingDigit);
    }
    Ok(())
}

/// Structural sanity check run before a CSV import touches the store.
///
/// Compares the delimiter count of the first three lines; a mismatch is
/// taken as a sign of malformed rows. Counting happens on raw bytes, so
/// Latin-1 files are checked the same way as UTF-8 ones.
pub fn validate_csv(path: &Path) -> Result<(), ValidationError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => return Err(ValidationError::FileMissing),
    };

    if metadata.len() == 0 {
        return Err(ValidationError::FileEmpty);
    }

    let counts = delimiter_counts(path)?;
    if counts.windows(2).any(|pair| pair[0] != pair[1]) {
        return Err(ValidationError::InconsistentDelimiters);
    }

    Ok(())
}

fn delimiter_counts(path: &Path) -> Result<Vec<usize>, ValidationError> {
    let file = File::open(path).map_err(|e| ValidationError::Unreadable(e.to_string()))?;
    let mut reader = BufReader::new(file);
    let mut counts = Vec::with_capacity(CSV_SAMPLE_LINES);
    let mut line = Vec::new();

    while counts.len() < CSV_SAMPLE_LINES {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(|e| ValidationError::Unreadable(e.to_string()))?;
        if read == 0 {
            return Err(ValidationError::Unreadable(format!(
                "file has fewer than {CSV_SAMPLE_LINES} lines"
            )));
        }
        counts.push(line.iter().filter(|&&b| b == CSV_DELIMITER).count());
    }

    Ok(counts)
}
