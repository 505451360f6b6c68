//! Input validation for account fields and search queries

use crate::error::{MelodyError, Result};
use chrono::{DateTime, NaiveDate};

pub const MIN_PASSWORD_LENGTH: usize = 4;

/// `local@domain.tld` with no whitespace and a dot in the domain
pub fn validate_email(email: &str) -> Result<()> {
    let invalid = || MelodyError::invalid_input("Invalid email format");

    if email.trim().is_empty() {
        return Err(MelodyError::invalid_input("Email must be a non-empty string"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// At least four characters with a lowercase letter, an uppercase letter and a digit
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(MelodyError::invalid_input(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(MelodyError::invalid_input(
            "Password must contain at least one uppercase letter, one lowercase letter, and one number",
        ));
    }
    Ok(())
}

pub fn validate_display_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(MelodyError::invalid_input("Name must be a non-empty string"));
    }
    Ok(())
}

pub fn validate_song_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(MelodyError::invalid_input("Title must be a non-empty string"));
    }
    Ok(())
}

pub fn validate_search_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(MelodyError::invalid_input(
            "Search query must be a non-empty string",
        ));
    }
    Ok(())
}

/// Accept an ISO-8601 date or RFC 3339 timestamp and normalize to `YYYY-MM-DD`
pub fn normalize_date_of_birth(value: &str) -> Result<String> {
    let value = value.trim();
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .ok_or_else(|| MelodyError::invalid_input("Invalid dateOfBirth format"))?;

    Ok(date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("a.b+c@mail.example.org").is_ok());
        for bad in ["", "alice", "alice@", "@example.com", "alice@example", "a b@x.io", "a@b@c.io"] {
            assert!(validate_email(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn passwords() {
        assert!(validate_password("Abc1").is_ok());
        assert!(validate_password("Ab1").is_err());
        assert!(validate_password("abcd1").is_err());
        assert!(validate_password("ABCD1").is_err());
        assert!(validate_password("Abcde").is_err());
    }

    #[test]
    fn dates_of_birth_are_normalized() {
        assert_eq!(normalize_date_of_birth("1990-05-17").unwrap(), "1990-05-17");
        assert_eq!(
            normalize_date_of_birth("1990-05-17T10:00:00Z").unwrap(),
            "1990-05-17"
        );
        assert!(normalize_date_of_birth("17/05/1990").is_err());
        assert!(normalize_date_of_birth("1990-02-30").is_err());
    }

    #[test]
    fn blank_queries_and_titles_are_rejected() {
        assert!(validate_search_query("  ").is_err());
        assert!(validate_search_query("love").is_ok());
        assert!(validate_song_title("").is_err());
        assert!(validate_display_name(" ").is_err());
    }
}
