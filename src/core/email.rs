//! Email address syntax validation
//!
//! Applies the usual web-framework rule: a dot-atom or quoted local part, and a
//! hostname, `localhost` or bracketed IP literal as the domain. Non-ASCII
//! hostnames are accepted when their punycode form is a valid hostname.

use crate::error::{CreateUserError, Result};
use regex::Regex;
use std::net::IpAddr;
use tracing::debug;

/// Longest address accepted (RFC 3696 errata 1690)
const MAX_EMAIL_LENGTH: usize = 320;

/// Validator for email address syntax
#[derive(Debug)]
pub struct EmailValidator {
    /// Regex for the local part (dot-atom or quoted string)
    re_user: Regex,
    /// Regex for hostname domains
    re_domain: Regex,
    /// Regex for bracketed IP literal domains
    re_literal: Regex,
    /// Domains accepted without further checks
    domain_allowlist: Vec<String>,
}

impl EmailValidator {
    /// Create a new email validator
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_user: Regex::new(concat!(
                r#"(?i)^(?:[-!#$%&'*+/=?^_`{}|~0-9A-Z]+(?:\.[-!#$%&'*+/=?^_`{}|~0-9A-Z]+)*"#,
                r#"|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f!#-\[\]-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")\z"#,
            ))
            .map_err(|e| CreateUserError::config(format!("Failed to compile regex: {}", e)))?,
            re_domain: Regex::new(
                r"(?i)^(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z0-9-]{2,63}\z",
            )
            .map_err(|e| CreateUserError::config(format!("Failed to compile regex: {}", e)))?,
            re_literal: Regex::new(r"(?i)^\[([A-F0-9:.]+)\]\z")
                .map_err(|e| CreateUserError::config(format!("Failed to compile regex: {}", e)))?,
            domain_allowlist: vec!["localhost".to_string()],
        })
    }

    /// Check whether `value` is a syntactically valid email address
    pub fn is_valid(&self, value: &str) -> bool {
        if value.is_empty() || value.len() > MAX_EMAIL_LENGTH {
            return false;
        }

        let Some((user_part, domain_part)) = value.rsplit_once('@') else {
            return false;
        };

        if !self.re_user.is_match(user_part) {
            debug!("Rejected local part of email address");
            return false;
        }

        if self
            .domain_allowlist
            .iter()
            .any(|allowed| allowed == domain_part)
        {
            return true;
        }

        let valid_domain = self.validate_domain_part(domain_part);
        if !valid_domain {
            debug!("Rejected domain part of email address: {}", domain_part);
        }
        valid_domain
    }

    /// Validate an email address, failing with a user-facing error
    pub fn validate(&self, value: &str) -> Result<()> {
        if self.is_valid(value) {
            Ok(())
        } else {
            Err(CreateUserError::InvalidEmail)
        }
    }

    fn validate_domain_part(&self, domain_part: &str) -> bool {
        if self.is_hostname(domain_part) {
            return true;
        }

        if self
            .re_literal
            .captures(domain_part)
            .and_then(|caps| caps.get(1))
            .is_some_and(|ip| ip.as_str().parse::<IpAddr>().is_ok())
        {
            return true;
        }

        // Internationalized domains are checked in their punycode form
        match idna::domain_to_ascii(domain_part) {
            Ok(ascii) => self.is_hostname(&ascii),
            Err(_) => false,
        }
    }

    fn is_hostname(&self, domain: &str) -> bool {
        // The top-level label may not end with a hyphen
        self.re_domain.is_match(domain) && !domain.ends_with('-')
    }
}
