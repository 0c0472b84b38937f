//! Validated domain names and the replacement specification.
//!
//! [`Domain`] is the only way a domain string enters the engines: construction
//! lower-cases and syntax-checks it, so every downstream pass can rely on a
//! canonical ASCII label sequence. [`MatchSpec`] pairs the old and new domain
//! with the compiled matcher for the lifetime of one transform call.

use std::borrow::Cow;
use std::fmt;

use crate::{error::EngineError, matcher::EmailMatcher};

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A validated, lower-cased DNS-style domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain(String);

impl Domain {
    /// Parses and canonicalizes a raw domain string.
    ///
    /// Accepts dot-separated labels of alphanumerics and hyphens, each label
    /// 1..=63 characters with no leading or trailing hyphen, 253 characters
    /// overall. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, EngineError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid(raw, "domain cannot be empty"));
        }
        if trimmed.len() > MAX_DOMAIN_LEN {
            return Err(invalid(raw, "domain too long (max 253 characters)"));
        }
        if !trimmed.is_ascii() {
            return Err(invalid(raw, "domain must be ASCII"));
        }
        for label in trimmed.split('.') {
            if label.is_empty() {
                return Err(invalid(raw, "empty label"));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(invalid(raw, "label too long (max 63 characters)"));
            }
            if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(invalid(
                    raw,
                    "labels may only contain letters, digits, and hyphens",
                ));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(invalid(raw, "labels may not start or end with a hyphen"));
            }
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn invalid(domain: &str, reason: &str) -> EngineError {
    EngineError::InvalidDomain {
        domain: domain.to_string(),
        reason: reason.to_string(),
    }
}

/// The (old domain, new domain) pair driving one replacement run, together
/// with the compiled matcher for the old domain.
#[derive(Debug, Clone)]
pub struct MatchSpec {
    old: Domain,
    new: Domain,
    matcher: EmailMatcher,
}

impl MatchSpec {
    pub fn new(old: Domain, new: Domain) -> Result<Self, EngineError> {
        let matcher = EmailMatcher::new(&old)?;
        Ok(Self { old, new, matcher })
    }

    pub fn old_domain(&self) -> &Domain {
        &self.old
    }

    pub fn new_domain(&self) -> &Domain {
        &self.new
    }

    pub fn matcher(&self) -> &EmailMatcher {
        &self.matcher
    }

    /// True when old and new domains are identical; engines treat such a spec
    /// as a guaranteed no-op instead of rewriting cells to themselves.
    pub fn is_noop(&self) -> bool {
        self.old == self.new
    }

    /// Rewrites every old-domain email occurrence in `text` to the new
    /// domain, returning the updated text and the occurrence count.
    pub fn substitute<'a>(&self, text: &'a str) -> (Cow<'a, str>, usize) {
        self.matcher.substitute(text, &self.new)
    }
}
