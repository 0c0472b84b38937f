//! Email occurrence matching for a single target domain.
//!
//! The compiled pattern recognises `<local-part>@<domain>` where the
//! local-part is one or more of `[A-Za-z0-9._%+-]` and the domain is the
//! literal target compared case-insensitively, immediately after the `@`.
//! There is deliberately no right-hand boundary: a longer domain that starts
//! with the target (for example `old.com` inside `a@old.com.au`) is still
//! rewritten. Subdomain prefixes never match because the literal must follow
//! the `@` directly.

use std::borrow::Cow;

use regex::{Regex, RegexBuilder};

use crate::{domain::Domain, error::EngineError};

#[derive(Debug, Clone)]
pub struct EmailMatcher {
    pattern: Regex,
}

impl EmailMatcher {
    /// Compiles a matcher for email occurrences at `domain`.
    pub fn new(domain: &Domain) -> Result<Self, EngineError> {
        let source = format!(r"([A-Za-z0-9._%+-]+)@{}", regex::escape(domain.as_str()));
        let pattern = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|err| EngineError::InvalidDomain {
                domain: domain.as_str().to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self { pattern })
    }

    /// Whether `text` contains at least one email occurrence at the domain.
    pub fn contains_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Number of email occurrences at the domain within `text`.
    pub fn match_count(&self, text: &str) -> usize {
        self.pattern.find_iter(text).count()
    }

    /// Rewrites every occurrence to `new`, preserving local-part case and
    /// emitting the canonical lower-case new domain. Borrows the input when
    /// nothing matches.
    pub fn substitute<'a>(&self, text: &'a str, new: &Domain) -> (Cow<'a, str>, usize) {
        let mut occurrences = 0usize;
        let replaced = self
            .pattern
            .replace_all(text, |caps: &regex::Captures<'_>| {
                occurrences += 1;
                format!("{}@{}", &caps[1], new.as_str())
            });
        (replaced, occurrences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(domain: &str) -> EmailMatcher {
        EmailMatcher::new(&Domain::parse(domain).unwrap()).unwrap()
    }

    #[test]
    fn matches_case_insensitively() {
        let m = matcher("old.com");
        assert!(m.contains_match("contact Alice@OLD.COM today"));
        assert!(!m.contains_match("nothing here"));
    }

    #[test]
    fn substitute_preserves_local_part_case() {
        let m = matcher("old.com");
        let new = Domain::parse("new.com").unwrap();
        let (text, count) = m.substitute("Alice.B@Old.Com", &new);
        assert_eq!(text.as_ref(), "Alice.B@new.com");
        assert_eq!(count, 1);
    }

    #[test]
    fn substitute_borrows_without_matches() {
        let m = matcher("old.com");
        let new = Domain::parse("new.com").unwrap();
        let (text, count) = m.substitute("bob@other.org", &new);
        assert!(matches!(text, Cow::Borrowed(_)));
        assert_eq!(count, 0);
    }

    #[test]
    fn substitute_rewrites_every_occurrence() {
        let m = matcher("old.com");
        let new = Domain::parse("new.com").unwrap();
        let (text, count) = m.substitute("a@old.com, b@old.com", &new);
        assert_eq!(text.as_ref(), "a@new.com, b@new.com");
        assert_eq!(count, 2);
    }

    #[test]
    fn subdomain_prefix_is_not_matched() {
        let m = matcher("old.com");
        assert!(!m.contains_match("a@mail.old.com"));
    }

    #[test]
    fn longer_domain_sharing_the_prefix_is_matched() {
        // Literal-suffix policy: no right-hand boundary on the domain.
        let m = matcher("old.com");
        let new = Domain::parse("new.com").unwrap();
        let (text, _) = m.substitute("a@old.com.au", &new);
        assert_eq!(text.as_ref(), "a@new.com.au");
    }
}
