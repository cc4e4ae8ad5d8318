//! Blog posts, looked up externally by slug.

use core::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dentalis_core::{DomainError, PostId};

/// URL-safe post key: lowercase alphanumerics and single hyphens, unique and
/// immutable once published.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Slug {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Slug {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(DomainError::validation("slug must not be empty"));
        }
        if s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return Err(DomainError::validation("slug has malformed hyphens"));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(DomainError::validation(
                "slug may only contain lowercase letters, digits and hyphens",
            ));
        }
        Ok(Self(s.to_string()))
    }
}

/// A published blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: PostId,
    pub slug: Slug,
    pub title: String,
    pub body: String,
    pub published_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_slugs_parse() {
        assert!("teeth-whitening-101".parse::<Slug>().is_ok());
        assert!("2024-recap".parse::<Slug>().is_ok());
    }

    #[test]
    fn malformed_slugs_are_rejected() {
        for bad in ["", "Upper-Case", "spaces here", "-leading", "trailing-", "a--b", "ünïcode"] {
            assert!(bad.parse::<Slug>().is_err(), "expected {bad:?} to be rejected");
        }
    }
}
