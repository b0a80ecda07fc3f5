//! The href identity primitive.
//!
//! Every remote resource is identified by a stable, server-assigned href:
//! an absolute URL that acts as the resource's primary key. Equality and
//! caching throughout the SDK are keyed on hrefs, never on in-memory
//! instances.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a string is not a valid href.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid href '{href}'. Hrefs are absolute http(s) URLs assigned by the service.")]
pub struct InvalidHrefError {
    /// The rejected value.
    pub href: String,
}

/// A validated, server-assigned resource identity.
///
/// Two handles with the same href denote the same remote entity, even when
/// they are distinct in-memory instances. `Href` is the only identity the
/// SDK recognizes; there is no instance-level singleton cache.
///
/// # Example
///
/// ```rust
/// use veridian_api::Href;
///
/// let a = Href::new("https://api.veridian.io/v1/accounts/a1").unwrap();
/// let b = Href::new("https://api.veridian.io/v1/accounts/a1").unwrap();
/// assert_eq!(a, b);
///
/// assert!(Href::new("accounts/a1").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Href(String);

impl Href {
    /// Creates a new validated href.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHrefError`] if the value is not an absolute http(s)
    /// URL.
    pub fn new(href: impl Into<String>) -> Result<Self, InvalidHrefError> {
        let href = href.into();
        if !(href.starts_with("https://") || href.starts_with("http://")) {
            return Err(InvalidHrefError { href });
        }
        let rest = href.split_once("://").map_or("", |(_, rest)| rest);
        if rest.is_empty() || rest.starts_with('/') {
            return Err(InvalidHrefError { href });
        }
        Ok(Self(href))
    }

    /// Returns the href as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the href of a child resource under this one.
    ///
    /// ```rust
    /// use veridian_api::Href;
    ///
    /// let account = Href::new("https://api.veridian.io/v1/accounts/a1").unwrap();
    /// let custom = account.child("customData");
    /// assert_eq!(custom.as_str(), "https://api.veridian.io/v1/accounts/a1/customData");
    /// ```
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        Self(format!(
            "{}/{}",
            self.0.trim_end_matches('/'),
            segment.trim_start_matches('/')
        ))
    }

    /// Returns `true` if the href's path contains the given segment pattern.
    ///
    /// Used by the type registry to dispatch references to concrete types.
    #[must_use]
    pub fn contains_segment(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }
}

impl AsRef<str> for Href {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Href {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Href {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

// Verify Href is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Href>();
};
