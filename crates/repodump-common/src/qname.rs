//! Qualified names.

use std::fmt;
use std::str::FromStr;

use crate::{Error, SYSTEM_NAMESPACE};

/// A namespace-qualified name.
///
/// Displays as `namespace:name`; exclusion patterns are matched against that
/// form.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    namespace: String,
    name: String,
}

impl QName {
    /// Create a qualified name from its parts.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Shorthand for a name in the system namespace.
    pub fn system(name: impl Into<String>) -> Self {
        Self::new(SYSTEM_NAMESPACE, name)
    }

    /// The namespace part.
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The local name part.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if this name lives in the reserved system namespace.
    #[inline]
    pub fn is_system(&self) -> bool {
        self.namespace == SYSTEM_NAMESPACE
    }
}

impl fmt::Debug for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QName({})", self)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl FromStr for QName {
    type Err = Error;

    /// Parse `namespace:name`, splitting at the first colon.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((namespace, name)) if !name.is_empty() => Ok(Self::new(namespace, name)),
            _ => Err(Error::InvalidQName(s.to_string())),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for QName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for QName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let qname = QName::new("custom", "Doc");
        assert_eq!(qname.to_string(), "custom:Doc");
        assert!(!qname.is_system());
        assert!(QName::system("Class").is_system());
    }

    #[test]
    fn test_parse_splits_at_first_colon() {
        let qname: QName = "urn:x:Thing".parse().unwrap();
        assert_eq!(qname.namespace(), "urn");
        assert_eq!(qname.name(), "x:Thing");
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        assert!("Doc".parse::<QName>().is_err());
        assert!("custom:".parse::<QName>().is_err());
    }
}
