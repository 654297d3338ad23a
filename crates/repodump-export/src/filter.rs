//! Exclusion policy for discovered references.

use regex::Regex;
use repodump_common::{ObjectId, QName};

use crate::state::FxHashSet;
use crate::{ExportConfig, ExportError, Result};

/// Decides whether a referenced object may be followed.
///
/// Excluded ids are checked first. Class patterns must match the whole
/// qualified name; `custom:Doc` is not excluded by the pattern `Doc`.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    ids: FxHashSet<ObjectId>,
    patterns: Vec<Regex>,
}

impl ExclusionFilter {
    /// Compile a filter from class patterns and excluded ids.
    pub fn new<P, I>(patterns: P, ids: I) -> Result<Self>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        I: IntoIterator<Item = ObjectId>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| ExportError::Pattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            ids: ids.into_iter().collect(),
            patterns,
        })
    }

    /// Compile the filter described by a configuration.
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        Self::new(&config.exclude_classes, config.exclude_ids.iter().cloned())
    }

    /// Whether the object `id` of class `class` may be followed.
    pub fn is_followable(&self, id: &ObjectId, class: &QName) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        if self.patterns.is_empty() {
            return true;
        }

        let qname = class.to_string();
        !self.patterns.iter().any(|re| re.is_match(&qname))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(patterns: &[&str], ids: &[&str]) -> ExclusionFilter {
        ExclusionFilter::new(patterns, ids.iter().map(|&id| ObjectId::from(id))).unwrap()
    }

    #[test]
    fn test_empty_filter_follows_everything() {
        let f = ExclusionFilter::default();
        assert!(f.is_followable(&"a".into(), &QName::new("custom", "Doc")));
    }

    #[test]
    fn test_id_exclusion_wins() {
        let f = filter(&[], &["secret"]);
        assert!(!f.is_followable(&"secret".into(), &QName::new("custom", "Doc")));
        assert!(f.is_followable(&"public".into(), &QName::new("custom", "Doc")));
    }

    #[test]
    fn test_patterns_match_whole_name() {
        let f = filter(&["Doc", "custom:Pers.*"], &[]);
        assert!(f.is_followable(&"a".into(), &QName::new("custom", "Doc")));
        assert!(!f.is_followable(&"b".into(), &QName::new("custom", "Person")));
        assert!(f.is_followable(&"c".into(), &QName::new("other", "Person")));
    }

    #[test]
    fn test_alternation_stays_anchored() {
        let f = filter(&["a:X|b:Y"], &[]);
        assert!(!f.is_followable(&"1".into(), &QName::new("b", "Y")));
        assert!(f.is_followable(&"2".into(), &QName::new("b", "YZ")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = ExclusionFilter::new(["custom:(unclosed"], std::iter::empty()).unwrap_err();
        assert!(matches!(err, ExportError::Pattern { ref pattern, .. } if pattern == "custom:(unclosed"));
        assert!(err.is_fatal());
    }
}
