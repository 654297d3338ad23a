//! Export configuration.

use std::path::PathBuf;

use repodump_common::ObjectId;
use tracing::Level;

/// Default directory for extracted content files.
pub const DEFAULT_CONTENT_DIRECTORY: &str = "data";

/// Settings for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Regexes matched in full against `namespace:name` of referenced classes.
    pub exclude_classes: Vec<String>,
    /// Ids of objects that are never followed.
    pub exclude_ids: Vec<ObjectId>,
    /// Write content values to side files.
    pub export_content: bool,
    /// Where content files go.
    pub content_directory: PathBuf,
    /// 0 = warnings only, 1 = progress, 2 = per object and property.
    pub verbosity: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            exclude_classes: Vec::new(),
            exclude_ids: Vec::new(),
            export_content: false,
            content_directory: PathBuf::from(DEFAULT_CONTENT_DIRECTORY),
            verbosity: 1,
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude classes whose qualified name fully matches `pattern`.
    pub fn with_exclude_class(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_classes.push(pattern.into());
        self
    }

    pub fn with_exclude_classes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_classes.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Never follow references to `id`.
    pub fn with_exclude_id(mut self, id: impl Into<ObjectId>) -> Self {
        self.exclude_ids.push(id.into());
        self
    }

    pub fn with_exclude_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ObjectId>,
    {
        self.exclude_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_export_content(mut self, enabled: bool) -> Self {
        self.export_content = enabled;
        self
    }

    pub fn with_content_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.content_directory = dir.into();
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Most detailed log level the verbosity asks for.
    pub fn log_level(&self) -> Level {
        match self.verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}

/// Split a blank-separated list, as used for exclusion settings.
pub fn split_list(list: &str) -> Vec<String> {
    list.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert!(!config.export_content);
        assert_eq!(config.content_directory, PathBuf::from("data"));
        assert_eq!(config.verbosity, 1);
        assert_eq!(config.log_level(), Level::INFO);
    }

    #[test]
    fn test_builder_methods() {
        let config = ExportConfig::new()
            .with_exclude_class("custom:.*")
            .with_exclude_ids(["a", "b"])
            .with_export_content(true)
            .with_content_directory("out/blobs")
            .with_verbosity(2);
        assert_eq!(config.exclude_classes, vec!["custom:.*"]);
        assert_eq!(config.exclude_ids.len(), 2);
        assert!(config.export_content);
        assert_eq!(config.log_level(), Level::DEBUG);
        assert_eq!(ExportConfig::new().with_verbosity(0).log_level(), Level::WARN);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("  a:B  c:D\te "), vec!["a:B", "c:D", "e"]);
        assert!(split_list("   ").is_empty());
    }
}
