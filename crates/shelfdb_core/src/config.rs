//! Database configuration.

/// Configuration for a [`crate::Database`].
#[derive(Debug, Clone)]
pub struct Config {
    /// The version the database starts at before any collections are added.
    pub initial_version: u64,

    /// The record field used as the primary key for new collections.
    pub key_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_version: 1,
            key_path: "id".to_string(),
        }
    }
}

impl Config {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the starting version.
    #[must_use]
    pub fn initial_version(mut self, version: u64) -> Self {
        self.initial_version = version;
        self
    }

    /// Sets the key path used for new collections.
    #[must_use]
    pub fn key_path(mut self, key_path: impl Into<String>) -> Self {
        self.key_path = key_path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.initial_version, 1);
        assert_eq!(config.key_path, "id");
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new().initial_version(4).key_path("title");
        assert_eq!(config.initial_version, 4);
        assert_eq!(config.key_path, "title");
    }
}
