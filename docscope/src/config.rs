//! Configuration for the analytics facade and for store credentials.

use crate::error::{DocScopeError, Result};
use crate::logging::LogConfig;
use crate::security::{InputValidator, PathSecurity, SecretString};

/// Environment variable holding the project id.
pub const ENV_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
/// Environment variable holding the service account email.
pub const ENV_CLIENT_EMAIL: &str = "FIREBASE_CLIENT_EMAIL";
/// Environment variable holding the PEM private key.
pub const ENV_PRIVATE_KEY: &str = "FIREBASE_PRIVATE_KEY";

/// Service-account credentials of a hosted document store.
#[derive(Clone)]
pub struct StoreCredentials {
    pub project_id: String,
    pub client_email: String,
    pub private_key: SecretString,
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &self.private_key)
            .finish()
    }
}

impl StoreCredentials {
    /// Reads the credentials from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`DocScopeError::Configuration`] naming the first missing or
    /// empty variable.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the credentials through `lookup`, which maps a variable name to its value.
    ///
    /// Private keys are often stored with literal `\n` sequences; those become newlines.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    DocScopeError::Configuration(format!(
                        "Missing store configuration: {name} is not set"
                    ))
                })
        };

        let credentials = Self {
            project_id: required(ENV_PROJECT_ID)?,
            client_email: required(ENV_CLIENT_EMAIL)?,
            private_key: SecretString::new(required(ENV_PRIVATE_KEY)?.replace("\\n", "\n")),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Checks that every credential is present.
    pub fn validate(&self) -> Result<()> {
        let missing = [
            (ENV_PROJECT_ID, self.project_id.trim().is_empty()),
            (ENV_CLIENT_EMAIL, self.client_email.trim().is_empty()),
            (ENV_PRIVATE_KEY, self.private_key.is_empty()),
        ]
        .into_iter()
        .find(|(_, missing)| *missing);

        match missing {
            Some((name, _)) => Err(DocScopeError::Configuration(format!(
                "Missing store configuration: {name} is not set"
            ))),
            None => Ok(()),
        }
    }
}

/// Windowed-count estimates used when a collection has no usable timestamp field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackRatios {
    pub today: f64,
    pub week: f64,
    pub month: f64,
}

impl Default for FallbackRatios {
    fn default() -> Self {
        Self {
            today: 0.03,
            week: 0.15,
            month: 0.40,
        }
    }
}

/// Sample sizes, limits and conventions of the analytics facade.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Documents sampled for field statistics (default: 500)
    pub field_stats_sample_size: usize,
    /// Documents sampled for pattern detection (default: 200)
    pub pattern_sample_size: usize,
    /// Documents sampled per collection for relationship inference (default: 20)
    pub relationship_sample_size: usize,
    /// Documents sampled per collection for subcollection discovery (default: 3)
    pub subcollection_sample_size: usize,
    /// Depth limit of subcollection discovery (default: 2)
    pub max_subcollection_depth: usize,
    /// Documents returned by recent-document queries (default: 10)
    pub recent_documents_limit: usize,
    /// Collections covered by the all-collections trend view (default: 5)
    pub trend_collections_limit: usize,
    /// Length of daily trend series (default: 30)
    pub trend_days: u32,
    /// Field holding the creation time of a document (default: "createdAt")
    pub timestamp_field: String,
    pub fallback_ratios: FallbackRatios,
    pub log: LogConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            field_stats_sample_size: 500,
            pattern_sample_size: 200,
            relationship_sample_size: 20,
            subcollection_sample_size: 3,
            max_subcollection_depth: 2,
            recent_documents_limit: 10,
            trend_collections_limit: 5,
            trend_days: 30,
            timestamp_field: "createdAt".to_string(),
            fallback_ratios: FallbackRatios::default(),
            log: LogConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }

    /// Checks sample sizes, ratios and the timestamp field name.
    pub fn validate(&self) -> Result<()> {
        InputValidator::validate_sample_size(self.field_stats_sample_size, "field_stats_sample_size")?;
        InputValidator::validate_sample_size(self.pattern_sample_size, "pattern_sample_size")?;
        InputValidator::validate_sample_size(
            self.relationship_sample_size,
            "relationship_sample_size",
        )?;
        InputValidator::validate_sample_size(
            self.subcollection_sample_size,
            "subcollection_sample_size",
        )?;
        InputValidator::validate_sample_size(self.recent_documents_limit, "recent_documents_limit")?;
        if self.trend_days == 0 {
            return Err(DocScopeError::Configuration(
                "trend_days must be greater than 0".to_string(),
            ));
        }
        InputValidator::validate_ratio(self.fallback_ratios.today, "fallback_ratios.today")?;
        InputValidator::validate_ratio(self.fallback_ratios.week, "fallback_ratios.week")?;
        InputValidator::validate_ratio(self.fallback_ratios.month, "fallback_ratios.month")?;
        PathSecurity::validate_field_name(&self.timestamp_field)?;
        Ok(())
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug, Clone)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn field_stats_sample_size(mut self, size: usize) -> Self {
        self.config.field_stats_sample_size = size;
        self
    }

    pub fn pattern_sample_size(mut self, size: usize) -> Self {
        self.config.pattern_sample_size = size;
        self
    }

    pub fn relationship_sample_size(mut self, size: usize) -> Self {
        self.config.relationship_sample_size = size;
        self
    }

    pub fn subcollection_sample_size(mut self, size: usize) -> Self {
        self.config.subcollection_sample_size = size;
        self
    }

    pub fn max_subcollection_depth(mut self, depth: usize) -> Self {
        self.config.max_subcollection_depth = depth;
        self
    }

    pub fn recent_documents_limit(mut self, limit: usize) -> Self {
        self.config.recent_documents_limit = limit;
        self
    }

    pub fn trend_collections_limit(mut self, limit: usize) -> Self {
        self.config.trend_collections_limit = limit;
        self
    }

    pub fn trend_days(mut self, days: u32) -> Self {
        self.config.trend_days = days;
        self
    }

    pub fn timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.config.timestamp_field = field.into();
        self
    }

    pub fn fallback_ratios(mut self, ratios: FallbackRatios) -> Self {
        self.config.fallback_ratios = ratios;
        self
    }

    pub fn log(mut self, log: LogConfig) -> Self {
        self.config.log = log;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<AnalysisConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_credentials_from_lookup() {
        let vars = env(&[
            (ENV_PROJECT_ID, "demo-project"),
            (ENV_CLIENT_EMAIL, "svc@demo-project.iam.example.com"),
            (ENV_PRIVATE_KEY, "-----BEGIN KEY-----\\nabc\\n-----END KEY-----"),
        ]);
        let creds = StoreCredentials::from_lookup(|name| vars.get(name).cloned()).unwrap();

        assert_eq!(creds.project_id, "demo-project");
        assert_eq!(
            creds.private_key.expose(),
            "-----BEGIN KEY-----\nabc\n-----END KEY-----"
        );
        assert!(!format!("{creds:?}").contains("abc"));
    }

    #[test]
    fn test_missing_credentials_is_configuration_error() {
        let vars = env(&[(ENV_CLIENT_EMAIL, "svc@example.com"), (ENV_PRIVATE_KEY, "k")]);
        let err = StoreCredentials::from_lookup(|name| vars.get(name).cloned()).unwrap_err();

        assert!(err.is_configuration());
        assert!(err.to_string().contains(ENV_PROJECT_ID));

        let blank = env(&[
            (ENV_PROJECT_ID, "p"),
            (ENV_CLIENT_EMAIL, "  "),
            (ENV_PRIVATE_KEY, "k"),
        ]);
        let err = StoreCredentials::from_lookup(|name| blank.get(name).cloned()).unwrap_err();
        assert!(err.to_string().contains(ENV_CLIENT_EMAIL));
    }

    #[test]
    fn test_analysis_config_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.field_stats_sample_size, 500);
        assert_eq!(config.pattern_sample_size, 200);
        assert_eq!(config.relationship_sample_size, 20);
        assert_eq!(config.subcollection_sample_size, 3);
        assert_eq!(config.max_subcollection_depth, 2);
        assert_eq!(config.timestamp_field, "createdAt");
        assert_eq!(config.fallback_ratios.month, 0.40);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_validation() {
        let config = AnalysisConfig::builder()
            .pattern_sample_size(50)
            .timestamp_field("insertedAt")
            .build()
            .unwrap();
        assert_eq!(config.pattern_sample_size, 50);
        assert_eq!(config.timestamp_field, "insertedAt");

        assert!(AnalysisConfig::builder().field_stats_sample_size(0).build().is_err());
        assert!(AnalysisConfig::builder().timestamp_field("").build().is_err());
        assert!(AnalysisConfig::builder().trend_days(0).build().is_err());
        assert!(AnalysisConfig::builder()
            .fallback_ratios(FallbackRatios {
                today: 2.0,
                week: 0.1,
                month: 0.1
            })
            .build()
            .is_err());
    }
}
