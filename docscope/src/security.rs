//! Input validation and credential handling.
//!
//! Every collection name or path handed to the analytics facade is checked
//! here before it reaches the store, and secrets read from the environment
//! are wrapped so they are wiped from memory on drop.

use crate::error::{DocScopeError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Longest path the store accepts, in bytes.
pub const MAX_PATH_BYTES: usize = 1500;

/// Largest sample a single request may ask for.
pub const MAX_SAMPLE_SIZE: usize = 10_000;

/// A string that clears its contents when dropped.
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop)]
pub struct SecretString(String);

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretString(***)")
    }
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the secret value. Avoid storing the result.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to a regular string. The SecretString will be zeroized.
    pub fn into_string(mut self) -> String {
        let value = std::mem::take(&mut self.0);
        self.0.zeroize();
        value
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Path and identifier validation for store requests.
pub struct PathSecurity;

impl PathSecurity {
    /// Validates a collection path such as `users` or `users/alice/orders`.
    ///
    /// # Examples
    /// ```rust
    /// use docscope::security::PathSecurity;
    ///
    /// assert!(PathSecurity::validate_collection_path("users").is_ok());
    /// assert!(PathSecurity::validate_collection_path("users/alice/orders").is_ok());
    ///
    /// assert!(PathSecurity::validate_collection_path("").is_err());
    /// assert!(PathSecurity::validate_collection_path("users/alice").is_err());
    /// assert!(PathSecurity::validate_collection_path("users//orders").is_err());
    /// ```
    pub fn validate_collection_path(path: &str) -> Result<()> {
        let segments = Self::validate_segments(path, "Collection path")?;
        if segments % 2 == 0 {
            return Err(DocScopeError::InvalidInput(format!(
                "Collection path '{path}' must have an odd number of segments"
            )));
        }
        Ok(())
    }

    /// Validates a document path such as `users/alice`.
    pub fn validate_document_path(path: &str) -> Result<()> {
        let segments = Self::validate_segments(path, "Document path")?;
        if segments % 2 != 0 {
            return Err(DocScopeError::InvalidInput(format!(
                "Document path '{path}' must have an even number of segments"
            )));
        }
        Ok(())
    }

    /// Validates a field name. Field names are not path segments, so `/`,
    /// dots and reserved-looking names are allowed.
    ///
    /// ```rust
    /// use docscope::security::PathSecurity;
    ///
    /// assert!(PathSecurity::validate_field_name("meta/source").is_ok());
    /// assert!(PathSecurity::validate_field_name("").is_err());
    /// ```
    pub fn validate_field_name(field: &str) -> Result<()> {
        if field.is_empty() {
            return Err(DocScopeError::InvalidInput(
                "Field name cannot be empty".to_string(),
            ));
        }
        if field.len() > MAX_PATH_BYTES {
            return Err(DocScopeError::InvalidInput(format!(
                "Field name too long: {} bytes (max {MAX_PATH_BYTES})",
                field.len()
            )));
        }
        if field.contains('\0') {
            return Err(DocScopeError::InvalidInput(
                "Field name cannot contain null bytes".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates a single document id.
    pub fn validate_identifier(value: &str, name: &str) -> Result<()> {
        let segments = Self::validate_segments(value, name)?;
        if segments != 1 {
            return Err(DocScopeError::InvalidInput(format!(
                "{name} '{value}' cannot contain '/'"
            )));
        }
        Ok(())
    }

    /// Shared checks. Returns the number of segments.
    fn validate_segments(path: &str, name: &str) -> Result<usize> {
        if path.trim().is_empty() {
            return Err(DocScopeError::InvalidInput(format!(
                "{name} cannot be empty or whitespace-only"
            )));
        }

        if path.len() > MAX_PATH_BYTES {
            return Err(DocScopeError::InvalidInput(format!(
                "{name} too long: {} bytes (max {MAX_PATH_BYTES})",
                path.len()
            )));
        }

        if path.contains('\0') {
            return Err(DocScopeError::InvalidInput(format!(
                "{name} cannot contain null bytes"
            )));
        }

        static RESERVED_SEGMENT: Lazy<Regex> = Lazy::new(|| {
            #[allow(clippy::expect_used)]
            Regex::new(r"^(\.|\.\.|__.*__)$").expect("Hard-coded regex pattern should be valid")
        });

        let mut count = 0;
        for segment in path.split('/') {
            if segment.is_empty() {
                return Err(DocScopeError::InvalidInput(format!(
                    "{name} '{path}' contains an empty segment"
                )));
            }
            if RESERVED_SEGMENT.is_match(segment) {
                return Err(DocScopeError::InvalidInput(format!(
                    "{name} '{path}' uses the reserved segment '{segment}'"
                )));
            }
            count += 1;
        }
        Ok(count)
    }
}

/// Numeric argument validation.
pub struct InputValidator;

impl InputValidator {
    /// Validates a requested sample or page size.
    pub fn validate_sample_size(value: usize, name: &str) -> Result<()> {
        if value == 0 {
            return Err(DocScopeError::InvalidInput(format!(
                "{name} must be greater than 0"
            )));
        }
        if value > MAX_SAMPLE_SIZE {
            return Err(DocScopeError::InvalidInput(format!(
                "{name} too large: {value} (max {MAX_SAMPLE_SIZE})"
            )));
        }
        Ok(())
    }

    /// Validates a ratio (0.0 to 1.0).
    pub fn validate_ratio(value: f64, name: &str) -> Result<()> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(DocScopeError::InvalidInput(format!(
                "Invalid {name} value: must be between 0.0 and 1.0, got {value}"
            )));
        }
        Ok(())
    }
}
