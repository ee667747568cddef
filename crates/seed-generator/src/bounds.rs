//! Inclusive ranges used to parameterize generation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error type for generator configuration.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Lower bound above upper bound
    #[error("Invalid bounds for {name}: min {min} is greater than max {max}")]
    InvertedBounds {
        name: String,
        min: String,
        max: String,
    },

    /// Bounds outside of what the target column accepts
    #[error("Invalid bounds for {name}: {reason}")]
    OutOfDomain { name: String, reason: String },
}

/// Inclusive `[min, max]` range.
///
/// Serialized as `{ min: .., max: .. }` so plan files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T> Bounds<T>
where
    T: PartialOrd + Copy + fmt::Display,
{
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Check that `min <= max`. `name` identifies the setting in the error.
    pub fn validate(&self, name: &str) -> Result<(), GeneratorError> {
        if self.min > self.max {
            return Err(GeneratorError::InvertedBounds {
                name: name.to_string(),
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
        Ok(())
    }

    /// Bounds with the endpoints swapped if they were given in reverse.
    ///
    /// Generators call this so an unvalidated range never panics inside
    /// `gen_range`.
    pub fn ordered(&self) -> Self {
        if self.min > self.max {
            Self {
                min: self.max,
                max: self.min,
            }
        } else {
            *self
        }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

impl<T: fmt::Display> fmt::Display for Bounds<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
