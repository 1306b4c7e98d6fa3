/// Error handling module for the view generator.
///
/// This module defines the error taxonomy surfaced by stencil registration,
/// trait composition, collision checking and configuration loading.
use crate::model::Origin;
use crate::traits::TraitId;
use thiserror::Error;

/// Failure reported by a single trait while it generates fragments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TraitError {
    message: String,
}

impl TraitError {
    /// Creates a trait error with a free-form message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// A resource the trait depends on is absent from the class type.
    pub fn missing_resource(class: &str, kind: &str, name: &str) -> Self {
        Self::message(format!("missing resource {}.{}.{}", class, kind, name))
    }

    /// A generated member name is not a legal identifier.
    pub fn invalid_identifier(name: &str) -> Self {
        Self::message(format!("'{}' is not a valid identifier", name))
    }

    /// The trait left the initializer with open blocks, or closed one it did not open.
    pub fn unbalanced_control_flow(expected: usize, found: usize) -> Self {
        Self::message(format!(
            "unbalanced control flow: expected depth {}, found {}",
            expected, found
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.message
    }
}

/// Main error type for stencil generation.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// The same trait identity was declared twice on one stencil.
    #[error("stencil '{stencil}' declares trait {trait_id} more than once")]
    Registration { stencil: String, trait_id: TraitId },

    /// A trait (or the stencil itself) could not produce valid output.
    #[error("stencil '{stencil}' failed in {origin}: {source}")]
    Generation {
        stencil: String,
        origin: Origin,
        #[source]
        source: TraitError,
    },

    /// Two contributions define the same member incompatibly.
    #[error("stencil '{stencil}': member '{member}' from {first} conflicts with {second}")]
    Collision {
        stencil: String,
        member: String,
        first: Origin,
        second: Origin,
    },

    /// The composition engine was driven past a terminal state.
    #[error("stencil '{stencil}': engine is already {state}")]
    InvalidState { stencil: String, state: String },

    /// Configuration or declaration errors.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Manifest deserialization errors.
    #[error("YAML error: {message}")]
    Yaml { message: String },
}

impl From<serde_yaml::Error> for ForgeError {
    fn from(error: serde_yaml::Error) -> Self {
        ForgeError::Yaml {
            message: error.to_string(),
        }
    }
}

/// Convenience type alias for Results in the generator.
pub type Result<T> = std::result::Result<T, ForgeError>;

impl ForgeError {
    /// Creates a new configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        ForgeError::Config {
            message: message.into(),
        }
    }

    /// Creates a generation error attributed to `origin`.
    pub fn generation_error(stencil: &str, origin: Origin, source: TraitError) -> Self {
        ForgeError::Generation {
            stencil: stencil.to_string(),
            origin,
            source,
        }
    }

    /// Returns the stencil this error is attributed to, if any.
    pub fn stencil(&self) -> Option<&str> {
        match self {
            ForgeError::Registration { stencil, .. }
            | ForgeError::Generation { stencil, .. }
            | ForgeError::Collision { stencil, .. }
            | ForgeError::InvalidState { stencil, .. } => Some(stencil),
            ForgeError::Config { .. } | ForgeError::Yaml { .. } => None,
        }
    }

    /// Returns the origins blamed by this error.
    pub fn origins(&self) -> Vec<&Origin> {
        match self {
            ForgeError::Generation { origin, .. } => vec![origin],
            ForgeError::Collision { first, second, .. } => vec![first, second],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_error_messages() {
        let error = TraitError::missing_resource("com.example.R", "attr", "buttonStyle");
        assert_eq!(error.as_str(), "missing resource com.example.R.attr.buttonStyle");

        let error = TraitError::unbalanced_control_flow(0, 2);
        assert!(error.to_string().contains("expected depth 0, found 2"));
    }

    #[test]
    fn test_generation_error_attribution() {
        let origin = Origin::Trait(TraitId::new("TintTrait"));
        let error = ForgeError::generation_error(
            "ButtonStencil",
            origin.clone(),
            TraitError::message("boom"),
        );

        let text = error.to_string();
        assert!(text.contains("ButtonStencil"));
        assert!(text.contains("TintTrait"));
        assert!(text.contains("boom"));
        assert_eq!(error.stencil(), Some("ButtonStencil"));
        assert_eq!(error.origins(), vec![&origin]);
    }

    #[test]
    fn test_collision_error_names_both_origins() {
        let error = ForgeError::Collision {
            stencil: "ButtonStencil".to_string(),
            member: "getTypedTag".to_string(),
            first: Origin::Trait(TraitId::new("A")),
            second: Origin::Trait(TraitId::new("B")),
        };
        let text = error.to_string();
        assert!(text.contains("trait A"));
        assert!(text.contains("trait B"));
        assert_eq!(error.origins().len(), 2);
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parsed: std::result::Result<Vec<u32>, _> = serde_yaml::from_str("{ not: [a list");
        let error: ForgeError = parsed.unwrap_err().into();
        assert!(matches!(error, ForgeError::Yaml { .. }));
        assert_eq!(error.stencil(), None);
    }
}
