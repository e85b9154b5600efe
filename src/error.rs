use thiserror::Error;

/// The only failure an inspection can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InspectError {
    /// The identifier does not name a class, interface or mixin the provider knows.
    #[error("class `{name}` could not be resolved: {reason}")]
    Unresolved { name: String, reason: String },
}

impl InspectError {
    pub fn not_found(name: &str) -> Self {
        InspectError::Unresolved {
            name: name.to_string(),
            reason: "no such class, interface or mixin".to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            InspectError::Unresolved { name, .. } => name,
        }
    }
}
