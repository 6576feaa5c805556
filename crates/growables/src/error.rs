//! Error types for settings persistence and host interception.

use std::fmt;

use crate::host::routine::OverrideRejected;

// ---------------------------------------------------------------------------
// SettingsError
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "settings file I/O failed: {e}"),
            SettingsError::Json(e) => write!(f, "settings file is not valid JSON: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Json(e)
    }
}

// ---------------------------------------------------------------------------
// PatchError
// ---------------------------------------------------------------------------

/// A routine did not have the shape the excision expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    UnknownRoutine(String),
    /// No step declares any of the expected work-item types.
    WorkItemsNotFound { routine: String },
    /// A work-item step was found but the hand-off point never followed it.
    UnterminatedRegion { routine: String, start: &'static str },
    /// Another owner already overrides the routine.
    AlreadyOverridden { routine: String, owner: String },
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::UnknownRoutine(routine) => write!(f, "routine {routine} is not registered"),
            PatchError::WorkItemsNotFound { routine } => {
                write!(f, "no level job work items found in {routine}")
            }
            PatchError::UnterminatedRegion { routine, start } => write!(
                f,
                "level job region starting at step {start} in {routine} never hands off"
            ),
            PatchError::AlreadyOverridden { routine, owner } => {
                write!(f, "routine {routine} is already overridden by {owner}")
            }
        }
    }
}

impl std::error::Error for PatchError {}

impl PatchError {
    pub(crate) fn from_rejection(routine: &str, rejection: OverrideRejected) -> Self {
        match rejection {
            OverrideRejected::UnknownRoutine => PatchError::UnknownRoutine(routine.to_string()),
            OverrideRejected::OwnedBy(owner) => PatchError::AlreadyOverridden {
                routine: routine.to_string(),
                owner,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// AdaptError
// ---------------------------------------------------------------------------

/// A detected extension could not be adapted to provide its level queues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdaptError {
    MissingRoutine { system: String },
    MissingField { system: String, field: String },
    FieldType { field: String, expected: &'static str },
    Patch(PatchError),
}

impl fmt::Display for AdaptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdaptError::MissingRoutine { system } => {
                write!(f, "extension provides no routine for {system}")
            }
            AdaptError::MissingField { system, field } => {
                write!(f, "field {field} not found on {system}")
            }
            AdaptError::FieldType { field, expected } => {
                write!(f, "field {field} is not a {expected}")
            }
            AdaptError::Patch(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AdaptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdaptError::Patch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PatchError> for AdaptError {
    fn from(e: PatchError) -> Self {
        AdaptError::Patch(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_settings_error_display_and_source() {
        let err: SettingsError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.to_string().contains("gone"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_adapt_error_wraps_patch_error() {
        let patch = PatchError::WorkItemsNotFound {
            routine: "r".to_string(),
        };
        let err = AdaptError::from(patch.clone());
        assert_eq!(err.to_string(), patch.to_string());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_rejection_maps_to_patch_error() {
        let err = PatchError::from_rejection("r", OverrideRejected::OwnedBy("other".into()));
        assert_eq!(
            err,
            PatchError::AlreadyOverridden {
                routine: "r".into(),
                owner: "other".into()
            }
        );
    }
}
