//! Error types for the widget runtime.

use std::fmt;

/// Errors that can occur during widget definition, registration,
/// resolution and operation dispatch.
#[derive(Debug, Clone)]
pub enum WidgetError {
    /// A definition or extension is malformed.
    Definition {
        /// What went wrong.
        message: String,
    },

    /// A lookup referenced a widget name that is not registered.
    UnknownWidget {
        /// The missing name.
        name: String,
    },

    /// A definition was registered twice under the rejecting policy.
    DuplicateDefinition {
        /// The colliding name.
        name: String,
    },

    /// Discovery could not load the named module.
    ModuleResolution {
        /// The requested widget name.
        name: String,
        /// Description of the failure.
        message: String,
    },

    /// An operation was invoked on a detached widget.
    DetachedWidget {
        /// The widget's definition name.
        widget: String,
        /// The attempted operation.
        op: String,
    },

    /// An operation name is not present in the widget's method table.
    UnknownOperation {
        /// The widget's definition name.
        widget: String,
        /// The unknown operation.
        op: String,
    },
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::Definition { message } => {
                write!(f, "Malformed widget definition: {}", message)
            }
            WidgetError::UnknownWidget { name } => {
                write!(f, "Unknown widget: {}", name)
            }
            WidgetError::DuplicateDefinition { name } => {
                write!(f, "Widget already registered: {}", name)
            }
            WidgetError::ModuleResolution { name, message } => {
                write!(f, "Failed to resolve module '{}': {}", name, message)
            }
            WidgetError::DetachedWidget { widget, op } => {
                write!(f, "Operation '{}' on detached widget '{}'", op, widget)
            }
            WidgetError::UnknownOperation { widget, op } => {
                write!(f, "Widget '{}' has no operation '{}'", widget, op)
            }
        }
    }
}

impl std::error::Error for WidgetError {}

/// Result type alias for runtime operations.
pub type WidgetResult<T> = Result<T, WidgetError>;
