//! Error taxonomy for reconciliation.
//!
//! Every failure mode is data: the engine folds these into a
//! [`ReconcileResult`](crate::types::ReconcileResult) instead of letting them
//! propagate, so callers always receive a structured outcome they can render.

use crate::descriptor::ResourceKind;

/// Result type alias for reconcile operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors that can occur while reconciling a resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// The transport could not reach the server at all (DNS, connection
    /// refused, timeout). Reported as status `-1`, distinct from any HTTP
    /// status.
    #[error("server unreachable: {message}")]
    TransportUnreachable {
        /// Transport-level failure description.
        message: String,
    },

    /// The server answered with an unexpected HTTP status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Numeric HTTP status.
        status: i32,
        /// Raw response body, verbatim, for diagnostics.
        body: String,
    },

    /// A field required for this kind/format combination was not supplied.
    /// Raised before any network call.
    #[error("missing required field `{field}` for {context}")]
    MissingRequiredField {
        /// Name of the offending field.
        field: &'static str,
        /// Kind/format combination that requires it.
        context: String,
    },

    /// The desired state changes a field the kind disallows changing after
    /// creation. Raised before any mutating call, identically under dry-run
    /// and live execution.
    #[error("field `{field}` of {kind} `{identity}` cannot be changed after creation")]
    ImmutableFieldChanged {
        /// The immutable field path.
        field: String,
        /// Resource kind.
        kind: ResourceKind,
        /// Identity of the resource.
        identity: String,
    },

    /// The caller referenced a resource kind with no registered descriptor.
    #[error("unknown resource kind: {0}")]
    UnknownKind(String),

    /// The kind does not support the requested operation (singletons such as
    /// the realm set cannot be deleted).
    #[error("{kind} does not support {operation}")]
    UnsupportedOperation {
        /// Resource kind.
        kind: ResourceKind,
        /// Operation name.
        operation: &'static str,
    },

    /// A describe call returned a body that could not be decoded as JSON.
    #[error("undecodable response body: {0}")]
    InvalidBody(String),
}

impl ReconcileError {
    /// Whether this error was raised before any network call was issued.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredField { .. }
                | Self::ImmutableFieldChanged { .. }
                | Self::UnknownKind(_)
        )
    }

    /// The HTTP status carried by this error, if any. `-1` for transport
    /// failures.
    #[must_use]
    pub fn status(&self) -> Option<i32> {
        match self {
            Self::TransportUnreachable { .. } => Some(-1),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_is_distinct_from_http() {
        let unreachable = ReconcileError::TransportUnreachable {
            message: "connection refused".into(),
        };
        let http = ReconcileError::Http {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(unreachable.status(), Some(-1));
        assert_eq!(http.status(), Some(502));
        assert_ne!(unreachable, http);
    }

    #[test]
    fn precondition_errors() {
        let err = ReconcileError::ImmutableFieldChanged {
            field: "format".into(),
            kind: ResourceKind::Repository,
            identity: "test-yum".into(),
        };
        assert!(err.is_precondition());
        assert!(
            !ReconcileError::Http {
                status: 500,
                body: String::new()
            }
            .is_precondition()
        );
    }

    #[test]
    fn display_names_the_field() {
        let err = ReconcileError::MissingRequiredField {
            field: "pattern",
            context: "wildcard privilege".into(),
        };
        let text = err.to_string();
        assert!(text.contains("pattern"));
        assert!(text.contains("wildcard"));
    }
}
