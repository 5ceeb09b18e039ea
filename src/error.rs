use crate::routing::HttpMethod;
use crate::type_system::TypeRef;
use std::path::PathBuf;

/// Result type alias for the documentation engine
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the documentation engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The type system has no description for a reference.
    #[error("cannot resolve type `{type_ref}`: {reason}")]
    UnresolvableType { type_ref: TypeRef, reason: String },

    /// The type system reported a primitive kind missing from the scalar table.
    #[error("no scalar name registered for primitive kind `{kind}` (used by `{type_ref}`)")]
    UnknownScalarKind { kind: String, type_ref: TypeRef },

    /// Two distinct references share a qualified name but differ in structure.
    #[error(
        "type name `{name}` is ambiguous: `{first_ref}` has fields [{}] but `{second_ref}` has fields [{}]",
        .first_fields.join(", "),
        .second_fields.join(", ")
    )]
    TypeNameConflict {
        name: String,
        first_ref: TypeRef,
        first_fields: Vec<String>,
        second_ref: TypeRef,
        second_fields: Vec<String>,
    },

    /// Two endpoints normalize to the same method and path.
    #[error("route {method} /{path} is declared more than once")]
    AmbiguousRoute { method: HttpMethod, path: String },

    #[error("invalid manifest {}: {message}", .path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("handler `{handler}` was not found in the scanned sources")]
    UnknownHandler { handler: String },

    #[error("handler `{handler}` cannot be documented: {reason}")]
    UnsupportedHandler { handler: String, reason: String },
}

impl Error {
    /// Whether the error only invalidates the endpoint being documented.
    ///
    /// Resolution failures are reported and skipped; structural failures such
    /// as name conflicts abort the whole run.
    pub fn is_endpoint_local(&self) -> bool {
        matches!(
            self,
            Error::UnresolvableType { .. } | Error::UnknownScalarKind { .. }
        )
    }
}
