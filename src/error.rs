/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a documentation-generation call.
///
/// Per-field problems (missing doc files, unrenderable constraint values,
/// absent serializers) are recovered locally and never surface here; only a
/// structurally unresolvable type model does.
#[derive(Debug)]
pub enum Error {
    /// A property carries no resolvable type at all. Continuing would produce
    /// wrong documentation, so this aborts the whole generation call.
    MissingPropertyType {
        type_name: String,
        property: String,
    },
    /// A named type reference points to a type that was never registered in
    /// the `TypeIndex`, meaning the descriptor table is structurally incomplete.
    UnknownType(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MissingPropertyType {
                type_name,
                property,
            } => {
                write!(
                    f,
                    "Missing type for property '{}' of '{}'",
                    property, type_name
                )
            }
            Error::UnknownType(name) => write!(f, "Unknown type: {}", name),
        }
    }
}

impl std::error::Error for Error {}
