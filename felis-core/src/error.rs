/// Coarse classification of every failure the core can report.
///
/// Callers branch on the kind, never on message text. The transport layer
/// maps each kind to exactly one status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required value was missing or malformed; raised before any I/O.
    InvalidInput,
    /// A well-formed lookup has no result.
    NotFound,
    /// Authentication failed. Never says which half was wrong.
    InvalidCredentials,
    /// A uniqueness rule would be violated.
    AlreadyExists,
    /// The catalog dependency failed or answered with an unexpected shape.
    UpstreamFailure,
    /// Anything else, e.g. the account store or the hasher failing.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidCredentials => "invalid_credentials",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::UpstreamFailure => "upstream_failure",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
