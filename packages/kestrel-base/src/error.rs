use thiserror::Error;

/// Failures of the binary visitor stream itself. Individual fields that are
/// missing or mistyped are not errors; `Visitor::visit_field` reports those
/// with `false`.
#[derive(Debug, Error)]
pub enum VisitError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a visitor stream (magic {0:?})")]
    BadMagic([u8; 4]),
    #[error("unsupported stream version {0}")]
    UnsupportedVersion(u32),
    #[error("unknown type tag {tag} for field `{field}`")]
    UnknownTag { tag: u8, field: String },
    #[error("invalid utf-8 in stream: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("stream ended unexpectedly")]
    Truncated,
    #[error("node nesting exceeds {0} levels")]
    TooDeep(usize),
}
