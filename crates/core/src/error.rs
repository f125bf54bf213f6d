use thiserror::Error;

/// Error taxonomy shared by every service.
///
/// Each service translates at its boundary: storage/HTTP failures become one
/// of these kinds, and the HTTP adapters map kinds to status codes.
#[derive(Error, Debug)]
pub enum SeekError {
    #[error("bad arguments: {0}")]
    BadArguments(String),

    #[error("bad credentials")]
    BadCredentials,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}
