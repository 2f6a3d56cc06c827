//! Error types for toolset-core

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while declaring tools.
///
/// Host registration failures are not represented here: activation returns
/// the host's own error type unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Tool name '{name}' is already declared for a different operation")]
    NameConflict { name: String },

    #[error("Tool name must not be empty")]
    EmptyName,
}
