use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way the model, the rewiring and the exporting can fail.
///
/// All of these abort the whole operation, nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
	/// Malformed input, or a container that violates one of its uniqueness invariants.
	#[error("validation failed: {0}")]
	Validation(String),

	/// A version or namespace that doesn't exist was requested.
	#[error("not found: {0}")]
	NotFound(String),

	/// A name can't be written, because it contains a column or line separator.
	#[error("cannot serialize: {0}")]
	Serialization(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl Error {
	pub fn validation(message: impl Into<String>) -> Error {
		Error::Validation(message.into())
	}

	pub fn not_found(message: impl Into<String>) -> Error {
		Error::NotFound(message.into())
	}

	pub fn serialization(message: impl Into<String>) -> Error {
		Error::Serialization(message.into())
	}
}
