//! Error type shared by the resolver and all adapters

pub type CsResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Referenced content does not exist
	NotFound,
	/// A stable identifier is already bound to a different location
	Conflict(String),
	/// Invalid registration or builder input
	ConfigError(String),
	/// A value failed validation or decoding
	ValidationError(String),
	/// Adapter storage failure (details already logged at the call site)
	DbError,
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::Conflict(msg) => write!(f, "conflict: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::DbError => write!(f, "database error"),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "i/o error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::ValidationError(format!("JSON: {}", err))
	}
}

// vim: ts=4
