pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<woodshed_storage::Error> for Error {
	fn from(err: woodshed_storage::Error) -> Self {
		match err {
			woodshed_storage::Error::NotFound(message) => Self::NotFound { message },
			woodshed_storage::Error::Conflict(message) => Self::Conflict { message },
			woodshed_storage::Error::Unavailable(message) => Self::Storage { message },
		}
	}
}
