//! Errors raised while locating and opening client files.

use thiserror::Error;
use uoanim_types::file::UoFileError;

/// Error type of this crate.
#[derive(Debug, Error)]
pub enum VfsError {
	/// A client file failed to parse
	#[error(transparent)]
	File(#[from] UoFileError),

	/// The settings file could not be read or deserialized
	#[error("Invalid client settings: {0}")]
	Config(#[from] config::ConfigError),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}
