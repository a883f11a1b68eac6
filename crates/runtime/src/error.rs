use thiserror::Error;

use crate::model::ModelError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The tool provider could not be reached or refused the handshake.
    #[error("cannot connect to tool provider at {url}: {reason}")]
    Connect { url: String, reason: String },

    /// The completion endpoint failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Writing the conversation output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
