use std::io;

use thiserror::Error;

/// Errors encountered while enumerating class artifacts.
///
/// All of these are scoped to one container or one entry; enumeration
/// continues past them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A container could not be opened.
    #[error("open container {container}")]
    OpenContainer {
        /// The encoded name of the container.
        container: String,

        /// The error encountered while opening it.
        #[source]
        error: io::Error,
    },

    /// An archive container could not be expanded.
    #[error("expand archive {container}")]
    Expand {
        /// The encoded name of the container.
        container: String,

        /// The error reported by the expansion library.
        #[source]
        error: compress_tools::Error,
    },

    /// Unable to walk an entry inside a container.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}
