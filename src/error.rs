use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal startup failures.
///
/// Per-request failures never show up here; they are surfaced to clients as
/// HTTP status codes instead. Anything in this enum aborts the process
/// before it starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The configured document root does not exist.
    #[error("document root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The configured document root is not a directory.
    #[error("document root is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    /// The configured document root cannot be read.
    #[error("document root is not readable: {}: {}", .path.display(), .source)]
    RootUnreadable {
        /// The configured root path.
        path: PathBuf,
        /// The underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// The listening socket could not be bound.
    #[error("failed to bind port {}: {}", .port, .source)]
    Bind {
        /// The configured port.
        port: u16,
        /// The underlying socket error.
        #[source]
        source: io::Error,
    },
}
