use std::io::ErrorKind as IoErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::error::StartupError;

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 8000;

/// Document root used when none is configured.
pub const DEFAULT_ROOT: &str = "public";

/// Server configuration: the listening port and the document root.
///
/// These are the only two knobs. The listener always binds all interfaces.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port to listen on.
    pub port: u16,
    /// Directory files are served from. Resolved relative to the working
    /// directory unless absolute.
    pub root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            root: PathBuf::from(DEFAULT_ROOT),
        }
    }
}

impl Config {
    /// Create a configuration from a port and a root directory.
    pub fn new(port: u16, root: impl Into<PathBuf>) -> Self {
        Config {
            port,
            root: root.into(),
        }
    }

    /// The wildcard socket address for `port`.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }

    /// Check the document root: it must exist, be a directory, and be
    /// readable. Runs at startup so a bad configuration aborts before the
    /// listener is announced.
    pub fn validate(&self) -> Result<(), StartupError> {
        let metadata = match std::fs::metadata(&self.root) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                return Err(StartupError::RootNotFound(self.root.clone()));
            }
            Err(err) => {
                return Err(StartupError::RootUnreadable {
                    path: self.root.clone(),
                    source: err,
                });
            }
        };

        if !metadata.is_dir() {
            return Err(StartupError::RootNotDirectory(self.root.clone()));
        }

        // Readable here means the process can enumerate entries.
        match std::fs::read_dir(&self.root) {
            Ok(_) => Ok(()),
            Err(err) => Err(StartupError::RootUnreadable {
                path: self.root.clone(),
                source: err,
            }),
        }
    }
}
