//! Error type shared by the tunnel device and the interface monitor.

use std::io;
use std::time::Duration;

use nix::errno::Errno;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Every tunnel unit the allocator probes is already taken.
    #[error("no free tunnel unit")]
    ResourceExhausted,

    /// The tun device node (or the kernel module behind it) is missing.
    #[error("tun device not present")]
    DeviceNotFound,

    /// A setup system call failed.
    #[error("system call failed: {0}")]
    System(Errno),

    /// Reading, writing or receiving on an open descriptor failed.
    #[error("I/O failed: {0}")]
    Io(Errno),

    #[error("descriptor not writable within {0:?}")]
    Timeout(Duration),

    #[error("kernel event message truncated to {0} bytes")]
    Truncated(usize),

    #[error("not supported on this platform")]
    Unsupported,

    #[error("`{command}` failed: {stderr}")]
    Command { command: String, stderr: String },

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// OS error code behind this error, or 0 when the failure did not come
    /// from a system call.
    pub fn code(&self) -> i32 {
        match self {
            Error::System(errno) | Error::Io(errno) => *errno as i32,
            Error::Timeout(_) => Errno::ETIMEDOUT as i32,
            Error::Spawn { source, .. } => source.raw_os_error().unwrap_or(0),
            _ => 0,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::System(errno) | Error::Io(errno) => errno.into(),
            Error::Spawn { source, .. } => source,
            Error::Timeout(_) => io::Error::new(io::ErrorKind::TimedOut, err),
            Error::DeviceNotFound => io::Error::new(io::ErrorKind::NotFound, err),
            Error::Unsupported => io::Error::new(io::ErrorKind::Unsupported, err),
            Error::Truncated(_) => io::Error::new(io::ErrorKind::InvalidData, err),
            _ => io::Error::new(io::ErrorKind::Other, err),
        }
    }
}
