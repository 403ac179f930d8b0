use std::os::fd::OwnedFd;

use crate::error::{Error, Result};

// Kernel event sockets only exist on macOS.
pub(crate) fn create() -> Result<OwnedFd> {
    Err(Error::Unsupported)
}
