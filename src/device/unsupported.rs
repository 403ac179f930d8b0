use std::os::fd::{BorrowedFd, OwnedFd};
use std::time::Duration;

use crate::error::{Error, Result};

pub(crate) fn create() -> Result<(OwnedFd, String)> {
    Err(Error::Unsupported)
}

pub(crate) fn read(_fd: BorrowedFd<'_>, _buf: &mut [u8]) -> Result<usize> {
    Err(Error::Unsupported)
}

pub(crate) fn write(_fd: BorrowedFd<'_>, _packet: &[u8], _timeout: Duration) -> Result<usize> {
    Err(Error::Unsupported)
}
