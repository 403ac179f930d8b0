//! macOS utun back end, reached through the kernel control socket.

use std::os::fd::{AsRawFd, BorrowedFd, OwnedFd};
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::socket::{
    connect, socket, AddressFamily, SockFlag, SockProtocol, SockType, SysControlAddr,
};

use super::fdio;
use super::unit::{self, MAX_UNITS};
use crate::error::{Error, Result};

/// Name registered by the utun kernel control.
const UTUN_CONTROL_NAME: &str = "com.apple.net.utun_control";

pub(crate) fn create() -> Result<(OwnedFd, String)> {
    let (id, fd) = unit::allocate(MAX_UNITS, open_unit)?;
    Ok((fd, format!("utun{id}")))
}

/// Connects a control socket to unit `id`. Returns `None` when the unit is
/// already in use; the socket is closed on every path that does not return it.
fn open_unit(id: u32) -> Result<Option<OwnedFd>> {
    let fd = socket(
        AddressFamily::System,
        SockType::Datagram,
        SockFlag::empty(),
        SockProtocol::KextControl,
    )
    .map_err(Error::System)?;

    // sc_unit is one-based: unit N + 1 creates utunN.
    let addr = SysControlAddr::from_name(fd.as_raw_fd(), UTUN_CONTROL_NAME, id + 1)
        .map_err(Error::System)?;

    match connect(fd.as_raw_fd(), &addr) {
        Ok(()) => Ok(Some(fd)),
        Err(Errno::EBUSY) => Ok(None),
        Err(errno) => Err(Error::System(errno)),
    }
}

pub(crate) fn read(fd: BorrowedFd<'_>, buf: &mut [u8]) -> Result<usize> {
    fdio::read_framed(fd, buf)
}

pub(crate) fn write(fd: BorrowedFd<'_>, packet: &[u8], timeout: Duration) -> Result<usize> {
    fdio::write_framed(fd, packet, timeout)
}
