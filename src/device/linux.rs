//! `/dev/net/tun` back end. Packets carry no framing (`IFF_NO_PI`).

use std::io;
use std::os::fd::{AsRawFd, BorrowedFd, FromRawFd, OwnedFd};
use std::time::Duration;

use nix::errno::Errno;
use nix::fcntl::{fcntl, FcntlArg};
use tun_tap::{Iface, Mode};

use super::fdio;
use crate::error::{Error, Result};

pub(crate) fn create() -> Result<(OwnedFd, String)> {
    // An empty name lets the kernel pick the next free tun<N>.
    let iface = Iface::without_packet_info("", Mode::Tun).map_err(open_error)?;

    // The interface lives as long as one descriptor refers to it, so the
    // duplicate outlives `iface` being dropped here.
    // SAFETY: `iface` owns the descriptor for the duration of the borrow.
    let borrowed = unsafe { BorrowedFd::borrow_raw(iface.as_raw_fd()) };
    let raw = fcntl(borrowed, FcntlArg::F_DUPFD_CLOEXEC(0)).map_err(Error::System)?;
    // SAFETY: F_DUPFD_CLOEXEC returned a fresh descriptor nobody else owns.
    let fd = unsafe { OwnedFd::from_raw_fd(raw) };

    Ok((fd, iface.name().to_owned()))
}

pub(crate) fn read(fd: BorrowedFd<'_>, buf: &mut [u8]) -> Result<usize> {
    fdio::read_packet(fd, buf)
}

pub(crate) fn write(fd: BorrowedFd<'_>, packet: &[u8], timeout: Duration) -> Result<usize> {
    fdio::write_all(fd, packet, timeout)
}

/// Maps a failed open/configure of the device node. A missing node or
/// module is reported apart from other failures.
fn open_error(err: io::Error) -> Error {
    match err.raw_os_error().map(Errno::from_raw) {
        Some(Errno::ENOENT | Errno::ENODEV | Errno::ENXIO) => Error::DeviceNotFound,
        Some(errno) => Error::System(errno),
        None => Error::System(Errno::UnknownErrno),
    }
}
