//! Descriptor-level packet I/O shared by the platform back ends.

use std::io::IoSliceMut;
use std::os::fd::BorrowedFd;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use nix::sys::uio::readv;
use nix::unistd::{read, write};
use tracing::warn;

use super::frame::{self, HEADER_LEN};
use crate::error::{Error, Result};

/// Blocking read of one packet, retried when interrupted by a signal.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(crate) fn read_packet(fd: BorrowedFd<'_>, buf: &mut [u8]) -> Result<usize> {
    loop {
        match read(fd, buf) {
            Ok(n) => return Ok(n),
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(Error::Io(errno)),
        }
    }
}

/// Reads one framed packet, scattering the family prefix into a scratch
/// header so that `buf` receives only the payload.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) fn read_framed(fd: BorrowedFd<'_>, buf: &mut [u8]) -> Result<usize> {
    let mut family = [0u8; HEADER_LEN];
    loop {
        let mut iov = [IoSliceMut::new(&mut family), IoSliceMut::new(buf)];
        match readv(fd, &mut iov) {
            // utun never yields an empty frame; a zero read means the other
            // side has gone away.
            Ok(0) => return Err(Error::Io(Errno::EPIPE)),
            Ok(n) => return Ok(frame::payload_len(n)),
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(Error::Io(errno)),
        }
    }
}

/// Writes all of `buf`. Returns `buf.len()` or an error; on error nothing
/// can be said about how much of `buf` reached the kernel.
///
/// A device that accepts nothing for `timeout` fails the write. The bound
/// holds across signal interruptions and restarts whenever bytes go through.
pub(crate) fn write_all(fd: BorrowedFd<'_>, buf: &[u8], timeout: Duration) -> Result<usize> {
    let mut written = 0;
    let mut stalled_since: Option<Instant> = None;
    while written < buf.len() {
        match write(fd, &buf[written..]) {
            Ok(0) => return Err(Error::Io(Errno::EIO)),
            Ok(n) => {
                written += n;
                stalled_since = None;
            }
            Err(Errno::EINTR) => continue,
            Err(Errno::EAGAIN) => {
                let since = *stalled_since.get_or_insert_with(Instant::now);
                wait_writable(fd, since, timeout)?;
            }
            Err(errno) => return Err(Error::Io(errno)),
        }
    }
    Ok(written)
}

/// Prefixes `packet` with its family header and writes the frame whole.
/// Returns the payload length.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) fn write_framed(fd: BorrowedFd<'_>, packet: &[u8], timeout: Duration) -> Result<usize> {
    let mut frame = Vec::with_capacity(HEADER_LEN + packet.len());
    frame.extend_from_slice(&frame::header_for(packet));
    frame.extend_from_slice(packet);
    write_all(fd, &frame, timeout)?;
    Ok(packet.len())
}

/// Waits for room on `fd` for whatever is left of `timeout` since the
/// writer stalled. An interrupted wait returns early so the write is retried.
fn wait_writable(fd: BorrowedFd<'_>, stalled_since: Instant, timeout: Duration) -> Result<()> {
    let remaining = timeout.saturating_sub(stalled_since.elapsed());
    if remaining.is_zero() {
        warn!(?timeout, "descriptor stayed full, giving up on write");
        return Err(Error::Timeout(timeout));
    }

    let poll_timeout = PollTimeout::try_from(remaining).unwrap_or(PollTimeout::MAX);
    let mut fds = [PollFd::new(fd, PollFlags::POLLOUT)];
    match poll(&mut fds, poll_timeout) {
        Ok(0) => {
            warn!(?timeout, "descriptor stayed full, giving up on write");
            Err(Error::Timeout(timeout))
        }
        Ok(_) | Err(Errno::EINTR) => Ok(()),
        Err(errno) => Err(Error::Io(errno)),
    }
}
