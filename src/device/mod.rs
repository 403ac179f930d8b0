//! Tunnel devices exchanging raw IP packets with the kernel.
//!
//! The back end is picked at build time:
//! - Linux opens `/dev/net/tun` and configures it for raw IP (`IFF_NO_PI`).
//! - macOS claims the lowest free utun unit through the kernel control
//!   socket; its packets carry a 4-byte address family prefix which is
//!   stripped on read and added on write.

mod fdio;
mod frame;
mod unit;

#[cfg(target_os = "linux")]
#[path = "linux.rs"]
mod sys;

#[cfg(target_os = "macos")]
#[path = "utun.rs"]
mod sys;

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
#[path = "unsupported.rs"]
mod sys;

use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};
use std::process::Command;
use std::time::Duration;

use nix::fcntl::{fcntl, FcntlArg, OFlag};
use tracing::{debug, info, trace};

use crate::config::TunConfig;
use crate::error::{Error, Result};

pub use self::frame::HEADER_LEN as UTUN_HEADER_LEN;
pub use self::unit::MAX_UNITS;

/// A trait for network device I/O
pub trait Device: Send {
    /// Receive a packet from the device
    fn recv(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Send a packet to the device
    fn send(&self, buf: &[u8]) -> io::Result<usize>;
}

/// An open tunnel interface.
///
/// The descriptor and the interface name always come together and neither
/// changes after creation. Dropping the value closes the descriptor, which
/// also removes the interface.
#[derive(Debug)]
pub struct Tun {
    fd: OwnedFd,
    name: String,
    write_timeout: Duration,
}

impl Tun {
    /// Create a tunnel interface with default settings.
    ///
    /// # Privileges
    ///
    /// - Linux: `CAP_NET_ADMIN` or root
    /// - macOS: root
    pub fn create() -> Result<Self> {
        Self::create_with(&TunConfig::default())
    }

    /// Create a tunnel interface, taking the write timeout from `config`.
    /// Addresses are only applied by [`Tun::configure`].
    pub fn create_with(config: &TunConfig) -> Result<Self> {
        let (fd, name) = sys::create()?;
        info!(name = %name, fd = fd.as_raw_fd(), "Created tun device");
        Ok(Self::from_fd(fd, name, config.write_timeout()))
    }

    pub(crate) fn from_fd(fd: OwnedFd, name: String, write_timeout: Duration) -> Self {
        Self { fd, name, write_timeout }
    }

    /// Interface name assigned by the OS, e.g. `tun0` or `utun3`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    pub fn set_write_timeout(&mut self, timeout: Duration) {
        self.write_timeout = timeout;
    }

    /// Read one IP packet into `buf` and return its length.
    ///
    /// Blocks until a packet arrives. Any framing prefix is stripped, so the
    /// buffer only needs room for the packet itself. A frame carrying no
    /// payload reads as `Ok(0)`.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let n = sys::read(self.fd.as_fd(), buf)?;
        trace!(name = %self.name, len = n, "read packet");
        Ok(n)
    }

    /// Write one IP packet.
    ///
    /// Either the whole packet is handed to the kernel and `packet.len()` is
    /// returned, or an error is returned and the write must be treated as
    /// failed as a whole. A device that stays full for longer than the write
    /// timeout fails with [`Error::Timeout`].
    pub fn write(&self, packet: &[u8]) -> Result<usize> {
        let n = sys::write(self.fd.as_fd(), packet, self.write_timeout)?;
        trace!(name = %self.name, len = n, "wrote packet");
        Ok(n)
    }

    /// Toggle `O_NONBLOCK` on the descriptor, for callers driving it from
    /// their own readiness loop. A non-blocking read with nothing queued
    /// fails with `Error::Io(EAGAIN)`.
    pub fn set_nonblocking(&self, nonblocking: bool) -> Result<()> {
        let bits = fcntl(self.fd.as_fd(), FcntlArg::F_GETFL).map_err(Error::System)?;
        let mut flags = OFlag::from_bits_truncate(bits);
        flags.set(OFlag::O_NONBLOCK, nonblocking);
        fcntl(self.fd.as_fd(), FcntlArg::F_SETFL(flags)).map_err(Error::System)?;
        Ok(())
    }

    /// Assign the point-to-point addresses from `config` and bring the
    /// interface up.
    pub fn configure(&self, config: &TunConfig) -> Result<()> {
        for argv in config.setup_commands(&self.name) {
            let command = argv.join(" ");
            info!(%command, "Configuring tun device");

            let output = Command::new(&argv[0])
                .args(&argv[1..])
                .output()
                .map_err(|source| Error::Spawn { command: command.clone(), source })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
                return Err(Error::Command { command, stderr });
            }
        }
        Ok(())
    }

    /// Close the device, reporting a failed `close(2)`.
    pub fn close(self) -> Result<()> {
        let Tun { fd, name, .. } = self;
        nix::unistd::close(fd).map_err(Error::System)?;
        debug!(name = %name, "Closed tun device");
        Ok(())
    }
}

impl AsFd for Tun {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl AsRawFd for Tun {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl Device for Tun {
    fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read(buf)?)
    }

    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write(buf)?)
    }
}
