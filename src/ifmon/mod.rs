//! Kernel notifications about network interface changes.
//!
//! On macOS an [`EventMonitor`] is a `PF_SYSTEM` event socket filtered to the
//! network class of Apple's events. Each [`EventMonitor::wait`] returns
//! exactly one event; anything the caller has not picked up yet queues in the
//! socket buffer. Other platforms report [`Error::Unsupported`].

pub mod codes;

#[cfg(target_os = "macos")]
#[path = "darwin.rs"]
mod sys;

#[cfg(not(target_os = "macos"))]
#[path = "unsupported.rs"]
mod sys;

use std::fmt;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};

use nix::errno::Errno;
use nix::sys::socket::{recv, MsgFlags};
use tracing::{debug, info};

pub use self::codes::{class, dl, inet, inet6, subclass, vendor};
use crate::error::{Error, Result};

/// Size of the fixed `kern_event_msg` header: total_size, vendor_code,
/// kev_class, kev_subclass, id and event_code, each a native-endian `u32`.
pub const MESSAGE_HEADER_LEN: usize = 24;

const MAX_MESSAGE_LEN: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NetworkEvent {
    pub class: u32,
    pub subclass: u32,
    pub code: u32,
}

impl NetworkEvent {
    pub fn new(class: u32, subclass: u32, code: u32) -> Self {
        Self { class, subclass, code }
    }

    /// Whether an IPv4 or IPv6 address was configured or changed.
    pub fn is_address_change(&self) -> bool {
        self.class == class::NETWORK
            && matches!(
                (self.subclass, self.code),
                (subclass::INET, inet::NEW_ADDR)
                    | (subclass::INET, inet::CHANGED_ADDR)
                    | (subclass::INET6, inet6::NEW_USER_ADDR)
                    | (subclass::INET6, inet6::CHANGED_ADDR)
            )
    }

    pub fn code_name(&self) -> Option<&'static str> {
        if self.class != class::NETWORK {
            return None;
        }
        codes::code_name(self.subclass, self.code)
    }
}

impl fmt::Display for NetworkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subclass = codes::subclass_name(self.subclass).filter(|_| self.class == class::NETWORK);
        match (subclass, self.code_name()) {
            (Some(subclass), Some(code)) => write!(f, "{}:{}", subclass, code),
            (Some(subclass), None) => write!(f, "{}:{}", subclass, self.code),
            _ => write!(f, "class={} subclass={} code={}", self.class, self.subclass, self.code),
        }
    }
}

/// Decode the header of a `kern_event_msg`.
pub fn decode(msg: &[u8]) -> Result<NetworkEvent> {
    if msg.len() < MESSAGE_HEADER_LEN {
        return Err(Error::Truncated(msg.len()));
    }
    let word = |index: usize| {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&msg[index * 4..index * 4 + 4]);
        u32::from_ne_bytes(bytes)
    };
    Ok(NetworkEvent::new(word(2), word(3), word(5)))
}

/// Filtered kernel event channel.
#[derive(Debug)]
pub struct EventMonitor {
    fd: OwnedFd,
}

impl EventMonitor {
    /// Open the event socket and install the network class filter.
    pub fn create() -> Result<Self> {
        let fd = sys::create()?;
        info!(fd = fd.as_raw_fd(), "Listening for interface events");
        Ok(Self::from_fd(fd))
    }

    pub(crate) fn from_fd(fd: OwnedFd) -> Self {
        Self { fd }
    }

    /// Block until the next network event arrives.
    ///
    /// Messages outside the network class are skipped.
    pub fn wait(&self) -> Result<NetworkEvent> {
        let mut buf = [0u8; MAX_MESSAGE_LEN];
        loop {
            let len = recv_message(self.fd.as_fd(), &mut buf)?;
            let event = decode(&buf[..len])?;
            if event.class != class::NETWORK {
                debug!(%event, "ignoring non-network event");
                continue;
            }
            debug!(%event, "interface event");
            return Ok(event);
        }
    }

    /// Block until an IPv4 or IPv6 address is configured or changed.
    pub fn wait_address_change(&self) -> Result<NetworkEvent> {
        loop {
            let event = self.wait()?;
            if event.is_address_change() {
                return Ok(event);
            }
        }
    }

    pub fn close(self) -> Result<()> {
        let fd = self.fd.as_raw_fd();
        nix::unistd::close(self.fd).map_err(Error::System)?;
        debug!(fd, "Closed event monitor");
        Ok(())
    }
}

impl AsFd for EventMonitor {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl AsRawFd for EventMonitor {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

fn recv_message(fd: BorrowedFd<'_>, buf: &mut [u8]) -> Result<usize> {
    loop {
        match recv(fd.as_raw_fd(), buf, MsgFlags::empty()) {
            Ok(n) => return Ok(n),
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(Error::Io(errno)),
        }
    }
}
