use std::os::fd::{AsRawFd, OwnedFd};

use nix::sys::socket::{socket, AddressFamily, SockFlag, SockProtocol, SockType};

use super::codes::{class, subclass, vendor};
use crate::error::{Error, Result};

/// `struct kev_request`
#[repr(C)]
pub struct KevRequest {
    pub vendor_code: u32,
    pub kev_class: u32,
    pub kev_subclass: u32,
}

// SIOCSKEVFILT = _IOW('e', 2, struct kev_request)
nix::ioctl_write_ptr!(set_event_filter, b'e', 2, KevRequest);

pub(crate) fn create() -> Result<OwnedFd> {
    let fd = socket(
        AddressFamily::System,
        SockType::Raw,
        SockFlag::empty(),
        SockProtocol::KextEvent,
    )
    .map_err(Error::System)?;

    let filter = KevRequest {
        vendor_code: vendor::APPLE,
        kev_class: class::NETWORK,
        kev_subclass: subclass::ANY,
    };
    // SAFETY: `filter` has the layout of `struct kev_request` and outlives the call.
    // On failure `fd` is dropped, closing the socket.
    unsafe { set_event_filter(fd.as_raw_fd(), &filter) }.map_err(Error::System)?;

    Ok(fd)
}
