//! Tunnel interfaces and interface change notifications for VPN clients.
//!
//! [`Tun`] creates a point-to-point interface and moves raw IP packets
//! between it and the caller. [`EventMonitor`] reports link and address
//! changes published by the kernel. Both are blocking and owned by a single
//! caller; closing or dropping a handle releases its descriptor.

pub mod config;
pub mod device;
mod error;
pub mod ifmon;

#[cfg(test)]
mod test;

pub use config::TunConfig;
pub use device::{Device, Tun};
pub use error::{Error, Result};
pub use ifmon::{EventMonitor, NetworkEvent};
