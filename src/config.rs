use std::net::Ipv4Addr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long a write waits for a full device to drain before giving up.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(60);

/// Tunnel interface settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunConfig {
    /// Local end of the point-to-point link.
    #[serde(default = "default_local_ip")]
    pub local_ip: Ipv4Addr,

    /// Remote end of the point-to-point link.
    #[serde(default = "default_remote_ip")]
    pub remote_ip: Ipv4Addr,

    /// Interface MTU. The OS default is kept when unset.
    #[serde(default)]
    pub mtu: Option<u16>,

    /// Write backpressure bound, in seconds.
    #[serde(default = "default_write_timeout_secs")]
    pub write_timeout_secs: u64,
}

fn default_local_ip() -> Ipv4Addr {
    Ipv4Addr::new(192, 168, 192, 1)
}

fn default_remote_ip() -> Ipv4Addr {
    Ipv4Addr::new(192, 168, 192, 254)
}

fn default_write_timeout_secs() -> u64 {
    DEFAULT_WRITE_TIMEOUT.as_secs()
}

impl Default for TunConfig {
    fn default() -> Self {
        Self {
            local_ip: default_local_ip(),
            remote_ip: default_remote_ip(),
            mtu: None,
            write_timeout_secs: default_write_timeout_secs(),
        }
    }
}

impl TunConfig {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    /// Commands that assign the link addresses to `ifname` and bring it up.
    /// Routes are left alone.
    pub fn setup_commands(&self, ifname: &str) -> Vec<Vec<String>> {
        let local = self.local_ip.to_string();
        let remote = self.remote_ip.to_string();
        let mut commands = Vec::new();

        #[cfg(target_os = "macos")]
        {
            commands.push(argv(&["ifconfig", ifname, &local, &remote, "up"]));
            if let Some(mtu) = self.mtu {
                commands.push(argv(&["ifconfig", ifname, "mtu", &mtu.to_string()]));
            }
        }

        #[cfg(not(target_os = "macos"))]
        {
            commands.push(argv(&["ip", "addr", "add", &local, "peer", &remote, "dev", ifname]));
            if let Some(mtu) = self.mtu {
                commands.push(argv(&["ip", "link", "set", "dev", ifname, "mtu", &mtu.to_string()]));
            }
            commands.push(argv(&["ip", "link", "set", "dev", ifname, "up"]));
        }

        commands
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}
