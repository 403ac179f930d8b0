//! Kernel event taxonomy constants (`sys/kern_event.h`, `netinet/in_var.h`,
//! `net/if_var.h`, `netinet6/in6_var.h`).

pub mod vendor {
    pub const ANY: u32 = 0;
    pub const APPLE: u32 = 1;
}

pub mod class {
    pub const ANY: u32 = 0;
    pub const NETWORK: u32 = 1;
    pub const IOKIT: u32 = 2;
    pub const SYSTEM: u32 = 3;
    pub const APPLESHARE: u32 = 4;
    pub const FIREWALL: u32 = 5;
    pub const IEEE80211: u32 = 6;
}

/// Subclasses of the network class.
pub mod subclass {
    pub const ANY: u32 = 0;
    pub const INET: u32 = 1;
    pub const DL: u32 = 2;
    pub const INET6: u32 = 6;
}

pub mod inet {
    /// Userland configured an address.
    pub const NEW_ADDR: u32 = 1;
    pub const CHANGED_ADDR: u32 = 2;
    pub const ADDR_DELETED: u32 = 3;
    pub const SIFDSTADDR: u32 = 4;
    pub const SIFBRDADDR: u32 = 5;
    pub const SIFNETMASK: u32 = 6;
    pub const ARPCOLLISION: u32 = 7;
    pub const PORTINUSE: u32 = 8;
    pub const ARPRTRFAILURE: u32 = 9;
    pub const ARPRTRALIVE: u32 = 10;

    pub(super) const NAMES: [&str; 10] = [
        "NEW_ADDR",
        "CHANGED_ADDR",
        "ADDR_DELETED",
        "SIFDSTADDR",
        "SIFBRDADDR",
        "SIFNETMASK",
        "ARPCOLLISION",
        "PORTINUSE",
        "ARPRTRFAILURE",
        "ARPRTRALIVE",
    ];
}

pub mod dl {
    pub const SIFFLAGS: u32 = 1;
    pub const SIFMETRICS: u32 = 2;
    pub const SIFMTU: u32 = 3;
    pub const SIFPHYS: u32 = 4;
    pub const SIFMEDIA: u32 = 5;
    pub const SIFGENERIC: u32 = 6;
    pub const ADDMULTI: u32 = 7;
    pub const DELMULTI: u32 = 8;
    pub const IF_ATTACHED: u32 = 9;
    pub const IF_DETACHING: u32 = 10;
    pub const IF_DETACHED: u32 = 11;
    pub const LINK_OFF: u32 = 12;
    pub const LINK_ON: u32 = 13;
    pub const PROTO_ATTACHED: u32 = 14;
    pub const PROTO_DETACHED: u32 = 15;
    pub const LINK_ADDRESS_CHANGED: u32 = 16;
    pub const WAKEFLAGS_CHANGED: u32 = 17;
    pub const IF_IDLE_ROUTE_REFCNT: u32 = 18;
    pub const IFCAP_CHANGED: u32 = 19;
    pub const LINK_QUALITY_METRIC_CHANGED: u32 = 20;
    pub const NODE_PRESENCE: u32 = 21;
    pub const NODE_ABSENCE: u32 = 22;
    pub const MASTER_ELECTED: u32 = 23;
    pub const ISSUES: u32 = 24;
    pub const IFDELEGATE_CHANGED: u32 = 25;
    pub const AWDL_RESTRICTED: u32 = 26;
    pub const AWDL_UNRESTRICTED: u32 = 27;
    pub const RRC_STATE_CHANGED: u32 = 28;
    pub const QOS_MODE_CHANGED: u32 = 29;
    pub const LOW_POWER_MODE_CHANGED: u32 = 30;

    pub(super) const NAMES: [&str; 30] = [
        "SIFFLAGS",
        "SIFMETRICS",
        "SIFMTU",
        "SIFPHYS",
        "SIFMEDIA",
        "SIFGENERIC",
        "ADDMULTI",
        "DELMULTI",
        "IF_ATTACHED",
        "IF_DETACHING",
        "IF_DETACHED",
        "LINK_OFF",
        "LINK_ON",
        "PROTO_ATTACHED",
        "PROTO_DETACHED",
        "LINK_ADDRESS_CHANGED",
        "WAKEFLAGS_CHANGED",
        "IF_IDLE_ROUTE_REFCNT",
        "IFCAP_CHANGED",
        "LINK_QUALITY_METRIC_CHANGED",
        "NODE_PRESENCE",
        "NODE_ABSENCE",
        "MASTER_ELECTED",
        "ISSUES",
        "IFDELEGATE_CHANGED",
        "AWDL_RESTRICTED",
        "AWDL_UNRESTRICTED",
        "RRC_STATE_CHANGED",
        "QOS_MODE_CHANGED",
        "LOW_POWER_MODE_CHANGED",
    ];
}

pub mod inet6 {
    /// Userland configured an address.
    pub const NEW_USER_ADDR: u32 = 1;
    pub const CHANGED_ADDR: u32 = 2;
    pub const ADDR_DELETED: u32 = 3;
    /// Link-local address autoconfigured.
    pub const NEW_LL_ADDR: u32 = 4;
    /// Router-advertised address autoconfigured.
    pub const NEW_RTADV_ADDR: u32 = 5;
    pub const DEFROUTER: u32 = 6;
    pub const REQUEST_NAT64_PREFIX: u32 = 7;

    pub(super) const NAMES: [&str; 7] = [
        "NEW_USER_ADDR",
        "CHANGED_ADDR",
        "ADDR_DELETED",
        "NEW_LL_ADDR",
        "NEW_RTADV_ADDR",
        "DEFROUTER",
        "REQUEST_NAT64_PREFIX",
    ];
}

/// Short name of a network subclass.
pub fn subclass_name(subclass: u32) -> Option<&'static str> {
    match subclass {
        subclass::INET => Some("inet"),
        subclass::DL => Some("dl"),
        subclass::INET6 => Some("inet6"),
        _ => None,
    }
}

/// Name of an event code within a network subclass.
pub fn code_name(subclass: u32, code: u32) -> Option<&'static str> {
    let names: &[&'static str] = match subclass {
        subclass::INET => &inet::NAMES,
        subclass::DL => &dl::NAMES,
        subclass::INET6 => &inet6::NAMES,
        _ => return None,
    };
    let index = code.checked_sub(1)? as usize;
    names.get(index).copied()
}
