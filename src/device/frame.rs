//! utun framing. Every packet crossing a utun socket carries a 4-byte
//! address family prefix in network byte order.

pub const HEADER_LEN: usize = 4;

// Darwin values; the prefix is only ever produced for utun.
const AF_INET: u32 = 2;
const AF_INET6: u32 = 30;

/// Payload length of a frame of `received` bytes. Frames no longer than the
/// header carry no payload.
pub fn payload_len(received: usize) -> usize {
    received.saturating_sub(HEADER_LEN)
}

/// Address family prefix for `packet`, picked from its IP version nibble.
pub fn header_for(packet: &[u8]) -> [u8; HEADER_LEN] {
    let family = match packet.first().map(|b| b >> 4) {
        Some(6) => AF_INET6,
        _ => AF_INET,
    };
    family.to_be_bytes()
}
