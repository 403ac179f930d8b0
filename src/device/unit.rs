use tracing::debug;

use crate::error::{Error, Result};

/// Number of tunnel units probed before giving up.
pub const MAX_UNITS: u32 = 32;

/// Probes units `0..count` in increasing order and returns the first one
/// `open` manages to claim, so restarts keep landing on the same unit.
///
/// `open` returns `Ok(None)` for a unit that is already taken. Any error it
/// returns ends the search.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) fn allocate<T, F>(count: u32, mut open: F) -> Result<(u32, T)>
where
    F: FnMut(u32) -> Result<Option<T>>,
{
    for unit in 0..count {
        match open(unit)? {
            Some(handle) => return Ok((unit, handle)),
            None => debug!(unit, "tunnel unit busy"),
        }
    }
    Err(Error::ResourceExhausted)
}
