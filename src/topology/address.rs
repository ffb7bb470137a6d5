//! Sequential IPv4 and MAC address generators.
//!
//! Both generators are plain values with no shared state. A compile call
//! creates its own pair, so the same program always receives the same
//! addresses no matter how many compiles run before or alongside it.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{MidoriError, Result};

/// Default pool for generated host addresses.
pub const DEFAULT_IP_POOL: &str = "10.0.0.0/22";

/// An IPv4 block in CIDR form, e.g. `10.0.0.0/22`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IpPool {
    base: Ipv4Addr,
    prefix: u8,
}

impl IpPool {
    /// Create a pool; host bits of `base` must be zero.
    pub fn new(base: Ipv4Addr, prefix: u8) -> Result<Self> {
        if prefix > 31 {
            return Err(MidoriError::config(format!(
                "IP pool prefix /{} leaves no host addresses",
                prefix
            )));
        }
        let pool = Self { base, prefix };
        if u32::from(base) as u64 % pool.size() != 0 {
            return Err(MidoriError::config(format!(
                "IP pool base {} is not aligned to a /{} boundary",
                base, prefix
            )));
        }
        Ok(pool)
    }

    /// First address of the block (never handed out).
    pub fn base(&self) -> Ipv4Addr {
        self.base
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Number of addresses in the block, including the base address.
    pub fn size(&self) -> u64 {
        1u64 << (32 - self.prefix as u32)
    }
}

impl Default for IpPool {
    fn default() -> Self {
        Self {
            base: Ipv4Addr::new(10, 0, 0, 0),
            prefix: 22,
        }
    }
}

impl fmt::Display for IpPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix)
    }
}

impl FromStr for IpPool {
    type Err = MidoriError;

    fn from_str(s: &str) -> Result<Self> {
        let (addr, prefix) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| MidoriError::config(format!("IP pool '{}' is not in CIDR form", s)))?;
        let base = addr
            .parse::<Ipv4Addr>()
            .map_err(|e| MidoriError::config(format!("IP pool '{}': {}", s, e)))?;
        let prefix = prefix
            .parse::<u8>()
            .map_err(|e| MidoriError::config(format!("IP pool '{}': {}", s, e)))?;
        Self::new(base, prefix)
    }
}

impl TryFrom<String> for IpPool {
    type Error = MidoriError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<IpPool> for String {
    fn from(pool: IpPool) -> Self {
        pool.to_string()
    }
}

/// Hands out the addresses of an [`IpPool`] in ascending order,
/// starting right after the base address.
#[derive(Debug, Clone)]
pub struct IpGenerator {
    pool: IpPool,
    index: u64,
}

impl IpGenerator {
    pub fn new(pool: IpPool) -> Self {
        Self { pool, index: 0 }
    }

    /// Draw the next address.
    pub fn next_addr(&mut self) -> Result<Ipv4Addr> {
        let index = self.index + 1;
        if index >= self.pool.size() {
            return Err(MidoriError::exhausted(
                "IP",
                format!("all addresses of {} have been assigned", self.pool),
            ));
        }
        self.index = index;
        // index < size <= 2^32, and the base is aligned, so this cannot wrap
        let addr = Ipv4Addr::from(u32::from(self.pool.base) + index as u32);
        trace!(%addr, "generated IP address");
        Ok(addr)
    }
}

/// A 48-bit hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub const ZERO: MacAddr = MacAddr([0; 6]);
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}", a, b, c, d, e, g)
    }
}

/// A 6-byte counter. Each draw increments the least significant byte and
/// carries into the more significant ones; carrying out of the first byte
/// is an error.
#[derive(Debug, Clone)]
pub struct MacGenerator {
    current: MacAddr,
}

impl MacGenerator {
    /// Start at all-zero; the first draw is `00:00:00:00:00:01`.
    pub fn new() -> Self {
        Self::starting_after(MacAddr::ZERO)
    }

    /// Continue counting after `last`.
    pub fn starting_after(last: MacAddr) -> Self {
        Self { current: last }
    }

    /// Draw the next address.
    pub fn next_addr(&mut self) -> Result<MacAddr> {
        let mut bytes = self.current.0;
        for i in (0..bytes.len()).rev() {
            let (value, carry) = bytes[i].overflowing_add(1);
            bytes[i] = value;
            if !carry {
                self.current = MacAddr(bytes);
                trace!(mac = %self.current, "generated MAC address");
                return Ok(self.current);
            }
        }
        Err(MidoriError::exhausted("MAC", "address range exceeded"))
    }
}

impl Default for MacGenerator {
    fn default() -> Self {
        Self::new()
    }
}
