//! IPv4 address ranges and their iteration.
//!
//! Addresses are treated as 32-bit unsigned integers (big-endian octets),
//! which makes range arithmetic and ordered iteration trivial.

use crate::error::RangeError;
use std::fmt;
use std::net::Ipv4Addr;

/// Convert a dotted-quad address to its u32 representation.
pub fn addr_to_long(addr: Ipv4Addr) -> u32 {
    u32::from(addr)
}

/// Convert a u32 back to a dotted-quad address.
pub fn long_to_addr(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value)
}

/// An inclusive range of IPv4 addresses.
///
/// Invariant: `start <= end` when both are viewed as u32. Construction
/// enforces this, so a held `AddrRange` is always iterable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddrRange {
    start: Ipv4Addr,
    end: Ipv4Addr,
}

impl AddrRange {
    /// Build a range from two parsed addresses.
    pub fn new(start: Ipv4Addr, end: Ipv4Addr) -> Result<Self, RangeError> {
        if addr_to_long(start) > addr_to_long(end) {
            return Err(RangeError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Build a range from two dotted-quad strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, RangeError> {
        let start: Ipv4Addr = start
            .trim()
            .parse()
            .map_err(|_| RangeError::InvalidAddress(start.to_string()))?;
        let end: Ipv4Addr = end
            .trim()
            .parse()
            .map_err(|_| RangeError::InvalidAddress(end.to_string()))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> Ipv4Addr {
        self.start
    }

    pub fn end(&self) -> Ipv4Addr {
        self.end
    }

    /// Number of addresses in the range, both ends included.
    pub fn len(&self) -> u64 {
        u64::from(addr_to_long(self.end)) - u64::from(addr_to_long(self.start)) + 1
    }

    pub fn is_empty(&self) -> bool {
        false // a valid range always holds at least one address
    }

    /// Lazy ascending iterator over every address in the range.
    pub fn iter(&self) -> AddrRangeIter {
        AddrRangeIter {
            next: Some(addr_to_long(self.start)),
            last: addr_to_long(self.end),
        }
    }
}

impl fmt::Display for AddrRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl IntoIterator for &AddrRange {
    type Item = Ipv4Addr;
    type IntoIter = AddrRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator state for [`AddrRange`]. `next == None` marks exhaustion,
/// which sidesteps overflow at 255.255.255.255.
pub struct AddrRangeIter {
    next: Option<u32>,
    last: u32,
}

impl Iterator for AddrRangeIter {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current < self.last {
            Some(current + 1)
        } else {
            None
        };
        Some(long_to_addr(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(n) => (self.last - n) as usize + 1,
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addr_long_round_trip() {
        for addr in ["0.0.0.0", "10.0.0.1", "192.168.103.25", "255.255.255.255"] {
            let parsed: Ipv4Addr = addr.parse().unwrap();
            assert_eq!(long_to_addr(addr_to_long(parsed)), parsed);
        }
    }

    #[test]
    fn test_addr_to_long_octet_order() {
        let addr: Ipv4Addr = "1.2.3.4".parse().unwrap();
        assert_eq!(addr_to_long(addr), 0x0102_0304);
    }

    #[test]
    fn test_range_iteration_inclusive_ascending() {
        let range = AddrRange::parse("192.168.1.254", "192.168.2.1").unwrap();
        let addrs: Vec<String> = range.iter().map(|a| a.to_string()).collect();
        assert_eq!(
            addrs,
            vec!["192.168.1.254", "192.168.1.255", "192.168.2.0", "192.168.2.1"]
        );
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_range_count_matches_len() {
        let range = AddrRange::parse("10.0.0.1", "10.0.1.0").unwrap();
        assert_eq!(range.iter().count() as u64, range.len());
        assert_eq!(range.len(), 256);
    }

    #[test]
    fn test_single_address_range() {
        let range = AddrRange::parse("10.0.0.1", "10.0.0.1").unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range.iter().count(), 1);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = AddrRange::parse("10.0.0.2", "10.0.0.1");
        assert!(matches!(result, Err(RangeError::InvalidRange { .. })));
    }

    #[test]
    fn test_malformed_address_rejected() {
        assert!(matches!(
            AddrRange::parse("10.0.0", "10.0.0.1"),
            Err(RangeError::InvalidAddress(_))
        ));
        assert!(matches!(
            AddrRange::parse("10.0.0.1", "not-an-ip"),
            Err(RangeError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_iteration_at_address_space_ceiling() {
        let range = AddrRange::parse("255.255.255.254", "255.255.255.255").unwrap();
        assert_eq!(range.iter().count(), 2);
    }
}
