//! Core type definitions.
//!
//! Newtype-flavored building blocks shared across the engine: address
//! ranges, device family identifiers, and the structured device record.

mod device;
mod range;
mod record;

pub use device::DeviceTypeId;
pub use range::{addr_to_long, long_to_addr, AddrRange, AddrRangeIter};
pub use record::{DeviceRecord, Row, Scalar};
