//! Protocol plumbing shared by the classifier and the device drivers.

pub mod http;
pub mod ping;
pub mod snmp;
pub mod telnet;
pub mod xml;

pub use http::HttpFetcher;
pub use ping::{Prober, SystemPinger};
pub use snmp::{Oid, SnmpClient, SnmpValue};
pub use telnet::{TelnetScript, TelnetSession, TelnetStep};
