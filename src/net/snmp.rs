//! Minimal SNMP v2c client: GET and GET-NEXT over UDP.
//!
//! Devices in this domain expose everything the engine needs through plain
//! community-string GETs and subtree walks, so the codec covers exactly the
//! BER subset those PDUs use. Timeouts and malformed payloads are reported
//! as "no response"; the caller decides whether that means "rule does not
//! match" or "field stays at its default".

use crate::error::DecodeError;
use rand::Rng;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

const TAG_INTEGER: u8 = 0x02;
const TAG_OCTET_STRING: u8 = 0x04;
const TAG_NULL: u8 = 0x05;
const TAG_OID: u8 = 0x06;
const TAG_SEQUENCE: u8 = 0x30;
const TAG_IP_ADDRESS: u8 = 0x40;
const TAG_COUNTER32: u8 = 0x41;
const TAG_GAUGE32: u8 = 0x42;
const TAG_TIMETICKS: u8 = 0x43;
const TAG_COUNTER64: u8 = 0x46;
const TAG_NO_SUCH_OBJECT: u8 = 0x80;
const TAG_NO_SUCH_INSTANCE: u8 = 0x81;
const TAG_END_OF_MIB_VIEW: u8 = 0x82;
const TAG_GET_REQUEST: u8 = 0xa0;
const TAG_GET_NEXT_REQUEST: u8 = 0xa1;
const TAG_GET_RESPONSE: u8 = 0xa2;

const SNMP_V2C: i64 = 1;

/// An SNMP object identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid(Vec<u32>);

impl Oid {
    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    /// True when `self` lies inside the subtree rooted at `root`
    /// (the root itself counts).
    pub fn starts_with(&self, root: &Oid) -> bool {
        self.0.len() >= root.0.len() && self.0[..root.0.len()] == root.0[..]
    }

    /// Append one instance index arc.
    pub fn child(&self, index: u32) -> Oid {
        let mut arcs = self.0.clone();
        arcs.push(index);
        Oid(arcs)
    }

    /// Append a dotted suffix such as `"3.0"`.
    pub fn join(&self, suffix: &str) -> Oid {
        let mut arcs = self.0.clone();
        for part in suffix.split('.').filter(|p| !p.is_empty()) {
            arcs.push(part.parse().unwrap_or(0));
        }
        Oid(arcs)
    }
}

impl FromStr for Oid {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs: Result<Vec<u32>, _> = s
            .trim()
            .trim_start_matches('.')
            .split('.')
            .map(|part| part.parse::<u32>())
            .collect();
        let arcs = arcs.map_err(|_| DecodeError::BadOid)?;
        if arcs.len() < 2 {
            return Err(DecodeError::BadOid);
        }
        Ok(Oid(arcs))
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

/// A decoded varbind value.
#[derive(Debug, Clone, PartialEq)]
pub enum SnmpValue {
    Int(i64),
    OctetString(Vec<u8>),
    ObjectId(Oid),
    IpAddress(Ipv4Addr),
    Counter(u64),
    TimeTicks(u64),
    Null,
    /// noSuchObject / noSuchInstance / endOfMibView markers.
    Absent,
}

impl SnmpValue {
    /// True for the v2c exception markers and NULL: no usable payload.
    pub fn is_absent(&self) -> bool {
        matches!(self, SnmpValue::Absent | SnmpValue::Null)
    }

    /// Lossy text rendering, the way device fields end up in records.
    pub fn as_text(&self) -> Option<String> {
        match self {
            SnmpValue::OctetString(bytes) => {
                Some(String::from_utf8_lossy(bytes).into_owned())
            }
            SnmpValue::IpAddress(addr) => Some(addr.to_string()),
            SnmpValue::ObjectId(oid) => Some(oid.to_string()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SnmpValue::Int(n) => Some(*n),
            SnmpValue::Counter(n) | SnmpValue::TimeTicks(n) => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            SnmpValue::OctetString(bytes) => Some(bytes),
            _ => None,
        }
    }
}

// --- BER encoding ---------------------------------------------------------

fn push_length(buf: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        buf.push(len as u8);
    } else {
        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|&&b| b == 0).count();
        buf.push(0x80 | (bytes.len() - skip) as u8);
        buf.extend_from_slice(&bytes[skip..]);
    }
}

fn push_tlv(buf: &mut Vec<u8>, tag: u8, content: &[u8]) {
    buf.push(tag);
    push_length(buf, content.len());
    buf.extend_from_slice(content);
}

fn push_integer(buf: &mut Vec<u8>, value: i64) {
    let bytes = value.to_be_bytes();
    // minimal two's complement: strip redundant leading 0x00/0xff octets
    let mut start = 0;
    while start < 7 {
        let lead = bytes[start];
        let next_high = bytes[start + 1] & 0x80;
        if (lead == 0x00 && next_high == 0) || (lead == 0xff && next_high != 0) {
            start += 1;
        } else {
            break;
        }
    }
    push_tlv(buf, TAG_INTEGER, &bytes[start..]);
}

fn encode_oid(oid: &Oid) -> Vec<u8> {
    let arcs = oid.arcs();
    let mut out = Vec::with_capacity(arcs.len() + 1);
    out.push((arcs[0] * 40 + arcs[1]) as u8);
    for &arc in &arcs[2..] {
        let mut chunk = [0u8; 5];
        let mut n = arc;
        let mut i = 5;
        loop {
            i -= 1;
            chunk[i] = (n & 0x7f) as u8;
            n >>= 7;
            if n == 0 {
                break;
            }
        }
        for (j, &b) in chunk[i..].iter().enumerate() {
            let last = j == 5 - i - 1;
            out.push(if last { b } else { b | 0x80 });
        }
    }
    out
}

/// Build a GET or GET-NEXT message for a single varbind.
fn encode_request(community: &str, request_id: i64, oid: &Oid, next: bool) -> Vec<u8> {
    let mut varbind = Vec::new();
    push_tlv(&mut varbind, TAG_OID, &encode_oid(oid));
    push_tlv(&mut varbind, TAG_NULL, &[]);

    let mut varbind_list = Vec::new();
    push_tlv(&mut varbind_list, TAG_SEQUENCE, &varbind);

    let mut pdu = Vec::new();
    push_integer(&mut pdu, request_id);
    push_integer(&mut pdu, 0); // error-status
    push_integer(&mut pdu, 0); // error-index
    push_tlv(&mut pdu, TAG_SEQUENCE, &varbind_list);

    let mut message = Vec::new();
    push_integer(&mut message, SNMP_V2C);
    push_tlv(&mut message, TAG_OCTET_STRING, community.as_bytes());
    push_tlv(
        &mut message,
        if next { TAG_GET_NEXT_REQUEST } else { TAG_GET_REQUEST },
        &pdu,
    );

    let mut packet = Vec::new();
    push_tlv(&mut packet, TAG_SEQUENCE, &message);
    packet
}

// --- BER decoding ---------------------------------------------------------

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn byte(&mut self) -> Result<u8, DecodeError> {
        let b = *self.buf.get(self.pos).ok_or(DecodeError::Truncated)?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.pos + n > self.buf.len() {
            return Err(DecodeError::BadLength);
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn length(&mut self) -> Result<usize, DecodeError> {
        let first = self.byte()?;
        if first & 0x80 == 0 {
            return Ok(first as usize);
        }
        let count = (first & 0x7f) as usize;
        if count == 0 || count > 4 {
            return Err(DecodeError::BadLength);
        }
        let mut len = 0usize;
        for &b in self.take(count)? {
            len = (len << 8) | b as usize;
        }
        Ok(len)
    }

    /// Read a TLV header, asserting the tag, and return a reader over
    /// the content.
    fn enter(&mut self, expected: u8) -> Result<Reader<'a>, DecodeError> {
        let tag = self.byte()?;
        if tag != expected {
            return Err(DecodeError::UnexpectedTag(tag));
        }
        let len = self.length()?;
        Ok(Reader::new(self.take(len)?))
    }

    fn integer(&mut self) -> Result<i64, DecodeError> {
        let content = self.enter(TAG_INTEGER)?.buf;
        decode_integer(content)
    }

    fn has_more(&self) -> bool {
        self.pos < self.buf.len()
    }
}

fn decode_integer(content: &[u8]) -> Result<i64, DecodeError> {
    if content.is_empty() || content.len() > 8 {
        return Err(DecodeError::BadLength);
    }
    let mut value: i64 = if content[0] & 0x80 != 0 { -1 } else { 0 };
    for &b in content {
        value = (value << 8) | b as i64;
    }
    Ok(value)
}

fn decode_unsigned(content: &[u8]) -> Result<u64, DecodeError> {
    if content.is_empty() || content.len() > 9 {
        return Err(DecodeError::BadLength);
    }
    let mut value: u64 = 0;
    for &b in content {
        value = (value << 8) | b as u64;
    }
    Ok(value)
}

fn decode_oid(content: &[u8]) -> Result<Oid, DecodeError> {
    if content.is_empty() {
        return Err(DecodeError::BadOid);
    }
    let mut arcs = vec![(content[0] / 40) as u32, (content[0] % 40) as u32];
    let mut acc: u32 = 0;
    for &b in &content[1..] {
        acc = (acc << 7) | (b & 0x7f) as u32;
        if b & 0x80 == 0 {
            arcs.push(acc);
            acc = 0;
        }
    }
    Ok(Oid(arcs))
}

fn decode_value(reader: &mut Reader) -> Result<SnmpValue, DecodeError> {
    let tag = reader.byte()?;
    let len = reader.length()?;
    let content = reader.take(len)?;
    let value = match tag {
        TAG_INTEGER => SnmpValue::Int(decode_integer(content)?),
        TAG_OCTET_STRING => SnmpValue::OctetString(content.to_vec()),
        TAG_NULL => SnmpValue::Null,
        TAG_OID => SnmpValue::ObjectId(decode_oid(content)?),
        TAG_IP_ADDRESS => {
            if content.len() != 4 {
                return Err(DecodeError::BadLength);
            }
            SnmpValue::IpAddress(Ipv4Addr::new(
                content[0], content[1], content[2], content[3],
            ))
        }
        TAG_COUNTER32 | TAG_GAUGE32 | TAG_COUNTER64 => {
            SnmpValue::Counter(decode_unsigned(content)?)
        }
        TAG_TIMETICKS => SnmpValue::TimeTicks(decode_unsigned(content)?),
        TAG_NO_SUCH_OBJECT | TAG_NO_SUCH_INSTANCE | TAG_END_OF_MIB_VIEW => SnmpValue::Absent,
        other => return Err(DecodeError::UnexpectedTag(other)),
    };
    Ok(value)
}

/// Decode a GetResponse message down to its first varbind.
fn decode_response(packet: &[u8]) -> Result<(Oid, SnmpValue), DecodeError> {
    let mut outer = Reader::new(packet);
    let mut message = outer.enter(TAG_SEQUENCE)?;
    let _version = message.integer()?;
    let _community = message.enter(TAG_OCTET_STRING)?;

    let mut pdu = message.enter(TAG_GET_RESPONSE)?;
    let _request_id = pdu.integer()?;
    let error_status = pdu.integer()?;
    let _error_index = pdu.integer()?;
    if error_status != 0 {
        // v1-style error (e.g. noSuchName): treat as an absent value
        return Ok((Oid(vec![0, 0]), SnmpValue::Absent));
    }

    let mut varbinds = pdu.enter(TAG_SEQUENCE)?;
    if !varbinds.has_more() {
        return Err(DecodeError::Truncated);
    }
    let mut varbind = varbinds.enter(TAG_SEQUENCE)?;
    let oid_content = varbind.enter(TAG_OID)?;
    let oid = decode_oid(oid_content.buf)?;
    let value = decode_value(&mut varbind)?;
    Ok((oid, value))
}

// --- Client ---------------------------------------------------------------

/// A single-target SNMP v2c client with a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct SnmpClient {
    target: SocketAddr,
    community: String,
    timeout: Duration,
}

impl SnmpClient {
    pub fn new(target: SocketAddr, timeout: Duration) -> Self {
        Self {
            target,
            community: "public".to_string(),
            timeout,
        }
    }

    pub fn with_community(mut self, community: impl Into<String>) -> Self {
        self.community = community.into();
        self
    }

    /// GET one OID. `None` covers every way the device can fail to
    /// answer usefully: timeout, network error, malformed BER, or an
    /// absent-value marker.
    pub async fn get(&self, oid: &Oid) -> Option<SnmpValue> {
        let (_, value) = self.request(oid, false).await?;
        if value.is_absent() {
            None
        } else {
            Some(value)
        }
    }

    /// GET-NEXT from one OID, returning the successor varbind.
    pub async fn get_next(&self, oid: &Oid) -> Option<(Oid, SnmpValue)> {
        let (next_oid, value) = self.request(oid, true).await?;
        if matches!(value, SnmpValue::Absent) {
            None
        } else {
            Some((next_oid, value))
        }
    }

    async fn request(&self, oid: &Oid, next: bool) -> Option<(Oid, SnmpValue)> {
        let request_id: i64 = rand::thread_rng().gen_range(1..i32::MAX as i64);
        let packet = encode_request(&self.community, request_id, oid, next);

        let exchange = async {
            let socket = UdpSocket::bind("0.0.0.0:0").await?;
            socket.connect(self.target).await?;
            socket.send(&packet).await?;
            let mut buf = vec![0u8; 65535];
            let n = socket.recv(&mut buf).await?;
            buf.truncate(n);
            Ok::<Vec<u8>, std::io::Error>(buf)
        };

        let response = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(err)) => {
                debug!(target = %self.target, %err, "snmp exchange failed");
                return None;
            }
            Err(_) => {
                debug!(target = %self.target, oid = %oid, "snmp request timed out");
                return None;
            }
        };

        match decode_response(&response) {
            Ok(varbind) => Some(varbind),
            Err(err) => {
                debug!(target = %self.target, %err, "undecodable snmp response");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(s: &str) -> Oid {
        s.parse().unwrap()
    }

    #[test]
    fn test_oid_parse_display_round_trip() {
        let text = "1.3.6.1.4.1.1773.1.1.1.7.0";
        assert_eq!(oid(text).to_string(), text);
    }

    #[test]
    fn test_oid_subtree_check() {
        let root = oid("1.3.6.1.4.1.9");
        assert!(oid("1.3.6.1.4.1.9.5.1").starts_with(&root));
        assert!(root.starts_with(&root));
        assert!(!oid("1.3.6.1.4.1.1991.1").starts_with(&root));
        // sharing a numeric prefix in text is not a subtree match
        assert!(!oid("1.3.6.1.4.1.99").starts_with(&root));
    }

    #[test]
    fn test_oid_encode_decode_round_trip() {
        for text in [
            "1.3.6.1.2.1.1.3.0",
            "1.3.6.1.4.1.5835.5.2.100.1.1.4.0",
            "1.3.6.1.4.1.1855.2.21.1.1.2.0",
        ] {
            let original = oid(text);
            assert_eq!(decode_oid(&encode_oid(&original)).unwrap(), original);
        }
    }

    #[test]
    fn test_multibyte_arc_encoding() {
        // 1773 = 0x6ed needs two base-128 bytes: 0x8d 0x6d
        let encoded = encode_oid(&oid("1.3.6.1.4.1.1773"));
        assert_eq!(encoded, vec![0x2b, 0x06, 0x01, 0x04, 0x01, 0x8d, 0x6d]);
    }

    #[test]
    fn test_integer_encoding_minimal() {
        let mut buf = Vec::new();
        push_integer(&mut buf, 0);
        assert_eq!(buf, vec![0x02, 0x01, 0x00]);

        buf.clear();
        push_integer(&mut buf, 128);
        assert_eq!(buf, vec![0x02, 0x02, 0x00, 0x80]);

        buf.clear();
        push_integer(&mut buf, -1);
        assert_eq!(buf, vec![0x02, 0x01, 0xff]);
    }

    #[test]
    fn test_long_form_length() {
        let mut buf = Vec::new();
        push_length(&mut buf, 300);
        assert_eq!(buf, vec![0x82, 0x01, 0x2c]);

        let mut reader = Reader::new(&buf);
        assert_eq!(reader.length().unwrap(), 300);
    }

    /// Build a response packet the way a device would, then decode it.
    fn fake_response(answer_oid: &Oid, value_tlv: &[u8]) -> Vec<u8> {
        let mut varbind = Vec::new();
        push_tlv(&mut varbind, TAG_OID, &encode_oid(answer_oid));
        varbind.extend_from_slice(value_tlv);

        let mut varbind_list = Vec::new();
        push_tlv(&mut varbind_list, TAG_SEQUENCE, &varbind);

        let mut pdu = Vec::new();
        push_integer(&mut pdu, 42);
        push_integer(&mut pdu, 0);
        push_integer(&mut pdu, 0);
        push_tlv(&mut pdu, TAG_SEQUENCE, &varbind_list);

        let mut message = Vec::new();
        push_integer(&mut message, SNMP_V2C);
        push_tlv(&mut message, TAG_OCTET_STRING, b"public");
        push_tlv(&mut message, TAG_GET_RESPONSE, &pdu);

        let mut packet = Vec::new();
        push_tlv(&mut packet, TAG_SEQUENCE, &message);
        packet
    }

    #[test]
    fn test_decode_octet_string_response() {
        let answer = oid("1.3.6.1.4.1.1773.1.1.1.7.0");
        let mut value = Vec::new();
        push_tlv(&mut value, TAG_OCTET_STRING, b"RX8200");

        let packet = fake_response(&answer, &value);
        let (got_oid, got_value) = decode_response(&packet).unwrap();
        assert_eq!(got_oid, answer);
        assert_eq!(got_value.as_text().as_deref(), Some("RX8200"));
    }

    #[test]
    fn test_decode_timeticks_response() {
        let answer = oid("1.3.6.1.2.1.1.3.0");
        let value = vec![TAG_TIMETICKS, 0x03, 0x01, 0x00, 0x00];
        let packet = fake_response(&answer, &value);
        let (_, got) = decode_response(&packet).unwrap();
        assert_eq!(got.as_int(), Some(0x010000));
    }

    #[test]
    fn test_decode_end_of_mib_view() {
        let answer = oid("1.3.6.1.4.1.2000.1");
        let value = vec![TAG_END_OF_MIB_VIEW, 0x00];
        let packet = fake_response(&answer, &value);
        let (_, got) = decode_response(&packet).unwrap();
        assert!(got.is_absent());
    }

    #[test]
    fn test_truncated_packet_is_an_error() {
        let answer = oid("1.3.6.1.2.1.1.3.0");
        let mut value = Vec::new();
        push_tlv(&mut value, TAG_OCTET_STRING, b"x");
        let mut packet = fake_response(&answer, &value);
        packet.truncate(packet.len() - 3);
        assert!(decode_response(&packet).is_err());
    }

    #[test]
    fn test_request_shape() {
        let packet = encode_request("public", 7, &oid("1.3.6.1.2.1.1.1.0"), false);
        // outer SEQUENCE wrapping version, community, GetRequest PDU
        assert_eq!(packet[0], TAG_SEQUENCE);
        assert!(packet.windows(6).any(|w| w == b"public"));
        assert!(packet.contains(&TAG_GET_REQUEST));
    }

    #[test]
    fn test_get_next_request_uses_next_tag() {
        let packet = encode_request("public", 7, &oid("1.3.6.1.4.1.9"), true);
        assert!(packet.contains(&TAG_GET_NEXT_REQUEST));
        assert!(!packet.contains(&TAG_GET_REQUEST));
    }
}
