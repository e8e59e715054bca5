//! End-to-end scan tests against loopback device simulators.
//!
//! A small UDP responder speaks just enough SNMP v2c BER to stand in for a
//! real agent, and a minimal TCP loop answers HTTP requests with canned
//! bodies. Everything binds ephemeral loopback ports, so the tests need no
//! privileges and no network.

use auditscan::classify::{Classifier, ProbeConfig};
use auditscan::driver;
use auditscan::driver::Driver as _;
use auditscan::net::Prober;
use auditscan::scheduler::{ScanEvent, ScanOutcome, ScanRequest, ScanTask};
use auditscan::types::{AddrRange, DeviceTypeId, Scalar};
use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::mpsc;

// --- SNMP agent simulator -------------------------------------------------

const TAG_INTEGER: u8 = 0x02;
const TAG_OCTET_STRING: u8 = 0x04;
const TAG_OID: u8 = 0x06;
const TAG_SEQUENCE: u8 = 0x30;
const TAG_TIMETICKS: u8 = 0x43;
const TAG_NO_SUCH_OBJECT: u8 = 0x80;
const TAG_END_OF_MIB_VIEW: u8 = 0x82;
const TAG_GET_REQUEST: u8 = 0xa0;
const TAG_GET_NEXT_REQUEST: u8 = 0xa1;
const TAG_GET_RESPONSE: u8 = 0xa2;

fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = content.len();
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|&&b| b == 0).count();
        out.push(0x80 | (bytes.len() - skip) as u8);
        out.extend_from_slice(&bytes[skip..]);
    }
    out.extend_from_slice(content);
    out
}

/// Minimal INTEGER encoding, enough for version/ids/status fields.
fn int_tlv(value: u8) -> Vec<u8> {
    assert!(value < 0x80);
    vec![TAG_INTEGER, 0x01, value]
}

fn oid_bytes(arcs: &[u32]) -> Vec<u8> {
    let mut out = vec![(arcs[0] * 40 + arcs[1]) as u8];
    for &arc in &arcs[2..] {
        let mut chunk = Vec::new();
        let mut n = arc;
        loop {
            chunk.push((n & 0x7f) as u8);
            n >>= 7;
            if n == 0 {
                break;
            }
        }
        chunk.reverse();
        let last = chunk.len() - 1;
        for (i, b) in chunk.into_iter().enumerate() {
            out.push(if i == last { b } else { b | 0x80 });
        }
    }
    out
}

fn arcs(dotted: &str) -> Vec<u32> {
    dotted.split('.').map(|p| p.parse().unwrap()).collect()
}

fn text_tlv(text: &str) -> Vec<u8> {
    tlv(TAG_OCTET_STRING, text.as_bytes())
}

fn read_len(packet: &[u8], pos: &mut usize) -> Option<usize> {
    let first = *packet.get(*pos)?;
    *pos += 1;
    if first & 0x80 == 0 {
        return Some(first as usize);
    }
    let count = (first & 0x7f) as usize;
    let mut len = 0usize;
    for _ in 0..count {
        len = (len << 8) | *packet.get(*pos)? as usize;
        *pos += 1;
    }
    Some(len)
}

fn skip_tlv(packet: &[u8], pos: &mut usize) -> Option<()> {
    *pos += 1;
    let len = read_len(packet, pos)?;
    *pos += len;
    Some(())
}

/// Pull the PDU tag and the requested OID out of a GET/GET-NEXT packet.
fn parse_request(packet: &[u8]) -> Option<(u8, Vec<u32>)> {
    let mut pos = 0;
    if *packet.get(pos)? != TAG_SEQUENCE {
        return None;
    }
    pos += 1;
    read_len(packet, &mut pos)?;
    skip_tlv(packet, &mut pos)?; // version
    skip_tlv(packet, &mut pos)?; // community

    let pdu_tag = *packet.get(pos)?;
    if pdu_tag != TAG_GET_REQUEST && pdu_tag != TAG_GET_NEXT_REQUEST {
        return None;
    }
    pos += 1;
    read_len(packet, &mut pos)?;
    skip_tlv(packet, &mut pos)?; // request-id
    skip_tlv(packet, &mut pos)?; // error-status
    skip_tlv(packet, &mut pos)?; // error-index

    if *packet.get(pos)? != TAG_SEQUENCE {
        return None;
    }
    pos += 1;
    read_len(packet, &mut pos)?;
    if *packet.get(pos)? != TAG_SEQUENCE {
        return None;
    }
    pos += 1;
    read_len(packet, &mut pos)?;
    if *packet.get(pos)? != TAG_OID {
        return None;
    }
    pos += 1;
    let len = read_len(packet, &mut pos)?;
    let content = packet.get(pos..pos + len)?;

    let mut oid = vec![(content[0] / 40) as u32, (content[0] % 40) as u32];
    let mut acc: u32 = 0;
    for &b in &content[1..] {
        acc = (acc << 7) | (b & 0x7f) as u32;
        if b & 0x80 == 0 {
            oid.push(acc);
            acc = 0;
        }
    }
    Some((pdu_tag, oid))
}

fn response(oid: &[u32], value_tlv: &[u8]) -> Vec<u8> {
    let mut varbind = tlv(TAG_OID, &oid_bytes(oid));
    varbind.extend_from_slice(value_tlv);
    let varbind_list = tlv(TAG_SEQUENCE, &tlv(TAG_SEQUENCE, &varbind));

    let mut pdu = int_tlv(42);
    pdu.extend(int_tlv(0));
    pdu.extend(int_tlv(0));
    pdu.extend(varbind_list);

    let mut message = int_tlv(1);
    message.extend(tlv(TAG_OCTET_STRING, b"public"));
    message.extend(tlv(TAG_GET_RESPONSE, &pdu));
    tlv(TAG_SEQUENCE, &message)
}

/// Serve an agent whose MIB is the given map. When `sticky_next` is set,
/// every GET-NEXT answers with that one varbind forever, the way a broken
/// agent loops a table walk.
async fn snmp_sim(
    map: BTreeMap<Vec<u32>, Vec<u8>>,
    sticky_next: Option<(Vec<u32>, Vec<u8>)>,
) -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();
    tokio::spawn(async move {
        let mut buf = vec![0u8; 65535];
        loop {
            let Ok((n, peer)) = socket.recv_from(&mut buf).await else {
                break;
            };
            let Some((pdu_tag, oid)) = parse_request(&buf[..n]) else {
                continue;
            };
            let (answer_oid, value) = match pdu_tag {
                TAG_GET_REQUEST => match map.get(&oid) {
                    Some(v) => (oid.clone(), v.clone()),
                    None => (oid.clone(), vec![TAG_NO_SUCH_OBJECT, 0x00]),
                },
                TAG_GET_NEXT_REQUEST => {
                    if let Some((o, v)) = &sticky_next {
                        (o.clone(), v.clone())
                    } else {
                        match map
                            .range((Bound::Excluded(oid.clone()), Bound::Unbounded))
                            .next()
                        {
                            Some((o, v)) => (o.clone(), v.clone()),
                            None => (oid.clone(), vec![TAG_END_OF_MIB_VIEW, 0x00]),
                        }
                    }
                }
                _ => continue,
            };
            let _ = socket.send_to(&response(&answer_oid, &value), peer).await;
        }
    });
    port
}

// --- HTTP simulator -------------------------------------------------------

/// Serve canned bodies by path; unknown paths get an empty 200.
async fn http_sim(routes: Vec<(&'static str, &'static str)>) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 4096];
                loop {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            request.extend_from_slice(&buf[..n]);
                            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }
                let text = String::from_utf8_lossy(&request);
                let path = text.split_whitespace().nth(1).unwrap_or("/");
                let body = routes
                    .iter()
                    .find(|(route, _)| *route == path)
                    .map(|(_, body)| *body)
                    .unwrap_or("");
                let reply = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(reply.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    port
}

// --- Fixtures -------------------------------------------------------------

struct AlwaysUp;

#[async_trait::async_trait]
impl Prober for AlwaysUp {
    async fn probe(&self, _address: &str) -> bool {
        true
    }
}

/// Probe config pointing every surface at loopback; unused surfaces go to
/// port 1, which refuses connections immediately.
fn loopback_probes(snmp_port: u16, http_port: u16) -> ProbeConfig {
    ProbeConfig {
        snmp_port,
        http_port,
        http_alt_port: 1,
        telnet_port: 1,
        snmp_timeout: Duration::from_millis(500),
        http_timeout: Duration::from_millis(500),
        telnet_timeout: Duration::from_millis(500),
    }
}

fn localhost_request(out: &std::path::Path, probes: ProbeConfig) -> ScanRequest {
    ScanRequest {
        range: AddrRange::parse("127.0.0.1", "127.0.0.1").unwrap(),
        output_dir: out.to_path_buf(),
        include_localhost: false,
        ignore_unknown: true,
        selected: DeviceTypeId::ALL.iter().copied().collect(),
        concurrency: 4,
        probes,
    }
}

async fn run_scan(request: ScanRequest) -> (auditscan::ScanSummary, Vec<ScanEvent>) {
    let task = ScanTask::new(request, Arc::new(AlwaysUp));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let summary = tokio::time::timeout(Duration::from_secs(30), task.run(tx))
        .await
        .expect("scan did not finish")
        .expect("scan failed");
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    (summary, events)
}

// --- Tests ----------------------------------------------------------------

#[tokio::test]
async fn scan_records_receiver_answering_product_oid() {
    let mut mib = BTreeMap::new();
    mib.insert(arcs("1.3.6.1.4.1.1773.1.1.1.7.0"), text_tlv("RX8200"));
    mib.insert(arcs("1.3.6.1.4.1.1773.1.1.1.16.0"), text_tlv("7.02.09"));
    mib.insert(
        arcs("1.3.6.1.2.1.1.3.0"),
        tlv(TAG_TIMETICKS, &[0x01, 0x00, 0x00]),
    );
    let snmp_port = snmp_sim(mib, None).await;

    let out = tempfile::tempdir().unwrap();
    let request = localhost_request(out.path(), loopback_probes(snmp_port, 1));
    let (summary, events) = run_scan(request).await;

    assert_eq!(summary.outcome, ScanOutcome::Completed);
    assert_eq!(summary.hosts_found, 1);
    assert!(events
        .iter()
        .any(|e| matches!(e, ScanEvent::Step { done: 1, total: 1 })));

    let data = summary.result_dir.join("127.0.0.1").join("127.0.0.1_data.json");
    let record: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&data).unwrap()).unwrap();
    assert_eq!(record["info"]["productname"], "RX8200");
    assert_eq!(record["info"]["swversion"], "7.02.09");
    assert_eq!(record["info"]["ipaddress"], "127.0.0.1");
    // this family exposes no config dump
    assert!(!summary
        .result_dir
        .join("127.0.0.1")
        .join("127.0.0.1_conf.xml")
        .exists());
}

#[tokio::test]
async fn silent_host_is_discarded() {
    let out = tempfile::tempdir().unwrap();
    let request = localhost_request(out.path(), loopback_probes(1, 1));
    let (summary, events) = run_scan(request).await;

    assert_eq!(summary.outcome, ScanOutcome::Completed);
    assert_eq!(summary.hosts_found, 0);
    assert!(events
        .iter()
        .any(|e| matches!(e, ScanEvent::Step { done: 1, total: 1 })));

    let entries: Vec<_> = std::fs::read_dir(&summary.result_dir)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert!(entries.is_empty(), "no host directories expected");
}

#[tokio::test]
async fn silent_host_kept_when_unknown_allowed() {
    let out = tempfile::tempdir().unwrap();
    let mut request = localhost_request(out.path(), loopback_probes(1, 1));
    request.ignore_unknown = false;
    let (summary, _) = run_scan(request).await;

    assert_eq!(summary.hosts_found, 1);
    let data = summary.result_dir.join("127.0.0.1").join("127.0.0.1_data.json");
    let record: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&data).unwrap()).unwrap();
    assert_eq!(record["info"]["productname"], "UNKNOWN");
    assert_eq!(record["info"]["unitname"], "UNKNOWN");
}

#[tokio::test]
async fn deselected_family_is_discarded() {
    let mut mib = BTreeMap::new();
    mib.insert(arcs("1.3.6.1.4.1.1773.1.1.1.7.0"), text_tlv("RX8200"));
    let snmp_port = snmp_sim(mib, None).await;

    let out = tempfile::tempdir().unwrap();
    let mut request = localhost_request(out.path(), loopback_probes(snmp_port, 1));
    request.selected = HashSet::from([DeviceTypeId::Mx8400]);
    let (summary, _) = run_scan(request).await;

    assert_eq!(summary.hosts_found, 0);
}

#[tokio::test]
async fn product_oid_outranks_web_interface() {
    // Answers both the vendor product OID and an Elemental-looking front
    // page; the SNMP identity must win.
    let mut mib = BTreeMap::new();
    mib.insert(arcs("1.3.6.1.4.1.1773.1.1.1.7.0"), text_tlv("RX9500"));
    let snmp_port = snmp_sim(mib, None).await;
    let http_port = http_sim(vec![("/", "<html>Elemental Live</html>")]).await;

    let classifier = Classifier::new(loopback_probes(snmp_port, http_port));
    assert_eq!(
        classifier.classify("127.0.0.1").await,
        DeviceTypeId::Rx9500
    );
}

#[tokio::test]
async fn web_interface_identifies_encoder_when_snmp_says_nothing() {
    // Agent with a MIB that has no recognized identity objects: the
    // cascade falls through to the HTTP front-page check.
    let mut mib = BTreeMap::new();
    mib.insert(arcs("1.3.6.1.2.1.1.3.0"), tlv(TAG_TIMETICKS, &[0x2a]));
    let snmp_port = snmp_sim(mib, None).await;
    let http_port = http_sim(vec![("/", "<title>Elemental Live</title>")]).await;

    let classifier = Classifier::new(loopback_probes(snmp_port, http_port));
    assert_eq!(
        classifier.classify("127.0.0.1").await,
        DeviceTypeId::Elemental
    );
}

#[tokio::test]
async fn answering_enterprise_subtree_classifies_switch() {
    // Nothing but a Cisco enterprise object: rule order reaches the
    // subtree walk and stops there.
    let mut mib = BTreeMap::new();
    mib.insert(arcs("1.3.6.1.4.1.9.2.1.3.0"), text_tlv("core-sw1"));
    let snmp_port = snmp_sim(mib, None).await;

    let classifier = Classifier::new(loopback_probes(snmp_port, 1));
    assert_eq!(classifier.classify("127.0.0.1").await, DeviceTypeId::Cisco);
}

#[tokio::test]
async fn card_row_missing_type_keeps_placeholder_key() {
    // Slot 3 answers the chassis walk and its serial column, but the
    // board-type column never does; the row is kept under "03 - ".
    let mut mib = BTreeMap::new();
    mib.insert(arcs("1.3.6.1.4.1.1773.1.1.3.1.1.3"), int_tlv(3));
    mib.insert(arcs("1.3.6.1.4.1.1773.1.1.3.1.8.3"), text_tlv("B00045117"));
    let snmp_port = snmp_sim(mib, None).await;

    let probes = loopback_probes(snmp_port, 1);
    let mut collector = driver::create(DeviceTypeId::Eq8000, "127.0.0.1", &probes);
    tokio::time::timeout(Duration::from_secs(30), collector.populate())
        .await
        .expect("collector did not terminate");

    let record = collector.record();
    assert_eq!(record.optioncards.len(), 1);
    let row = &record.optioncards["03 - "];
    assert_eq!(row["slotnum"], Scalar::Int(3));
    assert_eq!(row["serialnumber"], Scalar::from("B00045117"));
    assert!(!row.contains_key("type"));
}

#[tokio::test]
async fn table_walk_survives_looping_agent() {
    // A GET-NEXT that never advances must not hang the collector.
    let sticky = (arcs("1.3.6.1.2.1.4.20.1.1.10.0.0.1"), text_tlv("loop"));
    let snmp_port = snmp_sim(BTreeMap::new(), Some(sticky)).await;

    let probes = loopback_probes(snmp_port, 1);
    let mut collector = driver::create(DeviceTypeId::NccServer, "127.0.0.1", &probes);
    tokio::time::timeout(Duration::from_secs(30), collector.populate())
        .await
        .expect("collector did not terminate");
    assert!(collector.record().interfaces.len() <= 1);
}
