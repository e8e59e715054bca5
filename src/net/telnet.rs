//! Scripted Telnet sessions.
//!
//! Just enough of the protocol to log in to an embedded CLI and capture
//! a configuration dump: connect, wait for a prompt, send a line, repeat.
//! Option negotiation (IAC sequences) is stripped, never answered; the
//! target devices do not insist.

use crate::error::{ProbeError, ProbeResult};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};
use tracing::debug;

const IAC: u8 = 0xff;
const SB: u8 = 0xfa;
const SE: u8 = 0xf0;

/// One expect/send exchange in a scripted session.
#[derive(Debug, Clone, Copy)]
pub struct TelnetStep {
    /// Byte sequence to wait for before sending.
    pub expect: &'static str,
    /// Line to send once the prompt arrives (CRLF is appended).
    pub send: &'static str,
}

/// A complete capture script: login exchanges, then read until the
/// terminator.
#[derive(Debug, Clone, Copy)]
pub struct TelnetScript {
    pub steps: &'static [TelnetStep],
    pub capture_until: &'static str,
}

/// An open Telnet connection with buffered, IAC-stripped reads.
pub struct TelnetSession {
    stream: TcpStream,
    timeout: Duration,
    buffer: Vec<u8>,
}

impl TelnetSession {
    pub async fn connect(address: &str, port: u16, timeout: Duration) -> ProbeResult<Self> {
        let connect = TcpStream::connect((address, port));
        let stream = tokio::time::timeout(timeout, connect)
            .await
            .map_err(|_| ProbeError::Timeout)??;
        Ok(Self {
            stream,
            timeout,
            buffer: Vec::new(),
        })
    }

    /// Read until `pattern` appears, returning everything up to and
    /// including it. On timeout the bytes collected so far are returned,
    /// the way classic telnet clients behave.
    pub async fn read_until(&mut self, pattern: &str) -> ProbeResult<Vec<u8>> {
        let needle = pattern.as_bytes();
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(pos) = find(&self.buffer, needle) {
                let mut taken: Vec<u8> = self.buffer.drain(..pos + needle.len()).collect();
                strip_iac(&mut taken);
                return Ok(taken);
            }

            let mut chunk = [0u8; 1024];
            let n = match timeout_at(deadline, self.stream.read(&mut chunk)).await {
                Ok(Ok(0)) | Err(_) => {
                    let mut taken = std::mem::take(&mut self.buffer);
                    strip_iac(&mut taken);
                    return Ok(taken);
                }
                Ok(Ok(n)) => n,
                Ok(Err(err)) => return Err(ProbeError::Io(err)),
            };
            self.buffer.extend_from_slice(&chunk[..n]);
        }
    }

    /// Send a line terminated with CRLF.
    pub async fn send_line(&mut self, line: &str) -> ProbeResult<()> {
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\r\n").await?;
        Ok(())
    }
}

/// Read just the login banner: connect, read one line, disconnect.
/// Used by the classifier's last-resort rule.
pub async fn read_banner(address: &str, port: u16, timeout: Duration) -> Option<String> {
    let mut session = match TelnetSession::connect(address, port, timeout).await {
        Ok(session) => session,
        Err(err) => {
            debug!(%address, %err, "telnet banner probe failed");
            return None;
        }
    };
    match session.read_until("\r\n").await {
        Ok(bytes) if !bytes.is_empty() => Some(String::from_utf8_lossy(&bytes).into_owned()),
        _ => None,
    }
}

/// Run a capture script against a host. Any failure yields `None`; the
/// caller records "no config" and moves on.
pub async fn run_script(
    address: &str,
    port: u16,
    timeout: Duration,
    script: &TelnetScript,
) -> Option<Vec<u8>> {
    let mut session = TelnetSession::connect(address, port, timeout).await.ok()?;
    for step in script.steps {
        session.read_until(step.expect).await.ok()?;
        session.send_line(step.send).await.ok()?;
    }
    let capture = session.read_until(script.capture_until).await.ok()?;
    if capture.is_empty() {
        None
    } else {
        Some(capture)
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Remove IAC command and subnegotiation sequences in place.
fn strip_iac(data: &mut Vec<u8>) {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if data[i] != IAC {
            out.push(data[i]);
            i += 1;
            continue;
        }
        match data.get(i + 1) {
            Some(&IAC) => {
                out.push(IAC);
                i += 2;
            }
            Some(&SB) => {
                // skip to IAC SE
                let mut j = i + 2;
                while j + 1 < data.len() && !(data[j] == IAC && data[j + 1] == SE) {
                    j += 1;
                }
                i = j + 2;
            }
            Some(_) => i += 3, // IAC <command> <option>
            None => i += 1,
        }
    }
    *data = out;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn test_strip_iac_negotiation() {
        let mut data = vec![0xff, 0xfd, 0x18, b'l', b'o', b'g', b'i', b'n', b':', b' '];
        strip_iac(&mut data);
        assert_eq!(data, b"login: ");
    }

    #[test]
    fn test_strip_iac_escaped_literal() {
        let mut data = vec![b'a', 0xff, 0xff, b'b'];
        strip_iac(&mut data);
        assert_eq!(data, vec![b'a', 0xff, b'b']);
    }

    #[tokio::test]
    async fn test_read_banner() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let _ = stream.write_all(b"LEITCH xplus router\r\nlogin: ").await;
            }
        });

        let banner = read_banner("127.0.0.1", port, Duration::from_secs(2))
            .await
            .unwrap();
        assert!(banner.to_uppercase().contains("LEITCH"));
    }

    #[tokio::test]
    async fn test_connect_refused_is_error() {
        let result = TelnetSession::connect("127.0.0.1", 1, Duration::from_millis(500)).await;
        assert!(result.is_err());
    }
}
