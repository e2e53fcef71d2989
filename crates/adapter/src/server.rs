//! TCP server for the scoring adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking. Each client gets its own task; requests
//! are scored inline since the engine is pure and cheap.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::core::{rule_table, score};
use crate::protocol::*;
use crate::types::RollMode;

/// Protocol major version this server speaks.
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Longest request line accepted, newline excluded. A score request carries
/// at most six dice, so this leaves generous room for client metadata.
pub const MAX_LINE_BYTES: usize = 4096;

fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let mut end = 0usize;
    for b in rest.as_bytes() {
        if b.is_ascii_digit() {
            end += 1;
        } else {
            break;
        }
    }
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            protocol_version: PROTOCOL_VERSION.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("FARKLE_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("FARKLE_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        Self {
            host,
            port,
            protocol_version: defaults.protocol_version,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if the adapter is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("FARKLE_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

/// Fail fast if the listen address is already taken.
pub fn check_tcp_listen_available(host: &str, port: u16) -> std::io::Result<()> {
    let listener = std::net::TcpListener::bind((host, port))?;
    drop(listener);
    Ok(())
}

/// Per-connection protocol state.
#[derive(Debug, Clone)]
pub struct Session {
    client_id: u64,
    protocol_version: String,
    handshaken: bool,
    last_seq: Option<u64>,
}

/// What to do with the connection after replying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

impl Session {
    pub fn new(client_id: u64, protocol_version: &str) -> Self {
        Self {
            client_id,
            protocol_version: protocol_version.to_string(),
            handshaken: false,
            last_seq: None,
        }
    }

    pub fn is_handshaken(&self) -> bool {
        self.handshaken
    }

    /// Sequencing: enforce strictly increasing seq per sender.
    fn check_and_update_seq(&mut self, seq: u64) -> bool {
        match self.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                self.last_seq = Some(seq);
                true
            }
        }
    }

    /// Handle one trimmed, non-empty request line.
    pub fn handle_line(&mut self, line: &str) -> (ServerMessage, Flow) {
        let msg = match parse_message(line) {
            Ok(msg) => msg,
            Err(e) => {
                let seq = extract_seq_best_effort(line).unwrap_or(0);
                let error = create_error(
                    seq,
                    ErrorCode::InvalidCommand,
                    &format!("JSON parse error: {}", e),
                );
                return (ServerMessage::Error(error), Flow::Continue);
            }
        };

        match msg {
            ParsedMessage::Hello(hello) => self.handle_hello(&hello),
            ParsedMessage::Score(req) => self.guarded(req.seq, || respond_score(&req)),
            ParsedMessage::CanContinue(req) => {
                self.guarded(req.seq, || respond_can_continue(&req))
            }
            ParsedMessage::Rules(req) => self.guarded(req.seq, || {
                ServerMessage::RulesResult(create_rules_result(req.seq, rule_table()))
            }),
            // Rejected before any handshake or seq check; it does not consume a seq.
            ParsedMessage::Unknown(u) => {
                let error = create_error(u.seq, ErrorCode::InvalidCommand, "Unknown message type");
                (ServerMessage::Error(error), Flow::Continue)
            }
        }
    }

    /// Run `respond` only for a handshaken client with a fresh seq.
    fn guarded<F>(&mut self, seq: u64, respond: F) -> (ServerMessage, Flow)
    where
        F: FnOnce() -> ServerMessage,
    {
        if !self.handshaken {
            let error = create_error(seq, ErrorCode::HandshakeRequired, "Send hello first");
            return (ServerMessage::Error(error), Flow::Continue);
        }

        if !self.check_and_update_seq(seq) {
            let error = create_error(
                seq,
                ErrorCode::InvalidCommand,
                "seq must be strictly increasing",
            );
            return (ServerMessage::Error(error), Flow::Continue);
        }

        (respond(), Flow::Continue)
    }

    fn handle_hello(&mut self, hello: &HelloMessage) -> (ServerMessage, Flow) {
        if self.handshaken && !self.check_and_update_seq(hello.seq) {
            let error = create_error(
                hello.seq,
                ErrorCode::InvalidCommand,
                "seq must be strictly increasing",
            );
            return (ServerMessage::Error(error), Flow::Continue);
        }

        // Validate protocol major version
        let major = self.protocol_version.split('.').next().unwrap_or("");
        if hello.protocol_version.split('.').next() != Some(major) {
            let error = create_error(
                hello.seq,
                ErrorCode::ProtocolMismatch,
                &format!("Protocol version {} not supported", hello.protocol_version),
            );
            return (ServerMessage::Error(error), Flow::Close);
        }

        self.handshaken = true;
        self.last_seq = Some(hello.seq);
        debug!(client_id = self.client_id, client = %hello.client.name, "handshake complete");

        let welcome = create_welcome(hello.seq, &self.protocol_version, self.client_id);
        (ServerMessage::Welcome(welcome), Flow::Continue)
    }
}

/// Score request -> score result or zero-score dice error.
pub fn respond_score(req: &ScoreMessage) -> ServerMessage {
    let mode = req.mode.0;
    match parse_dice(&req.dice, mode) {
        Ok(dice) => {
            let result = score(&dice);
            ServerMessage::ScoreResult(create_score_result(req.seq, mode, &result))
        }
        Err(e) => ServerMessage::Error(create_dice_error(req.seq, &e)),
    }
}

/// Continue-rolling request: the selection must score to let the turn go on.
/// Malformed dice get an error reply instead of `false`.
pub fn respond_can_continue(req: &CanContinueMessage) -> ServerMessage {
    match parse_dice(&req.dice, RollMode::Selection) {
        Ok(dice) => {
            let points = score(&dice).total;
            ServerMessage::CanContinueResult(create_can_continue_result(req.seq, points))
        }
        Err(e) => ServerMessage::Error(create_dice_error(req.seq, &e)),
    }
}

/// Start the TCP server
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let bound = listener.local_addr()?;
    info!(%bound, "scoring adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let config = Arc::new(config);
    let client_id_counter = AtomicU64::new(0);

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        let client_id = client_id_counter.fetch_add(1, Ordering::Relaxed) + 1;

        info!(client_id, %addr, "client connected");

        let config = Arc::clone(&config);

        // Spawn task to handle this client
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, &config).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

/// Handle a single client connection
async fn handle_client(socket: TcpStream, client_id: u64, config: &ServerConfig) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);
    let mut session = Session::new(client_id, &config.protocol_version);

    let mut line: Vec<u8> = Vec::with_capacity(256);
    let mut buf: Vec<u8> = Vec::with_capacity(1024);

    loop {
        let (reply, flow) = match read_bounded_line(&mut reader, &mut line, MAX_LINE_BYTES).await? {
            // Client disconnected
            LineRead::Eof => break,
            LineRead::TooLong => {
                warn!(client_id, max = MAX_LINE_BYTES, "request line too long");
                let error = create_error(
                    0,
                    ErrorCode::InvalidCommand,
                    &format!("request line exceeds {} bytes", MAX_LINE_BYTES),
                );
                write_message(&mut writer, &ServerMessage::Error(error), &mut buf).await?;
                skip_rest_of_line(&mut reader).await?;
                continue;
            }
            LineRead::Line => match std::str::from_utf8(&line) {
                Ok(text) => {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    session.handle_line(trimmed)
                }
                Err(_) => {
                    let seq = extract_seq_best_effort(&String::from_utf8_lossy(&line)).unwrap_or(0);
                    let error =
                        create_error(seq, ErrorCode::InvalidCommand, "request line is not valid UTF-8");
                    (ServerMessage::Error(error), Flow::Continue)
                }
            },
        };

        if let ServerMessage::Error(err) = &reply {
            debug!(client_id, seq = err.seq, code = ?err.code, message = %err.message, "request rejected");
        }
        write_message(&mut writer, &reply, &mut buf).await?;

        if flow == Flow::Close {
            break;
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineRead {
    Eof,
    Line,
    /// More than `max` bytes arrived without a newline. The rest of the line
    /// is still unread.
    TooLong,
}

/// Read one line into `line`, buffering at most `max + 1` bytes.
async fn read_bounded_line<R>(reader: &mut R, line: &mut Vec<u8>, max: usize) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    line.clear();
    let n = (&mut *reader)
        .take(max as u64 + 1)
        .read_until(b'\n', line)
        .await?;
    if n == 0 {
        return Ok(LineRead::Eof);
    }
    if line.last() == Some(&b'\n') || line.len() <= max {
        return Ok(LineRead::Line);
    }
    line.clear();
    Ok(LineRead::TooLong)
}

/// Discard input up to and including the next newline (or EOF).
async fn skip_rest_of_line<R>(reader: &mut R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let chunk = reader.fill_buf().await?;
        if chunk.is_empty() {
            return Ok(());
        }
        let (consumed, done) = match chunk.iter().position(|&b| b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (chunk.len(), false),
        };
        reader.consume(consumed);
        if done {
            return Ok(());
        }
    }
}

async fn write_message<W>(writer: &mut W, msg: &ServerMessage, buf: &mut Vec<u8>) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    buf.clear();
    serde_json::to_writer(&mut *buf, msg)?;
    buf.push(b'\n');
    writer.write_all(buf.as_slice()).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello_line(seq: u64, version: &str) -> String {
        serde_json::to_string(&create_hello(seq, "unit", version)).unwrap()
    }

    fn reply_json(reply: &ServerMessage) -> serde_json::Value {
        serde_json::to_value(reply).unwrap()
    }

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"seq": 42, "type":"#), Some(42));
        assert_eq!(extract_seq_best_effort(r#"{"type":"score"}"#), None);
    }

    #[test]
    fn test_server_config_from_env() {
        // This test just ensures it doesn't panic
        let config = ServerConfig::from_env();
        assert!(!config.host.is_empty());
    }

    #[test]
    fn test_socket_addr_rejects_bad_host() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_requests_require_handshake() {
        let mut s = Session::new(1, PROTOCOL_VERSION);
        let (reply, flow) = s.handle_line(r#"{"type":"score","seq":1,"ts":0,"dice":[1,1,1,1,1,1]}"#);
        assert_eq!(flow, Flow::Continue);
        assert_eq!(reply_json(&reply)["code"], "handshake_required");
    }

    #[test]
    fn test_protocol_mismatch_closes() {
        let mut s = Session::new(1, PROTOCOL_VERSION);
        let (reply, flow) = s.handle_line(&hello_line(1, "2.0.0"));
        assert_eq!(flow, Flow::Close);
        assert_eq!(reply_json(&reply)["code"], "protocol_mismatch");
        assert!(!s.is_handshaken());
    }

    #[test]
    fn test_score_flow() {
        let mut s = Session::new(3, PROTOCOL_VERSION);
        let (reply, _) = s.handle_line(&hello_line(1, "1.2.0"));
        let v = reply_json(&reply);
        assert_eq!(v["type"], "welcome");
        assert_eq!(v["client_id"], 3);

        let (reply, _) = s.handle_line(r#"{"type":"score","seq":2,"ts":0,"dice":[1,1,1,5,5,5]}"#);
        let v = reply_json(&reply);
        assert_eq!(v["type"], "score_result");
        assert_eq!(v["score"], 1500);
        assert_eq!(v["combinations"], serde_json::json!(["Three of 1s", "Three of 5s"]));
        assert_eq!(v["is_farkle"], false);
    }

    #[test]
    fn test_seq_must_increase() {
        let mut s = Session::new(1, PROTOCOL_VERSION);
        s.handle_line(&hello_line(5, PROTOCOL_VERSION));
        let (reply, _) = s.handle_line(r#"{"type":"rules","seq":5,"ts":0}"#);
        let v = reply_json(&reply);
        assert_eq!(v["code"], "invalid_command");
        assert_eq!(v["seq"], 5);

        let (reply, _) = s.handle_line(r#"{"type":"rules","seq":6,"ts":0}"#);
        assert_eq!(reply_json(&reply)["type"], "rules_result");
    }

    #[test]
    fn test_invalid_dice_is_an_error_reply() {
        let mut s = Session::new(1, PROTOCOL_VERSION);
        s.handle_line(&hello_line(1, PROTOCOL_VERSION));

        let (reply, flow) = s.handle_line(r#"{"type":"score","seq":2,"ts":0,"dice":[1,2,3,4,5]}"#);
        assert_eq!(flow, Flow::Continue);
        let v = reply_json(&reply);
        assert_eq!(v["code"], "invalid_dice");
        assert_eq!(v["score"], 0);

        let (reply, _) = s.handle_line(r#"{"type":"score","seq":3,"ts":0,"dice":[1,2,3,4,5,7]}"#);
        assert_eq!(reply_json(&reply)["code"], "invalid_dice");

        let (reply, _) = s.handle_line(r#"{"type":"score","seq":4,"ts":0,"dice":[1,2,3,4,5,2.5]}"#);
        assert_eq!(reply_json(&reply)["code"], "invalid_dice");
    }

    #[test]
    fn test_can_continue() {
        let mut s = Session::new(1, PROTOCOL_VERSION);
        s.handle_line(&hello_line(1, PROTOCOL_VERSION));

        let (reply, _) = s.handle_line(r#"{"type":"can_continue","seq":2,"ts":0,"dice":[5,5]}"#);
        let v = reply_json(&reply);
        assert_eq!(v["type"], "can_continue_result");
        assert_eq!(v["can_continue"], true);
        assert_eq!(v["score"], 100);

        let (reply, _) = s.handle_line(r#"{"type":"can_continue","seq":3,"ts":0,"dice":[2,3]}"#);
        assert_eq!(reply_json(&reply)["can_continue"], false);

        let (reply, _) = s.handle_line(r#"{"type":"can_continue","seq":4,"ts":0,"dice":[]}"#);
        assert_eq!(reply_json(&reply)["code"], "invalid_dice");
    }

    #[test]
    fn test_garbage_line_keeps_connection_open() {
        let mut s = Session::new(1, PROTOCOL_VERSION);
        let (reply, flow) = s.handle_line(r#"{"seq": 12, "type": "score", "dice": 5"#);
        assert_eq!(flow, Flow::Continue);
        let v = reply_json(&reply);
        assert_eq!(v["code"], "invalid_command");
        assert_eq!(v["seq"], 12);
    }

    #[test]
    fn test_unknown_type_is_reported_before_seq_check() {
        let mut s = Session::new(1, PROTOCOL_VERSION);
        let (reply, flow) = s.handle_line(r#"{"type":"bank","ts":0}"#);
        assert_eq!(flow, Flow::Continue);
        let v = reply_json(&reply);
        assert_eq!(v["code"], "invalid_command");
        assert_eq!(v["message"], "Unknown message type");

        s.handle_line(&hello_line(1, PROTOCOL_VERSION));
        let (reply, _) = s.handle_line(r#"{"type":"bank","ts":0}"#);
        let v = reply_json(&reply);
        assert_eq!(v["message"], "Unknown message type");
        assert_eq!(v["seq"], 0);

        // The unknown request did not consume a seq.
        let (reply, _) = s.handle_line(r#"{"type":"bank","seq":2,"ts":0}"#);
        assert_eq!(reply_json(&reply)["message"], "Unknown message type");
        let (reply, _) = s.handle_line(r#"{"type":"rules","seq":2,"ts":0}"#);
        assert_eq!(reply_json(&reply)["type"], "rules_result");
    }

    #[tokio::test]
    async fn test_read_bounded_line() {
        let input = b"{\"a\":1}\nabcd\nabcdefghij\ntail";
        let mut reader: &[u8] = input;
        let mut line = Vec::new();

        assert_eq!(read_bounded_line(&mut reader, &mut line, 8).await.unwrap(), LineRead::Line);
        assert_eq!(line, b"{\"a\":1}\n");

        assert_eq!(read_bounded_line(&mut reader, &mut line, 8).await.unwrap(), LineRead::Line);
        assert_eq!(line, b"abcd\n");

        assert_eq!(read_bounded_line(&mut reader, &mut line, 8).await.unwrap(), LineRead::TooLong);
        assert!(line.is_empty());
        skip_rest_of_line(&mut reader).await.unwrap();

        assert_eq!(read_bounded_line(&mut reader, &mut line, 8).await.unwrap(), LineRead::Line);
        assert_eq!(line, b"tail");

        assert_eq!(read_bounded_line(&mut reader, &mut line, 8).await.unwrap(), LineRead::Eof);
    }

    #[tokio::test]
    async fn test_skip_rest_of_line_stops_at_eof() {
        let mut reader: &[u8] = b"no newline here";
        skip_rest_of_line(&mut reader).await.unwrap();
        assert!(reader.is_empty());
    }
}
