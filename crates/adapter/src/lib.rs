//! Adapter module - Farkle scoring over TCP with a JSON protocol
//!
//! This crate lets external tools (turn assistants, bots, scripts) call the
//! scoring engine without linking it. Every request is answered by the same
//! canonical engine in [`farkle_core`].
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Requests**: Client sends `score`, `can_continue`, or `rules`; each gets one reply
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and protocol version
//! - **score**: Dice to score, with `mode` `"roll"` (exactly 6 dice, default) or `"selection"` (1-6)
//! - **can_continue**: Dice set aside as scored; does the turn continue?
//! - **rules**: Request the scoring table
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello with server capabilities
//! - **score_result**: `score`, `combinations`, `used_dice`, `is_farkle`
//! - **can_continue_result**: `can_continue` and the selection's `score`
//! - **rules_result**: Every combination with its point value
//! - **error**: Error response with code and message; rejected dice also carry `score: 0`
//!
//! A malformed request never closes the connection. Only a protocol
//! version mismatch on `hello` does.
//!
//! # Environment Variables
//!
//! - `FARKLE_HOST`: Bind address (default: "127.0.0.1")
//! - `FARKLE_PORT`: Port number (default: 7878)
//! - `FARKLE_DISABLED`: Set to "1" or "true" to disable the adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1234567890,"client":{"name":"helper","version":"1.0.0"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1234567890,"protocol_version":"1.0.0","client_id":1,...}
//! Client -> Server: {"type":"score","seq":2,"ts":1234567891,"dice":[2,3,4,6,6,6]}
//! Server -> Client: {"type":"score_result","seq":2,"ts":1234567891,"mode":"roll","score":600,"combinations":["Three of 6s"],"used_dice":[false,false,false,true,true,true],"is_farkle":false}
//! Client -> Server: {"type":"score","seq":3,"ts":1234567892,"dice":[1,2,3,4,5]}
//! Server -> Client: {"type":"error","seq":3,"ts":1234567892,"code":"invalid_dice","message":"must roll exactly 6 dice, got 5","score":0}
//! ```
//!
//! # Testing
//!
//! Connect to the adapter using netcat for manual testing:
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"ts":0,"client":{"name":"test","version":"1.0.0"},"protocol_version":"1.0.0"}
//! {"type":"score","seq":2,"ts":0,"dice":[1,1,1,5,5,5]}
//! ```

pub mod protocol;
pub mod server;

pub use farkle_core as core;
pub use farkle_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use server::*;
