//! Protocol module - JSON message types for the scoring adapter
//!
//! Line-delimited JSON. All messages have: type, seq (sequence number), ts (timestamp in ms).
//! Wire types live here so the scoring engine itself stays free of serde.

use serde::{Deserialize, Serialize};

use crate::core::{Dice, DiceError, ScoringResult};
use crate::types::{Combination, RollMode};

// ============== Client -> Server Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HelloType {
    #[serde(rename = "hello")]
    Hello,
}

impl Default for HelloType {
    fn default() -> Self {
        Self::Hello
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreType {
    #[serde(rename = "score")]
    Score,
}

impl Default for ScoreType {
    fn default() -> Self {
        Self::Score
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanContinueType {
    #[serde(rename = "can_continue")]
    CanContinue,
}

impl Default for CanContinueType {
    fn default() -> Self {
        Self::CanContinue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RulesType {
    #[serde(rename = "rules")]
    Rules,
}

impl Default for RulesType {
    fn default() -> Self {
        Self::Rules
    }
}

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Score a roll or a selection.
///
/// `dice` is kept as raw JSON so that non-integer faces are reported as
/// validation errors rather than parse failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ScoreType,
    pub seq: u64,
    pub ts: u64,
    #[serde(default)]
    pub dice: Vec<serde_json::Value>,
    #[serde(default)]
    pub mode: ModeName,
}

/// Ask whether dice set aside as scored let the turn continue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanContinueMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CanContinueType,
    pub seq: u64,
    pub ts: u64,
    #[serde(default)]
    pub dice: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: RulesType,
    pub seq: u64,
    pub ts: u64,
}

/// Wire name of a [`RollMode`]: `"roll"` (default) or `"selection"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModeName(pub RollMode);

impl<'de> Deserialize<'de> for ModeName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        RollMode::from_str(s)
            .map(ModeName)
            .ok_or_else(|| serde::de::Error::custom("invalid mode"))
    }
}

impl Serialize for ModeName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

/// Integer value of a JSON die, if it is one.
///
/// `3` and `3.0` are integers; `3.5`, `"3"`, `null` and floats beyond the
/// `i64` range (`1e300`) are not.
pub fn json_integer(value: &serde_json::Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    // 2^63, exactly representable; i64 covers [-2^63, 2^63).
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
    let f = value.as_f64()?;
    if f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

/// Validate JSON dice for the given mode.
pub fn parse_dice(values: &[serde_json::Value], mode: RollMode) -> Result<Dice, DiceError> {
    Dice::parse_with(values, mode, json_integer)
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreResultType {
    #[serde(rename = "score_result")]
    ScoreResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanContinueResultType {
    #[serde(rename = "can_continue_result")]
    CanContinueResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RulesResultType {
    #[serde(rename = "rules_result")]
    RulesResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "handshake_required")]
    HandshakeRequired,
    #[serde(rename = "protocol_mismatch")]
    ProtocolMismatch,
    #[serde(rename = "invalid_dice")]
    InvalidDice,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub capabilities: ServerCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub requests: [CapabilityRequest; 3],
    pub modes: [ModeName; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityRequest {
    #[serde(rename = "score")]
    Score,
    #[serde(rename = "can_continue")]
    CanContinue,
    #[serde(rename = "rules")]
    Rules,
}

/// Scored dice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResultMessage {
    #[serde(rename = "type")]
    pub msg_type: ScoreResultType,
    pub seq: u64,
    pub ts: u64,
    pub mode: ModeName,
    pub score: u32,
    pub combinations: Vec<String>,
    #[serde(rename = "used_dice")]
    pub used_dice: Vec<bool>,
    #[serde(rename = "is_farkle")]
    pub is_farkle: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanContinueResultMessage {
    #[serde(rename = "type")]
    pub msg_type: CanContinueResultType,
    pub seq: u64,
    pub ts: u64,
    #[serde(rename = "can_continue")]
    pub can_continue: bool,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesResultMessage {
    #[serde(rename = "type")]
    pub msg_type: RulesResultType,
    pub seq: u64,
    pub ts: u64,
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub name: String,
    pub points: u32,
}

impl From<Combination> for RuleEntry {
    fn from(value: Combination) -> Self {
        let name = match value {
            Combination::Singles { face, .. } => format!("Single {}", face),
            other => other.to_string(),
        };
        Self {
            name,
            points: value.points(),
        }
    }
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
    /// Present (and zero) when dice were rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

/// Any server reply.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Welcome(WelcomeMessage),
    ScoreResult(ScoreResultMessage),
    CanContinueResult(CanContinueResultMessage),
    RulesResult(RulesResultMessage),
    Error(ErrorMessage),
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "score")]
        Score(ScoreMessage),
        #[serde(rename = "can_continue")]
        CanContinue(CanContinueMessage),
        #[serde(rename = "rules")]
        Rules(RulesMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Score(m)) => Ok(ParsedMessage::Score(m)),
        Ok(InboundMessage::CanContinue(m)) => Ok(ParsedMessage::CanContinue(m)),
        Ok(InboundMessage::Rules(m)) => Ok(ParsedMessage::Rules(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct TypeOnly<'a> {
                #[serde(rename = "type")]
                #[serde(borrow)]
                msg_type: Option<&'a str>,
            }
            let msg_type = serde_json::from_str::<TypeOnly>(json)?
                .msg_type
                .unwrap_or("unknown");
            if !KNOWN_TYPES.contains(&msg_type) {
                #[derive(Debug, Deserialize)]
                struct SeqOnly {
                    seq: Option<u64>,
                }
                let seq = serde_json::from_str::<SeqOnly>(json)?.seq.unwrap_or(0);
                return Ok(ParsedMessage::Unknown(UnknownMessage { seq }));
            }
            Err(e)
        }
    }
}

const KNOWN_TYPES: [&str; 4] = ["hello", "score", "can_continue", "rules"];

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Score(ScoreMessage),
    CanContinue(CanContinueMessage),
    Rules(RulesMessage),
    Unknown(UnknownMessage),
}

impl ParsedMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ParsedMessage::Hello(m) => m.seq,
            ParsedMessage::Score(m) => m.seq,
            ParsedMessage::CanContinue(m) => m.seq,
            ParsedMessage::Rules(m) => m.seq,
            ParsedMessage::Unknown(m) => m.seq,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
    }
}

/// Create a score request
pub fn create_score(seq: u64, dice: &[i64], mode: RollMode) -> ScoreMessage {
    ScoreMessage {
        msg_type: ScoreType::Score,
        seq,
        ts: current_timestamp_ms(),
        dice: dice.iter().map(|&d| serde_json::Value::from(d)).collect(),
        mode: ModeName(mode),
    }
}

/// Create a welcome message
pub fn create_welcome(seq: u64, protocol_version: &str, client_id: u64) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        client_id,
        capabilities: ServerCapabilities {
            requests: [
                CapabilityRequest::Score,
                CapabilityRequest::CanContinue,
                CapabilityRequest::Rules,
            ],
            modes: [ModeName(RollMode::Roll), ModeName(RollMode::Selection)],
        },
    }
}

/// Create a score reply from an engine result
pub fn create_score_result(seq: u64, mode: RollMode, result: &ScoringResult) -> ScoreResultMessage {
    ScoreResultMessage {
        msg_type: ScoreResultType::ScoreResult,
        seq,
        ts: current_timestamp_ms(),
        mode: ModeName(mode),
        score: result.total,
        combinations: result.descriptions(),
        used_dice: result.used.to_vec(),
        is_farkle: result.farkle,
    }
}

pub fn create_can_continue_result(seq: u64, score: u32) -> CanContinueResultMessage {
    CanContinueResultMessage {
        msg_type: CanContinueResultType::CanContinueResult,
        seq,
        ts: current_timestamp_ms(),
        can_continue: score > 0,
        score,
    }
}

pub fn create_rules_result(seq: u64, rules: Vec<Combination>) -> RulesResultMessage {
    RulesResultMessage {
        msg_type: RulesResultType::RulesResult,
        seq,
        ts: current_timestamp_ms(),
        rules: rules.into_iter().map(RuleEntry::from).collect(),
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
        score: None,
    }
}

/// Create the zero-score error reply for rejected dice
pub fn create_dice_error(seq: u64, err: &DiceError) -> ErrorMessage {
    ErrorMessage {
        score: Some(0),
        ..create_error(seq, ErrorCode::InvalidDice, &err.to_string())
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
