//! Protocol module - JSON message types for the remote adapter
//!
//! Line-delimited JSON. Every message has: type, seq (sequence number),
//! ts (timestamp in ms).

use serde::{Deserialize, Serialize};

use crate::core::{
    ClockState, EventRecord, QuizError, Round, SessionEvent, SessionSnapshot, SessionStats,
};
use crate::types::{Operator, SessionPhase, SESSION_DURATION_SECS};

/// Protocol version announced in `welcome`. Clients must share the major version.
pub const PROTOCOL_VERSION: &str = "1.0.0";
pub const GAME_ID: &str = "tui-quiz";

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HelloType {
    #[default]
    #[serde(rename = "hello")]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CommandType {
    #[default]
    #[serde(rename = "command")]
    Command,
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
    #[serde(default)]
    pub requested: RequestedCapabilities,
}

impl HelloMessage {
    /// Whether the client speaks a compatible protocol (same major version).
    pub fn is_compatible(&self) -> bool {
        let major = |v: &str| v.trim().split('.').next().map(str::to_owned);
        major(&self.protocol_version) == major(PROTOCOL_VERSION)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    #[serde(default)]
    pub stream_events: bool,
}

/// Command message (controller only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub ts: u64,
    pub action: CommandAction,
    /// Verdict for `answer`: a JSON boolean or the strings "true"/"false".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Round the verdict refers to; a mismatch is rejected as `stale_round`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandAction {
    Answer,
    Replay,
}

impl<'de> Deserialize<'de> for CommandAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("answer") {
            Ok(Self::Answer)
        } else if s.eq_ignore_ascii_case("replay") {
            Ok(Self::Replay)
        } else {
            Err(serde::de::Error::custom("unknown action"))
        }
    }
}

impl Serialize for CommandAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            CommandAction::Answer => serializer.serialize_str("answer"),
            CommandAction::Replay => serializer.serialize_str("replay"),
        }
    }
}

/// Interpret the `value` of an `answer` command.
pub fn parse_answer_value(value: &serde_json::Value) -> Result<bool, QuizError> {
    match value {
        serde_json::Value::Bool(b) => Ok(*b),
        serde_json::Value::String(s) => crate::core::parse_verdict(s),
        other => Err(QuizError::UnrecognizedInput(other.to_string())),
    }
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "event")]
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    InvalidCommand,
    ProtocolMismatch,
    NotController,
    Backpressure,
    InvalidState,
    UnrecognizedInput,
    StaleRound,
}

impl From<&QuizError> for ErrorCode {
    fn from(err: &QuizError) -> Self {
        match err {
            QuizError::InvalidArgument { .. } => ErrorCode::InvalidCommand,
            QuizError::InvalidState { .. } => ErrorCode::InvalidState,
            QuizError::UnrecognizedInput(_) => ErrorCode::UnrecognizedInput,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignedRole {
    Controller,
    Observer,
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
    pub role: AssignedRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_id: Option<u64>,
    pub game_id: String,
    pub duration_secs: u32,
}

/// Acknowledgment, sent after a command has been applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
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
}

/// One session event, broadcast to streaming clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub msg_type: EventType,
    pub seq: u64,
    pub ts: u64,
    pub episode_id: u32,
    /// Id of the round that is current once the event has been applied.
    pub round_id: u32,
    pub event: EventPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    SessionStarted {
        stats: StatsSnapshot,
        round: RoundSnapshot,
        clock: ClockSnapshot,
    },
    RoundAdvanced {
        stats: StatsSnapshot,
        round: RoundSnapshot,
        judged_correctly: bool,
    },
    Progress {
        elapsed_secs: u32,
        duration_secs: u32,
    },
    GameOver {
        stats: StatsSnapshot,
    },
}

impl From<&SessionEvent> for EventPayload {
    fn from(event: &SessionEvent) -> Self {
        match *event {
            SessionEvent::SessionStarted {
                stats,
                ref round,
                clock,
            } => EventPayload::SessionStarted {
                stats: stats.into(),
                round: round.into(),
                clock: clock.into(),
            },
            SessionEvent::RoundAdvanced {
                stats,
                ref round,
                judged_correctly,
            } => EventPayload::RoundAdvanced {
                stats: stats.into(),
                round: round.into(),
                judged_correctly,
            },
            SessionEvent::Progress {
                elapsed_secs,
                duration_secs,
            } => EventPayload::Progress {
                elapsed_secs,
                duration_secs,
            },
            SessionEvent::GameOver { stats } => EventPayload::GameOver {
                stats: stats.into(),
            },
        }
    }
}

/// Full session state, sent on request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub phase: PhaseLower,
    pub playable: bool,
    pub episode_id: u32,
    pub round_id: u32,
    pub stats: StatsSnapshot,
    pub clock: ClockSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<RoundSnapshot>,
    pub state_hash: StateHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub score: u32,
    pub level: u32,
}

impl From<SessionStats> for StatsSnapshot {
    fn from(value: SessionStats) -> Self {
        Self {
            score: value.score,
            level: value.level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub elapsed_secs: u32,
    pub duration_secs: u32,
    pub remaining_secs: u32,
    pub is_expired: bool,
}

impl From<ClockState> for ClockSnapshot {
    fn from(value: ClockState) -> Self {
        Self {
            elapsed_secs: value.elapsed_secs(),
            duration_secs: value.duration_secs(),
            remaining_secs: value.remaining_secs(),
            is_expired: value.is_expired(),
        }
    }
}

/// The visible part of a round. Whether the proposal is correct is not sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub left: i64,
    pub op: OperatorLower,
    pub right: i64,
    pub question: String,
    pub displayed_value: i64,
}

impl From<&Round> for RoundSnapshot {
    fn from(round: &Round) -> Self {
        let q = round.question();
        Self {
            left: q.left(),
            op: q.op().into(),
            right: q.right(),
            question: q.to_string(),
            displayed_value: round.hypothesis().displayed_value(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorLower {
    Add,
    Sub,
    Mul,
}

impl From<Operator> for OperatorLower {
    fn from(value: Operator) -> Self {
        match value {
            Operator::Add => Self::Add,
            Operator::Sub => Self::Sub,
            Operator::Mul => Self::Mul,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseLower {
    NotStarted,
    Running,
    GameOver,
}

impl From<SessionPhase> for PhaseLower {
    fn from(value: SessionPhase) -> Self {
        match value {
            SessionPhase::NotStarted => Self::NotStarted,
            SessionPhase::Running => Self::Running,
            SessionPhase::GameOver => Self::GameOver,
        }
    }
}

/// Deterministic state hash serialized as 16 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&format_args!("{:016x}", self.0))
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        u64::from_str_radix(s.trim(), 16)
            .map(StateHash)
            .map_err(|_| serde::de::Error::custom("invalid hex"))
    }
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct Header {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let header = serde_json::from_str::<Header>(json)?;
            match header.msg_type.as_deref() {
                Some("hello") | Some("command") => Err(e),
                _ => Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq: header.seq.unwrap_or(0),
                })),
            }
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Best-effort `seq` recovery from a line that failed to parse.
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    rest[..end].parse::<u64>().ok()
}

// ============== Utility Functions ==============

/// Create a hello message that asks for the event stream
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
        requested: RequestedCapabilities {
            stream_events: true,
        },
    }
}

pub fn create_answer(seq: u64, value: bool, round_id: Option<u32>) -> CommandMessage {
    CommandMessage {
        msg_type: CommandType::Command,
        seq,
        ts: current_timestamp_ms(),
        action: CommandAction::Answer,
        value: Some(serde_json::Value::Bool(value)),
        round_id,
    }
}

pub fn create_replay(seq: u64) -> CommandMessage {
    CommandMessage {
        msg_type: CommandType::Command,
        seq,
        ts: current_timestamp_ms(),
        action: CommandAction::Replay,
        value: None,
        round_id: None,
    }
}

/// Create a welcome message
pub fn create_welcome(
    seq: u64,
    client_id: u64,
    role: AssignedRole,
    controller_id: Option<u64>,
) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        client_id,
        role,
        controller_id,
        game_id: GAME_ID.to_string(),
        duration_secs: SESSION_DURATION_SECS,
    }
}

/// Create an acknowledgment
pub fn create_ack(seq: u64) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status: AckStatus::Ok,
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
    }
}

/// Build an event message, stamped with the ids recorded alongside the event
pub fn create_event(seq: u64, record: &EventRecord) -> EventMessage {
    EventMessage {
        msg_type: EventType::Event,
        seq,
        ts: current_timestamp_ms(),
        episode_id: record.episode_id,
        round_id: record.round_id,
        event: (&record.event).into(),
    }
}

/// Build an observation from a session snapshot
pub fn create_observation(seq: u64, snap: &SessionSnapshot) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        phase: snap.phase.into(),
        playable: snap.playable(),
        episode_id: snap.episode_id,
        round_id: snap.round_id,
        stats: snap.stats.into(),
        clock: snap.clock.into(),
        round: snap.round.as_ref().map(RoundSnapshot::from),
        state_hash: StateHash(snap.fingerprint()),
    }
}

/// Get current timestamp in milliseconds
pub(crate) fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QuizSession;

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"hello","seq":1,"ts":1234567890,"client":{"name":"bot","version":"1.0.0"},"protocol_version":"1.0.0","requested":{"stream_events":true}}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => {
                assert_eq!(msg.msg_type, HelloType::Hello);
                assert_eq!(msg.seq, 1);
                assert_eq!(msg.client.name, "bot");
                assert!(msg.requested.stream_events);
                assert!(msg.is_compatible());
            }
            _ => panic!("Expected Hello message"),
        }
    }

    #[test]
    fn test_hello_without_requested_defaults_to_no_stream() {
        let json = r#"{"type":"hello","seq":1,"ts":0,"client":{"name":"a","version":"0"},"protocol_version":"1.2"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => {
                assert!(!msg.requested.stream_events);
                assert!(msg.is_compatible());
            }
            _ => panic!("Expected Hello message"),
        }
    }

    #[test]
    fn test_protocol_major_must_match() {
        let hello = create_hello(1, "x", "2.0.0");
        assert!(!hello.is_compatible());
        let hello = create_hello(1, "x", "1.9.3");
        assert!(hello.is_compatible());
    }

    #[test]
    fn test_parse_answer_command() {
        let json = r#"{"type":"command","seq":2,"ts":1,"action":"answer","value":true,"round_id":3}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Command(msg) => {
                assert_eq!(msg.action, CommandAction::Answer);
                assert_eq!(msg.value, Some(serde_json::Value::Bool(true)));
                assert_eq!(msg.round_id, Some(3));
            }
            _ => panic!("Expected Command message"),
        }
    }

    #[test]
    fn test_parse_replay_command_case_insensitive() {
        let json = r#"{"type":"command","seq":2,"ts":1,"action":"Replay"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Command(msg) => {
                assert_eq!(msg.action, CommandAction::Replay);
                assert!(msg.value.is_none());
            }
            _ => panic!("Expected Command message"),
        }
    }

    #[test]
    fn test_unknown_action_is_parse_error() {
        let json = r#"{"type":"command","seq":2,"ts":1,"action":"skip"}"#;
        assert!(parse_message(json).is_err());
    }

    #[test]
    fn test_unknown_type_keeps_seq() {
        let json = r#"{"type":"control","seq":9,"ts":1}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Unknown(u) => assert_eq!(u.seq, 9),
            _ => panic!("Expected Unknown message"),
        }
    }

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"seq": 42, "x":"#), Some(42));
        assert_eq!(extract_seq_best_effort(r#"{"seq":"a"}"#), None);
        assert_eq!(extract_seq_best_effort("garbage"), None);
    }

    #[test]
    fn test_parse_answer_value() {
        use serde_json::json;
        assert_eq!(parse_answer_value(&json!(true)).unwrap(), true);
        assert_eq!(parse_answer_value(&json!("FALSE")).unwrap(), false);
        assert!(matches!(
            parse_answer_value(&json!("maybe")),
            Err(QuizError::UnrecognizedInput(_))
        ));
        assert!(matches!(
            parse_answer_value(&json!(1)),
            Err(QuizError::UnrecognizedInput(_))
        ));
    }

    #[test]
    fn test_error_code_wire_names() {
        let v = serde_json::to_value(create_error(5, ErrorCode::StaleRound, "x")).unwrap();
        assert_eq!(v["type"], "error");
        assert_eq!(v["code"], "stale_round");
        let v = serde_json::to_value(ErrorCode::HandshakeRequired).unwrap();
        assert_eq!(v, "handshake_required");
    }

    #[test]
    fn test_create_welcome() {
        let welcome = create_welcome(1, 7, AssignedRole::Controller, Some(7));
        let v = serde_json::to_value(&welcome).unwrap();
        assert_eq!(v["type"], "welcome");
        assert_eq!(v["role"], "controller");
        assert_eq!(v["client_id"], 7);
        assert_eq!(v["game_id"], "tui-quiz");
        assert_eq!(v["duration_secs"], 20);
        assert_eq!(v["protocol_version"], PROTOCOL_VERSION);
    }

    #[test]
    fn test_event_kinds_match_session_events() {
        let mut session = QuizSession::new(3);
        session.start_session().unwrap();
        session.submit_verdict(true).unwrap();
        session.on_tick();
        session.advance(20_000);

        for record in session.take_events() {
            let v = serde_json::to_value(create_event(1, &record)).unwrap();
            assert_eq!(v["type"], "event");
            assert_eq!(v["event"]["kind"], record.event.kind());
            assert_eq!(v["round_id"], record.round_id);
        }
    }

    #[test]
    fn test_event_ids_are_not_taken_from_later_state() {
        let mut session = QuizSession::new(3);
        session.start_session().unwrap();
        session.take_events();

        session.submit_verdict(true).unwrap();
        let next_round = session.round_id();
        session.replay().unwrap();

        let events: Vec<_> = session
            .take_events()
            .iter()
            .map(|r| serde_json::to_value(create_event(1, r)).unwrap())
            .collect();
        assert_eq!(events[0]["event"]["kind"], "round_advanced");
        assert_eq!(events[0]["episode_id"], 0);
        assert_eq!(events[0]["round_id"], next_round);
        assert_eq!(events[1]["event"]["kind"], "session_started");
        assert_eq!(events[1]["episode_id"], 1);
        assert_eq!(events[1]["round_id"], next_round + 1);
    }

    #[test]
    fn test_observation_fields() {
        let mut session = QuizSession::new(3);
        session.start_session().unwrap();
        let snap = session.snapshot();
        let obs = create_observation(4, &snap);
        let v = serde_json::to_value(&obs).unwrap();

        assert_eq!(v["type"], "observation");
        assert_eq!(v["phase"], "running");
        assert_eq!(v["playable"], true);
        assert_eq!(v["stats"]["score"], 0);
        assert_eq!(v["stats"]["level"], 1);
        assert_eq!(v["clock"]["remaining_secs"], 20);
        assert_eq!(v["round_id"], snap.round_id);
        assert!(v["round"].get("is_correct").is_none());
        assert_eq!(v["state_hash"].as_str().unwrap().len(), 16);

        let back: ObservationMessage = serde_json::from_value(v).unwrap();
        assert_eq!(back.state_hash, StateHash(snap.fingerprint()));
    }

    #[test]
    fn test_idle_observation_has_no_round() {
        let obs = create_observation(1, &SessionSnapshot::default());
        let v = serde_json::to_value(&obs).unwrap();
        assert_eq!(v["phase"], "not_started");
        assert!(v.get("round").is_none());
    }
}
