//! Adapter module - remote play via TCP socket with a JSON protocol
//!
//! Lets an external agent (a bot, a test harness, an alternate UI) answer
//! questions and follow the session over a TCP connection.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Streaming**: Clients that asked for `stream_events` get an
//!    `observation` right after `welcome`, then one `event` per session event
//! 5. **Commanding**: The controller sends `answer` / `replay` commands
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Handshake with client info and requested capabilities
//! - **command**: `answer` (with `value` and optional `round_id`) or `replay`
//!
//! ## Server → Client
//!
//! - **welcome**: Assigned client id and role, session duration
//! - **ack**: The command was applied
//! - **error**: Error response with code and message
//! - **event**: One session event (`session_started`, `round_advanced`,
//!   `progress`, `game_over`)
//! - **observation**: Full session snapshot with a stable `state_hash`
//!
//! # Environment Variables
//!
//! - `QUIZ_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `QUIZ_AI_PORT`: Port number (default: 7878)
//! - `QUIZ_AI_MAX_PENDING`: Command queue bound (default: 10)
//! - `QUIZ_AI_LOG_PATH`: Append every wire line to this file
//! - `QUIZ_AI_DISABLED`: Set to "1" or "true" to disable the adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1,"client":{"name":"bot","version":"0.1"},"protocol_version":"1.0.0","requested":{"stream_events":true}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":2,"protocol_version":"1.0.0","client_id":1,"role":"controller","controller_id":1,"game_id":"tui-quiz","duration_secs":20}
//! Server -> Client: {"type":"observation","seq":1,"ts":2,"phase":"running","round_id":1,...}
//! Client -> Server: {"type":"command","seq":2,"ts":3,"action":"answer","value":true,"round_id":1}
//! Server -> Client: {"type":"ack","seq":2,"ts":3,"status":"ok"}
//! Server -> Client: {"type":"event","seq":2,"ts":3,"episode_id":0,"round_id":2,"event":{"kind":"round_advanced",...}}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"ts":0,"client":{"name":"nc","version":"0"},"protocol_version":"1.0.0","requested":{"stream_events":true}}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use tui_quiz_core as core;
pub use tui_quiz_types as types;

pub use protocol::*;
pub use runtime::{
    apply_command, Adapter, ClientCommand, InboundCommand, InboundPayload, OutboundMessage,
};
pub use server::{run_server, AdapterStatus, ServerConfig};
