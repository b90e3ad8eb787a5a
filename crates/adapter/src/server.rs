//! TCP server for the remote adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, watch, RwLock};

use crate::protocol::*;
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};

const SEQ_NOT_INCREASING: &str = "seq must be strictly increasing";
const QUEUE_FULL: &str = "Command queue is full";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_pending_commands: usize,
    pub log_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            max_pending_commands: 10,
            log_path: None,
        }
    }
}

impl ServerConfig {
    /// Create from `QUIZ_AI_*` environment variables. Unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("QUIZ_AI_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = lookup("QUIZ_AI_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_commands = lookup("QUIZ_AI_MAX_PENDING")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(defaults.max_pending_commands)
            .max(1);
        let log_path = lookup("QUIZ_AI_LOG_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            host,
            port,
            max_pending_commands,
            log_path,
        }
    }

    /// Check if AI control is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("QUIZ_AI_DISABLED")
            .map(|v| is_truthy(&v))
            .unwrap_or(false)
    }
}

fn is_truthy(v: &str) -> bool {
    let v = v.trim();
    v == "1" || v.eq_ignore_ascii_case("true")
}

/// Connection summary for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdapterStatus {
    pub client_count: u16,
    pub streaming_count: u16,
    pub controller_id: Option<usize>,
}

/// Shared server state
pub struct ServerState {
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<usize>>,
    status_tx: Option<watch::Sender<AdapterStatus>>,
}

impl ServerState {
    fn new(status_tx: Option<watch::Sender<AdapterStatus>>) -> Self {
        Self {
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
            status_tx,
        }
    }

    async fn publish_status(&self) {
        let Some(tx) = self.status_tx.as_ref() else {
            return;
        };
        let controller_id = *self.controller.read().await;
        let clients = self.clients.read().await;
        let handshaken = clients.iter().filter(|c| c.handshaken);
        let status = AdapterStatus {
            client_count: handshaken.clone().count() as u16,
            streaming_count: handshaken.filter(|c| c.stream_events).count() as u16,
            controller_id,
        };
        let _ = tx.send(status);
    }

    async fn is_handshaken(&self, client_id: usize) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| c.handshaken)
            .unwrap_or(false)
    }

    /// Accept `seq` only if it is strictly greater than the last one seen.
    async fn check_and_update_seq(&self, client_id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return true;
        };

        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: usize,
    pub addr: SocketAddr,
    pub is_controller: bool,
    pub stream_events: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<ClientOutbound>,
}

#[derive(Debug, Clone)]
pub enum ClientOutbound {
    Line(String),
    Welcome(WelcomeMessage),
    Error(ErrorMessage),
}

/// Start the TCP server
///
/// Runs until the listener fails. `ready_tx` receives the bound address,
/// which is how tests discover a port-0 listener.
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    status_tx: Option<watch::Sender<AdapterStatus>>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let wire_log_tx = config.log_path.clone().map(spawn_wire_log);

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let bound = listener.local_addr()?;
    println!("[Adapter] TCP server listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(status_tx));
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let clients = state.clients.read().await;
                match msg {
                    OutboundMessage::ToClient { client_id, line } => {
                        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                            let _ = c.tx.send(ClientOutbound::Line(line));
                        }
                    }
                    OutboundMessage::Broadcast { line } => {
                        for c in clients.iter().filter(|c| c.handshaken && c.stream_events) {
                            let _ = c.tx.send(ClientOutbound::Line(line.clone()));
                        }
                    }
                }
            }
        });
    }

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        println!("[Adapter] Client {} connected from {}", client_id, addr);

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        let wire_log_tx = wire_log_tx.clone();

        tokio::spawn(async move {
            if let Err(e) =
                handle_client(socket, addr, client_id, &state, command_tx, wire_log_tx).await
            {
                eprintln!("[Adapter] Client {} error: {}", client_id, e);
            }
            remove_client(&state, client_id).await;
            println!("[Adapter] Client {} disconnected", client_id);
        });
    }
}

/// Append every wire line to `path`, one JSON document per line.
fn spawn_wire_log(path: String) -> mpsc::UnboundedSender<Vec<u8>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(e) => {
                eprintln!("[Adapter] Cannot open wire log {}: {}", path, e);
                return;
            }
        };

        while let Some(mut bytes) = rx.recv().await {
            bytes.push(b'\n');
            if file.write_all(&bytes).await.is_err() {
                break;
            }
        }

        let _ = file.flush().await;
    });
    tx
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: &ServerState,
    command_tx: mpsc::Sender<InboundCommand>,
    wire_log_tx: Option<mpsc::UnboundedSender<Vec<u8>>>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<ClientOutbound>();

    state.clients.write().await.push(ClientHandle {
        id: client_id,
        addr,
        is_controller: false,
        stream_events: false,
        handshaken: false,
        last_seq: None,
        tx: tx.clone(),
    });

    let wire_log_tx_out = wire_log_tx.clone();

    // Writer task: serializes outbound messages and flushes one line each.
    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        while let Some(msg) = rx.recv().await {
            buf.clear();
            let encoded = match msg {
                ClientOutbound::Line(line) => {
                    buf.extend_from_slice(line.as_bytes());
                    Ok(())
                }
                ClientOutbound::Welcome(welcome) => serde_json::to_writer(&mut buf, &welcome),
                ClientOutbound::Error(err) => serde_json::to_writer(&mut buf, &err),
            };
            if encoded.is_err() {
                continue;
            }
            if let Some(log) = wire_log_tx_out.as_ref() {
                let _ = log.send(buf.clone());
            }

            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() || writer.flush().await.is_err() {
                break;
            }
        }
    });

    let reply_error = |seq: u64, code: ErrorCode, message: &str| {
        let _ = tx.send(ClientOutbound::Error(create_error(seq, code, message)));
    };

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }

        let raw_line = line.trim_end_matches(['\n', '\r']);
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(log) = wire_log_tx.as_ref() {
            let _ = log.send(raw_line.as_bytes().to_vec());
        }

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, hello.seq).await
                {
                    reply_error(hello.seq, ErrorCode::InvalidCommand, SEQ_NOT_INCREASING);
                    continue;
                }

                if !hello.is_compatible() {
                    reply_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    );
                    break;
                }

                let (role, controller_id) = register_hello(state, client_id, &hello).await;
                let welcome = create_welcome(
                    hello.seq,
                    client_id as u64,
                    role,
                    controller_id.map(|id| id as u64),
                );
                let _ = tx.send(ClientOutbound::Welcome(welcome));

                // Streaming clients get the current state right after welcome.
                if hello.requested.stream_events
                    && command_tx
                        .try_send(InboundCommand {
                            client_id,
                            seq: hello.seq,
                            payload: InboundPayload::SnapshotRequest,
                        })
                        .is_err()
                {
                    eprintln!("[Adapter] Client {} observation dropped: queue full", client_id);
                    reply_error(hello.seq, ErrorCode::Backpressure, QUEUE_FULL);
                }

                state.publish_status().await;
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if !state.is_handshaken(client_id).await {
                    let message = "Send hello before command";
                    reply_error(cmd.seq, ErrorCode::HandshakeRequired, message);
                    continue;
                }

                if !state.check_and_update_seq(client_id, cmd.seq).await {
                    reply_error(cmd.seq, ErrorCode::InvalidCommand, SEQ_NOT_INCREASING);
                    continue;
                }

                if *state.controller.read().await != Some(client_id) {
                    let message = "Only controller may send commands";
                    reply_error(cmd.seq, ErrorCode::NotController, message);
                    continue;
                }

                let mapped = match map_command(&cmd) {
                    Ok(c) => c,
                    Err((code, message)) => {
                        reply_error(cmd.seq, code, &message);
                        continue;
                    }
                };

                // Backpressure: bounded queue. The game loop acks once applied.
                if command_tx
                    .try_send(InboundCommand {
                        client_id,
                        seq: cmd.seq,
                        payload: InboundPayload::Command(mapped),
                    })
                    .is_err()
                {
                    reply_error(cmd.seq, ErrorCode::Backpressure, QUEUE_FULL);
                }
            }

            Ok(ParsedMessage::Unknown(unknown)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, unknown.seq).await
                {
                    reply_error(unknown.seq, ErrorCode::InvalidCommand, SEQ_NOT_INCREASING);
                    continue;
                }
                reply_error(unknown.seq, ErrorCode::InvalidCommand, "Unknown message type");
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                reply_error(seq, ErrorCode::InvalidCommand, &format!("JSON parse error: {}", e));
            }
        }
    }

    // The writer drains pending lines (e.g. a protocol_mismatch error) and
    // exits once the registry entry holding the last sender is removed.
    drop(write_task);
    Ok(())
}

/// Mark a client handshaken, assign its role and record its capabilities.
async fn register_hello(
    state: &ServerState,
    client_id: usize,
    hello: &HelloMessage,
) -> (AssignedRole, Option<usize>) {
    let mut controller = state.controller.write().await;
    let mut clients = state.clients.write().await;

    if controller.is_none() {
        *controller = Some(client_id);
        println!("[Adapter] Client {} is now controller", client_id);
    }

    let is_controller = *controller == Some(client_id);
    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
        client.handshaken = true;
        client.last_seq = Some(hello.seq);
        client.is_controller = is_controller;
        client.stream_events = hello.requested.stream_events;
    }

    let role = if is_controller {
        AssignedRole::Controller
    } else {
        AssignedRole::Observer
    };
    (role, *controller)
}

/// Remove a client and promote the lowest remaining id if it held control.
async fn remove_client(state: &ServerState, client_id: usize) {
    {
        let mut controller = state.controller.write().await;
        let mut clients = state.clients.write().await;

        clients.retain(|c| c.id != client_id);

        if *controller == Some(client_id) {
            let next_id = clients.iter().filter(|c| c.handshaken).map(|c| c.id).min();
            *controller = next_id;
            match next_id {
                Some(new_id) => {
                    if let Some(c) = clients.iter_mut().find(|c| c.id == new_id) {
                        c.is_controller = true;
                    }
                    println!("[Adapter] Client {} promoted to controller", new_id);
                }
                None => println!("[Adapter] Controller {} released", client_id),
            }
        }
    }
    state.publish_status().await;
}

/// Map a protocol command into a game-loop command.
fn map_command(cmd: &CommandMessage) -> Result<ClientCommand, (ErrorCode, String)> {
    match cmd.action {
        CommandAction::Answer => {
            let Some(value) = cmd.value.as_ref() else {
                return Err((ErrorCode::InvalidCommand, "Missing value".to_string()));
            };
            let value =
                parse_answer_value(value).map_err(|e| (ErrorCode::from(&e), e.to_string()))?;
            Ok(ClientCommand::Answer {
                value,
                round_id: cmd.round_id,
            })
        }
        CommandAction::Replay => Ok(ClientCommand::Replay),
    }
}
