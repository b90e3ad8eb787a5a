//! Adapter runtime integration.
//!
//! Bridges the sync game loop with the async TCP server. The game loop owns
//! the `QuizSession`; remote commands are applied there, one at a time, and
//! their acks, errors and the resulting events flow back through the server.

use serde::Serialize;
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, watch};

use crate::core::{EventRecord, QuizSession};
use crate::protocol::{
    create_ack, create_error, create_event, create_observation, ErrorCode,
};
use crate::server::{run_server, AdapterStatus, ServerConfig};

/// Command delivered to the game loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPayload {
    /// A streaming client just completed its hello and wants the current state.
    SnapshotRequest,
    Command(ClientCommand),
}

/// Command payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    Answer { value: bool, round_id: Option<u32> },
    Replay,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    /// Delivered to every client that requested the event stream.
    Broadcast { line: String },
}

/// Apply one remote command to the session.
pub fn apply_command(
    session: &mut QuizSession,
    command: &ClientCommand,
) -> Result<(), (ErrorCode, String)> {
    let result = match *command {
        ClientCommand::Answer { value, round_id } => {
            if let Some(id) = round_id {
                if session.phase().is_running() && id != session.round_id() {
                    let current = session.round_id();
                    return Err((
                        ErrorCode::StaleRound,
                        format!("round {} is no longer current (current is {})", id, current),
                    ));
                }
            }
            session.submit_verdict(value)
        }
        ClientCommand::Replay => session.replay(),
    };

    result
        .map(|_| ())
        .map_err(|e| (ErrorCode::from(&e), e.to_string()))
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    status_rx: watch::Receiver<AdapterStatus>,
    out_seq: u64,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns None if `QUIZ_AI_DISABLED` is set or the runtime cannot start.
    pub fn start_from_env() -> Option<Self> {
        if ServerConfig::is_disabled() {
            println!("[Adapter] AI control disabled (QUIZ_AI_DISABLED)");
            return None;
        }
        Self::start(ServerConfig::from_env())
    }

    pub fn start(config: ServerConfig) -> Option<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let (status_tx, status_rx) = watch::channel(AdapterStatus::default());

        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                eprintln!("[Adapter] Failed to create tokio runtime: {}", e);
                return None;
            }
        };
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, Some(status_tx), None).await {
                eprintln!("[Adapter] Server stopped: {}", e);
            }
        });

        Some(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            status_rx,
            out_seq: 0,
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    /// Latest connection summary published by the server.
    pub fn status(&self) -> AdapterStatus {
        *self.status_rx.borrow()
    }

    /// Handle one inbound command against the session and reply to its sender.
    ///
    /// Events produced by the command are left queued on the session for the
    /// caller to drain and pass to [`publish_events`](Self::publish_events).
    pub fn handle(&mut self, session: &mut QuizSession, cmd: InboundCommand) {
        match cmd.payload {
            InboundPayload::SnapshotRequest => {
                let seq = self.next_seq();
                let obs = create_observation(seq, &session.snapshot());
                self.send_to(cmd.client_id, &obs);
            }
            InboundPayload::Command(command) => match apply_command(session, &command) {
                Ok(()) => self.send_to(cmd.client_id, &create_ack(cmd.seq)),
                Err((code, message)) => {
                    self.send_to(cmd.client_id, &create_error(cmd.seq, code, &message))
                }
            },
        }
    }

    /// Broadcast drained session events to streaming clients.
    pub fn publish_events(&mut self, events: &[EventRecord]) {
        for record in events {
            let seq = self.next_seq();
            if let Some(line) = to_line(&create_event(seq, record)) {
                self.send(OutboundMessage::Broadcast { line });
            }
        }
    }

    fn send_to<T: Serialize>(&self, client_id: usize, msg: &T) {
        if let Some(line) = to_line(msg) {
            self.send(OutboundMessage::ToClient { client_id, line });
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.out_seq += 1;
        self.out_seq
    }
}

fn to_line<T: Serialize>(msg: &T) -> Option<String> {
    serde_json::to_string(msg).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionPhase;

    fn running_session() -> QuizSession {
        let mut session = QuizSession::new(2024);
        session.start_session().unwrap();
        session.take_events();
        session
    }

    #[test]
    fn test_answer_applies_verdict() {
        let mut session = running_session();
        let truth = session.round().unwrap().verdict();
        let id = session.round_id();

        apply_command(
            &mut session,
            &ClientCommand::Answer {
                value: truth,
                round_id: Some(id),
            },
        )
        .unwrap();
        assert_eq!(session.stats().score, 5);
        assert_eq!(session.round_id(), id + 1);
    }

    #[test]
    fn test_stale_round_is_rejected() {
        let mut session = running_session();
        let id = session.round_id();
        apply_command(
            &mut session,
            &ClientCommand::Answer {
                value: true,
                round_id: Some(id),
            },
        )
        .unwrap();
        let stats = session.stats();

        let err = apply_command(
            &mut session,
            &ClientCommand::Answer {
                value: true,
                round_id: Some(id),
            },
        )
        .unwrap_err();
        assert_eq!(err.0, ErrorCode::StaleRound);
        assert_eq!(session.stats(), stats);
        assert!(session.take_events().len() == 1);
    }

    #[test]
    fn test_local_verdict_then_remote_replay_keep_their_own_ids() {
        let mut session = running_session();
        let answered = session.round_id();

        // A key press and a remote replay handled in the same frame.
        session.submit_verdict(true).unwrap();
        apply_command(&mut session, &ClientCommand::Replay).unwrap();

        let events = session.take_events();
        let advanced = create_event(1, &events[0]);
        assert_eq!(events[0].event.kind(), "round_advanced");
        assert_eq!(advanced.episode_id, 0);
        assert_eq!(advanced.round_id, answered + 1);

        let started = create_event(2, &events[1]);
        assert_eq!(events[1].event.kind(), "session_started");
        assert_eq!(started.episode_id, 1);
        assert_eq!(started.round_id, session.round_id());
        assert_ne!(advanced.round_id, started.round_id);
    }

    #[test]
    fn test_answer_without_round_id_is_accepted() {
        let mut session = running_session();
        apply_command(
            &mut session,
            &ClientCommand::Answer {
                value: false,
                round_id: None,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_answer_after_game_over_is_invalid_state() {
        let mut session = running_session();
        session.advance(20_000);
        assert_eq!(session.phase(), SessionPhase::GameOver);

        let err = apply_command(
            &mut session,
            &ClientCommand::Answer {
                value: true,
                round_id: Some(1),
            },
        )
        .unwrap_err();
        assert_eq!(err.0, ErrorCode::InvalidState);
    }

    #[test]
    fn test_replay_restarts_from_game_over() {
        let mut session = running_session();
        session.advance(20_000);
        apply_command(&mut session, &ClientCommand::Replay).unwrap();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.episode_id(), 1);
    }

    #[test]
    fn test_answer_before_start_is_invalid_state() {
        let mut session = QuizSession::new(1);
        let err = apply_command(
            &mut session,
            &ClientCommand::Answer {
                value: true,
                round_id: None,
            },
        )
        .unwrap_err();
        assert_eq!(err.0, ErrorCode::InvalidState);
        assert!(err.1.contains("not_started"));
    }
}
