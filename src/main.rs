//! Terminal quiz runner (default binary).
//!
//! It uses crossterm for input and the framebuffer-based renderer
//! (no widget toolkit). A session starts as soon as the screen is up.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use tui_quiz::adapter::Adapter;
use tui_quiz::core::{QuizError, QuizSession};
use tui_quiz::input::{handle_key_event, should_quit};
use tui_quiz::term::{
    FrameBuffer, QuizView, RemoteStatusView, RenderThrottle, TerminalRenderer, Viewport,
};
use tui_quiz::types::{QuizAction, FRAME_MS, STATIC_REDRAW_MS};

/// Runner settings from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunConfig {
    seed: u32,
}

impl RunConfig {
    /// `QUIZ_SEED` if it parses as u32, otherwise a clock-derived seed.
    fn from_env() -> Self {
        let seed = std::env::var("QUIZ_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(clock_seed);
        Self { seed }
    }
}

fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    (nanos as u32) ^ ((nanos >> 32) as u32)
}

fn main() -> Result<()> {
    let config = RunConfig::from_env();
    let mut adapter = Adapter::start_from_env();

    let mut term = TerminalRenderer::new();
    let result = term.enter().and_then(|_| run(&mut term, config, adapter.as_mut()));

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(
    term: &mut TerminalRenderer,
    config: RunConfig,
    mut adapter: Option<&mut Adapter>,
) -> Result<()> {
    let mut session = QuizSession::new(config.seed);
    session.start_session()?;

    let view = QuizView::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut throttle = RenderThrottle::new(STATIC_REDRAW_MS);

    let started = Instant::now();
    let mut last_advance = Instant::now();
    let frame = Duration::from_millis(FRAME_MS as u64);

    loop {
        // Input.
        if event::poll(frame)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        apply_local_action(&mut session, action)?;
                    }
                }
                Event::Resize(_, _) => {
                    term.invalidate();
                    throttle.invalidate();
                }
                _ => {}
            }
        }

        // Countdown.
        let now = Instant::now();
        let elapsed_ms = now.duration_since(last_advance).as_millis().min(u32::MAX as u128) as u32;
        last_advance = now;
        session.advance(elapsed_ms);

        // Remote commands.
        if let Some(adapter) = adapter.as_deref_mut() {
            while let Some(cmd) = adapter.try_recv() {
                adapter.handle(&mut session, cmd);
            }
        }

        let events = session.take_events();
        if let Some(adapter) = adapter.as_deref_mut() {
            adapter.publish_events(&events);
        }
        let snap = session.snapshot();

        // Render.
        let remote = adapter.as_deref().map(|a| {
            let st = a.status();
            RemoteStatusView {
                client_count: st.client_count,
                controller_id: st.controller_id,
                streaming_count: st.streaming_count,
            }
        });
        let now_ms = started.elapsed().as_millis() as u64;
        if throttle.should_render(now_ms, snap.fingerprint() ^ remote_fingerprint(remote)) {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            view.render_into_with_remote(&snap, remote.as_ref(), Viewport::new(w, h), &mut fb);
            term.draw_swap(&mut fb)?;
        }
    }
}

/// Apply a key action. Verdicts outside a running session are ignored.
fn apply_local_action(session: &mut QuizSession, action: QuizAction) -> Result<()> {
    let result = match action.verdict() {
        Some(guess) => session.submit_verdict(guess),
        None => session.replay(),
    };
    match result {
        Ok(_) | Err(QuizError::InvalidState { .. }) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn remote_fingerprint(remote: Option<RemoteStatusView>) -> u64 {
    match remote {
        None => 0,
        Some(st) => {
            let ctrl = st.controller_id.map(|id| id as u64 + 1).unwrap_or(0);
            ((st.client_count as u64) << 48) | ((st.streaming_count as u64) << 32) | ctrl
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_quiz::types::SessionPhase;

    #[test]
    fn verdict_after_game_over_is_ignored() {
        let mut session = QuizSession::new(8);
        session.start_session().unwrap();
        session.advance(20_000);
        assert_eq!(session.phase(), SessionPhase::GameOver);

        apply_local_action(&mut session, QuizAction::AnswerTrue).unwrap();
        assert_eq!(session.phase(), SessionPhase::GameOver);

        apply_local_action(&mut session, QuizAction::Replay).unwrap();
        assert_eq!(session.phase(), SessionPhase::Running);
    }

    #[test]
    fn remote_fingerprint_distinguishes_status() {
        let a = RemoteStatusView {
            client_count: 1,
            controller_id: Some(1),
            streaming_count: 0,
        };
        let b = RemoteStatusView {
            controller_id: None,
            ..a
        };
        assert_ne!(remote_fingerprint(Some(a)), remote_fingerprint(Some(b)));
        assert_ne!(remote_fingerprint(None), remote_fingerprint(Some(b)));
    }
}
