//! QuizView: maps a `SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::SessionSnapshot;
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::SessionPhase;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Remote-control status shown under the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteStatusView {
    pub client_count: u16,
    pub controller_id: Option<usize>,
    pub streaming_count: u16,
}

const PANEL_W: u16 = 44;
const PANEL_H: u16 = 13;

const BG: Rgb = Rgb::new(24, 24, 32);
const TITLE: CellStyle = CellStyle::fg(Rgb::new(240, 220, 80)).on(BG).bold();
const LABEL: CellStyle = CellStyle::fg(Rgb::new(220, 220, 220)).on(BG).bold();
const VALUE: CellStyle = CellStyle::fg(Rgb::new(200, 200, 200)).on(BG);
const HINT: CellStyle = CellStyle::fg(Rgb::new(140, 140, 150)).on(BG).dim();
const QUESTION: CellStyle = CellStyle::fg(Rgb::new(255, 255, 255)).on(BG).bold();
const BAR_FULL: CellStyle = CellStyle::fg(Rgb::new(100, 220, 120)).on(BG);
const BAR_LOW: CellStyle = CellStyle::fg(Rgb::new(220, 80, 80)).on(BG);
const BAR_EMPTY: CellStyle = CellStyle::fg(Rgb::new(70, 70, 80)).on(BG).dim();
const BORDER: CellStyle = CellStyle::fg(Rgb::new(200, 200, 200));
const ALERT: CellStyle = CellStyle::fg(Rgb::new(255, 120, 120)).on(BG).bold();

/// Renders the quiz panel centered in the viewport.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizView;

impl QuizView {
    pub fn new() -> Self {
        Self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &SessionSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with_remote(snap, None, viewport, fb);
    }

    pub fn render_into_with_remote(
        &self,
        snap: &SessionSnapshot,
        remote: Option<&RemoteStatusView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let w = PANEL_W.min(viewport.width);
        let h = PANEL_H.min(viewport.height);
        let x0 = viewport.width.saturating_sub(w) / 2;
        let y0 = viewport.height.saturating_sub(h) / 2;

        fb.fill_rect(x0, y0, w, h, ' ', VALUE);
        draw_border(fb, x0, y0, w, h, BORDER);

        let inner_x = x0 + 2;
        let inner_w = w.saturating_sub(4);

        fb.put_str_centered(x0, w, y0 + 1, "TRUE OR FALSE?", TITLE);
        draw_time_bar(fb, snap, inner_x, y0 + 2, inner_w);
        draw_stats(fb, snap, inner_x, y0 + 3, inner_w);

        match snap.phase {
            SessionPhase::Running => draw_round(fb, snap, x0, y0, w),
            SessionPhase::GameOver => {
                fb.put_str_centered(x0, w, y0 + 5, "GAME OVER", ALERT);
                let line = format!("final score {}", snap.stats.score);
                fb.put_str_centered(x0, w, y0 + 7, &line, QUESTION);
                fb.put_str_centered(x0, w, y0 + 9, "press R to play again", HINT);
            }
            SessionPhase::NotStarted => {
                fb.put_str_centered(x0, w, y0 + 6, "press R to start", HINT);
            }
        }

        if h >= PANEL_H {
            draw_remote_status(fb, remote, inner_x, y0 + h - 2);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    pub fn render_with_remote(
        &self,
        snap: &SessionSnapshot,
        remote: Option<&RemoteStatusView>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into_with_remote(snap, remote, viewport, &mut fb);
        fb
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_time_bar(fb: &mut FrameBuffer, snap: &SessionSnapshot, x: u16, y: u16, w: u16) {
    let percent = snap.clock.remaining_percent();
    let filled = ((w as u32) * percent / 100) as u16;
    let full = if percent <= 25 { BAR_LOW } else { BAR_FULL };
    for dx in 0..w {
        if dx < filled {
            fb.put_char(x + dx, y, '█', full);
        } else {
            fb.put_char(x + dx, y, '░', BAR_EMPTY);
        }
    }
}

fn draw_stats(fb: &mut FrameBuffer, snap: &SessionSnapshot, x: u16, y: u16, w: u16) {
    let end = fb.put_str(x, y, "SCORE ", LABEL);
    fb.put_i64(end, y, snap.stats.score as i64, VALUE);

    // Right-aligned "LEVEL n".
    let digits = decimal_width(snap.stats.level as i64);
    let level_x = (x + w).saturating_sub(6 + digits);
    let end = fb.put_str(level_x, y, "LEVEL ", LABEL);
    fb.put_i64(end, y, snap.stats.level as i64, VALUE);
}

fn draw_round(fb: &mut FrameBuffer, snap: &SessionSnapshot, x0: u16, y0: u16, w: u16) {
    let Some(round) = snap.round else {
        return;
    };

    let question = round.question().to_string();
    fb.put_str_centered(x0, w, y0 + 5, &question, QUESTION);

    let proposed = format!("= {}", round.hypothesis().displayed_value());
    fb.put_str_centered(x0, w, y0 + 7, &proposed, QUESTION);

    fb.put_str_centered(x0, w, y0 + 9, "[<-/T] TRUE    [->/F] FALSE", HINT);
}

fn draw_remote_status(fb: &mut FrameBuffer, remote: Option<&RemoteStatusView>, x: u16, y: u16) {
    let end = fb.put_str(x, y, "AI ", LABEL);
    let Some(st) = remote else {
        fb.put_str(end, y, "OFF", HINT);
        return;
    };

    let end = fb.put_str(end, y, "ON  C", VALUE);
    let end = fb.put_i64(end, y, st.client_count as i64, VALUE);
    let end = fb.put_str(end, y, " S", VALUE);
    let end = fb.put_i64(end, y, st.streaming_count as i64, VALUE);
    let end = fb.put_str(end, y, " CTRL ", VALUE);
    match st.controller_id {
        Some(id) => fb.put_i64(end, y, id as i64, VALUE),
        None => fb.put_str(end, y, "-", VALUE),
    };
}

fn decimal_width(value: i64) -> u16 {
    let mut n = value.unsigned_abs();
    let mut width = if value < 0 { 2 } else { 1 };
    while n >= 10 {
        n /= 10;
        width += 1;
    }
    width
}
