use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use lifemesh_core::{Frame, FrameSink, SinkEvent, TileStatus};
use ratatui::layout::{Constraint, Layout};
use tokio::time::{Interval, MissedTickBehavior};

use crate::widget::{FrameWidget, StatusLine};
use crate::Tui;

/// Full-screen terminal display paced to a target frame rate.
pub struct TerminalSink {
    tui: Tui,
    pacer: Interval,
}

impl TerminalSink {
    /// Takes over the terminal. Must be called inside a tokio runtime.
    pub fn new(target_fps: u64) -> Result<Self> {
        let mut tui = Tui::new()?;
        tui.init()?;
        let mut pacer = tokio::time::interval(frame_period(target_fps));
        pacer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Ok(Self { tui, pacer })
    }
}

/// Time budget of one frame; a zero rate is treated as one frame per second.
#[must_use]
pub fn frame_period(target_fps: u64) -> Duration {
    Duration::from_micros(1_000_000 / target_fps.max(1))
}

/// Keyboard binding for the display.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<SinkEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(SinkEvent::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SinkEvent::Quit)
        }
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => Some(SinkEvent::TurnKnob(1)),
        KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Down => Some(SinkEvent::TurnKnob(-1)),
        _ => None,
    }
}

#[async_trait]
impl FrameSink for TerminalSink {
    fn present(&mut self, frame: &Frame, status: &TileStatus) -> Result<()> {
        self.tui.terminal.draw(|f| {
            let [picture, footer] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(f.area());
            f.render_widget(FrameWidget::new(frame), picture);
            f.render_widget(StatusLine::new(status), footer);
        })?;
        Ok(())
    }

    async fn wait_for_frame(&mut self) {
        self.pacer.tick().await;
    }

    fn poll_events(&mut self) -> Result<Vec<SinkEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                events.extend(map_key(key));
            }
        }
        Ok(events)
    }

    fn finish(&mut self) -> Result<()> {
        tracing::debug!("restoring terminal");
        self.tui.exit()
    }
}
