// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use crate::config::Config;
use crate::diag::Diagnostics;
use crate::error::StageError;
use crate::item::ItemId;
use crate::layout::{Controls, Layout, Viewport};
use crate::rain::RainEngine;
use crate::tone::Tone;
use crate::typewriter::Typewriter;

pub const REPLAY_REVEAL_DELAY: Duration = Duration::from_millis(2000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Typing,
    Waiting {
        rain_at: Instant,
    },
    Raining,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Click {
    Mute,
    Replay,
    Item(ItemId),
    Nothing,
}

pub struct Show {
    phase: Phase,
    message: String,
    typewriter: Typewriter,
    rain: RainEngine,
    delay_before_rain: Duration,
    layout: Layout,
    controls: Controls,
    muted: bool,
    replay_reveal_at: Option<Instant>,
    replay_visible: bool,
    tone: Box<dyn Tone>,
    diag: Diagnostics,
}

impl Show {
    pub fn new(
        cfg: &Config,
        viewport: Viewport,
        rng: StdRng,
        tone: Box<dyn Tone>,
        diag: Diagnostics,
    ) -> Self {
        let controls = Controls {
            mute: cfg.mute_control,
            replay: cfg.replay_control,
        };
        Self {
            phase: Phase::Idle,
            message: cfg.message.clone(),
            typewriter: Typewriter::new(&cfg.message, cfg.typing_speed),
            rain: RainEngine::new(cfg.rain.clone(), rng),
            delay_before_rain: cfg.delay_before_rain,
            layout: Layout::compute(viewport, controls),
            controls,
            muted: cfg.start_muted,
            replay_reveal_at: None,
            replay_visible: false,
            tone,
            diag,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    pub fn rain(&self) -> &RainEngine {
        &self.rain
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn replay_visible(&self) -> bool {
        self.replay_visible
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diag
    }

    /// Fails when there is nowhere to show the message; nothing is started.
    pub fn start(&mut self, now: Instant) -> Result<(), StageError> {
        self.layout.require_text()?;
        self.typewriter.start(now);
        self.phase = Phase::Typing;
        Ok(())
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.layout = Layout::compute(viewport, self.controls);
    }

    pub fn tick(&mut self, now: Instant) {
        if self.phase == Phase::Typing {
            if let Some(done_at) = self.typewriter.tick(now) {
                self.phase = Phase::Waiting {
                    rain_at: done_at + self.delay_before_rain,
                };
            }
        }

        if let Phase::Waiting { rain_at } = self.phase {
            if now >= rain_at {
                self.start_rain(rain_at);
            }
        }

        if self.rain.is_raining() {
            self.rain.tick(now);
        }

        if self.replay_reveal_at.is_some_and(|at| now >= at) {
            self.replay_reveal_at = None;
            self.replay_visible = true;
        }
    }

    fn start_rain(&mut self, now: Instant) {
        if !self.rain.start(now) {
            return;
        }
        self.phase = Phase::Raining;
        if self.controls.replay {
            self.replay_reveal_at = Some(now + REPLAY_REVEAL_DELAY);
        }
    }

    pub fn press_mute(&mut self) -> bool {
        if !self.controls.mute {
            return false;
        }
        self.muted = !self.muted;
        true
    }

    /// Inert while the control is hidden or absent.
    pub fn press_replay(&mut self, now: Instant) -> bool {
        if !self.controls.replay || !self.replay_visible {
            return false;
        }
        self.replay(now);
        true
    }

    pub fn replay(&mut self, now: Instant) {
        self.rain.stop();
        self.typewriter.stop();
        self.replay_visible = false;
        self.replay_reveal_at = None;
        self.phase = Phase::Idle;
        if let Err(e) = self.start(now) {
            self.diag.error(format!("replay: {e}"));
        }
    }

    pub fn pointer_moved(&mut self, col: u16, row: u16, now: Instant) -> usize {
        let p = self.layout.viewport.cell_center(col, row);
        self.rain.repel(self.layout.viewport, now, p)
    }

    pub fn click(&mut self, col: u16, row: u16, now: Instant) -> Click {
        if self.layout.mute_button.is_some_and(|r| r.contains(col, row)) && self.press_mute() {
            return Click::Mute;
        }
        if self
            .layout
            .replay_button
            .is_some_and(|r| r.contains(col, row))
            && self.press_replay(now)
        {
            return Click::Replay;
        }

        let p = self.layout.viewport.cell_center(col, row);
        match self.rain.toggle_glow_at(self.layout.viewport, now, p) {
            Some(id) => {
                self.pop();
                Click::Item(id)
            }
            None => Click::Nothing,
        }
    }

    fn pop(&mut self) {
        if self.muted {
            return;
        }
        if let Err(e) = self.tone.pop() {
            self.diag.warn(e.to_string());
        }
    }
}

#[cfg(test)]
impl Show {
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }
}
