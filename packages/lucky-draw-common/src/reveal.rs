//! Step machine for revealing an already-final winner list one by one.
//!
//! The caller owns the clock: each call to [`RevealSequence::next_step`]
//! returns how long to hold the step before asking for the next one. The
//! sequence never looks at or changes draw state.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    Countdown,
    Reveal,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealConfig {
    pub enabled: bool,
    /// Time budget per winner in milliseconds
    pub speed_ms: u64,
    /// Replacement batches are shown at once
    pub is_replacement: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            speed_ms: 2000,
            is_replacement: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealStep {
    pub phase: RevealPhase,
    pub countdown: Option<u8>,
    /// Index of the winner just revealed
    pub index: Option<usize>,
    pub hold_ms: u64,
}

const COUNTDOWN_FROM: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealSequence {
    total: usize,
    config: RevealConfig,
    phase: RevealPhase,
    countdown: Option<u8>,
    current_index: Option<usize>,
    next_index: usize,
    paused: bool,
}

impl RevealSequence {
    pub fn new(total: usize, config: RevealConfig) -> Self {
        let mut sequence = Self {
            total,
            config,
            phase: RevealPhase::Idle,
            countdown: None,
            current_index: None,
            next_index: 0,
            paused: false,
        };
        sequence.reset();
        sequence
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn countdown(&self) -> Option<u8> {
        self.countdown
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, RevealPhase::Countdown | RevealPhase::Reveal)
    }

    /// Number of winners visible so far.
    pub fn revealed(&self) -> usize {
        self.current_index.map_or(0, |i| i + 1)
    }

    pub fn revealed_slice<'a, T>(&self, winners: &'a [T]) -> &'a [T] {
        &winners[..self.revealed().min(winners.len())]
    }

    /// Advance one step. `None` once complete, or while paused.
    pub fn next_step(&mut self) -> Option<RevealStep> {
        if self.paused || self.phase == RevealPhase::Complete {
            return None;
        }
        if self.total == 0 {
            return None;
        }

        match (self.phase, self.countdown) {
            (RevealPhase::Countdown, Some(tick)) if tick > 1 => {
                self.countdown = Some(tick - 1);
                Some(self.step(self.config.speed_ms.saturating_mul(3) / 10))
            }
            (RevealPhase::Countdown, _) => {
                self.phase = RevealPhase::Reveal;
                self.countdown = None;
                self.current_index = Some(self.next_index);
                self.next_index += 1;
                Some(self.step(self.config.speed_ms.saturating_mul(4) / 10))
            }
            _ if self.next_index >= self.total => {
                self.phase = RevealPhase::Complete;
                self.countdown = None;
                None
            }
            _ => {
                self.phase = RevealPhase::Countdown;
                self.countdown = Some(COUNTDOWN_FROM);
                Some(self.step(self.config.speed_ms.saturating_mul(3) / 10))
            }
        }
    }

    pub fn pause(&mut self) {
        if self.is_animating() || self.phase == RevealPhase::Idle {
            self.paused = true;
        }
    }

    /// Continue from the next unrevealed winner. An interrupted countdown
    /// starts over.
    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        if self.phase == RevealPhase::Countdown {
            self.phase = RevealPhase::Idle;
            self.countdown = None;
        }
    }

    pub fn reset(&mut self) {
        self.paused = false;
        self.countdown = None;
        self.next_index = 0;

        let instant = !self.config.enabled || self.config.is_replacement;
        if instant && self.total > 0 {
            self.phase = RevealPhase::Complete;
            self.current_index = Some(self.total - 1);
            self.next_index = self.total;
        } else {
            self.phase = RevealPhase::Idle;
            self.current_index = None;
        }
    }

    fn step(&self, hold_ms: u64) -> RevealStep {
        RevealStep {
            phase: self.phase,
            countdown: self.countdown,
            index: self.current_index.filter(|_| self.phase == RevealPhase::Reveal),
            hold_ms,
        }
    }
}
