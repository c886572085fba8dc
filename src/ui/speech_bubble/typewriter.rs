// src/ui/speech_bubble/typewriter.rs
//
// Character-by-character text reveal driven by the frame clock.

use bevy::prelude::*;

/// Slack applied when converting elapsed time to whole characters so that
/// accumulated float error never costs a frame.
const REVEAL_EPSILON: f32 = 1e-4;

/// Result of advancing a typewriter by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterStep {
    /// Nothing in flight.
    Idle,
    /// Still revealing; more characters remain.
    Revealing,
    /// The full text became visible this frame. Reported once per reveal.
    Finished,
}

/// Progressive reveal of a string at a fixed per-character interval.
///
/// `start` abandons any reveal in flight, so a cancelled reveal never
/// reports `Finished`.
#[derive(Component, Debug, Clone)]
pub struct Typewriter {
    text: String,
    char_count: usize,
    revealed: usize,
    elapsed: f32,
    interval: f32,
    active: bool,
}

impl Typewriter {
    pub fn new(interval: f32) -> Self {
        Self {
            text: String::new(),
            char_count: 0,
            revealed: 0,
            elapsed: 0.0,
            interval: interval.max(0.0),
            active: false,
        }
    }

    pub fn start(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.char_count = self.text.chars().count();
        self.revealed = 0;
        self.elapsed = 0.0;
        self.active = true;
    }

    pub fn tick(&mut self, delta_seconds: f32) -> TypewriterStep {
        if !self.active {
            return TypewriterStep::Idle;
        }

        self.elapsed += delta_seconds.max(0.0);
        let target = if self.interval <= f32::EPSILON {
            self.char_count
        } else {
            (self.elapsed / self.interval + REVEAL_EPSILON).floor() as usize
        };
        self.revealed = target.min(self.char_count);

        if self.revealed >= self.char_count {
            self.active = false;
            TypewriterStep::Finished
        } else {
            TypewriterStep::Revealing
        }
    }

    /// The full target string.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The prefix revealed so far.
    pub fn visible_text(&self) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(self.revealed)
            .map(|(offset, _)| offset)
            .unwrap_or(self.text.len());
        &self.text[..end]
    }

    pub fn revealed_chars(&self) -> usize {
        self.revealed
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_revealing(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTION: &str = "Will you be my valentine?";

    #[test]
    fn reveals_full_text_after_expected_tick_count() {
        let interval = 0.045;
        let frame = 1.0 / 60.0;
        let expected_ticks =
            (QUESTION.chars().count() as f32 * interval / frame).ceil() as usize;

        let mut typewriter = Typewriter::new(interval);
        typewriter.start(QUESTION);

        let mut finished_at = Vec::new();
        let mut previous = 0;
        for tick in 1..=expected_ticks + 30 {
            if typewriter.tick(frame) == TypewriterStep::Finished {
                finished_at.push(tick);
            }
            assert!(typewriter.revealed_chars() >= previous);
            previous = typewriter.revealed_chars();
        }

        assert_eq!(finished_at, vec![expected_ticks]);
        assert_eq!(typewriter.visible_text(), QUESTION);
    }

    #[test]
    fn restart_resets_to_empty_and_drops_pending_finish() {
        let mut typewriter = Typewriter::new(0.04);
        typewriter.start("Yes");
        assert_eq!(typewriter.tick(0.05), TypewriterStep::Revealing);
        assert_eq!(typewriter.visible_text(), "Y");

        typewriter.start("You already said yes");
        assert_eq!(typewriter.visible_text(), "");
        assert_eq!(typewriter.revealed_chars(), 0);

        // The abandoned "Yes" would have finished here; the new line has not.
        assert_eq!(typewriter.tick(0.13), TypewriterStep::Revealing);
        assert_eq!(typewriter.visible_text(), "You");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut typewriter = Typewriter::new(0.1);
        typewriter.start("<3 ♥ :*");
        typewriter.tick(0.4);
        assert_eq!(typewriter.visible_text(), "<3 ♥");
    }

    #[test]
    fn idle_until_started_and_after_finish() {
        let mut typewriter = Typewriter::new(0.045);
        assert_eq!(typewriter.tick(1.0), TypewriterStep::Idle);

        typewriter.start("");
        assert_eq!(typewriter.tick(0.0), TypewriterStep::Finished);
        assert_eq!(typewriter.tick(1.0), TypewriterStep::Idle);
        assert!(!typewriter.is_revealing());
    }

    #[test]
    fn zero_interval_reveals_immediately() {
        let mut typewriter = Typewriter::new(0.0);
        typewriter.start("Ah, knew you'd say yes <3");
        assert_eq!(typewriter.tick(0.016), TypewriterStep::Finished);
        assert_eq!(typewriter.text(), typewriter.visible_text());
    }
}
