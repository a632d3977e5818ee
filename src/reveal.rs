//! Typewriter reveal scheduling for the latest bot message.
//!
//! The scheduler owns at most one reveal session at a time, keyed by
//! message id. Each UI frame calls `sync` with the current latest bot
//! message and then `tick` with the frame time; rendering asks for the
//! visible prefix. Starting a reveal for a newer message discards the
//! old session outright, so a superseded reveal can never touch a newer
//! message's display.
//!
//! The reveal walks the already-formatted marker string (see `markup`),
//! one character at a time. A prefix may therefore end mid-marker and
//! show a half-rendered tag; that is deliberate and matches the way the
//! widget has always typed.

use std::time::{Duration, Instant};

use crate::message::MessageId;

/// Pause before the first character appears.
pub const REVEAL_START_DELAY: Duration = Duration::from_millis(300);
/// Interval between characters.
pub const REVEAL_CHAR_INTERVAL: Duration = Duration::from_millis(20);

/// In-flight reveal session for one bot message.
#[derive(Debug, Clone)]
pub struct RevealState {
    pub message_id: MessageId,
    /// Formatted marker string being revealed.
    pub formatted: String,
    /// Total length in characters.
    pub total_chars: usize,
    /// Monotonically non-decreasing while `is_revealing`.
    pub revealed_chars: usize,
    pub is_revealing: bool,
    started: Instant,
}

impl RevealState {
    fn new(message_id: MessageId, formatted: &str, now: Instant) -> Self {
        let total_chars = formatted.chars().count();
        Self {
            message_id,
            formatted: formatted.to_string(),
            total_chars,
            // An empty message has nothing to type out.
            revealed_chars: 0,
            is_revealing: total_chars > 0,
            started: now,
        }
    }

    /// The currently visible prefix, sliced on character boundaries.
    pub fn visible_prefix(&self) -> String {
        if self.revealed_chars >= self.total_chars {
            self.formatted.clone()
        } else {
            self.formatted.chars().take(self.revealed_chars).collect()
        }
    }
}

/// Drives the reveal session for the latest bot message.
#[derive(Debug, Default)]
pub struct RevealScheduler {
    current: Option<RevealState>,
}

impl RevealScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the session with the current latest bot message.
    ///
    /// `latest_bot` is `Some((id, formatted))` when the newest entry in
    /// the conversation is a bot message. Identity decides everything:
    /// a different id cancels the old session and starts a fresh one;
    /// the same id leaves the session alone; `None` (user message is
    /// newest, or log cleared) drops the session.
    pub fn sync(&mut self, latest_bot: Option<(MessageId, &str)>, now: Instant) {
        match latest_bot {
            Some((id, formatted)) => {
                let stale = self
                    .current
                    .as_ref()
                    .is_none_or(|state| state.message_id != id);
                if stale {
                    self.current = Some(RevealState::new(id, formatted, now));
                }
            }
            None => self.current = None,
        }
    }

    /// Advance the session to the position `now` implies.
    ///
    /// One character per `REVEAL_CHAR_INTERVAL` after the initial
    /// delay. Driven by a monotonic clock, so the revealed length never
    /// goes backwards; it is also clamped to never regress.
    pub fn tick(&mut self, now: Instant) {
        let Some(state) = self.current.as_mut() else {
            return;
        };
        if !state.is_revealing {
            return;
        }

        let elapsed = now.saturating_duration_since(state.started);
        if elapsed < REVEAL_START_DELAY {
            return;
        }
        let after_delay = elapsed - REVEAL_START_DELAY;
        let due = 1 + (after_delay.as_millis() / REVEAL_CHAR_INTERVAL.as_millis()) as usize;

        state.revealed_chars = state.revealed_chars.max(due.min(state.total_chars));
        if state.revealed_chars == state.total_chars {
            state.is_revealing = false;
        }
    }

    /// The session for `id`, if that message is the one being revealed.
    pub fn session_for(&self, id: MessageId) -> Option<&RevealState> {
        self.current.as_ref().filter(|state| state.message_id == id)
    }

    /// Whether any reveal is in flight (used to pace repaints).
    pub fn is_revealing(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|state| state.is_revealing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MSG: MessageId = 1;

    fn scheduler_with(formatted: &str, start: Instant) -> RevealScheduler {
        let mut scheduler = RevealScheduler::new();
        scheduler.sync(Some((MSG, formatted)), start);
        scheduler
    }

    #[test]
    fn test_nothing_revealed_during_start_delay() {
        let start = Instant::now();
        let mut scheduler = scheduler_with("hello", start);

        scheduler.tick(start + Duration::from_millis(299));
        let state = scheduler.session_for(MSG).unwrap();
        assert_eq!(state.revealed_chars, 0);
        assert!(state.is_revealing);
        assert_eq!(state.visible_prefix(), "");
    }

    #[test]
    fn test_reveal_is_monotone_and_terminates() {
        let start = Instant::now();
        let mut scheduler = scheduler_with("hello", start);

        let mut seen = Vec::new();
        for ms in (0..500).step_by(7) {
            scheduler.tick(start + Duration::from_millis(ms));
            seen.push(scheduler.session_for(MSG).unwrap().revealed_chars);
        }

        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "not monotone: {:?}", seen);
        let state = scheduler.session_for(MSG).unwrap();
        assert_eq!(state.revealed_chars, 5);
        assert!(!state.is_revealing);
        assert_eq!(state.visible_prefix(), "hello");
    }

    #[test]
    fn test_one_char_per_interval_after_delay() {
        let start = Instant::now();
        let mut scheduler = scheduler_with("abcdef", start);

        scheduler.tick(start + REVEAL_START_DELAY);
        assert_eq!(scheduler.session_for(MSG).unwrap().revealed_chars, 1);

        scheduler.tick(start + REVEAL_START_DELAY + Duration::from_millis(40));
        assert_eq!(scheduler.session_for(MSG).unwrap().revealed_chars, 3);
        assert_eq!(scheduler.session_for(MSG).unwrap().visible_prefix(), "abc");
    }

    #[test]
    fn test_multibyte_prefix_is_char_safe() {
        let start = Instant::now();
        let mut scheduler = scheduler_with("héllo ⇒", start);
        scheduler.tick(start + REVEAL_START_DELAY + Duration::from_millis(20));
        assert_eq!(scheduler.session_for(MSG).unwrap().visible_prefix(), "hé");
    }

    #[test]
    fn test_newer_message_cancels_in_flight_reveal() {
        let start = Instant::now();
        let mut scheduler = scheduler_with("first message", start);
        scheduler.tick(start + Duration::from_millis(340));
        assert!(scheduler.session_for(MSG).unwrap().revealed_chars < 13);

        // A second bot message becomes latest before the first finishes.
        let later = start + Duration::from_millis(400);
        scheduler.sync(Some((2, "second")), later);

        assert!(scheduler.session_for(MSG).is_none());
        let state = scheduler.session_for(2).unwrap();
        assert_eq!(state.revealed_chars, 0);
        assert!(state.is_revealing);

        // Ticks only ever advance message 2 now.
        scheduler.tick(later + Duration::from_millis(320));
        assert!(scheduler.session_for(MSG).is_none());
        assert!(scheduler.session_for(2).unwrap().revealed_chars >= 1);
    }

    #[test]
    fn test_same_message_does_not_restart() {
        let start = Instant::now();
        let mut scheduler = scheduler_with("hello", start);
        scheduler.tick(start + Duration::from_millis(340));
        let before = scheduler.session_for(MSG).unwrap().revealed_chars;
        assert!(before > 0);

        scheduler.sync(Some((MSG, "hello")), start + Duration::from_millis(341));
        assert_eq!(scheduler.session_for(MSG).unwrap().revealed_chars, before);
    }

    #[test]
    fn test_user_latest_drops_session() {
        let start = Instant::now();
        let mut scheduler = scheduler_with("hello", start);
        scheduler.sync(None, start + Duration::from_millis(100));
        assert!(scheduler.session_for(MSG).is_none());
        assert!(!scheduler.is_revealing());
    }

    #[test]
    fn test_empty_content_completes_immediately() {
        let start = Instant::now();
        let scheduler = scheduler_with("", start);
        let state = scheduler.session_for(MSG).unwrap();
        assert!(!state.is_revealing);
        assert_eq!(state.revealed_chars, state.total_chars);
    }
}
