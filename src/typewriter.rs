// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct Typewriter {
    message: Vec<char>,
    speed: Duration,
    shown: String,
    index: usize,
    next_at: Option<Instant>,
    done: bool,
}

impl Typewriter {
    pub fn new(message: &str, speed: Duration) -> Self {
        Self {
            message: message.chars().collect(),
            speed: speed.max(Duration::from_millis(1)),
            shown: String::new(),
            index: 0,
            next_at: None,
            done: false,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.shown.clear();
        self.index = 0;
        self.done = false;
        self.next_at = Some(now);
    }

    pub fn stop(&mut self) {
        self.next_at = None;
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.next_at.is_some()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn text(&self) -> &str {
        &self.shown
    }

    /// Advances over every period due at `now`. Returns the scheduled
    /// completion instant exactly once, on the tick that finishes the reveal,
    /// even when that tick arrives late.
    pub fn tick(&mut self, now: Instant) -> Option<Instant> {
        while let Some(at) = self.next_at {
            if now < at {
                return None;
            }
            if self.index < self.message.len() {
                self.shown.push(self.message[self.index]);
                self.index += 1;
                self.next_at = Some(at + self.speed);
            } else {
                self.next_at = None;
                self.done = true;
                return Some(at);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn three_chars_at_50ms_finish_at_150ms() {
        let t0 = Instant::now();
        let mut tw = Typewriter::new("abc", ms(50));
        tw.start(t0);

        assert_eq!(tw.tick(t0), None);
        assert_eq!(tw.text(), "a");
        assert_eq!(tw.tick(t0 + ms(100)), None);
        assert_eq!(tw.text(), "abc");
        assert_eq!(tw.tick(t0 + ms(149)), None);
        assert!(!tw.is_done());

        assert_eq!(tw.tick(t0 + ms(150)), Some(t0 + ms(150)));
        assert!(tw.is_done());
        assert!(!tw.is_running());
        // done is reported once
        assert_eq!(tw.tick(t0 + ms(500)), None);
    }

    #[test]
    fn late_tick_catches_up_in_one_go() {
        let t0 = Instant::now();
        let mut tw = Typewriter::new("você", ms(50));
        tw.start(t0);
        // completion is back-dated to when the last period actually ended
        assert_eq!(tw.tick(t0 + ms(1000)), Some(t0 + ms(200)));
        assert_eq!(tw.text(), "você");
    }

    #[test]
    fn restart_resets_text_and_index() {
        let t0 = Instant::now();
        let mut tw = Typewriter::new("abc", ms(50));
        tw.start(t0);
        tw.tick(t0 + ms(200));
        assert!(tw.is_done());

        let t1 = t0 + ms(1000);
        tw.start(t1);
        assert_eq!(tw.text(), "");
        assert!(!tw.is_done());
        tw.tick(t1);
        assert_eq!(tw.text(), "a");
    }

    #[test]
    fn idle_typewriter_does_nothing() {
        let t0 = Instant::now();
        let mut tw = Typewriter::new("abc", ms(50));
        assert_eq!(tw.tick(t0 + ms(1000)), None);
        assert_eq!(tw.text(), "");
    }
}
