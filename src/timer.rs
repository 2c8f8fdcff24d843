//! Session expiry countdown.

/// Countdown state: one transition per second, terminal at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Seconds left before the mailbox expires.
    Running(u32),
    /// The countdown ran out; the session is over.
    Expired,
}

/// Fixed-duration countdown for one session.
///
/// The countdown task drives [`ExpiryTimer::tick`] once per second. Reaching
/// `Expired` is terminal: further ticks stay expired, the poll schedule is
/// stopped, and the inbox is left as-is. A new session always starts a fresh
/// timer; the superseded one is cancelled with its session.
#[derive(Debug, Clone, Copy)]
pub struct ExpiryTimer {
    state: TimerState,
}

impl ExpiryTimer {
    /// Default lifetime of a mailbox, in seconds.
    pub const DEFAULT_TTL_SECS: u32 = 600;

    /// Start a countdown with `secs` seconds on the clock.
    pub fn new(secs: u32) -> Self {
        Self {
            state: TimerState::Running(secs),
        }
    }

    /// Advance by one second, returning the new state.
    pub fn tick(&mut self) -> TimerState {
        self.state = match self.state {
            TimerState::Running(remaining) if remaining > 1 => TimerState::Running(remaining - 1),
            _ => TimerState::Expired,
        };
        self.state
    }

    /// The current state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Whether the countdown has finished.
    pub fn is_expired(&self) -> bool {
        matches!(self.state, TimerState::Expired)
    }

    /// Seconds left; zero once expired.
    pub fn remaining(&self) -> u32 {
        match self.state {
            TimerState::Running(secs) => secs,
            TimerState::Expired => 0,
        }
    }

    /// `MM:SS` rendering of the time left.
    pub fn format_remaining(&self) -> String {
        let secs = self.remaining();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_exactly_the_configured_ticks() {
        let mut timer = ExpiryTimer::new(600);
        for _ in 0..599 {
            timer.tick();
            assert!(!timer.is_expired());
        }
        assert_eq!(timer.state(), TimerState::Running(1));

        assert_eq!(timer.tick(), TimerState::Expired);
        assert!(timer.is_expired());
    }

    #[test]
    fn never_expires_early() {
        let mut timer = ExpiryTimer::new(3);
        assert_eq!(timer.tick(), TimerState::Running(2));
        assert_eq!(timer.tick(), TimerState::Running(1));
        assert_eq!(timer.tick(), TimerState::Expired);
    }

    #[test]
    fn expired_is_terminal() {
        let mut timer = ExpiryTimer::new(1);
        timer.tick();
        assert!(timer.is_expired());

        assert_eq!(timer.tick(), TimerState::Expired);
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn format_is_minutes_and_seconds() {
        assert_eq!(ExpiryTimer::new(600).format_remaining(), "10:00");
        assert_eq!(ExpiryTimer::new(9).format_remaining(), "00:09");

        let mut timer = ExpiryTimer::new(1);
        timer.tick();
        assert_eq!(timer.format_remaining(), "00:00");
    }
}
