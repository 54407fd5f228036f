//! Wall clock pacing for hosts that drive the emulator in real time.
use std::time::Duration;

#[cfg(test)]
use mock_instant::Instant;
#[cfg(not(test))]
use std::time::Instant;

/// The timers on the original hardware count down at 60Hz.
pub const FRAMES_PER_SECOND: u32 = 60;

/// Never run more than this many frames to catch up after a stall, e.g.
/// when the window was being dragged.
const MAX_CATCH_UP_FRAMES: u32 = 4;

/// Turns elapsed time into a number of frames the host should run.
pub struct FrameClock {
    frame_duration: Duration,
    last_poll: Instant,
    backlog: Duration,
}

impl FrameClock {
    pub fn new(frames_per_second: u32) -> Self {
        Self {
            frame_duration: Duration::from_secs(1) / frames_per_second.max(1),
            last_poll: Instant::now(),
            backlog: Duration::ZERO,
        }
    }

    /// How many whole frames have elapsed since the previous call.
    pub fn frames_due(&mut self) -> u32 {
        let now = Instant::now();
        self.backlog += now.duration_since(self.last_poll);
        self.last_poll = now;

        let due = self.backlog.as_nanos() / self.frame_duration.as_nanos();
        if due > MAX_CATCH_UP_FRAMES as u128 {
            self.backlog = Duration::ZERO;
            return MAX_CATCH_UP_FRAMES;
        }
        let due = due as u32;
        self.backlog -= self.frame_duration * due;
        due
    }

    /// Time left until the next frame falls due, as of the last poll.
    pub fn until_next_frame(&self) -> Duration {
        self.frame_duration.saturating_sub(self.backlog)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(FRAMES_PER_SECOND)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mock_instant::MockClock;

    use super::{FrameClock, MAX_CATCH_UP_FRAMES};

    // Every `MockClock::advance` stays in this one test so the mocked time
    // seen by `FrameClock` is predictable.
    #[test]
    fn frames_follow_mock_time() {
        let mut clock = FrameClock::new(50);
        assert_eq!(clock.frames_due(), 0);
        assert_eq!(clock.until_next_frame(), Duration::from_millis(20));

        MockClock::advance(Duration::from_millis(15));
        assert_eq!(clock.frames_due(), 0);
        assert_eq!(clock.until_next_frame(), Duration::from_millis(5));

        MockClock::advance(Duration::from_millis(10));
        assert_eq!(clock.frames_due(), 1);
        assert_eq!(clock.until_next_frame(), Duration::from_millis(15));

        MockClock::advance(Duration::from_millis(40));
        assert_eq!(clock.frames_due(), 2);

        MockClock::advance(Duration::from_secs(5));
        assert_eq!(clock.frames_due(), MAX_CATCH_UP_FRAMES);
        assert_eq!(clock.until_next_frame(), Duration::from_millis(20));
    }
}
