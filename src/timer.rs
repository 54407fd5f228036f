/// The delay and sound timers. Both count down once per [`Timers::tick`]
/// and stop at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance both timers by one logical tick (1/60 s on the original
    /// hardware).
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// The buzzer sounds for as long as the sound timer is non-zero.
    pub fn sound_enabled(&self) -> bool {
        self.sound != 0
    }
}

#[cfg(test)]
mod tests {
    use super::Timers;

    #[test]
    fn tick_test() {
        let mut timers = Timers::new();
        timers.delay = 120;
        timers.sound = 2;

        timers.tick();
        assert_eq!(timers.delay, 119);
        assert_eq!(timers.sound, 1);
        assert!(timers.sound_enabled());

        timers.tick();
        assert_eq!(timers.sound, 0);
        assert!(!timers.sound_enabled());

        for _ in 0..200 {
            timers.tick();
        }
        assert_eq!(timers, Timers::new());
    }

    #[test]
    fn timers_are_independent() {
        let mut timers = Timers {
            delay: 0,
            sound: 3,
        };
        timers.tick();
        assert_eq!(timers.delay, 0);
        assert_eq!(timers.sound, 2);
    }
}
