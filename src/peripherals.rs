//! The seams between the emulator and whatever hosts it.
//!
//! The core never touches a window or an audio device. It reads keys through
//! [`HexKeyboard`], gates a buzzer through [`Tone`] and hands finished frames
//! to a [`Screen`].

use std::sync::{
    atomic::{AtomicBool, AtomicU16, Ordering},
    Arc,
};

use crate::state::NUM_KEYS;

#[cfg_attr(test, mockall::automock)]
pub trait Tone {
    fn start_tone(&self);
    fn stop_tone(&self);
    fn is_tone_on(&self) -> bool;
}

#[cfg_attr(test, mockall::automock)]
pub trait Screen {
    /// Receives the framebuffer packed 8 pixels per byte, one 8 byte
    /// scanline after another, most significant bit leftmost.
    fn draw_buffer(&mut self, buffer: &[u8]);
}

#[cfg_attr(test, mockall::automock)]
pub trait HexKeyboard {
    /// The pressed state of keys `0` through `F`.
    fn pressed_keys(&self) -> [bool; NUM_KEYS];
}

/// A key latch the host can write from its input thread while the emulator
/// reads it from another. All 16 keys live in one atomic so a reader never
/// sees half an update.
#[derive(Debug, Clone, Default)]
pub struct SharedKeypad {
    bits: Arc<AtomicU16>,
}

impl SharedKeypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&self, key: u8, pressed: bool) {
        let mask = 1u16 << (key & 0xF);
        if pressed {
            self.bits.fetch_or(mask, Ordering::AcqRel);
        } else {
            self.bits.fetch_and(!mask, Ordering::AcqRel);
        }
    }

    pub fn release_all(&self) {
        self.bits.store(0, Ordering::Release);
    }
}

impl HexKeyboard for SharedKeypad {
    fn pressed_keys(&self) -> [bool; NUM_KEYS] {
        let bits = self.bits.load(Ordering::Acquire);
        let mut keys = [false; NUM_KEYS];
        for (key, pressed) in keys.iter_mut().enumerate() {
            *pressed = bits & (1 << key) != 0;
        }
        keys
    }
}

/// A tone switch an audio thread can poll instead of being driven directly.
#[derive(Debug, Clone, Default)]
pub struct ToneFlag {
    on: Arc<AtomicBool>,
}

impl ToneFlag {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tone for ToneFlag {
    fn start_tone(&self) {
        self.on.store(true, Ordering::Release);
    }

    fn stop_tone(&self) {
        self.on.store(false, Ordering::Release);
    }

    fn is_tone_on(&self) -> bool {
        self.on.load(Ordering::Acquire)
    }
}

/// Peripherals that ignore everything. Useful for headless runs.
pub struct DummyPeripherals;

impl Tone for DummyPeripherals {
    fn start_tone(&self) {}
    fn stop_tone(&self) {}
    fn is_tone_on(&self) -> bool {
        false
    }
}

impl Screen for DummyPeripherals {
    fn draw_buffer(&mut self, _buffer: &[u8]) {}
}

impl HexKeyboard for DummyPeripherals {
    fn pressed_keys(&self) -> [bool; NUM_KEYS] {
        [false; NUM_KEYS]
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::{HexKeyboard, SharedKeypad, Tone, ToneFlag};

    #[test]
    fn keypad_latches_individual_keys() {
        let keypad = SharedKeypad::new();
        keypad.set_key(0x0, true);
        keypad.set_key(0xF, true);
        keypad.set_key(0x0, false);

        let keys = keypad.pressed_keys();
        assert!(!keys[0x0]);
        assert!(keys[0xF]);
        assert_eq!(keys.iter().filter(|k| **k).count(), 1);

        keypad.release_all();
        assert!(keypad.pressed_keys().iter().all(|k| !k));
    }

    #[test]
    fn keypad_is_shared_across_threads() {
        let keypad = SharedKeypad::new();
        let writer = keypad.clone();
        thread::spawn(move || writer.set_key(0x7, true))
            .join()
            .unwrap();
        assert!(keypad.pressed_keys()[0x7]);
    }

    #[test]
    fn tone_flag_is_shared() {
        let flag = ToneFlag::new();
        let reader = flag.clone();
        flag.start_tone();
        assert!(reader.is_tone_on());
        flag.stop_tone();
        assert!(!reader.is_tone_on());
    }
}
