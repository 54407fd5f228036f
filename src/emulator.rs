use std::path::Path;

use log::{debug, info, warn};

use crate::{
    interpreter::{Chip8Interpreter, Step},
    peripherals::{HexKeyboard, Screen, Tone},
    quirks::Quirks,
    rng::Chip8Rng,
    rom::Rom,
    snapshot,
    state::Chip8State,
    Result,
};

/// Roughly 600 instructions per second at 60 frames per second.
pub const DEFAULT_CYCLES_PER_FRAME: u32 = 10;

/// Everything that stays fixed for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmulatorConfig {
    pub quirks: Quirks,
    /// Instructions executed per timer tick.
    pub cycles_per_frame: u32,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            quirks: Quirks::default(),
            cycles_per_frame: DEFAULT_CYCLES_PER_FRAME,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// Blocked on `FX0A` until a key is pressed.
    AwaitingKey,
    Paused,
    /// Stopped for good, or never started because no rom is loaded.
    Halted,
}

/// Drives a [`Chip8State`] one frame at a time: a batch of instructions, one
/// timer tick, then tone and screen updates.
pub struct Emulator<R: Chip8Rng = fastrand::Rng> {
    state: Chip8State,
    interpreter: Chip8Interpreter<R>,
    cycles_per_frame: u32,
    rom: Option<Rom>,
    halted: bool,
    paused: bool,
    awaiting_key: bool,
}

impl Emulator<fastrand::Rng> {
    pub fn new(config: EmulatorConfig) -> Self {
        Self::with_rng(config, fastrand::Rng::new())
    }
}

impl<R: Chip8Rng> Emulator<R> {
    pub fn with_rng(config: EmulatorConfig, rng: R) -> Self {
        Self {
            state: Chip8State::new(),
            interpreter: Chip8Interpreter::new(rng, config.quirks),
            cycles_per_frame: config.cycles_per_frame,
            rom: None,
            halted: true,
            paused: false,
            awaiting_key: false,
        }
    }

    pub fn state(&self) -> &Chip8State {
        &self.state
    }

    pub fn quirks(&self) -> Quirks {
        self.interpreter.quirks()
    }

    pub fn rom(&self) -> Option<&Rom> {
        self.rom.as_ref()
    }

    pub fn status(&self) -> Status {
        if self.halted {
            Status::Halted
        } else if self.paused {
            Status::Paused
        } else if self.awaiting_key {
            Status::AwaitingKey
        } else {
            Status::Running
        }
    }

    /// Reset the machine and start running `rom` from the top.
    ///
    /// # Errors
    /// See [`Chip8State::load_rom`].
    pub fn load_rom(&mut self, rom: Rom) -> Result<()> {
        self.halted = true;
        self.awaiting_key = false;
        self.state.load_rom(&rom)?;
        info!("Running {}", rom.name());
        self.rom = Some(rom);
        self.halted = false;
        Ok(())
    }

    /// Reset the machine, then read and run the rom at `path`.
    ///
    /// # Errors
    /// If the file cannot be read or is not a valid rom, the error is
    /// returned and the machine is left halted with only the font in memory.
    pub fn load_rom_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.state.initialize();
        self.halted = true;
        self.awaiting_key = false;
        self.rom = None;
        let rom = Rom::from_file(path)?;
        self.load_rom(rom)
    }

    /// Restart the current rom. Without a rom this only clears the machine.
    pub fn reset(&mut self) -> Result<()> {
        match self.rom.take() {
            Some(rom) => self.load_rom(rom),
            None => {
                self.state.initialize();
                Ok(())
            }
        }
    }

    /// Returns `true` if the emulator is now paused.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        debug!("Paused: {}", self.paused);
        self.paused
    }

    /// Run one frame: latch keys, execute up to `cycles_per_frame`
    /// instructions, tick the timers once, then update the tone and hand the
    /// screen a new frame if anything changed.
    pub fn run_frame<K, T, S>(&mut self, keyboard: &K, tone: &T, screen: &mut S) -> Status
    where
        K: HexKeyboard,
        T: Tone,
        S: Screen,
    {
        if self.halted || self.paused {
            if tone.is_tone_on() {
                tone.stop_tone();
            }
        } else {
            self.state.set_keys(keyboard.pressed_keys());
            self.run_cycles();
            self.state.timers.tick();
            self.update_tone(tone);
        }

        if self.state.display.take_redraw() {
            screen.draw_buffer(&self.state.display.to_packed());
        }
        self.status()
    }

    fn run_cycles(&mut self) {
        self.awaiting_key = false;
        for _ in 0..self.cycles_per_frame {
            match self.interpreter.step(&mut self.state) {
                Step::Continue => {}
                Step::AwaitKey => {
                    self.awaiting_key = true;
                    break;
                }
                Step::Halt => {
                    info!("Program halted at {:03X}", self.state.pc.wrapping_sub(2));
                    self.halted = true;
                    break;
                }
            }
        }
    }

    fn update_tone<T: Tone>(&self, tone: &T) {
        let tone_should_be_sounding = self.state.timers.sound_enabled();
        if tone_should_be_sounding && !tone.is_tone_on() {
            tone.start_tone();
        } else if !tone_should_be_sounding && tone.is_tone_on() {
            tone.stop_tone();
        }
    }

    /// Serialize the whole machine. See [`snapshot`] for the layout.
    pub fn save_state(&self) -> Vec<u8> {
        snapshot::encode(&self.state, self.quirks())
    }

    /// Replace the whole machine with a snapshot taken by
    /// [`Emulator::save_state`]. The snapshot's quirks take effect as well.
    ///
    /// # Errors
    /// Any snapshot error. The current machine is untouched on failure.
    pub fn restore_state(&mut self, bytes: &[u8]) -> Result<()> {
        let (state, quirks) = snapshot::decode(bytes).map_err(|err| {
            warn!("Rejected snapshot: {}", err);
            err
        })?;
        self.state = state;
        self.interpreter.set_quirks(quirks);
        self.halted = false;
        self.awaiting_key = false;
        debug!("Restored snapshot");
        Ok(())
    }
}
