//! Everything a running CHIP-8 program can observe or change.
use log::debug;

use crate::{
    display::Display,
    memory::{Ram, PROGRAM_START_ADDRESS},
    rom::Rom,
    stack::CallStack,
    timer::Timers,
    Result,
};

pub const NUM_V_REGISTERS: usize = 16;
pub const NUM_KEYS: usize = 16;
pub const FLAG_REGISTER: usize = 0xF;

/// The mutable machine state. One value per emulated machine; every
/// interpreter operation takes it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip8State {
    pub ram: Ram,
    pub v: [u8; NUM_V_REGISTERS],
    pub i: u16,
    pub pc: u16,
    pub stack: CallStack,
    pub display: Display,
    pub timers: Timers,
    /// Written by the host before each cycle, read-only to the interpreter.
    pub keys: [bool; NUM_KEYS],
}

impl Chip8State {
    /// A freshly initialized machine: zeroed, font installed, PC at `0x200`.
    pub fn new() -> Self {
        let mut state = Self {
            ram: Ram::new(),
            v: [0; NUM_V_REGISTERS],
            i: 0,
            pc: PROGRAM_START_ADDRESS as u16,
            stack: CallStack::new(),
            display: Display::new(),
            timers: Timers::new(),
            keys: [false; NUM_KEYS],
        };
        state.initialize();
        state
    }

    /// Reset every field to zero, reinstall the font and point the program
    /// counter at the start of the program area. The display is flagged for
    /// redraw so the host blanks its window.
    pub fn initialize(&mut self) {
        self.ram = Ram::new();
        self.ram.load_font();
        self.v = [0; NUM_V_REGISTERS];
        self.i = 0;
        self.pc = PROGRAM_START_ADDRESS as u16;
        self.stack = CallStack::new();
        self.display = Display::new();
        self.display.request_redraw();
        self.timers = Timers::new();
        self.keys = [false; NUM_KEYS];
    }

    /// Initialize the machine and copy `rom` into the program area.
    ///
    /// # Errors
    /// Propagates errors from [`Ram::load_chip8_program`]. A [`Rom`] is
    /// already size checked, so this only fails for hand-built states.
    pub fn load_rom(&mut self, rom: &Rom) -> Result<()> {
        self.initialize();
        self.ram.load_chip8_program(rom.bytes())?;
        debug!("Loaded {:?}", rom);
        Ok(())
    }

    /// Latch the host's key state for the next cycles.
    pub fn set_keys(&mut self, keys: [bool; NUM_KEYS]) {
        self.keys = keys;
    }

    /// The lowest numbered key currently held down.
    pub fn first_pressed_key(&self) -> Option<u8> {
        self.keys.iter().position(|pressed| *pressed).map(|k| k as u8)
    }
}

impl Default for Chip8State {
    fn default() -> Self {
        Self::new()
    }
}
