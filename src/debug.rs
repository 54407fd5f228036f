//! Human readable views of a machine, for logs and `--disassemble`.
use std::fmt::Write;

use crate::{
    display::{Display, DISPLAY_HEIGHT_PIXELS, DISPLAY_WIDTH_PIXELS},
    instruction::Instruction,
    memory::Ram,
    state::Chip8State,
};

/// One line per instruction word: address, raw word and mnemonic.
///
/// A trailing odd byte is listed on its own so nothing in the input is
/// silently dropped.
pub fn disassemble(bytes: &[u8], start_address: u16) -> Vec<String> {
    let mut lines = Vec::with_capacity(bytes.len() / 2 + 1);
    let mut address = start_address;
    let mut words = bytes.chunks_exact(2);
    for word in words.by_ref() {
        let instruction = Instruction::from([word[0], word[1]]);
        lines.push(format!(
            "{:03X}: {:04X}  {}",
            address, instruction.word, instruction
        ));
        address = address.wrapping_add(2);
    }
    if let [byte] = words.remainder() {
        lines.push(format!("{:03X}: {:02X}", address, byte));
    }
    lines
}

pub fn dump_registers(state: &Chip8State) -> String {
    let mut out = String::new();
    for (index, value) in state.v.iter().enumerate() {
        let _ = write!(out, "V{:X}={:02X} ", index, value);
    }
    let _ = write!(
        out,
        "I={:03X} PC={:03X} SP={} DT={:02X} ST={:02X}",
        state.i,
        state.pc,
        state.stack.depth(),
        state.timers.delay,
        state.timers.sound
    );
    out
}

/// Hex dump, 16 bytes per row.
pub fn dump_memory(ram: &Ram) -> String {
    let mut out = String::new();
    for (row, chunk) in ram.bytes().chunks(16).enumerate() {
        let _ = write!(out, "{:03X}:", row * 16);
        for byte in chunk {
            let _ = write!(out, " {:02X}", byte);
        }
        out.push('\n');
    }
    out
}

/// `#` for a lit pixel, `.` otherwise.
pub fn dump_display(display: &Display) -> String {
    let mut out = String::with_capacity((DISPLAY_WIDTH_PIXELS + 1) * DISPLAY_HEIGHT_PIXELS);
    for y in 0..DISPLAY_HEIGHT_PIXELS {
        for x in 0..DISPLAY_WIDTH_PIXELS {
            out.push(if display.pixel(x, y) { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}
