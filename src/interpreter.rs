use log::{trace, warn};

use crate::{
    instruction::Instruction,
    memory::{FONT_START_ADDRESS, GLYPH_HEIGHT},
    quirks::Quirks,
    rng::Chip8Rng,
    stack::StackError,
    state::{Chip8State, FLAG_REGISTER},
};

/// What the host should do after a call to [`Chip8Interpreter::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep calling `step`.
    Continue,
    /// The program asked to stop. Further calls are pointless.
    Halt,
    /// `FX0A` is waiting for a key. The program counter still points at it,
    /// so the next `step` retries once the host has latched new keys.
    AwaitKey,
}

/// Executes CHIP-8 instructions against a [`Chip8State`].
///
/// The interpreter itself only owns the things that stay fixed for a run:
/// the quirk configuration and the random number source.
pub struct Chip8Interpreter<R: Chip8Rng> {
    rng: R,
    quirks: Quirks,
}

impl<R: Chip8Rng> Chip8Interpreter<R> {
    pub fn new(rng: R, quirks: Quirks) -> Self {
        Self { rng, quirks }
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    /// Swap the quirk set. Only meaningful between runs, e.g. when a saved
    /// state recorded with different quirks is restored.
    pub fn set_quirks(&mut self, quirks: Quirks) {
        self.quirks = quirks;
    }

    /// Fetch the instruction at the program counter, advance the program
    /// counter past it and execute it.
    pub fn step(&self, state: &mut Chip8State) -> Step {
        let address = state.pc;
        let instruction = Instruction::decode(state.ram.read_word(address));
        state.pc = address.wrapping_add(2);
        trace!("{:03X}: {:04X} {}", address, instruction.word, instruction);

        self.execute(instruction, state)
    }

    /// Apply a single decoded instruction. Expects the program counter to
    /// already point past `instruction`.
    pub fn execute(&self, instruction: Instruction, state: &mut Chip8State) -> Step {
        let Instruction {
            op, x, y, n, nn, nnn, ..
        } = instruction;
        let quirks = &self.quirks;

        match (op, x, y, n) {
            (0x0, 0x0, 0xE, 0x0) => state.display.clear(),
            (0x0, 0x0, 0xE, 0xE) => {
                match state.stack.pop() {
                    Ok(address) => state.pc = address,
                    Err(_) => warn!(
                        "Return at {:03X} with an empty stack, ignoring",
                        state.pc.wrapping_sub(2)
                    ),
                }
                state.display.request_redraw();
            }
            (0x0, 0x0, 0x0, 0x0) if quirks.halt_on_zero => return Step::Halt,
            (0x1, ..) => state.pc = nnn,
            (0x2, ..) => {
                if let Err(StackError::Overflow) = state.stack.push(state.pc) {
                    warn!(
                        "Stack overflow calling {:03X}, replacing the top return address",
                        nnn
                    );
                }
                state.pc = nnn;
            }
            (0x3, ..) => {
                if state.v[x] == nn {
                    skip(state);
                }
            }
            (0x4, ..) => {
                if state.v[x] != nn {
                    skip(state);
                }
            }
            (0x5, _, _, 0x0) => {
                if state.v[x] == state.v[y] {
                    skip(state);
                }
            }
            (0x6, ..) => state.v[x] = nn,
            (0x7, ..) => state.v[x] = state.v[x].wrapping_add(nn),
            (0x8, _, _, 0x0) => state.v[x] = state.v[y],
            (0x8, _, _, 0x1..=0x3) => {
                let vy = state.v[y];
                match n {
                    0x1 => state.v[x] |= vy,
                    0x2 => state.v[x] &= vy,
                    _ => state.v[x] ^= vy,
                }
                if quirks.vf_reset {
                    state.v[FLAG_REGISTER] = 0;
                }
            }
            (0x8, _, _, 0x4) => {
                let (sum, carry) = state.v[x].overflowing_add(state.v[y]);
                set_with_flag(state, x, sum, carry);
            }
            (0x8, _, _, 0x5) => {
                let (vx, vy) = (state.v[x], state.v[y]);
                set_with_flag(state, x, vx.wrapping_sub(vy), vx >= vy);
            }
            (0x8, _, _, 0x6) => {
                let source = if quirks.shift_uses_vx { state.v[x] } else { state.v[y] };
                set_with_flag(state, x, source >> 1, source & 0x01 != 0);
            }
            (0x8, _, _, 0x7) => {
                let (vx, vy) = (state.v[x], state.v[y]);
                set_with_flag(state, x, vy.wrapping_sub(vx), vy >= vx);
            }
            (0x8, _, _, 0xE) => {
                let source = if quirks.shift_uses_vx { state.v[x] } else { state.v[y] };
                set_with_flag(state, x, source << 1, source & 0x80 != 0);
            }
            (0x9, _, _, 0x0) => {
                if state.v[x] != state.v[y] {
                    skip(state);
                }
            }
            (0xA, ..) => state.i = nnn,
            (0xB, ..) => {
                let offset = if quirks.jump_adds_vx { state.v[x] } else { state.v[0] };
                state.pc = nnn + offset as u16;
            }
            (0xC, ..) => state.v[x] = self.rng.random_u8() & nn,
            (0xD, ..) => {
                let rows: Vec<u8> = (0..n as u16)
                    .map(|row| state.ram.read(state.i.wrapping_add(row)))
                    .collect();
                let (vx, vy) = (state.v[x], state.v[y]);
                let collision = state.display.draw_sprite(vx, vy, &rows, quirks.wrap_sprites);
                state.v[FLAG_REGISTER] = collision as u8;
            }
            (0xE, _, 0x9, 0xE) => {
                if state.keys[(state.v[x] & 0xF) as usize] {
                    skip(state);
                }
            }
            (0xE, _, 0xA, 0x1) => {
                if !state.keys[(state.v[x] & 0xF) as usize] {
                    skip(state);
                }
            }
            (0xF, _, 0x0, 0x7) => state.v[x] = state.timers.delay,
            (0xF, _, 0x0, 0xA) => match state.first_pressed_key() {
                Some(key) => state.v[x] = key,
                None => {
                    state.pc = state.pc.wrapping_sub(2);
                    return Step::AwaitKey;
                }
            },
            (0xF, _, 0x1, 0x5) => state.timers.delay = state.v[x],
            (0xF, _, 0x1, 0x8) => state.timers.sound = state.v[x],
            (0xF, _, 0x1, 0xE) => state.i = state.i.wrapping_add(state.v[x] as u16),
            (0xF, _, 0x2, 0x9) => {
                let digit = (state.v[x] & 0xF) as u16;
                state.i = FONT_START_ADDRESS as u16 + GLYPH_HEIGHT as u16 * digit;
            }
            (0xF, _, 0x3, 0x3) => {
                let value = state.v[x];
                let digits = [value / 100, value / 10 % 10, value % 10];
                for (offset, digit) in digits.into_iter().enumerate() {
                    state.ram.write(state.i.wrapping_add(offset as u16), digit);
                }
            }
            (0xF, _, 0x5, 0x5) => {
                for register in 0..=x {
                    let address = state.i.wrapping_add(register as u16);
                    state.ram.write(address, state.v[register]);
                }
                advance_index(state, x, quirks);
            }
            (0xF, _, 0x6, 0x5) => {
                for register in 0..=x {
                    let address = state.i.wrapping_add(register as u16);
                    state.v[register] = state.ram.read(address);
                }
                advance_index(state, x, quirks);
            }
            _ => warn!(
                "Unknown instruction {:04X} at {:03X}, skipping",
                instruction.word,
                state.pc.wrapping_sub(2)
            ),
        }

        Step::Continue
    }
}

fn skip(state: &mut Chip8State) {
    state.pc = state.pc.wrapping_add(2);
}

/// Write `VX` first and `VF` second, so the flag wins when `X` is `F`.
fn set_with_flag(state: &mut Chip8State, x: usize, value: u8, flag: bool) {
    state.v[x] = value;
    state.v[FLAG_REGISTER] = flag as u8;
}

/// Post-update of `I` after `FX55`/`FX65`.
fn advance_index(state: &mut Chip8State, x: usize, quirks: &Quirks) {
    if quirks.memory_leave_i_unchanged {
        return;
    }
    let increment = if quirks.memory_increment_by_x { x } else { x + 1 };
    state.i = state.i.wrapping_add(increment as u16);
}
