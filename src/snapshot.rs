//! Save states.
//!
//! A snapshot is a flat, big endian dump of a [`Chip8State`] plus the quirks
//! it was running with:
//!
//! ```text
//! offset  size  field
//! 0       4     magic "C8VM"
//! 4       1     format version (1)
//! 5       1     quirk bits, see `Quirks::to_bits`
//! 6       4096  memory
//! 4102    16    V0-VF
//! 4118    2     I
//! 4120    2     PC
//! 4122    32    stack slots, 16 x u16
//! 4154    1     stack depth (0-16)
//! 4155    1     delay timer
//! 4156    1     sound timer
//! 4157    256   display, 1 bit per pixel, row-major, MSB is leftmost
//! ```
//!
//! The key latch and the redraw flag are host-side concerns and are not
//! saved.
use log::debug;

use crate::{
    display::{Display, DISPLAY_BUFFER_SIZE},
    memory::{Ram, MEMORY_SIZE},
    quirks::Quirks,
    stack::{CallStack, STACK_DEPTH},
    state::{Chip8State, NUM_KEYS, NUM_V_REGISTERS},
    timer::Timers,
    Error, Result,
};

pub const SNAPSHOT_MAGIC: [u8; 4] = *b"C8VM";
pub const SNAPSHOT_VERSION: u8 = 1;
pub const SNAPSHOT_SIZE: usize = SNAPSHOT_MAGIC.len()
    + 2
    + MEMORY_SIZE
    + NUM_V_REGISTERS
    + 2
    + 2
    + STACK_DEPTH * 2
    + 1
    + 2
    + DISPLAY_BUFFER_SIZE;

/// Serialize `state` and `quirks` into the layout described above.
pub fn encode(state: &Chip8State, quirks: Quirks) -> Vec<u8> {
    let mut out = Vec::with_capacity(SNAPSHOT_SIZE);
    out.extend_from_slice(&SNAPSHOT_MAGIC);
    out.push(SNAPSHOT_VERSION);
    out.push(quirks.to_bits());
    out.extend_from_slice(state.ram.bytes());
    out.extend_from_slice(&state.v);
    out.extend_from_slice(&state.i.to_be_bytes());
    out.extend_from_slice(&state.pc.to_be_bytes());
    for slot in state.stack.slots() {
        out.extend_from_slice(&slot.to_be_bytes());
    }
    out.push(state.stack.depth() as u8);
    out.push(state.timers.delay);
    out.push(state.timers.sound);
    out.extend_from_slice(&state.display.to_packed());
    out
}

/// Rebuild a state from a snapshot. Nothing is returned unless every field
/// validates, so a caller's live state is never half overwritten.
///
/// The restored display is flagged for redraw.
///
/// # Errors
/// [`Error::SnapshotLength`], [`Error::SnapshotMagic`],
/// [`Error::SnapshotVersion`], [`Error::SnapshotQuirks`] or
/// [`Error::SnapshotStackPointer`].
pub fn decode(bytes: &[u8]) -> Result<(Chip8State, Quirks)> {
    if bytes.len() != SNAPSHOT_SIZE {
        return Err(Error::SnapshotLength(bytes.len()));
    }

    let mut reader = Reader { bytes };
    if reader.take::<4>() != SNAPSHOT_MAGIC {
        return Err(Error::SnapshotMagic);
    }
    let [version] = reader.take::<1>();
    if version != SNAPSHOT_VERSION {
        return Err(Error::SnapshotVersion(version));
    }
    let [quirk_bits] = reader.take::<1>();
    let quirks = Quirks::from_bits(quirk_bits).ok_or(Error::SnapshotQuirks(quirk_bits))?;

    let mut ram = Ram::new();
    ram.load_bytes(&reader.take::<MEMORY_SIZE>(), 0)?;
    let v = reader.take::<NUM_V_REGISTERS>();
    let i = u16::from_be_bytes(reader.take::<2>());
    let pc = u16::from_be_bytes(reader.take::<2>());

    let mut slots = [0u16; STACK_DEPTH];
    for slot in slots.iter_mut() {
        *slot = u16::from_be_bytes(reader.take::<2>());
    }
    let [sp] = reader.take::<1>();
    let stack =
        CallStack::from_parts(slots, sp as usize).ok_or(Error::SnapshotStackPointer(sp))?;

    let [delay, sound] = reader.take::<2>();
    let mut display = Display::from_packed(&reader.take::<DISPLAY_BUFFER_SIZE>());
    display.request_redraw();

    let state = Chip8State {
        ram,
        v,
        i,
        pc,
        stack,
        display,
        timers: Timers { delay, sound },
        keys: [false; NUM_KEYS],
    };
    debug!("Decoded snapshot, pc {:03X}, {:?}", state.pc, quirks);
    Ok((state, quirks))
}

/// Reads fixed size fields front to back. The overall length is checked up
/// front, so individual reads cannot run short.
struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let (head, tail) = self.bytes.split_at(N);
        self.bytes = tail;
        let mut field = [0u8; N];
        field.copy_from_slice(head);
        field
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, SNAPSHOT_SIZE};
    use crate::{quirks::Quirks, state::Chip8State, Error};

    fn busy_state() -> Chip8State {
        let mut state = Chip8State::new();
        state.ram.load_bytes(&[0x60, 0x05, 0x70, 0x0A], 0x200).unwrap();
        state.v = [7; 16];
        state.v[0xF] = 1;
        state.i = 0x0ABC;
        state.pc = 0x0246;
        state.stack.push(0x0202).unwrap();
        state.stack.push(0x0310).unwrap();
        state.timers.delay = 30;
        state.timers.sound = 4;
        state.display.draw_sprite(60, 30, &[0xF0, 0x90, 0xF0], true);
        state
    }

    #[test]
    fn layout_size() {
        assert_eq!(SNAPSHOT_SIZE, 4413);
        assert_eq!(encode(&Chip8State::new(), Quirks::default()).len(), SNAPSHOT_SIZE);
    }

    #[test]
    fn snapshot_restore_snapshot_is_identical() {
        let quirks = Quirks {
            shift_uses_vx: true,
            wrap_sprites: true,
            ..Quirks::default()
        };
        let first = encode(&busy_state(), quirks);
        let (restored, restored_quirks) = decode(&first).unwrap();
        let second = encode(&restored, restored_quirks);
        assert_eq!(first, second);
    }

    #[test]
    fn restore_reproduces_state() {
        let mut original = busy_state();
        let (mut restored, _) = decode(&encode(&original, Quirks::default())).unwrap();

        assert!(restored.display.take_redraw());
        original.display.take_redraw();
        assert_eq!(restored, original);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let bytes = encode(&Chip8State::new(), Quirks::default());
        assert_eq!(
            decode(&bytes[..bytes.len() - 1]).unwrap_err(),
            Error::SnapshotLength(SNAPSHOT_SIZE - 1)
        );
        assert_eq!(decode(&[]).unwrap_err(), Error::SnapshotLength(0));
    }

    #[test]
    fn bad_header_is_rejected() {
        let mut bytes = encode(&Chip8State::new(), Quirks::default());
        bytes[0] = b'X';
        assert_eq!(decode(&bytes).unwrap_err(), Error::SnapshotMagic);

        let mut bytes = encode(&Chip8State::new(), Quirks::default());
        bytes[4] = 2;
        assert_eq!(decode(&bytes).unwrap_err(), Error::SnapshotVersion(2));

        let mut bytes = encode(&Chip8State::new(), Quirks::default());
        bytes[5] = 0x80;
        assert_eq!(decode(&bytes).unwrap_err(), Error::SnapshotQuirks(0x80));
    }

    #[test]
    fn stack_pointer_out_of_range_is_rejected() {
        let mut bytes = encode(&Chip8State::new(), Quirks::default());
        bytes[4154] = 17;
        assert_eq!(decode(&bytes).unwrap_err(), Error::SnapshotStackPointer(17));
    }
}
