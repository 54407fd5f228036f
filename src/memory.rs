//! The CHIP-8 sees a flat, 12-bit address space of 4096 bytes.
//!
//! ```text
//! 0x000 ..= 0x04F  unused, zero
//! 0x050 ..= 0x09F  hex digit font, 16 glyphs of 5 rows
//! 0x0A0 ..= 0x1FF  unused, zero
//! 0x200 ..= 0xFFF  program (up to 3584 bytes)
//! ```
//!
//! Unlike the COSMAC VIP, the registers, stack and display buffer do not live
//! in addressable memory. Programs can only see the 4096 bytes above. All
//! accesses through [`Ram::read`] and [`Ram::write`] are masked to 12 bits, so
//! an out of range address wraps back to the start of memory instead of
//! panicking.

use std::ops::Range;

use crate::{Error, Result};

pub const MEMORY_SIZE: usize = 0x1000;
pub const ADDRESS_MASK: u16 = 0x0FFF;

pub const FONT_START_ADDRESS: usize = 0x050;
pub const PROGRAM_START_ADDRESS: usize = 0x200;
pub const PROGRAM_LAST_ADDRESS: usize = MEMORY_SIZE - 1;
pub const PROGRAM_MAX_SIZE: usize = PROGRAM_LAST_ADDRESS - PROGRAM_START_ADDRESS + 1;

/// Each hex digit glyph is 4 pixels wide (high nibble) and 5 rows tall.
pub const GLYPH_HEIGHT: usize = 5;

#[rustfmt::skip]
pub const FONT: [u8; 16 * GLYPH_HEIGHT] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

pub const FONT_RANGE: Range<usize> = FONT_START_ADDRESS..FONT_START_ADDRESS + FONT.len();

/// The 4K of byte addressable memory a program can see.
#[derive(Clone, PartialEq, Eq)]
pub struct Ram {
    cells: [u8; MEMORY_SIZE],
}

impl Ram {
    /// All zero. No font installed.
    pub fn new() -> Self {
        Self {
            cells: [0; MEMORY_SIZE],
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Read the byte at a 12-bit address. Higher bits are ignored.
    pub fn read(&self, address: u16) -> u8 {
        self.cells[(address & ADDRESS_MASK) as usize]
    }

    /// Write the byte at a 12-bit address. Higher bits are ignored.
    pub fn write(&mut self, address: u16, value: u8) {
        self.cells[(address & ADDRESS_MASK) as usize] = value;
    }

    /// Fetch a big endian instruction word. The second byte of a word fetched
    /// from `0xFFF` comes from `0x000`.
    pub fn read_word(&self, address: u16) -> u16 {
        u16::from_be_bytes([self.read(address), self.read(address.wrapping_add(1))])
    }

    /// Copy `bytes` into memory at `address`, all or nothing.
    ///
    /// ```
    /// # use chip8_vm::memory::Ram;
    /// let mut ram = Ram::new();
    /// ram.load_bytes(&[0xDE, 0xAD], 0x0FFE).unwrap();
    /// assert_eq!(ram.read_word(0x0FFE), 0xDEAD);
    /// assert!(ram.load_bytes(&[0xDE, 0xAD], 0x0FFF).is_err());
    /// ```
    ///
    /// # Errors
    /// [`Error::RamOverflow`] if the block would run past `0xFFF`. Unlike
    /// single byte accesses, block copies do not wrap.
    pub fn load_bytes(&mut self, bytes: &[u8], address: usize) -> Result<()> {
        let end = address
            .checked_add(bytes.len())
            .filter(|end| *end <= MEMORY_SIZE)
            .ok_or(Error::RamOverflow)?;
        self.cells[address..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Install the hex digit font at [`FONT_START_ADDRESS`].
    pub fn load_font(&mut self) {
        self.cells[FONT_RANGE].copy_from_slice(&FONT);
    }

    /// Copy a program to [`PROGRAM_START_ADDRESS`].
    ///
    /// # Errors
    /// [`Error::EmptyRom`] or [`Error::RomTooLarge`]. Memory is untouched on
    /// failure.
    pub fn load_chip8_program(&mut self, program: &[u8]) -> Result<()> {
        if program.is_empty() {
            return Err(Error::EmptyRom);
        }
        if program.len() > PROGRAM_MAX_SIZE {
            return Err(Error::RomTooLarge(program.len()));
        }
        self.load_bytes(program, PROGRAM_START_ADDRESS)
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ram {
    /// Only the start of the program area; 4K of hex is useless in a log.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ram {{ program: {:02X?}.. }}",
            &self.cells[PROGRAM_START_ADDRESS..][..8]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Ram, FONT, FONT_RANGE, FONT_START_ADDRESS, MEMORY_SIZE, PROGRAM_LAST_ADDRESS,
        PROGRAM_MAX_SIZE, PROGRAM_START_ADDRESS,
    };
    use crate::Error;

    #[test]
    fn layout() {
        assert_eq!(MEMORY_SIZE, 4096);
        assert_eq!(PROGRAM_START_ADDRESS, 0x200);
        assert_eq!(PROGRAM_LAST_ADDRESS, 0xFFF);
        assert_eq!(PROGRAM_MAX_SIZE, 3584);
        assert_eq!(FONT_RANGE, 0x50..0xA0);
    }

    #[test]
    fn block_copies_do_not_wrap() {
        let mut ram = Ram::new();
        assert_eq!(ram.load_bytes(&[1, 2], MEMORY_SIZE - 1), Err(Error::RamOverflow));
        assert_eq!(ram.load_bytes(&[1], MEMORY_SIZE), Err(Error::RamOverflow));
        assert_eq!(ram.load_bytes(&[1], usize::MAX), Err(Error::RamOverflow));
        assert!(ram.bytes().iter().all(|b| *b == 0));
        assert!(ram.load_bytes(&[], MEMORY_SIZE).is_ok());
    }

    #[test]
    fn block_copy_touches_only_its_range() {
        let mut ram = Ram::new();
        ram.load_bytes(&[0xAA; 6], 0x300).unwrap();
        ram.load_bytes(&chip8_program_into_bytes!(0x1234), 0x302).unwrap();
        assert_eq!(&ram.bytes()[0x300..0x306], &[0xAA, 0xAA, 0x12, 0x34, 0xAA, 0xAA]);
        assert_eq!(ram.read_word(0x302), 0x1234);
    }

    #[test]
    fn addresses_wrap_at_twelve_bits() {
        let mut ram = Ram::new();
        ram.write(0x1005, 0xAB);
        assert_eq!(ram.read(0x0005), 0xAB);
        assert_eq!(ram.read(0xF005), 0xAB);

        ram.write(0x0FFF, 0x12);
        ram.write(0x0000, 0x34);
        assert_eq!(ram.read_word(0x0FFF), 0x1234);
    }

    #[test]
    fn font_is_installed_at_0x50() {
        let mut ram = Ram::new();
        ram.load_font();
        assert_eq!(&ram.bytes()[FONT_RANGE], &FONT[..]);
        assert_eq!(ram.read(FONT_START_ADDRESS as u16 - 1), 0);
        assert_eq!(ram.read(FONT_RANGE.end as u16), 0);
    }

    #[test]
    fn program_lands_at_0x200() {
        let mut ram = Ram::new();
        ram.load_chip8_program(&chip8_program_into_bytes!(0x00E0 0x1200))
            .unwrap();
        assert_eq!(ram.read_word(0x200), 0x00E0);
        assert_eq!(ram.read_word(0x202), 0x1200);
        assert_eq!(ram.read(0x1FF), 0);
    }

    #[test]
    fn program_size_limits() {
        let mut ram = Ram::new();
        assert_eq!(ram.load_chip8_program(&[]), Err(Error::EmptyRom));
        assert_eq!(
            ram.load_chip8_program(&[0x11; PROGRAM_MAX_SIZE + 1]),
            Err(Error::RomTooLarge(PROGRAM_MAX_SIZE + 1))
        );
        assert!(ram.bytes().iter().all(|b| *b == 0));

        ram.load_chip8_program(&[0x11; PROGRAM_MAX_SIZE]).unwrap();
        assert_eq!(ram.read(0xFFF), 0x11);
    }

    #[test]
    fn program_macro_is_big_endian() {
        let bytes = chip8_program_into_bytes!(0x1122 NOOP);
        assert_eq!(bytes, [0x11, 0x22, 0x70, 0x00]);
    }
}
