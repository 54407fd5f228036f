//! Decoding of 16-bit instruction words.
use std::fmt;

/// A raw instruction word split into the nibble fields every CHIP-8
/// instruction is built from. Decoding never fails; whether the word names a
/// real instruction is decided when it is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub word: u16,
    pub op: u8,
    pub x: usize,
    pub y: usize,
    pub n: u8,
    pub nn: u8,
    pub nnn: u16,
}

impl Instruction {
    pub fn decode(word: u16) -> Self {
        Self {
            word,
            op: ((word & 0xF000) >> 12) as u8,
            x: ((word & 0x0F00) >> 8) as usize,
            y: ((word & 0x00F0) >> 4) as usize,
            n: (word & 0x000F) as u8,
            nn: (word & 0x00FF) as u8,
            nnn: word & 0x0FFF,
        }
    }
}

impl From<u16> for Instruction {
    fn from(word: u16) -> Self {
        Self::decode(word)
    }
}

impl From<[u8; 2]> for Instruction {
    fn from(bytes: [u8; 2]) -> Self {
        Self::decode(u16::from_be_bytes(bytes))
    }
}

impl fmt::Display for Instruction {
    /// Mnemonics follow Cowgod's Chip-8 Technical Reference. Words that do not
    /// name an instruction are shown as `???`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Instruction {
            op, x, y, n, nn, nnn, ..
        } = *self;

        match (op, x, y, n) {
            (0x0, 0x0, 0xE, 0x0) => write!(f, "CLS"),
            (0x0, 0x0, 0xE, 0xE) => write!(f, "RET"),
            (0x1, ..) => write!(f, "JP {:#05X}", nnn),
            (0x2, ..) => write!(f, "CALL {:#05X}", nnn),
            (0x3, ..) => write!(f, "SE V{:X}, {:#04X}", x, nn),
            (0x4, ..) => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            (0x5, _, _, 0x0) => write!(f, "SE V{:X}, V{:X}", x, y),
            (0x6, ..) => write!(f, "LD V{:X}, {:#04X}", x, nn),
            (0x7, ..) => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            (0x8, _, _, 0x0) => write!(f, "LD V{:X}, V{:X}", x, y),
            (0x8, _, _, 0x1) => write!(f, "OR V{:X}, V{:X}", x, y),
            (0x8, _, _, 0x2) => write!(f, "AND V{:X}, V{:X}", x, y),
            (0x8, _, _, 0x3) => write!(f, "XOR V{:X}, V{:X}", x, y),
            (0x8, _, _, 0x4) => write!(f, "ADD V{:X}, V{:X}", x, y),
            (0x8, _, _, 0x5) => write!(f, "SUB V{:X}, V{:X}", x, y),
            (0x8, _, _, 0x6) => write!(f, "SHR V{:X}, V{:X}", x, y),
            (0x8, _, _, 0x7) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            (0x8, _, _, 0xE) => write!(f, "SHL V{:X}, V{:X}", x, y),
            (0x9, _, _, 0x0) => write!(f, "SNE V{:X}, V{:X}", x, y),
            (0xA, ..) => write!(f, "LD I, {:#05X}", nnn),
            (0xB, ..) => write!(f, "JP V0, {:#05X}", nnn),
            (0xC, ..) => write!(f, "RND V{:X}, {:#04X}", x, nn),
            (0xD, ..) => write!(f, "DRW V{:X}, V{:X}, {:#03X}", x, y, n),
            (0xE, _, 0x9, 0xE) => write!(f, "SKP V{:X}", x),
            (0xE, _, 0xA, 0x1) => write!(f, "SKNP V{:X}", x),
            (0xF, _, 0x0, 0x7) => write!(f, "LD V{:X}, DT", x),
            (0xF, _, 0x0, 0xA) => write!(f, "LD V{:X}, K", x),
            (0xF, _, 0x1, 0x5) => write!(f, "LD DT, V{:X}", x),
            (0xF, _, 0x1, 0x8) => write!(f, "LD ST, V{:X}", x),
            (0xF, _, 0x1, 0xE) => write!(f, "ADD I, V{:X}", x),
            (0xF, _, 0x2, 0x9) => write!(f, "LD F, V{:X}", x),
            (0xF, _, 0x3, 0x3) => write!(f, "LD B, V{:X}", x),
            (0xF, _, 0x5, 0x5) => write!(f, "LD [I], V{:X}", x),
            (0xF, _, 0x6, 0x5) => write!(f, "LD V{:X}, [I]", x),
            _ => write!(f, "???"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction;

    #[test]
    fn nibble_fields() {
        let instruction = Instruction::decode(0xD12F);
        assert_eq!(instruction.op, 0xD);
        assert_eq!(instruction.x, 0x1);
        assert_eq!(instruction.y, 0x2);
        assert_eq!(instruction.n, 0xF);
        assert_eq!(instruction.nn, 0x2F);
        assert_eq!(instruction.nnn, 0x12F);
        assert_eq!(instruction.word, 0xD12F);
    }

    #[test]
    fn from_big_endian_bytes() {
        assert_eq!(Instruction::from([0xA2, 0x00]), Instruction::decode(0xA200));
    }

    #[test]
    fn every_word_decodes() {
        for word in 0..=u16::MAX {
            let instruction = Instruction::decode(word);
            assert_eq!(instruction.word, word);
            assert!(instruction.x < 16 && instruction.y < 16);
        }
    }

    #[test]
    fn mnemonics() {
        let cases = [
            (0x00E0, "CLS"),
            (0x00EE, "RET"),
            (0x123F, "JP 0x23F"),
            (0x312F, "SE V1, 0x2F"),
            (0x51F0, "SE V1, VF"),
            (0x81F4, "ADD V1, VF"),
            (0x81FE, "SHL V1, VF"),
            (0xA1CD, "LD I, 0x1CD"),
            (0xD12F, "DRW V1, V2, 0xF"),
            (0xE1A1, "SKNP V1"),
            (0xF10A, "LD V1, K"),
            (0xF165, "LD V1, [I]"),
            (0x0000, "???"),
            (0x5121, "???"),
            (0xF1FF, "???"),
        ];
        for (word, mnemonic) in cases {
            assert_eq!(Instruction::decode(word).to_string(), mnemonic, "{:04X}", word);
        }
    }
}
