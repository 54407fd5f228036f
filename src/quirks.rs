//! Compatibility quirks.
//!
//! Several CHIP-8 instructions behave differently depending on which
//! historical interpreter a program was written against. Each divergence is a
//! named flag here, so the interpreter can match on them exhaustively.

/// The set of behaviour toggles used by the interpreter for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// `8XY6`/`8XYE` shift `VX` in place instead of shifting `VY` into `VX`.
    pub shift_uses_vx: bool,
    /// `FX55`/`FX65` advance `I` by `X` instead of `X + 1`.
    pub memory_increment_by_x: bool,
    /// `FX55`/`FX65` leave `I` untouched. Takes precedence over
    /// `memory_increment_by_x`.
    pub memory_leave_i_unchanged: bool,
    /// `BNNN` jumps to `NNN + VX` instead of `NNN + V0`.
    pub jump_adds_vx: bool,
    /// Sprite pixels wrap around the screen edges instead of being clipped.
    pub wrap_sprites: bool,
    /// `8XY1`/`8XY2`/`8XY3` clear `VF`.
    pub vf_reset: bool,
    /// Treat the word `0000` as a request to stop the machine. This is an
    /// extension, not part of the original instruction set.
    pub halt_on_zero: bool,
}

/// Named quirk presets for well known interpreters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Profile {
    /// Every quirk disabled.
    #[default]
    Default,
    /// The original COSMAC VIP interpreter.
    Cosmac,
    /// SUPER-CHIP 1.1 on the HP48.
    Schip,
}

impl Quirks {
    const SHIFT_USES_VX: u8 = 1 << 0;
    const MEMORY_INCREMENT_BY_X: u8 = 1 << 1;
    const MEMORY_LEAVE_I_UNCHANGED: u8 = 1 << 2;
    const JUMP_ADDS_VX: u8 = 1 << 3;
    const WRAP_SPRITES: u8 = 1 << 4;
    const VF_RESET: u8 = 1 << 5;
    const HALT_ON_ZERO: u8 = 1 << 6;

    /// Every bit that [`Quirks::to_bits`] may set.
    pub const KNOWN_BITS: u8 = 0x7F;

    /// Pack the flags into a single byte, one bit per flag.
    pub fn to_bits(self) -> u8 {
        [
            (self.shift_uses_vx, Self::SHIFT_USES_VX),
            (self.memory_increment_by_x, Self::MEMORY_INCREMENT_BY_X),
            (self.memory_leave_i_unchanged, Self::MEMORY_LEAVE_I_UNCHANGED),
            (self.jump_adds_vx, Self::JUMP_ADDS_VX),
            (self.wrap_sprites, Self::WRAP_SPRITES),
            (self.vf_reset, Self::VF_RESET),
            (self.halt_on_zero, Self::HALT_ON_ZERO),
        ]
        .iter()
        .filter(|(enabled, _)| *enabled)
        .fold(0, |bits, (_, bit)| bits | bit)
    }

    /// Unpack flags written by [`Quirks::to_bits`]. Returns `None` if any
    /// unknown bit is set.
    pub fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::KNOWN_BITS != 0 {
            return None;
        }
        Some(Self {
            shift_uses_vx: bits & Self::SHIFT_USES_VX != 0,
            memory_increment_by_x: bits & Self::MEMORY_INCREMENT_BY_X != 0,
            memory_leave_i_unchanged: bits & Self::MEMORY_LEAVE_I_UNCHANGED != 0,
            jump_adds_vx: bits & Self::JUMP_ADDS_VX != 0,
            wrap_sprites: bits & Self::WRAP_SPRITES != 0,
            vf_reset: bits & Self::VF_RESET != 0,
            halt_on_zero: bits & Self::HALT_ON_ZERO != 0,
        })
    }
}

impl From<Profile> for Quirks {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Default => Quirks::default(),
            Profile::Cosmac => Quirks {
                vf_reset: true,
                ..Quirks::default()
            },
            Profile::Schip => Quirks {
                shift_uses_vx: true,
                memory_leave_i_unchanged: true,
                jump_adds_vx: true,
                ..Quirks::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Profile, Quirks};

    #[test]
    fn default_has_no_quirks() {
        assert_eq!(Quirks::default().to_bits(), 0);
        assert_eq!(Quirks::from(Profile::Default), Quirks::default());
    }

    #[test]
    fn bits_cover_every_flag() {
        let all = Quirks {
            shift_uses_vx: true,
            memory_increment_by_x: true,
            memory_leave_i_unchanged: true,
            jump_adds_vx: true,
            wrap_sprites: true,
            vf_reset: true,
            halt_on_zero: true,
        };
        assert_eq!(all.to_bits(), Quirks::KNOWN_BITS);
        assert_eq!(Quirks::from_bits(Quirks::KNOWN_BITS), Some(all));
    }

    #[test]
    fn unknown_bits_are_rejected() {
        assert_eq!(Quirks::from_bits(0x80), None);
        assert_eq!(Quirks::from_bits(0x81), None);
    }

    #[test]
    fn schip_profile() {
        let quirks = Quirks::from(Profile::Schip);
        assert!(quirks.shift_uses_vx);
        assert!(quirks.memory_leave_i_unchanged);
        assert!(quirks.jump_adds_vx);
        assert!(!quirks.vf_reset);
        assert!(!quirks.wrap_sprites);
    }
}
