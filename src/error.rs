use std::fmt;

/// The error type used throughout this library.
#[derive(Debug, PartialEq)]
pub enum Error {
    EmptyRom,
    RomTooLarge(usize),
    RomUnreadable(String),
    RamOverflow,
    SnapshotLength(usize),
    SnapshotMagic,
    SnapshotVersion(u8),
    SnapshotQuirks(u8),
    SnapshotStackPointer(u8),
    SnapshotUnreadable(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyRom => write!(f, "Rom is empty!"),
            Error::RomTooLarge(size) => write!(f, "Rom with size {} bytes is too large!", size),
            Error::RomUnreadable(reason) => write!(f, "Rom could not be read: {}", reason),
            Error::RamOverflow => write!(f, "Write extends beyond the end of RAM!"),
            Error::SnapshotLength(size) => {
                write!(f, "Snapshot has unexpected size of {} bytes", size)
            }
            Error::SnapshotMagic => write!(f, "Data is not a CHIP-8 snapshot"),
            Error::SnapshotVersion(version) => {
                write!(f, "Snapshot version {} is not supported", version)
            }
            Error::SnapshotQuirks(bits) => {
                write!(f, "Snapshot contains unknown quirk bits {:#04X}", bits)
            }
            Error::SnapshotStackPointer(sp) => {
                write!(f, "Snapshot stack pointer {} is out of range", sp)
            }
            Error::SnapshotUnreadable(reason) => {
                write!(f, "Snapshot could not be read: {}", reason)
            }
        }
    }
}

impl std::error::Error for Error {}
