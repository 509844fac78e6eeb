//! Register field locations and the codec that reads/writes them.

use crate::ec::{self, EcAccess};

/// One logical field in the EC's register space: a single bit of a byte
/// register, or the whole byte.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldLocation {
    /// Bit `bit` (0 = least significant) of the byte at `address`.
    Bit { address: u8, bit: u8 },
    /// The whole byte at `address`.
    Byte { address: u8 },
}

impl FieldLocation {
    /// A single-bit field. `bit` must be 0..=7.
    pub const fn bit(address: u8, bit: u8) -> Self {
        assert!(bit < 8);

        Self::Bit { address, bit }
    }

    /// A whole-byte field.
    pub const fn byte(address: u8) -> Self {
        Self::Byte { address }
    }

    /// The EC register address this field lives in.
    pub const fn address(&self) -> u8 {
        match *self {
            Self::Bit { address, .. } | Self::Byte { address } => address,
        }
    }

    /// Read the field's value: 0 or 1 for a bit field, the raw byte
    /// otherwise.
    pub fn read(&self, ec: &mut impl EcAccess) -> ec::Result<u8> {
        match *self {
            Self::Bit { address, bit } => Ok((ec.read_byte(address)? >> bit) & 1),
            Self::Byte { address } => ec.read_byte(address),
        }
    }

    /// Write the field's value. A bit field treats any nonzero `value` as
    /// "set" and goes through a read-modify-write of the containing byte,
    /// leaving the other seven bits untouched; if the initial read fails the
    /// byte is never written.
    pub fn write(&self, ec: &mut impl EcAccess, value: u8) -> ec::Result<()> {
        match *self {
            Self::Bit { address, bit } => {
                let stored = ec.read_byte(address)?;
                let updated = if value > 0 {
                    stored | (1 << bit)
                } else {
                    stored & !(1 << bit)
                };

                ec.write_byte(address, updated)
            }
            Self::Byte { address } => ec.write_byte(address, value),
        }
    }
}
