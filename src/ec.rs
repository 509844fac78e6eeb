//! Basic wrapper for the `ec_sys` kernel module's debugfs interface.
//!
//! The embedded controller exposes a byte-addressable register space which
//! `ec_sys` maps at `/sys/kernel/debug/ec/ec0/io`: the byte at file offset
//! `n` is EC register `n`. Support here is deliberately minimal; all traffic
//! is single bytes (the EC protocol has no wider transactions), nothing is
//! retried, and writing requires the module to be loaded with
//! `write_support=1`.
//!
//! [`EcAccess`] is the seam the rest of this crate goes through, so tests and
//! embedders with a different transport (a direct port-I/O helper, a remote
//! debug bridge) can substitute their own implementation.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use thiserror::Error;

const EC0_IO_PATH: &str = "/sys/kernel/debug/ec/ec0/io";

/// Handy wrapper for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Which way a register access was going when it failed.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum Direction {
    Read,
    Write,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => f.write_str("reading from"),
            Self::Write => f.write_str("writing to"),
        }
    }
}

/// Bad things which could happen when talking to the embedded controller.
#[derive(Debug, Error)]
pub enum Error {
    /// The `ec_sys` kernel module is not available or not loaded.
    #[error("`ec_sys` kernel module not loaded")]
    KernelModuleNotLoaded {
        /// The source of the error. Usually an [`io::ErrorKind::NotFound`] is
        /// the kind of [`io::Error`].
        source: io::Error,
    },

    /// A register access failed. Carries the register address and the
    /// direction of the failed transfer.
    #[error("error {direction} embedded controller register 0x{address:02X}")]
    Access {
        /// The EC register address.
        address: u8,
        /// Whether the failure happened reading or writing.
        direction: Direction,
        /// The underlying I/O error.
        source: io::Error,
    },
}

/// Byte-addressed access to the embedded controller's register space.
///
/// One call maps to one EC transaction, so implementations may block for
/// EC-bus-scale latency on every call. No timeout or retry happens at this
/// layer; a stalled transport stalls the caller.
pub trait EcAccess {
    /// Read the byte at register `address`.
    fn read_byte(&mut self, address: u8) -> Result<u8>;

    /// Write `value` to the register at `address`.
    fn write_byte(&mut self, address: u8, value: u8) -> Result<()>;
}

/// The production transport: the `ec_sys` debugfs io file.
///
/// The file is opened per operation rather than held open, keeping each
/// register access independent and the type free of handle state.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct EcSys {
    io_path: PathBuf,
}

impl EcSys {
    /// The io file for the first EC at the default debugfs mount.
    pub fn new() -> Self {
        Self::with_path(EC0_IO_PATH)
    }

    /// Use a different io file, e.g. another EC or a non-standard mount.
    pub fn with_path(io_path: impl Into<PathBuf>) -> Self {
        Self {
            io_path: io_path.into(),
        }
    }

    fn open(&self, address: u8, direction: Direction) -> Result<File> {
        let file = match direction {
            Direction::Read => File::open(&self.io_path),
            Direction::Write => OpenOptions::new().write(true).open(&self.io_path),
        };

        file.map_err(|source| {
            if let io::ErrorKind::NotFound = source.kind() {
                Error::KernelModuleNotLoaded { source }
            } else {
                Error::Access {
                    address,
                    direction,
                    source,
                }
            }
        })
    }
}

impl Default for EcSys {
    fn default() -> Self {
        Self::new()
    }
}

impl EcAccess for EcSys {
    fn read_byte(&mut self, address: u8) -> Result<u8> {
        let mut file = self.open(address, Direction::Read)?;
        let mut value = [0u8; 1];

        file.seek(SeekFrom::Start(u64::from(address)))
            .and_then(|_| file.read_exact(&mut value))
            .map_err(|source| Error::Access {
                address,
                direction: Direction::Read,
                source,
            })?;

        Ok(value[0])
    }

    fn write_byte(&mut self, address: u8, value: u8) -> Result<()> {
        let mut file = self.open(address, Direction::Write)?;

        file.seek(SeekFrom::Start(u64::from(address)))
            .and_then(|_| file.write_all(&[value]))
            .map_err(|source| Error::Access {
                address,
                direction: Direction::Write,
                source,
            })?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashSet;

    /// In-memory EC with a write log and injectable per-address failures.
    pub(crate) struct FakeEc {
        pub registers: [u8; 256],
        pub writes: Vec<(u8, u8)>,
        failing: HashSet<u8>,
    }

    impl FakeEc {
        pub fn new() -> Self {
            Self {
                registers: [0; 256],
                writes: Vec::new(),
                failing: HashSet::new(),
            }
        }

        /// Preload register contents.
        pub fn with_registers(contents: &[(u8, u8)]) -> Self {
            let mut ec = Self::new();

            for &(address, value) in contents {
                ec.registers[usize::from(address)] = value;
            }

            ec
        }

        /// Make every access to `address` fail.
        pub fn failing_at(mut self, address: u8) -> Self {
            self.failing.insert(address);
            self
        }

        fn check(&self, address: u8, direction: Direction) -> Result<()> {
            if self.failing.contains(&address) {
                Err(Error::Access {
                    address,
                    direction,
                    source: io::Error::new(io::ErrorKind::Other, "injected ec failure"),
                })
            } else {
                Ok(())
            }
        }
    }

    impl EcAccess for FakeEc {
        fn read_byte(&mut self, address: u8) -> Result<u8> {
            self.check(address, Direction::Read)?;
            Ok(self.registers[usize::from(address)])
        }

        fn write_byte(&mut self, address: u8, value: u8) -> Result<()> {
            self.check(address, Direction::Write)?;
            self.registers[usize::from(address)] = value;
            self.writes.push((address, value));
            Ok(())
        }
    }
}
