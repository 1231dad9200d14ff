//! Execution-trace cross-reference recorder for the 65816.
//!
//! The host emulator feeds every executed instruction, vector entry and DMA
//! transfer into a [`TraceSession`]. The session decodes each instruction's
//! addressing mode against the live register state, collects the addresses it
//! touches, and can be saved as a SQLite database for offline analysis.

pub mod bus;
pub mod config;
pub mod error;
pub mod modes;
pub mod registers;
pub mod resolver;
pub mod session;

#[cfg(feature = "sqlite")]
pub mod persist;
#[cfg(feature = "sqlite")]
pub mod query;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use bus::{DebugBus, FlatMemory};
pub use config::{SaveOptions, SaveStrategy, DEFAULT_DATABASE_NAME};
pub use error::{Result, TraceError};
pub use modes::AddressMode;
pub use registers::{Registers, StatusFlags};
pub use resolver::Decoded;
pub use session::{DmaDestination, DmaTransfer, InstructionRecord, TraceSession, VectorKind};

#[cfg(feature = "sqlite")]
pub use persist::SaveSummary;
#[cfg(feature = "sqlite")]
pub use query::{ReferenceKind, Referrer, StoredInstruction, TraceDatabase};
