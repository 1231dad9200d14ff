//! Read-only access to a saved trace database

use std::path::Path;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use crate::error::{Result, TraceError};
use crate::persist::{DIRECT_REFERENCE, INDIRECT_REFERENCE};
use crate::session::{DmaDestination, DmaTransfer, VectorKind};

/// How an instruction reached an address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Direct,
    Indirect,
}

/// One `references_` row seen from the pointee side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Referrer {
    /// PC of the referencing instruction
    pub pc: u32,
    pub kind: ReferenceKind,
}

/// One `instructions` row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredInstruction {
    pub pc: u32,
    pub opcode: u8,
    pub size: u8,
    pub operand: Option<u32>,
}

/// Saved trace database opened for queries
pub struct TraceDatabase {
    conn: Connection,
}

impl TraceDatabase {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| TraceError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(TraceDatabase { conn })
    }

    /// Instructions that read, write or point at `address`, in PC order
    pub fn referrers(&self, address: u32) -> Result<Vec<Referrer>> {
        let mut stmt = self.conn.prepare(
            "SELECT pointer, type FROM references_ WHERE pointee = ?1 ORDER BY pointer, type",
        )?;
        let rows = stmt.query_map([address], |row| {
            Ok((row.get::<_, u32>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut referrers = Vec::new();
        for row in rows {
            let (pc, kind) = row?;
            let kind = match kind {
                k if k == DIRECT_REFERENCE as i64 => ReferenceKind::Direct,
                k if k == INDIRECT_REFERENCE as i64 => ReferenceKind::Indirect,
                value => {
                    return Err(TraceError::InvalidValue {
                        kind: "reference type",
                        value,
                    })
                }
            };
            referrers.push(Referrer { pc, kind });
        }
        Ok(referrers)
    }

    /// Addresses referenced by the instruction at `pc`
    pub fn references_from(&self, pc: u32, kind: ReferenceKind) -> Result<Vec<u32>> {
        let kind = match kind {
            ReferenceKind::Direct => DIRECT_REFERENCE,
            ReferenceKind::Indirect => INDIRECT_REFERENCE,
        };
        let mut stmt = self.conn.prepare(
            "SELECT pointee FROM references_ WHERE pointer = ?1 AND type = ?2 ORDER BY pointee",
        )?;
        let rows = stmt.query_map(params![pc, kind], |row| row.get::<_, u32>(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn instruction(&self, pc: u32) -> Result<Option<StoredInstruction>> {
        let row = self
            .conn
            .query_row(
                "SELECT pc, opcode, size, operand FROM instructions WHERE pc = ?1",
                [pc],
                |row| {
                    Ok(StoredInstruction {
                        pc: row.get(0)?,
                        opcode: row.get(1)?,
                        size: row.get(2)?,
                        operand: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn instruction_count(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM instructions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Vector entry points in PC order
    pub fn vectors(&self) -> Result<Vec<(u32, VectorKind)>> {
        let mut stmt = self.conn.prepare("SELECT pc, type FROM vectors ORDER BY pc")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, u8>(1)?)))?;

        let mut vectors = Vec::new();
        for row in rows {
            let (pc, kind) = row?;
            let kind = VectorKind::from_u8(kind).ok_or(TraceError::InvalidValue {
                kind: "vector type",
                value: kind as i64,
            })?;
            vectors.push((pc, kind));
        }
        Ok(vectors)
    }

    pub fn dma_transfers(&self) -> Result<Vec<DmaTransfer>> {
        let mut stmt = self.conn.prepare(
            "SELECT source, destination, bytes FROM dma ORDER BY source, destination, bytes",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, u32>(0)?, row.get::<_, u8>(1)?, row.get::<_, u16>(2)?))
        })?;

        let mut transfers = Vec::new();
        for row in rows {
            let (source, destination, bytes) = row?;
            let destination = DmaDestination::from_u8(destination).ok_or(TraceError::InvalidValue {
                kind: "dma destination",
                value: destination as i64,
            })?;
            transfers.push(DmaTransfer {
                source,
                destination,
                bytes,
            });
        }
        Ok(transfers)
    }
}
