//! SQLite snapshot of a trace session
//!
//! Every save writes the whole session: the four tables are dropped, recreated
//! and refilled inside a single transaction. Nothing is incremental.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};
use rusqlite::{params, Connection};

use crate::config::{SaveOptions, SaveStrategy};
use crate::error::{Result, TraceError};
use crate::session::TraceSession;

/// `references_.type` for a direct reference
pub const DIRECT_REFERENCE: u8 = 0;

/// `references_.type` for an indirect reference
pub const INDIRECT_REFERENCE: u8 = 1;

const SCHEMA: &str = "
    DROP TABLE IF EXISTS instructions;
    CREATE TABLE instructions(pc      INTEGER PRIMARY KEY,
                              opcode  INTEGER NOT NULL,
                              size    INTEGER NOT NULL,
                              operand INTEGER NULL);

    DROP TABLE IF EXISTS references_;
    CREATE TABLE references_(pointer INTEGER,
                             pointee INTEGER,
                             type    INTEGER,
                             PRIMARY KEY (pointer, pointee, type));

    DROP TABLE IF EXISTS dma;
    CREATE TABLE dma(source      INTEGER,
                     destination INTEGER,
                     bytes       INTEGER,
                     PRIMARY KEY (source, destination, bytes));

    DROP TABLE IF EXISTS vectors;
    CREATE TABLE vectors(pc   INTEGER PRIMARY KEY,
                         type INTEGER NOT NULL);
";

/// Row counts of a completed save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub path: PathBuf,
    pub instructions: usize,
    pub references: usize,
    pub dma_transfers: usize,
    pub vectors: usize,
}

impl TraceSession {
    /// Write `<directory>/gilgamesh.db`, replacing its tables in place
    pub fn save(&self, directory: impl AsRef<Path>) -> Result<SaveSummary> {
        self.save_with(directory, &SaveOptions::default())
    }

    /// Write the database into `directory` as described by `options`.
    ///
    /// The session itself is never modified. With [`SaveStrategy::InPlace`] a
    /// failure after the schema step leaves the target without (complete)
    /// tables; the caller has to save again.
    pub fn save_with(
        &self,
        directory: impl AsRef<Path>,
        options: &SaveOptions,
    ) -> Result<SaveSummary> {
        let path = directory.as_ref().join(&options.file_name);

        let result = match options.strategy {
            SaveStrategy::InPlace => self.write_database(&path),
            SaveStrategy::AtomicRename => self.write_and_rename(&path),
        };

        match &result {
            Ok(summary) => info!(
                "saved {} instructions, {} references, {} dma transfers, {} vectors to {}",
                summary.instructions,
                summary.references,
                summary.dma_transfers,
                summary.vectors,
                path.display()
            ),
            Err(e) => error!("trace save failed: {}", e),
        }
        result
    }

    fn write_and_rename(&self, path: &Path) -> Result<SaveSummary> {
        let mut temp = path.as_os_str().to_owned();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        // A leftover from an earlier crash would otherwise be reused as-is
        if temp.exists() {
            fs::remove_file(&temp).map_err(|source| TraceError::Io { path: temp.clone(), source })?;
        }

        let summary = match self.write_database(&temp) {
            Ok(summary) => summary,
            Err(e) => {
                let _ = fs::remove_file(&temp);
                return Err(e);
            }
        };

        fs::rename(&temp, path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(SaveSummary {
            path: path.to_path_buf(),
            ..summary
        })
    }

    fn write_database(&self, path: &Path) -> Result<SaveSummary> {
        let mut conn = Connection::open(path).map_err(|source| TraceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let summary = self.write_tables(&mut conn, path)?;

        // Surface close errors instead of losing them in Drop
        conn.close().map_err(|(_, e)| TraceError::Statement(e))?;
        Ok(summary)
    }

    fn write_tables(&self, conn: &mut Connection, path: &Path) -> Result<SaveSummary> {
        conn.execute_batch(SCHEMA)?;

        let mut summary = SaveSummary {
            path: path.to_path_buf(),
            instructions: 0,
            references: 0,
            dma_transfers: 0,
            vectors: 0,
        };

        // Dropped without commit on any early return, which rolls back
        let tx = conn.transaction()?;
        {
            let mut insert_instruction =
                tx.prepare("INSERT INTO instructions VALUES (?1, ?2, ?3, ?4)")?;
            let mut insert_reference = tx.prepare("INSERT INTO references_ VALUES (?1, ?2, ?3)")?;
            let mut insert_dma = tx.prepare("INSERT INTO dma VALUES (?1, ?2, ?3)")?;
            let mut insert_vector = tx.prepare("INSERT INTO vectors VALUES (?1, ?2)")?;

            for record in self.instructions() {
                insert_instruction.execute(params![
                    record.pc(),
                    record.opcode,
                    record.size,
                    record.operand
                ])?;
                summary.instructions += 1;

                for &pointee in &record.references {
                    insert_reference.execute(params![record.pc(), pointee, DIRECT_REFERENCE])?;
                    summary.references += 1;
                }
                for &pointee in &record.indirect_references {
                    insert_reference.execute(params![record.pc(), pointee, INDIRECT_REFERENCE])?;
                    summary.references += 1;
                }
            }

            for transfer in self.dma_transfers() {
                insert_dma.execute(params![
                    transfer.source,
                    transfer.destination as u8,
                    transfer.bytes
                ])?;
                summary.dma_transfers += 1;
            }

            for (pc, kind) in self.vectors() {
                insert_vector.execute(params![pc, kind as u8])?;
                summary.vectors += 1;
            }
        }
        tx.commit()?;

        Ok(summary)
    }
}
