//! Trace accumulation
//!
//! A [`TraceSession`] lives as long as one emulation run. The host calls
//! [`TraceSession::record_execution`] before every instruction it executes, and
//! the vector/DMA hooks when those events fire. Everything is keyed by value, so
//! the order of calls never matters for the final state.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};

use crate::bus::DebugBus;
use crate::registers::Registers;
use crate::resolver::{self, Decoded};

/// Interrupt/reset entry kinds, stored as their numeric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VectorKind {
    Reset = 0,
    Nmi = 1,
    Irq = 2,
}

impl VectorKind {
    pub fn from_u8(value: u8) -> Option<VectorKind> {
        match value {
            0 => Some(VectorKind::Reset),
            1 => Some(VectorKind::Nmi),
            2 => Some(VectorKind::Irq),
            _ => None,
        }
    }
}

/// B-bus target class of a DMA channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DmaDestination {
    Vram = 0,
    Cgram = 1,
    Oam = 2,
}

impl DmaDestination {
    pub fn from_u8(value: u8) -> Option<DmaDestination> {
        match value {
            0 => Some(DmaDestination::Vram),
            1 => Some(DmaDestination::Cgram),
            2 => Some(DmaDestination::Oam),
            _ => None,
        }
    }
}

/// One distinct DMA transfer shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DmaTransfer {
    /// 24-bit A-bus source address
    pub source: u32,

    pub destination: DmaDestination,

    /// Byte count as programmed (0 means 65536 to the hardware)
    pub bytes: u16,
}

impl DmaTransfer {
    pub fn new(
        source_bank: u8,
        source_address: u16,
        destination: DmaDestination,
        bytes: u16,
    ) -> Self {
        DmaTransfer {
            source: ((source_bank as u32) << 16) | (source_address as u32),
            destination,
            bytes,
        }
    }
}

/// Everything learned about the instruction at one PC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionRecord {
    pc: u32,

    /// Opcode seen on the latest visit
    pub opcode: u8,

    /// Length in bytes under the latest register context
    pub size: u8,

    /// Operand from the latest visit, `None` for implied forms
    pub operand: Option<u32>,

    /// P register of the latest visit; its M and X bits explain `size`
    pub flags: u8,

    /// Every direct reference ever formed
    pub references: BTreeSet<u32>,

    /// Every pointer target ever dereferenced
    pub indirect_references: BTreeSet<u32>,
}

impl InstructionRecord {
    fn new(pc: u32) -> Self {
        InstructionRecord {
            pc,
            opcode: 0,
            size: 1,
            operand: None,
            flags: 0,
            references: BTreeSet::new(),
            indirect_references: BTreeSet::new(),
        }
    }

    /// 24-bit program counter
    pub fn pc(&self) -> u32 {
        self.pc
    }

    pub fn bank(&self) -> u8 {
        (self.pc >> 16) as u8
    }

    pub fn address(&self) -> u16 {
        (self.pc & 0xFFFF) as u16
    }

    /// Fold a fresh decode into the record. Scalars take the latest values,
    /// reference sets only grow.
    fn merge(&mut self, decoded: &Decoded) {
        self.opcode = decoded.opcode;
        self.size = decoded.size;
        self.operand = decoded.operand;
        self.flags = decoded.flags;

        if let Some(reference) = decoded.reference {
            self.references.insert(reference);
        }
        if let Some(reference) = decoded.indirect_reference {
            self.indirect_references.insert(reference);
        }
    }
}

/// Accumulated trace state for one emulation run
#[derive(Debug, Clone, Default)]
pub struct TraceSession {
    instructions: BTreeMap<u32, InstructionRecord>,
    vectors: BTreeMap<u32, VectorKind>,
    dma_transfers: BTreeSet<DmaTransfer>,
}

impl TraceSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one executed instruction at `bank:address`.
    ///
    /// `regs` must be the register state the instruction executes with, and
    /// `bus` must expose the bytes at the PC and any pointer the instruction
    /// dereferences.
    pub fn record_execution<B: DebugBus + ?Sized>(
        &mut self,
        bank: u8,
        address: u16,
        regs: &Registers,
        bus: &B,
    ) -> &InstructionRecord {
        let pc = ((bank as u32) << 16) | (address as u32);
        let decoded = resolver::decode_at(bus, pc, regs);

        let record = match self.instructions.entry(pc) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                trace!(
                    "new instruction at {:06X}: opcode {:02X} ({:?})",
                    pc, decoded.opcode, decoded.mode
                );
                entry.insert(InstructionRecord::new(pc))
            }
        };
        record.merge(&decoded);
        record
    }

    /// Record that execution entered `pc` through a vector. Last kind wins.
    pub fn record_vector(&mut self, pc: u32, kind: VectorKind) {
        if self.vectors.insert(pc, kind) != Some(kind) {
            debug!("vector {:?} -> {:06X}", kind, pc);
        }
    }

    /// Record a DMA transfer; repeats of the same shape collapse
    pub fn record_dma(&mut self, transfer: DmaTransfer) {
        if self.dma_transfers.insert(transfer) {
            debug!(
                "dma {:06X} -> {:?}, {} bytes",
                transfer.source, transfer.destination, transfer.bytes
            );
        }
    }

    /// Hook shape matching the DMA engine's per-transfer callback
    pub fn record_dma_from(
        &mut self,
        source_bank: u8,
        source_address: u16,
        destination: DmaDestination,
        bytes: u16,
    ) {
        self.record_dma(DmaTransfer::new(source_bank, source_address, destination, bytes));
    }

    /// Drop all state, ready for a new run
    pub fn reset(&mut self) {
        self.instructions.clear();
        self.vectors.clear();
        self.dma_transfers.clear();
    }

    pub fn instruction(&self, pc: u32) -> Option<&InstructionRecord> {
        self.instructions.get(&pc)
    }

    /// Records in PC order
    pub fn instructions(&self) -> impl Iterator<Item = &InstructionRecord> {
        self.instructions.values()
    }

    pub fn vectors(&self) -> impl Iterator<Item = (u32, VectorKind)> + '_ {
        self.vectors.iter().map(|(&pc, &kind)| (pc, kind))
    }

    pub fn vector(&self, pc: u32) -> Option<VectorKind> {
        self.vectors.get(&pc).copied()
    }

    pub fn dma_transfers(&self) -> impl Iterator<Item = &DmaTransfer> {
        self.dma_transfers.iter()
    }

    /// Number of distinct PCs traced
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty() && self.vectors.is_empty() && self.dma_transfers.is_empty()
    }

    /// PCs whose direct references include `address`
    pub fn referrers_of(&self, address: u32) -> Vec<u32> {
        self.instructions
            .values()
            .filter(|record| record.references.contains(&address))
            .map(|record| record.pc)
            .collect()
    }
}
