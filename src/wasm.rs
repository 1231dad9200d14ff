//! Browser bindings
//!
//! A JS-hosted emulator mirrors its bus into a [`FlatMemory`] (or just the banks
//! it executes from) and forwards the trace hooks. SQLite is not available in
//! the browser, so queries are answered straight from the session.

use wasm_bindgen::prelude::*;

use crate::bus::FlatMemory;
use crate::registers::{Registers, StatusFlags};
use crate::session::{DmaDestination, TraceSession, VectorKind};

#[wasm_bindgen]
pub struct WasmTraceSession {
    session: TraceSession,
    memory: FlatMemory,
    regs: Registers,
}

#[wasm_bindgen]
impl WasmTraceSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmTraceSession {
        WasmTraceSession {
            session: TraceSession::new(),
            memory: FlatMemory::new(),
            regs: Registers::new(),
        }
    }

    /// Copy a block of the emulated bus into the debug view
    pub fn load_memory(&mut self, addr: u32, bytes: &[u8]) {
        self.memory.load(addr, bytes);
    }

    pub fn write_memory(&mut self, addr: u32, value: u8) {
        self.memory.write(addr, value);
    }

    /// Set the register snapshot used by the next `record_execution` calls
    #[allow(clippy::too_many_arguments)]
    pub fn set_registers(
        &mut self,
        x: u16,
        y: u16,
        s: u16,
        d: u16,
        pbr: u8,
        dbr: u8,
        p: u8,
        emulation: bool,
    ) {
        self.regs.x = x;
        self.regs.y = y;
        self.regs.s = s;
        self.regs.d = d;
        self.regs.pbr = pbr;
        self.regs.dbr = dbr;
        self.regs.p = StatusFlags::from_byte(p, emulation);
    }

    pub fn record_execution(&mut self, bank: u8, address: u16) {
        self.session.record_execution(bank, address, &self.regs, &self.memory);
    }

    /// `kind`: 0 = reset, 1 = NMI, 2 = IRQ
    pub fn record_vector(&mut self, pc: u32, kind: u8) -> Result<(), JsValue> {
        let kind =
            VectorKind::from_u8(kind).ok_or_else(|| JsValue::from_str("unknown vector kind"))?;
        self.session.record_vector(pc, kind);
        Ok(())
    }

    /// `destination`: 0 = VRAM, 1 = CGRAM, 2 = OAM
    pub fn record_dma(
        &mut self,
        source_bank: u8,
        source_address: u16,
        destination: u8,
        bytes: u16,
    ) -> Result<(), JsValue> {
        let destination = DmaDestination::from_u8(destination)
            .ok_or_else(|| JsValue::from_str("unknown dma destination"))?;
        self.session.record_dma_from(source_bank, source_address, destination, bytes);
        Ok(())
    }

    pub fn instruction_count(&self) -> usize {
        self.session.len()
    }

    /// Instruction size at `pc`, 0 if never executed
    pub fn instruction_size(&self, pc: u32) -> u8 {
        self.session.instruction(pc).map_or(0, |record| record.size)
    }

    /// P register the instruction at `pc` last ran under, 0 if never executed
    pub fn instruction_flags(&self, pc: u32) -> u8 {
        self.session.instruction(pc).map_or(0, |record| record.flags)
    }

    pub fn references(&self, pc: u32) -> Vec<u32> {
        self.session
            .instruction(pc)
            .map(|record| record.references.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn indirect_references(&self, pc: u32) -> Vec<u32> {
        self.session
            .instruction(pc)
            .map(|record| record.indirect_references.iter().copied().collect())
            .unwrap_or_default()
    }

    /// PCs of instructions that directly reference `address`
    pub fn referrers(&self, address: u32) -> Vec<u32> {
        self.session.referrers_of(address)
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.memory.clear();
        self.regs = Registers::new();
    }
}

impl Default for WasmTraceSession {
    fn default() -> Self {
        Self::new()
    }
}
