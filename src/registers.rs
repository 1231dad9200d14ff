//! 65816 register snapshot
//!
//! The trace recorder never runs the CPU itself. The host emulator hands over
//! a copy of the register file at the moment an instruction is about to execute,
//! and the resolver reads the index registers, bank registers and width flags
//! from it.

/// Processor Status Flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFlags {
    /// Negative flag
    pub n: bool,

    /// Overflow flag
    pub v: bool,

    /// Accumulator register size (0 = 16-bit, 1 = 8-bit) - Native mode only
    pub m: bool,

    /// Index register size (0 = 16-bit, 1 = 8-bit) - Native mode only
    pub x: bool,

    /// Decimal mode flag
    pub d: bool,

    /// IRQ disable flag
    pub i: bool,

    /// Zero flag
    pub z: bool,

    /// Carry flag
    pub c: bool,

    /// Emulation mode flag (1 = 6502 emulation, 0 = native 65816)
    pub e: bool,
}

impl StatusFlags {
    /// Power-on state: emulation mode, 8-bit registers, IRQs disabled
    pub fn new() -> Self {
        StatusFlags {
            n: false,
            v: false,
            m: true,
            x: true,
            d: false,
            i: true,
            z: false,
            c: false,
            e: true,
        }
    }

    /// Native mode with 16-bit accumulator and index registers
    pub fn native16() -> Self {
        StatusFlags {
            m: false,
            x: false,
            e: false,
            ..Self::new()
        }
    }

    /// Pack the P register (E is not part of P)
    pub fn to_byte(&self) -> u8 {
        (if self.n { 0x80 } else { 0 }) |
        (if self.v { 0x40 } else { 0 }) |
        (if self.m { 0x20 } else { 0 }) |
        (if self.x { 0x10 } else { 0 }) |
        (if self.d { 0x08 } else { 0 }) |
        (if self.i { 0x04 } else { 0 }) |
        (if self.z { 0x02 } else { 0 }) |
        (if self.c { 0x01 } else { 0 })
    }

    /// Build flags from a P register value and the emulation bit
    pub fn from_byte(value: u8, emulation: bool) -> Self {
        StatusFlags {
            n: (value & 0x80) != 0,
            v: (value & 0x40) != 0,
            m: (value & 0x20) != 0,
            x: (value & 0x10) != 0,
            d: (value & 0x08) != 0,
            i: (value & 0x04) != 0,
            z: (value & 0x02) != 0,
            c: (value & 0x01) != 0,
            e: emulation,
        }
    }

    /// True when the accumulator (and memory operands) are 8 bits wide.
    /// Emulation mode forces 8-bit regardless of M.
    #[inline]
    pub fn accumulator_8bit(&self) -> bool {
        self.e || self.m
    }

    /// True when X and Y are 8 bits wide
    #[inline]
    pub fn index_8bit(&self) -> bool {
        self.e || self.x
    }
}

impl Default for StatusFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// Register file copy taken just before an instruction executes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    /// X Index Register
    pub x: u16,

    /// Y Index Register
    pub y: u16,

    /// Stack Pointer
    pub s: u16,

    /// Direct Page Register
    pub d: u16,

    /// Program Bank Register
    pub pbr: u8,

    /// Data Bank Register
    pub dbr: u8,

    /// Processor Status Flags
    pub p: StatusFlags,
}

impl Registers {
    /// Register state right after reset
    pub fn new() -> Self {
        Registers {
            x: 0,
            y: 0,
            s: 0x01FF,
            d: 0,
            pbr: 0,
            dbr: 0,
            p: StatusFlags::new(),
        }
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_state() {
        let regs = Registers::new();
        assert_eq!(regs.s, 0x01FF);
        assert!(regs.p.e);
        assert!(regs.p.accumulator_8bit());
        assert!(regs.p.index_8bit());
    }

    #[test]
    fn test_flags_byte_packing() {
        let flags = StatusFlags::from_byte(0xA5, false);
        assert!(flags.n);
        assert!(!flags.v);
        assert!(flags.m);
        assert!(!flags.x);
        assert!(flags.i);
        assert!(flags.c);
        assert_eq!(flags.to_byte(), 0xA5);
    }

    #[test]
    fn test_emulation_forces_8bit() {
        let mut flags = StatusFlags::native16();
        assert!(!flags.accumulator_8bit());
        assert!(!flags.index_8bit());

        flags.e = true;
        assert!(flags.accumulator_8bit());
        assert!(flags.index_8bit());
    }
}
