//! Addressing-mode resolution
//!
//! Turns the bytes at a program counter plus a register snapshot into the
//! instruction's size, raw operand and the addresses it touches. This mirrors
//! the effective-address arithmetic of the CPU core, but only observes: nothing
//! here fetches through the live bus or advances the PC.

use crate::bus::DebugBus;
use crate::modes::AddressMode;
use crate::registers::Registers;

/// Result of decoding one instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// Opcode byte
    pub opcode: u8,

    /// Addressing-mode class of the opcode
    pub mode: AddressMode,

    /// Instruction length in bytes (1-4)
    pub size: u8,

    /// Raw operand, little-endian, `None` for implied forms
    pub operand: Option<u32>,

    /// Address formed directly by the addressing mode
    pub reference: Option<u32>,

    /// Address read out of the pointer at `reference`
    pub indirect_reference: Option<u32>,

    /// P register the instruction was decoded under
    pub flags: u8,
}

/// Decode the instruction at `pc` (24-bit) using the bytes visible on `bus`
pub fn decode_at<B: DebugBus + ?Sized>(bus: &B, pc: u32, regs: &Registers) -> Decoded {
    let opcode = bus.peek(pc);
    let operands = [
        bus.peek(pc.wrapping_add(1)),
        bus.peek(pc.wrapping_add(2)),
        bus.peek(pc.wrapping_add(3)),
    ];
    resolve(opcode, operands, (pc & 0xFFFF) as u16, regs, bus)
}

/// Resolve an already-fetched opcode and the three bytes that follow it.
///
/// `address` is the in-bank offset of the opcode; branch targets are relative
/// to it. Pointer reads go through `bus`.
pub fn resolve<B: DebugBus + ?Sized>(
    opcode: u8,
    operands: [u8; 3],
    address: u16,
    regs: &Registers,
    bus: &B,
) -> Decoded {
    let mode = AddressMode::of(opcode);

    let byte = operands[0] as u32;
    let word = byte | ((operands[1] as u32) << 8);
    let long = word | ((operands[2] as u32) << 16);

    let d = regs.d as u32;
    let x = regs.x as u32;
    let y = regs.y as u32;
    let s = regs.s as u32;
    let dbr = (regs.dbr as u32) << 16;
    let pbr = (regs.pbr as u32) << 16;

    // Pointer helpers
    let word_at = |addr: u32| bus.peek_word(addr) as u32;
    let bank_at = |addr: u32| (bus.peek(addr.wrapping_add(2)) as u32) << 16;

    let (size, operand, reference, indirect_reference) = match mode {
        AddressMode::Implied | AddressMode::ImpliedAccumulator => (1, None, None, None),

        AddressMode::ImmediateM => {
            if regs.p.accumulator_8bit() {
                (2, Some(byte), None, None)
            } else {
                (3, Some(word), None, None)
            }
        }

        AddressMode::ImmediateX => {
            if regs.p.index_8bit() {
                (2, Some(byte), None, None)
            } else {
                (3, Some(word), None, None)
            }
        }

        AddressMode::Immediate8 => (2, Some(byte), None, None),

        AddressMode::Relative => {
            let offset = operands[0] as i8 as u16;
            let target = address.wrapping_add(offset).wrapping_add(2);
            (2, Some(byte), Some(target as u32), None)
        }

        AddressMode::RelativeLong => {
            let offset = word as u16;
            let target = address.wrapping_add(offset).wrapping_add(3);
            (3, Some(word), Some(target as u32), None)
        }

        AddressMode::DirectPage => (2, Some(byte), Some(byte + d), None),
        AddressMode::DirectPageX => (2, Some(byte), Some(byte + d + x), None),
        AddressMode::DirectPageY => (2, Some(byte), Some(byte + d + y), None),

        AddressMode::DirectPageIndirect => {
            let pointer = byte + d;
            (2, Some(byte), Some(pointer), Some(dbr | word_at(pointer)))
        }

        AddressMode::DirectPageIndexedIndirect => {
            let pointer = byte + d + x;
            (2, Some(byte), Some(pointer), Some(dbr | word_at(pointer)))
        }

        AddressMode::DirectPageIndirectIndexed => {
            let pointer = byte + d;
            let target = dbr | ((word_at(pointer) + y) & 0xFFFF);
            (2, Some(byte), Some(pointer), Some(target))
        }

        AddressMode::DirectPageIndirectLong => {
            let pointer = byte + d;
            let target = bank_at(pointer) | word_at(pointer);
            (2, Some(byte), Some(pointer), Some(target))
        }

        AddressMode::DirectPageIndirectLongIndexed => {
            let pointer = byte + d;
            let target = bank_at(pointer) | ((word_at(pointer) + y) & 0xFFFF);
            (2, Some(byte), Some(pointer), Some(target))
        }

        // The index is OR-ed in unmasked, a carry out of the low word spills
        // into the bank byte instead of incrementing it.
        AddressMode::Absolute => (3, Some(word), Some(dbr | word), None),
        AddressMode::AbsoluteX => (3, Some(word), Some(dbr | (word + x)), None),
        AddressMode::AbsoluteY => (3, Some(word), Some(dbr | (word + y)), None),

        AddressMode::AbsoluteLong => (4, Some(long), Some(long), None),

        AddressMode::AbsoluteLongX => {
            let target = (long & 0xFF_0000) | ((word + x) & 0xFFFF);
            (4, Some(long), Some(target), None)
        }

        // Stack positions are not cross-referenced
        AddressMode::StackRelative => (2, Some(byte), None, None),

        AddressMode::StackRelativeIndirectIndexed => {
            let pointer = byte + s;
            let target = dbr | ((word_at(pointer) + y) & 0xFFFF);
            (2, Some(byte), None, Some(target))
        }

        AddressMode::AbsoluteIndirect => (3, Some(word), Some(word), Some(pbr | word_at(word))),

        AddressMode::AbsoluteIndirectLong => {
            let target = bank_at(word) | word_at(word);
            (3, Some(word), Some(word), Some(target))
        }

        AddressMode::AbsoluteIndexedIndirect => {
            let pointer = pbr | ((word + x) & 0xFFFF);
            (3, Some(word), Some(pointer), Some(word_at(pointer)))
        }

        // Two targets (source and destination bank) do not fit one reference
        AddressMode::BlockMove => (3, Some(word), None, None),

        // Pushes a constant
        AddressMode::PushEffectiveAbsolute => (3, Some(word), None, None),

        AddressMode::PushEffectiveIndirect => (2, Some(byte), Some(byte + d), None),
    };

    Decoded {
        opcode,
        mode,
        size,
        operand,
        reference,
        indirect_reference,
        flags: regs.p.to_byte(),
    }
}
