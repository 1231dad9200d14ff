//! Addressing-mode resolution against hand-assembled code
//!
//! Each test places a single instruction in a flat memory image, sets up the
//! register snapshot the CPU would execute it with, and checks the decoded
//! size, operand and references.

use gilgamesh_trace::resolver::{decode_at, resolve};
use gilgamesh_trace::{AddressMode, DebugBus, FlatMemory, Registers, StatusFlags};
use proptest::prelude::*;

// ============================================================================
// OPCODE CONSTANTS
// ============================================================================

const LDA_ABS: u8 = 0xAD; // LDA absolute
const LDA_DP_IND_Y: u8 = 0xB1; // LDA (dp),Y
const BNE: u8 = 0xD0; // Branch if Not Equal
const MVN: u8 = 0x54; // Block move negative
const PEA: u8 = 0xF4; // Push effective absolute
const LDA_SR: u8 = 0xA3; // LDA sr,S
const JSR_ABS_X_IND: u8 = 0xFC; // JSR (abs,X)

// ============================================================================
// HELPERS
// ============================================================================

fn native_regs() -> Registers {
    Registers {
        p: StatusFlags::native16(),
        ..Registers::new()
    }
}

fn arb_registers() -> impl Strategy<Value = Registers> {
    (
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
        any::<u8>(),
        any::<u8>(),
        any::<u8>(),
        any::<bool>(),
    )
        .prop_map(|(x, y, s, d, pbr, dbr, p, e)| Registers {
            x,
            y,
            s,
            d,
            pbr,
            dbr,
            p: StatusFlags::from_byte(p, e),
        })
}

/// Memory whose every byte is derived from its address, so pointer reads
/// return varied values without a 16MB setup per case
struct PatternBus;

impl DebugBus for PatternBus {
    fn peek(&self, addr: u32) -> u8 {
        (addr ^ (addr >> 8) ^ (addr >> 16)) as u8
    }
}

// ============================================================================
// CONCRETE SCENARIOS
// ============================================================================

#[test]
fn test_absolute_scenario() {
    assert_eq!(AddressMode::of(LDA_ABS).index(), 14);

    let mut regs = native_regs();
    regs.dbr = 0x7E;

    let decoded = resolve(LDA_ABS, [0x34, 0x12, 0x00], 0x8000, &regs, &PatternBus);
    assert_eq!(decoded.reference, Some(0x7E1234));
    assert_eq!(decoded.size, 3);
    assert_eq!(decoded.indirect_reference, None);
}

#[test]
fn test_direct_page_indirect_indexed_scenario() {
    assert_eq!(AddressMode::of(LDA_DP_IND_Y).index(), 11);

    let mut memory = FlatMemory::new();
    memory.load(0x008000, &[LDA_DP_IND_Y, 0x10]);
    memory.write_word(0x000010, 0x2000);

    let mut regs = native_regs();
    regs.d = 0x0000;
    regs.y = 0x0005;
    regs.dbr = 0x00;

    let decoded = decode_at(&memory, 0x008000, &regs);
    assert_eq!(decoded.reference, Some(0x0010));
    assert_eq!(decoded.indirect_reference, Some(0x002005));
}

#[test]
fn test_relative_branch_scenario() {
    assert_eq!(AddressMode::of(BNE).index(), 4);

    let decoded = resolve(BNE, [0xFE, 0x00, 0x00], 0x8000, &Registers::new(), &PatternBus);
    assert_eq!(decoded.reference, Some(0x8000));
    assert_eq!(decoded.size, 2);
}

#[test]
fn test_jump_table_in_program_bank() {
    let mut memory = FlatMemory::new();
    memory.load(0xC08000, &[JSR_ABS_X_IND, 0x00, 0x90]);
    memory.write_word(0xC09006, 0x8123);

    let mut regs = native_regs();
    regs.pbr = 0xC0;
    regs.dbr = 0x7E;
    regs.x = 0x0006;

    let decoded = decode_at(&memory, 0xC08000, &regs);
    assert_eq!(decoded.reference, Some(0xC09006));
    assert_eq!(decoded.indirect_reference, Some(0x8123));
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    /// Every opcode decodes to a 1-4 byte instruction under any context
    #[test]
    fn prop_size_is_bounded(
        opcode in any::<u8>(),
        operands in any::<[u8; 3]>(),
        address in any::<u16>(),
        regs in arb_registers(),
    ) {
        let decoded = resolve(opcode, operands, address, &regs, &PatternBus);
        prop_assert!(
            (1..=4).contains(&decoded.size),
            "opcode {:02X} size {}",
            opcode,
            decoded.size
        );
        prop_assert_eq!(decoded.mode, AddressMode::of(opcode));
    }

    /// Stack, block-move and PEA forms never carry a direct reference
    #[test]
    fn prop_unrecorded_modes_have_no_reference(
        operands in any::<[u8; 3]>(),
        address in any::<u16>(),
        regs in arb_registers(),
    ) {
        for opcode in 0..=255u8 {
            let decoded = resolve(opcode, operands, address, &regs, &PatternBus);
            if !decoded.mode.records_reference() {
                prop_assert_eq!(decoded.reference, None, "opcode {:02X}", opcode);
            }
        }
        for opcode in [MVN, PEA, LDA_SR] {
            let decoded = resolve(opcode, operands, address, &regs, &PatternBus);
            prop_assert_eq!(decoded.reference, None);
        }
    }

    /// Implied forms are the only ones without an operand
    #[test]
    fn prop_operand_absent_only_for_implied(
        opcode in any::<u8>(),
        operands in any::<[u8; 3]>(),
        regs in arb_registers(),
    ) {
        let decoded = resolve(opcode, operands, 0x8000, &regs, &PatternBus);
        let implied =
            matches!(decoded.mode, AddressMode::Implied | AddressMode::ImpliedAccumulator);
        prop_assert_eq!(decoded.operand.is_none(), implied);
        prop_assert_eq!(decoded.size == 1, implied);
    }

    /// Absolute addressing always lands in the data bank
    #[test]
    fn prop_absolute_in_data_bank(lo in any::<u8>(), hi in any::<u8>(), dbr in any::<u8>()) {
        let mut regs = native_regs();
        regs.dbr = dbr;
        let decoded = resolve(LDA_ABS, [lo, hi, 0], 0x8000, &regs, &PatternBus);
        let expected = ((dbr as u32) << 16) | ((hi as u32) << 8) | lo as u32;
        prop_assert_eq!(decoded.reference, Some(expected));
    }
}
