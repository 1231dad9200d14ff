//! 65816 addressing-mode classes
//!
//! Every opcode belongs to exactly one class. The class decides how many operand
//! bytes follow the opcode and how the effective address is formed. The numeric
//! index of each class is stable and is what external tooling refers to as the
//! "mode number".

/// Addressing-mode class of an opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    /// No operand (CLC, PHA, RTS, ...)
    Implied,
    /// #imm, width follows M
    ImmediateM,
    /// #imm, width follows X
    ImmediateX,
    /// #imm, always one byte (REP, SEP, BRK/COP/WDM signature)
    Immediate8,
    /// 8-bit signed branch offset
    Relative,
    /// 16-bit signed branch offset (BRL, PER)
    RelativeLong,
    /// dp
    DirectPage,
    /// dp,X
    DirectPageX,
    /// dp,Y
    DirectPageY,
    /// (dp)
    DirectPageIndirect,
    /// (dp,X)
    DirectPageIndexedIndirect,
    /// (dp),Y
    DirectPageIndirectIndexed,
    /// [dp]
    DirectPageIndirectLong,
    /// [dp],Y
    DirectPageIndirectLongIndexed,
    /// abs
    Absolute,
    /// abs,X
    AbsoluteX,
    /// abs,Y
    AbsoluteY,
    /// long
    AbsoluteLong,
    /// long,X
    AbsoluteLongX,
    /// sr,S
    StackRelative,
    /// (sr,S),Y
    StackRelativeIndirectIndexed,
    /// (abs)
    AbsoluteIndirect,
    /// [abs]
    AbsoluteIndirectLong,
    /// (abs,X)
    AbsoluteIndexedIndirect,
    /// A (ASL A, INC A, ...)
    ImpliedAccumulator,
    /// MVN/MVP srcbank,dstbank
    BlockMove,
    /// PEA abs
    PushEffectiveAbsolute,
    /// PEI (dp)
    PushEffectiveIndirect,
}

use AddressMode::*;

impl AddressMode {
    /// All classes in mode-number order
    pub const ALL: [AddressMode; 28] = [
        Implied,
        ImmediateM,
        ImmediateX,
        Immediate8,
        Relative,
        RelativeLong,
        DirectPage,
        DirectPageX,
        DirectPageY,
        DirectPageIndirect,
        DirectPageIndexedIndirect,
        DirectPageIndirectIndexed,
        DirectPageIndirectLong,
        DirectPageIndirectLongIndexed,
        Absolute,
        AbsoluteX,
        AbsoluteY,
        AbsoluteLong,
        AbsoluteLongX,
        StackRelative,
        StackRelativeIndirectIndexed,
        AbsoluteIndirect,
        AbsoluteIndirectLong,
        AbsoluteIndexedIndirect,
        ImpliedAccumulator,
        BlockMove,
        PushEffectiveAbsolute,
        PushEffectiveIndirect,
    ];

    /// Look up the class of an opcode
    #[inline]
    pub fn of(opcode: u8) -> AddressMode {
        OPCODE_MODES[opcode as usize]
    }

    /// Stable mode number
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Class for a mode number, if it names one
    pub fn from_index(index: u8) -> Option<AddressMode> {
        Self::ALL.get(index as usize).copied()
    }

    /// Whether the class ever produces a direct reference.
    ///
    /// Stack positions are transient and block moves have two targets, so
    /// neither is cross-referenced. PEA pushes a constant, not an address.
    pub fn records_reference(self) -> bool {
        !matches!(
            self,
            Implied
                | ImmediateM
                | ImmediateX
                | Immediate8
                | ImpliedAccumulator
                | StackRelative
                | StackRelativeIndirectIndexed
                | BlockMove
                | PushEffectiveAbsolute
        )
    }
}

/// Opcode -> addressing-mode class
#[rustfmt::skip]
pub static OPCODE_MODES: [AddressMode; 256] = [
    // 0x00
    Immediate8, DirectPageIndexedIndirect, Immediate8, StackRelative,
    DirectPage, DirectPage, DirectPage, DirectPageIndirectLong,
    Implied, ImmediateM, ImpliedAccumulator, Implied,
    Absolute, Absolute, Absolute, AbsoluteLong,
    // 0x10
    Relative, DirectPageIndirectIndexed, DirectPageIndirect, StackRelativeIndirectIndexed,
    DirectPage, DirectPageX, DirectPageX, DirectPageIndirectLongIndexed,
    Implied, AbsoluteY, ImpliedAccumulator, Implied,
    Absolute, AbsoluteX, AbsoluteX, AbsoluteLongX,
    // 0x20
    Absolute, DirectPageIndexedIndirect, AbsoluteLong, StackRelative,
    DirectPage, DirectPage, DirectPage, DirectPageIndirectLong,
    Implied, ImmediateM, ImpliedAccumulator, Implied,
    Absolute, Absolute, Absolute, AbsoluteLong,
    // 0x30
    Relative, DirectPageIndirectIndexed, DirectPageIndirect, StackRelativeIndirectIndexed,
    DirectPageX, DirectPageX, DirectPageX, DirectPageIndirectLongIndexed,
    Implied, AbsoluteY, ImpliedAccumulator, Implied,
    AbsoluteX, AbsoluteX, AbsoluteX, AbsoluteLongX,
    // 0x40
    Implied, DirectPageIndexedIndirect, Immediate8, StackRelative,
    BlockMove, DirectPage, DirectPage, DirectPageIndirectLong,
    Implied, ImmediateM, ImpliedAccumulator, Implied,
    Absolute, Absolute, Absolute, AbsoluteLong,
    // 0x50
    Relative, DirectPageIndirectIndexed, DirectPageIndirect, StackRelativeIndirectIndexed,
    BlockMove, DirectPageX, DirectPageX, DirectPageIndirectLongIndexed,
    Implied, AbsoluteY, Implied, Implied,
    AbsoluteLong, AbsoluteX, AbsoluteX, AbsoluteLongX,
    // 0x60
    Implied, DirectPageIndexedIndirect, RelativeLong, StackRelative,
    DirectPage, DirectPage, DirectPage, DirectPageIndirectLong,
    Implied, ImmediateM, ImpliedAccumulator, Implied,
    AbsoluteIndirect, Absolute, Absolute, AbsoluteLong,
    // 0x70
    Relative, DirectPageIndirectIndexed, DirectPageIndirect, StackRelativeIndirectIndexed,
    DirectPageX, DirectPageX, DirectPageX, DirectPageIndirectLongIndexed,
    Implied, AbsoluteY, Implied, Implied,
    AbsoluteIndexedIndirect, AbsoluteX, AbsoluteX, AbsoluteLongX,
    // 0x80
    Relative, DirectPageIndexedIndirect, RelativeLong, StackRelative,
    DirectPage, DirectPage, DirectPage, DirectPageIndirectLong,
    Implied, ImmediateM, Implied, Implied,
    Absolute, Absolute, Absolute, AbsoluteLong,
    // 0x90
    Relative, DirectPageIndirectIndexed, DirectPageIndirect, StackRelativeIndirectIndexed,
    DirectPageX, DirectPageX, DirectPageY, DirectPageIndirectLongIndexed,
    Implied, AbsoluteY, Implied, Implied,
    Absolute, AbsoluteX, AbsoluteX, AbsoluteLongX,
    // 0xA0
    ImmediateX, DirectPageIndexedIndirect, ImmediateX, StackRelative,
    DirectPage, DirectPage, DirectPage, DirectPageIndirectLong,
    Implied, ImmediateM, Implied, Implied,
    Absolute, Absolute, Absolute, AbsoluteLong,
    // 0xB0
    Relative, DirectPageIndirectIndexed, DirectPageIndirect, StackRelativeIndirectIndexed,
    DirectPageX, DirectPageX, DirectPageY, DirectPageIndirectLongIndexed,
    Implied, AbsoluteY, Implied, Implied,
    AbsoluteX, AbsoluteX, AbsoluteY, AbsoluteLongX,
    // 0xC0
    ImmediateX, DirectPageIndexedIndirect, Immediate8, StackRelative,
    DirectPage, DirectPage, DirectPage, DirectPageIndirectLong,
    Implied, ImmediateM, Implied, Implied,
    Absolute, Absolute, Absolute, AbsoluteLong,
    // 0xD0
    Relative, DirectPageIndirectIndexed, DirectPageIndirect, StackRelativeIndirectIndexed,
    PushEffectiveIndirect, DirectPageX, DirectPageX, DirectPageIndirectLongIndexed,
    Implied, AbsoluteY, Implied, Implied,
    AbsoluteIndirectLong, AbsoluteX, AbsoluteX, AbsoluteLongX,
    // 0xE0
    ImmediateX, DirectPageIndexedIndirect, Immediate8, StackRelative,
    DirectPage, DirectPage, DirectPage, DirectPageIndirectLong,
    Implied, ImmediateM, Implied, Implied,
    Absolute, Absolute, Absolute, AbsoluteLong,
    // 0xF0
    Relative, DirectPageIndirectIndexed, DirectPageIndirect, StackRelativeIndirectIndexed,
    PushEffectiveAbsolute, DirectPageX, DirectPageX, DirectPageIndirectLongIndexed,
    Implied, AbsoluteY, Implied, Implied,
    AbsoluteIndexedIndirect, AbsoluteX, AbsoluteX, AbsoluteLongX,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_numbers_are_stable() {
        assert_eq!(Implied.index(), 0);
        assert_eq!(Relative.index(), 4);
        assert_eq!(DirectPageIndirectIndexed.index(), 11);
        assert_eq!(Absolute.index(), 14);
        assert_eq!(StackRelative.index(), 19);
        assert_eq!(ImpliedAccumulator.index(), 24);
        assert_eq!(PushEffectiveIndirect.index(), 27);

        for (i, mode) in AddressMode::ALL.iter().enumerate() {
            assert_eq!(mode.index() as usize, i);
            assert_eq!(AddressMode::from_index(i as u8), Some(*mode));
        }
        assert_eq!(AddressMode::from_index(28), None);
    }

    #[test]
    fn test_well_known_opcodes() {
        assert_eq!(AddressMode::of(0xA9), ImmediateM); // LDA #
        assert_eq!(AddressMode::of(0xA2), ImmediateX); // LDX #
        assert_eq!(AddressMode::of(0xC2), Immediate8); // REP #
        assert_eq!(AddressMode::of(0xD0), Relative); // BNE
        assert_eq!(AddressMode::of(0x82), RelativeLong); // BRL
        assert_eq!(AddressMode::of(0xAD), Absolute); // LDA abs
        assert_eq!(AddressMode::of(0xBE), AbsoluteY); // LDX abs,Y
        assert_eq!(AddressMode::of(0x96), DirectPageY); // STX dp,Y
        assert_eq!(AddressMode::of(0xB1), DirectPageIndirectIndexed); // LDA (dp),Y
        assert_eq!(AddressMode::of(0xB7), DirectPageIndirectLongIndexed); // LDA [dp],Y
        assert_eq!(AddressMode::of(0xBF), AbsoluteLongX); // LDA long,X
        assert_eq!(AddressMode::of(0x5C), AbsoluteLong); // JML long
        assert_eq!(AddressMode::of(0x6C), AbsoluteIndirect); // JMP (abs)
        assert_eq!(AddressMode::of(0xDC), AbsoluteIndirectLong); // JML [abs]
        assert_eq!(AddressMode::of(0xFC), AbsoluteIndexedIndirect); // JSR (abs,X)
        assert_eq!(AddressMode::of(0x44), BlockMove); // MVP
        assert_eq!(AddressMode::of(0x54), BlockMove); // MVN
        assert_eq!(AddressMode::of(0xF4), PushEffectiveAbsolute); // PEA
        assert_eq!(AddressMode::of(0xD4), PushEffectiveIndirect); // PEI
        assert_eq!(AddressMode::of(0x1A), ImpliedAccumulator); // INC A
        assert_eq!(AddressMode::of(0xEA), Implied); // NOP
    }

    #[test]
    fn test_column_patterns() {
        // Every xF opcode is a long access, odd rows indexed by X
        for row in 0..16u8 {
            let opcode = (row << 4) | 0x0F;
            let expected = if row & 1 == 0 { AbsoluteLong } else { AbsoluteLongX };
            assert_eq!(AddressMode::of(opcode), expected, "opcode {:02X}", opcode);
        }

        // Every x3 opcode is stack relative
        for row in 0..16u8 {
            let opcode = (row << 4) | 0x03;
            let expected = if row & 1 == 0 { StackRelative } else { StackRelativeIndirectIndexed };
            assert_eq!(AddressMode::of(opcode), expected, "opcode {:02X}", opcode);
        }
    }
}
