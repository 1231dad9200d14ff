//! Side-effect free memory access for the resolver
//!
//! Decoding an instruction reads the opcode, its operand bytes and any pointer
//! the addressing mode dereferences. Those reads must not disturb the emulated
//! machine (no open-bus latching, no I/O register side effects), so hosts expose
//! a debug view of their bus through [`DebugBus`].

/// 24-bit address space mask
pub const ADDRESS_MASK: u32 = 0x00FF_FFFF;

/// Debug view of the 65816 address space.
///
/// Reads are infallible: addresses wrap within the 24-bit space and unmapped
/// locations return whatever the host considers open bus.
pub trait DebugBus {
    /// Read a byte using a 24-bit address
    fn peek(&self, addr: u32) -> u8;

    /// Read a 16-bit word (little-endian)
    fn peek_word(&self, addr: u32) -> u16 {
        let lo = self.peek(addr) as u16;
        let hi = self.peek(addr.wrapping_add(1)) as u16;
        lo | (hi << 8)
    }
}

impl<T: DebugBus + ?Sized> DebugBus for &T {
    fn peek(&self, addr: u32) -> u8 {
        (**self).peek(addr)
    }

    fn peek_word(&self, addr: u32) -> u16 {
        (**self).peek_word(addr)
    }
}

/// Flat 16MB memory image
///
/// No mapping, no mirroring: address N is byte N of the image. Useful for hosts
/// that can dump their whole bus, and for tests.
pub struct FlatMemory {
    data: Box<[u8]>,
}

impl FlatMemory {
    /// Create a zero-filled image
    pub fn new() -> Self {
        FlatMemory {
            data: vec![0; (ADDRESS_MASK as usize) + 1].into_boxed_slice(),
        }
    }

    /// Write a byte using a 24-bit address
    pub fn write(&mut self, addr: u32, value: u8) {
        self.data[(addr & ADDRESS_MASK) as usize] = value;
    }

    /// Write a 16-bit word (little-endian)
    pub fn write_word(&mut self, addr: u32, value: u16) {
        self.write(addr, (value & 0xFF) as u8);
        self.write(addr.wrapping_add(1), (value >> 8) as u8);
    }

    /// Copy a block starting at `addr`, wrapping at the end of the address space
    pub fn load(&mut self, addr: u32, bytes: &[u8]) {
        for (offset, &byte) in bytes.iter().enumerate() {
            self.write(addr.wrapping_add(offset as u32), byte);
        }
    }

    /// Zero the whole image
    pub fn clear(&mut self) {
        self.data.fill(0);
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugBus for FlatMemory {
    #[inline]
    fn peek(&self, addr: u32) -> u8 {
        self.data[(addr & ADDRESS_MASK) as usize]
    }
}
