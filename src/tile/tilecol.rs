//! Fixed width bitmasks holding one coverage column of a tile.
//!
//! Bit `i` is row `i` of the column. Byte checks (`check_byte0` ..) test one
//! group of eight rows, which lines up with the 8×8 depth blocks of a
//! coverage tile.

use std::fmt;
use std::ops::{BitAndAssign, BitOrAssign, BitXorAssign};

/// Operations shared by the 32 and 64 bit tile columns.
pub trait TileMask:
    Copy + Default + PartialEq + fmt::Debug + BitOrAssign + BitAndAssign + BitXorAssign
{
    /// Number of bits (rows) in the mask.
    const BITS: usize;
    const EMPTY: Self;
    const FULL: Self;

    fn make_empty(&mut self);
    fn make_full(&mut self);
    fn is_empty(&self) -> bool;
    fn is_full(&self) -> bool;
    /// Clear every bit that is set in `other`.
    fn and_inverted(&mut self, other: &Self);
    fn invert(&mut self);
    /// Any bit set in both masks.
    fn test_mask(&self, other: &Self) -> bool;
    /// Any bit set in `self` but not in `other`.
    fn test_inverted_mask(&self, other: &Self) -> bool;
    fn xor_bit(&mut self, bit: usize);
    fn test_bit(&self, bit: usize) -> bool;
    /// Any bit set in byte `byte` (rows `8*byte .. 8*byte+7`).
    fn check_byte(&self, byte: usize) -> bool;
    /// Mask with bits `start..=end` set; empty when `start > end`.
    fn from_bit_range(start: usize, end: usize) -> Self;
}

#[inline]
fn range_u32(start: usize, end: usize) -> u32 {
    // start and end are clamped to 0..=31 by the callers
    let high = if end >= 31 { u32::MAX } else { (1u32 << (end + 1)) - 1 };
    let low = (1u32 << start) - 1;
    high & !low
}

/// 32 row tile column.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TileCol32 {
    pub b1: u32,
}

impl TileCol32 {
    #[inline]
    pub fn set(&mut self, b1: u32) {
        self.b1 = b1;
    }

    #[inline]
    pub const fn check_byte0(&self) -> bool {
        self.b1 & 0xff != 0
    }
    #[inline]
    pub const fn check_byte1(&self) -> bool {
        self.b1 & 0xff00 != 0
    }
    #[inline]
    pub const fn check_byte2(&self) -> bool {
        self.b1 & 0xff0000 != 0
    }
    #[inline]
    pub const fn check_byte3(&self) -> bool {
        self.b1 & 0xff000000 != 0
    }
}

impl TileMask for TileCol32 {
    const BITS: usize = 32;
    const EMPTY: Self = Self { b1: 0 };
    const FULL: Self = Self { b1: u32::MAX };

    #[inline]
    fn make_empty(&mut self) {
        self.b1 = 0;
    }
    #[inline]
    fn make_full(&mut self) {
        self.b1 = u32::MAX;
    }
    #[inline]
    fn is_empty(&self) -> bool {
        self.b1 == 0
    }
    #[inline]
    fn is_full(&self) -> bool {
        self.b1 == u32::MAX
    }
    #[inline]
    fn and_inverted(&mut self, other: &Self) {
        self.b1 &= !other.b1;
    }
    #[inline]
    fn invert(&mut self) {
        self.b1 = !self.b1;
    }
    #[inline]
    fn test_mask(&self, other: &Self) -> bool {
        self.b1 & other.b1 != 0
    }
    #[inline]
    fn test_inverted_mask(&self, other: &Self) -> bool {
        self.b1 & !other.b1 != 0
    }
    #[inline]
    fn xor_bit(&mut self, bit: usize) {
        debug_assert!(bit < Self::BITS);
        self.b1 ^= 1 << bit;
    }
    #[inline]
    fn test_bit(&self, bit: usize) -> bool {
        debug_assert!(bit < Self::BITS);
        self.b1 & (1 << bit) != 0
    }
    #[inline]
    fn check_byte(&self, byte: usize) -> bool {
        match byte {
            0 => self.check_byte0(),
            1 => self.check_byte1(),
            2 => self.check_byte2(),
            3 => self.check_byte3(),
            _ => false,
        }
    }
    fn from_bit_range(start: usize, end: usize) -> Self {
        if start > end || start >= Self::BITS {
            return Self::EMPTY;
        }
        Self {
            b1: range_u32(start, end.min(31)),
        }
    }
}

/// 64 row tile column, kept as two 32 bit words.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TileCol64 {
    pub b1: u32,
    pub b2: u32,
}

impl TileCol64 {
    #[inline]
    pub fn set(&mut self, b1: u32, b2: u32) {
        self.b1 = b1;
        self.b2 = b2;
    }

    // Check if byte N contains a 1.
    #[inline]
    pub const fn check_byte0(&self) -> bool {
        self.b1 & 0xff != 0
    }
    #[inline]
    pub const fn check_byte1(&self) -> bool {
        self.b1 & 0xff00 != 0
    }
    #[inline]
    pub const fn check_byte2(&self) -> bool {
        self.b1 & 0xff0000 != 0
    }
    #[inline]
    pub const fn check_byte3(&self) -> bool {
        self.b1 & 0xff000000 != 0
    }
    #[inline]
    pub const fn check_byte4(&self) -> bool {
        self.b2 & 0xff != 0
    }
    #[inline]
    pub const fn check_byte5(&self) -> bool {
        self.b2 & 0xff00 != 0
    }
    #[inline]
    pub const fn check_byte6(&self) -> bool {
        self.b2 & 0xff0000 != 0
    }
    #[inline]
    pub const fn check_byte7(&self) -> bool {
        self.b2 & 0xff000000 != 0
    }
}

impl TileMask for TileCol64 {
    const BITS: usize = 64;
    const EMPTY: Self = Self { b1: 0, b2: 0 };
    const FULL: Self = Self {
        b1: u32::MAX,
        b2: u32::MAX,
    };

    #[inline]
    fn make_empty(&mut self) {
        self.b1 = 0;
        self.b2 = 0;
    }
    #[inline]
    fn make_full(&mut self) {
        self.b1 = u32::MAX;
        self.b2 = u32::MAX;
    }
    #[inline]
    fn is_empty(&self) -> bool {
        self.b1 == 0 && self.b2 == 0
    }
    #[inline]
    fn is_full(&self) -> bool {
        self.b1 == u32::MAX && self.b2 == u32::MAX
    }
    #[inline]
    fn and_inverted(&mut self, other: &Self) {
        self.b1 &= !other.b1;
        self.b2 &= !other.b2;
    }
    #[inline]
    fn invert(&mut self) {
        self.b1 = !self.b1;
        self.b2 = !self.b2;
    }
    #[inline]
    fn test_mask(&self, other: &Self) -> bool {
        if self.b1 & other.b1 != 0 {
            return true;
        }
        self.b2 & other.b2 != 0
    }
    #[inline]
    fn test_inverted_mask(&self, other: &Self) -> bool {
        if self.b1 & !other.b1 != 0 {
            return true;
        }
        self.b2 & !other.b2 != 0
    }
    #[inline]
    fn xor_bit(&mut self, bit: usize) {
        debug_assert!(bit < Self::BITS);
        if bit >= 32 {
            self.b2 ^= 1 << (bit - 32);
        } else {
            self.b1 ^= 1 << bit;
        }
    }
    #[inline]
    fn test_bit(&self, bit: usize) -> bool {
        debug_assert!(bit < Self::BITS);
        if bit >= 32 {
            self.b2 & (1 << (bit - 32)) != 0
        } else {
            self.b1 & (1 << bit) != 0
        }
    }
    #[inline]
    fn check_byte(&self, byte: usize) -> bool {
        match byte {
            0 => self.check_byte0(),
            1 => self.check_byte1(),
            2 => self.check_byte2(),
            3 => self.check_byte3(),
            4 => self.check_byte4(),
            5 => self.check_byte5(),
            6 => self.check_byte6(),
            7 => self.check_byte7(),
            _ => false,
        }
    }
    fn from_bit_range(start: usize, end: usize) -> Self {
        if start > end || start >= Self::BITS {
            return Self::EMPTY;
        }
        let end = end.min(63);
        let b1 = if start < 32 { range_u32(start, end.min(31)) } else { 0 };
        let b2 = if end >= 32 {
            range_u32(start.saturating_sub(32), end - 32)
        } else {
            0
        };
        Self { b1, b2 }
    }
}

macro_rules! impl_tile_ops {
    ($ty:ty, $($word:ident),+) => {
        impl BitOrAssign for $ty {
            #[inline]
            fn bitor_assign(&mut self, rhs: Self) {
                $(self.$word |= rhs.$word;)+
            }
        }

        impl BitAndAssign for $ty {
            #[inline]
            fn bitand_assign(&mut self, rhs: Self) {
                $(self.$word &= rhs.$word;)+
            }
        }

        impl BitXorAssign for $ty {
            #[inline]
            fn bitxor_assign(&mut self, rhs: Self) {
                $(self.$word ^= rhs.$word;)+
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // row 0 first, like the columns are drawn on screen
                for bit in 0..<$ty as TileMask>::BITS {
                    f.write_str(if self.test_bit(bit) { "#" } else { "." })?;
                }
                Ok(())
            }
        }
    };
}

impl_tile_ops!(TileCol32, b1);
impl_tile_ops!(TileCol64, b1, b2);
