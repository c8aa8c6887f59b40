use core::fmt;

/// Identifier of one of the sixteen virtual registers.
///
/// By convention `P0..P3` carry parameters, `R0..R5` are general purpose,
/// `F0..F3` carry syscall arguments and `C0..C1` are counters. The
/// architecture itself draws no distinction; any register is readable and
/// writable, and `R0` additionally receives syscall return values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegId(u8);

impl RegId {
    /// Parameter register 0.
    pub const P0: Self = Self(0);
    /// Parameter register 1.
    pub const P1: Self = Self(1);
    /// Parameter register 2.
    pub const P2: Self = Self(2);
    /// Parameter register 3.
    pub const P3: Self = Self(3);
    /// General register 0; receives syscall return values.
    pub const R0: Self = Self(4);
    /// General register 1.
    pub const R1: Self = Self(5);
    /// General register 2.
    pub const R2: Self = Self(6);
    /// General register 3.
    pub const R3: Self = Self(7);
    /// General register 4.
    pub const R4: Self = Self(8);
    /// General register 5.
    pub const R5: Self = Self(9);
    /// Syscall argument register 0.
    pub const F0: Self = Self(10);
    /// Syscall argument register 1.
    pub const F1: Self = Self(11);
    /// Syscall argument register 2.
    pub const F2: Self = Self(12);
    /// Syscall argument register 3.
    pub const F3: Self = Self(13);
    /// Counter register 0.
    pub const C0: Self = Self(14);
    /// Counter register 1.
    pub const C1: Self = Self(15);

    /// Number of virtual registers.
    pub const COUNT: usize = 16;

    /// Construct a register id from the low nibble of `id`.
    pub const fn new(id: u8) -> Self {
        Self(id & 0x0F)
    }

    /// Register index as `u8`.
    pub const fn to_u8(self) -> u8 {
        self.0
    }

    /// Register index as `usize`, always below [`RegId::COUNT`].
    pub const fn to_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<RegId> for usize {
    fn from(r: RegId) -> usize {
        r.to_usize()
    }
}

impl fmt::Display for RegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; RegId::COUNT] = [
            "p0", "p1", "p2", "p3", "r0", "r1", "r2", "r3", "r4", "r5", "f0",
            "f1", "f2", "f3", "c0", "c1",
        ];
        f.write_str(NAMES[self.to_usize()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_masks_to_low_nibble() {
        assert_eq!(RegId::new(0xF5), RegId::R1);
        assert_eq!(RegId::new(0x0F), RegId::C1);
    }

    #[test]
    fn display_names() {
        assert_eq!(RegId::R0.to_string(), "r0");
        assert_eq!(RegId::F3.to_string(), "f3");
    }
}
