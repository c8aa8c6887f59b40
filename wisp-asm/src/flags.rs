use bitflags::bitflags;

bitflags! {
    /// Compare-flag bitset rewritten by `CMP` and consulted by conditional
    /// control transfers.
    ///
    /// `CMP` sets exactly one of `EQ`/`LT`/`GT` and preserves `ERR`; a
    /// conditional transfer is taken when its condition mask intersects the
    /// current flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Flags: u32 {
        /// Operands compared equal.
        const EQ = 0b0001;
        /// Left operand compared below the right one.
        const LT = 0b0010;
        /// Left operand compared above the right one.
        const GT = 0b0100;
        /// A handler observed an erroneous state (division by zero,
        /// unmapped opcode, width-less rotation).
        const ERR = 0b1000;
        /// Below or equal.
        const LTE = Self::EQ.bits() | Self::LT.bits();
        /// Above or equal.
        const GTE = Self::EQ.bits() | Self::GT.bits();
        /// Not equal.
        const NEQ = Self::LT.bits() | Self::GT.bits();
    }
}

impl Flags {
    /// Whether the condition mask `cond` selects at least one set flag.
    pub const fn meets(self, cond: u32) -> bool {
        self.bits() & cond != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_masks() {
        assert_eq!(Flags::LTE, Flags::EQ | Flags::LT);
        assert_eq!(Flags::GTE, Flags::EQ | Flags::GT);
        assert_eq!(Flags::NEQ, Flags::LT | Flags::GT);
    }

    #[test]
    fn meets_intersects_masks() {
        let flags = Flags::LT;
        assert!(flags.meets(Flags::LTE.bits()));
        assert!(flags.meets(Flags::NEQ.bits()));
        assert!(!flags.meets(Flags::GTE.bits()));
        assert!(!flags.meets(0));
    }
}
