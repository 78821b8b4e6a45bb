use bitflags::bitflags;

/// Horizontal flip, bit 31.
pub const FLIP_H: u32 = 0x8000_0000;
/// Vertical flip, bit 30.
pub const FLIP_V: u32 = 0x4000_0000;
/// Anti-diagonal flip, bit 29.
pub const FLIP_D: u32 = 0x2000_0000;
/// The lower 29 bits holding the gid.
pub const GID_MASK: u32 = 0x1FFF_FFFF;

const FLAG_SHIFT: u32 = 29;

bitflags! {
    /// Packed 3-bit orientation code stored next to each gid.
    ///
    /// The bit order mirrors the top three bits of the raw cell value,
    /// shifted down by 29.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FlipFlags: u8 {
        /// Mirrored left to right.
        const HORIZONTAL = 0b100;
        /// Mirrored top to bottom.
        const VERTICAL = 0b010;
        /// Mirrored across the anti-diagonal (combined with the others for rotation).
        const DIAGONAL = 0b001;
    }
}

impl FlipFlags {
    /// Mirrored left to right.
    #[inline]
    pub fn horizontal(self) -> bool {
        self.contains(FlipFlags::HORIZONTAL)
    }
    /// Mirrored top to bottom.
    #[inline]
    pub fn vertical(self) -> bool {
        self.contains(FlipFlags::VERTICAL)
    }
    /// Mirrored across the anti-diagonal.
    #[inline]
    pub fn diagonal(self) -> bool {
        self.contains(FlipFlags::DIAGONAL)
    }
}

/// A raw 32-bit cell value as written by Tiled: flags in the top 3 bits, gid below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileId(pub u32);

impl TileId {
    /// The value as written, flag bits included.
    #[inline] pub fn raw(self) -> u32 { self.0 }
    /// The value with flag bits stripped.
    #[inline] pub fn gid(self) -> u32 { self.0 & GID_MASK }
    /// `true` when the gid part is 0, whatever the flag bits say.
    #[inline] pub fn is_empty(self) -> bool { self.gid() == 0 }
    /// Bit 31 is set.
    #[inline] pub fn flip_h(self) -> bool { (self.0 & FLIP_H) != 0 }
    /// Bit 30 is set.
    #[inline] pub fn flip_v(self) -> bool { (self.0 & FLIP_V) != 0 }
    /// Bit 29 is set.
    #[inline] pub fn flip_d(self) -> bool { (self.0 & FLIP_D) != 0 }

    /// Orientation flags. An empty cell never carries flags.
    #[inline]
    pub fn flags(self) -> FlipFlags {
        if self.is_empty() {
            return FlipFlags::empty();
        }
        FlipFlags::from_bits_truncate((self.0 >> FLAG_SHIFT) as u8)
    }

    /// Splits into a [`Cell`].
    #[inline]
    pub fn decode(self) -> Cell {
        Cell {
            gid: self.gid(),
            flags: self.flags(),
        }
    }
}

/// A decoded cell: bare gid plus orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    /// Global tile id, `0` for an empty cell.
    pub gid: u32,
    /// Orientation; always empty when `gid` is 0.
    pub flags: FlipFlags,
}

impl Cell {
    /// No tile here.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.gid == 0
    }

    /// Packs back into the raw form.
    #[inline]
    pub fn encode(self) -> TileId {
        TileId(encode(self.gid, self.flags))
    }
}

/// Splits a raw cell value into `(gid, flags)`.
#[inline]
pub fn decode(raw: u32) -> (u32, FlipFlags) {
    let cell = TileId(raw).decode();
    (cell.gid, cell.flags)
}

/// Packs a gid and its flags back into a raw cell value.
/// Bits of `gid` above bit 28 are dropped.
#[inline]
pub fn encode(gid: u32, flags: FlipFlags) -> u32 {
    ((flags.bits() as u32) << FLAG_SHIFT) | (gid & GID_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_flip_bits_by_mask() {
        let (gid, flags) = decode(0xA000_0005);
        assert_eq!(gid, 5);
        assert!(flags.horizontal());
        assert!(!flags.vertical());
        assert!(flags.diagonal());

        let (gid, flags) = decode(0xC000_0005);
        assert_eq!(gid, 5);
        assert!(flags.horizontal() && flags.vertical() && !flags.diagonal());
        assert_eq!(flags.bits(), 0b110);
    }

    #[test]
    fn flag_bits_follow_raw_bit_order() {
        assert_eq!(TileId(FLIP_H | 1).flags(), FlipFlags::HORIZONTAL);
        assert_eq!(TileId(FLIP_V | 1).flags(), FlipFlags::VERTICAL);
        assert_eq!(TileId(FLIP_D | 1).flags(), FlipFlags::DIAGONAL);
        assert!(TileId(FLIP_D | 1).flip_d());
    }

    #[test]
    fn empty_cell_drops_flags() {
        assert_eq!(decode(FLIP_H | FLIP_V), (0, FlipFlags::empty()));
        assert!(TileId(FLIP_D).is_empty());
    }

    #[test]
    fn re_encoding_preserves_decoded_pair() {
        let samples = [1u32, 5, 49, 50, GID_MASK, 0x0ABC_DEF0];
        for gid in samples {
            for bits in 0u8..8 {
                let flags = FlipFlags::from_bits_truncate(bits);
                let raw = encode(gid, flags);
                assert_eq!(decode(raw), (gid, flags));
                assert_eq!(TileId(raw).decode().encode(), TileId(raw));
            }
        }
    }
}
