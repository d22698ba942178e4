/// Decoration style for underline and strikethrough lines.
///
/// Represented in 4 bits inside [`CellTraits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum LinePattern {
    #[default]
    Void = 0,
    Solid = 1,
    Thick = 2,
    Double = 3,
    Dashed = 4,
    Dotted = 5,
    Wavy = 6,
    Sawtooth = 7,
}

impl LinePattern {
    pub const ALL: [LinePattern; 8] = [
        LinePattern::Void,
        LinePattern::Solid,
        LinePattern::Thick,
        LinePattern::Double,
        LinePattern::Dashed,
        LinePattern::Dotted,
        LinePattern::Wavy,
        LinePattern::Sawtooth,
    ];

    pub const fn from_bits(bits: u8) -> LinePattern {
        match bits & 0xF {
            1 => LinePattern::Solid,
            2 => LinePattern::Thick,
            3 => LinePattern::Double,
            4 => LinePattern::Dashed,
            5 => LinePattern::Dotted,
            6 => LinePattern::Wavy,
            7 => LinePattern::Sawtooth,
            _ => LinePattern::Void,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            LinePattern::Void => "void",
            LinePattern::Solid => "solid",
            LinePattern::Thick => "thick",
            LinePattern::Double => "double",
            LinePattern::Dashed => "dashed",
            LinePattern::Dotted => "dotted",
            LinePattern::Wavy => "wavy",
            LinePattern::Sawtooth => "sawtooth",
        }
    }
}

/// Rendering traits of a glyph cell, packed into 16 bits.
///
/// # Trait Bit Layout (16-bit)
///
/// | Bit(s) | Field         | Hex Mask | Description                        |
/// |--------|---------------|----------|------------------------------------|
/// | 0      | ITALIC        | `0x0001` | Italic font style                  |
/// | 1      | BOLD          | `0x0002` | Bold font style                    |
/// | 2      | CAPS          | `0x0004` | Render lowercase as capitals       |
/// | 3      | RESERVED      | `0x0008` | Reserved for future use            |
/// | 4-7    | UNDERLINE     | `0x00F0` | Underline [`LinePattern`]          |
/// | 8-11   | STRIKETHROUGH | `0x0F00` | Strikethrough [`LinePattern`]      |
/// | 12-15  | RESERVED      | `0xF000` | Reserved for future use            |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellTraits(u16);

#[rustfmt::skip]
impl CellTraits {
    pub const ITALIC_FLAG: u16         = 0x0001;
    pub const BOLD_FLAG: u16           = 0x0002;
    pub const CAPS_FLAG: u16           = 0x0004;
    pub const UNDERLINE_MASK: u16      = 0x00F0;
    pub const STRIKETHROUGH_MASK: u16  = 0x0F00;

    const UNDERLINE_SHIFT: u16     = 4;
    const STRIKETHROUGH_SHIFT: u16 = 8;
}

impl CellTraits {
    pub const fn none() -> Self {
        Self(0)
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn italic(&self) -> bool {
        self.0 & Self::ITALIC_FLAG != 0
    }

    pub const fn bold(&self) -> bool {
        self.0 & Self::BOLD_FLAG != 0
    }

    pub const fn caps(&self) -> bool {
        self.0 & Self::CAPS_FLAG != 0
    }

    pub const fn underline(&self) -> LinePattern {
        LinePattern::from_bits(((self.0 & Self::UNDERLINE_MASK) >> Self::UNDERLINE_SHIFT) as u8)
    }

    pub const fn strikethrough(&self) -> LinePattern {
        LinePattern::from_bits(
            ((self.0 & Self::STRIKETHROUGH_MASK) >> Self::STRIKETHROUGH_SHIFT) as u8,
        )
    }

    #[must_use]
    pub const fn with_italic(self, italic: bool) -> Self {
        Self(if italic { self.0 | Self::ITALIC_FLAG } else { self.0 & !Self::ITALIC_FLAG })
    }

    #[must_use]
    pub const fn with_bold(self, bold: bool) -> Self {
        Self(if bold { self.0 | Self::BOLD_FLAG } else { self.0 & !Self::BOLD_FLAG })
    }

    #[must_use]
    pub const fn with_caps(self, caps: bool) -> Self {
        Self(if caps { self.0 | Self::CAPS_FLAG } else { self.0 & !Self::CAPS_FLAG })
    }

    #[must_use]
    pub const fn with_underline(self, pattern: LinePattern) -> Self {
        Self((self.0 & !Self::UNDERLINE_MASK) | ((pattern as u16) << Self::UNDERLINE_SHIFT))
    }

    #[must_use]
    pub const fn with_strikethrough(self, pattern: LinePattern) -> Self {
        Self(
            (self.0 & !Self::STRIKETHROUGH_MASK)
                | ((pattern as u16) << Self::STRIKETHROUGH_SHIFT),
        )
    }

    pub const fn bits(&self) -> u16 {
        self.0
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & (Self::ITALIC_FLAG | Self::BOLD_FLAG | Self::CAPS_FLAG
            | Self::UNDERLINE_MASK | Self::STRIKETHROUGH_MASK))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_pattern_bits_round_trip() {
        for lp in LinePattern::ALL {
            assert_eq!(LinePattern::from_bits(lp as u8), lp);
        }
    }

    #[test]
    fn test_traits_pack_and_query() {
        let t = CellTraits::none()
            .with_bold(true)
            .with_underline(LinePattern::Wavy)
            .with_strikethrough(LinePattern::Solid);

        assert!(t.bold());
        assert!(!t.italic());
        assert!(!t.caps());
        assert_eq!(t.underline(), LinePattern::Wavy);
        assert_eq!(t.strikethrough(), LinePattern::Solid);
        assert_eq!(CellTraits::from_bits(t.bits()), t);
    }

    #[test]
    fn test_traits_clear_flag() {
        let t = CellTraits::none().with_italic(true).with_italic(false);
        assert!(t.is_empty());
    }

    #[test]
    fn test_from_bits_masks_reserved() {
        let t = CellTraits::from_bits(0xFFFF);
        assert_eq!(t.bits() & 0xF008, 0);
    }
}
