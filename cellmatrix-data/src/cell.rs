use crate::{CellTraits, Color, Error};

/// Sentinel value of the window field marking a cell as a pixel-tile
/// reference rather than a glyph.
pub const IMAGE_TILE: u8 = 16;

/// Widest multi-cell glyph expressible through the window field.
pub const MAXIMUM_GLYPH_WIDTH: u8 = IMAGE_TILE - 1;

/// Stroke, line, and trait styling of a glyph cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlyphStyle {
    pub traits: CellTraits,
    /// Stroke color of the drawn glyph.
    pub glyph_color: Color,
    /// Color of underline and strikethrough lines.
    pub line_color: Color,
}

/// Tile coordinates within the image referenced by the cell's codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelTile {
    pub xtile: u16,
    pub ytile: u16,
}

/// The variant payload of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellContent {
    Glyph(GlyphStyle),
    Tile(PixelTile),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Payload {
    Glyph { window: u8, style: GlyphStyle },
    Tile(PixelTile),
}

/// A single addressable slot of the display.
///
/// A cell is a plain value: copying it copies the display state it
/// describes, and two cells are equal exactly when their byte images are
/// equal. The byte image doubles as the tile-cache key.
///
/// The `window` field discriminates the two variants: values below
/// [`IMAGE_TILE`] select the horizontal sub-section of a (possibly
/// multi-cell) glyph, while [`IMAGE_TILE`] itself marks the cell as a
/// reference to a tile of a registered image.
///
/// # Binary layout (20 bytes, little-endian)
///
/// | Bytes  | Field                                           |
/// |--------|-------------------------------------------------|
/// | 0-3    | codepoint, biased by +1                         |
/// | 4-7    | cell color `r, g, b, a`                         |
/// | 8      | window                                          |
/// | 9      | reserved, zero                                  |
/// | 10-11  | glyph: traits — tile: xtile                     |
/// | 12-15  | glyph: glyph color — tile: ytile in 12-13       |
/// | 16-19  | glyph: line color — tile: zero                  |
///
/// The codepoint bias makes the all-zero byte image decode to the vacant
/// cell (codepoint `-1`, opaque zero colors, no traits, window `0`),
/// which is also `Cell::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Glyph identifier. Values `>= 0` are single Unicode scalars;
    /// negative values name a registered expression or image.
    pub codepoint: i32,
    /// Background fill of the cell's area, for both variants.
    pub cell_color: Color,
    payload: Payload,
}

impl Cell {
    /// Fixed binary size of a cell.
    pub const SIZE: usize = 20;

    /// The vacant cell: no text content, opaque default colors.
    ///
    /// Usable as a template when configuring screen defaults.
    pub const EMPTY: Cell = Cell {
        codepoint: -1,
        cell_color: Color::BLACK,
        payload: Payload::Glyph { window: 0, style: GlyphStyle {
            traits: CellTraits::none(),
            glyph_color: Color::BLACK,
            line_color: Color::BLACK,
        }},
    };

    /// Creates a glyph cell showing `codepoint` with the given styling.
    pub const fn glyph(codepoint: i32, cell_color: Color, style: GlyphStyle) -> Self {
        Self {
            codepoint,
            cell_color,
            payload: Payload::Glyph { window: 0, style },
        }
    }

    /// Creates a pixel-tile cell referencing tile `(xtile, ytile)` of the
    /// image registered under the negative identifier `image`.
    pub const fn tile(image: i32, cell_color: Color, xtile: u16, ytile: u16) -> Self {
        Self {
            codepoint: image,
            cell_color,
            payload: Payload::Tile(PixelTile { xtile, ytile }),
        }
    }

    /// Copies this cell's styling onto another codepoint and window.
    ///
    /// The usual way to lay out a run of text: one template cell carries
    /// the colors and traits, `inscribe` stamps each character.
    #[must_use]
    pub fn inscribe(&self, codepoint: i32, window: u8) -> Self {
        let style = match self.payload {
            Payload::Glyph { style, .. } => style,
            Payload::Tile(_) => GlyphStyle::default(),
        };

        Self {
            codepoint,
            cell_color: self.cell_color,
            payload: Payload::Glyph { window: window & 0xF, style },
        }
    }

    /// Horizontal sub-section index for glyphs; [`IMAGE_TILE`] for
    /// pixel-tile cells.
    pub const fn window(&self) -> u8 {
        match self.payload {
            Payload::Glyph { window, .. } => window,
            Payload::Tile(_) => IMAGE_TILE,
        }
    }

    pub const fn is_glyph(&self) -> bool {
        matches!(self.payload, Payload::Glyph { .. })
    }

    pub const fn content(&self) -> CellContent {
        match self.payload {
            Payload::Glyph { style, .. } => CellContent::Glyph(style),
            Payload::Tile(tile) => CellContent::Tile(tile),
        }
    }

    /// Glyph styling, if this is a glyph cell.
    pub const fn style(&self) -> Option<GlyphStyle> {
        match self.payload {
            Payload::Glyph { style, .. } => Some(style),
            Payload::Tile(_) => None,
        }
    }

    #[must_use]
    pub const fn with_cell_color(mut self, color: Color) -> Self {
        self.cell_color = color;
        self
    }

    #[must_use]
    pub const fn with_style(mut self, style: GlyphStyle) -> Self {
        self.payload = match self.payload {
            Payload::Glyph { window, .. } => Payload::Glyph { window, style },
            Payload::Tile(_) => Payload::Glyph { window: 0, style },
        };
        self
    }

    #[must_use]
    pub const fn with_window(mut self, window: u8) -> Self {
        if let Payload::Glyph { style, .. } = self.payload {
            self.payload = Payload::Glyph { window: window & 0xF, style };
        }
        self
    }

    /// Serializes into the documented 20-byte layout.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];

        bytes[0..4].copy_from_slice(&self.codepoint.wrapping_add(1).to_le_bytes());
        bytes[4..8].copy_from_slice(&self.cell_color.to_bytes());
        bytes[8] = self.window();

        match self.payload {
            Payload::Glyph { style, .. } => {
                bytes[10..12].copy_from_slice(&style.traits.bits().to_le_bytes());
                bytes[12..16].copy_from_slice(&style.glyph_color.to_bytes());
                bytes[16..20].copy_from_slice(&style.line_color.to_bytes());
            },
            Payload::Tile(tile) => {
                bytes[10..12].copy_from_slice(&tile.xtile.to_le_bytes());
                bytes[12..14].copy_from_slice(&tile.ytile.to_le_bytes());
            },
        }

        bytes
    }

    /// Deserializes a cell; fails unless given exactly [`Cell::SIZE`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SIZE {
            return Err(Error::cell_byte_length(bytes.len()));
        }

        let codepoint =
            i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]).wrapping_sub(1);
        let cell_color = Color::from_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let window = bytes[8];

        let payload = if window == IMAGE_TILE {
            Payload::Tile(PixelTile {
                xtile: u16::from_le_bytes([bytes[10], bytes[11]]),
                ytile: u16::from_le_bytes([bytes[12], bytes[13]]),
            })
        } else {
            Payload::Glyph {
                window: window & 0xF,
                style: GlyphStyle {
                    traits: CellTraits::from_bits(u16::from_le_bytes([bytes[10], bytes[11]])),
                    glyph_color: Color::from_bytes([
                        bytes[12], bytes[13], bytes[14], bytes[15],
                    ]),
                    line_color: Color::from_bytes([
                        bytes[16], bytes[17], bytes[18], bytes[19],
                    ]),
                },
            }
        };

        Ok(Self { codepoint, cell_color, payload })
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}
