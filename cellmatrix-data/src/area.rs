use crate::{Cell, Error};

/// A rectangular region of cells.
///
/// Offsets address the top-left corner; `lines` and `span` extend down
/// and right. An area of volume zero is valid and denotes the empty
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellArea {
    /// Rows from the top context to the region's first row.
    pub top_offset: u16,
    /// Columns from the left context to the region's first column.
    pub left_offset: u16,
    /// Number of rows in the region.
    pub lines: u16,
    /// Number of columns in the region.
    pub span: u16,
}

/// Clips `area` against `bounds`.
///
/// Total over all inputs; degenerate inputs produce an empty (volume
/// zero) area rather than an error.
pub fn intersect(bounds: CellArea, area: CellArea) -> CellArea {
    let ylimit = bounds.top_offset as u32 + bounds.lines as u32;
    let xlimit = bounds.left_offset as u32 + bounds.span as u32;
    let y = ylimit.min(bounds.top_offset.max(area.top_offset) as u32);
    let x = xlimit.min(bounds.left_offset.max(area.left_offset) as u32);

    CellArea {
        top_offset: y as u16,
        left_offset: x as u16,
        lines: ylimit.saturating_sub(area.top_offset as u32).min(area.lines as u32) as u16,
        span: xlimit.saturating_sub(area.left_offset as u32).min(area.span as u32) as u16,
    }
}

impl CellArea {
    /// Fixed binary size of an area.
    pub const SIZE: usize = 8;

    pub const fn new(top_offset: u16, left_offset: u16, lines: u16, span: u16) -> Self {
        Self { top_offset, left_offset, lines, span }
    }

    /// Number of cells covered by the area.
    pub const fn volume(&self) -> u32 {
        self.lines as u32 * self.span as u32
    }

    pub const fn is_empty(&self) -> bool {
        self.volume() == 0
    }

    /// One past the right-most column.
    pub const fn horizontal_limit(&self) -> u32 {
        self.left_offset as u32 + self.span as u32
    }

    /// One past the bottom-most row.
    pub const fn vertical_limit(&self) -> u32 {
        self.top_offset as u32 + self.lines as u32
    }

    /// Clips `area` against this area as the bounds.
    pub fn intersection(&self, area: CellArea) -> CellArea {
        intersect(*self, area)
    }

    /// A copy shifted by the given number of lines and columns.
    #[must_use]
    pub const fn move_by(&self, lines: i16, span: i16) -> Self {
        Self {
            top_offset: self.top_offset.wrapping_add_signed(lines),
            left_offset: self.left_offset.wrapping_add_signed(span),
            ..*self
        }
    }

    /// A copy grown (or shrunk) by the given number of lines and columns.
    #[must_use]
    pub const fn resize(&self, d_lines: i16, d_span: i16) -> Self {
        Self {
            lines: self.lines.wrapping_add_signed(d_lines),
            span: self.span.wrapping_add_signed(d_span),
            ..*self
        }
    }

    /// Serializes as four little-endian `u16` fields:
    /// `top_offset, left_offset, lines, span`.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..2].copy_from_slice(&self.top_offset.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.left_offset.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.lines.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.span.to_le_bytes());
        bytes
    }

    /// Deserializes an area; fails unless given exactly 8 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SIZE {
            return Err(Error::area_byte_length(bytes.len()));
        }

        Ok(Self {
            top_offset: u16::from_le_bytes([bytes[0], bytes[1]]),
            left_offset: u16::from_le_bytes([bytes[2], bytes[3]]),
            lines: u16::from_le_bytes([bytes[4], bytes[5]]),
            span: u16::from_le_bytes([bytes[6], bytes[7]]),
        })
    }
}

/// Iterates the cells of `area` within a row-major buffer of the given
/// stride, yielding each cell with its absolute `(line, offset)`.
///
/// Visit order is row-major so that serializations of a region are
/// deterministic. Rows or columns extending past the buffer are skipped.
pub fn cells(
    buffer: &[Cell],
    stride: usize,
    area: CellArea,
) -> impl Iterator<Item = (u16, u16, &Cell)> {
    let left = area.left_offset as usize;
    let span = area.span as usize;

    buffer
        .chunks(stride.max(1))
        .enumerate()
        .skip(area.top_offset as usize)
        .take(area.lines as usize)
        .flat_map(move |(line, row)| {
            let end = row.len().min(left.saturating_add(span));
            row.get(left..end)
                .unwrap_or_default()
                .iter()
                .enumerate()
                .map(move |(i, cell)| (line as u16, (left + i) as u16, cell))
        })
}

/// Mutable variant of [`cells`]; same visit order, no allocation.
pub fn cells_mut(
    buffer: &mut [Cell],
    stride: usize,
    area: CellArea,
) -> impl Iterator<Item = (u16, u16, &mut Cell)> {
    let left = area.left_offset as usize;
    let span = area.span as usize;

    buffer
        .chunks_mut(stride.max(1))
        .enumerate()
        .skip(area.top_offset as usize)
        .take(area.lines as usize)
        .flat_map(move |(line, row)| {
            let end = row.len().min(left.saturating_add(span));
            row.get_mut(left..end)
                .unwrap_or_default()
                .iter_mut()
                .enumerate()
                .map(move |(i, cell)| (line as u16, (left + i) as u16, cell))
        })
}
