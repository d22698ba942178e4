use cellmatrix_data::{Cell, CellArea, cells, cells_mut, intersect};

use crate::error::Error;

/// A borrowed view over a cell buffer with fixed dimensions.
///
/// The screen never owns the allocation: whoever allocated the buffer
/// (the device, or a caller-provided arena) retains ownership, and the
/// screen references it for the duration of its lifetime. One writer at
/// a time; the borrow checker enforces the sharing rules the engine
/// requires.
#[derive(Debug)]
pub struct Screen<'a> {
    dimensions: CellArea,
    buffer: &'a mut [Cell],
}

impl<'a> Screen<'a> {
    /// Creates a screen over `buffer`.
    ///
    /// Fails with [`Error::InsufficientBuffer`] when the buffer holds
    /// fewer than `lines * span` cells.
    pub fn new(dimensions: CellArea, buffer: &'a mut [Cell]) -> Result<Self, Error> {
        let required = dimensions.volume() as usize;
        if buffer.len() < required {
            return Err(Error::screen_buffer_too_small(
                buffer.len(),
                dimensions.lines,
                dimensions.span,
            ));
        }

        Ok(Self { dimensions, buffer })
    }

    pub fn area(&self) -> CellArea {
        self.dimensions
    }

    pub fn volume(&self) -> u32 {
        self.dimensions.volume()
    }

    pub fn cell(&self, line: u16, offset: u16) -> Option<&Cell> {
        if line < self.dimensions.lines && offset < self.dimensions.span {
            self.buffer
                .get(line as usize * self.dimensions.span as usize + offset as usize)
        } else {
            None
        }
    }

    pub fn cell_mut(&mut self, line: u16, offset: u16) -> Option<&mut Cell> {
        if line < self.dimensions.lines && offset < self.dimensions.span {
            self.buffer
                .get_mut(line as usize * self.dimensions.span as usize + offset as usize)
        } else {
            None
        }
    }

    /// Sets every cell of the screen to `template`.
    pub fn fill(&mut self, template: Cell) {
        let volume = self.volume() as usize;
        self.buffer[..volume].fill(template);
    }

    /// Writes cells from `source` into the buffer starting at the
    /// target's origin, `target.span` cells per row.
    ///
    /// Stops at the end of the iterator or when the cursor passes the
    /// buffer edge. Returns the requested target area as a handle for
    /// composition by the caller.
    pub fn rewrite(
        &mut self,
        target: CellArea,
        source: impl IntoIterator<Item = Cell>,
    ) -> CellArea {
        let stride = self.dimensions.span as isize;
        let span = target.span as isize;
        let edge = stride * self.dimensions.lines as isize;

        if span == 0 {
            return target;
        }

        let advance = stride - span;
        let mut cursor =
            stride * target.top_offset as isize + target.left_offset as isize;
        let mut offset = 0isize;

        for cell in source {
            if cursor < 0 || cursor >= edge {
                break;
            }
            self.buffer[cursor as usize] = cell;

            offset += 1;
            cursor += 1;
            if offset >= span {
                cursor += advance;
                if cursor >= edge {
                    break;
                }
                offset = 0;
            }
        }

        target
    }

    /// Byte-level entry point for [`Screen::rewrite`].
    ///
    /// The payload must be a whole number of serialized cells; anything
    /// else fails with [`Error::InvalidInput`] before any cell is
    /// written.
    pub fn rewrite_bytes(&mut self, target: CellArea, payload: &[u8]) -> Result<CellArea, Error> {
        if payload.len() % Cell::SIZE != 0 {
            return Err(Error::partial_cell_payload(payload.len() % Cell::SIZE));
        }

        let mut decoded = Vec::with_capacity(payload.len() / Cell::SIZE);
        for chunk in payload.chunks_exact(Cell::SIZE) {
            decoded.push(Cell::from_bytes(chunk)?);
        }

        Ok(self.rewrite(target, decoded))
    }

    /// Materializes the clipped region as a flat row-major sequence.
    pub fn select(&self, area: CellArea) -> Vec<Cell> {
        let selection = intersect(self.dimensions, area);

        cells(self.buffer, self.dimensions.span as usize, selection)
            .map(|(_, _, cell)| *cell)
            .collect()
    }

    /// Copies the source region onto the destination region.
    ///
    /// Both areas are clipped to the screen, then reconciled to the
    /// element-wise minimum of their sizes. The copy goes through a
    /// temporary buffer so overlapping regions receive the pre-copy
    /// source image; a row-by-row copy in place would alias when the
    /// destination overlaps the source horizontally offset.
    pub fn replicate(&mut self, destination: CellArea, source: CellArea) -> Result<(), Error> {
        let mut dst = intersect(self.dimensions, destination);
        let mut src = intersect(self.dimensions, source);

        src.lines = src.lines.min(dst.lines);
        dst.lines = src.lines;
        src.span = src.span.min(dst.span);
        dst.span = src.span;

        let volume = src.volume() as usize;
        let mut staged = Vec::new();
        staged
            .try_reserve_exact(volume)
            .map_err(|_| Error::replication_buffer(volume))?;

        let stride = self.dimensions.span as usize;
        staged.extend(cells(self.buffer, stride, src).map(|(_, _, cell)| *cell));

        let mut pristine = staged.into_iter();
        for (_, _, cell) in cells_mut(self.buffer, stride, dst) {
            match pristine.next() {
                Some(value) => *cell = value,
                None => break,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cellmatrix_data::{Color, GlyphStyle};

    use super::*;

    fn glyph(codepoint: i32) -> Cell {
        Cell::glyph(codepoint, Color::BLACK, GlyphStyle::default())
    }

    fn letters(s: &str) -> Vec<Cell> {
        s.chars().map(|c| glyph(c as i32)).collect()
    }

    fn codepoints(cells: &[Cell]) -> Vec<i32> {
        cells.iter().map(|c| c.codepoint).collect()
    }

    #[test]
    fn test_rejects_undersized_buffer() {
        let mut buffer = vec![Cell::default(); 5];
        let result = Screen::new(CellArea::new(0, 0, 2, 3), &mut buffer);
        assert!(matches!(result, Err(Error::InsufficientBuffer(_))));
    }

    #[test]
    fn test_write_and_select() {
        let mut buffer = vec![Cell::default(); 6];
        let mut screen = Screen::new(CellArea::new(0, 0, 2, 3), &mut buffer).unwrap();

        let target = screen.rewrite(CellArea::new(0, 0, 2, 3), letters("ABCDEF"));
        assert_eq!(target, CellArea::new(0, 0, 2, 3));

        let all = screen.select(CellArea::new(0, 0, 2, 3));
        assert_eq!(codepoints(&all), codepoints(&letters("ABCDEF")));

        let column = screen.select(CellArea::new(0, 1, 2, 1));
        assert_eq!(codepoints(&column), codepoints(&letters("BE")));
    }

    #[test]
    fn test_rewrite_round_trip() {
        let mut buffer = vec![Cell::default(); 20];
        let mut screen = Screen::new(CellArea::new(0, 0, 4, 5), &mut buffer).unwrap();

        let area = CellArea::new(1, 2, 2, 3);
        let payload = letters("abcdef");
        screen.rewrite(area, payload.clone());

        assert_eq!(screen.select(area), payload);
    }

    #[test]
    fn test_rewrite_stops_at_iterator_end() {
        let mut buffer = vec![Cell::default(); 6];
        let mut screen = Screen::new(CellArea::new(0, 0, 2, 3), &mut buffer).unwrap();

        screen.rewrite(CellArea::new(0, 0, 2, 3), letters("AB"));

        assert_eq!(screen.cell(0, 0).unwrap().codepoint, 'A' as i32);
        assert_eq!(screen.cell(0, 1).unwrap().codepoint, 'B' as i32);
        assert_eq!(screen.cell(0, 2).unwrap().codepoint, -1);
    }

    #[test]
    fn test_rewrite_stops_at_buffer_edge() {
        let mut buffer = vec![Cell::default(); 6];
        let mut screen = Screen::new(CellArea::new(0, 0, 2, 3), &mut buffer).unwrap();

        screen.rewrite(CellArea::new(1, 1, 4, 2), letters("wxyz"));

        assert_eq!(screen.cell(1, 1).unwrap().codepoint, 'w' as i32);
        assert_eq!(screen.cell(1, 2).unwrap().codepoint, 'x' as i32);
        assert_eq!(screen.cell(0, 0).unwrap().codepoint, -1);
    }

    #[test]
    fn test_rewrite_bytes_rejects_partial_cells() {
        let mut buffer = vec![Cell::default(); 6];
        let mut screen = Screen::new(CellArea::new(0, 0, 2, 3), &mut buffer).unwrap();

        let mut payload = glyph('A' as i32).to_bytes().to_vec();
        payload.extend_from_slice(&[0, 1, 2]);

        let result = screen.rewrite_bytes(CellArea::new(0, 0, 1, 2), &payload);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(screen.cell(0, 0).unwrap().codepoint, -1);
    }

    #[test]
    fn test_rewrite_bytes_accepts_whole_cells() {
        let mut buffer = vec![Cell::default(); 6];
        let mut screen = Screen::new(CellArea::new(0, 0, 2, 3), &mut buffer).unwrap();

        let mut payload = Vec::new();
        for cell in letters("ok") {
            payload.extend_from_slice(&cell.to_bytes());
        }

        screen
            .rewrite_bytes(CellArea::new(0, 0, 1, 2), &payload)
            .unwrap();
        assert_eq!(screen.cell(0, 1).unwrap().codepoint, 'k' as i32);
    }

    #[test]
    fn test_replicate_with_horizontal_overlap() {
        let mut buffer = vec![Cell::default(); 5];
        let mut screen = Screen::new(CellArea::new(0, 0, 1, 5), &mut buffer).unwrap();
        screen.rewrite(
            CellArea::new(0, 0, 1, 5),
            (1..=5).map(glyph),
        );

        screen
            .replicate(CellArea::new(0, 1, 1, 4), CellArea::new(0, 0, 1, 4))
            .unwrap();

        let result = screen.select(CellArea::new(0, 0, 1, 5));
        assert_eq!(codepoints(&result), [1, 1, 2, 3, 4]);
    }

    #[test]
    fn test_replicate_is_a_semantic_blit() {
        let mut buffer = vec![Cell::default(); 16];
        let mut screen = Screen::new(CellArea::new(0, 0, 4, 4), &mut buffer).unwrap();
        screen.rewrite(CellArea::new(0, 0, 4, 4), (0..16).map(glyph));

        let src = CellArea::new(0, 0, 3, 3);
        let dst = CellArea::new(1, 1, 3, 3);
        let before = screen.select(src);

        screen.replicate(dst, src).unwrap();
        assert_eq!(screen.select(dst), before);
    }

    #[test]
    fn test_replicate_reconciles_sizes() {
        let mut buffer = vec![Cell::default(); 12];
        let mut screen = Screen::new(CellArea::new(0, 0, 3, 4), &mut buffer).unwrap();
        screen.rewrite(CellArea::new(0, 0, 3, 4), (1..=12).map(glyph));

        // Destination has more lines than the source; the remainder of
        // the destination is untouched.
        screen
            .replicate(CellArea::new(0, 0, 3, 2), CellArea::new(2, 0, 1, 2))
            .unwrap();

        let result = screen.select(CellArea::new(0, 0, 3, 4));
        assert_eq!(codepoints(&result), [9, 10, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_replicate_clips_to_screen() {
        let mut buffer = vec![Cell::default(); 4];
        let mut screen = Screen::new(CellArea::new(0, 0, 2, 2), &mut buffer).unwrap();
        screen.rewrite(CellArea::new(0, 0, 2, 2), (1..=4).map(glyph));

        screen
            .replicate(CellArea::new(1, 1, 5, 5), CellArea::new(0, 0, 5, 5))
            .unwrap();

        let result = screen.select(CellArea::new(0, 0, 2, 2));
        assert_eq!(codepoints(&result), [1, 2, 3, 1]);
    }
}
