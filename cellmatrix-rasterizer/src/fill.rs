use cellmatrix_core::{CellGlyph, Rasterize, Surface};
use cellmatrix_data::PixelRect;

use crate::decorations::draw_line;

/// Deterministic block rasterizer.
///
/// Fills the cell with its background and inscribes any glyph as a
/// centered block of the glyph color, with line decorations drawn the
/// same way the font rasterizer draws them. No font machinery: output
/// depends only on the cell value, which makes it the rasterizer of
/// choice for tests and for the mirror demo.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillRasterizer;

impl Rasterize for FillRasterizer {
    fn rasterize(
        &mut self,
        surface: &mut Surface,
        x_pixels: u32,
        y_pixels: u32,
        cell_width: u32,
        cell_height: u32,
        glyph: &CellGlyph<'_>,
    ) {
        let cell = &glyph.cell;

        surface.fill_rect(
            PixelRect {
                x: x_pixels as i32,
                y: y_pixels as i32,
                width: cell_width as i32,
                height: cell_height as i32,
            },
            cell.cell_color,
        );

        let Some(style) = cell.style() else {
            return;
        };

        // The vacant codepoint and blank text leave only the fill.
        if cell.codepoint >= 0 && !glyph.text.trim().is_empty() {
            let inset_x = cell_width / 4;
            let inset_y = cell_height / 4;
            surface.fill_rect(
                PixelRect {
                    x: (x_pixels + inset_x) as i32,
                    y: (y_pixels + inset_y) as i32,
                    width: (cell_width - 2 * inset_x) as i32,
                    height: (cell_height - 2 * inset_y) as i32,
                },
                style.glyph_color,
            );
        }

        let clip_top = y_pixels;
        let clip_bottom = y_pixels + cell_height;

        let underline_y = y_pixels + cell_height - cell_height / 8 - 1;
        draw_line(
            surface,
            x_pixels,
            underline_y,
            cell_width,
            style.traits.underline(),
            style.line_color,
            clip_top,
            clip_bottom,
        );

        let strike_y = y_pixels + cell_height / 2;
        draw_line(
            surface,
            x_pixels,
            strike_y,
            cell_width,
            style.traits.strikethrough(),
            style.line_color,
            clip_top,
            clip_bottom,
        );
    }
}

#[cfg(test)]
mod tests {
    use cellmatrix_data::{Cell, CellTraits, Color, GlyphStyle, LinePattern};

    use super::*;

    fn rasterize(cell: Cell, text: &str) -> Surface {
        let mut surface = Surface::new(8, 16).unwrap();
        FillRasterizer.rasterize(&mut surface, 0, 0, 8, 16, &CellGlyph { cell, text });
        surface
    }

    #[test]
    fn test_vacant_cell_is_background_only() {
        let bg = Color::new(30, 30, 40);
        let surface = rasterize(Cell::EMPTY.with_cell_color(bg), " ");

        for y in 0..16 {
            for x in 0..8 {
                assert_eq!(surface.pixel(x, y), Some(bg));
            }
        }
    }

    #[test]
    fn test_glyph_block_is_inscribed() {
        let bg = Color::new(0, 0, 0);
        let fg = Color::new(220, 220, 220);
        let cell = Cell::glyph('A' as i32, bg, GlyphStyle {
            glyph_color: fg,
            ..Default::default()
        });

        let surface = rasterize(cell, "A");
        assert_eq!(surface.pixel(0, 0), Some(bg));
        assert_eq!(surface.pixel(4, 8), Some(fg));
    }

    #[test]
    fn test_underline_uses_line_color() {
        let line = Color::new(255, 0, 0);
        let cell = Cell::glyph(' ' as i32, Color::BLACK, GlyphStyle {
            traits: CellTraits::none().with_underline(LinePattern::Solid),
            glyph_color: Color::WHITE,
            line_color: line,
        });

        let surface = rasterize(cell, " ");
        assert_eq!(surface.pixel(0, 13), Some(line));
        assert_eq!(surface.pixel(7, 13), Some(line));
    }

    #[test]
    fn test_same_cell_rasterizes_identically() {
        let cell = Cell::glyph('q' as i32, Color::new(1, 2, 3), GlyphStyle {
            glyph_color: Color::new(200, 100, 0),
            traits: CellTraits::none().with_strikethrough(LinePattern::Dashed),
            ..Default::default()
        });

        assert_eq!(rasterize(cell, "q"), rasterize(cell, "q"));
    }
}
