use cellmatrix_core::Surface;
use cellmatrix_data::{Color, LinePattern};

/// Draws a horizontal decoration line across `[x, x + width)` at
/// vertical position `y_line`, in the given pattern.
///
/// Drawing is clipped to `[clip_top, clip_bottom)` so a line near a
/// tile edge cannot bleed into a neighboring tile.
pub fn draw_line(
    surface: &mut Surface,
    x: u32,
    y_line: u32,
    width: u32,
    pattern: LinePattern,
    color: Color,
    clip_top: u32,
    clip_bottom: u32,
) {
    let mut paint = |px: u32, py: u32| {
        if py >= clip_top && py < clip_bottom {
            surface.put_pixel(px, py, color);
        }
    };

    match pattern {
        LinePattern::Void => {},
        LinePattern::Solid => {
            for px in x..x + width {
                paint(px, y_line);
            }
        },
        LinePattern::Thick => {
            for px in x..x + width {
                paint(px, y_line);
                paint(px, y_line + 1);
            }
        },
        LinePattern::Double => {
            for px in x..x + width {
                paint(px, y_line);
                paint(px, y_line + 2);
            }
        },
        LinePattern::Dashed => {
            for px in x..x + width {
                if (px - x) % 5 < 3 {
                    paint(px, y_line);
                }
            }
        },
        LinePattern::Dotted => {
            for px in x..x + width {
                if (px - x) % 2 == 0 {
                    paint(px, y_line);
                }
            }
        },
        LinePattern::Wavy => {
            for px in x..x + width {
                let phase = (px - x) % 4;
                let dy = match phase {
                    0 | 3 => 0,
                    _ => 1,
                };
                paint(px, y_line + dy);
            }
        },
        LinePattern::Sawtooth => {
            for px in x..x + width {
                let dy = (px - x) % 3;
                paint(px, y_line + dy);
            }
        },
    }
}
