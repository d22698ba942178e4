mod area;
mod cell;
mod color;
mod error;
mod matrix;
mod traits;

pub use area::{CellArea, cells, cells_mut, intersect};
pub use cell::{Cell, CellContent, GlyphStyle, PixelTile, IMAGE_TILE, MAXIMUM_GLYPH_WIDTH};
pub use color::Color;
pub use error::Error;
pub use matrix::{
    DEFAULT_CELL_SAMPLE, GlyphInscriptionParameters, MatrixParameters, PixelRect,
    area_to_pixels, cell_to_pixels, pixels_to_area,
};
pub use traits::{CellTraits, LinePattern};
