use crate::{CellArea, Error};

/// Sample characters used when measuring a font for cell dimensions.
pub const DEFAULT_CELL_SAMPLE: &str = "dbqpgyTWWWWMMMXY|[]{}()@$\\/-?_,.│─";

/// Precision controls over how a cell's glyph is inscribed.
///
/// The raw cell width and height normally come from the selected font;
/// pads and offsets adjust the addressed tile around the glyph.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphInscriptionParameters {
    /// Stroke width adjustment, where the text engine supports it.
    pub stroke_width: f32,
    /// Raw cell width in system units.
    pub cell_width: f64,
    /// Raw cell height in system units.
    pub cell_height: f64,
    /// Extra width given to all cells; negative to remove width.
    pub horizontal_pad: f64,
    /// Extra height given to all cells; negative to remove height.
    pub vertical_pad: f64,
    /// Horizontal offset applied when rasterizing a glyph.
    pub horizontal_offset: f64,
    /// Vertical offset applied when rasterizing a glyph.
    pub vertical_offset: f64,
}

/// Dimensions for translating between cells, system units, and pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MatrixParameters {
    /// Factor translating system units into pixel units.
    pub scale_factor: f64,
    /// Width of the matrix in system units; `x_cells * x_cell_units`.
    pub x_screen_units: f64,
    /// Height of the matrix in system units; `y_cells * y_cell_units`.
    pub y_screen_units: f64,
    /// Width of a cell in system units, aligned to whole scaled pixels.
    pub x_cell_units: f64,
    /// Height of a cell in system units, aligned to whole scaled pixels.
    pub y_cell_units: f64,
    /// Area of a cell in system units.
    pub v_cell_units: f64,
    /// Number of cells across the matrix.
    pub x_cells: u16,
    /// Number of lines in the matrix.
    pub y_cells: u16,
    /// Total number of cells; always `x_cells * y_cells`.
    pub v_cells: u32,
}

impl MatrixParameters {
    /// Fixed binary size of a parameters snapshot.
    pub const SIZE: usize = 56;

    /// Configures cell units from inscription parameters.
    ///
    /// Pads are applied to the raw glyph units and the result is aligned
    /// on whole scaled pixels.
    pub fn configure_cells(&mut self, ip: &GlyphInscriptionParameters, scale_factor: f64) {
        self.scale_factor = scale_factor;

        self.x_cell_units = ip.cell_width + ip.horizontal_pad;
        self.y_cell_units = ip.cell_height + ip.vertical_pad;

        self.x_cell_units = (self.x_cell_units * scale_factor).ceil() / scale_factor;
        self.y_cell_units = (self.y_cell_units * scale_factor).ceil() / scale_factor;
        self.v_cell_units = self.x_cell_units * self.y_cell_units;
    }

    /// Derives cell counts and adjusted screen units from a surface size
    /// given in system units.
    pub fn calculate_dimensions(&mut self, screen_width: f64, screen_height: f64) {
        self.x_cells = (screen_width / self.x_cell_units).floor() as u16;
        self.y_cells = (screen_height / self.y_cell_units).floor() as u16;
        self.v_cells = self.x_cells as u32 * self.y_cells as u32;

        self.x_screen_units = self.x_cells as f64 * self.x_cell_units;
        self.y_screen_units = self.y_cells as f64 * self.y_cell_units;
    }

    /// A copy sized for `area`: cell counts from the area's lines and
    /// span, screen units recomputed from the configured cell units.
    #[must_use]
    pub fn for_area(&self, area: CellArea) -> Self {
        let mut mp = *self;
        mp.x_cells = area.span;
        mp.y_cells = area.lines;
        mp.v_cells = mp.x_cells as u32 * mp.y_cells as u32;
        mp.x_screen_units = mp.x_cells as f64 * mp.x_cell_units;
        mp.y_screen_units = mp.y_cells as f64 * mp.y_cell_units;
        mp
    }

    /// Size of one cell in whole pixels.
    pub fn cell_pixel_size(&self) -> (u32, u32) {
        (
            (self.x_cell_units * self.scale_factor).round() as u32,
            (self.y_cell_units * self.scale_factor).round() as u32,
        )
    }

    /// Size of the whole matrix in pixels.
    pub fn screen_pixel_size(&self) -> (u32, u32) {
        let (cw, ch) = self.cell_pixel_size();
        (cw * self.x_cells as u32, ch * self.y_cells as u32)
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let fields = [
            self.scale_factor,
            self.x_screen_units,
            self.y_screen_units,
            self.x_cell_units,
            self.y_cell_units,
            self.v_cell_units,
        ];
        for (i, f) in fields.iter().enumerate() {
            bytes[i * 8..i * 8 + 8].copy_from_slice(&f.to_le_bytes());
        }
        bytes[48..50].copy_from_slice(&self.x_cells.to_le_bytes());
        bytes[50..52].copy_from_slice(&self.y_cells.to_le_bytes());
        bytes[52..56].copy_from_slice(&self.v_cells.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SIZE {
            return Err(Error::matrix_byte_length(bytes.len()));
        }

        let field = |i: usize| {
            let mut b = [0u8; 8];
            b.copy_from_slice(&bytes[i * 8..i * 8 + 8]);
            f64::from_le_bytes(b)
        };

        Ok(Self {
            scale_factor: field(0),
            x_screen_units: field(1),
            y_screen_units: field(2),
            x_cell_units: field(3),
            y_cell_units: field(4),
            v_cell_units: field(5),
            x_cells: u16::from_le_bytes([bytes[48], bytes[49]]),
            y_cells: u16::from_le_bytes([bytes[50], bytes[51]]),
            v_cells: u32::from_le_bytes([bytes[52], bytes[53], bytes[54], bytes[55]]),
        })
    }
}

/// A pixel-unit rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Pixel rectangle of the single cell at `(offset, line)`.
pub fn cell_to_pixels(mp: &MatrixParameters, offset: u16, line: u16) -> PixelRect {
    let (cw, ch) = mp.cell_pixel_size();

    PixelRect {
        x: offset as i32 * cw as i32,
        y: line as i32 * ch as i32,
        width: cw as i32,
        height: ch as i32,
    }
}

/// Pixel rectangle covering `area`.
pub fn area_to_pixels(mp: &MatrixParameters, area: CellArea) -> PixelRect {
    let (cw, ch) = mp.cell_pixel_size();

    PixelRect {
        x: area.left_offset as i32 * cw as i32,
        y: area.top_offset as i32 * ch as i32,
        width: area.span as i32 * cw as i32,
        height: area.lines as i32 * ch as i32,
    }
}

/// Cell area covered by a pixel rectangle; origin floored, extent
/// ceiled, clamped to the matrix.
pub fn pixels_to_area(mp: &MatrixParameters, rect: PixelRect) -> CellArea {
    let (cw, ch) = mp.cell_pixel_size();
    let (cw, ch) = (cw.max(1) as i32, ch.max(1) as i32);

    let left = (rect.x / cw).clamp(0, mp.x_cells as i32);
    let top = (rect.y / ch).clamp(0, mp.y_cells as i32);
    let right = ((rect.x + rect.width + cw - 1) / cw).clamp(left, mp.x_cells as i32);
    let bottom = ((rect.y + rect.height + ch - 1) / ch).clamp(top, mp.y_cells as i32);

    CellArea {
        top_offset: top as u16,
        left_offset: left as u16,
        lines: (bottom - top) as u16,
        span: (right - left) as u16,
    }
}
