use std::sync::Arc;

use cellmatrix_core::{CellGlyph, Rasterize, Surface};
use cellmatrix_data::{Color, PixelRect};
use swash::{
    FontRef,
    scale::{Render, ScaleContext, Source, StrikeWith, image::Content},
    zeno::Format,
};

use crate::{RasterConfig, decorations::draw_line, error::Error};

/// Face selection per trait combination: normal, bold, italic, both.
const FACE_VARIANTS: usize = 4;

#[derive(Clone)]
struct FaceData {
    data: Arc<Vec<u8>>,
    index: u32,
}

/// Font-backed glyph rasterizer.
///
/// Faces are discovered through the system database (honoring the
/// configured family with a monospace fallback), scaled with swash,
/// and composited into the tile with an alpha blend over the cell's
/// background fill. Styles select among the four face variants; the
/// caps trait uppercases before shaping; underline and strikethrough
/// are drawn as line decorations.
pub struct FontRasterizer {
    faces: [FaceData; FACE_VARIANTS],
    size: f32,
    horizontal_offset: f64,
    vertical_offset: f64,
    context: ScaleContext,
}

impl std::fmt::Debug for FontRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRasterizer")
            .field("size", &self.size)
            .finish()
    }
}

impl FontRasterizer {
    /// Locates the configured family in the system font database.
    pub fn new(config: &RasterConfig) -> Result<Self, Error> {
        let mut database = fontdb::Database::new();
        database.load_system_fonts();
        Self::with_database(config, &database)
    }

    /// Locates faces in a caller-provided database.
    pub fn with_database(config: &RasterConfig, database: &fontdb::Database)
    -> Result<Self, Error> {
        let family_label = config.font_family.as_deref().unwrap_or("monospace");

        let query_face = |weight: fontdb::Weight, style: fontdb::Style| -> Option<FaceData> {
            let mut families = Vec::with_capacity(2);
            if let Some(name) = config.font_family.as_deref() {
                families.push(fontdb::Family::Name(name));
            }
            families.push(fontdb::Family::Monospace);

            let id = database.query(&fontdb::Query {
                families: &families,
                weight,
                style,
                stretch: fontdb::Stretch::Normal,
            })?;
            database.with_face_data(id, |data, index| FaceData {
                data: Arc::new(data.to_vec()),
                index,
            })
        };

        let normal = query_face(fontdb::Weight::NORMAL, fontdb::Style::Normal)
            .ok_or_else(|| Error::no_matching_font(family_label))?;
        if normal.data.is_empty() {
            return Err(Error::face_data_unreadable(family_label));
        }
        FontRef::from_index(&normal.data, normal.index as usize)
            .ok_or_else(|| Error::face_unparsable(family_label))?;

        let bold = query_face(fontdb::Weight::BOLD, fontdb::Style::Normal)
            .unwrap_or_else(|| normal.clone());
        let italic = query_face(fontdb::Weight::NORMAL, fontdb::Style::Italic)
            .unwrap_or_else(|| normal.clone());
        let bold_italic = query_face(fontdb::Weight::BOLD, fontdb::Style::Italic)
            .unwrap_or_else(|| bold.clone());

        tracing::info!(family = family_label, size = config.font_size, "font selection");

        Ok(Self {
            faces: [normal, bold, italic, bold_italic],
            size: config.font_size,
            horizontal_offset: config.horizontal_offset,
            vertical_offset: config.vertical_offset,
            context: ScaleContext::new(),
        })
    }

    fn face(&self, bold: bool, italic: bool) -> &FaceData {
        let ordinal = bold as usize | ((italic as usize) << 1);
        &self.faces[ordinal]
    }
}

fn blend_pixel(surface: &mut Surface, x: u32, y: u32, color: Color, coverage: u8) {
    if coverage == 0 {
        return;
    }
    let Some(background) = surface.pixel(x, y) else {
        return;
    };

    let a = coverage as u32;
    let mix = |fg: u8, bg: u8| ((fg as u32 * a + bg as u32 * (255 - a)) / 255) as u8;

    surface.put_pixel(
        x,
        y,
        Color::new(
            mix(color.r, background.r),
            mix(color.g, background.g),
            mix(color.b, background.b),
        ),
    );
}

impl Rasterize for FontRasterizer {
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

        let character = glyph.text.chars().next().filter(|c| !c.is_whitespace());
        let character = match (character, style.traits.caps()) {
            (Some(c), true) => c.to_uppercase().next(),
            (c, false) => c,
            (None, _) => None,
        };

        if let Some(character) = character {
            let face = self.face(style.traits.bold(), style.traits.italic()).clone();

            if let Some(font) = FontRef::from_index(&face.data, face.index as usize) {
                let metrics = font.metrics(&[]);
                let ascent = metrics.ascent * (self.size / metrics.units_per_em as f32);
                let baseline = y_pixels as i32 + self.vertical_offset as i32 + ascent as i32;

                let glyph_id = font.charmap().map(character);
                let mut scaler = self
                    .context
                    .builder(font)
                    .size(self.size)
                    .hint(true)
                    .build();

                let rendered = Render::new(&[
                    Source::ColorOutline(0),
                    Source::ColorBitmap(StrikeWith::BestFit),
                    Source::Outline,
                ])
                .format(Format::Alpha)
                .render(&mut scaler, glyph_id);

                if let Some(image) = rendered {
                    // Multi-cell glyphs inscribe the full glyph shifted
                    // left by the window index; clipping keeps each
                    // tile to its own horizontal section.
                    let origin_x = x_pixels as i32
                        - (cell.window() as u32 * cell_width) as i32
                        + self.horizontal_offset as i32
                        + image.placement.left;
                    let origin_y = baseline - image.placement.top;

                    let clip_x = x_pixels..x_pixels + cell_width;
                    let clip_y = y_pixels..y_pixels + cell_height;

                    for row in 0..image.placement.height {
                        for column in 0..image.placement.width {
                            let px = origin_x + column as i32;
                            let py = origin_y + row as i32;
                            if px < 0 || py < 0 {
                                continue;
                            }
                            let (px, py) = (px as u32, py as u32);
                            if !clip_x.contains(&px) || !clip_y.contains(&py) {
                                continue;
                            }

                            let offset = (row * image.placement.width + column) as usize;
                            match image.content {
                                Content::Mask => blend_pixel(
                                    surface,
                                    px,
                                    py,
                                    style.glyph_color,
                                    image.data[offset],
                                ),
                                Content::Color => {
                                    let base = offset * 4;
                                    blend_pixel(
                                        surface,
                                        px,
                                        py,
                                        Color::new(
                                            image.data[base],
                                            image.data[base + 1],
                                            image.data[base + 2],
                                        ),
                                        image.data[base + 3],
                                    );
                                },
                                Content::SubpixelMask => blend_pixel(
                                    surface,
                                    px,
                                    py,
                                    style.glyph_color,
                                    image.data[offset * 4 + 3],
                                ),
                            }
                        }
                    }
                }
            }
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
