use cellmatrix_data::{Cell, CellArea, CellContent, cells, intersect};

use crate::{
    error::Error,
    registry::Registry,
    surface::Surface,
    tiles::{Rasterize, TileCache},
};

/// Frame lifecycle of the renderer.
///
/// Invalidations move an idle frame to dirty, rendering resolves the
/// dirty regions, and dispatch presents the working buffer. The
/// presented state is transient; dispatch returns the frame to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePhase {
    #[default]
    Idle,
    Dirty,
    Rendered,
}

/// Rasterizes invalidated cell regions into a working surface and
/// presents them to an output surface.
///
/// The invalidation list is a flat, append-only sequence of areas that
/// grows within a frame and truncates once rendered. Rendering an
/// unchanged area is idempotent: every blit uses a source operator, so
/// repeated resolution produces pixel-identical output.
#[derive(Debug)]
pub struct Renderer {
    invalids: Vec<CellArea>,
    phase: FramePhase,
    working: Surface,
    output: Surface,
    temporary: Option<Surface>,
    cell_width: u32,
    cell_height: u32,
}

impl Renderer {
    pub fn new(
        cell_width: u32,
        cell_height: u32,
        surface_width: u32,
        surface_height: u32,
    ) -> Result<Self, Error> {
        Ok(Self {
            invalids: Vec::new(),
            phase: FramePhase::Idle,
            working: Surface::new(surface_width, surface_height)?,
            output: Surface::new(surface_width, surface_height)?,
            temporary: None,
            cell_width,
            cell_height,
        })
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Pending invalidations, in append order.
    pub fn invalid_areas(&self) -> &[CellArea] {
        &self.invalids
    }

    /// The surface most recently presented by [`Renderer::dispatch`].
    pub fn output(&self) -> &Surface {
        &self.output
    }

    /// The composition surface rendering draws into.
    pub fn working(&self) -> &Surface {
        &self.working
    }

    /// Appends `area` to the pending-invalidation list.
    pub fn invalidate(&mut self, area: CellArea) {
        self.invalids.push(area);
        self.phase = FramePhase::Dirty;
    }

    /// Reallocates both surfaces; any pending invalidations survive.
    pub fn resize(&mut self, surface_width: u32, surface_height: u32) -> Result<(), Error> {
        self.working = Surface::new(surface_width, surface_height)?;
        self.output = Surface::new(surface_width, surface_height)?;
        self.temporary = None;
        Ok(())
    }

    /// Rasterizes all pending invalidations into the working surface.
    ///
    /// A no-op unless the frame is dirty. Each area is clipped to the
    /// view and visited row-major; glyph cells resolve through the tile
    /// cache (rasterizing at most once per distinct cell value) and
    /// pixel-tile cells blit from their integrated image.
    pub fn render(
        &mut self,
        view: CellArea,
        image: &[Cell],
        cache: &mut TileCache,
        registry: &Registry,
        rasterizer: &mut dyn Rasterize,
    ) -> Result<(), Error> {
        if self.phase != FramePhase::Dirty {
            return Ok(());
        }

        let stride = view.span as usize;
        let mut scratch = [0u8; 4];

        for i in 0..self.invalids.len() {
            let area = intersect(view, self.invalids[i]);
            if area.is_empty() {
                continue;
            }

            for (line, offset, cell) in cells(image, stride, area) {
                let x = offset as u32 * self.cell_width;
                let y = line as u32 * self.cell_height;

                match cell.content() {
                    CellContent::Glyph(_) => {
                        let text: &str = if cell.codepoint >= 0 {
                            match char::from_u32(cell.codepoint as u32) {
                                Some(c) => c.encode_utf8(&mut scratch),
                                None => " ",
                            }
                        } else {
                            registry.expression(cell.codepoint).unwrap_or(" ")
                        };

                        let address = cache.acquire(cell, text, rasterizer)?;
                        if let Some(tile_image) = cache.image(address.image) {
                            self.working.blit_from(
                                tile_image,
                                address.x_pixels,
                                address.y_pixels,
                                x,
                                y,
                                self.cell_width,
                                self.cell_height,
                            );
                        }
                    },
                    CellContent::Tile(tile) => {
                        let pixels = registry
                            .image(cell.codepoint)
                            .and_then(|resource| resource.pixels.as_ref());

                        match pixels {
                            Some(source) => self.working.blit_from(
                                source,
                                tile.xtile as u32 * self.cell_width,
                                tile.ytile as u32 * self.cell_height,
                                x,
                                y,
                                self.cell_width,
                                self.cell_height,
                            ),
                            None => self.working.fill_rect(
                                cellmatrix_data::PixelRect {
                                    x: x as i32,
                                    y: y as i32,
                                    width: self.cell_width as i32,
                                    height: self.cell_height as i32,
                                },
                                cell.cell_color,
                            ),
                        }
                    },
                }
            }
        }

        self.invalids.clear();
        self.phase = FramePhase::Rendered;
        Ok(())
    }

    /// Presents the working surface by copying it onto the output
    /// surface, returning the frame to idle.
    ///
    /// Dispatching an idle frame re-presents the unchanged working
    /// surface; the copy still happens so the backend can flush.
    pub fn dispatch(&mut self) {
        let (width, height) = (self.working.width(), self.working.height());
        self.output.blit_from(&self.working, 0, 0, 0, 0, width, height);
        self.phase = FramePhase::Idle;
    }

    /// Copies the pixels of the source region onto the destination
    /// region, flushing pending invalidations first so the source
    /// reflects the latest cell values.
    ///
    /// The copy stages through a temporary surface: overlapping regions
    /// must receive the pre-copy source pixels.
    #[allow(clippy::too_many_arguments)]
    pub fn replicate(
        &mut self,
        destination: CellArea,
        source: CellArea,
        view: CellArea,
        image: &[Cell],
        cache: &mut TileCache,
        registry: &Registry,
        rasterizer: &mut dyn Rasterize,
    ) -> Result<(), Error> {
        self.render(view, image, cache, registry, rasterizer)?;

        let mut destination = intersect(view, destination);
        let mut source = intersect(view, source);
        source.lines = source.lines.min(destination.lines);
        destination.lines = source.lines;
        source.span = source.span.min(destination.span);
        destination.span = source.span;

        let width = source.span as u32 * self.cell_width;
        let height = source.lines as u32 * self.cell_height;

        let source_x = source.left_offset as u32 * self.cell_width;
        let source_y = source.top_offset as u32 * self.cell_height;
        let staged = match self.temporary.take() {
            Some(mut surface) if surface.width() == width && surface.height() == height => {
                surface.blit_from(&self.working, source_x, source_y, 0, 0, width, height);
                surface
            },
            _ => self.working.extract(source_x, source_y, width, height)?,
        };
        self.working.blit_from(
            &staged,
            0,
            0,
            destination.left_offset as u32 * self.cell_width,
            destination.top_offset as u32 * self.cell_height,
            width,
            height,
        );
        self.temporary = Some(staged);

        Ok(())
    }
}
