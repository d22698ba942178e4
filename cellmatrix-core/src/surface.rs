use cellmatrix_data::{Color, PixelRect};

use crate::error::Error;

/// An owned RGBA8 pixel surface.
///
/// Pixels are stored row-major as packed `0xAARRGGBB` words. All copy
/// operations use a source compositing operator: destination pixels are
/// replaced outright, never blended with stale content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Surface {
    /// Allocates a zeroed surface.
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        let len = width as usize * height as usize;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| Error::surface_allocation(width, height))?;
        pixels.resize(len, 0);

        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color.to_u32());
    }

    /// Fills a rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        let word = color.to_u32();
        let x0 = (rect.x.max(0) as u32).min(self.width);
        let y0 = (rect.y.max(0) as u32).min(self.height);
        let x1 = (rect.x.saturating_add(rect.width)).clamp(0, self.width as i32) as u32;
        let y1 = (rect.y.saturating_add(rect.height)).clamp(0, self.height as i32) as u32;
        if x1 <= x0 || y1 <= y0 {
            return;
        }

        for y in y0..y1 {
            let row = (y * self.width + x0) as usize..(y * self.width + x1) as usize;
            self.pixels[row].fill(word);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(Color::from_u32(self.pixels[(y * self.width + x) as usize]))
        } else {
            None
        }
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color.to_u32();
        }
    }

    /// Copies a rectangle from `source`, replacing destination pixels.
    ///
    /// The rectangle is clipped against both surfaces. `source` may not
    /// alias `self`; overlapping copies within one surface go through a
    /// temporary surface.
    pub fn blit_from(
        &mut self,
        source: &Surface,
        src_x: u32,
        src_y: u32,
        dst_x: u32,
        dst_y: u32,
        width: u32,
        height: u32,
    ) {
        let width = width
            .min(source.width.saturating_sub(src_x))
            .min(self.width.saturating_sub(dst_x));
        let height = height
            .min(source.height.saturating_sub(src_y))
            .min(self.height.saturating_sub(dst_y));
        if width == 0 || height == 0 {
            return;
        }

        for row in 0..height {
            let src_start = ((src_y + row) * source.width + src_x) as usize;
            let dst_start = ((dst_y + row) * self.width + dst_x) as usize;
            self.pixels[dst_start..dst_start + width as usize]
                .copy_from_slice(&source.pixels[src_start..src_start + width as usize]);
        }
    }

    /// Extracts a rectangle into a newly allocated surface.
    pub fn extract(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Surface, Error> {
        let mut out = Surface::new(width, height)?;
        out.blit_from(self, x, y, 0, 0, width, height);
        Ok(out)
    }
}
