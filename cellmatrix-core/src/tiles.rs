use cellmatrix_data::Cell;

use crate::{error::Error, surface::Surface};

/// Default confinement; 16 images of 16x16 tiles, 4096 tile slots.
pub const DEFAULT_CONFINEMENT: usize = 16;

/// Records must accumulate this many lookups before their rate resamples.
const SAMPLING_THRESHOLD: isize = 50;
/// Rate lead a record needs over its predecessor to be promoted.
const PROMOTION_MARGIN: isize = 5;

const WORD_MUL: u32 = 0x9E3779B1;
const CELL_WORD_MUL: u32 = 0x01020304;

/// A cell description handed to the rasterizer: the cell value plus the
/// resolved grapheme text its codepoint names.
#[derive(Debug, Clone, Copy)]
pub struct CellGlyph<'a> {
    pub cell: Cell,
    pub text: &'a str,
}

/// Capability contract for drawing a cell's glyph.
///
/// The cache only requires that the implementation draws the glyph
/// within the prescribed rectangle of the target surface.
pub trait Rasterize {
    fn rasterize(
        &mut self,
        surface: &mut Surface,
        x_pixels: u32,
        y_pixels: u32,
        cell_width: u32,
        cell_height: u32,
        glyph: &CellGlyph<'_>,
    );
}

/// Pixel address of a cached tile inside one of the backing images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileAddress {
    pub image: u16,
    pub x_pixels: u32,
    pub y_pixels: u32,
}

/// A cache entry binding a cell value to a physical tile slot.
///
/// The `(image_index, line, cell)` triple is permanently bound at
/// allocation time; records move within their bucket, physical slots do
/// not move.
#[derive(Debug, Clone)]
struct TileRecord {
    key: Cell,
    image_index: u16,
    line: u16,
    cell: u16,
    hits: isize,
    passes: isize,
    rate: isize,
}

impl TileRecord {
    fn vacant(image_index: u16, line: u16, cell: u16) -> Self {
        Self {
            key: Cell::EMPTY,
            image_index,
            line,
            cell,
            hits: 0,
            passes: 0,
            rate: 0,
        }
    }
}

/// One hash bucket: an ordered run of records stored contiguously.
///
/// Entries in `[0, count)` are live; entries in `[count, records.len())`
/// are slot-bound but vacant, either never keyed or trimmed by an
/// eviction.
#[derive(Debug, Default)]
struct Bucket {
    records: Vec<TileRecord>,
    count: usize,
}

/// Bounded, frequency-ranked cache of rasterized glyph tiles.
///
/// Fixing an integer confinement `R`, the cache owns `R` images each
/// holding an `R x R` grid of tiles, for `R^3` physical slots, indexed
/// by `R * ceil(R / 2)` hash buckets that grow `R` records at a time.
/// The cell's byte image is the key: every distinct cell value that has
/// not been evicted maps to the same physical slot, so repeated
/// acquisition never re-rasterizes.
///
/// Eviction is local to a bucket and never panics; the bucket shrinks
/// in place and continues.
#[derive(Debug)]
pub struct TileCache {
    confinement: usize,
    cell_width: u32,
    cell_height: u32,
    images: Vec<Surface>,
    buckets: Vec<Bucket>,
    image_next: usize,
    image_limit: usize,
    rasterized: u64,
}

impl TileCache {
    /// Allocates the backing images and bucket index for the given
    /// confinement and tile size.
    pub fn new(confinement: usize, cell_width: u32, cell_height: u32) -> Result<Self, Error> {
        if confinement == 0 || cell_width == 0 || cell_height == 0 {
            return Err(Error::InvalidInput(format!(
                "tile cache requires non-zero confinement and tile size, \
                 received {confinement} at {cell_width}x{cell_height}"
            )));
        }

        let mut images = Vec::with_capacity(confinement);
        for _ in 0..confinement {
            images.push(Surface::new(
                confinement as u32 * cell_width,
                confinement as u32 * cell_height,
            )?);
        }

        let distribution = confinement * confinement.div_ceil(2);
        let mut buckets = Vec::with_capacity(distribution);
        buckets.resize_with(distribution, Bucket::default);

        Ok(Self {
            confinement,
            cell_width,
            cell_height,
            images,
            buckets,
            image_next: 0,
            image_limit: confinement * confinement * confinement,
            rasterized: 0,
        })
    }

    pub fn cell_size(&self) -> (u32, u32) {
        (self.cell_width, self.cell_height)
    }

    /// Physical tile slots handed out so far.
    pub fn slots_bound(&self) -> usize {
        self.image_next
    }

    /// Live records across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.count == 0)
    }

    /// Total rasterizer invocations; each distinct resident cell value
    /// costs exactly one.
    pub fn rasterization_count(&self) -> u64 {
        self.rasterized
    }

    /// The backing image holding tiles addressed by [`TileAddress`].
    pub fn image(&self, index: u16) -> Option<&Surface> {
        self.images.get(index as usize)
    }

    /// Resolves the tile for `cell`, rasterizing it on first sight.
    ///
    /// Walks the cell's bucket, counting hits and passes and
    /// re-prioritizing records as it goes. On a miss a record is
    /// allocated, bound to a physical slot, and the rasterizer draws
    /// the glyph into that slot once.
    pub fn acquire(
        &mut self,
        cell: &Cell,
        text: &str,
        rasterizer: &mut dyn Rasterize,
    ) -> Result<TileAddress, Error> {
        let b = self.bucket_index(cell);

        let mut hit = None;
        {
            let bucket = &mut self.buckets[b];
            let mut i = 0;
            while i < bucket.count {
                let matched = bucket.records[i].key == *cell;
                if matched {
                    bucket.records[i].hits += 1;
                } else {
                    bucket.records[i].passes += 1;
                }

                let position = prioritize(&mut bucket.records, i);
                if matched {
                    hit = Some(position);
                    break;
                }
                i += 1;
            }
        }

        if let Some(index) = hit {
            let record = &self.buckets[b].records[index];
            return Ok(self.address(record.image_index, record.line, record.cell));
        }

        let index = self.allocate(b)?;
        let record = &mut self.buckets[b].records[index];
        record.key = *cell;
        record.hits = 1;
        record.passes = 1;
        record.rate = 0;
        let (image_index, line, column) = (record.image_index, record.line, record.cell);

        let address = self.address(image_index, line, column);
        rasterizer.rasterize(
            &mut self.images[image_index as usize],
            address.x_pixels,
            address.y_pixels,
            self.cell_width,
            self.cell_height,
            &CellGlyph { cell: *cell, text },
        );
        self.rasterized += 1;

        Ok(address)
    }

    fn address(&self, image_index: u16, line: u16, column: u16) -> TileAddress {
        TileAddress {
            image: image_index,
            x_pixels: column as u32 * self.cell_width,
            y_pixels: line as u32 * self.cell_height,
        }
    }

    /// Hands out the record index for a new entry in bucket `b`.
    ///
    /// Preference order: a vacant slot-bound record, bucket growth from
    /// the unused physical slots, a quarter-drop eviction, and finally
    /// overwriting the bucket's last record. Physical slots freed by an
    /// eviction are reused only through this bucket; no inter-bucket
    /// rebalance is attempted.
    fn allocate(&mut self, b: usize) -> Result<usize, Error> {
        let confinement = self.confinement;
        let limit = self.image_limit;
        let bucket = &mut self.buckets[b];

        if bucket.count == bucket.records.len() {
            if self.image_next < limit {
                let growth = (limit - self.image_next).min(confinement);
                bucket
                    .records
                    .try_reserve(growth)
                    .map_err(|_| Error::OutOfMemory("tile bucket growth".into()))?;

                for _ in 0..growth {
                    let (image_index, line, column) =
                        slot_coordinates(self.image_next, confinement);
                    bucket
                        .records
                        .push(TileRecord::vacant(image_index, line, column));
                    self.image_next += 1;
                }
            } else if bucket.count > 0 {
                let dropped = bucket.count.div_ceil(4);
                bucket.count -= dropped;
                tracing::debug!(bucket = b, dropped, "tile cache bucket eviction");
            } else {
                // The bucket never received slots and none remain
                // unused; rebind the final physical slot under this
                // bucket. Cached pixels of the slot's prior tenant are
                // clobbered, an accepted wedge of the growth policy.
                let (image_index, line, column) = slot_coordinates(limit - 1, confinement);
                bucket
                    .records
                    .try_reserve(1)
                    .map_err(|_| Error::OutOfMemory("tile bucket growth".into()))?;
                bucket
                    .records
                    .push(TileRecord::vacant(image_index, line, column));
                tracing::warn!(bucket = b, "tile cache exhausted; rebinding final slot");
            }
        }

        if bucket.count < bucket.records.len() {
            let index = bucket.count;
            bucket.count += 1;
            Ok(index)
        } else {
            Ok(bucket.count - 1)
        }
    }

    fn bucket_index(&self, cell: &Cell) -> usize {
        let bytes = cell.to_bytes();
        let mut hash = (cell.codepoint as u32).wrapping_mul(WORD_MUL);
        let mut salt = 1u32;

        for chunk in bytes.chunks_exact(4) {
            let mut word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            if word == 0 {
                word = salt;
                salt += 1;
            }
            hash ^= word.wrapping_mul(CELL_WORD_MUL);
        }

        hash as usize % self.buckets.len()
    }
}

/// Slot number to fixed `(image, line, cell)` coordinates.
fn slot_coordinates(slot: usize, confinement: usize) -> (u16, u16, u16) {
    let tiles_per_image = confinement * confinement;
    let image_index = slot / tiles_per_image;
    let remainder = slot % tiles_per_image;

    (
        image_index as u16,
        (remainder / confinement) as u16,
        (remainder % confinement) as u16,
    )
}

/// Re-ranks the record at `current` against its predecessor, keeping
/// hot entries near the front of the bucket.
///
/// Returns the record's position after the operation. Counters below
/// the sampling threshold leave the ordering untouched; otherwise the
/// hit/pass ratio folds into a running rate (negative when passes
/// dominate), the counters reset, and a sufficient rate lead swaps the
/// record with its predecessor.
fn prioritize(records: &mut [TileRecord], current: usize) -> usize {
    let record = &mut records[current];
    if record.hits + record.passes < SAMPLING_THRESHOLD {
        return current;
    }

    let sample = if record.hits >= record.passes {
        record.hits / record.passes.max(1)
    } else {
        -(record.passes / record.hits.max(1))
    };
    record.rate = (record.rate + sample) / 2;
    record.hits = 1;
    record.passes = 1;

    if current > 0 && records[current].rate - records[current - 1].rate > PROMOTION_MARGIN {
        records.swap(current - 1, current);
        return current - 1;
    }

    current
}

#[cfg(test)]
mod tests {
    use cellmatrix_data::{Color, GlyphStyle};

    use super::*;

    /// Counts invocations; paints the tile with the glyph color.
    struct CountingRasterizer {
        invocations: u64,
    }

    impl CountingRasterizer {
        fn new() -> Self {
            Self { invocations: 0 }
        }
    }

    impl Rasterize for CountingRasterizer {
        fn rasterize(
            &mut self,
            surface: &mut Surface,
            x: u32,
            y: u32,
            width: u32,
            height: u32,
            glyph: &CellGlyph<'_>,
        ) {
            self.invocations += 1;
            let color = glyph
                .cell
                .style()
                .map(|s| s.glyph_color)
                .unwrap_or(Color::WHITE);
            for py in y..y + height {
                for px in x..x + width {
                    surface.put_pixel(px, py, color);
                }
            }
        }
    }

    fn glyph(codepoint: i32) -> Cell {
        Cell::glyph(codepoint, Color::BLACK, GlyphStyle {
            glyph_color: Color::new(10, 20, 30),
            ..Default::default()
        })
    }

    #[test]
    fn test_acquire_is_idempotent() {
        let mut cache = TileCache::new(4, 8, 16).unwrap();
        let mut rasterizer = CountingRasterizer::new();
        let cell = glyph('A' as i32);

        let first = cache.acquire(&cell, "A", &mut rasterizer).unwrap();
        let second = cache.acquire(&cell, "A", &mut rasterizer).unwrap();

        assert_eq!(first, second);
        assert_eq!(rasterizer.invocations, 1);
        assert_eq!(cache.rasterization_count(), 1);
    }

    #[test]
    fn test_distinct_cells_receive_distinct_slots() {
        let mut cache = TileCache::new(4, 8, 16).unwrap();
        let mut rasterizer = CountingRasterizer::new();

        let mut addresses = Vec::new();
        for cp in 'a'..='z' {
            let cell = glyph(cp as i32);
            let text = cp.to_string();
            addresses.push(cache.acquire(&cell, &text, &mut rasterizer).unwrap());
        }

        for (i, a) in addresses.iter().enumerate() {
            for b in &addresses[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(rasterizer.invocations, 26);
    }

    #[test]
    fn test_rasterizer_paints_the_resolved_slot() {
        let mut cache = TileCache::new(4, 8, 16).unwrap();
        let mut rasterizer = CountingRasterizer::new();
        let cell = glyph('Z' as i32);

        let address = cache.acquire(&cell, "Z", &mut rasterizer).unwrap();
        let image = cache.image(address.image).unwrap();

        assert_eq!(
            image.pixel(address.x_pixels, address.y_pixels),
            Some(Color::new(10, 20, 30))
        );
        assert_eq!(
            image.pixel(address.x_pixels + 7, address.y_pixels + 15),
            Some(Color::new(10, 20, 30))
        );
    }

    #[test]
    fn test_identical_area_costs_one_rasterization() {
        // A 3x3 region of identical cells resolves through a single
        // tile regardless of the region's volume.
        let mut cache = TileCache::new(4, 8, 16).unwrap();
        let mut rasterizer = CountingRasterizer::new();
        let cell = glyph('#' as i32);

        let mut addresses = Vec::new();
        for _ in 0..9 {
            addresses.push(cache.acquire(&cell, "#", &mut rasterizer).unwrap());
        }

        assert_eq!(rasterizer.invocations, 1);
        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_exhaustion_evicts_without_panicking() {
        // Confinement 2: 8 physical slots, 2 buckets, growth step 2.
        let mut cache = TileCache::new(2, 4, 4).unwrap();
        let mut rasterizer = CountingRasterizer::new();

        for cp in 0..200 {
            let cell = glyph(cp + 0x100);
            cache.acquire(&cell, "x", &mut rasterizer).unwrap();
        }

        assert!(cache.slots_bound() <= 8);
        assert!(cache.len() <= 8 + 1);
        assert_eq!(rasterizer.invocations, 200);
    }

    #[test]
    fn test_evicted_cell_is_rerasterized() {
        let mut cache = TileCache::new(2, 4, 4).unwrap();
        let mut rasterizer = CountingRasterizer::new();
        let witness = glyph(0x41);

        cache.acquire(&witness, "A", &mut rasterizer).unwrap();
        for cp in 0..100 {
            cache
                .acquire(&glyph(cp + 0x1000), "y", &mut rasterizer)
                .unwrap();
        }

        let before = rasterizer.invocations;
        cache.acquire(&witness, "A", &mut rasterizer).unwrap();
        // Either still resident (no extra invocation) or evicted and
        // rasterized exactly once more.
        assert!(rasterizer.invocations - before <= 1);
    }

    #[test]
    fn test_hot_record_is_promoted() {
        let mut cache = TileCache::new(4, 8, 16).unwrap();
        let mut rasterizer = CountingRasterizer::new();

        // Several residents in the same bucket order ahead of the
        // late-coming hot cell.
        let mut bucket_mates: Vec<Cell> = Vec::new();
        let mut probe = 0x2000;
        let hot = glyph(0x6666);
        let hot_bucket = cache.bucket_index(&hot);
        while bucket_mates.len() < 3 {
            let candidate = glyph(probe);
            if cache.bucket_index(&candidate) == hot_bucket {
                bucket_mates.push(candidate);
                cache.acquire(&candidate, "m", &mut rasterizer).unwrap();
            }
            probe += 1;
        }

        cache.acquire(&hot, "h", &mut rasterizer).unwrap();
        let initial_index = cache.buckets[hot_bucket]
            .records
            .iter()
            .take(cache.buckets[hot_bucket].count)
            .position(|r| r.key == hot)
            .unwrap();
        assert_eq!(initial_index, 3);

        for _ in 0..400 {
            cache.acquire(&hot, "h", &mut rasterizer).unwrap();
        }

        let final_index = cache.buckets[hot_bucket]
            .records
            .iter()
            .take(cache.buckets[hot_bucket].count)
            .position(|r| r.key == hot)
            .unwrap();
        assert!(final_index < initial_index);
        assert_eq!(cache.rasterization_count(), 4);
    }

    #[test]
    fn test_slot_coordinates_are_dense_and_fixed() {
        let confinement = 3;
        let mut seen = std::collections::HashSet::new();

        for slot in 0..confinement * confinement * confinement {
            let (image, line, cell) = slot_coordinates(slot, confinement);
            assert!((image as usize) < confinement);
            assert!((line as usize) < confinement);
            assert!((cell as usize) < confinement);
            assert!(seen.insert((image, line, cell)));
        }
    }

    #[test]
    fn test_zero_confinement_is_rejected() {
        assert!(matches!(
            TileCache::new(0, 8, 16),
            Err(Error::InvalidInput(_))
        ));
    }
}
