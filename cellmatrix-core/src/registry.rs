use compact_str::{CompactString, ToCompactString};
use rustc_hash::FxHashMap;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::surface::Surface;

/// Identifiers below this value name interned codepoint expressions.
pub const EXPRESSION_FLOOR: i32 = -0x10000;
/// Identifiers below this value name integrated image resources.
pub const IMAGE_FLOOR: i32 = -0x800000;

/// Checks if a grapheme is an emoji-presentation-by-default character.
///
/// Text-presentation-by-default characters are recognized by the
/// `emojis` crate but should only be treated as emoji when explicitly
/// followed by the variation selector `\u{FE0F}`. Without it, they are
/// regular text glyphs.
pub fn is_emoji(s: &str) -> bool {
    match emojis::get(s) {
        Some(emoji) => {
            if emoji.as_str().contains('\u{FE0F}') { s.contains('\u{FE0F}') } else { true }
        },
        None => false,
    }
}

/// Checks if a grapheme is double-width (emoji or fullwidth character).
pub fn is_double_width(grapheme: &str) -> bool {
    grapheme.len() > 1 && (is_emoji(grapheme) || grapheme.width() == 2)
}

/// An integrated external resource addressable as pixel tiles.
#[derive(Debug)]
pub struct ImageResource {
    /// External reference naming the resource.
    pub reference: CompactString,
    /// Declared byte length of the referenced resource.
    pub length: u32,
    /// Rows of tiles the resource covers.
    pub lines: u16,
    /// Columns of tiles the resource covers.
    pub span: u16,
    /// Decoded pixels, once the backend supplies them.
    pub pixels: Option<Surface>,
}

/// Identifier registry for codepoint expressions and image resources.
///
/// Both maps are injective and identifiers are drawn from monotonically
/// decreasing sequences below their configured floors, disjoint from
/// the function, cursor, and instruction dispatch ranges. Once
/// assigned, an identifier is stable for the lifetime of the device.
#[derive(Debug, Default)]
pub struct Registry {
    expression_by_string: FxHashMap<CompactString, i32>,
    expression_by_id: FxHashMap<i32, CompactString>,
    expressions_assigned: i32,

    image_by_key: FxHashMap<(CompactString, u16, u16), i32>,
    image_by_id: FxHashMap<i32, ImageResource>,
    images_assigned: i32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a multi-codepoint expression and returns its negative
    /// identifier. A single-scalar string returns the scalar itself,
    /// without registration.
    pub fn define(&mut self, expression: &str) -> i32 {
        let mut scalars = expression.chars();
        if let (Some(c), None) = (scalars.next(), scalars.next()) {
            return c as i32;
        }

        if let Some(&id) = self.expression_by_string.get(expression) {
            return id;
        }

        self.expressions_assigned += 1;
        let id = EXPRESSION_FLOOR - self.expressions_assigned;
        self.expression_by_string
            .insert(expression.to_compact_string(), id);
        self.expression_by_id
            .insert(id, expression.to_compact_string());

        tracing::debug!(id, expression, "interned codepoint expression");
        id
    }

    /// The expression interned under `id`.
    pub fn expression(&self, id: i32) -> Option<&str> {
        self.expression_by_id.get(&id).map(CompactString::as_str)
    }

    /// Cells spanned by an interned expression's first grapheme.
    pub fn expression_span(&self, id: i32) -> u16 {
        match self.expression(id) {
            Some(expr) => match expr.graphemes(true).next() {
                Some(g) if is_double_width(g) => 2,
                Some(g) => g.width().max(1) as u16,
                None => 1,
            },
            None => 1,
        }
    }

    /// Registers an external resource and returns its negative
    /// identifier, stable across repeated registration of the same
    /// `(reference, lines, span)` triple.
    pub fn integrate(&mut self, reference: &str, length: u32, lines: u16, span: u16) -> i32 {
        let key = (reference.to_compact_string(), lines, span);
        if let Some(&id) = self.image_by_key.get(&key) {
            return id;
        }

        self.images_assigned += 1;
        let id = IMAGE_FLOOR - self.images_assigned;
        self.image_by_key.insert(key, id);
        self.image_by_id.insert(id, ImageResource {
            reference: reference.to_compact_string(),
            length,
            lines,
            span,
            pixels: None,
        });

        tracing::debug!(id, reference, lines, span, "integrated image resource");
        id
    }

    pub fn image(&self, id: i32) -> Option<&ImageResource> {
        self.image_by_id.get(&id)
    }

    /// Supplies decoded pixels for an integrated resource.
    pub fn attach_pixels(&mut self, id: i32, pixels: Surface) -> bool {
        match self.image_by_id.get_mut(&id) {
            Some(resource) => {
                resource.pixels = Some(pixels);
                true
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_scalar_returns_codepoint() {
        let mut registry = Registry::new();
        assert_eq!(registry.define("A"), 'A' as i32);
        assert_eq!(registry.define("\u{1F680}"), 0x1F680);
        assert!(registry.expression('A' as i32).is_none());
    }

    #[test]
    fn test_expression_ids_are_stable_and_decreasing() {
        let mut registry = Registry::new();

        let a = registry.define("e\u{301}");
        let b = registry.define("\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}");

        assert!(a < EXPRESSION_FLOOR);
        assert!(b < a);
        assert_eq!(registry.define("e\u{301}"), a);
        assert_eq!(registry.expression(a), Some("e\u{301}"));
    }

    #[test]
    fn test_expression_span() {
        let mut registry = Registry::new();

        let combining = registry.define("e\u{301}");
        assert_eq!(registry.expression_span(combining), 1);

        let zwj = registry.define("\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}");
        assert_eq!(registry.expression_span(zwj), 2);
    }

    #[test]
    fn test_image_integration_disjoint_from_expressions() {
        let mut registry = Registry::new();

        let expr = registry.define("e\u{301}");
        let img = registry.integrate("file://logo.png", 1024, 4, 8);

        assert!(img < IMAGE_FLOOR);
        assert_ne!(expr, img);
        assert_eq!(registry.integrate("file://logo.png", 1024, 4, 8), img);

        let resource = registry.image(img).unwrap();
        assert_eq!(resource.lines, 4);
        assert_eq!(resource.span, 8);
        assert!(resource.pixels.is_none());
    }

    #[test]
    fn test_attach_pixels() {
        let mut registry = Registry::new();
        let id = registry.integrate("mem://x", 16, 1, 1);

        assert!(registry.attach_pixels(id, Surface::new(8, 8).unwrap()));
        assert!(registry.image(id).unwrap().pixels.is_some());
        assert!(!registry.attach_pixels(-1, Surface::new(1, 1).unwrap()));
    }

    #[test]
    fn test_double_width_classification() {
        assert!(is_double_width("\u{1F600}"));
        assert!(is_double_width("\u{4E2D}\u{FE0F}") || is_double_width("\u{4E2D}"));
        assert!(!is_double_width("A"));
        assert!(!is_double_width("\u{25B6}"));
        assert!(is_double_width("\u{25B6}\u{FE0F}"));
    }
}
