use cellmatrix_data::GlyphInscriptionParameters;
use serde::{Deserialize, Serialize};

/// Environment variable naming the font, e.g. `TERMINAL_FONT="Iosevka 18"`.
pub const FONT_ENVIRONMENT_VARIABLE: &str = "TERMINAL_FONT";

const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Font selection and cell-shaping configuration.
///
/// Loadable from JSON; [`RasterConfig::from_env`] honors the
/// `TERMINAL_FONT` variable the way the reference backends do, falling
/// back to a monospace default when it is missing or malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Font family name; `None` selects the system monospace face.
    pub font_family: Option<String>,
    /// Font size in pixels.
    pub font_size: f32,
    /// Stroke width adjustment passed through to inscription.
    pub stroke_width: f32,
    pub horizontal_pad: f64,
    pub vertical_pad: f64,
    pub horizontal_offset: f64,
    pub vertical_offset: f64,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: DEFAULT_FONT_SIZE,
            stroke_width: 1.0,
            horizontal_pad: 0.0,
            vertical_pad: 0.0,
            horizontal_offset: 0.0,
            vertical_offset: 0.0,
        }
    }
}

impl RasterConfig {
    /// Reads the font selection from `TERMINAL_FONT`.
    ///
    /// The accepted form is a family name optionally followed by a
    /// size, `"Family Name 18"`. A missing or zero size falls back to
    /// the default.
    pub fn from_env() -> Self {
        match std::env::var(FONT_ENVIRONMENT_VARIABLE) {
            Ok(spec) => Self::parse_font_spec(&spec),
            Err(_) => Self::default(),
        }
    }

    fn parse_font_spec(spec: &str) -> Self {
        let mut config = Self::default();
        let spec = spec.trim();
        if spec.is_empty() {
            return config;
        }

        match spec.rsplit_once(' ') {
            Some((family, size)) => match size.parse::<f32>() {
                Ok(size) if size > 0.001 => {
                    config.font_family = Some(family.trim().to_owned());
                    config.font_size = size;
                },
                _ => {
                    config.font_family = Some(spec.to_owned());
                },
            },
            None => {
                config.font_family = Some(spec.to_owned());
            },
        }

        config
    }

    /// Cell shape implied by the font size.
    ///
    /// The height gives a fifth or so of leading over the em size and
    /// the width is half the padded height, matching the reference
    /// cell estimation.
    pub fn inscription(&self) -> GlyphInscriptionParameters {
        let padded_height = self.font_size as f64 + (self.font_size as f64 / 5.15);

        GlyphInscriptionParameters {
            stroke_width: self.stroke_width,
            cell_width: (padded_height / 2.0).ceil(),
            cell_height: padded_height.ceil(),
            horizontal_pad: self.horizontal_pad,
            vertical_pad: self.vertical_pad,
            horizontal_offset: self.horizontal_offset,
            vertical_offset: self.vertical_offset,
        }
    }
}
