/// Error categories for glyph rasterization.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No usable font could be located.
    #[error("Font unavailable: {0}")]
    FontUnavailable(String),

    /// A located face could not be loaded or parsed.
    #[error("Face loading error: {0}")]
    FaceLoading(String),
}

impl Error {
    pub(crate) fn no_matching_font(family: &str) -> Self {
        Self::FontUnavailable(format!("no face matches '{family}' or any monospace fallback"))
    }

    pub(crate) fn face_data_unreadable(family: &str) -> Self {
        Self::FaceLoading(format!("face data for '{family}' could not be read"))
    }

    pub(crate) fn face_unparsable(family: &str) -> Self {
        Self::FaceLoading(format!("face data for '{family}' is not a parsable font"))
    }
}
