/// Error categories for the data structures.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed or wrong-type argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub(crate) fn area_byte_length(actual: usize) -> Self {
        Self::InvalidInput(format!(
            "area requires exactly 8 bytes, received {actual}"
        ))
    }

    pub(crate) fn cell_byte_length(actual: usize) -> Self {
        Self::InvalidInput(format!(
            "cell requires exactly {} bytes, received {actual}",
            crate::Cell::SIZE
        ))
    }

    pub(crate) fn matrix_byte_length(actual: usize) -> Self {
        Self::InvalidInput(format!(
            "matrix parameters require exactly {} bytes, received {actual}",
            crate::MatrixParameters::SIZE
        ))
    }
}
