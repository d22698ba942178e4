/// Error categories for the core display engine.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed or wrong-type argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A screen's cell buffer is smaller than its dimensions require.
    #[error("Insufficient buffer: {0}")]
    InsufficientBuffer(String),

    /// Failure to allocate a replication temporary or cache structures.
    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    /// Invalid device capability table at construction.
    #[error("Unsupported interface: {0}")]
    UnsupportedInterface(String),
}

impl Error {
    // Input errors
    pub(crate) fn partial_cell_payload(remainder: usize) -> Self {
        Self::InvalidInput(format!(
            "rewrite payload is not a whole number of cells; {remainder} trailing bytes"
        ))
    }

    pub(crate) fn snapshot_length(expected: usize, actual: usize) -> Self {
        Self::InvalidInput(format!(
            "controller snapshot requires exactly {expected} bytes, received {actual}"
        ))
    }

    // Buffer errors
    pub(crate) fn screen_buffer_too_small(len: usize, lines: u16, span: u16) -> Self {
        Self::InsufficientBuffer(format!(
            "screen of {lines}x{span} cells requires {} cells, buffer holds {len}",
            lines as u32 * span as u32
        ))
    }

    // Allocation errors
    pub(crate) fn replication_buffer(cells: usize) -> Self {
        Self::OutOfMemory(format!(
            "failed to allocate replication buffer of {cells} cells"
        ))
    }

    pub(crate) fn surface_allocation(width: u32, height: u32) -> Self {
        Self::OutOfMemory(format!(
            "failed to allocate a {width}x{height} surface"
        ))
    }

    pub(crate) fn cell_image_allocation(cells: u32) -> Self {
        Self::OutOfMemory(format!("failed to allocate a cell image of {cells} cells"))
    }

    // Interface errors
    pub(crate) fn inconsistent_device(detail: &str) -> Self {
        Self::UnsupportedInterface(format!("device capability table is inconsistent: {detail}"))
    }
}

impl From<cellmatrix_data::Error> for Error {
    fn from(err: cellmatrix_data::Error) -> Self {
        match err {
            cellmatrix_data::Error::InvalidInput(msg) => Error::InvalidInput(msg),
        }
    }
}
