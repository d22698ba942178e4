use cellmatrix_data::{Cell, CellArea, MatrixParameters};

use crate::{controller::ControllerStatus, error::Error};

/// The capability table bridging a hosted terminal application and a
/// display backend.
///
/// All operations are totally ordered by the application; there is no
/// reordering between invalidation and rendering. The only operation
/// permitted to block is [`Device::transfer_event`]. A disconnected
/// backend is surfaced as a synthetic `session/close` event, never as
/// an error.
///
/// For a single frame the device moves through
/// `IDLE -> DIRTY -> RENDERED -> PRESENTED -> IDLE`: invalidations
/// dirty the frame, `render_image` resolves them, `dispatch_image`
/// presents and returns to idle. Rendering an idle frame is a no-op;
/// dispatching an idle frame is a no-op that still flushes.
pub trait Device {
    /// Blocks for the next controller event, updates the shared status
    /// record, and returns an opaque quantity code.
    fn transfer_event(&mut self) -> u16;

    /// Borrowed UTF-8 insertion text of the current event, valid until
    /// the next `transfer_event`.
    fn transfer_text(&self) -> Option<&str>;

    /// Sends bytes back to the backend through the receiver channel.
    fn transmit(&mut self, data: &[u8]) {
        if let Some(receiver) = &mut self.status_mut().receiver {
            receiver(data);
        }
    }

    /// Interns a multi-codepoint expression, returning a negative
    /// identifier; a single-scalar string returns the scalar itself.
    fn define(&mut self, expression: &str) -> i32;

    /// Registers an external resource for use as a cell codepoint with
    /// an image-tile window. Reserved in several backends; always
    /// returns a registered negative identifier.
    fn integrate(&mut self, reference: &str, length: u32, lines: u16, span: u16) -> i32;

    /// Records a displayed-region copy; pairs with a screen replicate
    /// over the same areas.
    fn replicate_cells(&mut self, destination: CellArea, source: CellArea)
    -> Result<(), Error>;

    /// Appends `area` to the pending-invalidation list.
    fn invalidate_cells(&mut self, area: CellArea);

    /// Rasterizes pending invalidations into the working buffer.
    fn render_image(&mut self) -> Result<(), Error>;

    /// Presents the working buffer.
    fn dispatch_image(&mut self);

    /// Flushes backend-side I/O.
    fn synchronize(&mut self);

    /// Queues a `session/synchronize` instruction as an event.
    fn synchronize_io(&mut self);

    /// Reallocates the cell buffer for the new dimensions and resets
    /// the view to cover it.
    fn resize_screen(&mut self, lines: u16, span: u16) -> Result<(), Error>;

    /// Optional backend chrome update; ignored when unsupported.
    fn update_frame_status(&mut self, _current: u16, _last: u16) {}

    /// Optional backend chrome update; ignored when unsupported.
    fn update_frame_list(&mut self, _titles: &[&str]) {}

    /// Cursor position in cells relative to `area`, clamped to it.
    fn controls_translate_cursor(&self, area: CellArea) -> (u16, u16) {
        let (line, offset) = self.status().cursor_cell_status(self.parameters());

        (
            line.saturating_sub(area.top_offset)
                .min(area.lines.saturating_sub(1)),
            offset
                .saturating_sub(area.left_offset)
                .min(area.span.saturating_sub(1)),
        )
    }

    /// The device's parameters adjusted to cover `area`.
    fn matrix_snapshot(&self, area: CellArea) -> MatrixParameters {
        self.parameters().for_area(area)
    }

    /// Serializes the controller status into an opaque blob, clearing
    /// the receiver callback.
    fn controls_snapshot(&mut self, dispatch_override: Option<i32>) -> Vec<u8> {
        self.status_mut().snapshot(dispatch_override)
    }

    /// Restores a controller status captured by `controls_snapshot`.
    /// The receiver field is always null after restore.
    fn integrate_controls(&mut self, snapshot: &[u8]) -> Result<(), Error> {
        *self.status_mut() = ControllerStatus::restore(snapshot)?;
        Ok(())
    }

    /// The screen's dimensions and working offset.
    fn view(&self) -> CellArea;

    /// The parameters the device's screen was initialized with.
    fn parameters(&self) -> &MatrixParameters;

    /// The shared controller status record.
    fn status(&self) -> &ControllerStatus;

    fn status_mut(&mut self) -> &mut ControllerStatus;

    /// The allocation of cells representing the display's state.
    fn cells(&self) -> &[Cell];

    fn cells_mut(&mut self) -> &mut [Cell];
}
