use cellmatrix_data::CellArea;

use crate::{controller::KeyModifiers, device::Device, error::Error, screen::Screen};

/// The surface a hosted terminal application programs against.
///
/// Wraps a device behind the read-mostly API the application needs:
/// event polling, controller state queries, a screen over the shared
/// cell image, and the render/dispatch entry points. Connection
/// validates the capability table once so the application can rely on
/// the screen invariants afterwards.
#[derive(Debug)]
pub struct TerminalHost<D: Device> {
    device: D,
}

impl<D: Device> TerminalHost<D> {
    /// Connects to a device, validating its capability table.
    pub fn connect(device: D) -> Result<Self, Error> {
        let view = device.view();
        let parameters = device.parameters();

        if parameters.v_cells != parameters.x_cells as u32 * parameters.y_cells as u32 {
            return Err(Error::inconsistent_device("cell volume mismatch"));
        }
        if view.lines != parameters.y_cells || view.span != parameters.x_cells {
            return Err(Error::inconsistent_device("view does not cover the matrix"));
        }
        if (device.cells().len() as u32) < view.volume() {
            return Err(Error::inconsistent_device("cell image smaller than the view"));
        }

        Ok(Self { device })
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// A screen over the device's cell image.
    pub fn screen(&mut self) -> Result<Screen<'_>, Error> {
        let view = self.device.view();
        Screen::new(view, self.device.cells_mut())
    }

    /// Blocks for the next controller event.
    pub fn wait_event(&mut self) -> u16 {
        self.device.transfer_event()
    }

    pub fn quantity(&self) -> i32 {
        self.device.status().quantity
    }

    pub fn text_insertion(&self) -> Option<&str> {
        self.device.transfer_text()
    }

    pub fn key_status(&self) -> KeyModifiers {
        self.device.status().keys
    }

    /// Cursor position in pixels, `(top, left)`.
    pub fn cursor_status(&self) -> (i32, i32) {
        self.device.status().cursor_status()
    }

    /// Cursor position in whole cells, `(line, offset)`.
    pub fn cursor_cell_status(&self) -> (u16, u16) {
        self.device
            .status()
            .cursor_cell_status(self.device.parameters())
    }

    pub fn replicate_cells(&mut self, destination: CellArea, source: CellArea)
    -> Result<(), Error> {
        self.device.replicate_cells(destination, source)
    }

    pub fn invalidate_cells(&mut self, area: CellArea) {
        self.device.invalidate_cells(area);
    }

    /// Renders pending invalidations.
    pub fn render_delta(&mut self) -> Result<(), Error> {
        self.device.render_image()
    }

    pub fn dispatch_frame(&mut self) {
        self.device.dispatch_image();
    }

    pub fn synchronize(&mut self) {
        self.device.synchronize();
    }
}

#[cfg(test)]
mod tests {
    use cellmatrix_data::{Cell, CellArea, MatrixParameters};

    use super::*;
    use crate::controller::ControllerStatus;

    /// A minimal device with a deliberately corrupt capability table.
    struct BrokenDevice {
        parameters: MatrixParameters,
        view: CellArea,
        image: Vec<Cell>,
        status: ControllerStatus,
    }

    impl BrokenDevice {
        fn new() -> Self {
            Self {
                parameters: MatrixParameters {
                    x_cells: 4,
                    y_cells: 4,
                    v_cells: 17, // inconsistent on purpose
                    ..Default::default()
                },
                view: CellArea::new(0, 0, 4, 4),
                image: vec![Cell::EMPTY; 16],
                status: ControllerStatus::default(),
            }
        }
    }

    impl Device for BrokenDevice {
        fn transfer_event(&mut self) -> u16 {
            0
        }

        fn transfer_text(&self) -> Option<&str> {
            None
        }

        fn define(&mut self, _expression: &str) -> i32 {
            -1
        }

        fn integrate(&mut self, _reference: &str, _length: u32, _lines: u16, _span: u16) -> i32 {
            -1
        }

        fn replicate_cells(
            &mut self,
            _destination: CellArea,
            _source: CellArea,
        ) -> Result<(), Error> {
            Ok(())
        }

        fn invalidate_cells(&mut self, _area: CellArea) {}

        fn render_image(&mut self) -> Result<(), Error> {
            Ok(())
        }

        fn dispatch_image(&mut self) {}

        fn synchronize(&mut self) {}

        fn synchronize_io(&mut self) {}

        fn resize_screen(&mut self, _lines: u16, _span: u16) -> Result<(), Error> {
            Ok(())
        }

        fn view(&self) -> CellArea {
            self.view
        }

        fn parameters(&self) -> &MatrixParameters {
            &self.parameters
        }

        fn status(&self) -> &ControllerStatus {
            &self.status
        }

        fn status_mut(&mut self) -> &mut ControllerStatus {
            &mut self.status
        }

        fn cells(&self) -> &[Cell] {
            &self.image
        }

        fn cells_mut(&mut self) -> &mut [Cell] {
            &mut self.image
        }
    }

    #[test]
    fn test_connect_rejects_inconsistent_tables() {
        assert!(matches!(
            TerminalHost::connect(BrokenDevice::new()),
            Err(Error::UnsupportedInterface(_))
        ));
    }

    #[test]
    fn test_connect_accepts_consistent_tables() {
        let mut device = BrokenDevice::new();
        device.parameters.v_cells = 16;

        let mut host = TerminalHost::connect(device).unwrap();
        let screen = host.screen().unwrap();
        assert_eq!(screen.area(), CellArea::new(0, 0, 4, 4));
    }
}
