use std::io::{Read, Write};

use cellmatrix_core::{
    ApplicationInstruction, ControllerStatus, Device, Dispatch, Error, RESIZE_DISPATCH, Registry,
};
use cellmatrix_data::{Cell, CellArea, MatrixParameters, cells};

use crate::wire::{SYNCHRONIZE_SIGNAL, ZERO_AREA, read_status, write_area};

/// A device mirroring its screen over paired byte streams.
///
/// Events arrive on the controls stream; invalidated cells, replication
/// pairs, and dispatch signals leave on the display stream. The far
/// side rasterizes. A failed or exhausted stream is never an error:
/// reads synthesize `session/close` and writes fall silent.
pub struct MirrorDevice<R: Read, W: Write> {
    controls: R,
    display: W,
    connected: bool,

    status: ControllerStatus,
    payload: Vec<u8>,

    parameters: MatrixParameters,
    view: CellArea,
    image: Vec<Cell>,
    registry: Registry,

    invalids: Vec<CellArea>,
    transmitted: usize,
}

impl<R: Read, W: Write> std::fmt::Debug for MirrorDevice<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorDevice")
            .field("view", &self.view)
            .field("connected", &self.connected)
            .field("pending", &(self.invalids.len() - self.transmitted))
            .finish()
    }
}

fn allocate_image(volume: u32) -> Result<Vec<Cell>, Error> {
    let mut image = Vec::new();
    image
        .try_reserve_exact(volume as usize)
        .map_err(|_| Error::OutOfMemory(format!("cell image of {volume} cells")))?;
    image.resize(volume as usize, Cell::EMPTY);
    Ok(image)
}

impl<R: Read, W: Write> MirrorDevice<R, W> {
    /// Creates a device over the paired streams.
    ///
    /// The screen has no dimensions until the first `screen/resize`
    /// event arrives on the controls stream.
    pub fn new(controls: R, display: W) -> Self {
        Self {
            controls,
            display,
            connected: true,
            status: ControllerStatus::default(),
            payload: Vec::new(),
            parameters: MatrixParameters::default(),
            view: ZERO_AREA,
            image: Vec::new(),
            registry: Registry::new(),
            invalids: Vec::new(),
            transmitted: 0,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn send(&mut self, write: impl FnOnce(&mut W) -> std::io::Result<()>) {
        if !self.connected {
            return;
        }
        if let Err(error) = write(&mut self.display) {
            tracing::warn!(%error, "display stream failed; muting further transmission");
            self.connected = false;
        }
    }

    fn integrate_resize(&mut self) -> Result<(), Error> {
        match MatrixParameters::from_bytes(&self.payload) {
            Ok(parameters) => {
                self.parameters = parameters;
                self.view = CellArea::new(0, 0, parameters.y_cells, parameters.x_cells);
                self.image = allocate_image(parameters.v_cells)?;
                tracing::info!(
                    lines = parameters.y_cells,
                    span = parameters.x_cells,
                    "mirror screen dimensions announced"
                );
                Ok(())
            },
            Err(error) => {
                tracing::warn!(%error, "malformed resize payload; dimensions unchanged");
                Ok(())
            },
        }
    }

    fn synthesize_close(&mut self) {
        self.status.dispatch =
            Dispatch::Instruction(ApplicationInstruction::SessionClose).encode();
        self.status.text_length = 0;
        self.status.quantity = 1;
        self.payload.clear();
    }

    /// Transmits the invalidations accumulated since the last call.
    fn transmit_invalids(&mut self) {
        let stride = self.view.span as usize;

        for i in self.transmitted..self.invalids.len() {
            let area = self.invalids[i];
            if area.is_empty() {
                continue;
            }

            let mut frame = Vec::with_capacity(
                2 * CellArea::SIZE + area.volume() as usize * Cell::SIZE,
            );
            let _ = write_area(&mut frame, area);
            let _ = write_area(&mut frame, ZERO_AREA);
            for (_, _, cell) in cells(&self.image, stride, area) {
                frame.extend_from_slice(&cell.to_bytes());
            }

            self.send(move |display| display.write_all(&frame));
        }

        self.transmitted = self.invalids.len();
    }
}

impl<R: Read, W: Write> Device for MirrorDevice<R, W> {
    fn transfer_event(&mut self) -> u16 {
        match read_status(&mut self.controls) {
            Some((status, payload)) => {
                self.status = status;
                self.status.text_length = payload.len();
                self.payload = payload;

                if self.status.dispatch == RESIZE_DISPATCH {
                    if let Err(error) = self.integrate_resize() {
                        tracing::error!(%error, "resize integration failed");
                    }
                }
            },
            None => {
                tracing::debug!("controls stream exhausted; synthesizing session/close");
                self.synthesize_close();
            },
        }

        1
    }

    fn transfer_text(&self) -> Option<&str> {
        if self.status.text_length > 0 {
            std::str::from_utf8(&self.payload).ok()
        } else {
            None
        }
    }

    fn define(&mut self, expression: &str) -> i32 {
        self.registry.define(expression)
    }

    fn integrate(&mut self, reference: &str, length: u32, lines: u16, span: u16) -> i32 {
        self.registry.integrate(reference, length, lines, span)
    }

    fn replicate_cells(&mut self, destination: CellArea, source: CellArea)
    -> Result<(), Error> {
        // The far side copies displayed pixels; pending invalidations
        // flush first so the source region is current.
        self.transmit_invalids();

        self.send(move |display| {
            write_area(display, destination)?;
            write_area(display, source)
        });
        Ok(())
    }

    fn invalidate_cells(&mut self, area: CellArea) {
        self.invalids.push(area);
    }

    fn render_image(&mut self) -> Result<(), Error> {
        self.transmit_invalids();
        Ok(())
    }

    fn dispatch_image(&mut self) {
        self.transmit_invalids();

        self.send(|display| {
            write_area(display, ZERO_AREA)?;
            write_area(display, ZERO_AREA)
        });

        self.invalids.drain(..self.transmitted);
        self.transmitted = 0;
    }

    fn synchronize(&mut self) {
        self.send(|display| display.flush());
    }

    fn synchronize_io(&mut self) {
        let sync = CellArea { span: SYNCHRONIZE_SIGNAL, ..ZERO_AREA };
        self.send(move |display| {
            write_area(display, ZERO_AREA)?;
            write_area(display, sync)
        });
    }

    fn resize_screen(&mut self, lines: u16, span: u16) -> Result<(), Error> {
        self.parameters = self.parameters.for_area(CellArea::new(0, 0, lines, span));
        self.view = CellArea::new(0, 0, lines, span);
        self.image = allocate_image(self.parameters.v_cells)?;
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

#[cfg(test)]
mod tests {
    use cellmatrix_core::KeyModifiers;

    use super::*;
    use crate::wire::write_status;

    fn resize_event(lines: u16, span: u16) -> Vec<u8> {
        let mut parameters = MatrixParameters {
            scale_factor: 1.0,
            x_cell_units: 4.0,
            y_cell_units: 8.0,
            v_cell_units: 32.0,
            ..Default::default()
        };
        parameters = parameters.for_area(CellArea::new(0, 0, lines, span));

        let mut wire = Vec::new();
        let status = ControllerStatus {
            dispatch: RESIZE_DISPATCH,
            quantity: 1,
            ..Default::default()
        };
        write_status(&mut wire, &status, &parameters.to_bytes()).unwrap();
        wire
    }

    #[test]
    fn test_resize_event_allocates_the_screen() {
        let controls = resize_event(3, 5);
        let mut device = MirrorDevice::new(controls.as_slice(), Vec::new());

        assert_eq!(device.transfer_event(), 1);
        assert_eq!(device.view(), CellArea::new(0, 0, 3, 5));
        assert_eq!(device.cells().len(), 15);
        assert_eq!(
            device.status().decode(),
            Dispatch::Instruction(ApplicationInstruction::ScreenResize)
        );
    }

    #[test]
    fn test_eof_synthesizes_session_close() {
        let mut device = MirrorDevice::new(std::io::empty(), Vec::new());

        device.transfer_event();

        assert_eq!(
            device.status().decode(),
            Dispatch::Instruction(ApplicationInstruction::SessionClose)
        );
        assert_eq!(device.status().quantity, 1);
        assert_eq!(device.status().text_length, 0);
        assert_eq!(device.transfer_text(), None);
    }

    #[test]
    fn test_text_event_transfer() {
        let mut wire = Vec::new();
        let status = ControllerStatus {
            dispatch: 'a' as i32,
            quantity: 1,
            keys: KeyModifiers::SHIFT,
            ..Default::default()
        };
        write_status(&mut wire, &status, "abc".as_bytes()).unwrap();

        let mut device = MirrorDevice::new(wire.as_slice(), Vec::new());
        device.transfer_event();

        assert_eq!(device.status().dispatch, 'a' as i32);
        assert_eq!(device.status().keys, KeyModifiers::SHIFT);
        assert_eq!(device.transfer_text(), Some("abc"));
    }

    #[test]
    fn test_write_failure_mutes_transmission() {
        struct FailingWriter;
        impl Write for FailingWriter {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("gone"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut device = MirrorDevice::new(std::io::empty(), FailingWriter);
        device.resize_screen(1, 1).unwrap();
        device.invalidate_cells(CellArea::new(0, 0, 1, 1));

        device.dispatch_image();
        assert!(!device.is_connected());

        // Subsequent operations stay quiet rather than erroring.
        device.invalidate_cells(CellArea::new(0, 0, 1, 1));
        device.render_image().unwrap();
        device.synchronize_io();
    }
}
