use cellmatrix_data::{
    Cell, CellArea, GlyphInscriptionParameters, MatrixParameters,
};
use compact_str::CompactString;
use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::{
    controller::{ApplicationInstruction, ControllerStatus, Dispatch, KeyModifiers},
    device::Device,
    error::Error,
    registry::Registry,
    render::{FramePhase, Renderer},
    tiles::{Rasterize, TileCache},
};

/// A controller event as produced by a backend.
#[derive(Debug, Clone, Default)]
pub struct ControlEvent {
    pub dispatch: i32,
    pub quantity: i32,
    pub keys: KeyModifiers,
    pub top: i32,
    pub left: i32,
    pub text: CompactString,
}

impl ControlEvent {
    /// An application-instruction event carrying no insertion text.
    pub fn instruction(instruction: ApplicationInstruction, quantity: i32) -> Self {
        Self {
            dispatch: Dispatch::Instruction(instruction).encode(),
            quantity,
            ..Default::default()
        }
    }
}

/// Cloneable handle a backend thread uses to feed events to a
/// [`MatrixDevice`].
#[derive(Debug, Clone)]
pub struct MatrixHandle {
    events: Sender<ControlEvent>,
}

impl MatrixHandle {
    /// Queues an event; returns false once the device is gone.
    pub fn submit(&self, event: ControlEvent) -> bool {
        self.events.send(event).is_ok()
    }
}

/// The in-process software device.
///
/// Owns the cell image, tile cache, invalidation list, and the working
/// and output surfaces. Events arrive over a channel fed by the
/// backend ([`MatrixDevice::handle`]); everything else runs on the
/// application thread.
pub struct MatrixDevice {
    parameters: MatrixParameters,
    inscription: GlyphInscriptionParameters,
    view: CellArea,
    image: Vec<Cell>,
    status: ControllerStatus,
    text: String,

    events: Receiver<ControlEvent>,
    backend: Sender<ControlEvent>,

    registry: Registry,
    cache: TileCache,
    renderer: Renderer,
    rasterizer: Box<dyn Rasterize>,
}

impl std::fmt::Debug for MatrixDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatrixDevice")
            .field("parameters", &self.parameters)
            .field("view", &self.view)
            .field("phase", &self.renderer.phase())
            .field("cached_tiles", &self.cache.len())
            .finish()
    }
}

impl MatrixDevice {
    /// Creates a device for a surface of the given size in system
    /// units, deriving the cell matrix from `inscription`.
    pub fn new(
        inscription: GlyphInscriptionParameters,
        scale_factor: f64,
        screen_width: f64,
        screen_height: f64,
        confinement: usize,
        rasterizer: Box<dyn Rasterize>,
    ) -> Result<Self, Error> {
        let mut parameters = MatrixParameters::default();
        parameters.configure_cells(&inscription, scale_factor);
        parameters.calculate_dimensions(screen_width, screen_height);

        let view = CellArea::new(0, 0, parameters.y_cells, parameters.x_cells);
        let image = allocate_image(parameters.v_cells)?;

        let (cell_width, cell_height) = parameters.cell_pixel_size();
        let (surface_width, surface_height) = parameters.screen_pixel_size();
        let (backend, events) = unbounded();

        tracing::info!(
            lines = parameters.y_cells,
            span = parameters.x_cells,
            cell_width,
            cell_height,
            "matrix device initialized"
        );

        Ok(Self {
            parameters,
            inscription,
            view,
            image,
            status: ControllerStatus::default(),
            text: String::new(),
            events,
            backend,
            registry: Registry::new(),
            cache: TileCache::new(confinement, cell_width, cell_height)?,
            renderer: Renderer::new(cell_width, cell_height, surface_width, surface_height)?,
            rasterizer,
        })
    }

    /// A handle for the backend thread feeding controller events.
    pub fn handle(&self) -> MatrixHandle {
        MatrixHandle { events: self.backend.clone() }
    }

    pub fn inscription(&self) -> &GlyphInscriptionParameters {
        &self.inscription
    }

    pub fn phase(&self) -> FramePhase {
        self.renderer.phase()
    }

    /// Rasterizer invocations so far; one per distinct resident cell
    /// value.
    pub fn rasterization_count(&self) -> u64 {
        self.cache.rasterization_count()
    }

    /// The most recently presented pixels.
    pub fn output(&self) -> &crate::surface::Surface {
        self.renderer.output()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    fn integrate_event(&mut self, event: ControlEvent) {
        self.text.clear();
        self.text.push_str(&event.text);

        self.status.dispatch = event.dispatch;
        self.status.quantity = event.quantity;
        self.status.keys = event.keys;
        self.status.top = event.top;
        self.status.left = event.left;
        self.status.text_length = self.text.len();
    }
}

fn allocate_image(cells: u32) -> Result<Vec<Cell>, Error> {
    let mut image = Vec::new();
    image
        .try_reserve_exact(cells as usize)
        .map_err(|_| Error::cell_image_allocation(cells))?;
    image.resize(cells as usize, Cell::EMPTY);
    Ok(image)
}

impl Device for MatrixDevice {
    fn transfer_event(&mut self) -> u16 {
        match self.events.recv() {
            Ok(event) => {
                self.integrate_event(event);
                1
            },
            Err(_) => {
                // Backend gone; surface as a synthetic close, never an
                // error.
                tracing::debug!("backend disconnected; synthesizing session/close");
                self.integrate_event(ControlEvent::instruction(
                    ApplicationInstruction::SessionClose,
                    1,
                ));
                1
            },
        }
    }

    fn transfer_text(&self) -> Option<&str> {
        if self.status.text_length > 0 {
            Some(&self.text)
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
        self.renderer.replicate(
            destination,
            source,
            self.view,
            &self.image,
            &mut self.cache,
            &self.registry,
            self.rasterizer.as_mut(),
        )
    }

    fn invalidate_cells(&mut self, area: CellArea) {
        self.renderer.invalidate(area);
    }

    fn render_image(&mut self) -> Result<(), Error> {
        self.renderer.render(
            self.view,
            &self.image,
            &mut self.cache,
            &self.registry,
            self.rasterizer.as_mut(),
        )
    }

    fn dispatch_image(&mut self) {
        self.renderer.dispatch();
    }

    fn synchronize(&mut self) {
        tracing::trace!("synchronize");
    }

    fn synchronize_io(&mut self) {
        let _ = self.backend.send(ControlEvent::instruction(
            ApplicationInstruction::SessionSynchronize,
            1,
        ));
    }

    fn resize_screen(&mut self, lines: u16, span: u16) -> Result<(), Error> {
        self.parameters = self
            .parameters
            .for_area(CellArea::new(0, 0, lines, span));
        self.view = CellArea::new(0, 0, lines, span);
        self.image = allocate_image(self.parameters.v_cells)?;

        let (surface_width, surface_height) = self.parameters.screen_pixel_size();
        self.renderer.resize(surface_width, surface_height)?;

        tracing::info!(lines, span, "screen resized");
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
