mod controller;
mod device;
mod error;
mod host;
mod matrix_device;
mod registry;
mod render;
mod screen;
mod surface;
mod tiles;

pub use cellmatrix_data::{
    Cell, CellArea, CellContent, CellTraits, Color, GlyphInscriptionParameters, GlyphStyle,
    IMAGE_TILE, LinePattern, MatrixParameters, PixelRect, PixelTile,
};
pub use controller::{
    ApplicationInstruction, ControllerStatus, DeviceReceiver, Dispatch, FUNCTION_KEY_COUNT,
    FUNCTION_KEY_OFFSET, INSTRUCTION_KEY_OFFSET, KeyIdentifier, KeyModifiers, RESIZE_DISPATCH,
    SCREEN_CURSOR_KEY_COUNT, SCREEN_CURSOR_KEY_OFFSET, SYNCHRONIZE_DISPATCH,
};
pub use device::Device;
pub use error::Error;
pub use host::TerminalHost;
pub use matrix_device::{ControlEvent, MatrixDevice, MatrixHandle};
pub use registry::{
    EXPRESSION_FLOOR, IMAGE_FLOOR, ImageResource, Registry, is_double_width, is_emoji,
};
pub use render::{FramePhase, Renderer};
pub use screen::Screen;
pub use surface::Surface;
pub use tiles::{CellGlyph, DEFAULT_CONFINEMENT, Rasterize, TileAddress, TileCache};
