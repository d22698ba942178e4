use std::io::{Read, Write};

use cellmatrix_core::{ApplicationInstruction, Device, Dispatch};

use crate::device::MirrorDevice;

/// Exit code reserved for backend-specific fatal setup failures.
pub const FATAL_SETUP_EXIT: i32 = 199;

/// Runs a terminal application over mirror streams.
///
/// The display side must open the session by announcing screen
/// dimensions through a `screen/resize` event; anything else is a
/// fatal setup failure reported with exit code [`FATAL_SETUP_EXIT`].
/// The application's exit status is propagated unchanged.
pub fn manage_terminal<R, W, A>(name: &str, controls: R, display: W, application: A) -> i32
where
    R: Read,
    W: Write,
    A: FnOnce(&mut MirrorDevice<R, W>) -> i32,
{
    let mut device = MirrorDevice::new(controls, display);

    device.transfer_event();
    match device.status().decode() {
        Dispatch::Instruction(ApplicationInstruction::ScreenResize) => {},
        other => {
            eprintln!("{name}: display stream did not announce screen dimensions");
            tracing::error!(?other, "mirror session opened without a resize event");
            return FATAL_SETUP_EXIT;
        },
    }

    tracing::info!(
        name,
        lines = device.view().lines,
        span = device.view().span,
        "mirror session established"
    );
    application(&mut device)
}

/// [`manage_terminal`] over standard input and output.
pub fn manage_stdio_terminal<A>(name: &str, application: A) -> i32
where
    A: FnOnce(&mut MirrorDevice<std::io::Stdin, std::io::Stdout>) -> i32,
{
    manage_terminal(name, std::io::stdin(), std::io::stdout(), application)
}

#[cfg(test)]
mod tests {
    use cellmatrix_core::{ControllerStatus, RESIZE_DISPATCH};
    use cellmatrix_data::{CellArea, MatrixParameters};

    use super::*;
    use crate::wire::write_status;

    #[test]
    fn test_bootstrap_requires_resize_announcement() {
        let status = manage_terminal("test", std::io::empty(), Vec::new(), |_| 0);
        assert_eq!(status, FATAL_SETUP_EXIT);
    }

    #[test]
    fn test_bootstrap_propagates_application_exit() {
        let parameters = MatrixParameters {
            scale_factor: 1.0,
            x_cell_units: 4.0,
            y_cell_units: 8.0,
            ..Default::default()
        }
        .for_area(CellArea::new(0, 0, 2, 2));

        let mut controls = Vec::new();
        let status = ControllerStatus { dispatch: RESIZE_DISPATCH, ..Default::default() };
        write_status(&mut controls, &status, &parameters.to_bytes()).unwrap();

        let exit = manage_terminal("test", controls.as_slice(), Vec::new(), |device| {
            assert_eq!(device.view(), CellArea::new(0, 0, 2, 2));
            42
        });
        assert_eq!(exit, 42);
    }
}
