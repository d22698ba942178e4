//! A scripted session against the in-process device: a backend thread
//! feeds key events while the application thread paints them through
//! the host bindings.
//!
//! Run with `cargo run --example matrix_session -p cellmatrix-core`.

use cellmatrix_core::{
    ApplicationInstruction, Cell, CellArea, CellGlyph, Color, ControlEvent, Device, Dispatch,
    GlyphInscriptionParameters, GlyphStyle, MatrixDevice, Rasterize, Surface, TerminalHost,
};

/// Minimal block rasterizer; real embeddings plug in a font engine.
struct BlockRasterizer;

impl Rasterize for BlockRasterizer {
    fn rasterize(
        &mut self,
        surface: &mut Surface,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        glyph: &CellGlyph<'_>,
    ) {
        let color = glyph
            .cell
            .style()
            .map(|s| s.glyph_color)
            .unwrap_or(Color::WHITE);
        for py in y + 2..y + height - 2 {
            for px in x + 1..x + width - 1 {
                surface.put_pixel(px, py, color);
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let inscription = GlyphInscriptionParameters {
        cell_width: 8.0,
        cell_height: 16.0,
        ..Default::default()
    };
    let device = MatrixDevice::new(
        inscription,
        1.0,
        320.0,
        128.0,
        8,
        Box::new(BlockRasterizer),
    )?;

    // Scripted backend: types a line, then closes the session.
    let handle = device.handle();
    let backend = std::thread::spawn(move || {
        for c in "cells".chars() {
            handle.submit(ControlEvent {
                dispatch: c as i32,
                quantity: 1,
                text: c.to_string().into(),
                ..Default::default()
            });
        }
        handle.submit(ControlEvent::instruction(
            ApplicationInstruction::SessionClose,
            1,
        ));
    });

    let mut host = TerminalHost::connect(device)?;
    let template = Cell::glyph(-1, Color::BLACK, GlyphStyle {
        glyph_color: Color::new(0xE0, 0xE0, 0xE0),
        ..Default::default()
    });

    let mut column = 0u16;
    loop {
        host.wait_event();

        match Dispatch::decode(host.device().status().dispatch) {
            Dispatch::Instruction(ApplicationInstruction::SessionClose) => break,
            Dispatch::Codepoint(c) => {
                {
                    let mut screen = host.screen()?;
                    screen.rewrite(
                        CellArea::new(0, column, 1, 1),
                        [template.inscribe(c as i32, 0)],
                    );
                }
                host.invalidate_cells(CellArea::new(0, column, 1, 1));
                host.render_delta()?;
                host.dispatch_frame();
                column += 1;
            },
            _ => {},
        }
    }

    backend.join().expect("backend thread");

    let output = host.device().output();
    println!(
        "presented {} columns into a {}x{} surface",
        column,
        output.width(),
        output.height(),
    );
    Ok(())
}
