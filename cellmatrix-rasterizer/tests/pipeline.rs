//! End-to-end pipeline checks: application writes cells through the
//! host bindings, the device renders them through the tile cache with
//! the block rasterizer, and the presented pixels are inspected.

use cellmatrix_core::{
    ApplicationInstruction, Cell, CellArea, Color, ControlEvent, Device, Dispatch, FramePhase,
    GlyphInscriptionParameters, GlyphStyle, MatrixDevice, TerminalHost,
};
use cellmatrix_rasterizer::FillRasterizer;

const CELL_WIDTH: u32 = 6;
const CELL_HEIGHT: u32 = 12;

fn device(lines: u16, span: u16) -> MatrixDevice {
    let inscription = GlyphInscriptionParameters {
        cell_width: CELL_WIDTH as f64,
        cell_height: CELL_HEIGHT as f64,
        ..Default::default()
    };

    MatrixDevice::new(
        inscription,
        1.0,
        (span as u32 * CELL_WIDTH) as f64,
        (lines as u32 * CELL_HEIGHT) as f64,
        8,
        Box::new(FillRasterizer),
    )
    .unwrap()
}

fn styled(codepoint: i32, glyph_color: Color) -> Cell {
    Cell::glyph(codepoint, Color::BLACK, GlyphStyle {
        glyph_color,
        ..Default::default()
    })
}

/// Center pixel of a cell, where the block rasterizer paints the glyph.
fn center_of(line: u16, offset: u16) -> (u32, u32) {
    (
        offset as u32 * CELL_WIDTH + CELL_WIDTH / 2,
        line as u32 * CELL_HEIGHT + CELL_HEIGHT / 2,
    )
}

#[test]
fn test_write_render_present() {
    let mut host = TerminalHost::connect(device(4, 10)).unwrap();
    let ink = Color::new(210, 180, 140);

    {
        let mut screen = host.screen().unwrap();
        screen.rewrite(
            CellArea::new(1, 2, 1, 5),
            "hello".chars().map(|c| styled(c as i32, ink)),
        );
    }
    host.invalidate_cells(CellArea::new(1, 2, 1, 5));
    host.render_delta().unwrap();
    host.dispatch_frame();

    let output = host.device().output();
    for offset in 2..7 {
        let (x, y) = center_of(1, offset);
        assert_eq!(output.pixel(x, y), Some(ink), "offset {offset}");
    }
    let (x, y) = center_of(0, 0);
    assert_eq!(output.pixel(x, y), Some(Color::from_u32(0)));
}

#[test]
fn test_uniform_region_rasterizes_once() {
    let mut host = TerminalHost::connect(device(4, 10)).unwrap();
    let fill = styled('#' as i32, Color::WHITE);

    {
        let mut screen = host.screen().unwrap();
        screen.rewrite(CellArea::new(0, 0, 3, 3), std::iter::repeat_n(fill, 9));
    }
    host.invalidate_cells(CellArea::new(0, 0, 3, 3));
    host.render_delta().unwrap();

    // Nine cells, one distinct value, one rasterization.
    assert_eq!(host.device().rasterization_count(), 1);

    // A second render of the same area costs nothing further.
    host.invalidate_cells(CellArea::new(0, 0, 3, 3));
    host.render_delta().unwrap();
    assert_eq!(host.device().rasterization_count(), 1);
}

#[test]
fn test_screen_and_display_replication_agree() {
    let mut host = TerminalHost::connect(device(1, 5)).unwrap();
    let colors: Vec<Color> = (1..=5u8).map(|i| Color::new(i * 40, 0, 0)).collect();

    {
        let mut screen = host.screen().unwrap();
        screen.rewrite(
            CellArea::new(0, 0, 1, 5),
            colors.iter().enumerate().map(|(i, &c)| styled('1' as i32 + i as i32, c)),
        );
    }
    host.invalidate_cells(CellArea::new(0, 0, 1, 5));
    host.render_delta().unwrap();

    let destination = CellArea::new(0, 1, 1, 4);
    let source = CellArea::new(0, 0, 1, 4);
    {
        let mut screen = host.screen().unwrap();
        screen.replicate(destination, source).unwrap();
    }
    host.replicate_cells(destination, source).unwrap();
    host.dispatch_frame();

    // Cells read back as the pre-copy source image.
    {
        let screen = host.screen().unwrap();
        let row: Vec<i32> = screen
            .select(CellArea::new(0, 0, 1, 5))
            .iter()
            .map(|c| c.codepoint)
            .collect();
        assert_eq!(row, ['1', '1', '2', '3', '4'].map(|c| c as i32));
    }

    // And so do the presented pixels.
    let output = host.device().output();
    let expected = [colors[0], colors[0], colors[1], colors[2], colors[3]];
    for (offset, &color) in expected.iter().enumerate() {
        let (x, y) = center_of(0, offset as u16);
        assert_eq!(output.pixel(x, y), Some(color), "offset {offset}");
    }
}

#[test]
fn test_resize_then_far_corner_rewrite() {
    let mut device = device(4, 10);
    device.resize_screen(10, 20).unwrap();

    let mut host = TerminalHost::connect(device).unwrap();
    {
        let mut screen = host.screen().unwrap();
        assert_eq!(screen.area(), CellArea::new(0, 0, 10, 20));
        screen.rewrite(
            CellArea::new(9, 19, 1, 1),
            [styled('z' as i32, Color::WHITE)],
        );
    }
    host.invalidate_cells(CellArea::new(9, 19, 1, 1));
    host.render_delta().unwrap();
    host.dispatch_frame();

    let (x, y) = center_of(9, 19);
    assert_eq!(host.device().output().pixel(x, y), Some(Color::WHITE));
}

#[test]
fn test_event_driven_session() {
    let mut device = device(2, 8);
    let handle = device.handle();

    let backend = std::thread::spawn(move || {
        handle.submit(ControlEvent {
            dispatch: 'x' as i32,
            quantity: 1,
            text: "x".into(),
            ..Default::default()
        });
        handle.submit(ControlEvent::instruction(
            ApplicationInstruction::SessionClose,
            1,
        ));
    });

    let mut host = TerminalHost::connect(device).unwrap();
    let mut inserted = String::new();
    loop {
        host.wait_event();
        match Dispatch::decode(host.device().status().dispatch) {
            Dispatch::Instruction(ApplicationInstruction::SessionClose) => break,
            Dispatch::Codepoint(_) => {
                if let Some(text) = host.text_insertion() {
                    inserted.push_str(text);
                }
            },
            _ => {},
        }
    }
    backend.join().unwrap();

    assert_eq!(inserted, "x");
    assert_eq!(host.device().phase(), FramePhase::Idle);
}
