use std::{io::{Stdin, Stdout}, path::PathBuf, process::ExitCode};

use cellmatrix_core::{
    ApplicationInstruction, Cell, CellArea, Color, Device, Dispatch, GlyphStyle, Screen,
};
use cellmatrix_mirror::{MirrorDevice, logging, manage_stdio_terminal};
use clap::Parser;

/// Line-echo terminal application speaking the mirror protocol over
/// standard input and output.
#[derive(Parser, Debug)]
#[command(name = "cellmatrix-mirror", version, about)]
struct Cli {
    /// Session name reported in diagnostics.
    #[arg(long, default_value = "cellmatrix")]
    name: String,

    /// Directory for log files; defaults to the user cache directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Disable file logging entirely.
    #[arg(long)]
    no_file_logs: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = logging::LoggingConfig::from_env();
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
    } else if !cli.no_file_logs && config.log_dir.is_none() {
        config.log_dir = Some(logging::LoggingConfig::default_log_dir());
    }
    if cli.no_file_logs {
        config.log_dir = None;
    }

    let _guard = match logging::init_logging(config) {
        Ok(guard) => guard,
        Err(error) => {
            eprintln!("{}: could not initialize logging: {error}", cli.name);
            None
        },
    };

    let status = manage_stdio_terminal(&cli.name, echo_application);
    ExitCode::from(status.clamp(0, 255) as u8)
}

fn echo_application(device: &mut MirrorDevice<Stdin, Stdout>) -> i32 {
    let mut line = String::new();
    repaint(device, &line);

    loop {
        device.transfer_event();

        match device.status().decode() {
            Dispatch::Instruction(ApplicationInstruction::SessionClose)
            | Dispatch::Instruction(ApplicationInstruction::SessionQuit) => return 0,

            Dispatch::Instruction(ApplicationInstruction::ScreenResize) => {
                repaint(device, &line);
            },

            Dispatch::Codepoint(_) => {
                if let Some(text) = device.transfer_text() {
                    line.push_str(text);
                }
                repaint(device, &line);
            },

            Dispatch::Function(1) => {
                line.clear();
                repaint(device, &line);
            },

            _ => {},
        }
    }
}

fn repaint(device: &mut MirrorDevice<Stdin, Stdout>, line: &str) {
    let view = device.view();
    if view.is_empty() {
        return;
    }

    let template = Cell::glyph(-1, Color::BLACK, GlyphStyle {
        glyph_color: Color::new(0xE8, 0xE8, 0xE8),
        ..Default::default()
    });

    {
        let Ok(mut screen) = Screen::new(view, device.cells_mut()) else {
            return;
        };
        screen.fill(template);

        // Show the tail of the line when it exceeds the span.
        let glyphs: Vec<char> = line.chars().collect();
        let start = glyphs.len().saturating_sub(view.span as usize);
        let row: Vec<Cell> = glyphs[start..]
            .iter()
            .map(|&c| template.inscribe(c as i32, 0))
            .collect();
        screen.rewrite(CellArea::new(0, 0, 1, row.len() as u16), row);
    }

    device.invalidate_cells(view);
    if let Err(error) = device.render_image() {
        tracing::error!(%error, "render failed");
        return;
    }
    device.dispatch_image();
    device.synchronize();
}
