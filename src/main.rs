//! Img2GD - Command-line tool for drawing images into Geometry Dash levels

use std::process::ExitCode;

use img2gd::cli;

fn main() -> ExitCode {
    cli::run()
}
