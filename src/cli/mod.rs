//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod convert;
mod levels;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::convert::Origin;

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Img2GD - Draw images into Geometry Dash levels, one block per pixel
#[derive(Parser)]
#[command(name = "img2gd")]
#[command(about = "Img2GD - Draw images into Geometry Dash levels, one block per pixel")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an image into an existing level
    Convert {
        /// Source image (PNG or any format the decoder supports)
        #[arg(short, long)]
        input: PathBuf,

        /// Name of the level to draw into
        #[arg(short, long)]
        output: String,

        /// Level revision [default: from config, else 0]
        #[arg(long)]
        revision: Option<u32>,

        /// Editor layer assigned to every placement
        #[arg(long, value_parser = clap::value_parser!(u16).range(0..=i16::MAX as i64))]
        layer: Option<u16>,

        /// Alpha at or above which a pixel is drawn (0-255)
        #[arg(long)]
        threshold: Option<u8>,

        /// Placement origin in level units, as X,Y
        #[arg(long, value_name = "X,Y", allow_hyphen_values = true)]
        origin: Option<Origin>,

        /// Emit debug lines
        #[arg(short, long)]
        verbose: bool,

        /// Skip backing up save data
        #[arg(long)]
        no_backup: bool,

        /// Config file [default: discovered img2gd.toml]
        #[arg(long)]
        config: Option<PathBuf>,

        /// Save directory holding CCLocalLevels.json
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },

    /// List the levels in the save
    Levels {
        /// Save directory holding CCLocalLevels.json
        #[arg(long)]
        save_dir: Option<PathBuf>,

        /// Config file [default: discovered img2gd.toml]
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON lines
        #[arg(long)]
        json: bool,
    },
}

/// Main CLI entry point
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            revision,
            layer,
            threshold,
            origin,
            verbose,
            no_backup,
            config,
            save_dir,
        } => {
            let args = convert::ConvertArgs {
                input,
                level: output,
                revision,
                layer,
                threshold,
                origin,
                verbose,
                no_backup,
                config,
                save_dir,
            };
            convert::run_convert(&args)
        }
        Commands::Levels { save_dir, config, json } => {
            levels::run_levels(save_dir.as_deref(), config.as_deref(), json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_convert_args_parse() {
        let cli = Cli::try_parse_from([
            "img2gd", "convert", "-i", "art.png", "-o", "Canvas", "--origin", "-10,20", "--layer",
            "3", "--no-backup",
        ])
        .unwrap();
        match cli.command {
            Commands::Convert { input, output, origin, layer, no_backup, threshold, .. } => {
                assert_eq!(input, PathBuf::from("art.png"));
                assert_eq!(output, "Canvas");
                assert_eq!(origin, Some(Origin::new(-10, 20)));
                assert_eq!(layer, Some(3));
                assert!(no_backup);
                assert_eq!(threshold, None);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_malformed_origin_rejected() {
        for bad in ["10", "10,x", "a,b", "1,2,3"] {
            let result = Cli::try_parse_from([
                "img2gd", "convert", "-i", "a.png", "-o", "L", "--origin", bad,
            ]);
            assert!(result.is_err(), "origin '{}' should be rejected", bad);
        }
    }

    #[test]
    fn test_layer_out_of_range_rejected() {
        let result = Cli::try_parse_from([
            "img2gd", "convert", "-i", "a.png", "-o", "L", "--layer", "40000",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let result = Cli::try_parse_from([
            "img2gd", "convert", "-i", "a.png", "-o", "L", "--threshold", "256",
        ]);
        assert!(result.is_err());
    }
}
