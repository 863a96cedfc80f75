//! Convert command implementation

use std::path::PathBuf;
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::config::{load_config, merge_cli_overrides, resolve_save_dir, CliOverrides, Img2gdConfig};
use crate::convert::{ConvertOptions, Origin, ReferenceChannel};
use crate::pipeline::{self, RunParams};
use crate::report::{ConsoleReporter, Reporter};
use crate::store::LocalLevels;

/// Arguments of the convert command
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    pub input: PathBuf,
    pub level: String,
    pub revision: Option<u32>,
    pub layer: Option<u16>,
    pub threshold: Option<u8>,
    pub origin: Option<Origin>,
    pub verbose: bool,
    pub no_backup: bool,
    pub config: Option<PathBuf>,
    pub save_dir: Option<PathBuf>,
}

impl ConvertArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            editor_layer: self.layer,
            alpha_threshold: self.threshold,
            origin: self.origin.map(|o| [o.x, o.y]),
            revision: self.revision,
            save_dir: self.save_dir.clone(),
            backup: self.no_backup.then_some(false),
            verbose: self.verbose.then_some(true),
        }
    }
}

/// Execute the convert command
pub fn run_convert(args: &ConvertArgs) -> ExitCode {
    let mut config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            ConsoleReporter::new().fatal(&e.to_string());
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    merge_cli_overrides(&mut config, &args.overrides());

    let reporter = build_reporter(&config);
    reporter.debug("Debug logging has been enabled.");

    let save_dir = match resolve_save_dir(&config) {
        Ok(dir) => dir,
        Err(e) => {
            reporter.fatal(&e.to_string());
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    reporter.debug(&format!("Save directory: {}", save_dir.display()));

    let mut store = match LocalLevels::open(&save_dir) {
        Ok(s) => s,
        Err(e) => {
            reporter.fatal(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let params = RunParams {
        image: args.input.clone(),
        level: args.level.clone(),
        revision: config.convert.revision,
        backup_dir: config.storage.backup.then(|| config.storage.backup_dir.clone()),
        options: ConvertOptions {
            alpha_threshold: config.convert.alpha_threshold,
            origin: config.convert.origin(),
            editor_layer: config.convert.editor_layer,
            reference: ReferenceChannel::default(),
        },
    };

    match pipeline::run(&params, &mut store, &reporter) {
        Ok(_) => {
            reporter.info("Done.");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            reporter.fatal(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Console reporter per the `[log]` section, mirrored to a log file when enabled.
fn build_reporter(config: &Img2gdConfig) -> ConsoleReporter {
    let verbose = config.log.verbose;
    if !config.log.file {
        return ConsoleReporter::new().with_verbose(verbose);
    }
    match ConsoleReporter::new().with_verbose(verbose).with_log_dir(&config.log.dir) {
        Ok((reporter, path)) => {
            reporter.debug(&format!("Logging to {}", path.display()));
            reporter
        }
        Err(e) => {
            let reporter = ConsoleReporter::new().with_verbose(verbose);
            reporter.warn(&format!(
                "Cannot write log files to {}: {}",
                config.log.dir.display(),
                e
            ));
            reporter
        }
    }
}
