//! Levels command implementation

use std::path::Path;
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::config::{load_config, merge_cli_overrides, resolve_save_dir, CliOverrides};
use crate::store::{LevelHandle, LevelStore, LocalLevels};

/// Execute the levels command
pub fn run_levels(save_dir: Option<&Path>, config_path: Option<&Path>, json: bool) -> ExitCode {
    let mut config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let overrides =
        CliOverrides { save_dir: save_dir.map(Path::to_path_buf), ..Default::default() };
    merge_cli_overrides(&mut config, &overrides);

    let dir = match resolve_save_dir(&config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let store = match LocalLevels::open(&dir) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let levels = store.levels();
    if !json {
        println!("{:<32} {:>8} {:<20} {:>8}", "NAME", "REVISION", "AUTHOR", "OBJECTS");
    }
    for info in levels {
        // Unreadable level data is listed without a count
        let handle = LevelHandle::new(info.clone());
        let objects = store.load(&handle).ok().map(|doc| doc.object_count());
        if json {
            let entry = serde_json::json!({
                "name": info.name,
                "revision": info.revision,
                "author": info.author,
                "song_id": info.song_id,
                "objects": objects,
            });
            println!("{}", entry);
        } else {
            let objects = objects.map_or_else(|| "?".to_string(), |n| n.to_string());
            println!("{:<32} {:>8} {:<20} {:>8}", info.name, info.revision, info.author, objects);
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
