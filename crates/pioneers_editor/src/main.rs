//! Headless map tool
//!
//! Loads a map through the editor plugin and reports on it, or re-exports it.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use pioneers_editor::config::DEFAULT_CONFIG_PATH;
use pioneers_editor::export::handle_load_requests;
use pioneers_editor::{EditorConfig, EditorMap, LoadFailed, LoadMap, MapEditorPlugin};
use pioneers_map::GridPos;
use serde::Serialize;
use std::env;
use std::fs;
use std::process;

/// Load errors reported by the editor plugin
#[derive(Resource, Default)]
struct LoadErrors(Vec<String>);

fn collect_load_errors(mut failures: MessageReader<LoadFailed>, mut errors: ResMut<LoadErrors>) {
    errors.0.extend(failures.read().map(|failure| failure.reason.clone()));
}

#[derive(Serialize)]
struct MapReport {
    width: u32,
    height: u32,
    exportable: bool,
    rings: usize,
    malformed: Vec<GridPos>,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: {} check <map.txt>", args[0]);
                process::exit(1);
            }
            check(&args[2]);
        }
        "export" => {
            if args.len() < 4 {
                eprintln!("Usage: {} export <map.txt> <out.txt>", args[0]);
                process::exit(1);
            }
            export(&args[2], &args[3]);
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Paragon Pioneers map tool");
    println!("\nUsage: pioneers <command> [args]");
    println!("\nCommands:");
    println!("  check <map.txt>              - Report map size, rings and malformed cells");
    println!("  export <map.txt> <out.txt>   - Re-export a map that has no malformed cells");
    println!("\nEnvironment Variables:");
    println!("  PIONEERS_CONFIG              - Path to editor config (default: {})", DEFAULT_CONFIG_PATH);
}

/// Run one update of a headless editor app with the map file loaded
fn load_map(path: &str) -> App {
    let config_path = env::var("PIONEERS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = match EditorConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path, e);
            process::exit(1);
        }
    };

    let mut app = App::new();
    app.add_plugins(LogPlugin::default())
        .insert_resource(config)
        .add_plugins(MapEditorPlugin)
        .init_resource::<LoadErrors>()
        .add_systems(Update, collect_load_errors.after(handle_load_requests));
    app.world_mut().write_message(LoadMap { text });
    app.update();

    // A failed load leaves the blank map from the config in place
    if let Some(reason) = app.world().resource::<LoadErrors>().0.first() {
        eprintln!("{}: {}", path, reason);
        process::exit(1);
    }
    app
}

fn check(path: &str) {
    let app = load_map(path);
    let map = app.world().resource::<EditorMap>();

    let report = MapReport {
        width: map.width(),
        height: map.height(),
        exportable: map.is_exportable(),
        rings: map.rings().len(),
        malformed: map.malformed_cells(),
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize report: {}", e);
            process::exit(1);
        }
    }

    if !report.exportable {
        process::exit(2);
    }
}

fn export(path: &str, out: &str) {
    let app = load_map(path);
    let map = app.world().resource::<EditorMap>();

    let text = match map.export() {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    if let Err(e) = fs::write(out, text) {
        eprintln!("Failed to write {}: {}", out, e);
        process::exit(1);
    }
    info!("Exported {} to {}", path, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headless_app(text: &str) -> App {
        let mut app = App::new();
        app.add_plugins(MapEditorPlugin)
            .init_resource::<LoadErrors>()
            .add_systems(Update, collect_load_errors.after(handle_load_requests));
        app.world_mut().write_message(LoadMap { text: text.to_string() });
        app.update();
        app
    }

    #[test]
    fn test_load_error_is_collected() {
        let app = headless_app("00\n\n00");
        let errors = &app.world().resource::<LoadErrors>().0;
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Row 1"));
    }

    #[test]
    fn test_export_text_has_no_trailing_newline() {
        let app = headless_app("0GG0\n0GG0\n");
        assert!(app.world().resource::<LoadErrors>().0.is_empty());
        let text = app.world().resource::<EditorMap>().export().unwrap();
        assert_eq!(text, "0GG0\n0GG0");
    }
}
