//! Entry point for the **splitview** daemon.
//!
//! Spawns the Unix-socket [`EventSource`](splitview::traits::EventSource) on
//! a background thread, runs chord recognition on the main thread and hands
//! resolved intents to a [`PlacementWorker`] so window-system calls never
//! block input handling.
//!
//! ```text
//! splitview                    run the daemon
//! splitview --list             print the snap menu
//! splitview --snap left-half   snap the active window once and exit
//! ```

use splitview::chord::{ChordRecognizer, LayoutIntent};
use splitview::config::Config;
use splitview::dispatch::{apply_with_feedback, PlacementWorker, TerminalBell};
use splitview::engine::LayoutEngine;
use splitview::grid::menu_entries;
use splitview::hyprland::placer::HyprlandPlacer;
use splitview::ipc::listener::UnixSocketListener;
use splitview::keys::KeyCodeSet;
use splitview::layout::{parse_position, LayoutPosition};
use splitview::traits::{Event, EventSource};
use log::{error, info};
use std::sync::mpsc;

/// Default socket path for the event listener.
fn default_socket_path() -> String {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    format!("{}/splitview.sock", runtime)
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/splitview`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("splitview")
}

/// Try to load the config from `$XDG_CONFIG_HOME/splitview/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--list") {
        print_menu();
        return;
    }

    if let Some(i) = args.iter().position(|a| a == "--snap") {
        let Some(name) = args.get(i + 1) else {
            eprintln!("--snap needs a position, e.g. --snap left-half");
            std::process::exit(2);
        };
        run_snap(name);
        return;
    }

    run_daemon();
}

fn print_menu() {
    for entry in menu_entries() {
        println!("{:<14} {}", entry.name, entry.shortcut);
    }
    println!();
    for position in LayoutPosition::all() {
        println!("{}", position);
    }
}

/// Snap the active window once and exit.
fn run_snap(name: &str) {
    let Some(position) = parse_position(name) else {
        eprintln!("unknown position {:?}; run with --list to see all positions", name);
        std::process::exit(2);
    };

    let config = load_config();
    let backend = match HyprlandPlacer::new(config.placement) {
        Ok(b) => b,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let engine = LayoutEngine::new(backend.clone(), backend);
    if !apply_with_feedback(&engine, &TerminalBell, LayoutIntent::direct(position)) {
        std::process::exit(1);
    }
}

/// Normal daemon mode.
fn run_daemon() {
    let config = load_config();

    let backend = match HyprlandPlacer::new(config.placement.clone()) {
        Ok(b) => b,
        Err(e) => {
            error!("cannot reach Hyprland: {}", e);
            std::process::exit(1);
        }
    };
    let worker = PlacementWorker::spawn(LayoutEngine::new(backend.clone(), backend), TerminalBell);
    let recognizer = ChordRecognizer::new(config.chords.clone());

    let (event_tx, event_rx) = mpsc::channel::<Event>();
    spawn_event_sources(event_tx, config.chords.key_codes);

    run_event_loop(recognizer, &worker, event_rx);
    worker.shutdown();
}

//  Event loop

fn run_event_loop(mut recognizer: ChordRecognizer, worker: &PlacementWorker, events: mpsc::Receiver<Event>) {
    info!("splitview running");
    for event in events {
        if let Some(intent) = recognizer.on_event(&event) {
            if !worker.submit(intent) {
                error!("placement worker stopped, exiting");
                break;
            }
        }
    }
    info!("all event sources closed, exiting");
}

//  Helpers

fn spawn_event_sources(tx: mpsc::Sender<Event>, key_codes: KeyCodeSet) {
    let path = default_socket_path();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path, key_codes);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
