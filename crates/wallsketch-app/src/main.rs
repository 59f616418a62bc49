//! Main application entry point.
//!
//! Usage: `wallsketch [PLAN_DIR] [SCRIPT.json]`

use std::error::Error;
use std::path::PathBuf;
use wallsketch_app::{App, AppConfig, ShortcutRegistry, script};

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let config = AppConfig {
        plan_dir: args.first().map(PathBuf::from),
        ..AppConfig::default()
    };
    let mut app = App::open(config)?;

    if let Some(path) = args.get(1) {
        let json = std::fs::read_to_string(path)?;
        let commands = script::parse(&json)?;
        let applied = app.run_script(&commands);
        log::info!("Applied {} of {} commands from {}", applied, commands.len(), path);
    }

    println!("{}", app.summary());
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("Usage: wallsketch [PLAN_DIR] [SCRIPT.json]");
        ShortcutRegistry::print_all();
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("wallsketch: {}", e);
        std::process::exit(1);
    }
}
