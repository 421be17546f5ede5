//! husk terminal entry point.
//!
//! Line-oriented read/execute loop over stdin against a single session.
//! Commands persist their effects across runs when the configuration
//! names a state file; otherwise everything lives in memory and resets
//! on exit.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;

use husk_shell::{
    JsonFileStore, KeyValueStore, MemoryStore, Session, Signal, register_builtins,
    register_extras,
};
use husk_types::config::HuskConfig;

/// ANSI: wipe the screen and park the cursor at the top left.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Resolve config from CLI arg, HUSK_CONFIG env var, or the default path.
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("HUSK_CONFIG").ok())
        .unwrap_or_else(|| "husk.toml".to_string());
    let config = HuskConfig::load(Path::new(&config_path))?;
    log::info!("starting husk (config: {config_path})");

    let store: Box<dyn KeyValueStore> = match &config.state_file {
        Some(path) => {
            log::info!("session state file: {}", path.display());
            Box::new(JsonFileStore::open(path)?)
        },
        None => Box::new(MemoryStore::new()),
    };

    let mut session = Session::with_history_capacity(store, config.history_size);
    register_builtins(session.registry_mut());
    register_extras(session.registry_mut());

    if config.boot_banner {
        print_banner();
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!(
            "{}@{}:{}$ ",
            config.prompt_user,
            config.prompt_host,
            session.fs().pwd()
        );
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            // EOF (Ctrl-D).
            println!();
            break;
        };
        let line = line?;

        match session.run_line(&line) {
            Ok(result) => {
                match result.signal {
                    Some(Signal::Clear) => print!("{CLEAR_SCREEN}"),
                    Some(Signal::Reboot) => {
                        print!("{CLEAR_SCREEN}");
                        if config.boot_banner {
                            print_banner();
                        }
                    },
                    None => {},
                }
                if !result.output.is_empty() {
                    println!("{}", result.output);
                }
            },
            // Parse and environment failures abort the line, not the loop.
            Err(err) => println!("husk: {err}"),
        }
    }

    log::info!("session closed");
    Ok(())
}

fn print_banner() {
    println!(
        "husk {}-release (in-memory shell simulation)",
        env!("CARGO_PKG_VERSION")
    );
    println!("Ready. Type 'help' to get started.");
    println!();
}
