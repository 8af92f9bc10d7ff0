// Pricebook - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration resolution (config.toml)
// 3. Logging initialisation (debug mode support)
// 4. Initial catalogue load and the interactive menu loop

mod menu;

// Re-export modules from the library crate so that `menu.rs` can use
// `crate::core::...`, `crate::util::...` etc.
pub use pricebook::core;
pub use pricebook::platform;
pub use pricebook::util;

use clap::Parser;
use std::path::PathBuf;

/// Pricebook - menu-driven product catalogue manager.
///
/// Keeps a product catalogue in memory, persisted as a headerless CSV
/// file, and edits it through an interactive numbered menu.
#[derive(Parser, Debug)]
#[command(name = "Pricebook", version, about)]
struct Cli {
    /// Catalogue file to load before the menu starts
    /// (falls back to [catalogue] default_file in config.toml).
    file: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Resolve platform paths and configuration before logging so the
    // configured level can take effect from the first event.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (config, config_warnings) = platform::config::load_config(&platform_paths.config_dir);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "Pricebook starting"
    );

    for warning in &config_warnings {
        tracing::warn!("{}", warning);
        eprintln!("Warning: {warning}");
    }

    let mut catalog = core::catalog::Catalog::new();

    // CLI argument wins over the configured default file.
    if let Some(path) = cli.file.or(config.default_file) {
        match menu::load_catalogue(&mut catalog, &path) {
            Ok(count) => {
                println!("Catalogue loaded from '{}' ({count} products).", path.display());
            }
            Err(e) => {
                // Not fatal: the operator can load another file from the menu.
                tracing::warn!(error = %e, "Initial catalogue load failed");
                eprintln!("Warning: {e}");
            }
        }
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let result = menu::run(&mut catalog, &mut stdin.lock(), &mut stdout.lock());

    // Exit code 0 is the only defined outcome of the menu protocol; a hard
    // failure of the terminal streams is the one path out with status 1.
    if let Err(e) = result {
        tracing::error!(error = %e, "Terminal I/O failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
