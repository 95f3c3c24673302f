//! Binary entry point that glues the stored record list to the TUI. The
//! bootstrapping pipeline: parse the command line, start logging, load the
//! configuration, open the database, fetch the navigation fragment, and
//! drive the Ratatui event loop until the user exits.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use inward_register::{ensure_schema, run_app, App, Config, NavBar, RecordStore};

/// Terminal register for inward material entries.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database (defaults to the per-user data directory)
    #[arg(long)]
    database: Option<PathBuf>,

    /// URL of the shared navigation fragment
    #[arg(long)]
    navbar_url: Option<String>,

    /// Route used for active navigation highlighting
    #[arg(long)]
    route: Option<String>,

    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Returning a `Result` bubbles up fatal initialization problems (for example
/// an unwritable data directory) to the terminal before raw mode starts.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    inward_register::logging::init(&Config::data_dir()?)?;
    info!("starting inward-register");

    let mut config = Config::load(cli.config.as_deref());
    if let Some(database) = cli.database {
        config.database = Some(database);
    }
    if let Some(navbar_url) = cli.navbar_url {
        config.navbar_url = navbar_url;
    }
    if let Some(route) = cli.route {
        config.route = route;
    }

    let conn = ensure_schema(&config.database_file()?)?;
    let store = RecordStore::open(conn);

    // One fetch, before the terminal takes over; a failure is carried as the
    // inline header message rather than aborting startup.
    let navbar = NavBar::load(&config.navbar_url);

    let mut app = App::new(store, navbar, config.route.clone());
    run_app(&mut app)
}
