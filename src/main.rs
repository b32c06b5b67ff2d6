use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use stv::app::{App, AppOptions};
use stv::catalog::JsonFileSource;
use stv::config::{Config, default_data_dir};
use stv::error::{AppError, AppResult};
use stv::logging::{Verbosity, init_file_subscriber};

/// Full-screen story viewer for the terminal.
#[derive(Parser, Debug)]
#[command(name = "stv", version, about, long_about = None)]
struct Cli {
    /// Catalog JSON in the CMS response shape.
    source: PathBuf,

    /// Deep link to open, e.g. `/player?story=<id>&segment=<id>`.
    #[arg(long)]
    link: Option<String>,

    /// Bypass the catalog caches.
    #[arg(long)]
    refresh: bool,

    /// Category to select once the catalog has loaded.
    #[arg(long)]
    category: Option<String>,

    /// Config file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(location) => println!("{location}"),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

/// Runs the viewer and returns the deep link it closed on.
async fn run(cli: Cli) -> AppResult<String> {
    if !cli.source.is_file() {
        return Err(AppError::invalid_argument(format!(
            "catalog source not found: {}",
            cli.source.display()
        )));
    }

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let data_dir = default_data_dir();
    if let Some(dir) = &data_dir
        && let Err(err) = init_file_subscriber(dir, Verbosity::from_flag(cli.verbose))
    {
        eprintln!("logging disabled: {err}");
    }

    let options = AppOptions {
        initial_location: cli.link.unwrap_or_default(),
        category: cli.category,
        force_refresh: cli.refresh,
        data_dir,
    };
    let source = Arc::new(JsonFileSource::new(cli.source));
    let mut app = App::new_with_config(source, config, options);
    app.run().await?;
    Ok(app.location().to_string())
}
