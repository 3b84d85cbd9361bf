//! League Matrix CLI - run matrix operations on CSV files
//!
//! ```bash
//! league-matrix serve                            # Start HTTP server (port 8080)
//! league-matrix run sum testdata/matrix1.csv     # Run one operation and print the result
//! league-matrix operations                       # Show available operations
//! ```

use clap::{Parser, Subcommand};
use league_matrix::{MatrixService, RequestContext, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "league-matrix")]
#[command(about = "Validate CSV integer matrices and run matrix operations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory that `testdata/...` paths are resolved against
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Run one operation on a CSV file and print the result
    Run {
        /// Operation name (sum, multiply, echo, invert, flatten)
        operation: String,

        /// CSV file, e.g. testdata/matrix1.csv
        file: String,

        /// Directory that `testdata/...` paths are resolved against
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Show available operations
    Operations,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            data_dir,
        } => cmd_serve(host, port, data_dir).await,

        Commands::Run {
            operation,
            file,
            data_dir,
        } => cmd_run(&operation, &file, data_dir).await,

        Commands::Operations => cmd_operations(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(data_dir: Option<PathBuf>) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_env()?;
    if let Some(dir) = data_dir {
        config = config.with_data_dir(dir);
    }
    Ok(config)
}

async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    data_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(data_dir)?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    league_matrix::server::start_server(config).await?;
    Ok(())
}

async fn cmd_run(
    operation: &str,
    file: &str,
    data_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(data_dir)?;
    let service = MatrixService::new(Arc::new(config.content_provider()));
    let ctx = RequestContext::with_timeout(config.request_timeout());

    let output = service.process_matrix(&ctx, operation, file).await?;
    println!("{}", output);
    Ok(())
}

fn cmd_operations() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    println!("{}", league_matrix::operations_description(&config.public_url()));
    Ok(())
}
