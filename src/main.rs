use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pagebin::client::HttpClient;
use pagebin::commands;
use pagebin::{App, Config};

#[derive(Parser)]
#[command(name = "pagebin", version, about = "Short-lived text and file sharing")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve,
    /// Delete expired pages and the files stored for them.
    PurgeExpired,
    /// Create a page from text and/or files and print its link.
    Create {
        /// Files to upload and attach.
        files: Vec<PathBuf>,
        /// Page text; read from stdin when omitted and no files are given.
        #[arg(long)]
        text: Option<String>,
        /// Server to talk to; defaults to the configured base URL.
        #[arg(long)]
        server: Option<String>,
    },
    /// Fetch a page and print its content and file list.
    Show {
        /// Page id or share URL.
        page: String,
        /// Print this attached file instead of the page content.
        #[arg(long)]
        file: Option<String>,
        /// Server to talk to; defaults to the configured base URL.
        #[arg(long)]
        server: Option<String>,
    },
    /// Replace a page's content and files.
    Update {
        /// Page id or share URL.
        page: String,
        /// Files to upload as the page's new attachments.
        files: Vec<PathBuf>,
        /// New page text; read from stdin when omitted and no files are given.
        #[arg(long)]
        text: Option<String>,
        /// Server to talk to; defaults to the configured base URL.
        #[arg(long)]
        server: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve => commands::serve::run(App::new(config).await?).await,
        Command::PurgeExpired => commands::purge_expired::run(App::new(config).await?).await,
        Command::Create {
            files,
            text,
            server,
        } => commands::create::run(client_for(&config, server), text, files).await,
        Command::Show { page, file, server } => {
            commands::show::run(client_for(&config, server), page, file).await
        }
        Command::Update {
            page,
            files,
            text,
            server,
        } => commands::update::run(client_for(&config, server), page, text, files).await,
    }
}

fn client_for(config: &Config, server: Option<String>) -> HttpClient {
    HttpClient::new(server.unwrap_or_else(|| config.base_url.clone()))
}
