//! oms-cli - terminal front-end for the Online Movie Store
//!
//! Talks to oms-server over HTTP. Without a subcommand it starts the
//! interactive shell.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod client;
mod display;
mod shell;

use client::{ApiClient, Reply};

/// Command-line arguments for oms-cli
#[derive(Parser, Debug)]
#[command(name = "oms-cli")]
#[command(about = "Terminal client for the Online Movie Store")]
#[command(version)]
struct Args {
    /// Base URL of the movie store server
    #[arg(short, long, env = "OMS_SERVER", default_value = "http://127.0.0.1:3000")]
    server: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive login and menu loop (default)
    Shell,
    /// List every movie in the catalog
    Movies,
    /// Look up movies by title (`%` and `_` are wildcards)
    Read { title: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Quiet unless RUST_LOG asks otherwise; stdout belongs to the menus
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = ApiClient::new(&args.server)?;

    match args.command.unwrap_or(Command::Shell) {
        Command::Shell => shell::run(&client).await,
        Command::Movies => print_movies(client.get(&["movies"], None).await?),
        Command::Read { title } => print_movies(client.get(&["readmovie", title.as_str()], None).await?),
    }
}

fn print_movies(reply: Reply) -> Result<()> {
    match reply {
        Reply::Success { body, .. } => {
            let payload = body.get("list").or_else(|| body.get("movie"));
            let movies = payload.map(display::movies_from).unwrap_or_default();
            println!("{}", display::movie_table(&movies));
            Ok(())
        }
        Reply::Conflict(message) => {
            println!("{}", message);
            Ok(())
        }
        Reply::Error(message) => Err(anyhow::anyhow!(message)),
    }
}
