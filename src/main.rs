use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use tokio::sync::Mutex;
use tonalcli::{cli, config, error, types::UserToken};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with the Tonal API
    Auth,

    /// Remove the cached token
    Logout,

    /// Show the cached token's state and expiry
    Token,

    /// Search the catalogue for artists
    Search(SearchOptions),

    /// List artists similar to the given one
    Similar(SimilarOptions),

    /// List the newest releases in the catalogue
    Releases(ReleasesOptions),

    /// Show a single release by id
    Release(ReleaseOptions),

    /// Show the top-artists chart
    Charts(ChartsOptions),

    /// List catalogue genres
    Genres,

    /// List your saved releases (requires auth)
    Favourites(FavouritesOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Search query
    pub query: String,

    /// Maximum number of results
    #[clap(long, default_value_t = 20)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct SimilarOptions {
    /// Catalogue id of the artist
    pub artist_id: String,

    /// Maximum number of results
    #[clap(long, default_value_t = 20)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct ReleasesOptions {
    /// Maximum number of results
    #[clap(long, default_value_t = 20)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct ReleaseOptions {
    /// Catalogue id of the release
    pub release_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ChartsOptions {
    /// Maximum number of chart positions
    #[clap(long, default_value_t = 20)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct FavouritesOptions {
    /// Maximum number of results
    #[clap(long, default_value_t = 50)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<UserToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Logout => cli::logout().await,
        Command::Token => cli::token_info().await,
        Command::Search(opt) => cli::search(opt.query, opt.limit).await,
        Command::Similar(opt) => cli::similar(opt.artist_id, opt.limit).await,
        Command::Releases(opt) => cli::releases(opt.limit).await,
        Command::Release(opt) => cli::release(opt.release_id).await,
        Command::Charts(opt) => cli::charts(opt.limit).await,
        Command::Genres => cli::genres().await,
        Command::Favourites(opt) => cli::favourites(opt.limit).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
