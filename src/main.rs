use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotdash::{
    cli, config, error,
    types::{SearchType, TimeRange, TopItemKind},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default())
        .placeholder(AnsiColor::BrightBlue.on_default())
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
    /// Sign in with Spotify
    Auth,

    /// Forget the current session
    Logout,

    /// Show the signed-in profile
    Profile,

    /// Show what is playing right now
    NowPlaying(NowPlayingOptions),

    /// Show recently played tracks
    Recent(LimitOptions),

    /// Show top artists or tracks
    Top(TopOptions),

    /// List your playlists
    Playlists(LimitOptions),

    /// Show the tracks of one playlist
    Playlist(PlaylistOptions),

    /// Search tracks, artists, albums and playlists
    Search(SearchOptions),

    /// Print your top items as a receipt
    Receipt(ReceiptOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct NowPlayingOptions {
    /// Keep polling at the configured interval
    #[clap(long)]
    pub watch: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct LimitOptions {
    /// Number of items to fetch (1-50)
    #[clap(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct TopOptions {
    /// What to rank
    #[clap(value_enum)]
    pub kind: TopItemKind,

    /// Time range to rank over
    #[clap(long, value_enum, default_value_t = TimeRange::MediumTerm)]
    pub range: TimeRange,

    /// Number of items to fetch (1-50)
    #[clap(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Spotify playlist id
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Search query
    pub query: String,

    /// Result type(s) to include; can be repeated. Defaults to all types.
    #[clap(long = "type", value_enum, action = ArgAction::Append, num_args = 1)]
    pub types: Vec<SearchType>,

    /// Number of results per type (1-50)
    #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct ReceiptOptions {
    /// What to put on the receipt
    #[clap(long, value_enum, default_value_t = TopItemKind::Tracks)]
    pub kind: TopItemKind,

    /// Time range to rank over
    #[clap(long, value_enum, default_value_t = TimeRange::ShortTerm)]
    pub range: TimeRange,

    /// Number of items on the receipt (1-50)
    #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }
    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };
    let ctx = match cli::Context::new(config) {
        Ok(ctx) => ctx,
        Err(e) => error!("Cannot initialize client. Err: {}", e),
    };

    match cli.command {
        Command::Auth => cli::auth(&ctx).await,
        Command::Logout => cli::logout(&ctx).await,
        Command::Profile => cli::profile(&ctx).await,
        Command::NowPlaying(opt) => cli::now_playing(&ctx, opt.watch).await,
        Command::Recent(opt) => cli::recent(&ctx, opt.limit).await,
        Command::Top(opt) => cli::top(&ctx, opt.kind, opt.range, opt.limit).await,
        Command::Playlists(opt) => cli::playlists(&ctx, opt.limit).await,
        Command::Playlist(opt) => cli::playlist(&ctx, &opt.id).await,
        Command::Search(opt) => cli::search(&ctx, &opt.query, &opt.types, opt.limit).await,
        Command::Receipt(opt) => cli::receipt(&ctx, opt.kind, opt.range, opt.limit).await,
        Command::Completions(_) => {}
    }
}
