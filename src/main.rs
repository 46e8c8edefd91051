use clap::Parser;
use roomchat::core::config::{self, CliOverrides};
use roomchat::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "roomchat", about = "Terminal client for WebSocket chat rooms")]
struct Args {
    /// Server origin, e.g. https://chat.example.com
    #[arg(long)]
    server: Option<String>,

    /// Name to chat as
    #[arg(short, long)]
    user: Option<String>,

    /// Room to join at startup
    #[arg(short, long)]
    room: Option<String>,

    /// Log level written to roomchat.log
    #[arg(long, default_value_t = LevelFilter::Debug)]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to roomchat.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("roomchat.log") {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        config::RoomchatConfig::default()
    });
    let overrides = CliOverrides {
        server: args.server.as_deref(),
        user: args.user.as_deref(),
        room: args.room.as_deref(),
    };
    let resolved = config::resolve(&file_config, overrides).map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!(
        "roomchat starting up as {} against {}",
        resolved.username,
        resolved.server_origin
    );

    tui::run(resolved)
}
