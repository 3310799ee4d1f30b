use anyhow::Result;
use connect_four_ai::player::ai::AIConfig;
use connect_four_ai::selfplay::{run_selfplay, SelfPlayConfig};
use tracing::info;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    init_tracing("info")?;

    // Optional path to a config file; otherwise ./ai_config.json or defaults.
    let config = match std::env::args().nth(1) {
        Some(path) => AIConfig::load_from(&path)?,
        None => AIConfig::get().clone(),
    };
    info!(
        strategy = ?config.search.strategy,
        depth = config.search.depth,
        mode = ?config.game.mode,
        stochastic = config.game.stochastic,
        games = config.game.num_games,
        "starting self-play"
    );

    let stats = run_selfplay(SelfPlayConfig::from_ai_config(&config))?;

    if let Some(board) = &stats.last_board {
        println!("{}", board);
    }
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
