use quadrant_planner::{PlannerConfig, app};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quadrant_planner=info")),
        )
        .init();

    let config = PlannerConfig::from_env()?;
    tracing::info!(data_dir = %config.data_dir.display(), shell = ?config.shell_file, "starting");
    app::run(config)?;
    Ok(())
}
