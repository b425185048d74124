use stage_plotter::Plotter;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,stage_plotter=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut plotter = Plotter::new();
    let result = plotter
        .parse_arguments(std::env::args().skip(1))
        .and_then(|_| plotter.process());

    match result {
        Ok(rendered) => {
            tracing::info!(count = rendered.len(), "batch finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}: {}", e.title(), e.user_message());
            ExitCode::FAILURE
        }
    }
}
