use std::sync::Arc;

use anyhow::Context;
use blog::config::{self, CliArgs, Config, LogFormat};
use blog::{create_app, db, run_migrations, AppState};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Installs the global subscriber
///
/// Console output follows `log_format`. When `log_dir` is set, events are
/// also written as JSON to a daily rolling file; the returned guard flushes
/// it on drop.
fn init_tracing(config: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = match config.log_format {
        LogFormat::Json => fmt::layer().json().with_current_span(true).with_target(true).boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
    };

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "blog-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer).with_ansi(false).boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = config::get_config(CliArgs::parse());
    let _guard = init_tracing(&config)?;

    let pool = db::init_pool(&config.database_url)
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    {
        let mut conn = pool.get()?;
        run_migrations(&mut conn)?;
    }

    let state = AppState::from_config(Arc::new(pool), &config);
    let app = create_app(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
