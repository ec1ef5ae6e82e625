use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chapel::app::AppContext;
use chapel::cli::{commands, Cli, Commands, ConfigAction};
use chapel::domain::ContentKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Commands::Config {
        action: ConfigAction::Path,
    } = cli.command
    {
        commands::config_path(cli.config.as_deref())?;
        return Ok(());
    }

    let ctx = AppContext::new(cli.config.as_deref())?;

    match cli.command {
        Commands::Verse { date, share } => {
            commands::show_verse(&ctx, date, share).await?;
        }
        Commands::Home => {
            commands::show_home(&ctx).await?;
        }
        Commands::Events => {
            commands::list_events(&ctx).await?;
        }
        Commands::Event {
            slug,
            calendar,
            open,
        } => {
            commands::show_event(&ctx, &slug, calendar, open).await?;
        }
        Commands::Banners => {
            commands::list_collection(&ctx, ContentKind::Banner).await?;
        }
        Commands::Gallery => {
            commands::list_collection(&ctx, ContentKind::Gallery).await?;
        }
        Commands::Posts => {
            commands::list_collection(&ctx, ContentKind::FacebookPost).await?;
        }
        Commands::Slideshow {
            kind,
            interval,
            rounds,
        } => {
            commands::slideshow(&ctx, kind, interval.as_deref(), rounds).await?;
        }
        Commands::Watch { kind, period } => {
            commands::watch(&ctx, kind, period.as_deref()).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::show_config(&ctx),
            ConfigAction::Path => unreachable!("handled before loading config"),
        },
    }

    Ok(())
}
