use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "shelf", version, about = "ISBN-keyed book catalog service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Print the resolved settings and exit
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!(env = ?settings.environment, "starting shelf server");
            shelf_app::serve(settings, shelf_http::shutdown_signal()).await
        }
        Command::Migrate => {
            let db = shelf_db::Database::connect(&settings.database).await?;
            let registry = shelf_app::registry(&db);
            let applied = shelf_app::migrate(&registry, &db).await;
            db.close().await;

            let applied = applied?;
            println!("applied {} migration(s)", applied);
            Ok(())
        }
        Command::Config => {
            println!("{:#?}", settings);
            Ok(())
        }
    }
}
