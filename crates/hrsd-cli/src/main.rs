use anyhow::Result;
use hrsd_cli::{Cli, Commands, Parser};

fn main() -> Result<()> {
    // .env may hold GROQ_API_KEY / GROQ_MODEL_ID
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "error" => tracing::Level::ERROR,
        "warn" => tracing::Level::WARN,
        "info" => tracing::Level::INFO,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let store = cli.store;
    match cli.command {
        Commands::Submit(args) => args.run(store),
        Commands::List(args) => args.run(store),
        Commands::Show(args) => args.run(store),
        Commands::Update(args) => args.run(store),
        Commands::Attach(args) => args.run(store),
        Commands::Dashboard(args) => args.run(store),
        Commands::Settings { subcommand } => subcommand.run(store),
        Commands::Chat(args) => args.run(store),
    }
}
