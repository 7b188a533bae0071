use clap::Parser;
use sitrep::cli::{
    handle_ingest, handle_migrate, handle_parse, handle_show, handle_validate, Cli, Commands,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sitrep=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate { reports_dir } => handle_migrate(&cli.db, &reports_dir),
        Commands::Parse { file, json } => handle_parse(&file, json),
        Commands::Ingest { file, replace } => handle_ingest(&cli.db, &file, replace),
        Commands::Show { date, json } => handle_show(&cli.db, &date, json),
        Commands::Validate => handle_validate(&cli.db),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
