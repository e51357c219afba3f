use clap::Parser;
use lockvault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Register => lockvault::cli::commands::register::execute(&cli),
        Commands::Add {
            ref title,
            ref username,
            ref website,
            ref notes,
        } => lockvault::cli::commands::add::execute(
            &cli,
            title,
            username.as_deref(),
            website.as_deref(),
            notes.as_deref(),
        ),
        Commands::List { json } => lockvault::cli::commands::list::execute(&cli, json),
        Commands::Show { id, reconfirm } => {
            lockvault::cli::commands::show::execute(&cli, id, reconfirm)
        }
        Commands::Update {
            id,
            ref title,
            ref username,
            secret,
            ref website,
            ref notes,
        } => lockvault::cli::commands::update::execute(
            &cli,
            id,
            title.as_deref(),
            username.as_deref(),
            secret,
            website.as_deref(),
            notes.as_deref(),
        ),
        Commands::Delete { id, force } => lockvault::cli::commands::delete::execute(&cli, id, force),
        Commands::Generate { length } => lockvault::cli::commands::generate::execute(length),
        #[cfg(feature = "audit-log")]
        Commands::Audit { last, ref since } => {
            lockvault::cli::commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { ref shell } => {
            lockvault::cli::commands::completions::execute(shell)
        }
    };

    if let Err(e) = result {
        lockvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
