//! Command-line front end for the leadboard engine.
//!
//! # Responsibility
//! - Turn subcommands into engine intents and print the outcome.
//! - Own process setup: store path, logging, engine policy.

use clap::{Args, Parser, Subcommand};
use leadboard_core::db::open_db;
use leadboard_core::{
    default_log_level, init_logging, open_engine, Card, CardFields, EngineConfig, Intent,
    MirrorRetention, Outcome, Priority, SystemClock,
};
use log::error;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "leadboard", version, about = "Sales pipeline board")]
struct Cli {
    /// SQLite file holding the board.
    #[arg(long, env = "LEADBOARD_DB", default_value = "leadboard.db")]
    db: PathBuf,
    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "LEADBOARD_LOG_DIR")]
    log_dir: Option<PathBuf>,
    #[arg(long, env = "LEADBOARD_LOG_LEVEL")]
    log_level: Option<String>,
    /// Drop mirrored records when their card is deleted.
    #[arg(long)]
    cascade_deletes: bool,
    /// Skip first-run sample cards.
    #[arg(long)]
    no_seed: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a card on a list.
    Create {
        list_id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Replace the editable fields of a card.
    Edit {
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Move a card to another list.
    Move { id: String, list_id: String },
    /// Copy a card onto the orders intake list.
    Duplicate { id: String },
    /// Flip one checklist step.
    Toggle { id: String, item_id: u32 },
    Delete { id: String },
    /// List cards, optionally for one board.
    List {
        #[arg(long)]
        board: Option<String>,
    },
    /// Print one card as JSON.
    Show { id: String },
    /// Write the record mirror export into a directory.
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Insert sample cards if the board is empty.
    Seed,
}

#[derive(Debug, Args)]
struct FieldArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    company: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    value: f64,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "medium", value_parser = parse_priority)]
    priority: Priority,
    #[arg(long, default_value = "")]
    comments: String,
}

impl From<FieldArgs> for CardFields {
    fn from(args: FieldArgs) -> Self {
        Self {
            client_name: args.name,
            client_company: args.company,
            client_phone: args.phone,
            client_email: args.email,
            deal_value: args.value,
            deal_description: args.description,
            priority: args.priority,
            comments: args.comments,
        }
    }
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::parse(value).ok_or_else(|| format!("unknown priority `{value}`"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let config = EngineConfig {
        mirror_retention: if cli.cascade_deletes {
            MirrorRetention::Cascade
        } else {
            MirrorRetention::Retain
        },
        seed_when_empty: !cli.no_seed && !matches!(cli.command, Command::Seed),
    };
    let conn = open_db(&cli.db)?;
    let mut engine = open_engine(&conn, SystemClock, config)?;

    let intent = match cli.command {
        Command::Create { list_id, fields } => Intent::CreateCard {
            fields: fields.into(),
            list_id,
        },
        Command::Edit { id, fields } => Intent::EditCard {
            id,
            fields: fields.into(),
        },
        Command::Move { id, list_id } => Intent::MoveCard { id, list_id },
        Command::Duplicate { id } => Intent::DuplicateCard { id },
        Command::Toggle { id, item_id } => Intent::ToggleChecklistItem { id, item_id },
        Command::Delete { id } => Intent::DeleteCard { id },
        Command::List { board } => {
            let board = board.map(|name| name.to_ascii_lowercase());
            for card in engine.cards() {
                if board.as_deref().map_or(true, |name| name == card.board().as_str()) {
                    println!("{}", summary(card));
                }
            }
            return Ok(());
        }
        Command::Show { id } => {
            match engine.get(&id) {
                Some(card) => println!("{}", serde_json::to_string_pretty(card)?),
                None => return Err(format!("card not found: {id}").into()),
            }
            return Ok(());
        }
        Command::Export { dir } => {
            let path = engine.export_document()?.write_to_dir(dir)?;
            println!("exported {}", path.display());
            return Ok(());
        }
        Command::Seed => {
            let inserted = engine.seed_if_empty()?;
            println!("seeded {inserted} cards");
            return Ok(());
        }
    };

    match engine.handle(intent)? {
        Outcome::Created(card) => println!("created {}", summary(&card)),
        Outcome::Edited(card) => println!("edited {}", summary(&card)),
        Outcome::Moved { card, transition } => println!(
            "moved {} from {} to {}",
            card.id(),
            transition.from.as_str().to_uppercase(),
            transition.to.as_str().to_uppercase()
        ),
        Outcome::Unchanged => println!("card already on that list"),
        Outcome::Duplicated(card) => println!("duplicated into orders as {}", card.id()),
        Outcome::Toggled(card) => {
            let progress = card.checklist_progress();
            println!(
                "{} steps {}/{} ({}%)",
                card.id(),
                progress.completed,
                progress.total,
                progress.percent()
            );
        }
        Outcome::Ignored => println!("no such checklist step"),
        Outcome::Deleted { id, existed: true } => println!("deleted {id}"),
        Outcome::Deleted { id, existed: false } => println!("no card {id}"),
    }
    Ok(())
}

fn summary(card: &Card) -> String {
    let mut line = format!(
        "{}  [{}/{}]  {} | {} | {:.2} | {}",
        card.id(),
        card.board(),
        card.list_id(),
        card.fields.client_name,
        card.fields.client_company,
        card.fields.deal_value,
        card.fields.priority.as_str()
    );
    if card.checklist().is_some() {
        let progress = card.checklist_progress();
        line.push_str(&format!("  steps {}/{}", progress.completed, progress.total));
    }
    line
}
