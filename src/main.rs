//! PrismDB column default resolver - Main Entry Point
//!
//! Resolves `DEFAULT` expressions the way DDL does and prints what they
//! resolve to, either for `-e` arguments or in an interactive shell.

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prism_defaults::common::VERSION;
use prism_defaults::{
    ColumnInfo, Database, DatabaseConfig, ExecutionContext, Expression, LogicalType, PrismDBResult,
};

#[derive(Parser)]
#[command(name = "prism-defaults")]
#[command(about = "Resolve PrismDB column default expressions")]
#[command(version = VERSION)]
struct Cli {
    /// Default expression to resolve, e.g. `-e "(RAND() + 5)"`; may repeat
    #[arg(short = 'e', long = "expression")]
    expressions: Vec<String>,

    /// List the functions allowed in column defaults
    #[arg(short, long)]
    list_functions: bool,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// User the session runs as
    #[arg(short, long)]
    user: Option<String>,

    /// Column type to store the value as, e.g. `INT` or `VARCHAR(20)`
    #[arg(short = 't', long = "type")]
    column_type: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(config: &DatabaseConfig, verbose: bool) {
    let directive = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let filter = match "rustyline=off".parse() {
        Ok(off) => filter.add_directive(off),
        Err(_) => filter,
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
    {
        eprintln!("Unable to set up logging: {}", e);
    }
}

/// Resolve one default and print its text, classification, type and value
fn resolve(
    database: &Database,
    ctx: &ExecutionContext,
    column: Option<&ColumnInfo>,
    text: &str,
) -> PrismDBResult<()> {
    let ctx = ctx.next_statement();
    let default = database.column_default(&ctx, text)?;
    let value = default.evaluate(&ctx, &[])?;

    println!("default:       {}", default);
    println!(
        "kind:          {}",
        if default.is_literal() { "literal" } else { "expression" }
    );
    println!("type:          {}", default.return_type());
    println!("nullable:      {}", default.is_nullable());
    println!("deterministic: {}", default.is_deterministic());
    println!("value:         {}", value);

    if let Some(column) = column {
        let stored = column.clone().with_default(default).default_for_insert(&ctx)?;
        println!("stored as {}: {}", column.column_type, stored);
    }
    Ok(())
}

fn list_functions(database: &Database) {
    for name in database.column_defaults().allowed_default_functions().list_functions() {
        println!("{}", name.to_uppercase());
    }
}

fn print_help() {
    println!(".exit, .quit       Exit the shell");
    println!(".functions         List functions allowed in column defaults");
    println!(".help              Show this help");
    println!(".version           Show version");
    println!();
    println!("Any other line is resolved as a column default, e.g. (NOW() + 0)");
}

/// Returns true when the shell should exit
fn handle_special_command(command: &str, database: &Database) -> bool {
    let cmd = command.split_whitespace().next().unwrap_or("");
    match cmd {
        ".exit" | ".quit" => {
            println!("Goodbye!");
            true
        }
        ".help" => {
            print_help();
            false
        }
        ".functions" => {
            list_functions(database);
            false
        }
        ".version" => {
            println!("prism-defaults v{}", VERSION);
            false
        }
        _ => {
            println!("Unknown command: {}", cmd);
            println!("Type '.help' for list of available commands.");
            false
        }
    }
}

fn run_interactive_mode(
    database: &Database,
    ctx: &ExecutionContext,
    column: Option<&ColumnInfo>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("prism-defaults v{}", VERSION);
    println!("Enter '.help' for usage hints.");
    println!();

    let mut rl = DefaultEditor::new()?;
    let history_file = dirs::home_dir()
        .map(|mut path| {
            path.push(".prism_defaults_history");
            path
        })
        .unwrap_or_else(|| std::path::PathBuf::from(".prism_defaults_history"));

    let _ = rl.load_history(&history_file);

    loop {
        match rl.readline("default> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                if trimmed.starts_with('.') {
                    if handle_special_command(trimmed, database) {
                        break;
                    }
                    continue;
                }

                if let Err(e) = resolve(database, ctx, column, trimmed.trim_end_matches(';')) {
                    eprintln!("Error: {}", e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!("exit");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(&history_file);
    database.disconnect(ctx);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DatabaseConfig::from_json_file(path)?,
        None => DatabaseConfig::in_memory(),
    };
    init_logging(&config, cli.verbose);

    let database = Database::new(config)?;
    let ctx = database.connect(cli.user.as_deref().unwrap_or(""));
    let column = cli
        .column_type
        .as_deref()
        .map(|name| LogicalType::from_sql_name(name).map(|t| ColumnInfo::new("value", t)))
        .transpose()?;

    if cli.list_functions {
        list_functions(&database);
    }

    if !cli.expressions.is_empty() {
        let mut failed = false;
        for text in &cli.expressions {
            if let Err(e) = resolve(&database, &ctx, column.as_ref(), text) {
                eprintln!("Error resolving {}: {}", text, e);
                failed = true;
            }
        }
        if failed {
            process::exit(1);
        }
    } else if cli.interactive {
        run_interactive_mode(&database, &ctx, column.as_ref())?;
    } else if !cli.list_functions {
        println!("Please provide --expression, --list-functions or --interactive");
        process::exit(1);
    }

    Ok(())
}
