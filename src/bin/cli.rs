//! Groceries CLI
//!
//! Command-line interface that runs the store in-process and prints one
//! JSON response per operation.

use std::io::{self, BufReader};

use clap::{Parser, Subcommand};
use groceries::model::{CategoryPatch, Id, ItemPatch, NewCategory, NewItem, Unit};
use groceries::protocol::{read_command, write_response, Command, Response};
use groceries::{Config, Engine, GroceryError, StorageBackend, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// Groceries CLI
#[derive(Parser, Debug)]
#[command(name = "groceries-cli")]
#[command(about = "Manage a persistent grocery list")]
#[command(version)]
struct Args {
    /// Data directory holding groceries.json
    #[arg(short, long, default_value = "./groceries_data")]
    data_dir: String,

    /// Keep the list in memory only (starts from seed data)
    #[arg(long)]
    memory: bool,

    /// Skip fsync when writing snapshots
    #[arg(long)]
    no_fsync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show categories with their items
    List,

    /// Show list statistics
    Stats,

    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Manage items
    #[command(subcommand)]
    Item(ItemCommands),

    /// Read JSON-line commands from stdin, write JSON-line responses
    Exec,
}

#[derive(Subcommand, Debug)]
enum CategoryCommands {
    /// Create a category
    Add {
        name: String,

        #[arg(long)]
        order: Option<i64>,

        /// Create it collapsed
        #[arg(long)]
        collapsed: bool,
    },

    /// Change fields of a category
    Update {
        id: Id,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        order: Option<i64>,

        #[arg(long)]
        expanded: Option<bool>,
    },

    /// Delete a category and all of its items
    Delete { id: Id },
}

#[derive(Subcommand, Debug)]
enum ItemCommands {
    /// Create an item
    Add {
        name: String,

        #[arg(short, long)]
        category: Option<Id>,

        #[arg(short, long)]
        quantity: Option<u32>,

        /// Nos., Gms. or Kgs.
        #[arg(short, long)]
        unit: Option<Unit>,

        #[arg(short, long)]
        price: Option<String>,

        #[arg(long)]
        color: Option<u8>,

        #[arg(long)]
        order: Option<i64>,
    },

    /// Change fields of an item
    Update {
        id: Id,

        #[arg(short, long, conflicts_with = "no_category")]
        category: Option<Id>,

        /// Detach the item from its category
        #[arg(long)]
        no_category: bool,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        quantity: Option<u32>,

        #[arg(short, long)]
        unit: Option<Unit>,

        #[arg(short, long)]
        price: Option<String>,

        #[arg(long)]
        color: Option<u8>,

        #[arg(long)]
        checked: Option<bool>,

        #[arg(long)]
        order: Option<i64>,
    },

    /// Delete an item
    Delete { id: Id },

    /// Mark an item as acquired
    Check { id: Id },

    /// Mark an item as not yet acquired
    Uncheck { id: Id },

    /// Advance the item's color tag to the next one
    CycleColor { id: Id },
}

fn main() {
    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,groceries=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .backend(if args.memory {
            StorageBackend::Memory
        } else {
            StorageBackend::File
        })
        .sync_strategy(if args.no_fsync {
            SyncStrategy::OsBuffered
        } else {
            SyncStrategy::EveryWrite
        })
        .build();

    let engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    let ok = match args.command {
        Commands::Exec => run_exec(&engine),
        other => match to_command(&engine, other) {
            Some(command) => emit(&engine.execute(command)),
            None => false,
        },
    };

    if let Err(e) = engine.close() {
        tracing::error!("Snapshot could not be written on close: {}", e);
        std::process::exit(2);
    }

    if !ok {
        std::process::exit(1);
    }
}

/// Translate a CLI subcommand into a protocol command
fn to_command(engine: &Engine, command: Commands) -> Option<Command> {
    let command = match command {
        Commands::List => Command::ListCategories,
        Commands::Stats => Command::Stats,
        Commands::Exec => return None,

        Commands::Category(CategoryCommands::Add {
            name,
            order,
            collapsed,
        }) => Command::CreateCategory(NewCategory {
            name,
            is_expanded: collapsed.then_some(false),
            order,
        }),
        Commands::Category(CategoryCommands::Update {
            id,
            name,
            order,
            expanded,
        }) => Command::UpdateCategory {
            id,
            patch: CategoryPatch {
                name,
                is_expanded: expanded,
                order,
            },
        },
        Commands::Category(CategoryCommands::Delete { id }) => Command::DeleteCategory { id },

        Commands::Item(ItemCommands::Add {
            name,
            category,
            quantity,
            unit,
            price,
            color,
            order,
        }) => Command::CreateItem(NewItem {
            category_id: category,
            name,
            quantity,
            unit,
            reference_price: price,
            color_state: color,
            checked: None,
            order,
        }),
        Commands::Item(ItemCommands::Update {
            id,
            category,
            no_category,
            name,
            quantity,
            unit,
            price,
            color,
            checked,
            order,
        }) => Command::UpdateItem {
            id,
            patch: ItemPatch {
                category_id: if no_category { Some(None) } else { category.map(Some) },
                name,
                quantity,
                unit,
                reference_price: price,
                color_state: color,
                checked,
                order,
            },
        },
        Commands::Item(ItemCommands::Delete { id }) => Command::DeleteItem { id },
        Commands::Item(ItemCommands::Check { id }) => Command::UpdateItem {
            id,
            patch: ItemPatch::checked(true),
        },
        Commands::Item(ItemCommands::Uncheck { id }) => Command::UpdateItem {
            id,
            patch: ItemPatch::checked(false),
        },
        Commands::Item(ItemCommands::CycleColor { id }) => match engine.get_item(id) {
            Some(item) => Command::UpdateItem {
                id,
                patch: ItemPatch::color_state(item.next_color_state()),
            },
            None => {
                emit(&Response::not_found(format!("item {}", id)));
                return None;
            }
        },
    };

    Some(command)
}

/// Serve commands from stdin until EOF
fn run_exec(engine: &Engine) -> bool {
    let mut reader = BufReader::new(io::stdin().lock());
    let mut stdout = io::stdout().lock();

    loop {
        let response = match read_command(&mut reader) {
            Ok(Some(command)) => engine.execute(command),
            Ok(None) => return true,
            Err(e @ GroceryError::Protocol(_)) => Response::invalid(e.to_string()),
            Err(e) => {
                tracing::error!("Failed to read command: {}", e);
                return false;
            }
        };

        if let Err(e) = write_response(&mut stdout, &response) {
            tracing::error!("Failed to write response: {}", e);
            return false;
        }
    }
}

/// Print a response; returns whether it was OK
fn emit(response: &Response) -> bool {
    if let Err(e) = write_response(&mut io::stdout().lock(), response) {
        tracing::error!("Failed to write response: {}", e);
        return false;
    }
    response.is_ok()
}
