//! LotMarket CLI - marketplace client from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in and persist the session
//! lm-cli login -e a@b.com -p secret
//!
//! # Who am I? (refreshes the stored identity)
//! lm-cli whoami
//!
//! # Browse the catalog
//! lm-cli games list
//! lm-cli lots list --game-id 1
//!
//! # Sell something
//! lm-cli lots create --title "Gold, 100k" --description "Fast delivery" \
//!     --price 19.99 --game-id 1 --category-id 3
//!
//! # My orders
//! lm-cli orders list
//!
//! # End the session
//! lm-cli logout
//! ```
//!
//! # Environment Variables
//!
//! - `LOTMARKET_API_URL` - API base address (release builds)
//! - `LOTMARKET_STATE_DIR` - Directory for the persisted session

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "lm-cli")]
#[command(author, version, about = "LotMarket command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        /// Email or username
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Register a new account (implicitly logs in)
    Register {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Public display name
        #[arg(short, long)]
        display_name: Option<String>,
    },
    /// End the session
    Logout,
    /// Show the current identity, refreshed from the server
    Whoami,
    /// Browse the game catalog
    Games {
        #[command(subcommand)]
        action: GamesAction,
    },
    /// Browse and manage lots
    Lots {
        #[command(subcommand)]
        action: LotsAction,
    },
    /// Browse your orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum GamesAction {
    /// List games
    List {
        /// Full-text search
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one game
    Show {
        /// Game ID
        id: i32,
    },
}

#[derive(Subcommand)]
enum LotsAction {
    /// List lots
    List {
        /// Restrict to one game
        #[arg(long)]
        game_id: Option<i32>,

        /// Full-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of lots to return
        #[arg(short, long)]
        limit: Option<i64>,
    },
    /// Show one lot
    Show {
        /// Lot ID
        id: i32,
    },
    /// Create a lot (sellers only)
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// Price, e.g. 19.99
        #[arg(long)]
        price: rust_decimal::Decimal,

        #[arg(long)]
        game_id: i32,

        #[arg(long)]
        category_id: i32,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List your orders
    List,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&email, SecretString::from(password)).await?;
        }
        Commands::Register {
            username,
            email,
            password,
            display_name,
        } => {
            commands::auth::register(&username, &email, SecretString::from(password), display_name)
                .await?;
        }
        Commands::Logout => commands::auth::logout().await?,
        Commands::Whoami => commands::auth::whoami().await?,
        Commands::Games { action } => match action {
            GamesAction::List { search } => commands::catalog::games_list(search).await?,
            GamesAction::Show { id } => commands::catalog::games_show(id.into()).await?,
        },
        Commands::Lots { action } => match action {
            LotsAction::List {
                game_id,
                search,
                limit,
            } => {
                commands::catalog::lots_list(game_id.map(Into::into), search, limit).await?;
            }
            LotsAction::Show { id } => commands::catalog::lots_show(id.into()).await?,
            LotsAction::Create {
                title,
                description,
                price,
                game_id,
                category_id,
            } => {
                commands::catalog::lots_create(
                    title,
                    description,
                    price,
                    game_id.into(),
                    category_id.into(),
                )
                .await?;
            }
        },
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list().await?,
        },
    }
    Ok(())
}
