use chrono::Utc;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use gatehouse_auth::TokenIssuer;
use gatehouse_cli::commands::{create_user, issue_token, purge_expired};
use gatehouse_config::AppConfig;
use gatehouse_db::{PgPool, PgTokenStore, PgUserStore, init_db_pool, run_migrations};
use gatehouse_models::roles;
use gatehouse_observability::init_basic_console_logging;

#[derive(Parser)]
#[command(name = "gatehouse-cli")]
#[command(about = "Gatehouse CLI - Administrative tools for Gatehouse", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user account
    CreateUser {
        /// Email address
        #[arg(short = 'e', long)]
        email: String,

        /// Role checked by access guards
        #[arg(short = 'r', long, default_value = roles::USER)]
        role: String,
    },
    /// Issue an auth token for an existing user and print it
    IssueToken {
        /// Email address of the token owner
        #[arg(short = 'e', long)]
        email: String,
    },
    /// Delete auth tokens older than TOKEN_EXPIRATION_MS
    PurgeExpired,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_basic_console_logging();

    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail("Invalid configuration", e),
    };

    let pool = connect(&config).await;

    match cli.command {
        Commands::CreateUser { email, role } => {
            let users = PgUserStore::new(pool);
            match create_user(&users, &email, &role).await {
                Ok(user) => {
                    println!("\n✅ User created successfully!");
                    println!("   ID: {}", user.id);
                    println!("   Email: {}", user.email);
                    println!("   Role: {}", user.role);
                }
                Err(e) => fail("Error creating user", e),
            }
        }
        Commands::IssueToken { email } => {
            let users = PgUserStore::new(pool.clone());
            let tokens = PgTokenStore::new(pool);
            let issuer = TokenIssuer::new(&config.jwt);
            match issue_token(&users, &tokens, &issuer, &email).await {
                Ok(token) => println!("{token}"),
                Err(e) => fail("Error issuing token", e),
            }
        }
        Commands::PurgeExpired => {
            let tokens = PgTokenStore::new(pool);
            match purge_expired(&tokens, config.auth.token_expiration, Utc::now()).await {
                Ok(deleted) => println!("✅ Deleted {deleted} expired tokens"),
                Err(e) => fail("Error purging tokens", e),
            }
        }
    }
}

async fn connect(config: &AppConfig) -> PgPool {
    let pool = match init_db_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => fail("Failed to connect to database", e),
    };

    if let Err(e) = run_migrations(&pool).await {
        fail("Failed to run migrations", e);
    }

    pool
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ {context}: {err}");
    std::process::exit(1);
}
