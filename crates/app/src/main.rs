//! Sewa Application CLI

use std::process;

use clap::{Args, Parser, Subcommand};
use sewa_app::{
    calendar::{BusinessCalendar, DEFAULT_BUSINESS_TIMEZONE},
    database::{self, Db},
    domain::{
        bookings::{BookingsService, PgBookingsService},
        customers::{
            CustomersService, PgCustomersService,
            data::NewCustomer,
            records::{CustomerUuid, Role},
        },
    },
};
use sqlx::PgPool;

#[derive(Debug, Parser)]
#[command(name = "sewa-app", about = "Sewa CLI", long_about = None)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    Customer(CustomerCommand),
    Bookings(BookingsCommand),
}

#[derive(Debug, Args)]
struct CustomerCommand {
    #[command(subcommand)]
    command: CustomerSubcommand,
}

#[derive(Debug, Subcommand)]
enum CustomerSubcommand {
    /// Create a customer and print its API token
    Create(CreateCustomerArgs),
}

#[derive(Debug, Args)]
struct CreateCustomerArgs {
    /// Customer display name
    #[arg(long)]
    name: String,

    /// Grant the admin role
    #[arg(long)]
    admin: bool,
}

#[derive(Debug, Args)]
struct BookingsCommand {
    #[command(subcommand)]
    command: BookingsSubcommand,
}

#[derive(Debug, Subcommand)]
enum BookingsSubcommand {
    /// Complete every rental whose return date has passed
    CompleteExpired(CompleteExpiredArgs),
}

#[derive(Debug, Args)]
struct CompleteExpiredArgs {
    /// IANA time zone of the business calendar
    #[arg(long, env = "BUSINESS_TIMEZONE", default_value = DEFAULT_BUSINESS_TIMEZONE)]
    timezone: String,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let pool = connect(cli.database_url.as_deref()).await?;

    match cli.command {
        Commands::Migrate => {
            database::migrate(&pool)
                .await
                .map_err(|error| format!("failed to apply migrations: {error}"))?;

            println!("migrations applied");

            Ok(())
        }
        Commands::Customer(CustomerCommand {
            command: CustomerSubcommand::Create(args),
        }) => create_customer(pool, args).await,
        Commands::Bookings(BookingsCommand {
            command: BookingsSubcommand::CompleteExpired(args),
        }) => complete_expired(pool, args).await,
    }
}

async fn connect(database_url: Option<&str>) -> Result<PgPool, String> {
    let url = database_url.ok_or("DATABASE_URL is not set")?;

    database::connect(url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}

async fn create_customer(pool: PgPool, args: CreateCustomerArgs) -> Result<(), String> {
    let service = PgCustomersService::new(Db::new(pool));

    let issued = service
        .create_customer(NewCustomer {
            uuid: CustomerUuid::new(),
            name: args.name,
            role: if args.admin { Role::Admin } else { Role::Customer },
        })
        .await
        .map_err(|error| format!("failed to create customer: {error}"))?;

    println!("customer_uuid: {}", issued.customer.uuid);
    println!("customer_name: {}", issued.customer.name);
    println!("role: {}", issued.customer.role);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}

async fn complete_expired(pool: PgPool, args: CompleteExpiredArgs) -> Result<(), String> {
    let calendar = BusinessCalendar::from_name(&args.timezone)
        .map_err(|error| format!("unknown time zone '{}': {error}", args.timezone))?;

    let service = PgBookingsService::new(Db::new(pool), calendar);

    let completed = service
        .complete_expired()
        .await
        .map_err(|error| format!("failed to complete expired bookings: {error}"))?;

    println!("completed: {completed}");

    Ok(())
}
