//! Schema migration and demo-seed CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

use orgatlas_store::{
    ActivityStore, BuildingStore, NewActivity, NewBuilding, NewOrganization, OrganizationStore,
};

#[derive(Parser)]
#[command(name = "orgatlas-migrate", about = "Run schema migrations and seed demo data")]
struct Cli {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending schema migrations
    Migrate,
    /// Apply migrations, then insert the demo dataset into a fresh database
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&cli.database_url)
        .await?;

    match cli.command {
        Command::Migrate => {
            orgatlas_store::migrate(&pool).await?;
            info!("Migrations applied");
        }
        Command::Seed => {
            orgatlas_store::migrate(&pool).await?;
            seed(&pool).await?;
            info!("Seed data inserted");
        }
    }

    Ok(())
}

/// Two buildings, a two-root three-level taxonomy, and two organizations
/// tagged with leaf activities. Enough data to exercise every search mode.
async fn seed(pool: &PgPool) -> Result<()> {
    let buildings = BuildingStore::new(pool.clone());
    let activities = ActivityStore::new(pool.clone());
    let organizations = OrganizationStore::new(pool.clone());

    let hq = buildings
        .create(NewBuilding {
            address: "Moscow, Lenina st. 1, office 3".into(),
            latitude: 55.7558,
            longitude: 37.6173,
        })
        .await?;
    let branch = buildings
        .create(NewBuilding {
            address: "Saint Petersburg, Nevsky prospect 10".into(),
            latitude: 59.9343,
            longitude: 30.3351,
        })
        .await?;

    let food = activities
        .create(NewActivity { name: "Food".into(), parent_id: None })
        .await?;
    let meat = activities
        .create(NewActivity { name: "Meat products".into(), parent_id: Some(food.id) })
        .await?;
    let dairy = activities
        .create(NewActivity { name: "Dairy products".into(), parent_id: Some(food.id) })
        .await?;
    let cars = activities
        .create(NewActivity { name: "Cars".into(), parent_id: None })
        .await?;
    let trucks = activities
        .create(NewActivity { name: "Trucks".into(), parent_id: Some(cars.id) })
        .await?;
    let parts = activities
        .create(NewActivity { name: "Spare parts".into(), parent_id: Some(cars.id) })
        .await?;

    organizations
        .create(NewOrganization {
            name: "Horns and Hooves LLC".into(),
            phone_numbers: vec!["2-222-222".into(), "8-923-666-13-13".into()],
            building_id: hq.id,
            activity_ids: vec![meat.id, dairy.id],
        })
        .await?;
    organizations
        .create(NewOrganization {
            name: "AutoPlus JSC".into(),
            phone_numbers: vec!["3-333-333".into()],
            building_id: branch.id,
            activity_ids: vec![trucks.id, parts.id],
        })
        .await?;

    Ok(())
}
