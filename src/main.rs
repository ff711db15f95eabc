//! Diet Planner
//!
//! An MCP server for diet tracking and meal planning.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use dietplan::mcp::DietPlanService;
use dietplan::nutritionix::{NutritionixClient, NutritionixError};
use dietplan::{build_info, config, db};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dietplan=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let db_path = config::database_path();
    eprintln!("Database path: {}", db_path.display());

    // Ensure data directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = db::Database::open(&db_path)?;

    let nutritionix = match NutritionixClient::from_env() {
        Ok(client) => {
            tracing::info!(base_url = client.base_url(), "Nutritionix lookups enabled");
            Some(client)
        }
        Err(NutritionixError::MissingCredentials) => {
            tracing::warn!("Nutritionix credentials not set; search_foods and instant_search_foods are disabled");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let service = DietPlanService::new(db_path, database, nutritionix);

    // Create stdio transport
    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;
    tracing::info!("MCP server running");

    server.waiting().await?;

    Ok(())
}
