use anyhow::{Context, Result};
use log::info;
use mongodb::{Client, Database, bson::doc};

use crate::config::app_config::AppConfig;

/// Connect to MongoDB and verify the connection with a ping.
pub async fn get_database(config: &AppConfig) -> Result<Database> {
    let client = Client::with_uri_str(&config.mongodb_uri)
        .await
        .context("Failed to create MongoDB client")?;
    let db = client.database(&config.database_name);

    db.run_command(doc! { "ping": 1 })
        .await
        .context("MongoDB did not answer ping")?;

    info!("Connected to MongoDB database '{}'", config.database_name);
    Ok(db)
}
