use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub snapshot_path: PathBuf,
    pub auto_generate_period_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        Ok(Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8082".to_string())
                .parse()?,
            snapshot_path: env::var("SNAPSHOT_PATH")
                .unwrap_or_else(|_| "transactions.json".to_string())
                .into(),
            auto_generate_period_secs: env::var("AUTO_GENERATE_PERIOD_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()?,
        })
    }
}
