use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// MongoDB connection URL
    #[serde(default = "default_mongodb_url")]
    pub mongodb_url: String,

    /// MongoDB database name
    #[serde(default = "default_mongodb_db")]
    pub mongodb_db: String,

    /// HMAC secret used to sign and verify access tokens
    pub jwt_secret: String,

    /// Access token lifetime in minutes
    #[serde(default = "default_jwt_expiry_mins")]
    pub jwt_expiry_mins: i64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_mongodb_url() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_mongodb_db() -> String {
    "cinelog".to_string()
}

fn default_jwt_expiry_mins() -> i64 {
    60
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
