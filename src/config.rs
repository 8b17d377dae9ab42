use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
    pub catalog_path: PathBuf,
    pub log_level: String,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("database_path", &self.database_path)
            .field("catalog_path", &self.catalog_path)
            .field("log_level", &self.log_level)
            .field("jwt_secret", &"<redacted>")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            port: env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(3000),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "loan_checker.db".to_string())
                .into(),
            catalog_path: env::var("LOAN_CATALOG_PATH")
                .unwrap_or_else(|_| "data/indian_banks_loans.csv".to_string())
                .into(),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string()), // Set a real secret outside development
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
