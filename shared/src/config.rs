use std::path::PathBuf;

use anyhow::Result;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub mailer: MailerConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: env_or("DATABASE_HOST", "localhost"),
            port: std::env::var("DATABASE_PORT")
                .unwrap_or_else(|_| "5432".into())
                .parse()?,
            username: env_or("DATABASE_USERNAME", "app"),
            password: env_or("DATABASE_PASSWORD", "passwd"),
            database: env_or("DATABASE_NAME", "app"),
        };
        let auth = AuthConfig {
            jwt_secret: env_or("JWT_SECRET", "dev-only-jwt-secret"),
            // Seconds until issued tokens expire.
            ttl: std::env::var("AUTH_TOKEN_TTL")
                .unwrap_or_else(|_| "86400".into())
                .parse()?,
        };
        let storage = StorageConfig {
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "uploads")),
        };
        let mailer = MailerConfig {
            admin_email: env_or("ADMIN_NOTIFICATION_EMAIL", ""),
            api_token: std::env::var("MAILER_API_TOKEN").ok(),
            frontend_url: env_or("FRONTEND_URL", "http://localhost:3000"),
        };
        Ok(Self {
            database,
            auth,
            storage,
            mailer,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct AuthConfig {
    pub jwt_secret: String,
    pub ttl: u64,
}

pub struct StorageConfig {
    pub upload_dir: PathBuf,
}

pub struct MailerConfig {
    pub admin_email: String,
    pub api_token: Option<String>,
    pub frontend_url: String,
}
