use crate::middleware::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_namespace: String,
    pub db_database: String,
    pub db_password: Option<String>,
    pub db_username: Option<String>,
    pub db_url: String,
    pub jwt_secret: String,
    pub jwt_duration_days: i64,
    pub is_development: bool,
    pub server_port: u16,
    pub admin_nick: Option<String>,
    pub admin_password: Option<String>,
}

fn required(name: &str) -> AppResult<String> {
    std::env::var(name).map_err(|_| AppError::Generic {
        description: format!("Missing {name} in env"),
    })
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> AppResult<T> {
    match std::env::var(name) {
        Ok(value) => value.parse::<T>().map_err(|_| AppError::Generic {
            description: format!("{name} has invalid value {value}"),
        }),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        let db_namespace = std::env::var("DB_NAMESPACE").unwrap_or("namespace".to_string());
        let db_database = std::env::var("DB_DATABASE").unwrap_or("database".to_string());
        let db_password = std::env::var("DB_PASSWORD").ok();
        let db_username = std::env::var("DB_USERNAME").ok();
        let db_url = required("DB_URL")?;

        let jwt_secret = required("JWT_SECRET")?;
        let jwt_duration_days = parsed("JWT_DURATION_DAYS", 7)?;

        let is_development = std::env::var("DEVELOPMENT")
            .map(|v| v.eq("true"))
            .unwrap_or(false);
        let server_port = parsed("SERVER_PORT", 8080)?;

        let admin_nick = std::env::var("ADMIN_NICK").ok().filter(|v| !v.is_empty());
        let admin_password = std::env::var("ADMIN_PASSWORD")
            .ok()
            .filter(|v| !v.is_empty());

        Ok(Self {
            db_namespace,
            db_database,
            db_password,
            db_username,
            db_url,
            jwt_secret,
            jwt_duration_days,
            is_development,
            server_port,
            admin_nick,
            admin_password,
        })
    }
}
