use std::env;
use std::time::Duration;

/// Configuration loaded once at startup and handed to each component
/// constructor. Components never read the environment themselves.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_host: String,
    pub backend_port: String,
    pub broker_host: String,
    pub broker_port: u16,
    pub broker_user: String,
    pub broker_pass: String,
    pub broker_topic: String,
    pub server_port: String,
    pub auth_token: String,
    pub backend_timeout: Duration,
    pub publish_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> AppConfig {
        AppConfig {
            backend_host: env_or("BACKEND_HOST", "localhost"),
            backend_port: env_or("BACKEND_PORT", "8080"),
            broker_host: env_or("BROKER_HOST", "localhost"),
            broker_port: env_or("BROKER_PORT", "5672").parse().unwrap_or(5672),
            broker_user: env_or("BROKER_USER", "guest"),
            broker_pass: env_or("BROKER_PASS", "guest"),
            broker_topic: env_or("BROKER_TOPIC", "product-queries"),
            server_port: env_or("SERVER_PORT", "3000"),
            auth_token: env_or("AUTH_TOKEN", "API-TOKEN-SPEC"),
            backend_timeout: Duration::from_secs(3),
            publish_timeout: Duration::from_secs(5),
        }
    }

    pub fn backend_base_url(&self) -> String {
        format!("http://{}:{}", self.backend_host, self.backend_port)
    }
}

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => String::from(default),
    }
}
