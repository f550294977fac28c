use actix_web::cookie::Key;

use crate::error::Error;

const DEFAULT_IP: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8081;
const MIN_SESSION_KEY_LENGTH: usize = 64;

pub struct Config {
    pub ip: String,
    pub port: u16,
    pub database_url: String,
    pub session_key: Key,
    pub cookie_secure: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let ip = lookup("IP").unwrap_or_else(|| DEFAULT_IP.to_string());

        let port = match lookup("PORT") {
            Some(port) => port.parse::<u16>().map_err(|e| Error::InvalidEnvValue {
                var: "PORT".to_string(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| Error::MissingEnvVar("DATABASE_URL".to_string()))?;

        let session_key = match lookup("SESSION_KEY") {
            Some(key) if key.len() >= MIN_SESSION_KEY_LENGTH => Key::from(key.as_bytes()),
            Some(_) => {
                return Err(Error::InvalidEnvValue {
                    var: "SESSION_KEY".to_string(),
                    reason: format!("must be at least {} bytes", MIN_SESSION_KEY_LENGTH),
                })
            }
            None => {
                log::warn!("SESSION_KEY not set, sessions will not survive a restart");
                Key::generate()
            }
        };

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(value) => value.parse::<bool>().map_err(|e| Error::InvalidEnvValue {
                var: "COOKIE_SECURE".to_string(),
                reason: e.to_string(),
            })?,
            None => false,
        };

        Ok(Config {
            ip,
            port,
            database_url,
            session_key,
            cookie_secure,
        })
    }
}
