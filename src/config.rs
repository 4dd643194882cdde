use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub node: NodeConfig,
    pub tokens: TokenConfig,
    pub users: UserConfig,
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_address: String,
    pub data_dir: String,
    pub log_dir: String,
    /// Frontend assets served under `/`
    pub static_dir: String,
}

#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// bcrypt cost used when hashing issued secrets
    pub hash_cost: u32,
    /// Length of the plaintext secret handed to the client
    pub length: usize,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct UserConfig {
    /// Administrator created at startup when missing
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub password_hash_cost: u32,
}

#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub password: String,
    pub username: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            data_dir: "./data".to_string(),
            log_dir: "./logs".to_string(),
            static_dir: "./html".to_string(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            hash_cost: 5,
            length: 64,
            ttl_minutes: 60,
        }
    }
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            bootstrap_admin: None,
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = NodeConfig::default();
        let node = NodeConfig {
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            data_dir: std::env::var("DATA_DIR").unwrap_or(defaults.data_dir),
            log_dir: std::env::var("LOG_DIR").unwrap_or(defaults.log_dir),
            static_dir: std::env::var("STATIC_DIR").unwrap_or(defaults.static_dir),
        };

        let token_defaults = TokenConfig::default();
        let tokens = TokenConfig {
            hash_cost: env_parse("TOKEN_HASH_COST")?.unwrap_or(token_defaults.hash_cost),
            length: env_parse("TOKEN_LENGTH")?.unwrap_or(token_defaults.length),
            ttl_minutes: env_parse("TOKEN_TTL_MINUTES")?.unwrap_or(token_defaults.ttl_minutes),
        };

        let bootstrap_admin = match (
            std::env::var("ADMIN_USERNAME").ok(),
            std::env::var("ADMIN_PASSWORD").ok(),
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { password, username }),
            (Some(_), None) | (None, Some(_)) => {
                return Err(ConfigError::ValidationError(
                    "ADMIN_USERNAME and ADMIN_PASSWORD must be set together".to_string(),
                ));
            }
            (None, None) => None,
        };

        let users = UserConfig {
            bootstrap_admin,
            password_hash_cost: env_parse("PASSWORD_HASH_COST")?
                .unwrap_or(bcrypt::DEFAULT_COST),
        };

        let config = Config {
            node,
            tokens,
            users,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tokens.ttl_minutes <= 0 {
            return Err(ConfigError::ValidationError(
                "TOKEN_TTL_MINUTES must be greater than 0".to_string(),
            ));
        }
        if self.tokens.length < 16 {
            return Err(ConfigError::ValidationError(
                "TOKEN_LENGTH must be at least 16".to_string(),
            ));
        }
        for (name, cost) in [
            ("TOKEN_HASH_COST", self.tokens.hash_cost),
            ("PASSWORD_HASH_COST", self.users.password_hash_cost),
        ] {
            if !(4..=31).contains(&cost) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 4 and 31, got {cost}"
                )));
            }
        }
        if let Some(admin) = &self.users.bootstrap_admin {
            if admin.username.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "ADMIN_USERNAME cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            ConfigError::ValidationError(format!("{name} has an invalid value: {raw}"))
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            node: NodeConfig::default(),
            tokens: TokenConfig::default(),
            users: UserConfig::default(),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(config().validate().is_ok());
        assert_eq!(config().tokens.ttl_minutes, 60);
        assert_eq!(config().tokens.length, 64);
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let mut cfg = config();
        cfg.tokens.ttl_minutes = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_cost_out_of_range() {
        let mut cfg = config();
        cfg.tokens.hash_cost = 3;
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.users.password_hash_cost = 32;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_blank_admin() {
        let mut cfg = config();
        cfg.users.bootstrap_admin = Some(BootstrapAdmin {
            password: "pw".to_string(),
            username: "  ".to_string(),
        });
        assert!(cfg.validate().is_err());
    }
}
