//! Configuration types for discord-gateway.

use std::env;
use std::time::Duration;

use crate::error::GatewayError;

/// Configuration for connecting to Discord.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bot token.
    pub token: String,
    /// Register slash commands in this guild only (instant) instead of
    /// globally.
    pub command_guild_id: Option<u64>,
    /// How long an interaction waits for its reply before giving up.
    pub command_reply_timeout: Duration,
    /// Capacity of the inbound event channel.
    pub event_buffer: usize,
}

impl GatewayConfig {
    /// Create a configuration with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            command_guild_id: None,
            command_reply_timeout: Duration::from_millis(2500),
            event_buffer: 256,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `DISCORD_BOT_TOKEN` (`DISCORD_BOT_TOKEN:` is accepted for old dotenv files)
    ///
    /// Optional env vars:
    /// - `DISCORD_COMMAND_GUILD_ID`
    pub fn from_env() -> Result<Self, GatewayError> {
        let token = env::var("DISCORD_BOT_TOKEN")
            .or_else(|_| env::var("DISCORD_BOT_TOKEN:"))
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GatewayError::Config("DISCORD_BOT_TOKEN not set".to_string()))?;

        let command_guild_id = match env::var("DISCORD_COMMAND_GUILD_ID") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| GatewayError::InvalidId(raw.clone()))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            command_guild_id,
            ..Self::new(token)
        })
    }

    /// Restrict command registration to one guild.
    pub fn with_command_guild(mut self, guild_id: u64) -> Self {
        self.command_guild_id = Some(guild_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear() {
            for key in ["DISCORD_BOT_TOKEN", "DISCORD_BOT_TOKEN:", "DISCORD_COMMAND_GUILD_ID"] {
                env::remove_var(key);
            }
        }

        clear();
        assert!(matches!(GatewayConfig::from_env(), Err(GatewayError::Config(_))));

        env::set_var("DISCORD_BOT_TOKEN:", "legacy-token");
        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(config.token, "legacy-token");
        assert!(config.command_guild_id.is_none());

        env::set_var("DISCORD_BOT_TOKEN", "token");
        env::set_var("DISCORD_COMMAND_GUILD_ID", "1234");
        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(config.token, "token");
        assert_eq!(config.command_guild_id, Some(1234));

        env::set_var("DISCORD_COMMAND_GUILD_ID", "general");
        assert!(matches!(GatewayConfig::from_env(), Err(GatewayError::InvalidId(_))));

        clear();
    }
}
