use std::fmt;
use thiserror::Error;

/// Loop count used when none (or garbage) is given on the command line.
pub const DEFAULT_LOOPS: u32 = 600;

pub const REQUIRED_VARS: [&str; 7] = [
    "GRAPHQL_URL",
    "COGNITO_USER_POOL_ID",
    "COGNITO_CLIENT_ID",
    "AWS_REGION",
    "GAME_ID",
    "COGNITO_USERNAME",
    "COGNITO_PASSWORD",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid number of loops '{0}'")]
pub struct InvalidLoopCount(pub String);

/// Identity-provider credentials for the password auth flow.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_pool_id: String,
    pub client_id: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_pool_id", &self.user_pool_id)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything the harness needs from the environment before touching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessEnv {
    pub graphql_url: String,
    pub region: String,
    pub game_id: String,
    pub credentials: Credentials,
}

impl HarnessEnv {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve every required variable through `lookup`. Empty values count
    /// as missing, and all missing names are reported together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut values = REQUIRED_VARS.map(|key| {
            let value = lookup(key).filter(|v| !v.trim().is_empty());
            if value.is_none() {
                missing.push(key);
            }
            value.unwrap_or_default()
        });

        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        let mut take = |index: usize| std::mem::take(&mut values[index]);
        Ok(Self {
            graphql_url: take(0),
            credentials: Credentials {
                user_pool_id: take(1),
                client_id: take(2),
                username: take(5),
                password: take(6),
            },
            region: take(3),
            game_id: take(4),
        })
    }
}

/// Parse the optional positional loop count. `0` means run until interrupted.
pub fn parse_loop_count(raw: Option<&str>) -> Result<u32, InvalidLoopCount> {
    match raw {
        None => Ok(DEFAULT_LOOPS),
        Some(token) => token
            .trim()
            .parse::<u32>()
            .map_err(|_| InvalidLoopCount(token.to_string())),
    }
}
