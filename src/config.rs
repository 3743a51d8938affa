//! Service configuration from CLI arguments or environment variables.

use clap::Parser;
use secrecy::{ExposeSecret, SecretString};

/// Tokens shorter than this are refused at startup.
const MIN_TOKEN_LEN: usize = 16;

/// Runtime configuration.
///
/// The bearer secret is injected, never compiled in, and is held as a
/// [`SecretString`] so it stays out of `Debug` output and log lines.
#[derive(Debug, Clone, Parser)]
#[command(name = "gatehouse", about = "User management HTTP API")]
pub struct Config {
    /// Listen address
    #[arg(long, env = "GATEHOUSE_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: String,

    /// Bearer token accepted by the authentication stage
    #[arg(long, env = "GATEHOUSE_API_TOKEN")]
    pub api_token: SecretString,
}

impl Config {
    /// Rejects configurations that would weaken the auth stage.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_token.expose_secret().len() < MIN_TOKEN_LEN {
            return Err(format!("GATEHOUSE_API_TOKEN must be at least {MIN_TOKEN_LEN} characters"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: &str) -> Config {
        Config {
            addr: "0.0.0.0:3000".to_owned(),
            api_token: SecretString::from(token.to_owned()),
        }
    }

    #[test]
    fn short_tokens_are_rejected() {
        assert!(config("short").validate().is_err());
        assert!(config("supersecret-token-12345").validate().is_ok());
    }

    #[test]
    fn debug_output_never_contains_the_token() {
        let cfg = config("supersecret-token-12345");
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("supersecret-token-12345"));
    }
}
