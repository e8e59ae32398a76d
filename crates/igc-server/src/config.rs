//! Server configuration from environment.

use anyhow::Context;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// `PORT` is required: the deployment platform assigns it, and a server
    /// that guesses its own port would come up unreachable. Startup fails
    /// instead.
    pub fn from_env() -> anyhow::Result<Self> {
        let raw = env::var("PORT").context("PORT must be set")?;
        let port = raw
            .parse()
            .with_context(|| format!("PORT must be a port number, got {raw:?}"))?;
        Ok(Self { port })
    }
}
