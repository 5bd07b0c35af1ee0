//! Server settings read from the environment at startup.

use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const DEFAULT_ADDR: &str = "127.0.0.1:9876";
pub const DEFAULT_ESPEAK: &str = "espeak-ng";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub espeak_program: String,
    pub debug: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `PORT` overrides only the port of the address.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("MOUTHPIECE_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let mut addr: SocketAddr = raw_addr
            .parse()
            .with_context(|| format!("invalid MOUTHPIECE_ADDR '{raw_addr}'"))?;

        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT '{port}'"))?;
            addr.set_port(port);
        }

        let espeak_program =
            lookup("MOUTHPIECE_ESPEAK").unwrap_or_else(|| DEFAULT_ESPEAK.to_string());

        let debug = match lookup("MOUTHPIECE_DEBUG") {
            Some(v) => parse_bool(&v).with_context(|| format!("invalid MOUTHPIECE_DEBUG '{v}'"))?,
            None => false,
        };

        Ok(Self {
            addr,
            espeak_program,
            debug,
        })
    }

    /// Default log filter directive for this crate.
    pub fn log_directive(&self) -> &'static str {
        if self.debug {
            "mouthpiece_server=debug"
        } else {
            "mouthpiece_server=info"
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected true or false, got '{other}'"),
    }
}
