use std::{env, fs, net::SocketAddr, path::Path};

use crate::{errors::Error, Result};

pub const DEFAULT_CHART_BASE_URL: &str = "https://satta-king-fast.com";

/// Typed configuration, loaded from the environment with an optional `.env`
/// file for local runs.
#[derive(Clone, Debug)]
pub struct Config {
    /// Telegram bot credential. Required; startup fails fast without it.
    pub telegram_bot_token: String,

    /// Address the webhook server binds to.
    pub bind_addr: SocketAddr,

    /// Base URL of the results site. Overridable so tests can point the
    /// scraper at a local mock server.
    pub chart_base_url: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let bind_addr = match env_str("BIND_ADDR") {
            Some(raw) => raw
                .parse::<SocketAddr>()
                .map_err(|e| Error::Config(format!("invalid BIND_ADDR `{raw}`: {e}")))?,
            None => SocketAddr::from(([0, 0, 0, 0], 8000)),
        };

        let chart_base_url = env_str("CHART_BASE_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_CHART_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            telegram_bot_token,
            bind_addr,
            chart_base_url,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
