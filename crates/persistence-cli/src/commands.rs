//! CLI subcommands and their execution

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::Value;
use tracing::info;

use wallet_persistence::{migrate_legacy_gift_cards, KeyScheme, Network, PersistenceProvider};

/// Store maintenance commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the value stored under a raw key
    Get { key: String },

    /// Store a JSON value under a raw key
    Set {
        key: String,
        /// Value as JSON (e.g. '"text"', '42', '{"a":1}')
        value: String,
    },

    /// Remove a raw key
    Remove { key: String },

    /// List stored keys
    Keys {
        #[arg(long, default_value = "")]
        prefix: String,
    },

    /// Write a 50 MiB probe value to check available capacity
    CheckQuota,

    /// Move legacy gift-card keys to the current naming scheme
    Migrate,

    /// Show which key a gift-card brand resolves to
    GiftCardKey {
        brand: String,
        #[arg(value_parser = parse_network)]
        network: Network,
    },
}

fn parse_network(s: &str) -> std::result::Result<Network, String> {
    s.parse()
}

/// Run a command and return what should be printed
pub async fn execute(provider: &PersistenceProvider, command: Command) -> Result<String> {
    let storage = provider.storage();

    match command {
        Command::Get { key } => {
            let value = storage
                .get(&key)
                .await
                .with_context(|| format!("reading {}", key))?;
            match value {
                Some(value) => Ok(serde_json::to_string_pretty(&value)?),
                None => Ok("null".to_string()),
            }
        }
        Command::Set { key, value } => {
            let value: Value =
                serde_json::from_str(&value).context("value must be valid JSON")?;
            storage
                .set(&key, value)
                .await
                .with_context(|| format!("writing {}", key))?;
            info!("Stored {}", key);
            Ok(String::new())
        }
        Command::Remove { key } => {
            storage
                .remove(&key)
                .await
                .with_context(|| format!("removing {}", key))?;
            info!("Removed {}", key);
            Ok(String::new())
        }
        Command::Keys { prefix } => {
            let keys = storage.list_keys(&prefix).await?;
            Ok(keys.join("\n"))
        }
        Command::CheckQuota => {
            provider.check_quota().await;
            Ok(String::new())
        }
        Command::Migrate => {
            let report = migrate_legacy_gift_cards(storage.as_ref()).await?;
            if report.already_current {
                return Ok("store already uses the current key scheme".to_string());
            }
            let mut lines: Vec<String> = report
                .moved
                .iter()
                .map(|(from, to)| format!("moved {} -> {}", from, to))
                .collect();
            lines.extend(report.discarded.iter().map(|k| format!("discarded {}", k)));
            lines.push(format!("{} keys moved", report.moved.len()));
            Ok(lines.join("\n"))
        }
        Command::GiftCardKey { brand, network } => {
            let key = provider.gift_cards_key(&brand, network).await?;
            let scheme = match provider.effective_scheme().await? {
                KeyScheme::Legacy => "legacy",
                KeyScheme::Current => "current",
            };
            Ok(format!("{} ({} scheme)", key, scheme))
        }
    }
}
