//! Process configuration, read from the environment once at startup.

use std::net::SocketAddr;

use anyhow::{Context, bail};

use bookstock_infra::LedgerTables;

/// Which ledger store backs the service.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Sqlite,
}

impl Backend {
    fn parse(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Backend::Memory),
            "sqlite" => Ok(Backend::Sqlite),
            other => bail!("BOOKSTOCK_BACKEND must be 'memory' or 'sqlite', got '{other}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub backend: Backend,
    /// Table names. For sqlite, `store_name` is the database path or URL.
    pub tables: LedgerTables,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            backend: Backend::Memory,
            tables: LedgerTables {
                store_name: "bookstock.db".to_string(),
                ..LedgerTables::default()
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset variables keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        match lookup("BOOKSTOCK_BIND") {
            Some(addr) => {
                config.bind_addr = addr
                    .parse()
                    .with_context(|| format!("BOOKSTOCK_BIND is not a socket address: {addr}"))?;
            }
            None => tracing::info!("BOOKSTOCK_BIND not set; using {}", config.bind_addr),
        }

        match lookup("BOOKSTOCK_BACKEND") {
            Some(backend) => config.backend = Backend::parse(&backend)?,
            None => tracing::warn!("BOOKSTOCK_BACKEND not set; using in-memory ledger (data is lost on exit)"),
        }

        if let Some(store) = lookup("BOOKSTOCK_STORE") {
            config.tables.store_name = store;
        }
        if let Some(name) = lookup("BOOKSTOCK_INVENTORY_TABLE") {
            config.tables.inventory = name;
        }
        if let Some(name) = lookup("BOOKSTOCK_TRANSACTIONS_TABLE") {
            config.tables.transactions = name;
        }
        if let Some(name) = lookup("BOOKSTOCK_SECONDARY_TABLE") {
            config.tables.secondary = name;
        }

        for (what, name) in [
            ("inventory", &config.tables.inventory),
            ("transactions", &config.tables.transactions),
        ] {
            if name.trim().is_empty() {
                bail!("{what} table name cannot be empty");
            }
        }
        if config.tables.inventory == config.tables.transactions {
            bail!("inventory and transactions must be different tables");
        }

        Ok(config)
    }
}
