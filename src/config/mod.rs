use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

use crate::domain::balance::BalanceNetwork;
use crate::domain::pagination::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub prefix: u16,
    pub archive_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub networks: Vec<NetworkConfig>,
    pub default_network: Option<String>,
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            networks: default_networks(),
            default_network: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl NetworkConfig {
    pub fn display_name(&self) -> String {
        self.display_name
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| capitalize(&self.name))
    }

    pub fn balance_network(&self) -> BalanceNetwork {
        BalanceNetwork {
            name: self.name.clone(),
            display_name: self.display_name(),
            prefix: self.prefix,
        }
    }
}

impl Config {
    pub fn network(&self, name: &str) -> Option<&NetworkConfig> {
        self.networks.iter().find(|network| network.name == name)
    }

    /// Network used when none is named on the command line
    pub fn default_network(&self) -> Option<&NetworkConfig> {
        self.default_network
            .as_deref()
            .and_then(|name| self.network(name))
            .or_else(|| self.networks.first())
    }

    fn normalized(mut self) -> Self {
        if self.page_size == 0 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        if self.networks.is_empty() {
            self.networks = default_networks();
        }
        self
    }
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    parse(&content).unwrap_or_else(|err| {
        warn!(path = %path.display(), %err, "ignoring invalid config file");
        Config::default()
    })
}

pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(content).map(Config::normalized)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("CALAMAR_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("calamar").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("calamar").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "calamar", "calamar")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn default_networks() -> Vec<NetworkConfig> {
    [
        ("polkadot", "Polkadot", 0),
        ("kusama", "Kusama", 2),
    ]
    .into_iter()
    .map(|(name, display_name, prefix)| NetworkConfig {
        name: name.to_string(),
        display_name: Some(display_name.to_string()),
        prefix,
        archive_url: format!("https://{name}.explorer.subsquid.io/graphql"),
    })
    .collect()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
