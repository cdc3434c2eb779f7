use std::{collections::HashMap, path::Path};

use alloy::primitives::{Address, ChainId};
use config::{Config, ConfigError, Environment, File, FileFormat, Map};
use serde::Deserialize;

use crate::{
    constants::DEFAULT_MAX_UNWIND_DEPTH,
    context::{StaticContextProvider, WalletContext},
    unwind::Unwinder,
};

/// Environment variables with this prefix override file values,
/// e.g. `METATX__UNWIND__MAX_DEPTH=8`.
pub const ENV_PREFIX: &str = "metatx";

#[derive(Debug, Clone, Deserialize)]
pub struct MetaTxConfig {
    #[serde(default)]
    pub unwind: UnwindConfig,

    /// Per-chain wallet deployments.
    #[serde(default)]
    pub chains: Vec<ChainContextConfig>,

    /// Whether chains without an entry fall back to the canonical v1 deployment.
    #[serde(default = "default_use_default_context")]
    pub use_default_context: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UnwindConfig {
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainContextConfig {
    pub chain_id: ChainId,
    pub guest_module: Address,
    pub main_module: Address,
    pub factory: Address,
}

impl Default for UnwindConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_UNWIND_DEPTH,
        }
    }
}

impl Default for MetaTxConfig {
    fn default() -> Self {
        Self {
            unwind: UnwindConfig::default(),
            chains: Vec::new(),
            use_default_context: true,
        }
    }
}

fn default_use_default_context() -> bool {
    true
}

impl MetaTxConfig {
    pub fn unwinder(&self) -> Unwinder {
        Unwinder::new(self.unwind.max_depth)
    }

    pub fn context_provider(&self) -> StaticContextProvider {
        let contexts: HashMap<ChainId, WalletContext> = self
            .chains
            .iter()
            .map(|chain| {
                (
                    chain.chain_id,
                    WalletContext {
                        guest_module: chain.guest_module,
                        main_module: chain.main_module,
                        factory: chain.factory,
                    },
                )
            })
            .collect();

        let provider = StaticContextProvider::new(contexts);
        if self.use_default_context {
            provider.with_fallback(WalletContext::default())
        } else {
            provider
        }
    }
}

/// Loads configuration from an optional YAML file, then the environment.
pub fn load_config(path: Option<&Path>) -> Result<MetaTxConfig, ConfigError> {
    load_layers(path, None)
}

/// `env` replaces the process environment when set.
fn load_layers(
    path: Option<&Path>,
    env: Option<Map<String, String>>,
) -> Result<MetaTxConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).format(FileFormat::Yaml));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    let config: MetaTxConfig = config.try_deserialize()?;

    tracing::debug!(
        max_depth = config.unwind.max_depth,
        chains = config.chains.len(),
        "Meta transaction configuration loaded"
    );

    Ok(config)
}

/// Parses configuration from an in-memory YAML document.
pub fn config_from_yaml(yaml: &str) -> Result<MetaTxConfig, ConfigError> {
    Config::builder()
        .add_source(File::from_str(yaml, FileFormat::Yaml))
        .build()?
        .try_deserialize()
}
