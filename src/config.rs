use crate::error::{ConfigError, ConnectError};
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, collections::BTreeMap, fmt, str::FromStr};

/// The networks connected by default, in connection order.
pub const DEFAULT_NETWORKS: [&str; 4] = ["neutron", "kujira", "stargaze", "nois"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Testnet,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Environment::Local),
            "testnet" => Ok(Environment::Testnet),
            unknown => Err(ConfigError::UnknownEnvironment(unknown.to_owned())),
        }
    }
}

/// Identifier of one of the networks we can connect to, e.g. `"neutron"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(String);

impl NetworkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NetworkId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NetworkId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NetworkId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Connection parameters of one network in one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub rest_url: String,
    pub gas_price: String,
    pub full_denom: String,
    pub denom: String,
    pub chain_id: String,
    pub addr_prefix: String,
}

impl NetworkConfig {
    /// the gas price denominated in this network's fee denom
    pub fn gas_price(&self) -> Result<GasPrice, ConnectError> {
        GasPrice::parse(&self.gas_price, &self.denom)
    }
}

/// A gas price such as `0.025untrn`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GasPrice {
    amount: String,
    denom: String,
}

impl GasPrice {
    /// Validate the decimal amount and the denom the same way the chain
    /// client does before it accepts a gas price string.
    pub fn parse(amount: &str, denom: &str) -> Result<Self, ConnectError> {
        let invalid = || ConnectError::InvalidGasPrice(format!("{amount}{denom}"));

        let mut dots = 0;
        let mut digits = 0;
        for c in amount.chars() {
            match c {
                '0'..='9' => digits += 1,
                '.' => dots += 1,
                _ => return Err(invalid()),
            }
        }
        if digits == 0 || dots > 1 {
            return Err(invalid());
        }

        let mut chars = denom.chars();
        let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c));
        if !starts_with_letter || !valid_tail || !(3..=128).contains(&denom.len()) {
            return Err(invalid());
        }

        Ok(Self {
            amount: amount.to_owned(),
            denom: denom.to_owned(),
        })
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn denom(&self) -> &str {
        &self.denom
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Static table of the [`NetworkConfig`] of every (network, environment) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkTable {
    configs: BTreeMap<(NetworkId, Environment), NetworkConfig>,
}

impl NetworkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the flat `network.json` layout where every entry is keyed
    /// `<network>_<environment>`, e.g. `neutron_local` or `nois_testnet`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let entries: BTreeMap<String, NetworkConfig> = serde_json::from_str(json)?;

        let mut table = Self::new();
        for (key, config) in entries {
            let (network, environment) = key
                .rsplit_once('_')
                .filter(|(network, _)| !network.is_empty())
                .ok_or_else(|| ConfigError::InvalidKey(key.clone()))?;
            let environment = environment
                .parse()
                .map_err(|_| ConfigError::InvalidKey(key.clone()))?;
            table.insert(network, environment, config);
        }
        Ok(table)
    }

    pub fn insert(
        &mut self,
        network: impl Into<NetworkId>,
        environment: Environment,
        config: NetworkConfig,
    ) -> Option<NetworkConfig> {
        self.configs.insert((network.into(), environment), config)
    }

    /// Resolve the configuration of `network` in `environment`.
    pub fn resolve(
        &self,
        network: &NetworkId,
        environment: Environment,
    ) -> Result<NetworkConfig, ConfigError> {
        self.configs
            .get(&(network.clone(), environment))
            .cloned()
            .ok_or_else(|| ConfigError::NotFound {
                network: network.clone(),
                environment,
            })
    }

    /// Resolve a batch of networks, all against the same `environment`.
    pub fn resolve_all<'a>(
        &self,
        networks: impl IntoIterator<Item = &'a NetworkId>,
        environment: Environment,
    ) -> Result<Vec<(NetworkId, NetworkConfig)>, ConfigError> {
        networks
            .into_iter()
            .map(|network| Ok((network.clone(), self.resolve(network, environment)?)))
            .collect()
    }

    /// every network present in the table, at least in one environment
    pub fn networks(&self) -> Vec<NetworkId> {
        let mut networks: Vec<NetworkId> =
            self.configs.keys().map(|(network, _)| network.clone()).collect();
        networks.dedup();
        networks
    }
}

/// Record of the contracts deployed on every network, as stored in
/// `deploy.json`:
///
/// ```json
/// { "neutron": { "local": { "server": { "codeId": 1, "address": "neutron1..." } } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeployConfig {
    networks: BTreeMap<NetworkId, DeployNetworkConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployNetworkConfig {
    #[serde(default)]
    pub local: BTreeMap<String, Option<DeployContractConfig>>,
    #[serde(default)]
    pub testnet: BTreeMap<String, Option<DeployContractConfig>>,
}

impl DeployNetworkConfig {
    fn environment(&self, environment: Environment) -> &BTreeMap<String, Option<DeployContractConfig>> {
        match environment {
            Environment::Local => &self.local,
            Environment::Testnet => &self.testnet,
        }
    }

    fn environment_mut(
        &mut self,
        environment: Environment,
    ) -> &mut BTreeMap<String, Option<DeployContractConfig>> {
        match environment {
            Environment::Local => &mut self.local,
            Environment::Testnet => &mut self.testnet,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployContractConfig {
    #[serde(rename = "codeId")]
    pub code_id: Option<u64>,
    pub address: Option<String>,
    /// hex encoded sha256 of the uploaded wasm
    pub hash: Option<String>,
    #[serde(rename = "ibcPort")]
    pub ibc_port: Option<String>,
}

impl DeployConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn contract(
        &self,
        environment: Environment,
        network: &NetworkId,
        kind: &str,
    ) -> Option<&DeployContractConfig> {
        self.networks
            .get(network)?
            .environment(environment)
            .get(kind)?
            .as_ref()
    }

    pub fn replace_contract(
        &mut self,
        environment: Environment,
        network: &NetworkId,
        kind: &str,
        config: DeployContractConfig,
    ) {
        self.networks
            .entry(network.clone())
            .or_default()
            .environment_mut(environment)
            .insert(kind.to_owned(), Some(config));
    }
}
