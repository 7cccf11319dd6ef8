use crate::config::NetworkConfig;
use serde::Serialize;

/// SLIP-44 coin type shared by the Cosmos SDK chains.
pub const COSMOS_COIN_TYPE: u32 = 118;
/// Decimals between the base denom (`untrn`) and the display unit.
pub const COIN_DECIMALS: u8 = 6;

/// Chain description submitted to the wallet extension so it learns about
/// chains it doesn't ship with (`experimentalSuggestChain` in Keplr).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc: String,
    pub rest: String,
    pub bip44: Bip44,
    pub bech32_config: Bech32Config,
    pub currencies: Vec<Currency>,
    pub fee_currencies: Vec<Currency>,
    pub stake_currency: Currency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bip44 {
    pub coin_type: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bech32Config {
    pub bech32_prefix_acc_addr: String,
    pub bech32_prefix_acc_pub: String,
    pub bech32_prefix_val_addr: String,
    pub bech32_prefix_val_pub: String,
    pub bech32_prefix_cons_addr: String,
    pub bech32_prefix_cons_pub: String,
}

impl Bech32Config {
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            bech32_prefix_acc_addr: prefix.to_owned(),
            bech32_prefix_acc_pub: format!("{prefix}pub"),
            bech32_prefix_val_addr: format!("{prefix}valoper"),
            bech32_prefix_val_pub: format!("{prefix}valoperpub"),
            bech32_prefix_cons_addr: format!("{prefix}valcons"),
            bech32_prefix_cons_pub: format!("{prefix}valconspub"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub coin_denom: String,
    pub coin_minimal_denom: String,
    pub coin_decimals: u8,
    pub coin_gecko_id: String,
}

impl ChainInfo {
    pub fn from_config(config: &NetworkConfig) -> Self {
        let currency = Currency {
            coin_denom: config.denom.clone(),
            coin_minimal_denom: config.denom.clone(),
            coin_decimals: COIN_DECIMALS,
            coin_gecko_id: config.full_denom.clone(),
        };

        Self {
            chain_id: config.chain_id.clone(),
            chain_name: config.chain_id.clone(),
            rpc: config.rpc_url.clone(),
            rest: config.rest_url.clone(),
            bip44: Bip44 {
                coin_type: COSMOS_COIN_TYPE,
            },
            bech32_config: Bech32Config::from_prefix(&config.addr_prefix),
            currencies: vec![currency.clone()],
            fee_currencies: vec![currency.clone()],
            stake_currency: currency,
        }
    }
}
