//! Values exchanged with the CosmWasm client, shaped like the objects the
//! cosmjs `SigningCosmWasmClient` resolves to.

mod chain_info;

pub use self::chain_info::{Bech32Config, Bip44, ChainInfo, Currency};
use serde::{Deserialize, Serialize};

/// Fee mode of a transaction. The gas is always simulated and the fee
/// computed from the session's gas price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fee {
    #[default]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(amount: u128, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
        }
    }
}

/// An account exposed by a signer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct AccountData {
    pub address: String,
    #[serde(default)]
    pub algo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub msg_index: Option<u32>,
    pub log: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Receipt of a broadcast transaction (execute, migrate, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResponse {
    pub height: u64,
    pub transaction_hash: String,
    pub gas_used: u64,
    pub gas_wanted: u64,
    /// Not filled in Cosmos SDK >= 0.50, the events are used instead.
    #[serde(default)]
    pub logs: Option<Vec<Log>>,
    #[serde(default)]
    pub events: Option<Vec<Event>>,
}

impl TxResponse {
    /// all the events of the transaction, falling back to the events of the
    /// logs for chains that still fill them
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        let events = self.events.as_deref().unwrap_or_default();
        let logs: &[Log] = if events.is_empty() {
            self.logs.as_deref().unwrap_or_default()
        } else {
            &[]
        };

        events
            .iter()
            .chain(logs.iter().flat_map(|log| log.events.iter()))
    }

    /// value of the first attribute `key` of an event of type `ty`
    pub fn attribute(&self, ty: &str, key: &str) -> Option<&str> {
        self.events()
            .filter(|event| event.ty == ty)
            .flat_map(|event| event.attributes.iter())
            .find(|attribute| attribute.key == key)
            .map(|attribute| attribute.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// hex encoded sha256 checksum of the original wasm code
    pub checksum: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub code_id: u64,
    #[serde(flatten)]
    pub tx: TxResponse,
}

impl UploadResult {
    pub fn checksum(&self) -> Result<[u8; 32], hex::FromHexError> {
        let mut checksum = [0; 32];
        hex::decode_to_slice(&self.checksum, &mut checksum)?;
        Ok(checksum)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstantiateResult {
    pub contract_address: String,
    #[serde(flatten)]
    pub tx: TxResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDetails {
    pub id: u64,
    pub creator: String,
    pub checksum: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    pub address: String,
    pub code_id: u64,
    pub creator: String,
    pub admin: Option<String>,
    pub label: String,
    pub ibc_port_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedTx {
    pub height: u64,
    /// upper-case hex, never empty
    pub hash: String,
    /// 0 on success
    pub code: u32,
    #[serde(default)]
    pub events: Vec<Event>,
    pub raw_log: String,
    pub gas_used: u64,
    pub gas_wanted: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// hash of the block header (upper-case hex)
    pub id: String,
    pub header: BlockHeader,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    pub version: BlockHeaderVersion,
    pub height: u64,
    pub chain_id: String,
    /// RFC 3339 time, e.g. `2020-02-15T10:39:10.4696305Z`
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeaderVersion {
    pub block: String,
    pub app: String,
}
