//! In-memory capabilities for the unit tests.

use crate::{
    client::{
        Capabilities, ChainClient, ChainConnector, MnemonicSignerFactory, OfflineSigner, Timer,
        WalletExtension,
    },
    config::{Environment, GasPrice, NetworkConfig, NetworkId, NetworkTable},
    cosmos::{
        AccountData, Attribute, Block, BlockHeader, BlockHeaderVersion, ChainInfo, CodeDetails,
        Coin, ContractInfo, Event, Fee, IndexedTx, InstantiateResult, TxResponse, UploadResult,
    },
    error::ClientError,
    manager::SessionManager,
    session::Session,
    signer::{Approval, Signer, SignerSource, acquire_signer},
};
use async_trait::async_trait;
use futures::{executor::block_on, future};
use serde_json::Value;
use sha2::{Digest as _, Sha256};
use std::{
    any::Any,
    cell::{Cell, RefCell},
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
    time::Duration,
};

pub(crate) const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

pub(crate) const NETWORK_JSON: &str = r#"{
    "neutron_local": {
        "rpc_url": "http://localhost:26657",
        "rest_url": "http://localhost:1317",
        "gas_price": "0.025",
        "full_denom": "neutron",
        "denom": "untrn",
        "chain_id": "neutron-local",
        "addr_prefix": "neutron"
    },
    "neutron_testnet": {
        "rpc_url": "https://rpc-palvus.pion-1.ntrn.tech",
        "rest_url": "https://rest-palvus.pion-1.ntrn.tech",
        "gas_price": "0.05",
        "full_denom": "neutron",
        "denom": "untrn",
        "chain_id": "pion-1",
        "addr_prefix": "neutron"
    },
    "kujira_local": {
        "rpc_url": "http://localhost:26667",
        "rest_url": "http://localhost:1327",
        "gas_price": "0.0034",
        "full_denom": "kujira",
        "denom": "ukuji",
        "chain_id": "kujira-local",
        "addr_prefix": "kujira"
    },
    "kujira_testnet": {
        "rpc_url": "https://kujira-testnet-rpc.polkachu.com",
        "rest_url": "https://kujira-testnet-api.polkachu.com",
        "gas_price": "0.0034",
        "full_denom": "kujira",
        "denom": "ukuji",
        "chain_id": "harpoon-4",
        "addr_prefix": "kujira"
    },
    "stargaze_local": {
        "rpc_url": "http://localhost:26677",
        "rest_url": "http://localhost:1337",
        "gas_price": "0.04",
        "full_denom": "stargaze",
        "denom": "ustars",
        "chain_id": "stargaze-local",
        "addr_prefix": "stars"
    },
    "stargaze_testnet": {
        "rpc_url": "https://rpc.elgafar-1.stargaze-apis.com",
        "rest_url": "https://rest.elgafar-1.stargaze-apis.com",
        "gas_price": "0.04",
        "full_denom": "stargaze",
        "denom": "ustars",
        "chain_id": "elgafar-1",
        "addr_prefix": "stars"
    },
    "nois_local": {
        "rpc_url": "http://localhost:26687",
        "rest_url": "http://localhost:1347",
        "gas_price": "0.05",
        "full_denom": "nois",
        "denom": "unois",
        "chain_id": "nois-local",
        "addr_prefix": "nois"
    },
    "nois_testnet": {
        "rpc_url": "https://nois-testnet-rpc.polkachu.com",
        "rest_url": "https://nois-testnet-api.polkachu.com",
        "gas_price": "0.05",
        "full_denom": "nois",
        "denom": "unois",
        "chain_id": "nois-testnet-005",
        "addr_prefix": "nois"
    }
}"#;

pub(crate) struct FakeSigner {
    accounts: Vec<AccountData>,
}

impl FakeSigner {
    fn new(addresses: impl IntoIterator<Item = String>) -> Self {
        Self {
            accounts: addresses
                .into_iter()
                .map(|address| AccountData {
                    address,
                    algo: "secp256k1".to_owned(),
                })
                .collect(),
        }
    }
}

#[async_trait(?Send)]
impl OfflineSigner for FakeSigner {
    async fn accounts(&self) -> Result<Vec<AccountData>, ClientError> {
        Ok(self.accounts.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Derives `<prefix>1testaccount<n>` addresses from any phrase but `"invalid"`.
pub(crate) struct FakeMnemonic {
    prefixes: RefCell<Vec<String>>,
    account_count: Cell<usize>,
}

impl FakeMnemonic {
    pub fn prefixes(&self) -> Vec<String> {
        self.prefixes.borrow().clone()
    }

    pub fn set_account_count(&self, count: usize) {
        self.account_count.set(count);
    }
}

#[async_trait(?Send)]
impl MnemonicSignerFactory for FakeMnemonic {
    async fn from_mnemonic(
        &self,
        phrase: &str,
        prefix: &str,
    ) -> Result<Rc<dyn OfflineSigner>, ClientError> {
        self.prefixes.borrow_mut().push(prefix.to_owned());
        if phrase == "invalid" {
            return Err(ClientError::new("Invalid mnemonic"));
        }

        let addresses = (0..self.account_count.get()).map(|n| format!("{prefix}1testaccount{n}"));
        Ok(Rc::new(FakeSigner::new(addresses)))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum EnableBehaviour {
    Approve,
    Reject(&'static str),
    Pending,
}

pub(crate) struct FakeExtension {
    installed: Cell<bool>,
    enable: Cell<EnableBehaviour>,
    enable_for: RefCell<BTreeMap<String, EnableBehaviour>>,
    calls: RefCell<Vec<String>>,
    suggest_failures: RefCell<BTreeSet<String>>,
    suggested: RefCell<Vec<ChainInfo>>,
}

impl FakeExtension {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn set_installed(&self, installed: bool) {
        self.installed.set(installed);
    }

    pub fn set_enable(&self, behaviour: EnableBehaviour) {
        self.enable.set(behaviour);
    }

    /// answer `chain_id` with `behaviour`, the others as set by
    /// [`FakeExtension::set_enable`]
    pub fn set_enable_for(&self, chain_id: &str, behaviour: EnableBehaviour) {
        self.enable_for
            .borrow_mut()
            .insert(chain_id.to_owned(), behaviour);
    }

    pub fn fail_suggest(&self, chain_id: &str) {
        self.suggest_failures.borrow_mut().insert(chain_id.to_owned());
    }

    pub fn suggested(&self) -> Vec<ChainInfo> {
        self.suggested.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl WalletExtension for FakeExtension {
    fn is_installed(&self) -> bool {
        self.record("is_installed".to_owned());
        self.installed.get()
    }

    async fn enable(&self, chain_id: &str) -> Result<(), ClientError> {
        self.record(format!("enable {chain_id}"));
        let behaviour = self
            .enable_for
            .borrow()
            .get(chain_id)
            .copied()
            .unwrap_or(self.enable.get());
        match behaviour {
            EnableBehaviour::Approve => Ok(()),
            EnableBehaviour::Reject(reason) => Err(ClientError::new(reason)),
            EnableBehaviour::Pending => future::pending().await,
        }
    }

    fn offline_signer(&self, chain_id: &str) -> Result<Rc<dyn OfflineSigner>, ClientError> {
        self.record(format!("offline_signer {chain_id}"));
        Ok(Rc::new(FakeSigner::new([format!("{chain_id}1keplraccount")])))
    }

    async fn suggest_chain(&self, chain_info: &ChainInfo) -> Result<(), ClientError> {
        self.record(format!("suggest_chain {}", chain_info.chain_id));
        if self.suggest_failures.borrow().contains(&chain_info.chain_id) {
            return Err(ClientError::new("Invalid chain info"));
        }
        self.suggested.borrow_mut().push(chain_info.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct ImmediateTimer {
    sleeps: RefCell<Vec<Duration>>,
}

impl ImmediateTimer {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Timer for ImmediateTimer {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}

pub(crate) struct FakeConnector {
    client: Rc<FakeClient>,
    failing: RefCell<BTreeSet<String>>,
    hanging: RefCell<BTreeSet<String>>,
    connections: RefCell<Vec<(String, String)>>,
}

impl FakeConnector {
    pub fn fail_on(&self, rpc_url: &str) {
        self.failing.borrow_mut().insert(rpc_url.to_owned());
    }

    /// never answer connections to `rpc_url`
    pub fn hang_on(&self, rpc_url: &str) {
        self.hanging.borrow_mut().insert(rpc_url.to_owned());
    }

    /// `(rpc_url, gas_price)` of every successful connection
    pub fn connections(&self) -> Vec<(String, String)> {
        self.connections.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ChainConnector for FakeConnector {
    async fn connect_with_signer(
        &self,
        rpc_url: &str,
        _signer: &Signer,
        gas_price: &GasPrice,
    ) -> Result<Rc<dyn ChainClient>, ClientError> {
        if self.hanging.borrow().contains(rpc_url) {
            return future::pending().await;
        }
        if self.failing.borrow().contains(rpc_url) {
            return Err(ClientError::new("fetch failed"));
        }
        self.connections
            .borrow_mut()
            .push((rpc_url.to_owned(), gas_price.to_string()));
        Ok(self.client.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExecuteCall {
    pub sender: String,
    pub contract: String,
    pub msg: Value,
    pub funds: Vec<Coin>,
}

/// A single in-memory chain shared by every session of a [`Fixture`].
#[derive(Default)]
pub(crate) struct FakeClient {
    failures: RefCell<BTreeSet<&'static str>>,
    balances: RefCell<BTreeMap<(String, String), String>>,
    query_responses: RefCell<BTreeMap<String, Value>>,
    codes: RefCell<Vec<CodeDetails>>,
    contracts: RefCell<BTreeMap<String, ContractInfo>>,
    instantiate_msgs: RefCell<Vec<Value>>,
    migrations: RefCell<Vec<(String, u64)>>,
    executes: RefCell<Vec<ExecuteCall>>,
    txs: RefCell<Vec<IndexedTx>>,
    height: Cell<u64>,
}

impl FakeClient {
    /// make every call to `method` fail
    pub fn fail(&self, method: &'static str) {
        self.failures.borrow_mut().insert(method);
    }

    pub fn set_balance(&self, address: &str, denom: &str, amount: &str) {
        self.balances
            .borrow_mut()
            .insert((address.to_owned(), denom.to_owned()), amount.to_owned());
    }

    pub fn set_query_response(&self, contract: &str, response: Value) {
        self.query_responses
            .borrow_mut()
            .insert(contract.to_owned(), response);
    }

    pub fn codes(&self) -> Vec<CodeDetails> {
        self.codes.borrow().clone()
    }

    pub fn instantiate_msgs(&self) -> Vec<Value> {
        self.instantiate_msgs.borrow().clone()
    }

    pub fn migrations(&self) -> Vec<(String, u64)> {
        self.migrations.borrow().clone()
    }

    pub fn executes(&self) -> Vec<ExecuteCall> {
        self.executes.borrow().clone()
    }

    fn check(&self, method: &'static str) -> Result<(), ClientError> {
        if self.failures.borrow().contains(method) {
            Err(ClientError::new(format!("{method} failed")))
        } else {
            Ok(())
        }
    }

    fn broadcast(&self, events: Vec<Event>) -> TxResponse {
        let height = self.height.get() + 1;
        self.height.set(height);

        let mut txs = self.txs.borrow_mut();
        let hash = format!("{:064X}", txs.len() + 1);
        txs.push(IndexedTx {
            height,
            hash: hash.clone(),
            code: 0,
            events: events.clone(),
            raw_log: String::new(),
            gas_used: 100_000,
            gas_wanted: 120_000,
        });

        TxResponse {
            height,
            transaction_hash: hash,
            gas_used: 100_000,
            gas_wanted: 120_000,
            logs: None,
            events: Some(events),
        }
    }
}

fn wasm_event(contract: &str) -> Event {
    Event {
        ty: "wasm".to_owned(),
        attributes: vec![Attribute {
            key: "_contract_address".to_owned(),
            value: contract.to_owned(),
        }],
    }
}

#[async_trait(?Send)]
impl ChainClient for FakeClient {
    async fn balance(&self, address: &str, denom: &str) -> Result<Coin, ClientError> {
        self.check("balance")?;
        let amount = self
            .balances
            .borrow()
            .get(&(address.to_owned(), denom.to_owned()))
            .cloned()
            .unwrap_or_else(|| "0".to_owned());
        Ok(Coin {
            denom: denom.to_owned(),
            amount,
        })
    }

    async fn query_contract_smart(&self, address: &str, _msg: &Value) -> Result<Value, ClientError> {
        self.check("query")?;
        self.query_responses
            .borrow()
            .get(address)
            .cloned()
            .ok_or_else(|| ClientError::new(format!("no contract at {address}")))
    }

    async fn code_details(&self, code_id: u64) -> Result<CodeDetails, ClientError> {
        self.check("code_details")?;
        self.codes
            .borrow()
            .iter()
            .find(|code| code.id == code_id)
            .cloned()
            .ok_or_else(|| ClientError::new("code not found"))
    }

    async fn contract(&self, address: &str) -> Result<ContractInfo, ClientError> {
        self.check("contract")?;
        self.contracts
            .borrow()
            .get(address)
            .cloned()
            .ok_or_else(|| ClientError::new(format!("no contract at {address}")))
    }

    async fn upload(&self, sender: &str, wasm: &[u8], _fee: Fee) -> Result<UploadResult, ClientError> {
        self.check("upload")?;
        let checksum = hex::encode(Sha256::digest(wasm));
        let code_id = {
            let mut codes = self.codes.borrow_mut();
            let code_id = codes.len() as u64 + 1;
            codes.push(CodeDetails {
                id: code_id,
                creator: sender.to_owned(),
                checksum: checksum.clone(),
            });
            code_id
        };

        Ok(UploadResult {
            checksum,
            original_size: wasm.len() as u64,
            compressed_size: wasm.len() as u64 / 2,
            code_id,
            tx: self.broadcast(Vec::new()),
        })
    }

    async fn instantiate(
        &self,
        sender: &str,
        code_id: u64,
        msg: &Value,
        label: &str,
        _fee: Fee,
        admin: Option<&str>,
    ) -> Result<InstantiateResult, ClientError> {
        self.check("instantiate")?;
        if !self.codes.borrow().iter().any(|code| code.id == code_id) {
            return Err(ClientError::new("code not found"));
        }

        let prefix = sender.split_once('1').map_or(sender, |(prefix, _)| prefix);
        let address = format!("{prefix}1contract{}", self.contracts.borrow().len() + 1);
        self.contracts.borrow_mut().insert(
            address.clone(),
            ContractInfo {
                address: address.clone(),
                code_id,
                creator: sender.to_owned(),
                admin: admin.map(str::to_owned),
                label: label.to_owned(),
                ibc_port_id: Some(format!("wasm.{address}")),
            },
        );
        self.instantiate_msgs.borrow_mut().push(msg.clone());

        Ok(InstantiateResult {
            tx: self.broadcast(vec![wasm_event(&address)]),
            contract_address: address,
        })
    }

    async fn migrate(
        &self,
        _sender: &str,
        address: &str,
        code_id: u64,
        _msg: &Value,
        _fee: Fee,
    ) -> Result<TxResponse, ClientError> {
        self.check("migrate")?;
        match self.contracts.borrow_mut().get_mut(address) {
            Some(contract) => contract.code_id = code_id,
            None => return Err(ClientError::new(format!("no contract at {address}"))),
        }
        self.migrations
            .borrow_mut()
            .push((address.to_owned(), code_id));
        Ok(self.broadcast(vec![wasm_event(address)]))
    }

    async fn execute(
        &self,
        sender: &str,
        address: &str,
        msg: &Value,
        _fee: Fee,
        _memo: &str,
        funds: &[Coin],
    ) -> Result<TxResponse, ClientError> {
        self.check("execute")?;
        self.executes.borrow_mut().push(ExecuteCall {
            sender: sender.to_owned(),
            contract: address.to_owned(),
            msg: msg.clone(),
            funds: funds.to_vec(),
        });
        Ok(self.broadcast(vec![wasm_event(address)]))
    }

    async fn search_tx(&self, query: &str) -> Result<Vec<IndexedTx>, ClientError> {
        self.check("search_tx")?;
        Ok(self
            .txs
            .borrow()
            .iter()
            .filter(|tx| {
                tx.events
                    .iter()
                    .flat_map(|event| event.attributes.iter())
                    .any(|attribute| query.contains(&attribute.value))
            })
            .cloned()
            .collect())
    }

    async fn block(&self, height: Option<u64>) -> Result<Block, ClientError> {
        self.check("block")?;
        let latest = self.height.get();
        let height = height.unwrap_or(latest);
        if height > latest {
            return Err(ClientError::new(format!(
                "height {height} must be less than or equal to the current blockchain height {latest}"
            )));
        }

        Ok(Block {
            id: format!("{height:064X}"),
            header: BlockHeader {
                version: BlockHeaderVersion {
                    block: "11".to_owned(),
                    app: "0".to_owned(),
                },
                height,
                chain_id: "fake-chain".to_owned(),
                time: "2024-01-01T00:00:00Z".to_owned(),
            },
        })
    }

    async fn height(&self) -> Result<u64, ClientError> {
        self.check("height")?;
        Ok(self.height.get())
    }
}

/// The [`NetworkTable`] of [`NETWORK_JSON`] and a set of fakes wired into
/// [`Capabilities`].
pub(crate) struct Fixture {
    pub table: NetworkTable,
    pub capabilities: Capabilities,
    pub connector: Rc<FakeConnector>,
    pub client: Rc<FakeClient>,
    pub mnemonic: Rc<FakeMnemonic>,
    pub extension: Rc<FakeExtension>,
    pub timer: Rc<ImmediateTimer>,
}

impl Fixture {
    pub fn new() -> Self {
        let client = Rc::new(FakeClient::default());
        let connector = Rc::new(FakeConnector {
            client: client.clone(),
            failing: RefCell::default(),
            hanging: RefCell::default(),
            connections: RefCell::default(),
        });
        let mnemonic = Rc::new(FakeMnemonic {
            prefixes: RefCell::default(),
            account_count: Cell::new(1),
        });
        let extension = Rc::new(FakeExtension {
            installed: Cell::new(true),
            enable: Cell::new(EnableBehaviour::Approve),
            enable_for: RefCell::default(),
            calls: RefCell::default(),
            suggest_failures: RefCell::default(),
            suggested: RefCell::default(),
        });
        let timer = Rc::new(ImmediateTimer::default());

        let capabilities = Capabilities {
            connector: connector.clone(),
            mnemonic: mnemonic.clone(),
            extension: extension.clone(),
            timer: timer.clone(),
        };

        Self {
            table: NetworkTable::from_json(NETWORK_JSON).unwrap(),
            capabilities,
            connector,
            client,
            mnemonic,
            extension,
            timer,
        }
    }

    /// local configuration of `network`
    pub fn config(&self, network: &str) -> NetworkConfig {
        self.table
            .resolve(&NetworkId::new(network), Environment::Local)
            .unwrap()
    }

    pub fn mnemonic_source(&self) -> SignerSource {
        SignerSource::from_phrase(Some(TEST_MNEMONIC.to_owned()))
    }

    pub fn manager(&self) -> SessionManager {
        SessionManager::new(self.table.clone(), self.capabilities.clone())
    }

    /// local session on `network` signed by the test mnemonic
    pub fn session(&self, network: &str) -> Session {
        let config = self.config(network);
        block_on(async {
            let signer = acquire_signer(
                &config,
                &self.mnemonic_source(),
                &self.capabilities,
                &Approval::default(),
            )
            .await?;
            Session::establish(
                NetworkId::new(network),
                config,
                signer,
                Environment::Local,
                self.connector.as_ref(),
            )
            .await
        })
        .unwrap()
    }
}
