//! The external capabilities the sessions are built upon.
//!
//! In the browser they are backed by cosmjs and the Keplr extension (see
//! [`crate::browser`]); everything else in this crate only sees these
//! traits. They are `?Send`: a wasm application runs on one thread and the
//! JavaScript handles can't leave it.

use crate::{
    config::GasPrice,
    cosmos::{
        AccountData, Block, ChainInfo, Coin, CodeDetails, ContractInfo, Fee, IndexedTx,
        InstantiateResult, TxResponse, UploadResult,
    },
    error::ClientError,
    signer::Signer,
};
use async_trait::async_trait;
use serde_json::Value;
use std::{any::Any, rc::Rc, time::Duration};

/// Source of signatures for the accounts it exposes.
#[async_trait(?Send)]
pub trait OfflineSigner {
    async fn accounts(&self) -> Result<Vec<AccountData>, ClientError>;

    /// give access to the concrete signer so a [`ChainConnector`] can hand
    /// its native object over to the client it opens
    fn as_any(&self) -> &dyn Any;
}

/// Opens signing connections to a network.
#[async_trait(?Send)]
pub trait ChainConnector {
    async fn connect_with_signer(
        &self,
        rpc_url: &str,
        signer: &Signer,
        gas_price: &GasPrice,
    ) -> Result<Rc<dyn ChainClient>, ClientError>;
}

/// A signing connection to one network.
#[async_trait(?Send)]
pub trait ChainClient {
    async fn balance(&self, address: &str, denom: &str) -> Result<Coin, ClientError>;

    async fn query_contract_smart(&self, address: &str, msg: &Value) -> Result<Value, ClientError>;

    async fn code_details(&self, code_id: u64) -> Result<CodeDetails, ClientError>;

    async fn contract(&self, address: &str) -> Result<ContractInfo, ClientError>;

    async fn upload(&self, sender: &str, wasm: &[u8], fee: Fee)
    -> Result<UploadResult, ClientError>;

    async fn instantiate(
        &self,
        sender: &str,
        code_id: u64,
        msg: &Value,
        label: &str,
        fee: Fee,
        admin: Option<&str>,
    ) -> Result<InstantiateResult, ClientError>;

    async fn migrate(
        &self,
        sender: &str,
        address: &str,
        code_id: u64,
        msg: &Value,
        fee: Fee,
    ) -> Result<TxResponse, ClientError>;

    async fn execute(
        &self,
        sender: &str,
        address: &str,
        msg: &Value,
        fee: Fee,
        memo: &str,
        funds: &[Coin],
    ) -> Result<TxResponse, ClientError>;

    async fn search_tx(&self, query: &str) -> Result<Vec<IndexedTx>, ClientError>;

    /// the block at `height`, or the latest block
    async fn block(&self, height: Option<u64>) -> Result<Block, ClientError>;

    async fn height(&self) -> Result<u64, ClientError>;
}

/// A wallet extension installed in the browser, holding the user's keys.
#[async_trait(?Send)]
pub trait WalletExtension {
    fn is_installed(&self) -> bool;

    /// Ask the user to authorise the application on `chain_id`. This may
    /// wait for as long as the user takes to answer.
    async fn enable(&self, chain_id: &str) -> Result<(), ClientError>;

    fn offline_signer(&self, chain_id: &str) -> Result<Rc<dyn OfflineSigner>, ClientError>;

    /// register a chain the extension doesn't know about yet
    async fn suggest_chain(&self, chain_info: &ChainInfo) -> Result<(), ClientError>;
}

/// Derives a signer from a secret phrase, without I/O.
#[async_trait(?Send)]
pub trait MnemonicSignerFactory {
    async fn from_mnemonic(
        &self,
        phrase: &str,
        prefix: &str,
    ) -> Result<Rc<dyn OfflineSigner>, ClientError>;
}

#[async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

/// Everything needed to acquire signers and establish sessions.
#[derive(Clone)]
pub struct Capabilities {
    pub connector: Rc<dyn ChainConnector>,
    pub mnemonic: Rc<dyn MnemonicSignerFactory>,
    pub extension: Rc<dyn WalletExtension>,
    pub timer: Rc<dyn Timer>,
}
