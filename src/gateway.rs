//! Contract interaction over one [`Session`].
//!
//! Every transaction pays an automatically simulated fee at the session's gas
//! price, with an empty memo. Failures are reported as a [`GatewayError`]
//! whose code tells which kind of operation failed.

use crate::{
    config::DeployConfig,
    cosmos::{
        Block, CodeDetails, Coin, ContractInfo, Fee, IndexedTx, InstantiateResult, TxResponse,
        UploadResult,
    },
    error::{GatewayError, GatewayErrorCode},
    session::Session,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

const NO_MEMO: &str = "";

fn encode(msg: &impl Serialize) -> Result<Value, GatewayError> {
    serde_json::to_value(msg).map_err(|err| GatewayError::new(GatewayErrorCode::InvalidMessage, err))
}

impl Session {
    /// Smart query of `contract`, the response decoded as `T`.
    pub async fn query<T: DeserializeOwned>(
        &self,
        contract: &str,
        msg: &impl Serialize,
    ) -> Result<T, GatewayError> {
        let msg = encode(msg)?;
        let response = self
            .client()
            .query_contract_smart(contract, &msg)
            .await
            .map_err(|err| GatewayError::new(GatewayErrorCode::QueryFailed, err))?;

        serde_json::from_value(response)
            .map_err(|err| GatewayError::new(GatewayErrorCode::QueryFailed, err))
    }

    pub async fn code_details(&self, code_id: u64) -> Result<CodeDetails, GatewayError> {
        self.client()
            .code_details(code_id)
            .await
            .map_err(|err| GatewayError::new(GatewayErrorCode::NotFound, err))
    }

    pub async fn contract_info(&self, contract: &str) -> Result<ContractInfo, GatewayError> {
        self.client()
            .contract(contract)
            .await
            .map_err(|err| GatewayError::new(GatewayErrorCode::NotFound, err))
    }

    /// Store `wasm` on chain, signed by the session's account.
    pub async fn upload(&self, wasm: &[u8]) -> Result<UploadResult, GatewayError> {
        let result = self
            .client()
            .upload(self.address(), wasm, Fee::Auto)
            .await
            .map_err(|err| GatewayError::new(GatewayErrorCode::UploadFailed, err))?;

        log::debug!(
            "{}: uploaded {} bytes as code {}",
            self.network_id(),
            result.original_size,
            result.code_id
        );
        Ok(result)
    }

    /// Instantiate `code_id`. The session's account becomes the contract
    /// admin, so it can migrate it later.
    pub async fn instantiate(
        &self,
        code_id: u64,
        msg: &impl Serialize,
        label: &str,
    ) -> Result<InstantiateResult, GatewayError> {
        let msg = encode(msg)?;
        self.client()
            .instantiate(
                self.address(),
                code_id,
                &msg,
                label,
                Fee::Auto,
                Some(self.address()),
            )
            .await
            .map_err(|err| GatewayError::new(GatewayErrorCode::InstantiateFailed, err))
    }

    pub async fn migrate(
        &self,
        contract: &str,
        code_id: u64,
        msg: &impl Serialize,
    ) -> Result<TxResponse, GatewayError> {
        let msg = encode(msg)?;
        self.client()
            .migrate(self.address(), contract, code_id, &msg, Fee::Auto)
            .await
            .map_err(|err| GatewayError::new(GatewayErrorCode::MigrateFailed, err))
    }

    pub async fn execute(
        &self,
        contract: &str,
        msg: &impl Serialize,
    ) -> Result<TxResponse, GatewayError> {
        self.execute_with_funds(contract, msg, &[]).await
    }

    /// Execute `msg` on `contract`, attaching `funds` to the transaction.
    pub async fn execute_with_funds(
        &self,
        contract: &str,
        msg: &impl Serialize,
        funds: &[Coin],
    ) -> Result<TxResponse, GatewayError> {
        let msg = encode(msg)?;
        self.client()
            .execute(self.address(), contract, &msg, Fee::Auto, NO_MEMO, funds)
            .await
            .map_err(|err| {
                if !funds.is_empty() {
                    log::error!(
                        "{}: execute on {contract} with funds failed: {err}",
                        self.network_id()
                    );
                }
                GatewayError::new(GatewayErrorCode::ExecuteFailed, err)
            })
    }

    /// Balance of the session's account in the network's fee denom.
    pub async fn balance(&self) -> Result<u128, GatewayError> {
        let coin = self
            .client()
            .balance(self.address(), &self.config().denom)
            .await
            .map_err(|err| GatewayError::new(GatewayErrorCode::BalanceQueryFailed, err))?;

        coin.amount.parse().map_err(|err| {
            GatewayError::new(
                GatewayErrorCode::BalanceQueryFailed,
                format!("invalid amount `{}': {err}", coin.amount),
            )
        })
    }

    /// Transactions matching a Tendermint query such as
    /// `wasm._contract_address='neutron1...'`.
    pub async fn search_tx(&self, query: &str) -> Result<Vec<IndexedTx>, GatewayError> {
        self.client()
            .search_tx(query)
            .await
            .map_err(|err| GatewayError::new(GatewayErrorCode::ChainQueryFailed, err))
    }

    /// the block at `height`, the latest one if `None`
    pub async fn block(&self, height: Option<u64>) -> Result<Block, GatewayError> {
        self.client()
            .block(height)
            .await
            .map_err(|err| GatewayError::new(GatewayErrorCode::ChainQueryFailed, err))
    }

    pub async fn height(&self) -> Result<u64, GatewayError> {
        self.client()
            .height()
            .await
            .map_err(|err| GatewayError::new(GatewayErrorCode::ChainQueryFailed, err))
    }

    pub fn contract(&self, address: impl Into<String>) -> Contract<'_> {
        Contract {
            session: self,
            address: address.into(),
        }
    }

    /// The contract of type `kind` recorded in `deploy` for this session's
    /// network and environment.
    pub fn deployed_contract(
        &self,
        deploy: &DeployConfig,
        kind: &str,
    ) -> Result<Contract<'_>, GatewayError> {
        deploy
            .contract(self.environment(), self.network_id(), kind)
            .and_then(|contract| contract.address.clone())
            .map(|address| self.contract(address))
            .ok_or_else(|| {
                GatewayError::new(
                    GatewayErrorCode::NotFound,
                    format!(
                        "no {kind} contract deployed on {} ({})",
                        self.network_id(),
                        self.environment()
                    ),
                )
            })
    }
}

/// A contract address bound to the session interacting with it.
#[derive(Debug, Clone)]
pub struct Contract<'a> {
    session: &'a Session,
    address: String,
}

impl Contract<'_> {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn session(&self) -> &Session {
        self.session
    }

    pub async fn info(&self) -> Result<ContractInfo, GatewayError> {
        self.session.contract_info(&self.address).await
    }

    pub async fn query<T: DeserializeOwned>(&self, msg: &impl Serialize) -> Result<T, GatewayError> {
        self.session.query(&self.address, msg).await
    }

    pub async fn execute(&self, msg: &impl Serialize) -> Result<TxResponse, GatewayError> {
        self.session.execute(&self.address, msg).await
    }

    pub async fn execute_with_funds(
        &self,
        msg: &impl Serialize,
        funds: &[Coin],
    ) -> Result<TxResponse, GatewayError> {
        self.session
            .execute_with_funds(&self.address, msg, funds)
            .await
    }

    pub async fn migrate(
        &self,
        code_id: u64,
        msg: &impl Serialize,
    ) -> Result<TxResponse, GatewayError> {
        self.session.migrate(&self.address, code_id, msg).await
    }
}
