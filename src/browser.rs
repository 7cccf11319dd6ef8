//! [`Capabilities`] backed by cosmjs and the Keplr extension.

use crate::{
    client::{
        Capabilities, ChainClient, ChainConnector, MnemonicSignerFactory, OfflineSigner, Timer,
        WalletExtension,
    },
    config::GasPrice,
    cosmos::{
        AccountData, Block, ChainInfo, CodeDetails, Coin, ContractInfo, Fee, IndexedTx,
        InstantiateResult, TxResponse, UploadResult,
    },
    error::ClientError,
    ffi,
    signer::Signer,
};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::{any::Any, rc::Rc, time::Duration};
use wasm_bindgen::{JsCast as _, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Send the [`log`] records to the browser console.
pub fn init_logging(level: log::Level) {
    wasm_logger::init(wasm_logger::Config::new(level));
}

/// Decode a value thrown by JavaScript: an `Error`, a string or an object
/// with a `message` or `info` property.
pub(crate) fn client_error(error: JsValue) -> ClientError {
    if let Some(error) = error.dyn_ref::<js_sys::Error>() {
        return ClientError::new(String::from(error.message()));
    }
    if let Some(message) = error.as_string() {
        return ClientError::new(message);
    }
    serde_wasm_bindgen::from_value(error.clone())
        .unwrap_or_else(|_| ClientError::new(format!("{error:?}")))
}

fn decode<T: DeserializeOwned>(value: JsValue) -> Result<T, ClientError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|error| ClientError::new(format!("Couldn't decode the response: {error}")))
}

fn encode(value: &impl Serialize) -> Result<JsValue, ClientError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|error| ClientError::new(format!("Couldn't encode the request: {error}")))
}

impl Capabilities {
    /// Capabilities over the cosmjs classes exposed as `window.CosmWasmJS`
    /// and the Keplr extension, if any.
    pub fn from_window() -> Option<Self> {
        ffi::cosmjs::COSMWASM_JS.with(Clone::clone).map(Self::browser)
    }

    pub fn browser(cosmjs: ffi::CosmJs) -> Self {
        Self {
            connector: Rc::new(CosmJsConnector {
                cosmjs: cosmjs.clone(),
            }),
            mnemonic: Rc::new(CosmJsMnemonic { cosmjs }),
            extension: Rc::new(KeplrExtension),
            timer: Rc::new(WindowTimer),
        }
    }
}

pub struct JsSigner {
    inner: ffi::OfflineSigner,
}

impl JsSigner {
    pub fn js_value(&self) -> &ffi::OfflineSigner {
        &self.inner
    }
}

#[async_trait(?Send)]
impl OfflineSigner for JsSigner {
    async fn accounts(&self) -> Result<Vec<AccountData>, ClientError> {
        let accounts = self.inner.accounts().await.map_err(client_error)?;
        decode(accounts)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct CosmJsMnemonic {
    cosmjs: ffi::CosmJs,
}

#[async_trait(?Send)]
impl MnemonicSignerFactory for CosmJsMnemonic {
    async fn from_mnemonic(
        &self,
        phrase: &str,
        prefix: &str,
    ) -> Result<Rc<dyn OfflineSigner>, ClientError> {
        let options = encode(&json!({ "prefix": prefix }))?;
        let inner = self
            .cosmjs
            .direct_secp256k1_hd_wallet()
            .from_mnemonic(phrase, options)
            .await
            .map_err(client_error)?;
        Ok(Rc::new(JsSigner { inner }))
    }
}

/// The wallet extension found at `window.keplr`.
pub struct KeplrExtension;

impl KeplrExtension {
    fn keplr() -> Result<ffi::Keplr, ClientError> {
        ffi::keplr::KEPLR
            .with(Clone::clone)
            .ok_or_else(|| ClientError::new("window.keplr is not defined"))
    }
}

#[async_trait(?Send)]
impl WalletExtension for KeplrExtension {
    fn is_installed(&self) -> bool {
        ffi::keplr::KEPLR.with(Option::is_some)
    }

    async fn enable(&self, chain_id: &str) -> Result<(), ClientError> {
        Self::keplr()?
            .enable(chain_id)
            .await
            .map_err(client_error)?;
        Ok(())
    }

    fn offline_signer(&self, chain_id: &str) -> Result<Rc<dyn OfflineSigner>, ClientError> {
        let inner = Self::keplr()?
            .offline_signer(chain_id)
            .map_err(client_error)?;
        Ok(Rc::new(JsSigner { inner }))
    }

    async fn suggest_chain(&self, chain_info: &ChainInfo) -> Result<(), ClientError> {
        let chain_info = encode(chain_info)?;
        Self::keplr()?
            .suggest_chain(chain_info)
            .await
            .map_err(client_error)?;
        Ok(())
    }
}

/// Runs its callback when dropped.
struct OnDrop<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        if let Some(callback) = self.0.take() {
            callback();
        }
    }
}

pub struct WindowTimer;

#[async_trait(?Send)]
impl Timer for WindowTimer {
    async fn sleep(&self, duration: Duration) {
        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let mut id = JsValue::UNDEFINED;
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            id = ffi::set_timeout(&resolve, millis);
        });
        // clearing a timeout that already fired does nothing
        let _scheduled = OnDrop(Some(move || ffi::clear_timeout(&id)));
        // setTimeout never rejects
        let _ = JsFuture::from(promise).await;
    }
}

pub struct CosmJsConnector {
    cosmjs: ffi::CosmJs,
}

#[async_trait(?Send)]
impl ChainConnector for CosmJsConnector {
    async fn connect_with_signer(
        &self,
        rpc_url: &str,
        signer: &Signer,
        gas_price: &GasPrice,
    ) -> Result<Rc<dyn ChainClient>, ClientError> {
        let Some(js_signer) = signer.offline_signer().as_any().downcast_ref::<JsSigner>() else {
            return Err(ClientError::new(
                "the signer isn't backed by a JavaScript object",
            ));
        };

        let gas_price = self
            .cosmjs
            .gas_price()
            .from_string(&gas_price.to_string())
            .map_err(client_error)?;
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"gasPrice".into(), &gas_price).map_err(client_error)?;

        let client = self
            .cosmjs
            .signing_cosmwasm_client()
            .connect_with_signer(rpc_url, js_signer.js_value(), options.into())
            .await
            .map_err(client_error)?;

        Ok(Rc::new(CosmJsClient { client }))
    }
}

pub struct CosmJsClient {
    client: ffi::SigningCosmWasmClient,
}

#[async_trait(?Send)]
impl ChainClient for CosmJsClient {
    async fn balance(&self, address: &str, denom: &str) -> Result<Coin, ClientError> {
        let coin = self
            .client
            .balance(address, denom)
            .await
            .map_err(client_error)?;
        decode(coin)
    }

    async fn query_contract_smart(&self, address: &str, msg: &Value) -> Result<Value, ClientError> {
        let response = self
            .client
            .query_contract_smart(address, encode(msg)?)
            .await
            .map_err(client_error)?;
        decode(response)
    }

    async fn code_details(&self, code_id: u64) -> Result<CodeDetails, ClientError> {
        let details = self
            .client
            .code_details(code_id as f64)
            .await
            .map_err(client_error)?;
        decode(details)
    }

    async fn contract(&self, address: &str) -> Result<ContractInfo, ClientError> {
        let contract = self.client.contract(address).await.map_err(client_error)?;
        decode(contract)
    }

    async fn upload(&self, sender: &str, wasm: &[u8], fee: Fee) -> Result<UploadResult, ClientError> {
        let result = self
            .client
            .upload(sender, wasm, encode(&fee)?)
            .await
            .map_err(client_error)?;
        decode(result)
    }

    async fn instantiate(
        &self,
        sender: &str,
        code_id: u64,
        msg: &Value,
        label: &str,
        fee: Fee,
        admin: Option<&str>,
    ) -> Result<InstantiateResult, ClientError> {
        let options = match admin {
            Some(admin) => encode(&json!({ "admin": admin }))?,
            None => JsValue::UNDEFINED,
        };
        let result = self
            .client
            .instantiate(
                sender,
                code_id as f64,
                encode(msg)?,
                label,
                encode(&fee)?,
                options,
            )
            .await
            .map_err(client_error)?;
        decode(result)
    }

    async fn migrate(
        &self,
        sender: &str,
        address: &str,
        code_id: u64,
        msg: &Value,
        fee: Fee,
    ) -> Result<TxResponse, ClientError> {
        let result = self
            .client
            .migrate(sender, address, code_id as f64, encode(msg)?, encode(&fee)?)
            .await
            .map_err(client_error)?;
        decode(result)
    }

    async fn execute(
        &self,
        sender: &str,
        address: &str,
        msg: &Value,
        fee: Fee,
        memo: &str,
        funds: &[Coin],
    ) -> Result<TxResponse, ClientError> {
        let result = self
            .client
            .execute(
                sender,
                address,
                encode(msg)?,
                encode(&fee)?,
                memo,
                encode(&funds)?,
            )
            .await
            .map_err(client_error)?;
        decode(result)
    }

    async fn search_tx(&self, query: &str) -> Result<Vec<IndexedTx>, ClientError> {
        let txs = self.client.search_tx(query).await.map_err(client_error)?;
        decode(txs)
    }

    async fn block(&self, height: Option<u64>) -> Result<Block, ClientError> {
        let block = self
            .client
            .block(height.map(|height| height as f64))
            .await
            .map_err(client_error)?;
        decode(block)
    }

    async fn height(&self) -> Result<u64, ClientError> {
        let height = self.client.height().await.map_err(client_error)?;
        decode(height)
    }
}
