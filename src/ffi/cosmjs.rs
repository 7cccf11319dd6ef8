//! cosmjs classes, as exported by `@cosmjs/cosmwasm-stargate`,
//! `@cosmjs/stargate` and `@cosmjs/proto-signing`.
//!
//! The host page bundles them and exposes them as `window.CosmWasmJS`:
//!
//! ```js
//! window.CosmWasmJS = { SigningCosmWasmClient, GasPrice, DirectSecp256k1HdWallet };
//! ```

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(thread_local_v2, js_namespace = ["window"], js_name = "CosmWasmJS")]
    pub static COSMWASM_JS: Option<CosmJs>;
}

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type CosmJs;

    #[wasm_bindgen(method, getter, js_name = "SigningCosmWasmClient")]
    pub fn signing_cosmwasm_client(this: &CosmJs) -> SigningCosmWasmClientClass;

    #[wasm_bindgen(method, getter, js_name = "GasPrice")]
    pub fn gas_price(this: &CosmJs) -> GasPriceClass;

    #[wasm_bindgen(method, getter, js_name = "DirectSecp256k1HdWallet")]
    pub fn direct_secp256k1_hd_wallet(this: &CosmJs) -> HdWalletClass;
}

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type SigningCosmWasmClientClass;

    /// `options` carries the `gasPrice` used by the `"auto"` fee.
    #[wasm_bindgen(method, catch, js_name = "connectWithSigner")]
    pub async fn connect_with_signer(
        this: &SigningCosmWasmClientClass,
        endpoint: &str,
        signer: &OfflineSigner,
        options: JsValue,
    ) -> Result<SigningCosmWasmClient, JsValue>;

    #[derive(Debug, Clone)]
    pub type GasPriceClass;

    /// parses strings like `0.025untrn`
    #[wasm_bindgen(method, catch, js_name = "fromString")]
    pub fn from_string(this: &GasPriceClass, gas_price: &str) -> Result<JsValue, JsValue>;

    #[derive(Debug, Clone)]
    pub type HdWalletClass;

    #[wasm_bindgen(method, catch, js_name = "fromMnemonic")]
    pub async fn from_mnemonic(
        this: &HdWalletClass,
        mnemonic: &str,
        options: JsValue,
    ) -> Result<OfflineSigner, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type OfflineSigner;

    #[wasm_bindgen(method, catch, js_name = "getAccounts")]
    pub async fn accounts(this: &OfflineSigner) -> Result<JsValue, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type SigningCosmWasmClient;

    #[wasm_bindgen(method, catch, js_name = "getBalance")]
    pub async fn balance(
        this: &SigningCosmWasmClient,
        address: &str,
        denom: &str,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "queryContractSmart")]
    pub async fn query_contract_smart(
        this: &SigningCosmWasmClient,
        address: &str,
        msg: JsValue,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "getCodeDetails")]
    pub async fn code_details(this: &SigningCosmWasmClient, code_id: f64)
    -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "getContract")]
    pub async fn contract(this: &SigningCosmWasmClient, address: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub async fn upload(
        this: &SigningCosmWasmClient,
        sender: &str,
        wasm: &[u8],
        fee: JsValue,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub async fn instantiate(
        this: &SigningCosmWasmClient,
        sender: &str,
        code_id: f64,
        msg: JsValue,
        label: &str,
        fee: JsValue,
        options: JsValue,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub async fn migrate(
        this: &SigningCosmWasmClient,
        sender: &str,
        address: &str,
        code_id: f64,
        msg: JsValue,
        fee: JsValue,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub async fn execute(
        this: &SigningCosmWasmClient,
        sender: &str,
        address: &str,
        msg: JsValue,
        fee: JsValue,
        memo: &str,
        funds: JsValue,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "searchTx")]
    pub async fn search_tx(this: &SigningCosmWasmClient, query: &str) -> Result<JsValue, JsValue>;

    /// the latest block if `height` is undefined
    #[wasm_bindgen(method, catch, js_name = "getBlock")]
    pub async fn block(
        this: &SigningCosmWasmClient,
        height: Option<f64>,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "getHeight")]
    pub async fn height(this: &SigningCosmWasmClient) -> Result<JsValue, JsValue>;
}
