use super::OfflineSigner;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(thread_local_v2, js_namespace = ["window"], js_name = "keplr")]
    pub static KEPLR: Option<Keplr>;
}

#[wasm_bindgen]
extern "C" {
    /// The object the Keplr extension injects in every page.
    #[derive(Clone, PartialEq)]
    pub type Keplr;

    /// Ask the user to unlock the wallet and allow this application to use
    /// `chain_id`. Resolves once the user answered, which may never happen.
    #[wasm_bindgen(method, catch)]
    pub async fn enable(this: &Keplr, chain_id: &str) -> Result<JsValue, JsValue>;

    /// A direct signer for `chain_id`. Only usable after [`Keplr::enable`].
    #[wasm_bindgen(method, catch, js_name = "getOfflineSigner")]
    pub fn offline_signer(this: &Keplr, chain_id: &str) -> Result<OfflineSigner, JsValue>;

    /// Register a chain unknown to the extension. The user is asked to
    /// approve the addition.
    #[wasm_bindgen(method, catch, js_name = "experimentalSuggestChain")]
    pub async fn suggest_chain(this: &Keplr, chain_info: JsValue) -> Result<JsValue, JsValue>;
}
