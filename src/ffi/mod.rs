//! Raw bindings to the JavaScript objects the browser capabilities are
//! built on.

pub mod cosmjs;
pub mod keplr;

pub use self::{
    cosmjs::{CosmJs, OfflineSigner, SigningCosmWasmClient},
    keplr::Keplr,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "setTimeout")]
    pub fn set_timeout(handler: &js_sys::Function, timeout: i32) -> JsValue;

    #[wasm_bindgen(js_name = "clearTimeout")]
    pub fn clear_timeout(id: &JsValue);
}
