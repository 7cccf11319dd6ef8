/*!

# Cosmos Connector for CosmWasm networks

This library is meant to be used by web applications talking to several CosmWasm
networks at once. It establishes one authenticated session per network and gives
a uniform way to query and execute contracts over each of them.

## Features

- Connect every network of an environment (`local` or `testnet`) in one call
- Sign with the Keplr extension, or with a secret phrase for tests and scripts
- Query, upload, instantiate, migrate and execute contracts
- Register the chains with Keplr
- Keep track of the deployed contracts

## Usage

Load the network table (the `network.json` file, see [`NetworkTable::from_json`])
and connect all the default networks:

```no_run
use cosmos_connector::{Capabilities, Environment, NetworkTable, SessionManager, SignerSource};

# async fn test(network_json: &str) -> anyhow::Result<()> {
let table = NetworkTable::from_json(network_json)?;
let capabilities = Capabilities::from_window().expect("cosmjs is loaded");
let manager = SessionManager::new(table, capabilities);

let sessions = manager
    .connect_all(Environment::Testnet, &SignerSource::Extension)
    .await?;
# Ok(()) }
```

Either every network is connected or none is. A [`ConnectError`] tells whether
the user has something to do (install the extension, approve the request) with
[`ConnectError::is_user_action_required`].

Every [`Session`] then talks to its own network:

```no_run
# use cosmos_connector::SessionSet;
# use serde_json::json;
# async fn test(sessions: SessionSet) -> anyhow::Result<()> {
let neutron = sessions.get("neutron").unwrap();

let balance = neutron.balance().await?;
let messages: serde_json::Value = neutron
    .query("neutron1...", &json!({ "messages": {} }))
    .await?;
neutron
    .execute("neutron1...", &json!({ "send": { "message": "hello" } }))
    .await?;
# Ok(()) }
```

*/

pub mod browser;
pub mod client;
pub mod config;
pub mod cosmos;
pub mod deploy;
pub mod error;
pub mod ffi;
mod gateway;
mod manager;
mod session;
mod signer;
#[cfg(test)]
pub(crate) mod testing;

pub use self::{
    client::Capabilities,
    config::{DeployConfig, Environment, NetworkConfig, NetworkId, NetworkTable},
    error::{ClientError, ConfigError, ConnectError, DeployError, GatewayError, GatewayErrorCode},
    gateway::Contract,
    manager::{InstallFailure, InstallReport, SessionManager, SessionSet},
    session::Session,
    signer::{
        Approval, CancelHandle, CancelToken, SecretPhrase, Signer, SignerKind, SignerSource,
        acquire_signer, cancel_token,
    },
};
