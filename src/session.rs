use crate::{
    client::{ChainClient, ChainConnector},
    config::{Environment, NetworkConfig, NetworkId},
    error::ConnectError,
    signer::Signer,
};
use std::{fmt, rc::Rc};

/// An authenticated, signer bound connection to one network.
///
/// A session always has an account: [`Session::establish`] fails instead of
/// building a session whose signer exposes none.
#[derive(Clone)]
pub struct Session {
    network_id: NetworkId,
    environment: Environment,
    config: NetworkConfig,
    signer: Signer,
    address: String,
    client: Rc<dyn ChainClient>,
}

impl Session {
    /// Open a signing connection to `config.rpc_url` and bind the first
    /// account of `signer`.
    pub async fn establish(
        network_id: NetworkId,
        config: NetworkConfig,
        signer: Signer,
        environment: Environment,
        connector: &dyn ChainConnector,
    ) -> Result<Self, ConnectError> {
        let gas_price = config.gas_price()?;

        log::debug!("{network_id}: connecting to {} ({gas_price})", config.rpc_url);
        let client = connector
            .connect_with_signer(&config.rpc_url, &signer, &gas_price)
            .await
            .map_err(|source| ConnectError::ConnectionFailed {
                network: network_id.clone(),
                source,
            })?;

        let accounts =
            signer
                .accounts()
                .await
                .map_err(|source| ConnectError::ConnectionFailed {
                    network: network_id.clone(),
                    source,
                })?;
        let Some(address) = accounts
            .into_iter()
            .next()
            .map(|account| account.address)
            .filter(|address| !address.is_empty())
        else {
            return Err(ConnectError::NoAccount {
                network: network_id,
            });
        };

        log::info!("{network_id}: connected to {} as {address}", config.chain_id);

        Ok(Self {
            network_id,
            environment,
            config,
            signer,
            address,
            client,
        })
    }

    pub fn network_id(&self) -> &NetworkId {
        &self.network_id
    }

    /// the environment the configuration was resolved against
    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// address of the account signing the transactions of this session
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn client(&self) -> &dyn ChainClient {
        self.client.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("network_id", &self.network_id)
            .field("environment", &self.environment)
            .field("chain_id", &self.config.chain_id)
            .field("address", &self.address)
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}
