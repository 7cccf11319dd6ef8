use crate::{
    client::Capabilities,
    config::{DEFAULT_NETWORKS, Environment, NetworkConfig, NetworkId, NetworkTable},
    cosmos::ChainInfo,
    error::{ClientError, ConnectError},
    session::Session,
    signer::{Approval, Signer, SignerSource, acquire_signer},
};
use futures::future;
use std::collections::BTreeMap;

/// Drives the session establishment over every supported network.
pub struct SessionManager {
    table: NetworkTable,
    networks: Vec<NetworkId>,
    capabilities: Capabilities,
    approval: Approval,
}

impl SessionManager {
    /// A manager for the [`DEFAULT_NETWORKS`].
    pub fn new(table: NetworkTable, capabilities: Capabilities) -> Self {
        Self::with_networks(table, capabilities, DEFAULT_NETWORKS.map(NetworkId::new))
    }

    /// A manager for `networks`, connected in the given order. Duplicates
    /// are ignored.
    pub fn with_networks(
        table: NetworkTable,
        capabilities: Capabilities,
        networks: impl IntoIterator<Item = NetworkId>,
    ) -> Self {
        let mut unique = Vec::new();
        for network in networks {
            if !unique.contains(&network) {
                unique.push(network);
            }
        }

        Self {
            table,
            networks: unique,
            capabilities,
            approval: Approval::default(),
        }
    }

    /// bound the wait for the wallet extension approvals
    pub fn with_approval(mut self, approval: Approval) -> Self {
        self.approval = approval;
        self
    }

    pub fn networks(&self) -> &[NetworkId] {
        &self.networks
    }

    /// Connect every network, all or nothing.
    ///
    /// The configurations are resolved first, nothing is contacted if one is
    /// missing. The signers are then acquired one network at a time, so the
    /// wallet extension shows a single approval prompt at once, and the
    /// sessions are established concurrently.
    ///
    /// Fails fast: the first error ends the batch, the pending approvals and
    /// connections are dropped and so are the sessions already established.
    /// A [`SessionSet`] is only returned once every network succeeded.
    pub async fn connect_all(
        &self,
        environment: Environment,
        source: &SignerSource,
    ) -> Result<SessionSet, ConnectError> {
        let configs = self.table.resolve_all(&self.networks, environment)?;

        log::info!(
            "connecting {} networks in the {environment} environment",
            configs.len()
        );
        let mut signed = Vec::with_capacity(configs.len());
        for (network, config) in configs {
            let signer = acquire_signer(&config, source, &self.capabilities, &self.approval)
                .await
                .inspect_err(|error| log::warn!("{network}: {error}"))?;
            signed.push((network, config, signer));
        }

        let sessions = future::try_join_all(
            signed
                .into_iter()
                .map(|(network, config, signer)| self.establish(network, config, signer, environment)),
        )
        .await?;

        Ok(SessionSet {
            environment,
            sessions: sessions
                .into_iter()
                .map(|session| (session.network_id().clone(), session))
                .collect(),
        })
    }

    async fn establish(
        &self,
        network: NetworkId,
        config: NetworkConfig,
        signer: Signer,
        environment: Environment,
    ) -> Result<Session, ConnectError> {
        Session::establish(
            network.clone(),
            config,
            signer,
            environment,
            self.capabilities.connector.as_ref(),
        )
        .await
        .inspect_err(|error| log::warn!("{network}: {error}"))
    }

    /// Register every network's chain with the wallet extension.
    ///
    /// Best effort: a failed registration is logged and recorded in the
    /// report, the remaining networks are still registered. Only a missing
    /// extension fails the whole call.
    pub async fn install_all(&self, environment: Environment) -> Result<InstallReport, ConnectError> {
        let extension = &self.capabilities.extension;
        if !extension.is_installed() {
            return Err(ConnectError::ExtensionUnavailable);
        }

        let mut report = InstallReport::default();
        for network in &self.networks {
            let outcome = match self.table.resolve(network, environment) {
                Ok(config) => extension
                    .suggest_chain(&ChainInfo::from_config(&config))
                    .await
                    .map_err(InstallFailure::Rejected),
                Err(error) => Err(InstallFailure::Config(error.to_string())),
            };

            match outcome {
                Ok(()) => {
                    log::info!("{network}: chain registered with the wallet extension");
                    report.registered.push(network.clone());
                }
                Err(failure) => {
                    log::error!("{network}: couldn't register the chain: {failure}");
                    report.failed.push((network.clone(), failure));
                }
            }
        }

        Ok(report)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstallFailure {
    #[error("{0}")]
    Config(String),
    #[error("rejected by the wallet extension: {0}")]
    Rejected(ClientError),
}

/// Outcome of [`SessionManager::install_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub registered: Vec<NetworkId>,
    pub failed: Vec<(NetworkId, InstallFailure)>,
}

impl InstallReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The sessions of one successful [`SessionManager::connect_all`], one per
/// network, all in the same environment.
#[derive(Debug, Clone)]
pub struct SessionSet {
    environment: Environment,
    sessions: BTreeMap<NetworkId, Session>,
}

impl SessionSet {
    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn get(&self, network: &str) -> Option<&Session> {
        self.sessions.get(network)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn networks(&self) -> impl Iterator<Item = &NetworkId> {
        self.sessions.keys()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl<'a> IntoIterator for &'a SessionSet {
    type Item = &'a Session;
    type IntoIter = std::collections::btree_map::Values<'a, NetworkId, Session>;

    fn into_iter(self) -> Self::IntoIter {
        self.sessions.values()
    }
}
