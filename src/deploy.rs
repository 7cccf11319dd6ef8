//! Upload, instantiate and migrate contracts while keeping the
//! [`DeployConfig`] record of every network up to date.

use crate::{
    config::{DeployConfig, DeployContractConfig},
    error::DeployError,
    session::Session,
};
use serde::Serialize;
use sha2::{Digest as _, Sha256};

/// hex encoded sha256 of `wasm`, as recorded in the [`DeployConfig`]
pub fn wasm_checksum(wasm: &[u8]) -> String {
    hex::encode(Sha256::digest(wasm))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPolicy {
    Always,
    /// skip the upload if the recorded code has the same checksum
    OnlyIfChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstantiatePolicy {
    Always,
    /// only instantiate freshly uploaded code
    OnlyIfNew,
}

/// What [`deploy_contract`] does with code and instances that are already
/// recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeployPolicy {
    /// upload and instantiate, even if nothing changed
    AlwaysEverything,
    /// upload changed code and instantiate only that
    #[default]
    OnlyIfNew,
    /// upload changed code, then instantiate a fresh contract in any case
    AlwaysInstantiate,
}

impl From<DeployPolicy> for UploadPolicy {
    fn from(policy: DeployPolicy) -> Self {
        match policy {
            DeployPolicy::AlwaysEverything => Self::Always,
            DeployPolicy::OnlyIfNew | DeployPolicy::AlwaysInstantiate => Self::OnlyIfChanged,
        }
    }
}

impl From<DeployPolicy> for InstantiatePolicy {
    fn from(policy: DeployPolicy) -> Self {
        match policy {
            DeployPolicy::AlwaysEverything | DeployPolicy::AlwaysInstantiate => Self::Always,
            DeployPolicy::OnlyIfNew => Self::OnlyIfNew,
        }
    }
}

fn recorded(session: &Session, deploy: &DeployConfig, kind: &str) -> DeployContractConfig {
    deploy
        .contract(session.environment(), session.network_id(), kind)
        .cloned()
        .unwrap_or_default()
}

/// Upload the `kind` contract.
///
/// Returns the updated record if new code was stored, `None` if the upload
/// was skipped.
pub async fn upload_contract(
    session: &Session,
    deploy: &DeployConfig,
    kind: &str,
    wasm: &[u8],
    policy: UploadPolicy,
) -> Result<Option<DeployContractConfig>, DeployError> {
    let network = session.network_id();
    let hash = wasm_checksum(wasm);
    let mut config = recorded(session, deploy, kind);
    let unchanged = config.hash.as_deref() == Some(hash.as_str());

    if policy == UploadPolicy::OnlyIfChanged && unchanged {
        if let Some(code_id) = config.code_id {
            // the chain may have been reset since
            if let Ok(details) = session.code_details(code_id).await {
                if details.id != code_id {
                    return Err(DeployError::CodeIdMismatch {
                        kind: kind.to_owned(),
                        recorded: code_id,
                        found: details.id,
                    });
                }
                log::info!("{network}: {kind} contract already uploaded as code {code_id}");
                return Ok(None);
            }
        }
    }

    if unchanged {
        log::info!("{network}: {kind} contract has not changed, uploading anyway");
    } else {
        log::info!("{network}: {kind} contract has changed, uploading");
    }

    let result = session.upload(wasm).await?;
    log::info!("{network}: {kind} contract uploaded with code id {}", result.code_id);

    config.code_id = Some(result.code_id);
    config.hash = Some(hash);
    Ok(Some(config))
}

/// Instantiate the `kind` contract from the code id of `uploaded`, or of the
/// recorded configuration under [`InstantiatePolicy::Always`].
///
/// Returns the updated record, `None` if the instantiation was skipped.
pub async fn instantiate_contract(
    session: &Session,
    deploy: &DeployConfig,
    kind: &str,
    msg: &impl Serialize,
    policy: InstantiatePolicy,
    uploaded: Option<DeployContractConfig>,
) -> Result<Option<DeployContractConfig>, DeployError> {
    let network = session.network_id();
    let mut config = match uploaded {
        Some(config) => config,
        None if policy == InstantiatePolicy::OnlyIfNew => {
            log::info!("{network}: {kind} has no new code, skipping instantiation");
            return Ok(None);
        }
        None => recorded(session, deploy, kind),
    };

    let code_id = config.code_id.ok_or_else(|| DeployError::MissingCodeId {
        kind: kind.to_owned(),
    })?;

    let result = session.instantiate(code_id, msg, kind).await?;
    let info = session.contract_info(&result.contract_address).await?;
    log::info!(
        "{network}: {kind} contract instantiated at {}",
        result.contract_address
    );

    config.address = Some(result.contract_address);
    config.ibc_port = info.ibc_port_id;
    Ok(Some(config))
}

/// Upload the new `wasm` of the `kind` contract and migrate the recorded
/// instance to it.
pub async fn migrate_contract(
    session: &Session,
    deploy: &DeployConfig,
    kind: &str,
    wasm: &[u8],
    msg: &impl Serialize,
) -> Result<DeployContractConfig, DeployError> {
    let address = recorded(session, deploy, kind)
        .address
        .ok_or_else(|| DeployError::MissingAddress {
            kind: kind.to_owned(),
        })?;

    let config = upload_contract(session, deploy, kind, wasm, UploadPolicy::Always)
        .await?
        .ok_or_else(|| DeployError::MissingCodeId {
            kind: kind.to_owned(),
        })?;
    let code_id = config.code_id.ok_or_else(|| DeployError::MissingCodeId {
        kind: kind.to_owned(),
    })?;

    session.migrate(&address, code_id, msg).await?;
    log::info!(
        "{}: {kind} contract at {address} migrated to code {code_id}",
        session.network_id()
    );

    Ok(config)
}

/// Upload and instantiate the `kind` contract as `policy` says, recording the
/// outcome in `deploy`. Returns `true` if a contract was instantiated.
pub async fn deploy_contract(
    session: &Session,
    deploy: &mut DeployConfig,
    kind: &str,
    wasm: &[u8],
    msg: &impl Serialize,
    policy: DeployPolicy,
) -> Result<bool, DeployError> {
    let uploaded = upload_contract(session, deploy, kind, wasm, policy.into()).await?;
    if let Some(config) = &uploaded {
        deploy.replace_contract(
            session.environment(),
            session.network_id(),
            kind,
            config.clone(),
        );
    }

    let instantiated =
        instantiate_contract(session, deploy, kind, msg, policy.into(), uploaded).await?;
    let deployed = instantiated.is_some();
    if let Some(config) = instantiated {
        deploy.replace_contract(session.environment(), session.network_id(), kind, config);
    }

    Ok(deployed)
}
