use crate::config::{Environment, NetworkId};

/// Failure reported by one of the external capabilities: the chain client,
/// a signer or the wallet extension.
///
/// JavaScript `Error` objects are decoded from their `message` property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, serde::Deserialize)]
#[error("{info}")]
pub struct ClientError {
    #[serde(alias = "message")]
    pub info: String,
}

impl ClientError {
    pub fn new(info: impl Into<String>) -> Self {
        Self { info: info.into() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No network configuration for `{network}' in the {environment} environment")]
    NotFound {
        network: NetworkId,
        environment: Environment,
    },
    #[error("Unknown environment `{0}', expected `local' or `testnet'")]
    UnknownEnvironment(String),
    #[error("Invalid network table key `{0}', expected `<network>_<environment>'")]
    InvalidKey(String),
    #[error("Couldn't parse the configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while establishing sessions.
///
/// Interactive failures (the extension is missing, the user refused or never
/// answered) are kept apart from the network failures so the caller can tell
/// the user what to do, see [`ConnectError::is_user_action_required`].
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("No wallet extension found. Please install the Keplr extension")]
    ExtensionUnavailable,
    #[error("The wallet extension refused access to `{chain_id}': {reason}")]
    ApprovalRejected {
        chain_id: String,
        reason: ClientError,
    },
    #[error("Timed out waiting for the wallet extension to approve `{chain_id}'")]
    ApprovalTimedOut { chain_id: String },
    #[error("Approval of `{chain_id}' was cancelled")]
    ApprovalCancelled { chain_id: String },
    #[error("Couldn't derive a signer from the secret phrase: {0}")]
    InvalidMnemonic(#[source] ClientError),
    #[error("Invalid gas price `{0}'")]
    InvalidGasPrice(String),
    #[error("Couldn't connect to {network}: {source}")]
    ConnectionFailed {
        network: NetworkId,
        source: ClientError,
    },
    #[error("No account available on {network}, gotta get some funds first")]
    NoAccount { network: NetworkId },
}

impl ConnectError {
    /// `true` if the user has something to do before retrying (install or
    /// unlock the extension, approve the request, fund the account).
    pub fn is_user_action_required(&self) -> bool {
        matches!(
            self,
            Self::ExtensionUnavailable
                | Self::ApprovalRejected { .. }
                | Self::ApprovalTimedOut { .. }
                | Self::ApprovalCancelled { .. }
                | Self::InvalidMnemonic(_)
                | Self::NoAccount { .. }
        )
    }

    /// Message suitable to display to the end user.
    pub fn user_message(&self) -> String {
        if self.is_user_action_required() {
            self.to_string()
        } else {
            format!("The network is not reachable right now ({self}). Please try again later.")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
pub enum GatewayErrorCode {
    #[error("The contract query failed")]
    QueryFailed,
    #[error("Not found")]
    NotFound,
    #[error("The code upload failed")]
    UploadFailed,
    #[error("The contract instantiation failed")]
    InstantiateFailed,
    #[error("The contract migration failed")]
    MigrateFailed,
    #[error("The contract execution failed")]
    ExecuteFailed,
    #[error("The balance query failed")]
    BalanceQueryFailed,
    #[error("The chain query failed")]
    ChainQueryFailed,
    #[error("The message couldn't be encoded")]
    InvalidMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{code}. {info}.")]
pub struct GatewayError {
    pub code: GatewayErrorCode,
    pub info: String,
}

impl GatewayError {
    pub fn new(code: GatewayErrorCode, info: impl ToString) -> Self {
        Self {
            code,
            info: info.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Code id mismatch for {kind}: recorded {recorded}, found {found} on chain")]
    CodeIdMismatch {
        kind: String,
        recorded: u64,
        found: u64,
    },
    #[error("No code id recorded for {kind}, upload it first")]
    MissingCodeId { kind: String },
    #[error("No address recorded for {kind}, instantiate it first")]
    MissingAddress { kind: String },
}
