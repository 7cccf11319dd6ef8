use crate::{
    client::{Capabilities, OfflineSigner, Timer},
    config::NetworkConfig,
    cosmos::AccountData,
    error::{ClientError, ConnectError},
};
use futures::{
    channel::oneshot,
    future::{self, Either, FutureExt as _, Shared},
};
use std::{fmt, future::Future, pin::pin, rc::Rc, time::Duration};

/// A secret recovery phrase. Never printed, not even in debug output.
#[derive(Clone)]
pub struct SecretPhrase(String);

impl SecretPhrase {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretPhrase(..)")
    }
}

/// Where the signers of a connection attempt come from. Decided once for
/// every network of the attempt.
#[derive(Debug, Clone)]
pub enum SignerSource {
    /// derive the keys from a secret phrase, no user interaction
    Mnemonic(SecretPhrase),
    /// let the wallet extension hold the keys, the user approves each chain
    Extension,
}

impl SignerSource {
    /// a non empty phrase selects [`SignerSource::Mnemonic`], anything else
    /// the wallet extension
    pub fn from_phrase(phrase: Option<String>) -> Self {
        match phrase {
            Some(phrase) if !phrase.is_empty() => Self::Mnemonic(SecretPhrase(phrase)),
            _ => Self::Extension,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignerKind {
    Mnemonic { prefix: String },
    Extension { chain_id: String },
}

/// Capability to sign transactions for the accounts it exposes.
#[derive(Clone)]
pub struct Signer {
    kind: SignerKind,
    inner: Rc<dyn OfflineSigner>,
}

impl Signer {
    pub fn new(kind: SignerKind, inner: Rc<dyn OfflineSigner>) -> Self {
        Self { kind, inner }
    }

    pub fn kind(&self) -> &SignerKind {
        &self.kind
    }

    pub fn offline_signer(&self) -> &dyn OfflineSigner {
        self.inner.as_ref()
    }

    pub async fn accounts(&self) -> Result<Vec<AccountData>, ClientError> {
        self.inner.accounts().await
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signer").field(&self.kind).finish()
    }
}

/// Create a pair to cancel pending approvals from the outside.
///
/// Dropping the [`CancelHandle`] without calling [`CancelHandle::cancel`]
/// leaves the tokens uncancelled forever.
pub fn cancel_token() -> (CancelHandle, CancelToken) {
    let (sender, receiver) = oneshot::channel();
    (CancelHandle(sender), CancelToken(receiver.shared()))
}

pub struct CancelHandle(oneshot::Sender<()>);

impl CancelHandle {
    pub fn cancel(self) {
        let _ = self.0.send(());
    }
}

#[derive(Clone)]
pub struct CancelToken(Shared<oneshot::Receiver<()>>);

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.0.peek(), Some(Ok(())))
    }

    /// resolves once cancelled
    pub async fn cancelled(&self) {
        if self.0.clone().await.is_err() {
            future::pending::<()>().await
        }
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Bounds the wait for the user to approve a chain in the wallet extension.
/// The default waits as long as it takes.
#[derive(Debug, Clone, Default)]
pub struct Approval {
    pub timeout: Option<Duration>,
    pub cancel: Option<CancelToken>,
}

/// Acquire the signer for the network described by `config`.
///
/// The mnemonic path never touches the wallet extension. The extension path
/// requires the extension to be installed and the user to approve
/// `config.chain_id`, within the limits of `approval`.
pub async fn acquire_signer(
    config: &NetworkConfig,
    source: &SignerSource,
    capabilities: &Capabilities,
    approval: &Approval,
) -> Result<Signer, ConnectError> {
    match source {
        SignerSource::Mnemonic(phrase) => {
            let inner = capabilities
                .mnemonic
                .from_mnemonic(phrase.expose(), &config.addr_prefix)
                .await
                .map_err(ConnectError::InvalidMnemonic)?;

            Ok(Signer::new(
                SignerKind::Mnemonic {
                    prefix: config.addr_prefix.clone(),
                },
                inner,
            ))
        }
        SignerSource::Extension => {
            let extension = &capabilities.extension;
            if !extension.is_installed() {
                return Err(ConnectError::ExtensionUnavailable);
            }

            let chain_id = &config.chain_id;
            log::debug!("requesting access to {chain_id} from the wallet extension");
            wait_for_approval(
                extension.enable(chain_id),
                chain_id,
                capabilities.timer.as_ref(),
                approval,
            )
            .await?;

            let inner =
                extension
                    .offline_signer(chain_id)
                    .map_err(|reason| ConnectError::ApprovalRejected {
                        chain_id: chain_id.clone(),
                        reason,
                    })?;

            Ok(Signer::new(
                SignerKind::Extension {
                    chain_id: chain_id.clone(),
                },
                inner,
            ))
        }
    }
}

async fn wait_for_approval(
    enable: impl Future<Output = Result<(), ClientError>>,
    chain_id: &str,
    timer: &dyn Timer,
    approval: &Approval,
) -> Result<(), ConnectError> {
    let timeout = async {
        match approval.timeout {
            Some(duration) => timer.sleep(duration).await,
            None => future::pending().await,
        }
    };
    let cancel = async {
        match &approval.cancel {
            Some(token) => token.cancelled().await,
            None => future::pending().await,
        }
    };

    let enable = pin!(enable);
    let timeout = pin!(timeout);
    let cancel = pin!(cancel);
    match future::select(enable, future::select(timeout, cancel)).await {
        Either::Left((Ok(()), _)) => Ok(()),
        Either::Left((Err(reason), _)) => Err(ConnectError::ApprovalRejected {
            chain_id: chain_id.to_owned(),
            reason,
        }),
        Either::Right((Either::Left(_), _)) => {
            log::warn!("no answer from the wallet extension for {chain_id}, giving up");
            Err(ConnectError::ApprovalTimedOut {
                chain_id: chain_id.to_owned(),
            })
        }
        Either::Right((Either::Right(_), _)) => Err(ConnectError::ApprovalCancelled {
            chain_id: chain_id.to_owned(),
        }),
    }
}
