use thiserror::Error;

/// Errors returned by a cluster client.
///
/// The split matters to the aggregator: an API error means the control
/// plane answered and only this one query is lost, while a transport
/// error means nothing further can be fetched at all.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API server answered with an error (not found, forbidden,
    /// rate-limited)
    #[error("api error (status {code}): {message}")]
    Api { code: u16, message: String },

    /// The control plane could not be reached
    #[error("control plane unreachable: {0}")]
    Transport(String),

    /// The kubeconfig has no usable cluster entry for the active context
    #[error("cluster identity unavailable: {0}")]
    Identity(String),
}

impl ClientError {
    /// Whether this error should abort a whole scan rather than fail
    /// one entry
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<kube::Error> for ClientError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) => Self::Api {
                code: resp.code,
                message: resp.message,
            },
            other => Self::Transport(other.to_string()),
        }
    }
}
