mod classify;
mod credentials;
mod step;
mod target;
mod transport;

pub use classify::{classify, Classification};
pub use credentials::{CredentialStore, FileCredentialStore, StaticCredentialStore};
pub use step::{GoCdBuildStep, StepState};
pub use target::{Build, BuildLog, BuildTarget, MemoryBuildTarget};
pub use transport::{
    transport_reason, HttpTransport, ReqwestTransport, CONNECT_FAILED, HOST_NOT_RESOLVED,
    MALFORMED_URL, PEER_CERTIFICATE_REJECTED, RECEIVE_FAILED, SEND_FAILED, TIMED_OUT,
    TLS_HANDSHAKE_FAILED, UNKNOWN_FAILURE,
};
