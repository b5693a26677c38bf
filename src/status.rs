use crate::code::Code;

/// An RPC outcome: exactly one [`Code`] and a human-readable message.
///
/// Immutable once built. Implements [`std::error::Error`] so a status can travel
/// through `?` and be recognized again further up the `source()` chain.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[error("rpc error: code = {code} desc = {message}")]
pub struct Status {
    code: Code,
    message: String,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new(Code::Ok, "")
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_ok(&self) -> bool {
        self.code == Code::Ok
    }

    pub fn into_parts(self) -> (Code, String) {
        (self.code, self.message)
    }
}

#[cfg(feature = "tonic")]
impl From<Status> for tonic::Status {
    fn from(status: Status) -> Self {
        let (code, message) = status.into_parts();
        tonic::Status::new(code.into(), message)
    }
}

#[cfg(feature = "tonic")]
impl From<&tonic::Status> for Status {
    fn from(status: &tonic::Status) -> Self {
        Self::new(status.code().into(), status.message())
    }
}
