#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid sql state: {reason}")]
    SqlState { reason: String },

    #[error("invalid status code: {reason}")]
    Code { reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
