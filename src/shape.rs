use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use crate::status::Status;

/// Capabilities an error value can expose to the classifier.
///
/// Every accessor defaults to "absent", so an implementor only overrides the
/// shapes it actually carries. Anything that overrides none of them is opaque
/// and classifies as `Unknown`.
pub trait ErrorShape: fmt::Display {
    /// `true` for the driver's "query returned zero rows" sentinel.
    fn is_no_rows(&self) -> bool {
        false
    }

    /// The RPC status this error already carries, if any.
    fn rpc_status(&self) -> Option<Status> {
        None
    }

    /// The five-character SQLSTATE reported by the database, if any.
    fn sql_state(&self) -> Option<Cow<'_, str>> {
        None
    }
}

/// Sentinel for a query that succeeded but produced no rows.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[error("no rows in result set")]
pub struct NoRows;

impl ErrorShape for NoRows {
    fn is_no_rows(&self) -> bool {
        true
    }
}

/// Driver-agnostic database error: a SQLSTATE plus the server's message.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[error("{message}")]
pub struct SqlStateError {
    #[serde(rename = "sqlState")]
    state: String,
    message: String,
}

impl SqlStateError {
    pub fn new(state: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            message: message.into(),
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ErrorShape for SqlStateError {
    fn sql_state(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(&self.state))
    }
}

impl ErrorShape for Status {
    fn rpc_status(&self) -> Option<Status> {
        Some(self.clone())
    }
}

impl<T: ErrorShape + ?Sized> ErrorShape for &T {
    fn is_no_rows(&self) -> bool {
        (**self).is_no_rows()
    }

    fn rpc_status(&self) -> Option<Status> {
        (**self).rpc_status()
    }

    fn sql_state(&self) -> Option<Cow<'_, str>> {
        (**self).sql_state()
    }
}

impl<T: ErrorShape + ?Sized> ErrorShape for Box<T> {
    fn is_no_rows(&self) -> bool {
        (**self).is_no_rows()
    }

    fn rpc_status(&self) -> Option<Status> {
        (**self).rpc_status()
    }

    fn sql_state(&self) -> Option<Cow<'_, str>> {
        (**self).sql_state()
    }
}

// A single link of a `source()` chain, checked against every concrete type we
// know how to read.

fn link_is_no_rows(link: &(dyn StdError + 'static)) -> bool {
    if link.is::<NoRows>() {
        return true;
    }
    #[cfg(feature = "sqlx")]
    {
        if let Some(err) = link.downcast_ref::<sqlx::Error>() {
            return err.is_no_rows();
        }
    }
    false
}

fn link_rpc_status(link: &(dyn StdError + 'static)) -> Option<Status> {
    if let Some(status) = link.downcast_ref::<Status>() {
        return Some(status.clone());
    }
    #[cfg(feature = "tonic")]
    {
        if let Some(status) = link.downcast_ref::<tonic::Status>() {
            return Some(Status::from(status));
        }
    }
    None
}

fn link_sql_state<'a>(link: &'a (dyn StdError + 'static)) -> Option<Cow<'a, str>> {
    if let Some(err) = link.downcast_ref::<SqlStateError>() {
        return err.sql_state();
    }
    #[cfg(feature = "sqlx")]
    {
        if let Some(err) = link.downcast_ref::<sqlx::Error>() {
            return err.sql_state();
        }
    }
    #[cfg(feature = "postgres")]
    {
        if let Some(err) = link.downcast_ref::<postgres::Error>() {
            return err.sql_state();
        }
    }
    None
}

fn chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |&link| link.source())
}

impl ErrorShape for dyn StdError + 'static {
    fn is_no_rows(&self) -> bool {
        chain(self).any(link_is_no_rows)
    }

    fn rpc_status(&self) -> Option<Status> {
        chain(self).find_map(link_rpc_status)
    }

    fn sql_state(&self) -> Option<Cow<'_, str>> {
        chain(self).find_map(link_sql_state)
    }
}

impl ErrorShape for dyn StdError + Send + Sync + 'static {
    fn is_no_rows(&self) -> bool {
        (self as &(dyn StdError + 'static)).is_no_rows()
    }

    fn rpc_status(&self) -> Option<Status> {
        (self as &(dyn StdError + 'static)).rpc_status()
    }

    fn sql_state(&self) -> Option<Cow<'_, str>> {
        (self as &(dyn StdError + 'static)).sql_state()
    }
}

#[cfg(feature = "sqlx")]
impl ErrorShape for sqlx::Error {
    fn is_no_rows(&self) -> bool {
        matches!(self, sqlx::Error::RowNotFound)
    }

    fn sql_state(&self) -> Option<Cow<'_, str>> {
        match self {
            sqlx::Error::Database(db) => db.code(),
            _ => None,
        }
    }
}

#[cfg(feature = "postgres")]
impl ErrorShape for postgres::Error {
    fn sql_state(&self) -> Option<Cow<'_, str>> {
        self.code().map(|state| Cow::Borrowed(state.code()))
    }
}

#[cfg(feature = "tonic")]
impl ErrorShape for tonic::Status {
    fn rpc_status(&self) -> Option<Status> {
        Some(Status::from(self))
    }
}
