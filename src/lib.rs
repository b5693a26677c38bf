#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

//! Classify database errors into canonical gRPC statuses.
//!
//! Postgres reports failures as five-character SQLSTATE codes. [`code`] maps an
//! error carrying one of those (or an existing status, or the "no rows"
//! sentinel) to a [`Code`]; [`from_error`] builds the full [`Status`] with the
//! condition name prepended to the message.
//!
//! Postgres: <https://www.postgresql.org/docs/current/errcodes-appendix.html>
//! gRPC: <https://grpc.github.io/grpc/core/md_doc_statuscodes.html>

pub mod classify;
pub mod code;
pub mod convert;
pub mod error;
pub mod shape;
pub mod sqlstate;
pub mod status;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use classify::{Rule, code, code_for_sql_state, rule_for_sql_state};
pub use code::Code;
pub use convert::{convert, from_error};
pub use error::Error;
pub use shape::{ErrorShape, NoRows, SqlStateError};
pub use sqlstate::{SqlState, condition_name};
pub use status::Status;
