use crate::classify;
use crate::code::Code;
use crate::shape::ErrorShape;
use crate::sqlstate;
use crate::status::Status;

/// Build a full [`Status`] for `err`.
///
/// The flag is `false` only when `err` exposed none of the recognized shapes and
/// the result is the `Unknown` fallback carrying the raw error text. A SQLSTATE
/// that matches no explicit rule still counts as recognized.
pub fn from_error<E: ErrorShape + ?Sized>(err: Option<&E>) -> (Status, bool) {
    let Some(err) = err else {
        return (Status::ok(), true);
    };

    if err.is_no_rows() {
        return (Status::new(Code::NotFound, err.to_string()), true);
    }

    if let Some(status) = err.rpc_status() {
        return (status, true);
    }

    if let Some(state) = err.sql_state() {
        let code = classify::code_for_sql_state(&state);
        let message = match sqlstate::condition_name(&state) {
            Some(condition) => format!("{condition}: {err}"),
            None => err.to_string(),
        };
        return (Status::new(code, message), true);
    }

    tracing::debug!(error = %err, "unrecognized error shape, falling back to Unknown");
    (Status::new(Code::Unknown, err.to_string()), false)
}

/// [`from_error`] without the confidence flag.
pub fn convert<E: ErrorShape + ?Sized>(err: Option<&E>) -> Status {
    let (status, _) = from_error(err);
    status
}

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;

    use super::{convert, from_error};
    use crate::classify::code;
    use crate::code::Code;
    use crate::shape::{NoRows, SqlStateError};
    use crate::status::Status;

    /// Mirrors a driver error whose text is just its SQLSTATE.
    fn pg(state: &str) -> SqlStateError {
        SqlStateError::new(state, state)
    }

    #[derive(thiserror::Error, Debug)]
    #[error("fetch user: {source}")]
    struct Context {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    }

    #[test]
    fn absence_of_error_is_ok() {
        assert_eq!(from_error::<NoRows>(None), (Status::new(Code::Ok, ""), true));
        assert_eq!(convert::<SqlStateError>(None), Status::ok());
    }

    #[test]
    fn no_rows_is_not_found() {
        assert_eq!(
            from_error(Some(&NoRows)),
            (
                Status::new(Code::NotFound, "no rows in result set"),
                true
            )
        );
    }

    #[test]
    fn status_passes_through_unchanged() {
        let status = Status::new(Code::DeadlineExceeded, "deadline exceeded");
        assert_eq!(from_error(Some(&status)), (status.clone(), true));
    }

    #[test]
    fn wrapped_status_passes_through_unchanged() {
        let status = Status::new(Code::PermissionDenied, "tenant mismatch");
        let err = Context {
            source: Box::new(status.clone()),
        };
        let dyn_err: &(dyn StdError + 'static) = &err;
        assert_eq!(from_error(Some(dyn_err)), (status, true));
    }

    #[test]
    fn sql_states_get_condition_prefix() {
        let cases: &[(&str, Code, &str)] = &[
            ("00000", Code::Ok, "successful_completion: 00000"),
            ("0100C", Code::Ok, "dynamic_result_sets_returned: 0100C"),
            ("03000", Code::Unavailable, "sql_statement_not_yet_complete: 03000"),
            ("23505", Code::AlreadyExists, "unique_violation: 23505"),
            ("23503", Code::FailedPrecondition, "foreign_key_violation: 23503"),
            ("42501", Code::PermissionDenied, "insufficient_privilege: 42501"),
        ];
        for (state, expected_code, expected_message) in cases {
            let (status, matched) = from_error(Some(&pg(state)));
            assert!(matched, "{state} should match");
            assert_eq!(status.code(), *expected_code, "{state}");
            assert_eq!(status.message(), *expected_message, "{state}");
        }
    }

    #[test]
    fn wrapped_sql_state_uses_outer_text() {
        let err = Context {
            source: Box::new(SqlStateError::new(
                "23505",
                "duplicate key value violates unique constraint",
            )),
        };
        let dyn_err: &(dyn StdError + 'static) = &err;
        let (status, matched) = from_error(Some(dyn_err));
        assert!(matched);
        assert_eq!(status.code(), Code::AlreadyExists);
        assert_eq!(
            status.message(),
            "unique_violation: fetch user: duplicate key value violates unique constraint"
        );
    }

    #[test]
    fn unknown_sql_state_is_classified_without_prefix() {
        let (status, matched) = from_error(Some(&pg("ZZ999")));
        assert!(matched);
        assert_eq!(status, Status::new(Code::Internal, "ZZ999"));
    }

    #[test]
    fn opaque_error_falls_back_to_unknown() {
        let err = std::io::Error::other("connection reset by peer");
        let dyn_err: &(dyn StdError + 'static) = &err;
        assert_eq!(
            from_error(Some(dyn_err)),
            (
                Status::new(Code::Unknown, "connection reset by peer"),
                false
            )
        );
    }

    #[test]
    fn code_and_convert_agree() {
        let opaque = std::io::Error::other("boom");
        let wrapped = Context {
            source: Box::new(NoRows),
        };
        let inputs: Vec<Box<dyn StdError + Send + Sync>> = vec![
            Box::new(NoRows),
            Box::new(Status::new(Code::Cancelled, "client went away")),
            Box::new(pg("40P01")),
            Box::new(pg("P0001")),
            Box::new(pg("nope")),
            Box::new(opaque),
            Box::new(wrapped),
        ];
        for input in &inputs {
            let err: &(dyn StdError + Send + Sync + 'static) = input.as_ref();
            assert_eq!(code(Some(err)), convert(Some(err)).code(), "{err}");
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let err = pg("53300");
        let first = from_error(Some(&err));
        for _ in 0..100 {
            assert_eq!(from_error(Some(&err)), first);
        }
        assert_eq!(first.0.code(), Code::ResourceExhausted);
    }
}
