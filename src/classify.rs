use crate::code::Code;
use crate::shape::ErrorShape;
use crate::sqlstate;

/// A single SQLSTATE matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "pattern", rename_all = "lowercase")]
pub enum Rule {
    /// Matches one exact five-character code.
    Exact(&'static str),
    /// Matches every code whose two-character class equals the pattern.
    Class(&'static str),
}

impl Rule {
    pub fn matches(self, state: &str) -> bool {
        match self {
            Self::Exact(code) => state == code,
            Self::Class(class) => state.starts_with(class),
        }
    }
}

/// Ordered SQLSTATE rules, first match wins.
///
/// All exact codes sit ahead of the class rules so a broad class (`42`) can
/// never shadow a specific code inside it (`42501`).
pub static RULES: &[(Rule, Code)] = &[
    (Rule::Exact(sqlstate::SUCCESSFUL_COMPLETION), Code::Ok),
    (
        Rule::Exact(sqlstate::FOREIGN_KEY_VIOLATION),
        Code::FailedPrecondition,
    ),
    (Rule::Exact(sqlstate::UNIQUE_VIOLATION), Code::AlreadyExists),
    (Rule::Exact(sqlstate::UNDEFINED_FUNCTION), Code::Internal),
    (Rule::Exact(sqlstate::UNDEFINED_TABLE), Code::Internal),
    (
        Rule::Exact(sqlstate::INSUFFICIENT_PRIVILEGE),
        Code::PermissionDenied,
    ),
    // default code for RAISE in PL/pgSQL
    (Rule::Exact(sqlstate::RAISE_EXCEPTION), Code::Aborted),
    // warnings only
    (Rule::Class("01"), Code::Ok),
    (Rule::Class("02"), Code::NotFound),
    // statement not yet complete
    (Rule::Class("03"), Code::Unavailable),
    (Rule::Class("08"), Code::Unavailable),
    (Rule::Class("09"), Code::Internal),
    (Rule::Class("0L"), Code::PermissionDenied),
    (Rule::Class("0P"), Code::PermissionDenied),
    (Rule::Class("25"), Code::Aborted),
    (Rule::Class("28"), Code::PermissionDenied),
    (Rule::Class("2D"), Code::Internal),
    (Rule::Class("38"), Code::Internal),
    (Rule::Class("39"), Code::Internal),
    (Rule::Class("3B"), Code::Aborted),
    // serialization failures and deadlocks land here
    (Rule::Class("40"), Code::Aborted),
    (Rule::Class("42"), Code::Internal),
    (Rule::Class("53"), Code::ResourceExhausted),
    (Rule::Class("54"), Code::Internal),
    (Rule::Class("55"), Code::Internal),
    (Rule::Class("57"), Code::Internal),
    (Rule::Class("58"), Code::Internal),
    (Rule::Class("F0"), Code::Internal),
    // foreign data wrapper failures
    (Rule::Class("HV"), Code::Internal),
    (Rule::Class("P0"), Code::Internal),
    (Rule::Class("XX"), Code::Internal),
];

/// Code used when a SQLSTATE matches none of [`RULES`].
pub const DEFAULT_SQL_STATE_CODE: Code = Code::Internal;

/// The first rule in [`RULES`] that matches `state`, or `None` when the default applies.
pub fn rule_for_sql_state(state: &str) -> Option<&'static (Rule, Code)> {
    RULES.iter().find(|(rule, _)| rule.matches(state))
}

/// Map a raw SQLSTATE string to a gRPC code. Total: malformed input takes the default.
pub fn code_for_sql_state(state: &str) -> Code {
    let matched = rule_for_sql_state(state);
    let rule = matched.map(|(rule, _)| *rule);
    let code = matched.map_or(DEFAULT_SQL_STATE_CODE, |(_, code)| *code);
    tracing::trace!(sql_state = state, ?rule, %code, "classified sql state");
    code
}

/// Classify an error (or its absence) into a gRPC code.
///
/// Precedence: no error, the no-rows sentinel, an embedded status (passed
/// through untouched), a SQLSTATE, and finally `Unknown`.
pub fn code<E: ErrorShape + ?Sized>(err: Option<&E>) -> Code {
    let Some(err) = err else {
        return Code::Ok;
    };

    if err.is_no_rows() {
        return Code::NotFound;
    }

    if let Some(status) = err.rpc_status() {
        return status.code();
    }

    match err.sql_state() {
        Some(state) => code_for_sql_state(&state),
        None => Code::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::{RULES, Rule, code, code_for_sql_state, rule_for_sql_state};
    use crate::code::Code;
    use crate::shape::{NoRows, SqlStateError};
    use crate::sqlstate::CONDITIONS;
    use crate::status::Status;

    #[test]
    fn exact_rules_precede_class_rules() {
        let first_class = RULES
            .iter()
            .position(|(rule, _)| matches!(rule, Rule::Class(_)))
            .unwrap_or(RULES.len());
        assert!(
            RULES[first_class..]
                .iter()
                .all(|(rule, _)| matches!(rule, Rule::Class(_))),
            "exact rule found after a class rule"
        );
    }

    #[test]
    fn every_rule_is_reachable() {
        for (rule, expected) in RULES {
            let sample = match rule {
                Rule::Exact(code) => (*code).to_string(),
                Rule::Class(class) => format!("{class}ZZZ"),
            };
            assert_eq!(
                rule_for_sql_state(&sample).map(|(r, _)| *r),
                Some(*rule),
                "{sample} is shadowed"
            );
            assert_eq!(code_for_sql_state(&sample), *expected);
        }
    }

    #[test]
    fn sql_state_table() {
        let cases: &[(&str, Code)] = &[
            ("00000", Code::Ok),
            ("01000", Code::Ok),
            ("0100C", Code::Ok),
            ("02000", Code::NotFound),
            ("03000", Code::Unavailable),
            ("08006", Code::Unavailable),
            ("09000", Code::Internal),
            ("0LP01", Code::PermissionDenied),
            ("0P000", Code::PermissionDenied),
            ("23000", Code::Internal),
            ("23502", Code::Internal),
            ("23503", Code::FailedPrecondition),
            ("23505", Code::AlreadyExists),
            ("25P02", Code::Aborted),
            ("28P01", Code::PermissionDenied),
            ("2D000", Code::Internal),
            ("38001", Code::Internal),
            ("39P01", Code::Internal),
            ("3B001", Code::Aborted),
            ("40001", Code::Aborted),
            ("40P01", Code::Aborted),
            ("42601", Code::Internal),
            ("42883", Code::Internal),
            ("42P01", Code::Internal),
            ("42501", Code::PermissionDenied),
            ("53100", Code::ResourceExhausted),
            ("54000", Code::Internal),
            ("55P03", Code::Internal),
            ("57014", Code::Internal),
            ("58030", Code::Internal),
            ("F0000", Code::Internal),
            ("HV000", Code::Internal),
            ("HV00N", Code::Internal),
            ("P0001", Code::Aborted),
            ("P0002", Code::Internal),
            ("XX000", Code::Internal),
            ("22012", Code::Internal),
        ];
        for (state, expected) in cases {
            assert_eq!(code_for_sql_state(state), *expected, "sql state {state}");
        }
    }

    #[test]
    fn malformed_states_take_the_default() {
        assert_eq!(code_for_sql_state(""), Code::Internal);
        assert_eq!(code_for_sql_state("ZZ"), Code::Internal);
        assert_eq!(code_for_sql_state("0"), Code::Internal);
        assert!(rule_for_sql_state("ZZ000").is_none());
        assert!(rule_for_sql_state("22012").is_none());
        // class rules only look at the prefix
        assert_eq!(code_for_sql_state("08"), Code::Unavailable);
    }

    #[test]
    fn foreign_data_wrapper_errors_have_an_explicit_rule() {
        for state in ["HV000", "HV00B", "HV00N", "HV091"] {
            assert_eq!(
                rule_for_sql_state(state),
                Some(&(Rule::Class("HV"), Code::Internal)),
                "sql state {state}"
            );
        }
    }

    #[test]
    fn every_known_condition_classifies_consistently() {
        for (state, _) in CONDITIONS {
            let first = code_for_sql_state(state);
            let second = code_for_sql_state(state);
            assert_eq!(first, second);
            let via_error = code(Some(&SqlStateError::new(*state, *state)));
            assert_eq!(via_error, first, "sql state {state}");
        }
    }

    #[test]
    fn precedence_of_shapes() {
        assert_eq!(code::<NoRows>(None), Code::Ok);
        assert_eq!(code(Some(&NoRows)), Code::NotFound);
        assert_eq!(
            code(Some(&Status::new(Code::DeadlineExceeded, "deadline exceeded"))),
            Code::DeadlineExceeded
        );
        assert_eq!(
            code(Some(&SqlStateError::new("23505", "dup"))),
            Code::AlreadyExists
        );
        let opaque: &(dyn std::error::Error + 'static) = &std::fmt::Error;
        assert_eq!(code(Some(opaque)), Code::Unknown);
    }
}
