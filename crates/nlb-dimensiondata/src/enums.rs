//! Translation between neutral enumerations and CloudControl codes
//!
//! The tables are static and never mutated. State codes are only ever
//! received, so there is no state-to-code direction.

use nlb_common::{Algorithm, State};

/// Algorithm ↔ `loadBalanceMethod` code. Both directions read this table, so
/// they are exact inverses.
static ALGORITHM_CODES: [(Algorithm, &str); 4] = [
    (Algorithm::RoundRobin, "ROUND_ROBIN"),
    (Algorithm::LeastConnections, "LEAST_CONNECTIONS"),
    (Algorithm::ShortestResponse, "SHORTEST_RESPONSE"),
    (Algorithm::PersistentIp, "PERSISTENT_IP"),
];

/// `state` code → neutral state. Many-to-one.
static STATE_CODES: [(&str, State); 8] = [
    ("NORMAL", State::Running),
    ("PENDING_ADD", State::Pending),
    ("PENDING_CHANGE", State::Pending),
    ("PENDING_DELETE", State::Pending),
    ("FAILED_ADD", State::Error),
    ("FAILED_CHANGE", State::Error),
    ("FAILED_DELETE", State::Error),
    ("REQUIRES_SUPPORT", State::Error),
];

/// Vendor code for an algorithm, `None` when CloudControl has no equivalent
pub fn algorithm_to_code(algorithm: Algorithm) -> Option<&'static str> {
    ALGORITHM_CODES
        .iter()
        .find(|(a, _)| *a == algorithm)
        .map(|(_, code)| *code)
}

/// Neutral algorithm for a vendor code
pub fn code_to_algorithm(code: &str) -> Option<Algorithm> {
    ALGORITHM_CODES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(a, _)| *a)
}

/// Like [`code_to_algorithm`], falling back to [`Algorithm::DEFAULT`]
pub fn code_to_algorithm_or_default(code: &str) -> Algorithm {
    code_to_algorithm(code).unwrap_or(Algorithm::DEFAULT)
}

/// Neutral state for a vendor code. Unmapped or future codes are `Unknown`.
pub fn code_to_state(code: &str) -> State {
    STATE_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, s)| *s)
        .unwrap_or(State::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_algorithm_round_trip() {
        let mapped: Vec<(Algorithm, &str)> = Algorithm::ALL
            .into_iter()
            .filter_map(|a| algorithm_to_code(a).map(|code| (a, code)))
            .collect();
        assert_eq!(mapped.len(), 4);
        for (algorithm, code) in mapped {
            assert_eq!(code_to_algorithm(code), Some(algorithm));
        }
    }

    #[test]
    fn test_unmapped_algorithm() {
        assert_eq!(algorithm_to_code(Algorithm::Random), None);
        assert_eq!(algorithm_to_code(Algorithm::WeightedRoundRobin), None);
        assert_eq!(code_to_algorithm("WEIGHTED"), None);
        assert_eq!(code_to_algorithm_or_default("WEIGHTED"), Algorithm::RoundRobin);
    }

    #[test]
    fn test_state_table() {
        assert_eq!(code_to_state("NORMAL"), State::Running);
        for code in ["PENDING_ADD", "PENDING_CHANGE", "PENDING_DELETE"] {
            assert_eq!(code_to_state(code), State::Pending);
        }
        for code in ["FAILED_ADD", "FAILED_CHANGE", "FAILED_DELETE", "REQUIRES_SUPPORT"] {
            assert_eq!(code_to_state(code), State::Error);
        }
    }

    #[test]
    fn test_state_codes_are_case_sensitive() {
        assert_eq!(code_to_state("normal"), State::Unknown);
        assert_eq!(code_to_state(""), State::Unknown);
    }

    proptest! {
        #[test]
        fn unmapped_state_codes_are_unknown(code in "[A-Z_]{1,24}") {
            prop_assume!(!STATE_CODES.iter().any(|(c, _)| *c == code));
            prop_assert_eq!(code_to_state(&code), State::Unknown);
        }

        #[test]
        fn codes_decode_to_what_encoded_them(idx in 0usize..Algorithm::ALL.len()) {
            let algorithm = Algorithm::ALL[idx];
            if let Some(code) = algorithm_to_code(algorithm) {
                prop_assert_eq!(code_to_algorithm(code), Some(algorithm));
            }
        }
    }
}
