//! Property-based tests for input validation and relay quoting.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use qsm_cli::domain::firewall::PortList;
use qsm_cli::domain::quote::{join, shell_quote};
use qsm_cli::domain::validate::{validate_domain_name, validate_packages};

// ============================================================================
// PortList property tests
// ============================================================================

proptest! {
    /// Any list of ordered ranges in 1..=65535 parses and renders back unchanged.
    #[test]
    fn prop_valid_port_lists_render_back(
        ranges in prop::collection::vec((1u16..=65535, 0u16..1000), 1..6)
    ) {
        let text = ranges
            .iter()
            .map(|&(start, width)| {
                let end = start.saturating_add(width);
                if end == start { start.to_string() } else { format!("{start}-{end}") }
            })
            .collect::<Vec<_>>()
            .join(",");
        let parsed: PortList = text.parse().expect("valid list");
        prop_assert_eq!(parsed.to_string(), text);
    }

    /// Reversed ranges are always rejected.
    #[test]
    fn prop_reversed_ranges_rejected(lo in 1u16..65535, gap in 1u16..100) {
        let hi = lo.saturating_add(gap);
        prop_assume!(hi > lo);
        let text = format!("{hi}-{lo}");
        prop_assert!(text.parse::<PortList>().is_err());
    }

    /// Port zero and anything above 65535 are out of range.
    #[test]
    fn prop_out_of_range_ports_rejected(port in 65536u32..1_000_000) {
        prop_assert!(port.to_string().parse::<PortList>().is_err());
        let text = format!("0-{}", port % 65535 + 1);
        prop_assert!(text.parse::<PortList>().is_err());
    }
}

// ============================================================================
// Name validation property tests
// ============================================================================

proptest! {
    #[test]
    fn prop_well_formed_domain_names_accepted(name in "[a-z][a-z0-9_.-]{0,30}") {
        prop_assert!(validate_domain_name(&name).is_ok(), "rejected {name}");
    }

    /// Option-like names can never reach a command line.
    #[test]
    fn prop_dash_prefixed_names_rejected(rest in "[a-z0-9-]{0,20}") {
        let name = format!("-{rest}");
        prop_assert!(validate_domain_name(&name).is_err());
        prop_assert!(validate_packages(&[name.as_str()]).is_err());
    }

    #[test]
    fn prop_shell_metacharacters_rejected_in_packages(
        pkg in "[a-z]{1,8}",
        meta in prop::sample::select(vec![";", "|", "&", "$", "`", " ", "'", "\"", ">"]),
    ) {
        let bad = format!("{pkg}{meta}x");
        prop_assert!(validate_packages(&[bad.as_str()]).is_err());
    }
}

// ============================================================================
// Relay quoting property tests
// ============================================================================

proptest! {
    /// Quoting a word without single quotes wraps it verbatim or leaves it plain.
    #[test]
    fn prop_quote_without_single_quotes(word in "[^']{0,40}") {
        let quoted = shell_quote(&word);
        prop_assert!(quoted == word || quoted == format!("'{word}'"), "{quoted}");
    }

    /// Every single quote in the input is escaped as '\''.
    #[test]
    fn prop_single_quotes_are_escaped(parts in prop::collection::vec("[a-z ]{0,5}", 2..5)) {
        let word = parts.join("'");
        let quoted = shell_quote(&word);
        let quotes = parts.len() - 1;
        prop_assert_eq!(quoted.matches(r"'\''").count(), quotes);
    }

    /// Plain argument vectors join with single spaces.
    #[test]
    fn prop_plain_words_join_with_spaces(words in prop::collection::vec("[a-z0-9]{1,8}", 1..6)) {
        prop_assert_eq!(join(words.as_slice()), words.join(" "));
    }
}
