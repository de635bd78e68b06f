// ═══════════════════════════════════════════════════════════════════
// Registry Tests — watch-list grammar, holdings rewrite, input
// validation
// ═══════════════════════════════════════════════════════════════════

use quote_board_core::errors::CoreError;
use quote_board_core::models::instrument::DEFAULT_INDEX_CODE;
use quote_board_core::registry::{
    add_code, parse_entry, parse_shares_input, remove_code, rewrite_holding, RegistryState,
    WatchlistEntry,
};

// ═══════════════════════════════════════════════════════════════════
// Entry grammar
// ═══════════════════════════════════════════════════════════════════

#[test]
fn bare_code_parses_without_holding() {
    assert_eq!(
        parse_entry("1.000001"),
        WatchlistEntry::Code("1.000001".into())
    );
}

#[test]
fn code_with_positive_shares_parses_as_holding() {
    assert_eq!(
        parse_entry("1.000001:10"),
        WatchlistEntry::Holding("1.000001".into(), 10.0)
    );
}

#[test]
fn negative_shares_keep_the_code_drop_the_holding() {
    assert_eq!(
        parse_entry("1.000001:-5"),
        WatchlistEntry::Code("1.000001".into())
    );
}

#[test]
fn zero_shares_keep_the_code_drop_the_holding() {
    assert_eq!(
        parse_entry("1.000001:0"),
        WatchlistEntry::Code("1.000001".into())
    );
}

#[test]
fn non_numeric_shares_keep_the_code_drop_the_holding() {
    assert_eq!(
        parse_entry("1.000001:abc"),
        WatchlistEntry::Code("1.000001".into())
    );
}

#[test]
fn infinite_shares_are_rejected() {
    assert_eq!(
        parse_entry("1.000001:inf"),
        WatchlistEntry::Code("1.000001".into())
    );
}

#[test]
fn empty_and_blank_entries_are_discarded() {
    assert_eq!(parse_entry(""), WatchlistEntry::Discarded);
    assert_eq!(parse_entry("   "), WatchlistEntry::Discarded);
}

#[test]
fn empty_code_discards_the_whole_entry() {
    assert_eq!(parse_entry(":5"), WatchlistEntry::Discarded);
    assert_eq!(parse_entry("  : 5"), WatchlistEntry::Discarded);
}

#[test]
fn whitespace_around_code_and_shares_is_trimmed() {
    assert_eq!(
        parse_entry("  116.00700 : 100 "),
        WatchlistEntry::Holding("116.00700".into(), 100.0)
    );
}

#[test]
fn only_the_first_colon_splits() {
    // A stray second colon lands inside the shares part and fails the
    // float parse, so the code is kept bare.
    assert_eq!(
        parse_entry("1.000001:5:5"),
        WatchlistEntry::Code("1.000001".into())
    );
}

// ═══════════════════════════════════════════════════════════════════
// RegistryState
// ═══════════════════════════════════════════════════════════════════

fn raw(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

#[test]
fn registry_preserves_configuration_order() {
    let registry = RegistryState::from_raw(&raw(&["116.00700", "1.000001", "0.000001"]));
    assert_eq!(registry.codes, vec!["116.00700", "1.000001", "0.000001"]);
}

#[test]
fn registry_builds_holdings_map() {
    let registry = RegistryState::from_raw(&raw(&["1.000001", "116.00700:100"]));
    assert_eq!(registry.codes.len(), 2);
    assert_eq!(registry.holdings.get("116.00700"), Some(&100.0));
    assert!(!registry.holdings.contains_key("1.000001"));
}

#[test]
fn empty_configuration_substitutes_default_index() {
    let registry = RegistryState::from_raw(&[]);
    assert_eq!(registry.codes, vec![DEFAULT_INDEX_CODE]);
    assert!(registry.holdings.is_empty());

    // All-malformed input collapses to the same default.
    let registry = RegistryState::from_raw(&raw(&["", "  ", ":7"]));
    assert_eq!(registry.codes, vec![DEFAULT_INDEX_CODE]);
}

#[test]
fn duplicate_codes_are_kept_in_order() {
    let registry = RegistryState::from_raw(&raw(&["1.000001", "1.000001:10"]));
    assert_eq!(registry.codes, vec!["1.000001", "1.000001"]);
    assert_eq!(registry.holdings.get("1.000001"), Some(&10.0));
}

#[test]
fn reparsing_is_idempotent() {
    let entries = raw(&["1.000001", "116.00700:100", "bad entry ok"]);
    assert_eq!(
        RegistryState::from_raw(&entries),
        RegistryState::from_raw(&entries)
    );
}

// ═══════════════════════════════════════════════════════════════════
// Holdings rewrite
// ═══════════════════════════════════════════════════════════════════

#[test]
fn setting_shares_annotates_a_bare_entry() {
    let rewritten = rewrite_holding(&raw(&["1.000001", "116.00700"]), "116.00700", 12.0);
    assert_eq!(rewritten, raw(&["1.000001", "116.00700:12"]));
}

#[test]
fn setting_shares_replaces_an_existing_annotation() {
    let rewritten = rewrite_holding(&raw(&["116.00700:7"]), "116.00700", 12.0);
    assert_eq!(rewritten, raw(&["116.00700:12"]));
}

#[test]
fn setting_zero_strips_the_annotation_but_keeps_the_instrument() {
    let rewritten = rewrite_holding(&raw(&["1.000001", "116.00700:7"]), "116.00700", 0.0);
    assert_eq!(rewritten, raw(&["1.000001", "116.00700"]));

    let registry = RegistryState::from_raw(&rewritten);
    assert!(!registry.holdings.contains_key("116.00700"));
    assert!(registry.codes.contains(&"116.00700".to_string()));
}

#[test]
fn unknown_code_with_positive_shares_is_appended() {
    let rewritten = rewrite_holding(&raw(&["1.000001"]), "105.AAPL", 3.0);
    assert_eq!(rewritten, raw(&["1.000001", "105.AAPL:3"]));
}

#[test]
fn unknown_code_with_zero_shares_changes_nothing() {
    let entries = raw(&["1.000001"]);
    assert_eq!(rewrite_holding(&entries, "105.AAPL", 0.0), entries);
}

#[test]
fn other_entries_pass_through_verbatim() {
    // The second entry keeps its odd spacing; only the target is rewritten.
    let entries = raw(&["116.00700:7", " 0.000333 : 8 "]);
    let rewritten = rewrite_holding(&entries, "116.00700", 9.0);
    assert_eq!(rewritten, raw(&["116.00700:9", " 0.000333 : 8 "]));
}

#[test]
fn rewrite_is_idempotent() {
    let once = rewrite_holding(&raw(&["116.00700:7"]), "116.00700", 12.0);
    let twice = rewrite_holding(&once, "116.00700", 12.0);
    assert_eq!(once, twice);
}

// ═══════════════════════════════════════════════════════════════════
// Watch-list editing
// ═══════════════════════════════════════════════════════════════════

#[test]
fn add_code_appends_new_instruments() {
    assert_eq!(
        add_code(&raw(&["1.000001"]), "116.00700"),
        raw(&["1.000001", "116.00700"])
    );
}

#[test]
fn add_code_is_idempotent_for_annotated_entries() {
    let entries = raw(&["116.00700:7"]);
    assert_eq!(add_code(&entries, "116.00700"), entries);
}

#[test]
fn remove_code_drops_bare_and_annotated_forms() {
    assert_eq!(
        remove_code(&raw(&["1.000001", "116.00700:7", "116.00700"]), "116.00700"),
        raw(&["1.000001"])
    );
}

// ═══════════════════════════════════════════════════════════════════
// Shares input validation
// ═══════════════════════════════════════════════════════════════════

#[test]
fn empty_input_means_clear_holding() {
    assert_eq!(parse_shares_input("").unwrap(), None);
    assert_eq!(parse_shares_input("   ").unwrap(), None);
}

#[test]
fn whole_numbers_are_accepted() {
    assert_eq!(parse_shares_input("12").unwrap(), Some(12));
    assert_eq!(parse_shares_input("0").unwrap(), Some(0));
    assert_eq!(parse_shares_input(" 100 ").unwrap(), Some(100));
}

#[test]
fn invalid_input_is_rejected() {
    for input in ["abc", "-3", "1.5", "nan", "inf"] {
        let err = parse_shares_input(input).unwrap_err();
        assert!(
            matches!(err, CoreError::Validation(_)),
            "expected validation error for {input:?}, got {err:?}"
        );
    }
}
