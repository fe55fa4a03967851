//! Tests for the similarity ratio and dropdown option selection.

use formfill_core::dropdown::{pick_option, DEFAULT_THRESHOLD};
use formfill_core::similarity;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_identical_ignoring_case() {
    assert_eq!(similarity("Toronto", "toronto"), 1.0);
    assert_eq!(similarity("Appliance Store", "APPLIANCE STORE"), 1.0);
}

#[test]
fn test_empty_strings() {
    assert_eq!(similarity("", ""), 1.0);
    assert_eq!(similarity("", "abc"), 0.0);
    assert_eq!(similarity("abc", ""), 0.0);
}

#[test]
fn test_disjoint() {
    assert_eq!(similarity("abc", "xyz"), 0.0);
}

#[test]
fn test_known_ratios() {
    // Values as reported by difflib.SequenceMatcher(None, a, b).ratio()
    assert!(close(similarity("abcd", "bcde"), 0.75));
    assert!(close(similarity("Other", "Appliance Store"), 0.2));
    assert!(close(similarity("Alberta", "Ontario"), 4.0 / 14.0));
    assert!(close(similarity("Appliance Repair", "Appliance Store"), 24.0 / 31.0));
    assert!(close(similarity("Mexico", "Canada"), 2.0 / 12.0));
}

#[test]
fn test_symmetric_on_short_inputs() {
    let pairs = [("Ontario", "Ont."), ("Canada", "Canadian"), ("Toronto", "Tornto")];
    for (a, b) in pairs {
        assert!(close(similarity(a, b), similarity(b, a)), "{} / {}", a, b);
    }
}

#[test]
fn test_ratio_in_unit_range() {
    let samples = ["", "a", "Toronto", "Ontario", "Appliance Store", "123-456-7890"];
    for a in samples {
        for b in samples {
            let r = similarity(a, b);
            assert!((0.0..=1.0).contains(&r), "{} / {} -> {}", a, b, r);
        }
    }
}

#[test]
fn test_long_text_still_scores() {
    let a = "Sample Appliance Store offers home appliances and parts ".repeat(5);
    let b = a.clone();
    assert!(a.chars().count() >= 200);
    assert_eq!(similarity(&a, &b), 1.0);

    let mut c = a.clone();
    c.push_str("and more");
    let r = similarity(&a, &c);
    assert!(r > 0.9 && r < 1.0, "ratio {}", r);
}

#[test]
fn test_pick_first_over_threshold() {
    let options = ["Other", "Appliance Store", "Appliance Repair"];
    assert_eq!(pick_option("Appliance Store", &options, DEFAULT_THRESHOLD), Some(1));
}

#[test]
fn test_pick_stops_at_first_acceptable() {
    // "Appliance Repair" scores ~0.77 and comes first, so the exact match
    // further down is never reached.
    let options = ["Appliance Repair", "Appliance Store"];
    assert_eq!(pick_option("Appliance Store", &options, DEFAULT_THRESHOLD), Some(0));
}

#[test]
fn test_pick_none_below_threshold() {
    let options = ["United States", "Mexico"];
    assert_eq!(pick_option("Canada", &options, DEFAULT_THRESHOLD), None);

    let empty: [&str; 0] = [];
    assert_eq!(pick_option("Canada", &empty, DEFAULT_THRESHOLD), None);
}

#[test]
fn test_threshold_is_strict() {
    // "abcd" vs "bcde" is exactly 0.75
    assert_eq!(pick_option("abcd", &["bcde"], 0.75), None);
    assert_eq!(pick_option("abcd", &["bcde"], 0.74), Some(0));
}

#[test]
fn test_pick_case_insensitive() {
    let options = vec!["ALBERTA".to_string(), "ONTARIO".to_string()];
    assert_eq!(pick_option("Ontario", &options, DEFAULT_THRESHOLD), Some(1));
}
