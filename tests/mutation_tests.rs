//! Tests for mutation operations
//!
//! These tests verify:
//! - append / sequence_append coercion
//! - accumulate for numbers, strings and mismatched kinds
//! - sequence_create / get_all / extend / clear
//! - Non-applying outcomes never save

use emberkv::{Accumulated, Key, Store};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open_path(temp_dir.path().join("store.json"), false).unwrap();
    (temp_dir, store)
}

fn setup_auto_save_store() -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open_path(temp_dir.path().join("store.json"), true).unwrap();
    (temp_dir, store)
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_append_to_sequence() {
    let (_temp, store) = setup_temp_store();

    store.set("list", vec![1, 2]).unwrap();
    let result = store.append("list", 3).unwrap();

    assert_eq!(
        result,
        Some((Key::from("list"), vec![json!(1), json!(2), json!(3)]))
    );
    assert_eq!(store.get("list").unwrap(), Some(json!([1, 2, 3])));
}

#[test]
fn test_append_coerces_scalar() {
    let (_temp, store) = setup_temp_store();

    store.set("single", "a").unwrap();
    store.append("single", "b").unwrap();

    assert_eq!(store.get("single").unwrap(), Some(json!(["a", "b"])));
}

#[test]
fn test_append_nonexistent_key() {
    let (_temp, store) = setup_temp_store();

    assert_eq!(store.append("missing", 1).unwrap(), None);
    assert!(!store.exists("missing").unwrap());
}

#[test]
fn test_append_with_composite_key() {
    let (_temp, store) = setup_temp_store();

    store.set((1, 2), json!([])).unwrap();
    let (key, sequence) = store.append((1, 2), "x").unwrap().unwrap();

    assert_eq!(key, Key::from((1, 2)));
    assert_eq!(sequence, vec![json!("x")]);
}

// =============================================================================
// Accumulate Tests
// =============================================================================

#[test]
fn test_accumulate_integers() {
    let (_temp, store) = setup_temp_store();

    store.set("my_num", 10).unwrap();
    let result = store.accumulate("my_num", 5).unwrap();

    assert_eq!(result, Accumulated::Updated(json!(15)));
    assert_eq!(store.get("my_num").unwrap(), Some(json!(15)));
}

#[test]
fn test_accumulate_strings() {
    let (_temp, store) = setup_temp_store();

    store.set("my_str", "Hello").unwrap();
    store.accumulate("my_str", " World").unwrap();

    assert_eq!(store.get("my_str").unwrap(), Some(json!("Hello World")));
}

#[test]
fn test_accumulate_mixed_numbers() {
    let (_temp, store) = setup_temp_store();

    store.set("n", 1.5).unwrap();
    let result = store.accumulate("n", 1).unwrap();

    assert_eq!(result.value(), Some(&json!(2.5)));
}

#[test]
fn test_accumulate_negative_delta() {
    let (_temp, store) = setup_temp_store();

    store.set("n", 3).unwrap();
    store.accumulate("n", -5).unwrap();

    assert_eq!(store.get("n").unwrap(), Some(json!(-2)));
}

#[test]
fn test_accumulate_beyond_i64_range() {
    let (_temp, store) = setup_temp_store();

    store.set("big", i64::MAX).unwrap();
    let result = store.accumulate("big", 1).unwrap();

    let sum = result.value().and_then(|v| v.as_f64()).unwrap();
    assert_eq!(sum, i64::MAX as f64 + 1.0);
}

#[test]
fn test_accumulate_type_mismatch() {
    let (_temp, store) = setup_temp_store();

    store.set("my_num", 10).unwrap();
    let result = store.accumulate("my_num", "text").unwrap();

    assert_eq!(result, Accumulated::NotApplicable);
    assert!(!result.is_updated());
    assert_eq!(store.get("my_num").unwrap(), Some(json!(10)));
}

#[test]
fn test_accumulate_bool_is_not_numeric() {
    let (_temp, store) = setup_temp_store();

    store.set("flag", true).unwrap();

    assert_eq!(store.accumulate("flag", 1).unwrap(), Accumulated::NotApplicable);
    assert_eq!(store.get("flag").unwrap(), Some(json!(true)));
}

#[test]
fn test_accumulate_nonexistent_key() {
    let (_temp, store) = setup_temp_store();

    assert_eq!(store.accumulate("missing", 1).unwrap(), Accumulated::NotFound);
    assert!(store.is_empty());
}

#[test]
fn test_accumulate_not_applicable_does_not_save() {
    let (temp, store) = setup_auto_save_store();
    let path = temp.path().join("store.json");

    store.set("n", 1).unwrap();
    std::fs::remove_file(&path).unwrap();

    store.accumulate("n", "x").unwrap();
    store.accumulate("missing", 1).unwrap();
    store.remove("missing").unwrap();
    store.append("missing", 1).unwrap();
    store.sequence_clear("n").unwrap();

    assert!(!path.exists());
}

// =============================================================================
// Sequence Tests
// =============================================================================

#[test]
fn test_sequence_create_then_append() {
    let (_temp, store) = setup_temp_store();

    store.sequence_create("my_list").unwrap();
    store.sequence_append("my_list", "item1").unwrap();
    store.sequence_append("my_list", "item2").unwrap();

    assert_eq!(
        store.sequence_get_all("my_list").unwrap(),
        Some(vec![json!("item1"), json!("item2")])
    );
}

#[test]
fn test_sequence_create_wraps_existing_value() {
    let (_temp, store) = setup_temp_store();

    store.set("k", 1).unwrap();
    store.sequence_create("k").unwrap();

    assert_eq!(store.get("k").unwrap(), Some(json!([1])));
}

#[test]
fn test_sequence_create_keeps_existing_sequence() {
    let (_temp, store) = setup_temp_store();

    store.set("k", vec![1, 2]).unwrap();
    store.sequence_create("k").unwrap();

    assert_eq!(store.get("k").unwrap(), Some(json!([1, 2])));
}

#[test]
fn test_sequence_get_all_views_scalar_as_sequence() {
    let (_temp, store) = setup_temp_store();

    store.set("k", "solo").unwrap();

    assert_eq!(store.sequence_get_all("k").unwrap(), Some(vec![json!("solo")]));
    assert_eq!(store.get("k").unwrap(), Some(json!("solo")));
    assert_eq!(store.sequence_get_all("missing").unwrap(), None);
}

#[test]
fn test_sequence_extend() {
    let (_temp, store) = setup_temp_store();

    store.set("k", "a").unwrap();
    let result = store.sequence_extend("k", ["b", "c"]).unwrap();

    assert_eq!(
        result,
        Some((Key::from("k"), vec![json!("a"), json!("b"), json!("c")]))
    );
    assert_eq!(store.get("k").unwrap(), Some(json!(["a", "b", "c"])));
}

#[test]
fn test_sequence_extend_with_iterator() {
    let (_temp, store) = setup_temp_store();

    store.sequence_create("squares").unwrap();
    store.sequence_extend("squares", (1..=3).map(|i| i * i)).unwrap();

    assert_eq!(store.get("squares").unwrap(), Some(json!([1, 4, 9])));
}

#[test]
fn test_sequence_extend_nonexistent_key() {
    let (_temp, store) = setup_temp_store();

    assert_eq!(store.sequence_extend("missing", vec![1]).unwrap(), None);
    assert!(store.is_empty());
}

#[test]
fn test_sequence_clear() {
    let (_temp, store) = setup_temp_store();

    store.set("list", vec![1, 2, 3]).unwrap();

    assert!(store.sequence_clear("list").unwrap());
    assert_eq!(store.get("list").unwrap(), Some(json!([])));
}

#[test]
fn test_sequence_clear_rejects_non_sequence() {
    let (_temp, store) = setup_temp_store();

    store.set("scalar", 5).unwrap();

    assert!(!store.sequence_clear("scalar").unwrap());
    assert!(!store.sequence_clear("missing").unwrap());
    assert_eq!(store.get("scalar").unwrap(), Some(json!(5)));
}
