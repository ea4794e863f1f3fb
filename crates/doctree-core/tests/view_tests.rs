//! Tests for `ObjectView` / `ArrayView`: typed accessors, navigation, local
//! mutation, and error reporting.

use doctree_core::{ArrayView, Kind, ObjectView, ParentLink, SerializeOptions, TreeError};
use serde_json::json;

fn sample() -> ObjectView {
    ObjectView::parse(
        r#"{
            "name": "demo",
            "count": 42,
            "ratio": 0.5,
            "enabled": true,
            "nothing": null,
            "big": 9999999999,
            "huge": 18446744073709551615,
            "frac": -3.7,
            "nested": {"inner": {"x": 1}},
            "list": [1, "two", false, {"k": "v"}, [10, 20]]
        }"#,
    )
    .unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn parse_requires_an_object() {
    let err = ObjectView::parse("[1,2]").unwrap_err();
    assert!(matches!(
        err,
        TreeError::TypeMismatch {
            expected: Kind::Object,
            found: Kind::Array,
            ..
        }
    ));
}

#[test]
fn array_parse_requires_an_array() {
    let err = ArrayView::parse(r#"{"a":1}"#).unwrap_err();
    assert!(matches!(
        err,
        TreeError::TypeMismatch {
            expected: Kind::Array,
            found: Kind::Object,
            ..
        }
    ));
}

#[test]
fn malformed_text_is_a_parse_error() {
    assert!(matches!(
        ObjectView::parse("{\"a\":").unwrap_err(),
        TreeError::Parse(_)
    ));
}

#[test]
fn new_views_are_empty_roots() {
    let obj = ObjectView::new();
    assert!(obj.is_empty());
    assert!(obj.link().is_none());
    let arr = ArrayView::new();
    assert_eq!(arr.len(), 0);
    assert!(arr.link().is_none());
}

#[test]
fn attached_with_both_parents_is_an_invariant_violation() {
    let obj_parent = ObjectView::new();
    let arr_parent = ArrayView::new();
    let err = ObjectView::attached(
        json!({}),
        Some((obj_parent.clone(), "a".to_string())),
        Some((arr_parent.clone(), 0)),
    )
    .unwrap_err();
    assert!(matches!(err, TreeError::InvariantViolation(_)));

    let err = ArrayView::attached(
        json!([]),
        Some((obj_parent, "a".to_string())),
        Some((arr_parent, 0)),
    )
    .unwrap_err();
    assert!(matches!(err, TreeError::InvariantViolation(_)));
}

#[test]
fn attached_with_one_parent_writes_back() {
    let root = ObjectView::parse(r#"{"cfg":{"a":1}}"#).unwrap();
    let cfg = ObjectView::attached(json!({"a": 1}), Some((root.clone(), "cfg".to_string())), None)
        .unwrap();
    cfg.put("b", 2).unwrap();
    assert_eq!(root.to_value(), json!({"cfg": {"a": 1, "b": 2}}));
    assert_eq!(cfg.pointer().to_string(), "/cfg");
}

// ============================================================================
// Typed getters on objects
// ============================================================================

#[test]
fn typed_getters_read_matching_variants() {
    let root = sample();
    assert_eq!(root.get_str("name").unwrap(), "demo");
    assert_eq!(root.get_i64("count").unwrap(), 42);
    assert_eq!(root.get_i32("count").unwrap(), 42);
    assert_eq!(root.get_f64("ratio").unwrap(), 0.5);
    assert_eq!(root.get_f64("count").unwrap(), 42.0);
    assert!(root.get_bool("enabled").unwrap());
}

#[test]
fn get_long_on_string_is_type_mismatch() {
    let root = ObjectView::parse(r#"{"n":"not-a-number"}"#).unwrap();
    let err = root.get_i64("n").unwrap_err();
    assert!(matches!(
        err,
        TreeError::TypeMismatch {
            expected: Kind::Number,
            found: Kind::String,
            ..
        }
    ));
}

#[test]
fn get_long_on_missing_is_field_not_found() {
    let root = ObjectView::parse(r#"{"n":"not-a-number"}"#).unwrap();
    match root.get_i64("missing").unwrap_err() {
        TreeError::FieldNotFound { name } => assert_eq!(name, "missing"),
        other => panic!("expected FieldNotFound, got {other:?}"),
    }
}

#[test]
fn get_string_on_null_is_type_mismatch() {
    let err = sample().get_str("nothing").unwrap_err();
    assert!(matches!(
        err,
        TreeError::TypeMismatch {
            expected: Kind::String,
            found: Kind::Null,
            ..
        }
    ));
}

#[test]
fn get_bool_on_number_is_type_mismatch() {
    assert!(matches!(
        sample().get_bool("count").unwrap_err(),
        TreeError::TypeMismatch { .. }
    ));
}

#[test]
fn get_i32_rejects_wide_numbers() {
    let root = sample();
    assert_eq!(root.get_i64("big").unwrap(), 9_999_999_999);
    assert!(matches!(
        root.get_i32("big").unwrap_err(),
        TreeError::NumberOutOfRange { .. }
    ));
}

#[test]
fn get_i64_rejects_values_above_i64_max() {
    assert!(matches!(
        sample().get_i64("huge").unwrap_err(),
        TreeError::NumberOutOfRange { .. }
    ));
}

#[test]
fn get_i64_truncates_fractions() {
    assert_eq!(sample().get_i64("frac").unwrap(), -3);
}

#[test]
fn raw_get_returns_none_for_missing() {
    let root = sample();
    assert_eq!(root.get("nothing"), Some(json!(null)));
    assert_eq!(root.get("missing"), None);
}

#[test]
fn type_mismatch_message_names_the_field() {
    let err = sample().get_i64("name").unwrap_err();
    assert_eq!(
        err.to_string(),
        "type mismatch at field `name`: expected number, found string"
    );
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn get_object_copies_and_links() {
    let root = sample();
    let nested = root.get_object("nested").unwrap();
    assert_eq!(nested.to_value(), json!({"inner": {"x": 1}}));
    match nested.link() {
        Some(ParentLink::Object { parent, name }) => {
            assert!(parent.ptr_eq(&root));
            assert_eq!(name, "nested");
        }
        other => panic!("expected object link, got {other:?}"),
    }
}

#[test]
fn links_report_segment_and_parent() {
    let root = ObjectView::parse(r#"{"a":{"xs":[{"k":1},{"k":2}]}}"#).unwrap();
    let xs = root.get_object("a").unwrap().get_array("xs").unwrap();
    let first = xs.get_object(0).unwrap().link().unwrap();
    let second = xs.get_object(1).unwrap().link().unwrap();

    assert_eq!(first.segment(), "0");
    assert_eq!(second.segment(), "1");
    assert!(first.same_parent(&second));
    assert_eq!(first.parent_link().unwrap().segment(), "xs");

    // A fresh navigation copies the parent again, so it is a different view.
    let again = root.get_object("a").unwrap().get_array("xs").unwrap();
    let third = again.get_object(0).unwrap().link().unwrap();
    assert!(!first.same_parent(&third));
    assert!(!first.same_parent(&xs.link().unwrap()));
}

#[test]
fn get_object_on_missing_is_field_not_found() {
    assert!(matches!(
        sample().get_object("missing").unwrap_err(),
        TreeError::FieldNotFound { .. }
    ));
}

#[test]
fn get_object_on_wrong_kind_is_type_mismatch() {
    let root = sample();
    assert!(matches!(
        root.get_object("list").unwrap_err(),
        TreeError::TypeMismatch {
            expected: Kind::Object,
            found: Kind::Array,
            ..
        }
    ));
    assert!(matches!(
        root.get_array("nested").unwrap_err(),
        TreeError::TypeMismatch {
            expected: Kind::Array,
            found: Kind::Object,
            ..
        }
    ));
    assert!(matches!(
        root.get_object("nothing").unwrap_err(),
        TreeError::TypeMismatch {
            found: Kind::Null,
            ..
        }
    ));
}

#[test]
fn empty_containers_are_valid_views() {
    let root = ObjectView::parse(r#"{"o":{},"a":[]}"#).unwrap();
    assert!(root.get_object("o").unwrap().is_empty());
    assert!(root.get_array("a").unwrap().is_empty());
}

#[test]
fn array_navigation_and_getters() {
    let list = sample().get_array("list").unwrap();
    assert_eq!(list.len(), 5);
    assert_eq!(list.get_i64(0).unwrap(), 1);
    assert_eq!(list.get_str(1).unwrap(), "two");
    assert!(!list.get_bool(2).unwrap());
    assert_eq!(list.get_object(3).unwrap().get_str("k").unwrap(), "v");
    assert_eq!(list.get_array(4).unwrap().get_i32(1).unwrap(), 20);
    assert_eq!(list.get(9), None);
}

#[test]
fn array_getters_report_index_out_of_range() {
    let list = sample().get_array("list").unwrap();
    match list.get_i64(5).unwrap_err() {
        TreeError::IndexOutOfRange { index, len } => {
            assert_eq!(index, 5);
            assert_eq!(len, 5);
        }
        other => panic!("expected IndexOutOfRange, got {other:?}"),
    }
    assert!(matches!(
        list.get_object(7).unwrap_err(),
        TreeError::IndexOutOfRange { .. }
    ));
    assert!(matches!(
        list.get_str(0).unwrap_err(),
        TreeError::TypeMismatch { .. }
    ));
}

#[test]
fn objects_yields_linked_element_views() {
    let root = ObjectView::parse(r#"{"items":[{"id":1},{"id":2}]}"#).unwrap();
    let items = root.get_array("items").unwrap();
    let views = items.objects().unwrap();
    assert_eq!(views.len(), 2);
    for (i, view) in views.iter().enumerate() {
        assert_eq!(view.pointer().to_string(), format!("/items/{i}"));
        view.put("seen", true).unwrap();
    }
    assert_eq!(
        root.to_value(),
        json!({"items": [{"id": 1, "seen": true}, {"id": 2, "seen": true}]})
    );
}

#[test]
fn objects_fails_on_non_object_element() {
    let items = ArrayView::parse(r#"[{"id":1}, 2]"#).unwrap();
    assert!(matches!(
        items.objects().unwrap_err(),
        TreeError::TypeMismatch { .. }
    ));
}

// ============================================================================
// Local mutation
// ============================================================================

#[test]
fn put_inserts_and_replaces_preserving_order() {
    let root = ObjectView::parse(r#"{"b":1,"a":2}"#).unwrap();
    root.put("c", 3).unwrap();
    root.put("b", "one").unwrap();
    root.set("a", json!([1])).unwrap();
    root.put_null("d").unwrap();
    assert_eq!(root.keys(), vec!["b", "a", "c", "d"]);
    assert_eq!(
        root.to_json_string(&SerializeOptions::compact()).unwrap(),
        r#"{"b":"one","a":[1],"c":3,"d":null}"#
    );
}

#[test]
fn remove_keeps_remaining_order() {
    let root = ObjectView::parse(r#"{"a":1,"b":2,"c":3}"#).unwrap();
    assert_eq!(root.remove("a").unwrap(), Some(json!(1)));
    assert_eq!(root.remove("zzz").unwrap(), None);
    assert_eq!(root.keys(), vec!["b", "c"]);
}

#[test]
fn array_set_requires_index_below_len() {
    let arr = ArrayView::parse("[1,2,3]").unwrap();
    arr.set(2, 30).unwrap();
    match arr.set(3, 40).unwrap_err() {
        TreeError::IndexOutOfRange { index, len } => {
            assert_eq!((index, len), (3, 3));
        }
        other => panic!("expected IndexOutOfRange, got {other:?}"),
    }
    assert_eq!(arr.to_value(), json!([1, 2, 30]));
}

#[test]
fn array_add_insert_remove() {
    let arr = ArrayView::new();
    arr.add("a").unwrap();
    arr.add("c").unwrap();
    arr.insert(1, "b").unwrap();
    arr.insert(3, "d").unwrap();
    assert!(matches!(
        arr.insert(9, "x").unwrap_err(),
        TreeError::IndexOutOfRange { .. }
    ));
    assert_eq!(arr.remove(0).unwrap(), json!("a"));
    assert!(matches!(
        arr.remove(3).unwrap_err(),
        TreeError::IndexOutOfRange { .. }
    ));
    assert_eq!(arr.to_value(), json!(["b", "c", "d"]));
}

#[test]
fn views_can_be_written_as_values() {
    let root = ObjectView::new();
    let child = ObjectView::parse(r#"{"x":1}"#).unwrap();
    let list = ArrayView::parse("[true]").unwrap();
    root.put("child", &child).unwrap();
    root.put("list", list).unwrap();
    assert_eq!(root.to_value(), json!({"child": {"x": 1}, "list": [true]}));
}

#[test]
fn object_view_can_be_written_into_itself() {
    let root = ObjectView::parse(r#"{"v":{"a":1}}"#).unwrap();
    let v = root.get_object("v").unwrap();
    v.put("copy", &v).unwrap();
    assert_eq!(v.to_value(), json!({"a": 1, "copy": {"a": 1}}));
    assert_eq!(root.to_value(), json!({"v": {"a": 1, "copy": {"a": 1}}}));

    v.set_by_pointer("/copy/again", &v).unwrap();
    let expected = json!({"a": 1, "copy": {"a": 1, "again": {"a": 1, "copy": {"a": 1}}}});
    assert_eq!(v.to_value(), expected);
    assert_eq!(root.get("v"), Some(expected));
}

#[test]
fn array_view_can_be_written_into_itself() {
    let root = ObjectView::parse(r#"{"xs":[1]}"#).unwrap();
    let xs = root.get_array("xs").unwrap();

    xs.add(&xs).unwrap();
    assert_eq!(xs.to_value(), json!([1, [1]]));
    xs.set(0, &xs).unwrap();
    assert_eq!(xs.to_value(), json!([[1, [1]], [1]]));
    xs.insert(0, &xs).unwrap();
    assert_eq!(xs.to_value(), json!([[[1, [1]], [1]], [1, [1]], [1]]));
    xs.set_by_pointer("/3", &xs).unwrap();
    assert_eq!(xs.len(), 4);
    assert_eq!(xs.get(3), Some(json!([[[1, [1]], [1]], [1, [1]], [1]])));
    assert_eq!(root.get("xs"), Some(xs.to_value()));
}

#[test]
fn failed_self_write_by_pointer_is_an_error() {
    let v = ObjectView::parse(r#"{"a":1}"#).unwrap();
    assert!(matches!(
        v.set_by_pointer("/a/b", &v).unwrap_err(),
        TreeError::InvalidPointer { .. }
    ));
    assert_eq!(v.to_value(), json!({"a": 1}));
}

#[test]
fn non_finite_floats_are_written_as_null() {
    let root = ObjectView::new();
    root.put("nan", f64::NAN).unwrap();
    assert_eq!(root.get("nan"), Some(json!(null)));
}

#[test]
fn deep_copy_is_an_independent_root() {
    let root = sample();
    let nested = root.get_object("nested").unwrap();
    let copy = nested.deep_copy();
    assert!(copy.link().is_none());
    assert!(!copy.ptr_eq(&nested));
    copy.put("extra", 1).unwrap();
    assert!(!root.get_object("nested").unwrap().contains_key("extra"));
}

// ============================================================================
// Typed conversion
// ============================================================================

#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn serialize_and_deserialize_typed_structures() {
    let view = ObjectView::from_serialize(&Point { x: 1, y: 2 }).unwrap();
    view.put("y", 5).unwrap();
    assert_eq!(view.deserialize::<Point>().unwrap(), Point { x: 1, y: 5 });
}

#[test]
fn deserialize_failure_is_a_parse_error() {
    let view = ObjectView::parse(r#"{"x":"one"}"#).unwrap();
    assert!(matches!(
        view.deserialize::<Point>().unwrap_err(),
        TreeError::Parse(_)
    ));
}

#[test]
fn trees_built_with_json_macro_become_root_views() {
    let root = ObjectView::from_value(json!({"name": "demo", "items": [{"id": 1}]})).unwrap();
    let items = ArrayView::from_value(json!([{"id": 2}])).unwrap();
    root.get_array("items").unwrap().add(items.get(0).unwrap()).unwrap();
    assert_eq!(
        root.to_value(),
        json!({"name": "demo", "items": [{"id": 1}, {"id": 2}]})
    );
    assert!(matches!(
        ArrayView::from_value(json!({})).unwrap_err(),
        TreeError::TypeMismatch { expected: Kind::Array, found: Kind::Object, .. }
    ));
}
