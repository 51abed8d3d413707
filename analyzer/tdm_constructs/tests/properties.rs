//! Property tests over generated documents.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use serde_json::{json, Value};
use tdm_constructs::{LoadErrorKind, Project, Table};

/// `basics` names plus one struct whose fields point at `field_types`.
/// The types table holds `basics + 1` entries.
fn document(basics: usize, field_types: &[Value]) -> Value {
    let names: Vec<String> = (0..basics).map(|i| format!("b{i}")).collect();
    let fields: Vec<Value> = field_types
        .iter()
        .enumerate()
        .map(|(i, ty)| json!({"name": format!("f{i}"), "type": ty}))
        .collect();
    json!({
        "basics": names,
        "structDescs": [{"fields": fields}]
    })
}

/// An index outside `[1, count]`, with the index it is reported as.
/// Unsigned values beyond `i64::MAX` are reported as `i64::MAX`.
fn out_of_range(count: usize) -> impl Strategy<Value = (Value, i64)> {
    let count = i64::try_from(count).unwrap();
    let beyond_i64 = u64::try_from(i64::MAX).unwrap() + 1;
    prop_oneof![
        (i64::MIN..=0).prop_map(|i| (json!(i), i)),
        ((count + 1)..=i64::MAX).prop_map(|i| (json!(i), i)),
        (beyond_i64..=u64::MAX).prop_map(|u| (json!(u), i64::MAX)),
    ]
}

proptest! {
    #[test]
    fn in_range_indices_always_load(
        (basics, fields) in (1usize..8).prop_flat_map(|n| {
            let count = i64::try_from(n + 1).unwrap();
            (Just(n), prop::collection::vec(1..=count, 0..6))
        })
    ) {
        let fields: Vec<Value> = fields.into_iter().map(Value::from).collect();
        let project = Project::from_document(&document(basics, &fields)).unwrap();
        prop_assert_eq!(project.table(Table::Types).len(), basics + 1);
        // Fields may point back at their own struct.
        let stub = project.to_stub_marked(project.table(Table::Types)[basics]).unwrap();
        prop_assert!(stub.starts_with("struct{"), "stub does not start with struct{{: {}", stub);
    }

    #[test]
    fn out_of_range_index_always_fails(
        (basics, (bad, reported), position) in (1usize..8).prop_flat_map(|n| {
            (Just(n), out_of_range(n + 1), 0usize..4)
        })
    ) {
        let mut fields = vec![json!(1); 4];
        fields[position] = bad;
        let err = Project::from_document(&document(basics, &fields)).unwrap_err();
        match err.kind() {
            LoadErrorKind::IndexOutOfRange { index, table, count } => {
                prop_assert_eq!(*index, reported);
                prop_assert_eq!(*table, Table::Types);
                prop_assert_eq!(*count, basics + 1);
            }
            other => prop_assert!(false, "unexpected error: {other}"),
        }
        prop_assert_eq!(
            err.path().to_string(),
            format!("structDescs[0].fields[{position}].type")
        );
    }

    #[test]
    fn out_of_range_method_ordinal_always_fails(ordinal in 2u32..1000) {
        let doc = json!({
            "structDescs": [{}],
            "signatures": [{}],
            "packages": [{
                "name": "p",
                "objectDecls": [{"name": "S", "data": 2, "methods": [format!("M#{ordinal}")]}],
                "methodDecls": [{"name": "M", "signature": 1}]
            }]
        });
        let err = Project::from_document(&doc).unwrap_err();
        let is_out_of_range = matches!(
            err.kind(),
            LoadErrorKind::IndexOutOfRange { table: Table::Methods, count: 1, .. }
        );
        prop_assert!(is_out_of_range);
    }
}
