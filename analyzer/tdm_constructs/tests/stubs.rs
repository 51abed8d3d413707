//! End-to-end scenarios: load a JSON document, render stubs.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use serde_json::json;
use tdm_constructs::{
    ConstructId, CyclePolicy, LoadErrorKind, Mode, Project, StubError, StubOptions,
};

fn load(doc: &serde_json::Value) -> Project {
    Project::from_document(doc).unwrap()
}

fn id(raw: u32) -> ConstructId {
    ConstructId::from_raw(raw)
}

#[test]
fn const_value_in_a_package() {
    let project = load(&json!({
        "basics": ["int"],
        "packages": [{
            "name": "p",
            "path": "example.com/p",
            "values": [{"name": "x", "type": 1, "isConst": true}]
        }]
    }));
    let (package, _) = project.packages().next().unwrap();
    assert_eq!(
        project.to_stub(package).unwrap(),
        "package p {\n  path: example.com/p;\n  const x int;\n}"
    );
}

#[test]
fn union_of_exact_and_approx_terms() {
    let project = load(&json!({
        "basics": ["int", "string", "float"],
        "unions": [{"exact": [1, 2], "approx": [3]}]
    }));
    assert_eq!(project.to_stub(id(3)).unwrap(), "int|string|~float");
}

#[test]
fn empty_interface_has_no_lines() {
    let project = load(&json!({
        "interfaceDescs": [{"methods": {}, "inherits": [], "abstracts": []}]
    }));
    assert_eq!(project.to_stub(id(0)).unwrap(), "{}");
}

#[test]
fn legacy_method_map_renders_like_abstracts() {
    let legacy = load(&json!({
        "basics": ["string"],
        "interfaceDescs": [{"methods": {"String": 3}}],
        "signatures": [{"results": [{"type": 1}]}]
    }));
    let current = load(&json!({
        "basics": ["string"],
        "interfaceDescs": [{"abstracts": [{"name": "String", "signature": 3}]}],
        "signatures": [{"results": [{"type": 1}]}]
    }));
    assert_eq!(legacy.to_stub(id(1)).unwrap(), "{\n  String() string;\n}");
    assert_eq!(legacy.to_stub(id(1)), current.to_stub(id(1)));
}

/// A small module: a generic `Set[T comparable]` with an `Add` method, its
/// `Set[string]` instance, and a `Stringer` interface it is checked against.
fn sets() -> serde_json::Value {
    json!({
        "language": "go",
        "basics": ["string", "bool", "comparable"],
        "interfaceDescs": [
            {},
            {"abstracts": [{"name": "String", "signature": 9}]}
        ],
        "named": [{"name": "T", "type": 3}],
        "signatures": [
            {"typeParams": [6], "params": [{"name": "v", "type": 6}], "results": [{"name": "ok", "type": 2}]},
            {"params": [{"name": "v", "type": 1}], "results": [{"name": "ok", "type": 2}]},
            {"results": [{"type": 1}]}
        ],
        "structDescs": [
            {"fields": [{"name": "items", "type": 6}, {"name": "n", "type": 2}]},
            {"fields": [{"name": "items", "type": 1}, {"name": "n", "type": 2}]}
        ],
        "packages": [
            {
                "name": "fmt",
                "path": "fmt",
                "interfaceDecls": [{"name": "Stringer", "interface": 5}]
            },
            {
                "name": "sets",
                "path": "example.com/sets",
                "imports": [1],
                "objectDecls": [{"name": "Set", "typeParams": [6], "data": 10, "methods": ["Add1"]}],
                "objectInsts": [{"decl": 13, "instanceTypes": [1], "resolved": 11, "methods": [1]}],
                "methodDecls": [{"name": "Add", "typeParams": [6], "signature": 7, "receiver": 13}],
                "methodInsts": [{"decl": "Add1", "instanceTypes": [1], "resolved": 8, "receiver": 14}],
                "values": [{"name": "empty", "type": 14}, {"name": "limit"}]
            }
        ]
    })
}

#[test]
fn generic_module_golden() {
    let project = load(&sets());
    let expected = "\
package fmt {
  path: fmt;
  type Stringer interface{
    String() string;
  };
}
package sets {
  path: example.com/sets;
  imports: fmt;
  type Set[T comparable] struct{ items T; n bool };
  inst Set[string] struct{ items string; n bool };
  func (Set) Add[T comparable](v T) (ok bool);
  inst func (Set[string]) Add[string](v string) (ok bool);
  var empty Set[string];
  var limit <type>;
}
";
    assert_eq!(project.stub().unwrap(), expected);
}

#[test]
fn generic_module_queries() {
    let project = load(&sets());
    let sets = project.find_package("sets").unwrap();
    let set = project.get(sets).unwrap().object_decls[0];
    let instances = project.instances_of(set);
    assert_eq!(instances.len(), 1);
    assert_eq!(project.to_stub_short(instances[0]).unwrap(), "Set[string]");
    assert!(!project.is_concrete(set));
    assert!(project.is_concrete(instances[0]));
}

#[test]
fn stubs_are_identical_across_loads() {
    let doc = sets();
    let first = load(&doc).stub().unwrap();
    for _ in 0..3 {
        assert_eq!(load(&doc).stub().unwrap(), first);
    }
}

#[test]
fn stubs_are_identical_across_json_round_trip() {
    let doc = sets();
    let text = serde_json::to_string_pretty(&doc).unwrap();
    let parsed = Project::from_json_str(&text).unwrap();
    assert_eq!(parsed, load(&doc));
}

#[test]
fn concurrent_stubs_share_nothing() {
    let project = load(&json!({
        "basics": ["int"],
        "structDescs": [{"fields": [{"name": "next", "type": 2}]}]
    }));
    let marked = StubOptions::default().with_cycle_policy(CyclePolicy::Mark);
    std::thread::scope(|scope| {
        let failing = scope.spawn(|| project.to_stub(id(1)));
        let marking = scope.spawn(|| project.to_stub_with(id(1), marked));
        assert!(matches!(
            failing.join().unwrap(),
            Err(StubError::RecursionDetected { mode: Mode::Short, .. })
        ));
        assert_eq!(
            marking.join().unwrap().unwrap(),
            "struct{ next struct{ next <recursion: structDesc#1 short> } }"
        );
    });
    assert_eq!(project.to_stub(id(0)).unwrap(), "int");
}

#[test]
fn self_referential_struct_is_marked_exactly_once() {
    let project = load(&json!({
        "structDescs": [{"fields": [{"name": "self", "type": 1}]}]
    }));
    let stub = project.to_stub_marked(id(0)).unwrap();
    assert_eq!(stub.matches("<recursion:").count(), 1);
    assert_eq!(project.to_stub_marked(id(0)).unwrap(), stub);
}

#[test]
fn errors_name_the_offending_path() {
    let err = Project::from_document(&json!({
        "basics": ["int"],
        "packages": [{
            "name": "p",
            "values": [{"name": "ok", "type": 1}, {"name": "bad", "type": 7}]
        }]
    }))
    .unwrap_err();
    assert_eq!(err.path().to_string(), "packages[0].values[1].type");
    assert!(matches!(
        err.kind(),
        LoadErrorKind::IndexOutOfRange { index: 7, count: 1, .. }
    ));
    assert_eq!(
        err.to_string(),
        "packages[0].values[1].type: types index 7 is out of range [1, 1]"
    );
}

#[test]
fn unknown_method_key_is_reported() {
    let err = Project::from_document(&json!({
        "structDescs": [{}],
        "packages": [{
            "name": "p",
            "objectDecls": [{"name": "S", "data": 1, "methods": ["Missing1"]}]
        }]
    }))
    .unwrap_err();
    assert_eq!(err.path().to_string(), "packages[0].objectDecls[0].methods[0]");
    assert!(matches!(err.kind(), LoadErrorKind::UnknownKey { .. }));
    assert!(err.kind().is_data_error());
}

#[test]
fn wrong_kind_behind_an_index_is_reported() {
    let err = Project::from_document(&json!({
        "basics": ["int"],
        "packages": [{
            "name": "p",
            "objectDecls": [{"name": "S", "data": 1}]
        }]
    }))
    .unwrap_err();
    assert_eq!(err.path().to_string(), "packages[0].objectDecls[0].data");
    assert!(matches!(err.kind(), LoadErrorKind::WrongVariant { index: 1, .. }));
}
