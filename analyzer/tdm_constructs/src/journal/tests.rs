#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::handle::{sealed::Sealed, BasicId, TypeRef};
use crate::test_fixtures::{const_int, generic_list};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn project(doc: &Value) -> Project {
    Project::from_document(doc).unwrap()
}

fn ty(raw: u32) -> ConstructId {
    ConstructId::from_raw(raw)
}

// === Primitives ===

#[test]
fn empty_text_writes_nothing() {
    let project = project(&json!({}));
    let mut journal = Journal::new(&project, StubOptions::default());
    assert!(!journal.write_wrapped("path: ", "", ";"));
    journal.write_line("path: ", "", ";");
    assert!(!journal
        .write_list::<TypeRef>("imports: ", &[], ", ", ";")
        .unwrap());
    journal.write_list_line::<TypeRef>("imports: ", &[], ", ", ";").unwrap();
    assert_eq!(journal.finish(), "");
}

#[test]
fn indent_applies_at_line_start_only() {
    let project = project(&json!({}));
    let mut journal = Journal::new(&project, StubOptions::default());
    journal.write("a {");
    journal.newline();
    journal.indented(|journal| {
        journal.write_line("", "b", ";");
        journal.indented(|journal| journal.write_line("", "c", ";"));
    });
    journal.write("}");
    assert_eq!(journal.finish(), "a {\n  b;\n    c;\n}");
}

#[test]
fn mode_is_restored_after_derived_writes() {
    let project = project(&json!({}));
    let mut journal = Journal::new(&project, StubOptions::default());
    assert_eq!(journal.mode(), Mode::Long);
    let inner = journal.short(|journal| journal.mode());
    assert_eq!(inner, Mode::Short);
    assert_eq!(journal.mode(), Mode::Long);
}

#[test]
fn list_separators_and_wrapping() {
    let project = project(&json!({"basics": ["int", "string"]}));
    let ids = [
        BasicId::from_id(ty(0)),
        BasicId::from_id(ty(1)),
        BasicId::from_id(ty(0)),
    ];
    let mut journal = Journal::new(&project, StubOptions::default());
    journal.write_list_line("types: ", &ids, ", ", ";").unwrap();
    journal.write_construct_wrapped("<", ids[1], ">").unwrap();
    assert_eq!(journal.finish(), "types: int, string, int;\n<string>");
}

// === Kinds ===

#[test]
fn signature_forms() {
    let project = project(&json!({
        "basics": ["int", "string", "error", "any"],
        "named": [{"name": "T", "type": 4}],
        "signatures": [
            {
                "typeParams": [5],
                "params": [{"name": "a", "type": 1}, {"name": "b", "type": 2}],
                "variadic": true,
                "results": [{"type": 1}, {"type": 3}]
            },
            {"results": [{"name": "n", "type": 1}]},
            {},
            {"params": [{"type": 2}], "results": [{"type": 3}]}
        ]
    }));
    assert_eq!(
        project.to_stub(ty(5)).unwrap(),
        "func[T any](a int, b ...string) (int, error)"
    );
    assert_eq!(
        project.to_stub_short(ty(5)).unwrap(),
        "func(a int, b ...string) (int, error)"
    );
    assert_eq!(project.to_stub(ty(6)).unwrap(), "func() (n int)");
    assert_eq!(project.to_stub(ty(7)).unwrap(), "func()");
    assert_eq!(project.to_stub(ty(8)).unwrap(), "func(string) error");
}

#[test]
fn named_modes() {
    let project = project(&json!({
        "interfaceDescs": [{}],
        "named": [{"name": "T", "type": 1}]
    }));
    assert_eq!(project.to_stub_long(ty(1)).unwrap(), "T any");
    assert_eq!(project.to_stub_short(ty(1)).unwrap(), "T");
}

#[test]
fn union_lists_exact_then_approx() {
    let project = project(&json!({
        "basics": ["int", "string", "float"],
        "unions": [{"exact": [1, 2], "approx": [3]}, {"approx": [1, 3]}]
    }));
    assert_eq!(project.to_stub(ty(3)).unwrap(), "int|string|~float");
    assert_eq!(project.to_stub(ty(4)).unwrap(), "~int|~float");
}

#[test]
fn struct_forms() {
    let project = project(&json!({
        "basics": ["int", "Base"],
        "structDescs": [
            {},
            {"fields": [
                {"name": "Base", "type": 2, "embedded": true},
                {"name": "n", "type": 1}
            ]}
        ]
    }));
    assert_eq!(project.to_stub(ty(2)).unwrap(), "struct{}");
    assert_eq!(project.to_stub(ty(3)).unwrap(), "struct{ Base; n int }");
}

#[test]
fn empty_interface() {
    let project = project(&json!({"interfaceDescs": [{}]}));
    assert_eq!(project.to_stub(ty(0)).unwrap(), "{}");
    assert_eq!(project.to_stub_short(ty(0)).unwrap(), "any");
}

fn interfaces() -> Project {
    project(&json!({
        "basics": ["int", "string"],
        "interfaceDescs": [
            {"abstracts": [{"name": "String", "signature": 5}]},
            {
                "inherits": [7],
                "exact": [1],
                "approx": [2],
                "abstracts": [{"name": "Len", "signature": 6}]
            }
        ],
        "signatures": [{"results": [{"type": 2}]}, {"results": [{"type": 1}]}],
        "packages": [{
            "name": "fmt",
            "interfaceDecls": [{"name": "Stringer", "interface": 3}]
        }]
    }))
}

#[test]
fn interface_block() {
    let project = interfaces();
    assert_eq!(
        project.to_stub(ty(3)).unwrap(),
        "{\n  inherits: Stringer;\n  exact: int;\n  approx: ~string;\n  Len() int;\n}"
    );
    assert_eq!(
        project.to_stub_short(ty(3)).unwrap(),
        "interface{ inherits: Stringer; exact: int; approx: ~string; Len() int; }"
    );
}

#[test]
fn interface_decl_in_package() {
    let project = interfaces();
    assert_eq!(
        project.to_stub(ty(6)).unwrap(),
        "package fmt {\n  type Stringer interface{\n    String() string;\n  };\n}"
    );
    assert_eq!(project.to_stub_short(ty(7)).unwrap(), "Stringer");
}

#[test]
fn generic_package() {
    let project = project(&generic_list());
    let expected = "\
package list {
  path: example.com/list;
  type List[T any] struct{ items T };
  inst List[int] struct{ items int };
  func (List) Push[T any](v T);
  inst func (List[int]) Push[int](v int);
  var head List[int];
}";
    assert_eq!(project.to_stub(ty(9)).unwrap(), expected);
}

#[test]
fn short_stubs_are_identities() {
    let project = project(&generic_list());
    assert_eq!(project.to_stub_short(ty(9)).unwrap(), "list");
    assert_eq!(project.to_stub_short(ty(10)).unwrap(), "List");
    assert_eq!(project.to_stub_short(ty(11)).unwrap(), "List[int]");
    assert_eq!(project.to_stub_short(ty(12)).unwrap(), "Push");
    assert_eq!(project.to_stub_short(ty(13)).unwrap(), "Push[int]");
    assert_eq!(project.to_stub_short(ty(14)).unwrap(), "head");
    assert_eq!(project.to_stub(ty(6)).unwrap(), "List[int]");
}

#[test]
fn values_and_imports() {
    let project = project(&json!({
        "basics": ["int"],
        "packages": [
            {"name": "a", "values": [{"name": "v"}]},
            {"name": "b", "imports": [1], "values": [{"name": "x", "type": 1, "isConst": true}]}
        ]
    }));
    assert_eq!(project.to_stub(ty(1)).unwrap(), "package a {\n  var v <type>;\n}");
    assert_eq!(
        project.to_stub(ty(3)).unwrap(),
        "package b {\n  imports: a;\n  const x int;\n}"
    );
}

#[test]
fn const_value_package() {
    let project = project(&const_int());
    assert_eq!(
        project.to_stub(ty(1)).unwrap(),
        "package p {\n  path: example.com/p;\n  const x int;\n}"
    );
}

// === Cycles ===

fn self_struct() -> Project {
    project(&json!({"structDescs": [{"fields": [{"name": "next", "type": 1}]}]}))
}

#[test]
fn direct_cycle_fails_by_default() {
    let project = self_struct();
    assert_eq!(
        project.to_stub(ty(0)),
        Err(StubError::RecursionDetected {
            construct: ty(0),
            kind: Kind::StructDesc,
            mode: Mode::Short,
        })
    );
}

#[test]
fn direct_cycle_is_marked_once() {
    let project = self_struct();
    let stub = project.to_stub_marked(ty(0)).unwrap();
    assert_eq!(
        stub,
        "struct{ next struct{ next <recursion: structDesc#0 short> } }"
    );
    assert_eq!(stub.matches("<recursion:").count(), 1);
}

#[test]
fn cycle_through_a_union_is_marked_once() {
    let project = project(&json!({
        "basics": ["int"],
        "structDescs": [{"fields": [{"name": "v", "type": 3}]}],
        "unions": [{"exact": [1, 2]}]
    }));
    assert_eq!(
        project.to_stub_marked(ty(1)).unwrap(),
        "struct{ v int|struct{ v <recursion: union#2 short> } }"
    );
}

#[test]
fn sibling_visits_are_not_cycles() {
    let project = project(&json!({
        "basics": ["int"],
        "structDescs": [{"fields": [{"name": "a", "type": 1}, {"name": "b", "type": 1}]}]
    }));
    assert_eq!(project.to_stub(ty(1)).unwrap(), "struct{ a int; b int }");
}

#[test]
fn guard_does_not_leak_between_calls() {
    let project = self_struct();
    assert!(project.to_stub(ty(0)).is_err());
    assert!(project.to_stub(ty(0)).is_err());
    assert_eq!(
        project.to_stub_marked(ty(0)).unwrap(),
        project.to_stub_marked(ty(0)).unwrap()
    );
}

#[test]
fn depth_ceiling() {
    let project = project(&json!({
        "structDescs": [
            {"fields": [{"name": "a", "type": 2}]},
            {"fields": [{"name": "b", "type": 3}]},
            {}
        ]
    }));
    let options = StubOptions::default().with_max_depth(2);
    assert_eq!(
        project.to_stub_with(ty(0), options),
        Err(StubError::DepthExceeded { limit: 2 })
    );
    assert_eq!(
        project
            .to_stub_with(ty(0), options.with_max_depth(3))
            .unwrap(),
        "struct{ a struct{ b struct{} } }"
    );
}

#[test]
fn errors_describe_the_cycle() {
    let err = StubError::RecursionDetected {
        construct: ty(4),
        kind: Kind::Union,
        mode: Mode::Short,
    };
    assert_eq!(
        err.to_string(),
        "recursion detected while writing union #4 in short mode"
    );
}
