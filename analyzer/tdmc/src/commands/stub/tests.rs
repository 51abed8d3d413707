#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|&arg| arg.to_owned()).collect()
}

fn project() -> Project {
    Project::from_json_str(
        r#"{
            "basics": ["int"],
            "structDescs": [{"fields": [{"name": "next", "type": 2}]}],
            "packages": [
                {"name": "a", "values": [{"name": "x", "type": 1, "isConst": true}]},
                {"name": "b", "imports": [1]}
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn defaults() {
    let parsed = parse_stub_args(&args(&["p.json"])).unwrap();
    assert_eq!(
        parsed,
        StubArgs {
            path: "p.json".to_owned(),
            selection: Selection::All,
            options: StubOptions::default(),
        }
    );
}

#[test]
fn flags_in_any_order() {
    let parsed =
        parse_stub_args(&args(&["--short", "--type", "3", "p.json", "--mark-cycles"])).unwrap();
    assert_eq!(parsed.path, "p.json");
    assert_eq!(parsed.selection, Selection::Type(3));
    assert_eq!(parsed.options.mode, Mode::Short);
    assert_eq!(parsed.options.cycle_policy, CyclePolicy::Mark);

    let parsed = parse_stub_args(&args(&["p.json", "--package=2", "--max-depth=8"])).unwrap();
    assert_eq!(parsed.selection, Selection::Package(2));
    assert_eq!(parsed.options.max_depth, 8);
}

#[test]
fn rejects_bad_arguments() {
    assert_eq!(parse_stub_args(&[]).unwrap_err(), "missing file path");
    assert_eq!(
        parse_stub_args(&args(&["p.json", "--type"])).unwrap_err(),
        "--type requires an index"
    );
    assert_eq!(
        parse_stub_args(&args(&["p.json", "--type", "x"])).unwrap_err(),
        "invalid index 'x' for --type"
    );
    assert!(parse_stub_args(&args(&["p.json", "--type", "1", "--package", "1"])).is_err());
    assert!(parse_stub_args(&args(&["p.json", "q.json"])).is_err());
    assert!(parse_stub_args(&args(&["p.json", "--verbose"])).is_err());
}

#[test]
fn renders_whole_project() {
    let parsed = parse_stub_args(&args(&["p.json"])).unwrap();
    assert_eq!(
        render(&project(), &parsed).unwrap(),
        "package a {\n  const x int;\n}\npackage b {\n  imports: a;\n}\n"
    );

    let short = parse_stub_args(&args(&["p.json", "--short"])).unwrap();
    assert_eq!(render(&project(), &short).unwrap(), "a\nb\n");
}

#[test]
fn renders_one_entry() {
    let parsed = parse_stub_args(&args(&["p.json", "--package", "2"])).unwrap();
    assert_eq!(
        render(&project(), &parsed).unwrap(),
        "package b {\n  imports: a;\n}\n"
    );

    let parsed = parse_stub_args(&args(&["p.json", "--type", "1"])).unwrap();
    assert_eq!(render(&project(), &parsed).unwrap(), "int\n");
}

#[test]
fn reports_missing_entries_and_cycles() {
    let parsed = parse_stub_args(&args(&["p.json", "--type", "9"])).unwrap();
    assert_eq!(
        render(&project(), &parsed).unwrap_err(),
        "no type at index 9 (the project has 2 types)"
    );

    let parsed = parse_stub_args(&args(&["p.json", "--type", "2"])).unwrap();
    assert!(render(&project(), &parsed)
        .unwrap_err()
        .starts_with("recursion detected while writing structDesc #1"));

    let marked = parse_stub_args(&args(&["p.json", "--type", "2", "--mark-cycles"])).unwrap();
    assert_eq!(
        render(&project(), &marked).unwrap(),
        "struct{ next struct{ next <recursion: structDesc#1 short> } }\n"
    );
}

#[test]
fn usage_names_every_option() {
    for flag in ["--short", "--long", "--mark-cycles", "--max-depth=", "--type", "--package"] {
        assert!(STUB_USAGE.contains(flag), "usage omits {flag}");
    }
    let parsed = parse_stub_args(&args(&["p.json", "--long", "--max-depth=4", "--package", "2"]));
    assert!(parsed.is_ok());
}
