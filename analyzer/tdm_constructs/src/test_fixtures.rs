//! Shared documents for unit tests. Only compiled in test builds.

use serde_json::{json, Value};

/// A generic `List[T]` with one method and its `int` instantiation.
///
/// Types table:
/// 1 `int`, 2 `string`, 3 `{}`, 4 `T`, 5 `func(v T)`, 6 `func(v int)`,
/// 7 `List[int]` (solid), 8 `struct{ items T }`, 9 `struct{ items int }`,
/// 10 `List` (objectDecl), 11 `List[int]` (objectInst).
///
/// Arena ids follow document order: the package is id 9, the object decl
/// id 10, the object inst id 11, `Push` id 12, its inst id 13, `head` id 14.
pub(crate) fn generic_list() -> Value {
    json!({
        "language": "go",
        "basics": ["int", {"name": "string"}],
        "interfaceDescs": [{}],
        "named": [{"name": "T", "type": 3}],
        "signatures": [
            {"typeParams": [4], "params": [{"name": "v", "type": 4}]},
            {"params": [{"name": "v", "type": 1}]}
        ],
        "solids": [{"target": 10, "typeArgs": [1]}],
        "structDescs": [
            {"fields": [{"name": "items", "type": 4}]},
            {"fields": [{"name": "items", "type": 1}]}
        ],
        "packages": [{
            "name": "list",
            "path": "example.com/list",
            "objectDecls": [{
                "name": "List",
                "loc": "list.go:3",
                "typeParams": [4],
                "data": 8,
                "methods": ["Push1"]
            }],
            "objectInsts": [{
                "decl": 10,
                "instanceTypes": [1],
                "resolved": 9,
                "methods": [1]
            }],
            "methodDecls": [{
                "name": "Push",
                "typeParams": [4],
                "signature": 5,
                "receiver": 10
            }],
            "methodInsts": [{
                "decl": "Push1",
                "instanceTypes": [1],
                "resolved": 6,
                "receiver": 11
            }],
            "values": [{"name": "head", "type": 7}]
        }]
    })
}

/// One package `p` holding `const x int`.
pub(crate) fn const_int() -> Value {
    json!({
        "basics": ["int"],
        "packages": [{
            "name": "p",
            "path": "example.com/p",
            "values": [{"name": "x", "type": 1, "isConst": true}]
        }]
    })
}
