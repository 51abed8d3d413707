//! Pass-2 initialization: turn one document node into one construct.
//!
//! Every cross-reference is resolved through the [`Registry`] while reading,
//! so an initialized construct never holds a raw serialized index.

use std::collections::BTreeMap;

use tdm_node::{Node, NodeExt};

use super::{
    Argument, Basic, Construct, DeclHeader, Field, InterfaceDecl, InterfaceDesc, InterfaceInst,
    MethodDecl, MethodInst, Named, ObjectDecl, ObjectInst, Package, Signature, Solid, StructDesc,
    Union, Value,
};
use crate::error::{Context, LoadError, LoadErrorKind};
use crate::handle::{
    InterfaceDeclId, InterfaceDescId, InterfaceInstId, MethodDeclId, MethodInstId, NamedId,
    ObjectDeclId, ObjectInstId, PackageId, SignatureId, StructDescId, TypeRef, ValueId,
};
use crate::registry::Registry;
use crate::Kind;

/// The member lists of one package, known from allocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PackageMembers {
    pub interface_decls: Vec<InterfaceDeclId>,
    pub interface_insts: Vec<InterfaceInstId>,
    pub object_decls: Vec<ObjectDeclId>,
    pub object_insts: Vec<ObjectInstId>,
    pub method_decls: Vec<MethodDeclId>,
    pub method_insts: Vec<MethodInstId>,
    pub values: Vec<ValueId>,
}

/// Where in the document a construct was allocated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Scope {
    /// One of the top-level type lists.
    Global,
    /// A member list of the given package.
    Member(PackageId),
    /// The package entry itself.
    Package(PackageMembers),
}

/// The identity name of a keyed construct, read at allocation time.
///
/// A basic may be spelled as a bare string (`"int"`).
pub(crate) fn identity_name<N: Node>(kind: Kind, node: &N) -> Result<Option<String>, LoadError> {
    if !kind.is_keyed() {
        return Ok(None);
    }
    if kind == Kind::Basic {
        if let Some(name) = node.as_str() {
            return Ok(Some(name.to_owned()));
        }
    }
    Ok(Some(node.read_string("name")?))
}

impl Construct {
    /// Build the construct of `kind` described by `node`.
    pub(crate) fn initialize<N: Node>(
        registry: &Registry,
        kind: Kind,
        node: &N,
        scope: &Scope,
    ) -> Result<Construct, LoadError> {
        let construct = match (kind, scope) {
            (Kind::Basic, Scope::Global) => Construct::Basic(Basic {
                name: identity_name(kind, node)?.unwrap_or_default(),
            }),
            (Kind::InterfaceDesc, Scope::Global) => {
                Construct::InterfaceDesc(InterfaceDesc::initialize(registry, node)?)
            }
            (Kind::Named, Scope::Global) => Construct::Named(Named {
                name: node.read_string("name")?,
                ty: registry.read_index(node, "type")?,
            }),
            (Kind::Signature, Scope::Global) => {
                Construct::Signature(Signature::initialize(registry, node)?)
            }
            (Kind::Solid, Scope::Global) => Construct::Solid(Solid {
                target: registry.read_index(node, "target")?,
                type_args: registry.read_index_list(node, "typeArgs")?,
            }),
            (Kind::StructDesc, Scope::Global) => {
                Construct::StructDesc(StructDesc::initialize(registry, node)?)
            }
            (Kind::Union, Scope::Global) => Construct::Union(Union {
                exact: registry.try_read_index_list(node, "exact")?,
                approx: registry.try_read_index_list(node, "approx")?,
            }),
            (Kind::InterfaceDecl, &Scope::Member(package)) => {
                Construct::InterfaceDecl(InterfaceDecl {
                    header: DeclHeader::initialize(registry, node, package)?,
                    interface: registry.read_index::<InterfaceDescId, _>(node, "interface")?,
                    instances: Vec::new(),
                })
            }
            (Kind::InterfaceInst, Scope::Member(_)) => Construct::InterfaceInst(InterfaceInst {
                decl: registry.read_index(node, "decl")?,
                instance_types: registry.read_index_list(node, "instanceTypes")?,
                resolved: registry.read_index(node, "resolved")?,
            }),
            (Kind::ObjectDecl, &Scope::Member(package)) => Construct::ObjectDecl(ObjectDecl {
                header: DeclHeader::initialize(registry, node, package)?,
                data: registry.read_index::<StructDescId, _>(node, "data")?,
                methods: registry.try_read_key_list(node, "methods")?,
                instances: Vec::new(),
            }),
            (Kind::ObjectInst, Scope::Member(_)) => Construct::ObjectInst(ObjectInst {
                decl: registry.read_index(node, "decl")?,
                instance_types: registry.read_index_list(node, "instanceTypes")?,
                resolved: registry.read_index(node, "resolved")?,
                methods: registry.try_read_index_list(node, "methods")?,
            }),
            (Kind::MethodDecl, &Scope::Member(package)) => Construct::MethodDecl(MethodDecl {
                header: DeclHeader::initialize(registry, node, package)?,
                signature: registry.read_index::<SignatureId, _>(node, "signature")?,
                receiver: registry.try_read_index(node, "receiver")?,
                instances: Vec::new(),
            }),
            (Kind::MethodInst, Scope::Member(_)) => Construct::MethodInst(MethodInst {
                decl: registry.read_key(node, "decl")?,
                instance_types: registry.read_index_list(node, "instanceTypes")?,
                resolved: registry.read_index(node, "resolved")?,
                receiver: registry.try_read_index(node, "receiver")?,
            }),
            (Kind::Value, &Scope::Member(package)) => Construct::Value(Value {
                name: node.read_string("name")?,
                location: node.try_read_string("loc"),
                package,
                ty: registry.try_read_index::<TypeRef, _>(node, "type")?,
                is_const: node.try_read_bool("isConst"),
            }),
            (Kind::Package, Scope::Package(members)) => Construct::Package(Package {
                name: node.read_string("name")?,
                path: node.try_read_string("path"),
                imports: registry.try_read_index_list(node, "imports")?,
                interface_decls: members.interface_decls.clone(),
                interface_insts: members.interface_insts.clone(),
                object_decls: members.object_decls.clone(),
                object_insts: members.object_insts.clone(),
                method_decls: members.method_decls.clone(),
                method_insts: members.method_insts.clone(),
                values: members.values.clone(),
            }),
            (kind, _) => return Err(LoadErrorKind::Misplaced { kind }.into()),
        };
        Ok(construct)
    }
}

impl DeclHeader {
    fn initialize<N: Node>(
        registry: &Registry,
        node: &N,
        package: PackageId,
    ) -> Result<Self, LoadError> {
        Ok(DeclHeader {
            name: node.read_string("name")?,
            location: node.try_read_string("loc"),
            package,
            type_params: registry.try_read_index_list::<NamedId, _>(node, "typeParams")?,
        })
    }
}

impl InterfaceDesc {
    /// The legacy `methods` map is read first; an `abstracts` entry with the
    /// same name replaces it.
    fn initialize<N: Node>(registry: &Registry, node: &N) -> Result<Self, LoadError> {
        let mut abstracts = BTreeMap::new();

        for (name, value) in node.read_object_or_empty("methods")? {
            let signature = value
                .int_value()
                .map_err(LoadError::from)
                .and_then(|index| registry.get_by_index::<SignatureId>(index))
                .at_field(name)
                .at_field("methods")?;
            abstracts.insert(name.to_owned(), signature);
        }

        for (i, item) in node.read_array_or_empty("abstracts")?.iter().enumerate() {
            let (name, signature) = read_abstract(registry, item)
                .at_index(i)
                .at_field("abstracts")?;
            abstracts.insert(name, signature);
        }

        Ok(InterfaceDesc {
            abstracts,
            exact: registry.try_read_index_list(node, "exact")?,
            approx: registry.try_read_index_list(node, "approx")?,
            inherits: registry.try_read_index_list(node, "inherits")?,
        })
    }
}

impl Signature {
    fn initialize<N: Node>(registry: &Registry, node: &N) -> Result<Self, LoadError> {
        Ok(Signature {
            type_params: registry.try_read_index_list(node, "typeParams")?,
            params: read_arguments(registry, node, "params")?,
            results: read_arguments(registry, node, "results")?,
            variadic: node.try_read_bool("variadic"),
        })
    }
}

impl StructDesc {
    fn initialize<N: Node>(registry: &Registry, node: &N) -> Result<Self, LoadError> {
        let fields = node
            .read_array_or_empty("fields")?
            .iter()
            .enumerate()
            .map(|(i, item)| read_field(registry, item).at_index(i))
            .collect::<Result<Vec<_>, _>>()
            .at_field("fields")?;
        Ok(StructDesc { fields })
    }
}

fn read_abstract<N: Node>(
    registry: &Registry,
    node: &N,
) -> Result<(String, SignatureId), LoadError> {
    let name = node.read_string("name")?;
    let signature = registry.read_index(node, "signature")?;
    Ok((name, signature))
}

fn read_field<N: Node>(registry: &Registry, node: &N) -> Result<Field, LoadError> {
    Ok(Field {
        name: node.read_string("name")?,
        ty: registry.read_index(node, "type")?,
        embedded: node.try_read_bool("embedded"),
    })
}

/// An optional list of `{name?, type}` entries.
fn read_arguments<N: Node>(
    registry: &Registry,
    node: &N,
    field: &str,
) -> Result<Vec<Argument>, LoadError> {
    node.read_array_or_empty(field)?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            registry
                .read_index(item, "type")
                .map(|ty| Argument {
                    name: item.try_read_string("name"),
                    ty,
                })
                .at_index(i)
        })
        .collect::<Result<Vec<_>, _>>()
        .at_field(field)
}
