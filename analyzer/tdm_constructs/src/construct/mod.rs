//! The construct model.
//!
//! A [`Construct`] is one node of the project graph. Every cross-construct
//! relationship is a typed handle into the project arena, never an owning
//! reference, so self-referential and mutually recursive types need no
//! special treatment.
//!
//! # Generics
//!
//! Generics are modelled by a Decl / Inst / Resolved triad:
//! - a Decl ([`ObjectDecl`], [`InterfaceDecl`], [`MethodDecl`]) is the
//!   generic definition with its type parameters;
//! - an Inst ([`ObjectInst`], [`InterfaceInst`], [`MethodInst`]) is one
//!   instantiation, pointing back to its Decl;
//! - the Resolved description ([`StructDesc`], [`InterfaceDesc`],
//!   [`Signature`]) is the shape after substitution, supplied by the input.
//!
//! A [`Solid`] is the type-expression spelling of an instantiation and is
//! matched to its Inst by the project (see `Project::instance_of_solid`).

mod init;

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::handle::{
    InterfaceDeclId, InterfaceDescId, InterfaceInstId, MethodDeclId, MethodInstId, NamedId,
    ObjectDeclId, ObjectInstId, PackageId, SignatureId, StructDescId, TypeRef, ValueId,
};
use crate::{ConstructId, Handle, Kind};

pub(crate) use init::{identity_name, PackageMembers, Scope};

/// Direct references of one construct, as used by reachability analysis.
pub type SubConstructs = SmallVec<[ConstructId; 4]>;

/// A primitive or otherwise opaque named leaf type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Basic {
    pub name: String,
}

/// A name bound to another type.
///
/// This is the type-parameter construct: `T any` binds `T` to its
/// constraint. A type is concrete when no `Named` is reachable from it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Named {
    pub name: String,
    pub ty: TypeRef,
}

/// One parameter or result of a [`Signature`]. The name may be empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Argument {
    pub name: String,
    pub ty: TypeRef,
}

/// A callable shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Binding context for the parameters and results, not content.
    pub type_params: Vec<NamedId>,
    pub params: Vec<Argument>,
    pub results: Vec<Argument>,
    /// The last parameter takes any number of arguments.
    pub variadic: bool,
}

/// A concrete instantiation of a generic target.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Solid {
    pub target: TypeRef,
    pub type_args: Vec<TypeRef>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
    pub embedded: bool,
}

/// An anonymous field list, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructDesc {
    pub fields: Vec<Field>,
}

/// A set of alternative types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Union {
    pub exact: Vec<TypeRef>,
    /// Approximate members, matched by underlying type (`~T`).
    pub approx: Vec<TypeRef>,
}

/// A capability contract.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InterfaceDesc {
    /// Abstract methods by name; a later entry with the same name replaces
    /// an earlier one.
    pub abstracts: BTreeMap<String, SignatureId>,
    pub exact: Vec<TypeRef>,
    pub approx: Vec<TypeRef>,
    pub inherits: Vec<TypeRef>,
}

impl InterfaceDesc {
    /// No methods, no type sets, nothing inherited: the `any` contract.
    pub fn is_empty(&self) -> bool {
        self.abstracts.is_empty()
            && self.exact.is_empty()
            && self.approx.is_empty()
            && self.inherits.is_empty()
    }
}

/// Identity shared by every declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclHeader {
    pub name: String,
    /// Free-form source location, e.g. `list/list.go:12`.
    pub location: String,
    pub package: PackageId,
    pub type_params: Vec<NamedId>,
}

impl DeclHeader {
    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InterfaceDecl {
    pub header: DeclHeader,
    pub interface: InterfaceDescId,
    /// Filled by the link step, in instance table order.
    pub instances: Vec<InterfaceInstId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InterfaceInst {
    pub decl: InterfaceDeclId,
    pub instance_types: Vec<TypeRef>,
    pub resolved: InterfaceDescId,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectDecl {
    pub header: DeclHeader,
    pub data: StructDescId,
    pub methods: Vec<MethodDeclId>,
    /// Filled by the link step, in instance table order.
    pub instances: Vec<ObjectInstId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectInst {
    pub decl: ObjectDeclId,
    pub instance_types: Vec<TypeRef>,
    pub resolved: StructDescId,
    pub methods: Vec<MethodInstId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodDecl {
    pub header: DeclHeader,
    pub signature: SignatureId,
    pub receiver: Option<ObjectDeclId>,
    /// Filled by the link step, in instance table order.
    pub instances: Vec<MethodInstId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodInst {
    pub decl: MethodDeclId,
    pub instance_types: Vec<TypeRef>,
    pub resolved: SignatureId,
    pub receiver: Option<ObjectInstId>,
}

/// A package-level constant or variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Value {
    pub name: String,
    pub location: String,
    pub package: PackageId,
    /// `None` for untyped values.
    pub ty: Option<TypeRef>,
    pub is_const: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Package {
    pub name: String,
    pub path: String,
    pub imports: Vec<PackageId>,
    pub interface_decls: Vec<InterfaceDeclId>,
    pub interface_insts: Vec<InterfaceInstId>,
    pub object_decls: Vec<ObjectDeclId>,
    pub object_insts: Vec<ObjectInstId>,
    pub method_decls: Vec<MethodDeclId>,
    pub method_insts: Vec<MethodInstId>,
    pub values: Vec<ValueId>,
}

/// One initialized node of the project graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Construct {
    Basic(Basic),
    InterfaceDesc(InterfaceDesc),
    Named(Named),
    Signature(Signature),
    Solid(Solid),
    StructDesc(StructDesc),
    Union(Union),
    InterfaceDecl(InterfaceDecl),
    InterfaceInst(InterfaceInst),
    ObjectDecl(ObjectDecl),
    ObjectInst(ObjectInst),
    MethodDecl(MethodDecl),
    MethodInst(MethodInst),
    Value(Value),
    Package(Package),
}

impl Construct {
    pub fn kind(&self) -> Kind {
        match self {
            Construct::Basic(_) => Kind::Basic,
            Construct::InterfaceDesc(_) => Kind::InterfaceDesc,
            Construct::Named(_) => Kind::Named,
            Construct::Signature(_) => Kind::Signature,
            Construct::Solid(_) => Kind::Solid,
            Construct::StructDesc(_) => Kind::StructDesc,
            Construct::Union(_) => Kind::Union,
            Construct::InterfaceDecl(_) => Kind::InterfaceDecl,
            Construct::InterfaceInst(_) => Kind::InterfaceInst,
            Construct::ObjectDecl(_) => Kind::ObjectDecl,
            Construct::ObjectInst(_) => Kind::ObjectInst,
            Construct::MethodDecl(_) => Kind::MethodDecl,
            Construct::MethodInst(_) => Kind::MethodInst,
            Construct::Value(_) => Kind::Value,
            Construct::Package(_) => Kind::Package,
        }
    }

    /// The construct's own name, for kinds that have one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Construct::Basic(b) => Some(&b.name),
            Construct::Named(n) => Some(&n.name),
            Construct::InterfaceDecl(d) => Some(&d.header.name),
            Construct::ObjectDecl(d) => Some(&d.header.name),
            Construct::MethodDecl(d) => Some(&d.header.name),
            Construct::Value(v) => Some(&v.name),
            Construct::Package(p) => Some(&p.name),
            Construct::InterfaceDesc(_)
            | Construct::Signature(_)
            | Construct::Solid(_)
            | Construct::StructDesc(_)
            | Construct::Union(_)
            | Construct::InterfaceInst(_)
            | Construct::ObjectInst(_)
            | Construct::MethodInst(_) => None,
        }
    }

    /// The declaration header, for Decl kinds.
    pub fn header(&self) -> Option<&DeclHeader> {
        match self {
            Construct::InterfaceDecl(d) => Some(&d.header),
            Construct::ObjectDecl(d) => Some(&d.header),
            Construct::MethodDecl(d) => Some(&d.header),
            _ => None,
        }
    }

    /// The constructs this one directly references as content.
    ///
    /// Type parameters are binding context, not content, and are left out;
    /// so are back-references from a Decl to its instances and a method's
    /// receiver.
    pub fn sub_constructs(&self) -> SubConstructs {
        let mut out = SubConstructs::new();
        match self {
            Construct::Basic(_) => {}
            Construct::Named(n) => push(&mut out, [n.ty]),
            Construct::Signature(s) => {
                push(&mut out, s.params.iter().map(|a| a.ty));
                push(&mut out, s.results.iter().map(|a| a.ty));
            }
            Construct::Solid(s) => {
                push(&mut out, [s.target]);
                push(&mut out, s.type_args.iter().copied());
            }
            Construct::StructDesc(s) => push(&mut out, s.fields.iter().map(|f| f.ty)),
            Construct::Union(u) => {
                push(&mut out, u.exact.iter().copied());
                push(&mut out, u.approx.iter().copied());
            }
            Construct::InterfaceDesc(i) => {
                push(&mut out, i.inherits.iter().copied());
                push(&mut out, i.abstracts.values().copied());
                push(&mut out, i.exact.iter().copied());
                push(&mut out, i.approx.iter().copied());
            }
            Construct::InterfaceDecl(d) => push(&mut out, [d.interface]),
            Construct::ObjectDecl(d) => push(&mut out, [d.data]),
            Construct::MethodDecl(d) => push(&mut out, [d.signature]),
            Construct::InterfaceInst(i) => {
                push(&mut out, i.instance_types.iter().copied());
                push(&mut out, [i.resolved]);
            }
            Construct::ObjectInst(i) => {
                push(&mut out, i.instance_types.iter().copied());
                push(&mut out, [i.resolved]);
            }
            Construct::MethodInst(i) => {
                push(&mut out, i.instance_types.iter().copied());
                push(&mut out, [i.resolved]);
            }
            Construct::Value(v) => push(&mut out, v.ty),
            Construct::Package(p) => {
                push(&mut out, p.interface_decls.iter().copied());
                push(&mut out, p.interface_insts.iter().copied());
                push(&mut out, p.object_decls.iter().copied());
                push(&mut out, p.object_insts.iter().copied());
                push(&mut out, p.method_decls.iter().copied());
                push(&mut out, p.method_insts.iter().copied());
                push(&mut out, p.values.iter().copied());
            }
        }
        out
    }
}

fn push<H: Handle>(out: &mut SubConstructs, handles: impl IntoIterator<Item = H>) {
    out.extend(handles.into_iter().map(Handle::id));
}
