//! Typed handles over [`ConstructId`].
//!
//! A handle is a `ConstructId` whose kind has already been checked against
//! the kinds the handle accepts. Handles are only minted by the registry
//! after that check, so holding one is proof of its variant.

use std::fmt;
use std::hash::Hash;

use crate::construct::{
    Basic, InterfaceDecl, InterfaceDesc, InterfaceInst, MethodDecl, MethodInst, Named,
    ObjectDecl, ObjectInst, Package, Signature, Solid, StructDesc, Union, Value,
};
use crate::{Construct, ConstructId, Kind, Table};

pub(crate) mod sealed {
    use crate::ConstructId;

    pub trait Sealed {
        /// Wrap an id whose kind the caller has already checked.
        fn from_id(id: ConstructId) -> Self;
    }
}

/// A kind-checked reference to a construct.
pub trait Handle: sealed::Sealed + Copy + Eq + Hash + fmt::Debug + Into<ConstructId> {
    /// The table serialized indices for this handle point into.
    const TABLE: Table;

    /// Description of the accepted kinds, used in `WrongVariant` errors.
    const EXPECTED: &'static str;

    /// Whether a construct of `kind` may be referenced through this handle.
    fn accepts(kind: Kind) -> bool;

    fn id(self) -> ConstructId;
}

/// A handle to exactly one construct kind, with typed access to its data.
pub trait Typed: Handle {
    type Data;

    fn data(construct: &Construct) -> Option<&Self::Data>;

    fn data_mut(construct: &mut Construct) -> Option<&mut Self::Data>;
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $table:ident, $expected:literal, [$($kind:ident),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
        pub struct $name(ConstructId);

        impl sealed::Sealed for $name {
            #[inline]
            fn from_id(id: ConstructId) -> Self {
                Self(id)
            }
        }

        impl Handle for $name {
            const TABLE: Table = Table::$table;
            const EXPECTED: &'static str = $expected;

            #[inline]
            fn accepts(kind: Kind) -> bool {
                matches!(kind, $(Kind::$kind)|+)
            }

            #[inline]
            fn id(self) -> ConstructId {
                self.0
            }
        }

        impl From<$name> for ConstructId {
            #[inline]
            fn from(handle: $name) -> Self {
                handle.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $expected, self.0)
            }
        }
    };
}

/// Generates a single-kind handle together with its [`Typed`] impl.
macro_rules! define_typed_handles {
    ($( $(#[$meta:meta])* $name:ident => $table:ident, $kind:ident($data:ty), $expected:literal; )+) => {
        $(
            define_handle!($(#[$meta])* $name, $table, $expected, [$kind]);

            impl Typed for $name {
                type Data = $data;

                #[inline]
                fn data(construct: &Construct) -> Option<&Self::Data> {
                    match construct {
                        Construct::$kind(data) => Some(data),
                        _ => None,
                    }
                }

                #[inline]
                fn data_mut(construct: &mut Construct) -> Option<&mut Self::Data> {
                    match construct {
                        Construct::$kind(data) => Some(data),
                        _ => None,
                    }
                }
            }
        )+
    };
}

define_handle!(
    /// Any type descriptor: anything indexed by the `types` table.
    TypeRef,
    Types,
    "type",
    [
        Basic,
        InterfaceDesc,
        Named,
        Signature,
        Solid,
        StructDesc,
        Union,
        InterfaceDecl,
        InterfaceInst,
        ObjectDecl,
        ObjectInst,
    ]
);

define_typed_handles! {
    BasicId => Types, Basic(Basic), "basic";
    InterfaceDescId => Types, InterfaceDesc(InterfaceDesc), "interfaceDesc";
    /// A type parameter binding.
    NamedId => Types, Named(Named), "named";
    SignatureId => Types, Signature(Signature), "signature";
    SolidId => Types, Solid(Solid), "solid";
    StructDescId => Types, StructDesc(StructDesc), "structDesc";
    UnionId => Types, Union(Union), "union";
    InterfaceDeclId => Types, InterfaceDecl(InterfaceDecl), "interfaceDecl";
    InterfaceInstId => Types, InterfaceInst(InterfaceInst), "interfaceInst";
    ObjectDeclId => Types, ObjectDecl(ObjectDecl), "objectDecl";
    ObjectInstId => Types, ObjectInst(ObjectInst), "objectInst";
    MethodDeclId => Methods, MethodDecl(MethodDecl), "methodDecl";
    MethodInstId => MethodInsts, MethodInst(MethodInst), "methodInst";
    ValueId => Values, Value(Value), "value";
    PackageId => Packages, Package(Package), "package";
}

/// Widen any type handle to a [`TypeRef`].
macro_rules! impl_into_type_ref {
    ($($name:ident),+ $(,)?) => {
        $(
            impl From<$name> for TypeRef {
                #[inline]
                fn from(handle: $name) -> Self {
                    TypeRef(handle.id())
                }
            }
        )+
    };
}

impl_into_type_ref!(
    BasicId,
    InterfaceDescId,
    NamedId,
    SignatureId,
    SolidId,
    StructDescId,
    UnionId,
    InterfaceDeclId,
    InterfaceInstId,
    ObjectDeclId,
    ObjectInstId,
);

#[cfg(test)]
mod tests {
    use super::sealed::Sealed;
    use super::*;

    #[test]
    fn type_ref_accepts_only_type_kinds() {
        for kind in Kind::ALL {
            assert_eq!(TypeRef::accepts(kind), kind.is_type(), "{kind}");
        }
    }

    #[test]
    fn typed_handles_accept_their_own_kind() {
        assert!(SignatureId::accepts(Kind::Signature));
        assert!(!SignatureId::accepts(Kind::StructDesc));
        assert!(PackageId::accepts(Kind::Package));
        assert!(!MethodDeclId::accepts(Kind::MethodInst));
        assert_eq!(MethodInstId::TABLE, Table::MethodInsts);
        assert_eq!(ValueId::TABLE, Table::Values);
    }

    #[test]
    fn widening_keeps_the_id() {
        let named = NamedId::from_id(ConstructId::from_raw(3));
        let ty: TypeRef = named.into();
        assert_eq!(ty.id(), ConstructId::from_raw(3));
        assert_eq!(ty.to_string(), "type#3");
        assert_eq!(named.to_string(), "named#3");
    }
}
