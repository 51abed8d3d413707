//! Construct identity, kinds, and serialized index tables.
//!
//! Every construct of a project lives in one arena and is addressed by a
//! [`ConstructId`], assigned once at allocation time. Serialized documents
//! never use arena positions directly: they use 1-based indices into one of
//! the [`Table`]s, which the registry composes in a fixed order.

use std::fmt;

/// Position of a construct in the project arena.
///
/// Ids are dense and 0-based, follow document order, and are never reused.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ConstructId(u32);

impl ConstructId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The arena slot for this id.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ConstructId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstructId({})", self.0)
    }
}

impl fmt::Display for ConstructId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// Compile-time size assertion: ids stay 4 bytes.
const _: () = assert!(std::mem::size_of::<ConstructId>() == 4);

/// The closed set of construct kinds.
///
/// The kind of a construct is known from the moment it is allocated, before
/// any of its data has been read.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Kind {
    // === Type descriptors ===
    Basic,
    InterfaceDesc,
    Named,
    Signature,
    Solid,
    StructDesc,
    Union,

    // === Package-owned types ===
    InterfaceDecl,
    InterfaceInst,
    ObjectDecl,
    ObjectInst,

    // === Package-owned declarations ===
    MethodDecl,
    MethodInst,
    Value,

    Package,
}

impl Kind {
    pub const ALL: [Kind; 15] = [
        Kind::Basic,
        Kind::InterfaceDesc,
        Kind::Named,
        Kind::Signature,
        Kind::Solid,
        Kind::StructDesc,
        Kind::Union,
        Kind::InterfaceDecl,
        Kind::InterfaceInst,
        Kind::ObjectDecl,
        Kind::ObjectInst,
        Kind::MethodDecl,
        Kind::MethodInst,
        Kind::Value,
        Kind::Package,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Kind::Basic => "basic",
            Kind::InterfaceDesc => "interfaceDesc",
            Kind::Named => "named",
            Kind::Signature => "signature",
            Kind::Solid => "solid",
            Kind::StructDesc => "structDesc",
            Kind::Union => "union",
            Kind::InterfaceDecl => "interfaceDecl",
            Kind::InterfaceInst => "interfaceInst",
            Kind::ObjectDecl => "objectDecl",
            Kind::ObjectInst => "objectInst",
            Kind::MethodDecl => "methodDecl",
            Kind::MethodInst => "methodInst",
            Kind::Value => "value",
            Kind::Package => "package",
        }
    }

    /// The serialized table constructs of this kind are indexed by.
    pub const fn table(self) -> Table {
        match self {
            Kind::Basic
            | Kind::InterfaceDesc
            | Kind::Named
            | Kind::Signature
            | Kind::Solid
            | Kind::StructDesc
            | Kind::Union
            | Kind::InterfaceDecl
            | Kind::InterfaceInst
            | Kind::ObjectDecl
            | Kind::ObjectInst => Table::Types,
            Kind::MethodDecl => Table::Methods,
            Kind::MethodInst => Table::MethodInsts,
            Kind::Value => Table::Values,
            Kind::Package => Table::Packages,
        }
    }

    /// Whether constructs of this kind carry a name as part of their identity.
    ///
    /// Keyed constructs can be resolved by `name` + ordinal keys.
    pub const fn is_keyed(self) -> bool {
        matches!(
            self,
            Kind::Basic
                | Kind::Named
                | Kind::InterfaceDecl
                | Kind::ObjectDecl
                | Kind::MethodDecl
                | Kind::Value
                | Kind::Package
        )
    }

    #[inline]
    pub const fn is_type(self) -> bool {
        matches!(self.table(), Table::Types)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A serialized index space.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Types,
    Packages,
    Methods,
    MethodInsts,
    Values,
}

impl Table {
    pub const COUNT: usize = 5;

    pub const ALL: [Table; Self::COUNT] = [
        Table::Types,
        Table::Packages,
        Table::Methods,
        Table::MethodInsts,
        Table::Values,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Table::Types => "types",
            Table::Packages => "packages",
            Table::Methods => "methods",
            Table::MethodInsts => "methodInsts",
            Table::Values => "values",
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        match self {
            Table::Types => 0,
            Table::Packages => 1,
            Table::Methods => 2,
            Table::MethodInsts => 3,
            Table::Values => 4,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The composed index tables of a project, each a list of arena ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Tables([Vec<ConstructId>; Table::COUNT]);

impl Tables {
    #[inline]
    pub(crate) fn get(&self, table: Table) -> &[ConstructId] {
        &self.0[table.slot()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, table: Table) -> &mut Vec<ConstructId> {
        &mut self.0[table.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_maps_to_its_table() {
        for kind in Kind::ALL {
            let table = kind.table();
            assert_eq!(kind.is_type(), table == Table::Types, "{kind}");
        }
        assert_eq!(Kind::MethodDecl.table(), Table::Methods);
        assert_eq!(Kind::MethodInst.table(), Table::MethodInsts);
        assert_eq!(Kind::Package.table(), Table::Packages);
    }

    #[test]
    fn table_slots_are_distinct() {
        let mut seen = [false; Table::COUNT];
        for table in Table::ALL {
            assert!(!seen[table.slot()], "{table} reuses a slot");
            seen[table.slot()] = true;
        }
    }

    #[test]
    fn id_display() {
        let id = ConstructId::from_raw(7);
        assert_eq!(id.to_string(), "#7");
        assert_eq!(format!("{id:?}"), "ConstructId(7)");
        assert_eq!(id.index(), 7);
    }
}
