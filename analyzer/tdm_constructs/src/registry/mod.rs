//! Construct Registry: the flat, 1-based, kind-checked index over every
//! construct of a project.
//!
//! # Protocol
//!
//! 1. **Allocate**: [`RegistryBuilder::allocate`] creates one empty [`Shell`]
//!    per document entry, in document order. A shell knows its kind (and its
//!    name, for keyed kinds) but holds no data.
//! 2. **Compose**: [`RegistryBuilder::compose`] fixes the serialized index
//!    tables and the key index.
//! 3. **Initialize**: each shell is replaced by its initialized
//!    [`Construct`] exactly once ([`Registry::fill`]). Lookups during this
//!    phase only need kinds, so forward references resolve to shells that
//!    are not initialized yet.
//!
//! Reading a shell's data is an [`LoadErrorKind::UninitializedAccess`],
//! reported separately from data errors.

mod key;

use rustc_hash::FxHashMap;
use tdm_node::{Node, NodeExt};

use crate::error::{Context, LoadError, LoadErrorKind};
use crate::handle::{sealed::Sealed, Handle, PackageId, Typed};
use crate::id::Tables;
use crate::{Construct, ConstructId, Kind, Table};

pub use key::{parse_key, Key};

/// Identity of a construct that has been allocated but not initialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shell {
    kind: Kind,
    name: Option<String>,
}

impl Shell {
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The name a keyed construct is known by.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Either state of one arena slot.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Slot {
    Shell(Shell),
    Ready(Construct),
}

impl Slot {
    fn kind(&self) -> Kind {
        match self {
            Slot::Shell(shell) => shell.kind,
            Slot::Ready(construct) => construct.kind(),
        }
    }
}

/// Pass-1 arena: shells in allocation order.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    slots: Vec<Slot>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an empty shell; its id is final.
    #[allow(clippy::cast_possible_truncation)]
    pub fn allocate(&mut self, kind: Kind, name: Option<String>) -> ConstructId {
        let id = ConstructId::from_raw(self.slots.len() as u32);
        self.slots.push(Slot::Shell(Shell { kind, name }));
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Freeze the arena behind the given serialized tables.
    pub(crate) fn compose(self, tables: Tables) -> Registry {
        let mut keys: [FxHashMap<String, Vec<usize>>; Table::COUNT] = Default::default();
        for table in Table::ALL {
            let index = &mut keys[table.slot()];
            for (position, id) in tables.get(table).iter().enumerate() {
                if let Slot::Shell(Shell {
                    name: Some(name), ..
                }) = &self.slots[id.index()]
                {
                    index.entry(name.clone()).or_default().push(position + 1);
                }
            }
        }
        Registry {
            slots: self.slots,
            tables,
            keys,
        }
    }
}

/// The composed registry over one project's constructs.
#[derive(Debug)]
pub struct Registry {
    slots: Vec<Slot>,
    tables: Tables,
    /// Per table: name -> 1-based table positions, in table order.
    keys: [FxHashMap<String, Vec<usize>>; Table::COUNT],
}

impl Registry {
    /// Number of allocated constructs.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of entries in a serialized table.
    pub fn count(&self, table: Table) -> usize {
        self.tables.get(table).len()
    }

    /// The arena ids of a table, in index order.
    pub fn table(&self, table: Table) -> &[ConstructId] {
        self.tables.get(table)
    }

    /// Kind of any allocated construct, initialized or not.
    pub fn kind(&self, id: ConstructId) -> Kind {
        self.slots[id.index()].kind()
    }

    /// The shell of a construct that has not been initialized yet.
    pub fn shell(&self, id: ConstructId) -> Option<&Shell> {
        match &self.slots[id.index()] {
            Slot::Shell(shell) => Some(shell),
            Slot::Ready(_) => None,
        }
    }

    // === Resolution ===

    /// Resolve a 1-based serialized index in `H`'s table.
    pub fn get_by_index<H: Handle>(&self, index: i64) -> Result<H, LoadError> {
        let table = self.tables.get(H::TABLE);
        let count = table.len();
        let id = usize::try_from(index)
            .ok()
            .filter(|&i| (1..=count).contains(&i))
            .map(|i| table[i - 1])
            .ok_or(LoadErrorKind::IndexOutOfRange {
                index,
                table: H::TABLE,
                count,
            })?;

        let actual = self.kind(id);
        if H::accepts(actual) {
            Ok(H::from_id(id))
        } else {
            Err(LoadErrorKind::WrongVariant {
                index,
                table: H::TABLE,
                expected: H::EXPECTED,
                actual,
            }
            .into())
        }
    }

    pub fn get_package(&self, index: i64) -> Result<PackageId, LoadError> {
        self.get_by_index(index)
    }

    /// Resolve a `name` + ordinal key in `H`'s table.
    pub fn get_key<H: Handle>(&self, key: &str) -> Result<H, LoadError> {
        let Key { name, ordinal } = parse_key(key)?;
        let positions = self.keys[H::TABLE.slot()]
            .get(name)
            .ok_or_else(|| LoadErrorKind::UnknownKey {
                key: key.to_owned(),
                table: H::TABLE,
            })?;

        let count = positions.len();
        let position = usize::try_from(ordinal)
            .ok()
            .filter(|&o| (1..=count).contains(&o))
            .map(|o| positions[o - 1])
            .ok_or(LoadErrorKind::IndexOutOfRange {
                index: i64::try_from(ordinal).unwrap_or(i64::MAX),
                table: H::TABLE,
                count,
            })?;

        let position = i64::try_from(position).unwrap_or(i64::MAX);
        self.get_by_index(position)
    }

    // === Layered readers ===

    /// A required index field.
    pub fn read_index<H: Handle, N: Node>(&self, node: &N, field: &str) -> Result<H, LoadError> {
        let index = node.read_int(field)?;
        self.get_by_index(index).at_field(field)
    }

    /// An optional index field. An index that is present must still resolve.
    pub fn try_read_index<H: Handle, N: Node>(
        &self,
        node: &N,
        field: &str,
    ) -> Result<Option<H>, LoadError> {
        let Some(value) = node.try_field(field) else {
            return Ok(None);
        };
        let index = value.int_value().at_field(field)?;
        self.get_by_index(index).at_field(field).map(Some)
    }

    /// A required list of indices.
    pub fn read_index_list<H: Handle, N: Node>(
        &self,
        node: &N,
        field: &str,
    ) -> Result<Vec<H>, LoadError> {
        let items = node.read_array(field)?;
        self.index_list(items).at_field(field)
    }

    /// An optional list of indices; empty when absent.
    pub fn try_read_index_list<H: Handle, N: Node>(
        &self,
        node: &N,
        field: &str,
    ) -> Result<Vec<H>, LoadError> {
        let Some(value) = node.try_field(field) else {
            return Ok(Vec::new());
        };
        let items = value.as_array_items().at_field(field)?;
        self.index_list(items).at_field(field)
    }

    /// A required key field.
    pub fn read_key<H: Handle, N: Node>(&self, node: &N, field: &str) -> Result<H, LoadError> {
        let key = node.read_str(field)?;
        self.get_key(key).at_field(field)
    }

    /// An optional list of keys; empty when absent.
    pub fn try_read_key_list<H: Handle, N: Node>(
        &self,
        node: &N,
        field: &str,
    ) -> Result<Vec<H>, LoadError> {
        let Some(value) = node.try_field(field) else {
            return Ok(Vec::new());
        };
        let items = value.as_array_items().at_field(field)?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.str_value()
                    .map_err(LoadError::from)
                    .and_then(|key| self.get_key(key))
                    .at_index(i)
            })
            .collect::<Result<Vec<_>, _>>()
            .at_field(field)
    }

    fn index_list<H: Handle, N: Node>(&self, items: &[N]) -> Result<Vec<H>, LoadError> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.int_value()
                    .map_err(LoadError::from)
                    .and_then(|index| self.get_by_index(index))
                    .at_index(i)
            })
            .collect()
    }

    // === Data access ===

    /// The initialized data of a construct.
    pub fn construct(&self, id: ConstructId) -> Result<&Construct, LoadError> {
        match &self.slots[id.index()] {
            Slot::Ready(construct) => Ok(construct),
            Slot::Shell(shell) => Err(LoadErrorKind::UninitializedAccess {
                construct: id,
                kind: shell.kind,
            }
            .into()),
        }
    }

    /// Typed access to the initialized data behind a handle.
    pub fn data<H: Typed>(&self, handle: H) -> Result<&H::Data, LoadError> {
        let construct = self.construct(handle.id())?;
        H::data(construct).ok_or_else(|| mismatch::<H>(handle.id(), construct.kind()))
    }

    pub(crate) fn data_mut<H: Typed>(&mut self, handle: H) -> Result<&mut H::Data, LoadError> {
        let id = handle.id();
        match &mut self.slots[id.index()] {
            Slot::Ready(construct) => {
                let kind = construct.kind();
                H::data_mut(construct).ok_or_else(|| mismatch::<H>(id, kind))
            }
            Slot::Shell(shell) => Err(LoadErrorKind::UninitializedAccess {
                construct: id,
                kind: shell.kind,
            }
            .into()),
        }
    }

    /// Replace a shell with its initialized construct.
    pub fn fill(&mut self, id: ConstructId, construct: Construct) -> Result<(), LoadError> {
        let slot = &mut self.slots[id.index()];
        let current = slot.kind();
        if matches!(slot, Slot::Ready(_)) {
            return Err(LoadErrorKind::AlreadyInitialized {
                construct: id,
                kind: current,
            }
            .into());
        }
        if current != construct.kind() {
            return Err(LoadErrorKind::Misplaced {
                kind: construct.kind(),
            }
            .into());
        }
        *slot = Slot::Ready(construct);
        Ok(())
    }

    /// Hand over the fully initialized arena.
    ///
    /// Any shell left behind is a loader bug, reported as uninitialized access.
    pub(crate) fn finish(self) -> Result<(Vec<Construct>, Tables), LoadError> {
        let constructs = self
            .slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| match slot {
                Slot::Ready(construct) => Ok(construct),
                #[allow(clippy::cast_possible_truncation)]
                Slot::Shell(shell) => Err(LoadError::from(LoadErrorKind::UninitializedAccess {
                    construct: ConstructId::from_raw(i as u32),
                    kind: shell.kind,
                })),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((constructs, self.tables))
    }
}

fn mismatch<H: Handle>(id: ConstructId, actual: Kind) -> LoadError {
    LoadErrorKind::WrongVariant {
        index: i64::from(id.raw()),
        table: H::TABLE,
        expected: H::EXPECTED,
        actual,
    }
    .into()
}
