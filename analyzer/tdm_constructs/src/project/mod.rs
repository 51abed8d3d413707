//! The loaded project: aggregate root over the construct arena.
//!
//! A [`Project`] only exists fully loaded. Every construct in it is
//! initialized and linked, so its accessors cannot observe a shell.
//!
//! Ids are only meaningful for the project that produced them. Accessors
//! taking a [`ConstructId`] panic on an id outside the arena; use
//! [`Project::try_construct`] to check an id of unknown origin.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use tdm_node::{parse_json, Node};

use crate::construct::{Package, SubConstructs};
use crate::error::LoadError;
use crate::handle::{sealed::Sealed, Handle, PackageId, SolidId, TypeRef, Typed};
use crate::id::Tables;
use crate::journal::{self, CyclePolicy, Mode, StubError, StubOptions};
use crate::load;
use crate::{Construct, ConstructId, Kind, Table};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Project {
    language: String,
    constructs: Vec<Construct>,
    tables: Tables,
}

/// Construct counts of a project.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ProjectStats {
    pub language: String,
    pub constructs: usize,
    pub kinds: BTreeMap<Kind, usize>,
    pub tables: BTreeMap<&'static str, usize>,
}

impl Project {
    /// Load a project from a parsed document.
    ///
    /// This is the only way to obtain a `Project`: either the whole graph
    /// loads, or the first failure is returned.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn from_document<N: Node>(doc: &N) -> Result<Self, LoadError> {
        let load::Loaded {
            language,
            constructs,
            tables,
        } = load::load(doc)?;
        let project = Project {
            language,
            constructs,
            tables,
        };
        tracing::debug!(
            constructs = project.len(),
            packages = project.table(Table::Packages).len(),
            "project loaded"
        );
        Ok(project)
    }

    /// Parse JSON text and load it.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let doc = parse_json(text)?;
        Self::from_document(&doc)
    }

    /// The source language recorded in the document, or empty.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn len(&self) -> usize {
        self.constructs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructs.is_empty()
    }

    // === Lookup ===

    /// The construct behind an id of this project.
    ///
    /// # Panics
    ///
    /// Panics if `id` is outside this project's arena.
    #[inline]
    pub fn construct(&self, id: ConstructId) -> &Construct {
        &self.constructs[id.index()]
    }

    /// The construct behind `id`, or `None` if the arena has no such slot.
    #[inline]
    pub fn try_construct(&self, id: ConstructId) -> Option<&Construct> {
        self.constructs.get(id.index())
    }

    #[inline]
    pub fn kind(&self, id: ConstructId) -> Kind {
        self.construct(id).kind()
    }

    /// Typed access through a handle.
    pub fn get<H: Typed>(&self, handle: H) -> Option<&H::Data> {
        H::data(self.construct(handle.id()))
    }

    /// Every construct with its id, in arena order.
    pub fn constructs(&self) -> impl Iterator<Item = (ConstructId, &Construct)> {
        self.constructs
            .iter()
            .enumerate()
            .map(|(i, construct)| (arena_id(i), construct))
    }

    /// The ids of a serialized table, in index order.
    pub fn table(&self, table: Table) -> &[ConstructId] {
        self.tables.get(table)
    }

    /// Resolve a 1-based serialized index in `H`'s table.
    pub fn lookup<H: Handle>(&self, index: i64) -> Option<H> {
        let table = self.tables.get(H::TABLE);
        let position = usize::try_from(index).ok()?.checked_sub(1)?;
        let id = *table.get(position)?;
        H::accepts(self.kind(id)).then(|| H::from_id(id))
    }

    pub fn packages(&self) -> impl Iterator<Item = (PackageId, &Package)> {
        self.table(Table::Packages).iter().filter_map(|&id| {
            let handle = PackageId::from_id(id);
            self.get(handle).map(|package| (handle, package))
        })
    }

    /// The first package with the given name.
    pub fn find_package(&self, name: &str) -> Option<PackageId> {
        self.packages()
            .find(|(_, package)| package.name == name)
            .map(|(id, _)| id)
    }

    // === Graph queries ===

    pub fn sub_constructs(&self, id: ConstructId) -> SubConstructs {
        self.construct(id).sub_constructs()
    }

    /// Every construct reachable from `root` over sub-construct edges,
    /// `root` included, in depth-first preorder. Cycles are visited once.
    ///
    /// # Panics
    ///
    /// Panics if `root` is outside this project's arena.
    pub fn reachable(&self, root: impl Into<ConstructId>) -> Vec<ConstructId> {
        let mut visited = FxHashSet::default();
        let mut order = Vec::new();
        let mut stack = vec![root.into()];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            order.push(id);
            stack.extend(self.sub_constructs(id).into_iter().rev());
        }
        order
    }

    /// Whether no type parameter is reachable from `root`.
    pub fn is_concrete(&self, root: impl Into<ConstructId>) -> bool {
        self.reachable(root)
            .into_iter()
            .all(|id| self.kind(id) != Kind::Named)
    }

    /// The instances linked to a declaration, in instance table order.
    /// Empty for anything that is not a declaration.
    pub fn instances_of(&self, decl: impl Into<ConstructId>) -> Vec<ConstructId> {
        fn ids<H: Handle>(handles: &[H]) -> Vec<ConstructId> {
            handles.iter().map(|&h| h.id()).collect()
        }

        match self.construct(decl.into()) {
            Construct::InterfaceDecl(d) => ids(&d.instances),
            Construct::ObjectDecl(d) => ids(&d.instances),
            Construct::MethodDecl(d) => ids(&d.instances),
            _ => Vec::new(),
        }
    }

    /// The Inst a solid type expression spells out: an instance of the
    /// solid's target declaration with identical instance types.
    pub fn instance_of_solid(&self, solid: SolidId) -> Option<TypeRef> {
        let solid = self.get(solid)?;
        match self.construct(solid.target.id()) {
            Construct::ObjectDecl(decl) => decl
                .instances
                .iter()
                .copied()
                .find(|&inst| {
                    self.get(inst)
                        .is_some_and(|data| data.instance_types == solid.type_args)
                })
                .map(TypeRef::from),
            Construct::InterfaceDecl(decl) => decl
                .instances
                .iter()
                .copied()
                .find(|&inst| {
                    self.get(inst)
                        .is_some_and(|data| data.instance_types == solid.type_args)
                })
                .map(TypeRef::from),
            _ => None,
        }
    }

    pub fn stats(&self) -> ProjectStats {
        let mut kinds = BTreeMap::new();
        for construct in &self.constructs {
            *kinds.entry(construct.kind()).or_insert(0) += 1;
        }
        let tables = Table::ALL
            .into_iter()
            .map(|table| (table.name(), self.table(table).len()))
            .collect();
        ProjectStats {
            language: self.language.clone(),
            constructs: self.len(),
            kinds,
            tables,
        }
    }

    // === Stubs ===

    /// The long stub of a construct; cycles are errors.
    ///
    /// # Panics
    ///
    /// Panics if `construct` is outside this project's arena.
    pub fn to_stub(&self, construct: impl Into<ConstructId>) -> Result<String, StubError> {
        self.to_stub_with(construct, StubOptions::default())
    }

    pub fn to_stub_long(&self, construct: impl Into<ConstructId>) -> Result<String, StubError> {
        self.to_stub_with(construct, StubOptions::default().with_mode(Mode::Long))
    }

    pub fn to_stub_short(&self, construct: impl Into<ConstructId>) -> Result<String, StubError> {
        self.to_stub_with(construct, StubOptions::default().with_mode(Mode::Short))
    }

    /// The long stub with every cycle replaced by a recursion marker.
    pub fn to_stub_marked(&self, construct: impl Into<ConstructId>) -> Result<String, StubError> {
        self.to_stub_with(
            construct,
            StubOptions::default().with_cycle_policy(CyclePolicy::Mark),
        )
    }

    pub fn to_stub_with(
        &self,
        construct: impl Into<ConstructId>,
        options: StubOptions,
    ) -> Result<String, StubError> {
        journal::render(self, construct.into(), options)
    }

    /// Every package's long stub, each newline-terminated.
    pub fn stub(&self) -> Result<String, StubError> {
        self.stub_with(StubOptions::default())
    }

    pub fn stub_with(&self, options: StubOptions) -> Result<String, StubError> {
        let mut out = String::new();
        for &package in self.table(Table::Packages) {
            out.push_str(&self.to_stub_with(package, options)?);
            out.push('\n');
        }
        Ok(out)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn arena_id(index: usize) -> ConstructId {
    ConstructId::from_raw(index as u32)
}
