//! Two-phase project loading.
//!
//! Pass 1 walks the document and allocates one shell per entry, in document
//! order, recording the table each entry is indexed by. Pass 2 initializes
//! every shell from the same nodes. Because every reference target exists
//! after pass 1, the order of pass 2 does not affect the result.
//!
//! After pass 2 the link step appends each Inst to its Decl's instance list.

use tdm_node::{Node, NodeExt};

use crate::construct::{identity_name, PackageMembers, Scope};
use crate::error::{LoadError, PathSegment};
use crate::handle::{
    sealed::Sealed, Handle, InterfaceInstId, MethodInstId, ObjectInstId, PackageId,
};
use crate::id::Tables;
use crate::registry::{Registry, RegistryBuilder};
use crate::{Construct, ConstructId, Kind, Table};

/// Top-level type lists, in allocation and `types` table order.
const TYPE_LISTS: [(&str, Kind); 7] = [
    ("basics", Kind::Basic),
    ("interfaceDescs", Kind::InterfaceDesc),
    ("named", Kind::Named),
    ("signatures", Kind::Signature),
    ("solids", Kind::Solid),
    ("structDescs", Kind::StructDesc),
    ("unions", Kind::Union),
];

/// Per-package member lists, in allocation order.
const MEMBER_LISTS: [(&str, Kind); 7] = [
    ("interfaceDecls", Kind::InterfaceDecl),
    ("interfaceInsts", Kind::InterfaceInst),
    ("objectDecls", Kind::ObjectDecl),
    ("objectInsts", Kind::ObjectInst),
    ("methodDecls", Kind::MethodDecl),
    ("methodInsts", Kind::MethodInst),
    ("values", Kind::Value),
];

/// A fully loaded and linked arena.
#[derive(Debug)]
pub(crate) struct Loaded {
    pub language: String,
    pub constructs: Vec<Construct>,
    pub tables: Tables,
}

/// One allocated shell waiting for pass 2.
struct Pending<'d, N> {
    id: ConstructId,
    kind: Kind,
    node: &'d N,
    /// Root-first path of the entry, for error context.
    path: Vec<PathSegment>,
    scope: Scope,
}

/// Load a document, initializing in document order.
pub(crate) fn load<N: Node>(doc: &N) -> Result<Loaded, LoadError> {
    load_with_order(doc, |_| {})
}

/// Load a document, letting `reorder` permute the pass-2 order.
///
/// `reorder` receives positions into the allocation order.
pub(crate) fn load_with_order<N: Node>(
    doc: &N,
    reorder: impl FnOnce(&mut [usize]),
) -> Result<Loaded, LoadError> {
    doc.as_object_entries()?;
    let language = doc.try_read_string("language");

    let Allocator {
        builder,
        tables,
        pending,
    } = Allocator::run(doc)?;
    tracing::debug!(constructs = builder.len(), "allocation complete");

    let mut registry = builder.compose(tables);
    for table in Table::ALL {
        tracing::trace!(%table, count = registry.count(table), "table composed");
    }

    let mut order: Vec<usize> = (0..pending.len()).collect();
    reorder(&mut order);
    for position in order {
        let entry = &pending[position];
        Construct::initialize(&registry, entry.kind, entry.node, &entry.scope)
            .and_then(|construct| registry.fill(entry.id, construct))
            .map_err(|err| err.within(&entry.path))?;
        tracing::trace!(id = %entry.id, kind = %entry.kind, "initialized");
    }
    tracing::debug!("initialization complete");

    link(&mut registry)?;
    tracing::debug!("link complete");

    let (constructs, tables) = registry.finish()?;
    Ok(Loaded {
        language,
        constructs,
        tables,
    })
}

/// Pass 1 state.
struct Allocator<'d, N> {
    builder: RegistryBuilder,
    tables: Tables,
    pending: Vec<Pending<'d, N>>,
}

impl<'d, N: Node> Allocator<'d, N> {
    fn run(doc: &'d N) -> Result<Self, LoadError> {
        let mut this = Allocator {
            builder: RegistryBuilder::new(),
            tables: Tables::default(),
            pending: Vec::new(),
        };

        for (field, kind) in TYPE_LISTS {
            this.allocate_list(doc, field, kind, &[], &Scope::Global)?;
        }

        for (p, node) in doc.read_array_or_empty("packages")?.iter().enumerate() {
            let path = vec![PathSegment::Field("packages".to_owned()), PathSegment::Index(p)];
            let package_slot = this.pending.len();
            // The package scope is completed once its members are allocated.
            let package =
                PackageId::from_id(this.allocate_one(node, Kind::Package, &path, Scope::Global)?);

            let member = Scope::Member(package);
            let mut members = PackageMembers::default();
            for (field, kind) in MEMBER_LISTS {
                let ids = this.allocate_list(node, field, kind, &path, &member)?;
                match kind {
                    Kind::InterfaceDecl => members.interface_decls = handles(&ids),
                    Kind::InterfaceInst => members.interface_insts = handles(&ids),
                    Kind::ObjectDecl => members.object_decls = handles(&ids),
                    Kind::ObjectInst => members.object_insts = handles(&ids),
                    Kind::MethodDecl => members.method_decls = handles(&ids),
                    Kind::MethodInst => members.method_insts = handles(&ids),
                    _ => members.values = handles(&ids),
                }
            }
            this.pending[package_slot].scope = Scope::Package(members);
        }

        Ok(this)
    }

    /// Allocate one shell per entry of an optional list field.
    fn allocate_list(
        &mut self,
        parent: &'d N,
        field: &str,
        kind: Kind,
        outer: &[PathSegment],
        scope: &Scope,
    ) -> Result<Vec<ConstructId>, LoadError> {
        let items = parent
            .read_array_or_empty(field)
            .map_err(|err| LoadError::from(err).within(outer))?;
        let mut ids = Vec::with_capacity(items.len());
        for (i, node) in items.iter().enumerate() {
            let mut path = outer.to_vec();
            path.push(PathSegment::Field(field.to_owned()));
            path.push(PathSegment::Index(i));
            ids.push(self.allocate_one(node, kind, &path, scope.clone())?);
        }
        Ok(ids)
    }

    fn allocate_one(
        &mut self,
        node: &'d N,
        kind: Kind,
        path: &[PathSegment],
        scope: Scope,
    ) -> Result<ConstructId, LoadError> {
        let name = identity_name(kind, node).map_err(|err| err.within(path))?;
        let id = self.builder.allocate(kind, name);
        self.tables.get_mut(kind.table()).push(id);
        self.pending.push(Pending {
            id,
            kind,
            node,
            path: path.to_vec(),
            scope,
        });
        Ok(id)
    }
}

fn handles<H: Handle>(ids: &[ConstructId]) -> Vec<H> {
    ids.iter().copied().map(H::from_id).collect()
}

/// Append every Inst to its Decl's instance list, in inst-table order.
fn link(registry: &mut Registry) -> Result<(), LoadError> {
    let types = registry.table(Table::Types).to_vec();
    for id in types {
        match registry.kind(id) {
            Kind::InterfaceInst => {
                let inst = InterfaceInstId::from_id(id);
                let decl = registry.data(inst)?.decl;
                registry.data_mut(decl)?.instances.push(inst);
            }
            Kind::ObjectInst => {
                let inst = ObjectInstId::from_id(id);
                let decl = registry.data(inst)?.decl;
                registry.data_mut(decl)?.instances.push(inst);
            }
            _ => {}
        }
    }

    let method_insts = registry.table(Table::MethodInsts).to_vec();
    for id in method_insts {
        let inst = MethodInstId::from_id(id);
        let decl = registry.data(inst)?.decl;
        registry.data_mut(decl)?.instances.push(inst);
    }
    Ok(())
}
