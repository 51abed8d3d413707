//! Stub text of each construct kind.
//!
//! References to other constructs are written short; a declaration's or
//! instance's own body is written long.

use super::{Journal, Mode, StubError};
use crate::construct::{
    Argument, Construct, DeclHeader, InterfaceDesc, MethodDecl, MethodInst, Package, Signature,
    StructDesc, Union,
};
use crate::handle::{Handle, NamedId, SignatureId, TypeRef};
use crate::ConstructId;

type StubResult = Result<(), StubError>;

impl Journal<'_> {
    /// Dispatch on the construct kind.
    pub(super) fn stub(&mut self, id: ConstructId) -> StubResult {
        let project = self.project;
        let long = self.mode == Mode::Long;
        match project.construct(id) {
            Construct::Basic(basic) => {
                self.write(&basic.name);
                Ok(())
            }
            Construct::Named(named) => {
                self.write(&named.name);
                if long {
                    self.write(" ");
                    self.write_ref(named.ty)?;
                }
                Ok(())
            }
            Construct::Signature(sig) => self.signature(sig, "func", long),
            Construct::Solid(solid) => {
                self.write_ref(solid.target)?;
                self.type_args(&solid.type_args)
            }
            Construct::StructDesc(desc) => self.struct_desc(desc),
            Construct::Union(union) => self.union(union),
            Construct::InterfaceDesc(desc) => self.interface_desc(desc),
            Construct::InterfaceDecl(decl) if long => {
                self.decl_head("type ", &decl.header)?;
                self.write(" interface");
                self.write_body(decl.interface)
            }
            Construct::ObjectDecl(decl) if long => {
                self.decl_head("type ", &decl.header)?;
                self.write(" ");
                self.write_body(decl.data)
            }
            Construct::MethodDecl(decl) if long => self.method_decl(decl),
            Construct::InterfaceDecl(decl) => self.name(&decl.header.name),
            Construct::ObjectDecl(decl) => self.name(&decl.header.name),
            Construct::MethodDecl(decl) => self.name(&decl.header.name),
            Construct::InterfaceInst(inst) => {
                if long {
                    self.write("inst ");
                }
                self.write_ref(inst.decl)?;
                self.type_args(&inst.instance_types)?;
                if long {
                    self.write(" interface");
                    self.write_body(inst.resolved)?;
                }
                Ok(())
            }
            Construct::ObjectInst(inst) => {
                if long {
                    self.write("inst ");
                }
                self.write_ref(inst.decl)?;
                self.type_args(&inst.instance_types)?;
                if long {
                    self.write(" ");
                    self.write_body(inst.resolved)?;
                }
                Ok(())
            }
            Construct::MethodInst(inst) if long => self.method_inst(inst),
            Construct::MethodInst(inst) => {
                self.write_ref(inst.decl)?;
                self.type_args(&inst.instance_types)
            }
            Construct::Value(value) if long => {
                self.write(if value.is_const { "const " } else { "var " });
                self.write(&value.name);
                self.write(" ");
                match value.ty {
                    Some(ty) => self.write_ref(ty),
                    None => {
                        self.write("<type>");
                        Ok(())
                    }
                }
            }
            Construct::Value(value) => self.name(&value.name),
            Construct::Package(package) if long => self.package(package),
            Construct::Package(package) => self.name(&package.name),
        }
    }

    fn name(&mut self, name: &str) -> StubResult {
        self.write(name);
        Ok(())
    }

    /// A reference to another construct: always short.
    fn write_ref(&mut self, handle: impl Handle) -> StubResult {
        self.short(|journal| journal.write_construct(handle))
    }

    /// The body a declaration or instance owns: always long.
    fn write_body(&mut self, handle: impl Handle) -> StubResult {
        self.long(|journal| journal.write_construct(handle))
    }

    /// `[int, string]`, or nothing.
    fn type_args(&mut self, types: &[TypeRef]) -> StubResult {
        self.write_each("[", types, ", ", "]", |journal, &ty| journal.write_ref(ty))?;
        Ok(())
    }

    /// `[T any, U comparable]`, or nothing.
    fn type_params(&mut self, params: &[NamedId]) -> StubResult {
        self.write_each("[", params, ", ", "]", |journal, &param| {
            journal.long(|journal| journal.write_construct(param))
        })?;
        Ok(())
    }

    fn decl_head(&mut self, keyword: &str, header: &DeclHeader) -> StubResult {
        self.write(keyword);
        self.write(&header.name);
        self.type_params(&header.type_params)
    }

    /// `head[T any](a int, b ...string) (int, error)`.
    fn signature(&mut self, sig: &Signature, head: &str, with_type_params: bool) -> StubResult {
        self.write(head);
        if with_type_params {
            self.type_params(&sig.type_params)?;
        }

        self.write("(");
        let last = sig.params.len().saturating_sub(1);
        for (i, param) in sig.params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.argument(param, sig.variadic && i == last)?;
        }
        self.write(")");

        match sig.results.as_slice() {
            [] => Ok(()),
            [single] if single.name.is_empty() => {
                self.write(" ");
                self.write_ref(single.ty)
            }
            results => {
                self.write_each(" (", results, ", ", ")", |journal, result| {
                    journal.argument(result, false)
                })?;
                Ok(())
            }
        }
    }

    fn argument(&mut self, argument: &Argument, variadic: bool) -> StubResult {
        self.write_wrapped("", &argument.name, " ");
        if variadic {
            self.write("...");
        }
        self.write_ref(argument.ty)
    }

    /// A signature referenced from a method or an abstract, written after
    /// `head` without its own type parameters.
    fn signature_ref(&mut self, sig: SignatureId, head: &str) -> StubResult {
        let project = self.project;
        self.short(|journal| {
            journal.guarded(sig.id(), |journal| match project.get(sig) {
                Some(data) => journal.signature(data, head, false),
                None => {
                    journal.write(head);
                    journal.write("<signature>");
                    Ok(())
                }
            })
        })
    }

    /// `struct{ x int; Base }` or `struct{}`.
    fn struct_desc(&mut self, desc: &StructDesc) -> StubResult {
        if desc.fields.is_empty() {
            self.write("struct{}");
            return Ok(());
        }
        self.write_each("struct{ ", &desc.fields, "; ", " }", |journal, field| {
            if !field.embedded {
                journal.write_wrapped("", &field.name, " ");
            }
            journal.write_ref(field.ty)
        })?;
        Ok(())
    }

    /// `int|string|~float`.
    fn union(&mut self, union: &Union) -> StubResult {
        let terms: Vec<(&str, TypeRef)> = union
            .exact
            .iter()
            .map(|&ty| ("", ty))
            .chain(union.approx.iter().map(|&ty| ("~", ty)))
            .collect();
        self.write_each("", &terms, "|", "", |journal, &(tilde, ty)| {
            journal.write(tilde);
            journal.write_ref(ty)
        })?;
        Ok(())
    }

    /// Long: `{}` or an indented block of `;`-terminated lines.
    /// Short: `any` or `interface{ item; item; }`.
    fn interface_desc(&mut self, desc: &InterfaceDesc) -> StubResult {
        let long = self.mode == Mode::Long;
        if desc.is_empty() {
            self.write(if long { "{}" } else { "any" });
            return Ok(());
        }

        if long {
            self.write("{");
            self.newline();
            self.indented(|journal| journal.interface_items(desc, true))?;
            self.write("}");
        } else {
            self.write("interface{ ");
            self.interface_items(desc, false)?;
            self.write("}");
        }
        Ok(())
    }

    fn interface_items(&mut self, desc: &InterfaceDesc, lines: bool) -> StubResult {
        let end = |journal: &mut Self| {
            if lines {
                journal.write(";");
                journal.newline();
            } else {
                journal.write("; ");
            }
        };

        if self.write_each("inherits: ", &desc.inherits, ", ", "", |journal, &ty| {
            journal.write_ref(ty)
        })? {
            end(self);
        }
        if self.write_each("exact: ", &desc.exact, "|", "", |journal, &ty| journal.write_ref(ty))? {
            end(self);
        }
        if self.write_each("approx: ", &desc.approx, "|", "", |journal, &ty| {
            journal.write("~");
            journal.write_ref(ty)
        })? {
            end(self);
        }
        for (name, &sig) in &desc.abstracts {
            self.signature_ref(sig, name)?;
            end(self);
        }
        Ok(())
    }

    /// `func (Recv) Name[T any](params) results`.
    fn method_decl(&mut self, decl: &MethodDecl) -> StubResult {
        self.write("func ");
        if let Some(receiver) = decl.receiver {
            self.write("(");
            self.write_ref(receiver)?;
            self.write(") ");
        }
        self.decl_head("", &decl.header)?;
        self.signature_ref(decl.signature, "")
    }

    /// `inst func (Recv[int]) Name[int](params) results`.
    fn method_inst(&mut self, inst: &MethodInst) -> StubResult {
        self.write("inst func ");
        if let Some(receiver) = inst.receiver {
            self.write("(");
            self.write_ref(receiver)?;
            self.write(") ");
        }
        self.write_ref(inst.decl)?;
        self.type_args(&inst.instance_types)?;
        self.signature_ref(inst.resolved, "")
    }

    /// `package p {`, one `;`-terminated line per path, imports and member,
    /// then `}`.
    fn package(&mut self, package: &Package) -> StubResult {
        self.write("package ");
        self.write(&package.name);
        self.write(" {");
        self.newline();
        self.indented(|journal| {
            journal.write_line("path: ", &package.path, ";");
            journal.short(|journal| {
                journal.write_list_line("imports: ", &package.imports, ", ", ";")
            })?;
            journal.members(&package.interface_decls)?;
            journal.members(&package.interface_insts)?;
            journal.members(&package.object_decls)?;
            journal.members(&package.object_insts)?;
            journal.members(&package.method_decls)?;
            journal.members(&package.method_insts)?;
            journal.members(&package.values)
        })?;
        self.write("}");
        Ok(())
    }

    fn members<H: Handle>(&mut self, members: &[H]) -> StubResult {
        for &member in members {
            self.write_body(member)?;
            self.write(";");
            self.newline();
        }
        Ok(())
    }
}
