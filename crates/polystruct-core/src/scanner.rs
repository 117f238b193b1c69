//! Declaration scanner.
//!
//! A single order-preserving pass over every compilation unit. Records the
//! traits carrying the polymorphic marker, every trait and struct
//! declaration, the interfaces each struct claims through `impl Trait for
//! Struct` blocks, and the `use` declarations of every module so they can
//! be propagated into generated code. Trait names match by their last path
//! segment. The implementing type of an `impl` block is resolved from the
//! module holding the block: its own structs, then its imports.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{GeneratorError, Result};
use crate::model::{ModulePath, PolymorphicInterface};
use crate::tokens::render;
use crate::uses::{anchor_path, anchor_use};

/// Import hops followed when resolving a type path.
const MAX_RESOLVE_DEPTH: usize = 8;

/// `impl Trait for SelfTy` found while scanning.
struct ImplClaim {
    module: ModulePath,
    self_path: Vec<String>,
    trait_name: String,
}

/// One parsed source file (or inline module body) fed to the generator.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    /// Display name used in diagnostics, usually the file path.
    pub name: String,
    /// Module the items belong to.
    pub module: ModulePath,
    pub items: Vec<syn::Item>,
}

impl CompilationUnit {
    /// Parses Rust source text into a unit.
    pub fn parse(name: impl Into<String>, module: ModulePath, source: &str) -> Result<Self> {
        let name = name.into();
        let file = syn::parse_file(source).map_err(|e| GeneratorError::Parse {
            unit: name.clone(),
            message: format!("{} (line {})", e, e.span().start().line),
        })?;
        Ok(Self {
            name,
            module,
            items: file.items,
        })
    }

    /// Wraps already-parsed items.
    pub fn from_items(name: impl Into<String>, module: ModulePath, items: Vec<syn::Item>) -> Self {
        Self {
            name: name.into(),
            module,
            items,
        }
    }
}

/// A trait declaration, marked or not.
#[derive(Debug, Clone)]
pub struct TraitDecl {
    pub name: String,
    pub module: ModulePath,
    pub item: syn::ItemTrait,
}

/// A struct declaration with the traits it implements.
#[derive(Debug, Clone)]
pub struct StructDecl {
    pub name: String,
    pub module: ModulePath,
    pub item: syn::ItemStruct,
    /// Trait names from `impl Trait for Struct` blocks, in discovery order.
    pub claims: Vec<String>,
}

/// Per-module context needed to emit code that resolves like the source.
#[derive(Debug, Clone, Default)]
pub struct ModuleInfo {
    pub uses: Vec<syn::ItemUse>,
    /// Names of modules declared inside this one (`mod a;` or `mod a { .. }`).
    pub child_modules: Vec<String>,
}

/// Everything the scanner discovered, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub interfaces: Vec<PolymorphicInterface>,
    pub traits: Vec<TraitDecl>,
    pub structs: Vec<StructDecl>,
    pub modules: IndexMap<ModulePath, ModuleInfo>,
}

impl ScanResult {
    pub fn find_trait(&self, name: &str) -> Option<&TraitDecl> {
        self.traits.iter().find(|t| t.name == name)
    }

    pub fn module(&self, path: &ModulePath) -> Option<&ModuleInfo> {
        self.modules.get(path)
    }

    /// Index of the struct a type path names when written in `module`.
    ///
    /// Paths that cannot be followed through scanned modules fall back to
    /// the only struct of that name, if there is exactly one.
    pub fn resolve_struct(&self, module: &ModulePath, path: &[String]) -> Option<usize> {
        if let Some(found) = self.resolve_path(module, path, 0) {
            return Some(found);
        }
        let name = path.last()?;
        let mut same_name = self.structs.iter().enumerate().filter(|(_, s)| &s.name == name);
        match (same_name.next(), same_name.next()) {
            (Some((index, _)), None) => Some(index),
            _ => None,
        }
    }

    fn resolve_path(&self, module: &ModulePath, path: &[String], depth: usize) -> Option<usize> {
        let (name, prefix) = path.split_last()?;
        if prefix.is_empty() {
            return self.resolve_name(module, name, depth);
        }
        let children = self
            .module(module)
            .map(|info| info.child_modules.as_slice())
            .unwrap_or_default();
        let anchored = anchor_path(path.to_vec(), module, children);
        self.resolve_absolute(&anchored, depth)
    }

    /// Resolves a `crate::a::Name` path; other roots are not scanned.
    fn resolve_absolute(&self, path: &[String], depth: usize) -> Option<usize> {
        let (name, prefix) = path.split_last()?;
        let (root, segments) = prefix.split_first()?;
        if root != "crate" {
            return None;
        }
        self.resolve_name(&ModulePath::from_segments(segments), name, depth)
    }

    /// A struct declared in `module`, else one it imports under `name`.
    fn resolve_name(&self, module: &ModulePath, name: &str, depth: usize) -> Option<usize> {
        if let Some(index) = self
            .structs
            .iter()
            .position(|s| &s.module == module && s.name == name)
        {
            return Some(index);
        }
        if depth >= MAX_RESOLVE_DEPTH {
            return None;
        }
        let info = self.module(module)?;
        let imports: Vec<_> = info
            .uses
            .iter()
            .flat_map(|item| anchor_use(item, module, &info.child_modules))
            .collect();

        for import in &imports {
            let original = match import.leaf.split_once(" as ") {
                Some((original, alias)) if alias == name => original,
                None if import.leaf == name => name,
                _ => continue,
            };
            let mut target = import.path.clone();
            target.push(original.to_string());
            return self.resolve_absolute(&target, depth + 1);
        }

        imports
            .iter()
            .filter(|import| import.leaf == "*")
            .find_map(|import| {
                let mut target = import.path.clone();
                target.push(name.to_string());
                self.resolve_absolute(&target, depth + 1)
            })
    }

    /// Structs claiming `interface`, excluding one named like the merged type.
    pub fn variants_of<'a>(
        &'a self,
        interface: &'a str,
        merged_name: &'a str,
    ) -> impl Iterator<Item = &'a StructDecl> + 'a {
        self.structs
            .iter()
            .filter(move |s| s.claims.iter().any(|c| c == interface))
            .filter(move |s| s.name != merged_name)
    }
}

/// Walks compilation units and builds a [`ScanResult`].
pub struct DeclarationScanner {
    marker: String,
}

impl DeclarationScanner {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn scan(&self, units: &[CompilationUnit]) -> ScanResult {
        let mut result = ScanResult::default();
        let mut impl_claims: Vec<ImplClaim> = Vec::new();

        for unit in units {
            debug!(unit = %unit.name, module = %unit.module, "Scanning compilation unit");
            self.scan_items(&unit.items, &unit.module, &mut result, &mut impl_claims);
        }

        for claim in impl_claims {
            let Some(index) = result.resolve_struct(&claim.module, &claim.self_path) else {
                debug!(
                    module = %claim.module,
                    self_ty = %claim.self_path.join("::"),
                    trait_name = %claim.trait_name,
                    "Impl target is not a scanned struct"
                );
                continue;
            };
            let decl = &mut result.structs[index];
            if !decl.claims.contains(&claim.trait_name) {
                decl.claims.push(claim.trait_name);
            }
        }

        debug!(
            interfaces = result.interfaces.len(),
            traits = result.traits.len(),
            structs = result.structs.len(),
            modules = result.modules.len(),
            "Scan complete"
        );
        result
    }

    fn scan_items(
        &self,
        items: &[syn::Item],
        module: &ModulePath,
        result: &mut ScanResult,
        impl_claims: &mut Vec<ImplClaim>,
    ) {
        result.modules.entry(module.clone()).or_default();

        for item in items {
            match item {
                syn::Item::Trait(item_trait) => {
                    let name = item_trait.ident.to_string();
                    if let Some(attr) = self.marker_attr(&item_trait.attrs) {
                        result.interfaces.push(PolymorphicInterface {
                            name: name.clone(),
                            module: module.clone(),
                            visibility: render(&item_trait.vis),
                            payload: marker_payload(attr, &name),
                            parents: supertrait_names(item_trait),
                            item: item_trait.clone(),
                        });
                    }
                    result.traits.push(TraitDecl {
                        name,
                        module: module.clone(),
                        item: item_trait.clone(),
                    });
                }
                syn::Item::Struct(item_struct) => {
                    result.structs.push(StructDecl {
                        name: item_struct.ident.to_string(),
                        module: module.clone(),
                        item: item_struct.clone(),
                        claims: Vec::new(),
                    });
                }
                syn::Item::Impl(item_impl) => {
                    if let Some((self_path, trait_name)) = impl_claim(item_impl) {
                        impl_claims.push(ImplClaim {
                            module: module.clone(),
                            self_path,
                            trait_name,
                        });
                    }
                }
                syn::Item::Use(item_use) => {
                    if let Some(info) = result.modules.get_mut(module) {
                        info.uses.push(item_use.clone());
                    }
                }
                syn::Item::Mod(item_mod) => {
                    let child_name = item_mod.ident.to_string();
                    if let Some(info) = result.modules.get_mut(module) {
                        info.child_modules.push(child_name.clone());
                    }
                    if let Some((_, content)) = &item_mod.content {
                        let child = module.child(child_name);
                        self.scan_items(content, &child, result, impl_claims);
                    }
                }
                _ => {}
            }
        }
    }

    fn marker_attr<'a>(&self, attrs: &'a [syn::Attribute]) -> Option<&'a syn::Attribute> {
        attrs.iter().find(|attr| {
            attr.path()
                .segments
                .last()
                .is_some_and(|segment| segment.ident == self.marker.as_str())
        })
    }
}

fn marker_payload(attr: &syn::Attribute, interface: &str) -> Option<String> {
    match &attr.meta {
        syn::Meta::Path(_) => None,
        syn::Meta::List(_) => match attr.parse_args::<syn::LitStr>() {
            Ok(lit) => Some(lit.value()),
            Err(e) => {
                warn!(interface, error = %e, "Marker payload is not a string literal; ignoring it");
                None
            }
        },
        syn::Meta::NameValue(nv) => match &nv.value {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) => Some(lit.value()),
            _ => {
                warn!(interface, "Marker payload is not a string literal; ignoring it");
                None
            }
        },
    }
}

fn supertrait_names(item: &syn::ItemTrait) -> Vec<String> {
    item.supertraits
        .iter()
        .filter_map(|bound| match bound {
            syn::TypeParamBound::Trait(t) => t.path.segments.last().map(|s| s.ident.to_string()),
            _ => None,
        })
        .collect()
}

/// `(self type path, trait)` for `impl Trait for Type`; `None` for inherent
/// and negative impls.
fn impl_claim(item: &syn::ItemImpl) -> Option<(Vec<String>, String)> {
    let (negative, trait_path, _) = item.trait_.as_ref()?;
    if negative.is_some() {
        return None;
    }
    let trait_name = trait_path.segments.last()?.ident.to_string();
    let syn::Type::Path(self_ty) = item.self_ty.as_ref() else {
        return None;
    };
    if self_ty.qself.is_some() {
        return None;
    }
    let self_path = self_ty
        .path
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect();
    Some((self_path, trait_name))
}
