//! Member collection for polymorphic interfaces.
//!
//! Resolves the full member set visible through a marked trait: its own
//! methods plus those of every supertrait found among the scanned
//! declarations, walked depth-first in declaration order with each trait
//! visited once. Methods marked `#[property]` are folded into property
//! members instead of being listed as raw methods.

use std::collections::HashSet;

use indexmap::IndexMap;
use proc_macro2::{TokenStream, TokenTree};
use quote::ToTokens;
use tracing::{debug, warn};

use crate::error::{GeneratorError, Result};
use crate::model::{ModulePath, PolymorphicInterface};
use crate::scanner::{ScanResult, TraitDecl};
use crate::tokens::{render, type_key};

/// Helper attribute marking a trait method as a property accessor.
pub const PROPERTY_ATTRIBUTE: &str = "property";

/// Helper attribute marking a `&mut T` parameter as output-only.
pub const OUT_ATTRIBUTE: &str = "out";

/// How a member takes its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverKind {
    /// `&self`
    Ref,
    /// `&mut self`
    RefMut,
    /// `self` or `mut self`
    Value,
}

/// Qualifier of a forwarded parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMode {
    /// Passed by value.
    Value,
    /// `&T`, read-only input.
    Shared,
    /// `&mut T`, read and written.
    Exclusive,
    /// `#[out] &mut T`, written by the callee; reset to its default when
    /// no variant handles the call.
    Out,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: syn::Type,
    pub mode: ParamMode,
}

/// A dispatchable method signature.
#[derive(Debug, Clone)]
pub struct MethodMember {
    pub name: String,
    pub receiver: ReceiverKind,
    /// Receiver as written for reference receivers (`&'a self`).
    pub receiver_text: String,
    pub params: Vec<Param>,
    pub output: Option<syn::Type>,
    pub generics: syn::Generics,
    pub is_unsafe: bool,
}

impl MethodMember {
    pub fn returns_value(&self) -> bool {
        self.output.is_some()
    }

    pub fn out_params(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|p| p.mode == ParamMode::Out)
    }
}

/// A getter and/or setter pair surfaced as one member.
#[derive(Debug, Clone)]
pub struct PropertyMember {
    pub name: String,
    pub ty: syn::Type,
    pub getter: Option<MethodMember>,
    pub setter: Option<MethodMember>,
}

impl PropertyMember {
    pub fn has_get(&self) -> bool {
        self.getter.is_some()
    }

    pub fn has_set(&self) -> bool {
        self.setter.is_some()
    }
}

#[derive(Debug, Clone)]
pub enum Member {
    Method(MethodMember),
    Property(PropertyMember),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Self::Method(m) => &m.name,
            Self::Property(p) => &p.name,
        }
    }
}

/// Members declared by one trait of the hierarchy.
#[derive(Debug, Clone)]
pub struct TraitMembers {
    pub trait_name: String,
    pub module: ModulePath,
    pub members: Vec<Member>,
}

/// Flattened member set of a polymorphic interface, grouped by declaring trait.
#[derive(Debug, Clone, Default)]
pub struct MemberSet {
    pub traits: Vec<TraitMembers>,
}

impl MemberSet {
    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.traits.iter().flat_map(|t| t.members.iter())
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodMember> {
        self.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            Member::Property(_) => None,
        })
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyMember> {
        self.iter().filter_map(|m| match m {
            Member::Property(property) => Some(property),
            Member::Method(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves member sets against the scanned trait declarations.
pub struct MemberCollector<'a> {
    scan: &'a ScanResult,
}

impl<'a> MemberCollector<'a> {
    pub fn new(scan: &'a ScanResult) -> Self {
        Self { scan }
    }

    pub fn collect(&self, interface: &PolymorphicInterface) -> Result<MemberSet> {
        let mut set = MemberSet::default();
        let mut visited = HashSet::new();
        let root = TraitDecl {
            name: interface.name.clone(),
            module: interface.module.clone(),
            item: interface.item.clone(),
        };
        self.visit(&interface.name, &root, &mut visited, &mut set)?;
        Ok(set)
    }

    fn visit(
        &self,
        interface: &str,
        decl: &TraitDecl,
        visited: &mut HashSet<String>,
        set: &mut MemberSet,
    ) -> Result<()> {
        if !visited.insert(decl.name.clone()) {
            return Ok(());
        }
        if !decl.item.generics.params.is_empty() {
            return Err(GeneratorError::interface(
                interface,
                format!("trait `{}` has generic parameters", decl.name),
            ));
        }

        let members = collect_trait_members(interface, &decl.item)?;
        debug!(
            interface,
            trait_name = %decl.name,
            member_count = members.len(),
            "Collected trait members"
        );
        set.traits.push(TraitMembers {
            trait_name: decl.name.clone(),
            module: decl.module.clone(),
            members,
        });

        for bound in &decl.item.supertraits {
            let syn::TypeParamBound::Trait(bound) = bound else {
                continue;
            };
            if matches!(bound.modifier, syn::TraitBoundModifier::Maybe(_)) {
                continue;
            }
            let Some(segment) = bound.path.segments.last() else {
                continue;
            };
            let parent = segment.ident.to_string();
            match self.scan.find_trait(&parent) {
                Some(parent_decl) => {
                    if !segment.arguments.is_none() {
                        return Err(GeneratorError::interface(
                            interface,
                            format!("supertrait `{}` takes generic arguments", parent),
                        ));
                    }
                    self.visit(interface, parent_decl, visited, set)?;
                }
                None => {
                    debug!(
                        interface,
                        supertrait = %parent,
                        "Supertrait has no scanned declaration; it contributes no members"
                    );
                }
            }
        }
        Ok(())
    }
}

enum Slot {
    Method(MethodMember),
    Property(String),
}

fn collect_trait_members(interface: &str, item: &syn::ItemTrait) -> Result<Vec<Member>> {
    let mut slots = Vec::new();
    let mut properties: IndexMap<String, PropertyMember> = IndexMap::new();

    for trait_item in &item.items {
        match trait_item {
            syn::TraitItem::Fn(f) => {
                let method = method_member(interface, &f.sig)?;
                if has_attr(&f.attrs, PROPERTY_ATTRIBUTE) {
                    let name = add_accessor(interface, method, &mut properties)?;
                    if !slots.iter().any(|s| matches!(s, Slot::Property(n) if *n == name)) {
                        slots.push(Slot::Property(name));
                    }
                } else {
                    slots.push(Slot::Method(method));
                }
            }
            syn::TraitItem::Type(t) => {
                return Err(GeneratorError::interface(
                    interface,
                    format!(
                        "associated type `{}` cannot be shared by every variant",
                        t.ident
                    ),
                ));
            }
            syn::TraitItem::Const(c) => {
                return Err(GeneratorError::interface(
                    interface,
                    format!(
                        "associated const `{}` cannot be dispatched on a value",
                        c.ident
                    ),
                ));
            }
            other => {
                warn!(
                    interface,
                    item = %render(other),
                    "Ignoring trait item the generator does not understand"
                );
            }
        }
    }

    Ok(slots
        .into_iter()
        .filter_map(|slot| match slot {
            Slot::Method(m) => Some(Member::Method(m)),
            Slot::Property(name) => properties.shift_remove(&name).map(Member::Property),
        })
        .collect())
}

fn add_accessor(
    interface: &str,
    method: MethodMember,
    properties: &mut IndexMap<String, PropertyMember>,
) -> Result<String> {
    let is_getter = method.params.is_empty() && method.returns_value();
    let setter_name = method.name.strip_prefix("set_").map(str::to_string);
    let is_setter = method.params.len() == 1 && !method.returns_value() && setter_name.is_some();

    if is_getter {
        let name = method.name.clone();
        let ty = method.output.clone().ok_or_else(|| {
            GeneratorError::Internal(format!("getter `{}` lost its return type", name))
        })?;
        let property = properties.entry(name.clone()).or_insert_with(|| PropertyMember {
            name: name.clone(),
            ty: ty.clone(),
            getter: None,
            setter: None,
        });
        if property.getter.is_some() {
            return Err(GeneratorError::member(interface, &name, "getter declared twice"));
        }
        check_property_type(interface, &name, &property.ty, &ty)?;
        property.getter = Some(method);
        Ok(name)
    } else if let (true, Some(name)) = (is_setter, setter_name) {
        let ty = method.params[0].ty.clone();
        let property = properties.entry(name.clone()).or_insert_with(|| PropertyMember {
            name: name.clone(),
            ty: ty.clone(),
            getter: None,
            setter: None,
        });
        if property.setter.is_some() {
            return Err(GeneratorError::member(interface, &name, "setter declared twice"));
        }
        check_property_type(interface, &name, &property.ty, &ty)?;
        property.setter = Some(method);
        Ok(name)
    } else {
        Err(GeneratorError::member(
            interface,
            &method.name,
            "#[property] accessors must look like `fn name(&self) -> T` or `fn set_name(&mut self, value: T)`",
        ))
    }
}

fn check_property_type(
    interface: &str,
    name: &str,
    expected: &syn::Type,
    found: &syn::Type,
) -> Result<()> {
    if type_key(expected) == type_key(found) {
        Ok(())
    } else {
        Err(GeneratorError::member(
            interface,
            name,
            format!(
                "getter and setter disagree on the property type (`{}` vs `{}`)",
                render(expected),
                render(found)
            ),
        ))
    }
}

fn method_member(interface: &str, sig: &syn::Signature) -> Result<MethodMember> {
    let name = sig.ident.to_string();
    let unsupported = |reason: &str| GeneratorError::member(interface, &name, reason);

    if sig.asyncness.is_some() {
        return Err(unsupported("async methods cannot be dispatched"));
    }
    if sig.variadic.is_some() {
        return Err(unsupported("variadic methods cannot be dispatched"));
    }
    if sig.abi.is_some() {
        return Err(unsupported("methods with an explicit ABI cannot be dispatched"));
    }

    let (receiver, receiver_text) = match sig.inputs.first() {
        Some(syn::FnArg::Receiver(r)) => {
            if r.colon_token.is_some() {
                return Err(unsupported("typed receivers such as `self: Box<Self>` are not supported"));
            }
            match (&r.reference, &r.mutability) {
                (Some(_), Some(_)) => (ReceiverKind::RefMut, render(r)),
                (Some(_), None) => (ReceiverKind::Ref, render(r)),
                (None, _) => (ReceiverKind::Value, "self".to_string()),
            }
        }
        _ => {
            return Err(unsupported(
                "associated functions without a receiver have no discriminant to dispatch on",
            ))
        }
    };

    let mut params = Vec::new();
    for (index, arg) in sig.inputs.iter().skip(1).enumerate() {
        let syn::FnArg::Typed(typed) = arg else {
            return Err(unsupported("unexpected receiver position"));
        };
        if mentions_self(typed.ty.to_token_stream()) {
            return Err(unsupported("parameters cannot mention `Self`"));
        }
        let param_name = match typed.pat.as_ref() {
            syn::Pat::Ident(ident) if ident.ident != "_" => ident.ident.to_string(),
            _ => format!("arg{}", index),
        };
        let is_out = has_attr(&typed.attrs, OUT_ATTRIBUTE);
        let mode = match typed.ty.as_ref() {
            syn::Type::Reference(r) if r.mutability.is_some() && is_out => ParamMode::Out,
            _ if is_out => {
                return Err(unsupported(&format!(
                    "#[out] parameter `{}` must be a `&mut` reference",
                    param_name
                )))
            }
            syn::Type::Reference(r) if r.mutability.is_some() => ParamMode::Exclusive,
            syn::Type::Reference(_) => ParamMode::Shared,
            _ => ParamMode::Value,
        };
        params.push(Param {
            name: param_name,
            ty: (*typed.ty).clone(),
            mode,
        });
    }

    let output = match &sig.output {
        syn::ReturnType::Default => None,
        syn::ReturnType::Type(_, ty) => {
            if is_unit(ty) {
                None
            } else {
                let tokens = ty.to_token_stream();
                if mentions_self(tokens.clone()) {
                    return Err(unsupported(
                        "return types cannot mention `Self`; the variant and merged types differ",
                    ));
                }
                if borrows(tokens) {
                    return Err(unsupported(
                        "return types cannot borrow from the transient variant instance",
                    ));
                }
                Some((**ty).clone())
            }
        }
    };

    Ok(MethodMember {
        name,
        receiver,
        receiver_text,
        params,
        output,
        generics: sig.generics.clone(),
        is_unsafe: sig.unsafety.is_some(),
    })
}

pub(crate) fn has_attr(attrs: &[syn::Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| {
        attr.path()
            .segments
            .last()
            .is_some_and(|segment| segment.ident == name)
    })
}

fn is_unit(ty: &syn::Type) -> bool {
    matches!(ty, syn::Type::Tuple(t) if t.elems.is_empty())
}

fn mentions_self(tokens: TokenStream) -> bool {
    tokens.into_iter().any(|tt| match tt {
        TokenTree::Ident(ident) => ident == "Self",
        TokenTree::Group(group) => mentions_self(group.stream()),
        _ => false,
    })
}

/// True when the type holds a non-`'static` borrow.
fn borrows(tokens: TokenStream) -> bool {
    let tokens: Vec<TokenTree> = tokens.into_iter().collect();
    for (i, tt) in tokens.iter().enumerate() {
        match tt {
            TokenTree::Punct(p) if p.as_char() == '&' => {
                let is_static = matches!(
                    (tokens.get(i + 1), tokens.get(i + 2)),
                    (Some(TokenTree::Punct(q)), Some(TokenTree::Ident(lt)))
                        if q.as_char() == '\'' && lt == "static"
                );
                if !is_static {
                    return true;
                }
            }
            TokenTree::Punct(p) if p.as_char() == '\'' => {
                if let Some(TokenTree::Ident(lt)) = tokens.get(i + 1) {
                    if lt != "static" {
                        return true;
                    }
                }
            }
            TokenTree::Group(group) if borrows(group.stream()) => return true,
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests;
