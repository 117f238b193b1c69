//! Switch-based dispatch of interface members on the merged type.
//!
//! Every member becomes a `match` on the discriminant. A known variant arm
//! rebuilds a transient variant from the slots, calls the member on it
//! through fully qualified syntax and, for `&mut self` members, writes the
//! variant back before returning. The `None` arm resets `#[out]` parameters
//! and returns the default value of the result type.

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::members::{Member, MethodMember, ReceiverKind};
use crate::model::{ConversionNames, MergedType};
use crate::tokens::render;
use crate::writer::SourceWriter;

const SOME: &str = "::core::option::Option::Some";
const NONE: &str = "::core::option::Option::None";
const DEFAULT: &str = "::core::default::Default::default()";

// Arm locals share a scope with the forwarded parameters.
const INSTANCE: &str = "__polystruct_instance";
const RESULT: &str = "__polystruct_result";

pub struct DispatchSynthesizer<'a> {
    merged: &'a MergedType,
    config: &'a GeneratorConfig,
    names: ConversionNames,
}

impl<'a> DispatchSynthesizer<'a> {
    pub fn new(merged: &'a MergedType, config: &'a GeneratorConfig) -> Self {
        Self {
            merged,
            config,
            names: merged.conversion_names(),
        }
    }

    /// Writes one `impl Trait for Merged` block per trait of the hierarchy.
    pub fn emit(&self, w: &mut SourceWriter) -> Result<()> {
        for trait_members in &self.merged.members.traits {
            w.blank();
            w.write_attribute("allow(unused_variables, clippy::let_unit_value)");
            w.begin_scope(format!(
                "impl {} for {}",
                trait_members.trait_name, self.merged.name
            ));
            let mut first = true;
            for member in &trait_members.members {
                let accessors: Vec<&MethodMember> = match member {
                    Member::Method(method) => vec![method],
                    Member::Property(property) => property
                        .getter
                        .iter()
                        .chain(property.setter.iter())
                        .collect(),
                };
                for method in accessors {
                    if !first {
                        w.blank();
                    }
                    first = false;
                    self.emit_method(&trait_members.trait_name, method, w)?;
                }
            }
            w.end_scope()?;
        }
        Ok(())
    }

    fn emit_method(&self, trait_name: &str, method: &MethodMember, w: &mut SourceWriter) -> Result<()> {
        w.begin_scope(signature(method));
        w.begin_scope(format!("match self.{}", self.config.type_id_field));

        for variant in &self.merged.variants {
            w.begin_scope(format!(
                "{}({}::{}) =>",
                SOME, self.merged.type_id_name, variant.name
            ));
            self.emit_arm(trait_name, &variant.name, method, w);
            w.end_scope()?;
        }

        let outs: Vec<_> = method.out_params().collect();
        if outs.is_empty() && !method.returns_value() {
            w.line(format!("{} => {{}}", NONE));
        } else {
            w.begin_scope(format!("{} =>", NONE));
            for param in outs {
                w.line(format!("*{} = {};", param.name, DEFAULT));
            }
            if method.returns_value() {
                w.line(DEFAULT);
            }
            w.end_scope()?;
        }

        w.end_scope()?;
        w.end_scope()
    }

    fn emit_arm(&self, trait_name: &str, variant: &str, method: &MethodMember, w: &mut SourceWriter) {
        let mut args = Vec::with_capacity(method.params.len() + 1);
        args.push(match method.receiver {
            ReceiverKind::Ref => format!("&{}", INSTANCE),
            ReceiverKind::RefMut => format!("&mut {}", INSTANCE),
            ReceiverKind::Value => INSTANCE.to_string(),
        });
        args.extend(method.params.iter().map(|p| p.name.clone()));

        let mut call = format!(
            "<{} as {}>::{}{}({})",
            variant,
            trait_name,
            method.name,
            turbofish(&method.generics),
            args.join(", ")
        );
        if method.is_unsafe {
            call = format!("unsafe {{ {} }}", call);
        }

        let rebuild = match method.receiver {
            ReceiverKind::Value => format!("{}::{}(&self)", variant, self.names.from_merged),
            _ => format!("{}::{}(self)", variant, self.names.from_merged),
        };

        match method.receiver {
            ReceiverKind::RefMut => {
                w.write_let(true, INSTANCE, &rebuild);
                if method.returns_value() {
                    w.write_let(false, RESULT, &call);
                } else {
                    w.line(format!("{};", call));
                }
                w.line(format!("{}.{}(self);", INSTANCE, self.names.write_into));
                if method.returns_value() {
                    w.line(RESULT);
                }
            }
            ReceiverKind::Ref | ReceiverKind::Value => {
                w.write_let(false, INSTANCE, &rebuild);
                w.line(call);
            }
        }
    }
}

/// `unsafe fn name<G>(receiver, params) -> Output where ..`
fn signature(method: &MethodMember) -> String {
    let mut inputs = vec![method.receiver_text.clone()];
    inputs.extend(
        method
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, render(&p.ty))),
    );

    let mut sig = String::new();
    if method.is_unsafe {
        sig.push_str("unsafe ");
    }
    sig.push_str("fn ");
    sig.push_str(&method.name);
    if !method.generics.params.is_empty() {
        sig.push_str(&render(&method.generics));
    }
    sig.push('(');
    sig.push_str(&inputs.join(", "));
    sig.push(')');
    if let Some(output) = &method.output {
        sig.push_str(" -> ");
        sig.push_str(&render(output));
    }
    if let Some(where_clause) = &method.generics.where_clause {
        sig.push(' ');
        sig.push_str(render(where_clause).trim_end_matches(", "));
    }
    sig
}

/// Explicit type and const arguments for a generic member call.
fn turbofish(generics: &syn::Generics) -> String {
    let args: Vec<String> = generics
        .params
        .iter()
        .filter_map(|param| match param {
            syn::GenericParam::Type(t) => Some(t.ident.to_string()),
            syn::GenericParam::Const(c) => Some(c.ident.to_string()),
            syn::GenericParam::Lifetime(_) => None,
        })
        .collect();
    if args.is_empty() {
        String::new()
    } else {
        format!("::<{}>", args.join(", "))
    }
}
