//! Attribute macros for polymorphic structs.

use proc_macro::TokenStream;
use syn::{parse_macro_input, Attribute, ItemMod, ItemTrait};

mod marker;
mod module;

/// Generates merged types for every marked trait declared in an inline module.
///
/// ```ignore
/// #[polymorphic_structs(derives = "Clone, Debug")]
/// mod shapes {
///     #[polymorphic_struct]
///     pub trait IShape {
///         fn area(&self) -> f32;
///     }
///     // structs implementing IShape...
/// }
/// ```
#[proc_macro_attribute]
pub fn polymorphic_structs(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemMod);
    module::expand(attr.into(), input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Marks a trait as a polymorphic interface for the build-script generator.
///
/// The trait is emitted unchanged apart from the `#[property]` and `#[out]`
/// helper attributes, which are removed.
#[proc_macro_attribute]
pub fn polymorphic_struct(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemTrait);
    marker::expand(attr.into(), input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn is_named(attr: &Attribute, name: &str) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == name)
}

/// Removes the marker and helper attributes from a trait.
fn strip_trait(item: &mut ItemTrait, marker: &str) {
    item.attrs.retain(|attr| !is_named(attr, marker));
    for trait_item in &mut item.items {
        let syn::TraitItem::Fn(f) = trait_item else {
            continue;
        };
        f.attrs
            .retain(|attr| !is_named(attr, polystruct_core::PROPERTY_ATTRIBUTE));
        for input in &mut f.sig.inputs {
            if let syn::FnArg::Typed(typed) = input {
                typed
                    .attrs
                    .retain(|attr| !is_named(attr, polystruct_core::OUT_ATTRIBUTE));
            }
        }
    }
}
