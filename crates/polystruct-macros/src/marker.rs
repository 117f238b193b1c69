use proc_macro2::TokenStream;
use quote::quote;
use syn::{ItemTrait, LitStr};

use crate::strip_trait;

pub fn expand(attr: TokenStream, mut item: ItemTrait) -> Result<TokenStream, syn::Error> {
    // The payload is reserved; only check that it is a string.
    if !attr.is_empty() {
        syn::parse2::<LitStr>(attr)?;
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "polymorphic interfaces cannot be generic",
        ));
    }

    let marker = polystruct_core::GeneratorConfig::default().marker_attribute;
    strip_trait(&mut item, &marker);
    Ok(quote! { #item })
}
