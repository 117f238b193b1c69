use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::{Expr, ItemMod, Lit, Meta};

use polystruct_core::{CompilationUnit, Generator, GeneratorConfig, ModulePath, OutputMode};

use crate::strip_trait;

pub fn expand(attr: TokenStream, mut module: ItemMod) -> Result<TokenStream, syn::Error> {
    let config = parse_config(attr)?;
    let Some((brace, items)) = module.content.take() else {
        return Err(syn::Error::new_spanned(
            &module,
            "#[polymorphic_structs] needs an inline module body: `mod name { ... }`",
        ));
    };

    let unit = CompilationUnit::from_items(module.ident.to_string(), ModulePath::root(), items);
    let output = Generator::new(config.clone()).generate(std::slice::from_ref(&unit));

    let mut items = unit.items;
    strip_items(&mut items, &config.marker_attribute);

    for source in &output.sources {
        let file: syn::File = syn::parse_str(&source.text).map_err(|e| {
            syn::Error::new(
                Span::call_site(),
                format!("generated code for `{}` does not parse: {}", source.name, e),
            )
        })?;
        items.extend(file.items);
    }
    module.content = Some((brace, items));

    let errors = output
        .diagnostics
        .iter()
        .filter(|d| d.is_error())
        .map(|d| syn::Error::new(Span::call_site(), d.to_string()).to_compile_error());

    Ok(quote! {
        #module
        #(#errors)*
    })
}

fn parse_config(attr: TokenStream) -> Result<GeneratorConfig, syn::Error> {
    let mut config = GeneratorConfig::default().with_mode(OutputMode::Inline);
    if attr.is_empty() {
        return Ok(config);
    }

    let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
    for meta in parser.parse2(attr)? {
        let Meta::NameValue(nv) = &meta else {
            return Err(syn::Error::new_spanned(&meta, "expected `key = value`"));
        };
        let Some(key) = nv.path.get_ident().map(|i| i.to_string()) else {
            return Err(syn::Error::new_spanned(&nv.path, "expected a plain key"));
        };
        let Expr::Lit(expr_lit) = &nv.value else {
            return Err(syn::Error::new_spanned(&nv.value, "expected a literal"));
        };

        match (key.as_str(), &expr_lit.lit) {
            ("derives", Lit::Str(s)) => {
                config.derives = s
                    .value()
                    .split(',')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            ("serializable", Lit::Bool(b)) => config.serializable = b.value(),
            ("emit_from_impls", Lit::Bool(b)) => config.emit_from_impls = b.value(),
            ("type_id_field", Lit::Str(s)) => config.type_id_field = s.value(),
            ("interface_prefix", Lit::Str(s)) => config.interface_prefix = s.value(),
            _ => {
                return Err(syn::Error::new_spanned(
                    &meta,
                    format!("unknown or mistyped argument `{}`", key),
                ))
            }
        }
    }

    config
        .validate()
        .map_err(|e| syn::Error::new(Span::call_site(), e.to_string()))?;
    Ok(config)
}

fn strip_items(items: &mut [syn::Item], marker: &str) {
    for item in items {
        match item {
            syn::Item::Trait(item_trait) => strip_trait(item_trait, marker),
            syn::Item::Mod(item_mod) => {
                if let Some((_, content)) = &mut item_mod.content {
                    strip_items(content, marker);
                }
            }
            _ => {}
        }
    }
}
