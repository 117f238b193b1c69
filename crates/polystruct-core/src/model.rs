//! Declarations discovered by the scanner and the merged type built from them.

use std::fmt;

use crate::error::{GeneratorError, Result};
use crate::members::MemberSet;
use crate::merge::SlotLayout;
use crate::tokens::{ident_fragment, render, to_snake_case, type_key};

/// Crate-relative module path of a declaration (`crate`, `crate::states`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath {
    segments: Vec<String>,
}

impl ModulePath {
    /// The crate root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses `crate::a::b`, `a::b` or an empty string (the root).
    pub fn parse(path: &str) -> Self {
        let segments = path
            .split("::")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .skip_while(|s| *s == "crate")
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path of an inline or file child module.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Parent module, or `None` for the crate root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    /// File stem used for the generated unit of this module.
    ///
    /// `crate` → `crate`, `crate::states::idle` → `states__idle`.
    pub fn file_stem(&self) -> String {
        if self.is_root() {
            "crate".to_string()
        } else {
            self.segments.join("__")
        }
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "crate")?;
        for segment in &self.segments {
            write!(f, "::{}", segment)?;
        }
        Ok(())
    }
}

/// A trait carrying the polymorphic marker.
#[derive(Debug, Clone)]
pub struct PolymorphicInterface {
    pub name: String,
    pub module: ModulePath,
    /// Rendered visibility (`pub`, `pub(crate)` or empty).
    pub visibility: String,
    /// String payload of the marker, reserved for future use.
    pub payload: Option<String>,
    /// Names of the supertraits, in declaration order.
    pub parents: Vec<String>,
    pub item: syn::ItemTrait,
}

/// How a variant declares its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldsShape {
    Named,
    Tuple,
    Unit,
}

/// One declared field of a variant.
#[derive(Debug, Clone)]
pub struct VariantField {
    /// Field name, or its index for tuple structs.
    pub name: String,
    pub ty: syn::Type,
    pub type_text: String,
    pub type_key: String,
}

/// A struct implementing a polymorphic interface.
#[derive(Debug, Clone)]
pub struct VariantType {
    pub name: String,
    pub module: ModulePath,
    pub shape: FieldsShape,
    pub fields: Vec<VariantField>,
}

impl VariantType {
    /// Builds a variant from its struct declaration.
    pub fn from_struct(item: &syn::ItemStruct, module: &ModulePath) -> Result<Self> {
        let name = item.ident.to_string();
        if !item.generics.params.is_empty() {
            return Err(GeneratorError::variant(
                &name,
                "generic structs cannot be merged into a single value type",
            ));
        }

        let (shape, fields) = match &item.fields {
            syn::Fields::Named(named) => {
                let fields = named
                    .named
                    .iter()
                    .filter_map(|f| f.ident.as_ref().map(|ident| field(ident.to_string(), &f.ty)))
                    .collect();
                (FieldsShape::Named, fields)
            }
            syn::Fields::Unnamed(unnamed) => {
                let fields = unnamed
                    .unnamed
                    .iter()
                    .enumerate()
                    .map(|(i, f)| field(i.to_string(), &f.ty))
                    .collect();
                (FieldsShape::Tuple, fields)
            }
            syn::Fields::Unit => (FieldsShape::Unit, Vec::new()),
        };

        Ok(Self {
            name,
            module: module.clone(),
            shape,
            fields,
        })
    }
}

fn field(name: String, ty: &syn::Type) -> VariantField {
    VariantField {
        name,
        ty: ty.clone(),
        type_text: render(ty),
        type_key: type_key(ty),
    }
}

/// Names of the conversion routines generated on every variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionNames {
    pub from_merged: String,
    pub to_merged: String,
    pub write_into: String,
}

/// The flattened value type generated for one interface.
#[derive(Debug, Clone)]
pub struct MergedType {
    pub name: String,
    pub type_id_name: String,
    pub interface: String,
    pub module: ModulePath,
    /// Visibility applied to the merged type and the conversion routines.
    pub visibility: String,
    pub variants: Vec<VariantType>,
    pub layout: SlotLayout,
    pub members: MemberSet,
}

impl MergedType {
    /// Derives the merged type name by stripping the interface prefix.
    pub fn name_for(interface: &str, prefix: &str) -> Result<String> {
        let Some(rest) = interface.strip_prefix(prefix) else {
            return Err(GeneratorError::InvalidName {
                interface: interface.to_string(),
                reason: format!("the name does not start with the prefix `{}`", prefix),
            });
        };
        let starts_like_type = rest.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
        if !starts_like_type {
            return Err(GeneratorError::InvalidName {
                interface: interface.to_string(),
                reason: format!("`{}` is not a usable type name", rest),
            });
        }
        Ok(rest.to_string())
    }

    pub fn conversion_names(&self) -> ConversionNames {
        let snake = to_snake_case(&self.name);
        ConversionNames {
            from_merged: format!("from_{}", snake),
            to_merged: format!("to_{}", snake),
            write_into: format!("write_into_{}", snake),
        }
    }

    /// Visibility prefix with a trailing space, or nothing for private items.
    pub fn visibility_prefix(&self) -> String {
        if self.visibility.is_empty() {
            String::new()
        } else {
            format!("{} ", self.visibility)
        }
    }
}

/// Synthetic slot name: `{type}_{index}`.
pub fn slot_name(type_text: &str, index: usize) -> String {
    format!("{}_{}", ident_fragment(type_text), index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_path_parse_and_display() {
        let path = ModulePath::parse("crate::states::idle");
        assert_eq!(path.segments(), ["states", "idle"]);
        assert_eq!(path.to_string(), "crate::states::idle");
        assert_eq!(path.file_stem(), "states__idle");
        assert_eq!(path.parent(), Some(ModulePath::parse("states")));

        let root = ModulePath::parse("crate");
        assert!(root.is_root());
        assert_eq!(root.to_string(), "crate");
        assert_eq!(root.file_stem(), "crate");
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn test_merged_name_strips_prefix() {
        assert_eq!(MergedType::name_for("IMyState", "I").unwrap(), "MyState");
        assert_eq!(MergedType::name_for("Shape", "").unwrap(), "Shape");
        assert!(MergedType::name_for("Shape", "I").is_err());
        assert!(MergedType::name_for("I", "I").is_err());
        assert!(MergedType::name_for("I_Thing", "I").is_err());
    }

    #[test]
    fn test_variant_from_tuple_struct() {
        let item: syn::ItemStruct = syn::parse_str("pub struct Pair(i32, f32);").unwrap();
        let variant = VariantType::from_struct(&item, &ModulePath::root()).unwrap();
        assert_eq!(variant.shape, FieldsShape::Tuple);
        assert_eq!(variant.fields[0].name, "0");
        assert_eq!(variant.fields[1].type_text, "f32");
    }

    #[test]
    fn test_generic_variant_rejected() {
        let item: syn::ItemStruct = syn::parse_str("struct Holder<T> { value: T }").unwrap();
        let err = VariantType::from_struct(&item, &ModulePath::root()).unwrap_err();
        assert!(matches!(err, GeneratorError::UnsupportedVariant { .. }));
    }

    #[test]
    fn test_slot_name() {
        assert_eq!(slot_name("i32", 0), "i32_0");
        assert_eq!(slot_name("Vec3", 2), "vec3_2");
    }
}
