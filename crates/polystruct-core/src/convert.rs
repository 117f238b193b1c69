//! Conversion routines between a variant and its merged type.

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::model::{MergedType, VariantType};
use crate::writer::SourceWriter;

const CLONE: &str = "::core::clone::Clone::clone";

pub struct ConversionEmitter<'a> {
    merged: &'a MergedType,
    config: &'a GeneratorConfig,
}

impl<'a> ConversionEmitter<'a> {
    pub fn new(merged: &'a MergedType, config: &'a GeneratorConfig) -> Self {
        Self { merged, config }
    }

    /// Writes the inherent conversion impl of `variant` and, when enabled,
    /// the `From` impls in both directions.
    pub fn emit(&self, variant: &VariantType, w: &mut SourceWriter) -> Result<()> {
        let merged = &self.merged.name;
        let names = self.merged.conversion_names();
        let vis = self.merged.visibility_prefix();
        let type_id = self.config.type_id_field.as_str();
        let tag = format!(
            "::core::option::Option::Some({}::{})",
            self.merged.type_id_name, variant.name
        );
        let fields: Vec<(&str, &str)> = self
            .merged
            .layout
            .fields_of(&variant.name)
            .map(|(field, slot)| (field, slot.name.as_str()))
            .collect();

        w.write_attribute("allow(clippy::clone_on_copy, clippy::needless_update)");
        w.begin_scope(format!("impl {}", variant.name));

        // slots → variant
        let arg = if fields.is_empty() { "_merged" } else { "merged" };
        w.begin_scope(format!(
            "{}fn {}({}: &{}) -> Self",
            vis, names.from_merged, arg, merged
        ));
        w.begin_scope("Self");
        for (field, slot) in &fields {
            w.line(format!("{}: {}(&merged.{}),", field, CLONE, slot));
        }
        w.end_scope()?;
        w.end_scope()?;
        w.blank();

        // variant → fresh merged value
        w.begin_scope(format!("{}fn {}(&self) -> {}", vis, names.to_merged, merged));
        w.begin_scope(merged.as_str());
        w.line(format!("{}: {},", type_id, tag));
        for (field, slot) in &fields {
            w.line(format!("{}: {}(&self.{}),", slot, CLONE, field));
        }
        w.line("..::core::default::Default::default()");
        w.end_scope()?;
        w.end_scope()?;
        w.blank();

        // variant → existing merged value
        w.begin_scope(format!(
            "{}fn {}(&self, merged: &mut {})",
            vis, names.write_into, merged
        ));
        w.line(format!("merged.{} = {};", type_id, tag));
        for (field, slot) in &fields {
            w.line(format!("merged.{} = {}(&self.{});", slot, CLONE, field));
        }
        w.end_scope()?;
        w.end_scope()?;

        if self.config.emit_from_impls {
            w.blank();
            w.begin_scope(format!("impl ::core::convert::From<{}> for {}", variant.name, merged));
            w.begin_scope(format!("fn from(value: {}) -> Self", variant.name));
            w.line(format!("value.{}()", names.to_merged));
            w.end_scope()?;
            w.end_scope()?;
            w.blank();
            w.begin_scope(format!("impl ::core::convert::From<&{}> for {}", merged, variant.name));
            w.begin_scope(format!("fn from(merged: &{}) -> Self", merged));
            w.line(format!("Self::{}(merged)", names.from_merged));
            w.end_scope()?;
            w.end_scope()?;
        }
        Ok(())
    }
}
