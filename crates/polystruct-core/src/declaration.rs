//! Merged struct and discriminant enum declarations.

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::model::MergedType;
use crate::writer::SourceWriter;

const SERDE_DERIVES: [&str; 2] = ["::serde::Serialize", "::serde::Deserialize"];

/// Writes `enum {Merged}TypeId` and the flattened `struct {Merged}`.
pub fn emit_merged_declaration(
    merged: &MergedType,
    config: &GeneratorConfig,
    w: &mut SourceWriter,
) -> Result<()> {
    let mut id_derives: Vec<String> = ["Clone", "Copy", "Debug", "PartialEq", "Eq", "Hash"]
        .iter()
        .map(|d| d.to_string())
        .collect();
    let mut struct_derives = vec!["Default".to_string()];
    for derive in &config.derives {
        if !struct_derives.contains(derive) {
            struct_derives.push(derive.clone());
        }
    }
    if config.serializable {
        for derive in SERDE_DERIVES {
            id_derives.push(derive.to_string());
            struct_derives.push(derive.to_string());
        }
    }

    let members: Vec<&str> = merged.variants.iter().map(|v| v.name.as_str()).collect();
    w.line(format!("/// Discriminant of [`{}`].", merged.name));
    w.write_derives(&id_derives);
    w.write_enum(&merged.visibility, &merged.type_id_name, &members)?;
    w.blank();

    w.line(format!(
        "/// Flattened value of every `{}` implementor.",
        merged.interface
    ));
    w.write_derives(&struct_derives);
    w.begin_scope(format!("{}struct {}", merged.visibility_prefix(), merged.name));
    w.write_field(
        "pub",
        &config.type_id_field,
        &format!("::core::option::Option<{}>", merged.type_id_name),
    );
    for slot in &merged.layout.slots {
        w.write_field("pub", &slot.name, &slot.type_text);
    }
    w.end_scope()
}
