//! Field-slot merging.
//!
//! First-fit by type: variants are visited in discovery order and their
//! fields in declaration order. Each field takes the first existing slot of
//! the same type that the current variant has not claimed yet, or appends a
//! new slot. The resulting layout depends only on the variant and field
//! order, so repeated runs produce identical output.

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{GeneratorError, Result};
use crate::model::{slot_name, VariantType};

/// One storage location of the merged type.
#[derive(Debug, Clone)]
pub struct FieldSlot {
    pub index: usize,
    pub name: String,
    pub ty: syn::Type,
    pub type_text: String,
    pub type_key: String,
    /// Variant name → the variant's own field stored in this slot.
    pub users: IndexMap<String, String>,
}

/// Slots of a merged type plus each variant's field-to-slot assignment.
#[derive(Debug, Clone, Default)]
pub struct SlotLayout {
    pub slots: Vec<FieldSlot>,
    assignments: IndexMap<String, IndexMap<String, usize>>,
}

impl SlotLayout {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot holding `field` of `variant`.
    pub fn slot_for(&self, variant: &str, field: &str) -> Option<&FieldSlot> {
        let index = *self.assignments.get(variant)?.get(field)?;
        self.slots.get(index)
    }

    /// `(field, slot)` pairs of a variant in field declaration order.
    pub fn fields_of<'a>(
        &'a self,
        variant: &str,
    ) -> impl Iterator<Item = (&'a str, &'a FieldSlot)> + 'a {
        self.assignments
            .get(variant)
            .into_iter()
            .flat_map(|fields| fields.iter())
            .filter_map(|(field, &index)| self.slots.get(index).map(|slot| (field.as_str(), slot)))
    }
}

/// Computes the shared slot layout of an ordered variant list.
pub fn merge_fields(variants: &[VariantType]) -> Result<SlotLayout> {
    let mut layout = SlotLayout::default();

    for variant in variants {
        if layout.assignments.contains_key(&variant.name) {
            return Err(GeneratorError::variant(
                &variant.name,
                "two variants share this name; their discriminants would collide",
            ));
        }

        let mut claimed = vec![false; layout.slots.len()];
        let mut fields = IndexMap::new();

        for field in &variant.fields {
            let free = layout
                .slots
                .iter()
                .position(|slot| !claimed[slot.index] && slot.type_key == field.type_key);

            let index = match free {
                Some(index) => index,
                None => {
                    let index = layout.slots.len();
                    layout.slots.push(FieldSlot {
                        index,
                        name: slot_name(&field.type_text, index),
                        ty: field.ty.clone(),
                        type_text: field.type_text.clone(),
                        type_key: field.type_key.clone(),
                        users: IndexMap::new(),
                    });
                    claimed.push(false);
                    index
                }
            };

            claimed[index] = true;
            layout.slots[index]
                .users
                .insert(variant.name.clone(), field.name.clone());
            fields.insert(field.name.clone(), index);
            trace!(
                variant = %variant.name,
                field = %field.name,
                slot = %layout.slots[index].name,
                "Assigned field to slot"
            );
        }

        layout.assignments.insert(variant.name.clone(), fields);
    }

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModulePath;

    fn variant(source: &str) -> VariantType {
        let item: syn::ItemStruct = syn::parse_str(source).unwrap();
        VariantType::from_struct(&item, &ModulePath::root()).unwrap()
    }

    #[test]
    fn test_concrete_scenario() {
        let variants = [
            variant("struct A { field: i32 }"),
            variant("struct B { field: i32, field2: i32 }"),
        ];
        let layout = merge_fields(&variants).unwrap();

        assert_eq!(layout.len(), 2);
        assert_eq!(layout.slot_for("A", "field").unwrap().name, "i32_0");
        assert_eq!(layout.slot_for("B", "field").unwrap().name, "i32_0");
        assert_eq!(layout.slot_for("B", "field2").unwrap().name, "i32_1");
    }

    #[test]
    fn test_slot_count_is_max_per_type() {
        let variants = [
            variant("struct A { a: i32, b: f32, c: i32 }"),
            variant("struct B { x: f32, y: f32, z: f32 }"),
            variant("struct C { n: i32, m: bool }"),
        ];
        let layout = merge_fields(&variants).unwrap();

        let count = |key: &str| layout.slots.iter().filter(|s| s.type_key == key).count();
        assert_eq!(count("i32"), 2);
        assert_eq!(count("f32"), 3);
        assert_eq!(count("bool"), 1);
        assert_eq!(layout.len(), 6);
    }

    #[test]
    fn test_slot_never_claimed_twice_by_one_variant() {
        let variants = [
            variant("struct A { a: i32 }"),
            variant("struct B { x: i32, y: i32 }"),
        ];
        let layout = merge_fields(&variants).unwrap();

        let b: Vec<_> = layout.fields_of("B").map(|(f, s)| (f, s.index)).collect();
        assert_eq!(b, [("x", 0), ("y", 1)]);
        assert_eq!(layout.slots[0].users.len(), 2);
        assert_eq!(layout.slots[1].users.len(), 1);
    }

    #[test]
    fn test_types_match_exactly() {
        let variants = [
            variant("struct A { a: Option<i32> }"),
            variant("struct B { b: Option < i32 >, c: Option<u32> }"),
        ];
        let layout = merge_fields(&variants).unwrap();
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.slots[0].name, "option_i32_0");
        assert_eq!(layout.slots[1].name, "option_u32_1");
    }

    #[test]
    fn test_zero_field_variant_claims_nothing() {
        let variants = [variant("struct Empty;"), variant("struct One { v: u8 }")];
        let layout = merge_fields(&variants).unwrap();
        assert_eq!(layout.fields_of("Empty").count(), 0);
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let variants = [
            variant("struct A { a: i32, b: f32 }"),
            variant("struct B { c: f32, d: i32, e: i32 }"),
        ];
        let first: Vec<_> = merge_fields(&variants).unwrap().slots.into_iter().map(|s| s.name).collect();
        let second: Vec<_> = merge_fields(&variants).unwrap().slots.into_iter().map(|s| s.name).collect();
        assert_eq!(first, second);
        assert_eq!(first, ["i32_0", "f32_1", "i32_2"]);
    }

    #[test]
    fn test_duplicate_variant_names_rejected() {
        let variants = [variant("struct A;"), variant("struct A { x: i32 }")];
        assert!(merge_fields(&variants).is_err());
    }
}
