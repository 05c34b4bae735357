//! Synthesized default values for error types.
//!
//! When a handler declares an error type but no `#[api_error]` code, and
//! `synthesize_error_codes` is configured, a placeholder value is built from the
//! type's structure so the rendered documentation still shows a concrete sample.

use crate::index::SourceIndex;
use crate::inspector::TypeRef;
use serde_json::{json, Value};
use std::collections::HashSet;

/// Builds placeholder values from type structure: built-ins come from a fixed
/// table, structural types are synthesized field by field.
pub struct DefaultValueProvider<'a> {
    index: &'a SourceIndex,
}

impl<'a> DefaultValueProvider<'a> {
    pub fn new(index: &'a SourceIndex) -> DefaultValueProvider<'a> {
        DefaultValueProvider { index }
    }

    pub fn default_for(&self, type_name: &str) -> Value {
        let mut in_progress = HashSet::new();
        self.default_for_inner(type_name, &mut in_progress)
    }

    fn default_for_inner(&self, type_name: &str, in_progress: &mut HashSet<String>) -> Value {
        if let Some(value) = builtin_default(type_name) {
            return value;
        }
        // A self-referencing type yields null at the cycle point
        if !in_progress.insert(type_name.to_string()) {
            return Value::Null;
        }
        let value = self.structural_default(type_name, in_progress);
        in_progress.remove(type_name);
        value
    }

    fn structural_default(&self, type_name: &str, in_progress: &mut HashSet<String>) -> Value {
        if let Some(item_enum) = self.index.enum_def(type_name) {
            return match item_enum.variants.first() {
                Some(variant) => Value::String(variant.ident.to_string()),
                None => Value::Null,
            };
        }
        let Some(item_struct) = self.index.struct_def(type_name) else {
            return Value::Null;
        };
        match &item_struct.fields {
            syn::Fields::Unit => json!({}),
            syn::Fields::Named(fields) => {
                let mut object = serde_json::Map::new();
                for field in &fields.named {
                    let Some(ident) = &field.ident else { continue };
                    object.insert(
                        ident.to_string(),
                        self.field_default(&field.ty, in_progress),
                    );
                }
                Value::Object(object)
            }
            syn::Fields::Unnamed(fields) => Value::Array(
                fields
                    .unnamed
                    .iter()
                    .map(|field| self.field_default(&field.ty, in_progress))
                    .collect(),
            ),
        }
    }

    fn field_default(&self, ty: &syn::Type, in_progress: &mut HashSet<String>) -> Value {
        let type_ref = TypeRef::from_syn(ty);
        if type_ref.is_collection() {
            return Value::Array(Vec::new());
        }
        if type_ref.is_map() {
            return json!({});
        }
        self.default_for_inner(&type_ref.name, in_progress)
    }
}

/// Fixed defaults for built-in types.
fn builtin_default(type_name: &str) -> Option<Value> {
    match type_name {
        "String" | "str" => Some(Value::String("DEFAULT".to_string())),
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" => Some(json!(10)),
        "f32" | "f64" | "Decimal" | "BigDecimal" => Some(json!(3.14159)),
        "bool" => Some(json!(true)),
        "char" => Some(Value::String("Z".to_string())),
        "()" => Some(Value::Null),
        _ => None,
    }
}
