use crate::metadata::has_attr;
use crate::parser::ParsedFile;
use log::debug;
use std::collections::HashMap;

/// Lookup tables over the parsed sources.
///
/// Built in a single pass over all files; afterwards every struct, enum and
/// inherent impl block is reachable by type name without rescanning. This is
/// the static replacement for runtime reflection: given a type name, the index
/// yields its definition, its ordered fields, and its impl-block methods
/// (the "accessors").
pub struct SourceIndex {
    files: Vec<ParsedFile>,
    structs: HashMap<String, ItemLocation>,
    enums: HashMap<String, ItemLocation>,
    impls: HashMap<String, Vec<ItemLocation>>,
    /// Struct names in scan order, for deterministic controller discovery
    struct_order: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct ItemLocation {
    file: usize,
    item: usize,
}

impl SourceIndex {
    pub fn new(files: Vec<ParsedFile>) -> SourceIndex {
        let mut structs = HashMap::new();
        let mut enums = HashMap::new();
        let mut impls: HashMap<String, Vec<ItemLocation>> = HashMap::new();
        let mut struct_order = Vec::new();

        for (file_idx, file) in files.iter().enumerate() {
            for (item_idx, item) in file.syntax_tree.items.iter().enumerate() {
                let location = ItemLocation {
                    file: file_idx,
                    item: item_idx,
                };
                match item {
                    syn::Item::Struct(item_struct) => {
                        let name = item_struct.ident.to_string();
                        struct_order.push(name.clone());
                        structs.insert(name, location);
                    }
                    syn::Item::Enum(item_enum) => {
                        enums.insert(item_enum.ident.to_string(), location);
                    }
                    syn::Item::Impl(item_impl) if item_impl.trait_.is_none() => {
                        if let Some(name) = impl_self_type(item_impl) {
                            impls.entry(name).or_default().push(location);
                        }
                    }
                    _ => {}
                }
            }
        }

        debug!(
            "Indexed {} structs, {} enums, {} impl targets across {} files",
            structs.len(),
            enums.len(),
            impls.len(),
            files.len()
        );

        SourceIndex {
            files,
            structs,
            enums,
            impls,
            struct_order,
        }
    }

    fn item(&self, location: ItemLocation) -> &syn::Item {
        &self.files[location.file].syntax_tree.items[location.item]
    }

    pub fn struct_def(&self, name: &str) -> Option<&syn::ItemStruct> {
        let location = *self.structs.get(name)?;
        match self.item(location) {
            syn::Item::Struct(item_struct) => Some(item_struct),
            _ => None,
        }
    }

    pub fn enum_def(&self, name: &str) -> Option<&syn::ItemEnum> {
        let location = *self.enums.get(name)?;
        match self.item(location) {
            syn::Item::Enum(item_enum) => Some(item_enum),
            _ => None,
        }
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    /// All inherent impl blocks for a type, in scan order.
    pub fn impl_blocks(&self, name: &str) -> Vec<&syn::ItemImpl> {
        self.impls
            .get(name)
            .map(|locations| {
                locations
                    .iter()
                    .filter_map(|&location| match self.item(location) {
                        syn::Item::Impl(item_impl) => Some(item_impl),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All methods declared in the type's inherent impl blocks, in scan order.
    pub fn methods(&self, name: &str) -> Vec<&syn::ImplItemFn> {
        self.impl_blocks(name)
            .into_iter()
            .flat_map(|block| {
                block.items.iter().filter_map(|item| match item {
                    syn::ImplItem::Fn(method) => Some(method),
                    _ => None,
                })
            })
            .collect()
    }

    /// Finds one method of a type by name.
    pub fn method(&self, type_name: &str, method_name: &str) -> Option<&syn::ImplItemFn> {
        self.methods(type_name)
            .into_iter()
            .find(|m| m.sig.ident == method_name)
    }

    /// Struct names carrying a given marker attribute, in scan order.
    pub fn structs_with_attr(&self, attr_name: &str) -> Vec<&str> {
        self.struct_order
            .iter()
            .filter(|name| {
                self.struct_def(name)
                    .map(|def| has_attr(&def.attrs, attr_name))
                    .unwrap_or(false)
            })
            .map(String::as_str)
            .collect()
    }
}

fn impl_self_type(item_impl: &syn::ItemImpl) -> Option<String> {
    if let syn::Type::Path(type_path) = item_impl.self_ty.as_ref() {
        type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
    } else {
        None
    }
}
