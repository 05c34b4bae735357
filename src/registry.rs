//! The data type registry.
//!
//! Central store of every structural payload type the operations reference.
//! Registration is recursive and memoized: a type is introspected exactly once
//! per run, nested structural types are registered on first sight, and a type
//! observed again while its own registration is still in progress (a
//! self-reference) returns immediately instead of recursing.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::SourceIndex;
use crate::inspector::{is_builtin, scalar_display_name, TypeRef};
use crate::metadata::{
    find_attr, has_attr, is_deprecated, string_list, EnumDescriptionMeta, IgnoreMeta,
    MapDescriptionMeta, ModelMeta, PropertyMeta, SerdeMeta, UNORDERED,
};
use crate::model::{DataType, EnumValue, Property};
use crate::reporter::CoverageReporter;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegistrationStatus {
    InProgress,
    Complete,
}

/// Registry of introspected data types, keyed by display name (the type name
/// with the configured suffix stripped).
pub struct DataTypeRegistry<'a> {
    index: &'a SourceIndex,
    config: &'a Config,
    status: HashMap<String, RegistrationStatus>,
    types: BTreeMap<String, DataType>,
}

impl<'a> DataTypeRegistry<'a> {
    pub fn new(index: &'a SourceIndex, config: &'a Config) -> DataTypeRegistry<'a> {
        DataTypeRegistry {
            index,
            config,
            status: HashMap::new(),
            types: BTreeMap::new(),
        }
    }

    pub fn lookup(&self, display_name: &str) -> Option<&DataType> {
        self.types.get(display_name)
    }

    /// All registered types, ordered by display name.
    pub fn data_types(&self) -> &BTreeMap<String, DataType> {
        &self.types
    }

    /// Display name of a type: the configured data type suffix is stripped.
    pub fn display_name(&self, type_name: &str) -> String {
        self.config.strip_data_type_suffix(type_name).to_string()
    }

    /// Registers a structural type and, transitively, every structural type its
    /// properties reference. Idempotent; built-ins, enums, unit structs and
    /// unknown (opaque) types never get a record.
    pub fn register(&mut self, type_name: &str, reporter: &mut CoverageReporter) -> Result<()> {
        if is_builtin(type_name) || self.index.is_enum(type_name) {
            return Ok(());
        }
        // Already complete, or in progress further up the stack (a
        // self-reference): either way, return without recursing
        if self.status.contains_key(type_name) {
            return Ok(());
        }
        let Some(item_struct) = self.index.struct_def(type_name) else {
            warn!("Type {} not found in the scanned sources, treating as opaque", type_name);
            self.status
                .insert(type_name.to_string(), RegistrationStatus::Complete);
            return Ok(());
        };
        if matches!(item_struct.fields, syn::Fields::Unit) {
            self.status
                .insert(type_name.to_string(), RegistrationStatus::Complete);
            return Ok(());
        }

        debug!("Registering data type {}", type_name);
        self.status
            .insert(type_name.to_string(), RegistrationStatus::InProgress);

        let model = ModelMeta::from_attrs(&item_struct.attrs)?.unwrap_or_default();
        let mut data_type = DataType {
            name: self.display_name(type_name),
            alias: model.alias.clone(),
            list: false,
            nulls_in_sample: model.nulls_in_sample,
            properties: Vec::new(),
        };

        // Ancestor fields first, then the type's own
        for ancestor in self.ancestry(type_name)? {
            self.collect_properties(&ancestor, &mut data_type, reporter)?;
        }

        self.apply_property_order(type_name, &mut data_type);
        data_type.sort_properties();

        self.status
            .insert(type_name.to_string(), RegistrationStatus::Complete);
        self.types.insert(data_type.name.clone(), data_type);
        Ok(())
    }

    /// Fabricates a wrapper type `XList` holding a single list-of-X property,
    /// then registers X itself. Returns the wrapper's display name.
    pub fn register_list_stub(
        &mut self,
        element_name: &str,
        reporter: &mut CoverageReporter,
    ) -> Result<String> {
        let element_display = self.display_name(element_name);
        let stub_name = format!("{}List", element_display);
        if !self.types.contains_key(&stub_name) {
            let stub = DataType {
                name: stub_name.clone(),
                alias: None,
                list: true,
                nulls_in_sample: true,
                properties: vec![Property {
                    name: element_display.to_lowercase(),
                    description: format!("List of {}", element_display),
                    type_name: element_display.clone(),
                    list: true,
                    required: true,
                    ..Property::default()
                }],
            };
            self.types.insert(stub_name.clone(), stub);
        }
        self.register(element_name, reporter)?;
        Ok(stub_name)
    }

    /// The `extends` chain of a type, oldest ancestor first, ending with the
    /// type itself. The walk stops before the configured base type; when a base
    /// type is configured, a chain that never reaches it is a fatal error.
    fn ancestry(&self, type_name: &str) -> Result<Vec<String>> {
        let mut chain = vec![type_name.to_string()];
        let mut current = type_name.to_string();
        loop {
            let item_struct = self.index.struct_def(&current).ok_or_else(|| {
                Error::Consistency(format!(
                    "ancestor {} of {} not found in the scanned sources",
                    current, type_name
                ))
            })?;
            let model = ModelMeta::from_attrs(&item_struct.attrs)?.unwrap_or_default();
            match model.extends {
                Some(parent) => {
                    if self.config.has_base_type() && parent == self.config.base_type_name {
                        break;
                    }
                    if chain.contains(&parent) {
                        return Err(Error::Consistency(format!(
                            "circular extends chain at {} starting from {}",
                            parent, type_name
                        )));
                    }
                    chain.push(parent.clone());
                    current = parent;
                }
                None => {
                    if self.config.has_base_type() {
                        return Err(Error::Consistency(format!(
                            "type {} does not reach the configured base type {}",
                            type_name, self.config.base_type_name
                        )));
                    }
                    break;
                }
            }
        }
        chain.reverse();
        Ok(chain)
    }

    /// Collects the properties declared on one member of the chain into the
    /// record of the most-derived type. Coverage is recorded against the
    /// declaring member.
    fn collect_properties(
        &mut self,
        member: &str,
        data_type: &mut DataType,
        reporter: &mut CoverageReporter,
    ) -> Result<()> {
        let Some(item_struct) = self.index.struct_def(member) else {
            return Ok(());
        };
        let syn::Fields::Named(fields) = item_struct.fields.clone() else {
            return Ok(());
        };

        for field in &fields.named {
            let Some(ident) = &field.ident else { continue };
            let field_name = ident.to_string();
            let serde = SerdeMeta::from_attrs(&field.attrs);

            if serde.skip {
                reporter.add_ignored_field(member, &field_name);
                continue;
            }
            if let Some(ignore) = IgnoreMeta::from_attrs(&field.attrs)? {
                ignore.verify_not_expired(&format!("field {}.{}", member, field_name))?;
                reporter.add_ignored_field(member, &field_name);
                continue;
            }

            // Documentation source priority: field, then getter, then setter
            let getter = self.index.method(member, &field_name);
            let setter = self.index.method(member, &format!("set_{}", field_name));
            let meta = PropertyMeta::from_attrs(&field.attrs)?
                .or(match getter {
                    Some(m) => PropertyMeta::from_attrs(&m.attrs)?,
                    None => None,
                })
                .or(match setter {
                    Some(m) => PropertyMeta::from_attrs(&m.attrs)?,
                    None => None,
                });
            let Some(meta) = meta else {
                reporter.add_undocumented_field(member, &field_name);
                continue;
            };
            reporter.add_documented_field(member, &field_name);

            let sample = match find_attr(&field.attrs, "sample")
                .or_else(|| getter.and_then(|m| find_attr(&m.attrs, "sample")))
            {
                Some(attr) => string_list(attr)?,
                None => Vec::new(),
            };

            let mut property = Property {
                order: meta.order,
                name: serde.rename.clone().unwrap_or_else(|| field_name.clone()),
                description: meta.description.clone(),
                sample,
                add_enum_values: meta.enum_values,
                required: meta.required
                    || has_attr(&field.attrs, "not_null")
                    || has_attr(&field.attrs, "not_empty")
                    || has_attr(&field.attrs, "not_blank"),
                request: !meta.only_response && !serde.skip_deserializing,
                response: !meta.only_request && !serde.skip_serializing,
                deprecated: is_deprecated(&field.attrs),
                ..Property::default()
            };

            let field_type = TypeRef::from_syn(&field.ty);
            self.resolve_property_type(&mut property, &field_type, &meta, reporter)?;

            if let Some(map_meta) = MapDescriptionMeta::from_attrs(&field.attrs)? {
                property.map_key_description = map_meta.key_description;
                property.map_value_description = map_meta.value_description;
            }

            data_type.properties.push(property);
        }

        self.collect_accessor_properties(member, &fields, data_type, reporter)?;
        Ok(())
    }

    /// Accessor-only (computed) properties: impl-block methods carrying
    /// `#[property]` without a backing field of the same name.
    fn collect_accessor_properties(
        &mut self,
        member: &str,
        fields: &syn::FieldsNamed,
        data_type: &mut DataType,
        reporter: &mut CoverageReporter,
    ) -> Result<()> {
        let field_names: BTreeSet<String> = fields
            .named
            .iter()
            .filter_map(|f| f.ident.as_ref().map(|i| i.to_string()))
            .collect();

        let methods: Vec<(String, syn::ImplItemFn)> = self
            .index
            .methods(member)
            .into_iter()
            .filter(|m| has_attr(&m.attrs, "property"))
            .map(|m| (m.sig.ident.to_string(), m.clone()))
            .collect();

        for (method_name, method) in methods {
            if field_names.contains(&method_name) || method_name.starts_with("set_") {
                continue;
            }
            let Some(meta) = PropertyMeta::from_attrs(&method.attrs)? else {
                continue;
            };
            let syn::ReturnType::Type(_, return_type) = &method.sig.output else {
                warn!(
                    "Computed property {}.{} has no return type, skipping",
                    member, method_name
                );
                continue;
            };
            reporter.add_documented_field(member, &method_name);

            let sample = match find_attr(&method.attrs, "sample") {
                Some(attr) => string_list(attr)?,
                None => Vec::new(),
            };
            let mut property = Property {
                order: meta.order,
                name: method_name,
                description: meta.description.clone(),
                sample,
                add_enum_values: meta.enum_values,
                required: meta.required,
                request: !meta.only_response,
                response: !meta.only_request,
                deprecated: is_deprecated(&method.attrs),
                ..Property::default()
            };
            let return_ref = TypeRef::from_syn(return_type);
            self.resolve_property_type(&mut property, &return_ref, &meta, reporter)?;
            data_type.properties.push(property);
        }
        Ok(())
    }

    /// Resolves the display type of a property from its declared Rust type,
    /// registering nested structural types along the way.
    fn resolve_property_type(
        &mut self,
        property: &mut Property,
        field_type: &TypeRef,
        meta: &PropertyMeta,
        reporter: &mut CoverageReporter,
    ) -> Result<()> {
        let target = if field_type.is_map() {
            property.map = true;
            field_type.element_type()
        } else if field_type.is_collection() {
            property.list = true;
            field_type.element_type()
        } else {
            Some(field_type)
        };

        if let Some(override_name) = &meta.data_type {
            property.type_name = override_name.clone();
            return Ok(());
        }

        let Some(target) = target else {
            // Raw collection or map without type arguments: opaque
            property.type_name = "Object".to_string();
            return Ok(());
        };

        if self.index.is_enum(&target.name) {
            property.type_name = "String".to_string();
            if property.add_enum_values {
                property.enum_values = self.enum_values(&target.name)?;
            }
        } else if is_builtin(&target.name) {
            property.type_name = scalar_display_name(&target.name).to_string();
        } else {
            property.type_name = self.display_name(&target.name);
            self.register(&target.name, reporter)?;
        }
        Ok(())
    }

    fn enum_values(&self, enum_name: &str) -> Result<BTreeSet<EnumValue>> {
        let mut values = BTreeSet::new();
        let Some(item_enum) = self.index.enum_def(enum_name) else {
            return Ok(values);
        };
        for variant in &item_enum.variants {
            let meta = EnumDescriptionMeta::from_attrs(&variant.attrs)?;
            let (order, description) = match meta {
                Some(m) => (m.order, m.description),
                None => (UNORDERED, String::new()),
            };
            values.insert(EnumValue {
                order,
                value: variant.ident.to_string(),
                description,
            });
        }
        Ok(values)
    }

    /// `#[property_order("a", "b", ...)]` on the registered struct reassigns
    /// sequential orders; names without a matching property are logged.
    fn apply_property_order(&self, type_name: &str, data_type: &mut DataType) {
        let Some(item_struct) = self.index.struct_def(type_name) else {
            return;
        };
        let Some(attr) = find_attr(&item_struct.attrs, "property_order") else {
            return;
        };
        let names = match string_list(attr) {
            Ok(names) => names,
            Err(e) => {
                warn!("Malformed property_order on {}: {}", type_name, e);
                return;
            }
        };
        for (position, name) in names.iter().enumerate() {
            match data_type.property_by_name_mut(name) {
                Some(property) => property.order = position as u32,
                None => warn!(
                    "property_order on {} names unknown property '{}'",
                    type_name, name
                ),
            }
        }
    }
}
