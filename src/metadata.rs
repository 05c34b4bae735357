//! Declarative documentation metadata, read from attributes in the scanned
//! sources.
//!
//! This module is the attribute vocabulary of the tool: every descriptor here
//! corresponds to one attribute (`#[domain]`, `#[operation]`, `#[property]`,
//! ...) attached to a controller struct, an impl-block method, a value-object
//! field or an enum variant. Parsing is strict — a malformed attribute is a
//! consistency error, not something to guess around.

use crate::error::{Error, Result};
use syn::punctuated::Punctuated;
use syn::{Attribute, Meta, Token};

/// Property order sentinel: "unordered, sort last".
pub const UNORDERED: u32 = u32::MAX;

/// A parsed attribute argument list, keyed by argument name.
///
/// Supports the three argument forms used throughout the vocabulary:
/// `key = "value"`, `key = 42` / `key = true`, and bare flags (`rest`).
#[derive(Debug, Default)]
pub struct MetaMap {
    entries: Vec<(String, MetaValue)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Flag,
}

impl MetaMap {
    /// Parses the arguments of an attribute like `#[domain(name = "X", order = 1)]`.
    /// An attribute without arguments yields an empty map.
    pub fn from_attr(attr: &Attribute) -> Result<MetaMap> {
        let mut entries = Vec::new();
        if matches!(attr.meta, Meta::Path(_)) {
            return Ok(MetaMap { entries });
        }
        let metas = attr
            .parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
            .map_err(|e| {
                Error::Consistency(format!("malformed attribute {}: {}", attr_name(attr), e))
            })?;
        for meta in metas {
            match meta {
                Meta::Path(path) => {
                    entries.push((path_name(&path), MetaValue::Flag));
                }
                Meta::NameValue(nv) => {
                    let value = lit_value(&nv.value).ok_or_else(|| {
                        Error::Consistency(format!(
                            "unsupported value for '{}' in attribute {}",
                            path_name(&nv.path),
                            attr_name(attr)
                        ))
                    })?;
                    entries.push((path_name(&nv.path), value));
                }
                Meta::List(list) => {
                    return Err(Error::Consistency(format!(
                        "unexpected nested list '{}' in attribute {}",
                        path_name(&list.path),
                        attr_name(attr)
                    )));
                }
            }
        }
        Ok(MetaMap { entries })
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.entries.iter().find_map(|(k, v)| match v {
            MetaValue::Str(s) if k == key => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn str_or_empty(&self, key: &str) -> String {
        self.str(key).unwrap_or_default().to_string()
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.entries.iter().find_map(|(k, v)| match v {
            MetaValue::Int(i) if k == key => Some(*i),
            _ => None,
        })
    }

    /// True for both `key` flags and `key = true`.
    pub fn bool(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, v)| {
            k == key && matches!(v, MetaValue::Flag | MetaValue::Bool(true))
        })
    }

    /// Explicit boolean value, honoring `key = false` overrides of defaults.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.entries
            .iter()
            .find_map(|(k, v)| match v {
                MetaValue::Bool(b) if k == key => Some(*b),
                MetaValue::Flag if k == key => Some(true),
                _ => None,
            })
            .unwrap_or(default)
    }
}

fn lit_value(expr: &syn::Expr) -> Option<MetaValue> {
    if let syn::Expr::Lit(lit) = expr {
        match &lit.lit {
            syn::Lit::Str(s) => return Some(MetaValue::Str(s.value())),
            syn::Lit::Int(i) => return i.base10_parse::<i64>().ok().map(MetaValue::Int),
            syn::Lit::Bool(b) => return Some(MetaValue::Bool(b.value())),
            _ => {}
        }
    }
    None
}

fn path_name(path: &syn::Path) -> String {
    path.segments
        .last()
        .map(|s| s.ident.to_string())
        .unwrap_or_default()
}

pub fn attr_name(attr: &Attribute) -> String {
    path_name(attr.path())
}

pub fn find_attr<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|a| a.path().is_ident(name))
}

pub fn find_attrs<'a>(attrs: &'a [Attribute], name: &str) -> Vec<&'a Attribute> {
    attrs.iter().filter(|a| a.path().is_ident(name)).collect()
}

pub fn has_attr(attrs: &[Attribute], name: &str) -> bool {
    find_attr(attrs, name).is_some()
}

pub fn is_deprecated(attrs: &[Attribute]) -> bool {
    has_attr(attrs, "deprecated")
}

/// Parses a string-list attribute like `#[sample("a", "b")]`.
pub fn string_list(attr: &Attribute) -> Result<Vec<String>> {
    let lits = attr
        .parse_args_with(Punctuated::<syn::LitStr, Token![,]>::parse_terminated)
        .map_err(|e| {
            Error::Consistency(format!("malformed attribute {}: {}", attr_name(attr), e))
        })?;
    Ok(lits.into_iter().map(|l| l.value()).collect())
}

/// `#[api_controller(path = "...", rest, is_abstract, extends = "...")]`
#[derive(Debug, Clone, Default)]
pub struct ControllerMeta {
    pub path: String,
    pub rest: bool,
    pub is_abstract: bool,
    pub extends: Option<String>,
}

impl ControllerMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Option<ControllerMeta>> {
        let Some(attr) = find_attr(attrs, "api_controller") else {
            return Ok(None);
        };
        let map = MetaMap::from_attr(attr)?;
        Ok(Some(ControllerMeta {
            path: map.str_or_empty("path"),
            rest: map.bool("rest"),
            is_abstract: map.bool("is_abstract"),
            extends: map.str("extends").map(str::to_string),
        }))
    }
}

/// `#[domain(name = "...", order = N, ...)]` plus the optional `#[sub_domain]`,
/// repeatable `#[api_error]` and `#[external_doc]` attributes on the same item.
#[derive(Debug, Clone)]
pub struct DomainMeta {
    pub name: String,
    pub order: u32,
    pub short_description: String,
    pub description: String,
    pub sub_domain: Option<SubDomainMeta>,
    pub errors: Vec<ErrorMeta>,
    pub external_docs: Vec<ExternalDocMeta>,
}

#[derive(Debug, Clone)]
pub struct SubDomainMeta {
    pub name: String,
    pub order: u32,
    pub short_description: String,
    pub description: String,
    pub external_docs: Vec<ExternalDocMeta>,
}

impl DomainMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Option<DomainMeta>> {
        let Some(attr) = find_attr(attrs, "domain") else {
            return Ok(None);
        };
        let map = MetaMap::from_attr(attr)?;
        let name = map
            .str("name")
            .ok_or_else(|| Error::Consistency("domain attribute without a name".to_string()))?
            .to_string();

        let sub_domain = match find_attr(attrs, "sub_domain") {
            Some(sub_attr) => {
                let sub = MetaMap::from_attr(sub_attr)?;
                Some(SubDomainMeta {
                    name: sub.str("name").unwrap_or_default().to_string(),
                    order: sub.int("order").unwrap_or(0) as u32,
                    short_description: sub.str_or_empty("short_description"),
                    description: sub.str_or_empty("description"),
                    external_docs: Vec::new(),
                })
            }
            None => None,
        };

        Ok(Some(DomainMeta {
            name,
            order: map.int("order").unwrap_or(0) as u32,
            short_description: map.str_or_empty("short_description"),
            description: map.str_or_empty("description"),
            sub_domain: sub_domain.filter(|s| !s.name.is_empty()),
            errors: ErrorMeta::from_attrs(attrs)?,
            external_docs: ExternalDocMeta::from_attrs(attrs)?,
        }))
    }
}

/// `#[api_error(status = N, code = "...", description = "...", ignore)]`
#[derive(Debug, Clone)]
pub struct ErrorMeta {
    pub status: u16,
    pub code: String,
    pub description: String,
    pub ignore: bool,
}

impl ErrorMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Vec<ErrorMeta>> {
        let mut errors = Vec::new();
        for attr in find_attrs(attrs, "api_error") {
            let map = MetaMap::from_attr(attr)?;
            errors.push(ErrorMeta {
                status: map.int("status").unwrap_or(500) as u16,
                code: map.str_or_empty("code"),
                description: map.str_or_empty("description"),
                ignore: map.bool("ignore"),
            });
        }
        Ok(errors)
    }
}

/// `#[external_doc(location = "...", position = "top"|"bottom")]`
#[derive(Debug, Clone)]
pub struct ExternalDocMeta {
    pub location: String,
    pub position: InsertPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Top,
    Bottom,
}

impl ExternalDocMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Vec<ExternalDocMeta>> {
        let mut docs = Vec::new();
        for attr in find_attrs(attrs, "external_doc") {
            let map = MetaMap::from_attr(attr)?;
            let position = match map.str("position") {
                Some("bottom") => InsertPosition::Bottom,
                _ => InsertPosition::Top,
            };
            docs.push(ExternalDocMeta {
                location: map.str_or_empty("location"),
                position,
            });
        }
        Ok(docs)
    }
}

/// `#[route(method = "GET", path = "...")]`
#[derive(Debug, Clone)]
pub struct RouteMeta {
    pub method: String,
    pub path: String,
}

impl RouteMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Option<RouteMeta>> {
        let Some(attr) = find_attr(attrs, "route") else {
            return Ok(None);
        };
        let map = MetaMap::from_attr(attr)?;
        Ok(Some(RouteMeta {
            method: map.str_or_empty("method"),
            path: map.str_or_empty("path"),
        }))
    }
}

/// `#[operation(order = N, description = "...", nickname = "...", notes = "...")]`
#[derive(Debug, Clone)]
pub struct OperationMeta {
    pub order: u32,
    pub description: String,
    pub short_description: String,
    pub nickname: String,
    pub notes: String,
    pub static_request_sample: String,
    pub external_docs: Vec<ExternalDocMeta>,
}

impl OperationMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Option<OperationMeta>> {
        let Some(attr) = find_attr(attrs, "operation") else {
            return Ok(None);
        };
        let map = MetaMap::from_attr(attr)?;
        Ok(Some(OperationMeta {
            order: map.int("order").unwrap_or(0) as u32,
            description: map.str_or_empty("description"),
            short_description: map.str_or_empty("short_description"),
            nickname: map.str_or_empty("nickname"),
            notes: map.str_or_empty("notes"),
            static_request_sample: map.str_or_empty("static_request_sample"),
            external_docs: ExternalDocMeta::from_attrs(attrs)?,
        }))
    }
}

/// `#[param_doc(name = "...", description = "...", data_type = "...", ignore)]`
#[derive(Debug, Clone)]
pub struct ParamDocMeta {
    pub name: String,
    pub description: String,
    pub data_type: Option<String>,
    pub ignore: bool,
}

impl ParamDocMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Vec<ParamDocMeta>> {
        let mut docs = Vec::new();
        for attr in find_attrs(attrs, "param_doc") {
            let map = MetaMap::from_attr(attr)?;
            let name = map.str("name").ok_or_else(|| {
                Error::Consistency("param_doc attribute without a name".to_string())
            })?;
            docs.push(ParamDocMeta {
                name: name.to_string(),
                description: map.str_or_empty("description"),
                data_type: map.str("data_type").map(str::to_string),
                ignore: map.bool("ignore"),
            });
        }
        Ok(docs)
    }
}

/// `#[response(description = "...", data_type = "...", static_sample = "...")]`
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub description: String,
    pub data_type: Option<String>,
    pub static_sample: String,
    pub simple_type_description: String,
}

impl ResponseMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Option<ResponseMeta>> {
        let Some(attr) = find_attr(attrs, "response") else {
            return Ok(None);
        };
        let map = MetaMap::from_attr(attr)?;
        Ok(Some(ResponseMeta {
            description: map.str_or_empty("description"),
            data_type: map.str("data_type").map(str::to_string),
            static_sample: map.str_or_empty("static_sample"),
            simple_type_description: map.str_or_empty("simple_type_description"),
        }))
    }
}

/// `#[status(code = N, reason = "...")]`
#[derive(Debug, Clone)]
pub struct StatusMeta {
    pub code: u16,
    pub reason: String,
}

impl StatusMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Option<StatusMeta>> {
        let Some(attr) = find_attr(attrs, "status") else {
            return Ok(None);
        };
        let map = MetaMap::from_attr(attr)?;
        Ok(Some(StatusMeta {
            code: map.int("code").unwrap_or(200) as u16,
            reason: map.str_or_empty("reason"),
        }))
    }
}

/// `#[error_handler(exception = "...", status = N)]`
#[derive(Debug, Clone)]
pub struct ErrorHandlerMeta {
    pub exception: String,
    pub status: Option<u16>,
}

impl ErrorHandlerMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Option<ErrorHandlerMeta>> {
        let Some(attr) = find_attr(attrs, "error_handler") else {
            return Ok(None);
        };
        let map = MetaMap::from_attr(attr)?;
        let exception = map.str("exception").ok_or_else(|| {
            Error::Consistency("error_handler attribute without an exception".to_string())
        })?;
        Ok(Some(ErrorHandlerMeta {
            exception: exception.to_string(),
            status: map.int("status").map(|s| s as u16),
        }))
    }
}

/// `#[ignore_doc(reason = "...", until = "dd.MM.yyyy")]`
#[derive(Debug, Clone)]
pub struct IgnoreMeta {
    pub reason: String,
    pub until: Option<String>,
}

impl IgnoreMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Option<IgnoreMeta>> {
        let Some(attr) = find_attr(attrs, "ignore_doc") else {
            return Ok(None);
        };
        let map = MetaMap::from_attr(attr)?;
        Ok(Some(IgnoreMeta {
            reason: map.str_or_empty("reason"),
            until: map.str("until").map(str::to_string),
        }))
    }
}

/// `#[api_model(extends = "...", alias = "...", nulls_in_sample = false)]`
#[derive(Debug, Clone, Default)]
pub struct ModelMeta {
    pub extends: Option<String>,
    pub alias: Option<String>,
    pub nulls_in_sample: bool,
}

impl ModelMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Option<ModelMeta>> {
        let Some(attr) = find_attr(attrs, "api_model") else {
            return Ok(None);
        };
        let map = MetaMap::from_attr(attr)?;
        Ok(Some(ModelMeta {
            extends: map.str("extends").map(str::to_string),
            alias: map.str("alias").map(str::to_string),
            nulls_in_sample: map.bool_or("nulls_in_sample", true),
        }))
    }
}

/// `#[property(order = N, description = "...", data_type = "...", required, ...)]`
#[derive(Debug, Clone)]
pub struct PropertyMeta {
    pub order: u32,
    pub description: String,
    pub data_type: Option<String>,
    pub required: bool,
    pub only_request: bool,
    pub only_response: bool,
    pub enum_values: bool,
}

impl PropertyMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Option<PropertyMeta>> {
        let Some(attr) = find_attr(attrs, "property") else {
            return Ok(None);
        };
        let map = MetaMap::from_attr(attr)?;
        Ok(Some(PropertyMeta {
            order: map.int("order").map(|o| o as u32).unwrap_or(UNORDERED),
            description: map.str_or_empty("description"),
            data_type: map.str("data_type").map(str::to_string),
            required: map.bool("required"),
            only_request: map.bool("only_request"),
            only_response: map.bool("only_response"),
            enum_values: map.bool_or("enum_values", true),
        }))
    }
}

/// `#[map_description(key = "...", value = "...")]`
#[derive(Debug, Clone)]
pub struct MapDescriptionMeta {
    pub key_description: String,
    pub value_description: String,
}

impl MapDescriptionMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Option<MapDescriptionMeta>> {
        let Some(attr) = find_attr(attrs, "map_description") else {
            return Ok(None);
        };
        let map = MetaMap::from_attr(attr)?;
        Ok(Some(MapDescriptionMeta {
            key_description: map.str_or_empty("key"),
            value_description: map.str_or_empty("value"),
        }))
    }
}

/// `#[enum_description(order = N, description = "...")]` on an enum variant
#[derive(Debug, Clone)]
pub struct EnumDescriptionMeta {
    pub order: u32,
    pub description: String,
}

impl EnumDescriptionMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Option<EnumDescriptionMeta>> {
        let Some(attr) = find_attr(attrs, "enum_description") else {
            return Ok(None);
        };
        let map = MetaMap::from_attr(attr)?;
        Ok(Some(EnumDescriptionMeta {
            order: map.int("order").map(|o| o as u32).unwrap_or(UNORDERED),
            description: map.str_or_empty("description"),
        }))
    }
}

/// Handler parameter kind from `#[param(path)]` / `#[param(body)]` /
/// `#[param(query = "name", required = false)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    Path,
    Body,
    Query { name: String, required: bool },
}

impl ParamKind {
    pub fn from_attrs(attrs: &[Attribute]) -> Result<Option<ParamKind>> {
        let Some(attr) = find_attr(attrs, "param") else {
            return Ok(None);
        };
        let map = MetaMap::from_attr(attr)?;
        if map.bool("path") {
            return Ok(Some(ParamKind::Path));
        }
        if map.bool("body") {
            return Ok(Some(ParamKind::Body));
        }
        if let Some(name) = map.str("query") {
            return Ok(Some(ParamKind::Query {
                name: name.to_string(),
                required: map.bool_or("required", true),
            }));
        }
        Err(Error::Consistency(
            "param attribute must be one of path, body or query = \"name\"".to_string(),
        ))
    }
}

/// Serde attributes honored on value-object fields: `rename` overrides the
/// property name, the skip family controls applicability.
#[derive(Debug, Clone, Default)]
pub struct SerdeMeta {
    pub rename: Option<String>,
    pub skip: bool,
    pub skip_serializing: bool,
    pub skip_deserializing: bool,
}

impl SerdeMeta {
    pub fn from_attrs(attrs: &[Attribute]) -> SerdeMeta {
        let mut meta = SerdeMeta::default();
        for attr in find_attrs(attrs, "serde") {
            let Ok(metas) =
                attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
            else {
                continue;
            };
            for inner in metas {
                match inner {
                    Meta::Path(path) => match path_name(&path).as_str() {
                        "skip" => meta.skip = true,
                        "skip_serializing" => meta.skip_serializing = true,
                        "skip_deserializing" => meta.skip_deserializing = true,
                        _ => {}
                    },
                    Meta::NameValue(nv) if path_name(&nv.path) == "rename" => {
                        if let Some(MetaValue::Str(value)) = lit_value(&nv.value) {
                            meta.rename = Some(value);
                        }
                    }
                    _ => {}
                }
            }
        }
        meta
    }
}

impl IgnoreMeta {
    /// Checks the `until = "dd.MM.yyyy"` expiry of an ignore marker. Before the
    /// date the marker is honored; on or after it, ignoring is no longer allowed
    /// and the marker itself becomes a fatal error.
    pub fn verify_not_expired(&self, context: &str) -> Result<()> {
        let Some(until) = &self.until else {
            return Ok(());
        };
        let expiry = chrono::NaiveDate::parse_from_str(until, "%d.%m.%Y").map_err(|e| {
            Error::Consistency(format!(
                "invalid ignore expiry date '{}' on {}: {}",
                until, context, e
            ))
        })?;
        if chrono::Local::now().date_naive() >= expiry {
            return Err(Error::ExpiredIgnore(format!(
                "{} was ignored until {}",
                context, until
            )));
        }
        Ok(())
    }
}

/// Extracts the role from an `#[authorize("...")]` expression with the fixed
/// stripping rules: `hasAnyRole(`, `hasRole(`, quotes and closing parens are
/// removed.
pub fn role_from_authorize(attrs: &[Attribute]) -> Result<String> {
    let Some(attr) = find_attr(attrs, "authorize") else {
        return Ok(String::new());
    };
    let values = string_list(attr)?;
    let Some(expression) = values.first() else {
        return Ok(String::new());
    };
    Ok(expression
        .replace("hasAnyRole(", "")
        .replace("hasRole(", "")
        .replace('\'', "")
        .replace(')', ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn struct_attrs(code: &str) -> Vec<Attribute> {
        let item: syn::ItemStruct = syn::parse_str(code).unwrap();
        item.attrs
    }

    #[test]
    fn test_domain_meta_with_sub_domain_and_errors() {
        let attrs = struct_attrs(
            r#"
            #[domain(name = "Customer", order = 1, short_description = "Customers")]
            #[sub_domain(name = "Address", order = 2, description = "Addresses")]
            #[api_error(status = 404, code = "NOT_FOUND", description = "Customer not found")]
            #[api_error(status = 409, code = "CONFLICT", description = "Already exists")]
            pub struct CustomerControllerDocumentation;
        "#,
        );

        let domain = DomainMeta::from_attrs(&attrs).unwrap().unwrap();
        assert_eq!(domain.name, "Customer");
        assert_eq!(domain.order, 1);
        assert_eq!(domain.short_description, "Customers");

        let sub = domain.sub_domain.unwrap();
        assert_eq!(sub.name, "Address");
        assert_eq!(sub.order, 2);

        assert_eq!(domain.errors.len(), 2);
        assert_eq!(domain.errors[0].status, 404);
        assert_eq!(domain.errors[1].code, "CONFLICT");
    }

    #[test]
    fn test_domain_without_name_is_rejected() {
        let attrs = struct_attrs("#[domain(order = 1)] pub struct X;");
        assert!(matches!(
            DomainMeta::from_attrs(&attrs),
            Err(Error::Consistency(_))
        ));
    }

    #[test]
    fn test_controller_meta_flags() {
        let attrs = struct_attrs(
            r#"#[api_controller(path = "customers", rest, extends = "AbstractController")]
               pub struct CustomerController;"#,
        );
        let meta = ControllerMeta::from_attrs(&attrs).unwrap().unwrap();
        assert_eq!(meta.path, "customers");
        assert!(meta.rest);
        assert!(!meta.is_abstract);
        assert_eq!(meta.extends.as_deref(), Some("AbstractController"));
    }

    #[test]
    fn test_param_kind_variants() {
        let attrs = struct_attrs("#[param(path)] pub struct X;");
        assert_eq!(ParamKind::from_attrs(&attrs).unwrap(), Some(ParamKind::Path));

        let attrs = struct_attrs(r#"#[param(query = "limit", required = false)] pub struct X;"#);
        assert_eq!(
            ParamKind::from_attrs(&attrs).unwrap(),
            Some(ParamKind::Query {
                name: "limit".to_string(),
                required: false,
            })
        );

        let attrs = struct_attrs("#[param(bogus)] pub struct X;");
        assert!(ParamKind::from_attrs(&attrs).is_err());
    }

    #[test]
    fn test_property_meta_defaults() {
        let attrs = struct_attrs(r#"#[property(description = "The name")] pub struct X;"#);
        let meta = PropertyMeta::from_attrs(&attrs).unwrap().unwrap();
        assert_eq!(meta.order, UNORDERED);
        assert!(!meta.required);
        assert!(meta.enum_values);
        assert!(meta.data_type.is_none());
    }

    #[test]
    fn test_model_meta_nulls_in_sample_override() {
        let attrs =
            struct_attrs(r#"#[api_model(extends = "BaseVO", nulls_in_sample = false)] pub struct X;"#);
        let meta = ModelMeta::from_attrs(&attrs).unwrap().unwrap();
        assert_eq!(meta.extends.as_deref(), Some("BaseVO"));
        assert!(!meta.nulls_in_sample);

        let attrs = struct_attrs(r#"#[api_model] pub struct X;"#);
        let meta = ModelMeta::from_attrs(&attrs).unwrap().unwrap();
        assert!(meta.nulls_in_sample);
    }

    #[test]
    fn test_serde_meta() {
        let attrs = struct_attrs(
            r#"#[serde(rename = "customerName", skip_serializing)] pub struct X;"#,
        );
        let meta = SerdeMeta::from_attrs(&attrs);
        assert_eq!(meta.rename.as_deref(), Some("customerName"));
        assert!(meta.skip_serializing);
        assert!(!meta.skip);
    }

    #[test]
    fn test_role_stripping_rules() {
        let attrs = struct_attrs(r#"#[authorize("hasAnyRole('ROLE_ADMIN','ROLE_USER')")] pub struct X;"#);
        assert_eq!(
            role_from_authorize(&attrs).unwrap(),
            "ROLE_ADMIN,ROLE_USER"
        );

        let attrs = struct_attrs(r#"#[authorize("hasRole('ROLE_ADMIN')")] pub struct X;"#);
        assert_eq!(role_from_authorize(&attrs).unwrap(), "ROLE_ADMIN");
    }

    #[test]
    fn test_string_list() {
        let attrs = struct_attrs(r#"#[sample("John", "Jane")] pub struct X;"#);
        assert_eq!(
            string_list(&attrs[0]).unwrap(),
            vec!["John".to_string(), "Jane".to_string()]
        );
    }

    #[test]
    fn test_ignore_expiry() {
        let active = IgnoreMeta {
            reason: String::new(),
            until: Some("01.01.2099".to_string()),
        };
        assert!(active.verify_not_expired("CustomerController").is_ok());

        let expired = IgnoreMeta {
            reason: String::new(),
            until: Some("01.01.2020".to_string()),
        };
        assert!(matches!(
            expired.verify_not_expired("CustomerController"),
            Err(Error::ExpiredIgnore(_))
        ));

        let malformed = IgnoreMeta {
            reason: String::new(),
            until: Some("2020-01-01".to_string()),
        };
        assert!(matches!(
            malformed.verify_not_expired("CustomerController"),
            Err(Error::Consistency(_))
        ));
    }

    #[test]
    fn test_ignore_meta_until() {
        let attrs =
            struct_attrs(r#"#[ignore_doc(reason = "internal", until = "01.01.2099")] pub struct X;"#);
        let meta = IgnoreMeta::from_attrs(&attrs).unwrap().unwrap();
        assert_eq!(meta.reason, "internal");
        assert_eq!(meta.until.as_deref(), Some("01.01.2099"));
    }
}
