//! The assembled documentation model.
//!
//! Everything in here is built incrementally during the single extraction pass
//! and treated as immutable once finalized. Renderers receive read-only access;
//! the deterministic orderings (domains by order, operations by order/nickname,
//! properties by order/required/name, errors by their full triple) are what
//! keeps rendered output stable across runs.

use crate::metadata::InsertPosition;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// An external documentation reference attached to a domain or operation.
#[derive(Debug, Clone, Serialize)]
pub struct ExternalDoc {
    pub location: String,
    pub position: InsertPosition,
}

/// One possible error of an operation or domain.
///
/// Ordering and equality use the full `(status, code, description)` triple:
/// two errors with the same status and code but different descriptions are
/// both retained, identical triples collapse to one entry. This is a
/// documented policy, not an accident.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct ApiError {
    pub status: u16,
    pub code: String,
    pub description: String,
}

/// One value of an enumerated property type.
#[derive(Debug, Clone, Serialize)]
pub struct EnumValue {
    pub order: u32,
    pub value: String,
    pub description: String,
}

impl Ord for EnumValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order
            .cmp(&other.order)
            .then_with(|| self.value.cmp(&other.value))
    }
}

impl PartialOrd for EnumValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EnumValue {}

/// One field of a data type.
#[derive(Debug, Clone, Serialize)]
pub struct Property {
    pub order: u32,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub sample: Vec<String>,
    pub enum_values: BTreeSet<EnumValue>,
    pub add_enum_values: bool,
    pub required: bool,
    pub request: bool,
    pub response: bool,
    pub list: bool,
    pub map: bool,
    pub map_key_description: String,
    pub map_value_description: String,
    pub deprecated: bool,
}

impl Property {
    pub fn has_enum_values(&self) -> bool {
        !self.enum_values.is_empty()
    }

    pub fn has_sample(&self) -> bool {
        !self.sample.is_empty()
    }

    /// Sample rendering rule: one value becomes a quoted scalar, several
    /// become a quoted array.
    pub fn sample_string(&self) -> String {
        if self.sample.len() == 1 {
            format!("\"{}\"", self.sample[0])
        } else {
            format!("[\"{}\"]", self.sample.join("\",\""))
        }
    }
}

impl Default for Property {
    fn default() -> Self {
        Property {
            order: u32::MAX,
            name: String::new(),
            description: String::new(),
            type_name: String::new(),
            sample: Vec::new(),
            enum_values: BTreeSet::new(),
            add_enum_values: true,
            required: false,
            request: true,
            response: true,
            list: false,
            map: false,
            map_key_description: String::new(),
            map_value_description: String::new(),
            deprecated: false,
        }
    }
}

/// A normalized structural description of a payload shape, keyed by name in
/// the registry and shared across operations.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DataType {
    pub name: String,
    pub alias: Option<String>,
    pub list: bool,
    pub nulls_in_sample: bool,
    pub properties: Vec<Property>,
}

impl DataType {
    /// Property sort key: `(order asc, required desc, name asc)`.
    pub fn sort_properties(&mut self) {
        self.properties.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| b.required.cmp(&a.required))
                .then_with(|| a.name.cmp(&b.name))
        });
    }

    pub fn property_by_name_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name == name)
    }
}

/// Where an operation parameter comes from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Path,
    Body,
    Query,
}

/// One parameter of an operation. Parameters whose documentation marks them
/// as ignored never make it into this struct.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub param_type: ParamType,
    pub name: String,
    /// Synthesized stable identifier used for cross-referencing and file
    /// naming; derivation rules differ per param type.
    pub reference_name: String,
    pub description: String,
    pub data_type: String,
    pub list: bool,
    pub required: bool,
}

/// The response shape of an operation: either a structural type (possibly in
/// a list), or a "simple" response carrying only text and a static sample.
#[derive(Debug, Clone, Serialize, Default)]
pub struct OperationResponse {
    pub response_type: String,
    pub in_list: bool,
    pub description: String,
    pub static_sample: String,
    pub simple_type_description: String,
}

impl OperationResponse {
    pub fn is_simple(&self) -> bool {
        self.response_type.is_empty()
    }
}

/// One documented API entry point.
#[derive(Debug, Clone, Serialize, Default)]
pub struct Operation {
    pub order: u32,
    pub path: String,
    pub http_method: String,
    pub nickname: String,
    pub short_description: String,
    pub description: String,
    pub notes: String,
    pub role: String,
    pub response_status: String,
    pub static_request_sample: String,
    pub parameters: Vec<Parameter>,
    pub response: OperationResponse,
    pub deprecated: bool,
    pub errors: BTreeSet<ApiError>,
    pub external_docs: Vec<ExternalDoc>,
}

/// A named, ordered grouping of operations, optionally nested one level via
/// sub-domains.
#[derive(Debug, Clone, Serialize, Default)]
pub struct Domain {
    pub order: u32,
    pub name: String,
    pub short_description: String,
    pub description: String,
    pub external_docs: Vec<ExternalDoc>,
    pub operations: Vec<Operation>,
    pub sub_domains: BTreeMap<u32, SubDomain>,
    pub errors: BTreeSet<ApiError>,
    pub deprecated: bool,
}

impl Domain {
    /// The short description falls back to the domain name when blank.
    pub fn short_description(&self) -> &str {
        if self.short_description.is_empty() {
            &self.name
        } else {
            &self.short_description
        }
    }

    /// Sorts operations by `(order, nickname)`, here and in every sub-domain.
    /// Duplicate sort keys are permitted and end up adjacent.
    pub fn sort_operations(&mut self) {
        self.operations
            .sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.nickname.cmp(&b.nickname)));
        for sub in self.sub_domains.values_mut() {
            sub.domain.sort_operations();
        }
    }
}

/// A domain specialization with an extra name component; its qualified name is
/// `domain-subDomain`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct SubDomain {
    pub sub_domain: String,
    pub sub_short_description: String,
    #[serde(flatten)]
    pub domain: Domain,
}

impl SubDomain {
    pub fn qualified_name(&self) -> String {
        format!("{}-{}", self.domain.name, self.sub_domain)
    }

    pub fn sub_short_description(&self) -> &str {
        if self.sub_short_description.is_empty() {
            &self.sub_domain
        } else {
            &self.sub_short_description
        }
    }
}

/// The finished output of an extraction run: every domain in order, every
/// registered data type, and the error set shared by all operations.
#[derive(Debug, Serialize, Default)]
pub struct DocumentationModel {
    pub domains: Vec<Domain>,
    pub data_types: Vec<DataType>,
    pub common_errors: BTreeSet<ApiError>,
}

/// Standard reason phrase for an HTTP status code.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        409 => "Conflict",
        410 => "Gone",
        412 => "Precondition Failed",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}
