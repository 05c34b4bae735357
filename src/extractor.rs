//! The metadata extractor.
//!
//! Drives one pass over every discovered controller and assembles the
//! documentation model: domains with their operations, the data types the
//! operations reference, and the error documentation derived from handler
//! chains. Consistency violations in the declared metadata abort the run;
//! missing documentation is recorded in the coverage reporter and the pass
//! continues.

use crate::config::Config;
use crate::defaults::DefaultValueProvider;
use crate::error::{Error, Result};
use crate::index::SourceIndex;
use crate::inspector::{is_builtin, scalar_display_name, TypeRef};
use crate::metadata::{
    has_attr, is_deprecated, ControllerMeta, DomainMeta, ErrorHandlerMeta, ErrorMeta, IgnoreMeta,
    OperationMeta, ParamDocMeta, ParamKind, ResponseMeta, RouteMeta, StatusMeta,
    role_from_authorize,
};
use crate::model::{
    reason_phrase, ApiError, DocumentationModel, Domain, ExternalDoc, Operation,
    OperationResponse, ParamType, Parameter,
};
use crate::registry::DataTypeRegistry;
use crate::reporter::CoverageReporter;
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Attachment point of an operation: a domain order, optionally narrowed to a
/// sub-domain order inside it.
#[derive(Debug, Clone, Copy)]
struct DomainKey {
    order: u32,
    sub_order: Option<u32>,
}

/// Error documentation contributed by one `#[error_handler]` method, keyed by
/// the error type name it handles.
#[derive(Debug, Clone)]
struct HandlerRecord {
    errors: Vec<ApiError>,
}

pub struct MetadataExtractor<'a> {
    index: &'a SourceIndex,
    config: &'a Config,
    registry: DataTypeRegistry<'a>,
    domains: BTreeMap<u32, Domain>,
    common_errors: BTreeSet<ApiError>,
}

impl<'a> MetadataExtractor<'a> {
    pub fn new(index: &'a SourceIndex, config: &'a Config) -> MetadataExtractor<'a> {
        MetadataExtractor {
            index,
            config,
            registry: DataTypeRegistry::new(index, config),
            domains: BTreeMap::new(),
            common_errors: BTreeSet::new(),
        }
    }

    /// Runs the full extraction over every controller in the index.
    pub fn extract(mut self, reporter: &mut CoverageReporter) -> Result<DocumentationModel> {
        if !self.config.common_error_controller.is_empty() {
            let name = self.config.common_error_controller.clone();
            info!("Collecting common errors from {}", name);
            let handlers = self.collect_error_handlers(&name, reporter)?;
            for record in handlers.values() {
                self.common_errors.extend(record.errors.iter().cloned());
            }
        }

        let controllers: Vec<String> = self
            .index
            .structs_with_attr("api_controller")
            .into_iter()
            .map(str::to_string)
            .collect();
        info!("Found {} controllers", controllers.len());
        for controller in &controllers {
            self.process_controller(controller, reporter)?;
        }

        let mut domains: Vec<Domain> = self.domains.into_values().collect();
        for domain in &mut domains {
            domain.sort_operations();
        }
        Ok(DocumentationModel {
            domains,
            data_types: self.registry.data_types().values().cloned().collect(),
            common_errors: self.common_errors,
        })
    }

    fn process_controller(
        &mut self,
        controller_name: &str,
        reporter: &mut CoverageReporter,
    ) -> Result<()> {
        let attrs = self.controller_attrs(controller_name)?;
        let Some(controller) = ControllerMeta::from_attrs(&attrs)? else {
            return Ok(());
        };

        if let Some(ignore) = IgnoreMeta::from_attrs(&attrs)? {
            ignore.verify_not_expired(&format!("controller {}", controller_name))?;
            info!("Ignoring controller {}: {}", controller_name, ignore.reason);
            reporter.add_ignored_controller(controller_name, &ignore.reason);
            self.record_all_members(controller_name, reporter, RecordAs::Ignored)?;
            return Ok(());
        }

        // Abstract controllers only contribute to extends chains
        if controller.is_abstract {
            debug!("Skipping abstract controller {}", controller_name);
            return Ok(());
        }

        let documentation_name = self.documentation_name(controller_name);
        if !self.carries_domain(controller_name, &documentation_name)? {
            warn!("Controller {} is undocumented", controller_name);
            reporter.add_undocumented_controller(controller_name);
            self.record_all_members(controller_name, reporter, RecordAs::Undocumented)?;
            return Ok(());
        }

        debug!("Scanning controller {}", controller_name);
        let handlers = self.collect_error_handlers(controller_name, reporter)?;
        let methods: Vec<syn::ImplItemFn> = self
            .index
            .methods(controller_name)
            .into_iter()
            .cloned()
            .collect();
        for method in &methods {
            self.process_method(
                controller_name,
                &controller,
                &documentation_name,
                method,
                &handlers,
                reporter,
            )?;
        }
        Ok(())
    }

    fn process_method(
        &mut self,
        controller_name: &str,
        controller: &ControllerMeta,
        documentation_name: &str,
        method: &syn::ImplItemFn,
        handlers: &HashMap<String, HandlerRecord>,
        reporter: &mut CoverageReporter,
    ) -> Result<()> {
        let method_name = method.sig.ident.to_string();
        if ErrorHandlerMeta::from_attrs(&method.attrs)?.is_some() {
            return Ok(());
        }
        if !self.config.custom_ignore_attribute.is_empty()
            && has_attr(&method.attrs, &self.config.custom_ignore_attribute)
        {
            reporter.add_ignored_method(controller_name, &method_name);
            return Ok(());
        }
        if let Some(ignore) = IgnoreMeta::from_attrs(&method.attrs)? {
            ignore.verify_not_expired(&format!("{}.{}", controller_name, method_name))?;
            reporter.add_ignored_method(controller_name, &method_name);
            return Ok(());
        }
        let Some(route) = RouteMeta::from_attrs(&method.attrs)? else {
            return Ok(());
        };

        match self.document_operation(
            controller_name,
            controller,
            documentation_name,
            method,
            &route,
            handlers,
            reporter,
        ) {
            Ok(()) => {
                reporter.add_documented_method(controller_name, &method_name);
                Ok(())
            }
            Err(Error::Undocumented(message)) => {
                warn!("{}", message);
                reporter.add_undocumented_method(controller_name, &method_name);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn document_operation(
        &mut self,
        controller_name: &str,
        controller: &ControllerMeta,
        documentation_name: &str,
        method: &syn::ImplItemFn,
        route: &RouteMeta,
        handlers: &HashMap<String, HandlerRecord>,
        reporter: &mut CoverageReporter,
    ) -> Result<()> {
        let method_name = method.sig.ident.to_string();
        let doc_method = self
            .index
            .method(documentation_name, &method_name)
            .cloned()
            .ok_or_else(|| {
                Error::Undocumented(format!(
                    "no documentation counterpart for {}.{}",
                    controller_name, method_name
                ))
            })?;
        let operation_meta = OperationMeta::from_attrs(&doc_method.attrs)?.ok_or_else(|| {
            Error::Undocumented(format!(
                "{}.{} has no operation metadata",
                documentation_name, method_name
            ))
        })?;

        let key = self.resolve_domain(controller_name, documentation_name, &doc_method)?;

        let path = join_path(&controller.path, &route.path);
        let return_type = return_type_of(method);
        let body_eligible = controller.rest || has_attr(&method.attrs, "response_body");

        let parameters =
            self.resolve_parameters(controller_name, method, &doc_method, &path, reporter)?;
        let response = self.resolve_response(&doc_method, &return_type, body_eligible, reporter)?;
        let errors = self.resolve_operation_errors(&doc_method, &return_type, handlers)?;

        let response_status = match StatusMeta::from_attrs(&method.attrs)? {
            Some(status) => {
                let reason = if status.reason.is_empty() {
                    reason_phrase(status.code).to_string()
                } else {
                    status.reason
                };
                format!("{} - {}", status.code, reason)
            }
            None => "200 - OK".to_string(),
        };

        let operation = Operation {
            order: operation_meta.order,
            path,
            http_method: route.method.clone(),
            nickname: if operation_meta.nickname.is_empty() {
                method_name.clone()
            } else {
                operation_meta.nickname
            },
            short_description: operation_meta.short_description,
            description: operation_meta.description,
            notes: operation_meta.notes,
            role: role_from_authorize(&method.attrs)?,
            response_status,
            static_request_sample: operation_meta.static_request_sample,
            parameters,
            response,
            deprecated: is_deprecated(&method.attrs) || is_deprecated(&doc_method.attrs),
            errors,
            external_docs: operation_meta
                .external_docs
                .into_iter()
                .map(|d| ExternalDoc {
                    location: d.location,
                    position: d.position,
                })
                .collect(),
        };

        self.attach_operation(key, operation);
        Ok(())
    }

    /// Resolution order for the domain an operation belongs to: the handler
    /// method, the controller struct, the documentation method, then the
    /// documentation struct.
    fn resolve_domain(
        &mut self,
        controller_name: &str,
        documentation_name: &str,
        doc_method: &syn::ImplItemFn,
    ) -> Result<DomainKey> {
        let handler_attrs = self
            .index
            .method(controller_name, &doc_method.sig.ident.to_string())
            .map(|m| m.attrs.clone())
            .unwrap_or_default();
        let carriers: [(Vec<syn::Attribute>, bool); 4] = [
            (handler_attrs, false),
            (self.controller_attrs(controller_name)?, false),
            (doc_method.attrs.clone(), false),
            (
                self.struct_attrs(documentation_name),
                self.struct_deprecated(documentation_name),
            ),
        ];
        for (attrs, deprecated) in carriers {
            if let Some(meta) = DomainMeta::from_attrs(&attrs)? {
                return self.register_domain(&meta, deprecated);
            }
        }
        Err(Error::Undocumented(format!(
            "no domain declared for {}.{}",
            controller_name,
            doc_method.sig.ident
        )))
    }

    /// Registers (or merges into) the domain a metadata carrier declares,
    /// enforcing that one order maps to exactly one name.
    fn register_domain(&mut self, meta: &DomainMeta, deprecated: bool) -> Result<DomainKey> {
        let is_new = !self.domains.contains_key(&meta.order);
        let domain = self.domains.entry(meta.order).or_default();
        if is_new {
            domain.order = meta.order;
            domain.name = meta.name.clone();
            // The one-time common-error pass ran before any controller, so
            // every new domain starts out with those errors.
            domain.errors.extend(self.common_errors.iter().cloned());
            domain.short_description = meta.short_description.clone();
            domain.description = meta.description.clone();
            domain.deprecated = deprecated;
            domain.external_docs = meta
                .external_docs
                .iter()
                .map(|d| ExternalDoc {
                    location: d.location.clone(),
                    position: d.position,
                })
                .collect();
        } else if domain.name != meta.name {
            return Err(Error::Consistency(format!(
                "domain order {} maps to both '{}' and '{}'",
                meta.order, domain.name, meta.name
            )));
        }
        domain.errors.extend(meta.errors.iter().filter(|e| !e.ignore).map(|e| ApiError {
            status: e.status,
            code: e.code.clone(),
            description: e.description.clone(),
        }));

        let Some(sub) = &meta.sub_domain else {
            return Ok(DomainKey {
                order: meta.order,
                sub_order: None,
            });
        };
        let sub_is_new = !domain.sub_domains.contains_key(&sub.order);
        let domain_name = domain.name.clone();
        let sub_domain = domain.sub_domains.entry(sub.order).or_default();
        if sub_is_new {
            sub_domain.sub_domain = sub.name.clone();
            sub_domain.sub_short_description = sub.short_description.clone();
            sub_domain.domain.order = sub.order;
            sub_domain.domain.name = domain_name;
            sub_domain.domain.description = sub.description.clone();
        } else if sub_domain.sub_domain != sub.name {
            return Err(Error::Consistency(format!(
                "sub-domain order {} of '{}' maps to both '{}' and '{}'",
                sub.order, domain_name, sub_domain.sub_domain, sub.name
            )));
        }
        Ok(DomainKey {
            order: meta.order,
            sub_order: Some(sub.order),
        })
    }

    fn attach_operation(&mut self, key: DomainKey, operation: Operation) {
        let Some(domain) = self.domains.get_mut(&key.order) else {
            return;
        };
        match key.sub_order {
            Some(sub_order) => {
                if let Some(sub) = domain.sub_domains.get_mut(&sub_order) {
                    sub.domain.operations.push(operation);
                }
            }
            None => domain.operations.push(operation),
        }
    }

    /// Resolves every `#[param(...)]`-annotated handler argument against the
    /// documentation method's `#[param_doc]` entries. A parameter without a
    /// matching description is a fatal consistency error.
    fn resolve_parameters(
        &mut self,
        controller_name: &str,
        method: &syn::ImplItemFn,
        doc_method: &syn::ImplItemFn,
        path: &str,
        reporter: &mut CoverageReporter,
    ) -> Result<Vec<Parameter>> {
        let docs = ParamDocMeta::from_attrs(&doc_method.attrs)?;
        let path_vars = crate::inspector::path_variables(path);
        let mut path_position = 0;
        let mut parameters = Vec::new();

        let inputs: Vec<syn::PatType> = method
            .sig
            .inputs
            .iter()
            .filter_map(|input| match input {
                syn::FnArg::Typed(pat_type) => Some(pat_type.clone()),
                syn::FnArg::Receiver(_) => None,
            })
            .collect();

        for input in &inputs {
            let Some(kind) = ParamKind::from_attrs(&input.attrs)? else {
                continue;
            };
            let arg_name = pattern_name(&input.pat);
            let doc = docs.iter().find(|d| d.name == arg_name).ok_or_else(|| {
                Error::Consistency(format!(
                    "parameter '{}' of {}.{} has no param_doc entry",
                    arg_name, controller_name, method.sig.ident
                ))
            })?;
            if doc.ignore {
                // An ignored parameter stays out of the operation entirely,
                // but still consumes its path template slot.
                if matches!(kind, ParamKind::Path) {
                    path_position += 1;
                }
                continue;
            }
            let type_ref = TypeRef::from_syn(&input.ty);
            let parameter = match &kind {
                ParamKind::Path => {
                    let parameter = self.path_parameter(
                        doc,
                        path_vars.get(path_position),
                        &arg_name,
                        path,
                    )?;
                    path_position += 1;
                    parameter
                }
                ParamKind::Body => self.body_parameter(&arg_name, doc, &type_ref, reporter)?,
                ParamKind::Query { name, required } => {
                    self.query_parameter(name, *required, doc, &type_ref, reporter)?
                }
            };
            parameters.push(parameter);
        }
        Ok(parameters)
    }

    /// Path parameters take their name from the path template variable in
    /// positional order, so the rendered name always matches the URL. An
    /// argument without a template variable left for it is a fatal mismatch.
    fn path_parameter(
        &self,
        doc: &ParamDocMeta,
        template_var: Option<&String>,
        arg_name: &str,
        path: &str,
    ) -> Result<Parameter> {
        let name = template_var.ok_or_else(|| {
            Error::Consistency(format!(
                "path parameter '{}' has no variable left in path {}",
                arg_name, path
            ))
        })?;
        Ok(Parameter {
            param_type: ParamType::Path,
            name: name.clone(),
            reference_name: name.clone(),
            description: doc.description.clone(),
            data_type: doc.data_type.clone().unwrap_or_else(|| "string".to_string()),
            list: false,
            required: true,
        })
    }

    fn body_parameter(
        &mut self,
        name: &str,
        doc: &ParamDocMeta,
        type_ref: &TypeRef,
        reporter: &mut CoverageReporter,
    ) -> Result<Parameter> {
        let (display, reference_name, list) = if type_ref.is_collection() {
            match type_ref.element_type() {
                Some(element) => {
                    let stub = self.registry.register_list_stub(&element.name, reporter)?;
                    let element_display = self.registry.display_name(&element.name);
                    (stub, format!("{}-list-data", element_display.to_lowercase()), true)
                }
                None => ("Object".to_string(), format!("{}-data", name), true),
            }
        } else {
            let display = self.registry.display_name(&type_ref.name);
            if !is_builtin(&type_ref.name) {
                self.registry.register(&type_ref.name, reporter)?;
            }
            let reference_name = format!("{}-data", display.to_lowercase());
            (display, reference_name, false)
        };
        Ok(Parameter {
            param_type: ParamType::Body,
            name: name.to_string(),
            reference_name,
            description: doc.description.clone(),
            data_type: doc.data_type.clone().unwrap_or(display),
            list,
            required: true,
        })
    }

    fn query_parameter(
        &mut self,
        name: &str,
        required: bool,
        doc: &ParamDocMeta,
        type_ref: &TypeRef,
        reporter: &mut CoverageReporter,
    ) -> Result<Parameter> {
        let list = type_ref.is_collection();
        let target = type_ref.element_type().unwrap_or(type_ref);
        let display = if self.index.is_enum(&target.name) {
            "String".to_string()
        } else if is_builtin(&target.name) {
            scalar_display_name(&target.name).to_string()
        } else {
            self.registry.register(&target.name, reporter)?;
            self.registry.display_name(&target.name)
        };
        let qualifier = if required { "required" } else { "optional" };
        Ok(Parameter {
            param_type: ParamType::Query,
            name: name.to_string(),
            reference_name: format!("{}-{}-query", name, qualifier),
            description: doc.description.clone(),
            data_type: doc.data_type.clone().unwrap_or(display),
            list,
            required,
        })
    }

    /// Response shape: an explicit `#[response(data_type)]` wins, otherwise
    /// body-eligible methods derive the shape from the return type, otherwise
    /// the response is free text.
    fn resolve_response(
        &mut self,
        doc_method: &syn::ImplItemFn,
        return_type: &Option<TypeRef>,
        body_eligible: bool,
        reporter: &mut CoverageReporter,
    ) -> Result<OperationResponse> {
        let meta = ResponseMeta::from_attrs(&doc_method.attrs)?.unwrap_or_else(|| ResponseMeta {
            description: String::new(),
            data_type: None,
            static_sample: String::new(),
            simple_type_description: String::new(),
        });
        let mut response = OperationResponse {
            description: meta.description,
            static_sample: meta.static_sample,
            simple_type_description: meta.simple_type_description,
            ..OperationResponse::default()
        };

        if let Some(data_type) = meta.data_type {
            self.registry.register(&data_type, reporter)?;
            response.response_type = self.registry.display_name(&data_type);
            return Ok(response);
        }
        if !body_eligible {
            return Ok(response);
        }
        let Some(return_type) = return_type else {
            return Ok(response);
        };
        let (payload, _) = return_type.unwrap_result();
        if payload.name == "()" {
            return Ok(response);
        }
        let target = if payload.is_collection() {
            response.in_list = true;
            match payload.element_type() {
                Some(element) => element,
                None => return Ok(response),
            }
        } else {
            payload
        };
        if is_builtin(&target.name) || self.index.is_enum(&target.name) {
            // Scalar payloads stay "simple" with their display name as the type text
            if response.simple_type_description.is_empty() {
                response.simple_type_description = if self.index.is_enum(&target.name) {
                    "String".to_string()
                } else {
                    scalar_display_name(&target.name).to_string()
                };
            }
            return Ok(response);
        }
        self.registry.register(&target.name, reporter)?;
        response.response_type = self.registry.display_name(&target.name);
        Ok(response)
    }

    /// Errors of one operation: the explicit `#[api_error]` list on the
    /// documentation method wins; otherwise the handler matching the method's
    /// `Result` error type contributes its documentation.
    fn resolve_operation_errors(
        &self,
        doc_method: &syn::ImplItemFn,
        return_type: &Option<TypeRef>,
        handlers: &HashMap<String, HandlerRecord>,
    ) -> Result<BTreeSet<ApiError>> {
        let explicit = ErrorMeta::from_attrs(&doc_method.attrs)?;
        if !explicit.is_empty() {
            return Ok(explicit
                .into_iter()
                .filter(|e| !e.ignore)
                .map(|e| ApiError {
                    status: e.status,
                    code: e.code,
                    description: e.description,
                })
                .collect());
        }
        let mut errors = BTreeSet::new();
        if let Some(return_type) = return_type {
            let (_, declared_error) = return_type.unwrap_result();
            if let Some(declared_error) = declared_error {
                if let Some(record) = handlers.get(&declared_error.name) {
                    errors.extend(record.errors.iter().cloned());
                }
            }
        }
        Ok(errors)
    }

    /// Collects error-handler documentation over the controller's `extends`
    /// chain, oldest ancestor first so derived handlers override inherited ones
    /// for the same error type. The walk stops before the configured boundary.
    fn collect_error_handlers(
        &mut self,
        controller_name: &str,
        reporter: &mut CoverageReporter,
    ) -> Result<HashMap<String, HandlerRecord>> {
        let mut records: HashMap<String, HandlerRecord> = HashMap::new();
        for member in self.controller_ancestry(controller_name)? {
            let methods: Vec<syn::ImplItemFn> = self
                .index
                .methods(&member)
                .into_iter()
                .cloned()
                .collect();
            for method in &methods {
                let Some(handler) = ErrorHandlerMeta::from_attrs(&method.attrs)? else {
                    continue;
                };
                let handler_name = method.sig.ident.to_string();
                if let Some(ignore) = IgnoreMeta::from_attrs(&method.attrs)? {
                    ignore.verify_not_expired(&format!("{}.{}", member, handler_name))?;
                    reporter.add_ignored_error_handler(&member, &handler_name);
                    continue;
                }
                let metas = ErrorMeta::from_attrs(&method.attrs)?;
                if metas.is_empty() {
                    let status = handler.status.unwrap_or(500);
                    if self.config.synthesize_error_codes {
                        let provider = DefaultValueProvider::new(self.index);
                        let code = provider.default_for(&handler.exception).to_string();
                        reporter.add_documented_error_handler(&member, &handler_name);
                        records.insert(
                            handler.exception.clone(),
                            HandlerRecord {
                                errors: vec![ApiError {
                                    status,
                                    code,
                                    description: reason_phrase(status).to_string(),
                                }],
                            },
                        );
                    } else {
                        reporter.add_undocumented_error_handler(&member, &handler_name);
                    }
                    continue;
                }
                let errors: Vec<ApiError> = metas
                    .iter()
                    .filter(|m| !m.ignore)
                    .map(|m| ApiError {
                        status: m.status,
                        code: m.code.clone(),
                        description: if m.description.is_empty() {
                            reason_phrase(m.status).to_string()
                        } else {
                            m.description.clone()
                        },
                    })
                    .collect();
                if errors.is_empty() {
                    reporter.add_ignored_error_handler(&member, &handler_name);
                    continue;
                }
                reporter.add_documented_error_handler(&member, &handler_name);
                records.insert(handler.exception.clone(), HandlerRecord { errors });
            }
        }
        Ok(records)
    }

    /// The controller's `extends` chain, oldest ancestor first, ending with the
    /// controller itself. Unlike value objects the chain just stops at its top
    /// or at the configured boundary; there is no mandatory base.
    fn controller_ancestry(&self, controller_name: &str) -> Result<Vec<String>> {
        let mut chain = vec![controller_name.to_string()];
        let mut current = controller_name.to_string();
        loop {
            let Some(item_struct) = self.index.struct_def(&current) else {
                break;
            };
            let Some(meta) = ControllerMeta::from_attrs(&item_struct.attrs)? else {
                break;
            };
            let Some(parent) = meta.extends else {
                break;
            };
            if parent == self.config.stop_error_inspection_at || chain.contains(&parent) {
                break;
            }
            chain.push(parent.clone());
            current = parent;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Records every route method and error handler of a controller with one
    /// coverage outcome (used for wholesale ignored / undocumented controllers).
    fn record_all_members(
        &self,
        controller_name: &str,
        reporter: &mut CoverageReporter,
        outcome: RecordAs,
    ) -> Result<()> {
        for method in self.index.methods(controller_name) {
            let method_name = method.sig.ident.to_string();
            if ErrorHandlerMeta::from_attrs(&method.attrs)?.is_some() {
                match outcome {
                    RecordAs::Ignored => {
                        reporter.add_ignored_error_handler(controller_name, &method_name)
                    }
                    RecordAs::Undocumented => {
                        reporter.add_undocumented_error_handler(controller_name, &method_name)
                    }
                }
            } else if RouteMeta::from_attrs(&method.attrs)?.is_some() {
                match outcome {
                    RecordAs::Ignored => reporter.add_ignored_method(controller_name, &method_name),
                    RecordAs::Undocumented => {
                        reporter.add_undocumented_method(controller_name, &method_name)
                    }
                }
            }
        }
        Ok(())
    }

    fn documentation_name(&self, controller_name: &str) -> String {
        if self.config.has_documentation_suffix() {
            format!("{}{}", controller_name, self.config.documentation_suffix)
        } else {
            controller_name.to_string()
        }
    }

    /// A controller counts as documented when a `#[domain]` is declared on its
    /// documentation counterpart or on the controller struct itself.
    fn carries_domain(&self, controller_name: &str, documentation_name: &str) -> Result<bool> {
        for name in [documentation_name, controller_name] {
            if let Some(item_struct) = self.index.struct_def(name) {
                if DomainMeta::from_attrs(&item_struct.attrs)?.is_some() {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn controller_attrs(&self, name: &str) -> Result<Vec<syn::Attribute>> {
        self.index
            .struct_def(name)
            .map(|s| s.attrs.clone())
            .ok_or_else(|| Error::Consistency(format!("controller {} not found", name)))
    }

    fn struct_attrs(&self, name: &str) -> Vec<syn::Attribute> {
        self.index
            .struct_def(name)
            .map(|s| s.attrs.clone())
            .unwrap_or_default()
    }

    fn struct_deprecated(&self, name: &str) -> bool {
        self.index
            .struct_def(name)
            .map(|s| is_deprecated(&s.attrs))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy)]
enum RecordAs {
    Ignored,
    Undocumented,
}

/// Joins a controller base path and a route path into one normalized path:
/// a single leading slash, no doubled or trailing slashes.
fn join_path(base: &str, tail: &str) -> String {
    let segments: Vec<&str> = base
        .split('/')
        .chain(tail.split('/'))
        .filter(|s| !s.is_empty())
        .collect();
    format!("/{}", segments.join("/"))
}

fn return_type_of(method: &syn::ImplItemFn) -> Option<TypeRef> {
    match &method.sig.output {
        syn::ReturnType::Default => None,
        syn::ReturnType::Type(_, ty) => Some(TypeRef::from_syn(ty)),
    }
}

fn pattern_name(pat: &syn::Pat) -> String {
    match pat {
        syn::Pat::Ident(ident) => ident.ident.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsedFile;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn extract_with_config(code: &str, config: &Config) -> (DocumentationModel, CoverageReporter) {
        let file = ParsedFile {
            path: PathBuf::from("test.rs"),
            syntax_tree: syn::parse_file(code).unwrap(),
        };
        let index = SourceIndex::new(vec![file]);
        let extractor = MetadataExtractor::new(&index, config);
        let mut reporter = CoverageReporter::new();
        let model = extractor.extract(&mut reporter).unwrap();
        (model, reporter)
    }

    fn extract(code: &str) -> (DocumentationModel, CoverageReporter) {
        extract_with_config(
            code,
            &Config {
                data_type_suffix: "VO".to_string(),
                ..Config::default()
            },
        )
    }

    const DOCUMENTED_CONTROLLER: &str = r#"
        #[api_controller(path = "customers", rest)]
        #[domain(name = "Customer", order = 1, short_description = "Customer management")]
        pub struct CustomerController;

        impl CustomerController {
            #[route(method = "GET", path = "{id}")]
            #[operation(order = 1, nickname = "getCustomer", description = "Loads one customer")]
            #[param_doc(name = "id", description = "The customer id")]
            #[response(description = "The customer")]
            pub fn get_customer(&self, #[param(path)] id: u64) -> CustomerVO {
                unimplemented!()
            }

            #[route(method = "POST", path = "")]
            #[operation(order = 2, nickname = "addCustomer", description = "Creates a customer")]
            #[param_doc(name = "customer", description = "The new customer")]
            pub fn add_customer(&self, #[param(body)] customer: CustomerVO) -> CustomerVO {
                unimplemented!()
            }
        }

        pub struct CustomerVO {
            #[property(order = 1, description = "The name", required)]
            pub name: String,
        }
    "#;

    #[test]
    fn test_end_to_end_domain_and_operations() {
        let (model, reporter) = extract(DOCUMENTED_CONTROLLER);

        assert_eq!(model.domains.len(), 1);
        let domain = &model.domains[0];
        assert_eq!(domain.name, "Customer");
        assert_eq!(domain.operations.len(), 2);
        assert_eq!(domain.operations[0].nickname, "getCustomer");
        assert_eq!(domain.operations[0].path, "/customers/{id}");
        assert_eq!(domain.operations[0].http_method, "GET");
        assert_eq!(domain.operations[0].response_status, "200 - OK");
        assert_eq!(domain.operations[1].nickname, "addCustomer");
        assert_eq!(reporter.undocumented_count(), 0);
    }

    #[test]
    fn test_body_parameter_reference_name_and_registration() {
        let (model, _) = extract(DOCUMENTED_CONTROLLER);

        let add = &model.domains[0].operations[1];
        assert_eq!(add.parameters.len(), 1);
        let body = &add.parameters[0];
        assert_eq!(body.param_type, ParamType::Body);
        assert_eq!(body.reference_name, "customer-data");
        assert_eq!(body.data_type, "Customer");
        assert!(body.required);

        assert!(model.data_types.iter().any(|d| d.name == "Customer"));
    }

    #[test]
    fn test_path_parameter_is_fixed_string() {
        let (model, _) = extract(DOCUMENTED_CONTROLLER);

        let get = &model.domains[0].operations[0];
        let path_param = &get.parameters[0];
        assert_eq!(path_param.param_type, ParamType::Path);
        assert_eq!(path_param.reference_name, "id");
        assert_eq!(path_param.data_type, "string");
        assert_eq!(get.response.response_type, "Customer");
    }

    #[test]
    fn test_list_return_type_sets_in_list() {
        let (model, _) = extract(
            r#"
            #[api_controller(path = "customers", rest)]
            #[domain(name = "Customer", order = 1)]
            pub struct CustomerController;

            impl CustomerController {
                #[route(method = "GET", path = "")]
                #[operation(order = 1, description = "Lists customers")]
                pub fn list_customers(&self) -> Vec<CustomerVO> {
                    unimplemented!()
                }
            }

            pub struct CustomerVO {
                #[property(description = "The name")]
                pub name: String,
            }
        "#,
        );

        let operation = &model.domains[0].operations[0];
        assert!(operation.response.in_list);
        assert_eq!(operation.response.response_type, "Customer");
    }

    #[test]
    fn test_body_list_parameter_uses_list_stub() {
        let (model, _) = extract(
            r#"
            #[api_controller(path = "customers", rest)]
            #[domain(name = "Customer", order = 1)]
            pub struct CustomerController;

            impl CustomerController {
                #[route(method = "POST", path = "batch")]
                #[operation(order = 1, description = "Creates many customers")]
                #[param_doc(name = "customers", description = "The customers")]
                pub fn add_customers(&self, #[param(body)] customers: Vec<CustomerVO>) {
                }
            }

            pub struct CustomerVO {
                #[property(description = "The name")]
                pub name: String,
            }
        "#,
        );

        let body = &model.domains[0].operations[0].parameters[0];
        assert_eq!(body.reference_name, "customer-list-data");
        assert_eq!(body.data_type, "CustomerList");
        assert!(body.list);
        assert!(model.data_types.iter().any(|d| d.name == "CustomerList"));
    }

    #[test]
    fn test_query_parameter_reference_names() {
        let (model, _) = extract(
            r#"
            #[api_controller(path = "customers", rest)]
            #[domain(name = "Customer", order = 1)]
            pub struct CustomerController;

            impl CustomerController {
                #[route(method = "GET", path = "")]
                #[operation(order = 1, description = "Searches customers")]
                #[param_doc(name = "name", description = "Name filter")]
                #[param_doc(name = "limit", description = "Result cap")]
                pub fn search(
                    &self,
                    #[param(query = "name")] name: String,
                    #[param(query = "limit", required = false)] limit: u32,
                ) -> Vec<CustomerVO> {
                    unimplemented!()
                }
            }

            pub struct CustomerVO {
                #[property(description = "The name")]
                pub name: String,
            }
        "#,
        );

        let parameters = &model.domains[0].operations[0].parameters;
        assert_eq!(parameters[0].reference_name, "name-required-query");
        assert!(parameters[0].required);
        assert_eq!(parameters[1].reference_name, "limit-optional-query");
        assert!(!parameters[1].required);
        assert_eq!(parameters[1].data_type, "Number (int)");
    }

    #[test]
    fn test_ignored_parameter_is_excluded_from_the_operation() {
        let (model, _) = extract(
            r#"
            #[api_controller(path = "customers", rest)]
            #[domain(name = "Customer", order = 1)]
            pub struct CustomerController;

            impl CustomerController {
                #[route(method = "GET", path = "")]
                #[operation(order = 1, description = "Searches customers")]
                #[param_doc(name = "name", description = "Name filter")]
                #[param_doc(name = "debug", ignore)]
                pub fn search(
                    &self,
                    #[param(query = "name")] name: String,
                    #[param(query = "debug", required = false)] debug: bool,
                ) {
                }
            }
        "#,
        );

        let parameters = &model.domains[0].operations[0].parameters;
        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[0].name, "name");
    }

    #[test]
    fn test_path_parameter_name_follows_the_template() {
        let (model, _) = extract(
            r#"
            #[api_controller(path = "customers", rest)]
            #[domain(name = "Customer", order = 1)]
            pub struct CustomerController;

            impl CustomerController {
                #[route(method = "GET", path = "{customerId}/orders/{orderId}")]
                #[operation(order = 1, description = "Loads one order")]
                #[param_doc(name = "customer_id", description = "The customer")]
                #[param_doc(name = "order_id", description = "The order")]
                pub fn get_order(
                    &self,
                    #[param(path)] customer_id: u64,
                    #[param(path)] order_id: u64,
                ) {
                }
            }
        "#,
        );

        let parameters = &model.domains[0].operations[0].parameters;
        assert_eq!(parameters[0].name, "customerId");
        assert_eq!(parameters[0].reference_name, "customerId");
        assert_eq!(parameters[1].name, "orderId");
    }

    #[test]
    fn test_path_parameter_without_template_variable_is_fatal() {
        let file = ParsedFile {
            path: PathBuf::from("test.rs"),
            syntax_tree: syn::parse_file(
                r#"
                #[api_controller(path = "customers", rest)]
                #[domain(name = "Customer", order = 1)]
                pub struct CustomerController;

                impl CustomerController {
                    #[route(method = "GET", path = "")]
                    #[operation(order = 1, description = "Loads one customer")]
                    #[param_doc(name = "id", description = "The id")]
                    pub fn get(&self, #[param(path)] id: u64) {
                    }
                }
            "#,
            )
            .unwrap(),
        };
        let index = SourceIndex::new(vec![file]);
        let config = Config::default();
        let extractor = MetadataExtractor::new(&index, &config);
        let mut reporter = CoverageReporter::new();

        assert!(matches!(
            extractor.extract(&mut reporter),
            Err(Error::Consistency(_))
        ));
    }

    #[test]
    fn test_missing_param_doc_is_fatal() {
        let file = ParsedFile {
            path: PathBuf::from("test.rs"),
            syntax_tree: syn::parse_file(
                r#"
                #[api_controller(path = "customers", rest)]
                #[domain(name = "Customer", order = 1)]
                pub struct CustomerController;

                impl CustomerController {
                    #[route(method = "GET", path = "{id}")]
                    #[operation(order = 1, description = "Loads one customer")]
                    pub fn get_customer(&self, #[param(path)] id: u64) {
                    }
                }
            "#,
            )
            .unwrap(),
        };
        let index = SourceIndex::new(vec![file]);
        let config = Config::default();
        let extractor = MetadataExtractor::new(&index, &config);
        let mut reporter = CoverageReporter::new();

        assert!(matches!(
            extractor.extract(&mut reporter),
            Err(Error::Consistency(_))
        ));
    }

    #[test]
    fn test_domain_order_name_mismatch_is_fatal() {
        let file = ParsedFile {
            path: PathBuf::from("test.rs"),
            syntax_tree: syn::parse_file(
                r#"
                #[api_controller(path = "customers", rest)]
                #[domain(name = "Customer", order = 1)]
                pub struct CustomerController;

                impl CustomerController {
                    #[route(method = "GET", path = "")]
                    #[operation(order = 1, description = "Lists")]
                    pub fn list(&self) {}
                }

                #[api_controller(path = "orders", rest)]
                #[domain(name = "Order", order = 1)]
                pub struct OrderController;

                impl OrderController {
                    #[route(method = "GET", path = "")]
                    #[operation(order = 1, description = "Lists")]
                    pub fn list(&self) {}
                }
            "#,
            )
            .unwrap(),
        };
        let index = SourceIndex::new(vec![file]);
        let config = Config::default();
        let extractor = MetadataExtractor::new(&index, &config);
        let mut reporter = CoverageReporter::new();

        assert!(matches!(
            extractor.extract(&mut reporter),
            Err(Error::Consistency(_))
        ));
    }

    #[test]
    fn test_undocumented_controller_records_members() {
        let (model, reporter) = extract(
            r#"
            #[api_controller(path = "customers", rest)]
            pub struct CustomerController;

            impl CustomerController {
                #[route(method = "GET", path = "")]
                pub fn list(&self) {}

                #[route(method = "DELETE", path = "{id}")]
                pub fn delete(&self, #[param(path)] id: u64) {}
            }
        "#,
        );

        assert!(model.domains.is_empty());
        assert_eq!(reporter.undocumented_count(), 2);
    }

    #[test]
    fn test_ignored_controller_with_reason() {
        let (model, reporter) = extract(
            r#"
            #[api_controller(path = "internal", rest)]
            #[ignore_doc(reason = "internal only")]
            pub struct InternalController;

            impl InternalController {
                #[route(method = "GET", path = "")]
                pub fn list(&self) {}
            }
        "#,
        );

        assert!(model.domains.is_empty());
        assert_eq!(reporter.ignored_count(), 1);
        assert_eq!(reporter.undocumented_count(), 0);
    }

    #[test]
    fn test_route_method_without_operation_is_recorded_not_fatal() {
        let (model, reporter) = extract(
            r#"
            #[api_controller(path = "customers", rest)]
            #[domain(name = "Customer", order = 1)]
            pub struct CustomerController;

            impl CustomerController {
                #[route(method = "GET", path = "")]
                #[operation(order = 1, description = "Lists customers")]
                pub fn list(&self) {}

                #[route(method = "DELETE", path = "{id}")]
                #[param_doc(name = "id", description = "The id")]
                pub fn delete(&self, #[param(path)] id: u64) {}
            }
        "#,
        );

        assert_eq!(model.domains[0].operations.len(), 1);
        assert_eq!(reporter.undocumented_count(), 1);
    }

    #[test]
    fn test_result_error_type_matches_handler_documentation() {
        let (model, _) = extract(
            r#"
            #[api_controller(path = "customers", rest)]
            #[domain(name = "Customer", order = 1)]
            pub struct CustomerController;

            impl CustomerController {
                #[route(method = "GET", path = "{id}")]
                #[operation(order = 1, description = "Loads one customer")]
                #[param_doc(name = "id", description = "The id")]
                pub fn get(&self, #[param(path)] id: u64) -> Result<CustomerVO, NotFoundError> {
                    unimplemented!()
                }

                #[error_handler(exception = "NotFoundError", status = 404)]
                #[api_error(status = 404, code = "CUSTOMER_NOT_FOUND", description = "No such customer")]
                pub fn handle_not_found(&self) {}
            }

            pub struct NotFoundError;

            pub struct CustomerVO {
                #[property(description = "The name")]
                pub name: String,
            }
        "#,
        );

        let operation = &model.domains[0].operations[0];
        assert_eq!(operation.errors.len(), 1);
        let error = operation.errors.iter().next().unwrap();
        assert_eq!(error.status, 404);
        assert_eq!(error.code, "CUSTOMER_NOT_FOUND");
    }

    #[test]
    fn test_inherited_handler_via_extends_chain() {
        let (model, _) = extract(
            r#"
            #[api_controller(is_abstract)]
            #[domain(name = "Base", order = 99)]
            pub struct AbstractController;

            impl AbstractController {
                #[error_handler(exception = "ConflictError")]
                #[api_error(status = 409, code = "CONFLICT")]
                pub fn handle_conflict(&self) {}
            }

            #[api_controller(path = "customers", rest, extends = "AbstractController")]
            #[domain(name = "Customer", order = 1)]
            pub struct CustomerController;

            impl CustomerController {
                #[route(method = "POST", path = "")]
                #[operation(order = 1, description = "Creates a customer")]
                pub fn create(&self) -> Result<(), ConflictError> {
                    unimplemented!()
                }
            }

            pub struct ConflictError;
        "#,
        );

        let customer = model.domains.iter().find(|d| d.name == "Customer").unwrap();
        let error = customer.operations[0].errors.iter().next().unwrap();
        assert_eq!(error.status, 409);
        // Empty description falls back to the reason phrase
        assert_eq!(error.description, "Conflict");
    }

    #[test]
    fn test_explicit_api_errors_on_doc_method_win() {
        let (model, _) = extract(
            r#"
            #[api_controller(path = "customers", rest)]
            #[domain(name = "Customer", order = 1)]
            pub struct CustomerController;

            impl CustomerController {
                #[route(method = "GET", path = "{id}")]
                #[operation(order = 1, description = "Loads one customer")]
                #[param_doc(name = "id", description = "The id")]
                #[api_error(status = 410, code = "GONE", description = "Customer purged")]
                pub fn get(&self, #[param(path)] id: u64) -> Result<(), NotFoundError> {
                    unimplemented!()
                }

                #[error_handler(exception = "NotFoundError")]
                #[api_error(status = 404, code = "NOT_FOUND")]
                pub fn handle_not_found(&self) {}
            }

            pub struct NotFoundError;
        "#,
        );

        let errors = &model.domains[0].operations[0].errors;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.iter().next().unwrap().status, 410);
    }

    #[test]
    fn test_common_errors_seed_every_domain() {
        let (model, _) = extract_with_config(
            r#"
            #[api_controller(is_abstract)]
            pub struct CommonErrorController;

            impl CommonErrorController {
                #[error_handler(exception = "ValidationError")]
                #[api_error(status = 400, code = "VALIDATION_FAILED", description = "Invalid input")]
                pub fn handle_validation(&self) {}
            }

            #[api_controller(path = "customers", rest)]
            #[domain(name = "Customer", order = 1)]
            pub struct CustomerController;

            impl CustomerController {
                #[route(method = "GET", path = "")]
                #[operation(order = 1, description = "Lists customers")]
                pub fn list(&self) {}
            }

            #[api_controller(path = "orders", rest)]
            #[domain(name = "Order", order = 2)]
            pub struct OrderController;

            impl OrderController {
                #[route(method = "GET", path = "")]
                #[operation(order = 1, description = "Lists orders")]
                pub fn list(&self) {}
            }
        "#,
            &Config {
                common_error_controller: "CommonErrorController".to_string(),
                ..Config::default()
            },
        );

        assert_eq!(model.common_errors.len(), 1);
        assert_eq!(model.common_errors.iter().next().unwrap().status, 400);
        // Every domain starts out with the common error set
        assert_eq!(model.domains.len(), 2);
        for domain in &model.domains {
            let error = domain.errors.iter().next().unwrap();
            assert_eq!(error.code, "VALIDATION_FAILED");
        }
    }

    #[test]
    fn test_sub_domain_attachment() {
        let (model, _) = extract(
            r#"
            #[api_controller(path = "customers/addresses", rest)]
            #[domain(name = "Customer", order = 1)]
            #[sub_domain(name = "Address", order = 1, short_description = "Addresses")]
            pub struct AddressController;

            impl AddressController {
                #[route(method = "GET", path = "")]
                #[operation(order = 1, description = "Lists addresses")]
                pub fn list(&self) {}
            }
        "#,
        );

        let domain = &model.domains[0];
        assert!(domain.operations.is_empty());
        let sub = domain.sub_domains.get(&1).unwrap();
        assert_eq!(sub.qualified_name(), "Customer-Address");
        assert_eq!(sub.domain.operations.len(), 1);
    }

    #[test]
    fn test_status_and_authorize_metadata() {
        let (model, _) = extract(
            r#"
            #[api_controller(path = "customers", rest)]
            #[domain(name = "Customer", order = 1)]
            pub struct CustomerController;

            impl CustomerController {
                #[route(method = "POST", path = "")]
                #[operation(order = 1, description = "Creates a customer")]
                #[status(code = 201)]
                #[authorize("hasRole('ROLE_ADMIN')")]
                pub fn create(&self) {}
            }
        "#,
        );

        let operation = &model.domains[0].operations[0];
        assert_eq!(operation.response_status, "201 - Created");
        assert_eq!(operation.role, "ROLE_ADMIN");
    }

    #[test]
    fn test_custom_ignore_attribute() {
        let (model, reporter) = extract_with_config(
            r#"
            #[api_controller(path = "customers", rest)]
            #[domain(name = "Customer", order = 1)]
            pub struct CustomerController;

            impl CustomerController {
                #[route(method = "GET", path = "")]
                #[operation(order = 1, description = "Lists customers")]
                pub fn list(&self) {}

                #[route(method = "GET", path = "internal")]
                #[no_docs]
                pub fn internal(&self) {}
            }
        "#,
            &Config {
                custom_ignore_attribute: "no_docs".to_string(),
                ..Config::default()
            },
        );

        assert_eq!(model.domains[0].operations.len(), 1);
        assert_eq!(reporter.ignored_count(), 1);
        assert_eq!(reporter.undocumented_count(), 0);
    }

    #[test]
    fn test_documentation_suffix_counterpart() {
        let (model, reporter) = extract_with_config(
            r#"
            #[api_controller(path = "customers", rest)]
            pub struct CustomerController;

            impl CustomerController {
                #[route(method = "GET", path = "")]
                pub fn list(&self) {}
            }

            #[domain(name = "Customer", order = 1)]
            pub struct CustomerControllerDocumentation;

            impl CustomerControllerDocumentation {
                #[operation(order = 1, description = "Lists customers")]
                pub fn list(&self) {}
            }
        "#,
            &Config {
                documentation_suffix: "Documentation".to_string(),
                ..Config::default()
            },
        );

        assert_eq!(model.domains[0].operations.len(), 1);
        assert_eq!(reporter.undocumented_count(), 0);
    }

    #[test]
    fn test_join_path_normalization() {
        assert_eq!(join_path("customers", "{id}"), "/customers/{id}");
        assert_eq!(join_path("/customers/", "/{id}"), "/customers/{id}");
        assert_eq!(join_path("customers", ""), "/customers");
        assert_eq!(join_path("", ""), "/");
    }
}
