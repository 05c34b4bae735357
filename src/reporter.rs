//! Documentation coverage accounting.
//!
//! The reporter is a pure accumulator: the extractor and the registry record
//! every decision (documented / undocumented / ignored) per controller method,
//! error handler and model field, and the pipeline reads the verdict at the
//! end. Nothing in here aborts a run.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default)]
pub struct ControllerProgress {
    pub ignored: bool,
    pub ignore_reason: String,
    pub undocumented: bool,
    pub documented_methods: BTreeSet<String>,
    pub ignored_methods: BTreeSet<String>,
    pub undocumented_methods: BTreeSet<String>,
    pub documented_error_handlers: BTreeSet<String>,
    pub ignored_error_handlers: BTreeSet<String>,
    pub undocumented_error_handlers: BTreeSet<String>,
}

#[derive(Debug, Default)]
pub struct ModelProgress {
    pub documented_fields: BTreeSet<String>,
    pub undocumented_fields: BTreeSet<String>,
    pub ignored_fields: BTreeSet<String>,
}

/// Accumulates per-entity documentation coverage and produces the run verdict
/// and the human-readable reports.
#[derive(Debug, Default)]
pub struct CoverageReporter {
    controllers: BTreeMap<String, ControllerProgress>,
    models: BTreeMap<String, ModelProgress>,
}

impl CoverageReporter {
    pub fn new() -> CoverageReporter {
        CoverageReporter::default()
    }

    fn controller(&mut self, controller: &str) -> &mut ControllerProgress {
        self.controllers.entry(controller.to_string()).or_default()
    }

    fn model(&mut self, model: &str) -> &mut ModelProgress {
        self.models.entry(model.to_string()).or_default()
    }

    pub fn add_undocumented_controller(&mut self, controller: &str) {
        self.controller(controller).undocumented = true;
    }

    pub fn add_ignored_controller(&mut self, controller: &str, reason: &str) {
        let progress = self.controller(controller);
        progress.ignored = true;
        progress.ignore_reason = reason.to_string();
    }

    pub fn add_documented_method(&mut self, controller: &str, method: &str) {
        self.controller(controller)
            .documented_methods
            .insert(method.to_string());
    }

    pub fn add_ignored_method(&mut self, controller: &str, method: &str) {
        self.controller(controller)
            .ignored_methods
            .insert(method.to_string());
    }

    pub fn add_undocumented_method(&mut self, controller: &str, method: &str) {
        self.controller(controller)
            .undocumented_methods
            .insert(method.to_string());
    }

    pub fn add_documented_error_handler(&mut self, controller: &str, handler: &str) {
        self.controller(controller)
            .documented_error_handlers
            .insert(handler.to_string());
    }

    pub fn add_ignored_error_handler(&mut self, controller: &str, handler: &str) {
        self.controller(controller)
            .ignored_error_handlers
            .insert(handler.to_string());
    }

    pub fn add_undocumented_error_handler(&mut self, controller: &str, handler: &str) {
        self.controller(controller)
            .undocumented_error_handlers
            .insert(handler.to_string());
    }

    pub fn add_documented_field(&mut self, model: &str, field: &str) {
        self.model(model).documented_fields.insert(field.to_string());
    }

    pub fn add_undocumented_field(&mut self, model: &str, field: &str) {
        self.model(model)
            .undocumented_fields
            .insert(field.to_string());
    }

    pub fn add_ignored_field(&mut self, model: &str, field: &str) {
        self.model(model).ignored_fields.insert(field.to_string());
    }

    fn sum<F>(&self, select: F) -> usize
    where
        F: Fn(&ControllerProgress) -> usize,
    {
        self.controllers.values().map(select).sum()
    }

    fn field_sum<F>(&self, select: F) -> usize
    where
        F: Fn(&ModelProgress) -> usize,
    {
        self.models.values().map(select).sum()
    }

    pub fn documented_count(&self) -> usize {
        self.sum(|c| c.documented_methods.len() + c.documented_error_handlers.len())
            + self.field_sum(|m| m.documented_fields.len())
    }

    /// Count feeding the break-on-undocumented gate: methods, error handlers
    /// and model fields without documentation.
    pub fn undocumented_count(&self) -> usize {
        self.sum(|c| c.undocumented_methods.len() + c.undocumented_error_handlers.len())
            + self.field_sum(|m| m.undocumented_fields.len())
    }

    pub fn ignored_count(&self) -> usize {
        self.sum(|c| c.ignored_methods.len() + c.ignored_error_handlers.len())
            + self.field_sum(|m| m.ignored_fields.len())
    }

    /// Coverage percentage including ignored items in the denominator.
    pub fn coverage(&self) -> f64 {
        percentage(
            self.documented_count(),
            self.documented_count() + self.undocumented_count() + self.ignored_count(),
        )
    }

    /// Coverage percentage with ignored items excluded.
    pub fn coverage_without_ignored(&self) -> f64 {
        percentage(
            self.documented_count(),
            self.documented_count() + self.undocumented_count(),
        )
    }

    pub fn print_overall_progress_report(&self) {
        self.print_progress_report();
        self.print_progress_table();
        self.print_summary_report();
    }

    fn print_progress_report(&self) {
        print_separator();
        println!();
        println!(" DOCUMENTATION PROGRESS REPORT");
        println!();
        print_separator();
        println!("#############################");
        println!(" Undocumented Controllers:");
        println!("#############################");
        for (name, progress) in &self.controllers {
            if progress.undocumented {
                self.print_controller(name, progress);
            }
        }
        println!("#############################");
        println!(" Ignored Controllers:");
        println!("#############################");
        for (name, progress) in &self.controllers {
            if progress.ignored {
                println!("Reason to ignore controller: {}", progress.ignore_reason);
                self.print_controller(name, progress);
            }
        }
        println!("#############################");
        println!(" Documented Controllers:");
        println!("#############################");
        for (name, progress) in &self.controllers {
            if !progress.ignored && !progress.undocumented {
                self.print_controller(name, progress);
            }
        }
        print_separator();
        for (name, progress) in &self.models {
            println!("Model {}\n", name);
            print_item_block("Documented fields", &progress.documented_fields);
            print_item_block("Ignored fields", &progress.ignored_fields);
            print_item_block("Undocumented fields", &progress.undocumented_fields);
            println!(
                "- - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - -"
            );
        }
    }

    fn print_controller(&self, name: &str, progress: &ControllerProgress) {
        println!("Controller {}\n", name);
        print_item_block("Undocumented methods", &progress.undocumented_methods);
        print_item_block("Ignored methods", &progress.ignored_methods);
        print_item_block(
            "Undocumented error handlers",
            &progress.undocumented_error_handlers,
        );
        println!();
    }

    fn print_progress_table(&self) {
        print_separator();
        println!();
        println!(" DOCUMENTATION PROGRESS TABLE");
        println!();
        print_separator();
        println!(
            "| {:<45}|  DOCUMENTED  | UNDOCUMENTED |   IGNORED   |",
            "CONTROLLER"
        );
        print_separator();
        for (name, progress) in &self.controllers {
            println!(
                "| {:<45}| {:<13}| {:<13}| {:<12}|",
                name,
                progress.documented_methods.len() + progress.documented_error_handlers.len(),
                progress.undocumented_methods.len() + progress.undocumented_error_handlers.len(),
                progress.ignored_methods.len() + progress.ignored_error_handlers.len()
            );
        }
        print_separator();
        println!(
            "| {:<45}|  DOCUMENTED  | UNDOCUMENTED |   IGNORED   |",
            "MODEL"
        );
        print_separator();
        for (name, progress) in &self.models {
            println!(
                "| {:<45}| {:<13}| {:<13}| {:<12}|",
                name,
                progress.documented_fields.len(),
                progress.undocumented_fields.len(),
                progress.ignored_fields.len()
            );
        }
        print_separator();
    }

    fn print_summary_report(&self) {
        let undocumented_controllers = self.controllers.values().filter(|c| c.undocumented).count();
        let ignored_controllers = self.controllers.values().filter(|c| c.ignored).count();

        print_separator();
        println!();
        println!(" DOCUMENTATION SUMMARY REPORT");
        println!();
        print_separator();
        println!("Overall controllers: {}", self.controllers.len());
        println!("Undocumented controllers: {}", undocumented_controllers);
        println!("Ignored controllers: {}", ignored_controllers);
        println!(
            "Documented methods: {}",
            self.sum(|c| c.documented_methods.len())
        );
        println!(
            "Documented error handlers: {}",
            self.sum(|c| c.documented_error_handlers.len())
        );
        println!(
            "Undocumented methods: {}",
            self.sum(|c| c.undocumented_methods.len())
        );
        println!(
            "Undocumented error handlers: {}",
            self.sum(|c| c.undocumented_error_handlers.len())
        );
        println!(
            "Ignored methods: {}",
            self.sum(|c| c.ignored_methods.len())
        );
        println!(
            "Ignored error handlers: {}",
            self.sum(|c| c.ignored_error_handlers.len())
        );
        println!("Models: {}", self.models.len());
        println!(
            "Documented fields: {}",
            self.field_sum(|m| m.documented_fields.len())
        );
        println!(
            "Undocumented fields: {}",
            self.field_sum(|m| m.undocumented_fields.len())
        );
        println!(
            "Ignored fields: {}",
            self.field_sum(|m| m.ignored_fields.len())
        );
        print_separator();
        println!("Documentation coverage: {:.2}%", self.coverage());
        println!(
            "Documentation coverage without ignored: {:.2}%",
            self.coverage_without_ignored()
        );
        print_separator();
    }
}

/// Degenerates to 0.00 instead of NaN when there is nothing to divide.
fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

fn print_separator() {
    println!(
        "---------------------------------------------------------------------------------------"
    );
}

fn print_item_block(title: &str, items: &BTreeSet<String>) {
    if !items.is_empty() {
        println!("**** {} ****", title);
        for item in items {
            println!("{}", item);
        }
    }
}
