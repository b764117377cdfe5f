//! Module: step
//! Responsibility: ordered processing of declarations into registry entries
//! and generated units.
//! Does not own: the structural rules (validators) or the token shapes (codegen).
//!
//! Invariants:
//! - Steps run in a fixed order within every round.
//! - The last round carries no declarations and has `processing_over` set;
//!   only the holder steps act on it.
//! - A model with any error is neither emitted nor aggregated.

mod adapter_holder;
mod column;
mod migration;
mod model_adapter;
mod repository;
mod repository_holder;
mod type_adapter;

pub use adapter_holder::AdapterHolderStep;
pub use column::ColumnStep;
pub use migration::MigrationStep;
pub use model_adapter::ModelAdapterStep;
pub use repository::RepositoryStep;
pub use repository_holder::RepositoryHolderStep;
pub use type_adapter::TypeAdapterStep;

use proc_macro2::TokenStream;
use std::collections::BTreeSet;
use tabula_schema::prelude::*;

///
/// Round
///

pub struct Round<'a> {
    pub declarations: &'a Declarations,
    pub processing_over: bool,
}

///
/// Unit
/// One generated item, labelled for ordering checks and debugging.
///

#[derive(Clone, Debug)]
pub struct Unit {
    pub label: String,
    pub tokens: TokenStream,
}

///
/// BuildContext
/// State shared by every step of one build.
///

#[derive(Debug, Default)]
pub struct BuildContext {
    pub registry: Registry,
    pub diagnostics: Diagnostics,
    pub units: Vec<Unit>,
    failed_models: BTreeSet<String>,
}

impl BuildContext {
    pub fn emit(&mut self, label: impl Into<String>, tokens: TokenStream) {
        self.units.push(Unit {
            label: label.into(),
            tokens,
        });
    }

    pub fn fail_model(&mut self, qualified: &str) {
        self.failed_models.insert(qualified.to_string());
    }

    #[must_use]
    pub fn is_failed(&self, qualified: &str) -> bool {
        self.failed_models.contains(qualified)
    }

    /// Registered models that made it through validation, in declaration order.
    #[must_use]
    pub fn emittable_models(&self) -> Vec<&ModelElement> {
        self.registry
            .model_elements()
            .filter(|model| !self.is_failed(&model.qualified))
            .collect()
    }

    /// Concatenated source of every unit.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("// @generated by tabula-build. Do not edit.\n");
        for unit in &self.units {
            out.push('\n');
            out.push_str(&unit.tokens.to_string());
            out.push('\n');
        }

        out
    }
}

///
/// ProcessingStep
///

pub trait ProcessingStep {
    fn name(&self) -> &'static str;

    fn process(&mut self, round: &Round<'_>, context: &mut BuildContext);
}

///
/// Pipeline
///

pub struct Pipeline {
    steps: Vec<Box<dyn ProcessingStep>>,
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: vec![
                Box::new(MigrationStep),
                Box::new(TypeAdapterStep::default()),
                Box::new(ColumnStep),
                Box::new(ModelAdapterStep),
                Box::new(RepositoryStep::default()),
                Box::new(AdapterHolderStep),
                Box::new(RepositoryHolderStep),
            ],
        }
    }

    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// One discovery round over `declarations`, then the terminal round.
    #[must_use]
    pub fn run(mut self, declarations: &Declarations) -> BuildContext {
        let mut context = BuildContext::default();
        let empty = Declarations::default();

        for (declarations, processing_over) in [(declarations, false), (&empty, true)] {
            let round = Round {
                declarations,
                processing_over,
            };
            for step in &mut self.steps {
                step.process(&round, &mut context);
            }
        }

        context
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
