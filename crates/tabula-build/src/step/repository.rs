use crate::{
    codegen::{self, ModelNames},
    step::{BuildContext, ProcessingStep, Round},
};
use std::collections::BTreeSet;
use tabula_schema::{attr, prelude::*, validate::RepositoryValidator};

///
/// RepositoryStep
/// Attaches `#[repository_for]` traits to their models, then emits one
/// repository per valid model.
///

#[derive(Default)]
pub struct RepositoryStep {
    emitted: BTreeSet<String>,
}

impl ProcessingStep for RepositoryStep {
    fn name(&self) -> &'static str {
        "repository"
    }

    fn process(&mut self, round: &Round<'_>, context: &mut BuildContext) {
        if round.processing_over {
            return;
        }

        for decl in round.declarations.annotated_with(Annotation::RepositoryFor) {
            if !RepositoryValidator.validate(&context.registry, decl, &mut context.diagnostics) {
                continue;
            }
            let Ok(path) = attr::model_path_arg(&decl.attr) else {
                continue;
            };
            let model = decl
                .scope
                .resolve_with(&path, |model| context.registry.get_model_element(model).is_some());

            if let Some(existing) = context
                .registry
                .get_model_element(&model)
                .and_then(|m| m.repository.as_ref())
            {
                let message = format!(
                    "{model} already has a #[repository_for] trait ({}); found another on {}",
                    existing.qualified,
                    decl.qualified()
                );
                context.diagnostics.error(Some(&decl.location), message);
                context.fail_model(&model);
                continue;
            }

            context.registry.set_repository_element(RepositoryElement {
                ident: decl.ident.clone(),
                qualified: decl.qualified(),
                model,
                location: decl.location.clone(),
            });
        }

        let pending: Vec<ModelElement> = context
            .emittable_models()
            .into_iter()
            .filter(|model| !self.emitted.contains(&model.qualified))
            .cloned()
            .collect();

        for model in pending {
            let names = ModelNames::of(&context.registry, &model);
            let tokens = codegen::repository::generate(&model, &names);

            context.emit(format!("repository {}", model.qualified), tokens);
            self.emitted.insert(model.qualified);
        }
    }
}
