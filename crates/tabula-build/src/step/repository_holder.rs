use crate::{
    codegen,
    step::{BuildContext, ProcessingStep, Round},
};

///
/// RepositoryHolderStep
/// Terminal round only: the repository factory and `REGISTRATION`.
///

pub struct RepositoryHolderStep;

impl ProcessingStep for RepositoryHolderStep {
    fn name(&self) -> &'static str {
        "repository_holder"
    }

    fn process(&mut self, round: &Round<'_>, context: &mut BuildContext) {
        if !round.processing_over {
            return;
        }

        let tokens = codegen::holder::repository_holder(&context.registry, &context.emittable_models());
        context.emit("repository_holder", tokens);
    }
}
