use crate::{
    codegen,
    step::{BuildContext, ProcessingStep, Round},
};

///
/// AdapterHolderStep
/// Terminal round only: migrations, user type adapters and model adapters.
///

pub struct AdapterHolderStep;

impl ProcessingStep for AdapterHolderStep {
    fn name(&self) -> &'static str {
        "adapter_holder"
    }

    fn process(&mut self, round: &Round<'_>, context: &mut BuildContext) {
        if !round.processing_over {
            return;
        }

        let tokens = codegen::holder::adapter_holder(&context.registry, &context.emittable_models());
        context.emit("adapter_holder", tokens);
    }
}
