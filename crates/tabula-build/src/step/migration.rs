use crate::step::{BuildContext, ProcessingStep, Round};
use tabula_schema::{attr::MigrationArgs, prelude::*, validate::MigrationValidator};

///
/// MigrationStep
///

pub struct MigrationStep;

impl ProcessingStep for MigrationStep {
    fn name(&self) -> &'static str {
        "migration"
    }

    fn process(&mut self, round: &Round<'_>, context: &mut BuildContext) {
        for decl in round.declarations.annotated_with(Annotation::Migration) {
            if !MigrationValidator.validate(&context.registry, decl, &mut context.diagnostics) {
                continue;
            }
            let Ok(args) = MigrationArgs::parse(&decl.attr) else {
                continue;
            };

            context.registry.add_migration_element(MigrationElement {
                version: args.version,
                qualified: decl.qualified(),
                location: decl.location.clone(),
            });
        }
    }
}
