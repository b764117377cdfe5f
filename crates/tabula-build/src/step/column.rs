use crate::step::{BuildContext, ProcessingStep, Round};
use tabula_schema::{prelude::*, validate::ColumnValidator};

///
/// ColumnStep
///
/// Reports `#[column]` and `#[foreign_key]` placed outside a `#[table]`
/// struct. Columns of tables are registered by `ModelAdapterStep`, which
/// needs the adapter registry complete first.
///

pub struct ColumnStep;

impl ProcessingStep for ColumnStep {
    fn name(&self) -> &'static str {
        "column"
    }

    fn process(&mut self, round: &Round<'_>, context: &mut BuildContext) {
        for decl in round.declarations.annotated_with(Annotation::Column) {
            let in_table = matches!(&decl.item, Item::Field { owner, .. } if owner.is_table);
            if !in_table {
                ColumnValidator.validate(&context.registry, decl, &mut context.diagnostics);
            }
        }

        for decl in round.declarations.annotated_with(Annotation::ForeignKey) {
            let Item::Field { owner, field } = &decl.item else {
                err!(
                    context.diagnostics,
                    &decl.location,
                    "{} not applicable to this kind of declaration ({} `{}`)",
                    decl.annotation,
                    decl.item.kind(),
                    decl.ident
                );
                continue;
            };

            let has_column = field
                .attrs
                .iter()
                .any(|attr| Annotation::of(attr) == Some(Annotation::Column));
            if !has_column {
                err!(
                    context.diagnostics,
                    &decl.location,
                    "#[foreign_key] on {}.{} requires #[column] on the same field",
                    owner.ident,
                    decl.ident
                );
            }
        }
    }
}
