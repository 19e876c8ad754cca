use super::Serializer;
use crate::Options;

use grist_core::{
    stmt::{Literal, LiteralKind, LiteralOperand},
    Error, Result,
};

impl Serializer<'_> {
    /// Renders a literal node.
    ///
    /// An alias is appended unless the literal is rendered as the operand of
    /// another literal or projection aliases are disabled.
    pub(super) fn literal(&self, literal: &Literal, opts: &Options) -> Result<String> {
        let aliased = !opts.sub_field() && !opts.no_projection_aliases();

        let sql = match &literal.kind {
            LiteralKind::Raw(sql) => sql.clone(),
            LiteralKind::Field(LiteralOperand::Literal(inner)) => {
                return self.literal(inner, opts);
            }
            LiteralKind::Field(LiteralOperand::Field(field_ref)) => {
                let column = self.column_ref(field_ref, literal.escape)?;

                if !aliased {
                    return Ok(column);
                }

                let alias = match &literal.alias {
                    Some(alias) => alias.clone(),
                    None => field_ref.to_string(),
                };

                return Ok(format!("{column} AS {}", self.dialect.escape_id(&alias)));
            }
            LiteralKind::Count(None) => "COUNT(*)".to_string(),
            LiteralKind::Count(Some(operand)) => {
                format!("COUNT({})", self.literal_operand(operand, literal, opts)?)
            }
            LiteralKind::Sum(operand) => {
                format!("SUM({})", self.literal_operand(operand, literal, opts)?)
            }
            LiteralKind::Avg(operand) => {
                format!("AVG({})", self.literal_operand(operand, literal, opts)?)
            }
            LiteralKind::Min(operand) => {
                format!("MIN({})", self.literal_operand(operand, literal, opts)?)
            }
            LiteralKind::Max(operand) => {
                format!("MAX({})", self.literal_operand(operand, literal, opts)?)
            }
            LiteralKind::Distinct(None) => return Ok("DISTINCT".to_string()),
            LiteralKind::Distinct(Some(operand)) => {
                let operand = self.literal_operand(operand, literal, opts)?;

                // Inside an aggregate, e.g. `COUNT(DISTINCT x)`
                if opts.sub_field() {
                    return Ok(format!("DISTINCT {operand}"));
                }

                if !self.dialect.capability().distinct_on {
                    return Err(Error::unsupported_feature(format!(
                        "DISTINCT ON is not supported by {}",
                        self.dialect.name()
                    )));
                }

                return Ok(format!("DISTINCT ON({operand})"));
            }
        };

        match &literal.alias {
            Some(alias) if aliased => Ok(format!("{sql} AS {}", self.dialect.escape_id(alias))),
            _ => Ok(sql),
        }
    }

    /// Renders the operand of an aggregate or `DISTINCT`. Nested literals are
    /// rendered as sub-fields, which suppresses their alias.
    fn literal_operand(
        &self,
        operand: &LiteralOperand,
        parent: &Literal,
        opts: &Options,
    ) -> Result<String> {
        match operand {
            LiteralOperand::Field(field_ref) => self.column_ref(field_ref, parent.escape),
            LiteralOperand::Literal(inner) => {
                self.literal(inner, &opts.derive(|o| o.sub_field = Some(true)))
            }
        }
    }
}
