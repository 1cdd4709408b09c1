//! Locating the array a snippet sorts.
//!
//! Every variable declaration in the program is visited in source order,
//! including declarations inside function bodies. The first declarator
//! initialized with an array literal binds; later arrays are ignored even
//! if the code only ever touches them.

use sortscope_syntax::ast::{ExprKind, VarDecl};
use sortscope_syntax::visit::Visit;
use sortscope_syntax::Program;
use tracing::debug;

use crate::error::SynthError;

/// The array bound by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredArray {
    pub name: String,
    pub values: Vec<i64>,
}

/// Finds the first array-literal declaration in `program`.
///
/// Elements that are not numeric literals become `0` so the array keeps its
/// length. Fractional literals are truncated toward zero.
pub fn discover(program: &Program) -> Result<DiscoveredArray, SynthError> {
    let mut finder = ArrayFinder { found: None };
    finder.visit_program(program);

    let Some(array) = finder.found else {
        return Err(SynthError::NoArrayFound {
            reason: "no variable is initialized with an array literal".to_string(),
        });
    };
    if array.values.is_empty() {
        return Err(SynthError::NoArrayFound {
            reason: format!("array '{}' is empty", array.name),
        });
    }
    debug!(name = %array.name, len = array.values.len(), "discovered array");
    Ok(array)
}

struct ArrayFinder {
    found: Option<DiscoveredArray>,
}

impl<'ast> Visit<'ast> for ArrayFinder {
    fn visit_var_decl(&mut self, decl: &'ast VarDecl) {
        for declarator in &decl.declarators {
            if self.found.is_some() {
                return;
            }
            let Some(init) = &declarator.init else {
                continue;
            };
            match &init.kind {
                ExprKind::Array(items) => {
                    let values = items
                        .iter()
                        .map(|item| item.as_number().map(literal_to_int).unwrap_or(0))
                        .collect();
                    self.found = Some(DiscoveredArray {
                        name: declarator.name.clone(),
                        values,
                    });
                }
                // Arrays declared inside this initializer precede later declarators.
                _ => self.visit_expr(init),
            }
        }
    }
}

/// Truncates a numeric literal to an integer, saturating at the i64 range.
pub(crate) fn literal_to_int(n: f64) -> i64 {
    n as i64
}
