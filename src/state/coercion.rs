use crate::state::{BooleanState, Expr, Variable};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value assigned to a variable before it is known to be a crisp Boolean.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum RawValue {
    /// Already a crisp value.
    Bool(bool),
    /// A relational (inequality) expression, e.g. `x > 2`, that cannot be decided
    /// without further context.
    Relational(String),
    /// A logical expression which may become a value once its free variables are substituted.
    Symbolic(Expr),
    /// A numeric value; interpreted by its truthiness.
    Integer(i64),
    /// A missing value.
    Null,
}

/// A state assignment that may contain unresolved values.
pub type RawState = BTreeMap<Variable, RawValue>;

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<Expr> for RawValue {
    fn from(value: Expr) -> Self {
        match value {
            Expr::Const(value) => RawValue::Bool(value),
            expr => RawValue::Symbolic(expr),
        }
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl RawValue {
    /// Non-null and non-zero. A symbolic value is only "zero" when it is the literal `false`.
    fn is_truthy(&self) -> bool {
        match self {
            RawValue::Bool(value) => *value,
            RawValue::Relational(_) => true,
            RawValue::Symbolic(expr) => *expr != Expr::Const(false),
            RawValue::Integer(value) => *value != 0,
            RawValue::Null => false,
        }
    }
}

/// Reduce a [`RawValue`] to a crisp Boolean. Never fails.
///
/// | value        | result                                                            |
/// |--------------|-------------------------------------------------------------------|
/// | `Bool`       | the value itself                                                  |
/// | `Relational` | `false`                                                           |
/// | `Symbolic`   | evaluation under `context`; truthiness if the evaluation fails    |
/// | `Integer`    | `value != 0`                                                      |
/// | `Null`       | `false`                                                           |
pub fn safe_coerce(raw: &RawValue, context: &BooleanState) -> bool {
    match raw {
        RawValue::Bool(value) => *value,
        RawValue::Relational(relation) => {
            trace!("Relational value `{relation}` coerced to `false`.");
            false
        }
        RawValue::Symbolic(expr) => match expr.evaluate(context) {
            Ok(value) => value,
            Err(error) => {
                let fallback = raw.is_truthy();
                trace!("Cannot evaluate `{expr}` ({error}); using truthiness `{fallback}`.");
                fallback
            }
        },
        RawValue::Integer(value) => *value != 0,
        RawValue::Null => false,
    }
}

/// Coerce every value of a [`RawState`].
///
/// Symbolic values are evaluated in the context of the crisp values of the same state.
pub fn coerce_state(state: &RawState) -> BooleanState {
    let context: BooleanState = state
        .iter()
        .filter_map(|(k, v)| match v {
            RawValue::Bool(value) => Some((k.clone(), *value)),
            _ => None,
        })
        .collect();
    state
        .iter()
        .map(|(k, v)| (k.clone(), safe_coerce(v, &context)))
        .collect()
}
