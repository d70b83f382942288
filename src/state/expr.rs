use crate::state::{BooleanState, Variable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Reasons why an [`Expr`] cannot be reduced to a truth value.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum EvalError {
    #[error("variable `{0}` has no value in the evaluated state")]
    UnboundSymbol(Variable),
    #[error("uninterpreted function `{0}` cannot be evaluated")]
    Uninterpreted(String),
}

/// A Boolean update expression over network variables.
///
/// `Uninterpreted` represents an unknown (parametrized) function. It can appear when a
/// network is converted from a partially specified model and never evaluates to a value.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Expr {
    Const(bool),
    Var(Variable),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Xor(Box<Expr>, Box<Expr>),
    Iff(Box<Expr>, Box<Expr>),
    Imp(Box<Expr>, Box<Expr>),
    Uninterpreted { name: String, args: Vec<Expr> },
}

impl Expr {
    pub fn var(name: impl Into<Variable>) -> Expr {
        Expr::Var(name.into())
    }

    pub fn constant(value: bool) -> Expr {
        Expr::Const(value)
    }

    pub fn iff(self, other: Expr) -> Expr {
        Expr::Iff(Box::new(self), Box::new(other))
    }

    pub fn implies(self, other: Expr) -> Expr {
        Expr::Imp(Box::new(self), Box::new(other))
    }

    /// Evaluate the expression in the given state.
    ///
    /// Binary operators follow the three-valued (Kleene) reading: `false & ?` is `false` and
    /// `true | ?` is `true` even when `?` cannot be evaluated, the same way a partial
    /// substitution would simplify the expression. Remaining unknowns produce an error.
    pub fn evaluate(&self, values: &BooleanState) -> Result<bool, EvalError> {
        match self {
            Expr::Const(value) => Ok(*value),
            Expr::Var(name) => values
                .get(name.as_str())
                .ok_or_else(|| EvalError::UnboundSymbol(name.clone())),
            Expr::Not(inner) => inner.evaluate(values).map(|it| !it),
            Expr::And(left, right) => match (left.evaluate(values), right.evaluate(values)) {
                (Ok(false), _) | (_, Ok(false)) => Ok(false),
                (Ok(true), Ok(true)) => Ok(true),
                (Err(e), _) | (_, Err(e)) => Err(e),
            },
            Expr::Or(left, right) => match (left.evaluate(values), right.evaluate(values)) {
                (Ok(true), _) | (_, Ok(true)) => Ok(true),
                (Ok(false), Ok(false)) => Ok(false),
                (Err(e), _) | (_, Err(e)) => Err(e),
            },
            Expr::Imp(left, right) => match (left.evaluate(values), right.evaluate(values)) {
                (Ok(false), _) | (_, Ok(true)) => Ok(true),
                (Ok(true), Ok(false)) => Ok(false),
                (Err(e), _) | (_, Err(e)) => Err(e),
            },
            Expr::Xor(left, right) => Ok(left.evaluate(values)? ^ right.evaluate(values)?),
            Expr::Iff(left, right) => Ok(left.evaluate(values)? == right.evaluate(values)?),
            Expr::Uninterpreted { name, .. } => Err(EvalError::Uninterpreted(name.clone())),
        }
    }

    /// All variables that appear in this expression.
    pub fn support(&self) -> BTreeSet<&Variable> {
        let mut result = BTreeSet::new();
        self.collect_support(&mut result);
        result
    }

    fn collect_support<'a>(&'a self, result: &mut BTreeSet<&'a Variable>) {
        match self {
            Expr::Const(_) => (),
            Expr::Var(name) => {
                result.insert(name);
            }
            Expr::Not(inner) => inner.collect_support(result),
            Expr::And(l, r)
            | Expr::Or(l, r)
            | Expr::Xor(l, r)
            | Expr::Iff(l, r)
            | Expr::Imp(l, r) => {
                l.collect_support(result);
                r.collect_support(result);
            }
            Expr::Uninterpreted { args, .. } => {
                for arg in args {
                    arg.collect_support(result);
                }
            }
        }
    }
}

impl std::ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

impl std::ops::BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        Expr::And(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        Expr::Or(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::BitXor for Expr {
    type Output = Expr;

    fn bitxor(self, rhs: Expr) -> Expr {
        Expr::Xor(Box::new(self), Box::new(rhs))
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Const(value) => write!(f, "{value}"),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Not(inner) => write!(f, "!{inner}"),
            Expr::And(l, r) => write!(f, "({l} & {r})"),
            Expr::Or(l, r) => write!(f, "({l} | {r})"),
            Expr::Xor(l, r) => write!(f, "({l} ^ {r})"),
            Expr::Iff(l, r) => write!(f, "({l} <=> {r})"),
            Expr::Imp(l, r) => write!(f, "({l} => {r})"),
            Expr::Uninterpreted { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}
