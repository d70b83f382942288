use crate::model::NetworkModel;
use crate::state::{Expr, Variable};
use biodivine_lib_param_bn::{BinaryOp, BooleanNetwork, FnUpdate};

/// Convert a [`BooleanNetwork`] into a [`NetworkModel`].
///
/// Explicit update functions are translated one-to-one. Implicit (unspecified) update
/// functions become variables without a rule, and explicit parameters become
/// [`Expr::Uninterpreted`]. In both cases, simulation keeps the current value of the variable,
/// since no concrete function is known.
impl From<&BooleanNetwork> for NetworkModel {
    fn from(network: &BooleanNetwork) -> Self {
        let mut model = NetworkModel::new();
        for var in network.variables() {
            let name = Variable::from(network.get_variable_name(var).as_str());
            model = match network.get_update_function(var) {
                Some(function) => model.with_rule(name, convert_function(network, function)),
                None => model.with_variable(name),
            };
        }
        model
    }
}

impl From<BooleanNetwork> for NetworkModel {
    fn from(value: BooleanNetwork) -> Self {
        NetworkModel::from(&value)
    }
}

fn convert_function(network: &BooleanNetwork, function: &FnUpdate) -> Expr {
    match function {
        FnUpdate::Const(value) => Expr::Const(*value),
        FnUpdate::Var(id) => Expr::var(network.get_variable_name(*id).as_str()),
        FnUpdate::Param(id, args) => Expr::Uninterpreted {
            name: network.get_parameter(*id).get_name().clone(),
            args: args
                .iter()
                .map(|it| convert_function(network, it))
                .collect(),
        },
        FnUpdate::Not(inner) => !convert_function(network, inner),
        FnUpdate::Binary(op, left, right) => {
            let left = convert_function(network, left);
            let right = convert_function(network, right);
            match op {
                BinaryOp::And => left & right,
                BinaryOp::Or => left | right,
                BinaryOp::Xor => left ^ right,
                BinaryOp::Iff => left.iff(right),
                BinaryOp::Imp => left.implies(right),
            }
        }
    }
}
