//! Small networks with known dynamics.

use crate::model::NetworkModel;
use crate::state::Expr;
use biodivine_lib_param_bn::BooleanNetwork;

/// Every variable is the constant `true`. The only attractor is the all-true fixed point.
pub fn constant_true(names: &[&str]) -> NetworkModel {
    names
        .iter()
        .fold(NetworkModel::new(), |model, name| {
            model.with_rule(*name, Expr::constant(true))
        })
}

/// `A := !B`, `B := !A`.
///
/// Synchronously, `A=0,B=1` and `A=1,B=0` are fixed points, and `A=0,B=0` and `A=1,B=1`
/// form a 2-cycle.
pub fn negative_loop() -> NetworkModel {
    NetworkModel::new()
        .with_rule("A", !Expr::var("B"))
        .with_rule("B", !Expr::var("A"))
}

/// `A := true`, `B := A`, `C := A & B`.
///
/// The only attractor is the fixed point `A=1,B=1,C=1`, reached from every state in
/// at most two steps.
pub fn cascade() -> NetworkModel {
    NetworkModel::new()
        .with_constant("A", true)
        .with_rule("B", Expr::var("A"))
        .with_rule("C", Expr::var("A") & Expr::var("B"))
}

/// A repressilator: `A := !C`, `B := !A`, `C := !B`.
///
/// There are no fixed points. The states `000` and `111` form a 2-cycle, all other
/// states form one 6-cycle.
pub fn oscillator() -> NetworkModel {
    NetworkModel::new()
        .with_rule("A", !Expr::var("C"))
        .with_rule("B", !Expr::var("A"))
        .with_rule("C", !Expr::var("B"))
}

/// The [`cascade`] network in the `.aeon` format.
pub const CASCADE_AEON: &str = r#"
A -> B
A -> C
B -> C
$A: true
$B: A
$C: A & B
"#;

/// The [`oscillator`] network in the `.aeon` format.
pub const OSCILLATOR_AEON: &str = r#"
C -| A
A -| B
B -| C
$A: !C
$B: !A
$C: !B
"#;

/// A network where `B` has an unknown (implicit) update function and `C` uses an
/// uninterpreted parameter `f`.
pub const PARTIAL_AEON: &str = r#"
A -> B
A -?? C
B -?? C
$A: true
$C: f(A, B)
"#;

pub fn parse_aeon(aeon: &str) -> BooleanNetwork {
    BooleanNetwork::try_from(aeon).unwrap()
}
