use crate::state::BooleanState;

/// Markers whose activity indicates cell division.
pub const PHENOTYPE_MARKERS: [&str; 3] = ["CDK2", "CDK4", "pRB"];

/// Fraction of [`PHENOTYPE_MARKERS`] that must be active for a dividing phenotype.
pub const DEFAULT_PHENOTYPE_THRESHOLD: f64 = 0.6;

/// True if at least `threshold` (a fraction in `[0, 1]`) of the [`PHENOTYPE_MARKERS`] are
/// active in `state`. Markers missing from `state` are inactive.
pub fn is_cell_division_phenotype(state: &BooleanState, threshold: f64) -> bool {
    let active = PHENOTYPE_MARKERS
        .iter()
        .filter(|it| state.get(it).unwrap_or(false))
        .count();
    active as f64 / PHENOTYPE_MARKERS.len() as f64 >= threshold
}
