use crate::analysis::{AnalysisError, analyze_attractors_uncached};
use crate::catalog::AttractorCatalog;
use crate::model::NetworkModel;
use crate::solver::StableStateSolver;
use crate::state::Variable;
use cancel_this::is_cancelled;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Cell cycle markers of the ERBB/G1-S network.
pub const DEFAULT_MARKERS: [&str; 6] = ["CDK2", "CDK4", "CDK6", "pRB", "Cyclin_D1", "Cyclin_E1"];

/// Stable states of one version of a model in a [`KnockoutReport`].
#[derive(Clone, PartialEq, Debug)]
pub struct KnockoutRow {
    /// The knocked-out variable, or `None` for the unmodified (wild-type) model.
    pub knockout: Option<Variable>,
    pub catalog: AttractorCatalog,
    /// Average activity of the report markers, see [`marker_activity`].
    pub marker_activity: f64,
}

impl KnockoutRow {
    pub fn stable_state_count(&self) -> usize {
        self.catalog.count()
    }
}

impl Display for KnockoutRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = self.knockout.as_ref().map_or("wild-type", |it| it.as_str());
        write!(
            f,
            "{:<16}  {:>6}  {:>6.1}%",
            name,
            self.stable_state_count(),
            self.marker_activity
        )
    }
}

/// The result of [`knockouts`]: the wild-type row first, then one row per knockout in the
/// requested order.
#[derive(Clone, PartialEq, Debug)]
pub struct KnockoutReport {
    markers: Vec<Variable>,
    rows: Vec<KnockoutRow>,
}

impl KnockoutReport {
    pub fn markers(&self) -> &[Variable] {
        &self.markers
    }

    pub fn rows(&self) -> &[KnockoutRow] {
        &self.rows
    }

    pub fn wild_type(&self) -> &KnockoutRow {
        &self.rows[0]
    }

    /// The row of the first knockout of `variable`.
    pub fn knockout(&self, variable: &str) -> Option<&KnockoutRow> {
        self.rows[1..]
            .iter()
            .find(|it| it.knockout.as_ref().is_some_and(|k| k.as_str() == variable))
    }
}

/// Average activity (0-100%) of `markers` across the attractors of `catalog`.
///
/// Equivalently, the percentage of active markers in each attractor, averaged over attractors.
/// Markers missing from a state count as inactive. The result is `0.0` when there are no
/// attractors or no markers.
pub fn marker_activity(catalog: &AttractorCatalog, markers: &[&str]) -> f64 {
    if markers.is_empty() {
        return 0.0;
    }
    let total: f64 = markers
        .iter()
        .map(|it| catalog.variable_activity(it).percentage)
        .sum();
    total / markers.len() as f64
}

/// Compare the stable states of `model` with those of its knockouts of `genes`.
///
/// Every version is solved by a fresh solver from `solver_for` and is never cached. A solver
/// failure gives a row without stable states.
pub fn knockouts<P, F>(
    model: &NetworkModel,
    genes: &[&str],
    markers: &[&str],
    solver_for: F,
) -> Result<KnockoutReport, AnalysisError>
where
    P: StableStateSolver,
    F: Fn(&NetworkModel) -> P,
{
    for marker in markers.iter().filter(|it| !model.contains(it)) {
        warn!("Marker `{marker}` is not a variable of the model; it is always inactive.");
    }

    let row = |knockout: Option<Variable>, model: &NetworkModel| {
        let catalog = analyze_attractors_uncached(model, &solver_for(model));
        let marker_activity = marker_activity(&catalog, markers);
        KnockoutRow {
            knockout,
            catalog,
            marker_activity,
        }
    };

    let mut rows = vec![row(None, model)];
    for gene in genes {
        is_cancelled!()?;
        let knocked_out = model.knockout(*gene);
        let result = row(Some(Variable::from(*gene)), &knocked_out);
        debug!(
            "Knockout of `{gene}`: {} stable states, {:.1}% marker activity.",
            result.stable_state_count(),
            result.marker_activity
        );
        rows.push(result);
    }

    info!(
        "Analysed {} knockouts against {} markers.",
        genes.len(),
        markers.len()
    );
    Ok(KnockoutReport {
        markers: markers.iter().map(|it| Variable::from(*it)).collect(),
        rows,
    })
}

/// Freeze each variable of `model` to `false` in turn and compute the resulting catalogs.
///
/// Like [`knockouts`], the modified models are solved directly by solvers from `solver_for`.
pub fn controllability<P, F>(
    model: &NetworkModel,
    solver_for: F,
) -> Result<BTreeMap<Variable, AttractorCatalog>, AnalysisError>
where
    P: StableStateSolver,
    F: Fn(&NetworkModel) -> P,
{
    let mut result = BTreeMap::new();
    for variable in model.variables() {
        is_cancelled!()?;
        let frozen = model.force(variable.clone(), false);
        let catalog = analyze_attractors_uncached(&frozen, &solver_for(&frozen));
        result.insert(variable.clone(), catalog);
    }
    info!("Froze {} variables.", result.len());
    Ok(result)
}
