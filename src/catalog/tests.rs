use crate::catalog::{AttractorCatalog, AttractorKind, CatalogError};
use crate::state::{BooleanState, RawState, RawValue};
use crate::test_utils::{init_logger, mk_raw_state};

fn four_variable_states() -> Vec<RawState> {
    vec![
        mk_raw_state(&[("A", true), ("B", true), ("C", false), ("D", false)]),
        mk_raw_state(&[("A", false), ("B", true), ("C", true), ("D", false)]),
        mk_raw_state(&[("A", true), ("B", false), ("C", false), ("D", true)]),
    ]
}

#[test]
fn catalog_from_stable_states() {
    init_logger();
    let catalog = AttractorCatalog::from_stable_states(&four_variable_states(), 4);
    assert_eq!(catalog.count(), 3);
    assert_eq!(catalog.fixed_point_count(), 3);
    assert_eq!(catalog.cycle_count(), 0);
    for (i, record) in catalog.records().iter().enumerate() {
        assert_eq!(record.id(), i + 1);
        assert_eq!(record.kind(), AttractorKind::FixedPoint);
        assert_eq!(record.states().len(), 1);
        assert_eq!(record.active_percentage(), 50.0);
    }
    let second = catalog.get(2).unwrap();
    assert_eq!(
        second.representative(),
        &BooleanState::from([("A", false), ("B", true), ("C", true), ("D", false)])
    );
    assert_eq!(second.active_variables().collect::<Vec<_>>(), vec!["B", "C"]);
    assert_eq!(second.inactive_variables().collect::<Vec<_>>(), vec!["A", "D"]);
}

#[test]
fn empty_catalog() {
    init_logger();
    let catalog = AttractorCatalog::from_stable_states(&[], 10);
    assert!(catalog.is_empty());
    assert_eq!(catalog.count(), 0);
    assert_eq!(catalog.fixed_point_count(), 0);
    assert_eq!(catalog.cycle_count(), 0);
    assert!(catalog.summary_table().is_empty());
    assert_eq!(catalog, AttractorCatalog::empty());

    let activity = catalog.variable_activity("A");
    assert_eq!(activity.active_count, 0);
    assert_eq!(activity.total, 0);
    assert_eq!(activity.percentage, 0.0);
}

#[test]
fn unknown_attractor_id() {
    let catalog = AttractorCatalog::from_stable_states(&four_variable_states(), 4);
    assert_eq!(
        catalog.get(0).unwrap_err(),
        CatalogError::UnknownAttractorId { id: 0, count: 3 }
    );
    assert_eq!(
        catalog.get(4).unwrap_err(),
        CatalogError::UnknownAttractorId { id: 4, count: 3 }
    );
    assert!(catalog.get(3).is_ok());
}

#[test]
fn percentage_is_relative_to_model_size() {
    init_logger();
    // The solver reported only two of the four model variables.
    let states = vec![mk_raw_state(&[("A", true), ("B", false)])];
    let catalog = AttractorCatalog::from_stable_states(&states, 4);
    assert_eq!(catalog.get(1).unwrap().active_percentage(), 25.0);
}

#[test]
fn unresolved_values_are_coerced() {
    init_logger();
    let mut state = RawState::new();
    state.insert("A".into(), RawValue::Relational("x > 0".to_string()));
    state.insert("B".into(), RawValue::Integer(1));
    state.insert("C".into(), RawValue::Null);
    state.insert("D".into(), RawValue::Bool(true));
    let catalog = AttractorCatalog::from_stable_states(&[state], 4);
    let record = catalog.get(1).unwrap();
    assert_eq!(record.active_percentage(), 50.0);
    assert_eq!(
        record.representative(),
        &BooleanState::from([("A", false), ("B", true), ("C", false), ("D", true)])
    );
}

#[test]
fn summary_table_rows() {
    let catalog = AttractorCatalog::from_stable_states(&four_variable_states(), 4);
    let rows = catalog.summary_table();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[2].kind, AttractorKind::FixedPoint);
    assert_eq!(rows[0].to_string(), "   1  fixed point     50.0%");
}

#[test]
fn variable_activity() {
    let catalog = AttractorCatalog::from_stable_states(&four_variable_states(), 4);
    let a = catalog.variable_activity("A");
    assert_eq!(a.active_count, 2);
    assert_eq!(a.total, 3);
    assert!((a.percentage - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(catalog.variable_activity("B").active_count, 2);
    assert_eq!(catalog.variable_activity("D").active_count, 1);
    assert_eq!(catalog.variable_activity("missing").active_count, 0);
}

#[test]
fn catalog_well_formedness() {
    let catalog = AttractorCatalog::from_stable_states(&four_variable_states(), 4);
    assert!(catalog.is_well_formed());
    assert!(AttractorCatalog::empty().is_well_formed());
}

#[test]
fn catalog_serialization() {
    let catalog = AttractorCatalog::from_stable_states(&four_variable_states(), 4);
    let json = serde_json::to_string(&catalog).unwrap();
    let restored: AttractorCatalog = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, catalog);
}
