//! Integration tests for the filter pipeline and the derived view
//!
//! Exercises search, quick and advanced filters through both the pure stages and the
//! runtime, plus the empty / no-results state predicates.

mod common;

use pretty_assertions::assert_eq;
use tabview_table::{
    AdvancedFilter, ColumnDescriptor, FilterPlan, FilterState, QuickFilterConfig, Row,
    SortSpec, TableConfig, TableRuntime, Value, ViewState, run_pipeline,
};

use common::{bundle_config, bundle_rows, bundle_runtime, view_values};

// ============ Example Scenarios ============

#[test]
fn quick_filter_keeps_only_matching_status() {
    let mut config = TableConfig::new(
        "installs",
        vec![
            ColumnDescriptor::new("id", "ID"),
            ColumnDescriptor::new("status", "Status"),
        ],
    );
    config.filtering.quick_filters = Some(QuickFilterConfig {
        field: "status".into(),
        options: vec![],
    });
    let mut runtime = TableRuntime::new(config).with_rows(vec![
        Row::new().with("id", 1).with("status", "Installed"),
        Row::new().with("id", 2).with("status", "Pending"),
    ]);

    runtime.set_quick_filter(Some(Value::from("Installed")));

    assert_eq!(view_values(&runtime, "id"), vec!["1".to_string()]);
}

#[test]
fn search_matches_bundle_prefix() {
    let mut config = TableConfig::new("bundles", vec![ColumnDescriptor::new("bundleId", "Bundle")]);
    config.filtering.search_fields = Some(vec!["bundleId".into()]);
    let mut runtime = TableRuntime::new(config).with_rows(vec![
        Row::new().with("bundleId", "MB303862"),
        Row::new().with("bundleId", "MB372586"),
    ]);

    runtime.set_search_term("MB30");

    assert_eq!(view_values(&runtime, "bundleId"), vec!["MB303862".to_string()]);
}

// ============ Pipeline Properties ============

#[test]
fn pipeline_is_idempotent() {
    let rows = bundle_rows();
    let plan = FilterPlan::from_config(&bundle_config());
    let states = vec![
        FilterState::new(),
        FilterState {
            search_term: "xb".into(),
            ..FilterState::default()
        },
        FilterState {
            quick_filter: Some(Value::from("Installed")),
            advanced_filters: vec![AdvancedFilter::new("site", vec!["north", "south"])],
            ..FilterState::default()
        },
    ];

    for state in &states {
        let first = run_pipeline(&rows, state, &plan);
        let second = run_pipeline(&rows, state, &plan);
        assert_eq!(first, second);
    }
}

#[test]
fn quick_filter_exact_match_always_included() {
    let mut config = TableConfig::new("ports", vec![ColumnDescriptor::new("port", "Port")]);
    config.filtering.quick_filters = Some(QuickFilterConfig {
        field: "port".into(),
        options: vec![],
    });
    let mut runtime = TableRuntime::new(config).with_rows(vec![
        Row::new().with("port", 8080),
        Row::new().with("port", 80),
        Row::new().with("port", 8080.0),
    ]);

    runtime.set_quick_filter(Some(Value::from(8080)));

    assert_eq!(runtime.view_len(), 2);
    assert!(runtime.view_rows().iter().all(|row| row.value("port").loose_eq(&Value::from(8080))));
}

#[test]
fn empty_advanced_filter_list_is_identity() {
    let mut runtime = bundle_runtime();
    let unfiltered = view_values(&runtime, "bundleId");

    runtime.set_advanced_filters(vec![]);
    assert_eq!(view_values(&runtime, "bundleId"), unfiltered);

    runtime.set_advanced_filters(vec![
        AdvancedFilter::new("site", ""),
        AdvancedFilter::new("status", Vec::<String>::new()),
        AdvancedFilter::new("sizeMb", Value::Null),
    ]);
    assert_eq!(view_values(&runtime, "bundleId"), unfiltered);
    assert_eq!(runtime.active_filter_count(), 0);
}

#[test]
fn stages_compose_as_intersection() {
    let mut runtime = bundle_runtime();
    runtime.set_search_term("mb");
    runtime.set_quick_filter(Some(Value::from("Installed")));
    runtime.set_advanced_filter(AdvancedFilter::new("site", vec!["north", "east"]));

    assert_eq!(
        view_values(&runtime, "bundleId"),
        vec!["MB303862".to_string(), "MB410001".to_string()]
    );
    assert_eq!(runtime.active_filter_count(), 3);
}

#[test]
fn sort_applies_after_filtering() {
    let mut runtime = bundle_runtime();
    runtime.set_quick_filter(Some(Value::from("Installed")));
    runtime.set_sort(Some(SortSpec::descending("sizeMb")));

    assert_eq!(
        view_values(&runtime, "sizeMb"),
        vec!["1024", "512", "256", "120", "64", "8"]
    );
}

#[test]
fn sorting_a_mixed_type_column_stays_ordered() {
    let mut config = TableConfig::new("sizes", vec![ColumnDescriptor::new("size", "Size")]);
    config.pagination.page_size = 50;
    let rows: Vec<Row> = (0..200i64)
        .map(|n| {
            let size = match n % 3 {
                0 => Value::Int(n),
                1 => Value::from(format!("{}a", n)),
                _ => Value::Float(n as f64 + 0.5),
            };
            Row::new().with("size", size)
        })
        .collect();
    let mut runtime = TableRuntime::new(config).with_rows(rows);

    assert!(runtime.set_sort(Some(SortSpec::ascending("size"))));

    let sorted: Vec<Value> = runtime.view_rows().into_iter().map(|row| row.value("size").clone()).collect();
    assert_eq!(sorted.len(), 200);
    assert!(sorted.windows(2).all(|pair| pair[0].compare(&pair[1]) != std::cmp::Ordering::Greater));
    // numbers before strings
    assert_eq!(sorted[0], Value::Int(0));
    assert!(sorted[199].as_str().is_some());
}

#[test]
fn unknown_filter_fields_are_ignored() {
    let mut runtime = bundle_runtime();
    runtime.set_advanced_filter(AdvancedFilter::new("firmware", "1.2.3"));
    assert_eq!(runtime.view_len(), 10);
}

// ============ View States ============

#[test]
fn empty_and_no_results_are_mutually_exclusive() {
    let cases: Vec<(Vec<Row>, Option<&str>)> = vec![
        (vec![], None),
        (vec![], Some("anything")),
        (bundle_rows(), None),
        (bundle_rows(), Some("MB30")),
        (bundle_rows(), Some("no such bundle")),
    ];

    for (rows, term) in cases {
        let mut runtime = TableRuntime::new(bundle_config()).with_rows(rows);
        if let Some(term) = term {
            runtime.set_search_term(term);
        }
        assert!(!(runtime.should_show_empty_state() && runtime.should_show_no_results_state()));

        let state = runtime.view_state();
        assert!(matches!(
            state,
            ViewState::Empty | ViewState::NoResults | ViewState::Populated
        ));
        assert_eq!(state == ViewState::Empty, runtime.should_show_empty_state());
        assert_eq!(state == ViewState::NoResults, runtime.should_show_no_results_state());
    }
}

#[test]
fn host_states_take_precedence() {
    let mut runtime = bundle_runtime();
    runtime.set_search_term("no such bundle");

    runtime.set_loading(true);
    assert_eq!(runtime.view_state(), ViewState::Loading);
    assert!(!runtime.should_show_no_results_state());

    runtime.set_loading(false);
    runtime.set_error(Some("backend unavailable".into()));
    assert_eq!(runtime.view_state(), ViewState::Error);

    runtime.set_error(None);
    assert_eq!(runtime.view_state(), ViewState::NoResults);
}

#[test]
fn external_filters_turn_empty_into_no_results() {
    let mut runtime = TableRuntime::new(bundle_config());
    assert_eq!(runtime.view_state(), ViewState::Empty);

    runtime.set_external_filter_count(1);
    assert_eq!(runtime.view_state(), ViewState::NoResults);
    assert_eq!(runtime.active_filter_count(), 1);
}
