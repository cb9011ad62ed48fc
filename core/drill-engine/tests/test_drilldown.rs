//! FILENAME: core/drill-engine/tests/test_drilldown.rs
//! Integration tests for the drilldown pipeline: aggregation properties,
//! navigation round trips and the controller's rendering contract.

use drill_engine::{
    aggregate, parse_currency, BackInstruction, DrilldownController, DateFilter, Field, Level,
    PerfBand, Record, RenderInstruction, TableView,
};

// ============================================================================
// FIXTURES
// ============================================================================

fn record(pairs: &[(&str, &str)]) -> Record {
    Record::from_pairs(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

/// A small but full-depth trade-in dataset: two regions, two markets in
/// the East, two DMs in Boston, mixed device types.
fn tradein_fixture() -> Vec<Record> {
    vec![
        record(&[
            ("Processed Date", "01/03/2024"),
            ("Regions", "East"),
            ("Market", "Boston"),
            ("DM NAME", "Ana"),
            ("Type", "Phone"),
            ("COST", "$120.50"),
            ("IMEI", "358240051111110"),
            ("Days", "5"),
        ]),
        record(&[
            ("Processed Date", "02/03/2024"),
            ("Regions", "East"),
            ("Market", "Boston"),
            ("DM NAME", "Ana"),
            ("Type", "Tablet"),
            ("COST", "$80"),
            ("IMEI", ""),
            ("Days", "5"),
        ]),
        record(&[
            ("Processed Date", "03/03/2024"),
            ("Regions", "East"),
            ("Market", "Boston"),
            ("DM NAME", "Ben"),
            ("Type", "Phone"),
            ("COST", "$60"),
            ("IMEI", "358240052222220"),
            ("Days", "7"),
        ]),
        record(&[
            ("Processed Date", "04/03/2024"),
            ("Regions", "East"),
            ("Market", "Hartford"),
            ("DM NAME", "Cal"),
            ("Type", "Phone"),
            ("COST", "$40"),
            ("IMEI", "358240053333330"),
            ("Days", "3"),
        ]),
        record(&[
            ("Processed Date", "05/03/2024"),
            ("Regions", "West"),
            ("Market", "Denver"),
            ("DM NAME", "Dee"),
            ("Type", "Watch"),
            ("COST", "$90"),
            ("IMEI", "358240054444440"),
            ("Days", "2"),
        ]),
    ]
}

fn expect_replace(instruction: RenderInstruction) -> TableView {
    match instruction {
        RenderInstruction::Replace { view } => view,
        other => panic!("expected Replace, got {:?}", other),
    }
}

fn expect_append(instruction: RenderInstruction) -> TableView {
    match instruction {
        RenderInstruction::Append { view, .. } => view,
        other => panic!("expected Append, got {:?}", other),
    }
}

/// Asserts the visible blocks are exactly those implied by the frames.
fn assert_blocks_match_frames(controller: &DrilldownController) {
    let mut implied: Vec<u64> = controller
        .frames()
        .iter()
        .map(|frame| frame.block_id())
        .collect();
    // Only the deepest step view survives a replace; earlier step frames
    // are history, not visible blocks.
    let last_step = controller
        .frames()
        .iter()
        .rposition(|frame| frame.is_step())
        .unwrap_or(0);
    implied = implied.split_off(last_step);
    implied.sort_unstable();
    let mut visible = controller.visible_block_ids();
    visible.sort_unstable();
    assert_eq!(visible, implied);
}

// ============================================================================
// AGGREGATION PROPERTIES
// ============================================================================

#[test]
fn test_partition_property() {
    let data = tradein_fixture();
    let groups = aggregate(&data, "Regions");

    let total_count: usize = groups.iter().map(|g| g.count).sum();
    assert_eq!(total_count, data.len());

    let total_cost: f64 = groups.iter().map(|g| g.total_cost).sum();
    let expected: f64 = data
        .iter()
        .map(|r| parse_currency(Field::Cost.resolve(r)))
        .sum();
    assert!((total_cost - expected).abs() < 1e-9);

    // No row in two groups, none dropped.
    let mut members: Vec<usize> = groups.iter().flat_map(|g| g.members.clone()).collect();
    members.sort_unstable();
    assert_eq!(members, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_ordering_is_cost_descending_and_stable() {
    let data = vec![
        record(&[("Regions", "B"), ("COST", "$10")]),
        record(&[("Regions", "A"), ("COST", "$10")]),
        record(&[("Regions", "Top"), ("COST", "$99")]),
    ];
    let keys: Vec<String> = aggregate(&data, "Regions")
        .into_iter()
        .map(|g| g.key)
        .collect();
    assert_eq!(keys, vec!["Top", "B", "A"]);
}

#[test]
fn test_worked_scenario_east_west() {
    let data = vec![
        record(&[("Region", "East"), ("Cost", "$10")]),
        record(&[("Region", "East"), ("Cost", "$5")]),
        record(&[("Region", "West"), ("Cost", "$7")]),
    ];
    let groups = aggregate(&data, "Region");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key, "East");
    assert_eq!(groups[0].count, 2);
    assert_eq!(groups[0].total_cost, 15.0);
    assert_eq!(groups[1].key, "West");
    assert_eq!(groups[1].count, 1);
    assert_eq!(groups[1].total_cost, 7.0);

    let view = TableView::from_groups(
        1,
        Level::Region,
        "Region Summary".to_string(),
        "Region".to_string(),
        &groups,
    );
    assert_eq!(view.max_cost, 15.0);
    assert_eq!(view.rows[0].pct, 100);
    assert_eq!(view.rows[0].band, PerfBand::High);
    assert_eq!(view.rows[1].pct, 47);
    assert_eq!(view.rows[1].band, PerfBand::Mid);
}

#[test]
fn test_trim_normalization_groups_together() {
    let data = vec![
        record(&[("Region", "  East  "), ("Cost", "$1")]),
        record(&[("Region", "East"), ("Cost", "$2")]),
    ];
    let groups = aggregate(&data, "Region");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "East");
    assert_eq!(groups[0].count, 2);
}

// ============================================================================
// NAVIGATION ROUND TRIP
// ============================================================================

#[test]
fn test_full_drill_and_back_round_trip() {
    let mut controller = DrilldownController::new(tradein_fixture());
    let initial = expect_replace(controller.refresh());

    // Region -> Market (step replace)
    let market = expect_replace(controller.select(initial.block_id, "East").expect("region"));
    assert_eq!(market.level, Level::Market);

    // Market -> DM (stacked)
    let dm = expect_append(controller.select(market.block_id, "Boston").expect("market"));
    assert_eq!(dm.level, Level::Dm);

    // DM -> Type (stacked)
    let types = expect_append(controller.select(dm.block_id, "Ana").expect("dm"));
    assert_eq!(types.level, Level::Type);

    // Type -> Raw (stacked detail rows)
    let raw = controller.select(types.block_id, "Phone").expect("type");
    let raw_id = match raw {
        RenderInstruction::AppendRaw { ref view, .. } => {
            assert_eq!(view.row_count, 1);
            view.block_id
        }
        other => panic!("expected AppendRaw, got {:?}", other),
    };

    assert_eq!(controller.frames().len(), 5);
    assert_blocks_match_frames(&controller);

    // Four backs return to the initial region render.
    assert_eq!(
        controller.back(),
        BackInstruction::RemoveBlock { block_id: raw_id }
    );
    assert_blocks_match_frames(&controller);
    assert!(matches!(
        controller.back(),
        BackInstruction::RemoveBlock { .. }
    ));
    assert_blocks_match_frames(&controller);
    assert!(matches!(
        controller.back(),
        BackInstruction::RemoveBlock { .. }
    ));
    assert_blocks_match_frames(&controller);

    let BackInstruction::Rebuild { view: rebuilt } = controller.back() else {
        panic!("fourth back must rebuild the root step view");
    };
    assert_blocks_match_frames(&controller);

    // Same groups, same order as the initial render.
    assert_eq!(rebuilt.level, Level::Region);
    assert_eq!(rebuilt.rows, initial.rows);
    assert_eq!(controller.frames().len(), 1);
}

#[test]
fn test_back_past_root_full_refreshes() {
    let mut controller = DrilldownController::new(tradein_fixture());
    let initial = expect_replace(controller.refresh());
    let BackInstruction::Refresh { view } = controller.back() else {
        panic!("back at root must refresh");
    };
    assert_eq!(view.rows, initial.rows);
    assert_eq!(controller.frames().len(), 1);
}

// ============================================================================
// IDEMPOTENT APPENDS
// ============================================================================

#[test]
fn test_reclick_is_ignored() {
    let mut controller = DrilldownController::new(tradein_fixture());
    let root = expect_replace(controller.refresh());
    let market = expect_replace(controller.select(root.block_id, "East").expect("region"));
    let _dm = expect_append(controller.select(market.block_id, "Boston").expect("market"));

    let before = controller.visible_block_ids().len();
    let again = controller.select(market.block_id, "Boston").expect("again");
    assert_eq!(again, RenderInstruction::Ignored);
    assert_eq!(controller.visible_block_ids().len(), before);
}

#[test]
fn test_sibling_click_replaces_child_chain() {
    let mut controller = DrilldownController::new(tradein_fixture());
    let root = expect_replace(controller.refresh());
    let market = expect_replace(controller.select(root.block_id, "East").expect("region"));
    let dm = expect_append(controller.select(market.block_id, "Boston").expect("market"));
    // Drill deeper so the replaced chain has a descendant too.
    let _types = expect_append(controller.select(dm.block_id, "Ana").expect("dm"));

    let instruction = controller
        .select(market.block_id, "Hartford")
        .expect("sibling");
    let RenderInstruction::Append {
        parent,
        replaces,
        view,
    } = instruction
    else {
        panic!("sibling click must append");
    };
    assert_eq!(parent, market.block_id);
    assert_eq!(replaces, Some(dm.block_id));
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].key, "Cal");
    assert_blocks_match_frames(&controller);
}

// ============================================================================
// FILTERS
// ============================================================================

#[test]
fn test_filter_change_resets_to_root() {
    let mut controller = DrilldownController::new(tradein_fixture());
    let root = expect_replace(controller.refresh());
    let market = expect_replace(controller.select(root.block_id, "East").expect("region"));
    let _dm = expect_append(controller.select(market.block_id, "Boston").expect("market"));

    let from = chrono::NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
    let view = expect_replace(controller.set_filter(DateFilter::new(Some(from), None)));
    assert_eq!(view.level, Level::Region);
    assert_eq!(controller.frames().len(), 1);
    // Rows 2,3,4 remain: East $100, West $90.
    assert_eq!(view.rows[0].key, "East");
    assert_eq!(view.rows[0].count, 2);
    assert_eq!(view.rows[1].key, "West");
}

#[test]
fn test_filter_excluding_everything_renders_zero_state() {
    let mut controller = DrilldownController::new(tradein_fixture());
    controller.refresh();

    let from = chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    let view = expect_replace(controller.set_filter(DateFilter::new(Some(from), None)));
    assert_eq!(view.group_count, 0);
    assert!(view.rows.is_empty());

    let summary = controller.summary();
    assert_eq!(summary.row_count, 0);
    assert_eq!(summary.device_count, 0);
    assert_eq!(summary.total_cost, 0.0);
    assert!(controller.filtered_records().is_empty());
}

#[test]
fn test_summary_totals() {
    let mut controller = DrilldownController::new(tradein_fixture());
    controller.refresh();
    let summary = controller.summary();
    assert_eq!(summary.row_count, 5);
    assert_eq!(summary.device_count, 4);
    assert!((summary.total_cost - 390.5).abs() < 1e-9);
}

// ============================================================================
// ALIAS TOLERANCE END TO END
// ============================================================================

#[test]
fn test_alternate_column_spellings_drill_cleanly() {
    let data = vec![
        record(&[
            ("region", "East"),
            ("Market Name", "Boston"),
            ("DM Name", "Ana"),
            ("TYPE", "Phone"),
            ("cost", "25"),
        ]),
        record(&[
            ("region", "East"),
            ("Market Name", "Boston"),
            ("DM Name", "Ben"),
            ("TYPE", "Phone"),
            ("cost", "75"),
        ]),
    ];
    let mut controller = DrilldownController::new(data);
    let root = expect_replace(controller.refresh());
    assert_eq!(root.rows[0].key, "East");
    assert_eq!(root.rows[0].total_cost, 100.0);

    let market = expect_replace(controller.select(root.block_id, "East").expect("region"));
    assert_eq!(market.dimension_label, "Market Name");
    assert_eq!(market.rows[0].key, "Boston");

    let dm = expect_append(controller.select(market.block_id, "Boston").expect("market"));
    assert_eq!(dm.dimension_label, "DM NAME");
    assert_eq!(dm.rows.len(), 2);
}
