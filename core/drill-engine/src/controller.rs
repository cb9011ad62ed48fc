//! FILENAME: core/drill-engine/src/controller.rs
//! Drilldown controller - the state machine over hierarchy levels.
//!
//! Owns the dataset, the active date filter, the navigation stack and the
//! registry of rendered blocks. All mutation happens here, one user action
//! at a time; the presentation adapter only draws what it is told.
//!
//! State machine: initial state Region (step render), terminal state Raw
//! (stacked detail rows). Region -> Market replaces the page; Market ->
//! DM -> Type -> Raw append nested blocks. Any filter or dataset change
//! resets to the root - a drill path is never refiltered in place.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::aggregate::{aggregate_rows, Group, RowId};
use crate::error::DrillError;
use crate::fields::{Field, Record};
use crate::filter::DateFilter;
use crate::hierarchy::{detect_key, next_dimension, Level, RenderMode};
use crate::nav::{Frame, NavStack};
use crate::parse::{count_device, parse_currency};
use crate::view::{
    BackInstruction, BlockId, DetailRow, DetailView, RenderInstruction, Summary, TableView,
};

// ============================================================================
// BLOCK REGISTRY
// ============================================================================

/// Book-keeping for one visible block.
#[derive(Debug, Clone)]
struct BlockState {
    level: Level,
    /// Aggregated groups in display order (empty for raw blocks).
    groups: Vec<Group>,
}

// ============================================================================
// CONTROLLER
// ============================================================================

pub struct DrilldownController {
    dataset: Vec<Record>,
    filter: DateFilter,
    /// Rows passing the active filter, in source order.
    filtered: Vec<RowId>,
    /// Detected spelling of the region column for this dataset.
    region_key: String,
    nav: NavStack,
    /// Visible blocks only: the top step view plus any stacked children.
    blocks: FxHashMap<BlockId, BlockState>,
    /// Idempotent-append guard: which (parent, child level) pairs already
    /// have a rendered child block. Kept in memory instead of querying
    /// rendered output.
    children: FxHashSet<(BlockId, Level)>,
    next_block_id: BlockId,
}

impl DrilldownController {
    pub fn new(dataset: Vec<Record>) -> Self {
        let region_key = detect_key(&dataset, Field::Region.aliases());
        let filter = DateFilter::default();
        let filtered = filter.apply(&dataset);
        DrilldownController {
            dataset,
            filter,
            filtered,
            region_key,
            nav: NavStack::new(),
            blocks: FxHashMap::default(),
            children: FxHashSet::default(),
            next_block_id: 0,
        }
    }

    pub fn dataset(&self) -> &[Record] {
        &self.dataset
    }

    pub fn filter(&self) -> DateFilter {
        self.filter
    }

    pub fn region_key(&self) -> &str {
        &self.region_key
    }

    /// Navigation history, root to current leaf.
    pub fn frames(&self) -> &[Frame] {
        self.nav.frames()
    }

    /// Ids of the currently visible blocks, unordered.
    pub fn visible_block_ids(&self) -> Vec<BlockId> {
        self.blocks.keys().copied().collect()
    }

    // ------------------------------------------------------------------------
    // Dataset & filter lifecycle
    // ------------------------------------------------------------------------

    /// Swaps in a new dataset (fresh CSV load). The filter is kept, the
    /// drill path is not.
    pub fn replace_dataset(&mut self, dataset: Vec<Record>) -> RenderInstruction {
        self.region_key = detect_key(&dataset, Field::Region.aliases());
        self.dataset = dataset;
        self.refresh()
    }

    /// Applies a new date range and restarts from the root.
    pub fn set_filter(&mut self, filter: DateFilter) -> RenderInstruction {
        self.filter = filter;
        self.refresh()
    }

    pub fn reset_filter(&mut self) -> RenderInstruction {
        self.set_filter(DateFilter::default())
    }

    /// Rebuilds everything from the dataset: apply the filter, aggregate
    /// the region level, reset navigation to the single root frame. Runs
    /// the full pipeline even on an empty dataset (zero groups, zero
    /// summary - never a fault).
    pub fn refresh(&mut self) -> RenderInstruction {
        RenderInstruction::Replace {
            view: self.full_refresh_view(),
        }
    }

    fn full_refresh_view(&mut self) -> TableView {
        self.filtered = self.filter.apply(&self.dataset);
        self.blocks.clear();
        self.children.clear();
        let view = self.build_root_view();
        self.nav.reset(Level::Region, view.block_id);
        view
    }

    /// Summary card totals over the filtered rows.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            row_count: self.filtered.len(),
            ..Summary::default()
        };
        for &row in &self.filtered {
            if let Some(record) = self.dataset.get(row) {
                summary.device_count += count_device(record) as usize;
                summary.total_cost += parse_currency(Field::Cost.resolve(record));
            }
        }
        summary
    }

    /// Filtered records in source order; feeds the CSV export surface.
    pub fn filtered_records(&self) -> Vec<&Record> {
        self.filtered
            .iter()
            .filter_map(|&row| self.dataset.get(row))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Drilling
    // ------------------------------------------------------------------------

    /// Handles a click on `group_key` within block `block_id` and returns
    /// the render instruction for the transition.
    pub fn select(
        &mut self,
        block_id: BlockId,
        group_key: &str,
    ) -> Result<RenderInstruction, DrillError> {
        let (level, members) = {
            let state = self
                .blocks
                .get(&block_id)
                .ok_or(DrillError::UnknownBlock(block_id))?;
            if state.level == Level::Raw {
                return Err(DrillError::RawBlock(block_id));
            }
            let group = state
                .groups
                .iter()
                .find(|g| g.key == group_key)
                .ok_or_else(|| DrillError::UnknownGroup {
                    block: block_id,
                    key: group_key.to_string(),
                })?;
            (state.level, group.members.clone())
        };

        let Some(next) = level.next() else {
            return Err(DrillError::RawBlock(block_id));
        };

        match next_dimension(level, &self.dataset, &members) {
            Some(dimension) if next.render_mode() == RenderMode::Step => {
                // Full-view replace: record the selection for back(), then
                // swap the page for the next level.
                self.nav.record_selection(level, group_key);
                self.blocks.clear();
                self.children.clear();
                let view = self.build_table_block(
                    next,
                    None,
                    next.title().to_string(),
                    dimension,
                    &members,
                );
                self.nav.push_step(next, view.block_id);
                Ok(RenderInstruction::Replace { view })
            }
            Some(dimension) => {
                self.append_child_block(block_id, level, group_key, members, next, Some(dimension))
            }
            // Alias fallback exhausted: drilling stops, show raw rows.
            None => self.append_child_block(block_id, level, group_key, members, Level::Raw, None),
        }
    }

    /// Appends a stacked child block under `parent`, honoring the
    /// duplicate-render guard.
    fn append_child_block(
        &mut self,
        parent: BlockId,
        parent_level: Level,
        group_key: &str,
        members: Vec<RowId>,
        child_level: Level,
        dimension: Option<String>,
    ) -> Result<RenderInstruction, DrillError> {
        let mut replaces = None;
        if self.children.contains(&(parent, child_level)) {
            // A child of this kind is already on screen. Re-clicking the
            // same group is a no-op; a different group swaps the child
            // chain out.
            if self.nav.selection_at(parent_level) == Some(group_key) {
                return Ok(RenderInstruction::Ignored);
            }
            if let Some(old_id) = self.nav.find_stack_block(parent, child_level) {
                for frame in self.nav.pop_through_block(old_id) {
                    self.blocks.remove(&frame.block_id());
                    if let Frame::Stack {
                        parent: p,
                        level: l,
                        ..
                    } = frame
                    {
                        self.children.remove(&(p, l));
                    }
                }
                replaces = Some(old_id);
            }
        }

        self.nav.record_selection(parent_level, group_key);

        match dimension {
            Some(dimension) => {
                let title = format!("{} - {}", child_level.title(), group_key);
                let view =
                    self.build_table_block(child_level, Some(parent), title, dimension, &members);
                self.nav.push_stack(child_level, view.block_id, parent);
                Ok(RenderInstruction::Append {
                    parent,
                    replaces,
                    view,
                })
            }
            None => {
                let block_id = self.alloc_block_id();
                let rows: Vec<DetailRow> = members
                    .iter()
                    .filter_map(|&row| self.dataset.get(row))
                    .map(DetailRow::from_record)
                    .collect();
                let view = DetailView {
                    block_id,
                    title: format!("Detailed rows - {}", group_key),
                    row_count: rows.len(),
                    rows,
                };
                self.blocks.insert(
                    block_id,
                    BlockState {
                        level: Level::Raw,
                        groups: Vec::new(),
                    },
                );
                self.children.insert((parent, Level::Raw));
                self.nav.push_stack(Level::Raw, block_id, parent);
                Ok(RenderInstruction::AppendRaw {
                    parent,
                    replaces,
                    view,
                })
            }
        }
    }

    // ------------------------------------------------------------------------
    // Back navigation
    // ------------------------------------------------------------------------

    /// Undoes the most recent navigation action.
    ///
    /// A stack frame detaches exactly the block it introduced; a step
    /// frame rebuilds the step view it was covering. An exhausted history
    /// falls back to a full refresh.
    pub fn back(&mut self) -> BackInstruction {
        match self.nav.pop() {
            Some(Frame::Stack {
                block_id, parent, level, ..
            }) => {
                self.blocks.remove(&block_id);
                self.children.remove(&(parent, level));
                BackInstruction::RemoveBlock { block_id }
            }
            Some(Frame::Step { block_id, .. }) => {
                self.blocks.remove(&block_id);
                if self.nav.is_empty() {
                    BackInstruction::Refresh {
                        view: self.full_refresh_view(),
                    }
                } else {
                    BackInstruction::Rebuild {
                        view: self.rebuild_step_chain(),
                    }
                }
            }
            None => BackInstruction::Refresh {
                view: self.full_refresh_view(),
            },
        }
    }

    // ------------------------------------------------------------------------
    // View construction
    // ------------------------------------------------------------------------

    fn alloc_block_id(&mut self) -> BlockId {
        self.next_block_id += 1;
        self.next_block_id
    }

    /// Aggregates `rows` by `dimension`, registers the block and returns
    /// its renderable view.
    fn build_table_block(
        &mut self,
        level: Level,
        parent: Option<BlockId>,
        title: String,
        dimension: String,
        rows: &[RowId],
    ) -> TableView {
        let groups = aggregate_rows(&self.dataset, rows, &dimension);
        let block_id = self.alloc_block_id();
        let view = TableView::from_groups(block_id, level, title, dimension, &groups);
        self.blocks.insert(block_id, BlockState { level, groups });
        if let Some(parent) = parent {
            self.children.insert((parent, level));
        }
        view
    }

    fn build_root_view(&mut self) -> TableView {
        let rows = self.filtered.clone();
        let dimension = self.region_key.clone();
        self.build_table_block(
            Level::Region,
            None,
            Level::Region.title().to_string(),
            dimension,
            &rows,
        )
    }

    /// Rebuilds the step view the navigation stack now ends in.
    ///
    /// After a step frame is popped only step frames remain (stacked
    /// frames always sit above the deepest step frame and were popped
    /// first), so this walks them from the root, re-deriving each level's
    /// row set from the selection recorded on the frame beneath. Only the
    /// final view is registered: step renders replace the page.
    fn rebuild_step_chain(&mut self) -> TableView {
        self.blocks.clear();
        self.children.clear();

        let chain: Vec<(Level, Option<String>)> = self
            .nav
            .frames()
            .iter()
            .map(|frame| (frame.level(), frame.selected().cloned()))
            .collect();

        let mut rows = self.filtered.clone();
        let mut dimension = self.region_key.clone();

        for index in 0..chain.len().saturating_sub(1) {
            let (level, selected) = &chain[index];
            let groups = aggregate_rows(&self.dataset, &rows, &dimension);
            let wanted = selected.as_deref().unwrap_or_default();
            rows = groups
                .iter()
                .find(|g| g.key == wanted)
                .map(|g| g.members.clone())
                .unwrap_or_default();
            dimension = next_dimension(*level, &self.dataset, &rows).unwrap_or_default();
        }

        let top_level = chain.last().map(|(level, _)| *level).unwrap_or(Level::Region);
        let title = top_level.title().to_string();
        let view = self.build_table_block(top_level, None, title, dimension, &rows);
        self.nav
            .set_block_id(chain.len().saturating_sub(1), view.block_id);
        view
    }
}
