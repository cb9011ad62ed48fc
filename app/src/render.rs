//! FILENAME: app/src/render.rs
//! Terminal presentation adapter.
//!
//! Consumes render/back instructions from the drill engine and maintains
//! the ordered list of visible blocks. This is the only layer that
//! touches a display surface; the engine stays headless.

use drill_engine::{
    format_currency, BackInstruction, BlockId, DetailView, PerfBand, RenderInstruction, Summary,
    TableView,
};

const BAR_WIDTH: usize = 20;

// ============================================================================
// VISIBLE BLOCKS
// ============================================================================

#[derive(Debug, Clone)]
pub enum VisibleBlock {
    Table(TableView),
    Detail(DetailView),
}

impl VisibleBlock {
    pub fn block_id(&self) -> BlockId {
        match self {
            VisibleBlock::Table(view) => view.block_id,
            VisibleBlock::Detail(view) => view.block_id,
        }
    }
}

/// The screen: an ordered stack of visible blocks, root first.
#[derive(Debug, Default)]
pub struct Screen {
    blocks: Vec<VisibleBlock>,
}

impl Screen {
    pub fn new() -> Self {
        Screen { blocks: Vec::new() }
    }

    /// Applies a render instruction and prints whatever became visible.
    pub fn apply(&mut self, instruction: RenderInstruction) {
        match instruction {
            RenderInstruction::Replace { view } => {
                self.blocks.clear();
                self.blocks.push(VisibleBlock::Table(view));
                self.print_last();
            }
            RenderInstruction::Append { replaces, view, .. } => {
                if let Some(old) = replaces {
                    self.detach(old);
                }
                self.blocks.push(VisibleBlock::Table(view));
                self.print_last();
            }
            RenderInstruction::AppendRaw { replaces, view, .. } => {
                if let Some(old) = replaces {
                    self.detach(old);
                }
                self.blocks.push(VisibleBlock::Detail(view));
                self.print_last();
            }
            RenderInstruction::Ignored => {
                println!("(that view is already open)");
            }
        }
    }

    /// Applies a back instruction.
    pub fn apply_back(&mut self, instruction: BackInstruction) {
        match instruction {
            BackInstruction::RemoveBlock { block_id } => {
                self.detach(block_id);
                self.print_last();
            }
            BackInstruction::Rebuild { view } | BackInstruction::Refresh { view } => {
                self.blocks.clear();
                self.blocks.push(VisibleBlock::Table(view));
                self.print_last();
            }
        }
    }

    /// Detaches a block and anything stacked after it.
    fn detach(&mut self, block_id: BlockId) {
        if let Some(index) = self.blocks.iter().position(|b| b.block_id() == block_id) {
            self.blocks.truncate(index);
        }
    }

    /// The deepest visible block; `open` targets its rows.
    pub fn active_block(&self) -> Option<&VisibleBlock> {
        self.blocks.last()
    }

    /// Resolves an `open <row>` index (1-based) against the active block.
    pub fn row_at(&self, row: usize) -> Option<(BlockId, String)> {
        match self.active_block()? {
            VisibleBlock::Table(view) => {
                let entry = view.rows.get(row.checked_sub(1)?)?;
                Some((view.block_id, entry.key.clone()))
            }
            VisibleBlock::Detail(_) => None,
        }
    }

    pub fn print_all(&self) {
        for block in &self.blocks {
            print_block(block);
        }
    }

    fn print_last(&self) {
        if let Some(block) = self.blocks.last() {
            print_block(block);
        } else {
            println!("(nothing to show)");
        }
    }
}

fn print_block(block: &VisibleBlock) {
    match block {
        VisibleBlock::Table(view) => print!("{}", render_table(view)),
        VisibleBlock::Detail(view) => print!("{}", render_detail(view)),
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

pub fn render_summary(summary: &Summary) -> String {
    format!(
        "Total trade-ins: {}   Devices: {}   Total cost: {}\n",
        summary.row_count,
        summary.device_count,
        format_currency(summary.total_cost)
    )
}

fn bar(pct: u8, band: PerfBand) -> String {
    let filled = (pct as usize * BAR_WIDTH) / 100;
    let mut gauge = String::new();
    for i in 0..BAR_WIDTH {
        gauge.push(if i < filled { '█' } else { '·' });
    }
    format!("[{}] {:>3}% {}", gauge, pct, band.as_str())
}

pub fn render_table(view: &TableView) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n== {} (by {}) ==\n", view.title, view.dimension_label));
    out.push_str(&format!(
        "{} groups, total cost {}\n",
        view.group_count,
        format_currency(view.total_cost)
    ));
    out.push_str(&format!(
        "{:>3}  {:<24} {:>6} {:>8} {:>5} {:>12}  {}\n",
        "#", view.dimension_label, "Count", "Devices", "Days", "Total Cost", "Performance"
    ));
    for (index, row) in view.rows.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<24} {:>6} {:>8} {:>5} {:>12}  {}\n",
            index + 1,
            truncate(&row.key, 24),
            row.count,
            row.device_count,
            row.day_count,
            format_currency(row.total_cost),
            bar(row.pct, row.band)
        ));
    }
    if view.rows.is_empty() {
        out.push_str("  (no rows)\n");
    } else {
        out.push_str("Click-through: open <row #> to expand the next level.\n");
    }
    out
}

pub fn render_detail(view: &DetailView) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n== {} ==\n", view.title));
    out.push_str(&format!("{} rows\n", view.row_count));
    out.push_str(&format!(
        "{:<14} {:<20} {:<16} {:<12} {:>12}\n",
        "Processed", "Market", "DM", "Type", "Cost"
    ));
    for row in &view.rows {
        out.push_str(&format!(
            "{:<14} {:<20} {:<16} {:<12} {:>12}\n",
            truncate(&row.processed_date, 14),
            truncate(&row.market, 20),
            truncate(&row.dm_name, 16),
            truncate(&row.device_type, 12),
            row.cost
        ));
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}
