//! FILENAME: core/drill-engine/src/nav.rs
//! Navigation stack - the ordered back-history of rendered views.
//!
//! Two frame kinds mirror the two render modes: a `Step` frame stands for
//! a full-view replace, a `Stack` frame for one appended block. Walking
//! the frames root -> top always reproduces the visible set of blocks.

use crate::hierarchy::Level;
use crate::view::BlockId;

// ============================================================================
// FRAMES
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A full-view replace at `level`. `selected` is the group key most
    /// recently chosen in this view; it drives rebuild-on-back.
    Step {
        level: Level,
        block_id: BlockId,
        selected: Option<String>,
    },
    /// One appended block under `parent`.
    Stack {
        level: Level,
        block_id: BlockId,
        parent: BlockId,
        selected: Option<String>,
    },
}

impl Frame {
    pub fn level(&self) -> Level {
        match self {
            Frame::Step { level, .. } | Frame::Stack { level, .. } => *level,
        }
    }

    pub fn block_id(&self) -> BlockId {
        match self {
            Frame::Step { block_id, .. } | Frame::Stack { block_id, .. } => *block_id,
        }
    }

    pub fn selected(&self) -> Option<&String> {
        match self {
            Frame::Step { selected, .. } | Frame::Stack { selected, .. } => selected.as_ref(),
        }
    }

    pub fn is_step(&self) -> bool {
        matches!(self, Frame::Step { .. })
    }
}

// ============================================================================
// STACK
// ============================================================================

/// Ordered sequence of navigation frames, root to current leaf. Never
/// empty after the initial load; the step-frame levels always form a
/// prefix of the hierarchy order.
#[derive(Debug, Clone, Default)]
pub struct NavStack {
    frames: Vec<Frame>,
}

impl NavStack {
    pub fn new() -> Self {
        NavStack { frames: Vec::new() }
    }

    /// Drops all history and installs the single root step frame.
    pub fn reset(&mut self, root_level: Level, block_id: BlockId) {
        self.frames.clear();
        self.frames.push(Frame::Step {
            level: root_level,
            block_id,
            selected: None,
        });
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Pushes a step frame, unless the top frame is already a step frame
    /// for the same level - re-selecting siblings at one level must not
    /// grow the stack, so that frame is reused in place.
    pub fn push_step(&mut self, level: Level, block_id: BlockId) {
        if let Some(Frame::Step {
            level: top_level,
            block_id: top_block,
            selected,
        }) = self.frames.last_mut()
        {
            if *top_level == level {
                *top_block = block_id;
                *selected = None;
                return;
            }
        }
        self.frames.push(Frame::Step {
            level,
            block_id,
            selected: None,
        });
    }

    pub fn push_stack(&mut self, level: Level, block_id: BlockId, parent: BlockId) {
        self.frames.push(Frame::Stack {
            level,
            block_id,
            parent,
            selected: None,
        });
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Records which group was just selected in the topmost frame at
    /// `level`.
    pub fn record_selection(&mut self, level: Level, key: &str) {
        for frame in self.frames.iter_mut().rev() {
            let (frame_level, selected) = match frame {
                Frame::Step {
                    level, selected, ..
                } => (*level, selected),
                Frame::Stack {
                    level, selected, ..
                } => (*level, selected),
            };
            if frame_level == level {
                *selected = Some(key.to_string());
                return;
            }
        }
    }

    /// Selection recorded on the topmost frame at `level`, if any.
    pub fn selection_at(&self, level: Level) -> Option<&str> {
        self.frames
            .iter()
            .rev()
            .find(|frame| frame.level() == level)
            .and_then(|frame| frame.selected())
            .map(String::as_str)
    }

    /// Block id of the stack frame appended under `parent` at `level`.
    pub fn find_stack_block(&self, parent: BlockId, level: Level) -> Option<BlockId> {
        self.frames.iter().rev().find_map(|frame| match frame {
            Frame::Stack {
                level: frame_level,
                block_id,
                parent: frame_parent,
                ..
            } if *frame_level == level && *frame_parent == parent => Some(*block_id),
            _ => None,
        })
    }

    /// Pops frames from the top until the frame owning `block_id` has been
    /// removed (inclusive). Returns the removed frames, deepest first.
    pub fn pop_through_block(&mut self, block_id: BlockId) -> Vec<Frame> {
        let mut removed = Vec::new();
        while let Some(frame) = self.frames.pop() {
            let done = frame.block_id() == block_id;
            removed.push(frame);
            if done {
                break;
            }
        }
        removed
    }

    /// Rewrites the block id of the frame at `index` (after a rebuild).
    pub fn set_block_id(&mut self, index: usize, new_id: BlockId) {
        if let Some(frame) = self.frames.get_mut(index) {
            match frame {
                Frame::Step { block_id, .. } | Frame::Stack { block_id, .. } => {
                    *block_id = new_id;
                }
            }
        }
    }
}
