#![forbid(unsafe_code)]

//! Directional navigation over the focus tree.
//!
//! Resolution is a pure function of the tree shape and the current focus:
//! nothing here mutates state. The engine applies the returned [`Step`].
//!
//! # Algorithm
//!
//! 1. Walk up from the focused leaf to the nearest ancestor whose
//!    orientation matches the direction (`Horizontal` for Left/Right,
//!    `Vertical` for Up/Down). No such ancestor means the press does not
//!    apply here.
//! 2. Grid containers handle vertical presses by row: the destination row is
//!    the next/previous child, and the target is the item at the same column
//!    index in that row, clamped to the row's last item.
//! 3. Any other container steps its focused child's index by one.
//! 4. Stepping off either end wraps when the container is wrapping and is an
//!    edge otherwise.
//!
//! # Known limitation
//!
//! The column clamp in step 2 means that moving from a long row into a
//! shorter one and back does not return to the original column.

use lrud_core::{Direction, NodeId};

use crate::tree::{FocusTree, Node};

/// Result of handling a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Unmapped key, no focus, or no container responds to the direction.
    Unhandled,
    /// ENTER on the focused leaf. The press is left to the host.
    Selected { id: NodeId },
    /// Focus moved between leaves.
    Moved { from: NodeId, to: NodeId },
    /// The press hit a non-wrapping boundary; focus is unchanged.
    Edge { container: NodeId },
}

impl KeyOutcome {
    /// Whether the press was consumed by navigation, i.e. propagation
    /// should stop.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        matches!(self, Self::Moved { .. } | Self::Edge { .. })
    }
}

/// A resolved navigation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    /// No ancestor has a matching orientation.
    NoMatch,
    /// The matching container has nowhere to go.
    Edge { container: NodeId },
    /// Move to `target`, a child (or grandchild, for grids) of `container`.
    Target { container: NodeId, target: NodeId },
}

/// Resolve a press of `direction` with `from` focused.
pub(crate) fn resolve(tree: &FocusTree, from: &str, direction: Direction) -> Step {
    let wanted = direction.orientation();
    let mut below: Option<&str> = None;
    let mut child = from;

    while let Some(container) = tree.parent(child).and_then(|p| tree.node(p)) {
        if container.orientation() == Some(wanted) {
            return if container.is_grid() && direction.is_vertical() {
                step_grid(tree, container, child, below, direction)
            } else {
                step_list(container, child, direction)
            };
        }
        below = Some(child);
        child = container.id();
    }

    tracing::trace!(from, %direction, "no container matches direction");
    Step::NoMatch
}

fn step_list(container: &Node, child: &str, direction: Direction) -> Step {
    let edge = || Step::Edge {
        container: container.id().to_owned(),
    };
    let Some(index) = container.index_of(child) else {
        return edge();
    };
    let siblings = container.children();
    match direction.step(index, siblings.len(), container.is_wrapping()) {
        Some(next) if next != index => Step::Target {
            container: container.id().to_owned(),
            target: siblings[next].clone(),
        },
        _ => edge(),
    }
}

fn step_grid(
    tree: &FocusTree,
    grid: &Node,
    row: &str,
    item: Option<&str>,
    direction: Direction,
) -> Step {
    let edge = || Step::Edge {
        container: grid.id().to_owned(),
    };
    let Some(row_index) = grid.index_of(row) else {
        return edge();
    };
    let rows = grid.children();
    let dest_index = match direction.step(row_index, rows.len(), grid.is_wrapping()) {
        Some(next) if next != row_index => next,
        _ => return edge(),
    };

    let column = item
        .and_then(|item| tree.node(row)?.index_of(item))
        .unwrap_or(0);
    let dest_row = &rows[dest_index];
    let cells = tree.children(dest_row);
    let target = match cells.len() {
        0 => dest_row.clone(),
        len => cells[column.min(len - 1)].clone(),
    };
    tracing::trace!(row, dest_row = %dest_row, column, target = %target, "grid step");

    Step::Target {
        container: grid.id().to_owned(),
        target,
    }
}
