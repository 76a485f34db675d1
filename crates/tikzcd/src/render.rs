//! Code generation: lays a [`Diagram`] onto its bounding grid and emits
//! `tikzcd` markup.
//!
//! Rendering never fails. Every node's cell holds its label followed by one
//! `\arrow[...]` directive per outgoing edge; cells that hold no node stay
//! empty. An empty diagram renders as an environment with a single empty
//! cell.
//!
//! # Example
//!
//! ```
//! # use tikzcd::render::{render, RenderOptions};
//! let diagram = tikzcd_parser::parse(r"\begin{tikzcd} A \arrow[r] & B \end{tikzcd}").unwrap();
//!
//! let markup = render(&diagram, &RenderOptions::new(false));
//! assert_eq!(markup, "\\begin{tikzcd}\nA \\arrow[r] & B\n\\end{tikzcd}");
//! ```

mod directive;
mod options;

pub use options::RenderOptions;

use log::trace;
use tikzcd_core::semantic::{Diagram, Node};
use unicode_width::UnicodeWidthStr;

use directive::{arrow_directive, needs_braces};

/// Characters that split a node label unless it is wrapped in braces.
const NODE_SIGNIFICANT: [char; 5] = ['"', ',', ']', '&', '%'];

/// Commands that end a node label outside braces.
const NODE_TERMINATORS: [&str; 3] = ["\\\\", "\\arrow", "\\begin"];

/// Node label as it appears in its cell.
///
/// A label containing `\end{tikzcd}` cannot be shielded by braces and
/// closes the environment when parsed again.
fn cell_label(node: &Node) -> String {
    let label = node.label();
    if node.is_blank()
        || needs_braces(label, &NODE_SIGNIFICANT)
        || NODE_TERMINATORS.iter().any(|command| label.contains(command))
    {
        format!("{{{label}}}")
    } else {
        label.to_string()
    }
}

fn node_cell(diagram: &Diagram, node: &Node) -> String {
    let mut cell = cell_label(node);
    for edge in diagram.outgoing(node.id()) {
        let Some(target) = diagram.node(edge.target()) else {
            continue;
        };
        let offset = node.position().offset_to(target.position());
        cell.push(' ');
        cell.push_str(&arrow_directive(offset, edge.attributes()));
    }
    cell
}

/// Lays every node's cell onto a row-major grid covering the diagram bounds.
fn layout_cells(diagram: &Diagram) -> Vec<Vec<String>> {
    let Some(bounds) = diagram.bounds() else {
        return vec![vec![String::new()]];
    };

    let mut grid = vec![vec![String::new(); bounds.columns()]; bounds.rows()];
    for node in diagram.nodes() {
        let (column, row) = bounds.cell_index(node.position());
        grid[row][column] = node_cell(diagram, node);
    }
    grid
}

/// Pads every cell with trailing spaces to the display width of the widest
/// cell in its column.
fn align_columns(grid: &mut [Vec<String>]) {
    let columns = grid.first().map_or(0, Vec::len);
    for column in 0..columns {
        let width = grid
            .iter()
            .map(|row| row[column].width())
            .max()
            .unwrap_or(0);
        for row in grid.iter_mut() {
            let cell = &mut row[column];
            let padding = width - cell.width();
            cell.extend(std::iter::repeat_n(' ', padding));
        }
    }
}

/// Render a diagram to `tikzcd` markup.
///
/// Cells are joined by ` & ` and rows by ` \\` plus a newline. With
/// [`RenderOptions::align`] every column is padded after all cells are known.
///
/// The output covers the whole bounding box, so its size grows with the
/// diagram's span. Decoded payloads are capped at
/// [`MAX_GRID_SPAN`](crate::codec::MAX_GRID_SPAN) per side.
pub fn render(diagram: &Diagram, options: &RenderOptions) -> String {
    let mut grid = layout_cells(diagram);
    trace!(
        rows = grid.len(),
        align = options.align();
        "Rendering diagram"
    );

    if options.align() {
        align_columns(&mut grid);
    }

    let body = grid
        .iter()
        .map(|row| row.join(" & "))
        .collect::<Vec<_>>()
        .join(" \\\\\n");

    format!("\\begin{{tikzcd}}\n{body}\n\\end{{tikzcd}}")
}
