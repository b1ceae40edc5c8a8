//! Tabular extraction and reconstruction.
//!
//! [`parse_tables`] lowers `table` subtrees into row-major string grids
//! under a caller-chosen [`Formatter`]. [`Table::node`] goes the other way,
//! rebuilding a minimal tree from a grid.

use std::io;

use html5ever::local_name;

use crate::dom::{self, Handle};
use crate::error::Result;
use crate::formatter::Formatter;
use crate::selection::Selection;
use crate::selector::atom;

/// A table lowered to a row-major grid of cell text.
///
/// Rows keep the lengths they were found with. Nothing pads short rows, so
/// the grid need not be rectangular.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// The rows of the grid.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Consume the table into its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rebuild a `table > tbody > tr > td` tree for the grid.
    ///
    /// The returned node is fresh and unattached. Cell strings become text
    /// nodes verbatim; escaping happens at render time.
    #[must_use]
    pub fn node(&self) -> Handle {
        let table = dom::new_element_atom(local_name!("table"));
        let tbody = dom::new_element_atom(local_name!("tbody"));
        dom::append_child(&table, &tbody);

        for row in &self.rows {
            let tr = dom::new_element_atom(local_name!("tr"));
            dom::append_child(&tbody, &tr);
            for value in row {
                let td = dom::new_element_atom(local_name!("td"));
                dom::append_child(&td, &dom::new_text(value));
                dom::append_child(&tr, &td);
            }
        }

        table
    }

    /// Serialize [`Table::node`] to the writer.
    pub fn render<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        dom::render_node(writer, &self.node())
    }
}

impl From<Vec<Vec<String>>> for Table {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Table { rows }
    }
}

impl IntoIterator for Table {
    type Item = Vec<String>;
    type IntoIter = std::vec::IntoIter<Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Lower every `table` under the selection into a grid, in document order.
///
/// Nested tables are not exclusive: an inner table contributes its cells to
/// the enclosing grid and appears again as its own entry. Within a table,
/// the row search is restricted to the first `tbody` subtree when one
/// exists; rows are `tr` descendants and cells are `td` descendants, so
/// header cells in `th` elements are not harvested. Cell text comes from
/// the formatter. Rowless tables still yield an (empty) entry.
#[must_use]
pub fn parse_tables<F>(selection: &Selection, formatter: &F) -> Vec<Table>
where
    F: Formatter + ?Sized,
{
    let table_sel = atom(local_name!("table"));
    let tbody_sel = atom(local_name!("tbody"));
    let tr_sel = atom(local_name!("tr"));
    let td_sel = atom(local_name!("td"));

    let mut tables = Vec::new();
    for found in selection.find_all(&table_sel).iter() {
        let scope = if found.contains(&tbody_sel) {
            found.find(&tbody_sel)
        } else {
            found
        };

        let mut rows = Vec::new();
        for row in scope.find_all(&tr_sel).iter() {
            let cells: Vec<String> = row
                .find_all(&td_sel)
                .iter()
                .map(|cell| cell.text(formatter).to_string())
                .collect();
            rows.push(cells);
        }

        tables.push(Table { rows });
    }

    tables
}
