//! Wide-column rows and the cursors that produce them.
//!
//! A [`Row`] is addressed by a row key and holds cells grouped by column
//! family. Cells inside a family are kept in ascending qualifier order, the
//! native ordering of the backing store. Repeated qualifiers are retained in
//! arrival order so decoders can observe them.

use std::collections::BTreeMap;

use bytes::Bytes;

pub mod dump;
pub mod source;

pub use dump::CsvRowSource;
pub use source::{CancelFlag, Cancellable, RowSource, VecRowSource};

/// A single qualifier/value pair within a column family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Column qualifier bytes.
    pub qualifier: Bytes,
    /// Raw cell value.
    pub value: Bytes,
}

/// Cells of one column family, sorted by qualifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Family {
    cells: Vec<Cell>,
}

impl Family {
    /// Iterates cells in ascending qualifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Number of cells, counting repeated qualifiers.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true when the family holds no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the most recently written value for `qualifier`.
    pub fn get(&self, qualifier: &[u8]) -> Option<&Bytes> {
        self.cells
            .iter()
            .rev()
            .find(|cell| cell.qualifier.as_ref() == qualifier)
            .map(|cell| &cell.value)
    }
}

/// One row read from a wide-column store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    key: Bytes,
    families: BTreeMap<Bytes, Family>,
}

impl Row {
    /// Starts building a row with the given key.
    pub fn builder(key: impl Into<Bytes>) -> RowBuilder {
        RowBuilder {
            key: key.into(),
            families: BTreeMap::new(),
        }
    }

    /// Builds a row from `(family, qualifier, value)` triples.
    pub fn from_cells<I, F, Q, V>(key: impl Into<Bytes>, cells: I) -> Self
    where
        I: IntoIterator<Item = (F, Q, V)>,
        F: Into<Bytes>,
        Q: Into<Bytes>,
        V: Into<Bytes>,
    {
        cells
            .into_iter()
            .fold(Row::builder(key), |builder, (f, q, v)| builder.cell(f, q, v))
            .build()
    }

    /// The raw row key.
    pub fn key(&self) -> &Bytes {
        &self.key
    }

    /// Looks up a column family by name.
    pub fn family(&self, name: &[u8]) -> Option<&Family> {
        self.families.get(name)
    }

    /// Looks up a single cell value.
    pub fn value(&self, family: &[u8], qualifier: &[u8]) -> Option<&Bytes> {
        self.family(family)?.get(qualifier)
    }

    /// Total number of cells across all families.
    pub fn cell_count(&self) -> usize {
        self.families.values().map(Family::len).sum()
    }
}

/// Incremental constructor for [`Row`].
#[derive(Debug)]
pub struct RowBuilder {
    key: Bytes,
    families: BTreeMap<Bytes, Family>,
}

impl RowBuilder {
    /// Appends a cell. Order between qualifiers is fixed up by [`RowBuilder::build`].
    pub fn cell(
        mut self,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        value: impl Into<Bytes>,
    ) -> Self {
        self.push(family, qualifier, value);
        self
    }

    /// Appends a cell through a mutable reference.
    pub fn push(
        &mut self,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        value: impl Into<Bytes>,
    ) {
        self.families
            .entry(family.into())
            .or_default()
            .cells
            .push(Cell {
                qualifier: qualifier.into(),
                value: value.into(),
            });
    }

    /// Key of the row under construction.
    pub fn key(&self) -> &Bytes {
        &self.key
    }

    /// Finishes the row, sorting each family by qualifier.
    pub fn build(mut self) -> Row {
        for family in self.families.values_mut() {
            // stable: repeated qualifiers keep arrival order
            family.cells.sort_by(|a, b| a.qualifier.cmp(&b.qualifier));
        }
        Row {
            key: self.key,
            families: self.families,
        }
    }
}
