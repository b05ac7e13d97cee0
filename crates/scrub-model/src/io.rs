//! Boundary traits: where tables come from and where they go.

use crate::Table;

/// Produces the raw table a pipeline run starts from.
pub trait TableSource {
    type Error;

    fn read_table(&mut self) -> Result<Table, Self::Error>;
}

/// Accepts the cleaned table at the end of a run.
pub trait TableSink {
    type Error;

    fn write_table(&mut self, table: Table) -> Result<(), Self::Error>;
}
