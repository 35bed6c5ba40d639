// Application layer: the concrete cutting pipeline, report writers and imports.

pub mod import;
pub mod pipelines;
pub mod reports;
