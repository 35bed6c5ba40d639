// Domain layer: plain data types, the workspace document, and ports (traits).

pub mod model;
pub mod ports;
pub mod workspace;
