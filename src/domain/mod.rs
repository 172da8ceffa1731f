// Domain layer: the tally itself, its data model, and the ports the pipeline talks through.

pub mod model;
pub mod ports;
pub mod tally;
