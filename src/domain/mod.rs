// Domain layer: the resource attribute shape and its ports.

pub mod model;
pub mod ports;
