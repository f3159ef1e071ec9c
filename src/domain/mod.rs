// Domain layer: the normalized content model and the service port.
// No provider specifics live here.

pub mod model;
pub mod ports;
