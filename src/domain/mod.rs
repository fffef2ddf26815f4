// Domain layer: CEP/address models and ports (transport, configuration).

pub mod model;
pub mod ports;
