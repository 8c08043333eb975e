// Domain layer: the book model, the store port and the execution window.
// Nothing here talks to the network; adapters implement the ports.

pub mod deadline;
pub mod model;
pub mod ports;
