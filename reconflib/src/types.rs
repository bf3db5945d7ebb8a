//! Primitive data types.

/// Data type for node names.
pub type NodeName = String;
/// Data type for switch identifiers.
pub type SwitchId = String;
/// Data type for node loads. Negative values mean net generation.
pub type Load = f64;
/// Data type for link distances (or any impedance-like scalar).
pub type Distance = f64;
/// Data type for criterion scores.
pub type Score = f64;
