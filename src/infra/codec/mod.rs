//! Stateless codecs: CAN payload layout of Elster messages and the numeric
//! representation of register values.
pub mod frame;
pub mod value;
