//! High-level components of the Elster protocol: CAN transport and
//! register watchers with their dispatcher.
pub mod registers;
pub mod transport;
