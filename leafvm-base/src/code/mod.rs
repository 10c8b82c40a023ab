pub mod frame;
pub mod method;
pub mod op;
pub mod target;
pub mod types;
