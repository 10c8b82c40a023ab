#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
// This would be nice to re-enable eventually, but not while in active dev
#![allow(clippy::missing_errors_doc)]
// Not awful, but it highlights entire function.
#![allow(clippy::unnecessary_wraps)]
// Cool idea but highlights entire function and is too aggressive.
#![allow(clippy::option_if_let_else)]
#![allow(clippy::missing_panics_doc)]
// This is nice to have for cases where we might want to rely on it not returning anything.
#![allow(clippy::semicolon_if_nothing_returned)]
#![allow(clippy::too_many_lines)]

//! Base crate of the class converter: the source instruction model, the
//! symbolic operand stack, descriptors, the build-shared constant pool, and
//! the target instruction set. The driving of a method's instructions lives
//! in the `leafvm-translate` crate.

pub mod class;
pub mod code;
pub mod id;
pub mod pool;
