//! Per-class input and output shapes.
//! The class-file parser (which lives outside this crate) hands us a
//! [`ClassInput`] per class; the packaging stage consumes the
//! [`ClassOutput`]s plus the frozen pool.

use crate::code::op::InstL;
use crate::code::target::TargetInstL;
use crate::pool::RawConstants;

/// One method as the parser hands it over
#[derive(Debug, Clone)]
pub struct MethodInput {
    pub name: String,
    /// Source-format descriptor text, e.g. `(IJ)V`
    pub descriptor: String,
    pub is_static: bool,
    /// Size of the source local variable array; parameters occupy the low
    /// slots
    pub max_locals: u16,
    /// In address order
    pub instructions: Vec<InstL>,
}

/// One class as the parser hands it over
#[derive(Debug, Clone)]
pub struct ClassInput {
    /// Binary name, e.g. `com/example/Widget`
    pub name: String,
    pub constants: RawConstants,
    pub methods: Vec<MethodInput>,
}

/// One translated method
#[derive(Debug, Clone, PartialEq)]
pub struct MethodOutput {
    pub name: String,
    pub descriptor: String,
    /// How many virtual registers the body uses
    pub register_count: u32,
    pub instructions: Vec<TargetInstL>,
}

/// One translated class. Constant operands inside the instructions index the
/// build-wide pool, not anything class-local.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassOutput {
    pub name: String,
    pub methods: Vec<MethodOutput>,
}
