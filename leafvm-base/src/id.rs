use std::fmt;

/// An index into the build-wide target constant pool.
/// Only meaningful for the [`crate::pool::ConstantPool`] instance that handed it out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PoolIndex(u16);
impl PoolIndex {
    pub(crate) fn new_unchecked(index: u16) -> PoolIndex {
        PoolIndex(index)
    }

    #[must_use]
    pub fn get(self) -> u16 {
        self.0
    }
}
impl fmt::Display for PoolIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A class-local index into the raw constant table that the class-file parser
/// handed us. These are 1-based, as in the source format, and are only valid
/// for the class they came from.
pub type RawPoolIndex = u16;

/// Byte offset of an instruction within a method's code array.
/// Branch targets are expressed in these, and the emitted target instructions
/// keep them so the offsets stay meaningful for later stages.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstructionOffset(pub u32);
impl fmt::Display for InstructionOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// An index into a method's local variable array.
/// Wide (category-2) values occupy this index and the next.
pub type LocalIndex = u16;
