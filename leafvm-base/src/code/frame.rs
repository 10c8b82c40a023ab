//! The symbolic operand stack.
//! This models the source format's operand stack during translation. It never
//! holds runtime values, only enough of a description of each slot (a folded
//! constant, or the target register the value will live in) to synthesize
//! target instructions.

use smallvec::SmallVec;

use crate::code::target::Reg;
use crate::code::types::Category;

/// What a symbolic slot holds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Value {
    /// A constant known at translation time. Operations on these fold.
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// The null reference
    Null,
    /// An opaque target-side operand: the value lives in this register
    Reg(Reg),
}
impl Value {
    /// Whether this is a translation-time constant (anything but a register).
    #[must_use]
    pub fn is_const(&self) -> bool {
        !matches!(self, Value::Reg(_))
    }
}

/// One operand-stack position.
/// Wide (long/double) values occupy a single slot; the slot's category is
/// what records their width.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Slot {
    pub cat: Category,
    pub value: Value,
}
impl Slot {
    #[must_use]
    pub fn int(value: i32) -> Slot {
        Slot {
            cat: Category::Int,
            value: Value::Int(value),
        }
    }

    #[must_use]
    pub fn long(value: i64) -> Slot {
        Slot {
            cat: Category::Long,
            value: Value::Long(value),
        }
    }

    #[must_use]
    pub fn float(value: f32) -> Slot {
        Slot {
            cat: Category::Float,
            value: Value::Float(value),
        }
    }

    #[must_use]
    pub fn double(value: f64) -> Slot {
        Slot {
            cat: Category::Double,
            value: Value::Double(value),
        }
    }

    #[must_use]
    pub fn null() -> Slot {
        Slot {
            cat: Category::Ref,
            value: Value::Null,
        }
    }

    #[must_use]
    pub fn reg(cat: Category, reg: Reg) -> Slot {
        Slot {
            cat,
            value: Value::Reg(reg),
        }
    }

    #[must_use]
    pub fn is_wide(&self) -> bool {
        self.cat.is_wide()
    }
}

/// Errors from indexing the symbolic stack. These mean the instruction stream
/// references stack positions that do not exist, which is either a parser
/// defect or genuinely malformed input; they are never silently corrected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    /// Popped from an empty stack
    Underflow { inst_name: &'static str },
    /// Peeked/replaced at a depth beyond the current height
    Bounds {
        inst_name: &'static str,
        /// Depth below the top that was asked for (0 = top)
        depth: usize,
        height: usize,
    },
}

/// The symbolic operand stack for one method being translated.
/// Created fresh per method, mutated instruction by instruction, and
/// discarded once the method's target instructions are emitted.
#[derive(Debug, Clone, Default)]
pub struct SymStack {
    slots: SmallVec<[Slot; 16]>,
}
impl SymStack {
    #[must_use]
    pub fn new() -> SymStack {
        SymStack {
            slots: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn push(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    pub fn pop(&mut self, inst_name: &'static str) -> Result<Slot, StackError> {
        self.slots
            .pop()
            .ok_or(StackError::Underflow { inst_name })
    }

    /// Read a slot at a depth below the top without removing it.
    /// Depth 0 is the top, 1 is one below the top, and so on.
    pub fn peek(&self, inst_name: &'static str, depth: usize) -> Result<&Slot, StackError> {
        let height = self.height();
        self.slots
            .iter()
            .rev()
            .nth(depth)
            .ok_or(StackError::Bounds {
                inst_name,
                depth,
                height,
            })
    }

    /// Overwrite the slot at a depth below the top in place, leaving the
    /// height unchanged. Used by operators that consume operands but leave
    /// their result where an operand was.
    pub fn replace(
        &mut self,
        inst_name: &'static str,
        depth: usize,
        slot: Slot,
    ) -> Result<(), StackError> {
        let height = self.height();
        let index = height
            .checked_sub(depth + 1)
            .ok_or(StackError::Bounds {
                inst_name,
                depth,
                height,
            })?;
        self.slots[index] = slot;
        Ok(())
    }

    /// Iterate from the bottom of the stack to the top.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Slot> {
        self.slots.iter_mut()
    }
}
