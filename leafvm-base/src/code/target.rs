//! The target instruction set.
//! The target machine is register based: every method body gets a flat file
//! of virtual registers, and the operand stack of the source format is
//! compiled away during translation. Instructions keep the source byte offset
//! they were translated from so branch targets stay resolvable for the
//! packaging stage.

use crate::id::{InstructionOffset, PoolIndex};
use crate::code::op::{BinaryOp, CmpKind, CondOp, ConvKind};
use crate::code::types::Category;

/// A virtual register in a target method body.
/// Registers are method-local and dense from zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Reg(u16);
impl Reg {
    #[must_use]
    pub fn new(index: u16) -> Reg {
        Reg(index)
    }

    #[must_use]
    pub fn get(self) -> u16 {
        self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvokeKind {
    Virtual,
    Special,
    Static,
    Interface,
}

/// The element kind of an array access, with the categories the target cares
/// about plus the sub-int widths it needs for correct truncation on store.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArrayElem {
    /// `baload`/`bastore` handle both byte and boolean arrays
    ByteOrBool,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Ref,
}
impl ArrayElem {
    /// The stack category an element of this kind occupies
    #[must_use]
    pub fn category(self) -> Category {
        match self {
            ArrayElem::ByteOrBool | ArrayElem::Char | ArrayElem::Short | ArrayElem::Int => {
                Category::Int
            }
            ArrayElem::Long => Category::Long,
            ArrayElem::Float => Category::Float,
            ArrayElem::Double => Category::Double,
            ArrayElem::Ref => Category::Ref,
        }
    }

    /// Decode the `atype` operand of a `newarray` instruction
    #[must_use]
    pub fn from_atype(atype: u8) -> Option<ArrayElem> {
        Some(match atype {
            4 | 8 => ArrayElem::ByteOrBool,
            5 => ArrayElem::Char,
            6 => ArrayElem::Float,
            7 => ArrayElem::Double,
            9 => ArrayElem::Short,
            10 => ArrayElem::Int,
            11 => ArrayElem::Long,
            _ => return None,
        })
    }
}

/// One instruction of the target machine.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetInst {
    /// Load a constant-pool entry into a register
    Const {
        dst: Reg,
        cat: Category,
        index: PoolIndex,
    },
    /// Load a small integer immediate; these skip the pool entirely
    ConstImm { dst: Reg, value: i16 },
    ConstNull { dst: Reg },
    /// Register to register copy
    Move { cat: Category, dst: Reg, src: Reg },
    Binary {
        op: BinaryOp,
        cat: Category,
        dst: Reg,
        lhs: Reg,
        rhs: Reg,
    },
    Neg { cat: Category, dst: Reg, src: Reg },
    Convert { kind: ConvKind, dst: Reg, src: Reg },
    /// Three-way comparison producing -1/0/1 in an int register
    Compare {
        kind: CmpKind,
        dst: Reg,
        lhs: Reg,
        rhs: Reg,
    },
    Jump { target: InstructionOffset },
    /// Conditional branch comparing two int registers
    JumpIntCmp {
        op: CondOp,
        lhs: Reg,
        rhs: Reg,
        target: InstructionOffset,
    },
    /// Conditional branch comparing an int register against zero
    JumpIntZero {
        op: CondOp,
        src: Reg,
        target: InstructionOffset,
    },
    /// Conditional branch on reference equality
    JumpRefCmp {
        eq: bool,
        lhs: Reg,
        rhs: Reg,
        target: InstructionOffset,
    },
    /// Conditional branch on a reference being null / non-null
    JumpRefNull {
        is_null: bool,
        src: Reg,
        target: InstructionOffset,
    },
    Switch {
        key: Reg,
        default: InstructionOffset,
        cases: Vec<(i32, InstructionOffset)>,
    },
    GetField {
        cat: Category,
        dst: Reg,
        object: Reg,
        field: PoolIndex,
    },
    PutField {
        cat: Category,
        object: Reg,
        value: Reg,
        field: PoolIndex,
    },
    GetStatic {
        cat: Category,
        dst: Reg,
        field: PoolIndex,
    },
    PutStatic {
        cat: Category,
        value: Reg,
        field: PoolIndex,
    },
    Invoke {
        kind: InvokeKind,
        method: PoolIndex,
        /// Receiver first for instance calls, then arguments left to right
        args: Vec<Reg>,
        ret: Option<(Category, Reg)>,
    },
    NewInstance { dst: Reg, class: PoolIndex },
    /// One-dimensional primitive array
    NewArray {
        dst: Reg,
        elem: ArrayElem,
        length: Reg,
    },
    /// One-dimensional reference array; the component class is in the pool
    NewRefArray {
        dst: Reg,
        class: PoolIndex,
        length: Reg,
    },
    NewMultiArray {
        dst: Reg,
        class: PoolIndex,
        /// One register per dimension, outermost first
        lengths: Vec<Reg>,
    },
    ArrayLoad {
        elem: ArrayElem,
        dst: Reg,
        array: Reg,
        index: Reg,
    },
    ArrayStore {
        elem: ArrayElem,
        array: Reg,
        index: Reg,
        value: Reg,
    },
    ArrayLength { dst: Reg, array: Reg },
    Return { value: Option<(Category, Reg)> },
    Throw { exception: Reg },
    CheckCast { object: Reg, class: PoolIndex },
    InstanceOf {
        dst: Reg,
        object: Reg,
        class: PoolIndex,
    },
    MonitorEnter { object: Reg },
    MonitorExit { object: Reg },
}

/// Target instruction with the source offset it was translated from
pub type TargetInstL = (InstructionOffset, TargetInst);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// The method needed more virtual registers than the target format can
    /// address
    TooManyRegisters { limit: usize },
}

/// Collects the target instructions for one method and hands out its virtual
/// registers.
#[derive(Debug, Default)]
pub struct CodeEmitter {
    insts: Vec<TargetInstL>,
    /// Offset of the source instruction currently being translated; all
    /// emitted instructions are attributed to it
    at: InstructionOffset,
    next_reg: u32,
}
impl CodeEmitter {
    #[must_use]
    pub fn new() -> CodeEmitter {
        CodeEmitter {
            insts: Vec::new(),
            at: InstructionOffset(0),
            next_reg: 0,
        }
    }

    pub fn set_offset(&mut self, at: InstructionOffset) {
        self.at = at;
    }

    pub fn alloc_reg(&mut self) -> Result<Reg, EmitError> {
        let index = u16::try_from(self.next_reg).map_err(|_| EmitError::TooManyRegisters {
            limit: usize::from(u16::MAX) + 1,
        })?;
        self.next_reg += 1;
        Ok(Reg::new(index))
    }

    pub fn emit(&mut self, inst: TargetInst) {
        self.insts.push((self.at, inst));
    }

    #[must_use]
    pub fn instructions(&self) -> &[TargetInstL] {
        &self.insts
    }

    /// The number of registers handed out so far
    #[must_use]
    pub fn register_count(&self) -> u32 {
        self.next_reg
    }

    #[must_use]
    pub fn finish(self) -> (Vec<TargetInstL>, u32) {
        (self.insts, self.next_reg)
    }
}
