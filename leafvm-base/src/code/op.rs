//! The source instruction model.
//! The class-file parser hands us one structured record per source
//! instruction; this module is the data-driven table behind them. The large
//! per-opcode family of the source format collapses into a small number of
//! parameterized shapes (constant push, local access, shuffle, binary, unary,
//! branch, field access, invoke, ...), each configured by an operator and a
//! type category rather than by its own type.

use crate::code::target::{ArrayElem, InvokeKind};
use crate::code::types::Category;
use crate::id::{InstructionOffset, LocalIndex, RawPoolIndex};

pub type RawOpcode = u8;

/// Operator of the logical/arithmetic binary family.
/// Which operators are valid for which category follows the source format:
/// float/double only get the arithmetic ones, shifts and bitwise ops are
/// integer only.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    /// Shift left
    Shl,
    /// Arithmetic (sign extending) shift right
    Shr,
    /// Logical shift right; vacated high bits are always zero
    Ushr,
}
impl BinaryOp {
    /// Whether this operator only exists for the integer categories
    #[must_use]
    pub fn is_integer_only(self) -> bool {
        matches!(
            self,
            BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Xor
                | BinaryOp::Shl
                | BinaryOp::Shr
                | BinaryOp::Ushr
        )
    }

    /// Whether the second operand is a shift amount, which is always an int
    /// and is masked to the first operand's width
    #[must_use]
    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr | BinaryOp::Ushr)
    }
}

/// Numeric conversions, named after their source mnemonics.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConvKind {
    I2L,
    I2F,
    I2D,
    L2I,
    L2F,
    L2D,
    F2I,
    F2L,
    F2D,
    D2I,
    D2L,
    D2F,
    /// Truncate to 8 bits then sign extend
    I2B,
    /// Truncate to 16 bits, zero extended (char is unsigned)
    I2C,
    /// Truncate to 16 bits then sign extend
    I2S,
}
impl ConvKind {
    #[must_use]
    pub fn from_cat(self) -> Category {
        match self {
            ConvKind::I2L
            | ConvKind::I2F
            | ConvKind::I2D
            | ConvKind::I2B
            | ConvKind::I2C
            | ConvKind::I2S => Category::Int,
            ConvKind::L2I | ConvKind::L2F | ConvKind::L2D => Category::Long,
            ConvKind::F2I | ConvKind::F2L | ConvKind::F2D => Category::Float,
            ConvKind::D2I | ConvKind::D2L | ConvKind::D2F => Category::Double,
        }
    }

    #[must_use]
    pub fn to_cat(self) -> Category {
        match self {
            ConvKind::L2I
            | ConvKind::F2I
            | ConvKind::D2I
            | ConvKind::I2B
            | ConvKind::I2C
            | ConvKind::I2S => Category::Int,
            ConvKind::I2L | ConvKind::F2L | ConvKind::D2L => Category::Long,
            ConvKind::I2F | ConvKind::L2F | ConvKind::D2F => Category::Float,
            ConvKind::I2D | ConvKind::L2D | ConvKind::F2D => Category::Double,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ConvKind::I2L => "i2l",
            ConvKind::I2F => "i2f",
            ConvKind::I2D => "i2d",
            ConvKind::L2I => "l2i",
            ConvKind::L2F => "l2f",
            ConvKind::L2D => "l2d",
            ConvKind::F2I => "f2i",
            ConvKind::F2L => "f2l",
            ConvKind::F2D => "f2d",
            ConvKind::D2I => "d2i",
            ConvKind::D2L => "d2l",
            ConvKind::D2F => "d2f",
            ConvKind::I2B => "i2b",
            ConvKind::I2C => "i2c",
            ConvKind::I2S => "i2s",
        }
    }
}

/// Three-way comparisons. The L/G suffix decides which way NaN collapses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CmpKind {
    LongCmp,
    /// NaN compares as -1
    FloatCmpL,
    /// NaN compares as 1
    FloatCmpG,
    DoubleCmpL,
    DoubleCmpG,
}
impl CmpKind {
    #[must_use]
    pub fn operand_cat(self) -> Category {
        match self {
            CmpKind::LongCmp => Category::Long,
            CmpKind::FloatCmpL | CmpKind::FloatCmpG => Category::Float,
            CmpKind::DoubleCmpL | CmpKind::DoubleCmpG => Category::Double,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CmpKind::LongCmp => "lcmp",
            CmpKind::FloatCmpL => "fcmpl",
            CmpKind::FloatCmpG => "fcmpg",
            CmpKind::DoubleCmpL => "dcmpl",
            CmpKind::DoubleCmpG => "dcmpg",
        }
    }
}

/// Condition of a conditional branch
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CondOp {
    Eq,
    Ne,
    Lt,
    Ge,
    Gt,
    Le,
}
impl CondOp {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CondOp::Eq => "eq",
            CondOp::Ne => "ne",
            CondOp::Lt => "lt",
            CondOp::Ge => "ge",
            CondOp::Gt => "gt",
            CondOp::Le => "le",
        }
    }

    /// Evaluate the condition against a comparison result (`lhs - rhs` sign)
    #[must_use]
    pub fn eval(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering;
        match self {
            CondOp::Eq => ordering == Ordering::Equal,
            CondOp::Ne => ordering != Ordering::Equal,
            CondOp::Lt => ordering == Ordering::Less,
            CondOp::Ge => ordering != Ordering::Less,
            CondOp::Gt => ordering == Ordering::Greater,
            CondOp::Le => ordering != Ordering::Greater,
        }
    }
}

/// The stack shuffle family. These rearrange slots without interpreting
/// them, which is why they are untyped: the same `dup2` works for two ints,
/// an int and a float, or one long.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShuffleOp {
    /// Discard one narrow slot
    Pop,
    /// Discard two narrow slots or one wide slot
    Pop2,
    Dup,
    DupX1,
    DupX2,
    Dup2,
    Dup2X1,
    Dup2X2,
    Swap,
}
impl ShuffleOp {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ShuffleOp::Pop => "pop",
            ShuffleOp::Pop2 => "pop2",
            ShuffleOp::Dup => "dup",
            ShuffleOp::DupX1 => "dup_x1",
            ShuffleOp::DupX2 => "dup_x2",
            ShuffleOp::Dup2 => "dup2",
            ShuffleOp::Dup2X1 => "dup2_x1",
            ShuffleOp::Dup2X2 => "dup2_x2",
            ShuffleOp::Swap => "swap",
        }
    }
}

/// One source instruction, as the class-file parser hands it to us.
/// The short forms of the source format (`iconst_<n>`, `iload_<n>`, `wide`
/// prefixes, `bipush`/`sipush`) arrive already widened into the parameterized
/// variant for their family.
#[derive(Debug, Clone, PartialEq)]
pub enum Inst {
    Nop,
    /// `aconst_null`
    ConstNull,
    /// `iconst_<n>`, `bipush`, `sipush`
    ConstInt(i32),
    /// `lconst_<n>`
    ConstLong(i64),
    /// `fconst_<n>`
    ConstFloat(f32),
    /// `dconst_<n>`
    ConstDouble(f64),
    /// `ldc` / `ldc_w`: int, float, string or class constant
    LoadConstant { index: RawPoolIndex },
    /// `ldc2_w`: long or double constant
    LoadConstantWide { index: RawPoolIndex },
    /// `iload`/`lload`/`fload`/`dload`/`aload` and their `_<n>`/wide forms
    LocalLoad { cat: Category, index: LocalIndex },
    /// `istore`/`lstore`/`fstore`/`dstore`/`astore` and their short forms
    LocalStore { cat: Category, index: LocalIndex },
    /// `iinc` (and its wide form)
    IntIncrement { index: LocalIndex, amount: i16 },
    /// `pop`, `dup`, `swap`, ...
    Shuffle(ShuffleOp),
    /// The whole logical/arithmetic binary family: `iadd` ... `lushr`
    Binary { op: BinaryOp, cat: Category },
    /// `ineg`/`lneg`/`fneg`/`dneg`
    Neg { cat: Category },
    /// `i2l`, `f2d`, `i2b`, ...
    Convert(ConvKind),
    /// `lcmp`, `fcmpl`, `fcmpg`, `dcmpl`, `dcmpg`
    Compare(CmpKind),
    /// `ifeq` ... `ifle`: int against zero
    BranchIntZero {
        op: CondOp,
        target: InstructionOffset,
    },
    /// `if_icmpeq` ... `if_icmple`
    BranchIntCmp {
        op: CondOp,
        target: InstructionOffset,
    },
    /// `if_acmpeq` / `if_acmpne`
    BranchRefCmp {
        eq: bool,
        target: InstructionOffset,
    },
    /// `ifnull` / `ifnonnull`
    BranchRefNull {
        is_null: bool,
        target: InstructionOffset,
    },
    /// `goto` / `goto_w`
    Goto { target: InstructionOffset },
    /// `tableswitch`; the offsets cover `low..=low + offsets.len() - 1`
    TableSwitch {
        default: InstructionOffset,
        low: i32,
        offsets: Vec<InstructionOffset>,
    },
    /// `lookupswitch`
    LookupSwitch {
        default: InstructionOffset,
        pairs: Vec<(i32, InstructionOffset)>,
    },
    /// All return forms; `None` is a void return
    Return { cat: Option<Category> },
    GetStatic { index: RawPoolIndex },
    PutStatic { index: RawPoolIndex },
    GetField { index: RawPoolIndex },
    PutField { index: RawPoolIndex },
    Invoke {
        kind: InvokeKind,
        index: RawPoolIndex,
    },
    New { index: RawPoolIndex },
    /// `newarray` with its atype already decoded
    NewArray { elem: ArrayElem },
    /// `anewarray`
    NewRefArray { index: RawPoolIndex },
    /// `multianewarray`
    NewMultiArray {
        index: RawPoolIndex,
        dimensions: u8,
    },
    /// `iaload` ... `saload`
    ArrayLoad { elem: ArrayElem },
    /// `iastore` ... `sastore`
    ArrayStore { elem: ArrayElem },
    ArrayLength,
    /// `athrow`
    Throw,
    CheckCast { index: RawPoolIndex },
    InstanceOf { index: RawPoolIndex },
    MonitorEnter,
    MonitorExit,
    /// An opcode with no registered handler (`jsr`, `ret`, `invokedynamic`).
    /// Fatal for the method it appears in; the build carries on with the
    /// rest.
    Unsupported { opcode: RawOpcode },
}

/// Instruction with the source offset it sits at
pub type InstL = (InstructionOffset, Inst);

impl Inst {
    /// The mnemonic, for error reports and instruction logging
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Inst::Nop => "nop",
            Inst::ConstNull => "aconst_null",
            Inst::ConstInt(_) => "iconst",
            Inst::ConstLong(_) => "lconst",
            Inst::ConstFloat(_) => "fconst",
            Inst::ConstDouble(_) => "dconst",
            Inst::LoadConstant { .. } => "ldc",
            Inst::LoadConstantWide { .. } => "ldc2_w",
            Inst::LocalLoad { cat, .. } => match cat {
                Category::Long => "lload",
                Category::Float => "fload",
                Category::Double => "dload",
                Category::Ref => "aload",
                _ => "iload",
            },
            Inst::LocalStore { cat, .. } => match cat {
                Category::Long => "lstore",
                Category::Float => "fstore",
                Category::Double => "dstore",
                Category::Ref => "astore",
                _ => "istore",
            },
            Inst::IntIncrement { .. } => "iinc",
            Inst::Shuffle(op) => op.name(),
            Inst::Binary { op, cat } => binary_name(*op, *cat),
            Inst::Neg { cat } => match cat {
                Category::Long => "lneg",
                Category::Float => "fneg",
                Category::Double => "dneg",
                _ => "ineg",
            },
            Inst::Convert(kind) => kind.name(),
            Inst::Compare(kind) => kind.name(),
            Inst::BranchIntZero { op, .. } => match op {
                CondOp::Eq => "ifeq",
                CondOp::Ne => "ifne",
                CondOp::Lt => "iflt",
                CondOp::Ge => "ifge",
                CondOp::Gt => "ifgt",
                CondOp::Le => "ifle",
            },
            Inst::BranchIntCmp { op, .. } => match op {
                CondOp::Eq => "if_icmpeq",
                CondOp::Ne => "if_icmpne",
                CondOp::Lt => "if_icmplt",
                CondOp::Ge => "if_icmpge",
                CondOp::Gt => "if_icmpgt",
                CondOp::Le => "if_icmple",
            },
            Inst::BranchRefCmp { eq: true, .. } => "if_acmpeq",
            Inst::BranchRefCmp { eq: false, .. } => "if_acmpne",
            Inst::BranchRefNull { is_null: true, .. } => "ifnull",
            Inst::BranchRefNull { is_null: false, .. } => "ifnonnull",
            Inst::Goto { .. } => "goto",
            Inst::TableSwitch { .. } => "tableswitch",
            Inst::LookupSwitch { .. } => "lookupswitch",
            Inst::Return { cat } => match cat {
                None => "return",
                Some(Category::Long) => "lreturn",
                Some(Category::Float) => "freturn",
                Some(Category::Double) => "dreturn",
                Some(Category::Ref) => "areturn",
                Some(_) => "ireturn",
            },
            Inst::GetStatic { .. } => "getstatic",
            Inst::PutStatic { .. } => "putstatic",
            Inst::GetField { .. } => "getfield",
            Inst::PutField { .. } => "putfield",
            Inst::Invoke { kind, .. } => match kind {
                InvokeKind::Virtual => "invokevirtual",
                InvokeKind::Special => "invokespecial",
                InvokeKind::Static => "invokestatic",
                InvokeKind::Interface => "invokeinterface",
            },
            Inst::New { .. } => "new",
            Inst::NewArray { .. } => "newarray",
            Inst::NewRefArray { .. } => "anewarray",
            Inst::NewMultiArray { .. } => "multianewarray",
            Inst::ArrayLoad { elem } => match elem {
                ArrayElem::ByteOrBool => "baload",
                ArrayElem::Char => "caload",
                ArrayElem::Short => "saload",
                ArrayElem::Int => "iaload",
                ArrayElem::Long => "laload",
                ArrayElem::Float => "faload",
                ArrayElem::Double => "daload",
                ArrayElem::Ref => "aaload",
            },
            Inst::ArrayStore { elem } => match elem {
                ArrayElem::ByteOrBool => "bastore",
                ArrayElem::Char => "castore",
                ArrayElem::Short => "sastore",
                ArrayElem::Int => "iastore",
                ArrayElem::Long => "lastore",
                ArrayElem::Float => "fastore",
                ArrayElem::Double => "dastore",
                ArrayElem::Ref => "aastore",
            },
            Inst::ArrayLength => "arraylength",
            Inst::Throw => "athrow",
            Inst::CheckCast { .. } => "checkcast",
            Inst::InstanceOf { .. } => "instanceof",
            Inst::MonitorEnter => "monitorenter",
            Inst::MonitorExit => "monitorexit",
            Inst::Unsupported { .. } => "unsupported",
        }
    }

    /// The net slot delta this instruction has on the symbolic stack, when
    /// it is statically known. `None` for the shapes whose delta depends on
    /// the slots they find (`pop2`/`dup2` family) or on a descriptor
    /// (invokes). The driver checks the actual effect against this after
    /// every handler.
    #[must_use]
    pub fn static_stack_delta(&self) -> Option<i32> {
        Some(match self {
            Inst::Nop | Inst::IntIncrement { .. } => 0,
            Inst::ConstNull
            | Inst::ConstInt(_)
            | Inst::ConstLong(_)
            | Inst::ConstFloat(_)
            | Inst::ConstDouble(_)
            | Inst::LoadConstant { .. }
            | Inst::LoadConstantWide { .. }
            | Inst::LocalLoad { .. }
            | Inst::New { .. }
            | Inst::GetStatic { .. } => 1,
            Inst::LocalStore { .. } | Inst::PutStatic { .. } => -1,
            Inst::Shuffle(op) => match op {
                ShuffleOp::Pop => -1,
                ShuffleOp::Dup | ShuffleOp::DupX1 | ShuffleOp::DupX2 => 1,
                ShuffleOp::Swap => 0,
                // These move one-or-two slots depending on the widths they
                // find on the stack
                ShuffleOp::Pop2
                | ShuffleOp::Dup2
                | ShuffleOp::Dup2X1
                | ShuffleOp::Dup2X2 => return None,
            },
            Inst::Binary { .. } | Inst::Compare(_) => -1,
            Inst::Neg { .. } | Inst::Convert(_) => 0,
            Inst::BranchIntZero { .. } | Inst::BranchRefNull { .. } => -1,
            Inst::BranchIntCmp { .. } | Inst::BranchRefCmp { .. } => -2,
            Inst::Goto { .. } => 0,
            Inst::TableSwitch { .. } | Inst::LookupSwitch { .. } => -1,
            Inst::Return { cat } => {
                if cat.is_some() {
                    -1
                } else {
                    0
                }
            }
            Inst::GetField { .. } => 0,
            Inst::PutField { .. } => -2,
            Inst::Invoke { .. } => return None,
            Inst::NewArray { .. } | Inst::NewRefArray { .. } => 0,
            Inst::NewMultiArray { dimensions, .. } => 1 - i32::from(*dimensions),
            Inst::ArrayLoad { .. } => -1,
            Inst::ArrayStore { .. } => -3,
            Inst::ArrayLength | Inst::CheckCast { .. } | Inst::InstanceOf { .. } => 0,
            Inst::Throw | Inst::MonitorEnter | Inst::MonitorExit => -1,
            Inst::Unsupported { .. } => return None,
        })
    }
}

fn binary_name(op: BinaryOp, cat: Category) -> &'static str {
    match (op, cat) {
        (BinaryOp::Add, Category::Long) => "ladd",
        (BinaryOp::Add, Category::Float) => "fadd",
        (BinaryOp::Add, Category::Double) => "dadd",
        (BinaryOp::Add, _) => "iadd",
        (BinaryOp::Sub, Category::Long) => "lsub",
        (BinaryOp::Sub, Category::Float) => "fsub",
        (BinaryOp::Sub, Category::Double) => "dsub",
        (BinaryOp::Sub, _) => "isub",
        (BinaryOp::Mul, Category::Long) => "lmul",
        (BinaryOp::Mul, Category::Float) => "fmul",
        (BinaryOp::Mul, Category::Double) => "dmul",
        (BinaryOp::Mul, _) => "imul",
        (BinaryOp::Div, Category::Long) => "ldiv",
        (BinaryOp::Div, Category::Float) => "fdiv",
        (BinaryOp::Div, Category::Double) => "ddiv",
        (BinaryOp::Div, _) => "idiv",
        (BinaryOp::Rem, Category::Long) => "lrem",
        (BinaryOp::Rem, Category::Float) => "frem",
        (BinaryOp::Rem, Category::Double) => "drem",
        (BinaryOp::Rem, _) => "irem",
        (BinaryOp::And, Category::Long) => "land",
        (BinaryOp::And, _) => "iand",
        (BinaryOp::Or, Category::Long) => "lor",
        (BinaryOp::Or, _) => "ior",
        (BinaryOp::Xor, Category::Long) => "lxor",
        (BinaryOp::Xor, _) => "ixor",
        (BinaryOp::Shl, Category::Long) => "lshl",
        (BinaryOp::Shl, _) => "ishl",
        (BinaryOp::Shr, Category::Long) => "lshr",
        (BinaryOp::Shr, _) => "ishr",
        (BinaryOp::Ushr, Category::Long) => "lushr",
        (BinaryOp::Ushr, _) => "iushr",
    }
}

/// The mnemonic for a raw opcode byte, for reporting unsupported or unknown
/// instructions. `None` for bytes the source format does not define.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn opcode_name(opcode: RawOpcode) -> Option<&'static str> {
    Some(match opcode {
        0x00 => "nop",
        0x01 => "aconst_null",
        0x02 => "iconst_m1",
        0x03 => "iconst_0",
        0x04 => "iconst_1",
        0x05 => "iconst_2",
        0x06 => "iconst_3",
        0x07 => "iconst_4",
        0x08 => "iconst_5",
        0x09 => "lconst_0",
        0x0A => "lconst_1",
        0x0B => "fconst_0",
        0x0C => "fconst_1",
        0x0D => "fconst_2",
        0x0E => "dconst_0",
        0x0F => "dconst_1",
        0x10 => "bipush",
        0x11 => "sipush",
        0x12 => "ldc",
        0x13 => "ldc_w",
        0x14 => "ldc2_w",
        0x15 => "iload",
        0x16 => "lload",
        0x17 => "fload",
        0x18 => "dload",
        0x19 => "aload",
        0x1A => "iload_0",
        0x1B => "iload_1",
        0x1C => "iload_2",
        0x1D => "iload_3",
        0x1E => "lload_0",
        0x1F => "lload_1",
        0x20 => "lload_2",
        0x21 => "lload_3",
        0x22 => "fload_0",
        0x23 => "fload_1",
        0x24 => "fload_2",
        0x25 => "fload_3",
        0x26 => "dload_0",
        0x27 => "dload_1",
        0x28 => "dload_2",
        0x29 => "dload_3",
        0x2A => "aload_0",
        0x2B => "aload_1",
        0x2C => "aload_2",
        0x2D => "aload_3",
        0x2E => "iaload",
        0x2F => "laload",
        0x30 => "faload",
        0x31 => "daload",
        0x32 => "aaload",
        0x33 => "baload",
        0x34 => "caload",
        0x35 => "saload",
        0x36 => "istore",
        0x37 => "lstore",
        0x38 => "fstore",
        0x39 => "dstore",
        0x3A => "astore",
        0x3B => "istore_0",
        0x3C => "istore_1",
        0x3D => "istore_2",
        0x3E => "istore_3",
        0x3F => "lstore_0",
        0x40 => "lstore_1",
        0x41 => "lstore_2",
        0x42 => "lstore_3",
        0x43 => "fstore_0",
        0x44 => "fstore_1",
        0x45 => "fstore_2",
        0x46 => "fstore_3",
        0x47 => "dstore_0",
        0x48 => "dstore_1",
        0x49 => "dstore_2",
        0x4A => "dstore_3",
        0x4B => "astore_0",
        0x4C => "astore_1",
        0x4D => "astore_2",
        0x4E => "astore_3",
        0x4F => "iastore",
        0x50 => "lastore",
        0x51 => "fastore",
        0x52 => "dastore",
        0x53 => "aastore",
        0x54 => "bastore",
        0x55 => "castore",
        0x56 => "sastore",
        0x57 => "pop",
        0x58 => "pop2",
        0x59 => "dup",
        0x5A => "dup_x1",
        0x5B => "dup_x2",
        0x5C => "dup2",
        0x5D => "dup2_x1",
        0x5E => "dup2_x2",
        0x5F => "swap",
        0x60 => "iadd",
        0x61 => "ladd",
        0x62 => "fadd",
        0x63 => "dadd",
        0x64 => "isub",
        0x65 => "lsub",
        0x66 => "fsub",
        0x67 => "dsub",
        0x68 => "imul",
        0x69 => "lmul",
        0x6A => "fmul",
        0x6B => "dmul",
        0x6C => "idiv",
        0x6D => "ldiv",
        0x6E => "fdiv",
        0x6F => "ddiv",
        0x70 => "irem",
        0x71 => "lrem",
        0x72 => "frem",
        0x73 => "drem",
        0x74 => "ineg",
        0x75 => "lneg",
        0x76 => "fneg",
        0x77 => "dneg",
        0x78 => "ishl",
        0x79 => "lshl",
        0x7A => "ishr",
        0x7B => "lshr",
        0x7C => "iushr",
        0x7D => "lushr",
        0x7E => "iand",
        0x7F => "land",
        0x80 => "ior",
        0x81 => "lor",
        0x82 => "ixor",
        0x83 => "lxor",
        0x84 => "iinc",
        0x85 => "i2l",
        0x86 => "i2f",
        0x87 => "i2d",
        0x88 => "l2i",
        0x89 => "l2f",
        0x8A => "l2d",
        0x8B => "f2i",
        0x8C => "f2l",
        0x8D => "f2d",
        0x8E => "d2i",
        0x8F => "d2l",
        0x90 => "d2f",
        0x91 => "i2b",
        0x92 => "i2c",
        0x93 => "i2s",
        0x94 => "lcmp",
        0x95 => "fcmpl",
        0x96 => "fcmpg",
        0x97 => "dcmpl",
        0x98 => "dcmpg",
        0x99 => "ifeq",
        0x9A => "ifne",
        0x9B => "iflt",
        0x9C => "ifge",
        0x9D => "ifgt",
        0x9E => "ifle",
        0x9F => "if_icmpeq",
        0xA0 => "if_icmpne",
        0xA1 => "if_icmplt",
        0xA2 => "if_icmpge",
        0xA3 => "if_icmpgt",
        0xA4 => "if_icmple",
        0xA5 => "if_acmpeq",
        0xA6 => "if_acmpne",
        0xA7 => "goto",
        0xA8 => "jsr",
        0xA9 => "ret",
        0xAA => "tableswitch",
        0xAB => "lookupswitch",
        0xAC => "ireturn",
        0xAD => "lreturn",
        0xAE => "freturn",
        0xAF => "dreturn",
        0xB0 => "areturn",
        0xB1 => "return",
        0xB2 => "getstatic",
        0xB3 => "putstatic",
        0xB4 => "getfield",
        0xB5 => "putfield",
        0xB6 => "invokevirtual",
        0xB7 => "invokespecial",
        0xB8 => "invokestatic",
        0xB9 => "invokeinterface",
        0xBA => "invokedynamic",
        0xBB => "new",
        0xBC => "newarray",
        0xBD => "anewarray",
        0xBE => "arraylength",
        0xBF => "athrow",
        0xC0 => "checkcast",
        0xC1 => "instanceof",
        0xC2 => "monitorenter",
        0xC3 => "monitorexit",
        0xC4 => "wide",
        0xC5 => "multianewarray",
        0xC6 => "ifnull",
        0xC7 => "ifnonnull",
        0xC8 => "goto_w",
        0xC9 => "jsr_w",
        _ => return None,
    })
}
