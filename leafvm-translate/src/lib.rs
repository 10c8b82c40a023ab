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

//! Drives the conversion of parsed classes into target method bodies.
//! Each method is walked linearly with a symbolic operand stack: constants
//! fold at translation time, everything else is pinned to virtual registers,
//! and the target instructions come out the other side. One constant pool is
//! shared across the whole build; a method that fails is recorded and
//! skipped, while pool exhaustion kills the build outright.

use std::fmt;

use itertools::Itertools;

use leafvm_base::class::{ClassInput, ClassOutput, MethodInput, MethodOutput};
use leafvm_base::code::frame::{StackError, SymStack};
use leafvm_base::code::method::{DescriptorError, MethodDescriptor};
use leafvm_base::code::op::RawOpcode;
use leafvm_base::code::target::{CodeEmitter, EmitError};
use leafvm_base::code::types::Category;
use leafvm_base::id::{InstructionOffset, LocalIndex};
use leafvm_base::pool::{ConstantEntry, ConstantPool, PoolError, RawConstants, MAX_POOL_ENTRIES};

use crate::exec::MethodCx;
use crate::locals::Locals;

mod exec;
mod locals;

/// Logging configuration for the translation of methods.
/// Fields are set to true to enable logging of that part.
#[derive(Debug, Default, Clone)]
pub struct TranslationLogging {
    pub log_method_name: bool,
    pub log_instruction: bool,
    pub log_stack_modifications: bool,
    pub log_local_variable_modifications: bool,
}

/// Build-wide configuration.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Hard cap on the number of entries in the shared constant pool
    pub pool_limit: usize,
    pub logging: TranslationLogging,
}
impl Default for BuildConfig {
    fn default() -> BuildConfig {
        BuildConfig {
            pool_limit: MAX_POOL_ENTRIES,
            logging: TranslationLogging::default(),
        }
    }
}

/// Why a single method failed to translate.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslateError {
    Stack(StackError),
    Pool(PoolError),
    Emit(EmitError),
    Descriptor(DescriptorError),
    /// An operand had the wrong category for the instruction
    CategoryMismatch {
        inst_name: &'static str,
        expected: Category,
        got: Category,
    },
    /// A stack shuffle needed a one-slot value but found a wide one
    ExpectedNarrowSlot {
        inst_name: &'static str,
        got: Category,
    },
    /// An opcode with no translation (`jsr`, `ret`, `invokedynamic`, or a
    /// byte outside the instruction set)
    UnsupportedOpcode {
        opcode: RawOpcode,
        name: Option<&'static str>,
    },
    /// A local variable index past the method's declared local count
    BadLocalIndex {
        inst_name: &'static str,
        index: LocalIndex,
        max: u16,
    },
    /// A read of a local that was never stored to
    UninitializedLocal {
        inst_name: &'static str,
        index: LocalIndex,
    },
    /// A one-slot access to the second half of a wide value
    WideLocalHalf {
        inst_name: &'static str,
        index: LocalIndex,
    },
    LocalCategoryMismatch {
        inst_name: &'static str,
        index: LocalIndex,
        expected: Category,
        got: Category,
    },
    /// The stack was not empty when the method's instructions ran out
    MismatchedExitHeight { found: usize },
}
impl From<StackError> for TranslateError {
    fn from(err: StackError) -> TranslateError {
        TranslateError::Stack(err)
    }
}
impl From<PoolError> for TranslateError {
    fn from(err: PoolError) -> TranslateError {
        TranslateError::Pool(err)
    }
}
impl From<EmitError> for TranslateError {
    fn from(err: EmitError) -> TranslateError {
        TranslateError::Emit(err)
    }
}
impl From<DescriptorError> for TranslateError {
    fn from(err: DescriptorError) -> TranslateError {
        TranslateError::Descriptor(err)
    }
}
impl TranslateError {
    /// Whether this failure poisons the whole build rather than just the
    /// method it occurred in. Pool exhaustion does: the pool is shared, so no
    /// later method would fare any better.
    #[must_use]
    pub fn is_build_fatal(&self) -> bool {
        matches!(self, TranslateError::Pool(PoolError::LimitReached { .. }))
    }
}
impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::Stack(StackError::Underflow { inst_name }) => {
                write!(f, "operand stack underflow in {inst_name}")
            }
            TranslateError::Stack(StackError::Bounds {
                inst_name,
                depth,
                height,
            }) => write!(
                f,
                "{inst_name} reached depth {depth} of a stack of height {height}"
            ),
            TranslateError::Pool(err) => err.fmt(f),
            TranslateError::Emit(EmitError::TooManyRegisters { limit }) => {
                write!(f, "method needs more than {limit} registers")
            }
            TranslateError::Descriptor(err) => write!(f, "malformed descriptor: {err:?}"),
            TranslateError::CategoryMismatch {
                inst_name,
                expected,
                got,
            } => write!(f, "{inst_name} expected a {expected} operand but found {got}"),
            TranslateError::ExpectedNarrowSlot { inst_name, got } => {
                write!(f, "{inst_name} expected a one-slot value but found a {got}")
            }
            TranslateError::UnsupportedOpcode { opcode, name } => {
                if let Some(name) = name {
                    write!(f, "unsupported instruction {name} (0x{opcode:02X})")
                } else {
                    write!(f, "unknown opcode 0x{opcode:02X}")
                }
            }
            TranslateError::BadLocalIndex {
                inst_name,
                index,
                max,
            } => write!(
                f,
                "{inst_name} uses local {index} but the method declares {max}"
            ),
            TranslateError::UninitializedLocal { inst_name, index } => {
                write!(f, "{inst_name} reads local {index} before any store")
            }
            TranslateError::WideLocalHalf { inst_name, index } => write!(
                f,
                "{inst_name} addresses local {index}, the second half of a wide value"
            ),
            TranslateError::LocalCategoryMismatch {
                inst_name,
                index,
                expected,
                got,
            } => write!(
                f,
                "{inst_name} expected local {index} to hold a {expected} but it holds a {got}"
            ),
            TranslateError::MismatchedExitHeight { found } => write!(
                f,
                "operand stack still holds {found} slot(s) at the end of the method"
            ),
        }
    }
}

/// One method that could not be translated. The build continues without it.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodFailure {
    pub class_name: String,
    pub method_name: String,
    /// Offset of the instruction that failed, when the failure is
    /// attributable to one
    pub offset: Option<InstructionOffset>,
    pub error: TranslateError,
}
impl fmt::Display for MethodFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class_name, self.method_name)?;
        if let Some(offset) = self.offset {
            write!(f, " {offset}")?;
        }
        write!(f, ": {}", self.error)
    }
}

/// A failure that aborts the whole build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildError {
    pub class_name: String,
    pub method_name: String,
    pub error: TranslateError,
}
impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "build aborted in {}.{}: {}",
            self.class_name, self.method_name, self.error
        )
    }
}

/// Everything a completed build produces: the translated classes, the frozen
/// pool in index order, and the methods that were skipped.
#[derive(Debug)]
pub struct BuildOutput {
    pub classes: Vec<ClassOutput>,
    pub constants: Vec<ConstantEntry>,
    pub failures: Vec<MethodFailure>,
}

/// Drives a whole build: classes go in one at a time, sharing one constant
/// pool, and translated classes and per-method failures accumulate.
#[derive(Debug)]
pub struct Translator {
    conf: BuildConfig,
    pool: ConstantPool,
    classes: Vec<ClassOutput>,
    failures: Vec<MethodFailure>,
}
impl Translator {
    #[must_use]
    pub fn new(conf: BuildConfig) -> Translator {
        let pool = ConstantPool::with_limit(conf.pool_limit);
        Translator {
            conf,
            pool,
            classes: Vec::new(),
            failures: Vec::new(),
        }
    }

    #[must_use]
    pub fn pool(&self) -> &ConstantPool {
        &self.pool
    }

    #[must_use]
    pub fn failures(&self) -> &[MethodFailure] {
        &self.failures
    }

    /// Translate one class. A method that fails is recorded and skipped; an
    /// error return means the whole build is dead.
    pub fn translate_class(&mut self, class: &ClassInput) -> Result<(), BuildError> {
        let _span = tracing::span!(tracing::Level::TRACE, "class translation").entered();
        tracing::debug!("translating class {}", class.name);

        let mut methods = Vec::with_capacity(class.methods.len());
        for method in &class.methods {
            match translate_method(
                &class.name,
                &class.constants,
                method,
                &mut self.pool,
                &self.conf.logging,
            ) {
                Ok(output) => methods.push(output),
                Err(failure) => {
                    if failure.error.is_build_fatal() {
                        return Err(BuildError {
                            class_name: failure.class_name,
                            method_name: failure.method_name,
                            error: failure.error,
                        });
                    }
                    tracing::warn!("skipping {failure}");
                    self.failures.push(failure);
                }
            }
        }
        self.classes.push(ClassOutput {
            name: class.name.clone(),
            methods,
        });
        Ok(())
    }

    /// A one-line-per-method report of everything that was skipped.
    #[must_use]
    pub fn failure_report(&self) -> String {
        self.failures.iter().map(ToString::to_string).join("\n")
    }

    /// Finish the build, freezing the pool into its final order.
    #[must_use]
    pub fn finish(self) -> BuildOutput {
        BuildOutput {
            classes: self.classes,
            constants: self.pool.into_entries(),
            failures: self.failures,
        }
    }
}

/// Translate one method body against its class's raw constant table,
/// interning into the shared pool.
pub fn translate_method(
    class_name: &str,
    constants: &RawConstants,
    method: &MethodInput,
    pool: &mut ConstantPool,
    conf: &TranslationLogging,
) -> Result<MethodOutput, MethodFailure> {
    let _span = tracing::span!(tracing::Level::TRACE, "method translation").entered();
    if conf.log_method_name {
        tracing::info!(
            "! Translating {}::{}{}",
            class_name,
            method.name,
            method.descriptor
        );
    }

    let fail = |offset: Option<InstructionOffset>, error: TranslateError| MethodFailure {
        class_name: class_name.to_owned(),
        method_name: method.name.clone(),
        offset,
        error,
    };

    let descriptor =
        MethodDescriptor::parse(&method.descriptor).map_err(|err| fail(None, err.into()))?;

    let mut emitter = CodeEmitter::new();
    let locals = Locals::seed(&mut emitter, &descriptor, method.is_static, method.max_locals)
        .map_err(|err| fail(None, err))?;

    let mut cx = MethodCx {
        constants,
        pool,
        conf,
        frame: SymStack::new(),
        locals,
        emitter,
    };

    for (offset, inst) in &method.instructions {
        cx.emitter.set_offset(*offset);
        if conf.log_instruction {
            tracing::info!("# ({}) {}", offset.0, inst.name());
        }
        let height_before = cx.frame.height();
        exec::apply_inst(&mut cx, inst).map_err(|err| fail(Some(*offset), err))?;
        if let Some(delta) = inst.static_stack_delta() {
            check_stack_delta(inst.name(), height_before, cx.frame.height(), delta);
        }
    }

    if !cx.frame.is_empty() {
        return Err(fail(
            None,
            TranslateError::MismatchedExitHeight {
                found: cx.frame.height(),
            },
        ));
    }

    let (instructions, register_count) = cx.emitter.finish();
    Ok(MethodOutput {
        name: method.name.clone(),
        descriptor: method.descriptor.clone(),
        register_count,
        instructions,
    })
}

// Heights are tiny, the i64 arithmetic is just to keep the subtraction safe
#[allow(clippy::cast_possible_wrap)]
fn check_stack_delta(name: &'static str, before: usize, after: usize, delta: i32) {
    debug_assert_eq!(
        after as i64,
        before as i64 + i64::from(delta),
        "stack effect of {name} diverged from its table entry"
    );
}

#[cfg(test)]
mod tests {
    use leafvm_base::class::{ClassInput, MethodInput};
    use leafvm_base::code::op::{BinaryOp, Inst, ShuffleOp};
    use leafvm_base::code::target::{Reg, TargetInst};
    use leafvm_base::code::types::Category;
    use leafvm_base::id::InstructionOffset;
    use leafvm_base::pool::{ConstantEntry, ConstantPool, RawConstant, RawConstants};

    use super::{
        translate_method, BuildConfig, TranslateError, TranslationLogging, Translator,
    };

    #[allow(clippy::cast_possible_truncation)]
    fn static_method(name: &str, descriptor: &str, max_locals: u16, insts: Vec<Inst>) -> MethodInput {
        MethodInput {
            name: name.to_owned(),
            descriptor: descriptor.to_owned(),
            is_static: true,
            max_locals,
            instructions: insts
                .into_iter()
                .enumerate()
                .map(|(i, inst)| (InstructionOffset(i as u32), inst))
                .collect(),
        }
    }

    fn translate(
        method: &MethodInput,
        constants: &RawConstants,
        pool: &mut ConstantPool,
    ) -> Result<leafvm_base::class::MethodOutput, super::MethodFailure> {
        translate_method("Test", constants, method, pool, &TranslationLogging::default())
    }

    #[test]
    fn test_long_shift_amount_uses_six_bits() {
        // -1 >>> 70: only the low six bits of the amount count, so this is a
        // zero-fill shift by 6
        let method = static_method(
            "shift",
            "()J",
            0,
            vec![
                Inst::ConstLong(-1),
                Inst::ConstInt(70),
                Inst::Binary {
                    op: BinaryOp::Ushr,
                    cat: Category::Long,
                },
                Inst::Return {
                    cat: Some(Category::Long),
                },
            ],
        );
        let mut pool = ConstantPool::new();
        let out = translate(&method, &RawConstants::default(), &mut pool).unwrap();

        let expected = (u64::MAX >> 6) as i64;
        assert_eq!(pool.into_entries(), vec![ConstantEntry::Long(expected)]);
        // The whole body folded to one constant load plus the return
        assert_eq!(out.instructions.len(), 2);
        assert!(matches!(
            out.instructions[0].1,
            TargetInst::Const {
                cat: Category::Long,
                ..
            }
        ));
        assert!(matches!(
            out.instructions[1].1,
            TargetInst::Return {
                value: Some((Category::Long, _)),
            }
        ));
    }

    #[test]
    fn test_int_shift_amount_uses_five_bits() {
        let method = static_method(
            "shift",
            "()I",
            0,
            vec![
                Inst::ConstInt(1),
                Inst::ConstInt(33),
                Inst::Binary {
                    op: BinaryOp::Shl,
                    cat: Category::Int,
                },
                Inst::Return {
                    cat: Some(Category::Int),
                },
            ],
        );
        let mut pool = ConstantPool::new();
        let out = translate(&method, &RawConstants::default(), &mut pool).unwrap();

        // 1 << (33 & 0x1F) == 2, small enough to skip the pool
        assert_eq!(pool.len(), 0);
        assert!(matches!(
            out.instructions[0].1,
            TargetInst::ConstImm { value: 2, .. }
        ));
    }

    #[test]
    fn test_large_int_constant_goes_to_pool() {
        let method = static_method(
            "big",
            "()I",
            0,
            vec![
                Inst::ConstInt(100_000),
                Inst::Return {
                    cat: Some(Category::Int),
                },
            ],
        );
        let mut pool = ConstantPool::new();
        let out = translate(&method, &RawConstants::default(), &mut pool).unwrap();

        assert_eq!(pool.into_entries(), vec![ConstantEntry::Integer(100_000)]);
        assert!(matches!(
            out.instructions[0].1,
            TargetInst::Const {
                cat: Category::Int,
                ..
            }
        ));
    }

    #[test]
    fn test_parameters_seed_locals() {
        let method = static_method(
            "add",
            "(II)I",
            2,
            vec![
                Inst::LocalLoad {
                    cat: Category::Int,
                    index: 0,
                },
                Inst::LocalLoad {
                    cat: Category::Int,
                    index: 1,
                },
                Inst::Binary {
                    op: BinaryOp::Add,
                    cat: Category::Int,
                },
                Inst::Return {
                    cat: Some(Category::Int),
                },
            ],
        );
        let mut pool = ConstantPool::new();
        let out = translate(&method, &RawConstants::default(), &mut pool).unwrap();

        // r0/r1 are the parameters, r2 the sum
        assert_eq!(out.register_count, 3);
        assert_eq!(
            out.instructions[0].1,
            TargetInst::Binary {
                op: BinaryOp::Add,
                cat: Category::Int,
                dst: Reg::new(2),
                lhs: Reg::new(0),
                rhs: Reg::new(1),
            }
        );
        assert_eq!(
            out.instructions[1].1,
            TargetInst::Return {
                value: Some((Category::Int, Reg::new(2))),
            }
        );
    }

    #[test]
    fn test_wide_parameter_takes_two_local_slots() {
        let method = static_method(
            "pass",
            "(JI)J",
            3,
            vec![
                Inst::LocalLoad {
                    cat: Category::Long,
                    index: 0,
                },
                Inst::Return {
                    cat: Some(Category::Long),
                },
            ],
        );
        let mut pool = ConstantPool::new();
        let out = translate(&method, &RawConstants::default(), &mut pool).unwrap();
        // One register per parameter, no temporaries
        assert_eq!(out.register_count, 2);
    }

    #[test]
    fn test_wide_parameter_half_is_not_addressable() {
        let method = static_method(
            "pass",
            "(JI)V",
            3,
            vec![
                Inst::LocalLoad {
                    cat: Category::Int,
                    index: 1,
                },
                Inst::Return { cat: None },
            ],
        );
        let mut pool = ConstantPool::new();
        let failure = translate(&method, &RawConstants::default(), &mut pool).unwrap_err();
        assert_eq!(
            failure.error,
            TranslateError::WideLocalHalf {
                inst_name: "iload",
                index: 1,
            }
        );
        assert_eq!(failure.offset, Some(InstructionOffset(0)));
    }

    #[test]
    fn test_increment_shelters_stack_copies() {
        // iinc of a local whose old value is still on the stack must not
        // clobber that stack copy
        let method = static_method(
            "inc",
            "()I",
            1,
            vec![
                Inst::ConstInt(1),
                Inst::LocalStore {
                    cat: Category::Int,
                    index: 0,
                },
                Inst::LocalLoad {
                    cat: Category::Int,
                    index: 0,
                },
                Inst::IntIncrement {
                    index: 0,
                    amount: 5,
                },
                Inst::Return {
                    cat: Some(Category::Int),
                },
            ],
        );
        let mut pool = ConstantPool::new();
        let out = translate(&method, &RawConstants::default(), &mut pool).unwrap();

        let insts: Vec<_> = out.instructions.iter().map(|(_, inst)| inst.clone()).collect();
        assert_eq!(
            insts,
            vec![
                // store 1 into the local's register
                TargetInst::ConstImm {
                    dst: Reg::new(0),
                    value: 1,
                },
                // the increment moves the loaded copy aside first
                TargetInst::Move {
                    cat: Category::Int,
                    dst: Reg::new(1),
                    src: Reg::new(0),
                },
                TargetInst::ConstImm {
                    dst: Reg::new(2),
                    value: 5,
                },
                TargetInst::Binary {
                    op: BinaryOp::Add,
                    cat: Category::Int,
                    dst: Reg::new(0),
                    lhs: Reg::new(0),
                    rhs: Reg::new(2),
                },
                // the return sees the pre-increment value
                TargetInst::Return {
                    value: Some((Category::Int, Reg::new(1))),
                },
            ]
        );
    }

    #[test]
    fn test_logging_flags_trace_a_translation() {
        // Pipe the per-instruction and stack logs through a real subscriber
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::TRACE)
            .without_time()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("failed to set global default tracing subscriber");

        let conf = TranslationLogging {
            log_method_name: true,
            log_instruction: true,
            log_stack_modifications: true,
            log_local_variable_modifications: true,
        };
        let method = static_method(
            "noisy",
            "()I",
            1,
            vec![
                Inst::ConstInt(1),
                Inst::LocalStore {
                    cat: Category::Int,
                    index: 0,
                },
                Inst::LocalLoad {
                    cat: Category::Int,
                    index: 0,
                },
                Inst::Return {
                    cat: Some(Category::Int),
                },
            ],
        );
        let mut pool = ConstantPool::new();
        let out = translate_method("Test", &RawConstants::default(), &method, &mut pool, &conf)
            .unwrap();
        // Logging must not change what comes out
        assert_eq!(out.instructions.len(), 2);
        assert_eq!(out.register_count, 1);
    }

    #[test]
    fn test_leftover_stack_is_an_error() {
        let method = static_method(
            "x",
            "()V",
            0,
            vec![Inst::ConstInt(1), Inst::Return { cat: None }],
        );
        let mut pool = ConstantPool::new();
        let failure = translate(&method, &RawConstants::default(), &mut pool).unwrap_err();
        assert_eq!(
            failure.error,
            TranslateError::MismatchedExitHeight { found: 1 }
        );
        assert_eq!(failure.offset, None);
    }

    #[test]
    fn test_unsupported_opcode_fails_the_method() {
        let method = static_method(
            "x",
            "()V",
            0,
            vec![
                Inst::Unsupported { opcode: 0xA8 },
                Inst::Return { cat: None },
            ],
        );
        let mut pool = ConstantPool::new();
        let failure = translate(&method, &RawConstants::default(), &mut pool).unwrap_err();
        assert_eq!(
            failure.error,
            TranslateError::UnsupportedOpcode {
                opcode: 0xA8,
                name: Some("jsr"),
            }
        );
    }

    #[test]
    fn test_invoke_pops_arguments_and_pushes_return() {
        let constants = RawConstants::new(vec![
            // 1
            RawConstant::Utf8(b"java/lang/String".to_vec()),
            // 2
            RawConstant::Class { name: 1 },
            // 3
            RawConstant::Utf8(b"length".to_vec()),
            // 4
            RawConstant::Utf8(b"()I".to_vec()),
            // 5
            RawConstant::NameAndType {
                name: 3,
                descriptor: 4,
            },
            // 6
            RawConstant::MethodRef {
                class: 2,
                name_and_type: 5,
            },
        ]);
        let method = MethodInput {
            name: "call".to_owned(),
            descriptor: "(Ljava/lang/String;)I".to_owned(),
            is_static: true,
            max_locals: 1,
            instructions: vec![
                (
                    InstructionOffset(0),
                    Inst::LocalLoad {
                        cat: Category::Ref,
                        index: 0,
                    },
                ),
                (
                    InstructionOffset(1),
                    Inst::Invoke {
                        kind: leafvm_base::code::target::InvokeKind::Virtual,
                        index: 6,
                    },
                ),
                (
                    InstructionOffset(4),
                    Inst::Return {
                        cat: Some(Category::Int),
                    },
                ),
            ],
        };
        let mut pool = ConstantPool::new();
        let out = translate(&method, &constants, &mut pool).unwrap();

        assert_eq!(
            pool.into_entries(),
            vec![ConstantEntry::MethodRef {
                class: "java/lang/String".to_owned(),
                name: "length".to_owned(),
                descriptor: "()I".to_owned(),
            }]
        );
        assert!(matches!(
            &out.instructions[0].1,
            TargetInst::Invoke {
                kind: leafvm_base::code::target::InvokeKind::Virtual,
                args,
                ret: Some((Category::Int, _)),
                ..
            } if args.len() == 1 && args[0] == Reg::new(0)
        ));
    }

    #[test]
    fn test_field_access_category_comes_from_descriptor() {
        let constants = RawConstants::new(vec![
            // 1
            RawConstant::Utf8(b"C".to_vec()),
            // 2
            RawConstant::Class { name: 1 },
            // 3
            RawConstant::Utf8(b"f".to_vec()),
            // 4
            RawConstant::Utf8(b"J".to_vec()),
            // 5
            RawConstant::NameAndType {
                name: 3,
                descriptor: 4,
            },
            // 6
            RawConstant::FieldRef {
                class: 2,
                name_and_type: 5,
            },
        ]);
        let method = static_method(
            "get",
            "()J",
            0,
            vec![
                Inst::GetStatic { index: 6 },
                Inst::Return {
                    cat: Some(Category::Long),
                },
            ],
        );
        let mut pool = ConstantPool::new();
        let out = translate(&method, &constants, &mut pool).unwrap();

        assert!(matches!(
            out.instructions[0].1,
            TargetInst::GetStatic {
                cat: Category::Long,
                ..
            }
        ));
        assert_eq!(
            pool.into_entries(),
            vec![ConstantEntry::FieldRef {
                class: "C".to_owned(),
                name: "f".to_owned(),
                descriptor: "J".to_owned(),
            }]
        );
    }

    fn hello_class(class_name: &str) -> ClassInput {
        ClassInput {
            name: class_name.to_owned(),
            constants: RawConstants::new(vec![
                RawConstant::Utf8(b"Hello".to_vec()),
                RawConstant::String { utf8: 1 },
            ]),
            methods: vec![static_method(
                "greet",
                "()V",
                0,
                vec![
                    Inst::LoadConstant { index: 2 },
                    Inst::Shuffle(ShuffleOp::Pop),
                    Inst::Return { cat: None },
                ],
            )],
        }
    }

    #[test]
    fn test_classes_share_one_pool() {
        let mut translator = Translator::new(BuildConfig::default());
        translator.translate_class(&hello_class("A")).unwrap();
        translator.translate_class(&hello_class("B")).unwrap();
        let out = translator.finish();

        assert!(out.failures.is_empty());
        assert_eq!(out.classes.len(), 2);
        // One entry, not two
        assert_eq!(
            out.constants,
            vec![ConstantEntry::String("Hello".to_owned())]
        );
        let index_of = |class: usize| match &out.classes[class].methods[0].instructions[0].1 {
            TargetInst::Const { index, .. } => *index,
            other => panic!("unexpected instruction {other:?}"),
        };
        assert_eq!(index_of(0), index_of(1));
    }

    #[test]
    fn test_pool_exhaustion_aborts_the_build() {
        let conf = BuildConfig {
            pool_limit: 1,
            logging: TranslationLogging::default(),
        };
        let mut translator = Translator::new(conf);
        let class = ClassInput {
            name: "A".to_owned(),
            constants: RawConstants::new(vec![
                RawConstant::Utf8(b"one".to_vec()),
                RawConstant::String { utf8: 1 },
                RawConstant::Utf8(b"two".to_vec()),
                RawConstant::String { utf8: 3 },
            ]),
            methods: vec![static_method(
                "fill",
                "()V",
                0,
                vec![
                    Inst::LoadConstant { index: 2 },
                    Inst::Shuffle(ShuffleOp::Pop),
                    Inst::LoadConstant { index: 4 },
                    Inst::Shuffle(ShuffleOp::Pop),
                    Inst::Return { cat: None },
                ],
            )],
        };

        let err = translator.translate_class(&class).unwrap_err();
        assert!(err.error.is_build_fatal());
        assert_eq!(err.class_name, "A");
        assert_eq!(err.method_name, "fill");
    }

    #[test]
    fn test_bad_method_is_skipped_and_reported() {
        let mut translator = Translator::new(BuildConfig::default());
        let class = ClassInput {
            name: "A".to_owned(),
            constants: RawConstants::default(),
            methods: vec![
                static_method(
                    "bad",
                    "()V",
                    0,
                    vec![
                        // Pops an empty stack
                        Inst::Shuffle(ShuffleOp::Pop),
                        Inst::Return { cat: None },
                    ],
                ),
                static_method(
                    "good",
                    "()I",
                    0,
                    vec![
                        Inst::ConstInt(7),
                        Inst::Return {
                            cat: Some(Category::Int),
                        },
                    ],
                ),
            ],
        };
        translator.translate_class(&class).unwrap();

        assert_eq!(translator.failures().len(), 1);
        let report = translator.failure_report();
        assert!(report.contains("A.bad"));
        assert!(report.contains("pop"));

        let out = translator.finish();
        assert_eq!(out.classes[0].methods.len(), 1);
        assert_eq!(out.classes[0].methods[0].name, "good");
    }
}
