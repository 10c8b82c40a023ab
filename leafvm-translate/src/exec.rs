//! Per-instruction translation.
//! One handler application per source instruction: it mutates the symbolic
//! stack and locals and emits the target instructions for the operation.
//! Arithmetic on slots whose operands are all translation-time constants
//! folds here instead of emitting anything, with the exact numeric semantics
//! of the source format (wrapping arithmetic, masked shift amounts,
//! saturating float-to-int conversion).

use smallvec::SmallVec;

use leafvm_base::code::frame::{Slot, SymStack, Value};
use leafvm_base::code::method::{DescriptorType, MethodDescriptor};
use leafvm_base::code::op::{opcode_name, BinaryOp, CmpKind, ConvKind, Inst, ShuffleOp};
use leafvm_base::code::target::{CodeEmitter, InvokeKind, Reg, TargetInst};
use leafvm_base::code::types::Category;
use leafvm_base::id::{LocalIndex, PoolIndex, RawPoolIndex};
use leafvm_base::pool::{ConstantEntry, ConstantPool, PoolError, RawConstants};

use crate::locals::Locals;
use crate::{TranslateError, TranslationLogging};

/// Everything one method's translation mutates.
pub(crate) struct MethodCx<'a> {
    pub(crate) constants: &'a RawConstants,
    pub(crate) pool: &'a mut ConstantPool,
    pub(crate) conf: &'a TranslationLogging,
    pub(crate) frame: SymStack,
    pub(crate) locals: Locals,
    pub(crate) emitter: CodeEmitter,
}
impl MethodCx<'_> {
    fn push(&mut self, slot: Slot) {
        if self.conf.log_stack_modifications {
            tracing::info!("\t\tPUSH {:?}", slot);
        }
        self.frame.push(slot);
    }

    fn pop(&mut self, inst_name: &'static str) -> Result<Slot, TranslateError> {
        let slot = self.frame.pop(inst_name)?;
        if self.conf.log_stack_modifications {
            tracing::info!("\t\tPOP {:?}", slot);
        }
        Ok(slot)
    }

    fn pop_cat(
        &mut self,
        inst_name: &'static str,
        expected: Category,
    ) -> Result<Slot, TranslateError> {
        let slot = self.pop(inst_name)?;
        if slot.cat.matches(expected) {
            Ok(slot)
        } else {
            Err(TranslateError::CategoryMismatch {
                inst_name,
                expected,
                got: slot.cat,
            })
        }
    }

    fn materialize(&mut self, slot: Slot) -> Result<Reg, TranslateError> {
        materialize(&mut self.emitter, &mut *self.pool, slot)
    }
}

/// Make sure a slot's value is in a register, emitting the load if it was a
/// folded constant.
fn materialize(
    emitter: &mut CodeEmitter,
    pool: &mut ConstantPool,
    slot: Slot,
) -> Result<Reg, TranslateError> {
    if let Value::Reg(reg) = slot.value {
        Ok(reg)
    } else {
        let dst = emitter.alloc_reg()?;
        materialize_into(emitter, pool, dst, slot)?;
        Ok(dst)
    }
}

/// Emit whatever puts a slot's value into `dst`. Integer constants that fit
/// an immediate skip the pool.
fn materialize_into(
    emitter: &mut CodeEmitter,
    pool: &mut ConstantPool,
    dst: Reg,
    slot: Slot,
) -> Result<(), TranslateError> {
    match slot.value {
        Value::Reg(src) => {
            if src != dst {
                emitter.emit(TargetInst::Move {
                    cat: slot.cat,
                    dst,
                    src,
                });
            }
        }
        Value::Int(v) => {
            if let Ok(value) = i16::try_from(v) {
                emitter.emit(TargetInst::ConstImm { dst, value });
            } else {
                let index = pool.intern(ConstantEntry::Integer(v))?;
                emitter.emit(TargetInst::Const {
                    dst,
                    cat: Category::Int,
                    index,
                });
            }
        }
        Value::Long(v) => {
            let index = pool.intern(ConstantEntry::Long(v))?;
            emitter.emit(TargetInst::Const {
                dst,
                cat: Category::Long,
                index,
            });
        }
        Value::Float(v) => {
            let index = pool.intern(ConstantEntry::Float(v.to_bits()))?;
            emitter.emit(TargetInst::Const {
                dst,
                cat: Category::Float,
                index,
            });
        }
        Value::Double(v) => {
            let index = pool.intern(ConstantEntry::Double(v.to_bits()))?;
            emitter.emit(TargetInst::Const {
                dst,
                cat: Category::Double,
                index,
            });
        }
        Value::Null => emitter.emit(TargetInst::ConstNull { dst }),
    }
    Ok(())
}

/// Materialize every folded constant still on the stack. Done before any
/// transfer of control so that the stack's register state does not depend on
/// which path reached the join.
fn flush_frame(cx: &mut MethodCx<'_>) -> Result<(), TranslateError> {
    let MethodCx {
        frame,
        emitter,
        pool,
        ..
    } = cx;
    for slot in frame.iter_mut() {
        if slot.value.is_const() {
            let reg = materialize(emitter, &mut **pool, *slot)?;
            slot.value = Value::Reg(reg);
        }
    }
    Ok(())
}

/// A local's backing register is about to be overwritten; if the symbolic
/// stack still refers to it, move the old value aside first.
fn shelter_reg(cx: &mut MethodCx<'_>, reg: Reg) -> Result<(), TranslateError> {
    let MethodCx { frame, emitter, .. } = cx;
    let mut moved = None;
    for slot in frame.iter_mut() {
        if slot.value == Value::Reg(reg) {
            let dst = if let Some(dst) = moved {
                dst
            } else {
                let dst = emitter.alloc_reg()?;
                emitter.emit(TargetInst::Move {
                    cat: slot.cat,
                    dst,
                    src: reg,
                });
                moved = Some(dst);
                dst
            };
            slot.value = Value::Reg(dst);
        }
    }
    Ok(())
}

#[allow(clippy::too_many_lines)]
pub(crate) fn apply_inst(cx: &mut MethodCx<'_>, inst: &Inst) -> Result<(), TranslateError> {
    let name = inst.name();
    match inst {
        Inst::Nop => {}
        Inst::ConstNull => cx.push(Slot::null()),
        Inst::ConstInt(v) => cx.push(Slot::int(*v)),
        Inst::ConstLong(v) => cx.push(Slot::long(*v)),
        Inst::ConstFloat(v) => cx.push(Slot::float(*v)),
        Inst::ConstDouble(v) => cx.push(Slot::double(*v)),
        Inst::LoadConstant { index } => load_constant(cx, *index, false)?,
        Inst::LoadConstantWide { index } => load_constant(cx, *index, true)?,
        Inst::LocalLoad { cat, index } => {
            let (cat, reg) = cx.locals.load(name, *index, *cat)?;
            if cx.conf.log_local_variable_modifications {
                tracing::info!("\t\tLOAD local {} -> r{}", index, reg.get());
            }
            cx.push(Slot::reg(cat, reg));
        }
        Inst::LocalStore { cat, index } => local_store(cx, name, *cat, *index)?,
        Inst::IntIncrement { index, amount } => int_increment(cx, name, *index, *amount)?,
        Inst::Shuffle(op) => shuffle(cx, name, *op)?,
        Inst::Binary { op, cat } => binary(cx, name, *op, *cat)?,
        Inst::Neg { cat } => neg(cx, name, *cat)?,
        Inst::Convert(kind) => convert(cx, name, *kind)?,
        Inst::Compare(kind) => compare(cx, name, *kind)?,
        Inst::BranchIntZero { op, target } => {
            let src = cx.pop_cat(name, Category::Int)?;
            let src = cx.materialize(src)?;
            flush_frame(cx)?;
            cx.emitter.emit(TargetInst::JumpIntZero {
                op: *op,
                src,
                target: *target,
            });
        }
        Inst::BranchIntCmp { op, target } => {
            let rhs = cx.pop_cat(name, Category::Int)?;
            let lhs = cx.pop_cat(name, Category::Int)?;
            let lhs = cx.materialize(lhs)?;
            let rhs = cx.materialize(rhs)?;
            flush_frame(cx)?;
            cx.emitter.emit(TargetInst::JumpIntCmp {
                op: *op,
                lhs,
                rhs,
                target: *target,
            });
        }
        Inst::BranchRefCmp { eq, target } => {
            let rhs = cx.pop_cat(name, Category::Ref)?;
            let lhs = cx.pop_cat(name, Category::Ref)?;
            let lhs = cx.materialize(lhs)?;
            let rhs = cx.materialize(rhs)?;
            flush_frame(cx)?;
            cx.emitter.emit(TargetInst::JumpRefCmp {
                eq: *eq,
                lhs,
                rhs,
                target: *target,
            });
        }
        Inst::BranchRefNull { is_null, target } => {
            let src = cx.pop_cat(name, Category::Ref)?;
            let src = cx.materialize(src)?;
            flush_frame(cx)?;
            cx.emitter.emit(TargetInst::JumpRefNull {
                is_null: *is_null,
                src,
                target: *target,
            });
        }
        Inst::Goto { target } => {
            flush_frame(cx)?;
            cx.emitter.emit(TargetInst::Jump { target: *target });
        }
        Inst::TableSwitch {
            default,
            low,
            offsets,
        } => {
            let key = cx.pop_cat(name, Category::Int)?;
            let key = cx.materialize(key)?;
            flush_frame(cx)?;
            let mut cases = Vec::with_capacity(offsets.len());
            let mut key_value = *low;
            for target in offsets {
                cases.push((key_value, *target));
                key_value = key_value.wrapping_add(1);
            }
            cx.emitter.emit(TargetInst::Switch {
                key,
                default: *default,
                cases,
            });
        }
        Inst::LookupSwitch { default, pairs } => {
            let key = cx.pop_cat(name, Category::Int)?;
            let key = cx.materialize(key)?;
            flush_frame(cx)?;
            cx.emitter.emit(TargetInst::Switch {
                key,
                default: *default,
                cases: pairs.clone(),
            });
        }
        Inst::Return { cat } => {
            let value = if let Some(cat) = cat {
                let slot = cx.pop_cat(name, *cat)?;
                let reg = cx.materialize(slot)?;
                Some((slot.cat, reg))
            } else {
                None
            };
            cx.emitter.emit(TargetInst::Return { value });
        }
        Inst::GetStatic { index } => {
            let (field, cat) = field_ref(cx, *index)?;
            let dst = cx.emitter.alloc_reg()?;
            cx.emitter.emit(TargetInst::GetStatic { cat, dst, field });
            cx.push(Slot::reg(cat, dst));
        }
        Inst::PutStatic { index } => {
            let (field, cat) = field_ref(cx, *index)?;
            let value = cx.pop_cat(name, cat)?;
            let value = cx.materialize(value)?;
            cx.emitter.emit(TargetInst::PutStatic { cat, value, field });
        }
        Inst::GetField { index } => {
            let (field, cat) = field_ref(cx, *index)?;
            let object = cx.pop_cat(name, Category::Ref)?;
            let object = cx.materialize(object)?;
            let dst = cx.emitter.alloc_reg()?;
            cx.emitter.emit(TargetInst::GetField {
                cat,
                dst,
                object,
                field,
            });
            cx.push(Slot::reg(cat, dst));
        }
        Inst::PutField { index } => {
            let (field, cat) = field_ref(cx, *index)?;
            let value = cx.pop_cat(name, cat)?;
            let object = cx.pop_cat(name, Category::Ref)?;
            let object = cx.materialize(object)?;
            let value = cx.materialize(value)?;
            cx.emitter.emit(TargetInst::PutField {
                cat,
                object,
                value,
                field,
            });
        }
        Inst::Invoke { kind, index } => invoke(cx, name, *kind, *index)?,
        Inst::New { index } => {
            let class = class_ref(cx, *index)?;
            let dst = cx.emitter.alloc_reg()?;
            cx.emitter.emit(TargetInst::NewInstance { dst, class });
            cx.push(Slot::reg(Category::Ref, dst));
        }
        Inst::NewArray { elem } => {
            let length = cx.pop_cat(name, Category::Int)?;
            let length = cx.materialize(length)?;
            let dst = cx.emitter.alloc_reg()?;
            cx.emitter.emit(TargetInst::NewArray {
                dst,
                elem: *elem,
                length,
            });
            cx.push(Slot::reg(Category::Ref, dst));
        }
        Inst::NewRefArray { index } => {
            let class = class_ref(cx, *index)?;
            let length = cx.pop_cat(name, Category::Int)?;
            let length = cx.materialize(length)?;
            let dst = cx.emitter.alloc_reg()?;
            cx.emitter.emit(TargetInst::NewRefArray { dst, class, length });
            cx.push(Slot::reg(Category::Ref, dst));
        }
        Inst::NewMultiArray { index, dimensions } => {
            let class = class_ref(cx, *index)?;
            let mut lengths = Vec::with_capacity(usize::from(*dimensions));
            for _ in 0..*dimensions {
                let length = cx.pop_cat(name, Category::Int)?;
                lengths.push(cx.materialize(length)?);
            }
            // Popped innermost first; the target wants outermost first
            lengths.reverse();
            let dst = cx.emitter.alloc_reg()?;
            cx.emitter.emit(TargetInst::NewMultiArray {
                dst,
                class,
                lengths,
            });
            cx.push(Slot::reg(Category::Ref, dst));
        }
        Inst::ArrayLoad { elem } => {
            let index_slot = cx.pop_cat(name, Category::Int)?;
            let array = cx.pop_cat(name, Category::Ref)?;
            let array = cx.materialize(array)?;
            let index = cx.materialize(index_slot)?;
            let dst = cx.emitter.alloc_reg()?;
            cx.emitter.emit(TargetInst::ArrayLoad {
                elem: *elem,
                dst,
                array,
                index,
            });
            cx.push(Slot::reg(elem.category(), dst));
        }
        Inst::ArrayStore { elem } => {
            let value = cx.pop_cat(name, elem.category())?;
            let index_slot = cx.pop_cat(name, Category::Int)?;
            let array = cx.pop_cat(name, Category::Ref)?;
            let array = cx.materialize(array)?;
            let index = cx.materialize(index_slot)?;
            let value = cx.materialize(value)?;
            cx.emitter.emit(TargetInst::ArrayStore {
                elem: *elem,
                array,
                index,
                value,
            });
        }
        Inst::ArrayLength => {
            let array = cx.pop_cat(name, Category::Ref)?;
            let array = cx.materialize(array)?;
            let dst = cx.emitter.alloc_reg()?;
            cx.emitter.emit(TargetInst::ArrayLength { dst, array });
            cx.push(Slot::reg(Category::Int, dst));
        }
        Inst::Throw => {
            let exception = cx.pop_cat(name, Category::Ref)?;
            let exception = cx.materialize(exception)?;
            cx.emitter.emit(TargetInst::Throw { exception });
        }
        Inst::CheckCast { index } => {
            let class = class_ref(cx, *index)?;
            let object = cx.pop_cat(name, Category::Ref)?;
            let object = cx.materialize(object)?;
            cx.emitter.emit(TargetInst::CheckCast { object, class });
            cx.push(Slot::reg(Category::Ref, object));
        }
        Inst::InstanceOf { index } => {
            let class = class_ref(cx, *index)?;
            let object = cx.pop_cat(name, Category::Ref)?;
            let object = cx.materialize(object)?;
            let dst = cx.emitter.alloc_reg()?;
            cx.emitter.emit(TargetInst::InstanceOf { dst, object, class });
            cx.push(Slot::reg(Category::Int, dst));
        }
        Inst::MonitorEnter => {
            let object = cx.pop_cat(name, Category::Ref)?;
            let object = cx.materialize(object)?;
            cx.emitter.emit(TargetInst::MonitorEnter { object });
        }
        Inst::MonitorExit => {
            let object = cx.pop_cat(name, Category::Ref)?;
            let object = cx.materialize(object)?;
            cx.emitter.emit(TargetInst::MonitorExit { object });
        }
        Inst::Unsupported { opcode } => {
            return Err(TranslateError::UnsupportedOpcode {
                opcode: *opcode,
                name: opcode_name(*opcode),
            })
        }
    }
    Ok(())
}

fn load_constant(
    cx: &mut MethodCx<'_>,
    index: RawPoolIndex,
    wide: bool,
) -> Result<(), TranslateError> {
    let entry = cx.constants.resolve(index)?;
    match (wide, entry) {
        (false, ConstantEntry::Integer(v)) => cx.push(Slot::int(v)),
        (false, ConstantEntry::Float(bits)) => cx.push(Slot::float(f32::from_bits(bits))),
        (true, ConstantEntry::Long(v)) => cx.push(Slot::long(v)),
        (true, ConstantEntry::Double(bits)) => cx.push(Slot::double(f64::from_bits(bits))),
        (false, entry @ (ConstantEntry::String(_) | ConstantEntry::Class(_))) => {
            let pooled = cx.pool.intern(entry)?;
            let dst = cx.emitter.alloc_reg()?;
            cx.emitter.emit(TargetInst::Const {
                dst,
                cat: Category::Ref,
                index: pooled,
            });
            cx.push(Slot::reg(Category::Ref, dst));
        }
        _ => return Err(TranslateError::Pool(PoolError::NotLoadable { index })),
    }
    Ok(())
}

fn local_store(
    cx: &mut MethodCx<'_>,
    name: &'static str,
    cat: Category,
    index: LocalIndex,
) -> Result<(), TranslateError> {
    let slot = cx.pop_cat(name, cat)?;
    // Reuse the local's register when the category agrees, so repeated stores
    // to one local do not burn a register each
    let dst = if let Some((existing, reg)) = cx.locals.filled(index) {
        if existing == slot.cat {
            shelter_reg(cx, reg)?;
            reg
        } else {
            cx.emitter.alloc_reg()?
        }
    } else {
        cx.emitter.alloc_reg()?
    };
    materialize_into(&mut cx.emitter, &mut *cx.pool, dst, slot)?;
    cx.locals.store(name, index, slot.cat, dst)?;
    if cx.conf.log_local_variable_modifications {
        tracing::info!("\t\tSTORE local {} <- r{}", index, dst.get());
    }
    Ok(())
}

fn int_increment(
    cx: &mut MethodCx<'_>,
    name: &'static str,
    index: LocalIndex,
    amount: i16,
) -> Result<(), TranslateError> {
    let (_, reg) = cx.locals.load(name, index, Category::Int)?;
    shelter_reg(cx, reg)?;
    let rhs = cx.emitter.alloc_reg()?;
    cx.emitter.emit(TargetInst::ConstImm {
        dst: rhs,
        value: amount,
    });
    cx.emitter.emit(TargetInst::Binary {
        op: BinaryOp::Add,
        cat: Category::Int,
        dst: reg,
        lhs: reg,
        rhs,
    });
    Ok(())
}

/// Reject a wide slot where the shuffle family needs a one-slot value.
fn narrow(inst_name: &'static str, slot: Slot) -> Result<Slot, TranslateError> {
    if slot.is_wide() {
        Err(TranslateError::ExpectedNarrowSlot {
            inst_name,
            got: slot.cat,
        })
    } else {
        Ok(slot)
    }
}

fn shuffle(cx: &mut MethodCx<'_>, name: &'static str, op: ShuffleOp) -> Result<(), TranslateError> {
    match op {
        ShuffleOp::Pop => {
            let slot = cx.pop(name)?;
            narrow(name, slot)?;
        }
        ShuffleOp::Pop2 => {
            let top = cx.pop(name)?;
            if !top.is_wide() {
                let below = cx.pop(name)?;
                narrow(name, below)?;
            }
        }
        ShuffleOp::Dup => {
            let top = narrow(name, *cx.frame.peek(name, 0)?)?;
            cx.push(top);
        }
        ShuffleOp::DupX1 => {
            let v1 = narrow(name, cx.pop(name)?)?;
            let v2 = narrow(name, cx.pop(name)?)?;
            cx.push(v1);
            cx.push(v2);
            cx.push(v1);
        }
        ShuffleOp::DupX2 => {
            let v1 = narrow(name, cx.pop(name)?)?;
            let v2 = cx.pop(name)?;
            if v2.is_wide() {
                cx.push(v1);
                cx.push(v2);
                cx.push(v1);
            } else {
                let v3 = narrow(name, cx.pop(name)?)?;
                cx.push(v1);
                cx.push(v3);
                cx.push(v2);
                cx.push(v1);
            }
        }
        ShuffleOp::Dup2 => {
            let v1 = cx.pop(name)?;
            if v1.is_wide() {
                cx.push(v1);
                cx.push(v1);
            } else {
                let v2 = narrow(name, cx.pop(name)?)?;
                cx.push(v2);
                cx.push(v1);
                cx.push(v2);
                cx.push(v1);
            }
        }
        ShuffleOp::Dup2X1 => {
            let v1 = cx.pop(name)?;
            if v1.is_wide() {
                let v2 = narrow(name, cx.pop(name)?)?;
                cx.push(v1);
                cx.push(v2);
                cx.push(v1);
            } else {
                let v2 = narrow(name, cx.pop(name)?)?;
                let v3 = narrow(name, cx.pop(name)?)?;
                cx.push(v2);
                cx.push(v1);
                cx.push(v3);
                cx.push(v2);
                cx.push(v1);
            }
        }
        ShuffleOp::Dup2X2 => {
            let v1 = cx.pop(name)?;
            if v1.is_wide() {
                let v2 = cx.pop(name)?;
                if v2.is_wide() {
                    cx.push(v1);
                    cx.push(v2);
                    cx.push(v1);
                } else {
                    let v3 = narrow(name, cx.pop(name)?)?;
                    cx.push(v1);
                    cx.push(v3);
                    cx.push(v2);
                    cx.push(v1);
                }
            } else {
                let v2 = narrow(name, cx.pop(name)?)?;
                let v3 = cx.pop(name)?;
                if v3.is_wide() {
                    cx.push(v2);
                    cx.push(v1);
                    cx.push(v3);
                    cx.push(v2);
                    cx.push(v1);
                } else {
                    let v4 = narrow(name, cx.pop(name)?)?;
                    cx.push(v2);
                    cx.push(v1);
                    cx.push(v4);
                    cx.push(v3);
                    cx.push(v2);
                    cx.push(v1);
                }
            }
        }
        ShuffleOp::Swap => {
            let v1 = narrow(name, cx.pop(name)?)?;
            let v2 = narrow(name, cx.pop(name)?)?;
            cx.push(v1);
            cx.push(v2);
        }
    }
    Ok(())
}

fn binary(
    cx: &mut MethodCx<'_>,
    name: &'static str,
    op: BinaryOp,
    cat: Category,
) -> Result<(), TranslateError> {
    if op.is_integer_only() && !matches!(cat, Category::Int | Category::Long) {
        return Err(TranslateError::CategoryMismatch {
            inst_name: name,
            expected: Category::Int,
            got: cat,
        });
    }
    // Shift amounts are ints even for long shifts
    let rhs_cat = if op.is_shift() { Category::Int } else { cat };
    let rhs = cx.pop_cat(name, rhs_cat)?;
    let lhs = *cx.frame.peek(name, 0)?;
    if !lhs.cat.matches(cat) {
        return Err(TranslateError::CategoryMismatch {
            inst_name: name,
            expected: cat,
            got: lhs.cat,
        });
    }
    let result = if let Some(value) = fold_binary(op, cat, lhs.value, rhs.value) {
        Slot { cat, value }
    } else {
        let lhs = cx.materialize(lhs)?;
        let rhs = cx.materialize(rhs)?;
        let dst = cx.emitter.alloc_reg()?;
        cx.emitter.emit(TargetInst::Binary {
            op,
            cat,
            dst,
            lhs,
            rhs,
        });
        Slot::reg(cat, dst)
    };
    // The result lands where the first operand was
    cx.frame.replace(name, 0, result)?;
    Ok(())
}

fn fold_binary(op: BinaryOp, cat: Category, lhs: Value, rhs: Value) -> Option<Value> {
    match cat {
        Category::Int => {
            if let (Value::Int(a), Value::Int(b)) = (lhs, rhs) {
                fold_int(op, a, b).map(Value::Int)
            } else {
                None
            }
        }
        Category::Long if op.is_shift() => {
            if let (Value::Long(a), Value::Int(b)) = (lhs, rhs) {
                fold_long_shift(op, a, b).map(Value::Long)
            } else {
                None
            }
        }
        Category::Long => {
            if let (Value::Long(a), Value::Long(b)) = (lhs, rhs) {
                fold_long(op, a, b).map(Value::Long)
            } else {
                None
            }
        }
        Category::Float => {
            if let (Value::Float(a), Value::Float(b)) = (lhs, rhs) {
                fold_float(op, a, b).map(Value::Float)
            } else {
                None
            }
        }
        Category::Double => {
            if let (Value::Double(a), Value::Double(b)) = (lhs, rhs) {
                fold_double(op, a, b).map(Value::Double)
            } else {
                None
            }
        }
        Category::Ref | Category::Any => None,
    }
}

// The unsigned shift is a bit-pattern reinterpretation, not a numeric cast
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
fn fold_int(op: BinaryOp, a: i32, b: i32) -> Option<i32> {
    Some(match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        // Division by a constant zero still has to throw at runtime, so it
        // never folds
        BinaryOp::Div => {
            if b == 0 {
                return None;
            }
            a.wrapping_div(b)
        }
        BinaryOp::Rem => {
            if b == 0 {
                return None;
            }
            a.wrapping_rem(b)
        }
        BinaryOp::And => a & b,
        BinaryOp::Or => a | b,
        BinaryOp::Xor => a ^ b,
        // Only the low five bits of an int shift amount are significant
        BinaryOp::Shl => a << (b & 0x1F),
        BinaryOp::Shr => a >> (b & 0x1F),
        BinaryOp::Ushr => ((a as u32) >> (b & 0x1F)) as i32,
    })
}

fn fold_long(op: BinaryOp, a: i64, b: i64) -> Option<i64> {
    Some(match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div => {
            if b == 0 {
                return None;
            }
            a.wrapping_div(b)
        }
        BinaryOp::Rem => {
            if b == 0 {
                return None;
            }
            a.wrapping_rem(b)
        }
        BinaryOp::And => a & b,
        BinaryOp::Or => a | b,
        BinaryOp::Xor => a ^ b,
        // Shift amounts are ints; handled by fold_long_shift
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::Ushr => return None,
    })
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
fn fold_long_shift(op: BinaryOp, a: i64, b: i32) -> Option<i64> {
    // Only the low six bits of a long shift amount are significant
    let shift = b & 0x3F;
    Some(match op {
        BinaryOp::Shl => a << shift,
        BinaryOp::Shr => a >> shift,
        BinaryOp::Ushr => ((a as u64) >> shift) as i64,
        _ => return None,
    })
}

fn fold_float(op: BinaryOp, a: f32, b: f32) -> Option<f32> {
    Some(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        _ => return None,
    })
}

fn fold_double(op: BinaryOp, a: f64, b: f64) -> Option<f64> {
    Some(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        _ => return None,
    })
}

fn neg(cx: &mut MethodCx<'_>, name: &'static str, cat: Category) -> Result<(), TranslateError> {
    let src = *cx.frame.peek(name, 0)?;
    if !src.cat.matches(cat) {
        return Err(TranslateError::CategoryMismatch {
            inst_name: name,
            expected: cat,
            got: src.cat,
        });
    }
    let folded = match src.value {
        Value::Int(v) => Some(Value::Int(v.wrapping_neg())),
        Value::Long(v) => Some(Value::Long(v.wrapping_neg())),
        Value::Float(v) => Some(Value::Float(-v)),
        Value::Double(v) => Some(Value::Double(-v)),
        Value::Null | Value::Reg(_) => None,
    };
    let result = if let Some(value) = folded {
        Slot { cat, value }
    } else {
        let src = cx.materialize(src)?;
        let dst = cx.emitter.alloc_reg()?;
        cx.emitter.emit(TargetInst::Neg { cat, dst, src });
        Slot::reg(cat, dst)
    };
    cx.frame.replace(name, 0, result)?;
    Ok(())
}

fn convert(cx: &mut MethodCx<'_>, name: &'static str, kind: ConvKind) -> Result<(), TranslateError> {
    let src = cx.pop_cat(name, kind.from_cat())?;
    if let Some(value) = fold_convert(kind, src.value) {
        cx.push(Slot {
            cat: kind.to_cat(),
            value,
        });
    } else {
        let src = cx.materialize(src)?;
        let dst = cx.emitter.alloc_reg()?;
        cx.emitter.emit(TargetInst::Convert { kind, dst, src });
        cx.push(Slot::reg(kind.to_cat(), dst));
    }
    Ok(())
}

// `as` from float to int saturates and maps NaN to zero, which is exactly
// the source semantics of the f2i/f2l/d2i/d2l family; the sub-int truncations
// are bit-pattern reinterpretations.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]
fn fold_convert(kind: ConvKind, value: Value) -> Option<Value> {
    Some(match (kind, value) {
        (ConvKind::I2L, Value::Int(v)) => Value::Long(i64::from(v)),
        (ConvKind::I2F, Value::Int(v)) => Value::Float(v as f32),
        (ConvKind::I2D, Value::Int(v)) => Value::Double(f64::from(v)),
        (ConvKind::L2I, Value::Long(v)) => Value::Int(v as i32),
        (ConvKind::L2F, Value::Long(v)) => Value::Float(v as f32),
        (ConvKind::L2D, Value::Long(v)) => Value::Double(v as f64),
        (ConvKind::F2I, Value::Float(v)) => Value::Int(v as i32),
        (ConvKind::F2L, Value::Float(v)) => Value::Long(v as i64),
        (ConvKind::F2D, Value::Float(v)) => Value::Double(f64::from(v)),
        (ConvKind::D2I, Value::Double(v)) => Value::Int(v as i32),
        (ConvKind::D2L, Value::Double(v)) => Value::Long(v as i64),
        (ConvKind::D2F, Value::Double(v)) => Value::Float(v as f32),
        (ConvKind::I2B, Value::Int(v)) => Value::Int(i32::from(v as i8)),
        (ConvKind::I2C, Value::Int(v)) => Value::Int(i32::from(v as u16)),
        (ConvKind::I2S, Value::Int(v)) => Value::Int(i32::from(v as i16)),
        _ => return None,
    })
}

fn compare(cx: &mut MethodCx<'_>, name: &'static str, kind: CmpKind) -> Result<(), TranslateError> {
    let cat = kind.operand_cat();
    let rhs = cx.pop_cat(name, cat)?;
    let lhs = cx.pop_cat(name, cat)?;
    if let Some(result) = fold_compare(kind, lhs.value, rhs.value) {
        cx.push(Slot::int(result));
    } else {
        let lhs = cx.materialize(lhs)?;
        let rhs = cx.materialize(rhs)?;
        let dst = cx.emitter.alloc_reg()?;
        cx.emitter.emit(TargetInst::Compare {
            kind,
            dst,
            lhs,
            rhs,
        });
        cx.push(Slot::reg(Category::Int, dst));
    }
    Ok(())
}

fn fold_compare(kind: CmpKind, lhs: Value, rhs: Value) -> Option<i32> {
    match (kind, lhs, rhs) {
        (CmpKind::LongCmp, Value::Long(a), Value::Long(b)) => Some(ordering_value(a.cmp(&b))),
        (CmpKind::FloatCmpL, Value::Float(a), Value::Float(b)) => {
            Some(float_ordering(a.partial_cmp(&b), -1))
        }
        (CmpKind::FloatCmpG, Value::Float(a), Value::Float(b)) => {
            Some(float_ordering(a.partial_cmp(&b), 1))
        }
        (CmpKind::DoubleCmpL, Value::Double(a), Value::Double(b)) => {
            Some(float_ordering(a.partial_cmp(&b), -1))
        }
        (CmpKind::DoubleCmpG, Value::Double(a), Value::Double(b)) => {
            Some(float_ordering(a.partial_cmp(&b), 1))
        }
        _ => None,
    }
}

fn ordering_value(ordering: std::cmp::Ordering) -> i32 {
    match ordering {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    }
}

/// `nan` is what an unordered comparison collapses to: -1 for the L forms, 1
/// for the G forms.
fn float_ordering(ordering: Option<std::cmp::Ordering>, nan: i32) -> i32 {
    ordering.map_or(nan, ordering_value)
}

fn field_ref(
    cx: &mut MethodCx<'_>,
    index: RawPoolIndex,
) -> Result<(PoolIndex, Category), TranslateError> {
    let entry = cx.constants.resolve(index)?;
    let descriptor = if let ConstantEntry::FieldRef { descriptor, .. } = &entry {
        descriptor.clone()
    } else {
        return Err(TranslateError::Pool(PoolError::BadRawType {
            index,
            expected: "field ref",
        }));
    };
    let cat = DescriptorType::parse_field(&descriptor)?.category();
    let field = cx.pool.intern(entry)?;
    Ok((field, cat))
}

fn class_ref(cx: &mut MethodCx<'_>, index: RawPoolIndex) -> Result<PoolIndex, TranslateError> {
    let entry = cx.constants.resolve(index)?;
    if !matches!(entry, ConstantEntry::Class(_)) {
        return Err(TranslateError::Pool(PoolError::BadRawType {
            index,
            expected: "class",
        }));
    }
    Ok(cx.pool.intern(entry)?)
}

fn invoke(
    cx: &mut MethodCx<'_>,
    name: &'static str,
    kind: InvokeKind,
    index: RawPoolIndex,
) -> Result<(), TranslateError> {
    let entry = cx.constants.resolve(index)?;
    let descriptor_text = match &entry {
        ConstantEntry::MethodRef { descriptor, .. }
        | ConstantEntry::InterfaceMethodRef { descriptor, .. } => descriptor.clone(),
        _ => {
            return Err(TranslateError::Pool(PoolError::BadRawType {
                index,
                expected: "method ref",
            }))
        }
    };
    let descriptor = MethodDescriptor::parse(&descriptor_text)?;

    // Arguments are popped rightmost first, the receiver last
    let mut slots: SmallVec<[Slot; 8]> = SmallVec::new();
    for parameter in descriptor.parameters().iter().rev() {
        slots.push(cx.pop_cat(name, parameter.category())?);
    }
    if kind != InvokeKind::Static {
        slots.push(cx.pop_cat(name, Category::Ref)?);
    }

    // Receiver first, then arguments left to right
    let mut args = Vec::with_capacity(slots.len());
    for slot in slots.iter().rev() {
        args.push(cx.materialize(*slot)?);
    }

    let method = cx.pool.intern(entry)?;
    let ret = if let Some(return_type) = descriptor.return_type() {
        Some((return_type.category(), cx.emitter.alloc_reg()?))
    } else {
        None
    };
    cx.emitter.emit(TargetInst::Invoke {
        kind,
        method,
        args,
        ret,
    });
    if let Some((cat, reg)) = ret {
        cx.push(Slot::reg(cat, reg));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use leafvm_base::code::frame::{Slot, SymStack, Value};
    use leafvm_base::code::op::{BinaryOp, CmpKind, CondOp, ConvKind, Inst, ShuffleOp};
    use leafvm_base::code::target::{CodeEmitter, Reg, TargetInst};
    use leafvm_base::code::types::Category;
    use leafvm_base::id::InstructionOffset;
    use leafvm_base::pool::{ConstantPool, PoolError, RawConstant, RawConstants};

    use super::{
        apply_inst, fold_binary, fold_compare, fold_convert, fold_int, fold_long_shift, MethodCx,
    };
    use crate::locals::Locals;
    use crate::{TranslateError, TranslationLogging};

    fn cx<'a>(
        constants: &'a RawConstants,
        pool: &'a mut ConstantPool,
        conf: &'a TranslationLogging,
        max_locals: u16,
    ) -> MethodCx<'a> {
        MethodCx {
            constants,
            pool,
            conf,
            frame: SymStack::new(),
            locals: Locals::new(max_locals),
            emitter: CodeEmitter::new(),
        }
    }

    #[test]
    fn test_fold_int_wrapping() {
        assert_eq!(fold_int(BinaryOp::Add, i32::MAX, 1), Some(i32::MIN));
        assert_eq!(fold_int(BinaryOp::Mul, i32::MIN, -1), Some(i32::MIN));
        assert_eq!(fold_int(BinaryOp::Div, i32::MIN, -1), Some(i32::MIN));
        assert_eq!(fold_int(BinaryOp::Div, 7, 0), None);
        assert_eq!(fold_int(BinaryOp::Rem, 7, 0), None);
    }

    #[test]
    fn test_fold_int_shifts_mask_five_bits() {
        assert_eq!(fold_int(BinaryOp::Shl, 1, 33), Some(2));
        assert_eq!(fold_int(BinaryOp::Shr, -8, 1), Some(-4));
        // Zero fill from the top bit
        assert_eq!(fold_int(BinaryOp::Ushr, -1, 1), Some(0x7FFF_FFFF));
        assert_eq!(fold_int(BinaryOp::Ushr, -1, 32), Some(-1));
    }

    #[test]
    fn test_fold_long_shifts_mask_six_bits() {
        // 70 & 0x3F == 6
        assert_eq!(
            fold_long_shift(BinaryOp::Ushr, -1, 70),
            Some((u64::MAX >> 6) as i64)
        );
        assert_eq!(fold_long_shift(BinaryOp::Shl, 1, 64), Some(1));
        assert_eq!(fold_long_shift(BinaryOp::Shl, 1, 33), Some(1 << 33));
        assert_eq!(fold_long_shift(BinaryOp::Shr, -1, 63), Some(-1));
    }

    #[test]
    fn test_fold_binary_requires_matching_operands() {
        // A register operand blocks folding
        assert_eq!(
            fold_binary(
                BinaryOp::Add,
                Category::Int,
                Value::Int(1),
                Value::Reg(Reg::new(0)),
            ),
            None
        );
        // Long shift takes an int amount
        assert_eq!(
            fold_binary(
                BinaryOp::Ushr,
                Category::Long,
                Value::Long(-1),
                Value::Int(70),
            ),
            Some(Value::Long((u64::MAX >> 6) as i64))
        );
    }

    #[test]
    fn test_fold_convert_saturates() {
        assert_eq!(fold_convert(ConvKind::F2I, Value::Float(f32::NAN)), Some(Value::Int(0)));
        assert_eq!(
            fold_convert(ConvKind::F2I, Value::Float(1e10)),
            Some(Value::Int(i32::MAX))
        );
        assert_eq!(
            fold_convert(ConvKind::D2L, Value::Double(-1e300)),
            Some(Value::Long(i64::MIN))
        );
        assert_eq!(fold_convert(ConvKind::L2I, Value::Long(0x1_0000_0001)), Some(Value::Int(1)));
    }

    #[test]
    fn test_fold_convert_sub_int() {
        assert_eq!(fold_convert(ConvKind::I2B, Value::Int(0x180)), Some(Value::Int(-128)));
        // char is unsigned
        assert_eq!(fold_convert(ConvKind::I2C, Value::Int(-1)), Some(Value::Int(0xFFFF)));
        assert_eq!(fold_convert(ConvKind::I2S, Value::Int(0x1_8000)), Some(Value::Int(-32768)));
    }

    #[test]
    fn test_fold_compare_nan_collapse() {
        assert_eq!(
            fold_compare(CmpKind::FloatCmpL, Value::Float(f32::NAN), Value::Float(0.0)),
            Some(-1)
        );
        assert_eq!(
            fold_compare(CmpKind::FloatCmpG, Value::Float(f32::NAN), Value::Float(0.0)),
            Some(1)
        );
        assert_eq!(
            fold_compare(CmpKind::LongCmp, Value::Long(3), Value::Long(3)),
            Some(0)
        );
        assert_eq!(
            fold_compare(CmpKind::DoubleCmpL, Value::Double(2.0), Value::Double(1.0)),
            Some(1)
        );
    }

    /// Seed the stack with constants, apply one shuffle, and hand back the
    /// resulting slots bottom to top.
    fn shuffled(seed: &[Inst], op: ShuffleOp) -> Vec<Slot> {
        let constants = RawConstants::default();
        let mut pool = ConstantPool::new();
        let conf = TranslationLogging::default();
        let mut cx = cx(&constants, &mut pool, &conf, 0);
        for inst in seed {
            apply_inst(&mut cx, inst).unwrap();
        }
        apply_inst(&mut cx, &Inst::Shuffle(op)).unwrap();
        // Shuffles never emit anything
        assert!(cx.emitter.instructions().is_empty());
        cx.frame.iter().copied().collect()
    }

    #[test]
    fn test_dup_x1_inserts_below_the_second_slot() {
        let stack = shuffled(&[Inst::ConstInt(2), Inst::ConstInt(1)], ShuffleOp::DupX1);
        assert_eq!(stack, vec![Slot::int(1), Slot::int(2), Slot::int(1)]);
    }

    #[test]
    fn test_dup_x2_narrow_and_wide_forms() {
        // Three one-slot values: the copy lands below the third
        let stack = shuffled(
            &[Inst::ConstInt(3), Inst::ConstInt(2), Inst::ConstInt(1)],
            ShuffleOp::DupX2,
        );
        assert_eq!(
            stack,
            vec![Slot::int(1), Slot::int(3), Slot::int(2), Slot::int(1)]
        );
        // A wide second value already spans both skipped slots
        let stack = shuffled(&[Inst::ConstLong(2), Inst::ConstInt(1)], ShuffleOp::DupX2);
        assert_eq!(stack, vec![Slot::int(1), Slot::long(2), Slot::int(1)]);
    }

    #[test]
    fn test_dup2_of_narrow_pair() {
        let stack = shuffled(&[Inst::ConstInt(2), Inst::ConstInt(1)], ShuffleOp::Dup2);
        assert_eq!(
            stack,
            vec![Slot::int(2), Slot::int(1), Slot::int(2), Slot::int(1)]
        );
    }

    #[test]
    fn test_dup2_x1_narrow_and_wide_forms() {
        let stack = shuffled(
            &[Inst::ConstInt(3), Inst::ConstInt(2), Inst::ConstInt(1)],
            ShuffleOp::Dup2X1,
        );
        assert_eq!(
            stack,
            vec![
                Slot::int(2),
                Slot::int(1),
                Slot::int(3),
                Slot::int(2),
                Slot::int(1),
            ]
        );
        // A wide top counts as the whole pair
        let stack = shuffled(&[Inst::ConstInt(2), Inst::ConstLong(1)], ShuffleOp::Dup2X1);
        assert_eq!(stack, vec![Slot::long(1), Slot::int(2), Slot::long(1)]);
    }

    #[test]
    fn test_dup2_x2_all_four_forms() {
        // Narrow pair over a narrow pair
        let stack = shuffled(
            &[
                Inst::ConstInt(4),
                Inst::ConstInt(3),
                Inst::ConstInt(2),
                Inst::ConstInt(1),
            ],
            ShuffleOp::Dup2X2,
        );
        assert_eq!(
            stack,
            vec![
                Slot::int(2),
                Slot::int(1),
                Slot::int(4),
                Slot::int(3),
                Slot::int(2),
                Slot::int(1),
            ]
        );
        // Wide top over a narrow pair
        let stack = shuffled(
            &[Inst::ConstInt(3), Inst::ConstInt(2), Inst::ConstLong(1)],
            ShuffleOp::Dup2X2,
        );
        assert_eq!(
            stack,
            vec![Slot::long(1), Slot::int(3), Slot::int(2), Slot::long(1)]
        );
        // Narrow pair over a wide value
        let stack = shuffled(
            &[Inst::ConstLong(3), Inst::ConstInt(2), Inst::ConstInt(1)],
            ShuffleOp::Dup2X2,
        );
        assert_eq!(
            stack,
            vec![
                Slot::int(2),
                Slot::int(1),
                Slot::long(3),
                Slot::int(2),
                Slot::int(1),
            ]
        );
        // Wide over wide
        let stack = shuffled(&[Inst::ConstLong(2), Inst::ConstLong(1)], ShuffleOp::Dup2X2);
        assert_eq!(stack, vec![Slot::long(1), Slot::long(2), Slot::long(1)]);
    }

    #[test]
    fn test_swap_of_narrow_slots() {
        let stack = shuffled(&[Inst::ConstInt(2), Inst::ConstInt(1)], ShuffleOp::Swap);
        assert_eq!(stack, vec![Slot::int(1), Slot::int(2)]);
    }

    #[test]
    fn test_dup2_of_wide_is_one_slot() {
        let constants = RawConstants::default();
        let mut pool = ConstantPool::new();
        let conf = TranslationLogging::default();
        let mut cx = cx(&constants, &mut pool, &conf, 0);

        apply_inst(&mut cx, &Inst::ConstLong(9)).unwrap();
        apply_inst(&mut cx, &Inst::Shuffle(ShuffleOp::Dup2)).unwrap();
        assert_eq!(cx.frame.height(), 2);
        assert_eq!(*cx.frame.peek("t", 0).unwrap(), Slot::long(9));
        assert_eq!(*cx.frame.peek("t", 1).unwrap(), Slot::long(9));
        // Nothing was emitted; the shuffle is purely symbolic
        assert!(cx.emitter.instructions().is_empty());
    }

    #[test]
    fn test_swap_rejects_wide_slot() {
        let constants = RawConstants::default();
        let mut pool = ConstantPool::new();
        let conf = TranslationLogging::default();
        let mut cx = cx(&constants, &mut pool, &conf, 0);

        apply_inst(&mut cx, &Inst::ConstDouble(1.0)).unwrap();
        apply_inst(&mut cx, &Inst::ConstInt(1)).unwrap();
        let err = apply_inst(&mut cx, &Inst::Shuffle(ShuffleOp::Swap)).unwrap_err();
        assert_eq!(
            err,
            TranslateError::ExpectedNarrowSlot {
                inst_name: "swap",
                got: Category::Double,
            }
        );
    }

    #[test]
    fn test_constant_load_rejects_bare_utf8() {
        // Index 1 is a raw utf8 payload, not a string constant; a constant
        // load referencing it directly is malformed input
        let constants = RawConstants::new(vec![
            RawConstant::Utf8(b"payload".to_vec()),
            RawConstant::String { utf8: 1 },
        ]);
        let mut pool = ConstantPool::new();
        let conf = TranslationLogging::default();
        let mut cx = cx(&constants, &mut pool, &conf, 0);

        let err = apply_inst(&mut cx, &Inst::LoadConstant { index: 1 }).unwrap_err();
        assert_eq!(
            err,
            TranslateError::Pool(PoolError::NotLoadable { index: 1 })
        );
        // The string entry itself still loads
        apply_inst(&mut cx, &Inst::LoadConstant { index: 2 }).unwrap();
        assert_eq!(cx.frame.height(), 1);
    }

    #[test]
    fn test_branch_materializes_condition() {
        let constants = RawConstants::default();
        let mut pool = ConstantPool::new();
        let conf = TranslationLogging::default();
        let mut cx = cx(&constants, &mut pool, &conf, 0);

        apply_inst(&mut cx, &Inst::ConstInt(5)).unwrap();
        apply_inst(
            &mut cx,
            &Inst::BranchIntZero {
                op: CondOp::Ne,
                target: InstructionOffset(40),
            },
        )
        .unwrap();

        assert!(cx.frame.is_empty());
        let insts = cx.emitter.instructions();
        assert_eq!(insts.len(), 2);
        assert_eq!(
            insts[0].1,
            TargetInst::ConstImm {
                dst: Reg::new(0),
                value: 5,
            }
        );
        assert_eq!(
            insts[1].1,
            TargetInst::JumpIntZero {
                op: CondOp::Ne,
                src: Reg::new(0),
                target: InstructionOffset(40),
            }
        );
    }

    #[test]
    fn test_branch_flushes_remaining_constants() {
        let constants = RawConstants::default();
        let mut pool = ConstantPool::new();
        let conf = TranslationLogging::default();
        let mut cx = cx(&constants, &mut pool, &conf, 0);

        // A constant left below the condition must land in a register before
        // control transfers
        apply_inst(&mut cx, &Inst::ConstInt(7)).unwrap();
        apply_inst(&mut cx, &Inst::ConstInt(0)).unwrap();
        apply_inst(
            &mut cx,
            &Inst::BranchIntZero {
                op: CondOp::Eq,
                target: InstructionOffset(8),
            },
        )
        .unwrap();

        assert_eq!(cx.frame.height(), 1);
        let remaining = *cx.frame.peek("t", 0).unwrap();
        assert!(matches!(remaining.value, Value::Reg(_)));
        assert_eq!(remaining.cat, Category::Int);
    }

    #[test]
    fn test_division_by_constant_zero_is_not_folded() {
        let constants = RawConstants::default();
        let mut pool = ConstantPool::new();
        let conf = TranslationLogging::default();
        let mut cx = cx(&constants, &mut pool, &conf, 0);

        apply_inst(&mut cx, &Inst::ConstInt(9)).unwrap();
        apply_inst(&mut cx, &Inst::ConstInt(0)).unwrap();
        apply_inst(
            &mut cx,
            &Inst::Binary {
                op: BinaryOp::Div,
                cat: Category::Int,
            },
        )
        .unwrap();

        // The division stays in the output so it can throw at runtime
        assert_eq!(cx.frame.height(), 1);
        assert!(matches!(
            cx.frame.peek("t", 0).unwrap().value,
            Value::Reg(_)
        ));
        assert!(cx
            .emitter
            .instructions()
            .iter()
            .any(|(_, inst)| matches!(inst, TargetInst::Binary { op: BinaryOp::Div, .. })));
    }

    #[test]
    fn test_shift_type_checks_operands() {
        let constants = RawConstants::default();
        let mut pool = ConstantPool::new();
        let conf = TranslationLogging::default();
        let mut cx = cx(&constants, &mut pool, &conf, 0);

        // lushr needs an int amount on top, not a long
        apply_inst(&mut cx, &Inst::ConstLong(1)).unwrap();
        apply_inst(&mut cx, &Inst::ConstLong(2)).unwrap();
        let err = apply_inst(
            &mut cx,
            &Inst::Binary {
                op: BinaryOp::Ushr,
                cat: Category::Long,
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            TranslateError::CategoryMismatch {
                inst_name: "lushr",
                expected: Category::Int,
                got: Category::Long,
            }
        );
    }
}
