//! The symbolic local variable array.
//! Tracks which target register backs each source local, with the same
//! two-slot bookkeeping for wide values that the source format uses: a wide
//! value occupies its index and the next, and clobbering either half
//! invalidates the whole value.

use smallvec::{smallvec, SmallVec};

use leafvm_base::code::method::MethodDescriptor;
use leafvm_base::code::target::{CodeEmitter, Reg};
use leafvm_base::code::types::Category;
use leafvm_base::id::LocalIndex;

use crate::TranslateError;

/// One local variable slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Local {
    /// Never stored to so far
    Unfilled,
    /// The second half of a wide value stored at the previous index
    Top,
    /// Holds a value, which lives in the given target register
    Filled { cat: Category, reg: Reg },
}

/// The local variable array of one method being translated.
#[derive(Debug, Clone)]
pub(crate) struct Locals {
    locals: SmallVec<[Local; 16]>,
}
impl Locals {
    pub(crate) fn new(max_locals: u16) -> Locals {
        Locals {
            locals: smallvec![Local::Unfilled; usize::from(max_locals)],
        }
    }

    /// Seed the low slots from the method's parameters, each backed by a
    /// fresh argument register: the receiver first for instance methods, then
    /// the declared parameters, wide ones taking two slots.
    pub(crate) fn seed(
        emitter: &mut CodeEmitter,
        descriptor: &MethodDescriptor,
        is_static: bool,
        max_locals: u16,
    ) -> Result<Locals, TranslateError> {
        let mut locals = Locals::new(max_locals);
        let mut index: LocalIndex = 0;
        if !is_static {
            let reg = emitter.alloc_reg()?;
            locals.store("parameters", index, Category::Ref, reg)?;
            index += 1;
        }
        for parameter in descriptor.parameters() {
            let cat = parameter.category();
            let reg = emitter.alloc_reg()?;
            locals.store("parameters", index, cat, reg)?;
            index += if cat.is_wide() { 2 } else { 1 };
        }
        Ok(locals)
    }

    /// Read the value for a load of the given category.
    pub(crate) fn load(
        &self,
        inst_name: &'static str,
        index: LocalIndex,
        expected: Category,
    ) -> Result<(Category, Reg), TranslateError> {
        let slot = self
            .locals
            .get(usize::from(index))
            .ok_or(TranslateError::BadLocalIndex {
                inst_name,
                index,
                max: self.limit(),
            })?;
        match *slot {
            Local::Unfilled => Err(TranslateError::UninitializedLocal { inst_name, index }),
            Local::Top => Err(TranslateError::WideLocalHalf { inst_name, index }),
            Local::Filled { cat, reg } => {
                if cat.matches(expected) {
                    Ok((cat, reg))
                } else {
                    Err(TranslateError::LocalCategoryMismatch {
                        inst_name,
                        index,
                        expected,
                        got: cat,
                    })
                }
            }
        }
    }

    /// The register currently backing a local, if it holds a value.
    pub(crate) fn filled(&self, index: LocalIndex) -> Option<(Category, Reg)> {
        match self.locals.get(usize::from(index)) {
            Some(Local::Filled { cat, reg }) => Some((*cat, *reg)),
            _ => None,
        }
    }

    pub(crate) fn store(
        &mut self,
        inst_name: &'static str,
        index: LocalIndex,
        cat: Category,
        reg: Reg,
    ) -> Result<(), TranslateError> {
        let at = usize::from(index);
        let last = if cat.is_wide() { at + 1 } else { at };
        if last >= self.locals.len() {
            return Err(TranslateError::BadLocalIndex {
                inst_name,
                index,
                max: self.limit(),
            });
        }
        self.invalidate(at);
        if cat.is_wide() {
            self.invalidate(at + 1);
            self.locals[at + 1] = Local::Top;
        }
        self.locals[at] = Local::Filled { cat, reg };
        Ok(())
    }

    /// Clear a slot. Overwriting either half of a wide value invalidates the
    /// whole value, so the partner slot resets too.
    fn invalidate(&mut self, at: usize) {
        match self.locals[at] {
            Local::Top => {
                if let Local::Filled { cat, .. } = self.locals[at - 1] {
                    if cat.is_wide() {
                        self.locals[at - 1] = Local::Unfilled;
                    }
                }
            }
            Local::Filled { cat, .. } if cat.is_wide() => {
                if let Some(next) = self.locals.get_mut(at + 1) {
                    if *next == Local::Top {
                        *next = Local::Unfilled;
                    }
                }
            }
            _ => {}
        }
        self.locals[at] = Local::Unfilled;
    }

    fn limit(&self) -> u16 {
        // Construction takes the size as a u16, so the length always fits
        #[allow(clippy::cast_possible_truncation)]
        {
            self.locals.len() as u16
        }
    }
}

#[cfg(test)]
mod tests {
    use leafvm_base::code::method::MethodDescriptor;
    use leafvm_base::code::target::{CodeEmitter, Reg};
    use leafvm_base::code::types::Category;

    use super::Locals;
    use crate::TranslateError;

    #[test]
    fn test_seeding_instance_method() {
        // (IJ)V on an instance: this at 0, the int at 1, the long at 2/3
        let descriptor = MethodDescriptor::parse("(IJ)V").unwrap();
        let mut emitter = CodeEmitter::new();
        let locals = Locals::seed(&mut emitter, &descriptor, false, 4).unwrap();

        assert_eq!(emitter.register_count(), 3);
        assert_eq!(
            locals.load("t", 0, Category::Ref).unwrap(),
            (Category::Ref, Reg::new(0))
        );
        assert_eq!(
            locals.load("t", 1, Category::Int).unwrap(),
            (Category::Int, Reg::new(1))
        );
        assert_eq!(
            locals.load("t", 2, Category::Long).unwrap(),
            (Category::Long, Reg::new(2))
        );
        // The second half of the long is not directly addressable
        assert_eq!(
            locals.load("t", 3, Category::Int),
            Err(TranslateError::WideLocalHalf {
                inst_name: "t",
                index: 3,
            })
        );
    }

    #[test]
    fn test_load_before_store() {
        let locals = Locals::new(2);
        assert_eq!(
            locals.load("t", 0, Category::Int),
            Err(TranslateError::UninitializedLocal {
                inst_name: "t",
                index: 0,
            })
        );
        assert_eq!(
            locals.load("t", 2, Category::Int),
            Err(TranslateError::BadLocalIndex {
                inst_name: "t",
                index: 2,
                max: 2,
            })
        );
    }

    #[test]
    fn test_category_mismatch() {
        let mut locals = Locals::new(1);
        locals.store("t", 0, Category::Int, Reg::new(0)).unwrap();
        assert_eq!(
            locals.load("t", 0, Category::Float),
            Err(TranslateError::LocalCategoryMismatch {
                inst_name: "t",
                index: 0,
                expected: Category::Float,
                got: Category::Int,
            })
        );
    }

    #[test]
    fn test_clobbering_wide_halves() {
        let mut locals = Locals::new(3);
        locals.store("t", 0, Category::Long, Reg::new(0)).unwrap();
        assert!(locals.load("t", 0, Category::Long).is_ok());

        // Storing into the upper half kills the long
        locals.store("t", 1, Category::Int, Reg::new(1)).unwrap();
        assert_eq!(
            locals.load("t", 0, Category::Long),
            Err(TranslateError::UninitializedLocal {
                inst_name: "t",
                index: 0,
            })
        );
        assert!(locals.load("t", 1, Category::Int).is_ok());

        // And storing into the lower half of a fresh long clears its Top
        locals.store("t", 1, Category::Long, Reg::new(2)).unwrap();
        locals.store("t", 1, Category::Int, Reg::new(3)).unwrap();
        assert_eq!(
            locals.load("t", 2, Category::Int),
            Err(TranslateError::UninitializedLocal {
                inst_name: "t",
                index: 2,
            })
        );
    }

    #[test]
    fn test_wide_store_needs_both_slots() {
        let mut locals = Locals::new(2);
        assert_eq!(
            locals.store("t", 1, Category::Double, Reg::new(0)),
            Err(TranslateError::BadLocalIndex {
                inst_name: "t",
                index: 1,
                max: 2,
            })
        );
    }
}
