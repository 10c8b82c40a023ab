//! Operand type categories.
//! The translation never executes code, so these are deliberately coarse: the
//! simulator only needs to know how wide a value is and which numeric
//! semantics apply to it, not its full source-level type.

use std::fmt;

/// The type category of one symbolic stack slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Category {
    /// 32-bit integer. Also covers the sub-int types (byte/short/char/bool),
    /// which the source format widens to int on the stack.
    Int,
    /// 64-bit integer
    Long,
    /// 32-bit IEEE-754
    Float,
    /// 64-bit IEEE-754
    Double,
    /// Any reference (object, array, null)
    Ref,
    /// Don't-care, used by the stack shuffle family which moves slots around
    /// without interpreting them
    Any,
}
impl Category {
    /// Whether values of this category are 8 bytes wide (category-2 in the
    /// source format's terms). `Any` is narrow; a shuffle that needs to move
    /// a wide slot checks the slot itself, not the instruction.
    #[must_use]
    pub fn is_wide(self) -> bool {
        matches!(self, Category::Long | Category::Double)
    }

    /// Whether a slot of category `self` satisfies an instruction that
    /// expects `expected`. `Any` on either side always matches.
    #[must_use]
    pub fn matches(self, expected: Category) -> bool {
        self == expected || self == Category::Any || expected == Category::Any
    }

    /// How many bits of a shift amount are significant for this category.
    /// Only meaningful for the integer categories.
    #[must_use]
    pub fn shift_mask(self) -> u32 {
        match self {
            Category::Long => 0x3F,
            _ => 0x1F,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Category::Int => "int",
            Category::Long => "long",
            Category::Float => "float",
            Category::Double => "double",
            Category::Ref => "ref",
            Category::Any => "any",
        }
    }
}
impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn test_category_matching() {
        assert!(Category::Int.matches(Category::Int));
        assert!(!Category::Int.matches(Category::Long));
        assert!(Category::Any.matches(Category::Long));
        assert!(Category::Ref.matches(Category::Any));
    }

    #[test]
    fn test_shift_masks() {
        assert_eq!(Category::Int.shift_mask(), 0x1F);
        assert_eq!(Category::Long.shift_mask(), 0x3F);
    }

    #[test]
    fn test_wide_categories() {
        assert!(Category::Long.is_wide());
        assert!(Category::Double.is_wide());
        assert!(!Category::Int.is_wide());
        assert!(!Category::Ref.is_wide());
        assert!(!Category::Any.is_wide());
    }
}
