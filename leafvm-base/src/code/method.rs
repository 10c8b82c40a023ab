//! Method and field descriptors.
//! Parsed from the source format's descriptor strings; the translation needs
//! them to seed parameter locals and to compute the stack effect of field
//! accesses and invocations.

use std::num::NonZeroUsize;

use crate::code::types::Category;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// The descriptor text ended in the middle of a type
    UnexpectedEnd,
    /// A character that does not begin any type
    InvalidTypeChar(char),
    /// Method descriptors must begin with `(`
    ExpectedOpenParen,
    /// A class name (`L...;`) without its closing `;`
    UnterminatedClassName,
    /// There were leftover characters after the descriptor
    TrailingData,
    /// An array without a component type, or with too many dimensions to
    /// represent
    InvalidArray,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorTypeBasic {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Class(String),
    Short,
    Boolean,
}
impl DescriptorTypeBasic {
    /// The stack category a value of this type occupies. Sub-int types widen
    /// to int on the operand stack.
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            DescriptorTypeBasic::Byte
            | DescriptorTypeBasic::Char
            | DescriptorTypeBasic::Short
            | DescriptorTypeBasic::Boolean
            | DescriptorTypeBasic::Int => Category::Int,
            DescriptorTypeBasic::Long => Category::Long,
            DescriptorTypeBasic::Float => Category::Float,
            DescriptorTypeBasic::Double => Category::Double,
            DescriptorTypeBasic::Class(_) => Category::Ref,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorType {
    Basic(DescriptorTypeBasic),
    Array {
        level: NonZeroUsize,
        component: DescriptorTypeBasic,
    },
}
impl DescriptorType {
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            DescriptorType::Basic(basic) => basic.category(),
            DescriptorType::Array { .. } => Category::Ref,
        }
    }

    /// Whether this occupies two local variable slots in the source format
    #[must_use]
    pub fn is_wide(&self) -> bool {
        self.category().is_wide()
    }

    /// Parse a field descriptor, requiring that it consumes the entire text
    pub fn parse_field(text: &str) -> Result<DescriptorType, DescriptorError> {
        let (typ, rest) = DescriptorType::parse_partial(text)?;
        if rest.is_empty() {
            Ok(typ)
        } else {
            Err(DescriptorError::TrailingData)
        }
    }

    /// Parse one type from the front of `text`, returning it and the
    /// remainder
    fn parse_partial(text: &str) -> Result<(DescriptorType, &str), DescriptorError> {
        let mut level: usize = 0;
        let mut rest = text;
        while let Some(stripped) = rest.strip_prefix('[') {
            level += 1;
            rest = stripped;
        }

        let (component, rest) = DescriptorTypeBasic::parse_partial(rest)?;
        let typ = if let Some(level) = NonZeroUsize::new(level) {
            DescriptorType::Array { level, component }
        } else {
            DescriptorType::Basic(component)
        };
        Ok((typ, rest))
    }
}
impl DescriptorTypeBasic {
    fn parse_partial(text: &str) -> Result<(DescriptorTypeBasic, &str), DescriptorError> {
        let first = text.chars().next().ok_or(DescriptorError::UnexpectedEnd)?;
        let typ = match first {
            'B' => DescriptorTypeBasic::Byte,
            'C' => DescriptorTypeBasic::Char,
            'D' => DescriptorTypeBasic::Double,
            'F' => DescriptorTypeBasic::Float,
            'I' => DescriptorTypeBasic::Int,
            'J' => DescriptorTypeBasic::Long,
            'S' => DescriptorTypeBasic::Short,
            'Z' => DescriptorTypeBasic::Boolean,
            'L' => {
                let rest = &text[1..];
                let end = rest
                    .find(';')
                    .ok_or(DescriptorError::UnterminatedClassName)?;
                return Ok((
                    DescriptorTypeBasic::Class(rest[..end].to_owned()),
                    &rest[end + 1..],
                ));
            }
            other => return Err(DescriptorError::InvalidTypeChar(other)),
        };
        Ok((typ, &text[1..]))
    }
}

/// Parameters and return type of a method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    parameters: Vec<DescriptorType>,
    /// None represents void
    return_type: Option<DescriptorType>,
}
impl MethodDescriptor {
    #[must_use]
    pub fn new(parameters: Vec<DescriptorType>, return_type: Option<DescriptorType>) -> Self {
        Self {
            parameters,
            return_type,
        }
    }

    #[must_use]
    pub fn parameters(&self) -> &[DescriptorType] {
        self.parameters.as_slice()
    }

    #[must_use]
    pub fn return_type(&self) -> Option<&DescriptorType> {
        self.return_type.as_ref()
    }

    /// The number of source-format local variable slots the parameters take,
    /// not counting a `this` receiver
    #[must_use]
    pub fn parameter_local_slots(&self) -> usize {
        self.parameters
            .iter()
            .map(|p| if p.is_wide() { 2 } else { 1 })
            .sum()
    }

    /// Parse a descriptor like `(IJ[Ljava/lang/String;)V`
    pub fn parse(text: &str) -> Result<MethodDescriptor, DescriptorError> {
        let mut rest = text
            .strip_prefix('(')
            .ok_or(DescriptorError::ExpectedOpenParen)?;

        let mut parameters = Vec::new();
        loop {
            if let Some(after) = rest.strip_prefix(')') {
                rest = after;
                break;
            }
            if rest.is_empty() {
                return Err(DescriptorError::UnexpectedEnd);
            }
            let (typ, after) = DescriptorType::parse_partial(rest)?;
            parameters.push(typ);
            rest = after;
        }

        let return_type = if let Some(after) = rest.strip_prefix('V') {
            rest = after;
            None
        } else {
            let (typ, after) = DescriptorType::parse_partial(rest)?;
            rest = after;
            Some(typ)
        };

        if rest.is_empty() {
            Ok(MethodDescriptor::new(parameters, return_type))
        } else {
            Err(DescriptorError::TrailingData)
        }
    }
}
