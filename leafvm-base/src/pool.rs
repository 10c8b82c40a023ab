//! The shared constant pool.
//! One pool instance is threaded through an entire build: every class being
//! converted interns its constants here, deduplicated by value, so two
//! classes that mention the same literal end up addressing the same entry.
//! The pool has a hard entry limit fixed at build configuration time; the
//! target format cannot address past it, so hitting the limit is a build
//! abort, never a warning.

use std::fmt;

use indexmap::IndexSet;

use crate::id::{PoolIndex, RawPoolIndex};

/// The most entries the classic u16-indexed pool format can address.
pub const MAX_POOL_ENTRIES: usize = 65535;

/// A resolved entry of the target constant pool.
/// Floating point payloads are stored as their bit patterns so that
/// deduplication is by representation (two NaNs with the same bits share an
/// entry; `0.0` and `-0.0` do not collapse).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstantEntry {
    Integer(i32),
    Long(i64),
    Float(u32),
    Double(u64),
    String(String),
    Class(String),
    FieldRef {
        class: String,
        name: String,
        descriptor: String,
    },
    MethodRef {
        class: String,
        name: String,
        descriptor: String,
    },
    InterfaceMethodRef {
        class: String,
        name: String,
        descriptor: String,
    },
    NameAndType {
        name: String,
        descriptor: String,
    },
}
impl fmt::Display for ConstantEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantEntry::Integer(v) => write!(f, "int {v}"),
            ConstantEntry::Long(v) => write!(f, "long {v}"),
            ConstantEntry::Float(bits) => write!(f, "float {}", f32::from_bits(*bits)),
            ConstantEntry::Double(bits) => write!(f, "double {}", f64::from_bits(*bits)),
            ConstantEntry::String(s) => write!(f, "string {s:?}"),
            ConstantEntry::Class(name) => write!(f, "class {name}"),
            ConstantEntry::FieldRef {
                class,
                name,
                descriptor,
            } => write!(f, "field {class}.{name}:{descriptor}"),
            ConstantEntry::MethodRef {
                class,
                name,
                descriptor,
            } => write!(f, "method {class}.{name}{descriptor}"),
            ConstantEntry::InterfaceMethodRef {
                class,
                name,
                descriptor,
            } => write!(f, "interface method {class}.{name}{descriptor}"),
            ConstantEntry::NameAndType { name, descriptor } => {
                write!(f, "name-and-type {name}:{descriptor}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PoolError {
    /// The pool is at its configured maximum. Fatal for the whole build:
    /// skipping the method would not help, the pool is shared.
    LimitReached {
        attempted: ConstantEntry,
        limit: usize,
    },
    /// A class-local raw index with no entry behind it
    BadRawIndex { index: RawPoolIndex },
    /// The raw entry at the index was not the kind the referencer expected
    /// (e.g. a `String` whose utf8 index pointed at an `Integer`)
    BadRawType {
        index: RawPoolIndex,
        expected: &'static str,
    },
    /// The utf8 payload at the index was not valid modified UTF-8
    InvalidUtf8 { index: RawPoolIndex },
    /// The raw entry at the index is not something a constant-load can push
    NotLoadable { index: RawPoolIndex },
}
impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::LimitReached { attempted, limit } => write!(
                f,
                "constant pool limit of {limit} entries reached while interning {attempted}"
            ),
            PoolError::BadRawIndex { index } => {
                write!(f, "raw constant index {index} is out of range")
            }
            PoolError::BadRawType { index, expected } => {
                write!(f, "raw constant at index {index} is not a {expected}")
            }
            PoolError::InvalidUtf8 { index } => {
                write!(f, "utf8 constant at index {index} is malformed")
            }
            PoolError::NotLoadable { index } => {
                write!(f, "constant at index {index} cannot be loaded by ldc")
            }
        }
    }
}

/// The build-wide deduplicating constant pool.
/// Entries are immutable once inserted and the pool never shrinks; it is
/// frozen into its final order by [`ConstantPool::into_entries`] when the
/// build completes.
#[derive(Debug, Clone)]
pub struct ConstantPool {
    entries: IndexSet<ConstantEntry>,
    limit: usize,
}
impl Default for ConstantPool {
    fn default() -> ConstantPool {
        ConstantPool::new()
    }
}
impl ConstantPool {
    #[must_use]
    pub fn new() -> ConstantPool {
        ConstantPool::with_limit(MAX_POOL_ENTRIES)
    }

    /// A pool with a custom entry limit. Limits beyond what the index width
    /// can address are clamped.
    #[must_use]
    pub fn with_limit(limit: usize) -> ConstantPool {
        ConstantPool {
            entries: IndexSet::new(),
            limit: limit.min(MAX_POOL_ENTRIES),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub fn get(&self, index: PoolIndex) -> Option<&ConstantEntry> {
        self.entries.get_index(usize::from(index.get()))
    }

    #[must_use]
    pub fn index_of(&self, entry: &ConstantEntry) -> Option<PoolIndex> {
        self.entries
            .get_index_of(entry)
            .map(Self::index_from_position)
    }

    /// Intern a constant: return the index of the existing entry for this
    /// value, or append it. Interning the same value twice never grows the
    /// pool. Appending past the configured limit fails without growing the
    /// pool at all.
    pub fn intern(&mut self, entry: ConstantEntry) -> Result<PoolIndex, PoolError> {
        if let Some(position) = self.entries.get_index_of(&entry) {
            return Ok(Self::index_from_position(position));
        }
        if self.entries.len() >= self.limit {
            return Err(PoolError::LimitReached {
                attempted: entry,
                limit: self.limit,
            });
        }
        let (position, _) = self.entries.insert_full(entry);
        tracing::trace!(
            "pool[{}] = {} ({} of {} entries used)",
            position,
            self.entries
                .get_index(position)
                .map_or_else(String::new, ToString::to_string),
            self.entries.len(),
            self.limit
        );
        Ok(Self::index_from_position(position))
    }

    /// Freeze the pool into its final serialized order; an entry's position
    /// is its index.
    #[must_use]
    pub fn into_entries(self) -> Vec<ConstantEntry> {
        self.entries.into_iter().collect()
    }

    fn index_from_position(position: usize) -> PoolIndex {
        // The limit is clamped to MAX_POOL_ENTRIES, so positions always fit
        #[allow(clippy::cast_possible_truncation)]
        PoolIndex::new_unchecked(position as u16)
    }
}

/// A class-local raw constant as the class-file parser hands it over.
/// Entries reference each other by 1-based class-local index, exactly as in
/// the source format; string payloads are still modified UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub enum RawConstant {
    /// Modified UTF-8 bytes
    Utf8(Vec<u8>),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name: RawPoolIndex },
    String { utf8: RawPoolIndex },
    FieldRef {
        class: RawPoolIndex,
        name_and_type: RawPoolIndex,
    },
    MethodRef {
        class: RawPoolIndex,
        name_and_type: RawPoolIndex,
    },
    InterfaceMethodRef {
        class: RawPoolIndex,
        name_and_type: RawPoolIndex,
    },
    NameAndType {
        name: RawPoolIndex,
        descriptor: RawPoolIndex,
    },
    /// The dead slot after an 8-byte constant. The source format keeps these
    /// gaps, so the parser hands them through to preserve indices.
    Unusable,
}

/// The raw constant table of one class being converted.
#[derive(Debug, Clone, Default)]
pub struct RawConstants {
    entries: Vec<RawConstant>,
}
impl RawConstants {
    #[must_use]
    pub fn new(entries: Vec<RawConstant>) -> RawConstants {
        RawConstants { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: RawPoolIndex) -> Result<&RawConstant, PoolError> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(usize::from(i)))
            .ok_or(PoolError::BadRawIndex { index })
    }

    /// Decode the utf8 entry at the index
    pub fn text(&self, index: RawPoolIndex) -> Result<String, PoolError> {
        if let RawConstant::Utf8(bytes) = self.get(index)? {
            cesu8::from_java_cesu8(bytes)
                .map(std::borrow::Cow::into_owned)
                .map_err(|_| PoolError::InvalidUtf8 { index })
        } else {
            Err(PoolError::BadRawType {
                index,
                expected: "utf8",
            })
        }
    }

    pub fn class_name(&self, index: RawPoolIndex) -> Result<String, PoolError> {
        if let RawConstant::Class { name } = self.get(index)? {
            self.text(*name)
        } else {
            Err(PoolError::BadRawType {
                index,
                expected: "class",
            })
        }
    }

    pub fn name_and_type(&self, index: RawPoolIndex) -> Result<(String, String), PoolError> {
        if let RawConstant::NameAndType { name, descriptor } = self.get(index)? {
            Ok((self.text(*name)?, self.text(*descriptor)?))
        } else {
            Err(PoolError::BadRawType {
                index,
                expected: "name-and-type",
            })
        }
    }

    /// Resolve a raw entry into the value the target pool stores, chasing
    /// the class-local reference chains.
    pub fn resolve(&self, index: RawPoolIndex) -> Result<ConstantEntry, PoolError> {
        Ok(match self.get(index)? {
            RawConstant::Integer(v) => ConstantEntry::Integer(*v),
            RawConstant::Float(v) => ConstantEntry::Float(v.to_bits()),
            RawConstant::Long(v) => ConstantEntry::Long(*v),
            RawConstant::Double(v) => ConstantEntry::Double(v.to_bits()),
            // A bare utf8 entry is only a payload for other constants;
            // instructions never index it directly
            RawConstant::Utf8(_) => return Err(PoolError::NotLoadable { index }),
            RawConstant::String { utf8 } => ConstantEntry::String(self.text(*utf8)?),
            RawConstant::Class { name } => ConstantEntry::Class(self.text(*name)?),
            RawConstant::FieldRef {
                class,
                name_and_type,
            } => {
                let class = self.class_name(*class)?;
                let (name, descriptor) = self.name_and_type(*name_and_type)?;
                ConstantEntry::FieldRef {
                    class,
                    name,
                    descriptor,
                }
            }
            RawConstant::MethodRef {
                class,
                name_and_type,
            } => {
                let class = self.class_name(*class)?;
                let (name, descriptor) = self.name_and_type(*name_and_type)?;
                ConstantEntry::MethodRef {
                    class,
                    name,
                    descriptor,
                }
            }
            RawConstant::InterfaceMethodRef {
                class,
                name_and_type,
            } => {
                let class = self.class_name(*class)?;
                let (name, descriptor) = self.name_and_type(*name_and_type)?;
                ConstantEntry::InterfaceMethodRef {
                    class,
                    name,
                    descriptor,
                }
            }
            RawConstant::NameAndType { .. } => {
                let (name, descriptor) = self.name_and_type(index)?;
                ConstantEntry::NameAndType { name, descriptor }
            }
            RawConstant::Unusable => return Err(PoolError::BadRawIndex { index }),
        })
    }
}
