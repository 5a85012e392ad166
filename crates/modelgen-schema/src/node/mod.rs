mod association;
mod class;
mod field;

pub use association::Association;
pub use class::{Class, ClassId, Key, Labels};
pub use field::{Annotations, EnumerationValue, Field, FieldMap, FieldSource, Restrictions};
