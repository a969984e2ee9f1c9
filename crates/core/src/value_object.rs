//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Grades, service levels and other derived figures have no identity of their
/// own; two instances with the same attributes are interchangeable.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum AbcGrade { A, B, C }
///
/// impl ValueObject for AbcGrade {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
