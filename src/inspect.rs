//! Introspection: how a value describes itself to the renderer.
//!
//! Every renderable type implements [`Inspect`]. Its one required method,
//! [`Inspect::classify`], answers "what kind of value are you?" with a
//! [`Shape`]. The renderer dispatches on that shape and never looks at the
//! concrete type again.
//!
//! ## Shapes
//!
//! | Shape | Rendered as |
//! |-------|-------------|
//! | [`Shape::Null`] | `null` |
//! | [`Shape::Primitive`] | invariant text, strings quoted |
//! | [`Shape::Pointer`] | `0x00000000DEADBEEF` |
//! | [`Shape::Metadata`] | qualified name or location |
//! | [`Shape::Delegate`] | `fn(i32) -> i32 @ target` |
//! | [`Shape::Sequence`] | `[a, b, +3 more]` |
//! | [`Shape::Compound`] | `key => value` or `(a, b)` |
//! | [`Shape::Flags`] | `Read, Write` |
//! | [`Shape::Object`] | `{ Name: value }` |
//!
//! ## Implementing `Inspect`
//!
//! ```rust
//! use propstring::{to_string, Inspect, Object, Shape};
//!
//! struct Account {
//!     owner: String,
//!     balance: i64,
//! }
//!
//! impl Inspect for Account {
//!     fn classify(&self) -> Shape<'_> {
//!         Shape::Object(
//!             Object::new()
//!                 .field("owner", &self.owner)
//!                 .field("balance", &self.balance)
//!                 .computed("overdrawn", || self.balance < 0),
//!         )
//!     }
//! }
//!
//! let account = Account { owner: "Ann".to_string(), balance: -5 };
//! assert_eq!(
//!     to_string(&account),
//!     r#"{ owner: "Ann", balance: -5, overdrawn: true }"#
//! );
//! ```
//!
//! Plain structs can use [`impl_inspect!`](crate::impl_inspect) instead.

use crate::error::{guarded, FieldError};
use crate::format;
use std::any::type_name;
use std::borrow::Cow;
use std::fmt;
use std::mem;
use uuid::Uuid;

/// A type that can describe its structure to the renderer.
///
/// Only [`classify`](Inspect::classify) is required. Wrapper types
/// (`Box`, `Rc`, `Option`, guards) forward the other methods to the value
/// they wrap so that type annotations and cycle detection see through them.
pub trait Inspect {
    /// Classifies this value into one rendering shape.
    fn classify(&self) -> Shape<'_>;

    /// The runtime type name, as produced by [`std::any::type_name`].
    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// The reference identity used for cycle detection.
    fn identity(&self) -> Identity {
        Identity::of(self)
    }

    /// Plain text used when nested objects are not expanded.
    ///
    /// Defaults to the short type name. Types with a meaningful `Display`
    /// can return that instead.
    fn describe(&self) -> String {
        format::short_type_name(self.type_name())
    }
}

/// The reference identity of a value: its address plus its type.
///
/// Two values are the same node of an object graph when both match. The
/// type name keeps a struct apart from a first field stored at the same
/// address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    address: usize,
    type_name: &'static str,
    zero_sized: bool,
}

impl Identity {
    /// Takes the identity of the value behind `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use propstring::Identity;
    ///
    /// let a = 5u32;
    /// let b = 5u32;
    /// assert_eq!(Identity::of(&a), Identity::of(&a));
    /// assert_ne!(Identity::of(&a), Identity::of(&b));
    /// ```
    #[must_use]
    pub fn of<T: ?Sized>(value: &T) -> Self {
        Identity {
            address: (value as *const T).cast::<()>() as usize,
            type_name: type_name::<T>(),
            zero_sized: mem::size_of_val(value) == 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn address(&self) -> usize {
        self.address
    }

    /// Zero-sized values share one address per type, so their address says
    /// nothing about which instance they are.
    #[inline]
    #[must_use]
    pub const fn is_zero_sized(&self) -> bool {
        self.zero_sized
    }
}

/// The closed classification of a value.
///
/// Variants are listed in the precedence order the renderer applies.
/// `Transparent` and `Failed` are resolution outcomes rather than kinds of
/// value.
pub enum Shape<'a> {
    Null,
    Primitive(Primitive<'a>),
    /// A raw address, rendered as fixed-width hexadecimal.
    Pointer(usize),
    /// Type or location metadata, rendered verbatim and never expanded.
    Metadata(Cow<'a, str>),
    Delegate {
        signature: Cow<'a, str>,
        target: Option<Cow<'a, str>>,
    },
    Sequence(Sequence<'a>),
    Compound(Compound<'a>),
    Flags(Flags),
    Object(Object<'a>),
    /// Render this other value in place of the current one.
    ///
    /// Used by wrappers that must hand out a guard, like `RefCell`.
    Transparent(Member<'a>),
    /// The value could not be read at all.
    Failed(FieldError),
}

impl fmt::Debug for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Shape::Null => "Null",
            Shape::Primitive(_) => "Primitive",
            Shape::Pointer(_) => "Pointer",
            Shape::Metadata(_) => "Metadata",
            Shape::Delegate { .. } => "Delegate",
            Shape::Sequence(_) => "Sequence",
            Shape::Compound(_) => "Compound",
            Shape::Flags(_) => "Flags",
            Shape::Object(_) => "Object",
            Shape::Transparent(_) => "Transparent",
            Shape::Failed(_) => "Failed",
        };
        f.write_str(kind)
    }
}

/// A scalar value with a fixed, culture-invariant text form.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive<'a> {
    Bool(bool),
    Int(i128),
    UInt(u128),
    F32(f32),
    F64(f64),
    /// Quoted, `'` doubled.
    Char(char),
    /// Quoted, `"` doubled.
    Str(Cow<'a, str>),
    /// A unit enum variant, rendered by name.
    Variant(Cow<'a, str>),
    Guid(Uuid),
    /// Pre-formatted text rendered without quotes (dates, big integers).
    Text(Cow<'a, str>),
}

/// A value that is either borrowed from its parent or produced on demand.
pub enum Member<'a> {
    Borrowed(&'a (dyn Inspect + 'a)),
    Owned(Box<dyn Inspect + 'a>),
}

impl<'a> Member<'a> {
    /// Wraps an owned value, e.g. the result of a computed property.
    pub fn owned<T: Inspect + 'a>(value: T) -> Self {
        Member::Owned(Box::new(value))
    }

    #[inline]
    #[must_use]
    pub fn get(&self) -> &(dyn Inspect + 'a) {
        match self {
            Member::Borrowed(value) => *value,
            Member::Owned(value) => value.as_ref(),
        }
    }
}

impl<'a, T: Inspect + 'a> From<&'a T> for Member<'a> {
    fn from(value: &'a T) -> Self {
        Member::Borrowed(value)
    }
}

enum Getter<'a> {
    Ready(Member<'a>),
    Lazy(Box<dyn FnOnce() -> Result<Member<'a>, FieldError> + 'a>),
    Failed(FieldError),
}

/// One named, readable member of an [`Object`].
pub struct Property<'a> {
    name: Cow<'a, str>,
    declared_type: &'static str,
    getter: Getter<'a>,
}

impl<'a> Property<'a> {
    /// A property whose value is already available.
    pub fn new<T: Inspect + 'a>(name: impl Into<Cow<'a, str>>, value: &'a T) -> Self {
        Property {
            name: name.into(),
            declared_type: type_name::<T>(),
            getter: Getter::Ready(Member::Borrowed(value)),
        }
    }

    /// A property computed when it is rendered.
    ///
    /// Errors returned by `getter` are rendered inline, as are panics.
    pub fn lazy<T, E, F>(name: impl Into<Cow<'a, str>>, getter: F) -> Self
    where
        T: Inspect + 'a,
        E: fmt::Display,
        F: FnOnce() -> Result<T, E> + 'a,
    {
        Property {
            name: name.into(),
            declared_type: type_name::<T>(),
            getter: Getter::Lazy(Box::new(move || {
                getter().map(Member::owned).map_err(FieldError::failed)
            })),
        }
    }

    /// A property that is known to be unreadable.
    pub fn failed(
        name: impl Into<Cow<'a, str>>,
        declared_type: &'static str,
        error: FieldError,
    ) -> Self {
        Property {
            name: name.into(),
            declared_type,
            getter: Getter::Failed(error),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub const fn declared_type(&self) -> &'static str {
        self.declared_type
    }

    /// Runs the getter. Panics inside it are reported as
    /// [`FieldError::Panicked`].
    pub fn resolve(self) -> Result<Member<'a>, FieldError> {
        match self.getter {
            Getter::Ready(member) => Ok(member),
            Getter::Lazy(getter) => guarded(getter).and_then(|result| result),
            Getter::Failed(error) => Err(error),
        }
    }
}

/// An ordered list of properties, built in declaration order.
#[derive(Default)]
pub struct Object<'a> {
    properties: Vec<Property<'a>>,
}

impl<'a> Object<'a> {
    #[must_use]
    pub fn new() -> Self {
        Object {
            properties: Vec::new(),
        }
    }

    /// Adds a property that borrows from the inspected value.
    #[must_use]
    pub fn field<T: Inspect + 'a>(mut self, name: impl Into<Cow<'a, str>>, value: &'a T) -> Self {
        self.properties.push(Property::new(name, value));
        self
    }

    /// Adds a property computed from an infallible getter.
    #[must_use]
    pub fn computed<T, F>(self, name: impl Into<Cow<'a, str>>, getter: F) -> Self
    where
        T: Inspect + 'a,
        F: FnOnce() -> T + 'a,
    {
        self.try_computed(name, move || Ok::<T, FieldError>(getter()))
    }

    /// Adds a property computed from a fallible getter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use propstring::{to_string, Inspect, Object, Shape};
    ///
    /// struct Sensor;
    ///
    /// impl Inspect for Sensor {
    ///     fn classify(&self) -> Shape<'_> {
    ///         Shape::Object(
    ///             Object::new()
    ///                 .try_computed("reading", || Err::<f64, _>("sensor offline"))
    ///                 .computed("id", || 7),
    ///         )
    ///     }
    /// }
    ///
    /// assert_eq!(
    ///     to_string(&Sensor),
    ///     "{ reading: <Error: sensor offline>, id: 7 }"
    /// );
    /// ```
    #[must_use]
    pub fn try_computed<T, E, F>(mut self, name: impl Into<Cow<'a, str>>, getter: F) -> Self
    where
        T: Inspect + 'a,
        E: fmt::Display,
        F: FnOnce() -> Result<T, E> + 'a,
    {
        self.properties.push(Property::lazy(name, getter));
        self
    }

    #[must_use]
    pub fn property(mut self, property: Property<'a>) -> Self {
        self.properties.push(property);
        self
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub(crate) fn into_properties(self) -> Vec<Property<'a>> {
        self.properties
    }
}

pub(crate) type Items<'a> = Box<dyn Iterator<Item = Result<Member<'a>, FieldError>> + 'a>;

/// A lazily iterated, ordered run of items.
pub struct Sequence<'a> {
    len: Option<usize>,
    items: Items<'a>,
}

impl<'a> Sequence<'a> {
    /// A sequence of items borrowed from a collection.
    pub fn borrowed<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
        I::IntoIter: 'a,
        T: Inspect + 'a,
    {
        Self::fallible(items.into_iter().map(|item| Ok(Member::Borrowed(item))))
    }

    /// A sequence of items produced on the fly.
    pub fn owned<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
        T: Inspect + 'a,
    {
        Self::fallible(items.into_iter().map(|item| Ok(Member::owned(item))))
    }

    /// A sequence whose items can fail individually.
    ///
    /// A [`FieldError::SequenceBroken`] item ends the sequence.
    pub fn fallible<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Result<Member<'a>, FieldError>>,
        I::IntoIter: 'a,
    {
        let items = items.into_iter();
        let len = match items.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(lower),
            _ => None,
        };
        Sequence {
            len,
            items: Box::new(items),
        }
    }

    /// Overrides the length reported by the iterator.
    #[must_use]
    pub fn with_len(mut self, len: Option<usize>) -> Self {
        self.len = len;
        self
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> Option<usize> {
        self.len
    }

    pub(crate) fn into_parts(self) -> (Option<usize>, Items<'a>) {
        (self.len, self.items)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompoundKind {
    /// A key/value pair, rendered `key => value`.
    Pair,
    /// A positional tuple, rendered `(a, b)`.
    Tuple,
}

/// A small fixed group of values rendered inline.
pub struct Compound<'a> {
    kind: CompoundKind,
    items: Vec<Member<'a>>,
}

impl<'a> Compound<'a> {
    pub fn pair(key: Member<'a>, value: Member<'a>) -> Self {
        Compound {
            kind: CompoundKind::Pair,
            items: vec![key, value],
        }
    }

    pub fn tuple(items: Vec<Member<'a>>) -> Self {
        Compound {
            kind: CompoundKind::Tuple,
            items,
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> CompoundKind {
        self.kind
    }

    pub(crate) fn into_items(self) -> Vec<Member<'a>> {
        self.items
    }
}

/// A bit set with named flags.
///
/// # Examples
///
/// ```rust
/// use propstring::{to_string, Flags, Inspect, Shape};
///
/// const NAMES: &[(&str, u64)] = &[("None", 0), ("Read", 1), ("Write", 2), ("Exec", 4)];
///
/// struct Mode(u8);
///
/// impl Inspect for Mode {
///     fn classify(&self) -> Shape<'_> {
///         Shape::Flags(Flags::new(u64::from(self.0), NAMES))
///     }
/// }
///
/// assert_eq!(to_string(&Mode(3)), "Read, Write");
/// assert_eq!(to_string(&Mode(0)), "None");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flags {
    bits: u64,
    names: &'static [(&'static str, u64)],
}

impl Flags {
    #[must_use]
    pub const fn new(bits: u64, names: &'static [(&'static str, u64)]) -> Self {
        Flags { bits, names }
    }

    #[inline]
    #[must_use]
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    /// Names of the flags covering the bits, in ascending value order.
    ///
    /// Larger (composite) flags are preferred. Returns `None` when some bits
    /// have no name.
    #[must_use]
    pub fn names(&self) -> Option<Vec<&'static str>> {
        if self.bits == 0 {
            return Some(
                self.names
                    .iter()
                    .find(|(_, value)| *value == 0)
                    .map(|(name, _)| vec![*name])
                    .unwrap_or_default(),
            );
        }

        let mut candidates: Vec<&(&'static str, u64)> =
            self.names.iter().filter(|(_, value)| *value != 0).collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        let mut remaining = self.bits;
        let mut matched = Vec::new();
        for (name, value) in candidates {
            if remaining & value == *value {
                remaining &= !value;
                matched.push((*name, *value));
            }
        }

        if remaining != 0 {
            return None;
        }
        matched.sort_by_key(|(_, value)| *value);
        Some(matched.into_iter().map(|(name, _)| name).collect())
    }
}

/// Metadata describing a type, rendered as its qualified name.
///
/// # Examples
///
/// ```rust
/// use propstring::{to_string, TypeMeta};
///
/// assert_eq!(to_string(&TypeMeta::of::<String>()), "alloc::string::String");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeMeta {
    name: &'static str,
}

impl TypeMeta {
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        TypeMeta {
            name: type_name::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// A borrowed key/value entry, rendered as a pair.
///
/// Map implementations yield these as their sequence items.
pub struct KeyValue<'a, K: ?Sized, V: ?Sized> {
    key: &'a K,
    value: &'a V,
}

impl<'a, K: ?Sized, V: ?Sized> KeyValue<'a, K, V> {
    pub fn new(key: &'a K, value: &'a V) -> Self {
        KeyValue { key, value }
    }
}

impl<K: Inspect, V: Inspect> Inspect for KeyValue<'_, K, V> {
    fn classify(&self) -> Shape<'_> {
        Shape::Compound(Compound::pair(
            Member::Borrowed(self.key),
            Member::Borrowed(self.value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERMS: &[(&str, u64)] = &[
        ("None", 0),
        ("Read", 1),
        ("Write", 2),
        ("ReadWrite", 3),
        ("Exec", 4),
    ];

    #[test]
    fn test_flags_prefer_composite_names() {
        assert_eq!(Flags::new(3, PERMS).names(), Some(vec!["ReadWrite"]));
        assert_eq!(
            Flags::new(7, PERMS).names(),
            Some(vec!["ReadWrite", "Exec"])
        );
        assert_eq!(Flags::new(5, PERMS).names(), Some(vec!["Read", "Exec"]));
    }

    #[test]
    fn test_flags_zero_and_unknown_bits() {
        assert_eq!(Flags::new(0, PERMS).names(), Some(vec!["None"]));
        assert_eq!(Flags::new(0, &[("A", 1)]).names(), Some(vec![]));
        assert_eq!(Flags::new(9, PERMS).names(), None);
    }

    #[test]
    fn test_sequence_length_from_exact_iterators() {
        let items = vec![1, 2, 3];
        assert_eq!(Sequence::borrowed(&items).len(), Some(3));

        let filtered = Sequence::owned((0..10).filter(|n| n % 2 == 0));
        assert_eq!(filtered.len(), None);
    }

    #[test]
    fn test_property_resolve_catches_panics() {
        let property = Property::lazy("boom", || -> Result<i32, FieldError> {
            panic!("getter exploded")
        });
        assert_eq!(property.name(), "boom");
        assert_eq!(property.declared_type(), "i32");
        match property.resolve() {
            Err(FieldError::Panicked(message)) => assert_eq!(message, "getter exploded"),
            _ => panic!("Expected panic to be captured"),
        }
    }

    #[test]
    fn test_property_resolve_maps_errors() {
        let property = Property::lazy("io", || Err::<i32, _>("disk offline"));
        match property.resolve() {
            Err(FieldError::Failed(message)) => assert_eq!(message, "disk offline"),
            _ => panic!("Expected failure"),
        }
    }

    #[test]
    fn test_identity_distinguishes_struct_from_first_field() {
        struct Outer {
            inner: u64,
        }
        let outer = Outer { inner: 1 };
        let a = Identity::of(&outer);
        let b = Identity::of(&outer.inner);
        assert_eq!(a.address(), b.address());
        assert_ne!(a, b);
    }
}
