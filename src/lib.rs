//! # propstring
//!
//! Cycle-safe, depth-limited rendering of arbitrary object graphs into
//! single-line, human-readable strings for diagnostics and logging.
//!
//! ## What does it produce?
//!
//! ```text
//! { Name: "Ann", Age: 41, Tags: ["admin", "ops", +3 more], Manager: <Circular reference> }
//! ```
//!
//! The output is deterministic for a given graph and options, and rendering
//! never fails: getter errors, panics in user code, cycles and excessive
//! nesting all degrade to inline markers.
//!
//! ## Key Features
//!
//! - **Cycle-safe**: an object already being rendered further up the path is
//!   printed as `<Circular reference>`
//! - **Depth-limited**: nesting beyond `max_recursion_level` is printed as
//!   `<Recursion limit reached>`
//! - **Fail-soft**: a failing property becomes `<Error: message>` and its
//!   siblings still render
//! - **Typed**: optional declared-type and runtime-type annotations
//! - **Serde bridge**: anything that implements `Serialize` can be rendered
//!   through [`to_string_serialize`]
//!
//! ## Quick Start
//!
//! ```rust
//! use propstring::{impl_inspect, to_string};
//!
//! struct User {
//!     id: u32,
//!     name: String,
//!     roles: Vec<&'static str>,
//! }
//!
//! impl_inspect!(struct User { id, name, roles });
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     roles: vec!["admin", "dev"],
//! };
//!
//! assert_eq!(
//!     to_string(&user),
//!     r#"{ id: 123, name: "Alice", roles: ["admin", "dev"] }"#
//! );
//! ```
//!
//! ### Options
//!
//! ```rust
//! use propstring::{to_string_with_options, RenderOptions};
//!
//! let options = RenderOptions::new()
//!     .with_max_collection_item_count(2)
//!     .with_root_actual_type(true);
//!
//! assert_eq!(
//!     to_string_with_options(&vec![1u8, 2, 3, 4], options),
//!     "Vec<u8> :: [1, 2, +2 more]"
//! );
//! ```
//!
//! ### Types that only implement `Serialize`
//!
//! ```rust
//! use propstring::{to_string_serialize, RenderOptions};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let text = to_string_serialize(&Point { x: 1, y: 2 }, RenderOptions::default()).unwrap();
//! assert_eq!(text, "{ x: 1, y: 2 }");
//! ```
//!
//! ### Logging
//!
//! [`display`] renders lazily, only when the log line is actually written:
//!
//! ```rust
//! use propstring::display;
//!
//! let request = vec![("id", 7)];
//! tracing::debug!(request = %propstring::display(&request), "handling request");
//! ```
//!
//! The renderer itself emits `tracing` events at `trace` level for cycles
//! and depth cut-offs, and at `debug` level for swallowed getter failures.
//! No subscriber is installed by this crate.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Rendering a small object graph
//! - **`custom_options.rs`** - Limits, annotations and cyclic graphs
//!
//! Run any example with: `cargo run --example <name>`

pub mod error;
pub mod format;
mod impls;
pub mod inspect;
pub mod macros;
pub mod map;
pub mod options;
pub mod render;
pub mod ser;
pub mod value;
mod visited;

pub use error::{Error, FieldError, Result};
pub use format::short_type_name;
pub use inspect::{
    Compound, CompoundKind, Flags, Identity, Inspect, KeyValue, Member, Object, Primitive,
    Property, Sequence, Shape, TypeMeta,
};
pub use map::ValueMap;
pub use options::{RenderOptions, DEFAULT_MAX_RECURSION_LEVEL};
pub use render::{Rendered, Renderer, CYCLE_MARKER, NULL_MARKER, RECURSION_LIMIT_MARKER};
pub use ser::ValueSerializer;
pub use value::{Number, Value};

use serde::Serialize;
use std::io;
use tracing::debug;

/// Renders `value` with default options.
///
/// # Examples
///
/// ```rust
/// use propstring::to_string;
///
/// assert_eq!(to_string(&Some(vec![1, 2])), "[1, 2]");
/// assert_eq!(to_string(&None::<i32>), "null");
/// ```
#[must_use]
pub fn to_string<T>(value: &T) -> String
where
    T: ?Sized + Inspect,
{
    to_string_with_options(value, RenderOptions::default())
}

/// Renders `value` with custom options.
///
/// A null root renders as `null`; use [`to_string_checked`] to reject it.
///
/// # Examples
///
/// ```rust
/// use propstring::{to_string_with_options, RenderOptions};
///
/// let options = RenderOptions::new().with_max_collection_item_count(3);
/// assert_eq!(to_string_with_options(&(1..=10).collect::<Vec<_>>(), options), "[1, 2, 3, +7 more]");
/// ```
#[must_use]
pub fn to_string_with_options<T>(value: &T, options: RenderOptions) -> String
where
    T: ?Sized + Inspect,
{
    let mut renderer = Renderer::new(options);
    renderer.render(value);
    renderer.into_inner()
}

/// Renders `value`, rejecting a root that is null.
///
/// # Examples
///
/// ```rust
/// use propstring::{to_string_checked, RenderOptions};
///
/// let text = to_string_checked(&Some(5), RenderOptions::default()).unwrap();
/// assert_eq!(text, "5");
/// assert!(to_string_checked(&None::<i32>, RenderOptions::default()).is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the root, seen through any
/// wrappers, is null.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_checked<T>(value: &T, options: RenderOptions) -> Result<String>
where
    T: ?Sized + Inspect,
{
    if render::resolves_to_null(&value) {
        debug!(type_name = value.type_name(), "rejected null root");
        return Err(Error::invalid_argument("value", "root value is null"));
    }
    Ok(to_string_with_options(value, options))
}

/// Renders `value` into a writer.
///
/// # Examples
///
/// ```rust
/// use propstring::{to_writer, RenderOptions};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &[true, false], RenderOptions::default()).unwrap();
/// assert_eq!(buffer, b"[true, false]");
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T, options: RenderOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Inspect,
{
    let rendered = to_string_with_options(value, options);
    writer
        .write_all(rendered.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Wraps `value` for lazy rendering through `Display`.
///
/// # Examples
///
/// ```rust
/// use propstring::display;
///
/// let line = format!("state={}", display(&("idle", 3)));
/// assert_eq!(line, r#"state=("idle", 3)"#);
/// ```
#[must_use]
pub fn display<T>(value: &T) -> Rendered<'_, T>
where
    T: ?Sized + Inspect,
{
    Rendered::new(value)
}

/// Converts any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use propstring::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value.as_object().and_then(|o| o.get("x")), Some(&Value::from(1)));
/// ```
///
/// # Errors
///
/// Returns an error if the `Serialize` implementation reports one.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Renders any `T: Serialize` by way of [`to_value`].
///
/// Serialized data is a tree, so cycles cannot occur; the depth and item
/// limits still apply.
///
/// # Errors
///
/// Returns an error if the `Serialize` implementation reports one.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_serialize<T>(value: &T, options: RenderOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let value = to_value(value)?;
    Ok(to_string_with_options(&value, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    struct Failing;

    impl io::Write for Failing {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_root_annotation() {
        let options = RenderOptions::new().with_root_actual_type(true);
        assert_eq!(to_string_with_options(&15789632, options), "i32 :: 15789632");
    }

    #[test]
    fn test_null_root() {
        assert_eq!(to_string(&None::<String>), "null");
        let err = to_string_checked(&None::<String>, RenderOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { name: "value", .. }));
    }

    #[test]
    fn test_null_root_is_never_annotated() {
        let options = RenderOptions::typed();
        assert_eq!(to_string_with_options(&None::<u8>, options), "null");
    }

    #[test]
    fn test_writer_errors_are_reported() {
        let err = to_writer(Failing, &1, RenderOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "IO error: pipe closed");
    }

    #[test]
    fn test_to_value_and_serialize_bridge() {
        let point = Point { x: 1, y: 2 };
        match to_value(&point).unwrap() {
            Value::Object { name, fields } => {
                assert_eq!(name, "Point");
                assert_eq!(fields.get("x"), Some(&Value::Number(Number::I32(1))));
            }
            other => panic!("Expected object, got {:?}", other),
        }

        let options = RenderOptions::new().with_root_actual_type(true);
        assert_eq!(
            to_string_serialize(&point, options).unwrap(),
            "Point :: { x: 1, y: 2 }"
        );
    }

    #[test]
    fn test_display_adapter() {
        let values = vec!["a"; 4];
        let short = display(&values)
            .with_options(RenderOptions::new().with_max_collection_item_count(1));
        assert_eq!(format!("{}", short), r#"["a", +3 more]"#);
        assert_eq!(format!("{:?}", display(&values)), r#"["a", "a", "a", "a"]"#);
    }
}
