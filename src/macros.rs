/// Implements [`Inspect`](crate::Inspect) for plain types.
///
/// Three forms are supported:
///
/// - `struct Type { field, ... }`: an object with the listed fields, in the
///   order given. Every field type must implement `Inspect`.
/// - `enum Type { Variant, ... }`: a unit enum rendered by variant name.
///   All variants must be listed.
/// - `flags Type, |v| bits, [Name = value, ...]`: a bit set. `bits` must
///   convert into `u64`.
///
/// # Examples
///
/// ```rust
/// use propstring::{impl_inspect, to_string};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// impl_inspect!(struct Point { x, y });
///
/// #[derive(Clone, Copy)]
/// enum Color {
///     Red,
///     Green,
/// }
/// impl_inspect!(enum Color { Red, Green });
///
/// struct Access(u8);
/// impl_inspect!(flags Access, |a| a.0, [None = 0, Read = 1, Write = 2]);
///
/// assert_eq!(to_string(&Point { x: 1, y: 2 }), "{ x: 1, y: 2 }");
/// assert_eq!(to_string(&Color::Green), "Green");
/// assert_eq!(to_string(&Access(3)), "Read, Write");
/// ```
#[macro_export]
macro_rules! impl_inspect {
    (struct $ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Inspect for $ty {
            fn classify(&self) -> $crate::Shape<'_> {
                $crate::Shape::Object(
                    $crate::Object::new()
                        $(.field(stringify!($field), &self.$field))*
                )
            }
        }
    };

    (enum $ty:ty { $($variant:ident),* $(,)? }) => {
        impl $crate::Inspect for $ty {
            fn classify(&self) -> $crate::Shape<'_> {
                let name = match self {
                    $(Self::$variant => stringify!($variant),)*
                };
                $crate::Shape::Primitive($crate::Primitive::Variant(
                    ::std::borrow::Cow::Borrowed(name),
                ))
            }

            fn describe(&self) -> ::std::string::String {
                match self {
                    $(Self::$variant => stringify!($variant).to_string(),)*
                }
            }
        }
    };

    (flags $ty:ty, |$this:ident| $bits:expr, [$($name:ident = $value:expr),* $(,)?]) => {
        impl $crate::Inspect for $ty {
            fn classify(&self) -> $crate::Shape<'_> {
                const NAMES: &[(&str, u64)] = &[$((stringify!($name), $value)),*];
                let $this = self;
                $crate::Shape::Flags($crate::Flags::new(::std::convert::From::from($bits), NAMES))
            }
        }
    };
}
