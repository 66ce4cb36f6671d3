//! `Inspect` for standard library and ecosystem types.

use crate::error::FieldError;
use crate::format;
use crate::inspect::{
    Compound, Identity, Inspect, KeyValue, Member, Primitive, Sequence, Shape, TypeMeta,
};
use crate::render::NULL_MARKER;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use indexmap::{IndexMap, IndexSet};
use num_bigint::{BigInt, BigUint};
use std::any::type_name;
use std::borrow::Cow;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::rc::{self, Rc};
use std::sync::{self, Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, TryLockError};
use std::time::{Duration, SystemTime};
use uuid::Uuid;

macro_rules! signed_impls {
    ($($ty:ty)*) => {$(
        impl Inspect for $ty {
            fn classify(&self) -> Shape<'_> {
                Shape::Primitive(Primitive::Int(*self as i128))
            }
        }
    )*};
}

macro_rules! unsigned_impls {
    ($($ty:ty)*) => {$(
        impl Inspect for $ty {
            fn classify(&self) -> Shape<'_> {
                Shape::Primitive(Primitive::UInt(*self as u128))
            }
        }
    )*};
}

signed_impls!(i8 i16 i32 i64 i128 isize);
unsigned_impls!(u8 u16 u32 u64 u128 usize);

impl Inspect for f32 {
    fn classify(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::F32(*self))
    }
}

impl Inspect for f64 {
    fn classify(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::F64(*self))
    }
}

impl Inspect for bool {
    fn classify(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Bool(*self))
    }
}

impl Inspect for char {
    fn classify(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Char(*self))
    }
}

impl Inspect for str {
    fn classify(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Str(Cow::Borrowed(self)))
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl Inspect for String {
    fn classify(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Str(Cow::Borrowed(self.as_str())))
    }

    fn describe(&self) -> String {
        self.clone()
    }
}

impl Inspect for Cow<'_, str> {
    fn classify(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Str(Cow::Borrowed(&**self)))
    }
}

impl Inspect for Path {
    fn classify(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Str(self.to_string_lossy()))
    }
}

impl Inspect for PathBuf {
    fn classify(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Str(self.to_string_lossy()))
    }
}

impl Inspect for () {
    fn classify(&self) -> Shape<'_> {
        Shape::Compound(Compound::tuple(Vec::new()))
    }
}

macro_rules! text_impls {
    ($($ty:ty)*) => {$(
        impl Inspect for $ty {
            fn classify(&self) -> Shape<'_> {
                Shape::Primitive(Primitive::Text(Cow::Owned(self.to_string())))
            }
        }
    )*};
}

text_impls!(BigInt BigUint IpAddr Ipv4Addr Ipv6Addr SocketAddr);

impl Inspect for Uuid {
    fn classify(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Guid(*self))
    }
}

impl Inspect for Duration {
    fn classify(&self) -> Shape<'_> {
        Shape::Primitive(Primitive::Text(Cow::Owned(format!("{:?}", self))))
    }
}

impl<Tz: TimeZone> Inspect for DateTime<Tz>
where
    Tz::Offset: fmt::Display,
{
    fn classify(&self) -> Shape<'_> {
        let text = self.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        Shape::Primitive(Primitive::Text(Cow::Owned(text)))
    }
}

impl Inspect for NaiveDateTime {
    fn classify(&self) -> Shape<'_> {
        let text = self.format("%Y-%m-%dT%H:%M:%S%.f").to_string();
        Shape::Primitive(Primitive::Text(Cow::Owned(text)))
    }
}

impl Inspect for NaiveDate {
    fn classify(&self) -> Shape<'_> {
        let text = self.format("%Y-%m-%d").to_string();
        Shape::Primitive(Primitive::Text(Cow::Owned(text)))
    }
}

impl Inspect for NaiveTime {
    fn classify(&self) -> Shape<'_> {
        let text = self.format("%H:%M:%S%.f").to_string();
        Shape::Primitive(Primitive::Text(Cow::Owned(text)))
    }
}

impl Inspect for SystemTime {
    fn classify(&self) -> Shape<'_> {
        let text = DateTime::<Utc>::from(*self).to_rfc3339_opts(SecondsFormat::AutoSi, true);
        Shape::Primitive(Primitive::Text(Cow::Owned(text)))
    }
}

// Pointer-like handles

impl<T: ?Sized> Inspect for *const T {
    fn classify(&self) -> Shape<'_> {
        Shape::Pointer(self.cast::<()>() as usize)
    }
}

impl<T: ?Sized> Inspect for *mut T {
    fn classify(&self) -> Shape<'_> {
        Shape::Pointer(self.cast::<()>() as usize)
    }
}

impl<T: ?Sized> Inspect for NonNull<T> {
    fn classify(&self) -> Shape<'_> {
        Shape::Pointer(self.as_ptr().cast::<()>() as usize)
    }
}

// Metadata

impl Inspect for TypeMeta {
    fn classify(&self) -> Shape<'_> {
        Shape::Metadata(Cow::Borrowed(self.name()))
    }
}

impl Inspect for Location<'_> {
    fn classify(&self) -> Shape<'_> {
        Shape::Metadata(Cow::Owned(self.to_string()))
    }
}

// Delegates: fn pointers carry their address as target, closures do not.

macro_rules! delegate_impls {
    ($(($($arg:ident),*))*) => {$(
        impl<R, $($arg),*> Inspect for fn($($arg),*) -> R {
            fn classify(&self) -> Shape<'_> {
                Shape::Delegate {
                    signature: Cow::Owned(format::short_type_name(type_name::<Self>())),
                    target: Some(Cow::Owned(format::pointer(*self as usize))),
                }
            }
        }

        impl<'f, R, $($arg),*> Inspect for dyn Fn($($arg),*) -> R + 'f {
            fn classify(&self) -> Shape<'_> {
                Shape::Delegate {
                    signature: Cow::Owned(format::short_type_name(type_name::<Self>())),
                    target: None,
                }
            }
        }

        impl<'f, R, $($arg),*> Inspect for dyn Fn($($arg),*) -> R + Send + Sync + 'f {
            fn classify(&self) -> Shape<'_> {
                Shape::Delegate {
                    signature: Cow::Owned(format::short_type_name(type_name::<Self>())),
                    target: None,
                }
            }
        }
    )*};
}

delegate_impls! { () (A) (A, B) (A, B, C) }

// Wrappers that are rendered as the value they point to.

macro_rules! forward_to_target {
    () => {
        fn classify(&self) -> Shape<'_> {
            (**self).classify()
        }

        fn type_name(&self) -> &'static str {
            (**self).type_name()
        }

        fn identity(&self) -> Identity {
            (**self).identity()
        }

        fn describe(&self) -> String {
            (**self).describe()
        }
    };
}

impl<T: Inspect + ?Sized> Inspect for &T {
    forward_to_target!();
}

impl<T: Inspect + ?Sized> Inspect for &mut T {
    forward_to_target!();
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    forward_to_target!();
}

impl<T: Inspect + ?Sized> Inspect for Rc<T> {
    forward_to_target!();
}

impl<T: Inspect + ?Sized> Inspect for Arc<T> {
    forward_to_target!();
}

impl<T: Inspect + ?Sized> Inspect for Ref<'_, T> {
    forward_to_target!();
}

impl<T: Inspect + ?Sized> Inspect for RefMut<'_, T> {
    forward_to_target!();
}

impl<T: Inspect + ?Sized> Inspect for MutexGuard<'_, T> {
    forward_to_target!();
}

impl<T: Inspect + ?Sized> Inspect for RwLockReadGuard<'_, T> {
    forward_to_target!();
}

impl<T: Inspect> Inspect for Option<T> {
    fn classify(&self) -> Shape<'_> {
        match self {
            Some(value) => value.classify(),
            None => Shape::Null,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Some(value) => value.type_name(),
            None => type_name::<Self>(),
        }
    }

    fn identity(&self) -> Identity {
        match self {
            Some(value) => value.identity(),
            None => Identity::of(self),
        }
    }

    fn describe(&self) -> String {
        match self {
            Some(value) => value.describe(),
            None => NULL_MARKER.to_string(),
        }
    }
}

/// `Err` values render as an inline error marker.
impl<T: Inspect, E: fmt::Display> Inspect for Result<T, E> {
    fn classify(&self) -> Shape<'_> {
        match self {
            Ok(value) => value.classify(),
            Err(error) => Shape::Failed(FieldError::failed(error)),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Ok(value) => value.type_name(),
            Err(_) => type_name::<Self>(),
        }
    }

    fn identity(&self) -> Identity {
        match self {
            Ok(value) => value.identity(),
            Err(_) => Identity::of(self),
        }
    }
}

// Interior mutability: borrow without blocking, fail soft when unavailable.

impl<T: Inspect + Copy> Inspect for Cell<T> {
    fn classify(&self) -> Shape<'_> {
        Shape::Transparent(Member::owned(self.get()))
    }
}

impl<T: Inspect + ?Sized> Inspect for RefCell<T> {
    fn classify(&self) -> Shape<'_> {
        match self.try_borrow() {
            Ok(guard) => Shape::Transparent(Member::owned(guard)),
            Err(error) => Shape::Failed(FieldError::failed(error)),
        }
    }
}

impl<T: Inspect + ?Sized> Inspect for Mutex<T> {
    fn classify(&self) -> Shape<'_> {
        match self.try_lock() {
            Ok(guard) => Shape::Transparent(Member::owned(guard)),
            Err(TryLockError::Poisoned(poisoned)) => {
                Shape::Transparent(Member::owned(poisoned.into_inner()))
            }
            Err(TryLockError::WouldBlock) => {
                Shape::Failed(FieldError::failed("mutex is locked"))
            }
        }
    }
}

impl<T: Inspect + ?Sized> Inspect for RwLock<T> {
    fn classify(&self) -> Shape<'_> {
        match self.try_read() {
            Ok(guard) => Shape::Transparent(Member::owned(guard)),
            Err(TryLockError::Poisoned(poisoned)) => {
                Shape::Transparent(Member::owned(poisoned.into_inner()))
            }
            Err(TryLockError::WouldBlock) => {
                Shape::Failed(FieldError::failed("lock is held for writing"))
            }
        }
    }
}

impl<T: Inspect + ?Sized> Inspect for rc::Weak<T> {
    fn classify(&self) -> Shape<'_> {
        match self.upgrade() {
            Some(strong) => Shape::Transparent(Member::owned(strong)),
            None => Shape::Null,
        }
    }
}

impl<T: Inspect + ?Sized> Inspect for sync::Weak<T> {
    fn classify(&self) -> Shape<'_> {
        match self.upgrade() {
            Some(strong) => Shape::Transparent(Member::owned(strong)),
            None => Shape::Null,
        }
    }
}

// Sequences

impl<T: Inspect> Inspect for [T] {
    fn classify(&self) -> Shape<'_> {
        Shape::Sequence(Sequence::borrowed(self.iter()))
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn classify(&self) -> Shape<'_> {
        Shape::Sequence(Sequence::borrowed(self.iter()))
    }
}

macro_rules! sequence_impls {
    ($($ty:ident<T $(, $extra:ident)*>;)*) => {$(
        impl<T: Inspect $(, $extra)*> Inspect for $ty<T $(, $extra)*> {
            fn classify(&self) -> Shape<'_> {
                Shape::Sequence(Sequence::borrowed(self.iter()))
            }
        }
    )*};
}

sequence_impls! {
    Vec<T>;
    VecDeque<T>;
    LinkedList<T>;
    BTreeSet<T>;
    BinaryHeap<T>;
    HashSet<T, S>;
    IndexSet<T, S>;
}

macro_rules! map_impls {
    ($($ty:ident<K, V $(, $extra:ident)*>;)*) => {$(
        impl<K: Inspect, V: Inspect $(, $extra)*> Inspect for $ty<K, V $(, $extra)*> {
            fn classify(&self) -> Shape<'_> {
                Shape::Sequence(Sequence::owned(
                    self.iter().map(|(key, value)| KeyValue::new(key, value)),
                ))
            }
        }
    )*};
}

map_impls! {
    BTreeMap<K, V>;
    HashMap<K, V, S>;
    IndexMap<K, V, S>;
}

macro_rules! tuple_impls {
    ($(($($idx:tt $name:ident),+))+) => {$(
        impl<$($name: Inspect),+> Inspect for ($($name,)+) {
            fn classify(&self) -> Shape<'_> {
                Shape::Compound(Compound::tuple(vec![$(Member::Borrowed(&self.$idx)),+]))
            }
        }
    )+};
}

tuple_impls! {
    (0 A)
    (0 A, 1 B)
    (0 A, 1 B, 2 C)
    (0 A, 1 B, 2 C, 3 D)
    (0 A, 1 B, 2 C, 3 D, 4 E)
    (0 A, 1 B, 2 C, 3 D, 4 E, 5 F)
}
