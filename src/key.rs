//! Cache keys built from call arguments.
//!
//! A memoized computation is looked up by the arguments it was called with.
//! Two shapes of argument are supported:
//!
//! - **Typed arguments**: any of the primitive types, `String`, `Vec<T>` or a
//!   tuple of these. They are their own key and are hashable by construction.
//! - **Dynamic arguments**: [`CallArgs`], an ordered list of positional
//!   [`ArgValue`]s plus a set of named ones. They are normalized into an
//!   [`ArgsKey`] according to a [`KeyPolicy`].
//!
//! # Normalization
//!
//! An [`ArgsKey`] is the positional values in call order paired with the named
//! values sorted by name, so the order in which named arguments were supplied
//! never matters while positional order always does.
//!
//! Whether `f(1, 2)` and `f(a = 1, b = 2)` are the same call depends on the
//! policy. [`KeyPolicy::Distinct`] keeps positional and named arguments apart,
//! so the two calls are cached separately. [`KeyPolicy::Unified`] knows the
//! parameter names and folds named arguments into their positional slots, so
//! both calls share one entry.
//!
//! ```
//! use memo_cache::{call_args, KeyPolicy, MemoArgs};
//!
//! let by_position = call_args![1, 2];
//! let by_name = call_args![; a = 1, b = 2];
//!
//! let distinct = KeyPolicy::Distinct;
//! assert_ne!(
//!     by_position.to_key(&distinct).unwrap(),
//!     by_name.to_key(&distinct).unwrap()
//! );
//!
//! let unified = KeyPolicy::Unified { params: &["a", "b"] };
//! assert_eq!(
//!     by_position.to_key(&unified).unwrap(),
//!     by_name.to_key(&unified).unwrap()
//! );
//! ```
//!
//! # Hashability
//!
//! Every [`ArgValue`] has a stable equality and hash except a floating point
//! `NaN`, which is not equal to itself. A `NaN` anywhere in the arguments makes
//! key construction fail with [`KeyError::Unhashable`]. `-0.0` and `0.0` are the
//! same key. Values of different variants are never equal: `Int(1)`,
//! `UInt(1)` and `Float(1.0)` are three distinct keys.

extern crate alloc;

use crate::error::KeyError;
use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};
use core::mem;

/// A single argument value in a dynamic call.
#[derive(Debug, Clone)]
pub enum ArgValue {
    /// The absence of a value.
    Unit,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A float. `NaN` is rejected when building a key.
    Float(f64),
    /// A string.
    Str(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// An ordered sequence of values.
    Seq(Vec<ArgValue>),
}

/// Bit pattern used for float equality and hashing, with both zeros merged.
#[inline]
fn float_bits(f: f64) -> u64 {
    if f == 0.0 {
        0
    } else {
        f.to_bits()
    }
}

impl ArgValue {
    /// Rejects values without a stable equality, naming where they sit.
    fn check_hashable(&self, path: &mut String) -> Result<(), KeyError> {
        match self {
            ArgValue::Float(f) if f.is_nan() => Err(KeyError::Unhashable {
                path: path.clone(),
                reason: "NaN is not equal to itself",
            }),
            ArgValue::Seq(items) => {
                for (i, item) in items.iter().enumerate() {
                    let len = path.len();
                    path.push_str(&format!("[{}]", i));
                    item.check_hashable(path)?;
                    path.truncate(len);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl PartialEq for ArgValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ArgValue::Unit, ArgValue::Unit) => true,
            (ArgValue::Bool(a), ArgValue::Bool(b)) => a == b,
            (ArgValue::Int(a), ArgValue::Int(b)) => a == b,
            (ArgValue::UInt(a), ArgValue::UInt(b)) => a == b,
            (ArgValue::Float(a), ArgValue::Float(b)) => float_bits(*a) == float_bits(*b),
            (ArgValue::Str(a), ArgValue::Str(b)) => a == b,
            (ArgValue::Bytes(a), ArgValue::Bytes(b)) => a == b,
            (ArgValue::Seq(a), ArgValue::Seq(b)) => a == b,
            _ => false,
        }
    }
}

// Keys only ever hold NaN-free values, so bitwise float equality is reflexive.
impl Eq for ArgValue {}

impl Hash for ArgValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            ArgValue::Unit => {}
            ArgValue::Bool(b) => b.hash(state),
            ArgValue::Int(i) => i.hash(state),
            ArgValue::UInt(u) => u.hash(state),
            ArgValue::Float(f) => float_bits(*f).hash(state),
            ArgValue::Str(s) => s.hash(state),
            ArgValue::Bytes(b) => b.hash(state),
            ArgValue::Seq(items) => items.hash(state),
        }
    }
}

macro_rules! arg_value_from {
    ($variant:ident as $target:ty: $($t:ty),+) => {
        $(
            impl From<$t> for ArgValue {
                fn from(v: $t) -> Self {
                    ArgValue::$variant(<$target>::from(v))
                }
            }
        )+
    };
}

arg_value_from!(Int as i64: i8, i16, i32, i64);
arg_value_from!(UInt as u64: u8, u16, u32, u64);
arg_value_from!(Float as f64: f32, f64);

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl From<()> for ArgValue {
    fn from(_: ()) -> Self {
        ArgValue::Unit
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_owned())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}

impl From<&[u8]> for ArgValue {
    fn from(b: &[u8]) -> Self {
        ArgValue::Bytes(b.to_vec())
    }
}

impl From<Vec<ArgValue>> for ArgValue {
    fn from(items: Vec<ArgValue>) -> Self {
        ArgValue::Seq(items)
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ArgValue::Unit, Into::into)
    }
}

/// Arguments of one dynamic call: positional values in order plus named values.
///
/// ```
/// use memo_cache::CallArgs;
///
/// let args = CallArgs::new().arg(1).arg(2).named("c", 3).named("d", 4);
/// assert_eq!(args.positional().len(), 2);
/// assert_eq!(args.named_args().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<ArgValue>,
    named: Vec<(String, ArgValue)>,
}

impl CallArgs {
    /// An empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Into<ArgValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Adds a named argument. Supplying the same name twice is reported when
    /// the key is built.
    pub fn named(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    /// Positional arguments in call order.
    pub fn positional(&self) -> &[ArgValue] {
        &self.positional
    }

    /// Named arguments in the order they were supplied.
    pub fn named_args(&self) -> &[(String, ArgValue)] {
        &self.named
    }

    /// Looks up a named argument.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.named.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    fn normalize(&self, policy: &KeyPolicy) -> Result<ArgsKey, KeyError> {
        let mut path = String::new();
        for (i, value) in self.positional.iter().enumerate() {
            path.clear();
            path.push_str(&format!("args[{}]", i));
            value.check_hashable(&mut path)?;
        }
        for (name, value) in &self.named {
            path.clear();
            path.push_str(&format!("kwargs.{}", name));
            value.check_hashable(&mut path)?;
        }

        let mut named = self.named.clone();
        named.sort_by(|a, b| a.0.cmp(&b.0));
        if let Some(pair) = named.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(KeyError::DuplicateArgument {
                name: pair[0].0.clone(),
            });
        }

        let mut positional = self.positional.clone();
        if let KeyPolicy::Unified { params } = policy {
            let bound = positional.len().min(params.len());
            if let Some((name, _)) = named
                .iter()
                .find(|(name, _)| params[..bound].iter().any(|p| *p == name.as_str()))
            {
                return Err(KeyError::DuplicateArgument { name: name.clone() });
            }
            for param in params.iter().skip(positional.len()) {
                match named.binary_search_by(|(name, _)| name.as_str().cmp(*param)) {
                    Ok(idx) => positional.push(named.remove(idx).1),
                    Err(_) => break,
                }
            }
        }

        Ok(ArgsKey { positional, named })
    }
}

/// Builds [`CallArgs`]: positional values, then `;` and `name = value` pairs.
///
/// ```
/// use memo_cache::call_args;
///
/// let args = call_args![1, 2; c = 3, d = 4];
/// assert_eq!(args.positional().len(), 2);
/// assert!(args.get("d").is_some());
///
/// let only_named = call_args![; rate = 0.5];
/// assert!(only_named.positional().is_empty());
/// ```
#[macro_export]
macro_rules! call_args {
    ($($pos:expr),* $(,)? $(; $($name:ident = $val:expr),* $(,)?)?) => {{
        #[allow(unused_mut)]
        let mut args = $crate::CallArgs::new();
        $( args = args.arg($pos); )*
        $($( args = args.named(stringify!($name), $val); )*)?
        args
    }};
}

/// Normalized, hashable form of [`CallArgs`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgsKey {
    positional: Vec<ArgValue>,
    named: Vec<(String, ArgValue)>,
}

impl ArgsKey {
    /// Positional values, including named values folded in by the policy.
    pub fn positional(&self) -> &[ArgValue] {
        &self.positional
    }

    /// Remaining named values, sorted by name.
    pub fn named(&self) -> &[(String, ArgValue)] {
        &self.named
    }
}

/// How named arguments relate to positional ones when building an [`ArgsKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyPolicy {
    /// Positional and named arguments are never merged: `f(1, 2)` and
    /// `f(a = 1, b = 2)` are different keys.
    #[default]
    Distinct,
    /// Named arguments whose names match the next unfilled entries of `params`
    /// are moved into those positional slots, so `f(1, 2)`, `f(1, b = 2)` and
    /// `f(a = 1, b = 2)` are one key. Naming a parameter that was already
    /// passed positionally is a [`KeyError::DuplicateArgument`].
    Unified {
        /// Parameter names in declaration order.
        params: &'static [&'static str],
    },
}

/// Arguments that can be turned into a cache key.
pub trait MemoArgs {
    /// The normalized key type.
    type Key: Hash + Eq + Clone;

    /// Builds the key for these arguments.
    fn to_key(&self, policy: &KeyPolicy) -> Result<Self::Key, KeyError>;
}

impl MemoArgs for CallArgs {
    type Key = ArgsKey;

    fn to_key(&self, policy: &KeyPolicy) -> Result<ArgsKey, KeyError> {
        self.normalize(policy)
    }
}

macro_rules! memo_args_as_key {
    ($($t:ty),+ $(,)?) => {
        $(
            impl MemoArgs for $t {
                type Key = $t;

                #[inline]
                fn to_key(&self, _policy: &KeyPolicy) -> Result<$t, KeyError> {
                    Ok(self.clone())
                }
            }
        )+
    };
}

memo_args_as_key!(
    (), bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, String,
);

impl MemoArgs for &str {
    type Key = String;

    #[inline]
    fn to_key(&self, _policy: &KeyPolicy) -> Result<String, KeyError> {
        Ok((*self).to_owned())
    }
}

impl<T: Hash + Eq + Clone> MemoArgs for Vec<T> {
    type Key = Vec<T>;

    #[inline]
    fn to_key(&self, _policy: &KeyPolicy) -> Result<Vec<T>, KeyError> {
        Ok(self.clone())
    }
}

macro_rules! memo_args_tuple {
    ($($name:ident),+) => {
        impl<$($name: Hash + Eq + Clone),+> MemoArgs for ($($name,)+) {
            type Key = ($($name,)+);

            #[inline]
            fn to_key(&self, _policy: &KeyPolicy) -> Result<Self::Key, KeyError> {
                Ok(self.clone())
            }
        }
    };
}

memo_args_tuple!(A);
memo_args_tuple!(A, B);
memo_args_tuple!(A, B, C);
memo_args_tuple!(A, B, C, D);
memo_args_tuple!(A, B, C, D, E);
memo_args_tuple!(A, B, C, D, E, F);
