//! # prodgen runtime
//!
//! Items referenced by the code `prodgen` generates for product
//! declarations. Generated files only name paths below this crate, so a
//! consuming crate needs nothing else in scope.
//!
//! A product converts to and from a plain tuple of its fields. Tuples are
//! supported up to [`MAX_ARITY`] elements, which is why the processor
//! rejects declarations with more constructor parameters.

#![cfg_attr(not(test), no_std)]

/// Largest number of fields a generated product may have.
pub const MAX_ARITY: usize = 10;

/// A declaration whose value is fully determined by its ordered fields.
pub trait Product: Sized {
    /// The fields as a tuple, in declaration order.
    type Tuple: Tuple;

    /// Number of fields.
    const ARITY: usize;

    /// Field names, in declaration order.
    const FIELD_NAMES: &'static [&'static str];

    /// Qualified name of the declaration, `::`-separated.
    const TYPE_NAME: &'static str;

    fn into_tuple(self) -> Self::Tuple;

    fn from_tuple(tuple: Self::Tuple) -> Self;

    fn field_name(index: usize) -> Option<&'static str> {
        Self::FIELD_NAMES.get(index).copied()
    }

    /// Rebuilds the value after passing its fields through `f`.
    fn map_tuple<F>(self, f: F) -> Self
    where
        F: FnOnce(Self::Tuple) -> Self::Tuple,
    {
        Self::from_tuple(f(self.into_tuple()))
    }
}

/// Tuples a [`Product`] can convert to.
pub trait Tuple {
    const ARITY: usize;
}

macro_rules! impl_tuple {
    ($len:expr; $($name:ident),*) => {
        impl<$($name),*> Tuple for ($($name,)*) {
            const ARITY: usize = $len;
        }
    };
}

impl_tuple!(0;);
impl_tuple!(1; A);
impl_tuple!(2; A, B);
impl_tuple!(3; A, B, C);
impl_tuple!(4; A, B, C, D);
impl_tuple!(5; A, B, C, D, E);
impl_tuple!(6; A, B, C, D, E, F);
impl_tuple!(7; A, B, C, D, E, F, G);
impl_tuple!(8; A, B, C, D, E, F, G, H);
impl_tuple!(9; A, B, C, D, E, F, G, H, I);
impl_tuple!(10; A, B, C, D, E, F, G, H, I, J);
