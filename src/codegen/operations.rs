//! One token generator per derived operation.

use proc_macro2::{Literal, TokenStream};
use quote::quote;
use strum::{AsRefStr, Display, EnumIter};
use syn::{Index, Member, Path, Type};

/// Operations the generator can derive for a product declaration.
///
/// Rendering always follows declaration order of this enum, whatever order
/// the configuration lists them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, AsRefStr, EnumIter)]
pub enum DerivedOperation {
    PartialEq,
    /// Requires every field type to implement `Hash`, so floats rule it out.
    Hash,
    /// Formats each field with its `Debug` impl.
    Display,
    Product,
}

impl DerivedOperation {
    /// Operations rendered when the configuration does not say otherwise.
    /// They only require field types to implement `PartialEq` and `Debug`.
    pub const DEFAULTS: [DerivedOperation; 3] = [
        DerivedOperation::PartialEq,
        DerivedOperation::Display,
        DerivedOperation::Product,
    ];
}

/// Everything an operation needs to know about one declaration.
pub struct RenderContext {
    /// Path of the declaration from the generated file.
    pub ty: Path,
    /// Path of the runtime crate.
    pub runtime: Path,
    pub qualified_name: String,
    /// Last segment of the declaration's name.
    pub display_name: String,
    pub members: Vec<Member>,
    pub field_names: Vec<String>,
    pub field_types: Vec<Type>,
}

impl DerivedOperation {
    pub fn render(&self, cx: &RenderContext) -> TokenStream {
        match self {
            DerivedOperation::PartialEq => partial_eq(cx),
            DerivedOperation::Hash => hash(cx),
            DerivedOperation::Display => display(cx),
            DerivedOperation::Product => product(cx),
        }
    }
}

fn partial_eq(cx: &RenderContext) -> TokenStream {
    let ty = &cx.ty;
    let members = &cx.members;
    let body = match members.split_first() {
        None => quote! {
            let _ = other;
            true
        },
        Some((first, rest)) => quote! {
            self.#first == other.#first #(&& self.#rest == other.#rest)*
        },
    };

    quote! {
        impl ::core::cmp::PartialEq for #ty {
            fn eq(&self, other: &Self) -> bool {
                #body
            }
        }
    }
}

fn hash(cx: &RenderContext) -> TokenStream {
    let ty = &cx.ty;
    let members = &cx.members;
    let body = if members.is_empty() {
        quote! { let _ = state; }
    } else {
        quote! { #(::core::hash::Hash::hash(&self.#members, state);)* }
    };

    quote! {
        impl ::core::hash::Hash for #ty {
            fn hash<__H: ::core::hash::Hasher>(&self, state: &mut __H) {
                #body
            }
        }
    }
}

/// `Point(x=1, y=2)`, `Tagged(label="a")`; `Empty()` without fields.
fn display(cx: &RenderContext) -> TokenStream {
    let ty = &cx.ty;
    let members = &cx.members;
    let pieces = cx
        .field_names
        .iter()
        .map(|name| format!("{}={{:?}}", name))
        .collect::<Vec<_>>()
        .join(", ");
    let format = format!("{}({})", cx.display_name, pieces);

    quote! {
        impl ::core::fmt::Display for #ty {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::write!(f, #format #(, self.#members)*)
            }
        }
    }
}

fn product(cx: &RenderContext) -> TokenStream {
    let ty = &cx.ty;
    let runtime = &cx.runtime;
    let members = &cx.members;
    let types = &cx.field_types;
    let names = &cx.field_names;
    let qualified = &cx.qualified_name;
    let arity = Literal::usize_unsuffixed(members.len());
    let indices = (0..members.len()).map(Index::from).collect::<Vec<_>>();
    let from_tuple_prelude = if members.is_empty() {
        quote! { let _ = tuple; }
    } else {
        quote! {}
    };

    quote! {
        impl #runtime::Product for #ty {
            type Tuple = (#(#types,)*);
            const ARITY: usize = #arity;
            const FIELD_NAMES: &'static [&'static str] = &[#(#names),*];
            const TYPE_NAME: &'static str = #qualified;

            fn into_tuple(self) -> Self::Tuple {
                (#(self.#members,)*)
            }

            fn from_tuple(tuple: Self::Tuple) -> Self {
                #from_tuple_prelude
                Self { #(#members: tuple.#indices),* }
            }
        }
    }
}
