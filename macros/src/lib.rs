//! Derive macros for reqtrace hook sets
//!
//! This crate provides the procedural macro that turns a plain struct of
//! optional callbacks into a composable hook set.
//!
//! # Available Macros
//!
//! - `#[derive(HookSet)]` - Generates slot composition, introspection, builders and emitters
//!
//! # Example
//!
//! ```ignore
//! use reqtrace_core::{Hook, HookSet};
//!
//! #[derive(HookSet, Clone, Default)]
//! struct JobTrace {
//!     started: Option<Hook<JobStarted>>,
//!     finished: Option<Hook<JobFinished>>,
//! }
//!
//! // Generated:
//! let trace = JobTrace::default().on_started(|info| println!("{info:?}"));
//! trace.emit_started(&JobStarted { id: 7 });
//! assert_eq!(JobTrace::SLOTS, &["started", "finished"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{
    parse_macro_input, parse_quote, Data, DeriveInput, Fields, GenericArgument, PathArguments, Type,
    TypePath,
};

/// Derive macro for hook-set structs
///
/// Every named field of type `Option<Hook<P>>` becomes a slot. Any other
/// field is left alone by composition, so the value supplied by the newer
/// hook set is kept.
///
/// Generates:
/// - `impl HookSet` with `SLOTS`, `compose()` and `is_set()`
/// - `on_<slot>(self, f) -> Self` builder per slot
/// - `emit_<slot>(&self, &P)` per slot, invoking the callback if one is set
/// - `impl Debug` reporting each slot as set or unset
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to an enum, a union or a tuple struct
/// - The struct declares no slot fields
///
/// # Generics
///
/// Type parameters need no bounds of their own. The `HookSet` impl is
/// bounded on the struct itself being `Clone + Send + Sync + 'static`, so
/// it applies to exactly the instantiations that qualify.
///
/// # Example
///
/// ```ignore
/// #[derive(HookSet, Clone, Default)]
/// pub struct ServerTrace {
///     pub got_request: Option<Hook<RequestInfo>>,
///     pub handler_done: Option<Hook<HandlerDoneInfo>>,
/// }
///
/// let trace = ServerTrace::default()
///     .on_got_request(|info| tracing::info!(uri = %info.uri, "request"));
///
/// assert!(trace.is_set("got_request"));
/// assert!(!trace.is_set("handler_done"));
/// ```
#[proc_macro_derive(HookSet)]
pub fn derive_hook_set(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new_spanned(&input, "#[derive(HookSet)] can only be used on structs")
            .to_compile_error()
            .into();
    };

    let Fields::Named(fields) = &data_struct.fields else {
        return syn::Error::new_spanned(
            &input,
            "#[derive(HookSet)] requires a struct with named fields",
        )
        .to_compile_error()
        .into();
    };

    let mut slots: Vec<(&Ident, &Type)> = Vec::new();
    let mut has_other_fields = false;

    for field in &fields.named {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        match slot_payload(&field.ty) {
            Some(payload) => slots.push((ident, payload)),
            None => has_other_fields = true,
        }
    }

    if slots.is_empty() {
        return syn::Error::new_spanned(
            &input,
            "#[derive(HookSet)] found no `Option<Hook<_>>` fields",
        )
        .to_compile_error()
        .into();
    }

    let slot_names: Vec<String> = slots.iter().map(|(ident, _)| ident.unraw().to_string()).collect();

    let hook_set = hook_set_impl(&input, &slots, &slot_names);
    let accessors = accessors_impl(&input, &slots, &slot_names);
    let debug = debug_impl(&input, &slots, &slot_names, has_other_fields);

    TokenStream::from(quote! {
        #hook_set
        #accessors
        #debug
    })
}

/// `impl HookSet`, bounded so that `Self` meets the trait's supertraits
/// whatever bounds the struct declares on its own parameters.
fn hook_set_impl(
    input: &DeriveInput,
    slots: &[(&Ident, &Type)],
    slot_names: &[String],
) -> proc_macro2::TokenStream {
    let name = &input.ident;
    let (_, ty_generics, _) = input.generics.split_for_impl();

    let mut generics = input.generics.clone();
    generics.make_where_clause().predicates.push(parse_quote! {
        #name #ty_generics: ::core::clone::Clone
            + ::core::marker::Send
            + ::core::marker::Sync
            + 'static
    });
    let (impl_generics, _, where_clause) = generics.split_for_impl();

    let compose_stmts = slots.iter().map(|(ident, _)| {
        quote! {
            ::reqtrace_core::compose_slot(&mut self.#ident, old.#ident.as_ref());
        }
    });

    let is_set_arms = slots.iter().zip(slot_names).map(|((ident, _), slot)| {
        quote! { #slot => self.#ident.is_some(), }
    });

    quote! {
        impl #impl_generics ::reqtrace_core::HookSet for #name #ty_generics #where_clause {
            const SLOTS: &'static [&'static str] = &[#(#slot_names),*];

            fn compose(&mut self, old: &Self) {
                #(#compose_stmts)*
            }

            fn is_set(&self, slot: &str) -> bool {
                match slot {
                    #(#is_set_arms)*
                    _ => false,
                }
            }
        }
    }
}

/// `on_<slot>` builders and `emit_<slot>` emitters
fn accessors_impl(
    input: &DeriveInput,
    slots: &[(&Ident, &Type)],
    slot_names: &[String],
) -> proc_macro2::TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let accessors = slots.iter().zip(slot_names).map(|((ident, payload), slot)| {
        let on_fn = format_ident!("on_{}", slot);
        let emit_fn = format_ident!("emit_{}", slot);
        let on_doc = format!(
            "Sets the `{slot}` callback, replacing any callback already in this slot."
        );
        let emit_doc = format!("Invokes the `{slot}` callback with `payload` if one is set.");
        quote! {
            #[doc = #on_doc]
            #[must_use]
            pub fn #on_fn<F>(mut self, hook: F) -> Self
            where
                F: Fn(&#payload) + ::core::marker::Send + ::core::marker::Sync + 'static,
            {
                self.#ident = ::core::option::Option::Some(::std::sync::Arc::new(hook));
                self
            }

            #[doc = #emit_doc]
            pub fn #emit_fn(&self, payload: &#payload) {
                if let ::core::option::Option::Some(hook) = &self.#ident {
                    hook(payload);
                }
            }
        }
    });

    quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #(#accessors)*
        }
    }
}

/// `Debug` listing each slot as set or unset
fn debug_impl(
    input: &DeriveInput,
    slots: &[(&Ident, &Type)],
    slot_names: &[String],
    has_other_fields: bool,
) -> proc_macro2::TokenStream {
    let name = &input.ident;
    let type_name = name.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let debug_fields = slots.iter().zip(slot_names).map(|((ident, _), slot)| {
        quote! { .field(#slot, &::reqtrace_core::SlotState::of(&self.#ident)) }
    });

    let finish = if has_other_fields {
        quote! { .finish_non_exhaustive() }
    } else {
        quote! { .finish() }
    };

    quote! {
        impl #impl_generics ::core::fmt::Debug for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_struct(#type_name)
                    #(#debug_fields)*
                    #finish
            }
        }
    }
}

/// Extracts `P` from a field typed `Option<Hook<P>>`.
///
/// Matching is on the last path segment, so `std::option::Option` and
/// `reqtrace_core::Hook` are recognised as well.
fn slot_payload(ty: &Type) -> Option<&Type> {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return None;
    };
    let option = path.segments.last()?;
    if option.ident != "Option" {
        return None;
    }

    let Type::Path(TypePath { qself: None, path: inner }) = single_type_argument(&option.arguments)?
    else {
        return None;
    };
    let hook = inner.segments.last()?;
    if hook.ident != "Hook" {
        return None;
    }

    single_type_argument(&hook.arguments)
}

fn single_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });
    let first = types.next()?;
    types.next().is_none().then_some(first)
}
