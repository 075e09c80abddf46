use proc_macro::TokenStream;
use proc_macro2::{Literal, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Generics, parse_macro_input, parse_quote};

// SERIALIZABLE MACRO
// ================================================================================================

/// Derives `sui_bcs::Serializable` following the BCS rules for composite types.
///
/// Struct fields are written in declaration order with no names or separators. Enum variants are
/// written as a ULEB128 discriminant equal to the declaration index of the variant, followed by
/// the variant's fields in declaration order. Explicit discriminant values are ignored.
///
/// # Example
///
/// ```ignore
/// #[derive(Serializable)]
/// pub struct Transfer {
///     amount: u64,
///     recipient: SuiAddress,
/// }
/// ```
#[proc_macro_derive(Serializable)]
pub fn serializable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let generics = add_trait_bound(input.generics.clone(), quote!(::sui_bcs::Serializable));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match &input.data {
        Data::Struct(data) => {
            let writes = data.fields.members().map(|member| {
                quote! { ::sui_bcs::Serializable::write_into(&self.#member, target)?; }
            });
            quote! {
                #(#writes)*
                ::core::result::Result::Ok(())
            }
        },
        Data::Enum(data) => {
            let arms = data.variants.iter().enumerate().map(|(index, variant)| {
                let ident = &variant.ident;
                let tag = Literal::u64_unsuffixed(index as u64);
                let bindings = field_bindings(&variant.fields);
                let pattern = match &variant.fields {
                    Fields::Named(_) => quote! { Self::#ident { #(#bindings),* } },
                    Fields::Unnamed(_) => quote! { Self::#ident ( #(#bindings),* ) },
                    Fields::Unit => quote! { Self::#ident },
                };
                quote! {
                    #pattern => {
                        ::sui_bcs::ByteWriter::write_uleb128(target, #tag);
                        #( ::sui_bcs::Serializable::write_into(#bindings, target)?; )*
                    }
                }
            });
            quote! {
                match self {
                    #(#arms)*
                }
                ::core::result::Result::Ok(())
            }
        },
        Data::Union(_) => {
            return syn::Error::new_spanned(&input, "Serializable cannot be derived for unions")
                .to_compile_error()
                .into();
        },
    };

    let expanded = quote! {
        impl #impl_generics ::sui_bcs::Serializable for #name #ty_generics #where_clause {
            fn write_into<__W: ::sui_bcs::ByteWriter>(
                &self,
                target: &mut __W,
            ) -> ::core::result::Result<(), ::sui_bcs::SerializationError> {
                #body
            }
        }
    };

    TokenStream::from(expanded)
}

// DESERIALIZABLE MACRO
// ================================================================================================

/// Derives `sui_bcs::Deserializable`, the inverse of the `Serializable` derive.
///
/// Decoding an enum discriminant with no matching variant fails with
/// `DeserializationError::UnknownVariant` naming the enum.
#[proc_macro_derive(Deserializable)]
pub fn deserializable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let generics = add_trait_bound(input.generics.clone(), quote!(::sui_bcs::Deserializable));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    // structs occupy at least the sum of their fields; enums keep the one-byte default
    let mut min_size = None;
    let body = match &input.data {
        Data::Struct(data) => {
            let sizes = data.fields.iter().map(|field| {
                let ty = &field.ty;
                quote! { <#ty as ::sui_bcs::Deserializable>::min_serialized_size() }
            });
            min_size = Some(quote! {
                fn min_serialized_size() -> usize {
                    0 #(+ #sizes)*
                }
            });
            let construct = construct_fields(quote!(Self), &data.fields);
            quote! { ::core::result::Result::Ok(#construct) }
        },
        Data::Enum(data) => {
            let arms = data.variants.iter().enumerate().map(|(index, variant)| {
                let ident = &variant.ident;
                let tag = Literal::u32_unsuffixed(index as u32);
                let construct = construct_fields(quote!(Self::#ident), &variant.fields);
                quote! { #tag => ::core::result::Result::Ok(#construct), }
            });
            quote! {
                match ::sui_bcs::ByteReader::read_variant_index(source)? {
                    #(#arms)*
                    tag => ::core::result::Result::Err(
                        ::sui_bcs::DeserializationError::UnknownVariant {
                            type_name: ::core::stringify!(#name),
                            tag: ::core::primitive::u64::from(tag),
                        },
                    ),
                }
            }
        },
        Data::Union(_) => {
            return syn::Error::new_spanned(&input, "Deserializable cannot be derived for unions")
                .to_compile_error()
                .into();
        },
    };

    let expanded = quote! {
        impl #impl_generics ::sui_bcs::Deserializable for #name #ty_generics #where_clause {
            fn read_from<__R: ::sui_bcs::ByteReader>(
                source: &mut __R,
            ) -> ::core::result::Result<Self, ::sui_bcs::DeserializationError> {
                #body
            }

            #min_size
        }
    };

    TokenStream::from(expanded)
}

// HELPERS
// ================================================================================================

/// Requires every type parameter to implement `bound`.
fn add_trait_bound(mut generics: Generics, bound: TokenStream2) -> Generics {
    let params: Vec<_> = generics.type_params().map(|param| param.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause.predicates.push(parse_quote!(#param: #bound));
    }
    generics
}

/// Names bound to the fields of a variant in a match pattern.
fn field_bindings(fields: &Fields) -> Vec<TokenStream2> {
    match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .map(|field| {
                let ident = &field.ident;
                quote!(#ident)
            })
            .collect(),
        Fields::Unnamed(unnamed) => (0..unnamed.unnamed.len())
            .map(|index| {
                let ident = format_ident!("field_{}", index);
                quote!(#ident)
            })
            .collect(),
        Fields::Unit => Vec::new(),
    }
}

/// Builds `path { a: read?, .. }`, `path(read?, ..)` or `path`, reading fields in order.
fn construct_fields(path: TokenStream2, fields: &Fields) -> TokenStream2 {
    let read = quote! { ::sui_bcs::Deserializable::read_from(source)? };
    match fields {
        Fields::Named(named) => {
            let fields = named.named.iter().map(|field| {
                let ident = &field.ident;
                quote! { #ident: #read }
            });
            quote! { #path { #(#fields),* } }
        },
        Fields::Unnamed(unnamed) => {
            let fields = unnamed.unnamed.iter().map(|_| &read);
            quote! { #path ( #(#fields),* ) }
        },
        Fields::Unit => path,
    }
}
