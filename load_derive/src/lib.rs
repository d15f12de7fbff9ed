extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;

/// Derives `cellar::conv::Load` for a struct by reading every field,
/// in declaration order, from the same slice.
#[proc_macro_derive(Load)]
pub fn load_derive(input: TokenStream) -> TokenStream {
    let ast = syn::parse(input).unwrap();

    impl_load(&ast)
}

fn impl_load(ast: &syn::DeriveInput) -> TokenStream {
    let load_trait = quote! { ::cellar::conv::Load };
    let slice_type = quote! { ::cellar::slice::CellSlice };
    let result_type = quote! { ::cellar::slice::ParseResult };

    let name = &ast.ident;
    let gen = match &ast.data {
        syn::Data::Enum(_) => unimplemented!("Derive macro `Load` not implemented for enums"),
        syn::Data::Union(_) => unimplemented!("Derive macro `Load` not implemented for unions"),
        syn::Data::Struct(syn::DataStruct { fields, .. }) => match fields {
            syn::Fields::Unit => {
                quote! {
                    impl #load_trait for #name {
                        fn load_from(_: &mut #slice_type<'_>) -> #result_type<Self> {
                            Ok(Self)
                        }
                    }
                }
            }
            syn::Fields::Unnamed(syn::FieldsUnnamed { unnamed, .. }) => {
                let ty = unnamed.iter().map(|x| &x.ty);
                quote! {
                    impl #load_trait for #name {
                        fn load_from(slice: &mut #slice_type<'_>) -> #result_type<Self> {
                            Ok(Self(#( <#ty as #load_trait>::load_from(slice)? ),*))
                        }
                    }
                }
            }
            syn::Fields::Named(syn::FieldsNamed { named, .. }) => {
                let (fname, ty): (Vec<&syn::Ident>, Vec<&syn::Type>) = named
                    .iter()
                    .map(|x| (x.ident.as_ref().unwrap(), &x.ty))
                    .unzip();
                quote! {
                    impl #load_trait for #name {
                        fn load_from(slice: &mut #slice_type<'_>) -> #result_type<Self> {
                            Ok(Self { #( #fname: <#ty as #load_trait>::load_from(slice)? ),* })
                        }
                    }
                }
            }
        },
    };
    gen.into()
}
