extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;

/// Derives `cellar::conv::Store` for a struct by storing every field,
/// in declaration order, into the same builder.
#[proc_macro_derive(Store)]
pub fn store_derive(input: TokenStream) -> TokenStream {
    let ast = syn::parse(input).unwrap();

    impl_store(&ast)
}

fn impl_store(ast: &syn::DeriveInput) -> TokenStream {
    let store_trait = quote! { ::cellar::conv::Store };
    let builder_type = quote! { ::cellar::builder::CellBuilder };
    let result_type = quote! { ::cellar::error::EncodeResult };

    let name = &ast.ident;
    let gen = match &ast.data {
        syn::Data::Enum(_) => unimplemented!("Derive macro `Store` not implemented for enums"),
        syn::Data::Union(_) => unimplemented!("Derive macro `Store` not implemented for unions"),
        syn::Data::Struct(syn::DataStruct { fields, .. }) => match fields {
            syn::Fields::Unit => {
                quote! {
                    impl #store_trait for #name {
                        fn store_into(&self, _: &mut #builder_type) -> #result_type<()> {
                            Ok(())
                        }
                    }
                }
            }
            syn::Fields::Unnamed(syn::FieldsUnnamed { unnamed, .. }) => {
                let i = (0..unnamed.len()).map(syn::Index::from);
                quote! {
                    impl #store_trait for #name {
                        fn store_into(&self, builder: &mut #builder_type) -> #result_type<()> {
                            #( #store_trait::store_into(&self.#i, builder)?; )*
                            Ok(())
                        }
                    }
                }
            }
            syn::Fields::Named(syn::FieldsNamed { named, .. }) => {
                let ident = named.iter().map(|field| field.ident.as_ref().unwrap());
                quote! {
                    impl #store_trait for #name {
                        fn store_into(&self, builder: &mut #builder_type) -> #result_type<()> {
                            #( #store_trait::store_into(&self.#ident, builder)?; )*
                            Ok(())
                        }
                    }
                }
            }
        },
    };
    gen.into()
}
