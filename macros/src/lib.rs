use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

///
/// A derive macro which implements TryFrom<u8> for a fieldless enum.
///
/// Every variant is matched against its own discriminant, so explicit
/// discriminants (`Send = 0x00`) are honoured and gaps are rejected. The
/// error value is the byte that did not match any variant.
///
/// usage:
/// ```rust
/// #[repr(u8)]
/// #[derive(TryFromByte)]
/// ```
///
#[proc_macro_derive(TryFromByte)]
pub fn try_from_byte(input: TokenStream) -> TokenStream {
    // parse the code into DeriveInput
    let DeriveInput { ident, data, .. } = parse_macro_input!(input);
    let variants = match data {
        syn::Data::Enum(enum_item) => enum_item.variants,
        _ => panic!("TryFromByte only works on Enums"),
    };
    if variants
        .iter()
        .any(|variant| !matches!(variant.fields, syn::Fields::Unit))
    {
        panic!("TryFromByte only works on Enums without variant fields");
    }
    let names: Vec<_> = variants.iter().map(|variant| &variant.ident).collect();

    // spelled `u8` rather than `Self::Error`, which is ambiguous when the enum has an `Error` variant
    let output = quote! {
        impl ::core::convert::TryFrom<u8> for #ident {
            type Error = u8;
            fn try_from(x: u8) -> ::core::result::Result<Self, u8> {
                #(
                    if x == #ident::#names as u8 {
                        return ::core::result::Result::Ok(#ident::#names);
                    }
                )*
                ::core::result::Result::Err(x)
            }
        }
    };
    output.into()
}
