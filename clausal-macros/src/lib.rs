//! Derive macros for the solver configuration.
extern crate proc_macro;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_quote, Attribute, Data, Expr, Fields, Lit, LitStr, Meta, MetaNameValue};
use synstructure::decl_derive;

/// Doc comment lines of a field, in order.
fn doc_strings(attrs: &[Attribute]) -> Vec<LitStr> {
    attrs
        .iter()
        .filter_map(|attr| match attr.parse_meta() {
            Ok(Meta::NameValue(MetaNameValue {
                path,
                lit: Lit::Str(doc_str),
                ..
            })) if path.is_ident("doc") => Some(doc_str),
            _ => None,
        })
        .collect()
}

/// Derives a default instance from the documentation.
///
/// Each field's default is the expression given as `(Default: <expr>)` in its doc comment, falling
/// back to `Default::default()`.
fn derive_doc_default(s: synstructure::Structure) -> TokenStream {
    let variant = match s.variants() {
        [variant] => variant,
        _ => panic!("DocDefault requires a struct"),
    };

    let default_re = regex::Regex::new(r"\(Default: (.*)\)").unwrap();

    let body = variant.construct(|field, _| {
        let mut default_value: Expr = parse_quote!(Default::default());
        for doc_str in doc_strings(&field.attrs) {
            if let Some(captures) = default_re.captures(&doc_str.value()) {
                let expr_str = LitStr::new(captures.get(1).unwrap().as_str(), doc_str.span());
                default_value = expr_str
                    .parse()
                    .expect("error parsing default expression");
            }
        }
        default_value
    });

    s.gen_impl(quote! {
        gen impl Default for @Self {
            fn default() -> Self {
                #body
            }
        }
    })
}

/// Derives a partial update type for a configuration struct.
///
/// For a struct `Foo` this generates `FooUpdate` with an `Option` for every field, which can be
/// deserialized, merged with other updates and applied to a `Foo`. It also adds `Foo::help`
/// listing every option with its documentation.
fn derive_config_update(s: synstructure::Structure) -> TokenStream {
    let ast = s.ast();
    let name = &ast.ident;
    let update_name = format_ident!("{}Update", name);

    let fields = match &ast.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("ConfigUpdate requires named fields"),
        },
        _ => panic!("ConfigUpdate requires a struct"),
    };

    let idents: Vec<_> = fields
        .iter()
        .map(|field| field.ident.clone().unwrap())
        .collect();
    let types: Vec<_> = fields.iter().map(|field| field.ty.clone()).collect();
    let option_names: Vec<_> = idents.iter().map(|ident| ident.to_string()).collect();
    let option_helps: Vec<_> = fields
        .iter()
        .map(|field| {
            doc_strings(&field.attrs)
                .iter()
                .map(|doc_str| doc_str.value().trim().to_owned())
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    let update_doc = format!("Partial update of a [`{}`].", name);

    quote! {
        #[doc = #update_doc]
        #[derive(Default, Debug, Clone, PartialEq, serde::Deserialize)]
        #[serde(deny_unknown_fields)]
        pub struct #update_name {
            #( pub #idents: Option<#types>, )*
        }

        impl #update_name {
            /// An update that changes nothing.
            pub fn new() -> #update_name {
                #update_name::default()
            }

            /// Combine two updates, the values of `other` take precedence.
            pub fn merge(&mut self, other: #update_name) {
                #(
                    if other.#idents.is_some() {
                        self.#idents = other.#idents;
                    }
                )*
            }

            /// Overwrite all options that are set in this update.
            pub fn apply(&self, config: &mut #name) {
                #(
                    if let Some(value) = &self.#idents {
                        config.#idents = value.clone();
                    }
                )*
            }
        }

        impl #name {
            /// Human readable list of all options.
            pub fn help() -> String {
                let mut help = String::new();
                #(
                    help.push_str(#option_names);
                    help.push_str(":\n    ");
                    help.push_str(#option_helps);
                    help.push('\n');
                )*
                help
            }
        }
    }
}

decl_derive!([DocDefault] => derive_doc_default);
decl_derive!([ConfigUpdate] => derive_config_update);
