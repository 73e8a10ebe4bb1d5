use proc_macro::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::{
    Expr, ExprLit, Fields, Ident, ItemStruct, Lit, LitStr, Meta, Path, Token, parse_macro_input,
    parse_str, punctuated::Punctuated,
};

const DEFAULT_TRAITS_PATH: &str = "crate::db::dao::base_traits";

struct BaseEntityConfig {
    traits_path: Path,
    active_model_ident: Ident,
    id_field: Ident,
    created_at_field: Ident,
    updated_at_field: Ident,
    created_by_field: Ident,
    updated_by_field: Ident,
}

impl Default for BaseEntityConfig {
    fn default() -> Self {
        Self {
            traits_path: parse_str(DEFAULT_TRAITS_PATH).expect("default traits path should parse"),
            active_model_ident: ident("ActiveModel"),
            id_field: ident("id"),
            created_at_field: ident("created_at"),
            updated_at_field: ident("updated_at"),
            created_by_field: ident("created_by"),
            updated_by_field: ident("updated_by"),
        }
    }
}

struct DataEntityConfig {
    traits_path: Path,
    parent_field: Option<Ident>,
    key_field: Ident,
    value_field: Ident,
}

impl Default for DataEntityConfig {
    fn default() -> Self {
        Self {
            traits_path: parse_str(DEFAULT_TRAITS_PATH).expect("default traits path should parse"),
            parent_field: None,
            key_field: ident("key"),
            value_field: ident("value"),
        }
    }
}

fn ident(name: &str) -> Ident {
    Ident::new(name, proc_macro2::Span::call_site())
}

/// Adds the shared columns (`id`, `created_at`, `updated_at`, `created_by`,
/// `updated_by`) to a sea-orm model and implements the DAO support traits.
#[proc_macro_attribute]
pub fn base_entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated<Meta, Token![,]>::parse_terminated);
    let mut config = BaseEntityConfig::default();
    if let Err(err) = apply_base_args(&mut config, args) {
        return err.to_compile_error().into();
    }

    let mut input = parse_macro_input!(item as ItemStruct);
    let fields = match &mut input.fields {
        Fields::Named(fields) => fields,
        _ => {
            return syn::Error::new_spanned(
                input,
                "base_entity requires a struct with named fields",
            )
            .to_compile_error()
            .into();
        }
    };

    let existing: HashSet<String> = fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref().map(|ident| ident.to_string()))
        .collect();

    let mut leading = Punctuated::<syn::Field, Token![,]>::new();
    let mut trailing = Punctuated::<syn::Field, Token![,]>::new();

    if !existing.contains(&config.id_field.to_string()) {
        let id_ident = &config.id_field;
        leading.push(syn::parse_quote! {
            #[sea_orm(primary_key)]
            pub #id_ident: i32
        });
    }

    for ts_ident in [&config.created_at_field, &config.updated_at_field] {
        if !existing.contains(&ts_ident.to_string()) {
            leading.push(syn::parse_quote! {
                #[sea_orm(default_expr = "Expr::current_timestamp()")]
                pub #ts_ident: sea_orm::entity::prelude::DateTimeWithTimeZone
            });
        }
    }

    for audit_ident in [&config.created_by_field, &config.updated_by_field] {
        if !existing.contains(&audit_ident.to_string()) {
            trailing.push(syn::parse_quote! {
                pub #audit_ident: Option<i32>
            });
        }
    }

    // Relation fields stay last.
    let (relations, columns): (Vec<syn::Field>, Vec<syn::Field>) = fields
        .named
        .iter()
        .cloned()
        .partition(is_relation_field);

    let mut new_fields = leading;
    new_fields.extend(columns);
    new_fields.extend(trailing);
    new_fields.extend(relations);
    fields.named = new_fields;

    let traits_path = config.traits_path;
    let active_model = config.active_model_ident;
    let created_at_field = config.created_at_field;
    let updated_at_field = config.updated_at_field;
    let created_by_field = config.created_by_field;
    let updated_by_field = config.updated_by_field;
    let created_at_column = pascal_ident(&created_at_field);

    let expanded = quote! {
        #input

        impl #traits_path::TimestampedActiveModel for #active_model {
            fn set_created_at(
                &mut self,
                ts: sea_orm::entity::prelude::DateTimeWithTimeZone,
            ) {
                self.#created_at_field = sea_orm::ActiveValue::Set(ts);
            }

            fn set_updated_at(
                &mut self,
                ts: sea_orm::entity::prelude::DateTimeWithTimeZone,
            ) {
                self.#updated_at_field = sea_orm::ActiveValue::Set(ts);
            }
        }

        impl #traits_path::AuditedActiveModel for #active_model {
            fn set_created_by(&mut self, user_id: Option<i32>) {
                self.#created_by_field = sea_orm::ActiveValue::Set(user_id);
            }

            fn set_updated_by(&mut self, user_id: Option<i32>) {
                self.#updated_by_field = sea_orm::ActiveValue::Set(user_id);
            }
        }

        impl #traits_path::HasCreatedAtColumn for Entity {
            fn created_at_column() -> Column {
                Column::#created_at_column
            }
        }
    };

    expanded.into()
}

/// Implements the key/value side-table traits for a model that stores
/// `(parent, key, value)` rows, e.g. `#[data_entity(parent = "property_id")]`.
#[proc_macro_attribute]
pub fn data_entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated<Meta, Token![,]>::parse_terminated);
    let mut config = DataEntityConfig::default();
    if let Err(err) = apply_data_args(&mut config, args) {
        return err.to_compile_error().into();
    }

    let input = parse_macro_input!(item as ItemStruct);
    let Some(parent_field) = config.parent_field else {
        return syn::Error::new_spanned(
            &input.ident,
            "data_entity requires a parent field, e.g. parent = \"property_id\"",
        )
        .to_compile_error()
        .into();
    };

    let Fields::Named(fields) = &input.fields else {
        return syn::Error::new_spanned(input, "data_entity requires a struct with named fields")
            .to_compile_error()
            .into();
    };
    let declared: HashSet<String> = fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref().map(|ident| ident.to_string()))
        .collect();
    for required in [&parent_field, &config.key_field, &config.value_field] {
        if !declared.contains(&required.to_string()) {
            return syn::Error::new_spanned(
                required,
                format!("data_entity field `{required}` is not declared on the model"),
            )
            .to_compile_error()
            .into();
        }
    }

    let traits_path = config.traits_path;
    let key_field = config.key_field;
    let value_field = config.value_field;
    let parent_column = pascal_ident(&parent_field);
    let key_column = pascal_ident(&key_field);

    let expanded = quote! {
        #input

        impl #traits_path::DataEntity for Entity {
            fn parent_column() -> Column {
                Column::#parent_column
            }

            fn key_column() -> Column {
                Column::#key_column
            }
        }

        impl #traits_path::DataModel for Model {
            fn parent_id(&self) -> i32 {
                self.#parent_field
            }

            fn key(&self) -> &str {
                &self.#key_field
            }

            fn value(&self) -> &str {
                &self.#value_field
            }
        }

        impl #traits_path::DataActiveModel for ActiveModel {
            fn new_entry(parent_id: i32, key: String, value: String) -> Self {
                Self {
                    #parent_field: sea_orm::ActiveValue::Set(parent_id),
                    #key_field: sea_orm::ActiveValue::Set(key),
                    #value_field: sea_orm::ActiveValue::Set(value),
                    ..::core::default::Default::default()
                }
            }

            fn set_value(&mut self, value: String) {
                self.#value_field = sea_orm::ActiveValue::Set(value);
            }
        }
    };

    expanded.into()
}

fn is_relation_field(field: &syn::Field) -> bool {
    field.attrs.iter().any(|attr| {
        if !attr.path().is_ident("sea_orm") {
            return false;
        }
        let mut relation = false;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("has_many")
                || meta.path.is_ident("has_one")
                || meta.path.is_ident("belongs_to")
            {
                relation = true;
            }
            if meta.input.peek(Token![=]) {
                let _: Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
        relation
    })
}

fn pascal_ident(field: &Ident) -> Ident {
    let pascal: String = field
        .to_string()
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    Ident::new(&pascal, field.span())
}

fn name_value_args(
    args: Punctuated<Meta, Token![,]>,
) -> Result<Vec<(Ident, LitStr)>, syn::Error> {
    let mut parsed = Vec::new();
    for meta in args {
        let Meta::NameValue(name_value) = meta else {
            return Err(syn::Error::new_spanned(
                meta,
                "expected name-value pair, e.g. traits = \"path::to::traits\"",
            ));
        };

        let Some(ident) = name_value.path.get_ident().cloned() else {
            return Err(syn::Error::new_spanned(
                name_value.path,
                "expected simple identifier for attribute key",
            ));
        };

        let value = match name_value.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit_str),
                ..
            }) => lit_str,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "expected string literal for attribute value",
                ));
            }
        };
        parsed.push((ident, value));
    }
    Ok(parsed)
}

fn parse_traits_path(value: &LitStr) -> Result<Path, syn::Error> {
    value
        .parse::<Path>()
        .map_err(|err| syn::Error::new(value.span(), format!("invalid traits path: {err}")))
}

fn apply_base_args(
    config: &mut BaseEntityConfig,
    args: Punctuated<Meta, Token![,]>,
) -> Result<(), syn::Error> {
    for (key, value) in name_value_args(args)? {
        let field = Ident::new(&value.value(), value.span());
        match key.to_string().as_str() {
            "traits" => config.traits_path = parse_traits_path(&value)?,
            "active_model" => config.active_model_ident = field,
            "id" => config.id_field = field,
            "created_at" => config.created_at_field = field,
            "updated_at" => config.updated_at_field = field,
            "created_by" => config.created_by_field = field,
            "updated_by" => config.updated_by_field = field,
            _ => {
                return Err(syn::Error::new_spanned(
                    key,
                    "unknown base_entity attribute key",
                ));
            }
        }
    }
    Ok(())
}

fn apply_data_args(
    config: &mut DataEntityConfig,
    args: Punctuated<Meta, Token![,]>,
) -> Result<(), syn::Error> {
    for (key, value) in name_value_args(args)? {
        let field = Ident::new(&value.value(), value.span());
        match key.to_string().as_str() {
            "traits" => config.traits_path = parse_traits_path(&value)?,
            "parent" => config.parent_field = Some(field),
            "key" => config.key_field = field,
            "value" => config.value_field = field,
            _ => {
                return Err(syn::Error::new_spanned(
                    key,
                    "unknown data_entity attribute key",
                ));
            }
        }
    }
    Ok(())
}
