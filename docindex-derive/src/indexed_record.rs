use convert_case::{Case, Casing};
use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, DataStruct, DeriveInput, Fields, LitStr, Result, Type};

struct RecordField {
    storage_name: String,
    index: Option<String>,
}

pub(crate) fn generate_record_for_struct(
    ast: &DeriveInput,
    data: &DataStruct,
) -> Result<TokenStream> {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let named = match &data.fields {
        Fields::Named(named) => named,
        _ => {
            return Err(syn::Error::new_spanned(
                ast,
                format!(
                    "Cannot derive IndexedRecord for '{}': only structs with named fields are supported",
                    name
                ),
            ))
        }
    };

    let mut collection = name.to_string().to_case(Case::Camel);
    for attr in &ast.attrs {
        if attr.path().is_ident("record") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("collection") {
                    let s: LitStr = meta.value()?.parse()?;
                    if s.value().trim().is_empty() {
                        return Err(meta.error("Collection name cannot be empty"));
                    }
                    collection = s.value();
                    Ok(())
                } else {
                    Err(meta.error("Unknown record attribute, expected `collection`"))
                }
            })?;
        }
    }

    let id_field = match named.named.first() {
        Some(field) => field,
        None => {
            return Err(syn::Error::new_spanned(
                ast,
                format!("Cannot derive IndexedRecord for '{}': struct has no fields", name),
            ))
        }
    };
    let id_kind = match id_kind_of(&id_field.ty) {
        Some(kind) => kind,
        None => {
            return Err(syn::Error::new_spanned(
                &id_field.ty,
                format!(
                    "The first field of '{}' is its identifier and must be a String or an ObjectId",
                    name
                ),
            ))
        }
    };

    let mut fields = Vec::with_capacity(named.named.len());
    for field in &named.named {
        let ident = field
            .ident
            .as_ref()
            .map(|ident| ident.unraw().to_string())
            .unwrap_or_default();
        fields.push(parse_field(&field.attrs, ident)?);
    }

    let id = &fields[0];
    let id_name = &id.storage_name;
    if id.index.is_some() {
        return Err(syn::Error::new_spanned(
            id_field,
            "The identifier field is indexed by the store and cannot carry an index directive",
        ));
    }

    let field_calls = fields[1..].iter().map(|field| {
        let storage_name = &field.storage_name;
        match &field.index {
            Some(index) => quote! { .field(#storage_name, Some(#index)) },
            None => quote! { .field(#storage_name, None) },
        }
    });

    let gen = quote! {
        impl #impl_generics docindex::schema::IndexedRecord for #name #ty_generics #where_clause {
            fn schema() -> docindex::errors::DocIndexResult<docindex::schema::SchemaDescriptor> {
                docindex::schema::SchemaDescriptor::builder(#collection)
                    .id_field(#id_name, #id_kind)
                    #(#field_calls)*
                    .build()
            }
        }
    };

    Ok(TokenStream::from(gen))
}

fn parse_field(attrs: &[Attribute], ident: String) -> Result<RecordField> {
    let mut record_field = RecordField {
        storage_name: ident,
        index: None,
    };

    for attr in attrs {
        if attr.path().is_ident("record") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let s: LitStr = meta.value()?.parse()?;
                    record_field.storage_name = s.value();
                    Ok(())
                } else if meta.path.is_ident("index") {
                    if record_field.index.is_some() {
                        return Err(meta.error("Multiple index directives are not allowed"));
                    }
                    let s: LitStr = meta.value()?.parse()?;
                    record_field.index = Some(s.value());
                    Ok(())
                } else {
                    Err(meta.error("Unknown record attribute, expected `name` or `index`"))
                }
            })?;
        }
    }

    Ok(record_field)
}

fn id_kind_of(ty: &Type) -> Option<proc_macro2::TokenStream> {
    let path = match ty {
        Type::Path(type_path) if type_path.qself.is_none() => &type_path.path,
        _ => return None,
    };

    let last = path.segments.last()?;
    if !last.arguments.is_empty() {
        return None;
    }
    if last.ident == "String" {
        Some(quote!(docindex::schema::IdKind::String))
    } else if last.ident == "ObjectId" {
        Some(quote!(docindex::schema::IdKind::ObjectId))
    } else {
        None
    }
}
