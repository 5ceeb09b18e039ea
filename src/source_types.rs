//! A [`TypeSystem`] backed by Rust source definitions.
//!
//! Type references are canonical Rust type expressions. Named types are looked
//! up in a [`SourceIndex`] and rendered with the full module path of their
//! definition, so equally named types in different modules stay distinct and
//! one type spelled two ways (`Widget` through a `use`, or
//! `crate::models::Widget`) gets one reference.
//!
//! A path is resolved the way the compiler would for the cases that matter
//! here: `crate::`, `self::` and `super::` prefixes, types defined in the
//! current module, `use` imports (renames and globs included) and child
//! modules. A bare name that is none of these falls back to the single
//! definition of that name anywhere in the crate; when there are several, the
//! name is left unresolved rather than guessed.

use crate::error::{Error, Result};
use crate::routing::ControllerDescriptor;
use crate::source_index::{Definition, DefinitionItem, SourceIndex};
use crate::type_system::{Field, TypeKind, TypeRef, TypeSystem};
use log::debug;
use std::collections::{HashMap, HashSet};
use syn::ext::IdentExt;

/// Wrappers documented as the type they wrap
const TRANSPARENT: &[&str] = &["Option", "Box", "Rc", "Arc", "Cow", "RefCell", "Cell"];
const SEQUENCES: &[&str] = &["Vec", "VecDeque", "LinkedList", "HashSet", "BTreeSet", "IndexSet"];
const MAPS: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];

/// Handler extractors whose inner type is the documented argument
const PAYLOAD_EXTRACTORS: &[&str] = &["Json", "Path", "Query", "Form"];
/// Handler arguments that are framework plumbing rather than API input
const PLUMBING_EXTRACTORS: &[&str] = &[
    "State",
    "Extension",
    "Data",
    "HeaderMap",
    "Request",
    "HttpRequest",
];
/// Return types that carry no documented payload
const UNTYPED_RESPONSES: &[&str] = &["StatusCode", "Response", "HttpResponse"];

/// Type system over indexed Rust sources
pub struct SourceTypeSystem {
    index: SourceIndex,
    /// Type names reported as primitive kinds
    primitives: HashSet<String>,
}

enum Classified<'s> {
    Primitive(String),
    Array(TypeRef),
    Dict(TypeRef, TypeRef),
    Enum(&'s syn::ItemEnum),
    Struct {
        def: &'s Definition,
        item: &'s syn::ItemStruct,
        args: Vec<syn::Type>,
    },
}

impl SourceTypeSystem {
    /// Create a type system treating `primitive_kinds` as leaf types
    pub fn new(index: SourceIndex, primitive_kinds: impl IntoIterator<Item = String>) -> Self {
        Self {
            index,
            primitives: primitive_kinds.into_iter().collect(),
        }
    }

    /// Read a controller descriptor from a handler function's signature.
    ///
    /// Arguments keep their declared order; framework extractors such as
    /// `Json<T>` or `Path<T>` document their inner type and plumbing such as
    /// `State<S>` is left out. The doc comment becomes the summary.
    pub fn controller_for(&self, handler: &str) -> Result<ControllerDescriptor> {
        let unknown = || Error::UnknownHandler {
            handler: handler.to_string(),
        };
        let def = self.index.find_function(handler).ok_or_else(unknown)?;
        let DefinitionItem::Function { attrs, sig, .. } = &def.item else {
            return Err(unknown());
        };
        debug!("Reading controller from handler {}", handler);

        let no_subst = HashMap::new();
        let mut controller = ControllerDescriptor::new();
        controller.summary = doc_text(attrs);

        for input in &sig.inputs {
            let syn::FnArg::Typed(pat_type) = input else {
                continue;
            };
            let Some(ty) = argument_payload(&pat_type.ty) else {
                continue;
            };
            let name = binding_name(&pat_type.pat).ok_or_else(|| Error::UnsupportedHandler {
                handler: handler.to_string(),
                reason: "argument pattern is not a simple binding".to_string(),
            })?;
            let (inner, optional) = strip_option(ty);
            controller.arguments.push(Field {
                name,
                type_ref: TypeRef::new(self.render_type(inner, &def.module, &no_subst)),
                required: !optional,
                doc: None,
            });
        }

        controller.return_type = match &sig.output {
            syn::ReturnType::Default => None,
            syn::ReturnType::Type(_, ty) => return_payload(ty)
                .map(|payload| TypeRef::new(self.render_type(payload, &def.module, &no_subst))),
        };
        Ok(controller)
    }

    fn classify(&self, type_ref: &TypeRef) -> Option<Classified<'_>> {
        let ty = peel(syn::parse_str(type_ref.as_str()).ok()?);
        match ty {
            syn::Type::Slice(slice) => Some(Classified::Array(self.canonical(&slice.elem))),
            syn::Type::Array(array) => Some(Classified::Array(self.canonical(&array.elem))),
            syn::Type::Path(type_path) if type_path.qself.is_none() => {
                let segment = type_path.path.segments.last()?;
                let ident = segment.ident.to_string();
                let args = type_arguments(&segment.arguments);

                if SEQUENCES.contains(&ident.as_str()) && args.len() == 1 {
                    return Some(Classified::Array(self.canonical(&args[0])));
                }
                if MAPS.contains(&ident.as_str()) && args.len() >= 2 {
                    return Some(Classified::Dict(
                        self.canonical(&args[0]),
                        self.canonical(&args[1]),
                    ));
                }

                // User definitions shadow primitive kinds of the same name.
                let path = self.absolute_path(&path_idents(&type_path.path), &[]);
                match self.lookup(&path) {
                    Some(def) => classify_definition(def, args),
                    None if self.primitives.contains(&ident) => Some(Classified::Primitive(ident)),
                    None => None,
                }
            }
            _ => None,
        }
    }

    /// The single type definition a crate-absolute path names
    fn lookup(&self, path: &[String]) -> Option<&Definition> {
        let (ident, qualifier) = path.split_last()?;
        self.index
            .find_local_type(qualifier, ident)
            .or_else(|| self.index.find_type(qualifier, ident))
    }

    /// Turn a path written inside `module` into a path from the crate root
    fn absolute_path(&self, path: &[String], module: &[String]) -> Vec<String> {
        let Some((first, rest)) = path.split_first() else {
            return Vec::new();
        };
        if matches!(first.as_str(), "crate" | "self" | "super") {
            return self.anchor(path, module);
        }
        if rest.is_empty() && self.index.find_local_type(module, first).is_some() {
            return [module, path].concat();
        }

        let mut imports = self.index.imports(module);
        if let Some(import) = imports.find(|import| import.alias.as_deref() == Some(first.as_str())) {
            let mut target = self.anchor(&import.target, module);
            target.extend_from_slice(rest);
            return target;
        }
        if rest.is_empty() {
            let globbed: Vec<Vec<String>> = self
                .index
                .imports(module)
                .filter(|import| import.alias.is_none())
                .map(|import| self.anchor(&import.target, module))
                .filter(|target| self.index.find_local_type(target, first).is_some())
                .collect();
            if let [target] = globbed.as_slice() {
                return [target.as_slice(), path].concat();
            }
        }
        self.anchor(path, module)
    }

    /// Resolve a leading `crate`, `self`, `super` or child module segment
    fn anchor(&self, path: &[String], module: &[String]) -> Vec<String> {
        match path.first().map(String::as_str) {
            Some("crate") => path[1..].to_vec(),
            Some("self") => [module, &path[1..]].concat(),
            Some("super") => {
                let mut anchored = module.to_vec();
                let mut rest = path;
                while rest.first().is_some_and(|segment| segment == "super") {
                    anchored.pop();
                    rest = &rest[1..];
                }
                anchored.extend_from_slice(rest);
                anchored
            }
            Some(_)
                if path.len() > 1
                    && !module.is_empty()
                    && self.index.has_module(&[module, &path[..1]].concat()) =>
            {
                [module, path].concat()
            }
            _ => path.to_vec(),
        }
    }

    fn canonical(&self, ty: &syn::Type) -> TypeRef {
        TypeRef::new(self.render_type(ty, &[], &HashMap::new()))
    }

    /// Render a type written inside `module` as a canonical reference string.
    ///
    /// Generic parameters are replaced through `subst`, whose values are
    /// already canonical.
    fn render_type(&self, ty: &syn::Type, module: &[String], subst: &HashMap<String, String>) -> String {
        match ty {
            syn::Type::Path(type_path) if type_path.qself.is_none() => {
                self.render_path(&type_path.path, module, subst)
            }
            syn::Type::Reference(reference) => self.render_type(&reference.elem, module, subst),
            syn::Type::Paren(paren) => self.render_type(&paren.elem, module, subst),
            syn::Type::Group(group) => self.render_type(&group.elem, module, subst),
            syn::Type::Slice(slice) => format!("[{}]", self.render_type(&slice.elem, module, subst)),
            syn::Type::Array(array) => format!("[{}]", self.render_type(&array.elem, module, subst)),
            syn::Type::Tuple(tuple) => {
                let elems: Vec<String> = tuple
                    .elems
                    .iter()
                    .map(|elem| self.render_type(elem, module, subst))
                    .collect();
                format!("({})", elems.join(", "))
            }
            _ => "_".to_string(),
        }
    }

    fn render_path(&self, path: &syn::Path, module: &[String], subst: &HashMap<String, String>) -> String {
        let Some(last) = path.segments.last() else {
            return "_".to_string();
        };
        if path.segments.len() == 1 && last.arguments.is_none() {
            if let Some(replacement) = subst.get(&last.ident.to_string()) {
                return replacement.clone();
            }
        }

        let absolute = self.absolute_path(&path_idents(path), module);
        let mut rendered = match self.lookup(&absolute) {
            Some(def) => {
                let mut qualified = def.module.clone();
                qualified.push(def.ident());
                qualified.join("::")
            }
            None => absolute.join("::"),
        };

        let args: Vec<String> = type_arguments(&last.arguments)
            .iter()
            .map(|arg| self.render_type(arg, module, subst))
            .collect();
        if !args.is_empty() {
            rendered = format!("{}<{}>", rendered, args.join(", "));
        }
        rendered
    }

    /// Collect a struct's documented fields, inlining `#[serde(flatten)]` ones
    fn struct_fields(
        &self,
        def: &Definition,
        item: &syn::ItemStruct,
        args: &[syn::Type],
        out: &mut Vec<Field>,
        seen: &mut HashSet<String>,
    ) -> Option<()> {
        if !seen.insert(format!("{}::{}", def.module.join("::"), item.ident)) {
            return Some(());
        }

        let params: Vec<String> = item
            .generics
            .type_params()
            .map(|param| param.ident.to_string())
            .collect();
        let subst: HashMap<String, String> = params
            .into_iter()
            .zip(args.iter().map(|arg| self.render_type(arg, &[], &HashMap::new())))
            .collect();

        let container = SerdeAttributes::parse(&item.attrs);
        let syn::Fields::Named(named) = &item.fields else {
            return None;
        };

        for field in &named.named {
            let attrs = SerdeAttributes::parse(&field.attrs);
            if attrs.skip {
                continue;
            }

            if attrs.flatten {
                let nested = TypeRef::new(self.render_type(&field.ty, &def.module, &subst));
                if let Some(Classified::Struct { def, item, args }) = self.classify(&nested) {
                    self.struct_fields(def, item, &args, out, seen)?;
                } else {
                    debug!("Cannot inline flattened field of type {}", nested);
                }
                continue;
            }

            let ident = field.ident.as_ref()?.unraw().to_string();
            let name = match (attrs.rename, container.rename_all) {
                (Some(rename), _) => rename,
                (None, Some(rule)) => rule.apply_to_field(&ident),
                (None, None) => ident,
            };
            let (inner, optional) = strip_option(&field.ty);

            out.push(Field {
                name,
                type_ref: TypeRef::new(self.render_type(inner, &def.module, &subst)),
                required: !optional && !attrs.default && !container.default,
                doc: doc_text(&field.attrs),
            });
        }
        Some(())
    }
}

impl TypeSystem for SourceTypeSystem {
    fn kind_of(&self, type_ref: &TypeRef) -> Option<TypeKind> {
        Some(match self.classify(type_ref)? {
            Classified::Primitive(kind) => TypeKind::Primitive(kind),
            Classified::Array(element) => TypeKind::Array(element),
            Classified::Dict(key, value) => TypeKind::Dict(key, value),
            Classified::Enum(item) => TypeKind::Enumeration(enum_values(item)),
            Classified::Struct { .. } => TypeKind::Composite,
        })
    }

    fn qualified_name_of(&self, type_ref: &TypeRef) -> Option<String> {
        match self.classify(type_ref)? {
            Classified::Enum(item) => Some(item.ident.to_string()),
            Classified::Struct { item, args, .. } if args.is_empty() => Some(item.ident.to_string()),
            Classified::Struct { item, args, .. } => {
                let args: Vec<String> = args.iter().map(short_name).collect();
                Some(format!("{}<{}>", item.ident, args.join(", ")))
            }
            _ => None,
        }
    }

    fn fields_of(&self, type_ref: &TypeRef) -> Option<Vec<Field>> {
        match self.classify(type_ref)? {
            Classified::Struct { def, item, args } => {
                let mut fields = Vec::new();
                self.struct_fields(def, item, &args, &mut fields, &mut HashSet::new())?;
                Some(fields)
            }
            _ => None,
        }
    }

    fn unknown_reason(&self, type_ref: &TypeRef) -> Option<String> {
        let syn::Type::Path(type_path) = peel(syn::parse_str(type_ref.as_str()).ok()?) else {
            return None;
        };
        let mut path = path_idents(&type_path.path);
        path.retain(|segment| segment != "crate");
        let ident = path.pop()?;
        let candidates: Vec<String> = self
            .index
            .types_named(&ident)
            .filter(|def| def.module.ends_with(&path))
            .map(|def| {
                let mut qualified = def.module.clone();
                qualified.push(def.ident());
                qualified.join("::")
            })
            .collect();
        (candidates.len() > 1).then(|| {
            format!(
                "ambiguous name `{}` could be any of {}",
                ident,
                candidates.join(", ")
            )
        })
    }
}

fn classify_definition(def: &Definition, args: Vec<syn::Type>) -> Option<Classified<'_>> {
    match &def.item {
        DefinitionItem::Struct(item) => {
            let named = matches!(item.fields, syn::Fields::Named(_));
            // Generic records are only described once instantiated.
            (named && item.generics.type_params().count() == args.len())
                .then_some(Classified::Struct { def, item, args })
        }
        DefinitionItem::Enum(item) => item
            .variants
            .iter()
            .all(|variant| matches!(variant.fields, syn::Fields::Unit))
            .then_some(Classified::Enum(item)),
        DefinitionItem::Function { .. } => None,
    }
}

fn enum_values(item: &syn::ItemEnum) -> Vec<String> {
    let container = SerdeAttributes::parse(&item.attrs);
    item.variants
        .iter()
        .filter_map(|variant| {
            let attrs = SerdeAttributes::parse(&variant.attrs);
            if attrs.skip {
                return None;
            }
            let ident = variant.ident.unraw().to_string();
            Some(match (attrs.rename, container.rename_all) {
                (Some(rename), _) => rename,
                (None, Some(rule)) => rule.apply_to_variant(&ident),
                (None, None) => ident,
            })
        })
        .collect()
}

fn type_arguments(arguments: &syn::PathArguments) -> Vec<syn::Type> {
    match arguments {
        syn::PathArguments::AngleBracketed(angle) => angle
            .args
            .iter()
            .filter_map(|arg| match arg {
                syn::GenericArgument::Type(ty) => Some(ty.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn path_idents(path: &syn::Path) -> Vec<String> {
    path.segments.iter().map(|segment| segment.ident.to_string()).collect()
}

/// Strip references, grouping and transparent wrappers such as `Box<T>`
fn peel(mut ty: syn::Type) -> syn::Type {
    loop {
        ty = match ty {
            syn::Type::Reference(reference) => *reference.elem,
            syn::Type::Paren(paren) => *paren.elem,
            syn::Type::Group(group) => *group.elem,
            syn::Type::Path(type_path) => {
                let wrapped = type_path.path.segments.last().and_then(|segment| {
                    let ident = segment.ident.to_string();
                    if TRANSPARENT.contains(&ident.as_str()) {
                        type_arguments(&segment.arguments).into_iter().next()
                    } else {
                        None
                    }
                });
                match wrapped {
                    Some(inner) => inner,
                    None => return syn::Type::Path(type_path),
                }
            }
            other => return other,
        }
    }
}

fn short_name(ty: &syn::Type) -> String {
    match ty {
        syn::Type::Path(type_path) => match type_path.path.segments.last() {
            Some(segment) => {
                let args: Vec<String> = type_arguments(&segment.arguments).iter().map(short_name).collect();
                if args.is_empty() {
                    segment.ident.to_string()
                } else {
                    format!("{}<{}>", segment.ident, args.join(", "))
                }
            }
            None => "_".to_string(),
        },
        syn::Type::Reference(reference) => short_name(&reference.elem),
        syn::Type::Slice(slice) => format!("[{}]", short_name(&slice.elem)),
        syn::Type::Array(array) => format!("[{}]", short_name(&array.elem)),
        _ => "_".to_string(),
    }
}

/// Split `Option<T>` into `T` and an optional flag
fn strip_option(ty: &syn::Type) -> (&syn::Type, bool) {
    if let syn::Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Option" {
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                        return (inner, true);
                    }
                }
            }
        }
    }
    (ty, false)
}

fn extractor_inner<'t>(ty: &'t syn::Type, names: &[&str]) -> Option<(&'t syn::Type, String)> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    let ident = segment.ident.to_string();
    if !names.contains(&ident.as_str()) {
        return None;
    }
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            syn::GenericArgument::Type(inner) => Some((inner, ident.clone())),
            _ => None,
        }),
        _ => Some((ty, ident)),
    }
}

/// The documented type of a handler argument, or `None` for plumbing
fn argument_payload(ty: &syn::Type) -> Option<&syn::Type> {
    if let syn::Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if PLUMBING_EXTRACTORS.iter().any(|name| segment.ident == name) {
                return None;
            }
        }
    }
    match extractor_inner(ty, PAYLOAD_EXTRACTORS) {
        Some((inner, _)) => Some(inner),
        None => Some(ty),
    }
}

/// The documented payload of a handler's return type
fn return_payload(ty: &syn::Type) -> Option<&syn::Type> {
    match ty {
        syn::Type::ImplTrait(_) => None,
        syn::Type::Paren(paren) => return_payload(&paren.elem),
        syn::Type::Group(group) => return_payload(&group.elem),
        syn::Type::Tuple(tuple) => tuple.elems.iter().rev().find_map(return_payload),
        syn::Type::Path(type_path) => {
            let segment = type_path.path.segments.last()?;
            if UNTYPED_RESPONSES.iter().any(|name| segment.ident == name) {
                return None;
            }
            if let Some((inner, wrapper)) = extractor_inner(ty, &["Result", "Json"]) {
                return if wrapper == "Result" {
                    return_payload(inner)
                } else {
                    Some(inner)
                };
            }
            Some(ty)
        }
        _ => Some(ty),
    }
}

fn binding_name(pat: &syn::Pat) -> Option<String> {
    match pat {
        syn::Pat::Ident(binding) => Some(binding.ident.unraw().to_string()),
        syn::Pat::Type(typed) => binding_name(&typed.pat),
        syn::Pat::Reference(reference) => binding_name(&reference.pat),
        syn::Pat::TupleStruct(tuple) if tuple.elems.len() == 1 => binding_name(&tuple.elems[0]),
        _ => None,
    }
}

/// Doc comment text with common indentation removed
pub(crate) fn doc_text(attrs: &[syn::Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            syn::Meta::NameValue(syn::MetaNameValue {
                value:
                    syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(text),
                        ..
                    }),
                ..
            }) => Some(text.value()),
            _ => None,
        })
        .flat_map(|text| text.lines().map(str::to_string).collect::<Vec<_>>())
        .collect();

    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    let text = lines
        .iter()
        .map(|line| line.get(indent..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.trim();

    (!text.is_empty()).then(|| text.to_string())
}

/// The subset of serde attributes that changes a documented shape
#[derive(Debug, Default)]
struct SerdeAttributes {
    rename: Option<String>,
    rename_all: Option<RenameRule>,
    skip: bool,
    flatten: bool,
    default: bool,
}

impl SerdeAttributes {
    fn parse(attrs: &[syn::Attribute]) -> Self {
        let mut parsed = SerdeAttributes::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
            let result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") || meta.path.is_ident("rename_all") {
                    let value = if meta.input.peek(syn::Token![=]) {
                        Some(meta.value()?.parse::<syn::LitStr>()?.value())
                    } else {
                        // rename(serialize = "...", deserialize = "...")
                        let mut serialize = None;
                        meta.parse_nested_meta(|inner| {
                            let text = inner.value()?.parse::<syn::LitStr>()?.value();
                            if inner.path.is_ident("serialize") {
                                serialize = Some(text);
                            }
                            Ok(())
                        })?;
                        serialize
                    };
                    if meta.path.is_ident("rename_all") {
                        parsed.rename_all = value.as_deref().and_then(RenameRule::parse);
                    } else {
                        parsed.rename = value;
                    }
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    parsed.skip = true;
                } else if meta.path.is_ident("flatten") {
                    parsed.flatten = true;
                } else if meta.path.is_ident("default") {
                    parsed.default = true;
                    skip_meta_value(&meta)?;
                } else {
                    skip_meta_value(&meta)?;
                }
                Ok(())
            });

            if let Err(err) = result {
                debug!("Ignoring unparseable serde attribute: {}", err);
            }
        }
        parsed
    }
}

fn skip_meta_value(meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta_value(&inner))?;
    }
    Ok(())
}

/// Serde `rename_all` case conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn parse(rule: &str) -> Option<Self> {
        Some(match rule {
            "lowercase" => RenameRule::Lower,
            "UPPERCASE" => RenameRule::Upper,
            "PascalCase" => RenameRule::Pascal,
            "camelCase" => RenameRule::Camel,
            "snake_case" => RenameRule::Snake,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnake,
            "kebab-case" => RenameRule::Kebab,
            "SCREAMING-KEBAB-CASE" => RenameRule::ScreamingKebab,
            _ => return None,
        })
    }

    /// Apply to a PascalCase enum variant name
    fn apply_to_variant(self, variant: &str) -> String {
        match self {
            RenameRule::Pascal => variant.to_string(),
            RenameRule::Lower => variant.to_ascii_lowercase(),
            RenameRule::Upper => variant.to_ascii_uppercase(),
            RenameRule::Camel => lower_first(variant),
            RenameRule::Snake => {
                let mut snake = String::new();
                for (i, ch) in variant.char_indices() {
                    if i > 0 && ch.is_uppercase() {
                        snake.push('_');
                    }
                    snake.push(ch.to_ascii_lowercase());
                }
                snake
            }
            RenameRule::ScreamingSnake => RenameRule::Snake.apply_to_variant(variant).to_ascii_uppercase(),
            RenameRule::Kebab => RenameRule::Snake.apply_to_variant(variant).replace('_', "-"),
            RenameRule::ScreamingKebab => RenameRule::ScreamingSnake
                .apply_to_variant(variant)
                .replace('_', "-"),
        }
    }

    /// Apply to a snake_case field name
    fn apply_to_field(self, field: &str) -> String {
        match self {
            RenameRule::Lower | RenameRule::Snake => field.to_string(),
            RenameRule::Upper | RenameRule::ScreamingSnake => field.to_ascii_uppercase(),
            RenameRule::Pascal => {
                let mut pascal = String::new();
                let mut capitalize = true;
                for ch in field.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        pascal.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        pascal.push(ch);
                    }
                }
                pascal
            }
            RenameRule::Camel => lower_first(&RenameRule::Pascal.apply_to_field(field)),
            RenameRule::Kebab => field.replace('_', "-"),
            RenameRule::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
