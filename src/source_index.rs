use crate::parser::ParsedFile;
use log::debug;

/// Index of the type and function definitions found in parsed sources.
///
/// Definitions are kept in source order (files in scan order, items in file
/// order), recursing into inline `mod` blocks and inherent `impl` blocks.
#[derive(Debug, Default)]
pub struct SourceIndex {
    definitions: Vec<Definition>,
    imports: Vec<Import>,
}

/// A name brought into a module's scope by a `use` item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Module containing the `use` item
    pub module: Vec<String>,
    /// Name the import binds, or `None` for a glob import
    pub alias: Option<String>,
    /// Imported path as written; for globs, the module being globbed
    pub target: Vec<String>,
}

/// A single indexed definition
#[derive(Debug, Clone)]
pub struct Definition {
    /// Module containing the definition
    pub module: Vec<String>,
    pub item: DefinitionItem,
}

#[derive(Debug, Clone)]
pub enum DefinitionItem {
    Struct(syn::ItemStruct),
    Enum(syn::ItemEnum),
    /// A free function, or a method when `owner` names the impl's self type
    Function {
        owner: Option<String>,
        attrs: Vec<syn::Attribute>,
        sig: syn::Signature,
    },
}

impl Definition {
    pub fn ident(&self) -> String {
        match &self.item {
            DefinitionItem::Struct(item) => item.ident.to_string(),
            DefinitionItem::Enum(item) => item.ident.to_string(),
            DefinitionItem::Function { sig, .. } => sig.ident.to_string(),
        }
    }

    /// Path segments leading to the definition (module plus impl owner)
    fn scope(&self) -> Vec<&str> {
        let mut scope: Vec<&str> = self.module.iter().map(String::as_str).collect();
        if let DefinitionItem::Function { owner: Some(owner), .. } = &self.item {
            scope.push(owner);
        }
        scope
    }

    fn is_type(&self) -> bool {
        !matches!(self.item, DefinitionItem::Function { .. })
    }
}

impl SourceIndex {
    pub fn new(files: &[ParsedFile]) -> Self {
        let mut index = SourceIndex::default();
        for file in files {
            index.collect_items(&file.module_path, &file.syntax_tree.items);
        }
        debug!(
            "Indexed {} definitions and {} imports",
            index.definitions.len(),
            index.imports.len()
        );
        index
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Find the struct or enum named `ident` whose module ends with `qualifier`.
    ///
    /// An empty qualifier matches any module. Returns `None` unless exactly
    /// one definition matches.
    pub fn find_type(&self, qualifier: &[String], ident: &str) -> Option<&Definition> {
        let mut matches = self
            .definitions
            .iter()
            .filter(|def| def.is_type() && def.ident() == ident && def.module.ends_with(qualifier));
        let found = matches.next()?;
        matches.next().is_none().then_some(found)
    }

    /// All structs and enums named `ident`, in source order
    pub fn types_named<'s>(&'s self, ident: &'s str) -> impl Iterator<Item = &'s Definition> + 's {
        self.definitions
            .iter()
            .filter(move |def| def.is_type() && def.ident() == ident)
    }

    /// Whether any definition lives in `module` or below it
    pub fn has_module(&self, module: &[String]) -> bool {
        self.definitions.iter().any(|def| def.module.starts_with(module))
    }

    /// `use` imports declared directly in `module`
    pub fn imports<'s>(&'s self, module: &'s [String]) -> impl Iterator<Item = &'s Import> + 's {
        self.imports.iter().filter(move |import| import.module == module)
    }

    /// Find a struct or enum defined directly in `module`
    pub fn find_local_type(&self, module: &[String], ident: &str) -> Option<&Definition> {
        self.definitions
            .iter()
            .find(|def| def.is_type() && def.module == module && def.ident() == ident)
    }

    /// Find a function by path, e.g. `handlers::list` or `WidgetController::get_one`
    pub fn find_function(&self, path: &str) -> Option<&Definition> {
        let mut segments: Vec<&str> = path
            .split("::")
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "crate")
            .collect();
        let name = segments.pop()?;

        self.definitions.iter().find(|def| {
            !def.is_type() && def.ident() == name && def.scope().ends_with(&segments)
        })
    }

    fn collect_items(&mut self, module: &[String], items: &[syn::Item]) {
        for item in items {
            match item {
                syn::Item::Struct(item) => self.push(module, DefinitionItem::Struct(item.clone())),
                syn::Item::Enum(item) => self.push(module, DefinitionItem::Enum(item.clone())),
                syn::Item::Fn(item) => self.push(
                    module,
                    DefinitionItem::Function {
                        owner: None,
                        attrs: item.attrs.clone(),
                        sig: item.sig.clone(),
                    },
                ),
                syn::Item::Impl(item) if item.trait_.is_none() => {
                    let Some(owner) = impl_owner(&item.self_ty) else {
                        continue;
                    };
                    for impl_item in &item.items {
                        if let syn::ImplItem::Fn(method) = impl_item {
                            self.push(
                                module,
                                DefinitionItem::Function {
                                    owner: Some(owner.clone()),
                                    attrs: method.attrs.clone(),
                                    sig: method.sig.clone(),
                                },
                            );
                        }
                    }
                }
                syn::Item::Use(item) => self.collect_use(module, &mut Vec::new(), &item.tree),
                syn::Item::Mod(item) => {
                    if let Some((_, nested)) = &item.content {
                        let mut path = module.to_vec();
                        path.push(item.ident.to_string());
                        self.collect_items(&path, nested);
                    }
                }
                _ => {}
            }
        }
    }

    fn collect_use(&mut self, module: &[String], prefix: &mut Vec<String>, tree: &syn::UseTree) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.collect_use(module, prefix, &path.tree);
                prefix.pop();
            }
            // `use a::b::{self}` binds `b`
            syn::UseTree::Name(name) if name.ident == "self" => {
                if let Some(last) = prefix.last() {
                    self.push_import(module, Some(last.clone()), prefix.clone());
                }
            }
            syn::UseTree::Name(name) => {
                let mut target = prefix.clone();
                target.push(name.ident.to_string());
                self.push_import(module, Some(name.ident.to_string()), target);
            }
            syn::UseTree::Rename(rename) if rename.rename != "_" => {
                let mut target = prefix.clone();
                if rename.ident != "self" {
                    target.push(rename.ident.to_string());
                }
                self.push_import(module, Some(rename.rename.to_string()), target);
            }
            syn::UseTree::Rename(_) => {}
            syn::UseTree::Glob(_) => self.push_import(module, None, prefix.clone()),
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.collect_use(module, prefix, item);
                }
            }
        }
    }

    fn push_import(&mut self, module: &[String], alias: Option<String>, target: Vec<String>) {
        self.imports.push(Import {
            module: module.to_vec(),
            alias,
            target,
        });
    }

    fn push(&mut self, module: &[String], item: DefinitionItem) {
        self.definitions.push(Definition {
            module: module.to_vec(),
            item,
        });
    }
}

fn impl_owner(self_ty: &syn::Type) -> Option<String> {
    match self_ty {
        syn::Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}
