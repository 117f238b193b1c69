//! Propagation of `use` declarations into generated module units.
//!
//! Generated code lives in a wrapper module below the host module, so
//! relative imports copied from a declaring module would resolve against the
//! wrong base. Paths starting with `self`, `super` or the name of a child
//! module are rewritten to absolute `crate::` paths; everything else is
//! copied as written. Groups are split so that every import names one item.

use crate::model::ModulePath;
use crate::tokens::render;

/// One imported name with an anchored path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchoredUse {
    /// Rendered `#[cfg]` attributes, each followed by a space.
    pub attrs: String,
    /// Path segments before the imported name, `::`-prefixed paths keep an
    /// empty first segment.
    pub path: Vec<String>,
    /// The imported name, `*`, or `name as alias`.
    pub leaf: String,
}

impl AnchoredUse {
    pub fn line(&self) -> String {
        let mut segments = self.path.clone();
        segments.push(self.leaf.clone());
        format!("{}use {};", self.attrs, segments.join("::"))
    }

    /// Module the name is imported from when the path is crate-absolute.
    pub fn source_module(&self) -> Option<ModulePath> {
        match self.path.split_first() {
            Some((first, rest)) if first == "crate" => Some(ModulePath::from_segments(rest)),
            _ => None,
        }
    }

    pub fn is_renamed(&self) -> bool {
        self.leaf.contains(" as ")
    }
}

/// Flattens `item` into single-name imports valid from any module.
///
/// Visibility is dropped and only `#[cfg]` attributes are kept.
pub fn anchor_use(
    item: &syn::ItemUse,
    declaring: &ModulePath,
    children: &[String],
) -> Vec<AnchoredUse> {
    let attrs: String = item
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("cfg"))
        .map(|attr| format!("{} ", render(attr)))
        .collect();

    let mut leaves = Vec::new();
    flatten(&item.tree, &mut Vec::new(), &mut leaves);

    leaves
        .into_iter()
        .filter_map(|(path, leaf)| {
            let path = if item.leading_colon.is_some() {
                std::iter::once(String::new()).chain(path).collect()
            } else {
                anchor_path(path, declaring, children)
            };
            import(attrs.clone(), path, leaf)
        })
        .collect()
}

fn flatten(tree: &syn::UseTree, prefix: &mut Vec<String>, out: &mut Vec<(Vec<String>, String)>) {
    match tree {
        syn::UseTree::Path(p) => {
            prefix.push(p.ident.to_string());
            flatten(&p.tree, prefix, out);
            prefix.pop();
        }
        syn::UseTree::Name(n) => out.push((prefix.clone(), n.ident.to_string())),
        syn::UseTree::Rename(r) => {
            out.push((prefix.clone(), format!("{} as {}", r.ident, r.rename)));
        }
        syn::UseTree::Glob(_) => out.push((prefix.clone(), "*".to_string())),
        syn::UseTree::Group(g) => {
            for item in &g.items {
                flatten(item, prefix, out);
            }
        }
    }
}

/// Rewrites a `self`/`super`/child-module prefixed path to start at `crate`.
pub(crate) fn anchor_path(path: Vec<String>, declaring: &ModulePath, children: &[String]) -> Vec<String> {
    let Some(first) = path.first() else {
        return path;
    };
    let (base, skip) = if first == "self" {
        (declaring.clone(), 1)
    } else if first == "super" {
        let supers = path.iter().take_while(|s| *s == "super").count();
        let mut base = declaring.clone();
        for _ in 0..supers {
            match base.parent() {
                Some(parent) => base = parent,
                None => return path,
            }
        }
        (base, supers)
    } else if children.contains(first) {
        (declaring.clone(), 0)
    } else {
        return path;
    };

    std::iter::once("crate".to_string())
        .chain(base.segments().iter().cloned())
        .chain(path.into_iter().skip(skip))
        .collect()
}

/// Builds the import, folding `{self}` leaves into their parent path.
fn import(attrs: String, mut path: Vec<String>, leaf: String) -> Option<AnchoredUse> {
    let alias = match leaf.as_str() {
        "self" => None,
        other => match other.strip_prefix("self as ") {
            Some(alias) => Some(alias.to_string()),
            None => return Some(AnchoredUse { attrs, path, leaf }),
        },
    };
    let name = path.pop().filter(|n| !n.is_empty())?;
    let leaf = match alias {
        Some(alias) => format!("{} as {}", name, alias),
        None => name,
    };
    Some(AnchoredUse { attrs, path, leaf })
}
