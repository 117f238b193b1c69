//! Rendering of `syn` nodes into compact source text and identifier fragments.

use proc_macro2::{Delimiter, Spacing, TokenStream, TokenTree};
use quote::ToTokens;

/// Renders any syntax node as compact, compilable source text.
///
/// `Vec < Option < u8 > >` comes out as `Vec<Option<u8>>` and
/// `& 'a mut T` as `&'a mut T`.
pub fn render<T: ToTokens + ?Sized>(node: &T) -> String {
    let mut out = String::new();
    let mut prev = Prev::Start;
    write_stream(node.to_token_stream(), &mut out, &mut prev);
    out
}

/// Key used to compare types for slot sharing. Exact text, no whitespace.
pub fn type_key(ty: &syn::Type) -> String {
    render(ty).chars().filter(|c| !c.is_whitespace()).collect()
}

/// Turns type text into a snake_case identifier fragment.
///
/// `i32` → `i32`, `Vec3` → `vec3`, `Option<Entity>` → `option_entity`,
/// `[f32; 3]` → `f32_3`.
pub fn ident_fragment(text: &str) -> String {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            current.push(c);
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    let fragment = words
        .iter()
        .map(|w| to_snake_case(w.trim_start_matches("r#")))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if fragment.is_empty() {
        "slot".to_string()
    } else {
        fragment
    }
}

/// Converts a CamelCase name to snake_case. `MyStateA` → `my_state_a`.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Clone, Copy, PartialEq)]
enum Prev {
    Start,
    Word,
    Lifetime,
    Punct,
    Open,
    Close,
}

fn write_stream(stream: TokenStream, out: &mut String, prev: &mut Prev) {
    let tokens: Vec<TokenTree> = stream.into_iter().collect();
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            TokenTree::Ident(ident) => {
                if matches!(*prev, Prev::Word | Prev::Lifetime | Prev::Close) {
                    out.push(' ');
                }
                out.push_str(&ident.to_string());
                *prev = Prev::Word;
            }
            TokenTree::Literal(lit) => {
                if matches!(*prev, Prev::Word | Prev::Lifetime | Prev::Close) {
                    out.push(' ');
                }
                out.push_str(&lit.to_string());
                *prev = Prev::Word;
            }
            TokenTree::Group(group) => {
                let (open, close) = match group.delimiter() {
                    Delimiter::Parenthesis => ("(", ")"),
                    Delimiter::Bracket => ("[", "]"),
                    Delimiter::Brace => ("{", "}"),
                    Delimiter::None => ("", ""),
                };
                if group.delimiter() == Delimiter::Brace && matches!(*prev, Prev::Word | Prev::Close) {
                    out.push(' ');
                }
                out.push_str(open);
                let mut inner = Prev::Open;
                write_stream(group.stream(), out, &mut inner);
                out.push_str(close);
                *prev = Prev::Close;
            }
            TokenTree::Punct(punct) => {
                let ch = punct.as_char();
                let joint = punct.spacing() == Spacing::Joint;
                let next = tokens.get(i + 1);

                if ch == '\'' && joint {
                    // Lifetime: the quote glues to the following ident.
                    if let Some(TokenTree::Ident(ident)) = next {
                        if matches!(*prev, Prev::Word | Prev::Lifetime | Prev::Close) {
                            out.push(' ');
                        }
                        out.push('\'');
                        out.push_str(&ident.to_string());
                        *prev = Prev::Lifetime;
                        i += 2;
                        continue;
                    }
                }

                // Gather a multi-char operator such as `::`, `->` or `=>`.
                let mut op = String::new();
                op.push(ch);
                let mut j = i;
                let mut last_joint = joint;
                while last_joint {
                    match tokens.get(j + 1) {
                        Some(TokenTree::Punct(p)) if p.as_char() != '\'' => {
                            op.push(p.as_char());
                            last_joint = p.spacing() == Spacing::Joint;
                            j += 1;
                        }
                        _ => break,
                    }
                }
                write_operator(&op, out, prev);
                i = j + 1;
                continue;
            }
        }
        i += 1;
    }
}

fn write_operator(op: &str, out: &mut String, prev: &mut Prev) {
    match op {
        "," | ";" => {
            out.push_str(op);
            out.push(' ');
            *prev = Prev::Punct;
            return;
        }
        ":" => {
            out.push_str(": ");
            *prev = Prev::Punct;
            return;
        }
        "->" | "=>" | "=" | "+" | "|" | "==" | "!=" | "+=" | "-=" | "*=" | "/=" | "&&" | "||" => {
            if !out.ends_with(' ') && !out.is_empty() {
                out.push(' ');
            }
            out.push_str(op);
            out.push(' ');
            *prev = Prev::Punct;
            return;
        }
        _ => {}
    }
    if op == "#" && matches!(*prev, Prev::Word | Prev::Close) {
        out.push(' ');
    }
    out.push_str(op);
    *prev = Prev::Punct;
}
