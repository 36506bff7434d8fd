//! Minimal CSS selector matching for [`super::memory::MemoryDom`].
//!
//! Supports selector lists (`a, b`), the descendant combinator, and compound
//! selectors made of a tag, `#id`, `.class`, `[attr]` and `[attr="value"]`.
//! That covers every selector the page code uses.

/// Read access a matcher needs from a tree.
pub trait SelectorTarget {
    type Id: Copy;

    fn tag(&self, id: Self::Id) -> &str;
    fn attr(&self, id: Self::Id, name: &str) -> Option<String>;
    fn has_class(&self, id: Self::Id, class: &str) -> bool;
    fn parent(&self, id: Self::Id) -> Option<Self::Id>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    chains: Vec<Vec<Compound>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Self {
        let chains = input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|chain| split_outside_brackets(chain).iter().map(|c| parse_compound(c)).collect())
            .collect();
        Self { chains }
    }

    pub fn matches<T: SelectorTarget>(&self, tree: &T, id: T::Id) -> bool {
        self.chains.iter().any(|chain| chain_matches(tree, chain, id))
    }
}

fn chain_matches<T: SelectorTarget>(tree: &T, chain: &[Compound], id: T::Id) -> bool {
    let Some((last, ancestors)) = chain.split_last() else {
        return false;
    };
    if !compound_matches(tree, last, id) {
        return false;
    }

    // Right to left: each remaining compound must match some ancestor above the
    // previous match.
    let mut cursor = tree.parent(id);
    for compound in ancestors.iter().rev() {
        loop {
            let Some(current) = cursor else {
                return false;
            };
            cursor = tree.parent(current);
            if compound_matches(tree, compound, current) {
                break;
            }
        }
    }
    true
}

fn compound_matches<T: SelectorTarget>(tree: &T, c: &Compound, id: T::Id) -> bool {
    if let Some(tag) = &c.tag {
        if !tree.tag(id).eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(want) = &c.id {
        if tree.attr(id, "id").as_deref() != Some(want.as_str()) {
            return false;
        }
    }
    if !c.classes.iter().all(|class| tree.has_class(id, class)) {
        return false;
    }
    c.attrs.iter().all(|(name, want)| match (tree.attr(id, name), want) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(have), Some(want)) => &have == want,
    })
}

fn split_outside_brackets(chain: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for ch in chain.chars() {
        match ch {
            '[' => {
                depth += 1;
                current.push(ch);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn parse_compound(raw: &str) -> Compound {
    let mut out = Compound::default();
    let mut rest = raw;

    let tag_end = rest.find(['.', '#', '[']).unwrap_or(rest.len());
    let (tag, tail) = rest.split_at(tag_end);
    if !tag.is_empty() && tag != "*" {
        out.tag = Some(tag.to_ascii_lowercase());
    }
    rest = tail;

    while let Some(first) = rest.chars().next() {
        match first {
            '[' => {
                let close = rest.find(']').unwrap_or(rest.len());
                let body = &rest[1..close];
                out.attrs.push(match body.split_once('=') {
                    Some((name, value)) => (
                        name.trim().to_string(),
                        Some(value.trim().trim_matches(['"', '\'']).to_string()),
                    ),
                    None => (body.trim().to_string(), None),
                });
                rest = rest.get(close + 1..).unwrap_or("");
            }
            '.' | '#' => {
                let body = &rest[1..];
                let end = body.find(['.', '#', '[']).unwrap_or(body.len());
                let name = body[..end].to_string();
                if first == '.' {
                    out.classes.push(name);
                } else {
                    out.id = Some(name);
                }
                rest = &body[end..];
            }
            _ => break,
        }
    }
    out
}
