use crate::foundation::error::{UnveilError, UnveilResult};

/// A parsed selector list: `A B, C` matches descendants `B` of `A`, or `C`.
///
/// Supported simple selectors: `tag`, `*`, `#id`, `.class`, `[attr]`, `[attr=value]` (value
/// optionally quoted). Combinator: descendant (whitespace).
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SelectorList {
    pub(crate) chains: Vec<Vec<Compound>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Compound {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<(String, Option<String>)>,
}

/// The subset of a node a selector can look at.
pub(crate) trait Matchable {
    fn tag(&self) -> &str;
    fn id(&self) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
    fn attr(&self, name: &str) -> Option<&str>;
}

impl Compound {
    pub(crate) fn matches(&self, n: &impl Matchable) -> bool {
        if let Some(tag) = &self.tag
            && tag != n.tag()
        {
            return false;
        }
        if let Some(id) = &self.id
            && n.id() != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|c| n.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|(name, value)| match (n.attr(name), value) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(v), Some(want)) => v == want,
        })
    }
}

impl SelectorList {
    pub(crate) fn parse(s: &str) -> UnveilResult<Self> {
        let mut chains = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(UnveilError::validation(format!("empty selector in '{s}'")));
            }
            let chain = part
                .split_whitespace()
                .map(parse_compound)
                .collect::<UnveilResult<Vec<_>>>()?;
            chains.push(chain);
        }
        Ok(Self { chains })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], mut i: usize) -> (String, usize) {
    let start = i;
    while i < chars.len() && is_ident_char(chars[i]) {
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}

fn parse_compound(s: &str) -> UnveilResult<Compound> {
    let bad = || UnveilError::validation(format!("invalid selector '{s}'"));
    let chars: Vec<char> = s.chars().collect();
    let mut c = Compound::default();
    let mut i = 0;

    if i < chars.len() && chars[i] == '*' {
        i += 1;
    } else if i < chars.len() && is_ident_char(chars[i]) {
        let (tag, next) = take_ident(&chars, i);
        c.tag = Some(tag.to_ascii_lowercase());
        i = next;
    }

    while i < chars.len() {
        match chars[i] {
            '#' => {
                let (id, next) = take_ident(&chars, i + 1);
                if id.is_empty() {
                    return Err(bad());
                }
                c.id = Some(id);
                i = next;
            }
            '.' => {
                let (class, next) = take_ident(&chars, i + 1);
                if class.is_empty() {
                    return Err(bad());
                }
                c.classes.push(class);
                i = next;
            }
            '[' => {
                let close = chars[i..].iter().position(|&ch| ch == ']').ok_or_else(bad)? + i;
                let inner: String = chars[i + 1..close].iter().collect();
                let (name, value) = match inner.split_once('=') {
                    Some((n, v)) => {
                        let v = v.trim().trim_matches(|ch| ch == '"' || ch == '\'');
                        (n.trim().to_owned(), Some(v.to_owned()))
                    }
                    None => (inner.trim().to_owned(), None),
                };
                if name.is_empty() || !name.chars().all(is_ident_char) {
                    return Err(bad());
                }
                c.attrs.push((name, value));
                i = close + 1;
            }
            _ => return Err(bad()),
        }
    }
    Ok(c)
}

#[cfg(test)]
#[path = "../../tests/unit/sim/selector.rs"]
mod tests;
