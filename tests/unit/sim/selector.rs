use super::*;

struct N {
    tag: &'static str,
    id: Option<&'static str>,
    classes: &'static [&'static str],
    attrs: &'static [(&'static str, &'static str)],
}

impl Matchable for N {
    fn tag(&self) -> &str {
        self.tag
    }
    fn id(&self) -> Option<&str> {
        self.id
    }
    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(&class)
    }
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }
}

#[test]
fn parses_chains_and_lists() {
    let s = SelectorList::parse(".headline .word, footer").unwrap();
    assert_eq!(s.chains.len(), 2);
    assert_eq!(s.chains[0].len(), 2);
    assert_eq!(s.chains[0][1].classes, vec!["word".to_owned()]);
    assert_eq!(s.chains[1][0].tag.as_deref(), Some("footer"));
}

#[test]
fn compound_matches_all_parts() {
    let n = N {
        tag: "a",
        id: Some("x"),
        classes: &["nav-link", "primary"],
        attrs: &[("href", "#services")],
    };
    let c = &SelectorList::parse("a#x.nav-link[href='#services']").unwrap().chains[0][0];
    assert!(c.matches(&n));
    let c = &SelectorList::parse(".nav-link.secondary").unwrap().chains[0][0];
    assert!(!c.matches(&n));
    let c = &SelectorList::parse("[data-category]").unwrap().chains[0][0];
    assert!(!c.matches(&n));
    let c = &SelectorList::parse("*[href]").unwrap().chains[0][0];
    assert!(c.matches(&n));
}

#[test]
fn rejects_malformed_input() {
    assert!(SelectorList::parse("").is_err());
    assert!(SelectorList::parse(".a,").is_err());
    assert!(SelectorList::parse("a > b").is_err());
    assert!(SelectorList::parse("[href").is_err());
    assert!(SelectorList::parse(".").is_err());
}
