//! The subset of CSS selectors the page behaviors use: descendant chains of
//! `tag#id.class[attr][attr="value"]` compounds.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, Option<String>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    /// Outermost ancestor first, subject last.
    pub chain: Vec<Compound>,
}

/// What the matcher needs to know about a node.
pub trait Subject {
    fn tag(&self) -> &str;
    fn attr(&self, name: &str) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
}

impl Compound {
    pub fn matches(&self, node: &impl Subject) -> bool {
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(node.tag()) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.attr("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| node.has_class(class)) {
            return false;
        }
        self.attrs.iter().all(|(name, value)| match value {
            Some(value) => node.attr(name) == Some(value.as_str()),
            None => node.attr(name).is_some(),
        })
    }
}

impl Selector {
    pub fn parse(raw: &str) -> Option<Self> {
        let chain = split_compounds(raw)
            .iter()
            .map(|part| parse_compound(part))
            .collect::<Option<Vec<_>>>()?;
        if chain.is_empty() {
            return None;
        }
        Some(Self { chain })
    }

    /// `ancestors` runs from the nearest parent outwards.
    pub fn matches<S: Subject>(&self, node: &S, ancestors: &[&S]) -> bool {
        let Some((subject, rest)) = self.chain.split_last() else {
            return false;
        };
        if !subject.matches(node) {
            return false;
        }

        let mut remaining = rest.iter().rev().peekable();
        for ancestor in ancestors {
            match remaining.peek() {
                Some(compound) if compound.matches(*ancestor) => {
                    remaining.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        remaining.peek().is_none()
    }
}

fn split_compounds(raw: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;

    for c in raw.trim().chars() {
        match c {
            '[' => {
                in_brackets = true;
                current.push(c);
            }
            ']' => {
                in_brackets = false;
                current.push(c);
            }
            c if c.is_whitespace() && !in_brackets => {
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

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    (!ident.is_empty()).then_some(ident)
}

fn parse_compound(part: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut chars = part.chars().peekable();

    if chars.peek() == Some(&'*') {
        chars.next();
    } else if chars.peek().is_some_and(|c| is_ident(*c)) {
        compound.tag = take_ident(&mut chars);
    }

    while let Some(c) = chars.next() {
        match c {
            '#' => compound.id = Some(take_ident(&mut chars)?),
            '.' => compound.classes.push(take_ident(&mut chars)?),
            '[' => {
                let name = take_ident(&mut chars)?;
                let value = match chars.next()? {
                    ']' => None,
                    '=' => {
                        let value = match chars.peek() {
                            Some(&quote) if quote == '"' || quote == '\'' => {
                                chars.next();
                                let value: String =
                                    chars.by_ref().take_while(|c| *c != quote).collect();
                                value
                            }
                            _ => take_ident(&mut chars)?,
                        };
                        if chars.next()? != ']' {
                            return None;
                        }
                        Some(value)
                    }
                    _ => return None,
                };
                compound.attrs.push((name, value));
            }
            _ => return None,
        }
    }

    Some(compound)
}
