//! Structured tags embedded in comments.
//!
//! A tag line reads `@name value`, optionally preceded by the `#` comment
//! marker. Any other line is free text and is ignored.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

/// Ordered tags parsed from one comment block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tags(Vec<Tag>);

impl Tags {
    pub fn parse(comment: &str) -> Self {
        let tags = comment
            .lines()
            .filter_map(|line| {
                let captures = tag_pattern().captures(line)?;
                Some(Tag {
                    name: captures["name"].to_string(),
                    value: captures["value"].trim_end().to_string(),
                })
            })
            .collect();
        Self(tags)
    }

    /// Values of every tag called `name`, in source order.
    pub fn filter<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |tag| tag.name == name)
            .map(|tag| tag.value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*#*\s*@(?P<name>[A-Za-z0-9_-]+)\s+(?P<value>\S.*)$")
            .expect("tag pattern compiles")
    })
}
