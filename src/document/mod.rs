//! YAML documents as comment-carrying node trees.
//!
//! `parse` keeps what the recipe schema needs and a plain value decode drops:
//! node kinds, mapping order, and the comment block written directly above
//! each node. `decode` produces the generic value tree used for recipe vars.
//!
//! Head comments follow three rules:
//! * a node gets the contiguous `#` lines right above its line, unless an
//!   earlier node already starts on that line (`key: value` pairs share one
//!   comment, owned by the key);
//! * those lines must sit at the indentation of the node's line, so block
//!   scalar content and comments closing a deeper block never count;
//! * the first entry of a collection nested under a mapping key hands its
//!   head comment over to that collection, so a comment between `key:` and
//!   the nested block annotates the nested block itself.

pub mod tags;

pub use tags::{Tag, Tags};

use crate::error::DecodeError;
use serde_json::{Map, Number, Value};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, ScanError, TScalarStyle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Scalar,
    Mapping,
    Sequence,
    Alias,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Scalar => "scalar",
            NodeKind::Mapping => "mapping",
            NodeKind::Sequence => "sequence",
            NodeKind::Alias => "alias",
        }
    }
}

/// One node of a parsed document.
///
/// Mapping children alternate key and value nodes; a document node holds its
/// single root node.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    /// Scalar text; empty for every other kind.
    pub value: String,
    /// Raw comment lines (markers included) directly above the node.
    pub head_comment: String,
    /// Zero-based source line the node starts on.
    pub line: usize,
    /// Plain (unquoted, non-block) scalar, subject to type resolution.
    pub plain: bool,
    pub children: Vec<Node>,
}

impl Node {
    fn new(kind: NodeKind, value: String, line: usize) -> Self {
        Self {
            kind,
            value,
            head_comment: String::new(),
            line,
            plain: false,
            children: Vec::new(),
        }
    }

    pub fn tags(&self) -> Tags {
        Tags::parse(&self.head_comment)
    }

    /// Text of this node used as a mapping key, normalised the way
    /// [`decode`] normalises keys (`~` is `null`, `0x10` is `16`).
    pub fn key_text(&self) -> String {
        if !self.plain {
            return self.value.clone();
        }
        serde_yaml::from_str::<serde_yaml::Value>(&self.value)
            .ok()
            .and_then(|value| key_text(value).ok())
            .unwrap_or_else(|| self.value.clone())
    }
}

/// Parse the first document of `text`.
///
/// Returns `Ok(None)` when the text holds no document at all (empty,
/// whitespace only, or comments only).
pub fn parse(text: &str) -> Result<Option<Node>, ScanError> {
    let source = Source::new(text);
    let mut builder = TreeBuilder {
        source: &source,
        stack: Vec::new(),
        document: None,
        claimed_line: None,
    };
    let mut parser = Parser::new(text.chars());
    parser.load(&mut builder, false)?;
    Ok(builder.document)
}

/// Decode `text` into a generic value tree with text-only mapping keys.
pub fn decode(text: &str) -> Result<Value, DecodeError> {
    let raw: serde_yaml::Value = serde_yaml::from_str(text)?;
    to_json(raw)
}

fn to_json(value: serde_yaml::Value) -> Result<Value, DecodeError> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(flag) => Value::Bool(flag),
        Yaml::Number(number) => to_json_number(&number)?,
        Yaml::String(text) => Value::String(text),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(key_text(key)?, to_json(value)?);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => {
            let serde_yaml::value::TaggedValue { value, .. } = *tagged;
            to_json(value)?
        }
    })
}

// `.inf` and `.nan` are valid YAML but have no JSON counterpart.
fn to_json_number(number: &serde_yaml::Number) -> Result<Value, DecodeError> {
    if let Some(int) = number.as_i64() {
        Ok(Value::from(int))
    } else if let Some(uint) = number.as_u64() {
        Ok(Value::from(uint))
    } else {
        number
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| DecodeError::Number {
                found: number.to_string(),
            })
    }
}

// Keys are normalised to text; composite keys have no text form.
fn key_text(key: serde_yaml::Value) -> Result<String, DecodeError> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(text) => Ok(text),
        Yaml::Number(number) => Ok(number.to_string()),
        Yaml::Bool(flag) => Ok(flag.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => {
            let serde_yaml::value::TaggedValue { value, .. } = *tagged;
            key_text(value)
        }
        Yaml::Sequence(_) => Err(DecodeError::Key { found: "sequence" }),
        Yaml::Mapping(_) => Err(DecodeError::Key { found: "mapping" }),
    }
}

struct Source<'a> {
    lines: Vec<&'a str>,
    // Char offsets, matching parser marker indices.
    line_starts: Vec<usize>,
}

impl<'a> Source<'a> {
    fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (index, ch) in text.chars().enumerate() {
            if ch == '\n' {
                line_starts.push(index + 1);
            }
        }
        Self {
            lines: text.lines().collect(),
            line_starts,
        }
    }

    fn line_of(&self, mark: &Marker) -> usize {
        match self.line_starts.binary_search(&mark.index()) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        }
    }

    fn indent(&self, line: usize) -> usize {
        self.lines
            .get(line)
            .map_or(0, |text| text.len() - text.trim_start().len())
    }

    fn head_comment(&self, line: usize) -> String {
        let indent = self.indent(line);
        let mut collected = Vec::new();
        for candidate in (0..line.min(self.lines.len())).rev() {
            let trimmed = self.lines[candidate].trim();
            if !trimmed.starts_with('#') || self.indent(candidate) != indent {
                break;
            }
            collected.push(trimmed);
        }
        collected.reverse();
        collected.join("\n")
    }
}

struct Frame {
    node: Node,
    // Collection sitting in the value slot of a mapping entry.
    nested: bool,
}

struct TreeBuilder<'s, 'a> {
    source: &'s Source<'a>,
    stack: Vec<Frame>,
    document: Option<Node>,
    claimed_line: Option<usize>,
}

impl TreeBuilder<'_, '_> {
    fn leaf(&mut self, kind: NodeKind, value: String, plain: bool, mark: &Marker) {
        let line = self.source.line_of(mark);
        let mut node = Node::new(kind, value, line);
        node.plain = plain;
        if self.claimed_line != Some(line) {
            self.claimed_line = Some(line);
            node.head_comment = self.source.head_comment(line);
        }
        self.attach(node);
    }

    fn open(&mut self, kind: NodeKind, mark: &Marker) {
        let nested = self.stack.last().is_some_and(|frame| {
            frame.node.kind == NodeKind::Mapping && frame.node.children.len() % 2 == 1
        });
        let line = self.source.line_of(mark);
        self.stack.push(Frame {
            node: Node::new(kind, String::new(), line),
            nested,
        });
    }

    fn close(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if self.stack.is_empty() {
            if self.document.is_none() {
                self.document = Some(frame.node);
            }
        } else {
            self.attach(frame.node);
        }
    }

    fn attach(&mut self, mut node: Node) {
        let Some(parent) = self.stack.last_mut() else {
            return;
        };
        if parent.nested && parent.node.children.is_empty() {
            parent.node.head_comment = std::mem::take(&mut node.head_comment);
        }
        parent.node.children.push(node);
    }
}

impl MarkedEventReceiver for TreeBuilder<'_, '_> {
    fn on_event(&mut self, event: Event, mark: Marker) {
        match event {
            Event::DocumentStart { .. } => self.open(NodeKind::Document, &mark),
            Event::MappingStart { .. } => self.open(NodeKind::Mapping, &mark),
            Event::SequenceStart { .. } => self.open(NodeKind::Sequence, &mark),
            Event::Scalar(value, style, ..) => {
                let plain = style == TScalarStyle::Plain;
                self.leaf(NodeKind::Scalar, value, plain, &mark)
            }
            Event::Alias { .. } => self.leaf(NodeKind::Alias, String::new(), false, &mark),
            Event::DocumentEnd { .. } | Event::MappingEnd { .. } | Event::SequenceEnd { .. } => {
                self.close()
            }
            _ => {}
        }
    }
}
