use std::fmt;
use std::fmt::{Display, Formatter};

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::types::ds::error::BeanError;

#[derive(Parser)]
#[grammar = "parser/path_grammar.pest"] // relative to src
pub struct PathParser;

/// One segment of a content path plus the (optional) remainder.
///
/// `@address.lines[2].text` parses into `address` (attribute marked) with the
/// child path `lines[2].text`, which in turn has index `2` and child `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    name: String,
    attribute: bool,
    index: Option<String>,
    child: Option<Box<ParsedPath>>,
}

impl ParsedPath {
    pub fn parse(path: &str) -> Result<ParsedPath, BeanError> {
        let mut pairs = PathParser::parse(Rule::path, path).map_err(|e| BeanError::InvalidPath {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let root = pairs.next().ok_or_else(|| BeanError::InvalidPath {
            path: path.to_string(),
            message: "empty path".to_string(),
        })?;

        let mut segments = vec![];
        for pair in root.into_inner() {
            if let Rule::segment = pair.as_rule() {
                segments.push(build_segment(pair));
            }
        }

        let mut child: Option<Box<ParsedPath>> = None;
        while let Some(mut segment) = segments.pop() {
            segment.child = child;
            child = Some(Box::new(segment));
        }
        child.map(|c| *c).ok_or_else(|| BeanError::InvalidPath {
            path: path.to_string(),
            message: "no segments".to_string(),
        })
    }

    /// The field name with any attribute marker already stripped.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_attribute(&self) -> bool {
        self.attribute
    }

    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn child(&self) -> Option<&ParsedPath> {
        self.child.as_deref()
    }
}

impl Display for ParsedPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.attribute {
            write!(f, "@")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(index) = &self.index {
            write!(f, "[{}]", index)?;
        }
        if let Some(child) = &self.child {
            write!(f, ".{}", child)?;
        }
        Ok(())
    }
}

fn build_segment(pair: Pair<Rule>) -> ParsedPath {
    let mut segment = ParsedPath {
        name: String::new(),
        attribute: false,
        index: None,
        child: None,
    };
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::attribute => segment.attribute = true,
            Rule::name => segment.name = inner.as_str().to_string(),
            Rule::index => {
                segment.index = inner
                    .into_inner()
                    .next()
                    .map(|token| token.as_str().to_string())
            }
            _ => {}
        }
    }
    segment
}
