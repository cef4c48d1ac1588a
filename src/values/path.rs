//! Dotted/bracketed tree paths such as `app.containers[0].image`.

use std::fmt;

/// One step of a tree path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// A parsed location inside a configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TreePath {
    segments: Vec<Segment>,
}

impl TreePath {
    /// Parse `a.b[0].c` into `Key(a), Key(b), Index(0), Key(c)`.
    ///
    /// A bracket group that is not a plain number stays part of the key.
    pub fn parse(path: &str) -> Self {
        let mut segments = Vec::new();
        if path.is_empty() {
            return Self { segments };
        }

        for part in path.split('.') {
            let (key, indices) = split_indices(part);
            if !key.is_empty() || indices.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }
            segments.extend(indices.into_iter().map(Segment::Index));
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// The first segment, if it is a mapping key.
    pub fn first_key(&self) -> Option<&str> {
        match self.segments.first() {
            Some(Segment::Key(k)) => Some(k),
            _ => None,
        }
    }

    /// Drop the last segment.
    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(Segment::Key(key.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }
}

/// Split `name[1][2]` into `("name", [1, 2])`.
fn split_indices(part: &str) -> (&str, Vec<usize>) {
    let Some(open) = part.find('[') else {
        return (part, Vec::new());
    };

    let mut indices = Vec::new();
    let mut rest = &part[open..];
    while let Some(stripped) = rest.strip_prefix('[') {
        let Some(close) = stripped.find(']') else {
            return (part, Vec::new());
        };
        match stripped[..close].parse::<usize>() {
            Ok(idx) => indices.push(idx),
            Err(_) => return (part, Vec::new()),
        }
        rest = &stripped[close + 1..];
    }

    if rest.is_empty() {
        (&part[..open], indices)
    } else {
        (part, Vec::new())
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                Segment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

impl From<&str> for TreePath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}
