use std::fmt;
use std::mem;
use std::str;

use percent_encoding::percent_decode;

use crate::error::InsertError;
use crate::params::Params;
use crate::pattern::{Parsed, Piece};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Static,
    Parameter,
    CatchAll,
}

#[derive(Clone, Debug)]
pub(crate) struct Endpoint<T> {
    pub(crate) pattern: String,
    pub(crate) value: T,
}

// A node of the radix tree. Static children are ordered by priority, the
// number of patterns registered below them, so busy branches are probed
// first. Wildcards never share the static list.
#[derive(Clone)]
pub(crate) struct Node<T> {
    segment: Vec<u8>,
    kind: NodeKind,
    priority: u32,
    indices: Vec<u8>,
    children: Vec<Node<T>>,
    wildcard: Option<Box<Node<T>>>,
    endpoint: Option<Endpoint<T>>,
}

pub(crate) struct Search<'p> {
    pub(crate) params: &'p mut Params,
    pub(crate) decode: bool,
    // some branch missed only by a trailing slash
    pub(crate) redirect: bool,
}

impl Search<'_> {
    fn capture(&mut self, key: &[u8], head: &str, raw: &[u8]) -> Option<()> {
        let key = str::from_utf8(key).ok()?;
        if self.decode {
            if let Ok(value) = percent_decode(raw).decode_utf8() {
                self.params.push_joined(key, head, &value);
                return Some(());
            }
        }
        self.params.push_joined(key, head, str::from_utf8(raw).ok()?);
        Some(())
    }
}

fn longest_common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(a, b)| a == b).count()
}

impl<T> Node<T> {
    pub(crate) fn root() -> Self {
        Node::new(NodeKind::Root, Vec::new())
    }

    fn new(kind: NodeKind, segment: Vec<u8>) -> Self {
        Node {
            segment,
            kind,
            priority: 0,
            indices: Vec::new(),
            children: Vec::new(),
            wildcard: None,
            endpoint: None,
        }
    }

    fn is_vacant(&self) -> bool {
        self.segment.is_empty()
            && self.children.is_empty()
            && self.wildcard.is_none()
            && self.endpoint.is_none()
    }

    // Every registration error is raised here, `graft` cannot fail.
    pub(crate) fn check(&self, parsed: &Parsed<'_>, pattern: &str) -> Result<(), InsertError> {
        if self.is_vacant() {
            return Ok(());
        }

        let common = longest_common_prefix(parsed.prefix, &self.segment);
        if common < self.segment.len() {
            return Ok(());
        }
        let mut node = match self.probe(&parsed.prefix[common..]) {
            Some(node) => node,
            None => return Ok(()),
        };

        for piece in &parsed.pieces {
            node = match *piece {
                Piece::Static(s) => match node.probe(s) {
                    Some(next) => next,
                    None => return Ok(()),
                },
                Piece::Wild(kind, wildcard) => match &node.wildcard {
                    None => return Ok(()),
                    Some(child) if child.kind == kind && child.segment == wildcard => &**child,
                    Some(child) => {
                        return Err(InsertError::WildcardConflict {
                            pattern: pattern.to_owned(),
                            wildcard: String::from_utf8_lossy(wildcard).into_owned(),
                            existing: String::from_utf8_lossy(&child.segment).into_owned(),
                        })
                    }
                },
            };
        }

        match node.endpoint {
            Some(_) => Err(InsertError::DuplicateRoute {
                pattern: pattern.to_owned(),
            }),
            None => Ok(()),
        }
    }

    // Follows `s` through existing static children. `None` means the
    // insertion would split or create a node from here on, so nothing below
    // can clash.
    fn probe(&self, s: &[u8]) -> Option<&Self> {
        let first = match s.first() {
            Some(&c) => c,
            None => return Some(self),
        };
        let pos = self.indices.iter().position(|&c| c == first)?;
        let child = &self.children[pos];
        let rest = s.strip_prefix(child.segment.as_slice())?;
        child.probe(rest)
    }

    pub(crate) fn graft(&mut self, parsed: &Parsed<'_>) -> &mut Self {
        self.priority += 1;

        let mut node = if self.is_vacant() {
            self.segment = parsed.prefix.to_vec();
            self
        } else {
            let common = longest_common_prefix(parsed.prefix, &self.segment);
            if common < self.segment.len() {
                self.split(common);
            }
            self.insert_static(&parsed.prefix[common..])
        };

        for piece in &parsed.pieces {
            node = match *piece {
                Piece::Static(s) => node.insert_static(s),
                Piece::Wild(kind, wildcard) => node.insert_wild(kind, wildcard),
            };
        }

        node
    }

    pub(crate) fn set_endpoint(&mut self, pattern: &str, value: T) {
        self.endpoint = Some(Endpoint {
            pattern: pattern.to_owned(),
            value,
        });
    }

    // Keeps `segment[..at]` here and pushes the rest, with everything that
    // hung below, into a single static child.
    fn split(&mut self, at: usize) {
        let suffix = self.segment.split_off(at);
        let child = Node {
            segment: suffix,
            kind: NodeKind::Static,
            priority: self.priority.saturating_sub(1),
            indices: mem::take(&mut self.indices),
            children: mem::take(&mut self.children),
            wildcard: self.wildcard.take(),
            endpoint: self.endpoint.take(),
        };
        self.indices = vec![child.segment[0]];
        self.children = vec![child];
    }

    fn insert_static(&mut self, s: &[u8]) -> &mut Self {
        let first = match s.first() {
            Some(&c) => c,
            None => return self,
        };

        let pos = match self.indices.iter().position(|&c| c == first) {
            Some(pos) => pos,
            None => {
                self.indices.push(first);
                self.children.push(Node::new(NodeKind::Static, s.to_vec()));
                self.children.len() - 1
            }
        };
        let pos = self.bump(pos);

        let child = &mut self.children[pos];
        let common = longest_common_prefix(s, &child.segment);
        if common < child.segment.len() {
            child.split(common);
        }
        child.insert_static(&s[common..])
    }

    fn insert_wild(&mut self, kind: NodeKind, wildcard: &[u8]) -> &mut Self {
        let child = self
            .wildcard
            .get_or_insert_with(|| Box::new(Node::new(kind, wildcard.to_vec())));
        child.priority += 1;
        &mut **child
    }

    // Increments the priority of child `pos` and moves it in front of
    // siblings with a lower one. Ties keep their order.
    fn bump(&mut self, pos: usize) -> usize {
        self.children[pos].priority += 1;
        let priority = self.children[pos].priority;

        let mut to = pos;
        while to > 0 && self.children[to - 1].priority < priority {
            to -= 1;
        }
        if to != pos {
            self.children[to..=pos].rotate_right(1);
            self.indices[to..=pos].rotate_right(1);
        }
        to
    }

    pub(crate) fn find<'t>(&'t self, path: &[u8], search: &mut Search<'_>) -> Option<&'t Endpoint<T>> {
        match self.kind {
            NodeKind::Root | NodeKind::Static => match path.strip_prefix(self.segment.as_slice()) {
                Some(rest) => self.descend(rest, search),
                None => {
                    // `/doc` against the endpoint `/doc/`
                    if (self.endpoint.is_some() || self.catch_all().is_some())
                        && self.segment.len() == path.len() + 1
                        && self.segment.ends_with(b"/")
                        && self.segment.starts_with(path)
                    {
                        search.redirect = true;
                    }
                    None
                }
            },
            NodeKind::Parameter => {
                let end = path.iter().position(|&c| c == b'/').unwrap_or(path.len());
                if end == 0 {
                    return None;
                }
                let mark = search.params.len();
                search.capture(&self.segment[1..], "", &path[..end])?;
                let found = self.descend(&path[end..], search);
                if found.is_none() {
                    search.params.truncate(mark);
                }
                found
            }
            NodeKind::CatchAll => {
                // the parent's segment ends with the `/` the value starts with
                search.capture(&self.segment[1..], "/", path)?;
                self.endpoint.as_ref()
            }
        }
    }

    fn descend<'t>(&'t self, rest: &[u8], search: &mut Search<'_>) -> Option<&'t Endpoint<T>> {
        let first = match rest.first() {
            Some(&c) => c,
            None => {
                if self.endpoint.is_some() {
                    return self.endpoint.as_ref();
                }
                if let Some(catch_all) = self.catch_all() {
                    return catch_all.find(rest, search);
                }
                if self.slash_below() {
                    search.redirect = true;
                }
                return None;
            }
        };

        if let Some(pos) = self.indices.iter().position(|&c| c == first) {
            if let Some(found) = self.children[pos].find(rest, search) {
                return Some(found);
            }
        }
        if let Some(wild) = &self.wildcard {
            if let Some(found) = wild.find(rest, search) {
                return Some(found);
            }
        }

        if rest == b"/" && self.endpoint.is_some() {
            search.redirect = true;
        }
        None
    }

    fn catch_all(&self) -> Option<&Self> {
        self.wildcard
            .as_deref()
            .filter(|wild| wild.kind == NodeKind::CatchAll)
    }

    // A `/` child that is an endpoint or carries a catch-all.
    fn slash_below(&self) -> bool {
        self.indices
            .iter()
            .position(|&c| c == b'/')
            .map_or(false, |pos| {
                let child = &self.children[pos];
                child.segment == b"/" && (child.endpoint.is_some() || child.catch_all().is_some())
            })
    }

    pub(crate) fn endpoints<'t>(&'t self, out: &mut Vec<&'t Endpoint<T>>) {
        if let Some(endpoint) = &self.endpoint {
            out.push(endpoint);
        }
        for child in &self.children {
            child.endpoints(out);
        }
        if let Some(wild) = &self.wildcard {
            wild.endpoints(out);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("segment", &String::from_utf8_lossy(&self.segment))
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("indices", &String::from_utf8_lossy(&self.indices))
            .field("children", &self.children)
            .field("wildcard", &self.wildcard)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
