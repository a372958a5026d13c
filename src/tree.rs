use std::fmt;

use crate::config::Config;
use crate::error::InsertError;
use crate::node::{Node, Search};
use crate::params::Params;
use crate::pattern;

/// A successful lookup: the registered pattern and the value stored with it.
pub struct Match<'t, T> {
    pub pattern: &'t str,
    pub value: &'t T,
}

impl<T> Clone for Match<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Match<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Match<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("pattern", &self.pattern)
            .field("value", self.value)
            .finish()
    }
}

/// Outcome of [`PathTree::search`].
#[derive(Debug)]
pub enum Lookup<'t, T> {
    Found(Match<'t, T>),
    /// Nothing matched, but the path would match with a trailing slash
    /// added or removed. Callers may answer with a redirect.
    TrailingSlash,
    NotFound,
}

impl<'t, T> Lookup<'t, T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn is_trailing_slash(&self) -> bool {
        matches!(self, Lookup::TrailingSlash)
    }

    pub fn found(self) -> Option<Match<'t, T>> {
        match self {
            Lookup::Found(m) => Some(m),
            _ => None,
        }
    }

    pub fn pattern(&self) -> Option<&'t str> {
        match self {
            Lookup::Found(m) => Some(m.pattern),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&'t T> {
        match self {
            Lookup::Found(m) => Some(m.value),
            _ => None,
        }
    }
}

/// A radix tree of path patterns.
///
/// Patterns are made of literal bytes, `:name` parameters covering one
/// segment and a trailing `*name` catch-all:
///
/// ```
/// use radix_route::{Params, PathTree};
///
/// let mut tree = PathTree::new();
/// tree.insert("/users/:id", 1).unwrap();
/// tree.insert("/files/*path", 2).unwrap();
///
/// let mut params = Params::new();
/// let found = tree.search("/files/a/b.rs", &mut params).found().unwrap();
/// assert_eq!(found.pattern, "/files/*path");
/// assert_eq!(*found.value, 2);
/// assert_eq!(params.get("path"), Some("/a/b.rs"));
/// ```
#[derive(Clone)]
pub struct PathTree<T> {
    root: Node<T>,
    config: Config,
    len: usize,
}

impl<T> Default for PathTree<T> {
    fn default() -> Self {
        PathTree::new()
    }
}

impl<T> PathTree<T> {
    pub fn new() -> Self {
        PathTree::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        PathTree {
            root: Node::root(),
            config,
            len: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Registers `pattern`. On error the tree is left unchanged.
    pub fn insert(&mut self, pattern: &str, value: T) -> Result<(), InsertError> {
        let parsed = pattern::parse(pattern)?;
        self.root.check(&parsed, pattern)?;
        self.root.graft(&parsed).set_endpoint(pattern, value);
        self.len += 1;
        Ok(())
    }

    /// Reports whether `insert(pattern, ..)` would succeed, without
    /// touching the tree.
    pub fn check(&self, pattern: &str) -> Result<(), InsertError> {
        let parsed = pattern::parse(pattern)?;
        self.root.check(&parsed, pattern)
    }

    /// Matches `path` and appends its parameter bindings to `params`.
    ///
    /// Bindings already in `params` are left alone; on anything but
    /// `Lookup::Found` nothing is appended.
    pub fn search<'t>(&'t self, path: &str, params: &mut Params) -> Lookup<'t, T> {
        let mark = params.len();
        let mut search = Search {
            params: &mut *params,
            decode: self.config.decode_params,
            redirect: false,
        };

        match self.root.find(path.as_bytes(), &mut search) {
            Some(endpoint) => Lookup::Found(Match {
                pattern: &endpoint.pattern,
                value: &endpoint.value,
            }),
            None => {
                let redirect = search.redirect;
                params.truncate(mark);
                if redirect && self.config.redirect_trailing_slash {
                    Lookup::TrailingSlash
                } else {
                    Lookup::NotFound
                }
            }
        }
    }

    pub fn find(&self, path: &str) -> Option<(Match<'_, T>, Params)> {
        let mut params = Params::new();
        let found = self.search(path, &mut params).found()?;
        Some((found, params))
    }

    /// Registered patterns, statics before wildcards, busiest branch first.
    pub fn patterns(&self) -> Vec<&str> {
        let mut endpoints = Vec::with_capacity(self.len);
        self.root.endpoints(&mut endpoints);
        endpoints.into_iter().map(|e| e.pattern.as_str()).collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for PathTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathTree")
            .field("len", &self.len)
            .field("config", &self.config)
            .field("root", &self.root)
            .finish()
    }
}
