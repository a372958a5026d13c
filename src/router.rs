use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::error::{InsertError, UnknownMethod};
use crate::params::Params;
use crate::tree::{Lookup, PathTree};

/// The methods a [`Router`] keeps a tree for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::Connect,
        Method::Delete,
        Method::Get,
        Method::Head,
        Method::Options,
        Method::Patch,
        Method::Post,
        Method::Put,
        Method::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Connect => "CONNECT",
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Trace => "TRACE",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = UnknownMethod;

    /// Method tokens are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_owned()))
    }
}

/// One [`PathTree`] per method, created on first registration.
///
/// Registration happens up front through `&mut self`; afterwards the router
/// is only read and can be shared between threads.
#[derive(Clone)]
pub struct Router<H> {
    trees: [Option<PathTree<H>>; 9],
    config: Config,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Router::new()
    }
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Router::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Router {
            trees: Default::default(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A parameter buffer sized for this router.
    pub fn params(&self) -> Params {
        Params::with_capacity(self.config.max_params)
    }

    pub fn tree(&self, method: Method) -> Option<&PathTree<H>> {
        self.trees[method.index()].as_ref()
    }

    pub fn add_route(&mut self, method: Method, pattern: &str, handler: H) -> Result<(), InsertError> {
        let config = self.config;
        let slot = &mut self.trees[method.index()];
        let tree = slot.get_or_insert_with(|| {
            trace!(method = %method, "creating method tree");
            PathTree::with_config(config)
        });

        if let Err(err) = tree.insert(pattern, handler) {
            warn!(method = %method, pattern, error = %err, "route rejected");
            if tree.is_empty() {
                *slot = None;
            }
            return Err(err);
        }
        debug!(method = %method, pattern, "route registered");
        Ok(())
    }

    pub fn get(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        self.add_route(Method::Get, pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        self.add_route(Method::Post, pattern, handler)
    }

    pub fn put(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        self.add_route(Method::Put, pattern, handler)
    }

    pub fn delete(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        self.add_route(Method::Delete, pattern, handler)
    }

    pub fn patch(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        self.add_route(Method::Patch, pattern, handler)
    }

    pub fn head(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        self.add_route(Method::Head, pattern, handler)
    }

    pub fn options(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        self.add_route(Method::Options, pattern, handler)
    }

    /// Registers `handler` for every method. Either all trees take the
    /// pattern or none does.
    pub fn any(&mut self, pattern: &str, handler: H) -> Result<(), InsertError>
    where
        H: Clone,
    {
        let routes = Method::ALL.iter().map(|&method| (method, handler.clone())).collect();
        self.add_routes(pattern, routes)
    }

    /// Registers a resource: `GET`, `POST`, `PUT` and `DELETE` on one pattern,
    /// all or none.
    pub fn rest(&mut self, pattern: &str, get: H, post: H, put: H, delete: H) -> Result<(), InsertError> {
        self.add_routes(
            pattern,
            vec![
                (Method::Get, get),
                (Method::Post, post),
                (Method::Put, put),
                (Method::Delete, delete),
            ],
        )
    }

    // Checks every target tree before touching any of them.
    fn add_routes(&mut self, pattern: &str, routes: Vec<(Method, H)>) -> Result<(), InsertError> {
        for (method, _) in &routes {
            if let Some(tree) = self.tree(*method) {
                if let Err(err) = tree.check(pattern) {
                    warn!(method = %method, pattern, error = %err, "route set rejected");
                    return Err(err);
                }
            }
        }
        for (method, handler) in routes {
            self.add_route(method, pattern, handler)?;
        }
        Ok(())
    }

    /// A registration scope that prefixes every pattern with `prefix`.
    pub fn group(&mut self, prefix: &str) -> Group<'_, H> {
        Group {
            router: self,
            prefix: prefix.to_owned(),
        }
    }

    /// Matches `path` in the tree of `method`, appending bindings to
    /// `params`. A method without routes never matches.
    pub fn resolve<'r>(&'r self, method: Method, path: &str, params: &mut Params) -> Lookup<'r, H> {
        match &self.trees[method.index()] {
            Some(tree) => tree.search(path, params),
            None => Lookup::NotFound,
        }
    }

    /// Methods whose tree has a route for `path`.
    pub fn allowed(&self, path: &str) -> Vec<Method> {
        let mut params = Params::new();
        Method::ALL
            .iter()
            .copied()
            .filter(|&method| {
                params.clear();
                self.resolve(method, path, &mut params).is_found()
            })
            .collect()
    }
}

impl<H: fmt::Debug> fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for method in Method::ALL {
            if let Some(tree) = self.tree(method) {
                map.entry(&method, tree);
            }
        }
        map.finish()
    }
}

/// Routes registered under a shared prefix, see [`Router::group`].
pub struct Group<'r, H> {
    router: &'r mut Router<H>,
    prefix: String,
}

impl<H> Group<'_, H> {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// A nested scope; prefixes concatenate.
    pub fn group(&mut self, prefix: &str) -> Group<'_, H> {
        Group {
            prefix: format!("{}{}", self.prefix, prefix),
            router: &mut *self.router,
        }
    }

    fn join(&self, pattern: &str) -> String {
        format!("{}{}", self.prefix, pattern)
    }

    pub fn add_route(&mut self, method: Method, pattern: &str, handler: H) -> Result<(), InsertError> {
        let pattern = self.join(pattern);
        self.router.add_route(method, &pattern, handler)
    }

    pub fn get(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        self.add_route(Method::Get, pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        self.add_route(Method::Post, pattern, handler)
    }

    pub fn put(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        self.add_route(Method::Put, pattern, handler)
    }

    pub fn delete(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        self.add_route(Method::Delete, pattern, handler)
    }

    pub fn patch(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        self.add_route(Method::Patch, pattern, handler)
    }

    pub fn head(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        self.add_route(Method::Head, pattern, handler)
    }

    pub fn options(&mut self, pattern: &str, handler: H) -> Result<(), InsertError> {
        self.add_route(Method::Options, pattern, handler)
    }

    pub fn any(&mut self, pattern: &str, handler: H) -> Result<(), InsertError>
    where
        H: Clone,
    {
        let pattern = self.join(pattern);
        self.router.any(&pattern, handler)
    }

    /// See [`Router::rest`].
    pub fn rest(&mut self, pattern: &str, get: H, post: H, put: H, delete: H) -> Result<(), InsertError> {
        let pattern = self.join(pattern);
        self.router.rest(&pattern, get, post, put, delete)
    }
}
