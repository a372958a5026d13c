use radix_route::{Config, InsertError, Lookup, Method, Params, PathTree, Router};

#[test]
fn every_registered_pattern_matches_itself() {
    let patterns = [
        "/",
        "/index.html",
        "/favicon.ico",
        "/doc/",
        "/doc/rust_faq.html",
        "/doc/rust1.html",
        "/pkg/",
        "/pkg/net/http",
        "/α/β",
    ];

    let mut tree = PathTree::new();
    for (i, pattern) in patterns.iter().enumerate() {
        tree.insert(pattern, i).unwrap();
    }
    assert_eq!(tree.len(), patterns.len());

    let mut params = Params::new();
    for (i, pattern) in patterns.iter().enumerate() {
        params.clear();
        let found = tree.search(pattern, &mut params).found().unwrap();
        assert_eq!(found.pattern, *pattern);
        assert_eq!(*found.value, i);
        assert!(params.is_empty());
    }

    let mut registered = tree.patterns();
    registered.sort_unstable();
    let mut expected = patterns.to_vec();
    expected.sort_unstable();
    assert_eq!(registered, expected);
}

#[test]
fn parameters_are_returned_in_path_order() {
    let mut tree = PathTree::new();
    tree.insert("/repos/:owner/:repo/pulls/:number/files", ()).unwrap();

    let (found, params) = tree.find("/repos/viz-rs/path-tree/pulls/42/files").unwrap();
    assert_eq!(found.pattern, "/repos/:owner/:repo/pulls/:number/files");
    assert_eq!(params.len(), 3);
    assert_eq!(&params[0], "viz-rs");
    assert_eq!(&params[2], "42");

    let keys: Vec<_> = params.iter().map(|p| p.key()).collect();
    assert_eq!(keys, ["owner", "repo", "number"]);
    assert_eq!(params.get("repo"), Some("path-tree"));
    assert_eq!(params.get("missing"), None);
}

#[test]
fn catch_all_keeps_its_slash() {
    let mut tree = PathTree::new();
    tree.insert("/user/:name/*rest", ()).unwrap();

    let (_, params) = tree.find("/user/alice/a/b/c").unwrap();
    assert_eq!(params.pairs(), [("name", "alice"), ("rest", "/a/b/c")]);

    let (_, params) = tree.find("/user/alice/").unwrap();
    assert_eq!(params.pairs(), [("name", "alice"), ("rest", "/")]);

    assert!(tree.find("/user/alice").is_none());
}

#[test]
fn statics_take_precedence_over_wildcards() {
    let mut tree = PathTree::new();
    tree.insert("/users/:id", "param").unwrap();
    tree.insert("/users/new", "static").unwrap();
    tree.insert("/static/*file", "catch-all").unwrap();
    tree.insert("/static/index.html", "index").unwrap();

    let (found, params) = tree.find("/users/new").unwrap();
    assert_eq!(*found.value, "static");
    assert!(params.is_empty());

    let (found, params) = tree.find("/users/newer").unwrap();
    assert_eq!(*found.value, "param");
    assert_eq!(params.get("id"), Some("newer"));

    let (found, params) = tree.find("/static/index.html").unwrap();
    assert_eq!(*found.value, "index");
    assert!(params.is_empty());

    let (found, params) = tree.find("/static/index.htm").unwrap();
    assert_eq!(*found.value, "catch-all");
    assert_eq!(params.get("file"), Some("/index.htm"));

    let (found, params) = tree.find("/static/index.html/raw").unwrap();
    assert_eq!(*found.value, "catch-all");
    assert_eq!(params.get("file"), Some("/index.html/raw"));
}

#[test]
fn param_and_catch_all_in_one_position_conflict() {
    for (first, second) in [("/files/:name", "/files/*path"), ("/files/*path", "/files/:name")] {
        let mut tree = PathTree::new();
        tree.insert(first, 0).unwrap();

        let err = tree.insert(second, 1).unwrap_err();
        assert_eq!(
            err,
            InsertError::WildcardConflict {
                pattern: second.to_owned(),
                wildcard: second["/files/".len()..].to_owned(),
                existing: first["/files/".len()..].to_owned(),
            }
        );
        assert_eq!(tree.len(), 1);
    }

    let mut tree = PathTree::new();
    tree.insert("/:a/:b", "pair").unwrap();
    assert!(tree.insert("/*a", "rest").is_err());

    let (found, params) = tree.find("/Z/Y").unwrap();
    assert_eq!(found.pattern, "/:a/:b");
    assert_eq!(params.pairs(), [("a", "Z"), ("b", "Y")]);
    assert!(tree.find("/Z").is_none());
}

#[test]
fn conflicting_wildcards_are_rejected() {
    let mut tree = PathTree::new();
    tree.insert("/users/:id", 0).unwrap();
    tree.insert("/files/*path", 1).unwrap();

    let err = tree.insert("/users/:name", 2).unwrap_err();
    assert_eq!(
        err,
        InsertError::WildcardConflict {
            pattern: "/users/:name".to_owned(),
            wildcard: ":name".to_owned(),
            existing: ":id".to_owned(),
        }
    );
    assert_eq!(err.pattern(), "/users/:name");
    assert_eq!(
        err.to_string(),
        "':name' in new path '/users/:name' conflicts with existing wildcard ':id'"
    );

    assert!(matches!(
        tree.insert("/files/*rest", 3),
        Err(InsertError::WildcardConflict { .. })
    ));
    assert!(tree.check("/users/:name/stars").is_err());
    assert!(tree.check("/users/:id/stars").is_ok());

    assert_eq!(tree.len(), 2);
    let (_, params) = tree.find("/users/7").unwrap();
    assert_eq!(params.get("id"), Some("7"));
}

#[test]
fn duplicates_are_rejected() {
    let mut tree = PathTree::new();
    tree.insert("/users/:id", 0).unwrap();

    let err = tree.insert("/users/:id", 1).unwrap_err();
    assert_eq!(
        err,
        InsertError::DuplicateRoute {
            pattern: "/users/:id".to_owned()
        }
    );

    // the first registration keeps its value
    let (found, _) = tree.find("/users/1").unwrap();
    assert_eq!(*found.value, 0);
    assert_eq!(tree.len(), 1);
}

#[test]
fn malformed_patterns_are_rejected() {
    let mut tree = PathTree::new();
    assert!(matches!(
        tree.insert("/src/*filepath/more", 0),
        Err(InsertError::CatchAllNotTrailing { .. })
    ));
    assert!(matches!(
        tree.insert("/src*filepath", 0),
        Err(InsertError::CatchAllMissingSlash { .. })
    ));
    assert!(matches!(
        tree.insert("/users/:/profile", 0),
        Err(InsertError::EmptyWildcardName { .. })
    ));
    assert!(matches!(
        tree.insert("/:name.:ext", 0),
        Err(InsertError::MultipleWildcards { .. })
    ));
    assert!(tree.is_empty());
}

#[test]
fn no_false_positives() {
    let mut tree = PathTree::new();
    for pattern in ["/hi", "/contact", "/co", "/users/:id", "/users/:id/posts", "/static/*file"] {
        tree.insert(pattern, pattern).unwrap();
    }

    for path in [
        "",
        "/",
        "/h",
        "/hii",
        "/c",
        "/con",
        "/contacts",
        "/users",
        "/users//posts",
        "/users/1/comments",
        "/static",
        "/staticx/a",
    ] {
        assert!(tree.find(path).is_none(), "{} should not match", path);
    }
}

#[test]
fn failed_lookups_keep_existing_bindings() {
    let mut tree = PathTree::new();
    tree.insert("/users/:id/posts", 0).unwrap();

    let mut params = Params::new();
    params.push("tenant", "acme");

    assert!(matches!(tree.search("/users/7/comments", &mut params), Lookup::NotFound));
    assert_eq!(params.len(), 1);
    assert_eq!(params.get("tenant"), Some("acme"));

    assert!(tree.search("/users/7/posts", &mut params).is_found());
    assert_eq!(params.pairs(), [("tenant", "acme"), ("id", "7")]);
}

#[test]
fn trailing_slash_recommendations() {
    let mut tree = PathTree::new();
    tree.insert("/doc/", 0).unwrap();
    tree.insert("/about", 1).unwrap();
    tree.insert("/users/:id", 2).unwrap();
    tree.insert("/cmd/:tool/", 3).unwrap();
    tree.insert("/src/*filepath", 4).unwrap();

    let mut params = Params::new();
    for path in ["/doc", "/about/", "/users/7/", "/cmd/vet", "/src"] {
        params.clear();
        assert!(
            tree.search(path, &mut params).is_trailing_slash(),
            "{} should recommend a trailing slash redirect",
            path
        );
        assert!(params.is_empty());
    }

    for path in ["/docs", "/abou", "/users/", "/cmd/", "/nowhere/"] {
        assert!(
            matches!(tree.search(path, &mut params), Lookup::NotFound),
            "{} should not be found",
            path
        );
    }
}

#[test]
fn decoding_is_opt_in() {
    let patterns = ["/search/:query", "/files/*path"];

    let mut raw = PathTree::new();
    let mut decoded = PathTree::with_config(Config {
        decode_params: true,
        ..Config::default()
    });
    for pattern in patterns {
        raw.insert(pattern, ()).unwrap();
        decoded.insert(pattern, ()).unwrap();
    }

    let (_, params) = raw.find("/search/caf%C3%A9").unwrap();
    assert_eq!(params.get("query"), Some("caf%C3%A9"));

    let (_, params) = decoded.find("/search/caf%C3%A9").unwrap();
    assert_eq!(params.get("query"), Some("café"));

    let (_, params) = decoded.find("/files/a%20b/c").unwrap();
    assert_eq!(params.get("path"), Some("/a b/c"));
}

#[test]
fn router_dispatches_by_method() {
    let mut router = Router::<&'static str>::new();
    router.get("/", "index").unwrap();
    router.get("/users/:id", "show_user").unwrap();
    router.post("/users", "create_user").unwrap();
    router.delete("/users/:id", "delete_user").unwrap();
    {
        let mut api = router.group("/api/v1");
        api.get("/repos/:owner/:repo", "show_repo").unwrap();
        api.any("/health", "health").unwrap();
    }

    let mut params = router.params();

    let found = router
        .resolve("GET".parse::<Method>().unwrap(), "/users/42", &mut params)
        .found()
        .unwrap();
    assert_eq!(*found.value, "show_user");
    assert_eq!(params.get("id"), Some("42"));

    params.clear();
    assert_eq!(
        router.resolve(Method::Delete, "/users/42", &mut params).value(),
        Some(&"delete_user")
    );

    params.clear();
    assert!(!router.resolve(Method::Put, "/users/42", &mut params).is_found());

    params.clear();
    let found = router
        .resolve(Method::Get, "/api/v1/repos/viz-rs/path-tree", &mut params)
        .found()
        .unwrap();
    assert_eq!(found.pattern, "/api/v1/repos/:owner/:repo");
    assert_eq!(params.pairs(), [("owner", "viz-rs"), ("repo", "path-tree")]);

    assert_eq!(router.allowed("/users/1"), [Method::Delete, Method::Get]);
    assert_eq!(router.allowed("/api/v1/health"), Method::ALL);
    assert!(router.allowed("/missing").is_empty());

    assert!(matches!(
        router.post("/users", "again"),
        Err(InsertError::DuplicateRoute { .. })
    ));
}

#[test]
fn router_reports_trailing_slash_per_method() {
    let mut router = Router::new();
    router.get("/docs/", 0).unwrap();

    let mut params = Params::new();
    assert!(router.resolve(Method::Get, "/docs", &mut params).is_trailing_slash());
    assert!(matches!(
        router.resolve(Method::Post, "/docs", &mut params),
        Lookup::NotFound
    ));

    let mut strict = Router::with_config(Config {
        redirect_trailing_slash: false,
        ..Config::default()
    });
    strict.get("/docs/", 0).unwrap();
    assert!(matches!(
        strict.resolve(Method::Get, "/docs", &mut params),
        Lookup::NotFound
    ));
}
