use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::header::{ALLOW, LOCATION};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use radix_route::{Lookup, Method, Params, Router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Handler = fn(Request<Body>, &Params) -> Response<Body>;

fn index(_: Request<Body>, _: &Params) -> Response<Body> {
    Response::new(Body::from("Hello, Radix!"))
}

fn hello_world(req: Request<Body>, params: &Params) -> Response<Body> {
    let user = params.get("user").unwrap_or("world");
    Response::new(Body::from(format!(
        "Hello, {}! You requested {}",
        user,
        req.uri().path()
    )))
}

fn hello_user(_: Request<Body>, params: &Params) -> Response<Body> {
    Response::new(Body::from(format!("Hello, {}!", &params[0])))
}

fn hello_rest(_: Request<Body>, params: &Params) -> Response<Body> {
    Response::new(Body::from(format!(
        "Hello, {}! Rest: {}",
        params.get("user").unwrap_or_default(),
        params.get("rest").unwrap_or_default()
    )))
}

fn create_user(_: Request<Body>, _: &Params) -> Response<Body> {
    let mut res = Response::new(Body::from("Created"));
    *res.status_mut() = StatusCode::CREATED;
    res
}

fn status(code: StatusCode) -> Response<Body> {
    let mut res = Response::new(Body::from(code.canonical_reason().unwrap_or_default()));
    *res.status_mut() = code;
    res
}

fn toggle_slash(path: &str) -> String {
    match path.strip_suffix('/') {
        Some(trimmed) => trimmed.to_owned(),
        None => format!("{}/", path),
    }
}

fn dispatch(router: &Router<Handler>, req: Request<Body>) -> Response<Body> {
    let method = match req.method().as_str().parse::<Method>() {
        Ok(method) => method,
        Err(err) => {
            tracing::warn!(%err, "unsupported method");
            return status(StatusCode::NOT_IMPLEMENTED);
        }
    };
    let path = req.uri().path().to_owned();

    let mut params = router.params();
    match router.resolve(method, &path, &mut params) {
        Lookup::Found(found) => {
            tracing::info!(%method, path = %path, pattern = found.pattern, "matched");
            (found.value)(req, &params)
        }
        Lookup::TrailingSlash => {
            let code = if method == Method::Get {
                StatusCode::MOVED_PERMANENTLY
            } else {
                StatusCode::PERMANENT_REDIRECT
            };
            let mut res = status(code);
            if let Ok(location) = toggle_slash(&path).parse() {
                res.headers_mut().insert(LOCATION, location);
            }
            res
        }
        Lookup::NotFound => {
            let allowed = router.allowed(&path);
            if allowed.is_empty() {
                return status(StatusCode::NOT_FOUND);
            }
            let mut res = status(StatusCode::METHOD_NOT_ALLOWED);
            let allow = allowed
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(allow) = allow.parse() {
                res.headers_mut().insert(ALLOW, allow);
            }
            res
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hello=debug,radix_route=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = ([127, 0, 0, 1], 3000).into();

    let mut router = Router::<Handler>::new();
    router.get("/", index)?;
    router.get("/hello_world", hello_world)?;
    router.get("/hello/:user", hello_user)?;
    router.get("/hello/:user/*rest", hello_rest)?;
    {
        let mut api = router.group("/api");
        api.get("/users/:user", hello_world)?;
        api.post("/users", create_user)?;
    }
    let router = Arc::new(router);

    let make_svc = make_service_fn(move |_| {
        let router = router.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                let router = router.clone();
                async move { Ok::<_, Infallible>(dispatch(&router, req)) }
            }))
        }
    });

    let server = Server::bind(&addr).serve(make_svc);

    tracing::info!("listening on http://{}", addr);

    server.await?;

    Ok(())
}
