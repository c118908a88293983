use hyper::http::request::Parts;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;

pub type Responder = fn(&Parts, &[u8]) -> Response<Body>;

/// Serve `respond` on an ephemeral localhost port and return its base URL.
pub async fn spawn(respond: Responder) -> String {
    let make = make_service_fn(move |_conn| async move {
        Ok::<_, Infallible>(service_fn(move |req: Request<Body>| async move {
            let (parts, body) = req.into_parts();
            let bytes = hyper::body::to_bytes(body).await.unwrap_or_default();
            Ok::<_, Infallible>(respond(&parts, &bytes))
        }))
    });
    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make);
    let addr = server.local_addr();
    tokio::spawn(server);
    format!("http://{addr}")
}

pub fn json(status: StatusCode, body: serde_json::Value) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("static response parts are valid")
}
