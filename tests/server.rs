use std::str;

use http::{Request, StatusCode};
use hyper::{Body, Client};
use isoserve::{Config, Server, StartupError};
use tempdir::TempDir;

#[tokio::test]
async fn serves_over_real_socket() {
    let dir = TempDir::new("isoserve-server-tests").unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();

    // Port 0 lets the OS pick one that's free, avoiding collisions.
    let server = Server::bind(&Config::new(0, dir.path())).await.unwrap();
    let addr = server.addr();
    let handle = server.shutdown_handle();
    let task = tokio::spawn(server.run());

    let client = Client::new();

    let uri: http::Uri = format!("http://{}/index.html", addr).parse().unwrap();
    let res = client.get(uri).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("cross-origin-opener-policy").unwrap(),
        "same-origin"
    );
    assert_eq!(
        res.headers().get("cross-origin-embedder-policy").unwrap(),
        "require-corp"
    );
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
    assert_eq!(str::from_utf8(&body).unwrap(), "<h1>hi</h1>");

    // Error responses over the wire carry the headers too.
    let uri: http::Uri = format!("http://{}/missing.txt", addr).parse().unwrap();
    let res = client.get(uri).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        res.headers().get("cross-origin-opener-policy").unwrap(),
        "same-origin"
    );

    let req = Request::post(format!("http://{}/index.html", addr))
        .body(Body::empty())
        .unwrap();
    let res = client.request(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        res.headers().get("cross-origin-embedder-policy").unwrap(),
        "require-corp"
    );

    handle.shutdown();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn bind_fails_when_port_taken() {
    let dir = TempDir::new("isoserve-server-tests").unwrap();

    let first = Server::bind(&Config::new(0, dir.path())).await.unwrap();
    let taken = first.addr().port();

    let err = Server::bind(&Config::new(taken, dir.path()))
        .await
        .unwrap_err();
    assert!(matches!(err, StartupError::Bind { port, .. } if port == taken));
}

#[tokio::test]
async fn bind_fails_when_root_missing() {
    let dir = TempDir::new("isoserve-server-tests").unwrap();
    let missing = dir.path().join("no-such-dir");

    let err = Server::bind(&Config::new(0, &missing)).await.unwrap_err();
    assert!(matches!(err, StartupError::RootNotFound(path) if path == missing));
}

#[tokio::test]
async fn bind_fails_when_root_is_a_file() {
    let dir = TempDir::new("isoserve-server-tests").unwrap();
    let file = dir.path().join("not-a-dir");
    std::fs::write(&file, "x").unwrap();

    let err = Server::bind(&Config::new(0, &file)).await.unwrap_err();
    assert!(matches!(err, StartupError::RootNotDirectory(path) if path == file));
}

#[tokio::test]
async fn shutdown_handle_stops_the_server() {
    let dir = TempDir::new("isoserve-server-tests").unwrap();

    let server = Server::bind(&Config::new(0, dir.path())).await.unwrap();
    let handle = server.shutdown_handle();

    // Firing the handle before `run` makes it return promptly.
    handle.shutdown();
    server.run().await.unwrap();
}
