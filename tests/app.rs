use std::time::Duration;

use spa::{App, Assets, CancellationToken, Config, fs, with_prefix};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

fn bundle() -> fs::MemMapFs {
    use spa::fs::WriteFs;

    let mut fs = fs::MemMapFs::new();
    fs.write_file(
        "dist/index.html",
        b"<head><script src=\"/%DEPLOYMENT_PATH%/app.js\"></script></head>",
    )
    .unwrap();
    fs.write_file("dist/app.js", b"console.log('app');").unwrap();
    fs
}

async fn raw_request(addr: std::net::SocketAddr, method: &str, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut out = String::new();
    stream.read_to_string(&mut out).await.unwrap();
    out
}

#[tokio::test]
async fn serves_over_http_and_shuts_down() {
    let assets = Assets::new(bundle(), "dist", None, vec![with_prefix("%DEPLOYMENT_PATH%", "console")])
        .unwrap();
    let app = App::new(assets).config(
        Config::new()
            .shutdown_timeout(Duration::from_secs(1))
            .log_requests(false),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let token = CancellationToken::new();
    let server = tokio::spawn(app.serve(listener, token.clone()));

    let res = raw_request(addr, "GET", "/console/app.js").await;
    assert!(res.starts_with("HTTP/1.1 200"), "{res}");
    assert!(res.ends_with("console.log('app');"), "{res}");

    let res = raw_request(addr, "GET", "/console/users/7").await;
    assert!(res.starts_with("HTTP/1.1 200"), "{res}");
    assert!(res.contains("src=\"/console/app.js\""), "{res}");

    let res = raw_request(addr, "HEAD", "/console/app.js").await;
    assert!(res.starts_with("HTTP/1.1 200"), "{res}");
    assert!(!res.contains("console.log"), "{res}");

    token.cancel();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}
