use std::{convert::Infallible, net, sync::Arc, time::Instant};

use http::{HeaderValue, Method, header};
use hyper::{Request as HyperRequest, body::Incoming as IncomingBody};
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub(crate) mod config;
mod logging;

use crate::{
    assets::Assets,
    error::Error,
    request::Request,
    response::{HttpResponse, Response},
};

/// HTTP server in front of an [`Assets`] bundle.
pub struct App {
    assets: Arc<Assets>,
    config: config::Config,
}

impl App {
    pub fn new(assets: Assets) -> Self {
        Self::shared(Arc::new(assets))
    }

    /// Serves a bundle that is also used elsewhere.
    pub fn shared(assets: Arc<Assets>) -> Self {
        App {
            assets,
            config: config::Config::default(),
        }
    }

    pub fn config(mut self, config: config::Config) -> Self {
        self.config = config;
        self
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    /// Answers one request.
    ///
    /// `HEAD` gets the headers of the matching `GET` with an empty body.
    pub fn handle<B>(
        &self,
        request: http::Request<B>,
        peer_addr: Option<net::SocketAddr>,
    ) -> HttpResponse {
        let time = Instant::now();

        let mut req = Request::new(request);
        if let Some(addr) = peer_addr {
            req = req.with_peer(addr, self.config.proxy_header.as_deref());
        }
        let url_path = req.path().to_string();

        let mut res = Response::new();
        self.assets.serve(&mut req, &mut res);

        if req.method() == Method::HEAD {
            let len = res.body().len();
            res.headers_mut()
                .insert(header::CONTENT_LENGTH, HeaderValue::from(len));
            res.send(bytes::Bytes::new());
        }

        if self.config.log_requests {
            logging::log_request(
                res.status_code(),
                time.elapsed(),
                req.ip(),
                req.method(),
                &url_path,
            );
        }

        res.into_inner()
    }
}

impl App {
    /// Listen with ctrl+c shutdown
    pub async fn listen<A>(self, addr: A) -> Result<(), Error>
    where
        A: net::ToSocketAddrs + std::fmt::Debug + 'static,
    {
        let token = CancellationToken::new();
        let t = token.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to install CTRL+C signal handler: {e}");
                return;
            }
            t.cancel();
        });
        self.listen_shutdown(addr, token).await
    }

    /// Listen with custom shutdown signal
    pub async fn listen_shutdown<A>(self, addr: A, shutdown: CancellationToken) -> Result<(), Error>
    where
        A: net::ToSocketAddrs + std::fmt::Debug + 'static,
    {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or(Error::FailedToParseAddr)?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Http app listening on http://{}", addr);

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown` is cancelled.
    pub async fn serve(self, listener: TcpListener, shutdown: CancellationToken) -> Result<(), Error> {
        let mut server = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new());
        server
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(self.config.header_read_timeout);
        let graceful = hyper_util::server::graceful::GracefulShutdown::new();

        let arc_app = Arc::new(self);

        let _ = shutdown
            .run_until_cancelled(async {
                loop {
                    let Ok((stream, peer_addr)) = listener.accept().await else {
                        continue;
                    };
                    let io = TokioIo::new(stream);
                    let app = arc_app.clone();
                    let service = hyper::service::service_fn(move |req| {
                        handle_request(req, app.clone(), peer_addr)
                    });

                    let conn = server.serve_connection_with_upgrades(io, service);
                    let fut = graceful.watch(conn.into_owned());
                    tokio::spawn(async move {
                        if let Err(e) = fut.await {
                            tracing::trace!("connection failed: {e:?}");
                        }
                    });
                }
            })
            .await;

        tracing::info!("Shutdown signal received!");

        tracing::info!(
            "Waiting for connections to close (timeout: {:?})...",
            arc_app.config.shutdown_timeout
        );

        match tokio::time::timeout(arc_app.config.shutdown_timeout, graceful.shutdown()).await {
            Ok(_) => tracing::info!("All connections closed!"),
            Err(_) => tracing::info!("Shutdown timed out!"),
        }

        Ok(())
    }
}

async fn handle_request(
    request: HyperRequest<IncomingBody>,
    app: Arc<App>,
    peer_addr: net::SocketAddr,
) -> Result<HttpResponse, Infallible> {
    Ok(app.handle(request, Some(peer_addr)))
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use hyper::body::Body;

    use super::*;
    use crate::{
        assets::{render_index, with_index_renderer, with_index_template},
        fs::{MemMapFs, WriteFs},
    };

    fn app() -> App {
        let mut fs = MemMapFs::new();
        fs.write_file("index.html", b"<head></head>").unwrap();
        fs.write_file("manifest.json", b"{}").unwrap();
        let assets = Assets::new(fs, ".", None, vec![]).unwrap();
        App::new(assets).config(config::Config::new().log_requests(false))
    }

    #[test]
    fn head_keeps_length_drops_body() {
        let res = app().handle(
            http::Request::head("/manifest.json").body(()).unwrap(),
            None,
        );
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_LENGTH], "2");
        assert_eq!(res.body().size_hint().exact(), Some(0));
    }

    #[test]
    fn head_on_rendered_fallback_drops_body() {
        let mut fs = MemMapFs::new();
        fs.write_file("index.html", b"<head>{{ 1 + 1 }}</head>").unwrap();
        fs.write_file("manifest.json", b"{}").unwrap();
        let assets = Assets::new(
            fs,
            ".",
            None,
            vec![with_index_template(), with_index_renderer(render_index)],
        )
        .unwrap();
        let app = App::new(assets).config(config::Config::new().log_requests(false));

        let res = app.handle(http::Request::head("/settings/profile").body(()).unwrap(), None);
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(res.headers()[header::CONTENT_LENGTH], "14");
        assert_eq!(res.body().size_hint().exact(), Some(0));

        let res = app.handle(http::Request::get("/settings/profile").body(()).unwrap(), None);
        assert_eq!(res.body().size_hint().exact(), Some(14));
    }

    #[test]
    fn unknown_routes_get_the_index() {
        let res = app().handle(http::Request::get("/settings/profile").body(()).unwrap(), None);
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "text/html");
    }
}
