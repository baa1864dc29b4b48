use clap::Parser;
use rust_embed::RustEmbed;
use spa::{App, Assets, Config, Error, fs::Embedded, with_cache_control, with_prefix};

// The client is built with its public path set to `%DEPLOYMENT_PATH%`, so the
// same bundle can be mounted anywhere by passing --prefix.
#[derive(RustEmbed)]
#[folder = "demos/client/"]
struct Client;

#[derive(Parser, Debug)]
#[command(about = "Serve the demo single-page application")]
struct Args {
    /// Deployment path, e.g. `ok` to serve under /ok/
    #[arg(long, default_value = "")]
    prefix: String,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let assets = Assets::new(
        Embedded::<Client>::new(),
        "dist",
        None,
        vec![
            with_prefix("%DEPLOYMENT_PATH%", args.prefix.as_str()),
            with_cache_control("public, max-age=3600"),
        ],
    )?;

    // GET /<prefix>/assets/index.js -> dist/assets/index.js
    // GET /<prefix>/anything/else   -> dist/index.html
    App::new(assets)
        .config(Config::new().header_read_timeout(std::time::Duration::from_secs(5)))
        .listen(args.addr)
        .await
}
