use http::{StatusCode, header};
use rust_embed::RustEmbed;
use spa::{Assets, AssetsOption, Error, Request, Response, fs, with_prefix};

// rust-embed picks up `_`-prefixed files like any other.
#[derive(RustEmbed)]
#[folder = "tests/testdata/"]
struct Testdata;

const INDEX_HTML: &str = include_str!("testdata/app/index.html");

fn body_of(assets: &Assets, path: &str) -> (StatusCode, String) {
    let mut req = Request::new(http::Request::get(path).body(()).unwrap());
    let mut res = Response::new();
    assets.serve(&mut req, &mut res);
    (res.status_code(), String::from_utf8(res.body().to_vec()).unwrap())
}

fn embedded(opts: Vec<AssetsOption>) -> Assets {
    Assets::new(fs::Embedded::<Testdata>::new(), "app", None, opts).unwrap()
}

#[test]
fn serves_the_bundle_as_is() {
    let assets = embedded(vec![]);

    let cases = [
        ("/", "<head>"),
        ("/manifest.json", "{}"),
        ("/statics/ok.json", "{}"),
        ("/statics/js/_baseUniq.a46ea275.js", "console.log('base');"),
        ("/statics/js/baseUniq.a46ea275.js", "console.log('base');"),
    ];
    for (path, expected) in cases {
        let (status, body) = body_of(&assets, path);
        assert_eq!(status, StatusCode::OK, "{path}");
        assert!(body.contains(expected), "{path}: {body}");
    }
}

#[test]
fn copied_bundle_serves_the_same_bytes() {
    let passthrough = embedded(vec![]);
    let copied = Assets::new(
        fs::Embedded::<Testdata>::new(),
        "app",
        Some(fs::new_in_mem()),
        vec![],
    )
    .unwrap();

    assert_eq!(copied.statics().len(), 5);
    assert!(copied.statics().get("/index.html").is_none());

    for (key, _) in copied.statics().iter() {
        assert_eq!(body_of(&copied, key), body_of(&passthrough, key), "{key}");
    }
}

#[test]
fn unknown_paths_get_the_entry_document() {
    for assets in [
        embedded(vec![]),
        Assets::new(
            fs::Embedded::<Testdata>::new(),
            "app",
            Some(fs::new_in_mem_map()),
            vec![],
        )
        .unwrap(),
    ] {
        for path in [
            "/does-not-exist",
            "/users/42/settings",
            "/statics/missing.js",
            "/statics",
            "/static/js/",
        ] {
            let (status, body) = body_of(&assets, path);
            assert_eq!(status, StatusCode::OK, "{path}");
            assert_eq!(body, INDEX_HTML, "{path}");
        }
    }
}

#[test]
fn empty_deployment_path_drops_the_placeholder() {
    let assets = embedded(vec![with_prefix("%DEPLOYMENT_PATH%", "")]);

    let (_, index) = body_of(&assets, "/");
    assert!(index.contains("\"/static/js/index.206364e4.js\""));
    assert!(index.contains("\"/favicon.ico\""));
    assert!(!index.contains("%DEPLOYMENT_PATH%"));

    let (status, js) = body_of(&assets, "/static/js/index.206364e4.js");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(js, "import('/static/js/chunk.5a1b.js');");
}

#[test]
fn nested_deployment_path() {
    let assets = embedded(vec![with_prefix("%DEPLOYMENT_PATH%", "ok/cool")]);

    let (_, index) = body_of(&assets, "/ok/cool/");
    assert!(index.contains("\"/ok/cool/static/js/index.206364e4.js\""));

    let (_, js) = body_of(&assets, "/ok/cool/static/js/index.206364e4.js");
    assert_eq!(js, "import('/ok/cool/static/js/chunk.5a1b.js');");

    assert_eq!(body_of(&assets, "/ok/cool/manifest.json").1, "{}");

    // The old location is now just another client side route.
    let (status, body) = body_of(&assets, "/manifest.json");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<head>"));
}

#[test]
fn catalog_keys_follow_the_deployment_path() {
    let assets = embedded(vec![with_prefix("%DEPLOYMENT_PATH%", "ok")]);
    let mut keys: Vec<_> = assets.statics().iter().map(|(k, _)| k.to_string()).collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "/ok/manifest.json",
            "/ok/static/js/index.206364e4.js",
            "/ok/statics/js/_baseUniq.a46ea275.js",
            "/ok/statics/js/baseUniq.a46ea275.js",
            "/ok/statics/ok.json",
        ]
    );
    assert_eq!(
        assets.statics().get("/ok/statics/ok.json").unwrap().path,
        "statics/ok.json"
    );
}

#[test]
fn bad_source_prefix_is_fatal() {
    let err = Assets::new(fs::Embedded::<Testdata>::new(), "app/", None, vec![]).unwrap_err();
    assert!(matches!(err, Error::InvalidPrefix(_)));
}

#[test]
fn content_types_come_from_the_file_name() {
    let assets = embedded(vec![]);
    let res = assets.handle(http::Request::get("/manifest.json").body(()).unwrap());
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");

    let res = assets.handle(http::Request::get("/some/route").body(()).unwrap());
    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/html");
}
