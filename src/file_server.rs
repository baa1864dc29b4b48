use std::time::{SystemTime, UNIX_EPOCH};

use http::{HeaderValue, StatusCode, header};

use crate::{
    assets::INDEX,
    fs::{ReadFs, path},
    request::Request,
    response::Response,
};

/// Writes the file at `req.path()` into `res`.
///
/// Directories are served through their `index.html`. A `Content-Type` set
/// beforehand (by a response hook, say) is kept. Missing files are the only
/// case answered with `404`.
pub(crate) fn serve_file<F: ReadFs + ?Sized>(fs: &F, req: &Request, res: &mut Response) {
    let mut name = path::clean(req.path());

    match fs.stat(&name) {
        Ok(meta) if meta.is_dir => name = path::join_rel(&name, INDEX),
        Ok(_) => {}
        Err(e) => {
            tracing::debug!("file server: {e}");
            res.send_status(StatusCode::NOT_FOUND);
            return;
        }
    }

    let file = match fs.open(&name) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!("file server: {e}");
            res.send_status(StatusCode::NOT_FOUND);
            return;
        }
    };

    if !res.headers().contains_key(header::CONTENT_TYPE) {
        let mime = mime_guess::from_path(&name).first_or_octet_stream();
        if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
            res.headers_mut().insert(header::CONTENT_TYPE, value);
        }
    }

    if let Some(modified) = file.metadata().modified {
        if let Ok(value) = HeaderValue::from_str(&httpdate::fmt_http_date(modified)) {
            res.headers_mut().insert(header::LAST_MODIFIED, value);
        }

        let since = req
            .header(header::IF_MODIFIED_SINCE)
            .and_then(|v| httpdate::parse_http_date(v).ok());
        if since.is_some_and(|since| !modified_after(modified, since)) {
            res.headers_mut().remove(header::CONTENT_TYPE);
            res.status(StatusCode::NOT_MODIFIED);
            return;
        }
    }

    res.send(file.into_bytes());
}

// HTTP dates carry whole seconds only.
fn modified_after(modified: SystemTime, since: SystemTime) -> bool {
    let secs = |t: SystemTime| t.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
    secs(modified) > secs(since)
}
