use std::future::Future;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Transport seam for every call the workbench makes against the backend.
///
/// `path` is either relative to the client's base URL (`/sessions/abc`) or an
/// absolute URL. Implementations decide which requests carry credentials.
pub trait HttpClient: Send + Sync {
    fn get(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, Error>> + Send;

    fn post(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<Vec<u8>, Error>> + Send;
}

impl<T: HttpClient> HttpClient for std::sync::Arc<T> {
    fn get(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, Error>> + Send {
        (**self).get(path)
    }

    fn post(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<Vec<u8>, Error>> + Send {
        (**self).post(path, body, content_type)
    }
}

pub fn is_absolute(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// Joins `path` onto `base` unless it is already absolute.
pub fn join_url(base: &str, path: &str) -> String {
    if is_absolute(path) {
        return path.to_string();
    }

    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// True when `url` points at `base` itself or somewhere beneath it.
pub fn is_under(base: &str, url: &str) -> bool {
    let base = base.trim_end_matches('/');
    match url.strip_prefix(base) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}
