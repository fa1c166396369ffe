use std::time::Duration;

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use wb_http_utils::{HttpClient, is_under, join_url};

use crate::{ClientEnv, Error};

/// [`HttpClient`] over `reqwest`.
///
/// Relative paths resolve against `base`. The bearer token is only sent to
/// URLs under `base`, so absolute links to other hosts never see it.
#[derive(Clone)]
pub struct ReqwestHttp {
    client: reqwest::Client,
    base: String,
    api_key: Option<String>,
}

impl ReqwestHttp {
    pub fn new(
        base: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn from_env(env: &ClientEnv) -> Result<Self, Error> {
        Self::new(env.api_base.clone(), env.api_key.clone(), env.timeout())
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = join_url(&self.base, path);
        let builder = self.client.request(method, &url);
        match &self.api_key {
            Some(key) if is_under(&self.base, &url) => builder.bearer_auth(key),
            _ => builder,
        }
    }
}

impl HttpClient for ReqwestHttp {
    async fn get(&self, path: &str) -> Result<Vec<u8>, wb_http_utils::Error> {
        let response = self.request(Method::GET, path).send().await?;
        let bytes = response.error_for_status()?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn post(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<Vec<u8>, wb_http_utils::Error> {
        let response = self
            .request(Method::POST, path)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        let bytes = response.error_for_status()?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use super::*;

    fn http(server: &MockServer, key: Option<&str>) -> ReqwestHttp {
        ReqwestHttp::new(
            format!("{}/api/tts", server.uri()),
            key.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn sends_bearer_to_own_base() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tts/health"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let body = http(&server, Some("secret")).get("/health").await.unwrap();
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn withholds_bearer_outside_base() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cdn/a.mp3"))
            .respond_with(|request: &Request| {
                if request.headers.contains_key("authorization") {
                    ResponseTemplate::new(400)
                } else {
                    ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3])
                }
            })
            .mount(&server)
            .await;

        let url = format!("{}/cdn/a.mp3", server.uri());
        let body = http(&server, Some("secret")).get(&url).await.unwrap();
        assert_eq!(body, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn posts_with_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tts/preview"))
            .and(header("content-type", "application/json"))
            .and(header_exists("authorization"))
            .and(body_json(serde_json::json!({"voice_id": "v"})))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9]))
            .mount(&server)
            .await;

        let body = http(&server, Some("k"))
            .post("preview", br#"{"voice_id":"v"}"#.to_vec(), "application/json")
            .await
            .unwrap();
        assert_eq!(body, vec![9]);
    }

    #[tokio::test]
    async fn error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(http(&server, None).get("/sessions/nope").await.is_err());
    }
}
