//! Canvas REST client.

use async_trait::async_trait;
use reqwest::header::LINK;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use canvasfs_kernel::{
    Children, File, Folder, RemoteApi, RemoteError, RemoteResult, ResourceScope, ScopeKind,
};

use crate::link::parse_next_link;
use crate::wire::{CourseJson, CreateFolderJson, FileJson, FolderJson, UserJson};

/// Default Canvas instance.
pub const DEFAULT_API_URL: &str = "https://hvl.instructure.com";

/// Connection settings for [`CanvasClient`].
#[derive(Clone)]
pub struct CanvasConfig {
    /// Instance base URL, e.g. `https://school.instructure.com`.
    pub api_url: String,
    /// Personal access token.
    pub token: String,
    /// Deadline for each HTTP request, including body download.
    pub timeout: Duration,
    /// Page size requested from list endpoints.
    pub per_page: u32,
}

impl CanvasConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            timeout: Duration::from_secs(30),
            per_page: 100,
        }
    }
}

impl std::fmt::Debug for CanvasConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("per_page", &self.per_page)
            .finish()
    }
}

/// [`RemoteApi`] over the Canvas LMS REST API.
#[derive(Clone)]
pub struct CanvasClient {
    http: reqwest::Client,
    base: Url,
    token: String,
    per_page: u32,
}

impl std::fmt::Debug for CanvasClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasClient")
            .field("base", &self.base.as_str())
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

impl CanvasClient {
    pub fn new(config: CanvasConfig) -> RemoteResult<Self> {
        let http = Self::http_builder(&config).build().map_err(transport)?;
        Self::with_http(config, http)
    }

    fn http_builder(config: &CanvasConfig) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .user_agent(concat!("canvasfs/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
    }

    fn with_http(config: CanvasConfig, http: reqwest::Client) -> RemoteResult<Self> {
        let base = Url::parse(&config.api_url).map_err(|e| {
            RemoteError::unavailable(format!("invalid API URL {}: {e}", config.api_url))
        })?;
        if base.cannot_be_a_base() {
            return Err(RemoteError::unavailable(format!(
                "invalid API URL {}: not a base URL",
                config.api_url
            )));
        }

        Ok(Self {
            http,
            base,
            token: config.token,
            per_page: config.per_page.max(1),
        })
    }

    /// `{base}/api/v1/{segments...}`, with each segment percent-encoded.
    pub fn endpoint<I>(&self, segments: I) -> RemoteResult<Url>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::unavailable(format!("{} is not a base URL", self.base)))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Authenticate, send, and map the status to a [`RemoteError`].
    async fn send(&self, request: RequestBuilder) -> RemoteResult<Response> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        tracing::debug!(url = %response.url(), %status, "canvas response");
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &url, &body))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> RemoteResult<T> {
        self.send(self.http.get(url))
            .await?
            .json()
            .await
            .map_err(decode)
    }

    /// GET every page of a list endpoint, following `rel="next"` links.
    async fn get_paginated<T: DeserializeOwned>(&self, mut url: Url) -> RemoteResult<Vec<T>> {
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string());

        let mut items = Vec::new();
        let mut next = Some(url);
        while let Some(url) = next.take() {
            let response = self.send(self.http.get(url)).await?;
            next = next_page(&response)?;
            let page: Vec<T> = response.json().await.map_err(decode)?;
            items.extend(page);
        }
        Ok(items)
    }

    fn scope_segments(kind: ScopeKind) -> [String; 2] {
        match kind {
            ScopeKind::Course(id) => ["courses".to_string(), id.to_string()],
            ScopeKind::Personal(id) => ["users".to_string(), id.to_string()],
        }
    }
}

#[async_trait]
impl RemoteApi for CanvasClient {
    async fn courses(&self) -> RemoteResult<Vec<ResourceScope>> {
        let url = self.endpoint(["users", "self", "courses"])?;
        let courses: Vec<CourseJson> = self.get_paginated(url).await?;

        let total = courses.len();
        let scopes: Vec<_> = courses
            .into_iter()
            .filter_map(CourseJson::into_scope)
            .collect();
        if scopes.len() < total {
            tracing::debug!(skipped = total - scopes.len(), "skipped restricted courses");
        }
        Ok(scopes)
    }

    async fn personal_scope(&self) -> RemoteResult<ResourceScope> {
        let url = self.endpoint(["users", "self"])?;
        let user: UserJson = self.get_json(url).await?;
        Ok(user.into_scope())
    }

    async fn resolve(
        &self,
        scope: &ResourceScope,
        segments: &[String],
    ) -> RemoteResult<Vec<Folder>> {
        let [context, id] = Self::scope_segments(scope.kind);
        let mut url = self.endpoint([context.as_str(), id.as_str(), "folders", "by_path"])?;
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|()| RemoteError::unavailable("resolve URL is not a base URL"))?
                .extend(segments);
        }

        let chain: Vec<FolderJson> = self.get_json(url).await?;
        if chain.is_empty() {
            return Err(RemoteError::not_found(segments.join("/")));
        }
        Ok(chain.into_iter().map(Folder::from).collect())
    }

    async fn list_children(&self, folder: &Folder) -> RemoteResult<Children> {
        let id = folder.id.to_string();
        let folders: Vec<FolderJson> = self
            .get_paginated(self.endpoint(["folders", id.as_str(), "folders"])?)
            .await?;
        let files: Vec<FileJson> = self
            .get_paginated(self.endpoint(["folders", id.as_str(), "files"])?)
            .await?;

        Ok(Children {
            folders: folders.into_iter().map(Folder::from).collect(),
            files: files.into_iter().map(File::from).collect(),
        })
    }

    async fn fetch_content(&self, file: &File) -> RemoteResult<Vec<u8>> {
        let url = file.url.as_deref().ok_or_else(|| {
            RemoteError::unavailable(format!("file {} has no download URL", file.id))
        })?;
        let url = Url::parse(url).map_err(|e| RemoteError::unavailable(e.to_string()))?;

        let bytes = self
            .send(self.http.get(url))
            .await?
            .bytes()
            .await
            .map_err(transport)?;
        tracing::debug!(file = file.id, bytes = bytes.len(), "downloaded file");
        Ok(bytes.to_vec())
    }

    async fn create_folder(&self, parent: &Folder, name: &str) -> RemoteResult<Folder> {
        let id = parent.id.to_string();
        let url = self.endpoint(["folders", id.as_str(), "folders"])?;
        let created: FolderJson = self
            .send(self.http.post(url).json(&CreateFolderJson { name }))
            .await?
            .json()
            .await
            .map_err(decode)?;
        Ok(created.into())
    }

    async fn delete_folder(&self, folder: &Folder) -> RemoteResult<()> {
        let id = folder.id.to_string();
        let url = self.endpoint(["folders", id.as_str()])?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

/// Map a non-success status: 404 means the resource is absent, anything
/// else is a server-side failure.
fn status_error(status: StatusCode, url: &Url, body: &str) -> RemoteError {
    if status == StatusCode::NOT_FOUND {
        return RemoteError::not_found(url.path().to_string());
    }
    RemoteError::unavailable(format!("{status} from {url}: {}", body.trim()))
}

fn next_page(response: &Response) -> RemoteResult<Option<Url>> {
    response
        .headers()
        .get(LINK)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_next_link)
        .map(|next| Url::parse(&next))
        .transpose()
        .map_err(|e| RemoteError::unavailable(format!("bad pagination link: {e}")))
}

fn transport(err: reqwest::Error) -> RemoteError {
    RemoteError::unavailable(err.to_string())
}

fn decode(err: reqwest::Error) -> RemoteError {
    RemoteError::unavailable(format!("malformed response: {err}"))
}
