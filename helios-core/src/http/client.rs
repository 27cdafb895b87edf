//! Authenticated REST client
//!
//! Every request goes through one pipeline:
//! 1. attach `Accept`, an `X-Request-Id` and the stored bearer token
//! 2. classify the outcome into an [`Attempt`]
//! 3. on a refreshable 401, refresh once (single-flight) and replay
//!
//! Responses are decoded into explicit types here; untyped JSON never
//! leaves this module.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::query::QueryParams;
use crate::config::Config;
use crate::domain::result::{Envelope, Error, ErrorBody, Result, SERVER_ERROR_MESSAGE};
use crate::domain::{Download, RefreshedTokens};
use crate::session::{SessionState, SessionStorage};

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Path of the token refresh endpoint
pub const REFRESH_PATH: &str = "/auth/refresh";

/// One file inside a multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Text fields and files of a multipart request
///
/// Kept as plain data so the form can be rebuilt for a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    fn to_form(&self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for file in &self.files {
            let mut part =
                reqwest::multipart::Part::bytes(file.bytes.clone()).file_name(file.filename.clone());
            if let Some(content_type) = &file.content_type {
                part = part
                    .mime_str(content_type)
                    .map_err(|e| Error::validation(format!("Tipo de arquivo inválido: {}", e)))?;
            }
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(JsonValue),
    Multipart(MultipartBody),
}

/// A request description that can be sent more than once
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: QueryParams,
    body: RequestBody,
    allow_refresh: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: RequestBody::Empty,
            allow_refresh: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, body: MultipartBody) -> Self {
        self.body = RequestBody::Multipart(body);
        self
    }

    /// A 401 on this request is returned as-is instead of triggering a
    /// refresh. Used by the authentication endpoints.
    pub fn without_refresh(mut self) -> Self {
        self.allow_refresh = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn allows_refresh(&self) -> bool {
        self.allow_refresh
    }
}

/// Outcome of sending a request once
#[derive(Debug)]
enum Attempt {
    Ok(Response),
    /// 401 on a request that may be refreshed and replayed
    NeedsRefresh(Error),
    Failed(Error),
}

/// HTTP client bound to one backend and one session
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    login_path: String,
    storage: SessionStorage,
    state: Arc<SessionState>,
    refresh_lock: Mutex<()>,
}

impl ApiClient {
    pub fn new(config: &Config, storage: SessionStorage, state: Arc<SessionState>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            login_path: config.login_path.clone(),
            storage,
            state,
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn storage(&self) -> &SessionStorage {
        &self.storage
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    fn url_for(&self, request: &ApiRequest) -> String {
        format!(
            "{}{}{}",
            self.base_url,
            request.path,
            request.query.to_query_string()
        )
    }

    // -------------------------------------------------------------------------
    // Typed entry points
    // -------------------------------------------------------------------------

    /// Send a request and decode the `data` of its envelope
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let method = request.method.clone();
        let path = request.path.clone();
        let response = self.execute(&request).await?;
        decode_envelope(response, &method, &path).await
    }

    /// Send a request whose response body carries nothing of interest
    pub async fn send_unit(&self, request: ApiRequest) -> Result<()> {
        let response = self.execute(&request).await?;
        // drain so the connection can be reused
        let _ = response.bytes().await;
        Ok(())
    }

    /// Send a request and return the raw body as a file
    pub async fn download(&self, request: ApiRequest, filename: impl Into<String>) -> Result<Download> {
        let response = self.execute(&request).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(map_request_error)?;
        Ok(Download {
            filename: filename.into(),
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: QueryParams) -> Result<T> {
        self.send(ApiRequest::get(path).query(query)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(ApiRequest::put(path).json(body)?).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(ApiRequest::patch(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(ApiRequest::delete(path)).await
    }

    /// Upload one file as `multipart/form-data`
    pub async fn upload<T: DeserializeOwned>(&self, path: &str, file: FilePart) -> Result<T> {
        self.send(ApiRequest::post(path).multipart(MultipartBody::new().file(file)))
            .await
    }

    // -------------------------------------------------------------------------
    // Pipeline
    // -------------------------------------------------------------------------

    async fn execute(&self, request: &ApiRequest) -> Result<Response> {
        let request_id = Uuid::new_v4();
        let token = self.storage.access_token()?;

        let error = match self.attempt(request, token.as_deref(), request_id).await {
            Attempt::Ok(response) => return Ok(response),
            Attempt::Failed(error) => return Err(error),
            Attempt::NeedsRefresh(error) => error,
        };

        let fresh = match self.refresh_after(token.as_deref()).await {
            Ok(fresh) => fresh,
            Err(refresh_error) => {
                debug!(%request_id, error = %refresh_error, "refresh unavailable, returning 401");
                return Err(error);
            }
        };

        debug!(%request_id, path = %request.path, "replaying with refreshed token");
        match self.attempt(request, Some(&fresh), request_id).await {
            Attempt::Ok(response) => Ok(response),
            Attempt::NeedsRefresh(error) | Attempt::Failed(error) => Err(error),
        }
    }

    async fn attempt(&self, request: &ApiRequest, token: Option<&str>, request_id: Uuid) -> Attempt {
        let builder = match self.build(request, token, request_id) {
            Ok(builder) => builder,
            Err(error) => return Attempt::Failed(error),
        };

        debug!(%request_id, method = %request.method, path = %request.path, "sending request");
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%request_id, error = %e, "request failed without a response");
                return Attempt::Failed(map_request_error(e));
            }
        };

        let status = response.status();
        debug!(%request_id, status = status.as_u16(), "response received");
        if status.is_success() {
            return Attempt::Ok(response);
        }

        let error = error_from_response(response).await;
        if status == StatusCode::UNAUTHORIZED && request.allow_refresh {
            Attempt::NeedsRefresh(error)
        } else {
            Attempt::Failed(error)
        }
    }

    fn build(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
        request_id: Uuid,
    ) -> Result<reqwest::RequestBuilder> {
        let mut builder = self
            .http
            .request(request.method.clone(), self.url_for(request))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(REQUEST_ID_HEADER, request_id.to_string());

        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(body) => builder.multipart(body.to_form()?),
        };
        Ok(builder)
    }

    // -------------------------------------------------------------------------
    // Refresh
    // -------------------------------------------------------------------------

    /// Refresh the session explicitly and return the new access token
    pub async fn refresh_session(&self) -> Result<String> {
        let current = self.storage.access_token()?;
        self.refresh_after(current.as_deref()).await
    }

    /// Obtain a token newer than `stale`.
    ///
    /// Refreshes are serialized; a caller whose stale token was already
    /// replaced while it waited gets the current token without another
    /// refresh call. When no refresh is possible the session is expired.
    async fn refresh_after(&self, stale: Option<&str>) -> Result<String> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.storage.access_token()? {
            if stale != Some(current.as_str()) {
                debug!("token already refreshed by a concurrent request");
                return Ok(current);
            }
        }

        let Some(refresh_token) = self.storage.refresh_token()? else {
            warn!("no refresh token stored, ending session");
            self.expire(stale)?;
            return Err(Error::Api {
                message: "Sessão expirada".to_string(),
                status: 401,
                errors: None,
            });
        };

        self.state.begin_refresh();
        match self.request_refresh(&refresh_token).await {
            Ok(tokens) => {
                self.storage.set_access_token(&tokens.access_token)?;
                if let Some(rotated) = tokens.refresh_token.as_deref() {
                    self.storage.set_refresh_token(rotated)?;
                }
                self.state.refreshed(self.storage.user()?);
                info!("access token refreshed");
                Ok(tokens.access_token)
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed, ending session");
                self.expire(stale)?;
                Err(e)
            }
        }
    }

    async fn request_refresh(&self, refresh_token: &str) -> Result<RefreshedTokens> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct RefreshBody<'a> {
            refresh_token: &'a str,
        }

        let request = ApiRequest::post(REFRESH_PATH)
            .json(&RefreshBody { refresh_token })?
            .without_refresh();
        match self.attempt(&request, None, Uuid::new_v4()).await {
            Attempt::Ok(response) => decode_envelope(response, &Method::POST, REFRESH_PATH).await,
            Attempt::NeedsRefresh(error) | Attempt::Failed(error) => Err(error),
        }
    }

    /// Clear storage and memory and send the user to the login path.
    ///
    /// A request that carried a token whose session is already gone lost a
    /// race with another expiry, which has redirected already.
    fn expire(&self, stale: Option<&str>) -> Result<()> {
        let had_session = self.storage.clear()?;
        if had_session || stale.is_none() {
            self.state.expire(&self.login_path);
        } else {
            self.state.clear();
        }
        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

async fn decode_envelope<T: DeserializeOwned>(
    response: Response,
    method: &Method,
    path: &str,
) -> Result<T> {
    let bytes = response.bytes().await.map_err(map_request_error)?;
    let envelope: Envelope<T> = serde_json::from_slice(&bytes)
        .map_err(|e| Error::decode(format!("{} {}: {}", method, path, e)))?;
    Ok(envelope.into_data())
}

/// Build the normalized error for a non-success response
async fn error_from_response(response: Response) -> Error {
    let status = response.status().as_u16();
    let body: ErrorBody = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
        Err(_) => ErrorBody::default(),
    };
    Error::Api {
        message: body
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| SERVER_ERROR_MESSAGE.to_string()),
        status,
        errors: body.errors,
    }
}

/// Map transport failures (no response received) to `Error::Network`
fn map_request_error(error: reqwest::Error) -> Error {
    if error.is_builder() {
        Error::Other(format!("Invalid request: {}", error))
    } else {
        Error::Network(error.to_string())
    }
}
