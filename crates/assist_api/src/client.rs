use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::models::{
    phrases_from_value, ClarificationRequest, HistoryActionRequest, HistoryActionResponse,
    HistoryEntry, HistoryMatch, HistorySearchRequest, HistorySearchResponse, HistorySummary,
    Myself, Phrase, PhraseSaveRequest, Project, SearchRequest, SearchResponse, Sprint,
    WorklogCommandReply, WorklogCommandRequest, WorklogOutcome,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Async client for the assistant backend. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct AssistClient {
    http: HttpClient,
    config: ApiConfig,
}

impl AssistClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_with_body(Method::GET, path, Option::<&Value>::None).await
    }

    pub async fn get_with_query<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!(method = "GET", path, "backend request");
        let response = self.http.get(self.url_for(path)).query(query).send().await?;
        Self::parse_json(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_with_body(Method::POST, path, Some(body)).await
    }

    pub async fn send_with_body<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(method, path, body).await?;
        Self::parse_json(response).await
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        debug!(method = %method, path, "backend request");
        let mut request = self.http.request(method, self.url_for(path));
        if let Some(payload) = body {
            request = request.json(payload);
        }
        let response = request.send().await?;
        debug!(path, status = %response.status(), "backend response");
        Ok(response)
    }

    fn url_for(&self, path: &str) -> String {
        let mut base = self.config.api_root();
        base.push_str(path.trim_start_matches('/'));
        base
    }

    async fn parse_json<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            response.json::<T>().await.map_err(ApiError::from)
        } else {
            let body = read_value(response).await;
            Err(build_http_error(status, &body))
        }
    }

    pub async fn get_myself(&self) -> Result<Myself> {
        match self.get("myself").await {
            Err(ApiError::Http { status, message })
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                Err(ApiError::Authentication(message))
            }
            other => other,
        }
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get("projects").await
    }

    pub async fn list_sprints(&self, project_key: &str, limit: u32) -> Result<Vec<Sprint>> {
        let path = format!("projects/{}/sprints", project_key);
        let value: Value = self
            .get_with_query(&path, &[("limit", limit.to_string())])
            .await?;
        // Anything but a list counts as "no sprints".
        match value {
            Value::Array(_) => serde_json::from_value(value).map_err(ApiError::from),
            _ => Ok(Vec::new()),
        }
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        self.post("search", request).await
    }

    /// Sends one worklog command round. A 422 carrying a question is a clarification request, not an error.
    pub async fn worklog_command(
        &self,
        request: &WorklogCommandRequest,
    ) -> Result<WorklogCommandReply> {
        let response = self.send(Method::POST, "worklog/command", Some(request)).await?;
        let status = response.status();
        let body = read_value(response).await;

        if status == StatusCode::UNPROCESSABLE_ENTITY && has_question(&body) {
            let clarification: ClarificationRequest =
                serde_json::from_value(body).unwrap_or_default();
            debug!(need = %clarification.need, "backend asked for clarification");
            return Ok(WorklogCommandReply::Clarification(clarification));
        }
        if !status.is_success() {
            return Err(build_http_error(status, &body));
        }
        Ok(WorklogCommandReply::Completed(WorklogOutcome::from_value(body)))
    }

    pub async fn list_phrases(&self) -> Result<Vec<Phrase>> {
        let response = self.send(Method::GET, "phrases", Option::<&Value>::None).await?;
        let status = response.status();
        let body = read_value(response).await;
        if !status.is_success() {
            return Err(build_http_error(status, &body));
        }
        Ok(phrases_from_value(body))
    }

    pub async fn save_phrases(&self, phrases: &[Phrase]) -> Result<Vec<Phrase>> {
        let payload = PhraseSaveRequest { phrases };
        let response = self.send(Method::POST, "phrases", Some(&payload)).await?;
        let status = response.status();
        let body = read_value(response).await;
        if !status.is_success() {
            return Err(build_http_error(status, &body));
        }
        Ok(phrases_from_value(body))
    }

    pub async fn list_history(&self) -> Result<Vec<HistorySummary>> {
        let value: Value = self.get("history").await?;
        match value {
            Value::Array(_) => serde_json::from_value(value).map_err(ApiError::from),
            _ => Ok(Vec::new()),
        }
    }

    pub async fn get_history(&self, entry_id: &str) -> Result<HistoryEntry> {
        let path = format!("history/{}", entry_id);
        self.get(&path).await
    }

    pub async fn search_history(&self, entry_id: &str, query: &str) -> Result<Vec<HistoryMatch>> {
        let path = format!("history/{}/search", entry_id);
        let payload = HistorySearchRequest { query };
        let response: HistorySearchResponse = self.post(&path, &payload).await?;
        Ok(response.matches.unwrap_or_default())
    }

    /// Runs a free-text follow-up command against a stored search. `None` means the backend answered with no text.
    pub async fn history_action(&self, entry_id: &str, command: &str) -> Result<Option<String>> {
        let path = format!("history/{}/action", entry_id);
        let payload = HistoryActionRequest { command };
        let response: HistoryActionResponse = self.post(&path, &payload).await?;
        Ok(response.result)
    }
}

fn build_http_client(config: &ApiConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(language) = &config.accept_language {
        headers.insert(ACCEPT_LANGUAGE, header_value(language.clone())?);
    }

    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| ApiError::Other(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| ApiError::Other(err.to_string()))
}

/// Reads a body as JSON, treating empty or malformed bodies as an empty object.
async fn read_value(response: Response) -> Value {
    let text = response.text().await.unwrap_or_default();
    if text.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(&text).unwrap_or_else(|_| Value::Object(Default::default()))
}

fn has_question(body: &Value) -> bool {
    body.get("question")
        .and_then(Value::as_str)
        .map(|question| !question.trim().is_empty())
        .unwrap_or(false)
}

fn build_http_error(status: StatusCode, body: &Value) -> ApiError {
    let message = extract_error_message(body).unwrap_or_else(|| status_text(status));
    warn!(status = %status, message = %message, "backend request failed");
    ApiError::http(status, message)
}

fn extract_error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
