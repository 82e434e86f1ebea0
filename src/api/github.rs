//! GitHub REST 通知 API 客户端
//!
//! 列表查询使用 `Last-Modified` / `If-Modified-Since` 做条件请求，
//! 并读取 `X-Poll-Interval` 作为服务端建议的轮询间隔。

use super::{ListBody, ListResponse, NotificationApi};
use crate::error::ApiError;
use crate::types::{NotificationThread, Repository, Subject, Visibility};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCEPT, IF_MODIFIED_SINCE, LAST_MODIFIED, RETRY_AFTER};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// GitHub API 基础 URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// API 版本
const API_VERSION: &str = "2022-11-28";

/// 每页条数
const PAGE_SIZE: &str = "50";

const USER_AGENT: &str = "ghn";

/// GitHub 客户端（持有 bearer token）
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    token: String,
    api_url: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>, api_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Remote {
                status: None,
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            token: token.into(),
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_MODIFIED {
            return Ok(response);
        }

        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        let err = error_for_status(status.as_u16(), &headers, &body, Utc::now());
        warn!(status = status.as_u16(), error = %err, "GitHub request failed");
        Err(err)
    }

    async fn mutate(&self, method: Method, url: &str) -> Result<(), ApiError> {
        debug!(method = %method, url = %url, "Sending notification mutation");
        self.send(self.request(method, url)).await?;
        Ok(())
    }

    fn thread_url(&self, thread_id: &str) -> String {
        format!("{}/notifications/threads/{}", self.api_url, thread_id)
    }
}

#[async_trait]
impl NotificationApi for GitHubClient {
    async fn list_notifications(
        &self,
        include_read: bool,
        validator: Option<&str>,
    ) -> Result<ListResponse, ApiError> {
        let url = format!("{}/notifications", self.api_url);
        let mut builder = self
            .request(Method::GET, &url)
            .query(&[("all", if include_read { "true" } else { "false" }), ("per_page", PAGE_SIZE)]);
        if let Some(validator) = validator {
            builder = builder.header(IF_MODIFIED_SINCE, validator);
        }

        debug!(include_read, conditional = validator.is_some(), "Fetching notifications");
        let response = self.send(builder).await?;

        let poll_interval = poll_interval_from_headers(response.headers());
        let validator = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if response.status() == StatusCode::NOT_MODIFIED {
            return Ok(ListResponse {
                body: ListBody::Unchanged,
                poll_interval,
                validator,
            });
        }

        let raw: Vec<RawThread> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::timeout()
            } else {
                ApiError::Remote {
                    status: None,
                    message: format!("invalid notifications payload: {}", e),
                }
            }
        })?;

        let threads = raw
            .into_iter()
            .map(|thread| thread.into_thread(&self.api_url))
            .collect();

        Ok(ListResponse {
            body: ListBody::Changed(threads),
            poll_interval,
            validator,
        })
    }

    async fn mark_read(&self, thread_id: &str) -> Result<(), ApiError> {
        self.mutate(Method::PATCH, &self.thread_url(thread_id)).await
    }

    async fn mark_done(&self, thread_id: &str) -> Result<(), ApiError> {
        self.mutate(Method::DELETE, &self.thread_url(thread_id)).await
    }

    async fn unsubscribe(&self, subject_id: &str) -> Result<(), ApiError> {
        // 订阅地址来自服务端响应，只允许发往当前 API 主机
        if !subject_id.starts_with(&format!("{}/", self.api_url)) {
            return Err(ApiError::Remote {
                status: None,
                message: format!("subscription url outside {}: {}", self.api_url, subject_id),
            });
        }
        self.mutate(Method::DELETE, subject_id).await
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::timeout()
    } else {
        ApiError::Remote {
            status: None,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// 把非成功状态码映射为 ApiError
fn error_for_status(status: u16, headers: &HeaderMap, body: &str, now: DateTime<Utc>) -> ApiError {
    let remaining_zero = header_str(headers, "x-ratelimit-remaining") == Some("0");
    let has_retry_after = headers.contains_key(RETRY_AFTER);

    if status == 429 || (status == 403 && (remaining_zero || has_retry_after)) {
        return ApiError::RateLimited {
            retry_after: retry_after_from_headers(headers, now),
        };
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let message = if message.is_empty() {
        StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("unknown error")
            .to_string()
    } else {
        message
    };

    match status {
        401 | 403 => ApiError::AuthFailed(message),
        _ => ApiError::Remote {
            status: Some(status),
            message,
        },
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim)
}

fn retry_after_from_headers(headers: &HeaderMap, now: DateTime<Utc>) -> Option<Duration> {
    if let Some(secs) = header_str(headers, RETRY_AFTER.as_str()).and_then(|v| v.parse::<u64>().ok()) {
        return Some(Duration::from_secs(secs));
    }

    let reset = header_str(headers, "x-ratelimit-reset")?.parse::<i64>().ok()?;
    let wait = reset - now.timestamp();
    Some(Duration::from_secs(wait.max(0) as u64))
}

fn poll_interval_from_headers(headers: &HeaderMap) -> Option<Duration> {
    header_str(headers, "x-poll-interval")
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// API 地址对应的网页地址
fn web_url(api_url: &str) -> String {
    if api_url == DEFAULT_API_URL {
        return "https://github.com".to_string();
    }
    // GitHub Enterprise: https://host/api/v3
    api_url
        .strip_suffix("/api/v3")
        .unwrap_or(api_url)
        .to_string()
}

/// 把主题的 API 地址转换为浏览器地址
///
/// `.../repos/o/r/pulls/42` -> `.../o/r/pull/42`；不在 API 下的地址原样返回。
pub fn html_url_from_api(api_url: &str, url: &str) -> String {
    let api_url = api_url.trim_end_matches('/');
    let prefix = format!("{}/repos/", api_url);
    let Some(rest) = url.strip_prefix(&prefix) else {
        return url.to_string();
    };

    let mut parts = rest.splitn(4, '/');
    let (Some(owner), Some(repo)) = (parts.next(), parts.next()) else {
        return url.to_string();
    };
    let repo_url = format!("{}/{}/{}", web_url(api_url), owner, repo);

    match (parts.next(), parts.next()) {
        (Some("pulls"), Some(number)) => format!("{}/pull/{}", repo_url, number),
        (Some("issues"), Some(number)) => format!("{}/issues/{}", repo_url, number),
        (Some("commits"), Some(sha)) => format!("{}/commit/{}", repo_url, sha),
        (Some("discussions"), Some(number)) => format!("{}/discussions/{}", repo_url, number),
        // release 的 API 地址只有数字 ID，退回到 releases 页面
        (Some("releases"), _) => format!("{}/releases", repo_url),
        _ => repo_url,
    }
}

#[derive(Debug, Deserialize)]
struct RawThread {
    id: String,
    unread: bool,
    reason: Option<String>,
    updated_at: DateTime<Utc>,
    subject: RawSubject,
    repository: RawRepository,
    url: String,
    subscription_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSubject {
    title: String,
    url: Option<String>,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    id: u64,
    name: String,
    full_name: String,
    #[serde(default)]
    private: bool,
}

impl RawThread {
    fn into_thread(self, api_url: &str) -> NotificationThread {
        NotificationThread {
            id: self.id,
            subject_id: self.subscription_url,
            unread: self.unread,
            reason: self.reason.unwrap_or_else(|| "subscribed".to_string()),
            updated_at: self.updated_at,
            subject: Subject {
                title: self.subject.title,
                url: self.subject.url.map(|url| html_url_from_api(api_url, &url)),
                kind: self.subject.kind,
            },
            repository: Repository {
                id: self.repository.id,
                name: self.repository.name,
                full_name: self.repository.full_name,
                visibility: if self.repository.private {
                    Visibility::Private
                } else {
                    Visibility::Public
                },
            },
            url: self.url,
        }
    }
}
