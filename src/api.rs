use crate::models::{DashboardStats, Project, Task, User};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::time::{sleep, Duration};

const RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },
    #[error("GET {url} returned {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        source: reqwest::Error,
    },
}

async fn get_json<T: DeserializeOwned>(
    client: &Client,
    instance_url: &str,
    path: &str,
) -> Result<T, ApiError> {
    let url = format!("{}{}", instance_url.trim_end_matches('/'), path);

    let res = client
        .get(&url)
        .send()
        .await
        .map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        return Err(ApiError::Status { url, status, body });
    }

    res.json::<T>().await.map_err(|source| ApiError::Decode { url, source })
}

// A transient failure on one endpoint should not take down the whole load,
// so each fetch retries a few times with a short fixed delay.
async fn get_json_with_retry<T: DeserializeOwned>(
    client: &Client,
    instance_url: &str,
    path: &str,
) -> Result<T, ApiError> {
    let mut attempt = 0;
    loop {
        match get_json(client, instance_url, path).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if attempt >= RETRIES {
                    return Err(err);
                }
                eprintln!("Retrying after error: {}", err);
                sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
            }
        }
    }
}

pub async fn fetch_users(instance_url: &str) -> Result<Vec<User>, ApiError> {
    let client = Client::new();
    get_json_with_retry(&client, instance_url, "/api/users").await
}

pub async fn fetch_projects(instance_url: &str) -> Result<Vec<Project>, ApiError> {
    let client = Client::new();
    get_json_with_retry(&client, instance_url, "/api/projects").await
}

pub async fn fetch_tasks(instance_url: &str) -> Result<Vec<Task>, ApiError> {
    let client = Client::new();
    get_json_with_retry(&client, instance_url, "/api/tasks").await
}

pub async fn fetch_dashboard_stats(instance_url: &str) -> Result<DashboardStats, ApiError> {
    let client = Client::new();
    get_json_with_retry(&client, instance_url, "/api/dashboard/stats").await
}

/// The four independent loads the original app performed at startup.
pub async fn fetch_all(
    instance_url: &str,
) -> Result<(Vec<User>, Vec<Project>, Vec<Task>, DashboardStats), ApiError> {
    let users = fetch_users(instance_url).await?;
    let projects = fetch_projects(instance_url).await?;
    let tasks = fetch_tasks(instance_url).await?;
    let stats = fetch_dashboard_stats(instance_url).await?;
    Ok((users, projects, tasks, stats))
}
