use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::news::NewsRecord;
use crate::models::settings::DEFAULT_NEWSAPI_URL;
use crate::state::feed::FEED_CAPACITY;
use super::http::{build_client, get_json};
use super::traits::NewsProvider;

const PROVIDER: &str = "NewsAPI";

/// NewsAPI top-headlines provider, filtered by category.
///
/// - **Requires**: API key (`apiKey` query parameter).
/// - **Endpoint**: `/top-headlines?category={category}`
///
/// Articles are keyed by URL; NewsAPI has no stable article id.
pub struct NewsApiProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    category: String,
}

impl NewsApiProvider {
    pub fn new(api_key: Option<String>, category: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_NEWSAPI_URL, api_key, category, Duration::from_secs(30))
    }

    pub fn with_base_url(
        base_url: &str,
        api_key: Option<String>,
        category: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            category: category.into(),
        }
    }
}

// ── NewsAPI response types ──────────────────────────────────────────

#[derive(Deserialize)]
pub(crate) struct HeadlinesResponse {
    #[serde(default)]
    articles: Option<Vec<Article>>,
}

#[derive(Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    source: ArticleSource,
    title: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    description: Option<String>,
    url_to_image: Option<String>,
}

/// Keep articles that have a title and a URL, up to the feed capacity.
pub(crate) fn to_records(resp: HeadlinesResponse) -> Result<Vec<NewsRecord>, CoreError> {
    let articles = resp.articles.ok_or_else(|| CoreError::Api {
        provider: PROVIDER.into(),
        message: "No articles found in the response".into(),
    })?;

    Ok(articles
        .into_iter()
        .filter_map(|a| {
            let url = a.url?;
            Some(NewsRecord {
                id: url.clone(),
                title: a.title?,
                url,
                source: a.source.name.unwrap_or_else(|| "Unknown".into()),
                published_at: a.published_at.unwrap_or_default(),
                description: a.description,
                image_url: a.url_to_image,
            })
        })
        .take(FEED_CAPACITY)
        .collect())
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_headlines(&self) -> Result<Vec<NewsRecord>, CoreError> {
        let key = self.api_key.as_deref().ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: "API key not configured".into(),
        })?;
        let url = format!(
            "{}/top-headlines?category={}&apiKey={key}",
            self.base_url, self.category
        );

        let resp: HeadlinesResponse = get_json(&self.client, PROVIDER, &url, "news data").await?;
        to_records(resp)
    }
}
