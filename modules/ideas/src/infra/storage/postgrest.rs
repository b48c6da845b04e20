//! Repository backed by Supabase's PostgREST endpoint for the `ideas` table.

use anyhow::{Context, Result};
use async_trait::async_trait;
use modkit::TracedClient;
use reqwest::{Method, RequestBuilder, Response};
use url::Url;
use uuid::Uuid;

use crate::contract::listing::{IdeaFilter, SortOrder};
use crate::contract::model::{Counter, Idea};
use crate::domain::repo::IdeasRepository;
use crate::infra::storage::entity::IdeaRow;

const TABLE_PATH: &str = "rest/v1/ideas";

pub struct PostgrestIdeasRepository {
    client: TracedClient,
    table_url: Url,
    api_key: String,
}

impl PostgrestIdeasRepository {
    /// `base_url` is the project URL, e.g. `https://xyz.supabase.co`.
    pub fn new(client: TracedClient, base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let mut base = Url::parse(base_url).with_context(|| format!("invalid PostgREST url '{base_url}'"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let table_url = base.join(TABLE_PATH)?;
        Ok(Self {
            client,
            table_url,
            api_key: api_key.into(),
        })
    }

    fn request(&self, method: Method, query: &[(&str, String)]) -> RequestBuilder {
        let mut url = self.table_url.clone();
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        self.client
            .request(method, url.as_str())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn rows(&self, builder: RequestBuilder) -> Result<Vec<IdeaRow>> {
        let resp = ok_or_bail(self.client.send(builder).await?).await?;
        resp.json::<Vec<IdeaRow>>()
            .await
            .context("unexpected PostgREST response body")
    }
}

fn by_id(id: Uuid) -> (&'static str, String) {
    ("id", format!("eq.{id}"))
}

/// PostgREST query parameters for `filter`.
pub fn filter_params(filter: &IdeaFilter) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();
    let eqs = [
        ("category", filter.category.clone()),
        ("sub_category", filter.sub_category.clone()),
        ("status", filter.status.map(|s| s.as_str().to_string())),
        ("humanity_challenge", filter.humanity_challenge.clone()),
    ];
    for (k, v) in eqs {
        if let Some(v) = v {
            out.push((k, format!("eq.{v}")));
        }
    }
    let likes = [
        ("title", &filter.title),
        ("problem_statement", &filter.problem_statement),
        ("solution", &filter.solution),
    ];
    for (k, v) in likes {
        if let Some(v) = v {
            out.push((k, substring_match(v)));
        }
    }
    out
}

/// Case-insensitive substring match on literal `text`. PostgREST turns `*`
/// into a LIKE wildcard with no way to escape it, so text holding pattern
/// characters goes through `imatch` with every regex metacharacter escaped.
fn substring_match(text: &str) -> String {
    if !text.contains(['*', '%', '_', '\\']) {
        return format!("ilike.*{text}*");
    }
    let mut pattern = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    format!("imatch.{pattern}")
}

fn order_param(order: SortOrder) -> (&'static str, String) {
    let dir = match order {
        SortOrder::Newest => "desc",
        SortOrder::Oldest => "asc",
    };
    ("order", format!("created_at.{dir}"))
}

async fn ok_or_bail(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    anyhow::bail!("PostgREST returned {status}: {body}")
}

#[async_trait]
impl IdeasRepository for PostgrestIdeasRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Idea>> {
        let req = self.request(Method::GET, &[("select", "*".into()), by_id(id)]);
        let rows = self.rows(req).await.context("find_by_id failed")?;
        Ok(rows.into_iter().next().map(Into::into))
    }

    async fn list(
        &self,
        filter: &IdeaFilter,
        sort: Option<SortOrder>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Idea>> {
        let mut query = vec![("select", "*".to_string())];
        query.extend(filter_params(filter));
        query.extend(sort.map(order_param));
        query.push(("limit", limit.to_string()));
        query.push(("offset", offset.to_string()));

        let rows = self
            .rows(self.request(Method::GET, &query))
            .await
            .context("list failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, idea: Idea) -> Result<Idea> {
        let req = self
            .request(Method::POST, &[])
            .header("Prefer", "return=representation")
            .json(&IdeaRow::from(&idea));
        let rows = self.rows(req).await.context("insert failed")?;
        Ok(rows.into_iter().next().map(Into::into).unwrap_or(idea))
    }

    async fn update(&self, idea: Idea) -> Result<Option<Idea>> {
        let mut row = IdeaRow::from(&idea);
        // Counters are owned by increment_counter.
        row.upvotes = None;
        row.downvotes = None;
        row.view_count = None;
        let mut body = serde_json::to_value(&row)?;
        if let Some(obj) = body.as_object_mut() {
            obj.remove("id");
            obj.remove("created_at");
        }

        let req = self
            .request(Method::PATCH, &[by_id(idea.id)])
            .header("Prefer", "return=representation")
            .json(&body);
        let rows = self.rows(req).await.context("update failed")?;
        Ok(rows.into_iter().next().map(Into::into))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let req = self
            .request(Method::DELETE, &[by_id(id)])
            .header("Prefer", "return=representation");
        let rows = self.rows(req).await.context("delete failed")?;
        Ok(!rows.is_empty())
    }

    async fn increment_counter(&self, id: Uuid, counter: Counter) -> Result<bool> {
        // PostgREST has no atomic increment without an RPC; read then write.
        let Some(idea) = self.find_by_id(id).await? else {
            return Ok(false);
        };
        let current = match counter {
            Counter::Upvotes => idea.upvotes,
            Counter::Downvotes => idea.downvotes,
            Counter::Views => idea.views,
        };
        let body = serde_json::json!({ counter.column(): current + 1 });

        let req = self
            .request(Method::PATCH, &[by_id(id)])
            .header("Prefer", "return=representation")
            .json(&body);
        let rows = self.rows(req).await.context("increment failed")?;
        Ok(!rows.is_empty())
    }
}
