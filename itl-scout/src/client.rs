//! Mobalytics GraphQL client
//!
//! Champion pools and matchup pools come from persisted GraphQL queries,
//! identified by their SHA-256 hashes. Champion ids in the responses are
//! translated back to names through an injected [`ChampionLookup`].

use crate::catalog::{ChampionCatalog, ChampionEntry, ChampionLookup};
use crate::error::FetchError;
use crate::model::{Category, Summary};
use crate::source::{FetchRequest, SummarySource};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

const STATIC_DATA_URL: &str = "https://app.mobalytics.gg/api/league/gql/static/v1";
const QUERY_URL: &str = "https://app.mobalytics.gg/api/lol/graphql/v1/query";
const USER_AGENT: &str = concat!("itl-scout/", env!("CARGO_PKG_VERSION"));

const CATALOG_QUERY: &str = "query LolCommonDataQuery {champions: queryChampionsV1Contents(top: 200) {\n    flatData {\n      ...ChampionCommonFragment\n      __typename\n    }\n    __typename}} \n fragment ChampionCommonFragment on ChampionsV1DataFlatDto {\n  slug\n  riotId\n  name\n  title\n  isInFreeRotation\n }";

pub const DEFAULT_MAX_GAMES: u32 = 200;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

type RateLimiter = governor::RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Client settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Persisted-query hash of `LolProfilePageChampionsPoolQuery`
    pub champions_hash: String,
    /// Persisted-query hash of `LolProfilePageMatchupsPoolQuery`
    pub matchups_hash: String,
    /// Rows requested per pool
    pub max_games: u32,
    pub request_timeout: Duration,
    /// Client-side throttle; unthrottled when `None`
    pub requests_per_second: Option<NonZeroU32>,
}

impl ClientConfig {
    pub fn new(champions_hash: impl Into<String>, matchups_hash: impl Into<String>) -> Self {
        Self {
            champions_hash: champions_hash.into(),
            matchups_hash: matchups_hash.into(),
            max_games: DEFAULT_MAX_GAMES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            requests_per_second: None,
        }
    }
}

/// Build the shared HTTP client
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| FetchError::Network(e.to_string()))
}

/// Download the champion catalog
pub async fn fetch_catalog(http: &reqwest::Client) -> Result<ChampionCatalog, FetchError> {
    let body = json!({
        "operationName": "LolCommonDataQuery",
        "variables": {},
        "query": CATALOG_QUERY,
    });

    let response = post_json(http, STATIC_DATA_URL, &body).await?;
    let catalog = parse_catalog_response(response)?;

    tracing::info!(champions = catalog.len(), "Loaded champion catalog");
    Ok(catalog)
}

/// Mobalytics pool client
pub struct MobalyticsClient {
    http: reqwest::Client,
    config: ClientConfig,
    lookup: Arc<dyn ChampionLookup>,
    rate_limiter: Option<RateLimiter>,
}

impl MobalyticsClient {
    pub fn new(http: reqwest::Client, config: ClientConfig, lookup: Arc<dyn ChampionLookup>) -> Self {
        let rate_limiter = config
            .requests_per_second
            .map(|rps| governor::RateLimiter::direct(governor::Quota::per_second(rps)));

        Self {
            http,
            config,
            lookup,
            rate_limiter,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Request body for `request`, with the champion filter resolved to its id
    pub fn request_body(&self, request: &FetchRequest) -> Result<Value, FetchError> {
        let champion_id = request
            .champion
            .as_deref()
            .map(|name| self.lookup.id_for(name))
            .transpose()?;
        Ok(pool_request_body(&self.config, request, champion_id))
    }
}

#[async_trait]
impl SummarySource for MobalyticsClient {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Summary>, FetchError> {
        let body = self.request_body(request)?;

        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        tracing::debug!(
            summoner = %request.subject,
            role = %request.role,
            category = %request.category,
            "Querying Mobalytics"
        );

        let response = post_json(&self.http, QUERY_URL, &body).await?;
        parse_pool_response(response, self.lookup.as_ref(), &request.subject)
    }
}

/// Operation name and sort mode for a category
fn operation(category: Category) -> (&'static str, &'static str) {
    match category {
        Category::Pool => ("LolProfilePageChampionsPoolQuery", "Best"),
        Category::Against => ("LolProfilePageMatchupsPoolQuery", "Worst"),
    }
}

/// Persisted-query body for a pool fetch
pub fn pool_request_body(config: &ClientConfig, request: &FetchRequest, champion_id: Option<u32>) -> Value {
    let (operation_name, mode) = operation(request.category);
    let hash = match request.category {
        Category::Pool => &config.champions_hash,
        Category::Against => &config.matchups_hash,
    };

    json!({
        "operationName": operation_name,
        "variables": {
            "top": config.max_games,
            "mode": mode,
            "summonerName": request.subject,
            "region": request.region,
            "cChampionId": champion_id,
            "cQueue": request.queue,
            "cRolename": request.role,
            "cSeasonId": null,
            "cSortDirection": "DESC",
            "cSortField": "GAMES",
            "skip": 0,
        },
        "extensions": {
            "persistedQuery": {
                "version": 1,
                "sha256Hash": hash,
            }
        }
    })
}

async fn post_json(http: &reqwest::Client, url: &str, body: &Value) -> Result<Value, FetchError> {
    let response = http
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(FetchError::Api(status.as_u16(), error_text));
    }

    response
        .json()
        .await
        .map_err(|e| FetchError::Parse(e.to_string()))
}

// ============================================================================
// Response shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl<T> GraphQlResponse<T> {
    fn into_data(self) -> Result<Option<T>, FetchError> {
        if self.data.is_none() && !self.errors.is_empty() {
            let messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(FetchError::Query(messages.join("; ")));
        }
        Ok(self.data)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogData {
    champions: Vec<CatalogRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogRow {
    flat_data: CatalogFlatData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFlatData {
    name: String,
    slug: String,
    riot_id: u32,
}

#[derive(Debug, Deserialize)]
struct PoolData {
    lol: Option<LolData>,
}

#[derive(Debug, Deserialize)]
struct LolData {
    player: Option<PlayerData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerData {
    champions_matchups: Option<MatchupPage>,
}

#[derive(Debug, Deserialize)]
struct MatchupPage {
    items: Option<Vec<MatchupItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchupItem {
    champion_id: u32,
    role: String,
    csm: f64,
    gold_diff15: f64,
    kda: Kda,
    damage_per_minute: f64,
    kp: f64,
    // Field name as spelled by the API
    looses: u32,
    wins: u32,
    #[serde(default)]
    lp: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Kda {
    k: f64,
    d: f64,
    a: f64,
}

/// Parse the static-data response into a catalog
pub fn parse_catalog_response(body: Value) -> Result<ChampionCatalog, FetchError> {
    let response: GraphQlResponse<CatalogData> =
        serde_json::from_value(body).map_err(|e| FetchError::Parse(e.to_string()))?;
    let data = response
        .into_data()?
        .ok_or_else(|| FetchError::NotFound("champion catalog".to_string()))?;

    let entries = data
        .champions
        .into_iter()
        .map(|row| ChampionEntry {
            name: row.flat_data.name,
            slug: row.flat_data.slug,
            id: row.flat_data.riot_id,
        })
        .collect();

    Ok(ChampionCatalog::new(entries))
}

/// Parse a pool response into summaries, preserving item order
///
/// A missing player or item list means the summoner has no data for the
/// request and maps to `FetchError::NotFound`. An empty item list is a
/// valid, empty result.
pub fn parse_pool_response(
    body: Value,
    lookup: &dyn ChampionLookup,
    subject: &str,
) -> Result<Vec<Summary>, FetchError> {
    let response: GraphQlResponse<PoolData> =
        serde_json::from_value(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    let items = response
        .into_data()?
        .and_then(|data| data.lol)
        .and_then(|lol| lol.player)
        .and_then(|player| player.champions_matchups)
        .and_then(|page| page.items)
        .ok_or_else(|| FetchError::NotFound(subject.to_string()))?;

    items
        .into_iter()
        .map(|item| -> Result<Summary, FetchError> {
            Ok(Summary {
                champion: lookup.name_for(item.champion_id)?,
                role: item.role,
                csm: item.csm,
                gd15: item.gold_diff15,
                kills: item.kda.k,
                deaths: item.kda.d,
                assists: item.kda.a,
                dpm: item.damage_per_minute,
                kp: item.kp,
                losses: item.looses,
                wins: item.wins,
                lp: item.lp.unwrap_or(0),
            })
        })
        .collect()
}
