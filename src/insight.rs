//! Narrative trade insight: provider trait, prompt, and a thin client over the
//! Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tracing::{error, info};

use crate::config::InsightCfg;
use crate::types::TradeResult;

pub const FALLBACK_TEXT: &str = "Analysis unavailable at the moment.";

/// The only failure callers ever see. Details are logged where they happen.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InsightError {
    #[error("analysis unavailable")]
    Unavailable,
}

/// Read-only view of a result handed to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightSnapshot {
    pub label: String,
    pub initial_investment: f64,
    pub net_profit: f64,
    pub roi: f64,
    pub break_even_price: f64,
    pub is_profitable: bool,
}

impl InsightSnapshot {
    pub fn new(result: &TradeResult, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            initial_investment: result.initial_investment,
            net_profit: result.net_profit,
            roi: result.roi,
            break_even_price: result.break_even_price,
            is_profitable: result.is_profitable,
        }
    }
}

#[async_trait]
pub trait InsightProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn analyze(&self, snapshot: &InsightSnapshot) -> Result<String, InsightError>;
}

pub fn build_prompt(s: &InsightSnapshot) -> String {
    format!(
        "You are a senior financial analyst. Analyze this short-term trade result:\n\
         \n\
         - Asset Type: {}\n\
         - Initial Investment: ${:.2}\n\
         - Net Profit/Loss: ${:.2}\n\
         - ROI: {:.2}%\n\
         - Break-even Price: ${:.2}\n\
         \n\
         Provide a 2-3 sentence insight.\n\
         If profitable, mention the risk-reward efficiency.\n\
         If loss, mention a psychological tip for risk management.\n\
         Keep it professional but conversational. Do not use markdown formatting like bolding.",
        s.label, s.initial_investment, s.net_profit, s.roi, s.break_even_price
    )
}

/// Used when no API key is configured or insights are switched off.
pub struct DisabledProvider;

#[async_trait]
impl InsightProvider for DisabledProvider {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn analyze(&self, _snapshot: &InsightSnapshot) -> Result<String, InsightError> {
        Err(InsightError::Unavailable)
    }
}

// ---------------- Gemini wire types ----------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<PartOut<'a>>,
}

#[derive(Debug, Serialize)]
struct PartOut<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentIn>,
}

#[derive(Debug, Deserialize)]
struct ContentIn {
    #[serde(default)]
    parts: Vec<PartIn>,
}

#[derive(Debug, Deserialize)]
struct PartIn {
    text: Option<String>,
}

/// Concatenated text of the first candidate, or the fallback when empty.
fn extract_text(resp: GenerateResponse) -> String {
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        FALLBACK_TEXT.to_string()
    } else {
        text.to_string()
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn new(cfg: &InsightCfg, api_key: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_sec))
            .build()?;
        info!(
            "Insight client ready: model={}, key={}",
            cfg.model,
            mask_key(&api_key)
        );
        Ok(Self {
            http,
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            api_key,
            max_output_tokens: cfg.max_output_tokens,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl InsightProvider for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn analyze(&self, snapshot: &InsightSnapshot) -> Result<String, InsightError> {
        let prompt = build_prompt(snapshot);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![PartOut { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        };

        let resp = self
            .http
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("insight request failed: {}", e.without_url());
                InsightError::Unavailable
            })?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            error!("insight API returned {}: {}", status, truncate(&detail, 200));
            return Err(InsightError::Unavailable);
        }

        let body: GenerateResponse = resp.json().await.map_err(|e| {
            error!("insight decode failed: {}", e.without_url());
            InsightError::Unavailable
        })?;
        Ok(extract_text(body))
    }
}

/// Pick the provider for this run. Never fails: missing credentials just
/// disable insights.
pub fn provider_from_config(cfg: &InsightCfg, api_key: Option<String>) -> Arc<dyn InsightProvider> {
    if !cfg.enabled {
        info!("Insights disabled by config");
        return Arc::new(DisabledProvider);
    }
    let Some(key) = api_key.filter(|k| !k.trim().is_empty()) else {
        info!("No GEMINI_API_KEY/API_KEY set; insights disabled");
        return Arc::new(DisabledProvider);
    };
    match GeminiClient::new(cfg, key) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("insight client init failed: {:#}", e);
            Arc::new(DisabledProvider)
        }
    }
}

fn mask_key(k: &str) -> String {
    let tail: String = k.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("***{}", tail)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
