//! Client for the Gemini `generateContent` endpoint.
//!
//! Only single-turn text prompts are sent; the reply is the concatenated text
//! of the first candidate.

use anyhow::{bail, Context};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use crate::models::assessment::Assessment;

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize, Debug)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Facts about a restaurant that go into the assessment prompt.
#[derive(Clone, Debug, Default)]
pub struct AssessmentSubject {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
}

impl GeminiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: &str,
        model: &str,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    pub async fn generate_content(&self, prompt: &str) -> anyhow::Result<String> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to reach Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("Gemini API responded with {}: {}", status, detail);
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to decode Gemini API response")?;

        extract_text(reply)
    }

    pub async fn assess_restaurant(&self, subject: &AssessmentSubject) -> anyhow::Result<Assessment> {
        let prompt = build_assessment_prompt(subject);
        let text = self.generate_content(&prompt).await?;
        debug!("Gemini replied for {}: {}", subject.name, text);

        parse_assessment(&text)
    }
}

fn extract_text(reply: GenerateContentResponse) -> anyhow::Result<String> {
    let candidate = match reply.candidates.into_iter().next() {
        Some(candidate) => candidate,
        None => {
            let reason = reply
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            bail!("Gemini returned no content: {}", reason);
        }
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        bail!(
            "Gemini returned an empty reply (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        );
    }

    Ok(text)
}

pub fn build_assessment_prompt(subject: &AssessmentSubject) -> String {
    let mut prompt = format!(
        "You are a dairy-free food expert. Assess the restaurant '{}'.\n",
        subject.name.trim()
    );
    if let Some(description) = subject.description.as_deref().filter(|d| !d.trim().is_empty()) {
        prompt.push_str(&format!("Description: {}\n", description.trim()));
    }
    if let Some(website) = subject.website.as_deref().filter(|w| !w.trim().is_empty()) {
        prompt.push_str(&format!("Website: {}\n", website.trim()));
    }
    prompt.push_str(
        "Return ONLY a valid JSON object with the following keys:\n\
         - score: integer 0-10\n\
         - summary: string\n\
         - dairyFreeOptions: list of strings\n",
    );
    prompt
}

/// Models like to wrap JSON in Markdown fences even when told not to.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

pub fn parse_assessment(text: &str) -> anyhow::Result<Assessment> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(&cleaned)
        .with_context(|| format!("Language model returned an invalid assessment: {}", cleaned))
}
