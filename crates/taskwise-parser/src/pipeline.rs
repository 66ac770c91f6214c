//! The parse pipeline: sanitize, extract, classify, repair

use crate::classifier::{classify_categories, classify_priority};
use crate::config::{ClassificationMode, ParserConfig};
use crate::error::ParseError;
use crate::parser::parse_llm_response;
use crate::prompt::{summary_prompt, PromptBuilder};
use crate::repair::repair;
use crate::sanitizer::{sanitize, SanitizedInput};
use crate::types::ParseOutcome;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;
use taskwise_domain::traits::LlmProvider;
use taskwise_domain::TodoAnalysis;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Turns one line of free text into a repaired task
pub struct TaskParser<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ParserConfig,
}

impl<L> TaskParser<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new parser
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Config`] if `config` does not validate.
    pub fn new(llm_provider: L, config: ParserConfig) -> Result<Self, ParseError> {
        config.validate().map_err(ParseError::Config)?;
        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            config,
        })
    }

    /// The parser's configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Name of the model behind the extractor
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    /// Parse a raw input against a reference date
    ///
    /// Nothing is sent to the extractor unless the input passes the
    /// sanitizer. A dropped due date is reported through
    /// [`ParseOutcome::has_past_date`], not as an error.
    pub async fn parse(
        &self,
        raw: &str,
        reference_date: NaiveDate,
    ) -> Result<ParseOutcome, ParseError> {
        let input = sanitize(raw).inspect_err(|rejection| {
            debug!("Input rejected: {}", rejection.code());
        })?;

        self.parse_sanitized(input, reference_date).await
    }

    /// Parse an input that already passed the sanitizer
    pub async fn parse_sanitized(
        &self,
        input: SanitizedInput,
        reference_date: NaiveDate,
    ) -> Result<ParseOutcome, ParseError> {
        let start = Instant::now();
        info!(
            "Parsing input of {} chars against {}",
            input.as_str().chars().count(),
            reference_date
        );

        let request = PromptBuilder::new(&input, reference_date)
            .with_examples(self.config.include_examples)
            .build();
        debug!("Prompt length: {} chars", request.prompt.len());

        let schema = request.schema;
        let llm_response = self
            .call_llm(move |llm| llm.generate_structured(&request.prompt, &schema))
            .await?;

        debug!("LLM response length: {} chars", llm_response.len());

        let mut extracted = parse_llm_response(&llm_response)?;

        if self.config.classification == ClassificationMode::Local {
            let priority = classify_priority(input.as_str());
            let category = classify_categories(input.as_str());
            debug!(
                "Local classification: priority={}, category={:?} (model said {:?}, {:?})",
                priority, category, extracted.priority, extracted.category
            );
            extracted.priority = Some(priority.as_str().to_string());
            extracted.category = Some(category);
        }

        let outcome = repair(extracted, reference_date);
        if outcome.has_past_date {
            warn!("Dropped a past or malformed due date");
        }

        info!(
            "Parsed task in {}ms (priority={}, due={:?}, categories={})",
            start.elapsed().as_millis(),
            outcome.task.priority,
            outcome.task.due_date,
            outcome.task.category.len()
        );

        Ok(outcome)
    }

    /// Ask the model for a short summary of a todo analysis
    ///
    /// Uses plain generation under the same timeout as extraction. The
    /// numbers in `analysis` are left alone; callers decide whether to use
    /// the returned text.
    pub async fn summarize(
        &self,
        analysis: &TodoAnalysis,
        reference_date: NaiveDate,
    ) -> Result<String, ParseError> {
        let prompt = summary_prompt(analysis, reference_date);
        debug!("Summary prompt length: {} chars", prompt.len());

        let text = self.call_llm(move |llm| llm.generate(&prompt)).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseError::InvalidFormat("Empty summary".to_string()));
        }
        Ok(text.to_string())
    }

    /// Run one provider call on a blocking thread under the extraction timeout
    async fn call_llm<F>(&self, call: F) -> Result<String, ParseError>
    where
        F: FnOnce(&L) -> Result<String, L::Error> + Send + 'static,
    {
        let llm = Arc::clone(&self.llm_provider);
        let budget = self.config.extraction_timeout();

        // Call in a blocking context since LlmProvider is not async
        let task = tokio::task::spawn_blocking(move || {
            call(llm.as_ref()).map_err(|e| ParseError::Extractor(e.to_string()))
        });

        timeout(budget, task)
            .await
            .map_err(|_| {
                warn!("LLM call timed out after {:?}", budget);
                ParseError::Timeout(budget)
            })?
            .map_err(|e| ParseError::Extractor(format!("Task join error: {}", e)))?
    }
}
