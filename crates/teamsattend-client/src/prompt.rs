//! Interactive prompts.
//!
//! Questions go to the prompt writer (stderr in the binary) so stdout only
//! carries the report.

use std::io::Write;

use teamsattend_core::{EventSummary, FilterCriteria};
use teamsattend_providers::BoxFuture;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::error::ClientResult;
use crate::pipeline::EventSelector;

const FILTER_QUESTION: &str = "Do you want to apply a filter (yes/no)?";
const SUBJECT_QUESTION: &str = "Enter the subject to filter (leave blank for no filter):";
const START_QUESTION: &str = "Enter the start date (YYYY-MM-DD, leave blank for no filter):";
const END_QUESTION: &str = "Enter the end date (YYYY-MM-DD, leave blank for no filter):";
const EVENT_ID_QUESTION: &str = "Enter the Event ID to get meeting details:";

/// Line-based question and answer over a reader and a writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R, W> Prompter<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    /// Creates a prompter.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks a question and returns the trimmed answer.
    ///
    /// Returns `None` at end of input.
    pub async fn ask(&mut self, question: &str) -> ClientResult<Option<String>> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks a yes/no question. Anything but `yes` or `y` is no.
    pub async fn confirm(&mut self, question: &str) -> ClientResult<bool> {
        let answer = self.ask(question).await?.unwrap_or_default();
        Ok(matches!(answer.to_lowercase().as_str(), "yes" | "y"))
    }

    /// Asks whether to filter and, if so, for subject, start and end date.
    ///
    /// # Errors
    ///
    /// A date that is not `YYYY-MM-DD` is a validation error.
    pub async fn ask_filter(&mut self) -> ClientResult<FilterCriteria> {
        if !self.confirm(FILTER_QUESTION).await? {
            return Ok(FilterCriteria::none());
        }

        let subject = self.ask(SUBJECT_QUESTION).await?;
        let start = self.ask(START_QUESTION).await?;
        let end = self.ask(END_QUESTION).await?;
        let criteria =
            FilterCriteria::from_input(subject.as_deref(), start.as_deref(), end.as_deref())?;
        debug!(?criteria, "filter from prompt");
        Ok(criteria)
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.output
    }
}

/// Asks for the event id on every selection.
///
/// A preset id (from `--event-id`) answers the first selection only.
pub struct PromptSelector<R, W> {
    prompter: Prompter<R, W>,
    preset: Option<String>,
}

impl<R, W> PromptSelector<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    /// Creates a selector over a prompter.
    pub fn new(prompter: Prompter<R, W>) -> Self {
        Self {
            prompter,
            preset: None,
        }
    }

    /// Answers the first selection with `event_id`.
    pub fn with_preset(mut self, event_id: Option<String>) -> Self {
        self.preset = event_id.filter(|id| !id.trim().is_empty());
        self
    }

    async fn next_id(&mut self) -> ClientResult<Option<String>> {
        if let Some(id) = self.preset.take() {
            return Ok(Some(id));
        }
        loop {
            match self.prompter.ask(EVENT_ID_QUESTION).await? {
                None => return Ok(None),
                Some(id) if id.is_empty() => continue,
                Some(id) => return Ok(Some(id)),
            }
        }
    }
}

impl<R, W> EventSelector for PromptSelector<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn select<'a>(
        &'a mut self,
        _events: &'a [EventSummary],
    ) -> BoxFuture<'a, ClientResult<Option<String>>> {
        Box::pin(self.next_id())
    }
}
