//! Pipeline orchestrator.
//!
//! Drives the stages as an explicit state machine:
//!
//! ```text
//! Start ─► Listed ─► Selected ─► Detailed ─┬─► AttendanceResolved ─► Done
//!            ▲  │         │                 └─► AttendanceSkipped ──► Done
//!            │  │         │ not found
//!            │  └─► Done  │ (no selection)
//!            └────────────┘
//! ```
//!
//! Every stage result is handed to a [`PipelineObserver`] as soon as it is
//! known, so output already produced survives a later failure.

use std::io::Write;

use teamsattend_core::{
    AttendanceOutcome, EventDetails, EventSummary, FilterCriteria, JsonOutput, MeetingAttendance,
    OutputFormatter,
};
use teamsattend_providers::{
    AttendanceResolver, BearerToken, BoxFuture, CalendarService, EventDetailFetcher, EventLister,
};
use tracing::{debug, info, warn};

use crate::error::ClientResult;

/// Where the pipeline is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing fetched yet.
    Start,
    /// Events listed; waiting for a selection.
    Listed,
    /// An event id was selected.
    Selected(String),
    /// Details of the selected event were fetched.
    Detailed(EventDetails),
    /// Attendance was looked up; empty when no meeting matched.
    AttendanceResolved(Vec<MeetingAttendance>),
    /// The event has no join URL.
    AttendanceSkipped,
    /// Finished.
    Done,
}

/// Supplies the id of the event to inspect.
pub trait EventSelector: Send {
    /// Returns the selected id, or `None` when there is nothing more to read.
    fn select<'a>(
        &'a mut self,
        events: &'a [EventSummary],
    ) -> BoxFuture<'a, ClientResult<Option<String>>>;
}

/// A stage result, reported as it happens.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    /// The event list.
    Listed(&'a [EventSummary]),
    /// Details of the selected event.
    Detailed(&'a EventDetails),
    /// The selected id does not exist; another selection follows.
    NotFound(&'a str),
    /// The event has no join URL.
    AttendanceSkipped,
    /// The join URL matched no online meeting.
    NoMeetingFound,
    /// The reports of one matching meeting.
    Meeting(&'a MeetingAttendance),
}

/// Receives stage results.
pub trait PipelineObserver {
    /// Handles one stage result.
    fn report(&mut self, progress: Progress<'_>) -> std::io::Result<()>;
}

/// Runs the stages against one service with one token.
pub struct Pipeline<'a> {
    service: &'a dyn CalendarService,
    token: &'a BearerToken,
    criteria: FilterCriteria,
    events: Vec<EventSummary>,
    state: PipelineState,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline in [`PipelineState::Start`].
    pub fn new(
        service: &'a dyn CalendarService,
        token: &'a BearerToken,
        criteria: FilterCriteria,
    ) -> Self {
        Self {
            service,
            token,
            criteria,
            events: Vec::new(),
            state: PipelineState::Start,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Returns the listed events.
    pub fn events(&self) -> &[EventSummary] {
        &self.events
    }

    /// Performs one transition.
    ///
    /// # Errors
    ///
    /// Any stage error except a recoverable one aborts the run; the state is
    /// left at `Done`.
    pub async fn step(
        &mut self,
        selector: &mut dyn EventSelector,
        observer: &mut dyn PipelineObserver,
    ) -> ClientResult<&PipelineState> {
        let current = std::mem::replace(&mut self.state, PipelineState::Done);
        let next = match current {
            PipelineState::Start => {
                self.events = EventLister::new(self.service)
                    .list(self.token, &self.criteria)
                    .await?;
                info!(count = self.events.len(), "events listed");
                observer.report(Progress::Listed(&self.events))?;
                PipelineState::Listed
            }
            PipelineState::Listed => match selector.select(&self.events).await? {
                None => {
                    debug!("no selection, finishing");
                    PipelineState::Done
                }
                Some(id) if id.trim().is_empty() => PipelineState::Listed,
                Some(id) => PipelineState::Selected(id.trim().to_string()),
            },
            PipelineState::Selected(id) => {
                match EventDetailFetcher::new(self.service)
                    .fetch(self.token, &id)
                    .await
                {
                    Ok(details) => {
                        observer.report(Progress::Detailed(&details))?;
                        PipelineState::Detailed(details)
                    }
                    Err(err) if err.is_recoverable() => {
                        warn!(event_id = %id, "{}", err);
                        observer.report(Progress::NotFound(&id))?;
                        PipelineState::Listed
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            PipelineState::Detailed(details) => self.resolve_attendance(&details, observer).await?,
            PipelineState::AttendanceResolved(_) | PipelineState::AttendanceSkipped => {
                PipelineState::Done
            }
            PipelineState::Done => PipelineState::Done,
        };
        debug!(state = ?next, "pipeline transition");
        self.state = next;
        Ok(&self.state)
    }

    /// Steps until `Done`.
    pub async fn run(
        &mut self,
        selector: &mut dyn EventSelector,
        observer: &mut dyn PipelineObserver,
    ) -> ClientResult<()> {
        while *self.step(selector, observer).await? != PipelineState::Done {}
        Ok(())
    }

    async fn resolve_attendance(
        &self,
        details: &EventDetails,
        observer: &mut dyn PipelineObserver,
    ) -> ClientResult<PipelineState> {
        let Some(join_url) = details.attendance_join_url() else {
            observer.report(Progress::AttendanceSkipped)?;
            return Ok(PipelineState::AttendanceSkipped);
        };

        let resolver = AttendanceResolver::new(self.service);
        let meeting_ids = resolver.resolve_meeting_ids(self.token, join_url).await?;
        if meeting_ids.is_empty() {
            observer.report(Progress::NoMeetingFound)?;
            return Ok(PipelineState::AttendanceResolved(Vec::new()));
        }

        let mut meetings = Vec::with_capacity(meeting_ids.len());
        for meeting_id in meeting_ids {
            let reports = resolver.fetch_reports(self.token, &meeting_id).await?;
            let attendance = MeetingAttendance::new(meeting_id, reports);
            observer.report(Progress::Meeting(&attendance))?;
            meetings.push(attendance);
        }
        Ok(PipelineState::AttendanceResolved(meetings))
    }
}

/// Writes each stage result as text.
pub struct TextReporter<W> {
    formatter: OutputFormatter,
    out: W,
}

impl<W: Write> TextReporter<W> {
    /// Creates a reporter writing to `out`.
    pub fn new(formatter: OutputFormatter, out: W) -> Self {
        Self { formatter, out }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PipelineObserver for TextReporter<W> {
    fn report(&mut self, progress: Progress<'_>) -> std::io::Result<()> {
        let text = match progress {
            Progress::Listed(events) => self.formatter.format_summaries(events),
            Progress::Detailed(details) => self.formatter.format_details(details),
            Progress::NotFound(id) => format!("No event found with ID {}.", id),
            Progress::AttendanceSkipped => {
                self.formatter.format_attendance(&AttendanceOutcome::Skipped)
            }
            Progress::NoMeetingFound => self
                .formatter
                .format_attendance(&AttendanceOutcome::NoMeetingFound),
            Progress::Meeting(attendance) => self.formatter.format_meeting_attendance(attendance),
        };
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }
}

/// Collects the stage results into one JSON document.
#[derive(Debug, Default)]
pub struct JsonCollector {
    events: Vec<EventSummary>,
    details: Option<EventDetails>,
    attendance: Option<AttendanceOutcome>,
}

impl JsonCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the document collected so far.
    pub fn output(&self) -> JsonOutput {
        JsonOutput {
            events: self.events.clone(),
            details: self.details.clone(),
            attendance: self.attendance.clone(),
        }
    }

    /// Writes the document as pretty-printed JSON.
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut out, &self.output())?;
        writeln!(out)
    }
}

impl PipelineObserver for JsonCollector {
    fn report(&mut self, progress: Progress<'_>) -> std::io::Result<()> {
        match progress {
            Progress::Listed(events) => self.events = events.to_vec(),
            Progress::Detailed(details) => self.details = Some(details.clone()),
            Progress::NotFound(_) => {}
            Progress::AttendanceSkipped => self.attendance = Some(AttendanceOutcome::Skipped),
            Progress::NoMeetingFound => self.attendance = Some(AttendanceOutcome::NoMeetingFound),
            Progress::Meeting(attendance) => match self.attendance {
                Some(AttendanceOutcome::Resolved(ref mut meetings)) => {
                    meetings.push(attendance.clone())
                }
                _ => self.attendance = Some(AttendanceOutcome::Resolved(vec![attendance.clone()])),
            },
        }
        Ok(())
    }
}
