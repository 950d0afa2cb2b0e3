//! applint Core - change-set lint pipeline
//!
//! Runs the lint pipeline for one revision range:
//! - Discovery: changed paths (and the head tree) from the platform
//! - Dispatch: route supported files and unit directories to a checker
//! - Aggregation: merge finding streams in dispatch order
//! - Rendering: export, inline annotations, run summary and comment
//! - Outcome: a single pass/fail decision from the severity counts
//!
//! The platform and the checker are injected collaborators (`Platform`,
//! `Checker`); report destinations are injected through `ReportSink`.

pub mod aggregate;
pub mod checker;
pub mod command_checker;
pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod fakes;
pub mod kind;
pub mod obs;
pub mod outcome;
pub mod pipeline;
pub mod platform;
pub mod render;
pub mod sink;
pub mod telemetry;
pub mod trigger;
pub mod unit;

pub use aggregate::aggregate;
pub use checker::{CheckContext, Checker};
pub use command_checker::{CheckRequest, CommandChecker};
pub use config::LintConfig;
pub use discovery::{discover, ChangeSet};
pub use dispatch::Dispatcher;
pub use kind::FileKind;
pub use outcome::{conclusion, decide, outcome_title};
pub use pipeline::{LintPipeline, RunResult};
pub use platform::{CheckConclusion, CheckRunAnnotation, CheckRunRequest, Platform};
pub use render::{parse_export, render, render_export, Annotation, AnnotationLevel, RenderedReport};
pub use sink::{CheckRunSink, ReportSink, WorkflowSink};
pub use telemetry::init_tracing;
pub use trigger::{PullRequestContext, RevisionRange, Trigger};
pub use unit::UnitId;

/// applint version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
