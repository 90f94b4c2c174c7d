//! Per-round entry point for the host build.
//!
//! The host calls [`ProductProcessor::on_round`] once per round with the
//! declarations it saw carrying the `product` annotation. Every round runs
//! extraction, validation and recording; the final round additionally hands
//! the accumulated declarations to the code generator and writes the result.

use std::path::PathBuf;

use log::{debug, error, info, warn};
use prodgen_metadata::MetadataVersion;

use crate::accumulator::{AccumulatorState, Recorded, RoundAccumulator};
use crate::codegen;
use crate::config::ProcessorConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{DeclarationError, InvariantViolation, ProcessorResult};
use crate::extract::extract;
use crate::source::MetadataSource;
use crate::validate::validate;
use crate::writer::{ArtifactWriter, FsWriter};

/// Annotation name this processor handles.
pub const PRODUCT_ANNOTATION: &str = "product";

/// What a single round did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    /// Declarations recorded (added or replaced) this round.
    pub recorded: usize,
    /// Declarations rejected this round; each produced a fatal diagnostic.
    pub failed: usize,
    /// Files written, present only for the final round.
    pub generated: Option<Vec<PathBuf>>,
}

impl RoundOutcome {
    /// True when no declaration failed this round.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Drives the extractor, validator, accumulator and code generator across
/// the rounds of one build invocation.
pub struct ProductProcessor<S: MetadataSource, W: ArtifactWriter> {
    source: S,
    writer: W,
    config: ProcessorConfig,
    accumulator: RoundAccumulator<S::Handle>,
    rounds: usize,
}

impl<S: MetadataSource> ProductProcessor<S, FsWriter> {
    /// Processor writing under `config.output_root`.
    pub fn to_filesystem(source: S, config: ProcessorConfig) -> Self {
        let writer = FsWriter::new(config.output_root.clone());
        Self::new(source, writer, config)
    }
}

impl<S: MetadataSource, W: ArtifactWriter> ProductProcessor<S, W> {
    pub fn new(source: S, writer: W, config: ProcessorConfig) -> Self {
        Self {
            source,
            writer,
            config,
            accumulator: RoundAccumulator::new(),
            rounds: 0,
        }
    }

    pub fn supported_annotations() -> &'static [&'static str] {
        &[PRODUCT_ANNOTATION]
    }

    pub fn supported_metadata_version() -> MetadataVersion {
        MetadataVersion::CURRENT
    }

    /// Processes one round.
    ///
    /// Declarations that cannot be turned into descriptors are reported to
    /// `diagnostics` as fatal and counted in [`RoundOutcome::failed`]; the
    /// remaining declarations are processed regardless. When
    /// `round_is_final` is set, everything recorded so far is generated and
    /// written, and no further rounds are accepted.
    pub fn on_round<I, D>(
        &mut self,
        handles: I,
        round_is_final: bool,
        diagnostics: &mut D,
    ) -> ProcessorResult<RoundOutcome>
    where
        I: IntoIterator<Item = S::Handle>,
        D: DiagnosticSink + ?Sized,
    {
        match self.accumulator.state() {
            AccumulatorState::Collecting => {}
            AccumulatorState::Finalizing => {
                return Err(InvariantViolation::RoundDuringFinalize.into());
            }
            AccumulatorState::Done => return Err(InvariantViolation::RoundAfterDone.into()),
        }

        self.rounds += 1;
        debug!("Starting round {} (final: {})", self.rounds, round_is_final);

        let mut outcome = RoundOutcome::default();
        for handle in handles {
            match self.process(&handle) {
                Ok(Recorded::Added) => outcome.recorded += 1,
                Ok(Recorded::Replaced { structure_changed }) => {
                    outcome.recorded += 1;
                    if structure_changed {
                        let name = self.source.describe(&handle);
                        warn!("{} changed structure since it was first recorded", name);
                        let message = format!(
                            "{} was recorded again with a different structure; \
                             the latest one is used",
                            name
                        );
                        diagnostics.report(Diagnostic::warning(name, message));
                    }
                }
                Err(ProcessError::Declaration(e)) => {
                    error!("{}", e);
                    // A failure supersedes whatever an earlier round recorded
                    if self.accumulator.forget(&handle)?.is_some() {
                        debug!("Dropped the earlier record of {}", e.declaration());
                    }
                    outcome.failed += 1;
                    diagnostics.report(Diagnostic::fatal(e.declaration(), e.to_string()));
                }
                Err(ProcessError::Invariant(e)) => return Err(e.into()),
            }
        }

        if round_is_final {
            let generated = self.finalize(&mut outcome, diagnostics)?;
            outcome.generated = Some(generated);
        }

        info!(
            "Round {} done: {} recorded, {} failed",
            self.rounds, outcome.recorded, outcome.failed
        );
        Ok(outcome)
    }

    fn process(&mut self, handle: &S::Handle) -> Result<Recorded, ProcessError> {
        let descriptor = extract(&self.source, handle).map_err(DeclarationError::from)?;
        let descriptor = validate(descriptor).map_err(DeclarationError::from)?;
        Ok(self.accumulator.record(descriptor)?)
    }

    fn finalize<D>(
        &mut self,
        outcome: &mut RoundOutcome,
        diagnostics: &mut D,
    ) -> ProcessorResult<Vec<PathBuf>>
    where
        D: DiagnosticSink + ?Sized,
    {
        let descriptors = self.accumulator.begin_finalize()?;
        let generation = codegen::generate(&descriptors, &self.config);

        for failure in &generation.failures {
            error!("{}", failure);
            outcome.failed += 1;
            diagnostics.report(Diagnostic::fatal(failure.declaration(), failure.to_string()));
        }

        let mut written = Vec::with_capacity(generation.artifacts.len());
        for artifact in &generation.artifacts {
            written.push(self.writer.write(artifact)?);
        }

        self.accumulator.finish()?;
        info!("Generated {} files", written.len());
        Ok(written)
    }

    pub fn state(&self) -> AccumulatorState {
        self.accumulator.state()
    }

    pub fn accumulator(&self) -> &RoundAccumulator<S::Handle> {
        &self.accumulator
    }

    /// Rounds processed so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source, for hosts that refresh metadata
    /// between rounds.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_parts(self) -> (S, W) {
        (self.source, self.writer)
    }
}

enum ProcessError {
    Declaration(DeclarationError),
    Invariant(InvariantViolation),
}

impl From<DeclarationError> for ProcessError {
    fn from(e: DeclarationError) -> Self {
        ProcessError::Declaration(e)
    }
}

impl From<InvariantViolation> for ProcessError {
    fn from(e: InvariantViolation) -> Self {
        ProcessError::Invariant(e)
    }
}
