use crate::classify::MarkerCache;
use crate::config::ProcessorConfig;
use crate::emit::{EmitOutcome, FileEmitter};
use crate::error::ProcessError;
use crate::generate::{GeneratedFragment, Generator, ImportSet, KotlinGenerator};
use crate::host::{CodeGenerator, Resolver};
use crate::report::ViolationReport;
use crate::select::{accepts_file, select};
use crate::symbols::FunctionDecl;
use std::collections::HashSet;

/// Counters for one round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundSummary {
    pub files_scanned: usize,
    pub files_excluded: usize,
    pub files_generated: usize,
    /// Files skipped because their test file was already emitted this run
    pub files_duplicate: usize,
    pub functions_generated: usize,
    pub violations: usize,
    /// Functions handed back to the host
    pub deferred: usize,
    /// Files held back because some of their previews did not validate
    pub files_deferred: usize,
}

#[derive(Debug, Default)]
pub struct RoundOutput {
    pub summary: RoundSummary,
    /// Functions the host should offer again next round: the ones that did not
    /// validate, plus the valid previews of the same files, whose tests are
    /// written together with them
    pub deferred: Vec<FunctionDecl>,
}

/// Screenshot test processor.
///
/// One instance lives for a whole processing run. When the host reuses it
/// across rounds, marker classifications, emitted file names and pending
/// violations keep accumulating.
pub struct ScreenshotProcessor {
    config: ProcessorConfig,
    markers: MarkerCache,
    emitter: FileEmitter,
    report: ViolationReport,
}

impl ScreenshotProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            markers: MarkerCache::new(&config.preview_annotation),
            emitter: FileEmitter::new(),
            report: ViolationReport::new(config.report_path.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn markers(&self) -> &MarkerCache {
        &self.markers
    }

    pub fn emitter(&self) -> &FileEmitter {
        &self.emitter
    }

    pub fn report(&self) -> &ViolationReport {
        &self.report
    }

    /// Run one round over the host's new files
    pub fn process(
        &mut self,
        resolver: &dyn Resolver,
        codegen: &mut dyn CodeGenerator,
    ) -> Result<RoundOutput, ProcessError> {
        // Annotations wrapping the base marker count even before their uses are seen
        self.markers.seed_from(resolver, &self.config.preview_annotation);

        let generator = KotlinGenerator::new(&self.config);
        let mut output = RoundOutput::default();

        for file in resolver.new_files() {
            if !accepts_file(&self.config, file) {
                tracing::debug!(file = %file.path, origin = ?file.origin, "skipping file");
                output.summary.files_excluded += 1;
                continue;
            }
            output.summary.files_scanned += 1;

            let selection = select(resolver, &mut self.markers, &self.config, file);
            output.summary.violations += selection.violations.len();
            for violation in selection.violations {
                self.report.record(violation);
            }

            // A file's test unit is written once, so it waits until every preview in it validates
            if !selection.deferred.is_empty() {
                tracing::debug!(
                    file = %file.path,
                    deferred = selection.deferred.len(),
                    "holding back test file until its previews resolve"
                );
                output.summary.files_deferred += 1;
                output.deferred.extend(selection.deferred.into_iter().cloned());
                output
                    .deferred
                    .extend(selection.eligible.iter().map(|eligible| eligible.function.clone()));
                continue;
            }

            let Some(first) = selection.eligible.first() else {
                continue;
            };
            let package = first.function.package.clone();

            let mut imports = ImportSet::new();
            let fragments: Vec<GeneratedFragment> = selection
                .eligible
                .iter()
                .map(|eligible| generator.generate(resolver, eligible, &mut imports))
                .collect();
            warn_on_name_collisions(&file.path, &fragments);

            let outcome = self
                .emitter
                .emit(
                    codegen,
                    &generator,
                    file,
                    &package,
                    &self.config.suffix,
                    &imports,
                    &fragments,
                )
                .map_err(|error| ProcessError::Write {
                    source_file: file.path.clone(),
                    error,
                })?;

            match outcome {
                EmitOutcome::Written(_) => {
                    output.summary.files_generated += 1;
                    output.summary.functions_generated += fragments.len();
                }
                EmitOutcome::Duplicate(_) => output.summary.files_duplicate += 1,
                EmitOutcome::Empty => {}
            }
        }

        self.report.flush().map_err(|error| ProcessError::Report {
            path: self.report.path().to_path_buf(),
            error,
        })?;

        output.summary.deferred = output.deferred.len();
        tracing::info!(
            scanned = output.summary.files_scanned,
            generated = output.summary.files_generated,
            duplicates = output.summary.files_duplicate,
            held_back = output.summary.files_deferred,
            violations = output.summary.violations,
            deferred = output.summary.deferred,
            "round complete"
        );
        Ok(output)
    }
}

/// Overloads share a simple name and therefore a generated name
fn warn_on_name_collisions(path: &str, fragments: &[GeneratedFragment]) {
    let mut seen = HashSet::new();
    for fragment in fragments {
        if !seen.insert(fragment.function_name.as_str()) {
            tracing::warn!(
                file = path,
                function = %fragment.function_name,
                "overloaded previews generate clashing test names"
            );
        }
    }
}
