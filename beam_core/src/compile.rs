//! # Document Compilation
//!
//! Turns the Typst source written by the report assembler into a PDF.
//!
//! ## Architecture
//!
//! - [`DocumentCompiler`] is the seam: one call compiles the source once.
//! - [`EmbeddedTypst`] runs Typst in-process with its bundled fonts.
//! - [`ExternalTypst`] shells out to a `typst` executable.
//! - [`run_passes`] drives a compiler for a fixed number of passes, keeps a
//!   log next to the output and checks that a non-empty PDF exists at the end.
//!
//! Every failure becomes [`ReportError::Compilation`] carrying the log path.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use tracing::{info, warn};
use typst::diag::{FileError, FileResult, Severity, SourceDiagnostic};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{ReportError, ReportResult};
use crate::file_io::write_atomic;

/// Output limit for captured compiler stdout/stderr
const OUTPUT_LIMIT_BYTES: usize = 1_000_000;

// ============================================================================
// Compile Jobs
// ============================================================================

/// Paths involved in compiling one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileJob {
    /// Typst source on disk
    pub source_path: PathBuf,
    /// PDF to produce
    pub output_path: PathBuf,
    /// Compiler log
    pub log_path: PathBuf,
    /// Directory that absolute paths inside the source are resolved against
    pub root: PathBuf,
}

impl CompileJob {
    /// Job for `<base>.typ` -> `<base>.pdf`, logging to `<base>.log`.
    ///
    /// A relative base is taken relative to the working directory. The root
    /// is the filesystem root holding the base, so any absolute path on the
    /// same volume can be referenced from the source.
    pub fn for_output(base: &Path) -> ReportResult<Self> {
        let absolute = if base.is_absolute() {
            base.to_path_buf()
        } else {
            let cwd = std::env::current_dir().map_err(|e| {
                ReportError::file_error("resolve working directory", base.display().to_string(), e.to_string())
            })?;
            cwd.join(base)
        };
        let root = absolute
            .ancestors()
            .last()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        Ok(CompileJob {
            source_path: with_suffix(&absolute, "typ"),
            output_path: with_suffix(&absolute, "pdf"),
            log_path: with_suffix(&absolute, "log"),
            root,
        })
    }

    fn failure(&self, message: impl Into<String>) -> ReportError {
        ReportError::compilation(message, self.log_path.display().to_string())
    }
}

/// `base` with `.ext` appended, keeping any dots already in the name
fn with_suffix(base: &Path, ext: &str) -> PathBuf {
    let mut name = base.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(ext);
    base.with_file_name(name)
}

/// Something that can compile a Typst source file to PDF
pub trait DocumentCompiler {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Compile `job.source_path` into `job.output_path` once, appending
    /// diagnostics to `log`.
    fn compile(&self, job: &CompileJob, log: &mut String) -> ReportResult<()>;
}

/// Run `compiler` `passes` times, then require a non-empty output file.
///
/// Any output left by an earlier run is removed first, so only this run's
/// artifact can satisfy the check. The log is rewritten after every pass,
/// so it survives a failure.
pub fn run_passes(compiler: &dyn DocumentCompiler, job: &CompileJob, passes: u32) -> ReportResult<()> {
    let passes = passes.max(1);
    let mut log = String::new();

    match fs::remove_file(&job.output_path) {
        Ok(()) => info!(path = %job.output_path.display(), "removed previous output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(ReportError::file_error(
                "remove previous output",
                job.output_path.display().to_string(),
                e.to_string(),
            ))
        }
    }

    for pass in 1..=passes {
        info!(compiler = compiler.name(), pass, passes, "compiling report");
        log.push_str(&format!("== {} pass {}/{} ==\n", compiler.name(), pass, passes));

        let result = compiler.compile(job, &mut log);
        fs::write(&job.log_path, &log).map_err(|e| {
            ReportError::file_error("write log", job.log_path.display().to_string(), e.to_string())
        })?;
        result?;
    }

    match fs::metadata(&job.output_path) {
        Ok(meta) if meta.len() > 0 => Ok(()),
        Ok(_) => Err(job.failure(format!("{} is empty", job.output_path.display()))),
        Err(_) => Err(job.failure(format!("no output produced at {}", job.output_path.display()))),
    }
}

// ============================================================================
// Typst World Implementation
// ============================================================================

/// Bundled fonts, loaded once per process
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    typst_assets::fonts()
        .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
        .collect()
});

/// A Typst world with one in-memory main source and read-only access to
/// files under `root`.
struct ReportWorld {
    main: Source,
    root: PathBuf,
    book: LazyHash<FontBook>,
    library: LazyHash<Library>,
}

impl ReportWorld {
    fn new(source: String, root: PathBuf) -> Self {
        ReportWorld {
            main: Source::detached(source),
            root,
            book: LazyHash::new(FontBook::from_fonts(FONTS.iter())),
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for ReportWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        let path = id
            .vpath()
            .resolve(&self.root)
            .ok_or(FileError::AccessDenied)?;
        fs::read(&path)
            .map(Bytes::new)
            .map_err(|e| FileError::from_io(e, &path))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(now.year(), now.month() as u8, now.day() as u8)
    }
}

fn push_diagnostics(log: &mut String, diagnostics: &[SourceDiagnostic]) {
    for diag in diagnostics {
        let level = match diag.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        log.push_str(&format!("{}: {}\n", level, diag.message));
        for hint in diag.hints.iter() {
            log.push_str(&format!("  hint: {}\n", hint));
        }
    }
}

fn summarize_messages(diagnostics: &[SourceDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.message.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Compilers
// ============================================================================

/// In-process Typst compiler
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTypst;

impl DocumentCompiler for EmbeddedTypst {
    fn name(&self) -> &str {
        "typst (embedded)"
    }

    fn compile(&self, job: &CompileJob, log: &mut String) -> ReportResult<()> {
        let source = fs::read_to_string(&job.source_path)
            .map_err(|e| job.failure(format!("cannot read {}: {}", job.source_path.display(), e)))?;

        let world = ReportWorld::new(source, job.root.clone());
        let warned = typst::compile(&world);
        push_diagnostics(log, &warned.warnings);
        for warning in warned.warnings.iter() {
            warn!(message = %warning.message, "typst warning");
        }

        let document = warned.output.map_err(|errors| {
            push_diagnostics(log, &errors);
            job.failure(format!("Typst compilation failed: {}", summarize_messages(&errors)))
        })?;

        let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
            push_diagnostics(log, &errors);
            job.failure(format!("PDF rendering failed: {}", summarize_messages(&errors)))
        })?;

        comemo::evict(10);

        log.push_str(&format!(
            "wrote {} ({} bytes)\n",
            job.output_path.display(),
            pdf_bytes.len()
        ));
        write_atomic(&job.output_path, &pdf_bytes)
    }
}

/// `typst compile` run as a subprocess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTypst {
    program: OsString,
    leading_args: Vec<OsString>,
}

impl ExternalTypst {
    pub fn new(program: impl Into<OsString>) -> Self {
        ExternalTypst {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Arguments placed before `compile`, e.g. a script for an interpreter
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl DocumentCompiler for ExternalTypst {
    fn name(&self) -> &str {
        self.program.to_str().unwrap_or("typst")
    }

    fn compile(&self, job: &CompileJob, log: &mut String) -> ReportResult<()> {
        let output = Command::new(&self.program)
            .args(&self.leading_args)
            .arg("compile")
            .arg("--root")
            .arg(&job.root)
            .arg(&job.source_path)
            .arg(&job.output_path)
            .output()
            .map_err(|e| job.failure(format!("could not start {}: {}", self.name(), e)))?;

        push_output(log, "stdout", &output.stdout);
        push_output(log, "stderr", &output.stderr);

        if output.status.success() {
            Ok(())
        } else {
            let status = output
                .status
                .code()
                .map_or_else(|| "a signal".to_string(), |c| format!("status {}", c));
            Err(job.failure(format!("{} exited with {}", self.name(), status)))
        }
    }
}

fn push_output(log: &mut String, label: &str, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    let shown = &bytes[..bytes.len().min(OUTPUT_LIMIT_BYTES)];
    log.push_str(&format!("--- {} ---\n", label));
    log.push_str(&String::from_utf8_lossy(shown));
    if !log.ends_with('\n') {
        log.push('\n');
    }
    if bytes.len() > OUTPUT_LIMIT_BYTES {
        log.push_str("[output truncated]\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_in(dir: &Path, name: &str) -> CompileJob {
        CompileJob::for_output(&dir.join(name)).unwrap()
    }

    #[test]
    fn test_job_paths_keep_dots() {
        let job = CompileJob::for_output(Path::new("/tmp/reports/beam.v2")).unwrap();
        assert_eq!(job.source_path, PathBuf::from("/tmp/reports/beam.v2.typ"));
        assert_eq!(job.output_path, PathBuf::from("/tmp/reports/beam.v2.pdf"));
        assert_eq!(job.log_path, PathBuf::from("/tmp/reports/beam.v2.log"));
    }

    #[test]
    fn test_relative_job_is_absolute() {
        let job = CompileJob::for_output(Path::new("beam_analysis_report")).unwrap();
        assert!(job.source_path.is_absolute());
        assert!(job.source_path.starts_with(&job.root));
    }

    #[test]
    fn test_embedded_compiles_minimal_document() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path(), "minimal");
        fs::write(&job.source_path, "= Hello\nA beam.\n").unwrap();

        run_passes(&EmbeddedTypst, &job, 2).unwrap();

        let pdf = fs::read(&job.output_path).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        let log = fs::read_to_string(&job.log_path).unwrap();
        assert!(log.contains("pass 2/2"));
    }

    #[test]
    fn test_embedded_reports_syntax_errors() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path(), "broken");
        fs::write(&job.source_path, "#let x = (\n").unwrap();

        match run_passes(&EmbeddedTypst, &job, 2) {
            Err(ReportError::Compilation { log_path, .. }) => {
                assert_eq!(PathBuf::from(&log_path), job.log_path);
                let log = fs::read_to_string(&job.log_path).unwrap();
                assert!(log.contains("error:"));
                assert!(!log.contains("pass 2/2"));
            }
            other => panic!("expected Compilation, got {:?}", other),
        }
        assert!(!job.output_path.exists());
    }

    #[test]
    fn test_missing_external_program() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path(), "report");
        fs::write(&job.source_path, "x").unwrap();

        let compiler = ExternalTypst::new("definitely-not-a-typst-binary");
        let err = run_passes(&compiler, &job, 2).unwrap_err();
        assert_eq!(err.error_code(), "COMPILATION_ERROR");
    }

    #[cfg(unix)]
    #[test]
    fn test_external_failure_captures_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake_typst.sh");
        fs::write(&script, "echo 'unknown variable: beam' >&2\nexit 3\n").unwrap();
        let job = job_in(dir.path(), "report");
        fs::write(&job.source_path, "x").unwrap();

        let compiler = ExternalTypst::new("sh").with_leading_args([&script]);
        match run_passes(&compiler, &job, 2) {
            Err(ReportError::Compilation { message, .. }) => assert!(message.contains("status 3")),
            other => panic!("expected Compilation, got {:?}", other),
        }
        let log = fs::read_to_string(&job.log_path).unwrap();
        assert!(log.contains("unknown variable: beam"));
    }

    #[cfg(unix)]
    #[test]
    fn test_external_runs_every_pass() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake_typst.sh");
        // $1=compile $2=--root $3=root $4=source $5=output
        fs::write(&script, "echo \"compiling $4\"\nprintf '%%PDF-1.7' > \"$5\"\n").unwrap();
        let job = job_in(dir.path(), "report");
        fs::write(&job.source_path, "x").unwrap();

        let compiler = ExternalTypst::new("sh").with_leading_args([&script]);
        run_passes(&compiler, &job, 2).unwrap();

        let log = fs::read_to_string(&job.log_path).unwrap();
        assert_eq!(log.matches("compiling ").count(), 2);
        assert_eq!(fs::read(&job.output_path).unwrap(), b"%PDF-1.7");
    }

    #[cfg(unix)]
    #[test]
    fn test_external_success_without_output_fails() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake_typst.sh");
        fs::write(&script, "exit 0\n").unwrap();
        let job = job_in(dir.path(), "report");
        fs::write(&job.source_path, "x").unwrap();

        let compiler = ExternalTypst::new("sh").with_leading_args([&script]);
        match run_passes(&compiler, &job, 2) {
            Err(ReportError::Compilation { message, .. }) => assert!(message.contains("no output")),
            other => panic!("expected Compilation, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_previous_pdf_does_not_count_as_output() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake_typst.sh");
        fs::write(&script, "exit 0\n").unwrap();
        let job = job_in(dir.path(), "report");
        fs::write(&job.source_path, "x").unwrap();
        fs::write(&job.output_path, "%PDF-old").unwrap();

        let compiler = ExternalTypst::new("sh").with_leading_args([&script]);
        match run_passes(&compiler, &job, 2) {
            Err(ReportError::Compilation { message, .. }) => assert!(message.contains("no output")),
            other => panic!("expected Compilation, got {:?}", other),
        }
        assert!(!job.output_path.exists());
    }
}
