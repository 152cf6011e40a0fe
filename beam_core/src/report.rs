//! # Report Assembly
//!
//! Builds the Typst source of the beam force report and drives it through a
//! [`DocumentCompiler`].
//!
//! ## Architecture
//!
//! - Static prose lives in string constants; data is injected with `format!`
//! - Diagrams come from [`crate::diagrams`] as ready-made figures
//! - The source is written to `<output>.typ`, compiled to `<output>.pdf`, and
//!   the compiler log kept in `<output>.log`. Nothing is cleaned up.
//!
//! ## Example
//!
//! ```rust,no_run
//! use beam_core::report::{generate_report, ReportRequest};
//! use beam_core::settings::ReportSettings;
//! use std::path::PathBuf;
//!
//! let request = ReportRequest {
//!     data_path: PathBuf::from("beam_forces.xlsx"),
//!     image_path: Some(PathBuf::from("beam.png")),
//!     output_base: PathBuf::from("beam_analysis_report"),
//!     settings: ReportSettings::default(),
//! };
//! let outcome = generate_report(&request)?;
//! println!("wrote {}", outcome.artifacts.pdf_path.display());
//! # Ok::<(), beam_core::errors::ReportError>(())
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{info, warn};

use crate::compile::{run_passes, CompileJob, DocumentCompiler, EmbeddedTypst, ExternalTypst};
use crate::dataset::Dataset;
use crate::diagrams::{synthesize, Diagram, DiagramKind, DiagramSummary};
use crate::errors::ReportResult;
use crate::file_io::{load_dataset, write_atomic};
use crate::settings::{CompilerChoice, ReportSettings};
use crate::units::{KiloNewtonMeters, KiloNewtons, Meters};

// ============================================================================
// Templates
// ============================================================================

const PREAMBLE: &str = r##"#set document(title: "{{TITLE}}", author: "{{AUTHOR}}")
#set page(paper: "us-letter", margin: 1in, numbering: "1")
#set text(font: "New Computer Modern", size: 11pt)
#set par(justify: true)
#set heading(numbering: "1.1")
#show heading.where(level: 1): it => block(above: 1.6em, below: 1em, it)
#show figure.caption: set text(size: 10pt)
"##;

const TITLE_PAGE: &str = r##"
#page(numbering: none)[
  #align(center + horizon)[
    #text(size: 22pt)[{{TITLE}}]
    #v(1.5em)
    #text(size: 13pt)[{{AUTHOR}}]
    #v(0.8em)
    #text(size: 12pt)[#datetime.today().display("[month repr:long] [day padding:none], [year]")]
  ]
]

#outline(title: [Contents])
#pagebreak()
"##;

const INTRODUCTION: &str = r##"
= Introduction

This report presents a structural analysis of a simply supported beam subjected to various load conditions. The analysis includes the calculation and visualization of shear force and bending moment distributions along the beam length.
{{FIGURE}}
The primary objectives of this analysis are:

#heading(level: 2, numbering: none, outlined: false)[Objectives]

- Read and process beam force data from a spreadsheet
- Generate engineering diagrams using vector graphics
- Present results in a structured, industry-standard format
- Provide clear visualization of shear forces and bending moments

= Beam Description

The structural system under consideration is a simply supported beam. This type of beam is supported at both ends, with one end allowing rotation and horizontal movement (roller support) and the other allowing only rotation (pin support). This configuration allows the beam to deform freely under applied loads while maintaining static equilibrium through the support reactions.

= Data Source

The input data for this analysis was read from {{DATA_FILE}}. It lists {{ROW_COUNT}} stations along the beam with the shear force and bending moment at each. Positions are in metres, forces in kilonewtons and moments in kilonewton-metres.

#pagebreak()
"##;

const ANALYSIS: &str = r##"
= Analysis

== Theoretical Background

*Shear Force:* The shear force at any section of a beam is the algebraic sum of all vertical forces acting on either side of the section. It represents the internal force that resists shear deformation.

*Bending Moment:* The bending moment at any section is the algebraic sum of the moments of all forces acting on either side of the section. It quantifies the internal moment that resists bending of the beam.

== Calculation Methodology

The shear force and bending moment values are taken directly from the spreadsheet, which contains pre-calculated structural analysis results based on fundamental principles of structural mechanics:

+ Load positions and magnitudes defined along the beam length
+ Shear force distribution computed from equilibrium of forces
+ Bending moment distribution calculated through integration
+ Results verified against structural analysis software

For the diagrams, each curve is resampled at {{RESAMPLE_POINTS}} evenly spaced positions: linearly for shear force and with a quadratic spline for bending moment. Each strip is shaded by its value relative to the curve's extremes.
"##;

const SHEAR_SECTION: &str = r##"
= Shear Force Diagram

The Shear Force Diagram (SFD) in @fig:sfd illustrates the variation of shear force along the length of the beam. This diagram is essential for identifying critical sections where shear stress is maximum and for designing adequate shear reinforcement.
"##;

const MOMENT_SECTION: &str = r##"
= Bending Moment Diagram

The Bending Moment Diagram (BMD) in @fig:bmd displays the distribution of bending moment along the beam. This diagram is crucial for determining the maximum bending stress and for designing the beam cross-section to resist flexural loads safely.
"##;

const SUMMARY: &str = r##"
= Summary

This report has presented a structural analysis of a simply supported beam, including the input force data and a visualization of the results.

*Key Results:*

- Maximum Shear Force: {{MAX_SHEAR}} (at x = {{MAX_SHEAR_AT}})
- Maximum Bending Moment: {{MAX_MOMENT}} (at x = {{MAX_MOMENT_AT}})
- Number of Load Points: {{ROW_COUNT}}
- Beam Span: {{SPAN}}

All diagrams and tables were generated programmatically with Typst to ensure accuracy and reproducibility.
"##;

// ============================================================================
// Assembly
// ============================================================================

/// Everything needed for one report run
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub data_path: PathBuf,
    pub image_path: Option<PathBuf>,
    /// Output path without extension
    pub output_base: PathBuf,
    pub settings: ReportSettings,
}

/// Files produced by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifacts {
    pub source_path: PathBuf,
    pub pdf_path: PathBuf,
    pub log_path: PathBuf,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub artifacts: ReportArtifacts,
    pub rows: usize,
    pub span: Meters,
    pub shear: DiagramSummary,
    pub moment: DiagramSummary,
}

/// Assembled Typst source plus the diagrams it embeds
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub source: String,
    pub shear: Diagram,
    pub moment: Diagram,
}

/// Presentation inputs besides the dataset
#[derive(Debug, Clone, Default)]
pub struct ReportContext<'a> {
    /// Shown in the Data Source section
    pub data_name: &'a str,
    /// Root-relative path of the beam image, already checked to exist
    pub image: Option<String>,
}

/// Synthesize both diagrams and assemble the full report source.
pub fn assemble(
    dataset: &Dataset,
    context: &ReportContext<'_>,
    settings: &ReportSettings,
) -> ReportResult<ReportDocument> {
    let shear = synthesize(dataset, DiagramKind::Shear)?;
    let moment = synthesize(dataset, DiagramKind::Moment)?;

    let title = escape_typst(&settings.title);
    let author = escape_typst(&settings.author);
    let row_count = dataset.len().to_string();

    let figure = match &context.image {
        Some(vpath) => format!(
            "\n#figure(\n  image(\"{}\", width: 70%),\n  caption: [Simply Supported Beam Configuration],\n) <fig:beam>\n",
            escape_string(vpath)
        ),
        None => String::new(),
    };

    let mut source = String::new();
    source.push_str(&PREAMBLE.replace("{{TITLE}}", &escape_string(&settings.title)).replace(
        "{{AUTHOR}}",
        &escape_string(&settings.author),
    ));
    source.push_str(&TITLE_PAGE.replace("{{TITLE}}", &title).replace("{{AUTHOR}}", &author));
    source.push_str(
        &INTRODUCTION
            .replace("{{FIGURE}}", &figure)
            .replace("{{DATA_FILE}}", &data_file_phrase(context.data_name))
            .replace("{{ROW_COUNT}}", &row_count),
    );
    source.push_str(&build_data_table(dataset));
    source.push_str(
        &ANALYSIS.replace("{{RESAMPLE_POINTS}}", &crate::diagrams::RESAMPLE_POINTS.to_string()),
    );
    source.push_str(SHEAR_SECTION);
    source.push_str(&shear.markup);
    source.push_str(MOMENT_SECTION);
    source.push_str(&moment.markup);

    let (max_shear, max_shear_at) = shear.summary.peak_abs();
    let (max_moment, max_moment_at) = moment.summary.peak_abs();
    source.push_str(
        &SUMMARY
            .replace("{{MAX_SHEAR}}", &KiloNewtons(clean_zero(max_shear)).to_string())
            .replace("{{MAX_SHEAR_AT}}", &Meters(clean_zero(max_shear_at)).to_string())
            .replace("{{MAX_MOMENT}}", &KiloNewtonMeters(clean_zero(max_moment)).to_string())
            .replace("{{MAX_MOMENT_AT}}", &Meters(clean_zero(max_moment_at)).to_string())
            .replace("{{ROW_COUNT}}", &row_count)
            .replace("{{SPAN}}", &dataset.span().to_string()),
    );

    Ok(ReportDocument { source, shear, moment })
}

/// Input table: one row per sample, two decimals
fn build_data_table(dataset: &Dataset) -> String {
    let rows = dataset
        .samples()
        .iter()
        .map(|s| {
            format!(
                "  [{:.2}], [{:.2}], [{:.2}],",
                clean_zero(s.position.0),
                clean_zero(s.shear_force.0),
                clean_zero(s.bending_moment.0)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r##"
= Input Data

The following table presents the input force data extracted from the spreadsheet.

#align(center, table(
  columns: 3,
  inset: 6pt,
  stroke: 0.5pt,
  align: right,
  table.header([*Position ({m})*], [*Shear Force ({kn})*], [*Bending Moment ({knm})*]),
{rows}
))
"##,
        m = Meters::SYMBOL,
        kn = KiloNewtons::SYMBOL,
        knm = KiloNewtonMeters::SYMBOL,
        rows = rows,
    )
}

/// Write the source, compile it and check the artifact.
pub fn write_report(
    document: &ReportDocument,
    job: &CompileJob,
    compiler: &dyn DocumentCompiler,
    passes: u32,
) -> ReportResult<ReportArtifacts> {
    write_atomic(&job.source_path, document.source.as_bytes())?;
    info!(path = %job.source_path.display(), "wrote report source");

    run_passes(compiler, job, passes)?;

    Ok(ReportArtifacts {
        source_path: job.source_path.clone(),
        pdf_path: job.output_path.clone(),
        log_path: job.log_path.clone(),
    })
}

/// Compiler selected by the settings
pub fn compiler_for(settings: &ReportSettings) -> Box<dyn DocumentCompiler> {
    match &settings.compiler {
        CompilerChoice::Embedded => Box::new(EmbeddedTypst),
        CompilerChoice::External { program } => Box::new(ExternalTypst::new(program)),
    }
}

/// Load, draw, assemble and compile: the whole run.
pub fn generate_report(request: &ReportRequest) -> ReportResult<ReportOutcome> {
    let dataset = load_dataset(&request.data_path)?;
    let job = CompileJob::for_output(&request.output_base)?;

    let image = request
        .image_path
        .as_deref()
        .and_then(|path| image_reference(path, &job.root));
    let data_name = request
        .data_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let context = ReportContext {
        data_name: &data_name,
        image,
    };

    let document = assemble(&dataset, &context, &request.settings)?;
    let compiler = compiler_for(&request.settings);
    let artifacts = write_report(&document, &job, compiler.as_ref(), request.settings.compile_passes)?;

    Ok(ReportOutcome {
        artifacts,
        rows: dataset.len(),
        span: dataset.span(),
        shear: document.shear.summary,
        moment: document.moment.summary,
    })
}

/// Root-relative path (`/dir/beam.png`) of an existing image, or `None`
/// when it is missing or lies outside `root`.
pub fn image_reference(path: &Path, root: &Path) -> Option<String> {
    let canonical = match fs::canonicalize(path) {
        Ok(p) if p.is_file() => p,
        _ => {
            warn!(path = %path.display(), "image not found, continuing without it");
            return None;
        }
    };

    let relative = match canonical.strip_prefix(root) {
        Ok(rel) => rel,
        Err(_) => {
            warn!(path = %canonical.display(), root = %root.display(), "image is outside the document root, skipping");
            return None;
        }
    };

    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(format!("/{}", parts.join("/")))
}

fn data_file_phrase(name: &str) -> String {
    if name.is_empty() {
        "the input spreadsheet".to_string()
    } else {
        format!("the spreadsheet _{}_", escape_typst(name))
    }
}

/// Format-friendly value: tiny magnitudes print as zero, never `-0.00`
fn clean_zero(value: f64) -> f64 {
    if value.abs() < 0.005 {
        0.0
    } else {
        value
    }
}

/// Escape special Typst characters in user-provided markup text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Escape text for a Typst string literal
fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::documentation_example;
    use crate::errors::ReportError;

    const SAMPLE_CSV: &str = "\
x,Shear force,Bending moment
0,45,0
1.5,36,60.75
3,27,108
4.5,18,141.75
6,9,162
7.5,0,168.75
9,-9,162
10.5,-18,141.75
12,-27,108
13.5,-36,60.75
15,-45,0
";

    fn context(data_name: &str) -> ReportContext<'_> {
        ReportContext { data_name, image: None }
    }

    #[test]
    fn test_assemble_sections_in_order() {
        let ds = documentation_example();
        let doc = assemble(&ds, &context("forces.xlsx"), &ReportSettings::default()).unwrap();

        let order = [
            "#outline(",
            "= Introduction",
            "= Beam Description",
            "= Data Source",
            "= Input Data",
            "= Analysis",
            "= Shear Force Diagram",
            "<fig:sfd>",
            "= Bending Moment Diagram",
            "<fig:bmd>",
            "= Summary",
        ];
        let mut cursor = 0;
        for marker in order {
            let found = doc.source[cursor..]
                .find(marker)
                .unwrap_or_else(|| panic!("{} missing or out of order", marker));
            cursor += found + marker.len();
        }
    }

    #[test]
    fn test_summary_values() {
        let ds = documentation_example();
        let doc = assemble(&ds, &context("forces.xlsx"), &ReportSettings::default()).unwrap();
        assert!(doc.source.contains("Maximum Shear Force: 45.00 kN (at x = 0.00 m)"));
        assert!(doc.source.contains("Maximum Bending Moment: 168.75 kN·m (at x = 7.50 m)"));
        assert!(doc.source.contains("Number of Load Points: 11"));
        assert!(doc.source.contains("Beam Span: 15.00 m"));
    }

    #[test]
    fn test_data_table_rows() {
        let table = build_data_table(&documentation_example());
        assert_eq!(table.matches("],\n").count(), 11);
        assert!(table.contains("  [7.50], [0.00], [168.75],"));
        assert!(table.contains("  [15.00], [-45.00], [0.00],"));
    }

    #[test]
    fn test_image_skipped_when_absent() {
        let ds = documentation_example();
        let doc = assemble(&ds, &context("forces.xlsx"), &ReportSettings::default()).unwrap();
        assert!(!doc.source.contains("image("));
        assert_eq!(image_reference(Path::new("no/such/beam.png"), Path::new("/")), None);
    }

    #[test]
    fn test_image_included_when_present() {
        let ds = documentation_example();
        let ctx = ReportContext {
            data_name: "forces.xlsx",
            image: Some("/home/eng/beam.png".to_string()),
        };
        let doc = assemble(&ds, &ctx, &ReportSettings::default()).unwrap();
        assert!(doc.source.contains("image(\"/home/eng/beam.png\", width: 70%)"));
        assert!(doc.source.contains("Simply Supported Beam Configuration"));
    }

    #[cfg(unix)]
    #[test]
    fn test_image_reference_is_root_relative() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("beam.png");
        fs::write(&image, b"png").unwrap();

        let reference = image_reference(&image, Path::new("/")).unwrap();
        let canonical = fs::canonicalize(&image).unwrap();
        assert_eq!(reference, canonical.display().to_string());
    }

    #[test]
    fn test_user_text_is_escaped() {
        let ds = documentation_example();
        let settings = ReportSettings {
            title: "Beam #3 *draft*".to_string(),
            author: "R&D \"Structures\"".to_string(),
            ..ReportSettings::default()
        };
        let doc = assemble(&ds, &context("beam_3.xlsx"), &settings).unwrap();
        assert!(doc.source.contains("[Beam \\#3 \\*draft\\*]"));
        assert!(doc.source.contains("title: \"Beam #3 *draft*\""));
        assert!(doc.source.contains("author: \"R&D \\\"Structures\\\"\""));
        assert!(doc.source.contains("the spreadsheet _beam\\_3.xlsx_."));
    }

    #[test]
    fn test_generate_report_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("forces.csv");
        fs::write(&data_path, SAMPLE_CSV).unwrap();

        let request = ReportRequest {
            data_path,
            image_path: Some(dir.path().join("missing.png")),
            output_base: dir.path().join("beam_analysis_report"),
            settings: ReportSettings::default(),
        };
        let outcome = generate_report(&request).unwrap();

        let pdf = fs::read(&outcome.artifacts.pdf_path).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        assert!(pdf.len() > 1000);
        assert!(outcome.artifacts.source_path.exists());
        assert!(outcome.artifacts.log_path.exists());
        assert_eq!(outcome.rows, 11);
        assert_eq!(outcome.shear.max_position, 0.0);
        assert_eq!(outcome.shear.min_position, 15.0);
    }

    #[test]
    fn test_missing_column_aborts_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("forces.csv");
        fs::write(&data_path, "x,Load,Bending moment\n0,1,0\n1,1,1\n2,1,0\n").unwrap();

        let request = ReportRequest {
            data_path,
            image_path: None,
            output_base: dir.path().join("report"),
            settings: ReportSettings::default(),
        };
        match generate_report(&request) {
            Err(ReportError::MissingColumn { field, .. }) => assert_eq!(field, "shear force"),
            other => panic!("expected MissingColumn, got {:?}", other.map(|o| o.artifacts)),
        }
        assert!(!dir.path().join("report.typ").exists());
        assert!(!dir.path().join("report.pdf").exists());
    }

    #[test]
    fn test_non_increasing_positions_abort_run() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("forces.csv");
        fs::write(&data_path, "x,Shear force,Bending moment\n0,1,0\n2,1,1\n1,1,0\n3,0,0\n").unwrap();

        let request = ReportRequest {
            data_path,
            image_path: None,
            output_base: dir.path().join("report"),
            settings: ReportSettings::default(),
        };
        let err = generate_report(&request).map(|o| o.artifacts).unwrap_err();
        assert_eq!(err.error_code(), "INTERPOLATION_ERROR");
        assert!(!dir.path().join("report.pdf").exists());
    }
}
