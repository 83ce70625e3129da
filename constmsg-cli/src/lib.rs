use anyhow::Context;
use anyhow_std::*;
use clap::Parser;
use const_format::{formatcp, str_index};
use constmsg_errors::*;
use constmsg_parser::extract::annotations;
use constmsg_parser::{parse_str, AnnotationTable};
use constmsg_render::*;
use human_repr::*;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};


pub static LONG_VERSION: &str = formatcp!(
    "{}\nGit {}\nDebug {}",
    env!("CARGO_PKG_VERSION"),
    if cfg!(has_git) {
        formatcp!(
            "commit {} on branch {}",
            str_index!(env!("CONSTMSG_GIT_COMMIT"), ..6),
            env!("CONSTMSG_GIT_BRANCH")
        )
    } else {
        "not found"
    },
    if cfg!(debug_assertions) {
        "enabled"
    } else {
        "disabled"
    }
);

/// Generate a code-to-message lookup module from the comments on a file's constants.
#[derive(Debug, Clone, Parser)]
#[command(name = "constmsg", author, version, long_version = LONG_VERSION)]
pub struct Cli {
    /// file to read constants from
    #[arg(long, env = "CONSTMSG_FILE")]
    pub file: PathBuf,
    /// module path the constants are imported from
    #[arg(long, env = "CONSTMSG_PACKAGE")]
    pub package: String,
    /// generated module path [default: <file>_msg_gen.rs]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// type of the constants
    #[arg(short = 't', long = "type", default_value = DEFAULT_VALUE_TYPE)]
    pub value_type: String,
    /// also generate Markdown documentation
    #[arg(short, long)]
    pub markdown: bool,
    /// documentation path [default: <file>_msg_gen.md]
    #[arg(long)]
    pub md_out: Option<PathBuf>,
    /// message for codes without a description
    #[arg(long, default_value = DEFAULT_UNKNOWN_MSG)]
    pub unknown_msg: String,
    /// print the extracted descriptions as JSON
    #[arg(long)]
    pub dump_table: bool,
    /// don't write anything, fail if an output is out of date
    #[arg(long)]
    pub check: bool,
    /// print timings
    #[arg(long)]
    pub timings: bool,
    /// only print errors and warnings
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
    /// explain what's extracted and skipped
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Default arguments for generating from `file`.
    pub fn new(file: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            package: package.into(),
            output: None,
            value_type: DEFAULT_VALUE_TYPE.to_string(),
            markdown: false,
            md_out: None,
            unknown_msg: DEFAULT_UNKNOWN_MSG.to_string(),
            dump_table: false,
            check: false,
            timings: false,
            quiet: false,
            verbose: false,
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.file, "rs"))
    }

    /// Where to write documentation, if it was asked for.
    pub fn docs_path(&self) -> Option<PathBuf> {
        match &self.md_out {
            Some(path) => Some(path.clone()),
            None if self.markdown => Some(default_output_path(&self.file, "md")),
            None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

#[derive(Debug, Clone, Copy)]
pub struct Exit(pub i32);
impl std::fmt::Display for Exit {
    fn fmt(&self, _f: &mut std::fmt::Formatter) -> std::fmt::Result {
        Ok(())
    }
}
impl std::error::Error for Exit {}

/// `dir/codes.rs` becomes `dir/codes_msg_gen.<ext>`. Other files keep their
/// name and get the suffix appended.
pub fn default_output_path(input: &Path, ext: &str) -> PathBuf {
    let mut path = if input.extension() == Some(OsStr::new("rs")) {
        input.with_extension("").into_os_string()
    } else {
        input.as_os_str().to_owned()
    };
    path.push("_msg_gen.");
    path.push(ext);
    path.into()
}

fn timeit<R, F: FnOnce() -> R>(f: F) -> (R, Duration) {
    let start = Instant::now();
    let res = f();
    (res, start.elapsed())
}

struct Reporter {
    timings: bool,
    reported: bool,
    bottom_line: bool,
    start: Instant,
    overall: Option<Duration>,
    file_time: Option<Duration>,
    file_len: usize,
    parse_time: Option<Duration>,
    render_time: Option<Duration>,
    out_len: usize,
}
impl Reporter {
    fn new(timings: bool) -> Self {
        Self {
            timings,
            reported: false,
            bottom_line: true,
            start: Instant::now(),
            overall: None,
            file_time: None,
            file_len: 0,
            parse_time: None,
            render_time: None,
            out_len: 0,
        }
    }
    fn print(&mut self) {
        if !self.timings || self.reported {
            return;
        }
        self.reported = true;
        let overall = self.overall.get_or_insert_with(|| self.start.elapsed());
        println!("----------------");
        println!("overall time: {:>8}", overall.human_duration().to_string());
        if let Some(file) = self.file_time {
            println!(
                "reading file: {:>8} ({:6.3}%) @ {:>13}",
                file.human_duration().to_string(),
                file.as_secs_f64() / overall.as_secs_f64() * 100.0,
                (self.file_len as f64 / file.as_secs_f64())
                    .human_throughput_bytes()
                    .to_string()
            );
        }
        if let Some(parse) = self.parse_time {
            println!(
                "parsing code: {:>8} ({:6.3}%) @ {:>13}",
                parse.human_duration().to_string(),
                parse.as_secs_f64() / overall.as_secs_f64() * 100.0,
                (self.file_len as f64 / parse.as_secs_f64())
                    .human_throughput_bytes()
                    .to_string()
            );
        }
        if let Some(render) = self.render_time {
            println!(
                "rendering:    {:>8} ({:6.3}%) @ {:>13}",
                render.human_duration().to_string(),
                render.as_secs_f64() / overall.as_secs_f64() * 100.0,
                (self.out_len as f64 / render.as_secs_f64())
                    .human_throughput_bytes()
                    .to_string()
            );
        }
        if self.bottom_line {
            println!("----------------");
        }
    }
    fn finish(&mut self) {
        self.bottom_line = false;
        self.print();
    }
}
// report on the way out of a failed run too
impl Drop for Reporter {
    fn drop(&mut self) {
        self.print();
    }
}

/// Parse the input and collect its descriptions, reporting parse errors and
/// (when verbose) every declaration that was skipped.
pub fn load_table(file: &SourceFile, verbosity: Verbosity) -> anyhow::Result<AnnotationTable> {
    let (ast, errs) = parse_str(file.contents());
    if !errs.is_empty() {
        for err in errs {
            eprintln!(
                "{:?}",
                Report::from(err.into_owned()).with_source_code(file.clone())
            );
        }
        Err(Exit(1))?
    }
    let mut table = AnnotationTable::new();
    for (decl, entry) in annotations(&ast) {
        let line = file
            .source_loc(decl.span.offset())
            .map_or(0, |(line, _)| line + 1);
        match entry {
            Ok(entry) => {
                if verbosity >= Verbosity::Verbose {
                    note!("line {line}: `{}` = {:?}", entry.name, entry.description);
                }
                let name = entry.name.clone();
                if table.insert_entry(entry).is_some() {
                    warning!(
                        "`{name}` is declared more than once, keeping the description from line {line}"
                    );
                }
            }
            Err(reason) if verbosity >= Verbosity::Verbose => {
                let names = decl
                    .names
                    .iter()
                    .map(|id| id.name)
                    .collect::<Vec<_>>()
                    .join(", ");
                if names.is_empty() {
                    note!("line {line}: skipping {}: it {reason}", decl.kind);
                } else {
                    note!("line {line}: skipping `{names}`: it {reason}");
                }
            }
            Err(_) => {}
        }
    }
    Ok(table)
}

/// Report a generation error. These never come from the input's own syntax,
/// so there's no input source attached.
fn report_gen_error(err: GenError) -> anyhow::Error {
    eprintln!("{:?}", Report::from(err));
    Exit(1).into()
}

pub fn driver(cli: Cli) -> anyhow::Result<()> {
    let verbosity = cli.verbosity();
    let mut reporter = Reporter::new(cli.timings);

    let input_name = cli.file.display().to_string();
    let (code, file_time) = timeit(|| cli.file.read_to_string_anyhow());
    let code = code?;
    reporter.file_time = Some(file_time);
    reporter.file_len = code.len();
    if verbosity >= Verbosity::Verbose {
        note!("read {} from {input_name}", code.len().human_count_bytes());
    }
    let file = SourceFile::new(input_name.as_str(), code);

    let (table, parse_time) = timeit(|| load_table(&file, verbosity));
    let table = table?;
    reporter.parse_time = Some(parse_time);
    if table.is_empty() {
        warning!("no constants found in {input_name}");
    }

    if cli.dump_table {
        let json = serde_json::to_value(&table).context("failed to serialize the table")?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    }

    let output = cli.output_path();
    let docs_path = cli.docs_path();
    let ctx = RenderContext::new(cli.package, table)
        .with_value_type(cli.value_type)
        .with_unknown_msg(cli.unknown_msg);

    // everything is rendered before anything is written
    let (rendered, render_time) = timeit(|| -> Result<_, GenError> {
        let mut outputs = vec![(output, render_module(&ctx)?)];
        if let Some(path) = docs_path {
            outputs.push((path, render_docs(&ctx)?));
        }
        Ok(outputs)
    });
    let outputs = rendered.map_err(report_gen_error)?;
    reporter.render_time = Some(render_time);
    reporter.out_len = outputs.iter().map(|(_, text)| text.len()).sum();

    if cli.check {
        let mut stale = false;
        for (path, text) in &outputs {
            let current = path.read_to_string_anyhow().ok();
            if current.as_deref() == Some(text.as_str()) {
                if verbosity >= Verbosity::Verbose {
                    note!("{} is up to date", path.display());
                }
            } else {
                error!("{} is out of date", path.display());
                stale = true;
            }
        }
        if stale {
            Err(Exit(1))?
        }
    } else {
        for (path, text) in &outputs {
            path.write_anyhow(text)?;
            if verbosity >= Verbosity::Normal {
                info!(
                    "wrote {} ({} entries)",
                    path.display(),
                    ctx.table.len()
                );
            }
        }
    }

    reporter.finish();
    Ok(())
}

pub mod prelude {
    pub use super::{driver, Cli, Exit};
    pub use clap::Parser as _;
}
