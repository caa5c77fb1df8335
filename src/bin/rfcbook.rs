use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rfcbook::{
    BuildConfig, DocId, IndexPlan, SelectionCriteria, build_volumes, plan_from_index, select,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rfcbook", version)]
#[command(about = "Bind RFCs into page-bounded PDF volumes", long_about = None)]
struct Args {
    /// RFC numbers or ids (791, rfc791, RFC0791), followed by the output
    /// file prefix. Volumes are written as PREFIX-1.pdf, PREFIX-2.pdf, ...
    #[arg(value_name = "RFC... PREFIX", num_args = 1.., required = true)]
    positional: Vec<String>,

    /// Transitively include RFCs updated by a target RFC
    #[arg(long, overrides_with = "no_include_updates")]
    include_updates: bool,

    #[arg(long, overrides_with = "include_updates", hide = true)]
    no_include_updates: bool,

    /// Transitively include RFCs obsoleted by a target RFC
    #[arg(long, overrides_with = "no_include_obsoletes")]
    include_obsoletes: bool,

    #[arg(long, overrides_with = "include_obsoletes", hide = true)]
    no_include_obsoletes: bool,

    /// Transitively include RFCs referenced by a target RFC
    #[arg(long, overrides_with = "no_include_see_also")]
    include_see_also: bool,

    #[arg(long, overrides_with = "include_see_also", hide = true)]
    no_include_see_also: bool,

    /// Include all RFCs tagged with the given keyword(s)
    #[arg(long, num_args = 1..)]
    keyword: Vec<String>,

    /// Maximum pages per volume
    #[arg(long = "maxpages", env = "RFCBOOK_MAX_PAGES")]
    max_pages: Option<u32>,

    /// Include *all* indexed RFCs; ids, keywords and relations are ignored
    #[arg(long)]
    all: bool,

    /// JSON config file; command-line flags take precedence (--no-include-*
    /// and --no-skip-empty switch off flags the file turns on)
    #[arg(long, env = "RFCBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Local copy of rfc-index.xml
    #[arg(long, env = "RFCBOOK_INDEX_FILE")]
    index_file: Option<PathBuf>,

    /// URL of rfc-index.xml
    #[arg(long, env = "RFCBOOK_INDEX_URL")]
    index_url: Option<String>,

    /// Read PDFs from this directory instead of downloading them
    #[arg(long, env = "RFCBOOK_PDF_DIR")]
    pdf_dir: Option<PathBuf>,

    /// PDF URL template; {number} is the RFC number, {id} the lower-case id
    #[arg(long, env = "RFCBOOK_PDF_URL_TEMPLATE")]
    pdf_url_template: Option<String>,

    /// HTTP timeout per request, in seconds
    #[arg(long, env = "RFCBOOK_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Number of documents fetched concurrently
    #[arg(long, env = "RFCBOOK_FETCH_WORKERS")]
    fetch_workers: Option<usize>,

    /// Do not write a file for an empty final volume
    #[arg(long, overrides_with = "no_skip_empty")]
    skip_empty: bool,

    #[arg(long, overrides_with = "skip_empty", hide = true)]
    no_skip_empty: bool,

    /// Plan volumes from the page counts in the index; fetch and write nothing
    #[arg(long)]
    dry_run: bool,

    /// Print the result as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// `Some(true)` for `--flag`, `Some(false)` for `--no-flag`, `None` when
/// neither was given.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl Args {
    fn build_config(&self) -> Result<BuildConfig> {
        let mut config = match &self.config {
            Some(path) => BuildConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => BuildConfig::default(),
        };
        self.overlay(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Apply the flags given on the command line over `config`.
    fn overlay(&self, config: &mut BuildConfig) {
        if let Some(path) = &self.index_file {
            config.index_file = Some(path.clone());
        }
        if let Some(url) = &self.index_url {
            config.index_url.clone_from(url);
        }
        if let Some(dir) = &self.pdf_dir {
            config.document_dir = Some(dir.clone());
        }
        if let Some(template) = &self.pdf_url_template {
            config.document_url_template.clone_from(template);
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(workers) = self.fetch_workers {
            config.fetch_workers = workers;
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(follow) = switch(self.include_updates, self.no_include_updates) {
            config.follow_updates = follow;
        }
        if let Some(follow) = switch(self.include_obsoletes, self.no_include_obsoletes) {
            config.follow_obsoletes = follow;
        }
        if let Some(follow) = switch(self.include_see_also, self.no_include_see_also) {
            config.follow_see_also = follow;
        }
        if let Some(skip) = switch(self.skip_empty, self.no_skip_empty) {
            config.skip_empty_volumes = skip;
        }
    }

    fn criteria(&self, config: &BuildConfig, ids: &[String]) -> Result<SelectionCriteria> {
        let ids = ids
            .iter()
            .map(|raw| DocId::parse_user_input(raw))
            .collect::<rfcbook::Result<Vec<_>>>()?;
        Ok(config
            .criteria_builder()
            .ids(ids)
            .include_all(self.all)
            .build())
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_plan(planned: &IndexPlan) {
    for volume in &planned.plan {
        let ids: Vec<&str> = volume.ids().map(DocId::as_str).collect();
        println!(
            "volume {}: {} pages, {}",
            volume.number(),
            volume.total_pages(),
            ids.join(" ")
        );
    }
    if !planned.unplanned.is_empty() {
        let ids: Vec<&str> = planned.unplanned.iter().map(DocId::as_str).collect();
        println!("no page count in index: {}", ids.join(" "));
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let Some((prefix, ids)) = args.positional.split_last() else {
        bail!("missing output file prefix");
    };
    let prefix = PathBuf::from(prefix);
    let config = args.build_config()?;
    let mut criteria = args.criteria(&config, ids)?;
    criteria.keywords.clone_from(&args.keyword);
    let options = config.build_options(criteria);

    info!(
        "rfcbook v{} writing volumes to {}-N.pdf",
        rfcbook::RFCBOOK_VERSION,
        prefix.display()
    );
    let index = config.load_index().context("loading RFC index")?;

    if args.dry_run {
        let selected = select(&index, &options.criteria);
        let planned = plan_from_index(&index, &selected, options.max_pages)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&planned)?);
        } else {
            print_plan(&planned);
        }
        return Ok(());
    }

    let source = config.document_source()?;
    let mut writer = config.volume_writer(&prefix);
    let report = build_volumes(&index, &options, &source, &mut writer)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    for volume in &report.volumes {
        println!(
            "{} ({} documents, {} pages)",
            volume.path.display(),
            volume.documents.len(),
            volume.pages
        );
    }
    for skipped in &report.skipped {
        println!("skipped {}: {}", skipped.id, skipped.reason);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(flags: &[&str]) -> Args {
        let mut argv = vec!["rfcbook"];
        argv.extend_from_slice(flags);
        argv.extend_from_slice(&["791", "out/ip"]);
        Args::try_parse_from(argv).expect("args")
    }

    fn overlaid(mut config: BuildConfig, args: &Args) -> BuildConfig {
        args.overlay(&mut config);
        config
    }

    fn configured() -> BuildConfig {
        BuildConfig {
            follow_updates: true,
            follow_see_also: true,
            skip_empty_volumes: true,
            ..BuildConfig::default()
        }
    }

    #[test]
    fn config_flags_apply_when_not_given() {
        let config = overlaid(configured(), &parse(&[]));
        assert!(config.follow_updates);
        assert!(config.follow_see_also);
        assert!(!config.follow_obsoletes);
        assert!(config.skip_empty_volumes);
    }

    #[test]
    fn command_line_switches_off_configured_flags() {
        let args = parse(&[
            "--no-include-updates",
            "--include-obsoletes",
            "--no-skip-empty",
        ]);
        let config = overlaid(configured(), &args);
        assert!(!config.follow_updates);
        assert!(config.follow_obsoletes);
        assert!(config.follow_see_also);
        assert!(!config.skip_empty_volumes);

        let criteria = args
            .criteria(&config, &["791".to_string()])
            .expect("criteria");
        assert!(!criteria.relations.follow_updates);
        assert!(criteria.relations.follow_obsoletes);
        assert!(criteria.relations.follow_see_also);
        assert_eq!(criteria.ids, vec![DocId::new("RFC0791")]);
    }

    #[test]
    fn last_relation_switch_wins() {
        let args = parse(&[
            "--include-updates",
            "--no-include-updates",
            "--no-include-obsoletes",
            "--include-obsoletes",
        ]);
        let config = overlaid(BuildConfig::default(), &args);
        assert!(!config.follow_updates);
        assert!(config.follow_obsoletes);
    }
}
