use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ptt_scraper::analysis::AnalysisInput;
use ptt_scraper::config::Settings;
use ptt_scraper::export::{self, CommentFilter};
use ptt_scraper::fetch::Fetcher;
use ptt_scraper::model::PASTED_SOURCE;
use ptt_scraper::{Post, Reaction};

#[derive(Parser)]
#[command(name = "ptt_scraper", about = "Extract PTT posts and push comments from URLs or pasted text")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// PTT article URL or pasted article text
    input: Option<String>,
    /// Read the input from a file ("-" for stdin)
    #[arg(short, long, conflicts_with = "input")]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one post and print a summary
    Parse {
        #[command(flatten)]
        input: InputArgs,
        /// Print the full post as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract one post and write its comments as CSV
    Export {
        #[command(flatten)]
        input: InputArgs,
        /// Output path (default: ptt_stock_<date>.csv)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Only this reaction type
        #[arg(short, long)]
        reaction: Option<ReactionArg>,
        /// Only users whose id contains this (case-insensitive)
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Print the sentiment-analysis request for a post
    Prompt {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Parse many pasted-text files and print a stats table
    Batch {
        /// Text files to parse
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReactionArg {
    Push,
    Boo,
    Arrow,
}

impl From<ReactionArg> for Reaction {
    fn from(r: ReactionArg) -> Self {
        match r {
            ReactionArg::Push => Reaction::Push,
            ReactionArg::Boo => Reaction::Boo,
            ReactionArg::Arrow => Reaction::Arrow,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;

    let result = match cli.command {
        Commands::Parse { input, json } => {
            let post = load_post(&input, &settings).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&post)?);
            } else {
                print_post(&post);
            }
            Ok(())
        }
        Commands::Export {
            input,
            out,
            reaction,
            user,
        } => {
            let post = load_post(&input, &settings).await?;
            let filter = CommentFilter {
                reaction: reaction.map(Reaction::from),
                user,
            };
            let selected = filter.apply(post.comments());
            let path = out.unwrap_or_else(|| PathBuf::from(export::export_file_name(&post)));
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            export::write_csv(&selected, std::io::BufWriter::new(file))?;
            println!(
                "Wrote {} of {} comments to {}",
                selected.len(),
                post.comments().len(),
                path.display()
            );
            Ok(())
        }
        Commands::Prompt { input } => {
            let post = load_post(&input, &settings).await?;
            let request = AnalysisInput::from_post(&post, &settings.analysis);
            println!("{}", request.prompt());
            Ok(())
        }
        Commands::Batch { files } => {
            let rows = parse_files(&files)?;
            print_batch(&rows);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn load_post(args: &InputArgs, settings: &Settings) -> anyhow::Result<Post> {
    let input = read_input(args)?;
    let fetcher = Fetcher::new(&settings.fetch)?;
    let post = ptt_scraper::extract(&input, |url| async move { fetcher.fetch(&url).await }).await?;
    Ok(post)
}

fn read_input(args: &InputArgs) -> anyhow::Result<String> {
    match (&args.input, &args.file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        (None, Some(path)) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        (None, None) => bail!("Give a URL or text, or --file <PATH>"),
    }
}

fn print_post(post: &Post) {
    let s = post.stats();
    println!("Title:    {}", post.title());
    println!("Author:   {}", post.author());
    println!("Date:     {}", post.date());
    println!("Source:   {}", post.source());
    println!(
        "Comments: {} (推 {} / 噓 {} / → {})",
        s.total, s.push, s.boo, s.arrow
    );
    println!("{}", "-".repeat(72));
    println!("{}", truncate(post.body(), 400));
    println!("{}", "-".repeat(72));

    for c in post.comments() {
        println!(
            "{} {:<14} {:<12} {}",
            c.reaction.symbol(),
            truncate(&c.user, 14),
            c.timestamp,
            c.content
        );
    }
}

struct BatchRow {
    file: String,
    post: Post,
}

fn parse_files(files: &[PathBuf]) -> anyhow::Result<Vec<BatchRow>> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let rows = files
        .par_iter()
        .map(|path| -> anyhow::Result<BatchRow> {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let post = ptt_scraper::extract_text(&raw, PASTED_SOURCE);
            pb.inc(1);
            Ok(BatchRow {
                file: file_label(path),
                post,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>();

    pb.finish_and_clear();
    rows
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_batch(rows: &[BatchRow]) {
    println!(
        "{:>3} | {:<24} | {:<28} | {:<12} | {:>4} | {:>4} | {:>4} | {:>5}",
        "#", "File", "Title", "Author", "推", "噓", "→", "Total"
    );
    println!("{}", "-".repeat(105));

    let mut totals = ptt_scraper::Stats::default();
    for (i, r) in rows.iter().enumerate() {
        let s = r.post.stats();
        totals.push += s.push;
        totals.boo += s.boo;
        totals.arrow += s.arrow;
        totals.total += s.total;
        println!(
            "{:>3} | {:<24} | {:<28} | {:<12} | {:>4} | {:>4} | {:>4} | {:>5}",
            i + 1,
            truncate(&r.file, 24),
            truncate(r.post.title(), 28),
            truncate(r.post.author(), 12),
            s.push,
            s.boo,
            s.arrow,
            s.total
        );
    }

    println!(
        "\n{} posts | 推 {} / 噓 {} / → {} | {} comments",
        rows.len(),
        totals.push,
        totals.boo,
        totals.arrow,
        totals.total
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
