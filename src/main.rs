use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use roster_audit::config::AuditConfig;
use roster_audit::io::{canonical, chat, mailing_list};
use roster_audit::matching::TracingSink;
use roster_audit::model::Member;
use roster_audit::reconcile;
use roster_audit::{AuditError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;
    let config = AuditConfig::load(cli.config.as_deref())?;
    let output = match cli.command {
        Command::AuditGroup(args) => execute_audit_group(args, &config)?,
        Command::AuditChat(args) => execute_audit_chat(args, &config)?,
        Command::MissingGroup(args) => execute_missing_group(args)?,
        Command::MissingChat(args) => execute_missing_chat(args, &config)?,
        Command::AuditAdmins(args) => execute_audit_admins(args)?,
    };
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init()
        .map_err(|e| AuditError::Logging(e.to_string()))
}

fn execute_audit_group(args: GroupArgs, config: &AuditConfig) -> Result<String> {
    let (canonical, group) = read_canonical_and_group(&args.canonical, &args.group)?;
    let audit = reconcile::audit_group(&canonical, &group, config, &mut TracingSink)?;
    audit.render(
        args.report.committee.as_deref(),
        args.report.csv_list,
        &config.labels,
    )
}

fn execute_audit_chat(args: ChatAuditArgs, config: &AuditConfig) -> Result<String> {
    let (canonical, chat) = read_canonical_and_chat(&args.canonical, &args.chat, config)?;
    let audit = reconcile::audit_chat(&canonical, &chat, &mut TracingSink)?;
    tracing::info!(
        inactive = audit.inactive_total,
        "skipped inactive {} members",
        config.labels.chat
    );
    Ok(audit.render(&config.labels))
}

fn execute_missing_group(args: GroupArgs) -> Result<String> {
    let (canonical, group) = read_canonical_and_group(&args.canonical, &args.group)?;
    let missing = reconcile::missing_from_group(&canonical, &group, &mut TracingSink)?;
    reconcile::render_missing(
        &missing,
        args.report.committee.as_deref(),
        args.report.csv_list,
    )
}

fn execute_missing_chat(args: ChatArgs, config: &AuditConfig) -> Result<String> {
    let (canonical, chat) = read_canonical_and_chat(&args.canonical, &args.chat, config)?;
    let missing = reconcile::missing_from_chat(&canonical, &chat, &mut TracingSink)?;
    reconcile::render_missing(
        &missing,
        args.report.committee.as_deref(),
        args.report.csv_list,
    )
}

fn execute_audit_admins(args: AdminArgs) -> Result<String> {
    let admins = canonical::read_members(&args.admins)?;
    let members = canonical::read_members(&args.members)?;
    let missing = reconcile::audit_admins(&admins, &members, &mut TracingSink)?;
    Ok(missing
        .iter()
        .map(|member| member.to_string())
        .collect::<Vec<_>>()
        .join("\n"))
}

fn read_canonical_and_group(
    canonical_path: &Path,
    group_path: &Path,
) -> Result<(Vec<Member>, Vec<Member>)> {
    let canonical = canonical::read_members(canonical_path)?;
    let group = mailing_list::read_members(group_path)?;
    tracing::info!(
        "read {} organizing platform members, {} mailing list members",
        canonical.len(),
        group.len()
    );
    Ok((canonical, group))
}

fn read_canonical_and_chat(
    canonical_path: &Path,
    chat_path: &Path,
    config: &AuditConfig,
) -> Result<(Vec<Member>, Vec<Member>)> {
    let canonical = canonical::read_members(canonical_path)?;
    let chat = chat::read_members(chat_path, config)?;
    tracing::info!(
        "read {} organizing platform members, {} chat members",
        canonical.len(),
        chat.len()
    );
    Ok((canonical, chat))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Reconcile membership rosters across organizing, mailing-list and chat exports."
)]
struct Cli {
    /// Optional TOML configuration overriding domains, aliases, roles and labels.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mailing-list members missing from the organizing platform.
    AuditGroup(GroupArgs),
    /// Active chat members missing from the organizing platform.
    ///
    /// Prints one line per missing member followed by a summary count. The
    /// output is not grouped by committee, so `--csv-list` and `--committee`
    /// are not accepted here.
    AuditChat(ChatAuditArgs),
    /// Organizing platform members missing from the mailing list.
    MissingGroup(GroupArgs),
    /// Organizing platform members without an active chat account.
    MissingChat(ChatArgs),
    /// Admins missing from the organizing platform members export.
    AuditAdmins(AdminArgs),
}

#[derive(clap::Args)]
struct ReportArgs {
    /// Print a single comma-separated list instead of grouped text.
    #[arg(long)]
    csv_list: bool,

    /// Only report members of this committee.
    #[arg(long)]
    committee: Option<String>,
}

#[derive(clap::Args)]
struct GroupArgs {
    /// Organizing platform export.
    canonical: PathBuf,

    /// Mailing-list membership export.
    group: PathBuf,

    #[command(flatten)]
    report: ReportArgs,
}

#[derive(clap::Args)]
struct ChatArgs {
    /// Organizing platform export.
    canonical: PathBuf,

    /// Chat workspace member export.
    chat: PathBuf,

    #[command(flatten)]
    report: ReportArgs,
}

#[derive(clap::Args)]
struct ChatAuditArgs {
    /// Organizing platform export.
    canonical: PathBuf,

    /// Chat workspace member export.
    chat: PathBuf,
}

#[derive(clap::Args)]
struct AdminArgs {
    /// Organizing platform admins export.
    admins: PathBuf,

    /// Organizing platform members export.
    members: PathBuf,
}
