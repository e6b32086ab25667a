mod annotations;
mod cache;
mod config;
mod domain;
mod editor;
mod render;
mod session;
mod share;

use std::path::PathBuf;

use anyhow::{Context, bail};
use tokio::sync::mpsc;

use crate::cache::store::AssetCache;
use crate::config::MosaicConfig;
use crate::editor::{Editor, RedactPlan};
use crate::session::messages::Msg;
use crate::session::rendezvous::Rendezvous;
use crate::share::{FormField, Method, ShareRequest, ShareResponse};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Install the current asset cache version and purge stale ones, so
    // startup always leaves exactly one version on disk.
    let assets = AssetCache::new()?;
    assets.install()?;
    assets.activate()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("help") | Some("--help") => print_help(&assets),
        Some("share") => share_intake(&args[1..]),
        Some(_) => redact(&args),
    }
}

fn print_help(assets: &AssetCache) -> anyhow::Result<()> {
    // Requests pass through the share intercept first, then are served
    // cache-first, the same order the intake contract uses.
    let request = ShareRequest {
        method: Method::Get,
        path: "/help.txt".to_string(),
        query: None,
        form: Vec::new(),
    };
    let help = match share::respond(&request) {
        ShareResponse::NotHandled => assets.fetch(&request.path)?,
        ShareResponse::Redirect(location) => bail!("help request redirected to {}", location),
    };
    print!("{}", String::from_utf8_lossy(&help));
    Ok(())
}

struct CliArgs {
    input: PathBuf,
    plan: PathBuf,
    output: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let mut input: Option<PathBuf> = None;
    let mut plan: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--plan" => {
                plan = Some(PathBuf::from(
                    iter.next().context("--plan needs a file argument")?,
                ));
            }
            "--output" | "-o" => {
                output = Some(PathBuf::from(
                    iter.next().context("--output needs a file argument")?,
                ));
            }
            other if other.starts_with('-') => bail!("unknown option {}", other),
            other => {
                if input.replace(PathBuf::from(other)).is_some() {
                    bail!("more than one input image given");
                }
            }
        }
    }

    Ok(CliArgs {
        input: input.context("no input image given, see `mosaic help`")?,
        plan: plan.context("no redaction plan given, see `mosaic help`")?,
        output,
    })
}

fn apply_and_save(mut editor: Editor, args: &CliArgs) -> anyhow::Result<()> {
    let plan = RedactPlan::load(&args.plan)?;
    editor.apply_plan(&plan);
    editor.render();

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| editor.default_output_path());
    editor.save(&output)?;
    log::info!("Saved redacted image to {}", output.display());
    println!("{}", output.display());
    Ok(())
}

fn redact(args: &[String]) -> anyhow::Result<()> {
    let args = parse_args(args)?;
    let config = MosaicConfig::load();
    let editor = Editor::open(&args.input, config)?;
    apply_and_save(editor, &args)
}

/// Receive an image through the share intake, then redact it.
///
/// The image travels the full share-target path: the submission is
/// redirected, the relay parks until the session signals ready, and the
/// file arrives as a session message.
fn share_intake(args: &[String]) -> anyhow::Result<()> {
    let args = parse_args(args)?;

    let filename = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    let data = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let request = ShareRequest {
        method: Method::Post,
        path: "/".to_string(),
        query: Some(share::SHARE_QUERY.to_string()),
        form: vec![FormField {
            name: share::FILE_FIELD.to_string(),
            filename,
            data,
        }],
    };

    match share::respond(&request) {
        ShareResponse::Redirect(location) => {
            log::debug!("Share submission redirected to {}", location);
        }
        ShareResponse::NotHandled => bail!("share submission was not intercepted"),
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start the intake runtime")?;
    let msg = runtime.block_on(async {
        let rendezvous = Rendezvous::new();
        let (tx, mut rx) = mpsc::channel(1);

        let relay = share::relay_share(request, &rendezvous, &tx);
        // Batch mode is ready to receive as soon as the relay is parked
        let (relayed, _) = tokio::join!(relay, async {
            rendezvous.signal(share::READY_SIGNAL);
        });
        relayed?;

        rx.recv().await.context("no shared file delivered")
    })?;

    let Msg::LoadImage { name, bytes } = msg;
    let config = MosaicConfig::load();
    let editor = Editor::from_bytes(&name, &bytes, config)?;
    apply_and_save(editor, &args)
}
