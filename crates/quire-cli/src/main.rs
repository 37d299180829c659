use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use quire_core::{
    BlockReveal, EditorDocument, EditorRope, HostEffect, LineSource, Modifiers, PROXIMITY_SLACK,
    PlainEditor, PlatformError, PreviewHost, PreviewOptions, Selection, click_at, render_html,
    toggle_task_on_line,
};
use quire_drafts::{DraftStore, OpenDocument, default_drafts_dir};

#[derive(Parser)]
#[command(version, about = "Quire - live-preview markdown decorations", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory drafts are stored in
    #[arg(long, global = true, env = "QUIRE_DRAFTS_DIR")]
    drafts_dir: Option<PathBuf>,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the decorations computed for a file and selection
    Decorate {
        file: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        preview: PreviewArgs,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Click at an offset in the rendered preview and apply the result
    Click {
        file: PathBuf,

        /// Char offset that was clicked
        #[arg(long)]
        at: usize,

        /// Hold ctrl (follows links)
        #[arg(long)]
        ctrl: bool,

        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        preview: PreviewArgs,

        /// Write the result back to the file instead of printing it
        #[arg(long)]
        write: bool,
    },
    /// Flip the task checkbox on a line
    Toggle {
        file: PathBuf,

        /// 1-based line number
        #[arg(long)]
        line: usize,

        /// Write the result back to the file instead of printing it
        #[arg(long)]
        write: bool,
    },
    /// Manage saved drafts
    Drafts {
        #[command(subcommand)]
        command: DraftCommands,
    },
}

#[derive(Subcommand)]
enum DraftCommands {
    /// List saved drafts
    List,
    /// Print a draft's content
    Show { id: String },
    /// Save a file as a draft
    Save {
        id: String,
        file: PathBuf,

        /// Title, defaults to the file name
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Delete a draft
    Delete { id: String },
}

#[derive(Args)]
struct SelectionArgs {
    /// Caret offset (chars)
    #[arg(long, conflicts_with_all = ["anchor", "head"])]
    cursor: Option<usize>,

    /// Selection anchor (chars)
    #[arg(long, requires = "head")]
    anchor: Option<usize>,

    /// Selection head (chars)
    #[arg(long, requires = "anchor")]
    head: Option<usize>,
}

impl SelectionArgs {
    /// Defaults to a caret at the start of the document.
    fn selection(&self, doc_len: usize) -> Result<Selection> {
        let selection = match (self.cursor, self.anchor, self.head) {
            (Some(at), _, _) => Selection::collapsed(at),
            (None, Some(anchor), Some(head)) => Selection::new(anchor, head),
            _ => Selection::default(),
        };
        if selection.end() > doc_len {
            return Err(miette::miette!(
                "selection {}..{} is past the end of the document ({} chars)",
                selection.anchor,
                selection.head,
                doc_len
            ));
        }
        Ok(selection)
    }
}

#[derive(Args)]
struct PreviewArgs {
    /// Chars of slack around a construct within which raw syntax is shown
    #[arg(long, default_value_t = PROXIMITY_SLACK)]
    slack: usize,

    /// Reveal block markers whenever the selection is on the line
    #[arg(long)]
    reveal_line: bool,
}

impl PreviewArgs {
    fn options(&self) -> PreviewOptions {
        PreviewOptions {
            proximity_slack: self.slack,
            block_reveal: if self.reveal_line {
                BlockReveal::Line
            } else {
                BlockReveal::Marker
            },
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Html,
}

/// Links "open" by being printed.
struct PrintHost;

impl PreviewHost for PrintHost {
    fn open_url(&self, url: &str) -> Result<(), PlatformError> {
        println!("open {url}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Decorate {
            file,
            selection,
            preview,
            format,
        } => decorate(&file, &selection, &preview, format).await?,
        Commands::Click {
            file,
            at,
            ctrl,
            selection,
            preview,
            write,
        } => click(&file, at, ctrl, &selection, &preview, write).await?,
        Commands::Toggle { file, line, write } => toggle(&file, line, write).await?,
        Commands::Drafts { command } => {
            let dir = cli.drafts_dir.unwrap_or_else(default_drafts_dir);
            drafts(DraftStore::new(dir), command).await?
        }
    }

    Ok(())
}

async fn read_document(file: &Path) -> Result<EditorRope> {
    let text = tokio::fs::read_to_string(file).await.into_diagnostic()?;
    Ok(EditorRope::from(text))
}

async fn decorate(
    file: &Path,
    selection: &SelectionArgs,
    preview: &PreviewArgs,
    format: Format,
) -> Result<()> {
    let doc = read_document(file).await?;
    let selection = selection.selection(doc.doc_len())?;
    let editor = PlainEditor::with_selection(doc, selection);
    let decorations = editor.decorations(&preview.options());

    match format {
        Format::Text => {
            for decoration in &decorations {
                match editor.slice(decoration.range()) {
                    Some(source) if !source.is_empty() => println!("{decoration}\t{source:?}"),
                    _ => println!("{decoration}"),
                }
            }
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(&decorations).into_diagnostic()?;
            println!("{json}");
        }
        Format::Html => {
            let html = render_html(editor.buffer(), &decorations).into_diagnostic()?;
            print!("{html}");
        }
    }
    Ok(())
}

async fn click(
    file: &Path,
    at: usize,
    ctrl: bool,
    selection: &SelectionArgs,
    preview: &PreviewArgs,
    write: bool,
) -> Result<()> {
    let doc = read_document(file).await?;
    let selection = selection.selection(doc.doc_len())?;
    let mut editor = PlainEditor::with_selection(doc, selection);
    let decorations = editor.decorations(&preview.options());

    let modifiers = Modifiers {
        ctrl,
        ..Modifiers::NONE
    };
    let Some(effect) = click_at(&decorations, at, modifiers) else {
        eprintln!("nothing clickable at {at}");
        return Ok(());
    };
    editor.apply_effect(&effect, &PrintHost)?;
    if matches!(effect, HostEffect::ReplaceText { .. }) {
        output(file, &editor.content_string(), write).await?;
    }
    Ok(())
}

async fn toggle(file: &Path, line: usize, write: bool) -> Result<()> {
    let doc = read_document(file).await?;
    let effect = doc
        .line(line)
        .ok_or_else(|| miette::miette!("{} has no line {line}", file.display()))
        .and_then(|l| {
            toggle_task_on_line(&l)
                .ok_or_else(|| miette::miette!("line {line} is not a task item"))
        })?;

    let mut editor = PlainEditor::new(doc);
    editor.apply_effect(&effect, &())?;
    output(file, &editor.content_string(), write).await
}

async fn output(file: &Path, content: &str, write: bool) -> Result<()> {
    if write {
        tokio::fs::write(file, content).await.into_diagnostic()?;
        tracing::info!(file = %file.display(), "updated");
    } else {
        print!("{content}");
    }
    Ok(())
}

async fn drafts(store: DraftStore, command: DraftCommands) -> Result<()> {
    match command {
        DraftCommands::List => {
            for draft in store.load_all().await? {
                println!(
                    "{}\t{}\t{}",
                    draft.id,
                    draft.updated_at.to_rfc3339(),
                    draft.title
                );
            }
        }
        DraftCommands::Show { id } => {
            let draft = store
                .load(&id)
                .await?
                .ok_or_else(|| miette::miette!("no draft with id {id}"))?;
            print!("{}", draft.content);
        }
        DraftCommands::Save {
            id,
            file,
            title,
            selection,
        } => {
            let content = tokio::fs::read_to_string(&file).await.into_diagnostic()?;
            let selection = selection.selection(content.chars().count())?;
            let title = title.unwrap_or_else(|| {
                file.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| id.clone())
            });
            let draft = store
                .save(&OpenDocument {
                    id,
                    title,
                    content,
                    selection,
                })
                .await?;
            println!("saved {}", store.draft_path(&draft.id).display());
        }
        DraftCommands::Delete { id } => store.delete(&id).await?,
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
