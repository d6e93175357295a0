use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chatdock::widget::{
    Event, EventHandler, HostPlugins, Silent, TerminalBell, WidgetController, WidgetEnv,
};
use chatdock::WidgetConfig;
use clap::Parser;
use tokio::sync::mpsc::unbounded_channel;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod demo;

use demo::bot;
use demo::host::DemoHost;
use demo::quick_replies::{QuickRepliesInput, QuickRepliesMessage, QuickReplyOptions};
use demo::terminal::{self, TerminalTitle};

#[derive(Parser)]
#[command(name = "chatdock")]
#[command(author, version, about = "chatdock - terminal chat widget demo", long_about = None)]
struct Cli {
    /// Widget config file (default: platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Terminal title captured as the original title
    #[arg(long, default_value = "chatdock demo")]
    title: String,

    /// Simulated disconnects that still reconnect
    #[arg(long, default_value = "2")]
    max_reconnects: u32,

    /// Never ring the terminal bell
    #[arg(long)]
    mute: bool,
}

fn init_logging(cli: &Cli) -> Result<()> {
    // stderr belongs to the terminal UI, so logs only go to a file
    let Some(path) = &cli.log_file else {
        return Ok(());
    };

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = if cli.verbose {
        "chatdock=debug"
    } else {
        "chatdock=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<WidgetConfig> {
    match &cli.config {
        Some(path) => WidgetConfig::load_from(path),
        None => WidgetConfig::load(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = load_config(&cli)?;
    tracing::info!(active = config.active, "Starting chatdock demo");

    let mut tui = terminal::setup()?;
    terminal::install_panic_hook();

    let result = run(&cli, config, &mut tui).await;
    terminal::restore(&mut tui);
    result
}

async fn run(cli: &Cli, config: WidgetConfig, tui: &mut terminal::Tui) -> Result<()> {
    let (tx, mut rx) = unbounded_channel();
    let options = QuickReplyOptions::default();
    let mut host = DemoHost::new(config, cli.max_reconnects, options.clone(), tx.clone());

    let title = Arc::new(TerminalTitle::new(cli.title.clone()));
    let env = WidgetEnv {
        actions: Box::new(host.actions()),
        title_sink: title.clone(),
        sound: if cli.mute {
            Box::new(Silent)
        } else {
            Box::new(TerminalBell)
        },
    };
    let plugins = HostPlugins::new()
        .with_message_plugin(QuickRepliesMessage)
        .with_input_plugin(QuickRepliesInput::new(options));

    let mut widget = WidgetController::mount(host.props(), plugins, env);
    bot::connect(&tx, std::time::Duration::from_millis(500));

    let events = EventHandler::default();
    loop {
        if let Some(pending) = title.take_pending() {
            terminal::apply_title(tui, &pending)?;
        }

        tui.draw(|frame| frame.render_widget(widget.view(), frame.area()))
            .context("Failed to draw widget")?;

        // polling blocks for up to one tick; keep the runtime's other
        // workers free for the bot and the title timer
        match tokio::task::block_in_place(|| events.next())? {
            Event::Key(key) => {
                if !host.handle_key(key) {
                    widget.handle_key(key);
                }
            }
            Event::Resize(..) | Event::Tick => {}
        }

        if host.should_quit() {
            break;
        }

        while let Ok(event) = rx.try_recv() {
            host.apply(event);
        }
        widget.update(host.props());
    }

    widget.unmount();
    Ok(())
}

