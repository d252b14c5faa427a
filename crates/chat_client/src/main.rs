use std::io::{self, Write};

use chat_client::commands::{interpret_line, LineAction};
use chat_client::config::ClientConfig;
use chat_client::sources;
use chat_client::view::TranscriptView;
use chat_sync::logging::init_logging;
use chat_sync::{ChatSession, ConversationConfig, Intent, TranscriptSnapshot};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    init_logging();

    let client_config = ClientConfig::from_env().map_err(io::Error::other)?;
    let source = sources::source_from_config(&client_config).map_err(io::Error::other)?;
    let profile = source.profile();
    tracing::info!(source = %profile.source_id, "reply source selected");

    let mut session = ChatSession::new(source, ConversationConfig::from_env());
    if let Some(name) = client_config.display_name {
        session.set_display_name(name);
    }

    let banner = match profile.endpoint {
        Some(endpoint) => format!("Reply source: {} ({endpoint})", profile.source_id),
        None => format!("Reply source: {}", profile.source_id),
    };
    print_lines(&[banner, "Type /help for commands.".to_string()])?;

    let mut view = TranscriptView::new();
    print_lines(&view.render(&session.snapshot()))?;

    let (intents_tx, intents_rx) = mpsc::unbounded_channel();
    let updates = session.subscribe();
    let input = tokio::spawn(forward_stdin(intents_tx));

    let outcome = tokio::select! {
        () = session.run(intents_rx) => Ok(()),
        result = follow_updates(updates, &mut view) => result,
    };

    print_lines(&view.render(&session.snapshot()))?;
    input.abort();
    outcome
}

async fn forward_stdin(intents: mpsc::UnboundedSender<Intent>) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match interpret_line(&line) {
            LineAction::Intent(intent) => {
                let quit = intent == Intent::Quit;
                if intents.send(intent).is_err() || quit {
                    break;
                }
            }
            LineAction::Notice(text) => print_lines(&[text])?,
        }
    }

    Ok(())
}

async fn follow_updates(
    mut updates: watch::Receiver<TranscriptSnapshot>,
    view: &mut TranscriptView,
) -> io::Result<()> {
    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow_and_update().clone();
        print_lines(&view.render(&snapshot))?;
    }

    Ok(())
}

fn print_lines(lines: &[String]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    for line in lines {
        writeln!(stdout, "{line}")?;
    }
    stdout.flush()
}
