use chat_sync::Intent;

pub const HELP_TEXT: &str = "Commands: /name <name>, /clear, /help, /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Name(String),
    Clear,
    Quit,
    Unknown(String),
}

pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };

    let parsed = match command {
        "/help" => SlashCommand::Help,
        "/name" => SlashCommand::Name(rest.to_string()),
        "/clear" => SlashCommand::Clear,
        "/quit" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(command.to_string()),
    };

    Some(parsed)
}

/// What one line of terminal input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction {
    Intent(Intent),
    Notice(String),
}

pub fn interpret_line(line: &str) -> LineAction {
    match parse_slash_command(line) {
        None => LineAction::Intent(Intent::Submit(line.to_string())),
        Some(SlashCommand::Help) => LineAction::Notice(HELP_TEXT.to_string()),
        Some(SlashCommand::Name(name)) => LineAction::Intent(Intent::SetDisplayName(name)),
        Some(SlashCommand::Clear) => LineAction::Intent(Intent::Clear),
        Some(SlashCommand::Quit) => LineAction::Intent(Intent::Quit),
        Some(SlashCommand::Unknown(command)) => {
            LineAction::Notice(format!("Unknown command: {command}. {HELP_TEXT}"))
        }
    }
}
