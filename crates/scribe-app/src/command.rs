use scribe_core::Tone;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A line of typed text, appended to the draft.
    Type(String),
    Replace(String),
    Show,
    Analyze,
    Rewrite(Tone),
    Suggestions,
    Apply(usize),
    Dismiss(usize),
    Save,
    New,
    Notes,
    Open(usize),
    Delete(usize),
    Copy,
    Record,
    Help,
    Quit,
}

pub const HELP: &str = "\
Type text to append it to the draft. Commands:
  :show              print the draft
  :set <text>        replace the draft
  :analyze           check grammar and style
  :rewrite <tone>    rewrite as professional, casual, concise or expanded
  :suggestions       list pending suggestions
  :apply <n>         apply suggestion n
  :dismiss <n>       dismiss suggestion n
  :save              save the draft
  :new               start a new draft
  :notes             list saved notes
  :open <n>          open note n
  :delete <n>        delete note n
  :copy              copy the draft to the clipboard
  :record            toggle speech capture (no recognizer in the terminal,
                     so this only reports that speech is unavailable)
  :quit              exit";

/// Parses one input line. Indexes are 1-based on input and 0-based here.
pub fn parse(line: &str) -> Result<Command, String> {
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Type(line.to_owned()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest.trim(), ""),
    };

    match name {
        "show" => Ok(Command::Show),
        "set" => Ok(Command::Replace(arg.to_owned())),
        "analyze" | "a" => Ok(Command::Analyze),
        "rewrite" | "r" => Tone::parse(arg)
            .map(Command::Rewrite)
            .ok_or_else(|| format!("unknown tone `{arg}`")),
        "suggestions" | "s" => Ok(Command::Suggestions),
        "apply" => index(arg).map(Command::Apply),
        "dismiss" => index(arg).map(Command::Dismiss),
        "save" | "w" => Ok(Command::Save),
        "new" => Ok(Command::New),
        "notes" | "ls" => Ok(Command::Notes),
        "open" => index(arg).map(Command::Open),
        "delete" | "rm" => index(arg).map(Command::Delete),
        "copy" => Ok(Command::Copy),
        "record" | "rec" => Ok(Command::Record),
        "help" | "h" => Ok(Command::Help),
        "quit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command `:{other}`")),
    }
}

fn index(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("expected a number starting at 1, got `{arg}`")),
    }
}
