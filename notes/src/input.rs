use crate::events::{AppCommand, NoteChange};
use secrecy::SecretString;

pub const HELP: &str = "\
Session:   register <email> <password> | login <email> <password> | logout | refresh | whoami
Navigate:  go <path>
Notes:     notes [query] | shared [query] | show <id> | delete <id>
           new <title> [| markdown [| tag, tag]]
           edit <id> title|content|visibility|tags <value>
Sharing:   share <id> <email> | shares <id> | unshare <shareId>
Links:     publish <id> | links <id> | unlink <linkId> | public <token>
Other:     help | quit";

/// Parse one line of shell input. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<AppCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "register" => {
            let (email, password) = credentials(rest, "register")?;
            AppCommand::Register { email, password }
        }
        "login" => {
            let (email, password) = credentials(rest, "login")?;
            AppCommand::Login { email, password }
        }
        "logout" => AppCommand::Logout,
        "refresh" => AppCommand::Refresh,
        "whoami" => AppCommand::WhoAmI,
        "go" => AppCommand::Go(required(rest, "go <path>")?.to_string()),
        "notes" | "ls" => AppCommand::ListNotes {
            query: optional(rest),
        },
        "shared" => AppCommand::ListShared {
            query: optional(rest),
        },
        "show" => AppCommand::ShowNote(id(rest, "show <id>")?),
        "new" => parse_new(rest)?,
        "edit" => parse_edit(rest)?,
        "delete" | "rm" => AppCommand::DeleteNote(id(rest, "delete <id>")?),
        "share" => {
            let (note_id, email) = two(rest, "share <id> <email>")?;
            AppCommand::Share {
                note_id: parse_id(note_id)?,
                email: email.to_string(),
            }
        }
        "shares" => AppCommand::ListShares(id(rest, "shares <id>")?),
        "unshare" => AppCommand::Unshare(id(rest, "unshare <shareId>")?),
        "publish" => AppCommand::Publish(id(rest, "publish <id>")?),
        "links" => AppCommand::ListLinks(id(rest, "links <id>")?),
        "unlink" => AppCommand::Unlink(id(rest, "unlink <linkId>")?),
        "public" => AppCommand::ViewPublic(required(rest, "public <token>")?.to_string()),
        "help" | "?" => AppCommand::Help,
        "quit" | "exit" | "q" => AppCommand::Quit,
        other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };

    Ok(Some(command))
}

fn credentials(rest: &str, verb: &str) -> Result<(String, SecretString), String> {
    let usage = format!("{} <email> <password>", verb);
    let (email, password) = two(rest, &usage)?;
    Ok((email.to_string(), SecretString::from(password.to_string())))
}

fn parse_new(rest: &str) -> Result<AppCommand, String> {
    let mut parts = rest.splitn(3, '|').map(str::trim);
    let title = parts
        .next()
        .filter(|t| !t.is_empty())
        .ok_or("Usage: new <title> [| markdown [| tag, tag]]")?;
    let content_md = parts.next().unwrap_or_default().replace("\\n", "\n");
    let tags = parts.next().map(parse_tags).unwrap_or_default();

    Ok(AppCommand::CreateNote {
        title: title.to_string(),
        content_md,
        tags,
    })
}

fn parse_edit(rest: &str) -> Result<AppCommand, String> {
    const USAGE: &str = "edit <id> title|content|visibility|tags <value>";

    let mut parts = rest.splitn(3, char::is_whitespace);
    let (Some(id), Some(field)) = (parts.next(), parts.next()) else {
        return Err(format!("Usage: {}", USAGE));
    };
    let value = parts.next().unwrap_or_default().trim();

    let change = match field.to_ascii_lowercase().as_str() {
        "title" => NoteChange::Title(required(value, USAGE)?.to_string()),
        "content" => NoteChange::Content(value.replace("\\n", "\n")),
        "visibility" => NoteChange::Visibility(required(value, USAGE)?.parse()?),
        "tags" => NoteChange::Tags(parse_tags(value)),
        other => return Err(format!("Unknown field '{}'. Usage: {}", other, USAGE)),
    };

    Ok(AppCommand::EditNote {
        id: parse_id(id)?,
        change,
    })
}

/// Comma separated, blanks dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn optional(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_string())
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(rest)
    }
}

fn two<'a>(rest: &'a str, usage: &str) -> Result<(&'a str, &'a str), String> {
    match rest.split_once(char::is_whitespace) {
        Some((first, second)) if !second.trim().is_empty() => Ok((first, second.trim())),
        _ => Err(format!("Usage: {}", usage)),
    }
}

fn id(rest: &str, usage: &str) -> Result<i64, String> {
    parse_id(required(rest, usage)?)
}

fn parse_id(raw: &str) -> Result<i64, String> {
    raw.parse()
        .map_err(|_| format!("'{}' is not a valid id", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_api::endpoints::notes::Visibility;
    use secrecy::ExposeSecret;

    fn parse(line: &str) -> AppCommand {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line_is_ignored() {
        assert!(parse_command("   ").unwrap().is_none());
    }

    #[test]
    fn test_login_keeps_password_secret() {
        match parse("login u@x.com hunter 2") {
            AppCommand::Login { email, password } => {
                assert_eq!(email, "u@x.com");
                assert_eq!(password.expose_secret(), "hunter 2");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse_command("login u@x.com").is_err());
    }

    #[test]
    fn test_new_note_with_content_and_tags() {
        match parse("new Groceries | - milk\\n- eggs | home, ,errands") {
            AppCommand::CreateNote {
                title,
                content_md,
                tags,
            } => {
                assert_eq!(title, "Groceries");
                assert_eq!(content_md, "- milk\n- eggs");
                assert_eq!(tags, vec!["home", "errands"]);
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(
            parse("new Title only"),
            AppCommand::CreateNote { ref content_md, ref tags, .. } if content_md.is_empty() && tags.is_empty()
        ));
        assert!(parse_command("new | body").is_err());
    }

    #[test]
    fn test_edit_fields() {
        assert!(matches!(
            parse("edit 3 visibility public"),
            AppCommand::EditNote { id: 3, change: NoteChange::Visibility(Visibility::Public) }
        ));
        assert!(matches!(
            parse("edit 3 title A new title"),
            AppCommand::EditNote { id: 3, change: NoteChange::Title(ref t) } if t == "A new title"
        ));
        assert!(parse_command("edit 3 visibility everyone").is_err());
        assert!(parse_command("edit 3 colour red").is_err());
        assert!(parse_command("edit x title t").is_err());
    }

    #[test]
    fn test_ids_and_optional_queries() {
        assert!(matches!(parse("show 12"), AppCommand::ShowNote(12)));
        assert!(matches!(parse("notes"), AppCommand::ListNotes { query: None }));
        assert!(matches!(
            parse("shared rust async"),
            AppCommand::ListShared { query: Some(ref q) } if q == "rust async"
        ));
        assert!(matches!(
            parse("share 4 friend@x.com"),
            AppCommand::Share { note_id: 4, ref email } if email == "friend@x.com"
        ));
        assert!(parse_command("show").is_err());
        assert!(parse_command("show twelve").is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse_command("frobnicate").is_err());
        assert!(matches!(parse("QUIT"), AppCommand::Quit));
    }
}
