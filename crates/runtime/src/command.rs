//! Chat-style command routing.
//!
//! Commands reach an agent as free text:
//! - `do <action>` / `d <action>` runs an action directly
//! - `reset` resets the agent
//! - anything else is matched against event trigger names; the longest
//!   prefix that names a trigger wins and the rest becomes its parameter

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    DoAction(String),
    Reset,
    Trigger { name: String, param: Option<String> },
    Unknown(String),
}

/// Parses `text`, asking `is_trigger` whether a candidate prefix names a
/// trigger.
pub fn parse_command(text: &str, is_trigger: impl Fn(&str) -> bool) -> Command {
    let text = text.trim();

    for prefix in ["do ", "d "] {
        if let Some(action) = text.strip_prefix(prefix) {
            let action = action.trim();
            if !action.is_empty() {
                return Command::DoAction(action.to_owned());
            }
        }
    }

    if text == "reset" {
        return Command::Reset;
    }

    if is_trigger(text) {
        return Command::Trigger {
            name: text.to_owned(),
            param: None,
        };
    }

    let mut end = text.len();
    while let Some(split) = text[..end].rfind(' ') {
        let name = text[..split].trim_end();
        if !name.is_empty() && is_trigger(name) {
            let param = text[split + 1..].trim();
            return Command::Trigger {
                name: name.to_owned(),
                param: (!param.is_empty()).then(|| param.to_owned()),
            };
        }
        end = split;
    }

    Command::Unknown(text.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triggers(name: &str) -> bool {
        matches!(name, "attack" | "follow" | "attack my target")
    }

    #[test]
    fn direct_actions_and_reset() {
        assert_eq!(parse_command("do melee", triggers), Command::DoAction("melee".into()));
        assert_eq!(parse_command("  d  flee ", triggers), Command::DoAction("flee".into()));
        assert_eq!(parse_command("reset", triggers), Command::Reset);
    }

    #[test]
    fn longest_trigger_prefix_wins() {
        assert_eq!(
            parse_command("attack my target now please", triggers),
            Command::Trigger {
                name: "attack my target".into(),
                param: Some("now please".into()),
            }
        );
        assert_eq!(
            parse_command("attack rat", triggers),
            Command::Trigger {
                name: "attack".into(),
                param: Some("rat".into()),
            }
        );
        assert_eq!(
            parse_command("follow", triggers),
            Command::Trigger {
                name: "follow".into(),
                param: None,
            }
        );
    }

    #[test]
    fn unmatched_text_is_unknown() {
        assert_eq!(parse_command("dance wildly", triggers), Command::Unknown("dance wildly".into()));
        assert_eq!(parse_command("do", triggers), Command::Unknown("do".into()));
    }
}
