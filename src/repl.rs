//! Line-mode chat for terminals where the full-screen UI is unwanted.
//!
//! Shares the same [`Session`] as the TUI, so suggestions and reasoning
//! traces behave identically: `#2` sends the second tag of the latest
//! reply and `:thought` flips its trace.

use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::client::{AssistantClient, HttpAssistantClient};
use crate::config::Config;
use crate::core::session::Session;
use crate::core::store::{Message, Role};
use crate::core::turn::TurnResolution;
use crate::logging;
use crate::palette;

const PROMPT: &str = "질문: ";

/// One parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Quit,
    Skip,
    ToggleThought,
    /// 1-based tag number on the latest assistant reply.
    Tag(usize),
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplOutcome {
    Quit,
    Nothing,
    Replied(TurnResolution),
    Thought { open: bool },
    Notice(String),
}

#[must_use]
pub fn parse_line(line: &str) -> ReplInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplInput::Skip;
    }
    match trimmed {
        "q" | "quit" | "exit" | ":q" => return ReplInput::Quit,
        ":thought" | ":t" => return ReplInput::ToggleThought,
        _ => {}
    }
    // `\#...` sends the text with a literal leading '#'.
    if let Some(literal) = trimmed.strip_prefix("\\#") {
        return ReplInput::Message(format!("#{literal}"));
    }
    if let Some(number) = trimmed.strip_prefix('#')
        && let Ok(n) = number.trim().parse::<usize>()
    {
        return ReplInput::Tag(n);
    }
    ReplInput::Message(line.to_string())
}

/// Apply one input to the session, performing the assistant call if needed.
pub async fn handle_input(
    session: &mut Session,
    input: ReplInput,
    client: &dyn AssistantClient,
) -> ReplOutcome {
    match input {
        ReplInput::Quit => ReplOutcome::Quit,
        ReplInput::Skip => ReplOutcome::Nothing,
        ReplInput::Message(text) => match session.submit(&text, client).await {
            Some(resolution) => ReplOutcome::Replied(resolution),
            None => ReplOutcome::Nothing,
        },
        ReplInput::Tag(number) => {
            let Some((id, _)) = session.store().last_assistant() else {
                return ReplOutcome::Notice("No reply to pick a tag from".to_string());
            };
            let Some(index) = number.checked_sub(1) else {
                return ReplOutcome::Notice("Tags are numbered from 1".to_string());
            };
            match session.submit_tag(id, index, client).await {
                Some(resolution) => ReplOutcome::Replied(resolution),
                None => ReplOutcome::Notice(format!("No tag #{number} on the latest reply")),
            }
        }
        ReplInput::ToggleThought => {
            let Some((id, _)) = session.store().last_assistant() else {
                return ReplOutcome::Notice("No reply yet".to_string());
            };
            if session.toggle_disclosure(id) {
                ReplOutcome::Thought {
                    open: session.is_disclosure_open(id),
                }
            } else {
                ReplOutcome::Notice("The latest reply has no reasoning trace".to_string())
            }
        }
    }
}

/// Numbered tag list, e.g. `#1 콘크리트  #2 흙손`.
#[must_use]
pub fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .enumerate()
        .map(|(i, tag)| format!("#{} {tag}", i + 1))
        .collect::<Vec<_>>()
        .join("  ")
}

fn print_assistant(assistant_name: &str, message: &Message, thought_open: bool) {
    let (r, g, b) = palette::BRAND_BLUE_RGB;
    println!("{}", assistant_name.truecolor(r, g, b).bold());
    for line in message.content().lines() {
        println!("  {line}");
    }
    if let Some(thought) = message.thought() {
        if thought_open {
            for line in thought.lines() {
                println!("  {} {}", "│".dimmed(), line.italic().dimmed());
            }
        } else {
            println!("  {}", "(:thought 로 AI 사고 과정 보기)".dimmed());
        }
    }
    let tags = message.related_tags();
    if !tags.is_empty() {
        let (r, g, b) = palette::BRAND_SKY_RGB;
        println!("  {}", format_tags(tags).truecolor(r, g, b));
    }
    println!();
}

fn print_latest(session: &Session, assistant_name: &str) {
    if let Some((id, message)) = session.store().last_assistant() {
        print_assistant(assistant_name, message, session.is_disclosure_open(id));
    }
}

pub async fn run_repl(config: &Config) -> Result<()> {
    let client = HttpAssistantClient::new(config)?;
    let assistant_name = config.assistant_name().to_string();
    let mut session = Session::new();
    let mut rl = DefaultEditor::new()?;

    let (r, g, b) = palette::BRAND_SKY_RGB;
    println!(
        "{}",
        format!("sales-chat v{}", env!("CARGO_PKG_VERSION"))
            .truecolor(r, g, b)
            .bold()
    );
    println!(
        "{}",
        "Type 'quit' to exit, '#n' to send a tag, '\\#' for a literal '#'.".dimmed()
    );
    println!();
    print_latest(&session, &assistant_name);

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => {
                logging::warn(format!("Readline error: {err}"));
                break;
            }
        };

        let input = parse_line(&line);
        if matches!(input, ReplInput::Message(_) | ReplInput::Tag(_)) {
            let _ = rl.add_history_entry(line.as_str());
            eprintln!("{}", "생각 중...".dimmed());
        }

        match handle_input(&mut session, input, &client).await {
            ReplOutcome::Quit => break,
            ReplOutcome::Nothing => {}
            ReplOutcome::Replied(resolution) => {
                if resolution == TurnResolution::Fallback {
                    let (r, g, b) = palette::BRAND_RED_RGB;
                    eprintln!("{}", "Request failed; see the log for details".truecolor(r, g, b));
                }
                if let Some(last) = session.entries().last()
                    && last.role() == Role::Assistant
                {
                    print_latest(&session, &assistant_name);
                }
            }
            ReplOutcome::Thought { .. } => print_latest(&session, &assistant_name),
            ReplOutcome::Notice(text) => {
                let (r, g, b) = palette::BRAND_AMBER_RGB;
                println!("{}", text.truecolor(r, g, b));
            }
        }
    }

    println!("{}", "Goodbye!".dimmed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::core::session::FALLBACK_MESSAGE;
    use crate::models::AssistantReply;
    use crate::test_support::ScriptedClient;
    use pretty_assertions::assert_eq;

    fn reply_with_tags(answer: &str, tags: &[&str]) -> AssistantReply {
        AssistantReply {
            answer: answer.to_string(),
            thought: Some("checked stock".to_string()),
            related_tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_line("   "), ReplInput::Skip);
        assert_eq!(parse_line("quit"), ReplInput::Quit);
        assert_eq!(parse_line(" exit "), ReplInput::Quit);
        assert_eq!(parse_line("#2"), ReplInput::Tag(2));
        assert_eq!(parse_line(":thought"), ReplInput::ToggleThought);
        assert_eq!(parse_line("\\#2"), ReplInput::Message("#2".to_string()));
        assert_eq!(
            parse_line(" \\#2 번 모델 재고 "),
            ReplInput::Message("#2 번 모델 재고".to_string())
        );
        assert_eq!(
            parse_line("#태그 아님"),
            ReplInput::Message("#태그 아님".to_string())
        );
        assert_eq!(
            parse_line("  시멘트 단가  "),
            ReplInput::Message("  시멘트 단가  ".to_string())
        );
    }

    #[test]
    fn formats_numbered_tags() {
        let tags = vec!["콘크리트".to_string(), "흙손".to_string()];
        assert_eq!(format_tags(&tags), "#1 콘크리트  #2 흙손");
        assert_eq!(format_tags(&[]), "");
    }

    #[tokio::test]
    async fn tag_number_sends_tag_text() {
        let client = ScriptedClient::new(vec![
            Ok(reply_with_tags("first", &["시멘트", "모래"])),
            Ok(AssistantReply::answer_only("second")),
        ]);
        let mut session = Session::new();

        let outcome = handle_input(
            &mut session,
            ReplInput::Message("자재 추천".to_string()),
            &client,
        )
        .await;
        assert_eq!(outcome, ReplOutcome::Replied(TurnResolution::Answered));

        let outcome = handle_input(&mut session, ReplInput::Tag(2), &client).await;
        assert_eq!(outcome, ReplOutcome::Replied(TurnResolution::Answered));
        assert_eq!(client.sent(), vec!["자재 추천".to_string(), "모래".to_string()]);
        assert_eq!(session.entries().len(), 5);
    }

    #[tokio::test]
    async fn out_of_range_tag_is_a_notice() {
        let client = ScriptedClient::new(vec![Ok(reply_with_tags("first", &["시멘트"]))]);
        let mut session = Session::new();
        handle_input(&mut session, ReplInput::Message("hi".to_string()), &client).await;

        for number in [0, 2] {
            let outcome = handle_input(&mut session, ReplInput::Tag(number), &client).await;
            assert!(matches!(outcome, ReplOutcome::Notice(_)));
        }
        assert_eq!(client.sent().len(), 1);
        assert_eq!(session.entries().len(), 3);
    }

    #[tokio::test]
    async fn thought_toggles_latest_reply() {
        let client = ScriptedClient::new(vec![Ok(reply_with_tags("first", &[]))]);
        let mut session = Session::new();

        // Greeting carries no trace.
        let outcome = handle_input(&mut session, ReplInput::ToggleThought, &client).await;
        assert!(matches!(outcome, ReplOutcome::Notice(_)));

        handle_input(&mut session, ReplInput::Message("hi".to_string()), &client).await;
        let outcome = handle_input(&mut session, ReplInput::ToggleThought, &client).await;
        assert_eq!(outcome, ReplOutcome::Thought { open: true });
        let outcome = handle_input(&mut session, ReplInput::ToggleThought, &client).await;
        assert_eq!(outcome, ReplOutcome::Thought { open: false });
    }

    #[tokio::test]
    async fn failed_call_reports_fallback() {
        let client = ScriptedClient::new(vec![Err(ClientError::Network("refused".to_string()))]);
        let mut session = Session::new();

        let outcome =
            handle_input(&mut session, ReplInput::Message("hi".to_string()), &client).await;
        assert_eq!(outcome, ReplOutcome::Replied(TurnResolution::Fallback));
        assert_eq!(
            session.entries().last().map(Message::content),
            Some(FALLBACK_MESSAGE)
        );
    }
}
