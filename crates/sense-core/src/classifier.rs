//! Intent classification.
//!
//! Classification walks [`RULES`] in order and the first rule that produces
//! an intent wins. Categories share vocabulary ("create" names both a file
//! operation and code generation), so the order is part of the contract:
//! specific patterns sit above the broad verb checks they would otherwise
//! lose to.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::code::extract_fenced_code;
use crate::intent::{Intent, RequestContext};
use crate::templates::asks_for_explanation;

/// "it", "that" or "this" as the last word, ignoring closing punctuation.
static TRAILING_PRONOUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:it|that|this)[\s.!?]*$").expect("valid pronoun regex")
});

static TERMINAL_QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:run|execute|perform)\b[^`]*`([^`]+)`").expect("valid terminal regex")
});

static TERMINAL_IMPERATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^(?:run|execute|perform)\s+(.+)$").expect("valid terminal regex")
});

static GIT_COMMIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\b(?:git\s+)?commit\b.*?(?:'([^']*)'|"([^"]*)"|`([^`]*)`)"#)
        .expect("valid commit regex")
});

static CREATE_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(?:create|make|add)\s+(?:(?:a|an|the)\s+)?(?:new\s+)?file\s+(?:(?:called|named)\s+)?['"`]?([\w.\-]+)['"`]?"#,
    )
    .expect("valid create file regex")
});

static DELETE_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(?:delete|remove)\s+(?:(?:a|an|the)\s+)?file\s+(?:(?:called|named)\s+)?['"`]?([\w.\-]+)['"`]?"#,
    )
    .expect("valid delete file regex")
});

static INSERTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^(?:add|insert)\s+(?:(?:a|an|some)\s+)?(.+)$").expect("valid insertion regex")
});

/// Verbs that turn a message about the selection into a refactor.
const REFACTOR_VERBS: &[&str] = &["refactor", "edit", "change", "replace", "rewrite"];

/// A message under classification with its precomputed forms.
pub struct Probe<'a> {
    /// The message exactly as received.
    pub message: &'a str,
    /// Trimmed message.
    pub trimmed: &'a str,
    /// Trimmed, lowercased message.
    pub lower: String,
    pub context: &'a RequestContext<'a>,
}

impl<'a> Probe<'a> {
    fn new(message: &'a str, context: &'a RequestContext<'a>) -> Self {
        let trimmed = message.trim();
        Self {
            message,
            trimmed,
            lower: trimmed.to_lowercase(),
            context,
        }
    }
}

/// One step of the classification order.
pub struct Rule {
    /// Name used in logs and tests.
    pub name: &'static str,
    apply: fn(&Probe<'_>) -> Option<Intent>,
}

impl Rule {
    const fn new(name: &'static str, apply: fn(&Probe<'_>) -> Option<Intent>) -> Self {
        Self { name, apply }
    }

    pub fn apply(&self, probe: &Probe<'_>) -> Option<Intent> {
        (self.apply)(probe)
    }
}

/// Classification rules in priority order. Anything left over is chat.
pub static RULES: &[Rule] = &[
    Rule::new("follow-up", follow_up),
    Rule::new("terminal", terminal_command),
    Rule::new("git-status", git_status),
    Rule::new("git-commit", git_commit),
    Rule::new("git-push", git_push),
    Rule::new("create-file", create_file),
    Rule::new("delete-file", delete_file),
    Rule::new("selection-refactor", selection_refactor),
    Rule::new("selection-explain", selection_explain),
    Rule::new("file-edit", file_edit),
    Rule::new("insertion", insertion),
    Rule::new("generation", generation),
];

/// Rule name reported when no rule matched.
pub const FALLBACK_RULE: &str = "chat";

/// Classify a message. Always returns an intent; chat is the fallback.
pub fn classify(message: &str, context: &RequestContext<'_>) -> Intent {
    classify_with_rule(message, context).0
}

/// Classify a message and report the name of the rule that decided it.
pub fn classify_with_rule(message: &str, context: &RequestContext<'_>) -> (Intent, &'static str) {
    let probe = Probe::new(message, context);

    let (intent, rule) = RULES
        .iter()
        .find_map(|rule| rule.apply(&probe).map(|intent| (intent, rule.name)))
        .unwrap_or_else(|| {
            (
                Intent::Chat {
                    message: message.to_string(),
                },
                FALLBACK_RULE,
            )
        });

    debug!(rule, intent = intent.kind(), "Classified message");
    (intent, rule)
}

fn follow_up(probe: &Probe<'_>) -> Option<Intent> {
    let last = probe.context.history?.last()?;
    if !last.is_assistant() || !TRAILING_PRONOUN.is_match(probe.trimmed) {
        return None;
    }
    // Questions about the code are answered by the explain rules instead.
    if asks_for_explanation(&probe.lower) {
        return None;
    }
    let code = extract_fenced_code(&last.content)?;
    Some(Intent::Refactor {
        instruction: probe.message.to_string(),
        code,
    })
}

fn terminal_command(probe: &Probe<'_>) -> Option<Intent> {
    if let Some(caps) = TERMINAL_QUOTED.captures(probe.trimmed) {
        return Some(Intent::RunInTerminal {
            command: caps[1].to_string(),
        });
    }

    let caps = TERMINAL_IMPERATIVE.captures(probe.trimmed)?;
    let rest = caps[1].trim();
    if rest.to_lowercase().starts_with("git") {
        return None;
    }
    Some(Intent::RunInTerminal {
        command: rest.to_string(),
    })
}

fn git_status(probe: &Probe<'_>) -> Option<Intent> {
    probe.lower.contains("status").then_some(Intent::GitStatus)
}

fn git_commit(probe: &Probe<'_>) -> Option<Intent> {
    let caps = GIT_COMMIT.captures(probe.trimmed)?;
    let message = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    Some(Intent::GitCommit {
        message: message.as_str().to_string(),
    })
}

fn git_push(probe: &Probe<'_>) -> Option<Intent> {
    probe.lower.contains("push").then_some(Intent::GitPush)
}

fn create_file(probe: &Probe<'_>) -> Option<Intent> {
    let caps = CREATE_FILE.captures(probe.trimmed)?;
    Some(Intent::CreateFile {
        filename: caps[1].to_string(),
    })
}

fn delete_file(probe: &Probe<'_>) -> Option<Intent> {
    let caps = DELETE_FILE.captures(probe.trimmed)?;
    Some(Intent::DeleteFile {
        filename: caps[1].to_string(),
    })
}

fn selection_refactor(probe: &Probe<'_>) -> Option<Intent> {
    let selection = probe.context.selection()?;
    REFACTOR_VERBS
        .iter()
        .any(|verb| probe.lower.starts_with(verb))
        .then(|| Intent::Refactor {
            instruction: probe.message.to_string(),
            code: selection.to_string(),
        })
}

fn selection_explain(probe: &Probe<'_>) -> Option<Intent> {
    let selection = probe.context.selection()?;
    probe.lower.starts_with("explain").then(|| Intent::Explain {
        code: selection.to_string(),
    })
}

fn file_edit(probe: &Probe<'_>) -> Option<Intent> {
    probe.lower.contains("this file").then(|| Intent::EditFile {
        instruction: probe.message.to_string(),
        file_content: probe.context.file_content.unwrap_or_default().to_string(),
    })
}

fn insertion(probe: &Probe<'_>) -> Option<Intent> {
    if probe.context.selection().is_some() {
        return None;
    }
    let caps = INSERTION.captures(probe.trimmed)?;
    Some(Intent::InsertCode {
        description: caps[1].trim().to_string(),
    })
}

fn generation(probe: &Probe<'_>) -> Option<Intent> {
    (probe.lower.starts_with("generate") || probe.lower.starts_with("create")).then(|| {
        Intent::Generate {
            description: probe.message.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ConversationMessage, History};

    fn chat(message: &str) -> Intent {
        Intent::Chat {
            message: message.to_string(),
        }
    }

    fn code_history() -> History {
        History::from_messages(
            20,
            vec![
                ConversationMessage::user("generate a function"),
                ConversationMessage::assistant("Here:\n```\nfunction f(){}\n```"),
            ],
        )
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<_> = RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(
            names,
            vec![
                "follow-up",
                "terminal",
                "git-status",
                "git-commit",
                "git-push",
                "create-file",
                "delete-file",
                "selection-refactor",
                "selection-explain",
                "file-edit",
                "insertion",
                "generation",
            ]
        );
    }

    #[test]
    fn test_chat_fallback() {
        let context = RequestContext::new();
        for message in ["hello there", "what is a promise?", "tell me about loops", ""] {
            assert_eq!(classify(message, &context), chat(message));
        }
    }

    #[test]
    fn test_explain_needs_selection() {
        let context = RequestContext::new().with_selection("function foo(){}");
        assert_eq!(
            classify("explain this", &context),
            Intent::Explain {
                code: "function foo(){}".to_string()
            }
        );

        let context = RequestContext::new();
        assert_eq!(classify("explain this code", &context), chat("explain this code"));
    }

    #[test]
    fn test_selection_refactor() {
        let context = RequestContext::new().with_selection("function bar() {}");
        for message in [
            "refactor this to be an arrow function",
            "Rewrite with comments",
            "change the name",
        ] {
            assert_eq!(
                classify(message, &context),
                Intent::Refactor {
                    instruction: message.to_string(),
                    code: "function bar() {}".to_string()
                }
            );
        }
    }

    #[test]
    fn test_blank_selection_does_not_scope() {
        let context = RequestContext::new().with_selection("  ");
        assert_eq!(classify("refactor everything", &context), chat("refactor everything"));
    }

    #[test]
    fn test_create_file_variants() {
        let context = RequestContext::new();
        let expected = Intent::CreateFile {
            filename: "test.js".to_string(),
        };
        for message in [
            "create a new file called test.js",
            "create a new file called 'test.js'",
            "create a new file called \"test.js\"",
            "create a file named `test.js`",
            "add file test.js",
        ] {
            assert_eq!(classify(message, &context), expected, "{message}");
        }

        assert_eq!(
            classify("make file \"index.html\"", &context),
            Intent::CreateFile {
                filename: "index.html".to_string()
            }
        );
    }

    #[test]
    fn test_create_file_wins_over_generation() {
        let (intent, rule) =
            classify_with_rule("create a new file called main.rs", &RequestContext::new());
        assert_eq!(rule, "create-file");
        assert_eq!(
            intent,
            Intent::CreateFile {
                filename: "main.rs".to_string()
            }
        );

        let (intent, rule) =
            classify_with_rule("create a login form component", &RequestContext::new());
        assert_eq!(rule, "generation");
        assert_eq!(
            intent,
            Intent::Generate {
                description: "create a login form component".to_string()
            }
        );
    }

    #[test]
    fn test_delete_file_variants() {
        let context = RequestContext::new();
        assert_eq!(
            classify("delete the file temp.txt", &context),
            Intent::DeleteFile {
                filename: "temp.txt".to_string()
            }
        );
        assert_eq!(
            classify("remove file \"old_styles.css\"", &context),
            Intent::DeleteFile {
                filename: "old_styles.css".to_string()
            }
        );
    }

    #[test]
    fn test_git_intents() {
        let context = RequestContext::new();
        assert_eq!(classify("what is the git status?", &context), Intent::GitStatus);
        assert_eq!(classify("push my changes", &context), Intent::GitPush);
        assert_eq!(
            classify("commit with message \"feat: add new feature\"", &context),
            Intent::GitCommit {
                message: "feat: add new feature".to_string()
            }
        );
        assert_eq!(
            classify("git commit 'fix typo'", &context),
            Intent::GitCommit {
                message: "fix typo".to_string()
            }
        );
        assert_eq!(
            classify("commit `wip`", &context),
            Intent::GitCommit {
                message: "wip".to_string()
            }
        );
    }

    #[test]
    fn test_commit_without_quotes_is_not_a_commit() {
        let context = RequestContext::new();
        assert_eq!(classify("commit my work", &context), chat("commit my work"));
    }

    #[test]
    fn test_commit_capture_stops_at_first_matching_quote() {
        let context = RequestContext::new();
        assert_eq!(
            classify("commit 'don't break' now", &context),
            Intent::GitCommit {
                message: "don".to_string()
            }
        );
        assert_eq!(
            classify("commit \"it's done\" and 'ignored'", &context),
            Intent::GitCommit {
                message: "it's done".to_string()
            }
        );
    }

    #[test]
    fn test_terminal_commands() {
        let context = RequestContext::new();
        assert_eq!(
            classify("please run `npm test` for me", &context),
            Intent::RunInTerminal {
                command: "npm test".to_string()
            }
        );
        assert_eq!(
            classify("execute cargo build --release", &context),
            Intent::RunInTerminal {
                command: "cargo build --release".to_string()
            }
        );
        assert_eq!(
            classify("run `git log --oneline`", &context),
            Intent::RunInTerminal {
                command: "git log --oneline".to_string()
            }
        );
    }

    #[test]
    fn test_git_prefixed_imperatives_fall_through() {
        let context = RequestContext::new();
        assert_eq!(classify("run git status", &context), Intent::GitStatus);
        assert_eq!(classify("run git push", &context), Intent::GitPush);
        assert_eq!(classify("Run GIT diff", &context), chat("Run GIT diff"));
    }

    #[test]
    fn test_terminal_wins_over_git_keywords() {
        let context = RequestContext::new();
        assert_eq!(
            classify("run ./deploy.sh --push", &context),
            Intent::RunInTerminal {
                command: "./deploy.sh --push".to_string()
            }
        );
    }

    #[test]
    fn test_file_edit() {
        let context = RequestContext::new().with_file_content("const x = 1;");
        assert_eq!(
            classify("add comments to this file", &context),
            Intent::EditFile {
                instruction: "add comments to this file".to_string(),
                file_content: "const x = 1;".to_string()
            }
        );

        assert_eq!(
            classify("add jsdoc to this file", &RequestContext::new()),
            Intent::EditFile {
                instruction: "add jsdoc to this file".to_string(),
                file_content: String::new()
            }
        );
    }

    #[test]
    fn test_insertion() {
        let context = RequestContext::new();
        assert_eq!(
            classify("add a try catch block", &context),
            Intent::InsertCode {
                description: "try catch block".to_string()
            }
        );
        assert_eq!(
            classify("insert an hello world function", &context),
            Intent::InsertCode {
                description: "hello world function".to_string()
            }
        );
        assert_eq!(
            classify("insert another loop", &context),
            Intent::InsertCode {
                description: "another loop".to_string()
            }
        );
    }

    #[test]
    fn test_insertion_skipped_with_selection() {
        let context = RequestContext::new().with_selection("let a = 1;");
        assert_eq!(classify("add a loop", &context), chat("add a loop"));
    }

    #[test]
    fn test_generation() {
        let context = RequestContext::new();
        assert_eq!(
            classify("generate a function that adds two numbers", &context),
            Intent::Generate {
                description: "generate a function that adds two numbers".to_string()
            }
        );
    }

    #[test]
    fn test_follow_up_resolution() {
        let history = code_history();
        let context = RequestContext::new().with_history(&history);
        assert_eq!(
            classify("add comments to it", &context),
            Intent::Refactor {
                instruction: "add comments to it".to_string(),
                code: "function f(){}".to_string()
            }
        );
    }

    #[test]
    fn test_follow_up_runs_before_everything() {
        let history = code_history();
        let context = RequestContext::new()
            .with_history(&history)
            .with_selection("let other = 2;");
        let (intent, rule) = classify_with_rule("run prettier on that", &context);
        assert_eq!(rule, "follow-up");
        assert_eq!(
            intent,
            Intent::Refactor {
                instruction: "run prettier on that".to_string(),
                code: "function f(){}".to_string()
            }
        );
    }

    #[test]
    fn test_follow_up_needs_trailing_pronoun() {
        let history = code_history();
        let context = RequestContext::new()
            .with_history(&history)
            .with_file_content("function main() {}");

        assert_eq!(
            classify("commit 'fix this'", &context),
            Intent::GitCommit {
                message: "fix this".to_string()
            }
        );
        assert_eq!(
            classify("add jsdoc to this file", &context),
            Intent::EditFile {
                instruction: "add jsdoc to this file".to_string(),
                file_content: "function main() {}".to_string()
            }
        );
        assert_eq!(
            classify_with_rule("add comments to it!", &context).1,
            "follow-up"
        );
    }

    #[test]
    fn test_follow_up_leaves_explain_requests_alone() {
        let history = code_history();
        let context = RequestContext::new()
            .with_history(&history)
            .with_selection("let other = 2;");
        assert_eq!(
            classify("explain this", &context),
            Intent::Explain {
                code: "let other = 2;".to_string()
            }
        );

        let context = RequestContext::new().with_history(&history);
        assert_eq!(classify("explain this", &context), chat("explain this"));
    }

    #[test]
    fn test_follow_up_needs_pronoun_and_code() {
        let history = code_history();
        let context = RequestContext::new().with_history(&history);
        assert_eq!(classify("thanks a lot", &context), chat("thanks a lot"));

        let history = History::from_messages(20, vec![ConversationMessage::assistant("No code.")]);
        let context = RequestContext::new().with_history(&history);
        assert_eq!(classify("explain it", &context), chat("explain it"));
    }

    #[test]
    fn test_follow_up_needs_assistant_last() {
        let mut history = code_history();
        history.push(ConversationMessage::user("something else"));
        let context = RequestContext::new().with_history(&history);
        assert_eq!(
            classify("add comments to it", &context),
            Intent::InsertCode {
                description: "comments to it".to_string()
            }
        );
    }

    #[test]
    fn test_classification_is_repeatable() {
        let history = code_history();
        let context = RequestContext::new()
            .with_history(&history)
            .with_file_content("function main() {}");
        for message in ["add jsdoc to this file", "rewrite that", "what now"] {
            assert_eq!(classify(message, &context), classify(message, &context));
        }
    }
}
