//! Response synthesis from encoded request strings.
//!
//! A request is plain text with an optional `<verb>:` prefix. Rewrite verbs
//! (`editFile`, `refactor`) carry an instruction and a body separated by a
//! `---` line. Text without a known prefix is handled as conversation.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::chat::History;
use crate::code::{add_jsdoc, comment_lines, extract_fenced_code, function_names, to_arrow_function};
use crate::intent::Intent;
use crate::response::Response;
use crate::templates::{
    asks_for_explanation, find_knowledge, find_snippet, EXPLAIN_PREAMBLE, GENERATE_FALLBACKS,
    GENERATE_SNIPPETS, GREETINGS, GREETING_WORDS, HELP_MESSAGES, INSERT_FALLBACK,
    INSERT_SNIPPETS, SELECT_CODE_PROMPT, UNKNOWN_REPLIES,
};

/// Line separating an instruction from the body it applies to.
pub const SEPARATOR: &str = "\n---\n";

/// A decoded synthesizer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    EditFile { instruction: &'a str, body: &'a str },
    Refactor { instruction: &'a str, code: &'a str },
    InsertCode { description: &'a str },
    Explain { code: &'a str },
    Generate { description: &'a str },
    Conversation(&'a str),
}

impl<'a> Request<'a> {
    /// Decode a request string. Unknown prefixes decode as conversation.
    pub fn parse(request: &'a str) -> Self {
        if let Some(rest) = request.strip_prefix("editFile:") {
            let (instruction, body) = split_payload(payload(rest));
            return Self::EditFile { instruction, body };
        }
        if let Some(rest) = request.strip_prefix("refactor:") {
            let (instruction, code) = split_payload(payload(rest));
            return Self::Refactor { instruction, code };
        }
        if let Some(rest) = request.strip_prefix("insertCode:") {
            return Self::InsertCode {
                description: payload(rest),
            };
        }
        if let Some(rest) = request.strip_prefix("explain:") {
            return Self::Explain {
                code: payload(rest),
            };
        }
        if let Some(rest) = request.strip_prefix("generate:") {
            return Self::Generate {
                description: payload(rest),
            };
        }
        Self::Conversation(request)
    }

    /// The request that produces content for `intent`.
    ///
    /// Returns `None` for intents handled by workspace collaborators.
    pub fn from_intent(intent: &'a Intent) -> Option<Self> {
        match intent {
            Intent::Refactor { instruction, code } => Some(Self::Refactor {
                instruction: instruction.as_str(),
                code: code.as_str(),
            }),
            Intent::Explain { code } => Some(Self::Explain { code: code.as_str() }),
            Intent::Generate { description } => Some(Self::Generate {
                description: description.as_str(),
            }),
            Intent::InsertCode { description } => Some(Self::InsertCode {
                description: description.as_str(),
            }),
            Intent::EditFile {
                instruction,
                file_content,
            } => Some(Self::EditFile {
                instruction: instruction.as_str(),
                body: file_content.as_str(),
            }),
            Intent::Chat { message } => Some(Self::Conversation(message.as_str())),
            _ => None,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Self::EditFile { .. } => "editFile",
            Self::Refactor { .. } => "refactor",
            Self::InsertCode { .. } => "insertCode",
            Self::Explain { .. } => "explain",
            Self::Generate { .. } => "generate",
            Self::Conversation(_) => "conversation",
        }
    }
}

impl fmt::Display for Request<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EditFile { instruction, body } => {
                write!(f, "editFile: {}{}{}", instruction, SEPARATOR, body)
            }
            Self::Refactor { instruction, code } => {
                write!(f, "refactor: {}{}{}", instruction, SEPARATOR, code)
            }
            Self::InsertCode { description } => write!(f, "insertCode: {}", description),
            Self::Explain { code } => write!(f, "explain: {}", code),
            Self::Generate { description } => write!(f, "generate: {}", description),
            Self::Conversation(message) => f.write_str(message),
        }
    }
}

/// Drop the single space conventionally written after the verb's colon.
fn payload(rest: &str) -> &str {
    rest.strip_prefix(' ').unwrap_or(rest)
}

fn split_payload(payload: &str) -> (&str, &str) {
    payload.split_once(SEPARATOR).unwrap_or((payload, ""))
}

/// Extra context the conversation handler may consult.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuxiliaryContext<'a> {
    /// Full text of the active document.
    pub file_content: Option<&'a str>,
    /// Conversation so far.
    pub history: Option<&'a History>,
}

/// Turns requests into canned responses.
///
/// Choices among equivalent canned replies come from the injected random
/// source, so a seeded or mocked generator pins every outcome.
#[derive(Debug, Clone)]
pub struct Synthesizer<R = StdRng> {
    rng: R,
}

impl Synthesizer<StdRng> {
    /// Synthesizer backed by an entropy-seeded generator.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Synthesizer whose choices are fully determined by `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Synthesizer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Synthesizer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Produce a response for an encoded request string.
    pub fn respond(&mut self, request: &str, context: Option<&AuxiliaryContext<'_>>) -> Response {
        self.respond_to(Request::parse(request), context)
    }

    /// Produce a response for an already decoded request.
    pub fn respond_to(
        &mut self,
        request: Request<'_>,
        context: Option<&AuxiliaryContext<'_>>,
    ) -> Response {
        debug!(verb = request.verb(), "Synthesizing response");

        match request {
            Request::EditFile { instruction, body } => edit_file(instruction, body),
            Request::Refactor { instruction, code } => refactor(instruction, code),
            Request::InsertCode { description } => insert_code(description),
            Request::Explain { code } => Response::with_code(EXPLAIN_PREAMBLE, code),
            Request::Generate { description } => self.generate(description),
            Request::Conversation(message) => {
                self.converse(message, context.copied().unwrap_or_default())
            }
        }
    }

    fn generate(&mut self, description: &str) -> Response {
        let description = description.to_lowercase();
        match find_snippet(GENERATE_SNIPPETS, &description) {
            Some(snippet) => Response::with_code(snippet.speech, snippet.code),
            None => Response::speech(self.pick(GENERATE_FALLBACKS)),
        }
    }

    fn converse(&mut self, message: &str, context: AuxiliaryContext<'_>) -> Response {
        let lower = message.to_lowercase();

        if asks_for_explanation(&lower) {
            if let Some(response) = explain_from_context(&context) {
                return response;
            }
        }

        let is_greeting = lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| GREETING_WORDS.contains(&word));
        if is_greeting {
            return Response::speech(self.pick(GREETINGS));
        }

        if lower.contains("help") {
            return Response::speech(self.pick(HELP_MESSAGES));
        }

        if let Some(explanation) = find_knowledge(&lower) {
            return Response::speech(explanation);
        }

        Response::speech(self.pick(UNKNOWN_REPLIES))
    }

    fn pick(&mut self, options: &'static [&'static str]) -> &'static str {
        options.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

fn edit_file(instruction: &str, body: &str) -> Response {
    if instruction.to_lowercase().contains("add jsdoc") {
        let (documented, inserted) = add_jsdoc(body);
        debug!(inserted, "Added documentation blocks");
        return Response::speech(documented);
    }
    Response::speech(body)
}

fn refactor(instruction: &str, code: &str) -> Response {
    let instruction = instruction.to_lowercase();
    if instruction.contains("add comment") {
        return Response::speech(comment_lines(code));
    }
    if instruction.contains("arrow function") {
        return Response::speech(to_arrow_function(code));
    }
    Response::speech(code)
}

fn insert_code(description: &str) -> Response {
    let description = description.to_lowercase();
    match find_snippet(INSERT_SNIPPETS, &description) {
        Some(snippet) => Response::with_code(snippet.speech, snippet.code),
        None => Response::speech(INSERT_FALLBACK),
    }
}

fn explain_from_context(context: &AuxiliaryContext<'_>) -> Option<Response> {
    if let Some(content) = context.file_content {
        let names = function_names(content);
        if names.is_empty() {
            return Some(Response::speech(SELECT_CODE_PROMPT));
        }
        return Some(Response::speech(format!(
            "I see a few functions in this file: {}. Which one are you asking about?",
            names.join(", ")
        )));
    }

    let code = context
        .history
        .and_then(History::last_assistant)
        .and_then(|message| extract_fenced_code(&message.content))?;
    Some(Response::with_code(EXPLAIN_PREAMBLE, code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ConversationMessage;
    use crate::code::COMMENT_HEADER;
    use rand::rngs::mock::StepRng;

    fn pinned() -> Synthesizer<StepRng> {
        Synthesizer::with_rng(StepRng::new(0, 0))
    }

    #[test]
    fn test_parse_rewrite_request() {
        assert_eq!(
            Request::parse("refactor: add comments\n---\nconsole.log(1)"),
            Request::Refactor {
                instruction: "add comments",
                code: "console.log(1)"
            }
        );
        assert_eq!(
            Request::parse("editFile:add jsdoc"),
            Request::EditFile {
                instruction: "add jsdoc",
                body: ""
            }
        );
        assert_eq!(
            Request::parse("tell me about loops"),
            Request::Conversation("tell me about loops")
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let request = Request::Refactor {
            instruction: "convert to arrow function",
            code: "function a() {}\n---\nfunction b() {}",
        };
        assert_eq!(Request::parse(&request.to_string()), request);
    }

    #[test]
    fn test_from_intent() {
        let intent = Intent::InsertCode {
            description: "try catch block".to_string(),
        };
        assert_eq!(
            Request::from_intent(&intent),
            Some(Request::InsertCode {
                description: "try catch block"
            })
        );
        assert_eq!(Request::from_intent(&Intent::GitPush), None);
    }

    #[test]
    fn test_refactor_add_comments() {
        let response = pinned().respond("refactor: add comments\n---\nconsole.log(1)", None);
        assert_eq!(response.speech, format!("{}\n// console.log(1)", COMMENT_HEADER));
        assert_eq!(response.code, None);
    }

    #[test]
    fn test_refactor_arrow_function() {
        let response = pinned().respond(
            "refactor: convert to an arrow function\n---\nfunction add(a, b) { return a + b; }",
            None,
        );
        assert_eq!(response.speech, "const add = (a, b) => { return a + b; }");
    }

    #[test]
    fn test_refactor_unknown_instruction_is_identity() {
        let response = pinned().respond("refactor: make it faster\n---\nlet x = 1;", None);
        assert_eq!(response, Response::speech("let x = 1;"));
    }

    #[test]
    fn test_edit_file_add_jsdoc() {
        let response = pinned().respond(
            "editFile: add jsdoc\n---\nfunction a(x,y){}\n\nfunction b(){}",
            None,
        );
        let speech = response.speech;
        assert_eq!(speech.matches("/**").count(), 2);
        assert_eq!(speech.matches("@param").count(), 2);

        let first_doc = speech.find("/**").unwrap();
        let first_fn = speech.find("function a(x,y){}").unwrap();
        let second_doc = speech.rfind("/**").unwrap();
        let second_fn = speech.find("function b(){}").unwrap();
        assert!(first_doc < first_fn && first_fn < second_doc && second_doc < second_fn);
        assert!(speech[..first_fn].contains("@param {*} x\n * @param {*} y"));
        assert!(!speech[second_doc..].contains("@param"));
    }

    #[test]
    fn test_edit_file_unknown_instruction_is_identity() {
        let response = pinned().respond("editFile: translate to rust\n---\nfunction main() {}", None);
        assert_eq!(response.speech, "function main() {}");
    }

    #[test]
    fn test_insert_code() {
        let mut synthesizer = pinned();
        let response = synthesizer.respond("insertCode: try catch block", None);
        assert!(response.code.unwrap().starts_with("try {"));

        let response = synthesizer.respond("insertCode: a hello world function", None);
        assert!(response.code.unwrap().contains("console.log(\"Hello, World!\")"));

        let response = synthesizer.respond("insertCode: quantum compiler", None);
        assert_eq!(response, Response::speech(INSERT_FALLBACK));
    }

    #[test]
    fn test_explain_attaches_code() {
        let response = pinned().respond("explain: const x = 1;", None);
        assert_eq!(response.speech, EXPLAIN_PREAMBLE);
        assert_eq!(response.code.as_deref(), Some("const x = 1;"));
    }

    #[test]
    fn test_generate() {
        let mut synthesizer = pinned();
        let response = synthesizer.respond("generate: a hello world function", None);
        assert!(response.code.unwrap().contains("function helloWorld()"));

        let response = synthesizer.respond("generate: a Person class", None);
        assert!(response.code.unwrap().starts_with("class Person"));

        let response = synthesizer.respond("generate: fetch some json", None);
        assert!(response.code.unwrap().contains("await fetch(url)"));

        let response = synthesizer.respond("generate: an operating system", None);
        assert_eq!(response, Response::speech(GENERATE_FALLBACKS[0]));
    }

    #[test]
    fn test_conversation_branches() {
        let mut synthesizer = pinned();
        assert_eq!(synthesizer.respond("Hello there", None).speech, GREETINGS[0]);
        assert_eq!(synthesizer.respond("can you help me?", None).speech, HELP_MESSAGES[0]);
        assert!(synthesizer
            .respond("What is a Promise?", None)
            .speech
            .starts_with("A Promise is"));
        assert_eq!(
            synthesizer.respond("tell me about quasars", None).speech,
            UNKNOWN_REPLIES[0]
        );
    }

    #[test]
    fn test_greeting_needs_whole_word() {
        let response = pinned().respond("which variable should this be?", None);
        assert!(response.speech.starts_with("A variable is"));
    }

    #[test]
    fn test_knowledge_order_first_keyword_wins() {
        let response = pinned().respond("a loop inside a function", None);
        assert!(response.speech.starts_with("A function is"));
    }

    #[test]
    fn test_explain_this_lists_file_functions() {
        let context = AuxiliaryContext {
            file_content: Some("function main() {}\nfunction helper(a) {}"),
            history: None,
        };
        let response = pinned().respond("what does this do?", Some(&context));
        assert_eq!(
            response.speech,
            "I see a few functions in this file: main, helper. Which one are you asking about?"
        );

        let context = AuxiliaryContext {
            file_content: Some("const x = 1;"),
            history: None,
        };
        let response = pinned().respond("explain this", Some(&context));
        assert_eq!(response.speech, SELECT_CODE_PROMPT);
    }

    #[test]
    fn test_explain_this_uses_last_assistant_code() {
        let history = History::from_messages(
            20,
            vec![
                ConversationMessage::assistant("Here:\n```\nlet total = 0;\n```"),
                ConversationMessage::user("thanks"),
            ],
        );
        let context = AuxiliaryContext {
            file_content: None,
            history: Some(&history),
        };
        let response = pinned().respond("explain this please", Some(&context));
        assert_eq!(response, Response::with_code(EXPLAIN_PREAMBLE, "let total = 0;"));
    }

    #[test]
    fn test_seeded_synthesizers_agree() {
        let mut first = Synthesizer::seeded(7);
        let mut second = Synthesizer::seeded(7);
        for message in ["hey", "help", "something unknown", "generate: a spaceship"] {
            assert_eq!(first.respond(message, None), second.respond(message, None));
        }
    }
}
