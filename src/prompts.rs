use askama::Template;

use crate::analysis::Language;

#[derive(Template)]
#[template(path = "reply_fr.txt")]
struct FrenchReplyPrompt<'a> {
    seller_context: &'a str,
    post_summary: &'a str,
    comment_text: &'a str,
    cta_allowed: bool,
}

#[derive(Template)]
#[template(path = "reply_en.txt")]
struct EnglishReplyPrompt<'a> {
    seller_context: &'a str,
    post_summary: &'a str,
    comment_text: &'a str,
    cta_allowed: bool,
}

#[derive(Template)]
#[template(path = "reply_tn.txt")]
struct TunisianReplyPrompt<'a> {
    seller_context: &'a str,
    post_summary: &'a str,
    comment_text: &'a str,
    cta_allowed: bool,
}

#[derive(Template)]
#[template(path = "summary.txt")]
struct SummaryPrompt<'a> {
    caption: &'a str,
}

/// Inputs for one reply prompt.
pub struct ReplyPromptInput<'a> {
    pub language: Language,
    pub seller_context: &'a str,
    pub post_summary: &'a str,
    pub comment_text: &'a str,
    pub cta_allowed: bool,
}

/// Render the system prompt for a reply. Arabic uses the Tunisian prompt.
pub fn render_reply_prompt(input: &ReplyPromptInput<'_>) -> askama::Result<String> {
    match input.language {
        Language::French => FrenchReplyPrompt {
            seller_context: input.seller_context,
            post_summary: input.post_summary,
            comment_text: input.comment_text,
            cta_allowed: input.cta_allowed,
        }
        .render(),
        Language::English => EnglishReplyPrompt {
            seller_context: input.seller_context,
            post_summary: input.post_summary,
            comment_text: input.comment_text,
            cta_allowed: input.cta_allowed,
        }
        .render(),
        Language::Arabic | Language::Tunisian => TunisianReplyPrompt {
            seller_context: input.seller_context,
            post_summary: input.post_summary,
            comment_text: input.comment_text,
            cta_allowed: input.cta_allowed,
        }
        .render(),
    }
}

pub fn render_summary_prompt(caption: &str) -> askama::Result<String> {
    SummaryPrompt { caption }.render()
}

/// The user-turn instruction sent after the images.
pub fn user_instruction(language: Language) -> &'static str {
    match language {
        Language::Arabic | Language::Tunisian => {
            "ولّد جواب على التعليق بناءً على الصورة والكونتكست."
        }
        Language::English => {
            "Write a reply to this comment based on the image and the context provided."
        }
        Language::French => {
            "Génère une réponse à ce commentaire basée sur l'image et le contexte fourni."
        }
    }
}
