//! Prompt construction from a question and its labelled options.

use crate::errors::{EvalError, EvalResult};

/// Builds the prompt sent to the backend from `(question, options)`.
///
/// Per-call builders may borrow local state; the evaluator's stored default is
/// `PromptFn<'static>`.
pub type PromptFn<'a> = dyn Fn(&str, &[String]) -> String + 'a;

pub fn default_prompt(question: &str, options: &[String]) -> String {
    format!(
        "Question: {}\nOptions:\n{}\nAnswer with the option's label from the given choices directly.",
        question,
        options.join("\n")
    )
}

/// A prompt template with `{question}` and `{options}` placeholders.
///
/// Options are joined one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn parse(template: &str) -> EvalResult<Self> {
        if !template.contains("{question}") {
            return Err(EvalError::config(
                "prompt template must contain a {question} placeholder",
            ));
        }
        if !template.contains("{options}") {
            return Err(EvalError::config(
                "prompt template must contain an {options} placeholder",
            ));
        }
        Ok(Self {
            template: template.to_string(),
        })
    }

    /// Single pass over the template; placeholder text inside the substituted
    /// question or options is never expanded.
    pub fn render(&self, question: &str, options: &[String]) -> String {
        let joined = options.join("\n");
        let mut out = String::with_capacity(self.template.len() + question.len() + joined.len());
        let mut rest = self.template.as_str();
        while let Some(pos) = rest.find('{') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            if let Some(after) = tail.strip_prefix("{question}") {
                out.push_str(question);
                rest = after;
            } else if let Some(after) = tail.strip_prefix("{options}") {
                out.push_str(&joined);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        out
    }

    pub fn into_prompt_fn(self) -> Box<PromptFn<'static>> {
        Box::new(move |question, options| self.render(question, options))
    }
}
