//! Choice labelling: turns a choice set into the labelled forms shown to the model
//! and recognised in its answers.

use crate::errors::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ASCII_UPPERCASE: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z",
];

/// How choice labels are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceFormat {
    /// `A`, `B`, `C`, ...
    #[default]
    Letter,
    /// `1`, `2`, `3`, ...
    Number,
}

impl ChoiceFormat {
    fn label(&self, index: usize) -> EvalResult<String> {
        match self {
            ChoiceFormat::Letter => ASCII_UPPERCASE
                .get(index)
                .map(|s| s.to_string())
                .ok_or_else(|| {
                    EvalError::config(format!(
                        "letter format supports at most {} choices",
                        ASCII_UPPERCASE.len()
                    ))
                }),
            ChoiceFormat::Number => Ok((index + 1).to_string()),
        }
    }
}

impl fmt::Display for ChoiceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceFormat::Letter => write!(f, "letter"),
            ChoiceFormat::Number => write!(f, "number"),
        }
    }
}

impl FromStr for ChoiceFormat {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "letter" => Ok(ChoiceFormat::Letter),
            "number" => Ok(ChoiceFormat::Number),
            other => Err(EvalError::config(format!(
                "unknown choice format '{other}' (expected letter|number)"
            ))),
        }
    }
}

/// A choice set together with its index-aligned label forms.
///
/// For `["cat", "dog"]` in letter format:
/// `prefix1 = ["A", "B"]`, `prefix2 = ["A.", "B."]`, `options = ["A. cat", "B. dog"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOptions {
    pub choices: Vec<String>,
    pub prefix1: Vec<String>,
    pub prefix2: Vec<String>,
    pub options: Vec<String>,
}

impl ChoiceOptions {
    /// Assemble from externally produced sequences, rejecting misaligned input.
    pub fn from_parts(
        choices: Vec<String>,
        prefix1: Vec<String>,
        prefix2: Vec<String>,
        options: Vec<String>,
    ) -> EvalResult<Self> {
        let n = choices.len();
        if prefix1.len() != n || prefix2.len() != n || options.len() != n {
            return Err(EvalError::config(format!(
                "label sequences misaligned with choices: choices={}, prefix1={}, prefix2={}, options={}",
                n,
                prefix1.len(),
                prefix2.len(),
                options.len()
            )));
        }
        Ok(Self {
            choices,
            prefix1,
            prefix2,
            options,
        })
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn choice(&self, index: usize) -> Option<&str> {
        self.choices.get(index).map(String::as_str)
    }
}

/// Build the labelled forms of `choices` in the given format.
pub fn make_options(choices: &[String], format: ChoiceFormat) -> EvalResult<ChoiceOptions> {
    if choices.is_empty() {
        return Err(EvalError::config("choice set is empty"));
    }

    let mut prefix1 = Vec::with_capacity(choices.len());
    let mut prefix2 = Vec::with_capacity(choices.len());
    let mut options = Vec::with_capacity(choices.len());

    for (i, choice) in choices.iter().enumerate() {
        // "" is the unresolved answer; a blank choice would be indistinguishable from it.
        if choice.trim().is_empty() {
            return Err(EvalError::config(format!("choice {i} is empty")));
        }
        let label = format.label(i)?;
        options.push(format!("{label}. {choice}"));
        prefix2.push(format!("{label}."));
        prefix1.push(label);
    }

    ChoiceOptions::from_parts(choices.to_vec(), prefix1, prefix2, options)
}

/// Index of the single entry of `entries` that occurs inside `answer`.
///
/// Returns `None` when no entry occurs, or when more than one does.
pub fn check_contain(answer: &str, entries: &[String]) -> Option<usize> {
    let mut hits = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| !entry.is_empty() && answer.contains(entry.as_str()))
        .map(|(i, _)| i);

    match (hits.next(), hits.next()) {
        (Some(i), None) => Some(i),
        _ => None,
    }
}
