use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "mc")]
    MultipleChoice,
    #[serde(rename = "sa")]
    ShortAnswer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub question: String,
    pub choice: Option<String>,
    pub text: String,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.choice, self.text.trim()) {
            (Some(choice), "") => write!(f, "{}: {}", self.question, choice),
            (Some(choice), text) => write!(f, "{}: {} ({})", self.question, choice, text),
            (None, "") => write!(f, "{}: no answer", self.question),
            (None, text) => write!(f, "{}: {}", self.question, text),
        }
    }
}

// TODO: load questions from the assessments endpoint once the API exposes one.
pub fn sample_questions() -> Vec<Question> {
    vec![
        Question {
            question: "This is an example".to_string(),
            kind: QuestionKind::MultipleChoice,
            answers: (0..5).map(|i| format!("Choice {}", i)).collect(),
        },
        Question {
            question: "Explain the water cycle in one sentence".to_string(),
            kind: QuestionKind::ShortAnswer,
            answers: Vec::new(),
        },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentState {
    pub questions: Vec<Question>,
    pub current: usize,
    pub selected: Option<usize>,
    pub text: String,
    pub responses: Vec<Response>,
}

impl Default for AssessmentState {
    fn default() -> Self {
        Self::new(sample_questions())
    }
}

impl AssessmentState {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current: 0,
            selected: None,
            text: String::new(),
            responses: Vec::new(),
        }
    }

    pub fn question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.questions.len()
    }

    pub fn select(&mut self, index: usize) {
        if self.question().is_some_and(|q| index < q.answers.len()) {
            self.selected = Some(index);
        }
    }

    /// Records the current answer and moves to the next question.
    pub fn next(&mut self) {
        let Some(question) = self.question() else {
            return;
        };
        let choice = match question.kind {
            QuestionKind::MultipleChoice => self.selected.and_then(|i| question.answers.get(i).cloned()),
            QuestionKind::ShortAnswer => None,
        };
        let prompt = question.question.clone();
        let response = Response {
            question: prompt,
            choice,
            text: std::mem::take(&mut self.text),
        };
        self.responses.push(response);
        self.selected = None;
        self.current += 1;
    }

    pub fn restart(&mut self) {
        *self = Self::new(std::mem::take(&mut self.questions));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_kind_uses_short_codes() {
        let question: Question =
            serde_json::from_str(r#"{"question": "2+2?", "type": "mc", "answers": ["3", "4"]}"#).unwrap();
        assert_eq!(question.kind, QuestionKind::MultipleChoice);

        let question: Question = serde_json::from_str(r#"{"question": "Why?", "type": "sa"}"#).unwrap();
        assert_eq!(question.kind, QuestionKind::ShortAnswer);
        assert!(question.answers.is_empty());
    }

    #[test]
    fn next_records_answer_and_advances() {
        let mut state = AssessmentState::default();
        state.select(2);
        state.text = "because".to_string();
        state.next();

        assert_eq!(state.current, 1);
        assert_eq!(state.selected, None);
        assert!(state.text.is_empty());
        assert_eq!(state.responses[0].choice.as_deref(), Some("Choice 2"));
        assert_eq!(state.responses[0].text, "because");

        state.text = "evaporation and rain".to_string();
        state.next();
        assert!(state.is_complete());
        assert_eq!(state.responses[1].choice, None);

        state.next();
        assert_eq!(state.responses.len(), 2);
    }

    #[test]
    fn out_of_range_choice_is_ignored() {
        let mut state = AssessmentState::default();
        state.select(9);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn restart_keeps_questions() {
        let mut state = AssessmentState::default();
        state.next();
        state.restart();
        assert_eq!(state.current, 0);
        assert!(state.responses.is_empty());
        assert_eq!(state.questions.len(), 2);
    }
}
