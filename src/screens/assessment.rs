use iced::widget::{button, column, horizontal_space, radio, row, text, text_input, Column, Container, Row};
use iced::{Center, Length};

use crate::app::{App, Message};
use crate::assessment::QuestionKind;

pub fn assessment_screen(app: &App) -> Container<Message> {
    let state = &app.assessment;

    let Some(question) = state.question() else {
        let mut summary = Column::new()
            .spacing(10)
            .push(text("Assessment complete").size(26));
        for response in &state.responses {
            summary = summary.push(text(response.to_string()));
        }
        summary = summary.push(button("Start again").on_press(Message::RestartAssessment));
        return Container::new(summary.width(Length::Fixed(500.0))).center(Length::Fill);
    };

    let mut content = Column::new()
        .spacing(25)
        .width(Length::Fixed(500.0))
        .push(text(format!("Question {} of {}", state.current + 1, state.questions.len())).size(14))
        .push(text(question.question.clone()).size(24));

    let placeholder = match question.kind {
        QuestionKind::MultipleChoice => {
            let mut choices = Row::new().spacing(20);
            for (i, answer) in question.answers.iter().enumerate() {
                choices = choices.push(radio(answer.clone(), i, state.selected, Message::AnswerSelected));
            }
            content = content.push(choices.wrap());
            "Explain (optional)"
        }
        QuestionKind::ShortAnswer => "Answer",
    };

    content = content
        .push(
            text_input(placeholder, &state.text)
                .on_input(Message::AssessmentTextChanged)
                .padding(10),
        )
        .push(row![horizontal_space(), button("Next").on_press(Message::NextQuestion)]);

    Container::new(column![content].align_x(Center)).center(Length::Fill)
}
