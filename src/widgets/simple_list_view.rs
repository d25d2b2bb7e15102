use iced::widget::container::bordered_box;
use iced::widget::{button, column, horizontal_space, row, text, Column, Container};
use iced::{Alignment, Element, Length, Theme};
use iced_font_awesome::fa_icon_solid;

use crate::app::Message;
use crate::models::Announcement;

/// Which list on screen a page/toggle message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    School,
    Grade,
    Subject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListState {
    pub page: usize,
    pub expanded: Option<usize>,
}

pub trait Labeled {
    fn label(&self, field: &str) -> Option<String>;
}

impl Labeled for Announcement {
    fn label(&self, field: &str) -> Option<String> {
        self.field(field)
    }
}

pub struct ListConfig<'a, T> {
    pub title: &'a str,
    pub page_max: usize,
    /// Font Awesome solid icon name.
    pub icon: &'a str,
    pub label_field: &'a str,
    pub viewer: fn(&T) -> Element<'a, Message>,
}

pub fn page_count(len: usize, page_max: usize) -> usize {
    len.div_ceil(page_max.max(1)).max(1)
}

/// Clamps `page` to the available pages and returns it with the item range it shows.
pub fn page_window(len: usize, page_max: usize, page: usize) -> (usize, std::ops::Range<usize>) {
    let page_max = page_max.max(1);
    let page = page.min(page_count(len, page_max) - 1);
    let start = page * page_max;
    let end = (start + page_max).min(len);
    (page, start..end)
}

pub fn simple_list_view<'a, T: Labeled>(
    theme: &'a Theme,
    kind: ListKind,
    config: ListConfig<'a, T>,
    items: &[T],
    state: ListState,
) -> Element<'a, Message> {
    let pages = page_count(items.len(), config.page_max);
    let (page, window) = page_window(items.len(), config.page_max, state.page);

    let header = row![
        fa_icon_solid(config.icon).style(move |_| text::base(theme)),
        text(config.title).size(20),
        horizontal_space(),
        text(format!("{} / {}", page + 1, pages)).size(14),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let mut list = Column::new().spacing(5);
    if items.is_empty() {
        list = list.push(text("Nothing here yet").size(14));
    }
    for index in window.clone() {
        let item = &items[index];
        let label = item.label(config.label_field).unwrap_or_else(|| "-".to_string());
        list = list.push(
            button(text(label))
                .width(Length::Fill)
                .style(button::text)
                .on_press(Message::ListItemToggled(kind, index)),
        );
        if state.expanded == Some(index) {
            list = list.push(Container::new((config.viewer)(item)).padding([5, 15]));
        }
    }

    let pager = row![
        button("<").on_press_maybe((page > 0).then(|| Message::ListPageChanged(kind, page - 1))),
        horizontal_space(),
        button(">").on_press_maybe((page + 1 < pages).then(|| Message::ListPageChanged(kind, page + 1))),
    ];

    Container::new(column![header, list, pager].spacing(10))
        .style(move |_| bordered_box(theme))
        .width(Length::Fill)
        .padding(10)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_never_drops_below_one() {
        assert_eq!(page_count(0, 3), 1);
        assert_eq!(page_count(3, 3), 1);
        assert_eq!(page_count(4, 3), 2);
        assert_eq!(page_count(5, 0), 5);
    }

    #[test]
    fn window_is_clamped_to_the_last_page() {
        assert_eq!(page_window(7, 3, 0), (0, 0..3));
        assert_eq!(page_window(7, 3, 2), (2, 6..7));
        assert_eq!(page_window(7, 3, 9), (2, 6..7));
        assert_eq!(page_window(0, 3, 4), (0, 0..0));
    }
}
