pub mod announcement_viewer;
pub mod page_spinner;
pub mod simple_list_view;

pub use announcement_viewer::announcement_viewer;
pub use page_spinner::page_spinner;
pub use simple_list_view::{simple_list_view, Labeled, ListConfig, ListKind, ListState};
