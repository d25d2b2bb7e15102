pub mod access_denied;
pub mod assessment;
pub mod editors;
pub mod login;
pub mod nav_menu;
pub mod settings;
pub mod subject;
pub mod user_portal;

pub use access_denied::access_denied_screen;
pub use assessment::assessment_screen;
pub use editors::{classes_form_screen, grades_form_screen};
pub use login::login_screen;
pub use nav_menu::nav_menu;
pub use settings::settings_screen;
pub use subject::subject_screen;
pub use user_portal::user_portal_screen;
