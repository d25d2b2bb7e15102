use school_portal::app::App;
use school_portal::logger;

fn main() -> iced::Result {
    dotenvy::dotenv().ok();
    logger::init_logging();
    tracing::info!("starting school portal");

    iced::application("School Portal", App::update, App::view)
        .theme(|app: &App| app.theme.clone())
        .subscription(App::subscription)
        .window_size(iced::Size::new(1400.0, 800.0))
        .run()
}
