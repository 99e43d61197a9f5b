mod app;
mod ui;

use adw::Application;
use adw::prelude::*;
use crm_dashboard::AppConfig;
use crm_dashboard::logging::{default_log_dir, init_logging};

const APP_ID: &str = "com.example.CrmDashboard";

fn main() -> glib::ExitCode {
    let offline = std::env::args().skip(1).any(|arg| arg == "--offline");
    let config = AppConfig::load();
    let level = std::env::var("CRM_LOG").unwrap_or_else(|_| config.log_level().to_string());
    if let Err(err) = init_logging(&level, default_log_dir().as_deref()) {
        eprintln!("logging disabled: {err}");
    }
    log::info!("starting {APP_ID} (offline: {offline})");

    let app = Application::builder().application_id(APP_ID).build();
    app.connect_activate(move |application| app::build_ui(application, offline));
    // GTK must not see our own flags.
    app.run_with_args::<&str>(&[])
}
