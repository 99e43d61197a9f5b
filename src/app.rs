use adw::Application;
use crm_dashboard::{AppConfig, ApperConnector, Connector, CrmServices, MemoryBackend};
use std::sync::Arc;

/// Opens the dashboard, or the settings window when nothing is configured yet.
pub fn build_ui(app: &Application, offline: bool) {
    if offline {
        let backend = Arc::new(MemoryBackend::with_demo_data());
        crate::ui::main_window::show_main_window(app, services(backend.connector()), true);
        return;
    }

    let config = AppConfig::load();
    if config
        .resolve_credentials(|name| std::env::var(name).ok())
        .is_err()
    {
        log::info!("no backend credentials configured, opening settings");
        crate::ui::settings::show_settings_window(app, config);
        return;
    }
    open_dashboard(app, &config);
}

/// Builds the live connector from `config` and shows the main window.
pub fn open_dashboard(app: &Application, config: &AppConfig) {
    match ApperConnector::from_config(config) {
        Ok(connector) => {
            crate::ui::main_window::show_main_window(app, services(Arc::new(connector)), false)
        }
        Err(err) => {
            log::error!("cannot set up backend connection: {err}");
            crate::ui::settings::show_settings_window(app, config.clone());
        }
    }
}

fn services(connector: Arc<dyn Connector>) -> CrmServices {
    CrmServices::new(connector)
}
