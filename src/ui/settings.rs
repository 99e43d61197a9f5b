use adw::Application;
use adw::prelude::*;
use crm_dashboard::config::{CredentialSource, Credentials};
use crm_dashboard::{AppConfig, ApperConnector, ContactService, CrmError};
use gtk4 as gtk;
use std::rc::Rc;
use std::sync::Arc;

/// Connection form: base URL, project id and public key, saved to the config file.
pub fn show_settings_window(app: &Application, config: AppConfig) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Backend connection")
        .default_width(460)
        .default_height(320)
        .resizable(false)
        .build();

    let toast_overlay = adw::ToastOverlay::new();

    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_margin_start(24);
    root.set_margin_end(24);

    let title = gtk::Label::new(Some("Connect to your CRM backend"));
    title.add_css_class("title-2");
    title.set_halign(gtk::Align::Start);
    root.append(&title);

    let url_entry = gtk::Entry::new();
    url_entry.set_placeholder_text(Some("Base URL (default https://api.apper.io)"));
    url_entry.set_text(&config.base_url);
    url_entry.set_hexpand(true);

    let project_entry = gtk::Entry::new();
    project_entry.set_placeholder_text(Some("Project ID"));
    project_entry.set_text(&config.project_id);

    let key_entry = gtk::PasswordEntry::new();
    key_entry.set_placeholder_text(Some("Public key"));
    key_entry.set_show_peek_icon(true);
    key_entry.set_text(&config.public_key);

    let form = gtk::Box::new(gtk::Orientation::Vertical, 8);
    form.append(&url_entry);
    form.append(&project_entry);
    form.append(&key_entry);
    root.append(&form);

    let status = gtk::Label::new(None);
    status.add_css_class("dim-label");
    status.set_halign(gtk::Align::Start);
    root.append(&status);

    let save_btn = gtk::Button::with_label("Save and connect");
    save_btn.add_css_class("suggested-action");
    save_btn.set_halign(gtk::Align::End);
    root.append(&save_btn);

    toast_overlay.set_child(Some(&root));
    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    header.set_title_widget(Some(&gtk::Label::new(Some("CRM Dashboard"))));
    container.append(&header);
    container.append(&toast_overlay);
    window.set_content(Some(&container));

    let on_save = {
        let app = app.clone();
        let window = window.clone();
        let overlay = toast_overlay.clone();
        let save_btn = save_btn.clone();
        let url_entry = url_entry.clone();
        let project_entry = project_entry.clone();
        let key_entry = key_entry.clone();
        move || {
            let mut updated = config.clone();
            updated.base_url = crm_dashboard::utils::normalize_url(&url_entry.text());
            updated.project_id = project_entry.text().trim().to_string();
            updated.public_key = key_entry.text().trim().to_string();
            if !updated.has_credentials() {
                overlay.add_toast(adw::Toast::new("Please enter a project ID and public key."));
                return;
            }

            status.set_label("Checking connection…");
            save_btn.set_sensitive(false);

            let check_config = updated.clone();
            let status = status.clone();
            let overlay = overlay.clone();
            let app = app.clone();
            let window = window.clone();
            let save_btn = save_btn.clone();
            crm_dashboard::utils::run_async_to_main(
                async move { check_connection(&check_config).await },
                move |res| {
                    save_btn.set_sensitive(true);
                    // Credentials are kept even when the check fails.
                    let message = match res {
                        Ok(count) => format!("Connected ({count} contacts)"),
                        Err(err) => {
                            log::warn!("connection check failed: {err}");
                            format!("Saved, but the backend said: {err}")
                        }
                    };
                    status.set_label(&message);
                    if let Err(err) = updated.save() {
                        overlay.add_toast(adw::Toast::new(&format!(
                            "Failed to save settings: {err}"
                        )));
                        return;
                    }
                    crate::app::open_dashboard(&app, &updated);
                    window.close();
                },
            );
        }
    };

    let on_save: Rc<dyn Fn()> = Rc::new(on_save);
    {
        let on_save = on_save.clone();
        save_btn.connect_clicked(move |_| (on_save)());
    }
    {
        let on_save = on_save.clone();
        key_entry.connect_activate(move |_| (on_save)());
    }

    window.present();
}

/// Fetches the first page of contacts with exactly the entered credentials.
async fn check_connection(config: &AppConfig) -> Result<usize, CrmError> {
    let credentials = Credentials {
        project_id: config.project_id.clone(),
        public_key: config.public_key.clone(),
    };
    let connector = ApperConnector::new(
        &config.base_url(),
        config.timeout(),
        CredentialSource::Fixed(credentials),
    )?;
    let contacts = ContactService::new(Arc::new(connector)).get_all().await?;
    Ok(contacts.len())
}
