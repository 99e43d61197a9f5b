use crate::ui::pages::{DashboardPage, RecordPage, RowData};
use crate::ui::sidebar::Sidebar;
use adw::Application;
use adw::prelude::*;
use crm_dashboard::utils::run_async_to_main;
use crm_dashboard::{AppConfig, CrmError, CrmResult, CrmServices, Route, ShellState};
use gtk4 as gtk;
use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};

/// Routed pages and the services feeding them.
struct Pages {
    stack: gtk::Stack,
    dashboard: DashboardPage,
    contacts: RecordPage,
    deals: RecordPage,
    activities: RecordPage,
    services: CrmServices,
    overlay: adw::ToastOverlay,
}

impl Pages {
    fn new(services: CrmServices, overlay: adw::ToastOverlay) -> Rc<Self> {
        let pages = Rc::new(Self {
            stack: gtk::Stack::new(),
            dashboard: DashboardPage::new(),
            contacts: RecordPage::new("No contacts loaded."),
            deals: RecordPage::new("No deals loaded."),
            activities: RecordPage::new("No activities loaded."),
            services,
            overlay,
        });
        pages.stack.set_transition_type(gtk::StackTransitionType::Crossfade);
        for route in Route::ALL {
            let widget = match pages.list_page(route) {
                Some(page) => page.widget(),
                None => pages.dashboard.widget(),
            };
            pages.stack.add_named(&widget, Some(route.id()));
        }
        pages
    }

    fn list_page(&self, route: Route) -> Option<&RecordPage> {
        match route {
            Route::Dashboard => None,
            Route::Contacts => Some(&self.contacts),
            Route::Deals => Some(&self.deals),
            Route::Activities => Some(&self.activities),
        }
    }

    fn show(self: &Rc<Self>, route: Route) {
        self.stack.set_visible_child_name(route.id());
        self.load(route);
    }

    fn load(self: &Rc<Self>, route: Route) {
        let services = self.services.clone();
        match route {
            Route::Dashboard => {
                self.dashboard.set_loading();
                let pages = self.clone();
                run_async_to_main(
                    async move { services.dashboard_summary().await },
                    move |res| match res {
                        Ok(summary) => pages.dashboard.set_summary(&summary),
                        Err(err) => {
                            pages.dashboard.set_error("Could not load the dashboard.");
                            pages.toast(&format!("Failed to load dashboard: {err}"));
                        }
                    },
                );
            }
            Route::Contacts => self.load_list(route, async move {
                let contacts = services.contacts.get_all().await?;
                Ok::<Vec<RowData>, CrmError>(contacts.iter().map(RowData::contact).collect())
            }),
            Route::Deals => self.load_list(route, async move {
                let deals = services.deals.get_all().await?;
                Ok::<Vec<RowData>, CrmError>(deals.iter().map(RowData::deal).collect())
            }),
            Route::Activities => self.load_list(route, async move {
                let activities = services.activities.get_all().await?;
                Ok::<Vec<RowData>, CrmError>(activities.iter().map(RowData::activity).collect())
            }),
        }
    }

    fn load_list<Fut>(self: &Rc<Self>, route: Route, rows: Fut)
    where
        Fut: Future<Output = CrmResult<Vec<RowData>>> + Send + 'static,
    {
        let Some(page) = self.list_page(route) else {
            return;
        };
        page.set_loading();
        let pages = self.clone();
        run_async_to_main(rows, move |res| {
            let Some(page) = pages.list_page(route) else {
                return;
            };
            match res {
                Ok(rows) => page.set_rows(rows, pages.delete_handler(route)),
                Err(err) => {
                    page.set_error(&format!("Could not load {}.", route.title().to_lowercase()));
                    pages.toast(&format!("Failed to load {}: {err}", route.title().to_lowercase()));
                }
            }
        });
    }

    fn delete_handler(self: &Rc<Self>, route: Route) -> Rc<dyn Fn(i64)> {
        let pages: Weak<Self> = Rc::downgrade(self);
        Rc::new(move |id| {
            if let Some(pages) = pages.upgrade() {
                pages.delete(route, id);
            }
        })
    }

    fn delete(self: &Rc<Self>, route: Route, id: i64) {
        let services = self.services.clone();
        let pages = self.clone();
        run_async_to_main(
            async move {
                match route {
                    Route::Contacts => services.contacts.delete(id).await,
                    Route::Deals => services.deals.delete(id).await,
                    Route::Activities => services.activities.delete(id).await,
                    Route::Dashboard => Ok(false),
                }
            },
            move |res| match res {
                Ok(true) => {
                    pages.toast("Deleted");
                    pages.load(route);
                }
                Ok(false) => {}
                Err(err) => pages.toast(&format!("Failed to delete: {err}")),
            },
        );
    }

    fn toast(&self, message: &str) {
        self.overlay.add_toast(adw::Toast::new(message));
    }
}

pub fn show_main_window(app: &Application, services: CrmServices, offline: bool) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("CRM Dashboard")
        .default_width(1024)
        .default_height(680)
        .build();

    let overlay = adw::ToastOverlay::new();
    let shell = Rc::new(RefCell::new(ShellState::new()));

    let flap = adw::Flap::builder()
        .reveal_flap(shell.borrow().sidebar_open())
        .locked(false)
        .modal(true)
        .build();

    let sidebar = Rc::new(Sidebar::new());
    flap.set_flap(Some(&sidebar.widget()));

    let pages = Pages::new(services, overlay.clone());
    flap.set_content(Some(&pages.stack));
    overlay.set_child(Some(&flap));

    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let subtitle = if offline { "Offline demo data" } else { "" };
    let title = adw::WindowTitle::new(shell.borrow().route().title(), subtitle);
    header.set_title_widget(Some(&title));

    let menu_btn = gtk::Button::from_icon_name("open-menu-symbolic");
    menu_btn.set_tooltip_text(Some("Menu"));
    header.pack_start(&menu_btn);

    let refresh_btn = gtk::Button::from_icon_name("view-refresh-symbolic");
    refresh_btn.set_tooltip_text(Some("Reload"));
    header.pack_end(&refresh_btn);

    if !offline {
        let settings_btn = gtk::Button::from_icon_name("emblem-system-symbolic");
        settings_btn.set_tooltip_text(Some("Backend connection"));
        header.pack_end(&settings_btn);
        let app = app.clone();
        let window = window.clone();
        settings_btn.connect_clicked(move |_| {
            crate::ui::settings::show_settings_window(&app, AppConfig::load());
            window.close();
        });
    }

    container.append(&header);
    container.append(&overlay);
    window.set_content(Some(&container));

    {
        let shell = shell.clone();
        let flap_for_toggle = flap.clone();
        menu_btn.connect_clicked(move |_| {
            let open = shell.borrow_mut().toggle_sidebar();
            flap_for_toggle.set_reveal_flap(open);
        });
    }
    {
        // Swiping or clicking outside the sidebar closes it without the menu button.
        let shell = shell.clone();
        flap.connect_reveal_flap_notify(move |flap| {
            if !flap.reveals_flap() {
                shell.borrow_mut().close_sidebar();
            }
        });
    }

    let navigate: Rc<dyn Fn(Route)> = {
        let shell = shell.clone();
        let flap = flap.clone();
        let sidebar = sidebar.clone();
        let pages = pages.clone();
        Rc::new(move |route| {
            shell.borrow_mut().navigate(route);
            flap.set_reveal_flap(false);
            title.set_title(route.title());
            sidebar.select(route);
            pages.show(route);
        })
    };
    {
        let navigate = navigate.clone();
        sidebar.connect_route_activated(move |route| navigate(route));
    }
    {
        let shell = shell.clone();
        let pages = pages.clone();
        refresh_btn.connect_clicked(move |_| pages.load(shell.borrow().route()));
    }

    window.present();
    navigate(Route::default());
}
