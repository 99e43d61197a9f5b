use crm_dashboard::Route;
use gtk4 as gtk;
use gtk4::prelude::*;

pub struct Sidebar {
    root: gtk::Box,
    list: gtk::ListBox,
}

impl Sidebar {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);
        root.set_width_request(220);

        let title = gtk::Label::new(Some("CRM"));
        title.add_css_class("heading");
        title.set_halign(gtk::Align::Start);
        root.append(&title);

        let list = gtk::ListBox::new();
        list.add_css_class("navigation-sidebar");
        list.set_selection_mode(gtk::SelectionMode::Single);
        for route in Route::ALL {
            let row = gtk::ListBoxRow::new();
            let content = gtk::Box::new(gtk::Orientation::Horizontal, 12);
            content.set_margin_top(8);
            content.set_margin_bottom(8);
            content.set_margin_start(8);
            content.set_margin_end(8);
            content.append(&gtk::Image::from_icon_name(route.icon_name()));
            let label = gtk::Label::new(Some(route.title()));
            label.set_halign(gtk::Align::Start);
            content.append(&label);
            row.set_child(Some(&content));
            row.set_widget_name(route.id());
            list.append(&row);
        }
        root.append(&list);

        Self { root, list }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    /// Calls `f` with the route of every row the user activates.
    pub fn connect_route_activated<F: Fn(Route) + 'static>(&self, f: F) {
        self.list.connect_row_activated(move |_, row| {
            if let Some(route) = Route::from_id(row.widget_name().as_str()) {
                f(route);
            }
        });
    }

    pub fn select(&self, route: Route) {
        let index = Route::ALL.iter().position(|r| *r == route).unwrap_or(0);
        if let Some(row) = self.list.row_at_index(index as i32) {
            self.list.select_row(Some(&row));
        }
    }
}
