use crm_dashboard::format::safe_format;
use crm_dashboard::{Activity, Contact, DashboardSummary, Deal};
use adw::prelude::*;
use gtk4 as gtk;
use std::rc::Rc;

const DATE_PATTERN: &str = "%b %-d, %Y";
const DATE_TIME_PATTERN: &str = "%b %-d, %Y %H:%M";
const NO_DATE: &str = "No date";

/// One line of a record list.
pub struct RowData {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
}

impl RowData {
    pub fn contact(contact: &Contact) -> Self {
        let added = format!(
            "added {}",
            safe_format(&contact.created_at, DATE_PATTERN, NO_DATE)
        );
        let mut details: Vec<&str> = [&contact.company, &contact.email, &contact.phone]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .filter(|v| !v.trim().is_empty())
            .collect();
        details.push(&added);
        Self {
            id: contact.id,
            title: contact.display_name().to_string(),
            subtitle: details.join(" · "),
        }
    }

    pub fn deal(deal: &Deal) -> Self {
        let stage = deal.stage.as_ref().map_or("No stage", |s| s.label());
        let contact = deal
            .contact
            .as_ref()
            .map(|c| format!(" · {}", c.label()))
            .unwrap_or_default();
        Self {
            id: deal.id,
            title: deal.title.clone().unwrap_or_else(|| format!("Deal #{}", deal.id)),
            subtitle: format!(
                "{} · {stage} · {}% · closes {}{contact}",
                money(deal.value_or_zero()),
                deal.probability.unwrap_or(0),
                safe_format(&deal.expected_close_date, DATE_PATTERN, NO_DATE),
            ),
        }
    }

    pub fn activity(activity: &Activity) -> Self {
        let kind = activity.kind.as_ref().map_or("Activity", |k| k.label());
        let mut subtitle = safe_format(&activity.timestamp, DATE_TIME_PATTERN, NO_DATE);
        if let Some(contact) = &activity.contact {
            subtitle.push_str(&format!(" · contact {}", contact.label()));
        }
        if let Some(deal) = &activity.deal {
            subtitle.push_str(&format!(" · deal {}", deal.label()));
        }
        Self {
            id: activity.id,
            title: match activity.description.as_deref() {
                Some(text) if !text.trim().is_empty() => format!("{kind}: {text}"),
                _ => kind.to_string(),
            },
            subtitle,
        }
    }
}

fn money(value: f64) -> String {
    format!("${value:.2}")
}

/// A titled list of records with a per-row delete button.
pub struct RecordPage {
    root: gtk::Box,
    list: gtk::ListBox,
    status: gtk::Label,
}

impl RecordPage {
    pub fn new(empty_hint: &str) -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
        root.set_margin_top(16);
        root.set_margin_bottom(16);
        root.set_margin_start(16);
        root.set_margin_end(16);

        let status = gtk::Label::new(Some(empty_hint));
        status.add_css_class("dim-label");
        status.set_halign(gtk::Align::Start);
        root.append(&status);

        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .build();
        let list = gtk::ListBox::new();
        list.add_css_class("boxed-list");
        list.set_selection_mode(gtk::SelectionMode::None);
        list.set_valign(gtk::Align::Start);
        scroller.set_child(Some(&list));
        root.append(&scroller);

        Self { root, list, status }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    pub fn set_loading(&self) {
        self.status.set_label("Loading…");
    }

    pub fn set_error(&self, message: &str) {
        self.status.set_label(message);
    }

    pub fn set_rows(&self, rows: Vec<RowData>, on_delete: Rc<dyn Fn(i64)>) {
        while let Some(child) = self.list.first_child() {
            self.list.remove(&child);
        }
        self.status.set_label(&match rows.len() {
            0 => "Nothing here yet.".to_string(),
            1 => "1 record".to_string(),
            n => format!("{n} records"),
        });
        for data in rows {
            let row = adw::ActionRow::builder()
                .title(glib::markup_escape_text(&data.title).as_str())
                .subtitle(glib::markup_escape_text(&data.subtitle).as_str())
                .build();
            let delete = gtk::Button::from_icon_name("user-trash-symbolic");
            delete.set_valign(gtk::Align::Center);
            delete.add_css_class("flat");
            delete.set_tooltip_text(Some("Delete"));
            let on_delete = on_delete.clone();
            let id = data.id;
            delete.connect_clicked(move |_| on_delete(id));
            row.add_suffix(&delete);
            self.list.append(&row);
        }
    }
}

/// Headline figures plus the latest activities.
pub struct DashboardPage {
    root: gtk::Box,
    stats: gtk::Grid,
    recent: gtk::ListBox,
    status: gtk::Label,
}

impl DashboardPage {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 16);
        root.set_margin_top(16);
        root.set_margin_bottom(16);
        root.set_margin_start(16);
        root.set_margin_end(16);

        let status = gtk::Label::new(None);
        status.add_css_class("dim-label");
        status.set_halign(gtk::Align::Start);
        root.append(&status);

        let stats = gtk::Grid::new();
        stats.set_column_spacing(24);
        stats.set_row_spacing(12);
        root.append(&stats);

        let heading = gtk::Label::new(Some("Recent activity"));
        heading.add_css_class("title-4");
        heading.set_halign(gtk::Align::Start);
        root.append(&heading);

        let recent = gtk::ListBox::new();
        recent.add_css_class("boxed-list");
        recent.set_selection_mode(gtk::SelectionMode::None);
        root.append(&recent);

        Self {
            root,
            stats,
            recent,
            status,
        }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    pub fn set_loading(&self) {
        self.status.set_label("Loading…");
    }

    pub fn set_error(&self, message: &str) {
        self.status.set_label(message);
    }

    pub fn set_summary(&self, summary: &DashboardSummary) {
        self.status.set_label("");
        while let Some(child) = self.stats.first_child() {
            self.stats.remove(&child);
        }
        let win_rate = summary
            .win_rate()
            .map_or_else(|| "n/a".to_string(), |rate| format!("{rate:.0}%"));
        let cards = [
            ("Contacts", summary.contact_count.to_string()),
            ("Open deals", summary.open_deal_count.to_string()),
            ("Pipeline", money(summary.pipeline_value)),
            ("Weighted", money(summary.weighted_pipeline_value)),
            ("Won", money(summary.won_value)),
            ("Win rate", win_rate),
        ];
        for (index, (caption, value)) in cards.into_iter().enumerate() {
            let card = gtk::Box::new(gtk::Orientation::Vertical, 4);
            card.add_css_class("card");
            card.set_hexpand(true);
            let value_label = gtk::Label::new(Some(value.as_str()));
            value_label.add_css_class("title-2");
            value_label.set_margin_top(12);
            let caption_label = gtk::Label::new(Some(caption));
            caption_label.add_css_class("dim-label");
            caption_label.set_margin_bottom(12);
            card.append(&value_label);
            card.append(&caption_label);
            self.stats
                .attach(&card, (index % 3) as i32, (index / 3) as i32, 1, 1);
        }

        while let Some(child) = self.recent.first_child() {
            self.recent.remove(&child);
        }
        for activity in &summary.recent_activities {
            let data = RowData::activity(activity);
            let row = adw::ActionRow::builder()
                .title(glib::markup_escape_text(&data.title).as_str())
                .subtitle(glib::markup_escape_text(&data.subtitle).as_str())
                .build();
            self.recent.append(&row);
        }
    }
}
