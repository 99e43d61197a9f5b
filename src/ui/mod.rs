pub mod main_window;
pub mod pages;
pub mod settings;
pub mod sidebar;
