mod pages;
mod status_bar;

pub use pages::PagesWidget;
pub use status_bar::StatusBarWidget;
