//! Page components. The login screen sits outside the tab bar.

pub mod dashboard;
pub mod login;
pub mod records;

use strum::IntoEnumIterator;
use trunkdesk_core::Page;

use crate::component::Component;

/// One component per tab, in menu order.
pub fn create_screens() -> Vec<(Page, Box<dyn Component>)> {
    Page::iter()
        .map(|page| {
            let screen: Box<dyn Component> = match page.entity_kind() {
                None => Box::new(dashboard::DashboardScreen::new()),
                Some(kind) => Box::new(records::RecordsScreen::new(kind)),
            };
            (page, screen)
        })
        .collect()
}
