//! Messages flowing through the app loop.

use trunkdesk_core::ViewSnapshot;

use crate::bridge::ControllerRequest;

#[derive(Debug)]
pub enum Action {
    Quit,
    Tick,
    Render,
    Resize(u16, u16),
    ToggleHelp,
    /// Forward to the view controller task.
    Request(ControllerRequest),
    /// Published by the controller task after every request.
    ViewUpdated(Box<ViewSnapshot>),
}

impl From<ControllerRequest> for Action {
    fn from(request: ControllerRequest) -> Self {
        Self::Request(request)
    }
}
