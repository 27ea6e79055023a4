use super::status_indicator::render_status_indicator;
use shared::session::StatusSnapshot;
use yew::prelude::*;

/// Renders the application header
pub fn render_header(status: StatusSnapshot) -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-x-ray"></i> {" CT Scan Phase Simulator"}</h1>
            <p class="subtitle">{"Upload a scan and preview it in arterial or venous phase"}</p>
            { render_status_indicator(status) }
        </header>
    }
}
