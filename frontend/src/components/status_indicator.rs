use shared::ConnectionState;
use shared::session::StatusSnapshot;
use yew::prelude::*;

pub fn render_status_indicator(status: StatusSnapshot) -> Html {
    if !status.checked {
        return html! {
            <div class="status-indicator checking">
                <i class="fa-solid fa-circle-notch fa-spin"></i>
                <span>{" Checking servers..."}</span>
            </div>
        };
    }

    html! {
        <div class="status-indicator">
            { render_dot("Backend", status.backend_online) }
            { render_dot("Processor", status.processor == ConnectionState::Connected) }
            if status.backend_online && status.processor == ConnectionState::Disconnected {
                <span class="status-note">{"Fallback processing active"}</span>
            }
        </div>
    }
}

fn render_dot(label: &str, online: bool) -> Html {
    html! {
        <span class={classes!("status-dot", if online { "online" } else { "offline" })}>
            <i class="fa-solid fa-circle"></i>
            { format!(" {}: {}", label, if online { "Online" } else { "Offline" }) }
        </span>
    }
}
