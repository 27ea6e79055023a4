use yew::prelude::*;

pub fn render_progress_bar(progress: u8) -> Html {
    if progress == 0 {
        return html! {};
    }

    html! {
        <div class="progress-container">
            <div class="meter">
                <div class="meter-fill" style={format!("width: {}%", progress)}></div>
            </div>
            <div class="meter-value">{format!("{}%", progress)}</div>
        </div>
    }
}
