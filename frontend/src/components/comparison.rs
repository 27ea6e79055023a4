use shared::session::{Comparison, ORIGINAL_DOWNLOAD_NAME};
use yew::prelude::*;

pub fn render_comparison(comparison: &Comparison) -> Html {
    let (Some(original), Some(processed)) = (&comparison.original, &comparison.processed) else {
        return html! {
            <div class="comparison-placeholder">
                <i class="fa-solid fa-images"></i>
                <p>{"Processed results will appear here"}</p>
            </div>
        };
    };

    let phase_label = comparison
        .phase
        .map(|phase| phase.label())
        .unwrap_or("Processed");

    html! {
        <div class={classes!("comparison-container", comparison.fallback.then_some("fallback"))}>
            if let Some(message) = &comparison.message {
                <p class="comparison-message">
                    if comparison.fallback {
                        <><i class="fa-solid fa-triangle-exclamation"></i>{" "}</>
                    }
                    { message }
                </p>
            }
            <div class="comparison-grid">
                <figure class="comparison-item">
                    <img src={original.to_src()} alt="Original scan" />
                    <figcaption>
                        {"Original"}
                        { render_download(&original.to_src(), ORIGINAL_DOWNLOAD_NAME) }
                    </figcaption>
                </figure>
                <figure class="comparison-item">
                    <img src={processed.to_src()} alt={format!("{} phase", phase_label)} />
                    <figcaption>
                        { format!("{} Phase", phase_label) }
                        { render_download(&processed.to_src(), &comparison.processed_download_name()) }
                    </figcaption>
                </figure>
            </div>
        </div>
    }
}

fn render_download(href: &str, file_name: &str) -> Html {
    html! {
        <a class="download-btn" href={href.to_string()} download={file_name.to_string()}>
            <i class="fa-solid fa-download"></i>{" Download"}
        </a>
    }
}

