use super::super::{Model, Msg};
use shared::{IntoEnumIterator, ProcessingPhase};
use yew::html::Scope;
use yew::prelude::*;

pub fn render_phase_selector(current: ProcessingPhase, disabled: bool, link: &Scope<Model>) -> Html {
    html! {
        <div class="phase-selector">
            <h3>{"Contrast Phase"}</h3>
            <div class="phase-options">
                { for ProcessingPhase::iter().map(|phase| {
                    let onchange = link.callback(move |_: Event| Msg::SetPhase(phase));
                    html! {
                        <label class={classes!("phase-option", (phase == current).then_some("selected"))}>
                            <input
                                type="radio"
                                name="phase"
                                value={phase.to_string()}
                                checked={phase == current}
                                {disabled}
                                {onchange}
                            />
                            <span class="phase-label">{ phase.label() }</span>
                            <span class="phase-description">{ phase.description() }</span>
                        </label>
                    }
                }) }
            </div>
        </div>
    }
}
