use super::super::{Model, Msg};
use super::utils::{debounce, first_image_file, format_file_size};
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div class="upload-section">
            { render_file_input_area(model, ctx) }
            { render_preview(model) }
        </div>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let disabled = model.session.is_loading();

    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().as_ref().and_then(first_image_file);

        input.set_value("");

        match file {
            Some(file) => Msg::FileChosen(file),
            None => Msg::SetError(Some(
                "Please select a valid image file (JPG, PNG, GIF)".into(),
            )),
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_| {
        let input = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("file-input"))
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
        if let Some(input) = input {
            input.click();
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || {
                        if !disabled {
                            trigger_file_input.emit(())
                        }
                    }
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop a scan here, paste, or click"}</p>
                    <p class="file-types">{"Supported formats: JPG, PNG, GIF"}</p>
                </div>
            </div>
        </>
    }
}

fn render_preview(model: &Model) -> Html {
    let Some(selected) = model.session.selected() else {
        return html! {};
    };

    html! {
        <div class="preview-item selected">
            <img src={selected.preview.preview_url.to_string()} alt={selected.name.clone()} />
            <div class="preview-info">
                <span class="preview-name" title={selected.name.clone()}>{ &selected.name }</span>
                <span class="preview-size">{ format_file_size(selected.size) }</span>
            </div>
        </div>
    }
}
