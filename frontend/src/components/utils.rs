use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FileList;
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        let mut timeout_ref = timeout.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        *timeout_ref = Some(Timeout::new(duration, move || {
            inner_callback();
        }));
    })
}

/// First entry of the list that declares an image MIME type.
pub fn first_image_file(file_list: &FileList) -> Option<GlooFile> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .find(|file| file.type_().starts_with("image/"))
        .map(GlooFile::from)
}

pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < KB * KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{:.2} MB", bytes / KB / KB)
    }
}

pub fn render_error_message(error: Option<&str>) -> Html {
    match error {
        Some(error_msg) => html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
            </div>
        },
        None => html! {},
    }
}
