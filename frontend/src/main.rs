mod api;
mod components;

use components::comparison::render_comparison;
use components::header::render_header;
use components::phase_selector::render_phase_selector;
use components::progress_bar::render_progress_bar;
use components::upload_section::render_upload_section;
use components::utils::{first_image_file, render_error_message};
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::Interval;
use shared::session::{PROGRESS_TICK_MS, STATUS_POLL_MS, Session};
use shared::{ConnectionState, ProcessingPhase, ProcessingResult};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

/// Selected file plus the object URL backing its preview. Dropping it
/// revokes the URL.
pub struct LocalFile {
    file: GlooFile,
    preview_url: ObjectUrl,
}

pub enum Msg {
    // File operations
    FileChosen(GlooFile),
    Reset,

    // Processing
    SetPhase(ProcessingPhase),
    Process,
    ProgressTick,
    Processed(ProcessingResult),
    ProcessFailed(String),

    // Server status
    RefreshStatus,
    StatusChecked(bool, ConnectionState),

    // UI states
    SetError(Option<String>),
    SetDragging(bool),

    // Input events
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

pub struct Model {
    session: Session<LocalFile>,
    is_dragging: bool,
    paste_listener: Option<EventListener>,
    progress_timer: Option<Interval>,
    status_poll: Option<Interval>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut model = Self {
            session: Session::default(),
            is_dragging: false,
            paste_listener: None,
            progress_timer: None,
            status_poll: None,
        };

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            model.paste_listener = Some(listener);
        }

        let link = ctx.link().clone();
        model.status_poll = Some(Interval::new(STATUS_POLL_MS, move || {
            link.send_message(Msg::RefreshStatus);
        }));
        ctx.link().send_message(Msg::RefreshStatus);

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileChosen(file) => self.handle_file_chosen(file),
            Msg::Reset => self.handle_reset(),

            Msg::SetPhase(phase) => {
                self.session.set_phase(phase);
                true
            }
            Msg::Process => self.handle_process(ctx),
            Msg::ProgressTick => {
                if !self.session.tick_progress() {
                    self.progress_timer = None;
                }
                true
            }
            Msg::Processed(result) => {
                self.progress_timer = None;
                self.session.complete(result);
                true
            }
            Msg::ProcessFailed(message) => {
                self.progress_timer = None;
                self.session.fail(message);
                true
            }

            Msg::RefreshStatus => {
                self.refresh_status(ctx);
                false
            }
            Msg::StatusChecked(backend_online, processor) => {
                self.session.update_status(backend_online, processor);
                true
            }

            Msg::SetError(error) => {
                self.session.set_error(error);
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }

            Msg::HandleDrop(event) => self.handle_drop(ctx, event),
            Msg::HandlePaste(event) => self.handle_paste(ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let has_results = self.session.comparison().has_images();
        let busy = self.session.is_loading();

        html! {
            <div class="container">
                { render_header(self.session.status()) }

                <main class="main-content">
                    <section class="control-panel">
                        <h2>{"Image Processing Controls"}</h2>
                        { render_upload_section(self, ctx) }
                        { render_phase_selector(self.session.phase(), self.session.selected().is_none() || busy, link) }

                        <div class="button-container">
                            <button
                                class="analyze-btn"
                                onclick={link.callback(|_| Msg::Process)}
                                disabled={self.session.selected().is_none() || busy}
                            >
                                {
                                    if busy {
                                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Processing..."}</> }
                                    } else {
                                        html! { <><i class="fa-solid fa-wand-magic-sparkles"></i>{" Process Image"}</> }
                                    }
                                }
                            </button>
                            if self.session.selected().is_some() || has_results {
                                <button
                                    class="analyze-btn"
                                    style="background-color: var(--clear-color);"
                                    onclick={link.callback(|_| Msg::Reset)}
                                    disabled={busy}
                                >
                                    <i class="fa-solid fa-rotate-left"></i>{" Reset All"}
                                </button>
                            }
                        </div>

                        { render_progress_bar(self.session.progress()) }
                        { render_error_message(self.session.error()) }
                    </section>

                    <section class="results-panel">
                        <h2>{"Image Comparison"}</h2>
                        { render_comparison(self.session.comparison()) }
                    </section>
                </main>

                <footer class="app-footer">
                    <p>{"CT Scan Image Processing Simulator | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.status_poll = None;
        self.progress_timer = None;
        self.paste_listener = None;
    }
}

// Handler methods
impl Model {
    fn handle_file_chosen(&mut self, file: GlooFile) -> bool {
        let name = file.name();
        let size = file.size();
        let mime = file.raw_mime_type();
        let preview_url = ObjectUrl::from(file.clone());

        if let Err(e) = self
            .session
            .select_file(name, size, mime, LocalFile { file, preview_url })
        {
            log::warn!("File rejected: {}", e);
        }
        true
    }

    fn handle_reset(&mut self) -> bool {
        self.progress_timer = None;
        self.session.reset();
        true
    }

    fn handle_process(&mut self, ctx: &Context<Self>) -> bool {
        if self.session.begin_processing().is_err() {
            return true;
        }

        let Some(selected) = self.session.selected() else {
            return true;
        };
        let file = selected.preview.file.clone();
        let phase = self.session.phase();

        let link = ctx.link().clone();
        self.progress_timer = Some(Interval::new(PROGRESS_TICK_MS, move || {
            link.send_message(Msg::ProgressTick);
        }));

        let link = ctx.link().clone();
        spawn_local(async move {
            match api::process_image(&file, phase).await {
                Ok(result) => link.send_message(Msg::Processed(result)),
                Err(message) => link.send_message(Msg::ProcessFailed(message)),
            }
        });

        true
    }

    fn refresh_status(&self, ctx: &Context<Self>) {
        let link = ctx.link().clone();
        spawn_local(async move {
            let backend_online = api::backend_health().await.is_ok();
            let processor = if backend_online {
                api::python_status()
                    .await
                    .map(|status| status.status)
                    .unwrap_or(ConnectionState::Disconnected)
            } else {
                ConnectionState::Disconnected
            };
            link.send_message(Msg::StatusChecked(backend_online, processor));
        });
    }

    fn handle_drop(&mut self, ctx: &Context<Self>, event: DragEvent) -> bool {
        event.prevent_default();
        self.is_dragging = false;

        if let Some(file_list) = event.data_transfer().and_then(|dt| dt.files()) {
            self.accept_file_list(ctx, &file_list);
        }

        true
    }

    fn handle_paste(&mut self, ctx: &Context<Self>, event: ClipboardEvent) -> bool {
        if let Some(file_list) = event.clipboard_data().and_then(|dt| dt.files()) {
            if file_list.length() > 0 {
                event.prevent_default();
                self.accept_file_list(ctx, &file_list);
                return true;
            }
        }
        false
    }

    fn accept_file_list(&self, ctx: &Context<Self>, file_list: &web_sys::FileList) {
        match first_image_file(file_list) {
            Some(file) => ctx.link().send_message(Msg::FileChosen(file)),
            None => ctx.link().send_message(Msg::SetError(Some(
                "Please select a valid image file (JPG, PNG, GIF)".into(),
            ))),
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<Model>::new().render();
}
