/// Popup UI: bookmark the current tab into a space and group

use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::chrome::{self, HostStorage};
use crate::ids::now_iso;
use crate::model::{NewBookmark, Space};
use crate::store::BookmarkStore;

#[derive(Properties, PartialEq)]
pub struct PopupProps {
    pub store: BookmarkStore<HostStorage>,
}

#[derive(Clone, PartialEq)]
enum AppState {
    Loading,
    Idle,
    Saving,
    Saved(String),
    Error(String),
}

fn first_group_id(spaces: &[Space], space_id: &str) -> String {
    spaces
        .iter()
        .find(|s| s.id == space_id)
        .and_then(|s| s.groups.first())
        .map(|g| g.id.clone())
        .unwrap_or_default()
}

#[function_component(App)]
pub fn app(props: &PopupProps) -> Html {
    let state = use_state(|| AppState::Loading);
    let spaces = use_state(Vec::<Space>::new);
    let space_id = use_state(String::new);
    let group_id = use_state(String::new);
    let title = use_state(String::new);
    let url = use_state(String::new);

    // Load spaces and the current tab on mount
    {
        let store = props.store.clone();
        let state = state.clone();
        let spaces = spaces.clone();
        let space_id = space_id.clone();
        let group_id = group_id.clone();
        let title = title.clone();
        let url = url.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                if let Err(e) = store.hydrate().await {
                    state.set(AppState::Error(format!("Failed to load bookmarks: {}", e)));
                    return;
                }

                let loaded = store.spaces();
                let active = store.active_space_id();
                group_id.set(first_group_id(&loaded, &active));
                space_id.set(active);
                spaces.set(loaded);

                match chrome::active_tab().await {
                    Ok(Some(tab)) => {
                        title.set(tab.title);
                        url.set(tab.url);
                    }
                    Ok(None) => {}
                    Err(e) => log::warn!("No active tab: {}", e),
                }
                state.set(AppState::Idle);
            });
            || ()
        });
    }

    let on_space_change = {
        let spaces = spaces.clone();
        let space_id = space_id.clone();
        let group_id = group_id.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                let id = select.value();
                group_id.set(first_group_id(&spaces, &id));
                space_id.set(id);
            }
        })
    };

    let on_group_change = {
        let group_id = group_id.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                group_id.set(select.value());
            }
        })
    };

    let on_title_input = {
        let title = title.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                title.set(input.value());
            }
        })
    };

    let on_url_input = {
        let url = url.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                url.set(input.value());
            }
        })
    };

    let on_save = {
        let store = props.store.clone();
        let state = state.clone();
        let space_id = space_id.clone();
        let group_id = group_id.clone();
        let title = title.clone();
        let url = url.clone();

        Callback::from(move |_| {
            let store = store.clone();
            let state = state.clone();
            let space_id = (*space_id).clone();
            let group_id = (*group_id).clone();
            let new = NewBookmark {
                title: (*title).clone(),
                url: (*url).clone(),
                created_at: now_iso(),
            };

            state.set(AppState::Saving);

            spawn_local(async move {
                match store.add_bookmark(&space_id, &group_id, new).await {
                    Ok(bookmark) => {
                        chrome::notify_spaces_changed();
                        state.set(AppState::Saved(format!("Saved \"{}\"", bookmark.title)));
                    }
                    Err(e) => state.set(AppState::Error(e.to_string())),
                }
            });
        })
    };

    let on_open_manager = Callback::from(|_| chrome::open_manager());

    let current_space = spaces.iter().find(|s| s.id == *space_id).cloned();
    let already_saved = current_space
        .as_ref()
        .and_then(|s| s.group(&group_id))
        .is_some_and(|g| g.has_url(url.trim()));
    let is_busy = matches!(*state, AppState::Loading | AppState::Saving);

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Save bookmark"}</h1>

            {match &*state {
                AppState::Loading => html! {
                    <div class="loading-container">{"Loading..."}</div>
                },
                AppState::Saved(message) => html! {
                    <Alert r#type={AlertType::Success} title={message.clone()} inline={true}>
                    </Alert>
                },
                AppState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                AppState::Idle | AppState::Saving => html! {},
            }}

            if already_saved {
                <Alert r#type={AlertType::Warning} title={"This page is already in the selected group"} inline={true}>
                </Alert>
            }

            <div class="popup-form">
                <label class="form-label">{"Title"}</label>
                <input type="text" class="form-input" value={(*title).clone()} oninput={on_title_input} />

                <label class="form-label">{"URL"}</label>
                <input type="url" class="form-input" value={(*url).clone()} oninput={on_url_input} />

                <label class="form-label">{"Space"}</label>
                <select class="form-input" onchange={on_space_change}>
                    {for spaces.iter().map(|space| html! {
                        <option value={space.id.clone()} selected={space.id == *space_id}>
                            {&space.name}
                        </option>
                    })}
                </select>

                <label class="form-label">{"Group"}</label>
                <select class="form-input" onchange={on_group_change}>
                    {for current_space.iter().flat_map(|s| s.groups.iter()).map(|group| html! {
                        <option value={group.id.clone()} selected={group.id == *group_id}>
                            {&group.name}
                        </option>
                    })}
                </select>
            </div>

            <div class="flex-column-gap">
                <Button onclick={on_save} disabled={is_busy || group_id.is_empty()} variant={ButtonVariant::Primary} block={true}>
                    {"Save bookmark"}
                </Button>
                <Button onclick={on_open_manager} variant={ButtonVariant::Secondary} block={true}>
                    {"Open manager"}
                </Button>
            </div>

            <p class="footer-popup">
                {"Spaces Bookmarks v0.1.0"}
            </p>
        </div>
    }
}
