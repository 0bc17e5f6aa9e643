/// Full-page bookmark manager: spaces, groups, open tabs and import/export

use chrono::Utc;
use patternfly_yew::prelude::*;
use std::collections::HashSet;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use super::components::{ColorSelect, GroupCard, OpenTabsList, SpaceSidebar};
use crate::chrome::{self, Host, HostStorage};
use crate::drag::DragSession;
use crate::error::{BookmarkError, HostError};
use crate::host::{BookmarkTreeNode, TabHostApi};
use crate::ids::now_iso;
use crate::importer;
use crate::model::{Bookmark, BookmarkGroup, DEFAULT_GROUP_COLOR, DEFAULT_SPACE_COLOR, NewBookmark, Space};
use crate::reconcile;
use crate::settings::{LinkTarget, SettingsStore, Theme};
use crate::store::{BookmarkStore, Direction};
use crate::tabs::{OpenTab, bookmarkable_tabs};

#[derive(Properties)]
pub struct ManagerProps {
    pub store: BookmarkStore<HostStorage>,
    pub settings: SettingsStore<HostStorage>,
    pub host: Rc<Host>,
}

impl PartialEq for ManagerProps {
    fn eq(&self, other: &Self) -> bool {
        self.store == other.store && Rc::ptr_eq(&self.host, &other.host)
    }
}

#[derive(Clone, PartialEq)]
enum Notice {
    Success(String),
    Error(String),
}

#[derive(Clone, PartialEq)]
enum Dialog {
    Closed,
    CreateSpace,
    CreateGroup,
    EditSpace(Space),
    EditGroup(BookmarkGroup),
    AddBookmark { group_id: String },
    EditBookmark { group_id: String, bookmark: Bookmark },
    ImportFolders(Vec<BookmarkTreeNode>),
    Settings,
}

fn report(notice: &UseStateHandle<Option<Notice>>, result: Result<(), BookmarkError>) {
    if let Err(e) = result {
        log::error!("{}", e);
        notice.set(Some(Notice::Error(e.to_string())));
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|m| m.matches())
        .unwrap_or(false)
}

fn text_input(value: &UseStateHandle<String>) -> Callback<InputEvent> {
    let value = value.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
            value.set(input.value());
        }
    })
}

fn select_value(e: &Event) -> Option<String> {
    e.target_dyn_into::<HtmlSelectElement>().map(|select| select.value())
}

fn load_tabs(host: Rc<Host>, all_tabs: UseStateHandle<Vec<OpenTab>>) {
    spawn_local(async move {
        match host.tabs.current_window_tabs().await {
            Ok(tabs) => all_tabs.set(tabs),
            Err(e) => log::error!("Failed to get tabs: {}", e),
        }
    });
}

fn folder_tree(nodes: &[BookmarkTreeNode], selected: &HashSet<String>, on_toggle: &Callback<String>) -> Html {
    html! {
        <ul class="folder-tree">
            {for nodes.iter().filter(|n| n.is_folder()).map(|node| {
                let onchange = on_toggle.reform({
                    let id = node.id.clone();
                    move |_: Event| id.clone()
                });
                let title = if node.title.is_empty() { "Untitled folder".to_string() } else { node.title.clone() };
                html! {
                    <li key={node.id.clone()}>
                        <label class="folder-option">
                            <input type="checkbox" checked={selected.contains(&node.id)} {onchange} />
                            {title}
                        </label>
                        if !node.children().is_empty() {
                            {folder_tree(node.children(), selected, on_toggle)}
                        }
                    </li>
                }
            })}
        </ul>
    }
}

#[function_component(Manager)]
pub fn manager(props: &ManagerProps) -> Html {
    let spaces = use_state(|| props.store.spaces());
    let active_space_id = use_state(|| props.store.active_space_id());
    let settings = use_state(|| props.settings.settings());
    let loading = use_state(|| true);
    let notice = use_state(|| None::<Notice>);
    let dialog = use_state(|| Dialog::Closed);
    let all_tabs = use_state(Vec::<OpenTab>::new);
    let saved_tab_ids = use_state(HashSet::<i32>::new);
    let drag = use_mut_ref(DragSession::default);
    let drop_target = use_state(|| None::<String>);
    let form_name = use_state(String::new);
    let form_color = use_state(|| DEFAULT_GROUP_COLOR.to_string());
    let form_title = use_state(String::new);
    let form_url = use_state(String::new);
    let selected_folders = use_state(HashSet::<String>::new);

    // Load everything once on mount
    {
        let store = props.store.clone();
        let settings_store = props.settings.clone();
        let host = props.host.clone();
        let spaces = spaces.clone();
        let active_space_id = active_space_id.clone();
        let settings = settings.clone();
        let loading = loading.clone();
        let notice = notice.clone();
        let all_tabs = all_tabs.clone();

        use_effect_with((), move |_| {
            store.subscribe(move |new_spaces, active| {
                spaces.set(new_spaces.to_vec());
                active_space_id.set(active.to_string());
            });

            {
                let store = store.clone();
                chrome::on_spaces_refresh(move || {
                    let store = store.clone();
                    spawn_local(async move {
                        if let Err(e) = store.refresh().await {
                            log::error!("Failed to refresh spaces: {}", e);
                        }
                    });
                });
            }

            {
                let host = host.clone();
                let all_tabs = all_tabs.clone();
                chrome::on_tabs_changed(move || load_tabs(host.clone(), all_tabs.clone()));
            }
            load_tabs(host, all_tabs);

            spawn_local(async move {
                settings_store.hydrate().await;
                settings.set(settings_store.settings());

                if let Err(e) = store.hydrate().await {
                    log::error!("Failed to load bookmarks: {}", e);
                    notice.set(Some(Notice::Error(format!("Failed to load bookmarks: {}", e))));
                }
                loading.set(false);
            });
            || ()
        });
    }

    let active_space: Option<Space> = spaces
        .iter()
        .find(|s| s.id == *active_space_id)
        .or_else(|| spaces.first())
        .cloned();
    let space_id = active_space.as_ref().map(|s| s.id.clone()).unwrap_or_default();
    let offered_tabs = bookmarkable_tabs(&all_tabs, active_space.as_ref(), &saved_tab_ids);
    // editing stays off until the stored spaces have been read
    let load_failed = !*loading && !props.store.is_loaded();
    let editable = !*loading && !load_failed;

    let on_retry_load = {
        let store = props.store.clone();
        let notice = notice.clone();
        Callback::from(move |_: MouseEvent| {
            let store = store.clone();
            let notice = notice.clone();
            spawn_local(async move {
                match store.hydrate().await {
                    Ok(()) => notice.set(None),
                    Err(e) => notice.set(Some(Notice::Error(format!("Failed to load bookmarks: {}", e)))),
                }
            });
        })
    };

    // Spaces

    let on_select_space = {
        let store = props.store.clone();
        let notice = notice.clone();
        Callback::from(move |id: String| {
            let store = store.clone();
            let notice = notice.clone();
            spawn_local(async move {
                report(&notice, store.set_active_space(&id).await);
            });
        })
    };

    let on_delete_space = {
        let store = props.store.clone();
        let notice = notice.clone();
        Callback::from(move |id: String| {
            if !confirm("Are you sure you want to delete this space and all its groups?") {
                return;
            }
            let store = store.clone();
            let notice = notice.clone();
            spawn_local(async move {
                report(&notice, store.delete_space(&id).await);
            });
        })
    };

    let open_dialog = |target: Dialog, color: &'static str| {
        let dialog = dialog.clone();
        let form_name = form_name.clone();
        let form_color = form_color.clone();
        Callback::from(move |_: MouseEvent| {
            form_name.set(String::new());
            form_color.set(color.to_string());
            dialog.set(target.clone());
        })
    };
    let on_new_space = open_dialog(Dialog::CreateSpace, DEFAULT_SPACE_COLOR);
    let on_new_group = open_dialog(Dialog::CreateGroup, DEFAULT_GROUP_COLOR);

    let on_edit_space = {
        let spaces = spaces.clone();
        let dialog = dialog.clone();
        let form_name = form_name.clone();
        let form_color = form_color.clone();
        Callback::from(move |id: String| {
            if let Some(space) = spaces.iter().find(|s| s.id == id) {
                form_name.set(space.name.clone());
                form_color.set(space.color.clone());
                dialog.set(Dialog::EditSpace(space.clone()));
            }
        })
    };

    let on_edit_group = {
        let dialog = dialog.clone();
        let form_name = form_name.clone();
        let form_color = form_color.clone();
        let groups = active_space.as_ref().map(|s| s.groups.clone()).unwrap_or_default();
        Callback::from(move |group_id: String| {
            if let Some(group) = groups.iter().find(|g| g.id == group_id) {
                form_name.set(group.name.clone());
                form_color.set(group.color.clone());
                dialog.set(Dialog::EditGroup(group.clone()));
            }
        })
    };

    let on_close_dialog = {
        let dialog = dialog.clone();
        Callback::from(move |_: MouseEvent| dialog.set(Dialog::Closed))
    };

    let on_color = {
        let form_color = form_color.clone();
        Callback::from(move |color: String| form_color.set(color))
    };

    let on_submit_name = {
        let store = props.store.clone();
        let dialog = dialog.clone();
        let notice = notice.clone();
        let form_name = form_name.clone();
        let form_color = form_color.clone();
        let space_id = space_id.clone();
        Callback::from(move |_: MouseEvent| {
            let store = store.clone();
            let dialog = dialog.clone();
            let notice = notice.clone();
            let name = (*form_name).clone();
            let color = (*form_color).clone();
            let space_id = space_id.clone();
            let target = (*dialog).clone();
            spawn_local(async move {
                let result = match target {
                    Dialog::CreateSpace => store.create_space(&name, &color).await.map(|_| ()),
                    Dialog::CreateGroup => store.create_group(&space_id, &name, &color).await.map(|_| ()),
                    Dialog::EditSpace(space) => store.update_space(Space { name, color, ..space }).await,
                    Dialog::EditGroup(group) => {
                        store
                            .update_group(&space_id, BookmarkGroup { name, color, ..group })
                            .await
                    }
                    _ => return,
                };
                // keep the dialog open so the name can be fixed
                match result {
                    Ok(()) => dialog.set(Dialog::Closed),
                    Err(e) => notice.set(Some(Notice::Error(e.to_string()))),
                }
            });
        })
    };

    // Groups and bookmarks

    let on_toggle_group = {
        let store = props.store.clone();
        let notice = notice.clone();
        let space_id = space_id.clone();
        Callback::from(move |group_id: String| {
            let store = store.clone();
            let notice = notice.clone();
            let space_id = space_id.clone();
            spawn_local(async move {
                report(&notice, store.toggle_group(&space_id, &group_id).await.map(|_| ()));
            });
        })
    };

    let on_delete_group = {
        let store = props.store.clone();
        let notice = notice.clone();
        let space_id = space_id.clone();
        Callback::from(move |group_id: String| {
            if !confirm("Are you sure you want to delete this group and all its bookmarks?") {
                return;
            }
            let store = store.clone();
            let notice = notice.clone();
            let space_id = space_id.clone();
            spawn_local(async move {
                report(&notice, store.delete_group(&space_id, &group_id).await);
            });
        })
    };

    let on_move_group = {
        let store = props.store.clone();
        let notice = notice.clone();
        let space_id = space_id.clone();
        Callback::from(move |(group_id, direction): (String, Direction)| {
            let store = store.clone();
            let notice = notice.clone();
            let space_id = space_id.clone();
            spawn_local(async move {
                report(&notice, store.move_group(&space_id, &group_id, direction).await.map(|_| ()));
            });
        })
    };

    let on_open = {
        let link_target = settings.link_target;
        Callback::from(move |url: String| chrome::open_url(&url, link_target.as_str()))
    };

    let on_bookmark_move = {
        let store = props.store.clone();
        let notice = notice.clone();
        let space_id = space_id.clone();
        Callback::from(move |(group_id, bookmark_id, direction): (String, String, Direction)| {
            let store = store.clone();
            let notice = notice.clone();
            let space_id = space_id.clone();
            spawn_local(async move {
                let result = store.move_bookmark(&space_id, &group_id, &bookmark_id, direction).await;
                report(&notice, result.map(|_| ()));
            });
        })
    };

    let on_add_bookmark = {
        let dialog = dialog.clone();
        let form_title = form_title.clone();
        let form_url = form_url.clone();
        Callback::from(move |group_id: String| {
            form_title.set(String::new());
            form_url.set(String::new());
            dialog.set(Dialog::AddBookmark { group_id });
        })
    };

    let on_bookmark_edit = {
        let dialog = dialog.clone();
        let form_title = form_title.clone();
        let form_url = form_url.clone();
        Callback::from(move |(group_id, bookmark): (String, Bookmark)| {
            form_title.set(bookmark.title.clone());
            form_url.set(bookmark.url.clone());
            dialog.set(Dialog::EditBookmark { group_id, bookmark });
        })
    };

    let on_save_bookmark = {
        let store = props.store.clone();
        let dialog = dialog.clone();
        let notice = notice.clone();
        let form_title = form_title.clone();
        let form_url = form_url.clone();
        let space_id = space_id.clone();
        Callback::from(move |_: MouseEvent| {
            let title = (*form_title).clone();
            let url = (*form_url).clone();
            let target = (*dialog).clone();
            let store = store.clone();
            let dialog = dialog.clone();
            let notice = notice.clone();
            let space_id = space_id.clone();
            spawn_local(async move {
                let result = match target {
                    Dialog::EditBookmark { group_id, bookmark } => {
                        store
                            .update_bookmark(&space_id, &group_id, Bookmark { title, url, ..bookmark })
                            .await
                    }
                    Dialog::AddBookmark { group_id } => {
                        let new = NewBookmark {
                            title,
                            url,
                            created_at: now_iso(),
                        };
                        store.add_bookmark(&space_id, &group_id, new).await.map(|_| ())
                    }
                    _ => return,
                };
                match result {
                    Ok(()) => dialog.set(Dialog::Closed),
                    Err(e) => notice.set(Some(Notice::Error(e.to_string()))),
                }
            });
        })
    };

    let on_bookmark_delete = {
        let store = props.store.clone();
        let notice = notice.clone();
        let space_id = space_id.clone();
        Callback::from(move |(group_id, bookmark_id): (String, String)| {
            if !confirm("Are you sure you want to delete this bookmark?") {
                return;
            }
            let store = store.clone();
            let notice = notice.clone();
            let space_id = space_id.clone();
            spawn_local(async move {
                report(&notice, store.delete_bookmark(&space_id, &group_id, &bookmark_id).await);
            });
        })
    };

    // Dragging tabs onto groups

    let on_drag_start = {
        let drag = drag.clone();
        Callback::from(move |tab: OpenTab| drag.borrow_mut().start(tab))
    };

    let on_drag_end = {
        let drag = drag.clone();
        let drop_target = drop_target.clone();
        Callback::from(move |_: ()| {
            drag.borrow_mut().cancel();
            drop_target.set(None);
        })
    };

    let on_drag_over = {
        let drag = drag.clone();
        let drop_target = drop_target.clone();
        Callback::from(move |group_id: String| {
            let mut session = drag.borrow_mut();
            session.over(&group_id);
            let active = session.active_group().map(str::to_string);
            if *drop_target != active {
                drop_target.set(active);
            }
        })
    };

    let on_drag_leave = {
        let drag = drag.clone();
        let drop_target = drop_target.clone();
        Callback::from(move |_: ()| {
            drag.borrow_mut().leave();
            drop_target.set(None);
        })
    };

    let on_drop = {
        let drag = drag.clone();
        let drop_target = drop_target.clone();
        let store = props.store.clone();
        let notice = notice.clone();
        let saved_tab_ids = saved_tab_ids.clone();
        let space_id = space_id.clone();
        Callback::from(move |group_id: String| {
            drop_target.set(None);
            let Some(tab_drop) = drag.borrow_mut().end(Some(&group_id)) else {
                return;
            };
            let store = store.clone();
            let notice = notice.clone();
            let saved_tab_ids = saved_tab_ids.clone();
            let space_id = space_id.clone();
            let mut saved = (*saved_tab_ids).clone();
            spawn_local(async move {
                match store.bookmark_tab(&space_id, &tab_drop.group_id, &tab_drop.tab).await {
                    Ok(_) => {
                        saved.insert(tab_drop.tab.id);
                        saved_tab_ids.set(saved);
                    }
                    Err(e) => notice.set(Some(Notice::Error(e.to_string()))),
                }
            });
        })
    };

    // Import / export

    let on_export = {
        let store = props.store.clone();
        let settings_store = props.settings.clone();
        let notice = notice.clone();
        Callback::from(move |_: MouseEvent| {
            let document = store.export(&settings_store.settings());
            match reconcile::export_json(&document) {
                Ok(json) => {
                    chrome::export_to_file(&json, &reconcile::export_file_name(Utc::now()));
                    notice.set(Some(Notice::Success("Bookmarks exported successfully".to_string())));
                }
                Err(e) => {
                    log::error!("Export failed: {}", e);
                    notice.set(Some(Notice::Error("Failed to export bookmarks".to_string())));
                }
            }
        })
    };

    let on_import_file = {
        let store = props.store.clone();
        let notice = notice.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let store = store.clone();
            let notice = notice.clone();
            spawn_local(async move {
                let text = match chrome::read_file(&input).await {
                    Ok(text) => text,
                    Err(e) => {
                        notice.set(Some(Notice::Error(e.to_string())));
                        return;
                    }
                };
                // allow the same file to be chosen again
                input.set_value("");

                let result = match reconcile::parse_import(&text) {
                    Ok(document) => store.import_document(&document).await,
                    Err(e) => Err(e.into()),
                };
                match result {
                    Ok(summary) => notice.set(Some(Notice::Success(format!(
                        "Bookmarks imported successfully: {} spaces, {} groups, {} bookmarks",
                        summary.spaces_added, summary.groups_added, summary.bookmarks_added
                    )))),
                    Err(e) => notice.set(Some(Notice::Error(e.to_string()))),
                }
            });
        })
    };

    let on_pick_folders = {
        let host = props.host.clone();
        let dialog = dialog.clone();
        let notice = notice.clone();
        let selected_folders = selected_folders.clone();
        Callback::from(move |_: MouseEvent| {
            let host = host.clone();
            let dialog = dialog.clone();
            let notice = notice.clone();
            let selected_folders = selected_folders.clone();
            spawn_local(async move {
                let Some(bookmarks) = host.bookmarks.as_ref() else {
                    notice.set(Some(Notice::Error(HostError::Unavailable.to_string())));
                    return;
                };
                match importer::list_folders(bookmarks).await {
                    Ok(folders) => {
                        selected_folders.set(HashSet::new());
                        dialog.set(Dialog::ImportFolders(folders));
                    }
                    Err(e) => notice.set(Some(Notice::Error(e.to_string()))),
                }
            });
        })
    };

    let on_toggle_folder = {
        let selected_folders = selected_folders.clone();
        Callback::from(move |id: String| {
            let mut selected = (*selected_folders).clone();
            if !selected.remove(&id) {
                selected.insert(id);
            }
            selected_folders.set(selected);
        })
    };

    let on_import_folders = {
        let store = props.store.clone();
        let settings_store = props.settings.clone();
        let settings = settings.clone();
        let host = props.host.clone();
        let dialog = dialog.clone();
        let notice = notice.clone();
        let selected_folders = selected_folders.clone();
        let space_id = space_id.clone();
        Callback::from(move |_: MouseEvent| {
            let folder_ids: Vec<String> = selected_folders.iter().cloned().collect();
            let store = store.clone();
            let settings_store = settings_store.clone();
            let settings = settings.clone();
            let host = host.clone();
            let dialog = dialog.clone();
            let notice = notice.clone();
            let space_id = space_id.clone();
            spawn_local(async move {
                let summary = store.import_folders(host.bookmarks.as_ref(), &folder_ids, &space_id).await;
                dialog.set(Dialog::Closed);
                notice.set(Some(Notice::Success(format!(
                    "Imported {} folders with {} bookmarks",
                    summary.groups_added, summary.bookmarks_added
                ))));
                if !settings_store.settings().has_completed_setup {
                    settings_store.complete_setup().await;
                    settings.set(settings_store.settings());
                }
            });
        })
    };

    // Settings

    let on_skip_setup = {
        let settings_store = props.settings.clone();
        let settings = settings.clone();
        Callback::from(move |_: MouseEvent| {
            let settings_store = settings_store.clone();
            let settings = settings.clone();
            spawn_local(async move {
                settings_store.complete_setup().await;
                settings.set(settings_store.settings());
            });
        })
    };

    let on_toggle_theme = {
        let settings_store = props.settings.clone();
        let settings = settings.clone();
        Callback::from(move |_: MouseEvent| {
            let settings_store = settings_store.clone();
            let settings = settings.clone();
            spawn_local(async move {
                settings_store.toggle_theme().await;
                settings.set(settings_store.settings());
            });
        })
    };

    let on_toggle_panel = {
        let settings_store = props.settings.clone();
        let settings = settings.clone();
        Callback::from(move |_: MouseEvent| {
            let settings_store = settings_store.clone();
            let settings = settings.clone();
            spawn_local(async move {
                settings_store.toggle_right_panel().await;
                settings.set(settings_store.settings());
            });
        })
    };

    let on_open_settings = {
        let dialog = dialog.clone();
        Callback::from(move |_: MouseEvent| dialog.set(Dialog::Settings))
    };

    let on_theme_change = {
        let settings_store = props.settings.clone();
        let settings = settings.clone();
        Callback::from(move |e: Event| {
            let Some(theme) = select_value(&e).as_deref().and_then(Theme::from_name) else {
                return;
            };
            let settings_store = settings_store.clone();
            let settings = settings.clone();
            spawn_local(async move {
                settings_store.set_theme(theme).await;
                settings.set(settings_store.settings());
            });
        })
    };

    let on_link_target_change = {
        let settings_store = props.settings.clone();
        let settings = settings.clone();
        Callback::from(move |e: Event| {
            let mut updated = settings_store.settings();
            updated.link_target = match select_value(&e).as_deref() {
                Some("_self") => LinkTarget::CurrentTab,
                _ => LinkTarget::NewTab,
            };
            let settings_store = settings_store.clone();
            let settings = settings.clone();
            spawn_local(async move {
                settings_store.update(updated).await;
                settings.set(settings_store.settings());
            });
        })
    };

    let on_dismiss = {
        let notice = notice.clone();
        Callback::from(move |_: MouseEvent| notice.set(None))
    };

    let theme_class = if settings.theme.is_dark(prefers_dark()) { "theme-dark" } else { "theme-light" };

    let render_dialog = match (*dialog).clone() {
        Dialog::Closed => html! {},
        Dialog::CreateSpace | Dialog::CreateGroup | Dialog::EditSpace(_) | Dialog::EditGroup(_) => {
            let (title, action) = match *dialog {
                Dialog::CreateSpace => ("New space", "Create"),
                Dialog::CreateGroup => ("New group", "Create"),
                Dialog::EditSpace(_) => ("Space settings", "Save"),
                _ => ("Group settings", "Save"),
            };
            html! {
                <div class="dialog">
                    <h2 class="dialog-title">{title}</h2>
                    <input
                        type="text"
                        placeholder="Name"
                        maxlength="30"
                        value={(*form_name).clone()}
                        oninput={text_input(&form_name)}
                        class="dialog-input"
                    />
                    <ColorSelect value={(*form_color).clone()} onchange={on_color.clone()} />
                    <div class="dialog-actions">
                        <Button onclick={on_submit_name.clone()} variant={ButtonVariant::Primary}>{action}</Button>
                        <Button onclick={on_close_dialog.clone()} variant={ButtonVariant::Secondary}>{"Cancel"}</Button>
                    </div>
                </div>
            }
        }
        Dialog::AddBookmark { .. } | Dialog::EditBookmark { .. } => html! {
            <div class="dialog">
                <h2 class="dialog-title">
                    {if matches!(*dialog, Dialog::AddBookmark { .. }) { "Add bookmark" } else { "Edit bookmark" }}
                </h2>
                <input
                    type="text"
                    placeholder="Title"
                    value={(*form_title).clone()}
                    oninput={text_input(&form_title)}
                    class="dialog-input"
                />
                <input
                    type="url"
                    placeholder="https://"
                    value={(*form_url).clone()}
                    oninput={text_input(&form_url)}
                    class="dialog-input"
                />
                <div class="dialog-actions">
                    <Button onclick={on_save_bookmark.clone()} variant={ButtonVariant::Primary}>{"Save"}</Button>
                    <Button onclick={on_close_dialog.clone()} variant={ButtonVariant::Secondary}>{"Cancel"}</Button>
                </div>
            </div>
        },
        Dialog::ImportFolders(folders) => html! {
            <div class="dialog">
                <h2 class="dialog-title">{"Import Chrome bookmark folders"}</h2>
                if folders.is_empty() {
                    <p class="empty-state-hint">{"No bookmark folders found."}</p>
                } else {
                    {folder_tree(&folders, &selected_folders, &on_toggle_folder)}
                }
                <div class="dialog-actions">
                    <Button
                        onclick={on_import_folders.clone()}
                        disabled={selected_folders.is_empty()}
                        variant={ButtonVariant::Primary}
                    >
                        {format!("Import {} folders", selected_folders.len())}
                    </Button>
                    <Button onclick={on_close_dialog.clone()} variant={ButtonVariant::Secondary}>{"Cancel"}</Button>
                </div>
            </div>
        },
        Dialog::Settings => html! {
            <div class="dialog">
                <h2 class="dialog-title">{"Settings"}</h2>
                <label class="form-label">{"Theme"}</label>
                <select class="dialog-input" onchange={on_theme_change}>
                    {for Theme::ALL.into_iter().map(|theme| html! {
                        <option value={theme.as_str()} selected={settings.theme == theme}>{theme.label()}</option>
                    })}
                </select>
                <label class="form-label">{"Open bookmarks in"}</label>
                <select class="dialog-input" onchange={on_link_target_change}>
                    <option value="_blank" selected={settings.link_target == LinkTarget::NewTab}>{"New tab"}</option>
                    <option value="_self" selected={settings.link_target == LinkTarget::CurrentTab}>{"Current tab"}</option>
                </select>
                <div class="dialog-actions">
                    <Button onclick={on_close_dialog.clone()} variant={ButtonVariant::Secondary}>{"Close"}</Button>
                </div>
            </div>
        },
    };

    html! {
        <div class={classes!("manager", theme_class)}>
            <header class="manager-header">
                <h1 class="manager-title">{"Spaces"}</h1>
                <div class="header-actions">
                    <Button onclick={on_export} disabled={!editable} variant={ButtonVariant::Secondary}>{"Export"}</Button>
                    <label class="import-file">
                        {"Import"}
                        <input type="file" accept=".json,application/json" disabled={!editable} onchange={on_import_file} />
                    </label>
                    <Button onclick={on_pick_folders.clone()} disabled={!editable} variant={ButtonVariant::Secondary}>
                        {"Import Chrome bookmarks"}
                    </Button>
                    <Button onclick={on_open_settings} variant={ButtonVariant::Plain}>{"⚙ Settings"}</Button>
                    <Button onclick={on_toggle_theme} variant={ButtonVariant::Plain}>
                        {if settings.theme.is_dark(prefers_dark()) { "☀️" } else { "🌙" }}
                    </Button>
                </div>
            </header>

            if let Some(current) = (*notice).clone() {
                {match current {
                    Notice::Success(message) => html! {
                        <Alert r#type={AlertType::Success} title={message} inline={true}>
                            <Button onclick={on_dismiss.clone()} variant={ButtonVariant::Link}>{"Dismiss"}</Button>
                        </Alert>
                    },
                    Notice::Error(message) => html! {
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {message}
                            <Button onclick={on_dismiss.clone()} variant={ButtonVariant::Link}>{"Dismiss"}</Button>
                        </Alert>
                    },
                }}
            }

            if editable && !settings.has_completed_setup {
                <div class="setup-banner">
                    <p>{"Welcome! Import your existing Chrome bookmarks to get started."}</p>
                    <Button onclick={on_pick_folders} variant={ButtonVariant::Primary}>{"Import bookmarks"}</Button>
                    <Button onclick={on_skip_setup} variant={ButtonVariant::Link}>{"Skip"}</Button>
                </div>
            }

            {render_dialog}

            <div class="manager-body">
                <aside class="manager-sidebar">
                    <SpaceSidebar
                        spaces={(*spaces).clone()}
                        active_space_id={space_id.clone()}
                        on_select={on_select_space}
                        on_edit={on_edit_space}
                        on_delete={on_delete_space}
                    />
                    <Button onclick={on_new_space} disabled={!editable} variant={ButtonVariant::Secondary} block={true}>
                        {"+ New space"}
                    </Button>
                </aside>

                <main class="manager-main">
                    if *loading {
                        <div class="loading-container">{"Loading bookmarks..."}</div>
                    } else if load_failed {
                        <div class="empty-state">
                            <p>{"Your bookmarks could not be loaded, so editing is disabled."}</p>
                            <Button onclick={on_retry_load} variant={ButtonVariant::Primary}>{"Try again"}</Button>
                        </div>
                    } else if let Some(space) = active_space {
                        <div class="space-header">
                            <h2 class="space-title">{&space.name}</h2>
                            <Button onclick={on_new_group} variant={ButtonVariant::Secondary}>{"+ New group"}</Button>
                        </div>
                        if space.groups.is_empty() {
                            <div class="empty-state">
                                <p>{"No groups in this space yet."}</p>
                            </div>
                        }
                        {for space.groups.iter().map(|group| html! {
                            <GroupCard
                                key={group.id.clone()}
                                group={group.clone()}
                                link_target={settings.link_target}
                                is_drop_target={drop_target.as_deref() == Some(group.id.as_str())}
                                on_toggle={on_toggle_group.clone()}
                                on_edit={on_edit_group.clone()}
                                on_add_bookmark={on_add_bookmark.clone()}
                                on_delete={on_delete_group.clone()}
                                on_move={on_move_group.clone()}
                                on_open={on_open.clone()}
                                on_bookmark_move={on_bookmark_move.clone()}
                                on_bookmark_edit={on_bookmark_edit.clone()}
                                on_bookmark_delete={on_bookmark_delete.clone()}
                                on_drag_over={on_drag_over.clone()}
                                on_drag_leave={on_drag_leave.clone()}
                                on_drop={on_drop.clone()}
                            />
                        })}
                    }
                </main>

                <aside class={classes!("manager-panel", settings.right_panel_collapsed.then_some("collapsed"))}>
                    <Button onclick={on_toggle_panel} variant={ButtonVariant::Plain}>
                        {if settings.right_panel_collapsed { "◀" } else { "▶" }}
                    </Button>
                    if !settings.right_panel_collapsed {
                        <OpenTabsList tabs={offered_tabs} {on_drag_start} {on_drag_end} />
                    }
                </aside>
            </div>
        </div>
    }
}
