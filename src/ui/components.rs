/// Reusable UI components

use patternfly_yew::prelude::*;
use yew::prelude::*;

use crate::model::{Bookmark, BookmarkGroup, PALETTE, Space};
use crate::settings::LinkTarget;
use crate::store::Direction;
use crate::tabs::{OpenTab, display_host};

#[derive(Properties, PartialEq)]
pub struct ColorSelectProps {
    pub value: String,
    pub onchange: Callback<String>,
}

#[function_component(ColorSelect)]
pub fn color_select(props: &ColorSelectProps) -> Html {
    html! {
        <div class="color-select">
            {for PALETTE.iter().copied().map(|color| {
                let selected = props.value.eq_ignore_ascii_case(color);
                let onclick = props.onchange.reform(move |_: MouseEvent| color.to_string());
                html! {
                    <button
                        type="button"
                        class={classes!("color-swatch", selected.then_some("selected"))}
                        style={format!("background-color: {};", color)}
                        title={color}
                        {onclick}
                    />
                }
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SpaceSidebarProps {
    pub spaces: Vec<Space>,
    pub active_space_id: String,
    pub on_select: Callback<String>,
    pub on_edit: Callback<String>,
    pub on_delete: Callback<String>,
}

#[function_component(SpaceSidebar)]
pub fn space_sidebar(props: &SpaceSidebarProps) -> Html {
    html! {
        <nav class="space-sidebar">
            {for props.spaces.iter().map(|space| {
                let active = space.id == props.active_space_id;
                let on_select = props.on_select.reform({
                    let id = space.id.clone();
                    move |_: MouseEvent| id.clone()
                });
                let on_edit = props.on_edit.reform({
                    let id = space.id.clone();
                    move |_: MouseEvent| id.clone()
                });
                let on_delete = props.on_delete.reform({
                    let id = space.id.clone();
                    move |_: MouseEvent| id.clone()
                });
                html! {
                    <div key={space.id.clone()} class={classes!("space-item", active.then_some("active"))}>
                        <span class="space-dot" style={format!("background-color: {};", space.color)}></span>
                        <button type="button" class="space-name" onclick={on_select}>
                            {&space.name}
                        </button>
                        <span class="space-count">{space.bookmark_count()}</span>
                        <button type="button" class="space-edit" title="Space settings" onclick={on_edit}>
                            {"⚙"}
                        </button>
                        if props.spaces.len() > 1 {
                            <button type="button" class="space-delete" title="Delete space" onclick={on_delete}>
                                {"✗"}
                            </button>
                        }
                    </div>
                }
            })}
        </nav>
    }
}

#[derive(Properties, PartialEq)]
pub struct BookmarkTileProps {
    pub bookmark: Bookmark,
    pub link_target: LinkTarget,
    pub is_first: bool,
    pub is_last: bool,
    pub on_open: Callback<String>,
    pub on_move: Callback<(String, Direction)>,
    pub on_edit: Callback<Bookmark>,
    pub on_delete: Callback<String>,
}

#[function_component(BookmarkTile)]
pub fn bookmark_tile(props: &BookmarkTileProps) -> Html {
    let bookmark = &props.bookmark;
    let id = bookmark.id.clone();

    let on_open = props.on_open.reform({
        let url = bookmark.url.clone();
        move |_: MouseEvent| url.clone()
    });
    let on_left = props.on_move.reform({
        let id = id.clone();
        move |_: MouseEvent| (id.clone(), Direction::Left)
    });
    let on_right = props.on_move.reform({
        let id = id.clone();
        move |_: MouseEvent| (id.clone(), Direction::Right)
    });
    let on_edit = props.on_edit.reform({
        let bookmark = bookmark.clone();
        move |_: MouseEvent| bookmark.clone()
    });
    let on_delete = props.on_delete.reform(move |_: MouseEvent| id.clone());
    let tooltip = match props.link_target {
        LinkTarget::NewTab => format!("{} (opens in a new tab)", bookmark.url),
        LinkTarget::CurrentTab => bookmark.url.clone(),
    };

    html! {
        <div class="bookmark-tile" title={tooltip}>
            <div class="bookmark-content" onclick={on_open}>
                <div class="bookmark-title">{&bookmark.title}</div>
                <div class="bookmark-host">{display_host(&bookmark.url)}</div>
            </div>
            <div class="bookmark-actions">
                <button type="button" disabled={props.is_first} onclick={on_left}>{"◀"}</button>
                <button type="button" disabled={props.is_last} onclick={on_right}>{"▶"}</button>
                <button type="button" onclick={on_edit}>{"✏️"}</button>
                <button type="button" onclick={on_delete}>{"🗑️"}</button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct GroupCardProps {
    pub group: BookmarkGroup,
    pub link_target: LinkTarget,
    pub is_drop_target: bool,
    pub on_toggle: Callback<String>,
    pub on_edit: Callback<String>,
    pub on_add_bookmark: Callback<String>,
    pub on_delete: Callback<String>,
    pub on_move: Callback<(String, Direction)>,
    pub on_open: Callback<String>,
    pub on_bookmark_move: Callback<(String, String, Direction)>,
    pub on_bookmark_edit: Callback<(String, Bookmark)>,
    pub on_bookmark_delete: Callback<(String, String)>,
    pub on_drag_over: Callback<String>,
    pub on_drag_leave: Callback<()>,
    pub on_drop: Callback<String>,
}

#[function_component(GroupCard)]
pub fn group_card(props: &GroupCardProps) -> Html {
    let group = &props.group;
    let group_id = group.id.clone();

    let with_id = |cb: &Callback<String>| {
        let id = group_id.clone();
        cb.reform(move |_: MouseEvent| id.clone())
    };
    let on_toggle = with_id(&props.on_toggle);
    let on_edit = with_id(&props.on_edit);
    let on_add_bookmark = with_id(&props.on_add_bookmark);
    let on_delete = with_id(&props.on_delete);
    let on_up = props.on_move.reform({
        let id = group_id.clone();
        move |_: MouseEvent| (id.clone(), Direction::Up)
    });
    let on_down = props.on_move.reform({
        let id = group_id.clone();
        move |_: MouseEvent| (id.clone(), Direction::Down)
    });

    // dragover must be cancelled for the element to accept a drop
    let ondragover = {
        let on_drag_over = props.on_drag_over.clone();
        let id = group_id.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            on_drag_over.emit(id.clone());
        })
    };
    let ondragleave = props.on_drag_leave.reform(|_: DragEvent| ());
    let ondrop = {
        let on_drop = props.on_drop.clone();
        let id = group_id.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            on_drop.emit(id.clone());
        })
    };

    let on_bookmark_move = props.on_bookmark_move.reform({
        let id = group_id.clone();
        move |(bookmark_id, direction): (String, Direction)| (id.clone(), bookmark_id, direction)
    });
    let on_bookmark_edit = props.on_bookmark_edit.reform({
        let id = group_id.clone();
        move |bookmark: Bookmark| (id.clone(), bookmark)
    });
    let on_bookmark_delete = props.on_bookmark_delete.reform({
        let id = group_id.clone();
        move |bookmark_id: String| (id.clone(), bookmark_id)
    });

    let count = group.bookmarks.len();

    html! {
        <div
            class={classes!("group-card", props.is_drop_target.then_some("drop-target"))}
            style={format!("border-top: 4px solid {};", group.color)}
            {ondragover}
            {ondragleave}
            {ondrop}
        >
            <div class="group-header">
                <h3 class="group-title" onclick={on_toggle}>
                    {if group.is_expanded { "▼ " } else { "▶ " }}
                    {&group.name}
                    <span class="group-count">{format!(" ({})", count)}</span>
                </h3>
                <div class="group-actions">
                    <Button onclick={on_add_bookmark} variant={ButtonVariant::Plain} size={ButtonSize::Small}>{"＋"}</Button>
                    <Button onclick={on_edit} variant={ButtonVariant::Plain} size={ButtonSize::Small}>{"⚙"}</Button>
                    <Button onclick={on_up} variant={ButtonVariant::Plain} size={ButtonSize::Small}>{"▲"}</Button>
                    <Button onclick={on_down} variant={ButtonVariant::Plain} size={ButtonSize::Small}>{"▼"}</Button>
                    <Button onclick={on_delete} variant={ButtonVariant::Danger} size={ButtonSize::Small}>{"🗑️"}</Button>
                </div>
            </div>

            if group.is_expanded {
                <div class="group-bookmarks">
                    if group.bookmarks.is_empty() {
                        <p class="empty-state-hint">{"Drag a tab here to bookmark it."}</p>
                    }
                    {for group.bookmarks.iter().enumerate().map(|(index, bookmark)| html! {
                        <BookmarkTile
                            key={bookmark.id.clone()}
                            bookmark={bookmark.clone()}
                            link_target={props.link_target}
                            is_first={index == 0}
                            is_last={index + 1 == count}
                            on_open={props.on_open.clone()}
                            on_move={on_bookmark_move.clone()}
                            on_edit={on_bookmark_edit.clone()}
                            on_delete={on_bookmark_delete.clone()}
                        />
                    })}
                </div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct OpenTabsListProps {
    pub tabs: Vec<OpenTab>,
    pub on_drag_start: Callback<OpenTab>,
    pub on_drag_end: Callback<()>,
}

#[function_component(OpenTabsList)]
pub fn open_tabs_list(props: &OpenTabsListProps) -> Html {
    html! {
        <div class="open-tabs">
            <h2 class="open-tabs-title">{format!("Open tabs ({})", props.tabs.len())}</h2>
            if props.tabs.is_empty() {
                <p class="empty-state-hint">{"Every open tab is already bookmarked."}</p>
            }
            {for props.tabs.iter().map(|tab| {
                let ondragstart = {
                    let on_drag_start = props.on_drag_start.clone();
                    let tab = tab.clone();
                    Callback::from(move |e: DragEvent| {
                        if let Some(transfer) = e.data_transfer() {
                            let _ = transfer.set_data("text/plain", &tab.url);
                        }
                        on_drag_start.emit(tab.clone());
                    })
                };
                let ondragend = props.on_drag_end.reform(|_: DragEvent| ());
                html! {
                    <div key={tab.id} class="open-tab" draggable="true" {ondragstart} {ondragend}>
                        <div class="tab-title">{&tab.title}</div>
                        <div class="tab-url">{display_host(&tab.url)}</div>
                    </div>
                }
            })}
        </div>
    }
}
