use super::Screen;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use leptos::prelude::*;

#[component]
pub fn Sidebar(active: RwSignal<Screen>) -> impl IntoView {
    let auth = use_auth();

    view! {
        <nav class="sidebar">
            <div class="sidebar__group-label">"Справочники"</div>
            {Screen::ALL
                .into_iter()
                .map(|screen| {
                    view! {
                        <button
                            class=move || {
                                if active.get() == screen {
                                    "sidebar__item sidebar__item--active"
                                } else {
                                    "sidebar__item"
                                }
                            }
                            data-key=screen.key()
                            on:click=move |_| active.set(screen)
                        >
                            {icon(screen.icon())}
                            <span>{screen.label()}</span>
                        </button>
                    }
                })
                .collect_view()}
            <div class="sidebar__footer">
                <button class="sidebar__item" on:click=move |_| auth.sign_out()>
                    {icon("log-out")}
                    <span>"Выйти"</span>
                </button>
            </div>
        </nav>
    }
}
