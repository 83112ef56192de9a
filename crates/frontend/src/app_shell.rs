//! Application Shell - корневые компоненты приложения
//!
//! - `AppShell` - auth gate (LoginPage или MainLayout)
//! - `MainLayout` - Sidebar + активный экран

use crate::domain::a001_supplier::ui::list::SupplierList;
use crate::domain::a002_employee::ui::list::EmployeeList;
use crate::layout::sidebar::Sidebar;
use crate::layout::{Screen, Shell};
use crate::system::auth::context::use_auth;
use crate::system::pages::login::LoginPage;
use leptos::prelude::*;

#[component]
fn MainLayout() -> impl IntoView {
    let active = RwSignal::new(Screen::Suppliers);

    view! {
        <Shell
            left=move || view! { <Sidebar active=active /> }.into_any()
            center=move || {
                (move || match active.get() {
                    Screen::Suppliers => view! { <SupplierList /> }.into_any(),
                    Screen::Employees => view! { <EmployeeList /> }.into_any(),
                })
                .into_any()
            }
        />
    }
}

#[component]
pub fn AppShell() -> impl IntoView {
    let auth = use_auth();

    view! {
        <Show
            when=move || auth.is_authenticated()
            fallback=|| view! { <LoginPage /> }
        >
            <MainLayout />
        </Show>
    }
}
