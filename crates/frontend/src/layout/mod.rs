pub mod sidebar;

use leptos::prelude::*;

/// Экран, открытый в центральной области
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Suppliers,
    Employees,
}

impl Screen {
    pub const ALL: [Screen; 2] = [Screen::Suppliers, Screen::Employees];

    pub fn key(self) -> &'static str {
        match self {
            Screen::Suppliers => "a001_supplier",
            Screen::Employees => "a002_employee",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Screen::Suppliers => "Поставщики",
            Screen::Employees => "Сотрудники",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Screen::Suppliers => "suppliers",
            Screen::Employees => "employees",
        }
    }
}

/// Layout: sidebar on the left, content on the right.
#[component]
pub fn Shell<L, C>(left: L, center: C) -> impl IntoView
where
    L: Fn() -> AnyView + 'static + Send,
    C: Fn() -> AnyView + 'static + Send,
{
    view! {
        <div class="app-layout">
            <div class="app-body">
                <aside class="app-sidebar">{left()}</aside>
                <main class="app-main">{center()}</main>
            </div>
        </div>
    }
}
