use crate::shared::components::data_table::{
    BadgeTone, CellValue, Column, DataTable, RowAction, RowIdentity,
};
use crate::shared::components::notice_banner::NoticeBanner;
use crate::shared::components::pagination_controls::{PageNav, PaginationControls};
use crate::shared::components::search_input::SearchInput;
use crate::shared::components::stat_card::{StatCard, StatTone};
use crate::shared::config::use_app_config;
use crate::shared::icons::icon;
use crate::shared::query::{use_aggregate_stats, use_list_view, Categorizer, FetchError};
use crate::system::auth::context::{sign_out_on_unauthorized, use_auth};
use contracts::domain::a002_employee::{
    department_label, EmployeeDto, EmployeeInput, DEPARTMENTS, RESOURCE,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

impl RowIdentity for EmployeeDto {
    fn row_id(&self) -> String {
        self.id.clone()
    }
}

pub fn employee_columns() -> Vec<Column<EmployeeDto>> {
    vec![
        Column::new("code", "Таб. №", |e: &EmployeeDto| CellValue::text(&e.code)).width("100px"),
        Column::new("full_name", "ФИО", |e: &EmployeeDto| CellValue::text(&e.full_name)),
        Column::new("department", "Подразделение", |e: &EmployeeDto| {
            CellValue::text(department_label(&e.department))
        })
        .width("180px"),
        Column::new("position", "Должность", |e: &EmployeeDto| {
            CellValue::optional_text(e.position.as_deref())
        }),
        Column::new("monthly_salary", "Оклад", |e: &EmployeeDto| {
            CellValue::Money(e.monthly_salary)
        })
        .width("130px"),
        Column::new("hired_on", "Принят", |e: &EmployeeDto| {
            e.hired_on.map(CellValue::Date).unwrap_or(CellValue::Empty)
        })
        .width("110px"),
        Column::new("is_active", "Статус", |e: &EmployeeDto| {
            if e.is_active {
                CellValue::Badge {
                    label: "Работает".to_string(),
                    tone: BadgeTone::Success,
                }
            } else {
                CellValue::Badge {
                    label: "Уволен".to_string(),
                    tone: BadgeTone::Danger,
                }
            }
        })
        .width("120px"),
    ]
}

pub fn employee_categorizers() -> Vec<Categorizer<EmployeeDto>> {
    vec![
        Categorizer::new("active", |e: &EmployeeDto| e.is_active),
        Categorizer::new("inactive", |e: &EmployeeDto| !e.is_active),
    ]
}

/// Тело PUT для переключения статуса; остальные поля без изменений
pub fn toggled_input(employee: &EmployeeDto) -> EmployeeInput {
    EmployeeInput {
        is_active: !employee.is_active,
        ..EmployeeInput::from(employee)
    }
}

#[component]
pub fn EmployeeList() -> impl IntoView {
    let config = use_app_config();
    let auth = use_auth();
    let list = use_list_view::<EmployeeDto>(RESOURCE, config.page_size);
    let stats = use_aggregate_stats(RESOURCE, employee_categorizers());
    let action_error = RwSignal::new(None::<FetchError>);

    let list_error = Signal::derive(move || list.view.with(|v| v.error.clone()));
    sign_out_on_unauthorized(list_error);
    sign_out_on_unauthorized(stats.error.into());

    let toggle_active = Callback::new(move |id: String| {
        let Some(employee) = list
            .view
            .with_untracked(|v| v.rows.iter().find(|e| e.id == id).cloned())
        else {
            return;
        };
        let Some(client) = list.client() else {
            return;
        };
        let body = toggled_input(&employee);
        spawn_local(async move {
            match client.update(RESOURCE, &employee.id, &body).await {
                Ok(_) => {
                    action_error.try_set(None);
                    list.reload();
                    stats.reload();
                }
                Err(FetchError::Unauthorized) => auth.sign_out(),
                Err(err) => {
                    log::warn!("update employee {} failed: {}", employee.id, err);
                    action_error.try_set(Some(err));
                }
            }
        });
    });

    let nav = Signal::derive(move || {
        list.view
            .with(|v| PageNav::new(v.page, v.total_count, v.limit))
    });
    let rows = Signal::derive(move || list.view.with(|v| v.rows.clone()));
    let is_fetching = Signal::derive(move || list.view.with(|v| v.is_fetching));
    let search = Signal::derive(move || list.params.with(|p| p.search.clone()));
    let department = move || {
        list.params
            .with(|p| p.filter("department").unwrap_or_default().to_string())
    };
    let total = move || list.view.with(|v| v.total_count);

    let count = move |label: &'static str| {
        Signal::derive(move || stats.snapshot.with(|s| s.as_ref().and_then(|s| s.count(label))))
    };
    let approximate = Signal::derive(move || {
        stats
            .snapshot
            .with(|s| s.as_ref().is_some_and(|s| s.is_approximate()))
    });

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    {icon("employees")}
                    <h1 class="page__title">"Сотрудники"</h1>
                    <span class="page__status">{move || format!("Найдено: {}", total())}</span>
                </div>
                <div class="page__header-right">
                    <button
                        class="button button--secondary"
                        title="Обновить"
                        on:click=move |_| {
                            list.reload();
                            stats.reload();
                        }
                    >
                        {icon("refresh")}
                    </button>
                </div>
            </div>

            <div class="page__content">
                <div class="stat-cards">
                    <StatCard
                        label="Работают".to_string()
                        icon_name="active".to_string()
                        value=count("active")
                        approximate=approximate
                        tone=StatTone::Success
                    />
                    <StatCard
                        label="Уволены".to_string()
                        icon_name="inactive".to_string()
                        value=count("inactive")
                        approximate=approximate
                        tone=StatTone::Error
                    />
                </div>

                <div class="filter-panel">
                    <SearchInput
                        value=search
                        placeholder="Поиск по табельному номеру или ФИО..."
                        on_change=Callback::new(move |value: String| list.set_search(value))
                    />
                    <select
                        class="filter-select"
                        prop:value=department
                        on:change=move |ev| list.set_filter("department", event_target_value(&ev))
                    >
                        <option value="">"Все подразделения"</option>
                        {DEPARTMENTS
                            .iter()
                            .map(|&(value, label)| view! { <option value=value>{label}</option> })
                            .collect_view()}
                    </select>
                </div>

                <NoticeBanner
                    error=list_error
                    on_retry=Callback::new(move |_| list.reload())
                />
                <NoticeBanner error=action_error />

                <DataTable
                    columns=employee_columns()
                    rows=rows
                    is_fetching=is_fetching
                    actions=vec![RowAction {
                        icon: "power",
                        title: "Принять / уволить",
                        on_click: toggle_active,
                    }]
                    empty_text="Сотрудники не найдены"
                />

                <PaginationControls
                    nav=nav
                    on_page_change=Callback::new(move |page| list.set_page(page))
                    on_page_size_change=Callback::new(move |limit| list.set_limit(limit))
                />
            </div>
        </div>
    }
}
