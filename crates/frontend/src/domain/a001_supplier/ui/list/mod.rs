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
use contracts::domain::a001_supplier::{SupplierDto, RESOURCE};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Значения фильтра статуса; пустая строка = все
pub const STATUS_OPTIONS: [(&str, &str); 3] =
    [("", "Все"), ("active", "Активные"), ("inactive", "Неактивные")];

impl RowIdentity for SupplierDto {
    fn row_id(&self) -> String {
        self.id.clone()
    }
}

pub fn supplier_columns() -> Vec<Column<SupplierDto>> {
    vec![
        Column::new("code", "Код", |s: &SupplierDto| CellValue::text(&s.code)).width("110px"),
        Column::new("name", "Наименование", |s: &SupplierDto| CellValue::text(&s.name)),
        Column::new("contact_person", "Контактное лицо", |s: &SupplierDto| {
            CellValue::optional_text(s.contact_person.as_deref())
        }),
        Column::new("phone", "Телефон", |s: &SupplierDto| {
            CellValue::optional_text(s.phone.as_deref())
        })
        .width("150px"),
        Column::new("city", "Город", |s: &SupplierDto| {
            CellValue::optional_text(s.city.as_deref())
        })
        .width("140px"),
        Column::new("created_at", "Создан", |s: &SupplierDto| match s.created_at {
            Some(ts) => CellValue::Date(ts.date_naive()),
            None => CellValue::Empty,
        })
        .width("110px"),
        Column::new("is_active", "Статус", |s: &SupplierDto| status_badge(s.is_active))
            .width("120px"),
    ]
}

pub fn status_badge(is_active: bool) -> CellValue {
    if is_active {
        CellValue::Badge {
            label: "Активен".to_string(),
            tone: BadgeTone::Success,
        }
    } else {
        CellValue::Badge {
            label: "Неактивен".to_string(),
            tone: BadgeTone::Neutral,
        }
    }
}

pub fn supplier_categorizers() -> Vec<Categorizer<SupplierDto>> {
    vec![
        Categorizer::new("active", |s: &SupplierDto| s.is_active),
        Categorizer::new("inactive", |s: &SupplierDto| !s.is_active),
    ]
}

#[component]
pub fn SupplierList() -> impl IntoView {
    let config = use_app_config();
    let auth = use_auth();
    let list = use_list_view::<SupplierDto>(RESOURCE, config.page_size);
    let stats = use_aggregate_stats(RESOURCE, supplier_categorizers());

    // ошибки мутаций показываются отдельно от ошибок чтения
    let action_error = RwSignal::new(None::<FetchError>);

    let list_error = Signal::derive(move || list.view.with(|v| v.error.clone()));
    sign_out_on_unauthorized(list_error);
    sign_out_on_unauthorized(stats.error.into());

    let delete = Callback::new(move |id: String| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Удалить поставщика?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let Some(client) = list.client() else {
            return;
        };
        spawn_local(async move {
            match client.delete(RESOURCE, &id).await {
                Ok(_) => {
                    action_error.try_set(None);
                    list.reload();
                    stats.reload();
                }
                Err(FetchError::Unauthorized) => auth.sign_out(),
                Err(err) => {
                    log::warn!("delete supplier {} failed: {}", id, err);
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
    let status = move || {
        list.params
            .with(|p| p.filter("status").unwrap_or_default().to_string())
    };

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
                    {icon("suppliers")}
                    <h1 class="page__title">"Поставщики"</h1>
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
                        label="Активные".to_string()
                        icon_name="active".to_string()
                        value=count("active")
                        approximate=approximate
                        tone=StatTone::Success
                    />
                    <StatCard
                        label="Неактивные".to_string()
                        icon_name="inactive".to_string()
                        value=count("inactive")
                        approximate=approximate
                        tone=StatTone::Error
                    />
                </div>

                <div class="filter-panel">
                    <SearchInput
                        value=search
                        on_change=Callback::new(move |value: String| list.set_search(value))
                    />
                    <select
                        class="filter-select"
                        prop:value=status
                        on:change=move |ev| list.set_filter("status", event_target_value(&ev))
                    >
                        {STATUS_OPTIONS
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
                    columns=supplier_columns()
                    rows=rows
                    is_fetching=is_fetching
                    actions=vec![RowAction {
                        icon: "trash",
                        title: "Удалить",
                        on_click: delete,
                    }]
                    empty_text="Поставщики не найдены"
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
