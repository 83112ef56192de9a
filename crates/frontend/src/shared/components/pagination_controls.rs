use crate::shared::icons::icon;
use contracts::shared::api_response::total_pages;
use leptos::prelude::*;

/// Position within a paginated result set (pages are 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNav {
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub limit: u32,
}

impl PageNav {
    /// An empty result set still has one (empty) page.
    pub fn new(page: u32, total_count: u64, limit: u32) -> Self {
        Self {
            page,
            total_pages: total_pages(total_count, limit).max(1),
            total_count,
            limit,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Target pages are clamped before they reach the controller.
    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages)
    }

    /// `"21–25 из 25"`, or `"0 из 0"` for an empty set.
    pub fn range_label(&self) -> String {
        if self.total_count == 0 {
            return "0 из 0".to_string();
        }
        let first = u64::from(self.page.saturating_sub(1)) * u64::from(self.limit) + 1;
        if first > self.total_count {
            return format!("— из {}", self.total_count);
        }
        let last = (first + u64::from(self.limit) - 1).min(self.total_count);
        format!("{}–{} из {}", first, last, self.total_count)
    }
}

/// PaginationControls component - reusable pagination controls
#[component]
pub fn PaginationControls(
    #[prop(into)] nav: Signal<PageNav>,

    /// Callback when page changes (receives a clamped 1-based page)
    on_page_change: Callback<u32>,

    /// Callback when page size changes
    on_page_size_change: Callback<u32>,

    /// Available page size options
    #[prop(optional)]
    page_size_options: Option<Vec<u32>>,
) -> impl IntoView {
    let page_size_opts =
        page_size_options.unwrap_or_else(|| crate::shared::config::PAGE_SIZE_OPTIONS.to_vec());

    let go = move |page: u32| {
        let nav = nav.get();
        let target = nav.clamp(page);
        if target != nav.page {
            on_page_change.run(target);
        }
    };

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| go(1)
                disabled=move || !nav.get().has_prev()
                title="Первая страница"
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| go(nav.get().page.saturating_sub(1))
                disabled=move || !nav.get().has_prev()
                title="Предыдущая страница"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || {
                    let nav = nav.get();
                    format!("{} / {} ({})", nav.page, nav.total_pages, nav.range_label())
                }}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| go(nav.get().page.saturating_add(1))
                disabled=move || !nav.get().has_next()
                title="Следующая страница"
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| go(nav.get().total_pages)
                disabled=move || !nav.get().has_next()
                title="Последняя страница"
            >
                {icon("chevrons-right")}
            </button>
            <select
                class="page-size-select"
                on:change=move |ev| {
                    let val = event_target_value(&ev)
                        .parse()
                        .unwrap_or(crate::shared::config::DEFAULT_PAGE_SIZE);
                    on_page_size_change.run(val);
                }
                prop:value=move || nav.get().limit.to_string()
            >
                {page_size_opts.iter().map(|&size| {
                    view! {
                        <option value={size.to_string()} selected=move || nav.get().limit == size>
                            {size.to_string()}
                        </option>
                    }
                }).collect_view()}
            </select>
        </div>
    }
}
