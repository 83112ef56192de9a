//! Универсальная таблица списка.
//!
//! `DataTable` renders whatever rows it is given against a list of column
//! descriptors. It never fetches, sorts or filters; the list controller owns
//! all of that and the table only reflects `rows` and `is_fetching`.

use chrono::NaiveDate;
use leptos::prelude::*;
use std::sync::Arc;
use thaw::*;

use crate::shared::format::{format_amount, format_date, format_money};
use crate::shared::icons::icon;

/// Identity key used by row actions (open, delete, toggle).
pub trait RowIdentity {
    fn row_id(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Danger,
    Brand,
    Neutral,
}

/// Display value of a single cell. Formatting only, no state.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Money(f64),
    Number { value: f64, decimals: usize },
    Date(NaiveDate),
    Badge { label: String, tone: BadgeTone },
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => CellValue::Text(v.to_string()),
            _ => CellValue::Empty,
        }
    }

    pub fn display_text(&self) -> String {
        match self {
            CellValue::Text(text) => text.clone(),
            CellValue::Money(value) => format_money(*value),
            CellValue::Number { value, decimals } => format_amount(*value, *decimals),
            CellValue::Date(date) => format_date(*date),
            CellValue::Badge { label, .. } => label.clone(),
            CellValue::Empty => "—".to_string(),
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Money(_) | CellValue::Number { .. })
    }
}

pub struct Column<T> {
    pub key: &'static str,
    pub header: &'static str,
    pub width: Option<&'static str>,
    render: Arc<dyn Fn(&T) -> CellValue + Send + Sync>,
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            header: self.header,
            width: self.width,
            render: self.render.clone(),
        }
    }
}

impl<T> Column<T> {
    pub fn new(
        key: &'static str,
        header: &'static str,
        render: impl Fn(&T) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            header,
            width: None,
            render: Arc::new(render),
        }
    }

    pub fn width(mut self, width: &'static str) -> Self {
        self.width = Some(width);
        self
    }

    pub fn render(&self, row: &T) -> CellValue {
        (self.render)(row)
    }
}

/// Button shown in the trailing actions column of every row.
#[derive(Clone)]
pub struct RowAction {
    pub icon: &'static str,
    pub title: &'static str,
    pub on_click: Callback<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState {
    /// First load, nothing to show yet.
    Loading,
    Empty,
    /// `refreshing` is set while a newer page is being fetched.
    Rows { refreshing: bool },
}

pub fn body_state(row_count: usize, is_fetching: bool) -> BodyState {
    match (row_count, is_fetching) {
        (0, true) => BodyState::Loading,
        (0, false) => BodyState::Empty,
        (_, refreshing) => BodyState::Rows { refreshing },
    }
}

fn badge_color(tone: BadgeTone) -> BadgeColor {
    match tone {
        BadgeTone::Success => BadgeColor::Success,
        BadgeTone::Danger => BadgeColor::Danger,
        BadgeTone::Brand => BadgeColor::Brand,
        BadgeTone::Neutral => BadgeColor::Informative,
    }
}

fn render_cell(value: CellValue) -> AnyView {
    let align = if value.is_numeric() {
        "text-align: right;"
    } else {
        ""
    };
    match value {
        CellValue::Badge { label, tone } => view! {
            <TableCell>
                <Badge appearance=BadgeAppearance::Tint color=badge_color(tone)>{label}</Badge>
            </TableCell>
        }
        .into_any(),
        other => {
            let text = other.display_text();
            view! {
                <TableCell attr:style=align>
                    <TableCellLayout>{text}</TableCellLayout>
                </TableCell>
            }
            .into_any()
        }
    }
}

#[component]
pub fn DataTable<T>(
    /// Column descriptors, rendered left to right
    columns: Vec<Column<T>>,
    /// Rows of the current page
    #[prop(into)]
    rows: Signal<Vec<T>>,
    #[prop(into)]
    is_fetching: Signal<bool>,
    /// Trailing per-row buttons
    #[prop(optional)]
    actions: Vec<RowAction>,
    /// Double click on a row
    #[prop(optional)]
    on_open: Option<Callback<String>>,
    #[prop(optional, into)]
    empty_text: Option<String>,
) -> impl IntoView
where
    T: RowIdentity + Clone + Send + Sync + 'static,
{
    let empty_text = empty_text.unwrap_or_else(|| "Нет данных".to_string());
    let has_actions = !actions.is_empty();
    let colspan = (columns.len() + usize::from(has_actions)).to_string();

    let header_cells = columns
        .iter()
        .map(|column| {
            let style = column
                .width
                .map(|w| format!("width: {};", w))
                .unwrap_or_default();
            let header = column.header;
            view! { <TableHeaderCell attr:style=style>{header}</TableHeaderCell> }
        })
        .collect_view();

    let state = Memo::new(move |_| body_state(rows.with(Vec::len), is_fetching.get()));

    let body = move || match state.get() {
        BodyState::Loading => {
            let colspan = colspan.clone();
            view! {
            <TableRow>
                <TableCell attr:colspan=colspan attr:style="padding: 40px; text-align: center;">
                    <Flex justify=FlexJustify::Center align=FlexAlign::Center gap=FlexGap::Small>
                        <Spinner />
                        "Загрузка..."
                    </Flex>
                </TableCell>
            </TableRow>
            }
            .into_any()
        }
        BodyState::Empty => {
            let colspan = colspan.clone();
            let empty_text = empty_text.clone();
            view! {
            <TableRow>
                <TableCell attr:colspan=colspan attr:style="padding: 40px; text-align: center; color: var(--colorNeutralForeground3);">
                    {empty_text}
                </TableCell>
            </TableRow>
            }
            .into_any()
        }
        BodyState::Rows { .. } => rows
            .get()
            .into_iter()
            .map(|row| {
                let id = row.row_id();
                let cells = columns
                    .iter()
                    .map(|column| render_cell(column.render(&row)))
                    .collect_view();
                let action_cell = has_actions.then(|| {
                    let buttons = actions
                        .iter()
                        .map(|action| {
                            let id = id.clone();
                            let on_click = action.on_click;
                            view! {
                                <button
                                    class="table-action-btn"
                                    title=action.title
                                    on:click=move |e: leptos::ev::MouseEvent| {
                                        e.stop_propagation();
                                        on_click.run(id.clone());
                                    }
                                >
                                    {icon(action.icon)}
                                </button>
                            }
                        })
                        .collect_view();
                    view! {
                        <TableCell>
                            <div style="text-align: center; white-space: nowrap;">{buttons}</div>
                        </TableCell>
                    }
                });
                let open_id = id.clone();
                view! {
                    <TableRow
                        on:dblclick=move |_| {
                            if let Some(on_open) = on_open {
                                on_open.run(open_id.clone());
                            }
                        }
                        attr:style="cursor: pointer;"
                    >
                        {cells}
                        {action_cell}
                    </TableRow>
                }
            })
            .collect_view()
            .into_any(),
    };

    view! {
        <div
            class="data-table"
            style=move || match state.get() {
                BodyState::Rows { refreshing: true } => "opacity: 0.6; transition: opacity 0.2s;",
                _ => "transition: opacity 0.2s;",
            }
        >
            <Table>
                <TableHeader>
                    <TableRow>
                        {header_cells}
                        {has_actions.then(|| view! {
                            <TableHeaderCell attr:style="width: 90px; text-align: center;">"Действия"</TableHeaderCell>
                        })}
                    </TableRow>
                </TableHeader>
                <TableBody>{body}</TableBody>
            </Table>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Ingot {
        id: String,
        weight: f64,
        assayed: bool,
    }

    impl RowIdentity for Ingot {
        fn row_id(&self) -> String {
            self.id.clone()
        }
    }

    #[test]
    fn test_body_state() {
        assert_eq!(body_state(0, true), BodyState::Loading);
        assert_eq!(body_state(0, false), BodyState::Empty);
        assert_eq!(body_state(3, false), BodyState::Rows { refreshing: false });
        assert_eq!(body_state(3, true), BodyState::Rows { refreshing: true });
    }

    #[test]
    fn test_column_render_is_polymorphic() {
        let columns = vec![
            Column::new("id", "ID", |r: &Ingot| CellValue::text(r.id.clone())),
            Column::new("weight", "Вес, г", |r: &Ingot| CellValue::Number {
                value: r.weight,
                decimals: 3,
            })
            .width("120px"),
            Column::new("assayed", "Проба", |r: &Ingot| {
                if r.assayed {
                    CellValue::Badge {
                        label: "585".to_string(),
                        tone: BadgeTone::Success,
                    }
                } else {
                    CellValue::Empty
                }
            }),
        ];
        let row = Ingot {
            id: "ING-1".to_string(),
            weight: 1250.5,
            assayed: false,
        };

        let rendered: Vec<String> = columns.iter().map(|c| c.render(&row).display_text()).collect();
        assert_eq!(rendered, vec!["ING-1", "1\u{00a0}250,500", "—"]);
        assert_eq!(columns[1].width, Some("120px"));
        assert_eq!(row.row_id(), "ING-1");
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(CellValue::optional_text(None), CellValue::Empty);
        assert_eq!(CellValue::optional_text(Some(" ")), CellValue::Empty);
        assert_eq!(
            CellValue::optional_text(Some("Kostroma")).display_text(),
            "Kostroma"
        );
    }
}
