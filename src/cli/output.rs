use serde::Serialize;

use crate::io::state::ViewState;
use crate::model::category::{Category, Color};
use crate::model::entries::TRACKED_DAYS;
use crate::model::item::Item;
use crate::model::snapshot::TrackerData;
use crate::model::user::UserProfile;
use crate::ops::entry_ops;
use crate::ops::tree::{self, ItemNode};
use crate::util::unicode::{display_width, fit_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct UserJson {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub active: bool,
}

#[derive(Serialize)]
pub struct ItemJson {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ItemJson>,
}

#[derive(Serialize)]
pub struct CategoryJson {
    pub id: String,
    pub name: String,
    pub color: Color,
    pub collapsed: bool,
    pub completion: u32,
    pub items: Vec<ItemJson>,
}

#[derive(Serialize)]
pub struct ShowJson {
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_completion: Option<u32>,
    pub categories: Vec<CategoryJson>,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub total_checked: usize,
    pub total_possible: usize,
    pub percent: u32,
    pub days_active: usize,
    pub categories: Vec<CategoryStatsJson>,
    pub days: Vec<DayStatsJson>,
}

#[derive(Serialize)]
pub struct CategoryStatsJson {
    pub id: String,
    pub name: String,
    pub percent: u32,
}

#[derive(Serialize)]
pub struct DayStatsJson {
    pub day: u32,
    pub percent: u32,
}

#[derive(Serialize)]
pub struct ColorJson {
    pub name: &'static str,
    pub hex: &'static str,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn user_to_json(user: &UserProfile, active_id: Option<&str>) -> UserJson {
    UserJson {
        id: user.id.clone(),
        name: user.name.clone(),
        created_at: user
            .created_at
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        active: active_id == Some(user.id.as_str()),
    }
}

fn completed_days(data: &TrackerData, item_id: &str) -> Vec<u32> {
    (1..=TRACKED_DAYS)
        .filter(|d| data.entries.is_checked(*d, item_id))
        .collect()
}

fn item_to_json(data: &TrackerData, item: &Item, day: Option<u32>) -> ItemJson {
    ItemJson {
        id: item.id.clone(),
        name: item.name.clone(),
        checked: day.map(|d| data.entries.is_checked(d, &item.id)),
        days: match day {
            Some(_) => None,
            None => Some(completed_days(data, &item.id)),
        },
        children: Vec::new(),
    }
}

fn node_to_json(data: &TrackerData, node: &ItemNode, day: Option<u32>) -> ItemJson {
    let mut json = item_to_json(data, node.item, day);
    json.children = node
        .children
        .iter()
        .map(|c| item_to_json(data, c, day))
        .collect();
    json
}

pub fn show_to_json(
    data: &TrackerData,
    user: &UserProfile,
    view: &ViewState,
    day: Option<u32>,
) -> ShowJson {
    ShowJson {
        user: user.name.clone(),
        day,
        day_completion: day.map(|d| entry_ops::day_completion(data, d)),
        categories: data
            .categories
            .iter()
            .map(|cat| CategoryJson {
                id: cat.id.clone(),
                name: cat.name.clone(),
                color: cat.color,
                collapsed: view.is_collapsed(&cat.id),
                completion: entry_ops::category_completion(data, &cat.id),
                items: tree::category_tree(&data.items, &cat.id)
                    .iter()
                    .map(|node| node_to_json(data, node, day))
                    .collect(),
            })
            .collect(),
    }
}

pub fn stats_to_json(data: &TrackerData) -> StatsJson {
    let progress = entry_ops::progress(data);
    StatsJson {
        total_checked: progress.total_checked,
        total_possible: progress.total_possible,
        percent: progress.percent,
        days_active: progress.days_active,
        categories: data
            .categories
            .iter()
            .map(|cat| CategoryStatsJson {
                id: cat.id.clone(),
                name: cat.name.clone(),
                percent: entry_ops::category_completion(data, &cat.id),
            })
            .collect(),
        days: (1..=TRACKED_DAYS)
            .map(|day| DayStatsJson {
                day,
                percent: entry_ops::day_completion(data, day),
            })
            .collect(),
    }
}

pub fn colors_to_json() -> Vec<ColorJson> {
    Color::ALL
        .iter()
        .map(|c| ColorJson {
            name: c.name(),
            hex: c.hex(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Display options from the `[display]` config table
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub color: bool,
    pub show_sub_items: bool,
}

const NAME_COLUMN_MAX: usize = 28;

/// Wrap `text` in a 24-bit foreground colour escape
pub fn paint(text: &str, color: Color, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    let (r, g, b) = color.rgb();
    format!("\x1b[38;2;{};{};{}m{}\x1b[0m", r, g, b, text)
}

pub fn format_user_line(user: &UserProfile, active: bool) -> String {
    let marker = if active { '*' } else { ' ' };
    format!(
        "{} {} ({}) created {}",
        marker,
        user.name,
        user.id,
        user.created_at.format("%Y-%m-%d")
    )
}

fn format_category_header(data: &TrackerData, cat: &Category, collapsed: bool, style: Style) -> String {
    let arrow = if collapsed { '▸' } else { '▾' };
    let title = paint(&cat.name, cat.color, style.color);
    format!(
        "{} {} ({}) {}%",
        arrow,
        title,
        cat.id,
        entry_ops::category_completion(data, &cat.id)
    )
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

/// One day's checklist, grouped by category
pub fn format_day_checklist(
    data: &TrackerData,
    view: &ViewState,
    day: u32,
    style: Style,
) -> Vec<String> {
    let mut lines = vec![
        format!(
            "== Day {} ({}%) ==",
            day,
            entry_ops::day_completion(data, day)
        ),
    ];

    for cat in &data.categories {
        lines.push(String::new());
        let collapsed = view.is_collapsed(&cat.id);
        lines.push(format_category_header(data, cat, collapsed, style));
        if collapsed {
            continue;
        }
        for node in tree::category_tree(&data.items, &cat.id) {
            lines.push(format!(
                "  {} {}  {}",
                checkbox(data.entries.is_checked(day, &node.item.id)),
                node.item.name,
                node.item.id
            ));
            if !style.show_sub_items {
                continue;
            }
            for child in &node.children {
                lines.push(format!(
                    "      {} {}  {}",
                    checkbox(data.entries.is_checked(day, &child.id)),
                    child.name,
                    child.id
                ));
            }
        }
    }
    lines
}

/// The 30-day grid: one row per item, one cell per day
pub fn format_grid(data: &TrackerData, view: &ViewState, style: Style) -> Vec<String> {
    let label = |item: &Item, depth: usize| format!("{}{}", "  ".repeat(depth + 1), item.name);
    let name_width = data
        .items
        .iter()
        .map(|i| display_width(&label(i, 1)))
        .max()
        .unwrap_or(0)
        .clamp(8, NAME_COLUMN_MAX);

    let day_digits: String = (1..=TRACKED_DAYS)
        .map(|d| char::from_digit(d % 10, 10).unwrap_or(' '))
        .collect();
    let mut lines = vec![format!("{} {}", " ".repeat(name_width), day_digits)];

    let row = |item: &Item, depth: usize| {
        let cells: String = (1..=TRACKED_DAYS)
            .map(|d| if data.entries.is_checked(d, &item.id) { '●' } else { '·' })
            .collect();
        format!("{} {}  {}", fit_to_width(&label(item, depth), name_width), cells, item.id)
    };

    for cat in &data.categories {
        let collapsed = view.is_collapsed(&cat.id);
        lines.push(format_category_header(data, cat, collapsed, style));
        if collapsed {
            continue;
        }
        for node in tree::category_tree(&data.items, &cat.id) {
            lines.push(row(node.item, 0));
            if style.show_sub_items {
                for child in &node.children {
                    lines.push(row(child, 1));
                }
            }
        }
    }
    lines
}

pub fn format_stats(data: &TrackerData, style: Style) -> Vec<String> {
    let progress = entry_ops::progress(data);
    let mut lines = vec![
        format!(
            "completion: {}% ({}/{})",
            progress.percent, progress.total_checked, progress.total_possible
        ),
        format!("days active: {}/{}", progress.days_active, TRACKED_DAYS),
    ];

    if !data.categories.is_empty() {
        lines.push(String::new());
        let width = data
            .categories
            .iter()
            .map(|c| display_width(&c.name))
            .max()
            .unwrap_or(0)
            .min(NAME_COLUMN_MAX);
        for cat in &data.categories {
            let name = paint(&fit_to_width(&cat.name, width), cat.color, style.color);
            lines.push(format!(
                "  {}  {:>3}%",
                name,
                entry_ops::category_completion(data, &cat.id)
            ));
        }
    }

    let active_days: Vec<String> = (1..=TRACKED_DAYS)
        .filter(|d| entry_ops::day_completion(data, *d) > 0)
        .map(|d| format!("{}:{}%", d, entry_ops::day_completion(data, d)))
        .collect();
    if !active_days.is_empty() {
        lines.push(String::new());
        lines.push(format!("by day: {}", active_days.join(" ")));
    }
    lines
}

pub fn format_colors(enabled: bool) -> Vec<String> {
    Color::ALL
        .iter()
        .map(|c| format!("{}  {}", paint("■", *c, enabled), fit_to_width(c.name(), 8) + c.hex()))
        .collect()
}

/// Parse a palette colour name
pub fn parse_color(s: &str) -> Result<Color, String> {
    Color::parse(s).ok_or_else(|| {
        let names: Vec<&str> = Color::ALL.iter().map(|c| c.name()).collect();
        format!("unknown color '{}' (expected: {})", s, names.join(", "))
    })
}
