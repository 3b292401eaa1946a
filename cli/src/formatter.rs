// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::fmt;

use colored::Color;
use workcal_core::{
    CalendarItem, ErrorKind, ItemKind, RecentEntry, describe_error, format_date, format_minutes,
    format_time, label, minutes_between,
};
use workcal_erp::WorkCodeItem;

use crate::arg::OutputFormat;
use crate::table::{PaddingDirection, Table, TableColumn, TableStyleBasic, TableStyleJson};

/// Renders rows with a fixed column set in the selected output format.
#[derive(Debug)]
pub struct Formatter<C> {
    columns: Vec<C>,
    format: OutputFormat,
}

impl<C> Formatter<C> {
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format<'a, T>(&'a self, rows: &'a [T]) -> Display<'a, T, C> {
        Display {
            rows,
            formatter: self,
        }
    }
}

impl Formatter<ItemColumn> {
    pub fn items(verbose: bool) -> Self {
        let mut columns = vec![
            ItemColumn::Id,
            ItemColumn::TimeRange,
            ItemColumn::Duration,
            ItemColumn::Code,
            ItemColumn::Title,
            ItemColumn::Status,
        ];
        if verbose {
            columns.insert(1, ItemColumn::Date);
            columns.push(ItemColumn::Place);
        }
        Self {
            columns,
            format: OutputFormat::Table,
        }
    }
}

impl Formatter<CodeColumn> {
    pub fn codes() -> Self {
        Self {
            columns: vec![CodeColumn::Code, CodeColumn::Label],
            format: OutputFormat::Table,
        }
    }
}

impl Formatter<RecentColumn> {
    pub fn recent() -> Self {
        Self {
            columns: vec![RecentColumn::Code, RecentColumn::Description],
            format: OutputFormat::Table,
        }
    }
}

pub struct Display<'a, T, C> {
    rows: &'a [T],
    formatter: &'a Formatter<C>,
}

impl<T, C: TableColumn<T>> fmt::Display for Display<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = &self.formatter.columns;
        match self.formatter.format {
            OutputFormat::Json => write!(
                f,
                "{}",
                Table::new(TableStyleJson::new(), columns, self.rows)
            ),
            OutputFormat::Table => write!(
                f,
                "{}",
                Table::new(TableStyleBasic::new(), columns, self.rows)
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ItemColumn {
    Id,
    Date,
    TimeRange,
    Duration,
    Code,
    Title,
    Status,
    Place,
}

impl TableColumn<CalendarItem> for ItemColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Id => "Id",
            Self::Date => "Date",
            Self::TimeRange => "Time Range",
            Self::Duration => "Duration",
            Self::Code => "Code",
            Self::Title => "Title",
            Self::Status => "Status",
            Self::Place => "Place",
        }
        .into()
    }

    fn format<'a>(&self, item: &'a CalendarItem) -> Cow<'a, str> {
        let is_job = item.kind == ItemKind::Job;
        match self {
            Self::Id if is_job => item.id.as_str().into(),
            Self::Id => "".into(),
            Self::Date => format_date(item.start.date()).into(),
            Self::TimeRange if is_job => format!(
                "{}~{}",
                format_time(item.start.time()),
                format_time(item.end.time())
            )
            .into(),
            Self::TimeRange => format_time(item.start.time()).into(),
            Self::Duration if is_job => {
                format_minutes(minutes_between(item.start, item.end)).into()
            }
            Self::Duration => "".into(),
            Self::Code => item
                .work_code
                .map_or_else(String::new, |c| c.to_string())
                .into(),
            Self::Title => item.title.as_str().into(),
            Self::Status => status(item).into(),
            Self::Place => item.place_of_work.as_str().into(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            Self::Id | Self::Duration | Self::Code => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }

    fn color(&self, item: &CalendarItem) -> Option<Color> {
        match (self, &item.kind) {
            (_, ItemKind::Marker(_)) => Some(Color::BrightBlack),
            (Self::Status, _) if has_error(item) => Some(Color::Red),
            (Self::Status, _) if item.saving || item.pending_create => Some(Color::Yellow),
            _ => None,
        }
    }
}

fn has_error(item: &CalendarItem) -> bool {
    item.errors.as_ref().is_some_and(|e| e.any())
}

fn status(item: &CalendarItem) -> String {
    if item.saving {
        return "saving".to_string();
    }
    if item.pending_create {
        return "pending".to_string();
    }
    let Some(errors) = &item.errors else {
        return String::new();
    };
    [ErrorKind::Create, ErrorKind::Update, ErrorKind::Delete]
        .into_iter()
        .filter(|&kind| !errors.get(kind).is_empty())
        .map(|kind| describe_error(kind, errors.get(kind)))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy)]
pub enum CodeColumn {
    Code,
    Label,
}

impl TableColumn<WorkCodeItem> for CodeColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Code => "Code",
            Self::Label => "Label",
        }
        .into()
    }

    fn format<'a>(&self, item: &'a WorkCodeItem) -> Cow<'a, str> {
        match self {
            Self::Code => item.code.to_string().into(),
            Self::Label => label(item).into(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            Self::Code => PaddingDirection::Right,
            Self::Label => PaddingDirection::Left,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum RecentColumn {
    Code,
    Description,
}

impl TableColumn<RecentEntry> for RecentColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Code => "Code",
            Self::Description => "Description",
        }
        .into()
    }

    fn format<'a>(&self, entry: &'a RecentEntry) -> Cow<'a, str> {
        match self {
            Self::Code => entry.work_code.to_string().into(),
            Self::Description => entry.description.as_str().into(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            Self::Code => PaddingDirection::Right,
            Self::Description => PaddingDirection::Left,
        }
    }
}
