// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::fmt;

use colored::{Color, Colorize};
use unicode_width::UnicodeWidthStr;

/// A column of a table over rows of type `T`.
pub trait TableColumn<T> {
    fn name(&self) -> Cow<'_, str>;

    fn format<'a>(&self, data: &'a T) -> Cow<'a, str>;

    fn padding_direction(&self) -> PaddingDirection {
        PaddingDirection::Left
    }

    fn color(&self, _data: &T) -> Option<Color> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingDirection {
    Left,
    Right,
}

/// How a table is rendered.
pub trait TableStyle {
    fn write_rows<T, C: TableColumn<T>>(
        &self,
        f: &mut fmt::Formatter<'_>,
        columns: &[C],
        rows: &[T],
    ) -> fmt::Result;
}

/// Aligned plain-text rows with colored cells.
#[derive(Debug, Clone)]
pub struct TableStyleBasic {
    separator: &'static str,
}

impl TableStyleBasic {
    pub const fn new() -> Self {
        Self { separator: "  " }
    }
}

impl TableStyle for TableStyleBasic {
    fn write_rows<T, C: TableColumn<T>>(
        &self,
        f: &mut fmt::Formatter<'_>,
        columns: &[C],
        rows: &[T],
    ) -> fmt::Result {
        let cells: Vec<Vec<Cow<'_, str>>> = rows
            .iter()
            .map(|row| columns.iter().map(|col| col.format(row)).collect())
            .collect();
        let widths = column_widths(columns.len(), &cells);

        for (row, cells) in rows.iter().zip(&cells) {
            for (i, (col, cell)) in columns.iter().zip(cells).enumerate() {
                let last = i + 1 == columns.len();
                let pad = widths[i].saturating_sub(cell.width());
                let padded = match col.padding_direction() {
                    PaddingDirection::Left if last => cell.to_string(),
                    PaddingDirection::Left => format!("{cell}{}", " ".repeat(pad)),
                    PaddingDirection::Right => format!("{}{cell}", " ".repeat(pad)),
                };

                match col.color(row) {
                    Some(color) => write!(f, "{}", padded.color(color))?,
                    None => write!(f, "{padded}")?,
                }

                if last {
                    writeln!(f)?;
                } else {
                    write!(f, "{}", self.separator)?;
                }
            }
        }
        Ok(())
    }
}

/// A JSON array of objects keyed by column name.
#[derive(Debug, Clone)]
pub struct TableStyleJson;

impl TableStyleJson {
    pub const fn new() -> Self {
        Self
    }
}

impl TableStyle for TableStyleJson {
    fn write_rows<T, C: TableColumn<T>>(
        &self,
        f: &mut fmt::Formatter<'_>,
        columns: &[C],
        rows: &[T],
    ) -> fmt::Result {
        let values: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                let object = columns
                    .iter()
                    .map(|col| {
                        let key = col.name().to_lowercase().replace(' ', "_");
                        (key, serde_json::Value::String(col.format(row).into_owned()))
                    })
                    .collect();
                serde_json::Value::Object(object)
            })
            .collect();

        let text = serde_json::to_string_pretty(&values).map_err(|_| fmt::Error)?;
        write!(f, "{text}")
    }
}

/// A table ready to be displayed.
pub struct Table<'a, S, T, C> {
    style: S,
    columns: &'a [C],
    rows: &'a [T],
}

impl<'a, S: TableStyle, T, C: TableColumn<T>> Table<'a, S, T, C> {
    pub const fn new(style: S, columns: &'a [C], rows: &'a [T]) -> Self {
        Self {
            style,
            columns,
            rows,
        }
    }
}

impl<S: TableStyle, T, C: TableColumn<T>> fmt::Display for Table<'_, S, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.style.write_rows(f, self.columns, self.rows)
    }
}

fn column_widths(n: usize, cells: &[Vec<Cow<'_, str>>]) -> Vec<usize> {
    let mut widths = vec![0; n];
    for row in cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }
    widths
}
