// src/cli/display.rs

use crate::application::view::{BookmarkItem, Content, SidebarEntry, View};
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

/// Prints the whole view: category list first, then the bookmark area
pub fn write_view<W: WriteColor>(out: &mut W, view: &View) -> io::Result<()> {
    write_sidebar(out, &view.sidebar, view.allow_drag)?;
    writeln!(out)?;

    match &view.content {
        Content::Grouped { groups } => {
            if groups.is_empty() {
                write_dimmed(out, "No bookmarks yet")?;
            }
            for group in groups {
                let marker = if group.collapsed { "▸" } else { "▾" };
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
                write!(out, "{} {}", marker, group.name)?;
                out.reset()?;
                writeln!(out, " [{}]", group.category_id)?;

                if group.collapsed {
                    write_dimmed(out, &format!("    {} hidden", group.bookmarks.len()))?;
                } else {
                    for bookmark in &group.bookmarks {
                        write_bookmark(out, bookmark)?;
                    }
                }
            }
        }
        Content::Flat { bookmarks, .. } => {
            for bookmark in bookmarks {
                write_bookmark(out, bookmark)?;
            }
        }
        Content::Empty { .. } => write_dimmed(out, "No bookmarks in this category")?,
    }
    out.flush()
}

fn write_sidebar<W: WriteColor>(
    out: &mut W,
    sidebar: &[SidebarEntry],
    allow_drag: bool,
) -> io::Result<()> {
    for entry in sidebar {
        if entry.active {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
            write!(out, "* ")?;
        } else {
            write!(out, "  ")?;
        }
        write!(out, "{} ({})", entry.name, entry.bookmark_count)?;
        out.reset()?;
        writeln!(out, "  [{}]", entry.target)?;
    }
    if allow_drag {
        write_dimmed(out, "  (category reordering enabled)")?;
    }
    Ok(())
}

fn write_bookmark<W: WriteColor>(out: &mut W, bookmark: &BookmarkItem) -> io::Result<()> {
    write!(out, "    [{}] ", bookmark.id)?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::White)).set_bold(true))?;
    write!(out, "{}", bookmark.name)?;
    out.reset()?;
    if let Some(host) = &bookmark.host {
        write!(out, " ({})", host)?;
    }
    writeln!(out)?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)))?;
    write!(out, "        {}", bookmark.url)?;
    out.reset()?;
    writeln!(out)
}

fn write_dimmed<W: WriteColor>(out: &mut W, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_dimmed(true))?;
    write!(out, "{}", text)?;
    out.reset()?;
    writeln!(out)
}

pub fn write_view_json<W: Write>(out: &mut W, view: &View) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, view)?;
    writeln!(out)?;
    out.flush()
}
