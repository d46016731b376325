//! Output formatting for search hits and tree statistics

use crate::index::TreeStats;
use crate::index::build::SearchHit;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print hits in ripgrep-style format, `path:line:content` or grouped under headings
pub fn print_hits(hits: &[SearchHit<'_>], choice: ColorChoice, heading: bool) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    write_hits(&mut stdout, hits, heading)
}

pub fn write_hits<W: WriteColor>(out: &mut W, hits: &[SearchHit<'_>], heading: bool) -> io::Result<()> {
    let mut current_file: Option<&Path> = None;

    for hit in hits {
        let is_new_file = current_file.map(|p| p != hit.path).unwrap_or(true);

        if is_new_file && heading {
            if current_file.is_some() {
                // Blank line between files
                writeln!(out)?;
            }
            out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
            writeln!(out, "{}", hit.path.display())?;
            out.reset()?;
        }
        current_file = Some(hit.path);

        if !heading {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
            write!(out, "{}", hit.path.display())?;
            out.reset()?;
            write!(out, ":")?;
        }

        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{}", hit.line_number)?;
        out.reset()?;
        write!(out, ":")?;

        write_highlighted(out, hit.content, hit.match_start, hit.match_end)?;
        writeln!(out)?;
    }

    Ok(())
}

/// Write `content` with `[start, end)` highlighted
fn write_highlighted<W: WriteColor>(out: &mut W, content: &str, start: usize, end: usize) -> io::Result<()> {
    let safe_start = start.min(content.len());
    let safe_end = end.min(content.len());
    if safe_end <= safe_start
        || !content.is_char_boundary(safe_start)
        || !content.is_char_boundary(safe_end)
    {
        return write!(out, "{}", content);
    }

    write!(out, "{}", &content[..safe_start])?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(out, "{}", &content[safe_start..safe_end])?;
    out.reset()?;
    write!(out, "{}", &content[safe_end..])
}

/// Print each matching file once (for -l)
pub fn print_files_only(hits: &[SearchHit<'_>], choice: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    let mut last: Option<&Path> = None;

    // Hits arrive in file order, so duplicates are adjacent
    for hit in hits {
        if last != Some(hit.path) {
            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
            writeln!(stdout, "{}", hit.path.display())?;
            stdout.reset()?;
            last = Some(hit.path);
        }
    }

    Ok(())
}

/// Print matching line count per file (for -c)
pub fn print_match_counts(hits: &[SearchHit<'_>], choice: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);

    for (path, count) in count_by_file(hits) {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(stdout, "{}", path.display())?;
        stdout.reset()?;
        write!(stdout, ":")?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(stdout, "{}", count)?;
        stdout.reset()?;
    }

    Ok(())
}

fn count_by_file<'a>(hits: &[SearchHit<'a>]) -> Vec<(&'a Path, usize)> {
    let mut counts: Vec<(&Path, usize)> = Vec::new();
    for hit in hits {
        match counts.last_mut() {
            Some((path, count)) if *path == hit.path => *count += 1,
            _ => counts.push((hit.path, 1)),
        }
    }
    counts
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, value)?;
    writeln!(lock)
}

#[derive(Serialize)]
struct CorpusStatsReport<'a> {
    files: usize,
    lines: usize,
    skipped_files: usize,
    skipped_lines: usize,
    tree: &'a TreeStats,
}

/// Print corpus and tree statistics as JSON
pub fn print_stats_json(
    files: usize,
    lines: usize,
    skipped_files: usize,
    skipped_lines: usize,
    tree: &TreeStats,
) -> io::Result<()> {
    print_json(&CorpusStatsReport {
        files,
        lines,
        skipped_files,
        skipped_lines,
        tree,
    })
}
