use anyhow::{bail, Context, Result};
use derive_builder::Builder;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use strum::{Display, EnumString};
use tracing::debug;

// Lecture headers carry ids like "week_54"; the matching content block is
// "week_panel_54".
const LECTURE_ID_PREFIX: &str = "week_";
const CONTENT_ID_PREFIX: &str = "week_panel_";

const CSV_HEADER: [&str; 4] = ["course name", "lecture index", "category", "problem name"];

#[derive(Debug, Builder, Serialize, Deserialize)]
pub struct AcwingExtractor {
    /// Saved question-bank page to read.
    #[builder(setter(into))]
    input: PathBuf,
    /// Course label stamped into every output row.
    #[builder(default)]
    course: Course,
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
pub enum Course {
    Basic,
    #[default]
    Advanced,
    Expert,
}

/// One flattened (course, lecture, category, problem) output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub course: Course,
    pub lecture: String,
    pub category: String,
    pub problem: String,
}

impl AcwingExtractor {
    pub fn extract(&self) -> Result<Vec<Record>> {
        if !self.input.exists() {
            bail!("input file not found: {}", self.input.display());
        }
        debug!(course = %self.course, input = %self.input.display(), "extracting");
        let html = std::fs::read_to_string(&self.input)
            .with_context(|| format!("reading {}", self.input.display()))?;
        Ok(self.extract_from_str(&html))
    }

    /// Walks the lecture → category → problem nesting and returns the rows in
    /// chronological order (the page lists the newest lecture first).
    pub fn extract_from_str(&self, html: &str) -> Vec<Record> {
        let document = Html::parse_document(html);
        let lecture_panels = Selector::parse("div.panel-week").unwrap();
        let lecture_title = Selector::parse("span.week_title").unwrap();
        let rows = Selector::parse("div.row").unwrap();
        let category_label = Selector::parse("span.dayname").unwrap();
        let problem_links = Selector::parse("a.clock-problem-title").unwrap();
        let problem_label = Selector::parse("span").unwrap();

        let mut records = vec![];

        for panel in document.select(&lecture_panels) {
            let lecture = match panel.select(&lecture_title).next().map(stripped_text) {
                Some(title) if !title.is_empty() => title,
                _ => continue,
            };

            let content = panel
                .value()
                .attr("id")
                .and_then(|id| find_content_panel(&document, id));
            let content = match content {
                Some(content) => content,
                None => {
                    debug!(%lecture, "no content panel, skipping lecture");
                    continue;
                }
            };

            for row in content.select(&rows) {
                let category = match row.select(&category_label).next().map(stripped_text) {
                    Some(name) if !name.is_empty() => name,
                    _ => continue,
                };

                for link in row.select(&problem_links) {
                    let problem = match link.select(&problem_label).next().map(stripped_text) {
                        Some(name) if !name.is_empty() => name,
                        _ => continue,
                    };
                    records.push(Record {
                        course: self.course,
                        lecture: lecture.clone(),
                        category: category.clone(),
                        problem,
                    });
                }
            }
        }

        debug!(count = records.len(), "extraction pass done");
        records.reverse();
        records
    }
}

pub fn write_csv(records: &[Record], path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    // Spreadsheet tools key UTF-8 detection off the byte-order mark.
    file.write_all("\u{FEFF}".as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    write_records(file, records)
}

fn write_records<W: Write>(writer: W, records: &[Record]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    // Flush explicitly so write errors surface here instead of on drop.
    csv_writer.flush().context("flushing CSV")?;
    Ok(())
}

fn content_panel_id(header_id: &str) -> String {
    header_id.replacen(LECTURE_ID_PREFIX, CONTENT_ID_PREFIX, 1)
}

fn find_content_panel<'a>(document: &'a Html, header_id: &str) -> Option<ElementRef<'a>> {
    let id = content_panel_id(header_id);
    let selector = Selector::parse(&format!(r#"div[id="{}"]"#, id)).ok()?;
    document.select(&selector).next()
}

fn stripped_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect()
}
