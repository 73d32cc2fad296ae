//! Where markup and notices end up.
//!
//! The controller only sees [`Surface`] and [`Notifier`]; the terminal implementations
//! below print regions to stdout, notices to stderr, and can mirror both regions into an
//! HTML page on disk.

use anyhow::{Context, Result};
use colored::*;
use std::io::{self, Write};
use std::path::PathBuf;

pub const LIST_REGION: &str = "country-list";
pub const DETAIL_REGION: &str = "country-info";

/// The two display regions. Every call fully replaces a region's content.
pub trait Surface: Send + 'static {
    fn replace_list(&mut self, markup: &str) -> Result<()>;
    fn replace_detail(&mut self, markup: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// User-facing messages.
pub trait Notifier: Send + 'static {
    fn info(&mut self, message: &str);
    fn failure(&mut self, message: &str);
}

#[derive(Debug, Default)]
pub struct TerminalSurface {
    page: Option<PageFile>,
}

impl TerminalSurface {
    pub fn new(page: Option<PathBuf>) -> Self {
        Self {
            page: page.map(PageFile::new),
        }
    }

    fn print_region(&self, region: &str, markup: &str) -> Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", format!(".{region}").as_str().cyan().bold())?;
        writeln!(out, "{markup}")?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn replace_list(&mut self, markup: &str) -> Result<()> {
        self.print_region(LIST_REGION, markup)?;
        if let Some(page) = self.page.as_mut() {
            page.list = markup.to_string();
            page.info.clear();
            page.write()?;
        }
        Ok(())
    }

    fn replace_detail(&mut self, markup: &str) -> Result<()> {
        self.print_region(DETAIL_REGION, markup)?;
        if let Some(page) = self.page.as_mut() {
            page.list.clear();
            page.info = markup.to_string();
            page.write()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if let Some(page) = self.page.as_mut() {
            page.list.clear();
            page.info.clear();
            page.write()?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn info(&mut self, message: &str) {
        eprintln!("{}: {}", "Info".cyan().bold(), message);
    }

    fn failure(&mut self, message: &str) {
        eprintln!("{}: {}", "Failure".red().bold(), message);
    }
}

/// A standalone HTML page holding both regions, rewritten on every change.
#[derive(Debug)]
struct PageFile {
    path: PathBuf,
    list: String,
    info: String,
}

impl PageFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            list: String::new(),
            info: String::new(),
        }
    }

    fn html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head><meta charset=\"utf-8\"><title>flagly</title></head>\n\
             <body>\n\
             <input type=\"text\" id=\"search-box\"/>\n\
             <ul class=\"{LIST_REGION}\">{}</ul>\n\
             <div class=\"{DETAIL_REGION}\">{}</div>\n\
             </body>\n\
             </html>\n",
            self.list, self.info
        )
    }

    fn write(&self) -> Result<()> {
        std::fs::write(&self.path, self.html())
            .with_context(|| format!("Failed to write page '{}'", self.path.display()))
    }
}
