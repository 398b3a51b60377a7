// src/services/extract.rs

//! Entry extraction service.
//!
//! Turns fetched listing markup into candidate entries using the site's
//! configured CSS selectors. Each entry either yields a [`Candidate`] or a
//! typed [`EntrySkip`]; a skipped entry never aborts the remaining ones.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::error::{AppError, Result};
use crate::models::{Candidate, SiteDescriptor};
use crate::utils::url::{is_absolute_http, resolve_link};

/// Reason an individual entry was skipped during extraction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntrySkip {
    /// No element matched the title selector
    #[error("no title element")]
    MissingTitle,

    /// Title element text is empty after trimming
    #[error("empty title")]
    EmptyTitle,

    /// No element matched the link selector
    #[error("no link element")]
    MissingLink,

    /// Link element has no href attribute
    #[error("link element without href")]
    MissingHref,

    /// Resolved link is not an absolute http(s) URL
    #[error("not an absolute URL: {0}")]
    InvalidUrl(String),
}

/// Extract up to `cap` candidates from listing markup, in document order.
///
/// An unparseable selector fails the whole source; the descriptor is broken,
/// not the page.
pub fn extract(html: &str, site: &SiteDescriptor, cap: usize) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(html);

    let entry_sel = parse_selector(&site.video_selector)?;
    let title_sel = parse_selector(&site.title_selector)?;
    let link_sel = parse_selector(&site.link_selector)?;

    let mut candidates = Vec::new();
    for entry in document.select(&entry_sel).take(cap) {
        match parse_entry(&entry, &title_sel, &link_sel, site) {
            Ok(candidate) => candidates.push(candidate),
            Err(skip) => log::debug!("{}: entry skipped: {}", site.name, skip),
        }
    }

    Ok(candidates)
}

/// Parse one entry node into a candidate.
fn parse_entry(
    entry: &ElementRef,
    title_sel: &Selector,
    link_sel: &Selector,
    site: &SiteDescriptor,
) -> std::result::Result<Candidate, EntrySkip> {
    let title_elem = entry.select(title_sel).next().ok_or(EntrySkip::MissingTitle)?;
    let title = normalize_whitespace(&title_elem.text().collect::<String>());
    if title.is_empty() {
        return Err(EntrySkip::EmptyTitle);
    }

    let link_elem = entry.select(link_sel).next().ok_or(EntrySkip::MissingLink)?;
    let href = link_elem.value().attr("href").ok_or(EntrySkip::MissingHref)?;

    let url = resolve_link(&site.base_url, href);
    if !is_absolute_http(&url) {
        return Err(EntrySkip::InvalidUrl(url));
    }

    Ok(Candidate {
        source: site.name.clone(),
        title,
        url,
    })
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
