//! Terminal host: a plain-text document split into pages, one terminal row
//! per unit of scroll.

use std::collections::{BTreeMap, HashMap};

use pagescroll_core::scroll::{
    ContainerKind, HostAdapter, ListenTarget, ListenerId, NativeEvent, StyleProperty,
};
use regex::Regex;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TAB: &str = "    ";

/// Identity of a page of text. A reloaded document gets fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextPageId(u64);

#[derive(Debug, Clone)]
struct TextPage {
    id: TextPageId,
    lines: Vec<String>,
    /// `lines` wrapped to the viewport width
    rows: Vec<String>,
}

/// One visible terminal row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow<'a> {
    pub page: usize,
    pub text: &'a str,
}

#[derive(Debug)]
pub struct TerminalHost {
    pages: Vec<TextPage>,
    next_page: u64,
    width: u16,
    height: u16,
    scroll: f64,
    styles: HashMap<StyleProperty, String>,
    listeners: BTreeMap<ListenerId, (NativeEvent, Option<TextPageId>)>,
    next_listener: u64,
    scrolled: bool,
}

impl TerminalHost {
    pub fn from_text(text: &str, separator: &Regex) -> Self {
        let mut host = Self {
            pages: Vec::new(),
            next_page: 0,
            width: 0,
            height: 0,
            scroll: 0.0,
            styles: HashMap::from([(StyleProperty::OverflowY, "auto".to_string())]),
            listeners: BTreeMap::new(),
            next_listener: 0,
            scrolled: false,
        };
        host.set_document(text, separator);
        host
    }

    /// Replace the whole document
    pub fn set_document(&mut self, text: &str, separator: &Regex) {
        self.pages = split_pages(text, separator)
            .into_iter()
            .map(|lines| {
                let id = TextPageId(self.next_page);
                self.next_page += 1;
                let rows = wrap_lines(&lines, self.width);
                TextPage { id, lines, rows }
            })
            .collect();
        self.clamp_scroll();
    }

    /// Returns true when the size actually changed
    pub fn set_viewport(&mut self, width: u16, height: u16) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        if width != self.width {
            self.width = width;
            for page in &mut self.pages {
                page.rows = wrap_lines(&page.lines, width);
            }
        }
        self.height = height;
        self.clamp_scroll();
        true
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Native scroll by `rows`. Nothing happens while overflow is hidden.
    pub fn scroll_by(&mut self, rows: f64) -> bool {
        if self.style(StyleProperty::OverflowY) == "hidden" {
            return false;
        }
        let before = self.scroll;
        self.set_scroll_position(self.scroll + rows);
        self.scroll != before
    }

    /// True once after the scroll position changed
    pub fn take_scrolled(&mut self) -> bool {
        std::mem::take(&mut self.scrolled)
    }

    pub fn is_listening(&self, event: NativeEvent) -> bool {
        self.listeners.values().any(|(e, _)| *e == event)
    }

    /// Whether `event` has a listener on the page at `index`
    pub fn is_listening_on(&self, index: usize, event: NativeEvent) -> bool {
        let Some(page) = self.pages.get(index) else {
            return false;
        };
        self.listeners
            .values()
            .any(|(e, target)| *e == event && *target == Some(page.id))
    }

    /// Page under a row of the viewport
    pub fn page_at_row(&self, row: u16) -> Option<usize> {
        let y = self.first_row() + row as usize;
        let mut top = 0;
        for (index, page) in self.pages.iter().enumerate() {
            let bottom = top + page.rows.len();
            if y >= top && y < bottom {
                return Some(index);
            }
            top = bottom;
        }
        None
    }

    /// The rows currently inside the viewport
    pub fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(page, p)| p.rows.iter().map(move |text| VisibleRow { page, text }))
            .skip(self.first_row())
            .take(self.height as usize)
            .collect()
    }

    fn first_row(&self) -> usize {
        self.scroll.round().max(0.0) as usize
    }

    fn total_rows(&self) -> usize {
        self.pages.iter().map(|p| p.rows.len()).sum()
    }

    fn max_scroll(&self) -> f64 {
        (self.total_rows() as f64 - self.height as f64).max(0.0)
    }

    fn clamp_scroll(&mut self) {
        let clamped = self.scroll.clamp(0.0, self.max_scroll());
        if clamped != self.scroll {
            self.scroll = clamped;
            self.scrolled = true;
        }
    }
}

impl HostAdapter for TerminalHost {
    type Page = TextPageId;

    fn container_kind(&self) -> ContainerKind {
        ContainerKind::Element
    }

    // A text document has a single kind of page
    fn pages(&self, _selector: &str) -> Vec<TextPageId> {
        self.pages.iter().map(|p| p.id).collect()
    }

    fn viewport_height(&self) -> f64 {
        self.height as f64
    }

    fn scroll_height(&self) -> f64 {
        self.total_rows().max(self.height as usize) as f64
    }

    fn content_top(&self) -> f64 {
        -self.scroll
    }

    fn page_top(&self, page: &TextPageId) -> f64 {
        let above: usize = self
            .pages
            .iter()
            .take_while(|p| p.id != *page)
            .map(|p| p.rows.len())
            .sum();
        self.content_top() + above as f64
    }

    fn page_height(&self, page: &TextPageId) -> f64 {
        self.pages
            .iter()
            .find(|p| p.id == *page)
            .map_or(0.0, |p| p.rows.len() as f64)
    }

    fn scroll_position(&self) -> f64 {
        self.scroll
    }

    fn set_scroll_position(&mut self, y: f64) {
        let clamped = y.clamp(0.0, self.max_scroll());
        if clamped != self.scroll {
            self.scroll = clamped;
            self.scrolled = true;
        }
    }

    fn style(&self, property: StyleProperty) -> String {
        self.styles.get(&property).cloned().unwrap_or_default()
    }

    fn set_style(&mut self, property: StyleProperty, value: &str) {
        self.styles.insert(property, value.to_string());
    }

    fn listen(&mut self, target: ListenTarget<'_, TextPageId>, event: NativeEvent) -> ListenerId {
        let page = match target {
            ListenTarget::Page { page, .. } => Some(*page),
            _ => None,
        };
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, (event, page));
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

/// Split `text` on lines matching `separator`. Separator lines are dropped,
/// so are blank lines at the edges of a page and pages left empty.
pub fn split_pages(text: &str, separator: &Regex) -> Vec<Vec<String>> {
    let mut pages = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        if separator.is_match(line) {
            push_page(&mut pages, std::mem::take(&mut current));
        } else {
            current.push(line.replace('\t', TAB));
        }
    }
    push_page(&mut pages, current);
    pages
}

fn push_page(pages: &mut Vec<Vec<String>>, mut lines: Vec<String>) {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let first = lines.iter().position(|l| !l.trim().is_empty());
    if let Some(first) = first {
        lines.drain(..first);
        pages.push(lines);
    }
}

fn wrap_lines(lines: &[String], width: u16) -> Vec<String> {
    lines.iter().flat_map(|line| wrap(line, width as usize)).collect()
}

/// Hard-wrap a line at `width` display columns
fn wrap(line: &str, width: usize) -> Vec<String> {
    if width == 0 || line.width() <= width {
        return vec![line.to_string()];
    }

    let mut rows = Vec::new();
    let mut row = String::new();
    let mut row_width = 0;
    for ch in line.chars() {
        let w = ch.width().unwrap_or(0);
        if row_width + w > width && !row.is_empty() {
            rows.push(std::mem::take(&mut row));
            row_width = 0;
        }
        row.push(ch);
        row_width += w;
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}
