use crate::types::{InsightBundle, InsightField, Paper, Tab};

pub const LOADING_SLIDE: &str = "Generating insights...";
const HIGHLIGHT_CHUNK_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub title: String,
    pub content: String,
}

impl Slide {
    fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Navigation state for one category's papers: active tab, current paper, current slide.
#[derive(Debug, Clone)]
pub struct PaperSession {
    category: String,
    papers: Vec<Paper>,
    tab: Tab,
    paper_index: usize,
    slide_index: usize,
}

impl PaperSession {
    pub fn new(category: impl Into<String>, papers: Vec<Paper>) -> Self {
        Self {
            category: category.into(),
            papers,
            tab: Tab::default(),
            paper_index: 0,
            slide_index: 0,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn paper_index(&self) -> usize {
        self.paper_index
    }

    pub fn slide_index(&self) -> usize {
        self.slide_index
    }

    pub fn current_paper(&self) -> Option<&Paper> {
        self.papers.get(self.paper_index)
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Stories and tree views render insight sections.
    pub fn needs_insights(&self) -> bool {
        matches!(self.tab, Tab::Stories | Tab::Tree) && self.current_paper().is_some()
    }

    pub fn needs_topics(&self) -> bool {
        self.tab == Tab::TopicMap && self.current_paper().is_some()
    }

    /// Moves to the next paper and rewinds to its first slide. Returns false at the end.
    pub fn next_paper(&mut self) -> bool {
        if self.paper_index + 1 < self.papers.len() {
            self.paper_index += 1;
            self.slide_index = 0;
            true
        } else {
            false
        }
    }

    pub fn prev_paper(&mut self) -> bool {
        if self.paper_index > 0 {
            self.paper_index -= 1;
            self.slide_index = 0;
            true
        } else {
            false
        }
    }

    pub fn next_slide(&mut self, slide_count: usize) -> bool {
        if self.slide_index + 1 < slide_count {
            self.slide_index += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_slide(&mut self) -> bool {
        if self.slide_index > 0 {
            self.slide_index -= 1;
            true
        } else {
            false
        }
    }
}

/// Insight slides for the current paper, or a single loading slide until the bundle exists.
pub fn slides(bundle: Option<&InsightBundle>) -> Vec<Slide> {
    match bundle {
        Some(bundle) => InsightField::ALL
            .into_iter()
            .map(|field| Slide::new(field.heading(), bundle.text(field)))
            .collect(),
        None => vec![Slide::new("loading", LOADING_SLIDE)],
    }
}

/// Title, authors, then the abstract cut into chunks of at most 200 characters at whitespace.
pub fn paper_highlights(paper: &Paper) -> Vec<Slide> {
    let mut highlights = vec![
        Slide::new("Title", paper.title.clone()),
        Slide::new("Authors", paper.authors.join(", ")),
    ];

    for (i, chunk) in chunk_text(&paper.summary, HIGHLIGHT_CHUNK_CHARS)
        .into_iter()
        .enumerate()
    {
        highlights.push(Slide::new(format!("Summary {}", i + 1), chunk));
    }

    highlights
}

fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        let needed = if current.is_empty() {
            word_chars
        } else {
            current_chars + 1 + word_chars
        };

        if needed > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        // A single word longer than a chunk is hard-split.
        if word_chars > max_chars {
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
