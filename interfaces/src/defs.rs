use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Object style note:
// These are plain records shared between the feed client, the insight
// pipeline and the HTTP surface. Nothing here performs I/O; a Paper is
// immutable once it has been read from the feed.

/// A single arXiv feed entry normalized into the record shape served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Feed entry URL, e.g. `http://arxiv.org/abs/2401.00001v1`.
    pub id: String,
    pub title: String,
    pub summary: String,
    pub authors: Vec<String>,
    pub published: Option<DateTime<Utc>>,
    pub link: String,
}

/// The six labeled sections an insight bundle is made of, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightField {
    QuickSummary,
    TargetAudience,
    KeyComponents,
    StructureAnalysis,
    ImpactApplications,
    TechnicalComplexity,
}

impl InsightField {
    pub const ALL: [InsightField; 6] = [
        InsightField::QuickSummary,
        InsightField::TargetAudience,
        InsightField::KeyComponents,
        InsightField::StructureAnalysis,
        InsightField::ImpactApplications,
        InsightField::TechnicalComplexity,
    ];

    /// Exact heading the model is asked to start the section with.
    pub fn heading(self) -> &'static str {
        match self {
            InsightField::QuickSummary => "Quick Summary",
            InsightField::TargetAudience => "Target Audience",
            InsightField::KeyComponents => "Key Components",
            InsightField::StructureAnalysis => "Structure Analysis",
            InsightField::ImpactApplications => "Impact & Applications",
            InsightField::TechnicalComplexity => "Technical Complexity",
        }
    }

    /// Text shown in place of a section the model did not produce.
    pub fn placeholder(self) -> &'static str {
        match self {
            InsightField::QuickSummary => "Summary not available",
            _ => "Analysis not available",
        }
    }
}

/// Content extracted for one section, or an explicit marker that the heading was missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum Section {
    Present(String),
    Absent,
}

impl Section {
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Section::Present(text) => Some(text),
            Section::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Section::Absent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightBundle {
    pub paper_id: String,
    pub quick_summary: Section,
    pub target_audience: Section,
    pub key_components: Section,
    pub structure_analysis: Section,
    pub impact_applications: Section,
    pub technical_complexity: Section,
}

impl InsightBundle {
    pub fn section(&self, field: InsightField) -> &Section {
        match field {
            InsightField::QuickSummary => &self.quick_summary,
            InsightField::TargetAudience => &self.target_audience,
            InsightField::KeyComponents => &self.key_components,
            InsightField::StructureAnalysis => &self.structure_analysis,
            InsightField::ImpactApplications => &self.impact_applications,
            InsightField::TechnicalComplexity => &self.technical_complexity,
        }
    }

    /// Section text with absent sections rendered as their placeholder.
    pub fn text(&self, field: InsightField) -> &str {
        self.section(field).as_deref().unwrap_or(field.placeholder())
    }

    pub fn absent_fields(&self) -> Vec<InsightField> {
        InsightField::ALL
            .into_iter()
            .filter(|field| self.section(*field).is_absent())
            .collect()
    }

    pub fn view(&self) -> InsightView {
        InsightView {
            paper_id: self.paper_id.clone(),
            quick_summary: self.text(InsightField::QuickSummary).to_string(),
            target_audience: self.text(InsightField::TargetAudience).to_string(),
            key_components: self.text(InsightField::KeyComponents).to_string(),
            structure_analysis: self.text(InsightField::StructureAnalysis).to_string(),
            impact_applications: self.text(InsightField::ImpactApplications).to_string(),
            technical_complexity: self.text(InsightField::TechnicalComplexity).to_string(),
            absent: self.absent_fields(),
        }
    }
}

/// Wire shape of an insight bundle: display text plus the list of sections that fell back to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightView {
    pub paper_id: String,
    pub quick_summary: String,
    pub target_audience: String,
    pub key_components: String,
    pub structure_analysis: String,
    pub impact_applications: String,
    pub technical_complexity: String,
    pub absent: Vec<InsightField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisPair {
    pub x: [String; 2],
    pub y: [String; 2],
}

/// Four-topic breakdown backing the topic map. Topics 1-2 form the x axis, 3-4 the y axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAnalysis {
    pub scores: HashMap<String, f64>,
    pub axes: AxisPair,
}

impl TopicAnalysis {
    pub fn labels(&self) -> [&str; 4] {
        [
            self.axes.x[0].as_str(),
            self.axes.x[1].as_str(),
            self.axes.y[0].as_str(),
            self.axes.y[1].as_str(),
        ]
    }

    /// Reports model output that breaks the prompt's contract. Nothing is corrected.
    pub fn anomalies(&self) -> Vec<String> {
        let mut anomalies = Vec::new();
        let labels = self.labels();

        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                anomalies.push(format!("duplicate topic name: {}", label));
            }
        }

        let mut scored: Vec<(&String, &f64)> = self.scores.iter().collect();
        scored.sort_by(|a, b| a.0.cmp(b.0));
        for (name, score) in scored {
            if !(0.0..=1.0).contains(score) {
                anomalies.push(format!("score out of range for {}: {}", name, score));
            }
        }

        anomalies
    }
}

/// Views a category's papers can be shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    Table,
    Stories,
    Tree,
    TopicMap,
}
