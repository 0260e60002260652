use crate::llm_adapter::LlmAdapter;
use crate::types::{InsightBundle, InsightField, Paper, Result, Section};
use tracing::{debug, info};

/// One extraction rule: the heading that opens a section and the headings that close it.
struct SectionRule {
    field: InsightField,
    terminators: &'static [InsightField],
}

// Each section runs until the next heading that follows it in prompt order.
const RULES: [SectionRule; 6] = [
    SectionRule {
        field: InsightField::QuickSummary,
        terminators: &[
            InsightField::TargetAudience,
            InsightField::KeyComponents,
            InsightField::StructureAnalysis,
            InsightField::ImpactApplications,
            InsightField::TechnicalComplexity,
        ],
    },
    SectionRule {
        field: InsightField::TargetAudience,
        terminators: &[
            InsightField::KeyComponents,
            InsightField::StructureAnalysis,
            InsightField::ImpactApplications,
            InsightField::TechnicalComplexity,
        ],
    },
    SectionRule {
        field: InsightField::KeyComponents,
        terminators: &[
            InsightField::StructureAnalysis,
            InsightField::ImpactApplications,
            InsightField::TechnicalComplexity,
        ],
    },
    SectionRule {
        field: InsightField::StructureAnalysis,
        terminators: &[
            InsightField::ImpactApplications,
            InsightField::TechnicalComplexity,
        ],
    },
    SectionRule {
        field: InsightField::ImpactApplications,
        terminators: &[InsightField::TechnicalComplexity],
    },
    SectionRule {
        field: InsightField::TechnicalComplexity,
        terminators: &[],
    },
];

pub fn insight_prompt(paper: &Paper) -> String {
    format!(
        r#"Analyze this research paper and provide insights in the following format:

Quick Summary
Give a brief, engaging overview of what this paper is about and why it matters.

Target Audience
Who is this paper written for and what background knowledge is needed?

Key Components
What are the main research questions, methodology, and key findings?

Structure Analysis
What are the key points from each section of the paper?

Impact & Applications
What are the practical applications and future implications?

Technical Complexity
What is the difficulty level and what core concepts are needed?

Paper:
"{}" by {}
Abstract: {}

Provide your analysis in clear sections, starting each with the exact headings above."#,
        paper.title,
        paper.authors.join(", "),
        paper.summary
    )
}

fn extract(text: &str, rule: &SectionRule) -> Section {
    let heading = rule.field.heading();
    let Some(position) = text.find(heading) else {
        return Section::Absent;
    };

    let rest = &text[position + heading.len()..];

    // The section also stops where its own heading shows up again.
    let end = std::iter::once(heading)
        .chain(rule.terminators.iter().map(|field| field.heading()))
        .filter_map(|marker| rest.find(marker))
        .min()
        .unwrap_or(rest.len());

    Section::Present(rest[..end].trim().to_string())
}

/// Splits free-text model output into the six insight sections.
///
/// Missing headings become [`Section::Absent`]; this never fails.
pub fn parse_insights(paper_id: &str, text: &str) -> InsightBundle {
    let [quick_summary, target_audience, key_components, structure_analysis, impact_applications, technical_complexity] =
        RULES.map(|rule| extract(text, &rule));

    let bundle = InsightBundle {
        paper_id: paper_id.to_string(),
        quick_summary,
        target_audience,
        key_components,
        structure_analysis,
        impact_applications,
        technical_complexity,
    };

    let absent = bundle.absent_fields();
    if !absent.is_empty() {
        debug!("Model output for {} is missing sections: {:?}", paper_id, absent);
    }

    bundle
}

pub async fn generate_insights(adapter: &dyn LlmAdapter, paper: &Paper) -> Result<InsightBundle> {
    info!("Generating insights for {} with {}", paper.id, adapter.adapter_name());
    let text = adapter.generate(&insight_prompt(paper)).await?;
    Ok(parse_insights(&paper.id, &text))
}
