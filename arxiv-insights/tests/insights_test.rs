mod common;

use arxiv_insights::insights::{generate_insights, insight_prompt, parse_insights};
use arxiv_insights::{InsightField, LlmAdapter, MockLlmAdapter, Section};
use common::{init_tracing, sample_paper, SIX_SECTION_OUTPUT};

#[test]
fn test_well_formed_output_extracts_every_section() {
    init_tracing();

    let bundle = parse_insights("paper-1", SIX_SECTION_OUTPUT);

    assert_eq!(bundle.paper_id, "paper-1");
    assert_eq!(
        bundle.quick_summary,
        Section::Present("A planner built from a language model.".to_string())
    );
    assert_eq!(bundle.text(InsightField::TargetAudience), "Researchers in automated planning.");
    assert_eq!(bundle.text(InsightField::KeyComponents), "Prompted search over action sequences.");
    assert_eq!(bundle.text(InsightField::StructureAnalysis), "Introduction, method, experiments.");
    assert_eq!(bundle.text(InsightField::ImpactApplications), "Household robots and logistics.");
    assert_eq!(
        bundle.text(InsightField::TechnicalComplexity),
        "Intermediate; assumes familiarity with transformers."
    );
    assert!(bundle.absent_fields().is_empty());
}

#[test]
fn test_missing_headings_are_absent_with_placeholders() {
    let text = "Quick Summary\nShort.\n\nStructure Analysis\nThree parts.";
    let bundle = parse_insights("paper-2", text);

    assert_eq!(bundle.text(InsightField::QuickSummary), "Short.");
    assert_eq!(bundle.text(InsightField::StructureAnalysis), "Three parts.");

    assert!(bundle.target_audience.is_absent());
    assert_eq!(bundle.text(InsightField::TargetAudience), "Analysis not available");
    assert_eq!(bundle.text(InsightField::KeyComponents), "Analysis not available");
    assert_eq!(bundle.text(InsightField::ImpactApplications), "Analysis not available");
    assert_eq!(bundle.text(InsightField::TechnicalComplexity), "Analysis not available");
    assert_eq!(
        bundle.absent_fields(),
        vec![
            InsightField::TargetAudience,
            InsightField::KeyComponents,
            InsightField::ImpactApplications,
            InsightField::TechnicalComplexity,
        ]
    );
}

#[test]
fn test_missing_summary_uses_summary_placeholder() {
    let bundle = parse_insights("paper-3", "nothing useful here");

    assert_eq!(bundle.text(InsightField::QuickSummary), "Summary not available");
    assert_eq!(bundle.absent_fields().len(), 6);

    let view = bundle.view();
    assert_eq!(view.quick_summary, "Summary not available");
    assert_eq!(view.technical_complexity, "Analysis not available");
    assert_eq!(view.absent.len(), 6);
}

#[test]
fn test_empty_section_is_present_not_absent() {
    let text = "Quick Summary\nTarget Audience\nEveryone.";
    let bundle = parse_insights("paper-4", text);

    assert_eq!(bundle.quick_summary, Section::Present(String::new()));
    assert_eq!(bundle.text(InsightField::TargetAudience), "Everyone.");
}

#[test]
fn test_reordered_output_degrades_without_failing() {
    let text = "Technical Complexity\nHard.\nQuick Summary\nOverview.";
    let bundle = parse_insights("paper-5", text);

    // Only later headings end a section, so the complexity section runs over the summary.
    assert_eq!(bundle.text(InsightField::QuickSummary), "Overview.");
    assert_eq!(
        bundle.text(InsightField::TechnicalComplexity),
        "Hard.\nQuick Summary\nOverview."
    );
}

#[test]
fn test_repeated_heading_ends_the_section() {
    let text = "Quick Summary\nFirst take.\nQuick Summary\nSecond take.\nTarget Audience\nStudents.";
    let bundle = parse_insights("paper-6", text);

    assert_eq!(bundle.text(InsightField::QuickSummary), "First take.");
    assert_eq!(bundle.text(InsightField::TargetAudience), "Students.");
}

#[test]
fn test_prompt_carries_paper_and_headings() {
    let prompt = insight_prompt(&sample_paper());

    assert!(prompt.contains("\"Learning to Plan with Language Models\" by Ada Lovelace, Alan Turing"));
    assert!(prompt.contains("Abstract: We study how large language models can be used as planners."));
    for field in InsightField::ALL {
        assert!(prompt.contains(field.heading()), "missing heading {}", field.heading());
    }
}

#[tokio::test]
async fn test_generate_insights_with_mock_adapter() {
    init_tracing();

    let adapter = MockLlmAdapter::new("insights".to_string()).then_ok(SIX_SECTION_OUTPUT);
    let paper = sample_paper();

    let bundle = generate_insights(&adapter, &paper).await.unwrap();

    assert_eq!(adapter.calls(), 1);
    assert_eq!(bundle.paper_id, paper.id);
    assert_eq!(bundle.text(InsightField::KeyComponents), "Prompted search over action sequences.");
}

#[tokio::test]
async fn test_generate_insights_surfaces_adapter_errors() {
    let adapter = MockLlmAdapter::new("failing".to_string()).then_err("500 backend exploded");

    let err = generate_insights(&adapter, &sample_paper()).await.unwrap_err();

    assert!(err.to_string().contains("backend exploded"));
    assert!(adapter.adapter_name().contains("failing"));
}
