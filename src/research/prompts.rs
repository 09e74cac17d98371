use super::Depth;
use crate::search::SearchResult;

pub const SOURCE_ANALYSIS_TEMPLATE: &str = "Analyze the following search results and evaluate their credibility, key findings, \
and relevance. Format your analysis as a structured list with clear sections.\n\n\
Sources:\n{sources}";

pub const BRIEF_SYNTHESIS_TEMPLATE: &str = "{prompt}\n\n\
Based on the analysis below:\n{source_analysis}\n\n\
Provide a concise 2-3 sentence overview answering the query:\n{query}\n\n\
Structure your response in clear paragraphs. \
If necessary, include a novel example of the topic to illustrate your point. \
Include inline citations (e.g., [Source 1]) where applicable.";

pub const DETAILED_SYNTHESIS_TEMPLATE: &str = "{prompt}\n\n\
Based on the analysis below:\n{source_analysis}\n\n\
Provide a detailed answer for the query:\n{query}\n\n\
Structure your response with these sections:\n\n\
## Overview\n\n\
## Key Findings\n\n\
## Analysis of Contradictions\n\n\
Ensure each section is clearly written and use inline citations (e.g., [Source 2]). \
Include relevant examples where appropriate.";

pub const COMPREHENSIVE_SYNTHESIS_TEMPLATE: &str = "{prompt}\n\n\
Based on the analysis below:\n{source_analysis}\n\n\
Provide a comprehensive research report for the query:\n{query}\n\n\
Your report should include the following sections with proper headers:\n\n\
## Executive Summary\n\n\
## Historical Context\n\n\
## Technical Analysis\n\n\
## Challenges & Future Outlook\n\n\
## Expert Insights\n\n\
Ensure that the report is organized in clear paragraphs. \
If needed, provide novel examples of the topic to clarify complex points. \
Reference all sources with inline citations (e.g., [Source 3]).";

pub fn synthesis_template(depth: Depth) -> &'static str {
    match depth {
        Depth::Brief => BRIEF_SYNTHESIS_TEMPLATE,
        Depth::Detailed => DETAILED_SYNTHESIS_TEMPLATE,
        Depth::Comprehensive => COMPREHENSIVE_SYNTHESIS_TEMPLATE,
    }
}

/// The research instruction that fills `{prompt}` in the synthesis template.
pub fn instruction_prompt(depth: Depth, topic: &str) -> String {
    match depth {
        Depth::Brief => format!(
            "Research '{topic}' and provide a concise 2-3 sentence overview that explains \
             ONLY the most essential facts someone needs to know. Focus on the present \
             state and most critical aspects."
        ),
        Depth::Detailed => format!(
            "Research '{topic}' and provide a structured analysis with these specific sections:\n\
             1. Brief Definition/Overview (2-3 sentences)\n\
             2. Historical Context: Key developments and milestones\n\
             3. Current State: Major components and recent developments\n\
             4. Future Implications: Upcoming trends and potential impacts\n\
             Use specific examples and data points where possible."
        ),
        Depth::Comprehensive => format!(
            "Perform an exhaustive analysis of '{topic}' with these required components:\n\
             1. Executive Summary (3-4 sentences)\n\
             2. Historical Evolution: Detailed timeline of major developments\n\
             3. Technical Deep-Dive: Core concepts, mechanisms, and relationships\n\
             4. Current Landscape: Key players, technologies, and methodologies\n\
             5. Challenges & Controversies: Major obstacles and debates\n\
             6. Future Outlook: Emerging trends, predictions, and potential breakthroughs\n\
             7. Expert Insights: Include specific quotes or findings from leading authorities\n\
             Use multiple sources and provide specific examples, statistics, and citations."
        ),
    }
}

/// Numbered `[Source i]` blocks, one per result, starting at 1.
pub fn format_sources(sources: &[SearchResult]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "[Source {}]\nTitle: {}\nURL: {}\nSnippet: {}\n",
                i + 1,
                s.title,
                s.url,
                s.snippet
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces `{name}` placeholders in one pass. Substituted text is never
/// re-scanned, and unknown placeholders are left as written.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let substitution = after.find('}').and_then(|end| {
            let name = &after[..end];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (end, *value))
        });

        match substitution {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_numbered_source_blocks() {
        let sources = vec![
            SearchResult::new("Qubits", "https://a.example", "A qubit is..."),
            SearchResult::new("Gates", "https://b.example", "Quantum gates..."),
        ];
        let text = format_sources(&sources);
        assert_eq!(
            text,
            "[Source 1]\nTitle: Qubits\nURL: https://a.example\nSnippet: A qubit is...\n\n\
             [Source 2]\nTitle: Gates\nURL: https://b.example\nSnippet: Quantum gates...\n"
        );
    }

    #[test]
    fn no_sources_formats_to_empty() {
        assert_eq!(format_sources(&[]), "");
    }

    #[test]
    fn render_does_not_rescan_substituted_text() {
        let out = render(
            "{prompt} | {source_analysis} | {query}",
            &[
                ("prompt", "P"),
                ("source_analysis", "mentions {query} literally"),
                ("query", "Q"),
            ],
        );
        assert_eq!(out, "P | mentions {query} literally | Q");
    }

    #[test]
    fn render_keeps_unknown_and_unbalanced_braces() {
        assert_eq!(render("a {x} b {", &[("y", "1")]), "a {x} b {");
        assert_eq!(render("{{y}}", &[("y", "1")]), "{1}");
    }

    #[test]
    fn every_synthesis_template_has_all_placeholders() {
        for depth in Depth::ALL {
            let template = synthesis_template(depth);
            for placeholder in ["{prompt}", "{source_analysis}", "{query}"] {
                assert!(template.contains(placeholder), "{depth} missing {placeholder}");
            }
        }
    }

    #[test]
    fn templates_are_distinct_per_depth() {
        assert!(synthesis_template(Depth::Brief).contains("concise 2-3 sentence overview"));
        assert!(synthesis_template(Depth::Detailed).contains("## Analysis of Contradictions"));
        assert!(synthesis_template(Depth::Comprehensive).contains("## Expert Insights"));
        assert_ne!(
            synthesis_template(Depth::Brief),
            synthesis_template(Depth::Detailed)
        );
    }

    #[test]
    fn instruction_prompt_quotes_topic() {
        for depth in Depth::ALL {
            assert!(instruction_prompt(depth, "Rust").contains("'Rust'"));
        }
        assert!(instruction_prompt(Depth::Comprehensive, "Rust").contains("7. Expert Insights"));
    }
}
