//! Dependency graph rendering (Graphviz DOT, Mermaid)

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::analysis::assessment::{RiskAssessment, RiskLevel};
use crate::analysis::batch::BomAnalysis;
use crate::core::store::normalize_key;

fn fill(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Alto => "#f8d7da",
        RiskLevel::Medio => "#fff3cd",
        RiskLevel::Basso => "#d4edda",
    }
}

/// One node per part, first occurrence wins
fn nodes(analysis: &BomAnalysis) -> BTreeMap<String, &RiskAssessment> {
    let mut out = BTreeMap::new();
    for a in analysis.assessments() {
        out.entry(normalize_key(&a.part_number)).or_insert(a);
    }
    out
}

fn mermaid_id(key: &str) -> String {
    let id: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("n_{}", id)
}

/// Graphviz DOT, edges pointing from dependent to dependency
pub fn to_dot(analysis: &BomAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph dependencies {{");
    let _ = writeln!(out, "  rankdir=LR;");
    let _ = writeln!(out, "  node [shape=box, style=filled];");
    let _ = writeln!(out);

    for a in nodes(analysis).values() {
        let level = a.effective_level();
        let border = if a.spof { ", color=red, penwidth=3" } else { "" };
        let spof = if a.spof { "\\nSPOF" } else { "" };
        let _ = writeln!(
            out,
            "  \"{}\" [label=\"{}\\n{:.1} {}{}\", fillcolor=\"{}\"{}];",
            a.part_number,
            a.part_number,
            a.effective_score(),
            level,
            spof,
            fill(level),
            border
        );
    }
    for (from, to) in &analysis.graph.edges {
        let _ = writeln!(out, "  \"{}\" -> \"{}\";", from, to);
    }
    let _ = writeln!(out, "}}");
    out
}

/// Mermaid flowchart
pub fn to_mermaid(analysis: &BomAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "graph LR");

    let nodes = nodes(analysis);
    for (key, a) in &nodes {
        let spof = if a.spof { " SPOF" } else { "" };
        let _ = writeln!(
            out,
            "  {}[\"{}<br/>{:.1} {}{}\"]",
            mermaid_id(key),
            a.part_number,
            a.effective_score(),
            a.effective_level(),
            spof
        );
    }
    for (from, to) in &analysis.graph.edges {
        let _ = writeln!(
            out,
            "  {} --> {}",
            mermaid_id(&normalize_key(from)),
            mermaid_id(&normalize_key(to))
        );
    }
    for level in [RiskLevel::Alto, RiskLevel::Medio, RiskLevel::Basso] {
        let _ = writeln!(out, "  classDef {} fill:{}", level.to_string().to_lowercase(), fill(level));
    }
    for (key, a) in &nodes {
        let _ = writeln!(
            out,
            "  class {} {}",
            mermaid_id(key),
            a.effective_level().to_string().to_lowercase()
        );
    }
    out
}
