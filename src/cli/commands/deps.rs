//! `srt deps` command - dependency graph, cycles and SPOFs

use clap::ValueEnum;
use console::style;
use miette::Result;

use crate::analysis::render::{to_dot, to_mermaid};
use crate::analysis::{BatchScorer, BomAnalysis};
use crate::cli::helpers::{open_session, print_structured, BomInput};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GraphFormat {
    /// Chain scores and SPOFs as tables
    #[default]
    Table,
    /// Graphviz DOT (pipe to `dot -Tsvg`)
    Dot,
    /// Mermaid flowchart
    Mermaid,
}

#[derive(clap::Args, Debug)]
pub struct DepsArgs {
    #[command(flatten)]
    pub input: BomInput,

    /// Graph rendering
    #[arg(long, short = 'g', value_enum, default_value_t = GraphFormat::Table)]
    pub graph: GraphFormat,
}

pub fn run(args: DepsArgs, global: &GlobalOpts) -> Result<()> {
    let session = open_session(global)?;
    let (_, request) = args.input.request(&session.project)?;
    let scorer = BatchScorer::new(&session.scoring, &session.store);
    let analysis = scorer.analyze(&request, 0);

    match args.graph {
        GraphFormat::Dot => {
            print!("{}", to_dot(&analysis));
            return Ok(());
        }
        GraphFormat::Mermaid => {
            print!("{}", to_mermaid(&analysis));
            return Ok(());
        }
        GraphFormat::Table => {}
    }

    if print_structured(&analysis.graph, session.format)? {
        return Ok(());
    }

    let chain = chain_table(&analysis);
    if session.format != OutputFormat::Auto {
        print!("{}", chain.render(session.format));
        return Ok(());
    }

    let graph = &analysis.graph;
    println!(
        "{} node(s), {} edge(s), {} cycle(s), {} SPOF(s)",
        graph.node_count,
        graph.edges.len(),
        graph.cycles().count(),
        graph.spofs.len()
    );
    if global.quiet {
        return Ok(());
    }
    println!();
    println!("{}", chain.render(OutputFormat::Auto));

    if !graph.spofs.is_empty() {
        println!();
        println!("{}", style("Single points of failure").bold());
        let mut spofs = Table::new(["PART", "SCORE", "DIRECT DEPENDENTS", "AFFECTED"]);
        for s in &graph.spofs {
            spofs.push([
                s.part_number.clone(),
                format!("{:.1}", s.score),
                s.direct_dependents.join(", "),
                s.affected.len().to_string(),
            ]);
        }
        println!("{}", spofs.render(OutputFormat::Auto));
    }

    if !graph.issues.is_empty() {
        println!();
        for issue in &graph.issues {
            println!("{} {}", style("!").yellow(), issue);
        }
    }
    Ok(())
}

fn chain_table(analysis: &BomAnalysis) -> Table {
    let mut table = Table::new(["PART", "OWN", "CHAIN", "LEVEL", "INHERITED FROM", "DEPENDS ON"]);
    for a in analysis.assessments() {
        let (inherited, depends_on) = match &a.chain {
            Some(c) => (
                c.inherited_from.clone().unwrap_or_default(),
                c.depends_on.join(", "),
            ),
            None => (String::new(), String::new()),
        };
        table.push([
            a.part_number.clone(),
            format!("{:.1}", a.score),
            format!("{:.1}", a.effective_score()),
            a.effective_level().to_string(),
            inherited,
            depends_on,
        ]);
    }
    table
}
