//! Text and Graphviz renderings of a built [`DependencyGraph`].

use std::collections::HashSet;

use crate::graph::DependencyGraph;

const RULE_WIDTH: usize = 50;

/// Render the graph below `start` as an indented tree, followed by the list
/// of detected cycles.
///
/// Children are printed in sorted order. A package whose children were
/// already printed is shown again as a leaf marked `(cycle)`, which keeps the
/// output finite for cycles of any length.
pub fn render_tree(start: &str, graph: &DependencyGraph) -> String {
    let mut output = String::new();
    output.push_str(&format!("Dependency graph for {start}:\n"));
    output.push_str(&format!("{}\n", "=".repeat(RULE_WIDTH)));
    output.push_str(&format!("┌── {start}\n"));

    if graph.has_dependencies(start) {
        let mut rendered = HashSet::new();
        rendered.insert(start.to_string());
        render_children(&mut output, graph, start, "", &mut rendered);
    } else {
        output.push_str("    (no dependencies)\n");
    }

    output.push('\n');
    output.push_str(&render_cycles(graph));
    output
}

fn render_children(
    output: &mut String,
    graph: &DependencyGraph,
    package: &str,
    prefix: &str,
    rendered: &mut HashSet<String>,
) {
    let deps = graph.dependencies(package);
    let count = deps.len();
    for (i, dep) in deps.into_iter().enumerate() {
        let is_last = i == count - 1;
        let connector = if is_last { "└── " } else { "├── " };

        if rendered.contains(dep) {
            output.push_str(&format!("{prefix}{connector}{dep} (cycle)\n"));
            continue;
        }
        output.push_str(&format!("{prefix}{connector}{dep}\n"));

        if graph.has_dependencies(dep) {
            rendered.insert(dep.to_string());
            let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
            render_children(output, graph, dep, &child_prefix, rendered);
        }
    }
}

/// The cycle section printed under the tree.
pub fn render_cycles(graph: &DependencyGraph) -> String {
    if !graph.has_cycles() {
        return "No cyclic dependencies found.\n".to_string();
    }
    let mut output = String::from("Cyclic dependencies found:\n");
    for (a, b) in graph.cycles() {
        output.push_str(&format!("   {a} <-> {b}\n"));
    }
    output
}

/// Aggregate numbers about the most recent build.
pub fn render_stats(graph: &DependencyGraph) -> String {
    let mut output = String::from("Statistics:\n");
    output.push_str(&format!(
        "   Packages in graph: {}\n",
        graph.package_count()
    ));
    output.push_str(&format!("   Cycles detected: {}\n", graph.cycles().len()));
    if !graph.failures().is_empty() {
        output.push_str(&format!(
            "   Failed lookups: {}\n",
            graph.failures().len()
        ));
        for failure in graph.failures() {
            output.push_str(&format!("      {}: {}\n", failure.package, failure.message));
        }
    }
    output
}

/// Graphviz DOT source for every recorded edge. Edges that form a detected
/// cycle are drawn in red.
pub fn render_dot(start: &str, graph: &DependencyGraph) -> String {
    let mut output = String::from("digraph dependencies {\n");
    output.push_str("    rankdir=LR;\n");
    output.push_str("    node [shape=box];\n");
    output.push_str(&format!("    {} [style=bold];\n", quote(start)));

    for (package, deps) in graph.edges() {
        for dep in deps {
            let attrs = if graph.is_cycle_edge(package, dep) {
                " [color=red]"
            } else {
                ""
            };
            output.push_str(&format!("    {} -> {}{attrs};\n", quote(package), quote(dep)));
        }
    }

    output.push_str("}\n");
    output
}

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}
