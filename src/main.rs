//! dagnode CLI
//!
//! This is a demonstration CLI for the dagnode library. It builds a small
//! build pipeline graph and runs the library operations over it.
//!
//! Set `RUST_LOG=debug` (or `trace`) to see edge and traversal logging.

use anyhow::{anyhow, bail, Context, Result};
use dagnode::prelude::*;

/// Sample pipeline: (id, estimated seconds, dependencies).
const PIPELINE: &[(&str, u32, &[&str])] = &[
    ("checkout", 2, &[]),
    ("fetch-deps", 20, &["checkout"]),
    ("codegen", 5, &["checkout"]),
    ("compile", 90, &["fetch-deps", "codegen"]),
    ("lint", 15, &["codegen"]),
    ("unit-tests", 40, &["compile"]),
    ("package", 10, &["compile", "lint"]),
    ("publish", 3, &["package", "unit-tests"]),
];

fn main() -> Result<()> {
    env_logger::init();

    println!("dagnode - dependency graph nodes v{}", dagnode::VERSION);
    println!();

    let args: Vec<String> = std::env::args().collect();
    run(&args)
}

/// Runs one command; any failure propagates so the process exits non-zero.
fn run(args: &[String]) -> Result<()> {
    let program = args.first().map(String::as_str).unwrap_or("dagnode");

    let Some(command) = args.get(1) else {
        print_usage(program);
        return Ok(());
    };

    let nodes = build_pipeline()?;
    let result = match command.as_str() {
        "show" => show(&nodes),
        "order" => order(&nodes),
        "paths" => paths(&nodes, args.get(2).map(String::as_str)),
        "clone" => match args.get(2) {
            Some(target) => clone_for(&nodes, target),
            None => Err(anyhow!("please specify a node ID to keep")),
        },
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(())
        }
        other => {
            print_usage(program);
            Err(anyhow!("unknown command: {}", other))
        }
    };

    if let Some(node) = nodes.first() {
        node.dispose();
    }
    result
}

fn print_usage(program: &str) {
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  show              Print every node with its edges");
    println!("  order             Breadth-first order from the root");
    println!("  paths [id]        Every path from the root (optionally only to <id>)");
    println!("  clone <id>        Clone keeping <id> and everything it needs");
    println!("  help              Show this help message");
}

fn build_pipeline() -> Result<Vec<GraphNode<u32>>> {
    let nodes: Vec<GraphNode<u32>> = PIPELINE
        .iter()
        .map(|(id, cost, _)| GraphNode::new(*id, *cost))
        .collect();

    for ((id, _, deps), node) in PIPELINE.iter().zip(&nodes) {
        for dep in deps.iter() {
            let dependency = find(&nodes, dep)
                .with_context(|| format!("pipeline step {} names unknown dependency {}", id, dep))?;
            node.add_dependency(dependency)?;
        }
    }
    Ok(nodes)
}

fn find<'a>(nodes: &'a [GraphNode<u32>], id: &str) -> Option<&'a GraphNode<u32>> {
    let id = NodeId::from(id);
    nodes.iter().find(|node| node.id() == &id)
}

fn names(nodes: &[GraphNode<u32>]) -> String {
    nodes
        .iter()
        .map(|node| node.id().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn root_of(nodes: &[GraphNode<u32>]) -> Result<GraphNode<u32>> {
    let Some(last) = nodes.last() else {
        bail!("pipeline is empty");
    };
    Ok(last.root_node()?)
}

fn show(nodes: &[GraphNode<u32>]) -> Result<()> {
    for node in nodes {
        println!("  • {} ({}s)", node.id(), *node.payload());
        println!("      depends on: [{}]", names(&node.dependencies()));
        println!("      needed by:  [{}]", names(&node.dependents()));
    }
    Ok(())
}

fn order(nodes: &[GraphNode<u32>]) -> Result<()> {
    let root = root_of(nodes)?;
    println!("Root: {}", root.id());
    println!();

    let mut total = 0;
    root.traverse(|node, path| {
        total += *node.payload();
        println!("  {:>2} hops  {}", path.len() - 1, node.id());
    });
    println!();
    println!("Total estimated time: {}s", total);
    Ok(())
}

fn paths(nodes: &[GraphNode<u32>], target: Option<&str>) -> Result<()> {
    let root = root_of(nodes)?;
    let target = target.map(NodeId::from);

    let mut count = 0;
    root.traverse_paths(
        |node, path| {
            if target.as_ref().map_or(true, |target| node.id() == target) {
                count += 1;
                let route: Vec<String> = path.iter().rev().map(|n| n.id().to_string()).collect();
                println!("  {}", route.join(" -> "));
            }
        },
        GraphNode::dependents,
    )?;
    println!();
    println!("{} path(s)", count);
    Ok(())
}

fn clone_for(nodes: &[GraphNode<u32>], target: &str) -> Result<()> {
    let target = NodeId::from(target);
    let root = root_of(nodes)?;

    let copy = root
        .clone_with_relationships(Some(|node: &GraphNode<u32>| node.id() == &target))?
        .with_context(|| format!("no node {} in pipeline", target))?;

    println!("Steps needed for {}:", target);
    let mut kept = 0;
    copy.traverse(|node, _| {
        kept += 1;
        println!("  • {} <- [{}]", node.id(), names(&node.dependencies()));
    });
    println!();
    println!("{} of {} steps kept", kept, nodes.len());

    copy.dispose();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_unknown_command_fails() {
        let err = run(&args(&["dagnode", "frobnicate"])).unwrap_err();
        assert!(err.to_string().contains("unknown command: frobnicate"));
    }

    #[test]
    fn test_clone_without_target_fails() {
        assert!(run(&args(&["dagnode", "clone"])).is_err());
    }

    #[test]
    fn test_clone_unknown_target_fails() {
        assert!(run(&args(&["dagnode", "clone", "deploy"])).is_err());
    }

    #[test]
    fn test_known_commands_succeed() {
        assert!(run(&args(&["dagnode"])).is_ok());
        assert!(run(&args(&["dagnode", "order"])).is_ok());
        assert!(run(&args(&["dagnode", "clone", "lint"])).is_ok());
    }
}
