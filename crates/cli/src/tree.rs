//! `rollscope tree` — render one household's family tree.

use std::collections::HashSet;
use std::path::PathBuf;

use rollscope_engine::model::{FamilyTree, MemberId};
use rollscope_engine::{build_family_tree, compute_households, Household, TreeOutcome};

use crate::exit_codes::{EXIT_NOT_FOUND, EXIT_RUNTIME};
use crate::{batch_label, cli_err, load_config, CliError};

pub fn cmd_tree(
    input: PathBuf,
    house: String,
    config_path: Option<PathBuf>,
    batch: Option<String>,
    json_output: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_ref())?;
    let batch = batch_label(batch, &input);

    let members = rollscope_io::load_roll(&input, &batch)
        .map_err(|e| cli_err(EXIT_RUNTIME, e.to_string()))?;

    let households = compute_households(&config, &members);
    let household = find_household(&households, &house)?;

    let outcome = build_family_tree(&household.members, &household.links, &config.layout);

    if json_output {
        let json_str = serde_json::to_string_pretty(&outcome)
            .map_err(|e| cli_err(EXIT_RUNTIME, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    match outcome {
        TreeOutcome::Unavailable => eprintln!("{}: no tree available", household.key),
        TreeOutcome::Tree(tree) => print_tree(&household.key.to_string(), &tree),
    }

    Ok(())
}

/// Match by full `batch/house` key, or by bare house number when exactly one
/// household carries it.
fn find_household<'a>(
    households: &'a [Household],
    wanted: &str,
) -> Result<&'a Household, CliError> {
    if let Some(exact) = households.iter().find(|h| h.key.to_string() == wanted) {
        return Ok(exact);
    }

    let by_house: Vec<&Household> = households
        .iter()
        .filter(|h| h.key.house == wanted)
        .collect();
    match by_house.as_slice() {
        [single] => Ok(*single),
        [] => Err(cli_err(
            EXIT_NOT_FOUND,
            format!("no household matches '{wanted}'"),
        )),
        many => Err(cli_err(
            EXIT_NOT_FOUND,
            format!(
                "'{wanted}' is ambiguous across {} batches; use the full batch/house key",
                many.len()
            ),
        )),
    }
}

fn print_tree(key: &str, tree: &FamilyTree) {
    println!("{key}");
    let mut printed: HashSet<MemberId> = HashSet::new();
    print_node(tree, tree.root, 0, None, &mut printed);

    // Members the traversal never reached (disconnected relatives)
    let mut strays: Vec<&MemberId> = tree
        .members
        .keys()
        .filter(|id| !printed.contains(id))
        .collect();
    strays.sort();
    if !strays.is_empty() {
        println!("unconnected:");
        for id in strays {
            if let Some(member) = tree.members.get(id) {
                println!("  {} ({})", member.name, member.age);
            }
        }
    }
}

fn print_node(
    tree: &FamilyTree,
    id: MemberId,
    depth: usize,
    relation: Option<&str>,
    printed: &mut HashSet<MemberId>,
) {
    if !printed.insert(id) {
        return;
    }
    let Some(member) = tree.members.get(&id) else {
        return;
    };

    let indent = "  ".repeat(depth);
    match relation {
        Some(rel) => println!("{indent}\u{2514}\u{2500} {} ({}) {rel}", member.name, member.age),
        None => println!("{indent}{} ({})", member.name, member.age),
    }

    if let Some(kids) = tree.children.get(&id) {
        for edge in kids {
            print_node(
                tree,
                edge.child,
                depth + 1,
                Some(edge.relation.as_str()),
                printed,
            );
        }
    }
}
