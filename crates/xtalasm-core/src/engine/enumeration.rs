use super::assembly::Assembly;
use super::context::AssemblyContext;
use super::engaged::EngagedSet;
use super::progress::{Progress, ProgressReporter};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of the pruned traversal of the engaged-set lattice.
#[derive(Debug, Clone)]
pub struct Enumeration<'a> {
    /// Valid assemblies in engaged-set order, starting with the empty assembly.
    pub valid: Vec<Assembly<'a>>,
    /// Assemblies found invalid; none of their supersets was generated.
    pub invalid: Vec<Assembly<'a>>,
    /// Number of non-empty engaged sets whose validity was computed.
    pub evaluated: usize,
}

/// Breadth-first traversal of the engaged-set lattice, one popcount level at a time.
///
/// Only valid assemblies are expanded, and children that contain a set already
/// found invalid are never generated. Each child is evaluated once even when
/// several parents produce it.
#[instrument(skip_all, name = "enumeration_task")]
pub fn run<'a>(context: &'a AssemblyContext, reporter: &ProgressReporter) -> Enumeration<'a> {
    let num_clusters = context.num_clusters();
    info!(clusters = num_clusters, "Starting assembly enumeration.");
    reporter.report(Progress::PhaseStart {
        name: "Enumeration",
    });

    let root = context.empty_assembly();
    let mut frontier = vec![root.clone()];
    let mut valid = vec![root];
    let mut invalid: Vec<Assembly<'a>> = Vec::new();
    let mut invalid_sets: Vec<EngagedSet> = Vec::new();
    let mut evaluated = 0;

    for level in 1..=num_clusters {
        let children: BTreeSet<EngagedSet> = frontier
            .iter()
            .flat_map(|parent| parent.engaged_set().children(&invalid_sets))
            .collect();
        if children.is_empty() {
            debug!(level, "No children left to expand.");
            break;
        }

        let candidates: Vec<Assembly<'a>> = children
            .into_iter()
            .map(|engaged| Assembly::new(context, engaged))
            .collect();
        reporter.report(Progress::TaskStart {
            total_steps: candidates.len() as u64,
        });

        #[cfg(not(feature = "parallel"))]
        let iterator = candidates.into_iter();

        #[cfg(feature = "parallel")]
        let iterator = candidates.into_par_iter();

        let outcomes: Vec<(Assembly<'a>, bool)> = iterator
            .map(|assembly| {
                let is_valid = assembly.is_valid();
                reporter.report(Progress::TaskIncrement);
                (assembly, is_valid)
            })
            .collect();

        reporter.report(Progress::TaskFinish);
        evaluated += outcomes.len();

        let mut next_frontier = Vec::new();
        let mut level_invalid = 0;
        for (assembly, is_valid) in outcomes {
            if is_valid {
                next_frontier.push(assembly);
            } else {
                invalid_sets.push(assembly.engaged_set().clone());
                invalid.push(assembly);
                level_invalid += 1;
            }
        }

        debug!(
            level,
            valid = next_frontier.len(),
            invalid = level_invalid,
            "Level evaluated."
        );
        reporter.report(Progress::LevelComplete {
            level,
            valid: next_frontier.len(),
            invalid: level_invalid,
        });

        valid.extend(next_frontier.iter().cloned());
        frontier = next_frontier;
        if frontier.is_empty() {
            break;
        }
    }

    info!(
        valid = valid.len(),
        invalid = invalid.len(),
        evaluated,
        "Assembly enumeration finished."
    );
    reporter.report(Progress::PhaseFinish);

    Enumeration {
        valid,
        invalid,
        evaluated,
    }
}
